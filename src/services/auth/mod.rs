pub mod access_jwt;
pub mod factory;
pub mod principal;
pub mod role;

pub use access_jwt::{AccessJwtError, AccessTokenVerifier, token_fingerprint};
pub use factory::build_access_verifier;
pub use principal::Principal;
pub use role::{Role, UnknownRole};
