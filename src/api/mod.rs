/*
 * Responsibility
 * - endpoints owned by this service (routes() is the only export used by app.rs)
 * - everything else in the access table belongs to upstream services; here it hits the fallback
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
