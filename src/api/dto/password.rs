use serde::{Deserialize, Serialize};

use crate::services::password::PasswordHasher;

#[derive(Debug, Deserialize)]
pub struct GeneratePasswordQuery {
    #[serde(default)]
    pub password: String,
}

impl GeneratePasswordQuery {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.password.is_empty() {
            return Err("password is required");
        }
        if self.password.len() > PasswordHasher::MAX_PASSWORD_BYTES {
            return Err("password must be <= 72 bytes");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct GeneratedPasswordResponse {
    pub hash: String,
    pub cost: u32,
}
