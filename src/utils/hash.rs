use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{config::HashConfig, error::AppError};

/// Salted one-way hashing of plaintext passwords (Argon2id).
///
/// The cost parameters only affect new digests. Verification always uses the
/// salt and parameters embedded in the PHC string being checked.
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
    // Digest of a random secret, verified against when a login names an
    // unknown email so both failure paths cost the same.
    dummy_digest: String,
}

impl CredentialHasher {
    pub fn new(params: Params) -> Result<Self, AppError> {
        let mut hasher = Self {
            params,
            dummy_digest: String::new(),
        };
        let secret = SaltString::generate(&mut OsRng);
        hasher.dummy_digest = hasher.hash(secret.as_str())?;
        Ok(hasher)
    }

    pub fn from_config(config: &HashConfig) -> Result<Self, AppError> {
        let mut builder = ParamsBuilder::new();
        if let Some(m_cost) = config.memory_kib {
            builder.m_cost(m_cost);
        }
        if let Some(t_cost) = config.iterations {
            builder.t_cost(t_cost);
        }
        if let Some(p_cost) = config.parallelism {
            builder.p_cost(p_cost);
        }
        let params = builder
            .build()
            .map_err(|e| AppError::InternalServerError(format!("invalid argon2 params: {}", e)))?;

        Self::new(params)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?
            .to_string();

        Ok(password_hash)
    }

    /// Returns `false` for a mismatch and for any digest that does not parse.
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Burns one verification worth of CPU and always fails.
    pub fn verify_dummy(&self, password: &str) -> bool {
        self.verify(password, &self.dummy_digest);
        false
    }
}
