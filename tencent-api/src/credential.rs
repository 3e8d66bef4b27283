use crate::error::ApiError;

pub const SECRET_ID_ENV: &str = "TENCENT_SECRET_ID";
pub const SECRET_KEY_ENV: &str = "TENCENT_SECRET_KEY";

/// Tencent Cloud API credential pair, resolved once at startup and threaded
/// through the client constructors.
#[derive(Clone)]
pub struct Credential {
    pub secret_id: String,
    pub secret_key: String,
}

impl Credential {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Read the credential pair from `TENCENT_SECRET_ID` / `TENCENT_SECRET_KEY`.
    pub fn from_env() -> Result<Self, ApiError> {
        let secret_id = std::env::var(SECRET_ID_ENV).map_err(|_| ApiError::MissingCredential(SECRET_ID_ENV))?;
        let secret_key = std::env::var(SECRET_KEY_ENV).map_err(|_| ApiError::MissingCredential(SECRET_KEY_ENV))?;
        Ok(Self::new(secret_id, secret_key))
    }
}

// Keep the secret key out of debug output.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::Credential;

    #[test]
    fn debug_redacts_secret_key() {
        let credential = Credential::new("AKIDexample", "very-secret");
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("AKIDexample"));
        assert!(!rendered.contains("very-secret"));
    }
}
