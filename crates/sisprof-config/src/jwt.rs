use crate::{env_lookup, parse_or};

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            secret: lookup("JWT_SECRET")
                .unwrap_or_else(|| "your-secret-key-change-in-production".to_string()),
            access_token_expiry: parse_or(&lookup, "JWT_ACCESS_EXPIRY", 3600), // 1 hour
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars;

    #[test]
    fn test_defaults() {
        let config = JwtConfig::from_vars(vars(&[]));
        assert_eq!(config.access_token_expiry, 3600);
        assert!(!config.secret.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = JwtConfig::from_vars(vars(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_ACCESS_EXPIRY", "600"),
        ]));
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.access_token_expiry, 600);
    }

    #[test]
    fn test_malformed_expiry_falls_back() {
        let config = JwtConfig::from_vars(vars(&[("JWT_ACCESS_EXPIRY", "an hour")]));
        assert_eq!(config.access_token_expiry, 3600);
    }
}
