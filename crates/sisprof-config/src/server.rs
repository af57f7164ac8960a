use crate::{env_lookup, parse_or};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Port of the separate Prometheus listener.
    pub metrics_port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000),
            metrics_port: parse_or(&lookup, "METRICS_PORT", 9090),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn metrics_address(&self) -> String {
        format!("{}:{}", self.host, self.metrics_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars;

    #[test]
    fn test_addresses() {
        let config = ServerConfig::from_vars(vars(&[("HOST", "127.0.0.1"), ("PORT", "8080")]));
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.metrics_address(), "127.0.0.1:9090");
    }
}
