use std::env;
use std::fmt;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 5001;
const DATABASE: &str = "TripPlanner";
const AI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const AI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug)]
pub enum ConfigError {
    Missing(String),
    Invalid(String, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid(key, value) => write!(f, "{} has invalid value '{}'", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub database: String,
    pub jwt_secret: String,
    pub mapbox_token: Option<String>,
    pub ai_api_key: Option<String>,
    pub ai_api_url: String,
    pub ai_model: String,
    pub frontend_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT".to_string(), value))?,
            Err(_) => PORT,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port,
            mongo_uri: required("MONGODB_URI")?,
            database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| DATABASE.to_string()),
            jwt_secret: required("JWT_SECRET")?,
            mapbox_token: optional("MAPBOX_TOKEN"),
            ai_api_key: optional("AI_API_KEY"),
            ai_api_url: env::var("AI_API_URL").unwrap_or_else(|_| AI_API_URL.to_string()),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| AI_MODEL.to_string()),
            frontend_url: optional("FRONTEND_URL"),
        })
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    optional(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

// Empty values count as unset
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for key in [
            "HOST",
            "PORT",
            "MONGODB_URI",
            "MONGODB_DATABASE",
            "JWT_SECRET",
            "MAPBOX_TOKEN",
            "AI_API_KEY",
            "AI_API_URL",
            "AI_MODEL",
            "FRONTEND_URL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();
        env::set_var("MONGODB_URI", "mongodb://localhost:27017");
        env::set_var("JWT_SECRET", "secret");
        env::set_var("MAPBOX_TOKEN", "  ");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5001);
        assert_eq!(config.database, "TripPlanner");
        assert!(config.mapbox_token.is_none());
        assert_eq!(config.ai_model, AI_MODEL);
        clear();
    }

    #[test]
    #[serial]
    fn test_missing_mongo_uri() {
        clear();
        env::set_var("JWT_SECRET", "secret");
        match AppConfig::from_env() {
            Err(ConfigError::Missing(key)) => assert_eq!(key, "MONGODB_URI"),
            other => panic!("unexpected result: {:?}", other),
        }
        clear();
    }

    #[test]
    #[serial]
    fn test_invalid_port() {
        clear();
        env::set_var("MONGODB_URI", "mongodb://localhost:27017");
        env::set_var("JWT_SECRET", "secret");
        env::set_var("PORT", "eighty");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::Invalid(_, _))
        ));
        clear();
    }
}
