use std::env;
use std::net::SocketAddr;
use zeroize::Zeroizing;

#[derive(Clone)]
pub struct Config {
    // Admin identity
    pub admin_password: Zeroizing<String>,
    pub secret_key: Zeroizing<String>,

    // Redis
    pub redis_url: String,

    // Server
    pub bind_addr: SocketAddr,
    pub static_dir: String,

    // Limits
    pub max_body_bytes: usize,

    // Session cookie lifetime (in seconds)
    pub session_max_age_secs: u64,

    // Rate limiting (login attempts per minute, per client IP)
    pub rate_limit_login_per_min: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("admin_password", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("static_dir", &self.static_dir)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("session_max_age_secs", &self.session_max_age_secs)
            .field("rate_limit_login_per_min", &self.rate_limit_login_per_min)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        let admin_password = Zeroizing::new(required_secret("ADMIN_PASSWORD")?);
        let secret_key = Zeroizing::new(required_secret("SECRET_KEY")?);

        // Redis — required to prevent silent unauthenticated connections
        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        // Limits
        let max_body_bytes = parse_env_or_default("MAX_BODY_BYTES", 1_048_576)?;

        // 30 days
        let session_max_age_secs = parse_env_or_default("SESSION_MAX_AGE_SECS", 2_592_000)?;
        if session_max_age_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_MAX_AGE_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        // Rate limiting
        let rate_limit_login_per_min = parse_env_or_default("RATE_LIMIT_LOGIN_PER_MIN", 5)?;
        if rate_limit_login_per_min == 0 {
            return Err(ConfigError::InvalidValue(
                "RATE_LIMIT_LOGIN_PER_MIN".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            admin_password,
            secret_key,
            redis_url,
            bind_addr,
            static_dir,
            max_body_bytes,
            session_max_age_secs,
            rate_limit_login_per_min,
        })
    }
}

#[cfg(test)]
impl Config {
    /// Config with defaults for everything except the two secrets.
    pub(crate) fn for_tests(admin_password: &str, secret_key: &str) -> Self {
        Config {
            admin_password: Zeroizing::new(admin_password.to_string()),
            secret_key: Zeroizing::new(secret_key.to_string()),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            static_dir: "static".to_string(),
            max_body_bytes: 1_048_576,
            session_max_age_secs: 2_592_000,
            rate_limit_login_per_min: 5,
        }
    }
}

/// Read a secret that must be present and non-empty.
fn required_secret(key: &str) -> Result<String, ConfigError> {
    let value = env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))?;
    if value.is_empty() {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "cannot be empty".to_string(),
        ));
    }
    Ok(value)
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}
