use std::env;

const DEFAULT_PORT: u16 = 4017;
const DEFAULT_DB_PATH: &str = "./devmarket.db";
const DEFAULT_RATE_LIMIT_RPM: u32 = 120;
const DEFAULT_ADS_TXT_PATH: &str = "./public/ads.txt";
const DEFAULT_ADMIN_EMAIL: &str = "admin@devtools.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,
    /// SQLite database path
    pub db_path: String,
    /// Secret used to validate session tokens (shared with the auth service)
    pub auth_secret: Vec<u8>,
    /// CORS allowed origins
    pub allowed_origins: Vec<String>,
    /// Rate limit requests per minute
    pub rate_limit_rpm: u32,
    /// Path of the ads.txt file served at /ads.txt
    pub ads_txt_path: String,
    /// Directory to serve static files from (None = don't serve statics)
    pub public_dir: Option<String>,
    /// Bearer token required for /metrics endpoint (None = public)
    pub metrics_token: Option<String>,
    /// Bootstrap superadmin credentials
    pub admin_email: String,
    pub admin_password: String,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("db_path", &self.db_path)
            .field("auth_secret", &"[REDACTED]")
            .field("allowed_origins", &self.allowed_origins)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field("ads_txt_path", &self.ads_txt_path)
            .field("public_dir", &self.public_dir)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("admin_email", &self.admin_email)
            .field("admin_password", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Required: session token secret
        let auth_secret = env::var("AUTH_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| s.into_bytes())
            .ok_or(ConfigError::MissingRequired("AUTH_SECRET"))?;

        if auth_secret.len() < 32 {
            tracing::warn!(
                "AUTH_SECRET is short ({} bytes, recommend 32+) — \
                 use `openssl rand -hex 32` to generate a secure secret",
                auth_secret.len()
            );
        }

        // Optional: port
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        // Optional: database path
        let db_path = env::var("DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

        // Optional: allowed origins
        let allowed_origins: Vec<String> = env::var("ALLOWED_ORIGINS")
            .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ]
            });

        // Optional: rate limit
        let rate_limit_rpm = env::var("RATE_LIMIT_RPM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_RPM);

        // Optional: ads.txt location
        let ads_txt_path =
            env::var("ADS_TXT_PATH").unwrap_or_else(|_| DEFAULT_ADS_TXT_PATH.to_string());

        // Optional: static files directory
        let public_dir = env::var("PUBLIC_DIR").ok().filter(|s| !s.is_empty());

        // Optional: metrics token
        let metrics_token = env::var("METRICS_TOKEN").ok().filter(|s| !s.is_empty());

        if metrics_token.is_none() {
            tracing::warn!("METRICS_TOKEN not set — /metrics endpoint is publicly accessible");
        }

        // Bootstrap superadmin credentials (defaulted if absent)
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
        let admin_password =
            env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

        if admin_password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!(
                "ADMIN_PASSWORD not set — bootstrap superadmin uses the default password"
            );
        }

        Ok(Self {
            port,
            db_path,
            auth_secret,
            allowed_origins,
            rate_limit_rpm,
            ads_txt_path,
            public_dir,
            metrics_token,
            admin_email,
            admin_password,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),
}
