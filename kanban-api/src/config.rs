/// Configuration management for the API server
///
/// Configuration is read once at startup from environment variables (a `.env`
/// file is honoured in development) and shared immutably as `Arc<Config>`.
///
/// # Environment Variables
///
/// - `PORT`: port to bind to (required)
/// - `SERVER_URL`: allowed CORS origin, `*` for any
/// - `WEB_SERVICE_URL`: public base URL used in email links (required)
/// - `POSTGRES_URL`: PostgreSQL connection string (required)
/// - `POSTGRES_MAX_CONNECTIONS`: pool size (default: 10)
/// - `JWT_SEED`: secret used to sign tokens (required)
/// - `SEND_EMAIL`: `true` to deliver mail through SMTP (default: false)
/// - `MAILER_SERVICE`: `gmail`, `outlook` or an SMTP host
/// - `MAILER_EMAIL` / `MAILER_SECRET_KEY`: SMTP credentials, required when sending
/// - `PUBLIC_VAPID_KEY` / `PRIVATE_VAPID_KEY`: web push key pair (optional)
/// - `UPLOADS_DIR`: root directory for uploaded files (default: uploads)
///
/// # Example
///
/// ```no_run
/// use kanban_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::path::PathBuf;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub mailer: MailerConfig,

    /// Web push keys; push endpoints are disabled when absent
    pub push: Option<PushConfig>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// CORS origin
    pub server_url: String,

    /// Base URL of this service as seen from a browser, without trailing slash
    pub web_service_url: String,

    pub uploads_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub seed: String,
}

#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// When false, messages are logged instead of sent
    pub send_email: bool,

    /// SMTP relay host resolved from `MAILER_SERVICE`
    pub smtp_host: String,

    pub email: String,
    pub secret_key: String,
}

#[derive(Debug, Clone)]
pub struct PushConfig {
    pub public_key: String,
    pub private_key: String,
}

/// Maps well-known provider names onto their SMTP relay
pub fn smtp_host_for(service: &str) -> String {
    match service.trim().to_ascii_lowercase().as_str() {
        "" | "gmail" => "smtp.gmail.com".to_string(),
        "outlook" | "hotmail" => "smtp-mail.outlook.com".to_string(),
        _ => service.trim().to_string(),
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        let port = required("PORT")?
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("PORT must be a valid port number: {}", e))?;

        let max_connections = match lookup("POSTGRES_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                anyhow::anyhow!("POSTGRES_MAX_CONNECTIONS must be a number: {}", e)
            })?,
            None => 10,
        };

        let send_email = lookup("SEND_EMAIL")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let mailer = MailerConfig {
            send_email,
            smtp_host: smtp_host_for(&lookup("MAILER_SERVICE").unwrap_or_default()),
            email: if send_email {
                required("MAILER_EMAIL")?
            } else {
                lookup("MAILER_EMAIL").unwrap_or_default()
            },
            secret_key: if send_email {
                required("MAILER_SECRET_KEY")?
            } else {
                lookup("MAILER_SECRET_KEY").unwrap_or_default()
            },
        };

        let push = match (lookup("PUBLIC_VAPID_KEY"), lookup("PRIVATE_VAPID_KEY")) {
            (Some(public_key), Some(private_key)) => Some(PushConfig {
                public_key,
                private_key,
            }),
            (None, None) => None,
            _ => anyhow::bail!("PUBLIC_VAPID_KEY and PRIVATE_VAPID_KEY must be set together"),
        };

        Ok(Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
                server_url: lookup("SERVER_URL").unwrap_or_else(|| "*".to_string()),
                web_service_url: required("WEB_SERVICE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                uploads_dir: PathBuf::from(
                    lookup("UPLOADS_DIR").unwrap_or_else(|| "uploads".to_string()),
                ),
            },
            database: DatabaseConfig {
                url: required("POSTGRES_URL")?,
                max_connections,
            },
            jwt: JwtConfig {
                seed: required("JWT_SEED")?,
            },
            mailer,
            push,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
