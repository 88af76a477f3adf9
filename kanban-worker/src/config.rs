/// Reminder worker configuration
///
/// Read from the same environment as the API server so both processes can
/// share one `.env` file.
///
/// # Environment Variables
///
/// - `POSTGRES_URL`: PostgreSQL connection string (required)
/// - `POSTGRES_MAX_CONNECTIONS`: pool size (default: 10)
/// - `PUBLIC_VAPID_KEY` / `PRIVATE_VAPID_KEY`: web push key pair (required)
/// - `VAPID_SUBJECT`: contact URI for push services (default: `mailto:<MAILER_EMAIL>`)
/// - `REMINDER_POLL_INTERVAL_SECS`: seconds between scans (default: 30)
/// - `REMINDER_BATCH_SIZE`: tasks claimed per scan (default: 50)

use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_BATCH_SIZE: i64 = 50;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub vapid_public_key: String,
    pub vapid_private_key: String,
    pub vapid_subject: String,
    pub poll_interval: Duration,
    pub batch_size: i64,
}

impl WorkerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            value(key).ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        let vapid_subject = match (value("VAPID_SUBJECT"), value("MAILER_EMAIL")) {
            (Some(subject), _) => subject,
            (None, Some(email)) => format!("mailto:{}", email.trim()),
            (None, None) => {
                return Err(anyhow::anyhow!(
                    "VAPID_SUBJECT or MAILER_EMAIL environment variable is required"
                ))
            }
        };

        let poll_interval_secs: u64 =
            number(value("REMINDER_POLL_INTERVAL_SECS"), "REMINDER_POLL_INTERVAL_SECS")?
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_interval_secs == 0 {
            return Err(anyhow::anyhow!("REMINDER_POLL_INTERVAL_SECS must be greater than 0"));
        }

        let batch_size: i64 = number(value("REMINDER_BATCH_SIZE"), "REMINDER_BATCH_SIZE")?
            .unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size < 1 {
            return Err(anyhow::anyhow!("REMINDER_BATCH_SIZE must be greater than 0"));
        }

        Ok(Self {
            database_url: required("POSTGRES_URL")?,
            max_connections: number(value("POSTGRES_MAX_CONNECTIONS"), "POSTGRES_MAX_CONNECTIONS")?
                .unwrap_or(10),
            vapid_public_key: required("PUBLIC_VAPID_KEY")?,
            vapid_private_key: required("PRIVATE_VAPID_KEY")?,
            vapid_subject,
            poll_interval: Duration::from_secs(poll_interval_secs),
            batch_size,
        })
    }
}

fn number<T>(raw: Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|v| {
        v.trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} must be a number: {}", key, e))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 4] = [
        ("POSTGRES_URL", "postgresql://localhost/kanban"),
        ("PUBLIC_VAPID_KEY", "public"),
        ("PRIVATE_VAPID_KEY", "private"),
        ("MAILER_EMAIL", "admin@example.com"),
    ];

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::from_lookup(lookup(&BASE)).unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.vapid_subject, "mailto:admin@example.com");
    }

    #[test]
    fn test_explicit_subject_wins() {
        let mut pairs = BASE.to_vec();
        pairs.push(("VAPID_SUBJECT", "https://kanban.example.com"));
        pairs.push(("REMINDER_POLL_INTERVAL_SECS", "5"));
        pairs.push(("REMINDER_BATCH_SIZE", "10"));

        let config = WorkerConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.vapid_subject, "https://kanban.example.com");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.batch_size, 10);
    }

    #[test]
    fn test_vapid_keys_required() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "PRIVATE_VAPID_KEY")
            .collect();

        let err = WorkerConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("PRIVATE_VAPID_KEY"));
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let mut pairs = BASE.to_vec();
        pairs.push(("REMINDER_BATCH_SIZE", "0"));
        assert!(WorkerConfig::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = BASE.to_vec();
        pairs.push(("REMINDER_POLL_INTERVAL_SECS", "soon"));
        assert!(WorkerConfig::from_lookup(lookup(&pairs)).is_err());
    }
}
