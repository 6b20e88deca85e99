/// Configuration for the notifier job
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `MAIL_RELAY_URL`: HTTP mail relay endpoint (required)
/// - `MAIL_RELAY_TOKEN`: Bearer token for the relay (optional)
/// - `DEFAULT_FROM_EMAIL`: Sender address for reminders
///   (default: `TaskFlow <noreply@taskflow.local>`)
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use taskflow_notifier::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Sending reminders as {}", config.mail.from_address);
/// # Ok(())
/// # }
/// ```

use std::env;

/// Complete notifier configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Mail transport configuration
    pub mail: MailConfig,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Mail transport configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// HTTP mail relay endpoint
    pub relay_url: String,

    /// Optional bearer token for the relay
    pub relay_token: Option<String>,

    /// Sender address for reminder emails
    pub from_address: String,
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

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()?;

        let relay_url = env::var("MAIL_RELAY_URL")
            .map_err(|_| anyhow::anyhow!("MAIL_RELAY_URL environment variable is required"))?;

        let relay_token = env::var("MAIL_RELAY_TOKEN").ok().filter(|t| !t.is_empty());

        let from_address = env::var("DEFAULT_FROM_EMAIL")
            .unwrap_or_else(|_| "TaskFlow <noreply@taskflow.local>".to_string());

        Ok(Self {
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            mail: MailConfig {
                relay_url,
                relay_token,
                from_address,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_struct() {
        let config = Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/taskflow_test".to_string(),
                max_connections: 5,
            },
            mail: MailConfig {
                relay_url: "http://localhost:8025/send".to_string(),
                relay_token: None,
                from_address: "TaskFlow <noreply@taskflow.local>".to_string(),
            },
        };

        assert_eq!(config.database.max_connections, 5);
        assert!(config.mail.relay_token.is_none());
    }
}
