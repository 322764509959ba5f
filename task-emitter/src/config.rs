//! Configuration module for environment variable parsing.
//!
//! All settings come from environment variables and are passed explicitly to
//! the entry point. Invalid values fall back to their defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::admin::AdminConsole;
use crate::queue::TASK_QUEUE;

/// Default location of the RabbitMQ management UI queue list.
pub const DEFAULT_ADMIN_URL: &str = "http://localhost:15672/#/queues";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// RabbitMQ host name, `host:port`, or full AMQP URL
    pub rabbitmq_host: String,

    /// Durable queue that receives every task
    pub queue_name: String,

    /// CSV file of tasks, relative to the working directory
    pub input_file: PathBuf,

    /// Pause after each published row, in milliseconds
    pub inter_row_delay_ms: u64,

    /// Management UI address opened before emitting
    pub admin_url: String,

    /// Whether to offer, force, or skip opening the management UI
    pub admin_console: AdminConsole,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rabbitmq_host: "localhost".to_string(),
            queue_name: TASK_QUEUE.to_string(),
            input_file: PathBuf::from("tasks.csv"),
            inter_row_delay_ms: 3000,
            admin_url: DEFAULT_ADMIN_URL.to_string(),
            admin_console: AdminConsole::Open,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            rabbitmq_host: env::var("RABBITMQ_HOST").unwrap_or(defaults.rabbitmq_host),

            queue_name: env::var("TASK_QUEUE").unwrap_or(defaults.queue_name),

            input_file: env::var("TASKS_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_file),

            inter_row_delay_ms: parse_or("INTER_ROW_DELAY_MS", defaults.inter_row_delay_ms),

            admin_url: env::var("RABBITMQ_ADMIN_URL").unwrap_or(defaults.admin_url),

            admin_console: parse_or("ADMIN_CONSOLE", defaults.admin_console),
        }
    }

    /// Pause between consecutive sends.
    pub fn inter_row_delay(&self) -> Duration {
        Duration::from_millis(self.inter_row_delay_ms)
    }
}

/// Parse an environment variable, warning and using `default` when invalid.
fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.rabbitmq_host, "localhost");
        assert_eq!(config.queue_name, "task_queue3");
        assert_eq!(config.input_file, PathBuf::from("tasks.csv"));
        assert_eq!(config.inter_row_delay(), Duration::from_secs(3));
        assert_eq!(config.admin_console, AdminConsole::Open);
    }

    #[test]
    fn test_parse_or_valid() {
        env::set_var("TEST_DELAY_MS", "250");
        assert_eq!(parse_or("TEST_DELAY_MS", 0u64), 250);
        env::remove_var("TEST_DELAY_MS");
    }

    #[test]
    fn test_parse_or_invalid_uses_default() {
        env::set_var("TEST_CONSOLE_MODE", "maybe");
        assert_eq!(
            parse_or("TEST_CONSOLE_MODE", AdminConsole::Off),
            AdminConsole::Off
        );
        env::remove_var("TEST_CONSOLE_MODE");
    }

    #[test]
    fn test_parse_or_missing_uses_default() {
        assert_eq!(parse_or("NONEXISTENT_VAR", 42u64), 42);
    }
}
