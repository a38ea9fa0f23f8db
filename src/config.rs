use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub resend_api_key: String,
    pub resend_api_url: String,
    pub provider_timeout_seconds: u64,
    pub wkhtmltopdf_path: String,
    pub queue_capacity: usize,
    pub max_concurrent_jobs: usize,
    pub shutdown_grace_seconds: u64,
    pub intake_api_token: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            resend_api_key: env::var("RESEND_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .ok_or(ConfigError::MissingResendApiKey)?,
            resend_api_url: env::var("RESEND_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            provider_timeout_seconds: env::var("PROVIDER_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            wkhtmltopdf_path: env::var("WKHTMLTOPDF_PATH")
                .unwrap_or_else(|_| "wkhtmltopdf".to_string()),
            queue_capacity: env::var("QUEUE_CAPACITY")
                .unwrap_or_else(|_| "100".to_string())
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidQueueCapacity)?,
            max_concurrent_jobs: env::var("MAX_CONCURRENT_JOBS")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<usize>()
                .unwrap_or(4)
                .max(1),
            shutdown_grace_seconds: env::var("SHUTDOWN_GRACE_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            intake_api_token: env::var("INTAKE_API_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("RESEND_API_KEY environment variable is required")]
    MissingResendApiKey,
    #[error("QUEUE_CAPACITY must be a positive integer")]
    InvalidQueueCapacity,
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        server_host: "localhost".to_string(),
        server_port: 8080,
        resend_api_key: "re_test_key".to_string(),
        resend_api_url: "http://127.0.0.1:9".to_string(),
        provider_timeout_seconds: 5,
        wkhtmltopdf_path: "wkhtmltopdf".to_string(),
        queue_capacity: 8,
        max_concurrent_jobs: 2,
        shutdown_grace_seconds: 1,
        intake_api_token: None,
        log_format: LogFormat::Pretty,
    }
}
