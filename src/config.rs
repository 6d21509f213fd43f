use std::time::Duration;

use crate::{
    error::{config::ConfigError, AppError},
    service::dispatch::DispatchConfig,
};

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    pub dispatch: DispatchConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = DispatchConfig::default();

        Ok(Self {
            database_url: require_env("DATABASE_URL")?,
            discord_bot_token: require_env("DISCORD_BOT_TOKEN")?,
            dispatch: DispatchConfig {
                tick_interval: secs_env("HERALD_TICK_INTERVAL_SECS", defaults.tick_interval)?,
                batch_size: parsed_env("HERALD_BATCH_SIZE", defaults.batch_size)?,
                max_attempts: parsed_env("HERALD_MAX_ATTEMPTS", defaults.max_attempts)?,
                base_delay: secs_env("HERALD_BASE_DELAY_SECS", defaults.base_delay)?,
                max_delay: secs_env("HERALD_MAX_DELAY_SECS", defaults.max_delay)?,
                concurrency: parsed_env("HERALD_CONCURRENCY", defaults.concurrency)?,
                shutdown_grace: secs_env("HERALD_SHUTDOWN_GRACE_SECS", defaults.shutdown_grace)?,
            },
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn parsed_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

fn secs_env(name: &str, default: Duration) -> Result<Duration, ConfigError> {
    Ok(Duration::from_secs(parsed_env(name, default.as_secs())?))
}
