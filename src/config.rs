// src/config.rs
use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Postgres connection string. Without it the server keeps polls in memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub seed: bool,
}

impl Config {
    /// Reads settings from the environment, after loading a `.env` file if present.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        let seed_default = if database_url.is_some() { "false" } else { "true" };

        Self {
            port: try_load("PORT", "3030"),
            max_connections: try_load("DATABASE_MAX_CONNECTIONS", "5"),
            seed: try_load("POLLS_SEED", seed_default),
            database_url,
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
            .parse()
            .unwrap_or_else(|_| unreachable!("default for {key} must parse"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_load_falls_back_on_garbage() {
        env::set_var("POLLS_TEST_PORT", "not-a-port");
        let port: u16 = try_load("POLLS_TEST_PORT", "3030");
        assert_eq!(port, 3030);

        env::set_var("POLLS_TEST_PORT", "8080");
        let port: u16 = try_load("POLLS_TEST_PORT", "3030");
        assert_eq!(port, 8080);
    }

    #[test]
    fn try_load_uses_default_when_unset() {
        let seed: bool = try_load("POLLS_TEST_UNSET_FLAG", "true");
        assert!(seed);
    }
}
