use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_max_lifetime: Duration,
}

impl Config {
    /// Load environment variables and set defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        Ok(Self {
            database_url,
            listen_addr: env_or("LISTEN_ADDR", "127.0.0.1:3000").parse()?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", "25").parse()?,
            db_min_connections: env_or("DB_MIN_CONNECTIONS", "5").parse()?,
            db_max_lifetime: Duration::from_secs(
                env_or("DB_CONN_MAX_LIFETIME_SECS", "300").parse()?,
            ),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
