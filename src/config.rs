use std::env;
use std::net::SocketAddr;

const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 8080);
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub bind: SocketAddr,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind: SocketAddr::from(DEFAULT_BIND),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Unset or unparseable values keep their defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        cfg.database_url = var("DATABASE_URL").filter(|s| !s.is_empty());
        if let Some(bind) = var("FOYER_BIND") {
            if let Ok(parsed) = bind.trim().parse::<SocketAddr>() {
                cfg.bind = parsed;
            }
        }
        if let Some(max) = var("FOYER_DB_MAX_CONNECTIONS") {
            if let Ok(parsed) = max.trim().parse::<u32>() {
                if parsed > 0 { cfg.max_connections = parsed; }
            }
        }
        cfg
    }
}
