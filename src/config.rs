//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The storage backend is selected by
//! the presence of `DATABASE_URL`.

use std::net::SocketAddr;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string. When absent or empty the gateway
    /// runs on the in-memory storage backend.
    pub database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Admin session time-to-live in hours.
    pub session_ttl_hours: u64,

    /// Capacity of each broadcast channel inside the change broadcaster.
    pub broadcast_capacity: usize,

    /// Whether to insert default emotions, verses, and the default admin
    /// into an empty store at startup.
    pub seed_on_startup: bool,

    /// Username of the seeded default admin.
    pub seed_admin_username: String,

    /// Email of the seeded default admin.
    pub seed_admin_email: String,

    /// Plaintext password of the seeded default admin (hashed before
    /// storage; change it in any real deployment).
    pub seed_admin_password: String,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty());

        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10);
        let database_connect_timeout_secs = parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5);

        let session_ttl_hours = parse_env("SESSION_TTL_HOURS", 24);
        let broadcast_capacity = parse_env("BROADCAST_CAPACITY", 1_024);

        let seed_on_startup = parse_env_bool("SEED_ON_STARTUP", true);
        let seed_admin_username =
            std::env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let seed_admin_email = std::env::var("SEED_ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@example.com".to_string());
        let seed_admin_password =
            std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            database_connect_timeout_secs,
            session_ttl_hours,
            broadcast_capacity,
            seed_on_startup,
            seed_admin_username,
            seed_admin_email,
            seed_admin_password,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}
