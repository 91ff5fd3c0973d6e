//! Acceptor configuration, loaded from environment variables.

use std::time::Duration;

/// Runtime settings for the acceptor and its admin API.
#[derive(Debug, Clone)]
pub struct AcceptorConfig {
    /// Host the FIX listener binds (`FIX_LISTEN_HOST`).
    pub listen_host: String,
    /// Port the FIX listener binds (`FIX_LISTEN_PORT`).
    pub listen_port: u16,
    /// Port the admin HTTP API binds (`ADMIN_PORT`).
    pub admin_port: u16,
    /// Our comp id; clients must address it in tag 56 (`SERVER_COMP_ID`).
    pub server_comp_id: String,
    /// Heartbeat interval before a client proposes one
    /// (`DEFAULT_HEARTBEAT_S`).
    pub default_heartbeat: Duration,
    /// A session with no inbound byte for `multiplier × heartbeat` is torn
    /// down.
    pub idle_timeout_multiplier: f64,
    /// Cap on concurrent sessions; 0 means unbounded (`MAX_SESSIONS`).
    pub max_sessions: usize,
    /// How long existing sessions get to log out at shutdown.
    pub shutdown_grace: Duration,
}

impl Default for AcceptorConfig {
    fn default() -> Self {
        Self {
            listen_host: "0.0.0.0".to_string(),
            listen_port: 15001,
            admin_port: 15080,
            server_comp_id: "BROKER".to_string(),
            default_heartbeat: Duration::from_secs(30),
            idle_timeout_multiplier: 2.4,
            max_sessions: 0,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

impl AcceptorConfig {
    /// Load settings from the environment, falling back to defaults for
    /// anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_host: env_or("FIX_LISTEN_HOST", defaults.listen_host),
            listen_port: env_parse("FIX_LISTEN_PORT", defaults.listen_port),
            admin_port: env_parse("ADMIN_PORT", defaults.admin_port),
            server_comp_id: env_or("SERVER_COMP_ID", defaults.server_comp_id),
            default_heartbeat: Duration::from_secs(env_parse(
                "DEFAULT_HEARTBEAT_S",
                defaults.default_heartbeat.as_secs(),
            )),
            idle_timeout_multiplier: defaults.idle_timeout_multiplier,
            max_sessions: env_parse("MAX_SESSIONS", defaults.max_sessions),
            shutdown_grace: defaults.shutdown_grace,
        }
    }

    /// The FIX listener bind address.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }

    /// The admin API bind address.
    #[must_use]
    pub fn admin_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.admin_port)
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
