//! Server configuration loaded from the environment (and `.env`).

use crate::auth::AdminPolicy;
use crate::types::HexColor;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_BOARD_SIZE: usize = 64;
pub const MAX_BOARD_SIZE: usize = 256;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Board parameters fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub size: usize,
    pub default_color: HexColor,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            default_color: HexColor::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub board: BoardConfig,
    pub static_dir: PathBuf,
    pub admin: AdminPolicy,
}

impl ServerConfig {
    /// Load config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = match env_var("PIXELWALL_HOST") {
            Some(v) => v.parse().map_err(|e| invalid("PIXELWALL_HOST", &v, e))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let port = match env_var("PIXELWALL_PORT") {
            Some(v) => v.parse().map_err(|e| invalid("PIXELWALL_PORT", &v, e))?,
            None => DEFAULT_PORT,
        };

        let size = match env_var("BOARD_SIZE") {
            Some(v) => {
                let size: usize = v.parse().map_err(|e| invalid("BOARD_SIZE", &v, e))?;
                if !(1..=MAX_BOARD_SIZE).contains(&size) {
                    return Err(invalid(
                        "BOARD_SIZE",
                        &v,
                        format!("must be between 1 and {}", MAX_BOARD_SIZE),
                    ));
                }
                size
            }
            None => DEFAULT_BOARD_SIZE,
        };

        let default_color = match env_var("BOARD_DEFAULT_COLOR") {
            Some(v) => HexColor::parse(&v).map_err(|e| invalid("BOARD_DEFAULT_COLOR", &v, e))?,
            None => HexColor::default(),
        };

        let static_dir = env_var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static"));

        let admin = AdminPolicy::new(env_var("ADMIN_SECRET"));
        if admin.is_enforced() {
            tracing::info!("Administrator role requires ADMIN_SECRET");
        } else {
            tracing::warn!("ADMIN_SECRET not set - any client can join as administrator!");
        }

        Ok(Self {
            host,
            port,
            board: BoardConfig {
                size,
                default_color,
            },
            static_dir,
            admin,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
