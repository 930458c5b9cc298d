// Build-time identity from Cargo.toml; shown by --version and sent as the relay User-Agent

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `heatwatch/<version>`
pub fn user_agent() -> String {
    format!("{NAME}/{VERSION}")
}
