// Package identity baked in at build time.

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// "benchdash 0.1.0"; logged at startup and served at GET /.
pub fn banner() -> String {
    format!("{} {}", NAME, VERSION)
}
