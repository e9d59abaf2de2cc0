//! Command-line configuration.
//!
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::remote::DEFAULT_BASE_URL;

#[derive(Debug, Parser)]
#[command(name = "user-manager-tui", version, about = "Manage user records held by a remote REST service")]
pub struct Cli {
    /// Base URL of the user service; `/users` is appended.
    #[arg(long, env = "USER_MANAGER_BASE_URL", default_value = DEFAULT_BASE_URL, value_parser = parse_base_url)]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout_secs: u64,

    /// Theme file (created with defaults when missing).
    #[arg(long, default_value = "theme.conf")]
    pub theme: String,

    /// Keybindings file (created with defaults when missing).
    #[arg(long, default_value = "keybinds.conf")]
    pub keybinds: String,

    /// Log destination. The terminal is owned by the UI, so logs go to a file.
    #[arg(long, default_value = "user-manager.log")]
    pub log_file: PathBuf,

    /// Log filter directive, e.g. `debug` or `user_manager_tui=trace`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Accept absolute http(s) URLs only, without the trailing slash.
pub fn parse_base_url(s: &str) -> Result<String, String> {
    let url = reqwest::Url::parse(s).map_err(|e| format!("invalid URL '{s}': {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(s.trim_end_matches('/').to_string()),
        other => Err(format!("unsupported scheme '{other}', expected http or https")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["user-manager-tui"]).expect("parse");
        assert_eq!(cli.timeout(), Duration::from_secs(10));
        assert_eq!(cli.theme, "theme.conf");
        assert_eq!(cli.keybinds, "keybinds.conf");
    }

    #[test]
    fn explicit_base_url_is_trimmed() {
        let cli = Cli::try_parse_from(["user-manager-tui", "--base-url", "http://127.0.0.1:3000/"]).expect("parse");
        assert_eq!(cli.base_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("example.com").is_err());
        assert!(Cli::try_parse_from(["user-manager-tui", "--timeout-secs", "0"]).is_err());
    }
}
