//! Default path resolution for configuration files
//!
//! Uses XDG Base Directory specification when available, with sensible fallbacks.

use std::path::PathBuf;

/// Returns the default path for the CLI configuration file.
///
/// Uses XDG config directory if available:
/// - Linux/macOS: `~/.config/metalview/cli.toml`
/// - Fallback: `/etc/metalview/cli.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("metalview")
        .join("cli.toml")
}
