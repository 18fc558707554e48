//! Terminal directory layout and status-file naming.
//!
//! The terminal exchanges data through two directories under a single root:
//! command files are dropped into `incoming/`, and the terminal maintains
//! status files under `outgoing/`. All path construction lives here so the
//! exact file-name protocol stays in one place.

use std::path::{Path, PathBuf};

/// Environment variable overriding the terminal root directory.
pub const ROOT_ENV_VAR: &str = "NINJATRADER_DIR";

/// Directory the terminal consumes command files from.
const INCOMING_DIR: &str = "incoming";

/// Directory the terminal writes status files to.
const OUTGOING_DIR: &str = "outgoing";

/// Resolved layout of the terminal's shared directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalPaths {
    root: PathBuf,
}

impl TerminalPaths {
    /// Create a layout rooted at an explicit directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the default root from the environment.
    ///
    /// `NINJATRADER_DIR` wins when set and non-empty; otherwise falls back to
    /// `<USERPROFILE>/Documents/NinjaTrader 8`, the terminal's own default
    /// installation layout. Returns `None` when neither is usable.
    pub fn from_env() -> Option<Self> {
        if let Ok(dir) = std::env::var(ROOT_ENV_VAR) {
            if !dir.is_empty() {
                return Some(Self::new(dir));
            }
        }

        let profile = std::env::var("USERPROFILE")
            .ok()
            .filter(|p| !p.is_empty())?;
        Some(Self::new(
            Path::new(&profile).join("Documents").join("NinjaTrader 8"),
        ))
    }

    /// The terminal root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory command files are written into.
    pub fn incoming(&self) -> PathBuf {
        self.root.join(INCOMING_DIR)
    }

    /// The directory status files are read from.
    pub fn outgoing(&self) -> PathBuf {
        self.root.join(OUTGOING_DIR)
    }

    /// Outbound command file: `incoming/oif.<nonce>.txt`.
    ///
    /// The terminal consumes any `oif.*.txt` it finds, so the nonce only has
    /// to keep concurrent writers from colliding.
    pub fn command_file(&self, nonce: &str) -> PathBuf {
        self.incoming().join(format!("oif.{nonce}.txt"))
    }

    /// Per-connection status file: `outgoing/<connection>.txt`.
    pub fn connection_status_file(&self, connection: &str) -> PathBuf {
        self.outgoing().join(format!("{connection}.txt"))
    }

    /// Per-order status file: `outgoing/<account>_<order_id>.txt`.
    pub fn order_status_file(&self, account: &str, order_id: &str) -> PathBuf {
        self.outgoing().join(format!("{account}_{order_id}.txt"))
    }

    /// Per-instrument/account position status file:
    /// `outgoing/<instrument> Default_<account>_position.txt`.
    pub fn position_status_file(&self, instrument: &str, account: &str) -> PathBuf {
        self.outgoing()
            .join(format!("{instrument} Default_{account}_position.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_layout() {
        let paths = TerminalPaths::new("/tmp/nt8");
        assert_eq!(paths.root(), Path::new("/tmp/nt8"));
        assert_eq!(paths.incoming(), Path::new("/tmp/nt8/incoming"));
        assert_eq!(paths.outgoing(), Path::new("/tmp/nt8/outgoing"));
    }

    #[test]
    fn test_command_file_name() {
        let paths = TerminalPaths::new("/tmp/nt8");
        assert_eq!(
            paths.command_file("123456"),
            Path::new("/tmp/nt8/incoming/oif.123456.txt")
        );
    }

    #[test]
    fn test_connection_status_file_name() {
        let paths = TerminalPaths::new("/tmp/nt8");
        assert_eq!(
            paths.connection_status_file("Sim"),
            Path::new("/tmp/nt8/outgoing/Sim.txt")
        );
    }

    #[test]
    fn test_order_status_file_name() {
        let paths = TerminalPaths::new("/tmp/nt8");
        assert_eq!(
            paths.order_status_file("Sim101", "abc123"),
            Path::new("/tmp/nt8/outgoing/Sim101_abc123.txt")
        );
    }

    #[test]
    fn test_position_status_file_name() {
        let paths = TerminalPaths::new("/tmp/nt8");
        assert_eq!(
            paths.position_status_file("ES 12-25", "Sim101"),
            Path::new("/tmp/nt8/outgoing/ES 12-25 Default_Sim101_position.txt")
        );
    }

    #[test]
    fn test_from_env_override() {
        // Env manipulation is process-wide, so keep every case in one test.
        std::env::set_var(ROOT_ENV_VAR, "/opt/terminal");
        let paths = TerminalPaths::from_env().unwrap();
        assert_eq!(paths.root(), Path::new("/opt/terminal"));

        std::env::remove_var(ROOT_ENV_VAR);
        std::env::set_var("USERPROFILE", "/home/trader");
        let paths = TerminalPaths::from_env().unwrap();
        assert_eq!(
            paths.root(),
            Path::new("/home/trader/Documents/NinjaTrader 8")
        );

        std::env::remove_var("USERPROFILE");
        assert!(TerminalPaths::from_env().is_none());
    }
}
