//! Client error types.

use thiserror::Error;

/// Errors surfaced by the [`crate::NinjaTrader`] facade.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No explicit root was given and none could be resolved from the
    /// environment.
    #[error("terminal root path is not set; pass one explicitly or set NINJATRADER_DIR")]
    MissingRootPath,

    /// Writing the command file failed.
    #[error("failed to write command file: {0}")]
    Io(#[from] std::io::Error),
}
