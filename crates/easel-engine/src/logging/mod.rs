//! Logger initialization.
//!
//! The engine itself only emits through the `log` facade; hosts that have no
//! logger of their own can call [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};
