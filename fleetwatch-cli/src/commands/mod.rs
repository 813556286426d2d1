//! CLI command implementations.

pub mod eta;
pub mod init;
pub mod serve;
pub mod watch;
