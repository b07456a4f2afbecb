//! Command handlers, one module per subcommand.

pub mod clean;
pub mod compile;
pub mod config;
pub mod init;
pub mod run;
pub mod status;
pub mod transform;
