//! Command-line front end for the Monte Carlo portfolio simulator
//!
//! Wires configuration (YAML run file plus CLI flags), logging, the command
//! pipelines in [`commands`], text/JSON reports and CSV chart exports around
//! `mcport_core`.

pub mod cli;
pub mod commands;
pub mod export;
pub mod logging;
pub mod report;
pub mod settings;
pub mod util;

pub use cli::{Cli, Command};
pub use logging::init_logging;
pub use settings::RunSettings;
