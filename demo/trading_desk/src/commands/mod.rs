//! Command implementations
//!
//! Each submodule implements one `trading-desk` subcommand.

pub mod generate;
pub mod run;
