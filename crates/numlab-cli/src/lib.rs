//! `numlab` command-line front end.

pub mod args;
pub mod commands;
pub mod logger;
pub mod output;

pub use args::Cli;
pub use commands::run;
