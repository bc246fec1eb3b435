//! Scripts for generating, deploying, launching & verifying launch tokens.

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod constants;
pub mod errors;
pub mod explorer;
pub mod template;
pub mod utils;

/// Our build utils
pub mod build;

/// Our deploy utils
pub mod deploy;

// Our output utils
pub mod output_writer;

pub mod tx;
