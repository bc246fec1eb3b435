//! Definitions of errors that can occur during the execution of the token scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the token scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error when reading or writing a deployment record
    JsonOutputError(String),
    /// Error when creating the client
    ClientInitialization(String),
    /// Missing or invalid configuration
    Configuration(String),
    /// Error when fetching the nonce to deploy a contract
    NonceFetching(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error compiling a contract
    ContractCompilation(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// A transaction was mined but its receipt reports a failure
    TransactionReverted(String),
    /// Error rendering the token template
    Template(String),
    /// Error talking to the block explorer API
    Explorer(String),
    /// Error reading an interactive answer
    Prompt(String),
    /// Filesystem error
    Io(String),
}

impl ScriptError {
    /// Whether this error is an on-chain revert, as opposed to a transport
    /// or local failure
    pub fn is_revert(&self) -> bool {
        match self {
            ScriptError::TransactionReverted(_) => true,
            ScriptError::ContractInteraction(msg) => msg.to_lowercase().contains("revert"),
            _ => false,
        }
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::JsonOutputError(s) => write!(f, "error with deployment record: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error during client init: {}", s),
            ScriptError::Configuration(s) => write!(f, "invalid configuration: {}", s),
            ScriptError::NonceFetching(s) => {
                write!(f, "error during nonce fetching for client signing: {}", s)
            }
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractCompilation(s) => write!(f, "error compiling contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::TransactionReverted(s) => write!(f, "transaction reverted: {}", s),
            ScriptError::Template(s) => write!(f, "error rendering contract template: {}", s),
            ScriptError::Explorer(s) => write!(f, "error calling explorer api: {}", s),
            ScriptError::Prompt(s) => write!(f, "error reading input: {}", s),
            ScriptError::Io(s) => write!(f, "io error: {}", s),
        }
    }
}

impl Error for ScriptError {}

impl From<std::io::Error> for ScriptError {
    fn from(e: std::io::Error) -> Self {
        ScriptError::Io(e.to_string())
    }
}
