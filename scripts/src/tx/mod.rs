//! Transaction plumbing: client construction, ABI bindings, reads and writes

pub mod abi;
pub mod client;
pub mod reader;
pub mod sender;
