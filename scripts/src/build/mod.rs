//! Compilation of the generated token sources

pub mod solc;

pub use solc::{CompiledContract, SolcBuilder};
