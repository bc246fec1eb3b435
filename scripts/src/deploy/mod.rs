//! Contract deployment

mod deploy;

pub use deploy::{deploy_contract, Deployment, GasReport};
