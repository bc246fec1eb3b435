//! Network configuration, resolved from the environment (and `.env`)

use std::env;

use clap::ValueEnum;

use crate::errors::ScriptError;

/// Selects the network
pub const NETWORK_VAR: &str = "NETWORK";
/// Deployer private key
pub const PRIVATE_KEY_VAR: &str = "MAIN_PRIVATE_KEY";
/// Mainnet JSON-RPC endpoint
pub const MAINNET_RPC_VAR: &str = "MAINNET_RPC_URL";
/// Testnet JSON-RPC endpoint
pub const TESTNET_RPC_VAR: &str = "TESTNET_RPC_URL";
/// Explorer API key
pub const API_KEY_VAR: &str = "ETHERSCAN_API_KEY";
/// ETH amount sent to the token before opening trading
pub const LIQUIDITY_VAR: &str = "LIQUIDITY_AMOUNT";

/// The networks the scripts know how to target
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Network {
    /// Ethereum mainnet
    Mainnet,
    /// Sepolia testnet
    Testnet,
}

impl Network {
    /// Anything other than `mainnet` (case-insensitive) means testnet
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("mainnet") => Network::Mainnet,
            _ => Network::Testnet,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Mainnet => "Ethereum Mainnet",
            Network::Testnet => "Sepolia Testnet",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Testnet => 11_155_111,
        }
    }

    pub fn explorer_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://etherscan.io",
            Network::Testnet => "https://sepolia.etherscan.io",
        }
    }

    /// Endpoint used for verification requests
    pub fn explorer_api_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.etherscan.io/api",
            Network::Testnet => "https://api-sepolia.etherscan.io/api",
        }
    }

    fn rpc_var(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_RPC_VAR,
            Network::Testnet => TESTNET_RPC_VAR,
        }
    }
}

/// Everything the scripts need to know about the target network
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    pub network: Network,
    pub rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub api_key: Option<String>,
    pub liquidity_amount: String,
}

impl NetworkConfig {
    /// Resolve the configuration from the process environment
    pub fn from_env(network: Option<Network>, rpc_url: Option<String>) -> Self {
        Self::resolve(|key| env::var(key).ok(), network, rpc_url)
    }

    /// Resolve the configuration through `lookup`, with optional overrides
    /// for the network and the rpc url. Empty values count as unset.
    pub fn resolve<F>(lookup: F, network: Option<Network>, rpc_url: Option<String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let network =
            network.unwrap_or_else(|| Network::from_env_value(get(NETWORK_VAR).as_deref()));

        NetworkConfig {
            network,
            rpc_url: rpc_url.or_else(|| get(network.rpc_var())),
            private_key: get(PRIVATE_KEY_VAR),
            api_key: get(API_KEY_VAR),
            liquidity_amount: get(LIQUIDITY_VAR)
                .unwrap_or_else(|| crate::constants::DEFAULT_LIQUIDITY_AMOUNT.to_string()),
        }
    }

    pub fn network_name(&self) -> &'static str {
        self.network.display_name()
    }

    pub fn explorer_url(&self) -> &'static str {
        self.network.explorer_url()
    }

    pub fn explorer_api_url(&self) -> &'static str {
        self.network.explorer_api_url()
    }

    /// Names of the variables required to sign transactions that are missing
    pub fn missing_signing_vars(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.private_key.is_none() {
            missing.push(PRIVATE_KEY_VAR);
        }
        if self.rpc_url.is_none() {
            missing.push(self.network.rpc_var());
        }
        missing
    }

    /// The private key and rpc url, or a configuration error naming what is missing
    pub fn signing_credentials(&self) -> Result<(&str, &str), ScriptError> {
        match (self.private_key.as_deref(), self.rpc_url.as_deref()) {
            (Some(key), Some(url)) => Ok((key, url)),
            _ => Err(ScriptError::Configuration(format!(
                "missing environment variables: {}",
                self.missing_signing_vars().join(", ")
            ))),
        }
    }

    /// Warning text when the rpc endpoint serves another chain than the
    /// configured network
    pub fn chain_mismatch(&self, rpc_chain_id: u64) -> Option<String> {
        let expected = self.network.chain_id();
        (rpc_chain_id != expected).then(|| {
            format!(
                "RPC endpoint serves chain {rpc_chain_id}, {} is chain {expected}",
                self.network_name()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_network_means_testnet() {
        let config = NetworkConfig::resolve(lookup(&[]), None, None);
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.network_name(), "Sepolia Testnet");
        assert_eq!(config.network.chain_id(), 11_155_111);
        assert_eq!(config.explorer_url(), "https://sepolia.etherscan.io");
    }

    #[test]
    fn mainnet_is_case_insensitive() {
        let vars = [("NETWORK", "MainNet"), ("MAINNET_RPC_URL", "http://main")];
        let config = NetworkConfig::resolve(lookup(&vars), None, None);
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.rpc_url.as_deref(), Some("http://main"));
        assert_eq!(config.explorer_api_url(), "https://api.etherscan.io/api");
    }

    #[test]
    fn unknown_network_value_falls_back_to_testnet() {
        let vars = [
            ("NETWORK", "goerli"),
            ("MAINNET_RPC_URL", "http://main"),
            ("TESTNET_RPC_URL", "http://test"),
        ];
        let config = NetworkConfig::resolve(lookup(&vars), None, None);
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.rpc_url.as_deref(), Some("http://test"));
    }

    #[test]
    fn overrides_win_over_environment() {
        let vars = [("NETWORK", "testnet"), ("TESTNET_RPC_URL", "http://test")];
        let config = NetworkConfig::resolve(
            lookup(&vars),
            Some(Network::Mainnet),
            Some("http://override".into()),
        );
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.rpc_url.as_deref(), Some("http://override"));
    }

    #[test]
    fn liquidity_defaults_when_unset_or_blank() {
        let config = NetworkConfig::resolve(lookup(&[("LIQUIDITY_AMOUNT", " ")]), None, None);
        assert_eq!(config.liquidity_amount, "0.01");

        let config = NetworkConfig::resolve(lookup(&[("LIQUIDITY_AMOUNT", "0.5")]), None, None);
        assert_eq!(config.liquidity_amount, "0.5");
    }

    #[test]
    fn missing_credentials_are_named() {
        let config = NetworkConfig::resolve(lookup(&[("NETWORK", "mainnet")]), None, None);
        assert_eq!(
            config.missing_signing_vars(),
            vec!["MAIN_PRIVATE_KEY", "MAINNET_RPC_URL"]
        );
        let err = config.signing_credentials().unwrap_err();
        assert!(err.to_string().contains("MAINNET_RPC_URL"));
    }

    #[test]
    fn complete_credentials_resolve() {
        let vars = [("MAIN_PRIVATE_KEY", "0x01"), ("TESTNET_RPC_URL", "http://test")];
        let config = NetworkConfig::resolve(lookup(&vars), None, None);
        assert_eq!(
            config.signing_credentials().unwrap(),
            ("0x01", "http://test")
        );
    }

    #[test]
    fn chain_mismatch_names_both_chains() {
        let config = NetworkConfig::resolve(lookup(&[]), None, None);
        assert_eq!(config.chain_mismatch(11_155_111), None);
        assert_eq!(
            config.chain_mismatch(1).as_deref(),
            Some("RPC endpoint serves chain 1, Sepolia Testnet is chain 11155111")
        );
    }
}
