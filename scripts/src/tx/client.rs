use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::Address,
    providers::{
        fillers::{ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller},
        Identity, Provider, ProviderBuilder, ReqwestProvider,
    },
    signers::local::PrivateKeySigner,
};
use reqwest::{Client, Url};
use tracing::info;

use crate::errors::ScriptError;

/// Re-export from alloy recommend filter
type RecommendFiller =
    JoinFill<JoinFill<JoinFill<Identity, GasFiller>, NonceFiller>, ChainIdFiller>;

/// An alloy provider that uses a local private key to generate signatures
/// & interfaces with the RPC endpoint over HTTP
pub type RpcProvider = FillProvider<
    JoinFill<RecommendFiller, WalletFiller<EthereumWallet>>,
    ReqwestProvider,
    alloy::transports::http::Http<Client>,
    Ethereum,
>;

/// A signing provider along with the signer address and the chain it is connected to
pub struct ScriptClient {
    pub provider: RpcProvider,
    /// Address of the signer, sender of every transaction
    pub address: Address,
    pub chain_id: u64,
}

/// Parse a hex private key, with or without `0x` prefix
pub fn parse_signer(priv_key: &str) -> Result<PrivateKeySigner, ScriptError> {
    priv_key
        .trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| ScriptError::ClientInitialization(format!("invalid private key: {e}")))
}

/// Build our RPC client with signer, and fetch the chain id it serves
pub async fn create_rpc_provider(
    rpc_url: &str,
    priv_key: &str,
) -> Result<ScriptClient, ScriptError> {
    let signer = parse_signer(priv_key)?;
    let address = signer.address();
    let wallet = EthereumWallet::from(signer);

    let url = rpc_url
        .parse::<Url>()
        .map_err(|e| ScriptError::ClientInitialization(format!("invalid rpc url: {e}")))?;

    // Create our provider with the rpc client + signer
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_http(url);

    // Fetch chain id
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    info!("Build client on chain ID: {}", chain_id);

    Ok(ScriptClient {
        provider,
        address,
        chain_id,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_signer;

    // First default anvil account
    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn parses_keys_with_and_without_prefix() {
        let bare = parse_signer(KEY).unwrap();
        let prefixed = parse_signer(&format!("0x{KEY}")).unwrap();
        assert_eq!(bare.address(), prefixed.address());
        assert_eq!(
            bare.address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn rejects_garbage_keys() {
        assert!(parse_signer("not-a-key").is_err());
        assert!(parse_signer("0x1234").is_err());
    }
}
