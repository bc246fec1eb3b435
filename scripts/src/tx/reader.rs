use alloy::{
    primitives::{Address, U256},
    providers::Provider,
};

use crate::{
    errors::ScriptError,
    tx::{abi::ILaunchToken, client::ScriptClient},
};

/// ERC20 metadata read back from a deployed token
#[derive(Clone, Debug)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub total_supply: U256,
}

/// ETH balance of `account`
pub async fn get_eth_balance(client: &ScriptClient, account: Address) -> Result<U256, ScriptError> {
    client
        .provider
        .get_balance(account)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

/// Current gas price of the network, in wei
pub async fn get_gas_price(client: &ScriptClient) -> Result<u128, ScriptError> {
    client
        .provider
        .get_gas_price()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

/// Read name, symbol and supply of the token at `token`
pub async fn get_token_info(
    client: &ScriptClient,
    token: Address,
) -> Result<TokenInfo, ScriptError> {
    let contract = ILaunchToken::new(token, &client.provider);

    let name = contract
        .name()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        ._0;
    let symbol = contract
        .symbol()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        ._0;
    let total_supply = get_total_supply(client, token).await?;

    Ok(TokenInfo {
        name,
        symbol,
        total_supply,
    })
}

pub async fn get_total_supply(client: &ScriptClient, token: Address) -> Result<U256, ScriptError> {
    let contract = ILaunchToken::new(token, &client.provider);
    let supply = contract
        .totalSupply()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(supply._0)
}

/// Token balance of `account`
pub async fn get_token_balance(
    client: &ScriptClient,
    token: Address,
    account: Address,
) -> Result<U256, ScriptError> {
    let contract = ILaunchToken::new(token, &client.provider);
    let balance = contract
        .balanceOf(account)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(balance._0)
}

pub async fn get_owner(client: &ScriptClient, token: Address) -> Result<Address, ScriptError> {
    let contract = ILaunchToken::new(token, &client.provider);
    let owner = contract
        .owner()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(owner._0)
}

/// Read the trading flag. The generated token keeps it private, so this
/// usually fails and callers treat the failure as "closed"
pub async fn get_trading_open(client: &ScriptClient, token: Address) -> Result<bool, ScriptError> {
    let contract = ILaunchToken::new(token, &client.provider);
    let open = contract
        .tradingOpen()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(open._0)
}
