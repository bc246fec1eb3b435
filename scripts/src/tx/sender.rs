use alloy::{
    network::TransactionBuilder,
    primitives::{Address, U256},
    providers::Provider,
    rpc::types::eth::{TransactionReceipt, TransactionRequest},
    sol_types::SolCall,
};
use tracing::info;

use crate::{console, errors::ScriptError, tx::client::ScriptClient};

/// Send `value` wei to `to`, optionally pinning a legacy gas price
pub async fn send_eth(
    client: &ScriptClient,
    to: Address,
    value: U256,
    gas_limit: u128,
    gas_price: Option<u128>,
    label: &str,
) -> Result<TransactionReceipt, ScriptError> {
    let mut tx_request = TransactionRequest::default()
        .to(to)
        .with_value(value)
        .with_gas_limit(gas_limit);
    if let Some(gas_price) = gas_price {
        tx_request = tx_request.with_gas_price(gas_price);
    }

    send_and_confirm(client, tx_request, label).await
}

/// Call `call` on `contract` with a fixed gas limit and wait for it to succeed
pub async fn send_call<C: SolCall>(
    client: &ScriptClient,
    contract: Address,
    call: &C,
    gas_limit: u128,
    label: &str,
) -> Result<TransactionReceipt, ScriptError> {
    let tx_request = call_request(contract, call).with_gas_limit(gas_limit);

    send_and_confirm(client, tx_request, label).await
}

/// Estimate the gas `call` would use when sent by the client signer
pub async fn estimate_call<C: SolCall>(
    client: &ScriptClient,
    contract: Address,
    call: &C,
) -> Result<u128, ScriptError> {
    let tx_request = call_request(contract, call).with_from(client.address);

    client
        .provider
        .estimate_gas(&tx_request)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

fn call_request<C: SolCall>(contract: Address, call: &C) -> TransactionRequest {
    TransactionRequest::default()
        .to(contract)
        .with_call(call)
        .with_value(U256::from(0))
}

/// Send a filled request, print its hash, and wait for a successful receipt
pub async fn send_and_confirm(
    client: &ScriptClient,
    tx_request: TransactionRequest,
    label: &str,
) -> Result<TransactionReceipt, ScriptError> {
    // Send it
    let pending_tx = client
        .provider
        .send_transaction(tx_request)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let tx_hash = *pending_tx.tx_hash();
    info!("Pending {} transaction... {}", label, tx_hash);
    console::detail(&format!("{label} TX: {tx_hash}"));

    // Wait for the transaction to be included.
    let receipt = pending_tx
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::TransactionReverted(format!(
            "{label} transaction {tx_hash} failed"
        )));
    }
    info!("{} tx done on block: {:?}", label, receipt.block_number);

    Ok(receipt)
}
