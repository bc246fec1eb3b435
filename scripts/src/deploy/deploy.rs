use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash, U256},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
};
use tracing::{info, warn};

use crate::{
    errors::ScriptError,
    tx::{client::ScriptClient, reader::get_eth_balance, sender::send_and_confirm},
    utils::{display_ether, display_gwei, ether_as_f64, group_thousands},
};

/// Gas and cost figures of a mined deployment
#[derive(Clone, Debug, PartialEq)]
pub struct GasReport {
    pub gas_used: u128,
    /// Effective price paid, in wei
    pub gas_price: u128,
    /// `gas_used * gas_price`
    pub gas_fee: U256,
    /// Deployer balance delta over the deployment
    pub total_cost: U256,
}

impl GasReport {
    /// Build the report, falling back to `requested_price` when the receipt
    /// carries no effective price
    pub fn new(
        gas_used: u128,
        effective_gas_price: u128,
        requested_price: u128,
        balance_before: U256,
        balance_after: U256,
    ) -> Self {
        let gas_price = if effective_gas_price == 0 {
            requested_price
        } else {
            effective_gas_price
        };

        GasReport {
            gas_used,
            gas_price,
            gas_fee: U256::from(gas_used) * U256::from(gas_price),
            total_cost: balance_before.saturating_sub(balance_after),
        }
    }

    /// Total cost in USD at `eth_price`
    pub fn usd_cost(&self, eth_price: f64) -> f64 {
        ether_as_f64(self.total_cost) * eth_price
    }

    pub fn gas_used_formatted(&self) -> String {
        group_thousands(self.gas_used)
    }

    pub fn gas_price_formatted(&self) -> String {
        format!("{} gwei", display_gwei(U256::from(self.gas_price)))
    }

    pub fn gas_fee_formatted(&self) -> String {
        format!("{} ETH", display_ether(self.gas_fee))
    }

    pub fn total_cost_formatted(&self) -> String {
        format!("{} ETH", display_ether(self.total_cost))
    }
}

/// A mined contract deployment
#[derive(Clone, Debug)]
pub struct Deployment {
    pub address: Address,
    pub tx_hash: TxHash,
    pub gas: GasReport,
}

/// Send the contract-creation transaction for `bytecode` and wait for it
pub async fn deploy_contract(
    client: &ScriptClient,
    bytecode: Bytes,
    gas_limit: u128,
    gas_price: u128,
) -> Result<Deployment, ScriptError> {
    // Predict the contract address
    let predicted_address = predict_contract_address(client).await?;
    info!("Expected contract address: {}", predicted_address);

    let balance_before = get_eth_balance(client, client.address).await?;

    let tx_request = TransactionRequest::default()
        .with_deploy_code(bytecode)
        .with_gas_limit(gas_limit)
        .with_gas_price(gas_price);

    let receipt = send_and_confirm(client, tx_request, "Deployment")
        .await
        .map_err(|e| match e {
            ScriptError::TransactionReverted(msg) => ScriptError::ContractDeployment(msg),
            other => other,
        })?;

    let address = match receipt.contract_address {
        Some(address) => address,
        None => {
            warn!("Receipt has no contract address, using the predicted one");
            predicted_address
        }
    };

    let balance_after = get_eth_balance(client, client.address).await?;

    Ok(Deployment {
        address,
        tx_hash: receipt.transaction_hash,
        gas: GasReport::new(
            receipt.gas_used,
            receipt.effective_gas_price,
            gas_price,
            balance_before,
            balance_after,
        ),
    })
}

/// Predict the address of the next contract created by the signer
async fn predict_contract_address(client: &ScriptClient) -> Result<Address, ScriptError> {
    // Get the signer nonce
    let signer_nonce = client
        .provider
        .get_transaction_count(client.address)
        .await
        .map_err(|e| ScriptError::NonceFetching(e.to_string()))?;

    Ok(client.address.create(signer_nonce))
}
