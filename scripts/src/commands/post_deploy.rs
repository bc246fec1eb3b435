use std::future::Future;

use alloy::primitives::{utils::parse_ether, Address, U256};
use tracing::{info, warn};

use super::list::print_available_tokens;
use crate::{
    cli::PostDeployArgs,
    config::NetworkConfig,
    console,
    constants::{
        ADMIN_CALL_GAS_LIMIT, MIN_LIQUIDITY, OPEN_TRADING_GAS_LIMIT, SEND_ETH_GAS_LIMIT,
        TOKEN_DECIMALS,
    },
    errors::ScriptError,
    output_writer::{read_record, OutputLayout},
    tx::{
        abi::ILaunchToken,
        client::{create_rpc_provider, ScriptClient},
        reader::{
            get_eth_balance, get_gas_price, get_owner, get_token_balance, get_total_supply,
            get_trading_open,
        },
        sender::{estimate_call, send_call, send_eth},
    },
    utils::{display_ether, display_gwei, display_units},
};

/// The launch steps, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchStep {
    FundContract,
    TransferTokens,
    OpenTrading,
    RemoveLimits,
    RemoveTransferTax,
    RenounceOwnership,
}

/// What to do when a step fails
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the failure and run the next step
    Continue,
    /// Stop the sequence with the error
    Abort,
}

impl LaunchStep {
    pub fn sequence(skip_renounce: bool) -> Vec<LaunchStep> {
        let mut steps = vec![
            LaunchStep::FundContract,
            LaunchStep::TransferTokens,
            LaunchStep::OpenTrading,
            LaunchStep::RemoveLimits,
            LaunchStep::RemoveTransferTax,
        ];
        if !skip_renounce {
            steps.push(LaunchStep::RenounceOwnership);
        }
        steps
    }

    pub fn label(&self) -> &'static str {
        match self {
            LaunchStep::FundContract => "1",
            LaunchStep::TransferTokens => "1.5",
            LaunchStep::OpenTrading => "2",
            LaunchStep::RemoveLimits => "3",
            LaunchStep::RemoveTransferTax => "4",
            LaunchStep::RenounceOwnership => "5",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LaunchStep::FundContract => "Sending ETH to Contract",
            LaunchStep::TransferTokens => "Transferring Tokens to Contract",
            LaunchStep::OpenTrading => "Opening Trading",
            LaunchStep::RemoveLimits => "Removing Limits",
            LaunchStep::RemoveTransferTax => "Removing Transfer Tax",
            LaunchStep::RenounceOwnership => "Renouncing Ownership",
        }
    }

    /// Only a funding failure or an `openTrading()` revert lets the sequence go on
    pub fn on_failure(&self, err: &ScriptError) -> FailurePolicy {
        match self {
            LaunchStep::FundContract => FailurePolicy::Continue,
            LaunchStep::OpenTrading if err.is_revert() => FailurePolicy::Continue,
            _ => FailurePolicy::Abort,
        }
    }
}

/// ETH still needed for `balance` to reach `minimum`
pub fn liquidity_shortfall(balance: U256, minimum: U256) -> Option<U256> {
    (balance < minimum).then(|| minimum - balance)
}

/// A token being launched by the client signer
struct Launch<'a> {
    client: &'a ScriptClient,
    token: Address,
    liquidity: U256,
}

/// Run the launch sequence against the token archived under `contracts/<SYMBOL>/`
pub async fn post_deploy(
    args: PostDeployArgs,
    config: &NetworkConfig,
    layout: &OutputLayout,
) -> Result<(), ScriptError> {
    let (priv_key, rpc_url) = config.signing_credentials().inspect_err(|e| {
        console::error(&e.to_string());
    })?;

    let record_path = layout.token_record_path(&args.symbol);
    if !record_path.exists() {
        let path = record_path.display();
        console::error(&format!("Deployment file not found: {path}"));
        console::detail("Available tokens:");
        print_available_tokens(layout);
        return Err(ScriptError::JsonOutputError(format!("{path} not found")));
    }
    let record = read_record(&record_path)?;
    let token = record.address.parse::<Address>().map_err(|e| {
        ScriptError::JsonOutputError(format!("invalid address {}: {e}", record.address))
    })?;
    let liquidity = parse_ether(&config.liquidity_amount).map_err(|e| {
        ScriptError::Configuration(format!(
            "invalid LIQUIDITY_AMOUNT {}: {e}",
            config.liquidity_amount
        ))
    })?;

    console::detail(&format!("Token Symbol: {}", args.symbol));
    console::detail(&format!("Contract Address: {token}"));
    let amount = &config.liquidity_amount;
    console::detail(&format!("Liquidity Amount: {amount} ETH"));

    let client = create_rpc_provider(rpc_url, priv_key).await?;
    console::detail(&format!("Wallet Address: {}", client.address));
    if let Some(mismatch) = config.chain_mismatch(client.chain_id) {
        console::warning(&mismatch);
    }
    let balance = get_eth_balance(&client, client.address).await?;
    console::detail(&format!("Wallet Balance: {} ETH", display_ether(balance)));

    let launch = Launch {
        client: &client,
        token,
        liquidity,
    };

    let launch = &launch;
    let steps = LaunchStep::sequence(args.skip_renounce);
    run_sequence(&steps, move |step| run_step(step, launch)).await?;

    console::closing(closing_line(args.skip_renounce));
    if !args.skip_renounce {
        console::detail("Token is now fully launched and decentralized!");
    }

    Ok(())
}

/// Run `steps` in order through `run`, applying each step's failure policy.
/// Returns the steps whose failure was tolerated.
async fn run_sequence<F, Fut>(
    steps: &[LaunchStep],
    mut run: F,
) -> Result<Vec<LaunchStep>, ScriptError>
where
    F: FnMut(LaunchStep) -> Fut,
    Fut: Future<Output = Result<(), ScriptError>>,
{
    let mut tolerated = Vec::new();
    for &step in steps {
        console::step(step.label(), step.title());
        let err = match run(step).await {
            Ok(()) => continue,
            Err(err) => err,
        };

        match step.on_failure(&err) {
            FailurePolicy::Continue => {
                warn!("Step {} failed, continuing: {}", step.label(), err);
                report_tolerated(step, &err);
                tolerated.push(step);
            }
            FailurePolicy::Abort => {
                console::error(&format!("{} failed: {err}", step.title()));
                return Err(err);
            }
        }
    }
    Ok(tolerated)
}

fn closing_line(skip_renounce: bool) -> &'static str {
    if skip_renounce {
        "=== ALL STEPS COMPLETED (ownership kept) ==="
    } else {
        "=== ALL STEPS COMPLETED ==="
    }
}

async fn run_step(step: LaunchStep, launch: &Launch<'_>) -> Result<(), ScriptError> {
    let Launch { client, token, .. } = *launch;
    match step {
        LaunchStep::FundContract => fund_contract(launch).await,
        LaunchStep::TransferTokens => transfer_tokens(launch).await,
        LaunchStep::OpenTrading => open_trading(launch).await,
        LaunchStep::RemoveLimits => {
            let call = ILaunchToken::removeLimitCall {};
            send_call(client, token, &call, ADMIN_CALL_GAS_LIMIT, "Remove Limit").await?;
            console::detail("Limits removed successfully");
            Ok(())
        }
        LaunchStep::RemoveTransferTax => {
            let call = ILaunchToken::removeTransferTaxCall {};
            send_call(
                client,
                token,
                &call,
                ADMIN_CALL_GAS_LIMIT,
                "Remove Transfer Tax",
            )
            .await?;
            console::detail("Transfer tax removed successfully");
            Ok(())
        }
        LaunchStep::RenounceOwnership => {
            let call = ILaunchToken::renounceOwnershipCall {};
            send_call(
                client,
                token,
                &call,
                ADMIN_CALL_GAS_LIMIT,
                "Renounce Ownership",
            )
            .await?;
            console::detail("Ownership renounced successfully");
            Ok(())
        }
    }
}

fn report_tolerated(step: LaunchStep, err: &ScriptError) {
    match step {
        LaunchStep::FundContract => {
            console::error(&format!("Failed to send ETH to contract: {err}"));
            console::detail(
                "This might be normal - some contracts reject ETH before trading opens",
            );
            console::detail("The openTrading() function will handle liquidity provision");
        }
        LaunchStep::OpenTrading => {
            console::error(&format!("Failed to open trading: {err}"));
            console::detail("Transaction reverted. Possible reasons:");
            console::detail("1. Trading is already open");
            console::detail("2. Insufficient ETH for minimum liquidity");
            console::detail("3. Token balance issue");
            console::detail("4. Uniswap router/factory issue");
            console::detail("Attempting to continue with remaining steps...");
        }
        _ => console::error(&format!("{} failed: {err}", step.title())),
    }
}

/// Step 1: send the configured liquidity to the token, at the current gas price
async fn fund_contract(launch: &Launch<'_>) -> Result<(), ScriptError> {
    let gas_price = get_gas_price(launch.client).await?;
    console::detail(&format!(
        "Current gas price: {} gwei",
        display_gwei(U256::from(gas_price))
    ));

    send_eth(
        launch.client,
        launch.token,
        launch.liquidity,
        SEND_ETH_GAS_LIMIT,
        Some(gas_price),
        "Send ETH",
    )
    .await?;
    console::detail("ETH sent successfully");

    let contract_balance = get_eth_balance(launch.client, launch.token).await?;
    console::detail(&format!(
        "Contract Balance: {} ETH",
        display_ether(contract_balance)
    ));
    Ok(())
}

/// Step 1.5: move the whole wallet token balance to the token contract
async fn transfer_tokens(launch: &Launch<'_>) -> Result<(), ScriptError> {
    let Launch { client, token, .. } = *launch;

    let total_supply = get_total_supply(client, token).await?;
    console::detail(&format!(
        "Total Supply: {}",
        display_units(total_supply, TOKEN_DECIMALS)
    ));
    let wallet_balance = get_token_balance(client, token, client.address).await?;
    console::detail(&format!(
        "Wallet Token Balance: {}",
        display_units(wallet_balance, TOKEN_DECIMALS)
    ));

    if wallet_balance.is_zero() {
        console::detail("No tokens in wallet to transfer");
        return Ok(());
    }

    console::detail("Transferring all tokens to contract...");
    let call = ILaunchToken::transferCall {
        recipient: token,
        amount: wallet_balance,
    };
    send_call(client, token, &call, ADMIN_CALL_GAS_LIMIT, "Transfer").await?;
    console::detail("All tokens transferred to contract");

    let contract_tokens = get_token_balance(client, token, token).await?;
    console::detail(&format!(
        "Contract Token Balance: {}",
        display_units(contract_tokens, TOKEN_DECIMALS)
    ));
    Ok(())
}

/// Step 2: check ownership and state, top up liquidity, then `openTrading()`
async fn open_trading(launch: &Launch<'_>) -> Result<(), ScriptError> {
    let Launch { client, token, .. } = *launch;

    console::detail("Checking contract state...");
    let contract_balance = get_eth_balance(client, token).await?;
    console::detail(&format!(
        "Contract Balance: {} ETH",
        display_ether(contract_balance)
    ));

    let owner = get_owner(client, token).await?;
    console::detail(&format!("Contract owner: {owner}"));
    console::detail(&format!("Wallet address: {}", client.address));
    if owner != client.address {
        return Err(ScriptError::ContractInteraction(format!(
            "wallet {} is not the contract owner {owner}",
            client.address
        )));
    }

    let contract_tokens = get_token_balance(client, token, token).await?;
    console::detail(&format!(
        "Contract token balance: {}",
        display_units(contract_tokens, TOKEN_DECIMALS)
    ));
    let total_supply = get_total_supply(client, token).await?;
    console::detail(&format!(
        "Total supply: {}",
        display_units(total_supply, TOKEN_DECIMALS)
    ));

    let trading_open = match get_trading_open(client, token).await {
        Ok(open) => {
            console::detail(&format!(
                "Trading status: {}",
                if open { "OPEN" } else { "CLOSED" }
            ));
            open
        }
        Err(e) => {
            info!("tradingOpen() unreadable: {}", e);
            console::detail("Could not read trading status, assuming closed");
            false
        }
    };
    if trading_open {
        console::detail("Trading is already open, skipping openTrading()");
        return Ok(());
    }

    let min_liquidity =
        parse_ether(MIN_LIQUIDITY).map_err(|e| ScriptError::Configuration(e.to_string()))?;
    if let Some(shortfall) = liquidity_shortfall(contract_balance, min_liquidity) {
        console::detail(&format!(
            "Need at least {} ETH for liquidity",
            display_ether(min_liquidity)
        ));
        console::detail(&format!(
            "Sending additional {} ETH...",
            display_ether(shortfall)
        ));
        send_eth(
            client,
            token,
            shortfall,
            SEND_ETH_GAS_LIMIT,
            None,
            "Additional ETH",
        )
        .await?;
        console::detail("Additional ETH sent successfully");

        let new_balance = get_eth_balance(client, token).await?;
        console::detail(&format!(
            "New contract balance: {} ETH",
            display_ether(new_balance)
        ));
    }

    console::detail("Attempting to open trading...");
    let call = ILaunchToken::openTradingCall {};
    match estimate_call(client, token, &call).await {
        Ok(gas) => console::detail(&format!("Estimated gas: {gas}")),
        // Sent anyway, with a high gas limit
        Err(e) => console::detail(&format!("Gas estimation failed: {e}")),
    }

    console::detail("Waiting for confirmation...");
    send_call(client, token, &call, OPEN_TRADING_GAS_LIMIT, "Open Trading").await?;
    console::detail("Trading opened successfully");
    Ok(())
}
