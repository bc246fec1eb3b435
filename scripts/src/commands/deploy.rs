use alloy::primitives::{utils::parse_ether, U256};
use chrono::{SecondsFormat, Utc};
use inquire::{validator::ValueRequiredValidator, Confirm, Text};
use tracing::info;

use crate::{
    build::SolcBuilder,
    cli::DeployArgs,
    config::NetworkConfig,
    console::{self, Banner},
    constants::{LOW_BALANCE_WARNING, TOKEN_DECIMALS},
    deploy::{deploy_contract, Deployment},
    errors::ScriptError,
    explorer::{fetch_eth_price, PriceQuote},
    output_writer::{DeploymentRecord, GasUsage, OutputLayout},
    template::{render_contract, TokenParams},
    tx::{
        client::{create_rpc_provider, ScriptClient},
        reader::{get_eth_balance, get_token_balance, get_token_info},
    },
    utils::{display_ether, display_units},
};

/// Generate, compile and deploy a new token, then save its deployment record
pub async fn deploy_token(
    args: DeployArgs,
    config: &NetworkConfig,
    layout: &OutputLayout,
) -> Result<(), ScriptError> {
    console::banner(Banner::Deployer);

    let (priv_key, rpc_url) = match config.signing_credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            console::error("Missing required environment variables:");
            for var in config.missing_signing_vars() {
                console::detail_err(&format!("• {var}"));
            }
            console::detail_err("• NETWORK (mainnet/testnet)");
            return Err(e);
        }
    };

    console::sub_header("NETWORK CONFIGURATION");
    console::info(&format!("Network: {}", config.network_name()));

    let client = create_rpc_provider(rpc_url, priv_key).await?;
    console::info(&format!("Deployer: {}", client.address));
    if let Some(mismatch) = config.chain_mismatch(client.chain_id) {
        console::warning(&mismatch);
    }

    let balance = get_eth_balance(&client, client.address).await?;
    console::info(&format!("Balance: {} ETH", display_ether(balance)));
    if balance < parse_ether(LOW_BALANCE_WARNING).unwrap_or(U256::ZERO) {
        console::warning("Low balance detected! Make sure you have enough ETH for deployment.");
    }

    // Collect token information
    console::sub_header("TOKEN INFORMATION");
    let params = collect_params(&args)?;

    print_summary(&params, config);
    println!();
    console::warning("WARNING: This action will deploy a smart contract and cannot be undone!");
    if !args.yes && !confirm_deploy()? {
        console::warning("Deployment cancelled by user");
        return Ok(());
    }

    // Create contract file
    let source = render_contract(&params)?;
    let source_path = layout.write_source(&params.symbol, &source)?;
    console::success(&format!("Contract saved: {}", source_path.display()));

    // Compile contract
    console::sub_header("COMPILING CONTRACT");
    let compiled = match SolcBuilder::new(&args.solc).compile(&source, &params.symbol) {
        Ok(compiled) => compiled,
        Err(e) => {
            console::error("Compilation errors detected:");
            console::detail_err(&format!("• {e}"));
            return Err(e);
        }
    };
    console::success("Contract compiled successfully!");
    console::info(&format!("Bytecode size: {} bytes", compiled.bytecode.len()));

    // Deploy contract
    console::sub_header("DEPLOYMENT PROCESS");
    console::info("Sending deployment transaction...");
    let gas_price = u128::from(args.gas_price_gwei) * 1_000_000_000;
    let bytecode = compiled.bytecode.clone();
    let deployment = deploy_contract(&client, bytecode, args.gas_limit, gas_price).await?;
    info!("Token deployed at {}", deployment.address);

    let quote = fetch_eth_price(config.api_key.as_deref()).await;
    print_deployment(&deployment, &quote, config);

    read_back(&client, &deployment).await;

    let record = build_record(
        &params,
        &deployment,
        &quote,
        &client,
        config,
        compiled.bytecode.to_string(),
        compiled.abi,
    );
    layout.save_deployment(&record, &source)?;
    console::success(&format!(
        "Deployment data saved: {}",
        layout.root_record_path().display()
    ));
    console::success(&format!(
        "Archived under: {}",
        layout.token_dir(&params.symbol).display()
    ));

    console::sub_header("📋 NEXT STEPS");
    for step in [
        "1. ✓ Verify Token on network",
        "2. 💰 Send ETH to contract for liquidity",
        "3. 🟢 Call openTrading() function",
        "4. 🔥 Burn LP tokens",
        "5. 🚫 Remove trading limits",
        "6. 🔐 Renounce ownership",
    ] {
        console::detail_link(step);
    }
    console::closing("🎊 Thank you for using Token Deployer! 🎊");

    Ok(())
}

/// Token parameters from flags, prompting for whatever is missing
fn collect_params(args: &DeployArgs) -> Result<TokenParams, ScriptError> {
    let interactive = !args.non_interactive;

    let name = ask("🏷️  Token Name:", args.name.clone(), true, interactive)?;
    let symbol = ask("🔤 Token Symbol:", args.symbol.clone(), true, interactive)?;
    let website = ask(
        "🌐 Website (optional):",
        args.website.clone(),
        false,
        interactive,
    )?;
    let telegram = ask(
        "📱 Telegram (optional):",
        args.telegram.clone(),
        false,
        interactive,
    )?;
    let twitter = ask(
        "🐦 Twitter (optional):",
        args.twitter.clone(),
        false,
        interactive,
    )?;

    TokenParams::new(
        &name,
        &symbol,
        Some(&website),
        Some(&telegram),
        Some(&twitter),
    )
}

fn ask(
    question: &str,
    preset: Option<String>,
    required: bool,
    interactive: bool,
) -> Result<String, ScriptError> {
    if let Some(value) = preset {
        return Ok(value);
    }
    if !interactive {
        return if required {
            Err(ScriptError::Configuration(format!(
                "`{}` is required in non-interactive mode",
                question.trim_end_matches(':')
            )))
        } else {
            Ok(String::new())
        };
    }

    let mut prompt = Text::new(question);
    if required {
        prompt = prompt.with_validator(ValueRequiredValidator::default());
    }
    prompt
        .prompt()
        .map(|answer| answer.trim().to_string())
        .map_err(|e| ScriptError::Prompt(e.to_string()))
}

fn confirm_deploy() -> Result<bool, ScriptError> {
    Confirm::new("🚀 Deploy contract?")
        .with_default(false)
        .prompt()
        .map_err(|e| ScriptError::Prompt(e.to_string()))
}

fn print_summary(params: &TokenParams, config: &NetworkConfig) {
    let or_missing = |v: &Option<String>| v.clone().unwrap_or_else(|| "Not provided".into());

    console::sub_header("DEPLOYMENT SUMMARY");
    console::detail(&format!("Name:      {}", params.name));
    console::detail(&format!("Symbol:    {}", params.symbol));
    console::detail(&format!("Website:   {}", or_missing(&params.website)));
    console::detail(&format!("Telegram:  {}", or_missing(&params.telegram)));
    console::detail(&format!("Twitter:   {}", or_missing(&params.twitter)));
    console::detail(&format!("Network:   {}", config.network_name()));
}

fn print_deployment(deployment: &Deployment, quote: &PriceQuote, config: &NetworkConfig) {
    let explorer = config.explorer_url();
    let gas = &deployment.gas;

    console::header("🎉 DEPLOYMENT SUCCESSFUL!");
    let address = deployment.address;
    let tx_hash = deployment.tx_hash;
    console::detail_ok(&format!("Contract Address: {address}"));
    console::detail_link(&format!("Explorer: {explorer}/address/{address}"));
    console::detail_link(&format!("Transaction: {explorer}/tx/{tx_hash}"));

    console::sub_header("⛽ GAS USAGE DETAILS");
    console::detail(&format!("💨 Gas Used: {} units", gas.gas_used_formatted()));
    console::detail(&format!("💰 Gas Price: {}", gas.gas_price_formatted()));
    console::detail(&format!("💳 Gas Fee: {}", gas.gas_fee_formatted()));
    console::detail(&format!("📊 Total Cost: {}", gas.total_cost_formatted()));
    console::detail(&format!(
        "💵 USD Cost: ~${:.2} (at ${:.2}/ETH)",
        gas.usd_cost(quote.price),
        quote.price
    ));
    console::detail_dim(&format!("📈 Price Source: {}", quote.source));
    if let (Some(updated), Some(eth_btc)) = (quote.updated_at(), quote.eth_btc.as_deref()) {
        console::detail_dim(&format!("🕐 Last Updated: {updated}"));
        console::detail_dim(&format!("₿ ETH/BTC: {eth_btc}"));
    }
}

/// Read the token back from the chain. Failures are reported, not raised.
async fn read_back(client: &ScriptClient, deployment: &Deployment) {
    console::sub_header("VERIFICATION");

    let result = async {
        let info = get_token_info(client, deployment.address).await?;
        let balance = get_token_balance(client, deployment.address, client.address).await?;
        Ok::<_, ScriptError>((info, balance))
    }
    .await;

    match result {
        Ok((info, balance)) => {
            console::detail_ok(&format!("✅ Name: {}", info.name));
            console::detail_ok(&format!("✅ Symbol: {}", info.symbol));
            console::detail_ok(&format!(
                "✅ Total Supply: {}",
                display_units(info.total_supply, TOKEN_DECIMALS)
            ));
            console::detail_ok(&format!(
                "✅ Owner Balance: {}",
                display_units(balance, TOKEN_DECIMALS)
            ));
        }
        Err(e) => console::error(&format!("Verification failed: {e}")),
    }
}

fn build_record(
    params: &TokenParams,
    deployment: &Deployment,
    quote: &PriceQuote,
    client: &ScriptClient,
    config: &NetworkConfig,
    bytecode: String,
    abi: serde_json::Value,
) -> DeploymentRecord {
    let gas = &deployment.gas;
    let usd_cost = gas.usd_cost(quote.price);

    DeploymentRecord {
        name: params.name.clone(),
        symbol: params.symbol.clone(),
        website: params.website.clone().unwrap_or_default(),
        telegram: params.telegram.clone().unwrap_or_default(),
        twitter: params.twitter.clone().unwrap_or_default(),
        address: deployment.address.to_string(),
        tx_hash: deployment.tx_hash.to_string(),
        deployer: client.address.to_string(),
        network: config.network_name().to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        gas_usage: GasUsage {
            gas_used: gas.gas_used.to_string(),
            gas_price: gas.gas_price.to_string(),
            gas_fee: gas.gas_fee.to_string(),
            total_cost: gas.total_cost.to_string(),
            gas_used_formatted: gas.gas_used_formatted(),
            gas_price_formatted: gas.gas_price_formatted(),
            gas_fee_formatted: gas.gas_fee_formatted(),
            total_cost_formatted: gas.total_cost_formatted(),
            eth_price: quote.price,
            eth_price_source: quote.source.clone(),
            eth_price_timestamp: quote.timestamp.clone(),
            eth_btc_ratio: quote.eth_btc.clone().unwrap_or_else(|| "N/A".into()),
            usd_cost,
            usd_cost_formatted: format!("${usd_cost:.2}"),
        },
        bytecode,
        abi,
    }
}
