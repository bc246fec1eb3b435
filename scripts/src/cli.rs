//! Definitions of CLI arguments and commands for the token scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::{
    commands::{deploy_token, list_tokens, post_deploy, verify_token},
    config::{Network, NetworkConfig},
    constants::{DEFAULT_SOLC, DEPLOY_GAS_LIMIT, DEPLOY_GAS_PRICE_GWEI},
    errors::ScriptError,
    output_writer::OutputLayout,
};

/// Scripts for generating, deploying, launching & verifying launch tokens
#[derive(Parser)]
#[command(name = "token-scripts", version)]
pub struct Cli {
    /// Target network, overrides `NETWORK`
    #[arg(short, long, value_enum, global = true)]
    pub network: Option<Network>,

    /// Network RPC URL, overrides `MAINNET_RPC_URL` / `TESTNET_RPC_URL`
    #[arg(short, long, global = true)]
    pub rpc_url: Option<String>,

    /// Directory holding `contracts/` and `deployment.json`
    #[arg(long, default_value = ".", global = true)]
    pub workdir: PathBuf,

    /// Logging format
    #[arg(short = 'l', long, value_enum, default_value = "text", global = true)]
    pub log_format: LoggingFormat,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LoggingFormat {
    Text,
    Json,
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Generate, compile and deploy a new token
    Deploy(DeployArgs),
    /// Fund the token, open trading, lift the limits and renounce ownership
    PostDeploy(PostDeployArgs),
    /// Verify a deployed token source on the block explorer
    Verify(VerifyArgs),
    /// List the token deployments found on disk
    List,
}

impl Command {
    /// Run the command
    pub async fn run(self, config: NetworkConfig, layout: OutputLayout) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                info!("Deploying token...");
                deploy_token(args, &config, &layout).await
            }
            Command::PostDeploy(args) => {
                info!("Running post-deploy sequence for {}...", args.symbol);
                post_deploy(args, &config, &layout).await
            }
            Command::Verify(args) => {
                info!("Verifying token...");
                verify_token(args, &config, &layout).await;
                Ok(())
            }
            Command::List => {
                list_tokens(&layout);
                Ok(())
            }
        }
    }
}

/// Deploy a new token. Missing parameters are prompted for.
#[derive(Args)]
pub struct DeployArgs {
    /// Token name
    #[arg(long)]
    pub name: Option<String>,
    /// Token symbol, also the contract name. Upper-cased.
    #[arg(long)]
    pub symbol: Option<String>,
    /// Project website
    #[arg(long)]
    pub website: Option<String>,
    /// Telegram link
    #[arg(long)]
    pub telegram: Option<String>,
    /// Twitter link
    #[arg(long)]
    pub twitter: Option<String>,
    /// Do not prompt; optional links not given by flag are left empty
    #[arg(long)]
    pub non_interactive: bool,
    /// Skip the confirmation question
    #[arg(short, long)]
    pub yes: bool,
    /// Gas limit of the deployment transaction
    #[arg(long, default_value_t = DEPLOY_GAS_LIMIT)]
    pub gas_limit: u128,
    /// Legacy gas price of the deployment transaction, in gwei
    #[arg(long, default_value_t = DEPLOY_GAS_PRICE_GWEI)]
    pub gas_price_gwei: u64,
    /// solc executable
    #[arg(long, env = "SOLC_PATH", default_value = DEFAULT_SOLC)]
    pub solc: PathBuf,
}

/// Run the launch sequence against a deployed token
#[derive(Args)]
pub struct PostDeployArgs {
    /// Symbol of the token, as found under `contracts/<SYMBOL>/`
    pub symbol: String,
    /// Stop before renouncing ownership
    #[arg(long)]
    pub skip_renounce: bool,
}

/// Verify a token source
#[derive(Args)]
pub struct VerifyArgs {
    /// Symbol of an archived token; the root `deployment.json` when omitted
    pub symbol: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_deploy_with_defaults() {
        let cli = Cli::try_parse_from([
            "token-scripts",
            "deploy",
            "--name",
            "Hello",
            "--symbol",
            "hlo",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LoggingFormat::Text);
        let Command::Deploy(args) = cli.command else {
            panic!("expected deploy");
        };
        assert_eq!(args.name.as_deref(), Some("Hello"));
        assert_eq!(args.gas_limit, 3_500_000);
        assert_eq!(args.gas_price_gwei, 20);
        assert!(!args.yes);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "token-scripts",
            "post-deploy",
            "HLO",
            "--network",
            "mainnet",
            "--skip-renounce",
        ])
        .unwrap();
        assert_eq!(cli.network, Some(Network::Mainnet));
        let Command::PostDeploy(args) = cli.command else {
            panic!("expected post-deploy");
        };
        assert_eq!(args.symbol, "HLO");
        assert!(args.skip_renounce);
    }

    #[test]
    fn verify_symbol_is_optional() {
        let cli = Cli::try_parse_from(["token-scripts", "verify"]).unwrap();
        let Command::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.symbol, None);
    }

    #[test]
    fn post_deploy_requires_a_symbol() {
        assert!(Cli::try_parse_from(["token-scripts", "post-deploy"]).is_err());
    }
}
