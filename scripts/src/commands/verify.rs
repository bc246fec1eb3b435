use std::{fs, path::PathBuf, time::Duration};

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::list::print_available_tokens;
use crate::{
    cli::VerifyArgs,
    config::NetworkConfig,
    console::{self, Banner},
    constants::{
        COMPILER_VERSION, EVM_VERSION, OPTIMIZER_RUNS, VERIFY_MAX_ATTEMPTS,
        VERIFY_POLL_INTERVAL_SECS,
    },
    errors::ScriptError,
    explorer::{
        ApiResponse, EtherscanClient, SubmitOutcome, VerificationApi, VerificationRequest,
        VerificationStatus,
    },
    output_writer::{read_record, DeploymentRecord, OutputLayout},
};

/// How a verification poll ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    Verified,
    AlreadyVerified,
    Failed(String),
    /// Every attempt came back pending
    TimedOut,
    /// The status request itself failed
    Errored(String),
}

/// Verify the source of a deployed token. Every failure is reported on the
/// console, none is returned.
pub async fn verify_token(args: VerifyArgs, config: &NetworkConfig, layout: &OutputLayout) {
    match args.symbol.as_deref() {
        Some(symbol) => console::info(&format!("🎯 Verification requested for: {symbol}")),
        None => console::info("🎯 Verifying current deployment (from root)"),
    }

    if let Err(e) = verify(args.symbol.as_deref(), config, layout).await {
        warn!("Verification aborted: {}", e);
        console::error("Verification failed");
        console::detail_err(&format!("Error: {e}"));
    }
}

async fn verify(
    symbol: Option<&str>,
    config: &NetworkConfig,
    layout: &OutputLayout,
) -> Result<(), ScriptError> {
    console::banner(Banner::Verifier);

    let Some(api_key) = config.api_key.as_deref() else {
        console::error("Missing ETHERSCAN_API_KEY in .env file");
        console::detail_link("Get your API key from: https://etherscan.io/apis");
        return Ok(());
    };

    console::sub_header("NETWORK CONFIGURATION");
    console::info(&format!("Network: {}", config.network_name()));
    console::info(&format!("API Endpoint: {}", config.explorer_api_url()));

    let Some(target) = locate_target(symbol, layout)? else {
        return Ok(());
    };
    let record = &target.record;

    console::detail(&format!("📄 Contract: {} ({})", record.name, record.symbol));
    console::detail(&format!("📍 Address: {}", record.address));
    console::detail(&format!("📂 Deployment: {}", target.record_path.display()));
    console::detail(&format!("📜 Source: {}", target.source_path.display()));

    let source_code = fs::read_to_string(&target.source_path)?;

    console::sub_header("VERIFICATION PARAMETERS");
    console::detail(&format!("🔧 Compiler: {COMPILER_VERSION}"));
    console::detail(&format!("⚡ EVM Version: {EVM_VERSION}"));
    console::detail(&format!("🚀 Optimization: {OPTIMIZER_RUNS} runs"));
    console::detail("📋 License: Unlicense");

    console::sub_header("SUBMITTING VERIFICATION");
    console::info("Sending verification request...");
    let explorer = EtherscanClient::new(config.explorer_api_url(), api_key)?;
    let request = VerificationRequest {
        contract_address: record.address.clone(),
        contract_name: record.symbol.clone(),
        source_code,
    };
    let response = explorer.submit_verification(&request).await?;

    println!();
    console::info("📤 Server Response:");
    console::detail(&format!("Status: {}", response.status));
    console::detail(&format!("Result: {}", result_text(&response)));

    let explorer_url = config.explorer_url();
    match SubmitOutcome::from_response(&response) {
        SubmitOutcome::Submitted(guid) => {
            console::success(&format!("Verification submitted! GUID: {guid}"));
            console::sub_header("CHECKING VERIFICATION STATUS");
            console::info("Monitoring verification progress...");

            let outcome = poll_verification(
                &explorer,
                &guid,
                VERIFY_MAX_ATTEMPTS,
                Duration::from_secs(VERIFY_POLL_INTERVAL_SECS),
            )
            .await;
            report_outcome(&outcome, explorer_url, &record.address);
        }
        SubmitOutcome::AlreadyVerified => {
            console::header("🎉 CONTRACT ALREADY VERIFIED!");
            print_links(explorer_url, &record.address);
        }
        SubmitOutcome::Rejected { result, message } => {
            console::error(&format!("Verification submission failed: {result}"));
            if !message.is_empty() {
                console::detail_err(&format!("Details: {message}"));
            }
        }
    }

    Ok(())
}

/// A deployment record and the source to submit with it
#[derive(Debug)]
struct VerifyTarget {
    record: DeploymentRecord,
    record_path: PathBuf,
    source_path: PathBuf,
}

/// With a symbol, the archive under `contracts/<SYMBOL>/`. Without one, the
/// root record and `contracts/<SYMBOL>.sol`. `None` once a missing file has
/// been reported.
fn locate_target(
    symbol: Option<&str>,
    layout: &OutputLayout,
) -> Result<Option<VerifyTarget>, ScriptError> {
    let (record_path, source_path, record) = match symbol {
        Some(symbol) => {
            console::sub_header("TARGET CONTRACT");
            console::info(&format!("Verifying specific token: {symbol}"));

            let record_path = layout.token_record_path(symbol);
            if !record_path.exists() {
                console::error(&format!("{} not found", record_path.display()));
                console::warning("Available tokens:");
                print_available_tokens(layout);
                return Ok(None);
            }
            let source_path = layout.token_source_path(symbol);
            if !source_path.exists() {
                console::error(&format!("{} not found", source_path.display()));
                return Ok(None);
            }
            let record = read_record(&record_path)?;
            (record_path, source_path, record)
        }
        None => {
            let record_path = layout.root_record_path();
            if !record_path.exists() {
                console::error("deployment.json not found in root directory");
                console::warning("📖 Usage Options:");
                console::detail("1. Deploy a new token first: token-scripts deploy");
                console::detail("2. Verify a specific token: token-scripts verify TOKEN_SYMBOL");
                console::warning("📁 Available tokens:");
                print_available_tokens(layout);
                return Ok(None);
            }
            let record = read_record(&record_path)?;
            let source_path = layout.source_path(&record.symbol);
            if !source_path.exists() {
                console::error(&format!("{} not found", source_path.display()));
                return Ok(None);
            }
            console::sub_header("TARGET CONTRACT");
            console::info("Verifying current deployment from root directory");
            (record_path, source_path, record)
        }
    };

    Ok(Some(VerifyTarget {
        record,
        record_path,
        source_path,
    }))
}

/// Poll the job `guid` until it settles, waiting `interval` before each of
/// at most `max_attempts` checks
pub async fn poll_verification<A: VerificationApi>(
    api: &A,
    guid: &str,
    max_attempts: u32,
    interval: Duration,
) -> PollOutcome {
    for attempt in 1..=max_attempts {
        sleep(interval).await;

        let status = match api.check_status(guid).await {
            Ok(status) => status,
            Err(e) => return PollOutcome::Errored(e.to_string()),
        };
        console::detail_dim(&format!("[{attempt}/{max_attempts}] {status}"));

        match VerificationStatus::parse(&status) {
            VerificationStatus::Verified => return PollOutcome::Verified,
            VerificationStatus::AlreadyVerified => return PollOutcome::AlreadyVerified,
            VerificationStatus::Failed(status) => return PollOutcome::Failed(status),
            VerificationStatus::Pending(status) => debug!("Still pending: {}", status),
        }
    }

    PollOutcome::TimedOut
}

fn report_outcome(outcome: &PollOutcome, explorer_url: &str, address: &str) {
    match outcome {
        PollOutcome::Verified => {
            console::header("🎉 VERIFICATION SUCCESSFUL!");
            print_links(explorer_url, address);
        }
        PollOutcome::AlreadyVerified => {
            console::header("✅ CONTRACT ALREADY VERIFIED!");
            print_links(explorer_url, address);
        }
        PollOutcome::Failed(status) => {
            console::error(&format!("Verification failed: {status}"));
            console::warning("💡 Common fixes:");
            console::detail("• Check compiler version matches deployment");
            console::detail(&format!(
                "• Verify optimization settings ({OPTIMIZER_RUNS} runs)"
            ));
            console::detail("• Ensure contract name matches file");
            console::detail(&format!("• Confirm EVM version ({EVM_VERSION})"));
        }
        PollOutcome::TimedOut => {
            console::warning("Verification timeout - check manually");
            console::detail_link(&format!(
                "📋 Check status: {explorer_url}/address/{address}#code"
            ));
        }
        PollOutcome::Errored(e) => console::error(&format!("Status check failed: {e}")),
    }
}

/// Contract page, source, read and write tabs
pub fn contract_links(explorer_url: &str, address: &str) -> [(&'static str, String); 4] {
    let page = format!("{explorer_url}/address/{address}");
    [
        ("📋 Contract", page.clone()),
        ("📄 Source Code", format!("{page}#code")),
        ("📊 Read Contract", format!("{page}#readContract")),
        ("✍️  Write Contract", format!("{page}#writeContract")),
    ]
}

fn print_links(explorer_url: &str, address: &str) {
    for (label, url) in contract_links(explorer_url, address) {
        console::detail_ok(&format!("{label}: {url}"));
    }
    println!();
    console::closing("🎊 Contract is now publicly verifiable! 🎊");
}

fn result_text(response: &ApiResponse) -> String {
    match &response.result {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use tempfile::TempDir;

    use super::*;

    /// Replays canned statuses, counting the calls
    struct FakeExplorer {
        statuses: Mutex<VecDeque<Result<String, ScriptError>>>,
        calls: Mutex<u32>,
    }

    impl FakeExplorer {
        fn new(statuses: Vec<Result<&str, &str>>) -> Self {
            let statuses = statuses
                .into_iter()
                .map(|s| {
                    s.map(str::to_string)
                        .map_err(|e| ScriptError::Explorer(e.to_string()))
                })
                .collect();
            FakeExplorer {
                statuses: Mutex::new(statuses),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl VerificationApi for FakeExplorer {
        async fn check_status(&self, guid: &str) -> Result<String, ScriptError> {
            assert_eq!(guid, "guid-1");
            *self.calls.lock().unwrap() += 1;
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("Pending in queue".to_string()))
        }
    }

    async fn poll(api: &FakeExplorer) -> PollOutcome {
        poll_verification(api, "guid-1", VERIFY_MAX_ATTEMPTS, Duration::ZERO).await
    }

    #[tokio::test]
    async fn stops_when_verified() {
        let api = FakeExplorer::new(vec![Ok("Pending in queue"), Ok("Pass - Verified")]);
        assert_eq!(poll(&api).await, PollOutcome::Verified);
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn already_verified_status() {
        let api = FakeExplorer::new(vec![Ok("Already Verified")]);
        assert_eq!(poll(&api).await, PollOutcome::AlreadyVerified);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn failure_status_ends_polling() {
        let api = FakeExplorer::new(vec![
            Ok("Pending in queue"),
            Ok("Fail - Unable to verify. Compiled contract deployment bytecode does NOT match"),
            Ok("Pass - Verified"),
        ]);
        match poll(&api).await {
            PollOutcome::Failed(status) => assert!(status.starts_with("Fail - Unable")),
            other => panic!("expected a failure, got {other:?}"),
        }
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn times_out_after_max_attempts() {
        let api = FakeExplorer::new(vec![]);
        assert_eq!(poll(&api).await, PollOutcome::TimedOut);
        assert_eq!(api.calls(), 15);
    }

    #[tokio::test]
    async fn request_error_ends_polling() {
        let api = FakeExplorer::new(vec![Ok("Pending in queue"), Err("connection reset")]);
        match poll(&api).await {
            PollOutcome::Errored(e) => assert!(e.contains("connection reset")),
            other => panic!("expected a request error, got {other:?}"),
        }
        assert_eq!(api.calls(), 2);
    }

    #[test]
    fn links_cover_every_tab() {
        let links = contract_links("https://sepolia.etherscan.io", "0xabc");
        let urls: Vec<_> = links.iter().map(|(_, url)| url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://sepolia.etherscan.io/address/0xabc",
                "https://sepolia.etherscan.io/address/0xabc#code",
                "https://sepolia.etherscan.io/address/0xabc#readContract",
                "https://sepolia.etherscan.io/address/0xabc#writeContract",
            ]
        );
    }

    fn record(symbol: &str) -> DeploymentRecord {
        DeploymentRecord {
            name: "Hello".into(),
            symbol: symbol.into(),
            address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".into(),
            ..Default::default()
        }
    }

    #[test]
    fn symbol_targets_the_archive() {
        let dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(dir.path());
        layout
            .save_deployment(&record("HLO"), "contract HLO {}")
            .unwrap();

        let target = locate_target(Some("HLO"), &layout).unwrap().unwrap();
        assert_eq!(target.record_path, layout.token_record_path("HLO"));
        assert_eq!(target.source_path, layout.token_source_path("HLO"));
        assert_eq!(target.record.symbol, "HLO");

        assert!(locate_target(Some("NOPE"), &layout).unwrap().is_none());
    }

    #[test]
    fn root_target_uses_the_flat_source() {
        let dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(dir.path());
        assert!(locate_target(None, &layout).unwrap().is_none());

        layout
            .save_deployment(&record("HLO"), "contract HLO {}")
            .unwrap();
        // the flat source has not been written yet
        assert!(locate_target(None, &layout).unwrap().is_none());

        layout.write_source("HLO", "contract HLO {}").unwrap();
        let target = locate_target(None, &layout).unwrap().unwrap();
        assert_eq!(target.record_path, layout.root_record_path());
        assert_eq!(target.source_path, layout.source_path("HLO"));
    }

    #[test]
    fn result_text_handles_non_strings() {
        let response: ApiResponse =
            serde_json::from_value(serde_json::json!({ "status": "0", "result": 42 })).unwrap();
        assert_eq!(result_text(&response), "42");
    }
}
