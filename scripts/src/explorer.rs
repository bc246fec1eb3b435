//! Client for the Etherscan-compatible explorer API: ETH price, source
//! verification submission and verification status

use std::time::Duration;

use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    constants::{
        COMPILER_VERSION, EVM_VERSION, FALLBACK_ETH_PRICE, LICENSE_TYPE, OPTIMIZER_RUNS,
        PRICE_API_URL, PRICE_CHAIN_ID, PRICE_TIMEOUT_SECS, SUBMIT_TIMEOUT_SECS,
    },
    errors::ScriptError,
    utils::redact,
};

/// Result string returned when the submitted source is already verified
pub const ALREADY_VERIFIED_RESULT: &str = "Contract source code already verified";

/// Envelope shared by every explorer response
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }

    /// The `result` field when it is a plain string
    pub fn result_str(&self) -> &str {
        self.result.as_str().unwrap_or_default()
    }
}

/// An ETH/USD quote, live or estimated
#[derive(Clone, Debug, PartialEq)]
pub struct PriceQuote {
    pub price: f64,
    pub source: String,
    /// Unix timestamp (seconds) of the quote
    pub timestamp: Option<String>,
    pub eth_btc: Option<String>,
}

impl PriceQuote {
    /// The fallback quote, labelled with why it is used
    pub fn estimated(reason: &str) -> Self {
        PriceQuote {
            price: FALLBACK_ETH_PRICE,
            source: format!("estimated ({reason})"),
            timestamp: None,
            eth_btc: None,
        }
    }

    /// The quote time, formatted for display
    pub fn updated_at(&self) -> Option<String> {
        let secs = self.timestamp.as_deref()?.parse::<i64>().ok()?;
        let time = DateTime::from_timestamp(secs, 0)?;
        Some(time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    }
}

/// Interpret a `stats/ethprice` response
pub fn parse_price_response(response: &ApiResponse) -> Result<PriceQuote, ScriptError> {
    if !response.is_ok() {
        return Err(ScriptError::Explorer(format!(
            "API Error - Status: {}, Message: {}",
            response.status,
            if response.message.is_empty() {
                "Unknown error"
            } else {
                response.message.as_str()
            }
        )));
    }

    let result = &response.result;
    let raw_price = result["ethusd"].as_str().unwrap_or_default();
    let price = raw_price
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0);
    let Some(price) = price else {
        let message = format!("Invalid price value: {raw_price}");
        return Err(ScriptError::Explorer(message));
    };

    Ok(PriceQuote {
        price,
        source: "Etherscan API".to_string(),
        timestamp: result["ethusd_timestamp"].as_str().map(str::to_string),
        eth_btc: result["ethbtc"].as_str().map(str::to_string),
    })
}

/// Fetch the ETH price from mainnet Etherscan. Never fails: any problem
/// yields the estimated fallback price.
pub async fn fetch_eth_price(api_key: Option<&str>) -> PriceQuote {
    let Some(api_key) = api_key else {
        warn!("No Etherscan API key found, using estimated price");
        return PriceQuote::estimated("no API key");
    };

    info!("Fetching current ETH price...");
    debug!("Price API URL: {}, key: {}", PRICE_API_URL, redact(api_key));

    match request_eth_price(api_key).await {
        Ok(quote) => quote,
        Err(e) => {
            warn!("Failed to fetch ETH price: {}", e);
            PriceQuote::estimated("API failed")
        }
    }
}

async fn request_eth_price(api_key: &str) -> Result<PriceQuote, ScriptError> {
    let http = Client::builder()
        .timeout(Duration::from_secs(PRICE_TIMEOUT_SECS))
        .build()
        .map_err(|e| ScriptError::Explorer(e.to_string()))?;

    let chain_id = PRICE_CHAIN_ID.to_string();
    let params = [
        ("chainid", chain_id.as_str()),
        ("module", "stats"),
        ("action", "ethprice"),
        ("apikey", api_key),
    ];
    let response = get_json(http.get(PRICE_API_URL).query(&params)).await?;

    parse_price_response(&response)
}

/// Everything the explorer needs to verify a single-file contract
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    pub contract_address: String,
    pub contract_name: String,
    pub source_code: String,
}

impl VerificationRequest {
    /// Form fields of the `verifysourcecode` action, compiler settings
    /// matching the ones the deploy script compiled with
    pub fn form_fields(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", api_key.to_string()),
            ("module", "contract".to_string()),
            ("action", "verifysourcecode".to_string()),
            ("contractaddress", self.contract_address.clone()),
            ("sourceCode", self.source_code.clone()),
            ("codeformat", "solidity-single-file".to_string()),
            ("contractname", self.contract_name.clone()),
            ("compilerversion", COMPILER_VERSION.to_string()),
            ("optimizationUsed", "1".to_string()),
            ("runs", OPTIMIZER_RUNS.to_string()),
            // Misspelled on the explorer side
            ("constructorArguements", String::new()),
            ("evmversion", EVM_VERSION.to_string()),
            ("licenseType", LICENSE_TYPE.to_string()),
        ]
    }
}

/// What the explorer said about a verification submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted, the job can be polled with this guid
    Submitted(String),
    AlreadyVerified,
    Rejected {
        result: String,
        message: String,
    },
}

impl SubmitOutcome {
    pub fn from_response(response: &ApiResponse) -> Self {
        if response.is_ok() {
            SubmitOutcome::Submitted(response.result_str().to_string())
        } else if response.result_str() == ALREADY_VERIFIED_RESULT {
            SubmitOutcome::AlreadyVerified
        } else {
            SubmitOutcome::Rejected {
                result: response.result_str().to_string(),
                message: response.message.clone(),
            }
        }
    }
}

/// A verification job status
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationStatus {
    Verified,
    AlreadyVerified,
    Failed(String),
    Pending(String),
}

impl VerificationStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "Pass - Verified" => VerificationStatus::Verified,
            "Already Verified" => VerificationStatus::AlreadyVerified,
            s if s.contains("Fail") => VerificationStatus::Failed(s.to_string()),
            s => VerificationStatus::Pending(s.to_string()),
        }
    }
}

/// The status endpoint, behind a trait so the polling loop can run against a fake
#[allow(async_fn_in_trait)]
pub trait VerificationApi {
    /// Raw status string of the job `guid`
    async fn check_status(&self, guid: &str) -> Result<String, ScriptError>;
}

/// Etherscan client bound to one network's API endpoint
pub struct EtherscanClient {
    http: Client,
    api_url: String,
    api_key: String,
}

impl EtherscanClient {
    pub fn new(api_url: &str, api_key: &str) -> Result<Self, ScriptError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(SUBMIT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ScriptError::Explorer(e.to_string()))?;

        Ok(EtherscanClient {
            http,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Submit `request` for verification
    pub async fn submit_verification(
        &self,
        request: &VerificationRequest,
    ) -> Result<ApiResponse, ScriptError> {
        let fields = request.form_fields(&self.api_key);
        get_json(self.http.post(&self.api_url).form(&fields)).await
    }
}

impl VerificationApi for EtherscanClient {
    async fn check_status(&self, guid: &str) -> Result<String, ScriptError> {
        let params = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "checkverifystatus"),
            ("guid", guid),
        ];
        let request = self.http.get(&self.api_url).query(&params);
        let response = get_json(request).await?;

        Ok(response.result_str().to_string())
    }
}

/// Send `request` and decode the explorer envelope, whatever the HTTP status
async fn get_json(request: reqwest::RequestBuilder) -> Result<ApiResponse, ScriptError> {
    let response = request
        .send()
        .await
        .map_err(|e| ScriptError::Explorer(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ScriptError::Explorer(e.to_string()))?;
    debug!("Explorer response ({}): {}", status, body);

    serde_json::from_str(&body).map_err(|e| {
        let message = format!("HTTP {status}, undecodable body {body}: {e}");
        ScriptError::Explorer(message)
    })
}
