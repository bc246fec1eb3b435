use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    constants::{ARCHIVED_SOURCE_NAME, CONTRACTS_DIR, DEPLOYMENT_FILE_NAME, ROOT_DEPLOYMENT_FILE},
    errors::ScriptError,
};

/// Gas and cost section of a deployment record
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasUsage {
    pub gas_used: String,
    pub gas_price: String,
    pub gas_fee: String,
    pub total_cost: String,
    pub gas_used_formatted: String,
    pub gas_price_formatted: String,
    pub gas_fee_formatted: String,
    pub total_cost_formatted: String,
    pub eth_price: f64,
    pub eth_price_source: String,
    #[serde(default)]
    pub eth_price_timestamp: Option<String>,
    pub eth_btc_ratio: String,
    pub usd_cost: f64,
    pub usd_cost_formatted: String,
}

/// Everything known about a deployed token, saved as `deployment.json`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub name: String,
    pub symbol: String,
    // Empty when not provided
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub telegram: String,
    #[serde(default)]
    pub twitter: String,
    pub address: String,
    pub tx_hash: String,
    pub deployer: String,
    pub network: String,
    pub timestamp: String,
    pub gas_usage: GasUsage,
    pub bytecode: String,
    pub abi: Value,
}

/// Where the scripts read and write their files, relative to a root directory
#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        OutputLayout { root: root.into() }
    }

    pub fn contracts_dir(&self) -> PathBuf {
        self.root.join(CONTRACTS_DIR)
    }

    /// `contracts/<SYMBOL>.sol`, written by deploy
    pub fn source_path(&self, symbol: &str) -> PathBuf {
        self.contracts_dir().join(format!("{symbol}.sol"))
    }

    /// `deployment.json` at the root, the latest deployment
    pub fn root_record_path(&self) -> PathBuf {
        self.root.join(ROOT_DEPLOYMENT_FILE)
    }

    /// `contracts/<SYMBOL>/`
    pub fn token_dir(&self, symbol: &str) -> PathBuf {
        self.contracts_dir().join(symbol)
    }

    pub fn token_record_path(&self, symbol: &str) -> PathBuf {
        self.token_dir(symbol).join(DEPLOYMENT_FILE_NAME)
    }

    pub fn token_source_path(&self, symbol: &str) -> PathBuf {
        self.token_dir(symbol).join(ARCHIVED_SOURCE_NAME)
    }

    /// Write the generated source to `contracts/<SYMBOL>.sol`
    pub fn write_source(&self, symbol: &str, source: &str) -> Result<PathBuf, ScriptError> {
        fs::create_dir_all(self.contracts_dir())?;
        let path = self.source_path(symbol);
        fs::write(&path, source)?;
        Ok(path)
    }

    /// Save `record` as the root deployment, and archive it with its source
    /// under the token folder
    pub fn save_deployment(
        &self,
        record: &DeploymentRecord,
        source: &str,
    ) -> Result<(), ScriptError> {
        write_record(&self.root_record_path(), record)?;

        fs::create_dir_all(self.token_dir(&record.symbol))?;
        write_record(&self.token_record_path(&record.symbol), record)?;
        fs::write(self.token_source_path(&record.symbol), source)?;

        Ok(())
    }

    /// Every token folder holding a deployment record, sorted by name
    pub fn list_deployments(&self) -> Result<Vec<ListedDeployment>, ScriptError> {
        let mut listed = Vec::new();
        for entry in fs::read_dir(self.contracts_dir())? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let record_path = entry.path().join(DEPLOYMENT_FILE_NAME);
            if !record_path.exists() {
                continue;
            }
            listed.push(ListedDeployment {
                label: entry.file_name().to_string_lossy().into_owned(),
                record: read_record(&record_path).ok(),
            });
        }
        listed.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(listed)
    }
}

/// A token folder and its record, `None` when the record does not parse
#[derive(Clone, Debug)]
pub struct ListedDeployment {
    pub label: String,
    pub record: Option<DeploymentRecord>,
}

/// Read the deployment record at `path`
pub fn read_record(path: &Path) -> Result<DeploymentRecord, ScriptError> {
    let shown = path.display();
    if !path.exists() {
        return Err(ScriptError::JsonOutputError(format!("{shown} not found")));
    }

    let contents =
        fs::read_to_string(path).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::JsonOutputError(format!("{shown}: {e}")))
}

/// Write `record` to `path`, pretty printed
pub fn write_record(path: &Path, record: &DeploymentRecord) -> Result<(), ScriptError> {
    let contents = serde_json::to_string_pretty(record)
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    fs::write(path, contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn record(symbol: &str) -> DeploymentRecord {
        DeploymentRecord {
            name: format!("{symbol} Token"),
            symbol: symbol.to_string(),
            website: "https://example.org".into(),
            address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".into(),
            tx_hash: "0x01".into(),
            deployer: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
            network: "Sepolia Testnet".into(),
            timestamp: "2024-06-01T12:00:00.000Z".into(),
            gas_usage: GasUsage {
                gas_used: "1200000".into(),
                eth_price: 2300.0,
                eth_btc_ratio: "N/A".into(),
                ..Default::default()
            },
            bytecode: "0x6080".into(),
            abi: json!([]),
            ..Default::default()
        }
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let value = serde_json::to_value(record("HLO")).unwrap();
        assert_eq!(value["txHash"], "0x01");
        assert_eq!(value["gasUsage"]["gasUsed"], "1200000");
        assert_eq!(value["gasUsage"]["ethBtcRatio"], "N/A");
        assert_eq!(value["telegram"], "");
    }

    #[test]
    fn save_writes_root_and_archive() {
        let dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(dir.path());
        layout.write_source("HLO", "contract HLO {}").unwrap();
        layout
            .save_deployment(&record("HLO"), "contract HLO {}")
            .unwrap();

        assert_eq!(
            read_record(&layout.root_record_path()).unwrap(),
            record("HLO")
        );
        assert_eq!(
            read_record(&layout.token_record_path("HLO")).unwrap(),
            record("HLO")
        );
        assert_eq!(
            fs::read_to_string(layout.token_source_path("HLO")).unwrap(),
            "contract HLO {}"
        );
        assert!(layout.source_path("HLO").ends_with("contracts/HLO.sol"));
        assert!(layout.source_path("HLO").exists());
    }

    #[test]
    fn missing_and_malformed_records_are_errors() {
        let dir = TempDir::new().unwrap();
        let missing = read_record(&dir.path().join("deployment.json")).unwrap_err();
        assert!(matches!(missing, ScriptError::JsonOutputError(_)));

        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let malformed = read_record(&path);
        assert!(matches!(malformed, Err(ScriptError::JsonOutputError(_))));
    }

    #[test]
    fn lists_token_folders_and_flags_invalid_records() {
        let dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(dir.path());
        layout.save_deployment(&record("BBB"), "").unwrap();
        layout.save_deployment(&record("AAA"), "").unwrap();
        fs::create_dir_all(layout.token_dir("BAD")).unwrap();
        fs::write(layout.token_record_path("BAD"), "[]").unwrap();
        fs::create_dir_all(layout.token_dir("EMPTY")).unwrap();

        let listed = layout.list_deployments().unwrap();
        let labels: Vec<_> = listed.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["AAA", "BAD", "BBB"]);
        assert!(listed[0].record.is_some());
        assert!(listed[1].record.is_none());

    }

    #[test]
    fn no_contracts_dir_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(dir.path());
        assert!(layout.list_deployments().is_err());
    }
}
