use std::{path::PathBuf, process::Command};

use alloy::primitives::Bytes;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    constants::{EVM_VERSION, OPTIMIZER_RUNS, SOURCE_UNIT_NAME},
    errors::ScriptError,
    utils::command_output_with_input,
};

/// Output of a successful compilation
#[derive(Clone, Debug)]
pub struct CompiledContract {
    /// Creation bytecode
    pub bytecode: Bytes,
    /// The contract ABI, as emitted by the compiler
    pub abi: Value,
}

/// A diagnostic emitted by the compiler
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: String,
    pub message: String,
}

/// Compiles single-file Solidity sources through `solc --standard-json`
pub struct SolcBuilder {
    solc: PathBuf,
}

impl SolcBuilder {
    pub fn new(solc: impl Into<PathBuf>) -> Self {
        SolcBuilder { solc: solc.into() }
    }

    /// Compile `source` and extract the contract named `contract_name`
    pub fn compile(
        &self,
        source: &str,
        contract_name: &str,
    ) -> Result<CompiledContract, ScriptError> {
        let input = standard_json_input(source);

        let mut cmd = Command::new(&self.solc);
        cmd.arg("--standard-json");
        let output = command_output_with_input(cmd, &input.to_string(), "Failed to run solc")?;

        let output: Value = serde_json::from_str(&output)
            .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;
        parse_output(&output, contract_name)
    }
}

/// Standard-json input for a single `Token.sol` source, optimized with the
/// same settings as the verification request
pub fn standard_json_input(source: &str) -> Value {
    json!({
        "language": "Solidity",
        "sources": {
            SOURCE_UNIT_NAME: { "content": source }
        },
        "settings": {
            "outputSelection": {
                "*": { "*": ["*"] }
            },
            "optimizer": {
                "enabled": true,
                "runs": OPTIMIZER_RUNS
            },
            "evmVersion": EVM_VERSION
        }
    })
}

/// Diagnostics of a standard-json output
pub fn diagnostics(output: &Value) -> Vec<Diagnostic> {
    output["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .map(|e| Diagnostic {
                    severity: e["severity"].as_str().unwrap_or("error").to_string(),
                    message: e["formattedMessage"]
                        .as_str()
                        .or_else(|| e["message"].as_str())
                        .unwrap_or_default()
                        .trim()
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Extract the bytecode and abi of `contract_name`, failing on any error diagnostic
pub fn parse_output(output: &Value, contract_name: &str) -> Result<CompiledContract, ScriptError> {
    let (errors, others): (Vec<_>, Vec<_>) = diagnostics(output)
        .into_iter()
        .partition(|d| d.severity == "error");

    for diagnostic in &others {
        warn!("solc {}: {}", diagnostic.severity, diagnostic.message);
    }
    if !errors.is_empty() {
        let messages: Vec<_> = errors.into_iter().map(|d| d.message).collect();
        return Err(ScriptError::ContractCompilation(messages.join("\n")));
    }

    let contract = &output["contracts"][SOURCE_UNIT_NAME][contract_name];
    if contract.is_null() {
        return Err(ScriptError::ContractCompilation(format!(
            "contract {contract_name} not found in compiler output"
        )));
    }

    let bytecode_hex = contract["evm"]["bytecode"]["object"]
        .as_str()
        .filter(|code| !code.is_empty())
        .ok_or_else(|| {
            ScriptError::ContractCompilation(format!("no bytecode emitted for {contract_name}"))
        })?;
    let bytecode = bytecode_hex
        .parse::<Bytes>()
        .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;

    info!("Compiled {} ({} bytes)", contract_name, bytecode.len());

    Ok(CompiledContract {
        bytecode,
        abi: contract["abi"].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_with(errors: Value) -> Value {
        json!({
            "errors": errors,
            "contracts": {
                "Token.sol": {
                    "HLO": {
                        "abi": [{
                            "type": "function",
                            "name": "openTrading",
                            "inputs": [],
                            "outputs": []
                        }],
                        "evm": { "bytecode": { "object": "6080604052" } }
                    }
                }
            }
        })
    }

    #[test]
    fn input_matches_verification_settings() {
        let input = standard_json_input("contract A {}");
        assert_eq!(input["language"], "Solidity");
        assert_eq!(input["sources"]["Token.sol"]["content"], "contract A {}");
        assert_eq!(input["settings"]["optimizer"]["enabled"], true);
        assert_eq!(input["settings"]["optimizer"]["runs"], 200);
        assert_eq!(input["settings"]["evmVersion"], "shanghai");
        assert_eq!(input["settings"]["outputSelection"]["*"]["*"][0], "*");
    }

    #[test]
    fn extracts_bytecode_and_abi() {
        let compiled = parse_output(&output_with(json!([])), "HLO").unwrap();
        assert_eq!(
            compiled.bytecode.to_vec(),
            vec![0x60, 0x80, 0x60, 0x40, 0x52]
        );
        assert_eq!(compiled.abi[0]["name"], "openTrading");
    }

    #[test]
    fn warnings_do_not_fail_compilation() {
        let errors = json!([{ "severity": "warning", "message": "unused variable" }]);
        assert!(parse_output(&output_with(errors), "HLO").is_ok());
    }

    #[test]
    fn errors_fail_compilation_with_their_messages() {
        let errors = json!([
            { "severity": "warning", "message": "unused variable" },
            {
                "severity": "error",
                "message": "Expected ';'",
                "formattedMessage": "ParserError: Expected ';'\n"
            }
        ]);
        let err = parse_output(&output_with(errors), "HLO").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ParserError: Expected ';'"));
        assert!(!msg.contains("unused variable"));
    }

    #[test]
    fn missing_contract_is_an_error() {
        let err = parse_output(&output_with(json!([])), "OTHER").unwrap_err();
        assert!(err.to_string().contains("OTHER not found"));
    }

    #[test]
    fn missing_solc_is_a_compilation_error() {
        let builder = SolcBuilder::new("/nonexistent/solc-binary");
        let err = builder.compile("contract A {}", "A").unwrap_err();
        assert!(matches!(err, ScriptError::ContractCompilation(_)));
    }
}
