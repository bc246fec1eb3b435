//! Utilities for the token scripts.

use std::{
    io::Write,
    process::{Command, Stdio},
};

use alloy::primitives::{utils::format_units, U256};
use tracing::debug;

use crate::errors::ScriptError;

/// Runs `cmd` with `input` on its stdin and returns its stdout, failing with
/// `err_msg` (and the captured stderr) when the command does not succeed
pub fn command_output_with_input(
    mut cmd: Command,
    input: &str,
    err_msg: &str,
) -> Result<String, ScriptError> {
    debug!("Running command: {:?}", cmd);
    let fail = |reason: String| ScriptError::ContractCompilation(format!("{err_msg}: {reason}"));

    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| fail(e.to_string()))?;

    child
        .stdin
        .take()
        .ok_or_else(|| fail("stdin unavailable".into()))?
        .write_all(input.as_bytes())
        .map_err(|e| fail(e.to_string()))?;

    let output = child.wait_with_output().map_err(|e| fail(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(fail(stderr.trim().to_string()));
    }

    String::from_utf8(output.stdout).map_err(|e| ScriptError::ContractCompilation(e.to_string()))
}

/// Formats `value` with `decimals` decimals, dropping trailing zeros but
/// keeping at least one fractional digit (`1.0`, `0.015`)
pub fn display_units(value: U256, decimals: u8) -> String {
    let formatted = format_units(value, decimals).unwrap_or_else(|_| value.to_string());
    trim_fraction(&formatted)
}

/// Formats a wei amount as ether
pub fn display_ether(value: U256) -> String {
    display_units(value, 18)
}

/// Formats a wei amount as gwei
pub fn display_gwei(value: U256) -> String {
    display_units(value, 9)
}

fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{int}.0")
            } else {
                format!("{int}.{frac}")
            }
        }
        None => formatted.to_string(),
    }
}

/// Groups the digits of `value` by thousands (`3,500,000`)
pub fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Lossy conversion of a wei amount to a floating point ether amount, for
/// USD estimates only
pub fn ether_as_f64(value: U256) -> f64 {
    display_ether(value).parse().unwrap_or(0.0)
}

/// First characters of a secret, for logs
pub fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(8).collect();
    format!("{prefix}...")
}
