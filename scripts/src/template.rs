//! Generation of the token source from the embedded template

use handlebars::Handlebars;
use serde::Serialize;

use crate::errors::ScriptError;

/// The token contract template
const TOKEN_TEMPLATE: &str = include_str!("../templates/token.sol.hbs");
/// Name the template is registered under
const TEMPLATE_NAME: &str = "token";
/// Top-level declarations of the template, unavailable as contract names
const DECLARED_NAMES: [&str; 6] = [
    "Context",
    "IERC20",
    "SafeMath",
    "Ownable",
    "IUniswapV2Factory",
    "IUniswapV2Router02",
];

/// User supplied parameters of a token
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenParams {
    pub name: String,
    /// Always stored upper-cased
    pub symbol: String,
    pub website: Option<String>,
    pub telegram: Option<String>,
    pub twitter: Option<String>,
}

impl TokenParams {
    /// Build validated parameters. The symbol is upper-cased and optional
    /// links that are blank become `None`.
    pub fn new(
        name: &str,
        symbol: &str,
        website: Option<&str>,
        telegram: Option<&str>,
        twitter: Option<&str>,
    ) -> Result<Self, ScriptError> {
        let name = name.trim();
        let symbol = symbol.trim().to_uppercase();

        if name.is_empty() {
            return Err(ScriptError::Configuration("token name is empty".into()));
        }
        // The name lands in a string literal and in the header comment block
        if name.contains(['"', '\\', '\n', '\r']) || name.contains("*/") {
            return Err(ScriptError::Configuration(
                "token name cannot contain quotes, backslashes, `*/` or line breaks".into(),
            ));
        }
        if !is_identifier(&symbol) {
            return Err(ScriptError::Configuration(format!(
                "token symbol `{symbol}` must be a valid contract identifier"
            )));
        }
        if DECLARED_NAMES.contains(&symbol.as_str()) {
            return Err(ScriptError::Configuration(format!(
                "token symbol `{symbol}` clashes with a declaration of the token source"
            )));
        }

        Ok(TokenParams {
            name: name.to_string(),
            symbol,
            website: link(website)?,
            telegram: link(telegram)?,
            twitter: link(twitter)?,
        })
    }

    /// The comment header placed above the pragma
    pub fn header(&self) -> String {
        let mut header = String::from("// SPDX-License-Identifier: UNLICENSE\n\n/*\n\n");
        header.push_str(&format!("{} ({})\n\n", self.name, self.symbol));
        for (label, value) in [
            ("Website", &self.website),
            ("Telegram", &self.telegram),
            ("Twitter", &self.twitter),
        ] {
            if let Some(value) = value {
                header.push_str(&format!("{label}: {value}\n"));
            }
        }
        header.push_str("\n*/\n\n");
        header
    }
}

/// Solidity identifiers: a letter, `_` or `$`, then alphanumerics, `_` or `$`
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[derive(Serialize)]
struct TemplateContext<'a> {
    header: String,
    name: &'a str,
    symbol: &'a str,
}

/// Links land inside the header comment block
fn link(value: Option<&str>) -> Result<Option<String>, ScriptError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.contains("*/") || value.contains(['\n', '\r']) {
        return Err(ScriptError::Configuration(format!(
            "link `{value}` cannot contain `*/` or line breaks"
        )));
    }
    Ok(Some(value.to_string()))
}

/// Render the Solidity source of the token described by `params`
pub fn render_contract(params: &TokenParams) -> Result<String, ScriptError> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // Solidity, not HTML
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(TEMPLATE_NAME, TOKEN_TEMPLATE)
        .map_err(|e| ScriptError::Template(e.to_string()))?;

    let context = TemplateContext {
        header: params.header(),
        name: &params.name,
        symbol: &params.symbol,
    };

    registry
        .render(TEMPLATE_NAME, &context)
        .map_err(|e| ScriptError::Template(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TokenParams {
        TokenParams::new(
            "Hello Token",
            "hlo",
            Some("https://hlo.io"),
            None,
            Some(" "),
        )
        .unwrap()
    }

    #[test]
    fn symbol_is_upper_cased_and_blanks_dropped() {
        let p = params();
        assert_eq!(p.symbol, "HLO");
        assert_eq!(p.website.as_deref(), Some("https://hlo.io"));
        assert_eq!(p.telegram, None);
        assert_eq!(p.twitter, None);
    }

    #[test]
    fn header_lists_only_provided_links() {
        let header = params().header();
        assert_eq!(
            header,
            "// SPDX-License-Identifier: UNLICENSE\n\n/*\n\nHello Token (HLO)\n\nWebsite: https://hlo.io\n\n*/\n\n"
        );
    }

    #[test]
    fn header_without_links() {
        let p = TokenParams::new("Bare", "BR", None, None, None).unwrap();
        assert_eq!(
            p.header(),
            "// SPDX-License-Identifier: UNLICENSE\n\n/*\n\nBare (BR)\n\n\n*/\n\n"
        );
    }

    #[test]
    fn rendered_source_names_the_contract_after_the_symbol() {
        let source = render_contract(&params()).unwrap();
        assert!(source.starts_with("// SPDX-License-Identifier: UNLICENSE"));
        for expected in [
            "Hello Token (HLO)\n\nWebsite: https://hlo.io\n\n*/\n\npragma solidity ^0.8.24;",
            "contract HLO is Context, IERC20, Ownable {",
            "string private constant _name = unicode\"Hello Token\";",
            "string private constant _symbol = unicode\"HLO\";",
            "uint8 private constant _decimals = 9;",
            "function openTrading() external onlyOwner()",
            "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D",
        ] {
            assert!(source.contains(expected), "missing {expected:?}");
        }
        assert!(!source.contains("{{"));
    }

    #[test]
    fn values_are_not_html_escaped() {
        let p = TokenParams::new("Cats & Dogs <3", "CND", None, Some("t.me/a&b"), None).unwrap();
        let source = render_contract(&p).unwrap();
        assert!(source.contains("unicode\"Cats & Dogs <3\""));
        assert!(source.contains("Telegram: t.me/a&b\n"));
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(TokenParams::new("", "ABC", None, None, None).is_err());
        assert!(TokenParams::new("Quote\"d", "ABC", None, None, None).is_err());
        assert!(TokenParams::new("Name", "", None, None, None).is_err());
        assert!(TokenParams::new("Name", "1ABC", None, None, None).is_err());
        assert!(TokenParams::new("Name", "AB C", None, None, None).is_err());
        assert!(TokenParams::new("Name", "$AB_1", None, None, None).is_ok());
        assert!(TokenParams::new("Evil */ contract X {} /* ", "EVL", None, None, None).is_err());
    }

    #[test]
    fn symbol_cannot_reuse_a_declared_name() {
        let err = TokenParams::new("Name", "ierc20", None, None, None).unwrap_err();
        assert!(err.to_string().contains("IERC20"));
        // Solidity names are case sensitive
        assert!(TokenParams::new("Name", "context", None, None, None).is_ok());
    }

    #[test]
    fn links_cannot_close_the_header_comment() {
        let website = Some("https://a.io */ contract X {}");
        assert!(TokenParams::new("Ok", "OK", website, None, None).is_err());
        assert!(TokenParams::new("Ok", "OK", None, Some("t.me/a\nb"), None).is_err());
    }
}
