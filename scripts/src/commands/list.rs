use crate::{
    console,
    output_writer::{read_record, OutputLayout},
};

/// List the archived token deployments and the root deployment
pub fn list_tokens(layout: &OutputLayout) {
    console::sub_header("DEPLOYED TOKENS");
    print_available_tokens(layout);
}

/// Print every `contracts/<SYMBOL>/deployment.json`, then the root record
pub fn print_available_tokens(layout: &OutputLayout) {
    for line in available_token_lines(layout) {
        match line {
            TokenLine::Found(text) => console::detail(&text),
            TokenLine::Root(text) => console::detail_link(&text),
            TokenLine::Invalid(text) => console::warning(&text),
            TokenLine::Nothing(text) => console::detail_dim(&text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum TokenLine {
    Found(String),
    Root(String),
    Invalid(String),
    Nothing(String),
}

fn available_token_lines(layout: &OutputLayout) -> Vec<TokenLine> {
    let mut lines = Vec::new();

    match layout.list_deployments() {
        Err(_) => lines.push(TokenLine::Nothing("📁 No contracts directory found".into())),
        Ok(listed) if listed.is_empty() => {
            lines.push(TokenLine::Nothing("📁 No tokens found".into()))
        }
        Ok(listed) => lines.extend(listed.into_iter().map(|token| match token.record {
            Some(record) => TokenLine::Found(format!(
                "📄 {}: {} ({})",
                token.label, record.address, record.name
            )),
            None => TokenLine::Invalid(format!("{}: Invalid deployment.json", token.label)),
        })),
    }

    let root = layout.root_record_path();
    if root.exists() {
        lines.push(match read_record(&root) {
            Ok(record) => TokenLine::Root(format!(
                "📄 [ROOT]: {} ({})",
                record.address, record.name
            )),
            Err(_) => TokenLine::Invalid("[ROOT]: Invalid deployment.json".into()),
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::output_writer::DeploymentRecord;

    fn record(symbol: &str, name: &str) -> DeploymentRecord {
        DeploymentRecord {
            name: name.into(),
            symbol: symbol.into(),
            address: format!("0x{symbol}"),
            ..Default::default()
        }
    }

    #[test]
    fn reports_missing_contracts_dir() {
        let dir = TempDir::new().unwrap();
        let lines = available_token_lines(&OutputLayout::new(dir.path()));
        assert_eq!(
            lines,
            vec![TokenLine::Nothing("📁 No contracts directory found".into())]
        );
    }

    #[test]
    fn reports_empty_contracts_dir() {
        let dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(dir.path());
        fs::create_dir_all(layout.contracts_dir()).unwrap();
        assert_eq!(
            available_token_lines(&layout),
            vec![TokenLine::Nothing("📁 No tokens found".into())]
        );
    }

    #[test]
    fn lists_tokens_then_root() {
        let dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(dir.path());
        layout.save_deployment(&record("AAA", "Alpha"), "").unwrap();
        // the root record now holds BBB
        layout.save_deployment(&record("BBB", "Beta"), "").unwrap();
        fs::create_dir_all(layout.token_dir("BAD")).unwrap();
        fs::write(layout.token_record_path("BAD"), "nope").unwrap();

        assert_eq!(
            available_token_lines(&layout),
            vec![
                TokenLine::Found("📄 AAA: 0xAAA (Alpha)".into()),
                TokenLine::Invalid("BAD: Invalid deployment.json".into()),
                TokenLine::Found("📄 BBB: 0xBBB (Beta)".into()),
                TokenLine::Root("📄 [ROOT]: 0xBBB (Beta)".into()),
            ]
        );
    }
}
