//! `simchat tools`: list the tool catalog handed to the model.

use simchat_core::provider::ToolDefinition;
use simchat_sim::SimClient;
use std::sync::Arc;
use std::time::Duration;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Definitions never touch the network, so any base URL and key will do.
    let sim = SimClient::new(
        simchat_config::SimConfig::default().base_url.as_str(),
        "",
        Duration::from_secs(1),
    )?;
    let registry = simchat_tools::default_registry(Arc::new(sim));
    let definitions = registry.definitions();

    if json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
    } else {
        print!("{}", render_table(&definitions));
    }
    Ok(())
}

fn render_table(definitions: &[ToolDefinition]) -> String {
    let mut out = format!("{} tools available to the model\n\n", definitions.len());
    for def in definitions {
        let required = def.parameters["required"]
            .as_array()
            .map(|r| {
                r.iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        out.push_str(&format!("  {:<24} {}\n", def.name, first_sentence(&def.description)));
        if !required.is_empty() {
            out.push_str(&format!("  {:<24} requires: {required}\n", ""));
        }
    }
    out
}

fn first_sentence(text: &str) -> &str {
    match text.find(". ") {
        Some(end) => &text[..=end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_every_tool_with_required_args() {
        let sim = SimClient::new("http://127.0.0.1:1", "", Duration::from_secs(1)).unwrap();
        let definitions = simchat_tools::default_registry(Arc::new(sim)).definitions();
        let table = render_table(&definitions);

        assert!(table.starts_with("9 tools"));
        assert!(table.contains("get_token_balances"));
        assert!(table.contains("get_svm_token_metadata"));
        assert!(table.contains("requires: chain_id, token_address"));
    }

    #[test]
    fn first_sentence_stops_at_period() {
        assert_eq!(first_sentence("Get balances. Includes prices."), "Get balances.");
        assert_eq!(first_sentence("No period"), "No period");
    }
}
