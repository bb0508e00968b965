//! Network selection tools

use serde::Deserialize;
use serde_json::json;

use coti_core::error::Result;
use coti_core::network::{Network, SwitchOutcome};

use super::schema::{ArgSpec, Field, FieldKind};
use super::ToolContext;
use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};

// ---------------------------------------------------------------------------
// get_current_network

pub const GET_CURRENT_NETWORK_ARGS: ArgSpec = ArgSpec::EMPTY;

pub fn get_current_network_definition() -> Tool {
    Tool {
        name: "get_current_network".to_string(),
        title: Some("Get Current Network".to_string()),
        description: "Report which COTI network (testnet or mainnet) is active."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(false),
        }),
    }
}

pub async fn get_current_network(ctx: &ToolContext) -> Result<ToolsCallResult> {
    let current = ctx.network.read().await.current();
    let structured = json!({ "network": current.to_string() });
    Ok(ToolsCallResult::success_with_structured(
        format!("Current network: {}", current),
        structured,
    ))
}

// ---------------------------------------------------------------------------
// switch_network

#[derive(Debug, Deserialize)]
pub struct SwitchNetworkParams {
    pub network: String,
}

pub const SWITCH_NETWORK_ARGS: ArgSpec =
    ArgSpec::new(&[Field::required("network", FieldKind::String)]);

pub fn switch_network_definition() -> Tool {
    Tool {
        name: "switch_network".to_string(),
        title: Some("Switch Network".to_string()),
        description: "Switch the active COTI network. Switching to the network \
             that is already active succeeds and says so."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "network": {
                    "type": "string",
                    "enum": ["testnet", "mainnet"],
                    "description": "Target network"
                }
            },
            "required": ["network"]
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(false),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(false),
        }),
    }
}

pub async fn switch_network(
    ctx: &ToolContext,
    params: SwitchNetworkParams,
) -> Result<ToolsCallResult> {
    // Parse before taking the lock so a bad name never touches the selector.
    let target: Network = params.network.parse()?;

    let outcome = ctx.network.write().await.switch(target);
    let text = match outcome {
        SwitchOutcome::AlreadyActive => {
            format!("Network already set to {}", target)
        }
        SwitchOutcome::Switched { from } => {
            format!("✓ Switched network from {} to {}", from, target)
        }
    };

    let structured = json!({
        "network": target.to_string(),
        "changed": matches!(outcome, SwitchOutcome::Switched { .. })
    });
    Ok(ToolsCallResult::success_with_structured(text, structured))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_switch_then_repeat_reports_already_set() {
        let ctx = ToolContext::mock();

        let first = switch_network(
            &ctx,
            SwitchNetworkParams {
                network: "mainnet".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(first.text().contains("Switched network from testnet to mainnet"));

        let second = switch_network(
            &ctx,
            SwitchNetworkParams {
                network: "mainnet".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(second.text().contains("already set to mainnet"));
    }

    #[tokio::test]
    async fn test_unknown_network_leaves_selector_untouched() {
        let ctx = ToolContext::mock();
        let result = switch_network(
            &ctx,
            SwitchNetworkParams {
                network: "devnet".to_string(),
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(ctx.network.read().await.current(), Network::Testnet);
    }

    #[tokio::test]
    async fn test_get_current_network_reports_default() {
        let ctx = ToolContext::mock();
        let result = get_current_network(&ctx).await.unwrap();
        assert_eq!(result.text(), "Current network: testnet");
    }
}
