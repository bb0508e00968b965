//! COTI MCP tool registry and dispatcher
//!
//! Each tool lives in a topic module with a `*_definition()` describing
//! its schema, an `ArgSpec` declaring its argument shape, and an async
//! handler. [`execute_tool`] is the single entry point: it resolves the
//! name, validates the argument shape, and wraps every outcome in a
//! tool envelope so protocol-level errors stay reserved for malformed
//! JSON-RPC.

pub mod accounts;
pub mod encryption;
pub mod network;
pub mod schema;
pub mod wallet;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use coti_core::client::{MockWalletClient, WalletClient};
use coti_core::credentials::{Credential, CredentialStore, PENDING_AES_KEY};
use coti_core::error::{CotiError, Result};
use coti_core::network::NetworkSelector;

use crate::protocol::{Tool, ToolsCallResult};
use schema::ArgSpec;

/// Tool execution context
///
/// Shared state every handler sees: the credential registry, the network
/// selector, and the blockchain client seam.
#[derive(Clone)]
pub struct ToolContext {
    pub store: Arc<tokio::sync::RwLock<CredentialStore>>,
    pub network: Arc<tokio::sync::RwLock<NetworkSelector>>,
    pub client: Arc<dyn WalletClient>,
}

impl ToolContext {
    pub fn new(
        store: CredentialStore,
        network: NetworkSelector,
        client: Arc<dyn WalletClient>,
    ) -> Self {
        Self {
            store: Arc::new(tokio::sync::RwLock::new(store)),
            network: Arc::new(tokio::sync::RwLock::new(network)),
            client,
        }
    }

    /// A context seeded with two accounts against the mock client. The
    /// first account has a usable AES key, the second is still pending
    /// its key exchange.
    pub fn mock() -> Self {
        let records = vec![
            Credential {
                address: "0x1111111111111111111111111111111111111111".to_string(),
                signing_key: "0xkey1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
                symmetric_key: "aeskey1aeskey1aeskey1aeskey1aeskey1".to_string(),
            },
            Credential {
                address: "0x2222222222222222222222222222222222222222".to_string(),
                signing_key: "0xkey2bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string(),
                symmetric_key: PENDING_AES_KEY.to_string(),
            },
        ];
        Self::new(
            CredentialStore::from_records(records, None),
            NetworkSelector::default(),
            Arc::new(MockWalletClient::new()),
        )
    }

    /// A context with no accounts, for exercising empty-registry paths.
    pub fn mock_empty() -> Self {
        Self::new(
            CredentialStore::new(),
            NetworkSelector::default(),
            Arc::new(MockWalletClient::new()),
        )
    }
}

/// Get all tool definitions
pub fn get_all_tools() -> Vec<Tool> {
    vec![
        accounts::list_accounts_definition(),
        accounts::create_account_definition(),
        accounts::change_default_account_definition(),
        accounts::generate_aes_key_definition(),
        accounts::export_accounts_definition(),
        accounts::import_accounts_definition(),
        network::get_current_network_definition(),
        network::switch_network_definition(),
        wallet::get_native_balance_definition(),
        wallet::transfer_native_definition(),
        wallet::sign_message_definition(),
        wallet::get_private_erc20_balance_definition(),
        encryption::encrypt_value_definition(),
        encryption::decrypt_value_definition(),
    ]
}

/// Argument shape for a tool name, `None` for unknown tools.
fn arg_spec(name: &str) -> Option<&'static ArgSpec> {
    match name {
        "list_accounts" => Some(&accounts::LIST_ACCOUNTS_ARGS),
        "create_account" => Some(&accounts::CREATE_ACCOUNT_ARGS),
        "change_default_account" => Some(&accounts::CHANGE_DEFAULT_ACCOUNT_ARGS),
        "generate_aes_key" => Some(&accounts::GENERATE_AES_KEY_ARGS),
        "export_accounts" => Some(&accounts::EXPORT_ACCOUNTS_ARGS),
        "import_accounts" => Some(&accounts::IMPORT_ACCOUNTS_ARGS),
        "get_current_network" => Some(&network::GET_CURRENT_NETWORK_ARGS),
        "switch_network" => Some(&network::SWITCH_NETWORK_ARGS),
        "get_native_balance" => Some(&wallet::GET_NATIVE_BALANCE_ARGS),
        "transfer_native" => Some(&wallet::TRANSFER_NATIVE_ARGS),
        "sign_message" => Some(&wallet::SIGN_MESSAGE_ARGS),
        "get_private_erc20_balance" => Some(&wallet::GET_PRIVATE_ERC20_BALANCE_ARGS),
        "encrypt_value" => Some(&encryption::ENCRYPT_VALUE_ARGS),
        "decrypt_value" => Some(&encryption::DECRYPT_VALUE_ARGS),
        _ => None,
    }
}

/// Execute a tool by name.
///
/// Every outcome is a tool envelope: unknown names and malformed
/// argument bags soft-fail with `is_error` set, and handler failures
/// carry the error message prefixed with `Error:`. The handler is never
/// invoked when shape validation fails.
pub async fn execute_tool(ctx: &ToolContext, name: &str, arguments: Value) -> ToolsCallResult {
    let Some(spec) = arg_spec(name) else {
        warn!(tool = name, "unknown tool requested");
        return ToolsCallResult::error(format!("Unknown tool: {}", name));
    };

    if let Err(reason) = spec.validate(&arguments) {
        warn!(tool = name, %reason, "argument shape rejected");
        return ToolsCallResult::error(format!("Invalid arguments for {}", name));
    }

    debug!(tool = name, "executing tool");
    match dispatch(ctx, name, arguments).await {
        Ok(result) => result,
        Err(e) => {
            warn!(tool = name, error = %e, "tool execution failed");
            ToolsCallResult::error(format!("Error: {}", e))
        }
    }
}

async fn dispatch(ctx: &ToolContext, name: &str, arguments: Value) -> Result<ToolsCallResult> {
    match name {
        "list_accounts" => accounts::list_accounts(ctx).await,
        "create_account" => accounts::create_account(ctx, params(arguments)?).await,
        "change_default_account" => {
            accounts::change_default_account(ctx, params(arguments)?).await
        }
        "generate_aes_key" => accounts::generate_aes_key(ctx, params(arguments)?).await,
        "export_accounts" => accounts::export_accounts(ctx, params(arguments)?).await,
        "import_accounts" => accounts::import_accounts(ctx, params(arguments)?).await,
        "get_current_network" => network::get_current_network(ctx).await,
        "switch_network" => network::switch_network(ctx, params(arguments)?).await,
        "get_native_balance" => wallet::get_native_balance(ctx, params(arguments)?).await,
        "transfer_native" => wallet::transfer_native(ctx, params(arguments)?).await,
        "sign_message" => wallet::sign_message(ctx, params(arguments)?).await,
        "get_private_erc20_balance" => {
            wallet::get_private_erc20_balance(ctx, params(arguments)?).await
        }
        "encrypt_value" => encryption::encrypt_value(ctx, params(arguments)?).await,
        "decrypt_value" => encryption::decrypt_value(ctx, params(arguments)?).await,
        // arg_spec gates the name before dispatch runs.
        other => Err(CotiError::InvalidArgument(format!("unknown tool {}", other))),
    }
}

/// Deserialize a handler's parameter struct from the validated bag.
///
/// Explicit `null` values for optional fields pass shape validation, so
/// they are dropped here before serde sees them.
fn params<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let cleaned = match arguments {
        Value::Object(map) => {
            Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect())
        }
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(cleaned)
        .map_err(|e| CotiError::InvalidArgument(format!("argument decode: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_tool_soft_fails() {
        let ctx = ToolContext::mock();
        let result = execute_tool(&ctx, "no_such_tool", json!({})).await;
        assert!(result.is_error());
        assert_eq!(result.text(), "Unknown tool: no_such_tool");
    }

    #[tokio::test]
    async fn test_shape_failure_never_reaches_handler() {
        let ctx = ToolContext::mock();
        let before = ctx.network.read().await.current();

        let result = execute_tool(&ctx, "switch_network", json!({ "network": 42 })).await;
        assert!(result.is_error());
        assert_eq!(result.text(), "Invalid arguments for switch_network");
        assert_eq!(ctx.network.read().await.current(), before);
    }

    #[tokio::test]
    async fn test_handler_error_gets_error_prefix() {
        let ctx = ToolContext::mock();
        let result = execute_tool(
            &ctx,
            "change_default_account",
            json!({ "account_address": "0xmissing" }),
        )
        .await;
        assert!(result.is_error());
        assert!(result.text().starts_with("Error: Account not found"));
    }

    #[tokio::test]
    async fn test_null_optional_field_is_tolerated() {
        let ctx = ToolContext::mock();
        let result = execute_tool(
            &ctx,
            "create_account",
            json!({ "set_as_default": null }),
        )
        .await;
        assert!(!result.is_error());
    }

    #[tokio::test]
    async fn test_every_definition_has_an_arg_spec() {
        for tool in get_all_tools() {
            assert!(
                arg_spec(&tool.name).is_some(),
                "missing arg spec for {}",
                tool.name
            );
        }
    }

    #[tokio::test]
    async fn test_tool_names_are_unique() {
        let tools = get_all_tools();
        let mut names: Vec<_> = tools.iter().map(|t| t.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }
}
