//! Wallet tools backed by the blockchain client
//!
//! Balance reads, native transfers, message signing, and private ERC20
//! balance reads. Each tool resolves its acting account through the
//! registry (explicit address, else the default) and hands the signing
//! key to the [`coti_core::client::WalletClient`] seam.

use serde::Deserialize;
use serde_json::json;

use coti_core::error::{CotiError, Result};

use super::schema::{ArgSpec, Field, FieldKind};
use super::ToolContext;
use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};

// ---------------------------------------------------------------------------
// get_native_balance

#[derive(Debug, Default, Deserialize)]
pub struct GetNativeBalanceParams {
    #[serde(default)]
    pub account_address: Option<String>,
}

pub const GET_NATIVE_BALANCE_ARGS: ArgSpec =
    ArgSpec::new(&[Field::optional("account_address", FieldKind::String)]);

pub fn get_native_balance_definition() -> Tool {
    Tool {
        name: "get_native_balance".to_string(),
        title: Some("Get Native Balance".to_string()),
        description: "Get the native COTI balance of an account in wei. Uses the \
             default account when no address is given."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "account_address": {
                    "type": "string",
                    "description": "Address of a registered account (default account when omitted)"
                }
            }
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(true),
        }),
    }
}

pub async fn get_native_balance(
    ctx: &ToolContext,
    params: GetNativeBalanceParams,
) -> Result<ToolsCallResult> {
    let credential = {
        let store = ctx.store.read().await;
        store.resolve(params.account_address.as_deref())?
    };

    let balance = ctx.client.get_balance(&credential.address).await?;

    let structured = json!({
        "address": credential.address,
        "balance_wei": balance.to_string()
    });
    Ok(ToolsCallResult::success_with_structured(
        format!("Balance of {}: {} wei", credential.address, balance),
        structured,
    ))
}

// ---------------------------------------------------------------------------
// transfer_native

#[derive(Debug, Deserialize)]
pub struct TransferNativeParams {
    pub recipient_address: String,

    /// Amount in wei, as a decimal string (wei values overflow JSON numbers)
    pub amount_wei: String,

    #[serde(default)]
    pub gas_limit: Option<String>,

    #[serde(default)]
    pub account_address: Option<String>,
}

pub const TRANSFER_NATIVE_ARGS: ArgSpec = ArgSpec::new(&[
    Field::required("recipient_address", FieldKind::String),
    Field::required("amount_wei", FieldKind::String),
    Field::optional("gas_limit", FieldKind::String),
    Field::optional("account_address", FieldKind::String),
]);

pub fn transfer_native_definition() -> Tool {
    Tool {
        name: "transfer_native".to_string(),
        title: Some("Transfer Native COTI".to_string()),
        description: "Send native COTI from a registered account to a recipient. \
             Amount is a decimal wei string."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "recipient_address": {
                    "type": "string",
                    "description": "Recipient address"
                },
                "amount_wei": {
                    "type": "string",
                    "description": "Amount to send, in wei (decimal string)"
                },
                "gas_limit": {
                    "type": "string",
                    "description": "Optional gas limit override (decimal string)"
                },
                "account_address": {
                    "type": "string",
                    "description": "Sending account (default account when omitted)"
                }
            },
            "required": ["recipient_address", "amount_wei"]
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(false),
            destructive_hint: Some(true),
            idempotent_hint: Some(false),
            open_world_hint: Some(true),
        }),
    }
}

pub async fn transfer_native(
    ctx: &ToolContext,
    params: TransferNativeParams,
) -> Result<ToolsCallResult> {
    let amount: u128 = params.amount_wei.trim().parse().map_err(|_| {
        CotiError::InvalidArgument(format!(
            "amount_wei '{}' is not a non-negative decimal integer",
            params.amount_wei
        ))
    })?;

    let gas_limit = match &params.gas_limit {
        Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
            CotiError::InvalidArgument(format!("gas_limit '{}' is not a decimal integer", raw))
        })?),
        None => None,
    };

    let credential = {
        let store = ctx.store.read().await;
        store.resolve(params.account_address.as_deref())?
    };

    let receipt = ctx
        .client
        .send_transaction(
            &credential.signing_key,
            &params.recipient_address,
            amount,
            gas_limit,
        )
        .await?;

    let text = format!(
        "✓ Transfer submitted\n\
         ├─ From: {}\n\
         ├─ To: {}\n\
         ├─ Amount: {} wei\n\
         └─ Tx hash: {}",
        credential.address, params.recipient_address, amount, receipt.hash
    );

    let structured = json!({
        "from": credential.address,
        "to": params.recipient_address,
        "amount_wei": amount.to_string(),
        "tx_hash": receipt.hash
    });
    Ok(ToolsCallResult::success_with_structured(text, structured))
}

// ---------------------------------------------------------------------------
// sign_message

#[derive(Debug, Deserialize)]
pub struct SignMessageParams {
    pub message: String,

    #[serde(default)]
    pub account_address: Option<String>,
}

pub const SIGN_MESSAGE_ARGS: ArgSpec = ArgSpec::new(&[
    Field::required("message", FieldKind::String),
    Field::optional("account_address", FieldKind::String),
]);

pub fn sign_message_definition() -> Tool {
    Tool {
        name: "sign_message".to_string(),
        title: Some("Sign Message".to_string()),
        description: "Sign an arbitrary message with a registered account's key."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Message to sign"
                },
                "account_address": {
                    "type": "string",
                    "description": "Signing account (default account when omitted)"
                }
            },
            "required": ["message"]
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(false),
        }),
    }
}

pub async fn sign_message(
    ctx: &ToolContext,
    params: SignMessageParams,
) -> Result<ToolsCallResult> {
    let credential = {
        let store = ctx.store.read().await;
        store.resolve(params.account_address.as_deref())?
    };

    let signature = ctx
        .client
        .sign_message(&credential.signing_key, &params.message)
        .await?;

    let structured = json!({
        "address": credential.address,
        "signature": signature
    });
    Ok(ToolsCallResult::success_with_structured(
        format!("✓ Signed by {}\n└─ Signature: {}", credential.address, signature),
        structured,
    ))
}

// ---------------------------------------------------------------------------
// get_private_erc20_balance

#[derive(Debug, Deserialize)]
pub struct GetPrivateErc20BalanceParams {
    pub token_address: String,

    #[serde(default)]
    pub account_address: Option<String>,
}

pub const GET_PRIVATE_ERC20_BALANCE_ARGS: ArgSpec = ArgSpec::new(&[
    Field::required("token_address", FieldKind::String),
    Field::optional("account_address", FieldKind::String),
]);

pub fn get_private_erc20_balance_definition() -> Tool {
    Tool {
        name: "get_private_erc20_balance".to_string(),
        title: Some("Get Private ERC20 Balance".to_string()),
        description: "Read a confidential ERC20 balance. The on-chain value is \
             encrypted; the account's AES key decrypts it, so the key exchange \
             must have been run for the account."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "token_address": {
                    "type": "string",
                    "description": "Private ERC20 token contract address"
                },
                "account_address": {
                    "type": "string",
                    "description": "Holder account (default account when omitted)"
                }
            },
            "required": ["token_address"]
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(true),
        }),
    }
}

pub async fn get_private_erc20_balance(
    ctx: &ToolContext,
    params: GetPrivateErc20BalanceParams,
) -> Result<ToolsCallResult> {
    let credential = {
        let store = ctx.store.read().await;
        store.resolve(params.account_address.as_deref())?
    };

    if !credential.has_aes_key() {
        return Err(CotiError::InvalidArgument(format!(
            "account {} has no AES key; run generate_aes_key first",
            credential.address
        )));
    }

    let result = ctx
        .client
        .call_contract(
            &credential.signing_key,
            &params.token_address,
            "balanceOf",
            &[json!(credential.address)],
        )
        .await?;

    let structured = json!({
        "token": params.token_address,
        "address": credential.address,
        "result": result
    });
    Ok(ToolsCallResult::success_with_structured(
        format!(
            "Private balance of {} on {}: {}",
            credential.address,
            params.token_address,
            result
                .get("value")
                .and_then(|v| v.as_str())
                .unwrap_or("<encrypted>")
        ),
        structured,
    ))
}
