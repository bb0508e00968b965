//! Value encryption tools
//!
//! Encrypt and decrypt values under an account's AES key for
//! confidential contract interactions. Both tools require the acting
//! account to have completed the on-chain key exchange.

use serde::Deserialize;
use serde_json::json;

use coti_core::credentials::Credential;
use coti_core::error::{CotiError, Result};

use super::schema::{ArgSpec, Field, FieldKind};
use super::ToolContext;
use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};

async fn resolve_with_aes_key(ctx: &ToolContext, address: Option<&str>) -> Result<Credential> {
    let credential = {
        let store = ctx.store.read().await;
        store.resolve(address)?
    };
    if !credential.has_aes_key() {
        return Err(CotiError::InvalidArgument(format!(
            "account {} has no AES key; run generate_aes_key first",
            credential.address
        )));
    }
    Ok(credential)
}

// ---------------------------------------------------------------------------
// encrypt_value

#[derive(Debug, Deserialize)]
pub struct EncryptValueParams {
    pub message: String,
    pub contract_address: String,
    pub function_selector: String,

    #[serde(default)]
    pub account_address: Option<String>,
}

pub const ENCRYPT_VALUE_ARGS: ArgSpec = ArgSpec::new(&[
    Field::required("message", FieldKind::String),
    Field::required("contract_address", FieldKind::String),
    Field::required("function_selector", FieldKind::String),
    Field::optional("account_address", FieldKind::String),
]);

pub fn encrypt_value_definition() -> Tool {
    Tool {
        name: "encrypt_value".to_string(),
        title: Some("Encrypt Value".to_string()),
        description: "Encrypt a value under an account's AES key for a \
             confidential contract call. The ciphertext is bound to the \
             contract address and function selector."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Plaintext value to encrypt"
                },
                "contract_address": {
                    "type": "string",
                    "description": "Contract the ciphertext is destined for"
                },
                "function_selector": {
                    "type": "string",
                    "description": "4-byte function selector, 0x-prefixed"
                },
                "account_address": {
                    "type": "string",
                    "description": "Acting account (default account when omitted)"
                }
            },
            "required": ["message", "contract_address", "function_selector"]
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(false),
        }),
    }
}

pub async fn encrypt_value(
    ctx: &ToolContext,
    params: EncryptValueParams,
) -> Result<ToolsCallResult> {
    let credential = resolve_with_aes_key(ctx, params.account_address.as_deref()).await?;

    let ciphertext = ctx
        .client
        .encrypt_value(
            &credential.signing_key,
            &credential.symmetric_key,
            &params.message,
            &params.contract_address,
            &params.function_selector,
        )
        .await?;

    let structured = json!({
        "address": credential.address,
        "contract_address": params.contract_address,
        "function_selector": params.function_selector,
        "ciphertext": ciphertext
    });
    Ok(ToolsCallResult::success_with_structured(
        format!("✓ Encrypted for {}\n└─ Ciphertext: {}", params.contract_address, ciphertext),
        structured,
    ))
}

// ---------------------------------------------------------------------------
// decrypt_value

#[derive(Debug, Deserialize)]
pub struct DecryptValueParams {
    pub ciphertext: String,

    #[serde(default)]
    pub account_address: Option<String>,
}

pub const DECRYPT_VALUE_ARGS: ArgSpec = ArgSpec::new(&[
    Field::required("ciphertext", FieldKind::String),
    Field::optional("account_address", FieldKind::String),
]);

pub fn decrypt_value_definition() -> Tool {
    Tool {
        name: "decrypt_value".to_string(),
        title: Some("Decrypt Value".to_string()),
        description: "Decrypt a ciphertext previously produced under an \
             account's AES key."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "ciphertext": {
                    "type": "string",
                    "description": "Ciphertext to decrypt"
                },
                "account_address": {
                    "type": "string",
                    "description": "Acting account (default account when omitted)"
                }
            },
            "required": ["ciphertext"]
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(false),
        }),
    }
}

pub async fn decrypt_value(
    ctx: &ToolContext,
    params: DecryptValueParams,
) -> Result<ToolsCallResult> {
    let credential = resolve_with_aes_key(ctx, params.account_address.as_deref()).await?;

    let plaintext = ctx
        .client
        .decrypt_value(
            &credential.signing_key,
            &credential.symmetric_key,
            &params.ciphertext,
        )
        .await?;

    let structured = json!({
        "address": credential.address,
        "plaintext": plaintext
    });
    Ok(ToolsCallResult::success_with_structured(
        format!("✓ Decrypted value: {}", plaintext),
        structured,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_encrypt_then_decrypt_round_trips() {
        let ctx = ToolContext::mock();

        let encrypted = encrypt_value(
            &ctx,
            EncryptValueParams {
                message: "42".to_string(),
                contract_address: "0xcontract".to_string(),
                function_selector: "0xdeadbeef".to_string(),
                account_address: None,
            },
        )
        .await
        .unwrap();
        let ciphertext = encrypted.structured_content.unwrap()["ciphertext"]
            .as_str()
            .unwrap()
            .to_string();

        let decrypted = decrypt_value(
            &ctx,
            DecryptValueParams {
                ciphertext,
                account_address: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(
            decrypted.structured_content.unwrap()["plaintext"],
            json!("42")
        );
    }

    #[tokio::test]
    async fn test_encrypt_requires_aes_key() {
        let ctx = ToolContext::mock();
        let pending = {
            let store = ctx.store.read().await;
            store.list()[1].address.clone()
        };
        let result = encrypt_value(
            &ctx,
            EncryptValueParams {
                message: "42".to_string(),
                contract_address: "0xcontract".to_string(),
                function_selector: "0xdeadbeef".to_string(),
                account_address: Some(pending),
            },
        )
        .await;
        assert!(matches!(result, Err(CotiError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_decrypt_garbage_is_downstream_error() {
        let ctx = ToolContext::mock();
        let result = decrypt_value(
            &ctx,
            DecryptValueParams {
                ciphertext: "not-a-ciphertext".to_string(),
                account_address: None,
            },
        )
        .await;
        assert!(matches!(result, Err(CotiError::Downstream(_))));
    }
}
