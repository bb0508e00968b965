//! Account registry tools
//!
//! Listing, creation, default selection, AES key generation, and
//! export/import of the in-memory credential registry. Secrets only
//! leave the registry through `export_accounts` with
//! `include_private_keys=true`; every other surface is masked.

use serde::Deserialize;
use serde_json::json;

use coti_core::backup::BackupDocument;
use coti_core::credentials::mask;
use coti_core::error::Result;

use super::schema::{ArgSpec, Field, FieldKind};
use super::ToolContext;
use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};

// ---------------------------------------------------------------------------
// list_accounts

pub const LIST_ACCOUNTS_ARGS: ArgSpec = ArgSpec::EMPTY;

pub fn list_accounts_definition() -> Tool {
    Tool {
        name: "list_accounts".to_string(),
        title: Some("List Accounts".to_string()),
        description: "List all registered COTI accounts with masked keys. \
             The default account is marked."
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

pub async fn list_accounts(ctx: &ToolContext) -> Result<ToolsCallResult> {
    let store = ctx.store.read().await;
    let summaries = store.list();

    let mut text = format!("{} account(s) registered", summaries.len());
    for summary in &summaries {
        let marker = if summary.is_default { " [default]" } else { "" };
        text.push_str(&format!(
            "\n├─ {}{}\n│    private key: {}\n│    AES key: {}",
            summary.address, marker, summary.private_key, summary.aes_key
        ));
    }

    let structured = json!({ "accounts": summaries });
    Ok(ToolsCallResult::success_with_structured(text, structured))
}

// ---------------------------------------------------------------------------
// create_account

#[derive(Debug, Default, Deserialize)]
pub struct CreateAccountParams {
    #[serde(default)]
    pub set_as_default: bool,
}

pub const CREATE_ACCOUNT_ARGS: ArgSpec =
    ArgSpec::new(&[Field::optional("set_as_default", FieldKind::Bool)]);

pub fn create_account_definition() -> Tool {
    Tool {
        name: "create_account".to_string(),
        title: Some("Create Account".to_string()),
        description: "Generate a fresh keypair and register it as a new account. \
             The AES key stays pending until the account is funded and \
             generate_aes_key is run."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "set_as_default": {
                    "type": "boolean",
                    "default": false,
                    "description": "Make the new account the default"
                }
            }
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(false),
            destructive_hint: Some(false),
            idempotent_hint: Some(false),
            open_world_hint: Some(false),
        }),
    }
}

pub async fn create_account(
    ctx: &ToolContext,
    params: CreateAccountParams,
) -> Result<ToolsCallResult> {
    let mut store = ctx.store.write().await;
    let credential = store.create(ctx.client.as_ref(), params.set_as_default).await?;

    let text = format!(
        "✓ Account created: {}\n\
         ├─ Private key: {}\n\
         ├─ Default: {}\n\
         └─ AES key pending: fund the account, then run generate_aes_key",
        credential.address,
        mask(&credential.signing_key),
        params.set_as_default
    );

    let structured = json!({
        "address": credential.address,
        "is_default": params.set_as_default,
        "aes_key_pending": true
    });
    Ok(ToolsCallResult::success_with_structured(text, structured))
}

// ---------------------------------------------------------------------------
// change_default_account

#[derive(Debug, Deserialize)]
pub struct ChangeDefaultParams {
    pub account_address: String,
}

pub const CHANGE_DEFAULT_ACCOUNT_ARGS: ArgSpec =
    ArgSpec::new(&[Field::required("account_address", FieldKind::String)]);

pub fn change_default_account_definition() -> Tool {
    Tool {
        name: "change_default_account".to_string(),
        title: Some("Change Default Account".to_string()),
        description: "Point the default account at an already-registered address. \
             Tools that take an optional account_address use the default when \
             none is given."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "account_address": {
                    "type": "string",
                    "description": "Address of a registered account"
                }
            },
            "required": ["account_address"]
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(false),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(false),
        }),
    }
}

pub async fn change_default_account(
    ctx: &ToolContext,
    params: ChangeDefaultParams,
) -> Result<ToolsCallResult> {
    let mut store = ctx.store.write().await;
    store.change_default(&params.account_address)?;

    // change_default stores canonical casing, report that form.
    let canonical = store
        .default_address()
        .unwrap_or(params.account_address.as_str());
    Ok(ToolsCallResult::success(format!(
        "✓ Default account set to {}",
        canonical
    )))
}

// ---------------------------------------------------------------------------
// generate_aes_key

#[derive(Debug, Deserialize)]
pub struct GenerateAesKeyParams {
    pub account_address: String,
}

pub const GENERATE_AES_KEY_ARGS: ArgSpec =
    ArgSpec::new(&[Field::required("account_address", FieldKind::String)]);

pub fn generate_aes_key_definition() -> Tool {
    Tool {
        name: "generate_aes_key".to_string(),
        title: Some("Generate AES Key".to_string()),
        description: "Run the on-chain key exchange for an account and store the \
             resulting AES key. The account must be funded first."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "account_address": {
                    "type": "string",
                    "description": "Address of a registered account"
                }
            },
            "required": ["account_address"]
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(false),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(true),
        }),
    }
}

pub async fn generate_aes_key(
    ctx: &ToolContext,
    params: GenerateAesKeyParams,
) -> Result<ToolsCallResult> {
    let mut store = ctx.store.write().await;
    let key = store
        .generate_symmetric_key(ctx.client.as_ref(), &params.account_address)
        .await?;

    Ok(ToolsCallResult::success(format!(
        "✓ AES key generated for {}: {}",
        params.account_address,
        mask(&key)
    )))
}

// ---------------------------------------------------------------------------
// export_accounts

#[derive(Debug, Default, Deserialize)]
pub struct ExportAccountsParams {
    #[serde(default)]
    pub account_addresses: Option<Vec<String>>,

    #[serde(default)]
    pub include_private_keys: bool,
}

pub const EXPORT_ACCOUNTS_ARGS: ArgSpec = ArgSpec::new(&[
    Field::optional("account_addresses", FieldKind::StringArray),
    Field::optional("include_private_keys", FieldKind::Bool),
]);

pub fn export_accounts_definition() -> Tool {
    Tool {
        name: "export_accounts".to_string(),
        title: Some("Export Accounts".to_string()),
        description: "Export accounts as a backup document. Without \
             include_private_keys the secret fields are redacted and the \
             document cannot be imported."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "account_addresses": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Addresses to export; all accounts when omitted or unmatched"
                },
                "include_private_keys": {
                    "type": "boolean",
                    "default": false,
                    "description": "Include real secrets instead of redaction markers"
                }
            }
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(false),
        }),
    }
}

pub async fn export_accounts(
    ctx: &ToolContext,
    params: ExportAccountsParams,
) -> Result<ToolsCallResult> {
    let store = ctx.store.read().await;
    let document = store.export(
        params.account_addresses.as_deref(),
        params.include_private_keys,
    );

    let text = format!(
        "Exported {} account(s){}",
        document.accounts.len(),
        if params.include_private_keys {
            " with secrets"
        } else {
            " with secrets redacted"
        }
    );

    let structured = serde_json::to_value(&document)?;
    Ok(ToolsCallResult::success_with_structured(text, structured))
}

// ---------------------------------------------------------------------------
// import_accounts

#[derive(Debug, Deserialize)]
pub struct ImportAccountsParams {
    pub backup: serde_json::Value,

    #[serde(default)]
    pub merge: bool,

    #[serde(default)]
    pub default_account: Option<String>,
}

pub const IMPORT_ACCOUNTS_ARGS: ArgSpec = ArgSpec::new(&[
    Field::required("backup", FieldKind::Object),
    Field::optional("merge", FieldKind::Bool),
    Field::optional("default_account", FieldKind::String),
]);

pub fn import_accounts_definition() -> Tool {
    Tool {
        name: "import_accounts".to_string(),
        title: Some("Import Accounts".to_string()),
        description: "Import a backup document produced by export_accounts. With \
             merge, matching accounts are overwritten in place and new ones \
             appended; otherwise the registry is replaced wholesale. Redacted \
             documents are rejected without changing anything."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "backup": {
                    "type": "object",
                    "description": "Backup document as produced by export_accounts"
                },
                "merge": {
                    "type": "boolean",
                    "default": false,
                    "description": "Merge into the existing registry instead of replacing it"
                },
                "default_account": {
                    "type": "string",
                    "description": "Preferred default account after the import"
                }
            },
            "required": ["backup"]
        }),
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(false),
            destructive_hint: Some(true),
            idempotent_hint: Some(false),
            open_world_hint: Some(false),
        }),
    }
}

pub async fn import_accounts(
    ctx: &ToolContext,
    params: ImportAccountsParams,
) -> Result<ToolsCallResult> {
    let document: BackupDocument = serde_json::from_value(params.backup.clone())
        .map_err(|e| coti_core::error::CotiError::InvalidBackup(format!("malformed document: {}", e)))?;

    let mut store = ctx.store.write().await;
    let summary = store.import(&document, params.merge, params.default_account.as_deref())?;

    let text = format!(
        "✓ Imported {} account(s) ({} mode)\n\
         ├─ Accounts now registered: {}\n\
         └─ Default account: {}",
        summary.imported,
        if params.merge { "merge" } else { "replace" },
        summary.total_after,
        summary.default_address.as_deref().unwrap_or("unset")
    );

    let structured = serde_json::to_value(&summary)?;
    Ok(ToolsCallResult::success_with_structured(text, structured))
}
