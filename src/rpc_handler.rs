//! RPC method handler for the Navboard JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! navigation store and the import service via the `App` struct.

use std::sync::Mutex;

use crate::app::App;
use crate::managers::navigation_store::{NavigationStore, NavigationStoreTrait};
use crate::services::import_service::{ImportRequest, ImportService};
use crate::services::settings_engine::SettingsEngineTrait;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};

/// Encode bytes to base64 string.
pub fn base64_encode(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decode base64 string to bytes.
pub fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    BASE64.decode(input).map_err(|e| format!("base64 decode error: {}", e))
}

/// Reads a policy field that may arrive as a string, bool or number.
fn field_as_string(params: &Value, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Builds an import request from `html` (plain text) or `file` (base64).
fn import_request(params: &Value) -> Result<ImportRequest, String> {
    let file = match (
        params.get("html").and_then(|v| v.as_str()),
        params.get("file").and_then(|v| v.as_str()),
    ) {
        (Some(html), _) => Some(html.as_bytes().to_vec()),
        (None, Some(encoded)) => Some(base64_decode(encoded)?),
        (None, None) => None,
    };

    Ok(ImportRequest {
        file,
        mode: field_as_string(params, "mode"),
        target: field_as_string(params, "target"),
        dry_run: field_as_string(params, "dryRun"),
    })
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
/// Import rejections are not RPC errors: they come back as
/// `{ok: false, status, error, errors?}` results.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Import ───
        "import.bookmarks" => {
            let request = import_request(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let settings = a.settings_engine.get_settings();
            let service = ImportService::new(a.db.connection(), settings);
            match service.import(&request) {
                Ok(response) => serde_json::to_value(response).map_err(|e| e.to_string()),
                Err(err) => {
                    let mut body = err.to_response();
                    body["status"] = json!(err.status_code());
                    Ok(body)
                }
            }
        }

        // ─── Navigation ───
        "menu.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = NavigationStore::new(a.db.connection());
            let menus = store.list_menus().map_err(|e| e.to_string())?;
            let mut arr = Vec::with_capacity(menus.len());
            for menu in menus {
                let subs = store.list_sub_menus(menu.id).map_err(|e| e.to_string())?;
                arr.push(json!({
                    "id": menu.id,
                    "name": menu.name,
                    "order": menu.order,
                    "subMenus": subs,
                }));
            }
            Ok(json!(arr))
        }
        "card.list" => {
            let menu_id = params
                .get("menu_id")
                .and_then(|v| v.as_i64())
                .ok_or("missing menu_id")?;
            let sub_menu_id = params.get("sub_menu_id").and_then(|v| v.as_i64());
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = NavigationStore::new(a.db.connection());
            let cards = store
                .list_cards(menu_id, sub_menu_id)
                .map_err(|e| e.to_string())?;
            serde_json::to_value(cards).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
