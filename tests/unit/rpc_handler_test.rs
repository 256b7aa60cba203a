//! Unit tests for the RPC handler: all JSON-RPC methods dispatched by `handle_method`.
//!
//! These tests exercise every RPC method through the same code path used by the
//! real `navboard-rpc` binary, using a temporary on-disk SQLite database.

use std::sync::Mutex;
use serde_json::json;
use tempfile::TempDir;

use navboard::app::App;
use navboard::rpc_handler::{base64_decode, base64_encode, handle_method};

const TOOLS: &str = r#"<DL><p><DT><H3>Tools</H3><DL><p>
    <DT><A HREF="https://a.com">A</A>
    <DT><A HREF="">B</A>
    <DT><H3>CLI</H3><DL><p><DT><A HREF="https://c.com">C</A></DL><p>
</DL><p></DL><p>"#;

/// Create a fresh App backed by a temp directory DB and settings file.
fn setup() -> (Mutex<App>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let db_path = tmp.path().join("test.db");
    let settings_path = tmp.path().join("settings.json");
    let app = App::open(
        db_path.to_str().unwrap(),
        Some(settings_path.to_string_lossy().to_string()),
    )
    .expect("Failed to init App");
    (Mutex::new(app), tmp)
}

// ─── Ping ───

#[test]
fn test_ping() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "ping", &json!({})).unwrap();
    assert_eq!(res, json!({"pong": true}));
}

// ─── Unknown method ───

#[test]
fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "nonexistent.method", &json!({}));
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Import ───

#[test]
fn test_import_dry_run_from_html() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "import.bookmarks", &json!({
        "html": TOOLS,
        "dryRun": true
    })).unwrap();

    assert_eq!(res["ok"], true);
    assert_eq!(res["dryRun"], true);
    assert_eq!(res["created"]["menus"], 1);
    assert_eq!(res["created"]["subMenus"], 1);
    assert_eq!(res["created"]["cards"], 3);
    assert_eq!(res["errors"].as_array().unwrap().len(), 1);

    let menus = handle_method(&app, "menu.list", &json!({})).unwrap();
    assert!(menus.as_array().unwrap().is_empty());
}

#[test]
fn test_import_from_base64_file_then_list() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "import.bookmarks", &json!({
        "file": base64_encode(TOOLS.as_bytes()),
        "mode": "merge",
        "dryRun": "false"
    })).unwrap();
    assert_eq!(res["created"]["cards"], 3);
    assert_eq!(res["sample"][0]["url"], "https://a.com");

    let menus = handle_method(&app, "menu.list", &json!({})).unwrap();
    let arr = menus.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["name"], "Tools");
    assert_eq!(arr[0]["subMenus"][0]["name"], "CLI");

    let menu_id = arr[0]["id"].as_i64().unwrap();
    let sub_id = arr[0]["subMenus"][0]["id"].as_i64().unwrap();
    let direct = handle_method(&app, "card.list", &json!({"menu_id": menu_id})).unwrap();
    assert_eq!(direct.as_array().unwrap().len(), 2);
    let nested = handle_method(&app, "card.list", &json!({
        "menu_id": menu_id,
        "sub_menu_id": sub_id
    })).unwrap();
    assert_eq!(nested[0]["title"], "C");
}

#[test]
fn test_import_rejection_is_a_result_with_status() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "import.bookmarks", &json!({
        "html": TOOLS,
        "target": "menu:999"
    })).unwrap();
    assert_eq!(res["ok"], false);
    assert_eq!(res["status"], 404);
    assert_eq!(res["error"], "Target menu not found: 999");
}

#[test]
fn test_import_without_file_is_400() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "import.bookmarks", &json!({})).unwrap();
    assert_eq!(res["status"], 400);
    assert_eq!(res["error"], "No bookmark file provided");
}

#[test]
fn test_import_with_bad_base64_is_rpc_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "import.bookmarks", &json!({"file": "***"}));
    assert!(res.unwrap_err().contains("base64"));
}

#[test]
fn test_card_list_requires_menu_id() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "card.list", &json!({}));
    assert_eq!(res.unwrap_err(), "missing menu_id");
}

#[test]
fn test_base64_roundtrip() {
    let encoded = base64_encode(b"<DL></DL>");
    assert_eq!(base64_decode(&encoded).unwrap(), b"<DL></DL>".to_vec());
}
