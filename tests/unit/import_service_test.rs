//! Unit tests for the import service: validation, pipeline and commit behavior.

use navboard::database::Database;
use navboard::managers::navigation_store::{NavigationStore, NavigationStoreTrait};
use navboard::services::import_service::{ImportRequest, ImportService};
use navboard::types::errors::ImportError;
use navboard::types::settings::ImportSettings;

const FIXTURE: &str = include_str!("../fixtures/bookmarks.html");

const TOOLS: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<DL><p>
    <DT><H3>Tools</H3>
    <DL><p>
        <DT><A HREF="https://a.com">A</A>
        <DT><A HREF="">B</A>
    </DL><p>
</DL><p>"#;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn count(db: &Database, table: &str) -> i64 {
    db.connection()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .expect("count rows")
}

fn import(db: &Database, request: ImportRequest) -> Result<navboard::types::import::ImportResponse, ImportError> {
    let settings = ImportSettings::default();
    ImportService::new(db.connection(), &settings).import(&request)
}

// ─── Validation ───

#[test]
fn test_missing_file_is_rejected() {
    let db = setup();
    let err = import(&db, ImportRequest::default()).unwrap_err();
    assert!(matches!(err, ImportError::MissingFile));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_oversized_file_is_rejected_with_413() {
    let db = setup();
    let settings = ImportSettings {
        max_file_bytes: 16,
        ..ImportSettings::default()
    };
    let err = ImportService::new(db.connection(), &settings)
        .import(&ImportRequest::new(TOOLS))
        .unwrap_err();
    assert!(matches!(err, ImportError::FileTooLarge { limit: 16, .. }));
    assert_eq!(err.status_code(), 413);
}

#[test]
fn test_blank_file_is_rejected() {
    let db = setup();
    let err = import(&db, ImportRequest::new(" \n\t ")).unwrap_err();
    assert!(matches!(err, ImportError::EmptyContent));
}

#[test]
fn test_non_utf8_file_is_rejected() {
    let db = setup();
    let err = import(&db, ImportRequest::new(vec![0x3c, 0xff, 0xfe, 0x3e])).unwrap_err();
    assert!(matches!(err, ImportError::Unreadable(_)));
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let db = setup();
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(TOOLS.as_bytes());
    let response = import(&db, ImportRequest::new(bytes)).unwrap();
    assert_eq!(response.created.menus, 1);
}

#[test]
fn test_invalid_policy_fields_are_rejected() {
    let db = setup();

    let err = import(&db, ImportRequest::new(TOOLS).mode("upsert")).unwrap_err();
    assert!(matches!(err, ImportError::InvalidMode(_)));

    let err = import(&db, ImportRequest::new(TOOLS).target("menu:abc")).unwrap_err();
    assert!(matches!(err, ImportError::InvalidTarget(_)));

    let request = ImportRequest {
        dry_run: Some("maybe".to_string()),
        ..ImportRequest::new(TOOLS)
    };
    let err = import(&db, request).unwrap_err();
    assert!(matches!(err, ImportError::InvalidFlag(_)));

    assert_eq!(count(&db, "menus"), 0);
}

#[test]
fn test_document_without_bookmarks_is_rejected_with_parse_errors() {
    let db = setup();
    let err = import(&db, ImportRequest::new("<p>hello</p></DL>")).unwrap_err();
    match err {
        ImportError::NothingToImport { ref errors } => {
            assert_eq!(errors, &vec!["Unmatched </DL> ignored".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ─── Pipeline ───

#[test]
fn test_dry_run_reports_counts_and_parse_errors_without_writing() {
    let db = setup();
    let response = import(&db, ImportRequest::new(TOOLS).dry_run(true)).unwrap();

    assert!(response.ok);
    assert!(response.dry_run);
    assert_eq!(response.created.menus, 1);
    assert_eq!(response.created.cards, 2);
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].contains("\"B\""));
    assert_eq!(count(&db, "menus"), 0);
    assert_eq!(count(&db, "cards"), 0);
}

#[test]
fn test_commit_keeps_cards_with_rejected_urls() {
    let db = setup();
    let response = import(&db, ImportRequest::new(TOOLS)).unwrap();
    assert!(!response.dry_run);
    assert_eq!(response.created.cards, 2);

    let store = NavigationStore::new(db.connection());
    let menu = store.find_menu_by_name("Tools").unwrap().unwrap();
    let urls: Vec<String> = store.list_cards(menu, None).unwrap().into_iter().map(|c| c.url).collect();
    assert_eq!(urls, vec!["https://a.com".to_string(), String::new()]);
}

#[test]
fn test_fixture_import_and_reimport() {
    let db = setup();

    let first = import(&db, ImportRequest::new(FIXTURE)).unwrap();
    assert_eq!(first.created.menus, 3);
    assert_eq!(first.created.sub_menus, 2);
    assert_eq!(first.created.cards, 9);
    assert_eq!(first.errors.len(), 1);
    assert_eq!(first.sample.len(), 5);
    assert_eq!(first.sample[0].title, "GitHub");

    let second = import(&db, ImportRequest::new(FIXTURE)).unwrap();
    assert_eq!(second.created.menus, 0);
    assert_eq!(second.created.sub_menus, 0);
    assert_eq!(second.created.cards, 0);
    assert_eq!(second.skipped.cards, 9);
    assert_eq!(count(&db, "cards"), 9);
}

#[test]
fn test_root_links_land_in_unfiled_menu() {
    let db = setup();
    import(&db, ImportRequest::new(FIXTURE)).unwrap();

    let store = NavigationStore::new(db.connection());
    let menus = store.list_menus().unwrap();
    assert_eq!(menus.last().map(|m| m.name.as_str()), Some("Bookmarks"));
}

#[test]
fn test_missing_target_menu_is_404_without_side_effects() {
    let db = setup();
    let err = import(&db, ImportRequest::new(TOOLS).target("menu:999")).unwrap_err();
    assert!(matches!(err, ImportError::TargetMenuNotFound(999)));
    assert_eq!(err.status_code(), 404);
    assert_eq!(count(&db, "menus"), 0);
    assert_eq!(count(&db, "sub_menus"), 0);
    assert_eq!(count(&db, "cards"), 0);
}

#[test]
fn test_bare_id_target_is_accepted() {
    let db = setup();
    let target = NavigationStore::new(db.connection()).create_menu("Inbox", 0).unwrap();
    let response = import(&db, ImportRequest::new(TOOLS).target(&target.to_string())).unwrap();
    assert_eq!(response.skipped.menus, 1);
    assert_eq!(response.created.cards, 2);
}

// ─── Commit atomicity ───

fn install_failing_trigger(db: &Database) {
    db.connection()
        .execute_batch(
            "CREATE TRIGGER fail_on_boom BEFORE INSERT ON cards
             WHEN NEW.url = 'https://boom.com'
             BEGIN SELECT RAISE(ABORT, 'boom'); END;",
        )
        .expect("create trigger");
}

const FAILING: &str = r#"<DL><DT><H3>Dev</H3><DL>
    <DT><A HREF="https://ok.com">Ok</A>
    <DT><A HREF="https://boom.com">Boom</A>
</DL></DL>"#;

#[test]
fn test_atomic_commit_rolls_back_on_storage_failure() {
    let db = setup();
    install_failing_trigger(&db);

    let err = import(&db, ImportRequest::new(FAILING)).unwrap_err();
    assert!(matches!(err, ImportError::Storage(_)));
    assert_eq!(err.status_code(), 500);
    assert_eq!(count(&db, "menus"), 0);
    assert_eq!(count(&db, "cards"), 0);
}

#[test]
fn test_non_atomic_commit_keeps_partial_writes() {
    let db = setup();
    install_failing_trigger(&db);
    let settings = ImportSettings {
        atomic_commit: false,
        ..ImportSettings::default()
    };

    let err = ImportService::new(db.connection(), &settings)
        .import(&ImportRequest::new(FAILING))
        .unwrap_err();
    assert!(matches!(err, ImportError::Storage(_)));
    assert_eq!(count(&db, "menus"), 1);
    assert_eq!(count(&db, "cards"), 1);
}
