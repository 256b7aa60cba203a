//! Unit tests for NavigationStore against an in-memory SQLite database.

use navboard::database::Database;
use navboard::managers::navigation_store::{NavigationStore, NavigationStoreTrait};
use navboard::types::errors::StoreError;
use navboard::types::navigation::NewCard;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn card<'a>(menu_id: i64, sub_menu_id: Option<i64>, title: &'a str, url: &'a str) -> NewCard<'a> {
    NewCard {
        menu_id,
        sub_menu_id,
        title,
        url,
        description: "",
        order: 0,
    }
}

#[test]
fn test_create_and_find_menu_by_name() {
    let db = setup();
    let mut store = NavigationStore::new(db.connection());

    let id = store.create_menu("Dev", 0).unwrap();
    assert_eq!(store.find_menu_by_name("Dev").unwrap(), Some(id));
    assert_eq!(store.find_menu_by_name("dev").unwrap(), None);
    assert!(store.menu_exists(id).unwrap());
    assert!(!store.menu_exists(id + 100).unwrap());
}

#[test]
fn test_find_menu_by_name_prefers_oldest_duplicate() {
    let db = setup();
    let mut store = NavigationStore::new(db.connection());

    let first = store.create_menu("Dup", 0).unwrap();
    let _second = store.create_menu("Dup", 1).unwrap();
    assert_eq!(store.find_menu_by_name("Dup").unwrap(), Some(first));
}

#[test]
fn test_sub_menu_lookup_is_scoped_to_parent() {
    let db = setup();
    let mut store = NavigationStore::new(db.connection());

    let a = store.create_menu("A", 0).unwrap();
    let b = store.create_menu("B", 1).unwrap();
    let sub = store.create_sub_menu(a, "Tools", 0).unwrap();

    assert_eq!(store.find_sub_menu(a, "Tools").unwrap(), Some(sub));
    assert_eq!(store.find_sub_menu(b, "Tools").unwrap(), None);
}

#[test]
fn test_create_sub_menu_rejects_missing_parent() {
    let db = setup();
    let mut store = NavigationStore::new(db.connection());

    let err = store.create_sub_menu(42, "Orphan", 0).unwrap_err();
    assert!(matches!(err, StoreError::MenuNotFound(42)));
}

#[test]
fn test_insert_card_stores_null_logo_and_empty_description_as_none() {
    let db = setup();
    let mut store = NavigationStore::new(db.connection());

    let menu = store.create_menu("Dev", 0).unwrap();
    store.insert_card(&card(menu, None, "GitHub", "https://github.com")).unwrap();
    store
        .insert_card(&NewCard {
            description: "Docs",
            order: 1,
            ..card(menu, None, "Docs.rs", "https://docs.rs")
        })
        .unwrap();

    let cards = store.list_cards(menu, None).unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].title, "GitHub");
    assert_eq!(cards[0].logo_url, None);
    assert_eq!(cards[0].custom_logo_path, None);
    assert_eq!(cards[0].description, None);
    assert_eq!(cards[1].description.as_deref(), Some("Docs"));
    assert_eq!(cards[1].order, 1);
}

#[test]
fn test_list_cards_separates_direct_and_sub_menu_cards() {
    let db = setup();
    let mut store = NavigationStore::new(db.connection());

    let menu = store.create_menu("Dev", 0).unwrap();
    let sub = store.create_sub_menu(menu, "Rust", 0).unwrap();
    store.insert_card(&card(menu, None, "GitHub", "https://github.com")).unwrap();
    store.insert_card(&card(menu, Some(sub), "Book", "https://doc.rust-lang.org/book/")).unwrap();

    assert_eq!(store.list_cards(menu, None).unwrap().len(), 1);
    assert_eq!(store.list_cards(menu, Some(sub)).unwrap()[0].title, "Book");
    assert_eq!(store.list_menu_cards(menu).unwrap().len(), 2);
}

#[test]
fn test_clear_menu_removes_cards_and_sub_menus_only_for_that_menu() {
    let db = setup();
    let mut store = NavigationStore::new(db.connection());

    let dev = store.create_menu("Dev", 0).unwrap();
    let news = store.create_menu("News", 1).unwrap();
    let sub = store.create_sub_menu(dev, "Rust", 0).unwrap();
    store.insert_card(&card(dev, None, "GitHub", "https://github.com")).unwrap();
    store.insert_card(&card(dev, Some(sub), "Book", "https://doc.rust-lang.org/book/")).unwrap();
    store.insert_card(&card(news, None, "HN", "https://news.ycombinator.com")).unwrap();

    let (cards, sub_menus) = store.clear_menu(dev).unwrap();
    assert_eq!((cards, sub_menus), (2, 1));
    assert!(store.menu_exists(dev).unwrap());
    assert!(store.list_menu_cards(dev).unwrap().is_empty());
    assert!(store.list_sub_menus(dev).unwrap().is_empty());
    assert_eq!(store.list_menu_cards(news).unwrap().len(), 1);
}

#[test]
fn test_list_menus_sorted_by_order() {
    let db = setup();
    let mut store = NavigationStore::new(db.connection());

    store.create_menu("Second", 1).unwrap();
    store.create_menu("First", 0).unwrap();

    let names: Vec<String> = store.list_menus().unwrap().into_iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["First", "Second"]);
}
