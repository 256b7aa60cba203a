use std::fmt;

use serde::{Deserialize, Serialize};

// === Persisted entities ===

/// A top-level navigation category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: i64,
    pub name: String,
    pub order: i64,
}

/// A second-level category under a menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubMenu {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub order: i64,
}

/// A navigable link entry shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub menu_id: Option<i64>,
    pub sub_menu_id: Option<i64>,
    pub title: String,
    pub url: String,
    pub logo_url: Option<String>,
    pub custom_logo_path: Option<String>,
    pub description: Option<String>,
    pub order: i64,
}

/// Fields needed to insert a new card.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCard<'a> {
    pub menu_id: i64,
    pub sub_menu_id: Option<i64>,
    pub title: &'a str,
    pub url: &'a str,
    pub description: &'a str,
    pub order: i64,
}

// === Flattened import records ===

/// Identity of a flattened record, valid only within one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TempId(pub u32);

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tmp-{}", self.0)
    }
}

/// Hands out monotonically increasing temp ids for one import run.
#[derive(Debug, Default)]
pub struct TempIdAllocator {
    next: u32,
}

impl TempIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> TempId {
        let id = TempId(self.next);
        self.next += 1;
        id
    }
}

/// A top-level folder awaiting persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuRecord {
    pub temp_id: TempId,
    pub name: String,
    pub order: usize,
}

/// A second-level folder awaiting persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubMenuRecord {
    pub temp_id: TempId,
    pub menu_temp_id: TempId,
    pub name: String,
    pub order: usize,
}

/// A link awaiting persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub menu_temp_id: TempId,
    pub sub_menu_temp_id: Option<TempId>,
    pub title: String,
    pub url: String,
    pub description: String,
    pub order: usize,
}

/// The three flat collections produced by the flattener.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatImport {
    pub menus: Vec<MenuRecord>,
    pub sub_menus: Vec<SubMenuRecord>,
    pub cards: Vec<CardRecord>,
}

impl FlatImport {
    /// True when there is neither a menu nor a card to import.
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty() && self.cards.is_empty()
    }
}
