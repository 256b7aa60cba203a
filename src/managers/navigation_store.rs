//! Navigation store for Navboard.
//!
//! Implements `NavigationStoreTrait`, the lookups and writes the import
//! reconciler needs against menus, sub-menus and cards, backed by SQLite via
//! `rusqlite`.

use rusqlite::{params, Connection, OptionalExtension};

use crate::types::errors::StoreError;
use crate::types::navigation::{Card, Menu, NewCard, SubMenu};

const CARD_COLUMNS: &str =
    r#"id, menu_id, sub_menu_id, title, url, logo_url, custom_logo_path, "desc", "order""#;

/// Access to persisted navigation data.
pub trait NavigationStoreTrait {
    /// Returns the id of the oldest menu with exactly this name.
    fn find_menu_by_name(&self, name: &str) -> Result<Option<i64>, StoreError>;
    fn menu_exists(&self, id: i64) -> Result<bool, StoreError>;
    fn create_menu(&mut self, name: &str, order: i64) -> Result<i64, StoreError>;
    /// Returns the id of the oldest sub-menu with this name under `parent_id`.
    fn find_sub_menu(&self, parent_id: i64, name: &str) -> Result<Option<i64>, StoreError>;
    fn create_sub_menu(&mut self, parent_id: i64, name: &str, order: i64) -> Result<i64, StoreError>;
    /// Every card under a menu, whether attached directly or through one of its sub-menus.
    fn list_menu_cards(&self, menu_id: i64) -> Result<Vec<Card>, StoreError>;
    fn insert_card(&mut self, card: &NewCard<'_>) -> Result<i64, StoreError>;
    /// Deletes every card and sub-menu under a menu. Returns (cards, sub-menus) removed.
    fn clear_menu(&mut self, menu_id: i64) -> Result<(usize, usize), StoreError>;
    fn list_menus(&self) -> Result<Vec<Menu>, StoreError>;
    fn list_sub_menus(&self, menu_id: i64) -> Result<Vec<SubMenu>, StoreError>;
    /// Cards shown on one page: directly under the menu, or under one sub-menu.
    fn list_cards(&self, menu_id: i64, sub_menu_id: Option<i64>) -> Result<Vec<Card>, StoreError>;
}

/// Navigation store backed by a SQLite connection.
pub struct NavigationStore<'a> {
    conn: &'a Connection,
}

impl<'a> NavigationStore<'a> {
    /// Creates a new `NavigationStore` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<Card> {
        Ok(Card {
            id: row.get(0)?,
            menu_id: row.get(1)?,
            sub_menu_id: row.get(2)?,
            title: row.get(3)?,
            url: row.get(4)?,
            logo_url: row.get(5)?,
            custom_logo_path: row.get(6)?,
            description: row.get(7)?,
            order: row.get(8)?,
        })
    }

    fn query_cards(&self, sql: &str, id: i64) -> Result<Vec<Card>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![id], Self::row_to_card)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

impl<'a> NavigationStoreTrait for NavigationStore<'a> {
    fn find_menu_by_name(&self, name: &str) -> Result<Option<i64>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM menus WHERE name = ?1 ORDER BY id LIMIT 1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn menu_exists(&self, id: i64) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM menus WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn create_menu(&mut self, name: &str, order: i64) -> Result<i64, StoreError> {
        self.conn.execute(
            r#"INSERT INTO menus (name, "order") VALUES (?1, ?2)"#,
            params![name, order],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_sub_menu(&self, parent_id: i64, name: &str) -> Result<Option<i64>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM sub_menus WHERE parent_id = ?1 AND name = ?2 ORDER BY id LIMIT 1",
                params![parent_id, name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn create_sub_menu(&mut self, parent_id: i64, name: &str, order: i64) -> Result<i64, StoreError> {
        if !self.menu_exists(parent_id)? {
            return Err(StoreError::MenuNotFound(parent_id));
        }
        self.conn.execute(
            r#"INSERT INTO sub_menus (parent_id, name, "order") VALUES (?1, ?2, ?3)"#,
            params![parent_id, name, order],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_menu_cards(&self, menu_id: i64) -> Result<Vec<Card>, StoreError> {
        let sql = format!(
            "SELECT {} FROM cards \
             WHERE menu_id = ?1 OR sub_menu_id IN (SELECT id FROM sub_menus WHERE parent_id = ?1) \
             ORDER BY id",
            CARD_COLUMNS
        );
        self.query_cards(&sql, menu_id)
    }

    fn insert_card(&mut self, card: &NewCard<'_>) -> Result<i64, StoreError> {
        let description = if card.description.is_empty() {
            None
        } else {
            Some(card.description)
        };
        self.conn.execute(
            r#"INSERT INTO cards (menu_id, sub_menu_id, title, url, logo_url, custom_logo_path, "desc", "order")
               VALUES (?1, ?2, ?3, ?4, NULL, NULL, ?5, ?6)"#,
            params![
                card.menu_id,
                card.sub_menu_id,
                card.title,
                card.url,
                description,
                card.order
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn clear_menu(&mut self, menu_id: i64) -> Result<(usize, usize), StoreError> {
        let cards = self.conn.execute(
            "DELETE FROM cards \
             WHERE menu_id = ?1 OR sub_menu_id IN (SELECT id FROM sub_menus WHERE parent_id = ?1)",
            params![menu_id],
        )?;
        let sub_menus = self
            .conn
            .execute("DELETE FROM sub_menus WHERE parent_id = ?1", params![menu_id])?;
        Ok((cards, sub_menus))
    }

    fn list_menus(&self) -> Result<Vec<Menu>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(r#"SELECT id, name, "order" FROM menus ORDER BY "order", id"#)?;
        let rows = stmt.query_map([], |row| {
            Ok(Menu {
                id: row.get(0)?,
                name: row.get(1)?,
                order: row.get(2)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn list_sub_menus(&self, menu_id: i64) -> Result<Vec<SubMenu>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, parent_id, name, "order" FROM sub_menus WHERE parent_id = ?1 ORDER BY "order", id"#,
        )?;
        let rows = stmt.query_map(params![menu_id], |row| {
            Ok(SubMenu {
                id: row.get(0)?,
                parent_id: row.get(1)?,
                name: row.get(2)?,
                order: row.get(3)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn list_cards(&self, menu_id: i64, sub_menu_id: Option<i64>) -> Result<Vec<Card>, StoreError> {
        match sub_menu_id {
            Some(sid) => {
                let sql = format!(
                    r#"SELECT {} FROM cards WHERE sub_menu_id = ?1 ORDER BY "order", id"#,
                    CARD_COLUMNS
                );
                self.query_cards(&sql, sid)
            }
            None => {
                let sql = format!(
                    r#"SELECT {} FROM cards WHERE menu_id = ?1 AND sub_menu_id IS NULL ORDER BY "order", id"#,
                    CARD_COLUMNS
                );
                self.query_cards(&sql, menu_id)
            }
        }
    }
}
