//! Navigation database: connection handling and versioned schema migrations.
//!
//! ```no_run
//! use navboard::database::Database;
//! use navboard::managers::navigation_store::{NavigationStore, NavigationStoreTrait};
//!
//! let db = Database::open("navboard.db").expect("open navigation database");
//! let menus = NavigationStore::new(db.connection()).list_menus().expect("list menus");
//! println!("{} menus", menus.len());
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
