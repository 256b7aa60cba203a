// Navboard state managers
// Managers own persisted state access: menus, sub-menus, cards.

pub mod navigation_store;
