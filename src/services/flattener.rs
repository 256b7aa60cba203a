//! Flattens a parsed bookmark tree into menu, sub-menu and card records.
//!
//! The persisted hierarchy has two levels. Top-level folders become menus,
//! their direct sub-folders become sub-menus, and anything nested deeper is
//! folded into its second-level ancestor: those folders vanish and their
//! links join the sub-menu's cards in depth-first order.

use crate::types::bookmark::{FolderNode, LinkNode};
use crate::types::navigation::{
    CardRecord, FlatImport, MenuRecord, SubMenuRecord, TempId, TempIdAllocator,
};

pub const DEFAULT_UNFILED_MENU_NAME: &str = "Bookmarks";

/// Turns a folder tree into flat records linked by temp ids.
pub struct Flattener {
    unfiled_menu_name: String,
}

impl Flattener {
    /// `unfiled_menu_name` names the menu that collects links found
    /// directly under the root, outside any folder.
    pub fn new(unfiled_menu_name: impl Into<String>) -> Self {
        Self {
            unfiled_menu_name: unfiled_menu_name.into(),
        }
    }

    /// Every link in `tree` yields exactly one card record.
    pub fn flatten(&self, tree: &FolderNode) -> FlatImport {
        let mut ids = TempIdAllocator::new();
        let mut flat = FlatImport::default();

        for folder in &tree.children {
            let menu_id = ids.allocate();
            flat.menus.push(MenuRecord {
                temp_id: menu_id,
                name: folder.name.clone(),
                order: folder.order,
            });

            for link in &folder.links {
                flat.cards.push(card_record(menu_id, None, link, link.order));
            }

            for sub in &folder.children {
                let sub_id = ids.allocate();
                flat.sub_menus.push(SubMenuRecord {
                    temp_id: sub_id,
                    menu_temp_id: menu_id,
                    name: sub.name.clone(),
                    order: sub.order,
                });

                let mut links = Vec::with_capacity(sub.link_count());
                collect_links(sub, &mut links);
                for (order, link) in links.into_iter().enumerate() {
                    flat.cards.push(card_record(menu_id, Some(sub_id), link, order));
                }
            }
        }

        if !tree.links.is_empty() {
            let menu_id = ids.allocate();
            flat.menus.push(MenuRecord {
                temp_id: menu_id,
                name: self.unfiled_menu_name.clone(),
                order: tree.children.len(),
            });
            for link in &tree.links {
                flat.cards.push(card_record(menu_id, None, link, link.order));
            }
        }

        flat
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(DEFAULT_UNFILED_MENU_NAME)
    }
}

/// Flattens with the default unfiled-menu name.
pub fn flatten(tree: &FolderNode) -> FlatImport {
    Flattener::default().flatten(tree)
}

/// Pre-order: a folder's own links, then each sub-folder's.
fn collect_links<'t>(folder: &'t FolderNode, out: &mut Vec<&'t LinkNode>) {
    out.extend(folder.links.iter());
    for child in &folder.children {
        collect_links(child, out);
    }
}

fn card_record(
    menu_temp_id: TempId,
    sub_menu_temp_id: Option<TempId>,
    link: &LinkNode,
    order: usize,
) -> CardRecord {
    CardRecord {
        menu_temp_id,
        sub_menu_temp_id,
        title: link.title.clone(),
        url: link.url.clone(),
        description: link.description.clone(),
        order,
    }
}
