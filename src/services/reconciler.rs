//! Merges flattened bookmark records into persisted navigation data.
//!
//! Every entity is either created or reused ("skipped"); nothing already
//! stored is ever updated. Resolution order: target menu, menus by name,
//! replace-mode cleanup, sub-menus by `(parent, name)`, then cards
//! deduplicated on `(menu, sub-menu, url)`.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::managers::navigation_store::NavigationStoreTrait;
use crate::types::errors::ImportError;
use crate::types::import::{ImportMode, ImportPolicy, ImportReport, ImportTarget, SampleCard};
use crate::types::navigation::{FlatImport, NewCard, TempId};

/// Deduplication key of a card: resolved menu, resolved sub-menu, url.
type CardKey = (i64, Option<i64>, String);

/// Applies one flattened import to a store under a policy.
pub struct Reconciler<'s, S: NavigationStoreTrait> {
    store: &'s mut S,
    policy: ImportPolicy,
    report: ImportReport,
    menu_ids: HashMap<TempId, i64>,
    sub_menu_ids: HashMap<TempId, i64>,
}

impl<'s, S: NavigationStoreTrait> Reconciler<'s, S> {
    pub fn new(store: &'s mut S, policy: ImportPolicy) -> Self {
        Self {
            store,
            policy,
            report: ImportReport::default(),
            menu_ids: HashMap::new(),
            sub_menu_ids: HashMap::new(),
        }
    }

    /// Runs the reconciliation and returns counts, resolution errors and a
    /// preview of the first `sample_size` cards.
    ///
    /// # Errors
    /// `TargetMenuNotFound` when a fixed target does not exist (checked before
    /// any write), `Storage` when the store fails.
    pub fn run(mut self, flat: &FlatImport, sample_size: usize) -> Result<ImportReport, ImportError> {
        self.report.sample = flat
            .cards
            .iter()
            .take(sample_size)
            .map(|c| SampleCard {
                title: c.title.clone(),
                url: c.url.clone(),
            })
            .collect();

        if let ImportTarget::Menu(id) = self.policy.target {
            if !self.store.menu_exists(id)? {
                return Err(ImportError::TargetMenuNotFound(id));
            }
        }

        if self.policy.dry_run {
            self.preview(flat)?;
        } else {
            let reused = self.resolve_menus(flat)?;
            if self.policy.mode == ImportMode::Replace {
                self.clear_menus(&reused)?;
            }
            self.resolve_sub_menus(flat)?;
            self.insert_cards(flat)?;
        }

        Ok(self.report)
    }

    /// Counts what a commit would do without writing anything.
    fn preview(&mut self, flat: &FlatImport) -> Result<(), ImportError> {
        let stats = &mut self.report.stats;
        match self.policy.target {
            ImportTarget::Menu(_) => stats.skipped.menus = flat.menus.len(),
            ImportTarget::Auto => {
                let mut planned: HashSet<&str> = HashSet::new();
                for menu in &flat.menus {
                    let exists = planned.contains(menu.name.as_str())
                        || self.store.find_menu_by_name(&menu.name)?.is_some();
                    if exists {
                        stats.skipped.menus += 1;
                    } else {
                        stats.created.menus += 1;
                        planned.insert(menu.name.as_str());
                    }
                }
            }
        }
        stats.created.sub_menus = flat.sub_menus.len();
        stats.created.cards = flat.cards.len();
        Ok(())
    }

    /// Maps every menu record to a persisted id. Returns the ids of menus
    /// that already existed before this run, in first-seen order.
    fn resolve_menus(&mut self, flat: &FlatImport) -> Result<Vec<i64>, ImportError> {
        let mut reused = Vec::new();

        if let ImportTarget::Menu(target) = self.policy.target {
            for menu in &flat.menus {
                self.menu_ids.insert(menu.temp_id, target);
                self.report.stats.skipped.menus += 1;
            }
            reused.push(target);
            return Ok(reused);
        }

        let mut created_now = HashSet::new();
        for menu in &flat.menus {
            let id = match self.store.find_menu_by_name(&menu.name)? {
                Some(id) => {
                    self.report.stats.skipped.menus += 1;
                    if !created_now.contains(&id) && !reused.contains(&id) {
                        reused.push(id);
                    }
                    id
                }
                None => {
                    let id = self.store.create_menu(&menu.name, menu.order as i64)?;
                    debug!(menu_id = id, name = %menu.name, "created menu");
                    created_now.insert(id);
                    self.report.stats.created.menus += 1;
                    id
                }
            };
            self.menu_ids.insert(menu.temp_id, id);
        }
        Ok(reused)
    }

    fn clear_menus(&mut self, menu_ids: &[i64]) -> Result<(), ImportError> {
        for &menu_id in menu_ids {
            let (cards, sub_menus) = self.store.clear_menu(menu_id)?;
            info!(menu_id, cards, sub_menus, "cleared menu before replace");
        }
        Ok(())
    }

    fn resolve_sub_menus(&mut self, flat: &FlatImport) -> Result<(), ImportError> {
        for sub in &flat.sub_menus {
            let Some(&menu_id) = self.menu_ids.get(&sub.menu_temp_id) else {
                self.resolution_error(format!(
                    "Sub-menu \"{}\" skipped: its menu could not be resolved",
                    sub.name
                ));
                continue;
            };

            let id = match self.store.find_sub_menu(menu_id, &sub.name)? {
                Some(id) => {
                    self.report.stats.skipped.sub_menus += 1;
                    id
                }
                None => {
                    let id = self.store.create_sub_menu(menu_id, &sub.name, sub.order as i64)?;
                    debug!(sub_menu_id = id, menu_id, name = %sub.name, "created sub-menu");
                    self.report.stats.created.sub_menus += 1;
                    id
                }
            };
            self.sub_menu_ids.insert(sub.temp_id, id);
        }
        Ok(())
    }

    /// Loads the dedup keys of every card already stored under the menus
    /// this import touches.
    fn existing_card_keys(&self) -> Result<HashSet<CardKey>, ImportError> {
        let menu_ids: BTreeSet<i64> = self.menu_ids.values().copied().collect();
        let mut keys = HashSet::new();
        for menu_id in menu_ids {
            for card in self.store.list_menu_cards(menu_id)? {
                keys.insert((menu_id, card.sub_menu_id, card.url));
            }
        }
        Ok(keys)
    }

    fn insert_cards(&mut self, flat: &FlatImport) -> Result<(), ImportError> {
        let mut seen = self.existing_card_keys()?;

        for card in &flat.cards {
            let Some(&menu_id) = self.menu_ids.get(&card.menu_temp_id) else {
                self.resolution_error(format!(
                    "Card \"{}\" skipped: its menu could not be resolved",
                    card.title
                ));
                continue;
            };

            let sub_menu_id = match card.sub_menu_temp_id {
                None => None,
                Some(temp) => match self.sub_menu_ids.get(&temp) {
                    Some(&id) => Some(id),
                    None => {
                        self.resolution_error(format!(
                            "Card \"{}\" skipped: its sub-menu could not be resolved",
                            card.title
                        ));
                        continue;
                    }
                },
            };

            if !seen.insert((menu_id, sub_menu_id, card.url.clone())) {
                self.report.stats.skipped.cards += 1;
                continue;
            }

            self.store.insert_card(&NewCard {
                menu_id,
                sub_menu_id,
                title: &card.title,
                url: &card.url,
                description: &card.description,
                order: card.order as i64,
            })?;
            self.report.stats.created.cards += 1;
        }
        Ok(())
    }

    fn resolution_error(&mut self, message: String) {
        warn!(error = %message, "import entity skipped");
        self.report.errors.push(message);
    }
}

/// Reconciles `flat` into `store` under `policy`.
pub fn reconcile<S: NavigationStoreTrait>(
    flat: &FlatImport,
    policy: ImportPolicy,
    store: &mut S,
    sample_size: usize,
) -> Result<ImportReport, ImportError> {
    Reconciler::new(store, policy).run(flat, sample_size)
}
