//! Local edit state for CS note pairs
//!
//! Every product-level note and every variant-level note is an independent
//! instance of the same flow: the view holds drafts seeded from the server
//! values, tracks edit mode and dirtiness locally, and only a save/delete
//! actually round-trips. The registry is keyed by `(productId, variantId?)`
//! where an absent variant id addresses the product's own note pair.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::domain::product::{NoteUpdateRequest, Product};

type NoteKey = (String, Option<String>);

/// Edit state of one note pair
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NoteEditState {
    pub is_editing: bool,
    pub draft_important: String,
    pub draft_special: String,
    /// Last known server values, the dirty-check baseline
    pub baseline_important: String,
    pub baseline_special: String,
}

impl NoteEditState {
    fn seeded(important: &str, special: &str) -> Self {
        Self {
            is_editing: false,
            draft_important: important.to_owned(),
            draft_special: special.to_owned(),
            baseline_important: important.to_owned(),
            baseline_special: special.to_owned(),
        }
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft_important != self.baseline_important
            || self.draft_special != self.baseline_special
    }
}

/// Outcome of a save attempt, decided before anything hits the network
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Neither draft differs from the server baseline; surface a notice
    NoChanges,
    /// Submit this request, then call [`NoteEditRegistry::mark_saved`]
    Submit(NoteUpdateRequest),
}

/// Registry of per-note edit states for the currently rendered result set
#[derive(Debug, Default)]
pub struct NoteEditRegistry {
    entries: HashMap<NoteKey, NoteEditState>,
}

impl NoteEditRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed (or re-seed) states from a fresh page of search results.
    ///
    /// An idle view follows the server: baseline AND drafts are replaced.
    /// A view in edit mode keeps its drafts; only the baseline moves, so
    /// the user's in-progress text never vanishes under them.
    pub fn seed_from_products(&mut self, products: &[Product]) {
        for product in products {
            self.seed(
                product.product_id.clone(),
                None,
                product.cs_important_note.as_deref().unwrap_or_default(),
                product.cs_special_point.as_deref().unwrap_or_default(),
            );
            for variant in &product.variants {
                self.seed(
                    product.product_id.clone(),
                    Some(variant.id.clone()),
                    variant.cs_important_note.as_deref().unwrap_or_default(),
                    variant.cs_special_point.as_deref().unwrap_or_default(),
                );
            }
        }
    }

    fn seed(
        &mut self,
        product_id: String,
        variant_id: Option<String>,
        important: &str,
        special: &str,
    ) {
        let entry = self
            .entries
            .entry((product_id, variant_id))
            .or_insert_with(|| NoteEditState::seeded(important, special));
        entry.baseline_important = important.to_owned();
        entry.baseline_special = special.to_owned();
        if !entry.is_editing {
            entry.draft_important = important.to_owned();
            entry.draft_special = special.to_owned();
        }
    }

    /// Snapshot for rendering; an unknown key reads as a pristine idle state
    #[must_use]
    pub fn state_for(&self, product_id: &str, variant_id: Option<&str>) -> NoteEditState {
        self.entries
            .get(&(product_id.to_owned(), variant_id.map(str::to_owned)))
            .cloned()
            .unwrap_or_default()
    }

    pub fn begin_edit(&mut self, product_id: &str, variant_id: Option<&str>) {
        self.entry_mut(product_id, variant_id).is_editing = true;
    }

    pub fn update_drafts(
        &mut self,
        product_id: &str,
        variant_id: Option<&str>,
        important: String,
        special: String,
    ) {
        let entry = self.entry_mut(product_id, variant_id);
        entry.draft_important = important;
        entry.draft_special = special;
    }

    /// Decide whether a save should submit. Empty drafts are transmitted as
    /// unset, matching the query convention for note fields.
    #[must_use]
    pub fn save(&mut self, product_id: &str, variant_id: Option<&str>) -> SaveOutcome {
        let entry = self.entry_mut(product_id, variant_id);
        if !entry.is_dirty() {
            return SaveOutcome::NoChanges;
        }
        SaveOutcome::Submit(NoteUpdateRequest {
            product_id: product_id.to_owned(),
            variant_id: variant_id.map(str::to_owned),
            cs_important_note: non_empty(&entry.draft_important),
            cs_special_point: non_empty(&entry.draft_special),
        })
    }

    /// A save round trip succeeded: exit edit mode, baseline catches up to
    /// the drafts until the refetch re-seeds from the server
    pub fn mark_saved(&mut self, product_id: &str, variant_id: Option<&str>) {
        let entry = self.entry_mut(product_id, variant_id);
        entry.is_editing = false;
        entry.baseline_important = entry.draft_important.clone();
        entry.baseline_special = entry.draft_special.clone();
    }

    /// Build the delete request (both note fields forced empty) and clear
    /// the local state immediately, regardless of prior dirtiness
    #[must_use]
    pub fn delete(&mut self, product_id: &str, variant_id: Option<&str>) -> NoteUpdateRequest {
        let entry = self.entry_mut(product_id, variant_id);
        entry.is_editing = false;
        entry.draft_important.clear();
        entry.draft_special.clear();
        entry.baseline_important.clear();
        entry.baseline_special.clear();

        NoteUpdateRequest {
            product_id: product_id.to_owned(),
            variant_id: variant_id.map(str::to_owned),
            cs_important_note: Some(String::new()),
            cs_special_point: Some(String::new()),
        }
    }

    /// Discard drafts and leave edit mode without submitting anything
    pub fn cancel(&mut self, product_id: &str, variant_id: Option<&str>) {
        let entry = self.entry_mut(product_id, variant_id);
        entry.draft_important = entry.baseline_important.clone();
        entry.draft_special = entry.baseline_special.clone();
        entry.is_editing = false;
    }

    fn entry_mut(&mut self, product_id: &str, variant_id: Option<&str>) -> &mut NoteEditState {
        self.entries
            .entry((product_id.to_owned(), variant_id.map(str::to_owned)))
            .or_default()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::Variant;

    fn product_with_variant() -> Product {
        Product {
            product_id: "P1".into(),
            cs_important_note: Some("fragile".into()),
            cs_special_point: None,
            variants: vec![Variant {
                id: "V1".into(),
                cs_important_note: None,
                cs_special_point: Some("evening only".into()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn seeding_creates_independent_states_per_key() {
        let mut registry = NoteEditRegistry::new();
        registry.seed_from_products(&[product_with_variant()]);

        let product_state = registry.state_for("P1", None);
        assert_eq!(product_state.draft_important, "fragile");
        assert_eq!(product_state.draft_special, "");

        let variant_state = registry.state_for("P1", Some("V1"));
        assert_eq!(variant_state.draft_important, "");
        assert_eq!(variant_state.draft_special, "evening only");
    }

    #[test]
    fn save_without_changes_is_a_client_side_noop() {
        let mut registry = NoteEditRegistry::new();
        registry.seed_from_products(&[product_with_variant()]);
        registry.begin_edit("P1", None);

        assert_eq!(registry.save("P1", None), SaveOutcome::NoChanges);
    }

    #[test]
    fn save_transmits_empty_drafts_as_unset() {
        let mut registry = NoteEditRegistry::new();
        registry.seed_from_products(&[product_with_variant()]);
        registry.begin_edit("P1", None);
        registry.update_drafts("P1", None, String::new(), "call first".into());

        let SaveOutcome::Submit(request) = registry.save("P1", None) else {
            panic!("dirty drafts must submit");
        };
        assert_eq!(request.product_id, "P1");
        assert_eq!(request.variant_id, None);
        assert_eq!(request.cs_important_note, None);
        assert_eq!(request.cs_special_point.as_deref(), Some("call first"));

        registry.mark_saved("P1", None);
        let state = registry.state_for("P1", None);
        assert!(!state.is_editing);
        assert!(!state.is_dirty());
    }

    #[test]
    fn delete_forces_both_fields_empty_and_clears_exactly_one_key() {
        let mut registry = NoteEditRegistry::new();
        registry.seed_from_products(&[product_with_variant()]);
        registry.begin_edit("P1", Some("V1"));
        registry.update_drafts("P1", Some("V1"), "draft".into(), "draft".into());

        let request = registry.delete("P1", Some("V1"));
        assert_eq!(request.cs_important_note.as_deref(), Some(""));
        assert_eq!(request.cs_special_point.as_deref(), Some(""));

        let variant_state = registry.state_for("P1", Some("V1"));
        assert!(!variant_state.is_editing);
        assert_eq!(variant_state.draft_important, "");
        assert_eq!(variant_state.draft_special, "");

        // the product-level note is untouched
        assert_eq!(registry.state_for("P1", None).draft_important, "fragile");
    }

    #[test]
    fn cancel_restores_server_values() {
        let mut registry = NoteEditRegistry::new();
        registry.seed_from_products(&[product_with_variant()]);
        registry.begin_edit("P1", None);
        registry.update_drafts("P1", None, "scratch".into(), "scratch".into());

        registry.cancel("P1", None);
        let state = registry.state_for("P1", None);
        assert!(!state.is_editing);
        assert_eq!(state.draft_important, "fragile");
        assert_eq!(state.draft_special, "");
    }

    #[test]
    fn reseed_preserves_drafts_while_editing() {
        let mut registry = NoteEditRegistry::new();
        registry.seed_from_products(&[product_with_variant()]);
        registry.begin_edit("P1", None);
        registry.update_drafts("P1", None, "in progress".into(), String::new());

        // a refetch lands underneath the open editor
        let mut updated = product_with_variant();
        updated.cs_important_note = Some("server changed".into());
        registry.seed_from_products(&[updated]);

        let state = registry.state_for("P1", None);
        assert_eq!(state.draft_important, "in progress");
        assert_eq!(state.baseline_important, "server changed");

        // idle views follow the server
        registry.cancel("P1", None);
        let mut updated = product_with_variant();
        updated.cs_important_note = Some("server again".into());
        registry.seed_from_products(&[updated]);
        assert_eq!(registry.state_for("P1", None).draft_important, "server again");
    }
}
