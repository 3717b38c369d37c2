//! Filter state machine for the product search screen
//!
//! Owns the canonical applied filter set, the pending (draft) selections of
//! the multi-select controls, and the debounced free-text search input.
//!
//! Pending values shadow the applied set: the UI mutates them freely while
//! a dropdown is open and nothing reaches the applied set (or the network)
//! until an explicit per-field apply. Every applied-state transition is
//! tagged with its origin: `UserApply` transitions already reflect the
//! user's staged intent, so pending is left alone; `ExternalReset`
//! transitions (reset / clear-all) overwrite every pending field from the
//! applied set. This replaces the one-shot re-entrancy guard flag the
//! legacy console used for the same suppression, with identical observable
//! behavior: a just-applied selection is never bounced back to its
//! pre-apply value.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use ts_rs::TS;

use crate::domain::product::ProductFilterParams;

/// The multi-select filter dimensions that stage pending values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    CategoryCodes,
    LangCodes,
    LocationCodes,
    ProgressMethodCodes,
    ProductTypeCodes,
    NumberOfProgresses,
    NumberOfProgressPerWeeks,
}

impl FilterField {
    /// Dependent fields are cleared whenever the main category changes.
    /// Languages and locations are independent of the main category and
    /// survive it.
    #[must_use]
    pub fn is_dependent_on_main_category(self) -> bool {
        matches!(
            self,
            Self::CategoryCodes | Self::ProgressMethodCodes | Self::ProductTypeCodes
        )
    }
}

/// Values for one pending field: string codes or numeric options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum FilterValues {
    Codes(Vec<String>),
    Numbers(Vec<u32>),
}

/// Draft selections per multi-select control, shadowing the applied set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PendingSelections {
    pub category_codes: Vec<String>,
    pub lang_codes: Vec<String>,
    pub location_codes: Vec<String>,
    pub progress_method_codes: Vec<String>,
    pub product_type_codes: Vec<String>,
    pub number_of_progresses: Vec<u32>,
    pub number_of_progress_per_weeks: Vec<u32>,
}

impl PendingSelections {
    /// Re-synchronize every draft from the applied set (unset -> empty)
    fn from_applied(applied: &ProductFilterParams) -> Self {
        Self {
            category_codes: applied.category_codes.clone().unwrap_or_default(),
            lang_codes: applied.lang_codes.clone().unwrap_or_default(),
            location_codes: applied.location_codes.clone().unwrap_or_default(),
            progress_method_codes: applied.progress_method_codes.clone().unwrap_or_default(),
            product_type_codes: applied.product_type_codes.clone().unwrap_or_default(),
            number_of_progresses: applied.number_of_progresses.clone().unwrap_or_default(),
            number_of_progress_per_weeks: applied
                .number_of_progress_per_weeks
                .clone()
                .unwrap_or_default(),
        }
    }
}

/// Origin tag of an applied-state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// The transition was produced by a user apply/clear on this screen;
    /// pending already reflects it and must not be overwritten
    UserApply,
    /// The transition came from outside the multi-select controls
    /// (reset / clear-all); pending must re-synchronize
    ExternalReset,
}

/// Full state snapshot rendered by the frontend
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FilterSnapshot {
    pub applied: ProductFilterParams,
    pub pending: PendingSelections,
    pub search_input: String,
}

/// State machine over applied filters + pending drafts + search input
#[derive(Debug, Default)]
pub struct FilterStateMachine {
    applied: ProductFilterParams,
    pending: PendingSelections,
    search_input: String,
    /// Bumped on every keystroke and on clear-all; a debounce commit only
    /// lands if its epoch is still current
    search_epoch: u64,
}

impl FilterStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn applied(&self) -> &ProductFilterParams {
        &self.applied
    }

    #[must_use]
    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            applied: self.applied.clone(),
            pending: self.pending.clone(),
            search_input: self.search_input.clone(),
        }
    }

    /// Select the required main category.
    ///
    /// Unconditionally clears the three dependent dimensions in BOTH the
    /// pending drafts and the applied set (applied to unset, so they vanish
    /// from the outgoing query). Languages and locations survive.
    pub fn set_main_category(&mut self, code: String) -> UpdateOrigin {
        self.pending.category_codes.clear();
        self.pending.progress_method_codes.clear();
        self.pending.product_type_codes.clear();

        self.applied.main_category_code = code;
        self.applied.category_codes = None;
        self.applied.progress_method_codes = None;
        self.applied.product_type_codes = None;
        self.applied.page_number = 1;

        UpdateOrigin::UserApply
    }

    /// Stage draft values for one field. Never touches the applied set.
    pub fn set_pending(&mut self, field: FilterField, values: FilterValues) {
        match (field, values) {
            (FilterField::CategoryCodes, FilterValues::Codes(v)) => self.pending.category_codes = v,
            (FilterField::LangCodes, FilterValues::Codes(v)) => self.pending.lang_codes = v,
            (FilterField::LocationCodes, FilterValues::Codes(v)) => self.pending.location_codes = v,
            (FilterField::ProgressMethodCodes, FilterValues::Codes(v)) => {
                self.pending.progress_method_codes = v;
            }
            (FilterField::ProductTypeCodes, FilterValues::Codes(v)) => {
                self.pending.product_type_codes = v;
            }
            (FilterField::NumberOfProgresses, FilterValues::Numbers(v)) => {
                self.pending.number_of_progresses = v;
            }
            (FilterField::NumberOfProgressPerWeeks, FilterValues::Numbers(v)) => {
                self.pending.number_of_progress_per_weeks = v;
            }
            // Mismatched value kind for the field; an empty Codes array is
            // how serde decodes an empty selection for numeric fields too
            (FilterField::NumberOfProgresses, FilterValues::Codes(v)) if v.is_empty() => {
                self.pending.number_of_progresses.clear();
            }
            (FilterField::NumberOfProgressPerWeeks, FilterValues::Codes(v)) if v.is_empty() => {
                self.pending.number_of_progress_per_weeks.clear();
            }
            _ => {}
        }
    }

    /// Commit the pending draft of one field into the applied set.
    /// An empty draft is normalized to unset before transmission.
    pub fn apply_field(&mut self, field: FilterField) -> UpdateOrigin {
        match field {
            FilterField::CategoryCodes => {
                self.applied.category_codes = unset_if_empty(&self.pending.category_codes);
            }
            FilterField::LangCodes => {
                self.applied.lang_codes = unset_if_empty(&self.pending.lang_codes);
            }
            FilterField::LocationCodes => {
                self.applied.location_codes = unset_if_empty(&self.pending.location_codes);
            }
            FilterField::ProgressMethodCodes => {
                self.applied.progress_method_codes =
                    unset_if_empty(&self.pending.progress_method_codes);
            }
            FilterField::ProductTypeCodes => {
                self.applied.product_type_codes = unset_if_empty(&self.pending.product_type_codes);
            }
            FilterField::NumberOfProgresses => {
                self.applied.number_of_progresses =
                    unset_if_empty(&self.pending.number_of_progresses);
            }
            FilterField::NumberOfProgressPerWeeks => {
                self.applied.number_of_progress_per_weeks =
                    unset_if_empty(&self.pending.number_of_progress_per_weeks);
            }
        }
        self.applied.page_number = 1;
        UpdateOrigin::UserApply
    }

    /// Empty the draft and unset the applied value of one field
    pub fn clear_field(&mut self, field: FilterField) -> UpdateOrigin {
        match field {
            FilterField::CategoryCodes => {
                self.pending.category_codes.clear();
                self.applied.category_codes = None;
            }
            FilterField::LangCodes => {
                self.pending.lang_codes.clear();
                self.applied.lang_codes = None;
            }
            FilterField::LocationCodes => {
                self.pending.location_codes.clear();
                self.applied.location_codes = None;
            }
            FilterField::ProgressMethodCodes => {
                self.pending.progress_method_codes.clear();
                self.applied.progress_method_codes = None;
            }
            FilterField::ProductTypeCodes => {
                self.pending.product_type_codes.clear();
                self.applied.product_type_codes = None;
            }
            FilterField::NumberOfProgresses => {
                self.pending.number_of_progresses.clear();
                self.applied.number_of_progresses = None;
            }
            FilterField::NumberOfProgressPerWeeks => {
                self.pending.number_of_progress_per_weeks.clear();
                self.applied.number_of_progress_per_weeks = None;
            }
        }
        self.applied.page_number = 1;
        UpdateOrigin::UserApply
    }

    /// "Reset" entry point: applied filters collapse to defaults but the
    /// main category selection is KEPT. The search input text survives.
    pub fn reset_filters(&mut self) -> UpdateOrigin {
        let main_category_code = std::mem::take(&mut self.applied.main_category_code);
        self.applied = ProductFilterParams {
            main_category_code,
            ..ProductFilterParams::default()
        };
        UpdateOrigin::ExternalReset
    }

    /// "Clear all" entry point: everything goes, main category included,
    /// and any in-flight debounce is abandoned.
    pub fn clear_all(&mut self) -> UpdateOrigin {
        self.search_input.clear();
        self.search_epoch += 1;
        self.applied = ProductFilterParams::default();
        UpdateOrigin::ExternalReset
    }

    /// Pending re-synchronization pass, run after every applied-state
    /// transition with the origin that produced it. Self-originated apply
    /// updates are skipped so they cannot visually revert a selection the
    /// user just applied.
    pub fn sync_pending(&mut self, origin: UpdateOrigin) {
        if origin == UpdateOrigin::UserApply {
            return;
        }
        self.pending = PendingSelections::from_applied(&self.applied);
    }

    /// Record a search keystroke; returns the epoch the debounce commit
    /// must present to land
    pub fn set_search_input(&mut self, input: String) -> u64 {
        self.search_input = input;
        self.search_epoch += 1;
        self.search_epoch
    }

    #[must_use]
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Commit the debounced search input into the applied set.
    ///
    /// Only the last keystroke's epoch may land; a superseded epoch is a
    /// no-op. Returns true when the applied set actually changed.
    pub fn commit_search(&mut self, epoch: u64) -> bool {
        if epoch != self.search_epoch {
            return false;
        }
        let committed = if self.search_input.is_empty() {
            None
        } else {
            Some(self.search_input.clone())
        };
        if committed == self.applied.search_term {
            return false;
        }
        self.applied.search_term = committed;
        self.applied.page_number = 1;
        true
    }

    /// Move to a page; touches nothing but the page number
    pub fn set_page(&mut self, page_number: u32) {
        self.applied.page_number = page_number.max(1);
    }

    /// Change the page size; always jumps back to page 1
    pub fn set_page_size(&mut self, page_size: u32) {
        self.applied.page_size = page_size;
        self.applied.page_number = 1;
    }
}

fn unset_if_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

/// Cancellable quiet-period timer for the search input.
///
/// Each keystroke restarts the countdown; only the last keystroke's timer
/// fires, and [`FilterStateMachine::commit_search`] additionally checks the
/// epoch so a late fire can never commit stale input.
#[derive(Debug)]
pub struct SearchDebouncer {
    current: tokio::sync::Mutex<CancellationToken>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchDebouncer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: tokio::sync::Mutex::new(CancellationToken::new()),
        }
    }

    /// Cancel any pending countdown and start a fresh one; `fire` runs once
    /// the quiet period elapses uninterrupted.
    pub async fn schedule<F>(&self, quiet: Duration, fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = {
            let mut guard = self.current.lock().await;
            guard.cancel();
            let token = CancellationToken::new();
            *guard = token.clone();
            token
        };

        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(quiet) => fire.await,
                () = token.cancelled() => {}
            }
        });
    }

    /// Abandon any pending countdown without scheduling a new one
    pub async fn cancel(&self) {
        self.current.lock().await.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn machine_with_main() -> FilterStateMachine {
        let mut machine = FilterStateMachine::new();
        let origin = machine.set_main_category("CTG10000000001".into());
        machine.sync_pending(origin);
        machine
    }

    #[test]
    fn main_category_change_clears_dependent_filters_only() {
        let mut machine = machine_with_main();
        machine.set_pending(
            FilterField::CategoryCodes,
            FilterValues::Codes(vec!["SUB1".into()]),
        );
        machine.apply_field(FilterField::CategoryCodes);
        machine.set_pending(
            FilterField::LangCodes,
            FilterValues::Codes(vec!["ENG".into()]),
        );
        machine.apply_field(FilterField::LangCodes);
        machine.set_pending(
            FilterField::LocationCodes,
            FilterValues::Codes(vec!["VNM-HCM".into()]),
        );
        machine.apply_field(FilterField::LocationCodes);
        machine.set_pending(
            FilterField::ProductTypeCodes,
            FilterValues::Codes(vec!["PT1".into()]),
        );
        machine.apply_field(FilterField::ProductTypeCodes);

        let origin = machine.set_main_category("CTG10000000002".into());
        machine.sync_pending(origin);

        let applied = machine.applied();
        assert_eq!(applied.main_category_code, "CTG10000000002");
        assert_eq!(applied.category_codes, None);
        assert_eq!(applied.progress_method_codes, None);
        assert_eq!(applied.product_type_codes, None);
        // independent dimensions survive
        assert_eq!(applied.lang_codes, Some(vec!["ENG".to_owned()]));
        assert_eq!(applied.location_codes, Some(vec!["VNM-HCM".to_owned()]));

        let snapshot = machine.snapshot();
        assert!(snapshot.pending.category_codes.is_empty());
        assert!(snapshot.pending.product_type_codes.is_empty());
        assert_eq!(snapshot.pending.lang_codes, vec!["ENG".to_owned()]);
    }

    #[test]
    fn applying_an_empty_draft_unsets_the_applied_field() {
        let mut machine = machine_with_main();
        machine.set_pending(
            FilterField::LangCodes,
            FilterValues::Codes(vec!["ENG".into()]),
        );
        machine.apply_field(FilterField::LangCodes);
        assert_eq!(machine.applied().lang_codes, Some(vec!["ENG".to_owned()]));

        machine.set_pending(FilterField::LangCodes, FilterValues::Codes(vec![]));
        machine.apply_field(FilterField::LangCodes);
        // unset, not Some(vec![]) - the parameter must vanish from the query
        assert_eq!(machine.applied().lang_codes, None);
    }

    #[test]
    fn apply_does_not_bounce_pending_back() {
        let mut machine = machine_with_main();
        machine.set_pending(
            FilterField::NumberOfProgresses,
            FilterValues::Numbers(vec![10, 20]),
        );
        let origin = machine.apply_field(FilterField::NumberOfProgresses);
        machine.sync_pending(origin);

        // the sync pass right after a user apply must not revert the draft
        assert_eq!(machine.snapshot().pending.number_of_progresses, vec![10, 20]);
        assert_eq!(
            machine.applied().number_of_progresses,
            Some(vec![10, 20])
        );

        // a later external reset DOES overwrite pending
        let origin = machine.reset_filters();
        machine.sync_pending(origin);
        assert!(machine.snapshot().pending.number_of_progresses.is_empty());
    }

    #[test]
    fn non_pagination_changes_reset_page_number() {
        let mut machine = machine_with_main();
        machine.set_page(7);
        assert_eq!(machine.applied().page_number, 7);

        machine.set_pending(
            FilterField::LangCodes,
            FilterValues::Codes(vec!["ENG".into()]),
        );
        machine.apply_field(FilterField::LangCodes);
        assert_eq!(machine.applied().page_number, 1);

        machine.set_page(4);
        machine.clear_field(FilterField::LangCodes);
        assert_eq!(machine.applied().page_number, 1);

        machine.set_page(4);
        machine.set_main_category("CTG10000000003".into());
        assert_eq!(machine.applied().page_number, 1);
    }

    #[test]
    fn set_page_size_resets_page_and_set_page_touches_nothing_else() {
        let mut machine = machine_with_main();
        machine.set_pending(
            FilterField::LangCodes,
            FilterValues::Codes(vec!["ENG".into()]),
        );
        machine.apply_field(FilterField::LangCodes);

        machine.set_page(5);
        machine.set_page_size(50);
        assert_eq!(machine.applied().page_size, 50);
        assert_eq!(machine.applied().page_number, 1);

        machine.set_page(3);
        assert_eq!(machine.applied().page_number, 3);
        assert_eq!(machine.applied().lang_codes, Some(vec!["ENG".to_owned()]));
        assert_eq!(machine.applied().page_size, 50);
    }

    #[test]
    fn reset_keeps_main_category_and_clear_all_drops_it() {
        let mut machine = machine_with_main();
        machine.set_pending(
            FilterField::CategoryCodes,
            FilterValues::Codes(vec!["SUB1".into()]),
        );
        machine.apply_field(FilterField::CategoryCodes);

        let origin = machine.reset_filters();
        machine.sync_pending(origin);
        assert_eq!(machine.applied().main_category_code, "CTG10000000001");
        assert_eq!(machine.applied().category_codes, None);

        let origin = machine.clear_all();
        machine.sync_pending(origin);
        assert_eq!(machine.applied().main_category_code, "");
        assert!(machine.snapshot().search_input.is_empty());
    }

    #[test]
    fn stale_search_epochs_never_commit() {
        let mut machine = machine_with_main();
        let first = machine.set_search_input("g".into());
        let second = machine.set_search_input("gu".into());
        let third = machine.set_search_input("guitar".into());

        assert!(!machine.commit_search(first));
        assert!(!machine.commit_search(second));
        assert!(machine.commit_search(third));
        assert_eq!(machine.applied().search_term.as_deref(), Some("guitar"));
        assert_eq!(machine.applied().page_number, 1);

        // committing the same value again is a no-op
        assert!(!machine.commit_search(third));
    }

    #[test]
    fn empty_search_input_commits_as_unset() {
        let mut machine = machine_with_main();
        let epoch = machine.set_search_input("guitar".into());
        machine.commit_search(epoch);

        let epoch = machine.set_search_input(String::new());
        assert!(machine.commit_search(epoch));
        assert_eq!(machine.applied().search_term, None);
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_fires_only_for_the_last_schedule() {
        let fired = Arc::new(AtomicU32::new(0));
        let debouncer = SearchDebouncer::new();

        for _ in 0..3 {
            let fired = Arc::clone(&fired);
            debouncer
                .schedule(Duration::from_millis(500), async move {
                    fired.fetch_add(1, Ordering::SeqCst);
                })
                .await;
        }

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_cancel_abandons_the_countdown() {
        let fired = Arc::new(AtomicU32::new(0));
        let debouncer = SearchDebouncer::new();

        {
            let fired = Arc::clone(&fired);
            debouncer
                .schedule(Duration::from_millis(500), async move {
                    fired.fetch_add(1, Ordering::SeqCst);
                })
                .await;
        }
        debouncer.cancel().await;

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
