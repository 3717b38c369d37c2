//! Product search wire types and the applied filter set
//!
//! [`ProductFilterParams`] is the single source of truth for "what the last
//! search was run with". Its query-string projection follows the backend
//! convention: an unset filter dimension is OMITTED from the query entirely
//! (never sent as an empty list), and array dimensions are repeated as
//! multiple same-named entries.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::domain::constants::filters::DEFAULT_PAGE_SIZE;

/// One localized display name entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedName {
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub content: String,
}

/// Language a product is offered in
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductLanguage {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

/// Display status badge of a product
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductStatus {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub text: String,
}

/// Variant row of a product. Each variant carries its own CS note pair,
/// independently addressable by `(productId, variantId)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub names: Vec<LocalizedName>,
    #[serde(default)]
    pub cs_important_note: Option<String>,
    #[serde(default)]
    pub cs_special_point: Option<String>,
    #[serde(default)]
    pub progress_method_name: Option<String>,
    #[serde(default)]
    pub number_of_progresses_name: Option<String>,
    #[serde(default)]
    pub number_of_progresses_per_week_name: Option<String>,
    #[serde(default)]
    pub progress_time_name: Option<String>,
    #[serde(default)]
    pub district_name: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub original_price: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub event_in_use: bool,
    #[serde(default)]
    pub event_limit: i64,
    #[serde(default)]
    pub event_booked_count: i64,
}

/// Product row returned by the CS search. Read-only for display; the only
/// writable part is the CS note pair (product-level, plus one per variant).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub auto_id: i64,
    #[serde(default)]
    pub b2c_link: String,
    #[serde(default, rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub sub_category_name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cs_important_note: Option<String>,
    #[serde(default)]
    pub cs_special_point: Option<String>,
    #[serde(default)]
    pub product_names: Vec<LocalizedName>,
    #[serde(default)]
    pub product_type_name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub languages: Vec<ProductLanguage>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub seller_name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default, rename = "createdTS")]
    pub created_ts: String,
    #[serde(default, rename = "lastUpdatedTS")]
    pub last_updated_ts: String,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// Paginated response envelope shared by the list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedData<T> {
    pub page_number: u32,
    pub page_size: u32,
    pub total_records: u64,
    pub total_pages: u32,
    pub items: Vec<T>,
}

impl<T> Default for PaginatedData<T> {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_records: 0,
            total_pages: 0,
            items: Vec::new(),
        }
    }
}

/// Body of `POST /products/cs`. Absent `variantId` addresses the product
/// itself; both note fields forced to empty string means deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdateRequest {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cs_important_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cs_special_point: Option<String>,
}

/// The applied filter set: committed search criteria for `GET /products/cs`.
///
/// `None` on an optional dimension means "unset" - no constraint, parameter
/// omitted from the query. This is deliberately distinct from an empty
/// selection list, which the state machine never lets through to this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilterParams {
    pub page_number: u32,
    pub page_size: u32,
    pub main_category_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_method_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_progresses: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_progress_per_weeks: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

impl Default for ProductFilterParams {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            main_category_code: String::new(),
            category_codes: None,
            lang_codes: None,
            location_codes: None,
            progress_method_codes: None,
            product_type_codes: None,
            number_of_progresses: None,
            number_of_progress_per_weeks: None,
            search_term: None,
        }
    }
}

impl ProductFilterParams {
    /// Search is gated on the required main category selection
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        !self.main_category_code.is_empty()
    }

    /// Query-string projection. Array dimensions become repeated same-named
    /// entries; unset dimensions are omitted entirely.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = vec![
            ("pageNumber", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("mainCategoryCode", self.main_category_code.clone()),
        ];

        push_codes(&mut pairs, "categoryCodes", self.category_codes.as_deref());
        push_codes(&mut pairs, "langCodes", self.lang_codes.as_deref());
        push_codes(&mut pairs, "locationCodes", self.location_codes.as_deref());
        push_codes(
            &mut pairs,
            "progressMethodCodes",
            self.progress_method_codes.as_deref(),
        );
        push_codes(
            &mut pairs,
            "productTypeCodes",
            self.product_type_codes.as_deref(),
        );
        push_numbers(
            &mut pairs,
            "numberOfProgresses",
            self.number_of_progresses.as_deref(),
        );
        push_numbers(
            &mut pairs,
            "numberOfProgressPerWeeks",
            self.number_of_progress_per_weeks.as_deref(),
        );

        if let Some(term) = self.search_term.as_deref() {
            if !term.is_empty() {
                pairs.push(("searchTerm", term.to_owned()));
            }
        }

        pairs
    }

    /// Stable cache key over the full serialized filter set, pagination
    /// included. Any field change produces a new key.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let serialized =
            serde_json::to_vec(self).unwrap_or_else(|_| format!("{self:?}").into_bytes());
        blake3::hash(&serialized).to_hex().to_string()
    }
}

fn push_codes(pairs: &mut Vec<(&'static str, String)>, name: &'static str, values: Option<&[String]>) {
    if let Some(values) = values {
        for value in values {
            pairs.push((name, value.clone()));
        }
    }
}

fn push_numbers(pairs: &mut Vec<(&'static str, String)>, name: &'static str, values: Option<&[u32]>) {
    if let Some(values) = values {
        for value in values {
            pairs.push((name, value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_are_not_searchable() {
        let filters = ProductFilterParams::default();
        assert!(!filters.is_searchable());
        assert_eq!(filters.page_number, 1);
        assert_eq!(filters.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn query_pairs_omit_unset_dimensions() {
        let filters = ProductFilterParams {
            main_category_code: "CTG10000000001".into(),
            ..Default::default()
        };

        let pairs = filters.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("pageNumber", "1".to_owned()),
                ("pageSize", "10".to_owned()),
                ("mainCategoryCode", "CTG10000000001".to_owned()),
            ]
        );
    }

    #[test]
    fn query_pairs_repeat_array_dimensions() {
        let filters = ProductFilterParams {
            main_category_code: "CTG10000000001".into(),
            category_codes: Some(vec!["CTG2A".into(), "CTG2B".into()]),
            number_of_progress_per_weeks: Some(vec![2, 3]),
            search_term: Some("guitar".into()),
            ..Default::default()
        };

        let pairs = filters.query_pairs();
        let category_entries: Vec<&(&str, String)> =
            pairs.iter().filter(|(name, _)| *name == "categoryCodes").collect();
        assert_eq!(category_entries.len(), 2);
        assert!(pairs.contains(&("numberOfProgressPerWeeks", "2".to_owned())));
        assert!(pairs.contains(&("numberOfProgressPerWeeks", "3".to_owned())));
        assert!(pairs.contains(&("searchTerm", "guitar".to_owned())));
    }

    #[test]
    fn empty_search_term_is_not_transmitted() {
        let filters = ProductFilterParams {
            main_category_code: "CTG10000000001".into(),
            search_term: Some(String::new()),
            ..Default::default()
        };
        assert!(filters.query_pairs().iter().all(|(name, _)| *name != "searchTerm"));
    }

    #[test]
    fn cache_key_changes_with_any_field() {
        let base = ProductFilterParams {
            main_category_code: "CTG10000000001".into(),
            ..Default::default()
        };
        let mut paged = base.clone();
        paged.page_number = 2;
        let mut filtered = base.clone();
        filtered.lang_codes = Some(vec!["ENG".into()]);

        assert_ne!(base.cache_key(), paged.cache_key());
        assert_ne!(base.cache_key(), filtered.cache_key());
        assert_eq!(base.cache_key(), base.clone().cache_key());
    }
}
