//! Resource taxonomy types and normalization
//!
//! The resource backend returns deeply nested category/location trees that
//! are awkward to feed into dropdowns directly. This module owns the flat,
//! query-ready projections of those trees: depth-first flattening with the
//! parent code threaded through, main-category extraction (reserved `CTG10`
//! prefix), per-main subcategory extraction, and the Vietnam city/district
//! projection used by the location filter.
//!
//! All extraction functions are total: absent or malformed structure yields
//! an empty (or partial) result, never an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::domain::constants::taxonomy::{MAIN_CATEGORY_PREFIX, VIETNAM_COUNTRY_CODE};

/// Category node as returned by `GET /resources` (GNB tree)
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub localized_code: String,
    #[serde(default)]
    pub localized_name: String,
    #[serde(default, rename = "type")]
    pub category_type: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_mo_url: Option<String>,
    #[serde(default)]
    pub gnb_display_order: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<Category>,
}

/// Language node (flat in practice, but the backend ships children anyway)
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub localized_code: String,
    #[serde(default)]
    pub localized_name: String,
    #[serde(default)]
    pub children: Vec<Language>,
}

/// Location node: country -> city -> district -> ...
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub localized_code: String,
    #[serde(default)]
    pub localized_name: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub meta_value: Option<String>,
    #[serde(default)]
    pub localized_description: Option<String>,
    #[serde(default)]
    pub children: Vec<Location>,
}

/// Product type node, keyed per main category in [`ResourcesData`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub localized_code: String,
    #[serde(default)]
    pub localized_name: String,
    #[serde(default)]
    pub meta_value: Option<String>,
    #[serde(default)]
    pub children: Vec<ProductType>,
}

/// Process (progress) method node, keyed per main category
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMethod {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub localized_code: String,
    #[serde(default)]
    pub localized_name: String,
    #[serde(default)]
    pub meta_value: Option<String>,
    #[serde(default)]
    pub children: Vec<ProcessMethod>,
}

/// Complete payload of `GET /resources`, fetched once per cache window
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub product_types: HashMap<String, Vec<ProductType>>,
    #[serde(default)]
    pub process_methods: HashMap<String, Vec<ProcessMethod>>,
}

impl ResourcesData {
    /// Product types for one main category (empty when the key is absent)
    #[must_use]
    pub fn product_types_for(&self, main_category_code: &str) -> Vec<ProductType> {
        self.product_types
            .get(main_category_code)
            .cloned()
            .unwrap_or_default()
    }

    /// Process methods for one main category (empty when the key is absent)
    #[must_use]
    pub fn process_methods_for(&self, main_category_code: &str) -> Vec<ProcessMethod> {
        self.process_methods
            .get(main_category_code)
            .cloned()
            .unwrap_or_default()
    }
}

/// Denormalized category projection used by the filter dropdowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FlatCategory {
    pub id: String,
    pub code: String,
    pub name: String,
    pub localized_name: String,
    pub level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    pub is_main_category: bool,
}

/// Denormalized location projection with the display path pre-joined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FlatLocation {
    pub id: String,
    pub code: String,
    pub name: String,
    pub localized_name: String,
    pub level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    pub full_path: String,
}

/// Flatten the whole category tree depth-first, pre-order.
///
/// One entry per node; `level` counts depth from the root call and
/// `parent_code` is the immediate parent's code. Child order is preserved
/// because it drives dropdown display order.
#[must_use]
pub fn flatten_categories(categories: &[Category]) -> Vec<FlatCategory> {
    let mut result = Vec::new();
    flatten_categories_into(&mut result, categories, None, 0);
    result
}

fn flatten_categories_into(
    result: &mut Vec<FlatCategory>,
    categories: &[Category],
    parent_code: Option<&str>,
    level: u32,
) {
    for category in categories {
        // GNB main categories carry the reserved code prefix near the top of the tree
        let is_main_category = category.code.starts_with(MAIN_CATEGORY_PREFIX) && level <= 1;

        result.push(FlatCategory {
            id: category.id.clone(),
            code: category.code.clone(),
            name: category.name.clone(),
            localized_name: category.localized_name.clone(),
            level,
            parent_code: parent_code.map(str::to_owned),
            is_main_category,
        });

        if !category.children.is_empty() {
            flatten_categories_into(result, &category.children, Some(&category.code), level + 1);
        }
    }
}

/// Collect every main category (reserved `CTG10` code prefix) from the tree.
///
/// The scan intentionally matches at ANY depth, not just the top level, and
/// every hit is normalized to `level = 0`. A main category nested three
/// levels deep still appears in the result.
#[must_use]
pub fn extract_main_categories(categories: &[Category]) -> Vec<FlatCategory> {
    let mut main_categories = Vec::new();
    collect_main_categories(&mut main_categories, categories);
    main_categories
}

fn collect_main_categories(result: &mut Vec<FlatCategory>, categories: &[Category]) {
    for category in categories {
        if category.code.starts_with(MAIN_CATEGORY_PREFIX) {
            result.push(FlatCategory {
                id: category.id.clone(),
                code: category.code.clone(),
                name: category.name.clone(),
                localized_name: category.localized_name.clone(),
                level: 0,
                parent_code: None,
                is_main_category: true,
            });
        }
        if !category.children.is_empty() {
            collect_main_categories(result, &category.children);
        }
    }
}

/// Subcategories of one main category: its direct children at `level = 1`,
/// each immediately followed by a full flatten of that child's descendants
/// starting at `level = 2`.
///
/// Returns an empty list when `main_category_code` is not found or the node
/// has no children. Codes are unique per tree; if duplicates slip in, the
/// first match (pre-order) wins.
#[must_use]
pub fn extract_sub_categories(
    categories: &[Category],
    main_category_code: &str,
) -> Vec<FlatCategory> {
    let Some(main) = find_category(categories, main_category_code) else {
        return Vec::new();
    };

    let mut sub_categories = Vec::new();
    for sub in &main.children {
        sub_categories.push(FlatCategory {
            id: sub.id.clone(),
            code: sub.code.clone(),
            name: sub.name.clone(),
            localized_name: sub.localized_name.clone(),
            level: 1,
            parent_code: Some(main_category_code.to_owned()),
            is_main_category: false,
        });
        if !sub.children.is_empty() {
            flatten_categories_into(&mut sub_categories, &sub.children, Some(&sub.code), 2);
        }
    }
    sub_categories
}

fn find_category<'a>(categories: &'a [Category], code: &str) -> Option<&'a Category> {
    for category in categories {
        if category.code == code {
            return Some(category);
        }
        if let Some(found) = find_category(&category.children, code) {
            return Some(found);
        }
    }
    None
}

/// Flatten the whole location tree, threading the display path through the
/// recursion: `fullPath` is the ancestor chain of localized names joined
/// with " > ", including the node itself.
#[must_use]
pub fn flatten_locations(locations: &[Location]) -> Vec<FlatLocation> {
    let mut result = Vec::new();
    flatten_locations_into(&mut result, locations, None, &[]);
    result
}

fn flatten_locations_into(
    result: &mut Vec<FlatLocation>,
    locations: &[Location],
    parent_code: Option<&str>,
    path: &[String],
) {
    for location in locations {
        let mut current_path = path.to_vec();
        current_path.push(location.localized_name.clone());

        result.push(FlatLocation {
            id: location.id.clone(),
            code: location.code.clone(),
            name: location.name.clone(),
            localized_name: location.localized_name.clone(),
            level: location.level,
            parent_code: parent_code.map(str::to_owned),
            full_path: current_path.join(" > "),
        });

        if !location.children.is_empty() {
            flatten_locations_into(result, &location.children, Some(&location.code), &current_path);
        }
    }
}

/// Vietnam cities and districts for the location filter.
///
/// Finds the `VNM` node among the top-level countries and surfaces exactly
/// two levels beneath it: cities (`fullPath` = city name) and each city's
/// districts (`fullPath` = "City > District"). Anything deeper is dropped.
/// Empty result when the country node is absent.
#[must_use]
pub fn extract_vietnam_locations(locations: &[Location]) -> Vec<FlatLocation> {
    let mut result = Vec::new();

    let Some(vietnam) = locations.iter().find(|loc| loc.code == VIETNAM_COUNTRY_CODE) else {
        return result;
    };

    for city in &vietnam.children {
        result.push(FlatLocation {
            id: city.id.clone(),
            code: city.code.clone(),
            name: city.name.clone(),
            localized_name: city.localized_name.clone(),
            level: city.level,
            parent_code: Some(VIETNAM_COUNTRY_CODE.to_owned()),
            full_path: city.localized_name.clone(),
        });

        for district in &city.children {
            result.push(FlatLocation {
                id: district.id.clone(),
                code: district.code.clone(),
                name: district.name.clone(),
                localized_name: district.localized_name.clone(),
                level: district.level,
                parent_code: Some(city.code.clone()),
                full_path: format!("{} > {}", city.localized_name, district.localized_name),
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(code: &str, localized_name: &str, children: Vec<Category>) -> Category {
        Category {
            id: format!("id-{code}"),
            code: code.to_owned(),
            name: localized_name.to_owned(),
            localized_name: localized_name.to_owned(),
            children,
            ..Default::default()
        }
    }

    fn location(code: &str, localized_name: &str, level: i32, children: Vec<Location>) -> Location {
        Location {
            id: format!("id-{code}"),
            code: code.to_owned(),
            name: localized_name.to_owned(),
            localized_name: localized_name.to_owned(),
            level,
            children,
            ..Default::default()
        }
    }

    fn sample_categories() -> Vec<Category> {
        vec![
            category(
                "CTG10000000001",
                "Classes",
                vec![
                    category(
                        "CTG20000000001",
                        "Music",
                        vec![category("CTG30000000001", "Guitar", vec![])],
                    ),
                    category("CTG20000000002", "Sports", vec![]),
                ],
            ),
            category("CTG10000000002", "Events", vec![]),
        ]
    }

    #[test]
    fn flatten_emits_one_entry_per_node_in_preorder() {
        let flat = flatten_categories(&sample_categories());

        let codes: Vec<&str> = flat.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "CTG10000000001",
                "CTG20000000001",
                "CTG30000000001",
                "CTG20000000002",
                "CTG10000000002",
            ]
        );

        let levels: Vec<u32> = flat.iter().map(|c| c.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 1, 0]);

        assert_eq!(flat[0].parent_code, None);
        assert_eq!(flat[1].parent_code.as_deref(), Some("CTG10000000001"));
        assert_eq!(flat[2].parent_code.as_deref(), Some("CTG20000000001"));
    }

    #[test]
    fn flatten_marks_main_categories_only_near_the_top() {
        let tree = vec![category(
            "CTG20000000009",
            "Wrapper",
            vec![category(
                "CTG10000000005",
                "Nested Main",
                vec![category("CTG10000000006", "Too Deep", vec![])],
            )],
        )];
        let flat = flatten_categories(&tree);

        assert!(!flat[0].is_main_category); // wrong prefix
        assert!(flat[1].is_main_category); // prefix match at level 1
        assert!(!flat[2].is_main_category); // prefix match but level 2
    }

    #[test]
    fn extract_main_categories_matches_at_any_depth() {
        let tree = vec![category(
            "CTG90000000001",
            "Root",
            vec![category(
                "CTG80000000001",
                "Middle",
                vec![category("CTG10000000007", "Deep Main", vec![])],
            )],
        )];

        let mains = extract_main_categories(&tree);
        assert_eq!(mains.len(), 1);
        assert_eq!(mains[0].code, "CTG10000000007");
        assert_eq!(mains[0].level, 0);
        assert!(mains[0].is_main_category);
        assert_eq!(mains[0].parent_code, None);
    }

    #[test]
    fn extract_sub_categories_interleaves_children_and_descendants() {
        let subs = extract_sub_categories(&sample_categories(), "CTG10000000001");

        let codes: Vec<&str> = subs.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["CTG20000000001", "CTG30000000001", "CTG20000000002"]
        );
        assert_eq!(subs[0].level, 1);
        assert_eq!(subs[0].parent_code.as_deref(), Some("CTG10000000001"));
        assert_eq!(subs[1].level, 2);
        assert_eq!(subs[1].parent_code.as_deref(), Some("CTG20000000001"));
        assert!(subs.iter().all(|c| !c.is_main_category));
    }

    #[test]
    fn extract_sub_categories_is_empty_on_miss_or_leaf() {
        assert!(extract_sub_categories(&sample_categories(), "NOPE").is_empty());
        assert!(extract_sub_categories(&sample_categories(), "CTG10000000002").is_empty());
    }

    #[test]
    fn flatten_locations_joins_full_path() {
        let tree = vec![location(
            "VNM",
            "Vietnam",
            1,
            vec![location(
                "VNM-HCM",
                "Ho Chi Minh",
                2,
                vec![location("VNM-HCM-D1", "District 1", 3, vec![])],
            )],
        )];

        let flat = flatten_locations(&tree);
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0].full_path, "Vietnam");
        assert_eq!(flat[1].full_path, "Vietnam > Ho Chi Minh");
        assert_eq!(flat[2].full_path, "Vietnam > Ho Chi Minh > District 1");
    }

    #[test]
    fn vietnam_locations_surface_cities_and_districts_only() {
        let tree = vec![
            location("KOR", "Korea", 1, vec![location("KOR-SEL", "Seoul", 2, vec![])]),
            location(
                "VNM",
                "Vietnam",
                1,
                vec![location(
                    "VNM-HCM",
                    "Ho Chi Minh",
                    2,
                    vec![location(
                        "VNM-HCM-D1",
                        "District 1",
                        3,
                        // ward level must be silently dropped
                        vec![location("VNM-HCM-D1-W1", "Ward 1", 4, vec![])],
                    )],
                )],
            ),
        ];

        let vn = extract_vietnam_locations(&tree);
        let codes: Vec<&str> = vn.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["VNM-HCM", "VNM-HCM-D1"]);
        assert_eq!(vn[0].full_path, "Ho Chi Minh");
        assert_eq!(vn[0].parent_code.as_deref(), Some("VNM"));
        assert_eq!(vn[1].full_path, "Ho Chi Minh > District 1");
        assert_eq!(vn[1].parent_code.as_deref(), Some("VNM-HCM"));
    }

    #[test]
    fn vietnam_locations_empty_when_country_absent() {
        let tree = vec![location("KOR", "Korea", 1, vec![])];
        assert!(extract_vietnam_locations(&tree).is_empty());
    }

    #[test]
    fn extraction_is_total_over_empty_input() {
        assert!(flatten_categories(&[]).is_empty());
        assert!(extract_main_categories(&[]).is_empty());
        assert!(extract_sub_categories(&[], "CTG10000000001").is_empty());
        assert!(flatten_locations(&[]).is_empty());
        assert!(extract_vietnam_locations(&[]).is_empty());
    }
}
