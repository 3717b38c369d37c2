//! Property tests for taxonomy flattening over arbitrary trees
use proptest::prelude::*;

use sixgo_cs_console_lib::domain::resources::{
    Category, extract_main_categories, flatten_categories,
};

fn arb_code() -> impl Strategy<Value = String> {
    prop_oneof![
        // reserved main-category prefix
        "CTG10[0-9]{7}",
        // ordinary category codes
        "CTG[2-9]0[0-9]{7}",
    ]
}

fn arb_category_tree() -> impl Strategy<Value = Category> {
    let leaf = arb_code().prop_map(|code| Category {
        id: format!("id-{code}"),
        localized_name: format!("name-{code}"),
        code,
        ..Default::default()
    });

    leaf.prop_recursive(4, 32, 4, |inner| {
        (arb_code(), prop::collection::vec(inner, 0..4)).prop_map(|(code, children)| Category {
            id: format!("id-{code}"),
            localized_name: format!("name-{code}"),
            code,
            children,
            ..Default::default()
        })
    })
}

fn count_nodes(categories: &[Category]) -> usize {
    categories
        .iter()
        .map(|c| 1 + count_nodes(&c.children))
        .sum()
}

/// Independent reference walk: (code, level, parent_code) in pre-order
fn reference_walk(
    out: &mut Vec<(String, u32, Option<String>)>,
    categories: &[Category],
    parent: Option<&str>,
    level: u32,
) {
    for category in categories {
        out.push((category.code.clone(), level, parent.map(str::to_owned)));
        reference_walk(out, &category.children, Some(&category.code), level + 1);
    }
}

fn count_main_codes(categories: &[Category]) -> usize {
    categories
        .iter()
        .map(|c| usize::from(c.code.starts_with("CTG10")) + count_main_codes(&c.children))
        .sum()
}

proptest! {
    #[test]
    fn flatten_visits_every_node_exactly_once_in_preorder(
        roots in prop::collection::vec(arb_category_tree(), 0..4)
    ) {
        let flat = flatten_categories(&roots);
        prop_assert_eq!(flat.len(), count_nodes(&roots));

        let mut expected = Vec::new();
        reference_walk(&mut expected, &roots, None, 0);

        for (entry, (code, level, parent_code)) in flat.iter().zip(expected.iter()) {
            prop_assert_eq!(&entry.code, code);
            prop_assert_eq!(entry.level, *level);
            prop_assert_eq!(&entry.parent_code, parent_code);
        }
    }

    #[test]
    fn main_category_extraction_finds_every_prefixed_node(
        roots in prop::collection::vec(arb_category_tree(), 0..4)
    ) {
        let mains = extract_main_categories(&roots);
        prop_assert_eq!(mains.len(), count_main_codes(&roots));
        prop_assert!(mains.iter().all(|c| c.level == 0 && c.is_main_category));
        prop_assert!(mains.iter().all(|c| c.code.starts_with("CTG10")));
    }
}
