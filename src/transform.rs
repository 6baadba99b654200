//! Derivation of the category dimension from product rows.

use crate::extract::ProductRow;
use std::collections::BTreeSet;

/// A derived category, identified by its trimmed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub name: String,
}

/// The product's category the way the graph stores it: trimmed, with
/// empty-after-trim treated as absent. The loader uses this same
/// helper, so the category pass and the IN_CATEGORY condition can
/// never disagree about what counts as a category.
pub fn normalized_category(product: &ProductRow) -> Option<&str> {
    product
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
}

/// Distinct trimmed non-empty categories, in sorted order. Sorting is
/// for reproducible fixtures and stable batch membership.
pub fn derive_categories(products: &[ProductRow]) -> Vec<CategoryRecord> {
    let names: BTreeSet<&str> = products.iter().filter_map(normalized_category).collect();
    names
        .into_iter()
        .map(|name| CategoryRecord {
            name: name.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, category: Option<&str>) -> ProductRow {
        ProductRow {
            id,
            name: format!("product-{}", id),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn trims_dedups_and_drops_empty_categories() {
        let products = vec![
            product(1, Some("Books")),
            product(2, Some(" Toys ")),
            product(3, Some("")),
            product(4, None),
            product(5, Some("Books")),
        ];

        let categories = derive_categories(&products);
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Books", "Toys"]);
    }

    #[test]
    fn output_is_sorted() {
        let products = vec![
            product(1, Some("Zeta")),
            product(2, Some("Alpha")),
            product(3, Some("Mid")),
        ];

        let names: Vec<String> = derive_categories(&products)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn deduplication_is_case_sensitive() {
        let products = vec![product(1, Some("books")), product(2, Some("Books"))];
        assert_eq!(derive_categories(&products).len(), 2);
    }

    #[test]
    fn whitespace_only_category_is_absent() {
        let p = product(1, Some("   "));
        assert_eq!(normalized_category(&p), None);
        assert!(derive_categories(&[p]).is_empty());
    }

    #[test]
    fn no_products_means_no_categories() {
        assert!(derive_categories(&[]).is_empty());
    }
}
