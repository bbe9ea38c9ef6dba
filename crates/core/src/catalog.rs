//! Category catalog snapshot and property resolution.
//!
//! A product's selectable custom properties ("color", "size", ...) come from
//! its category *and* every ancestor category: a category may name a parent,
//! and the product form offers the union of the whole chain, most specific
//! first. [`resolve_properties`] walks that chain over an immutable
//! [`Catalog`] snapshot loaded in full by the caller.
//!
//! Malformed category trees (dangling parents, self references, cycles) are
//! data-entry errors, not schema violations. Resolution degrades to "stop
//! walking" in every such case so the product form always renders.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// A custom property a category offers to products, with its allowed values.
///
/// Both the property list on a category and the values within a property are
/// ordered; the order is what administrators typed and what the form renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Property name, e.g. "color".
    pub name: String,
    /// Allowed values, e.g. `["red", "blue"]`.
    pub values: Vec<String>,
}

impl PropertyDefinition {
    /// Create a property definition from a name and its allowed values.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A product category.
///
/// The parent reference is stored as plain data; whether it resolves to a
/// real category is decided at resolution time against the catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Optional parent category. May dangle or even self-reference.
    pub parent: Option<CategoryId>,
    /// Properties defined directly on this category, in declared order.
    pub properties: Vec<PropertyDefinition>,
}

/// A read-only snapshot of all categories, keyed by id.
///
/// Built once from a full table load and treated as immutable for the
/// duration of any resolution call. Callers must re-fetch after category
/// CRUD to avoid resolving against stale data.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: HashMap<CategoryId, Category>,
}

impl Catalog {
    /// Build a catalog from a list of categories.
    ///
    /// Later duplicates of the same id win, matching a keyed table load.
    #[must_use]
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Look up a category by id.
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    /// Number of categories in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterate over all categories in the snapshot (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }
}

impl FromIterator<Category> for Catalog {
    fn from_iter<T: IntoIterator<Item = Category>>(iter: T) -> Self {
        Self::from_categories(iter)
    }
}

/// Resolve the full property chain for a category.
///
/// Returns the properties applicable to a product in `category_id`, ordered
/// from the assigned category (most specific) to the most distant resolvable
/// ancestor (least specific). Property names recurring at multiple levels are
/// all retained, in traversal order.
///
/// An absent or unknown `category_id` yields an empty list ("uncategorized":
/// no extra form fields). A missing or dangling parent reference ends the
/// walk; a revisited id (cycle) ends it too, so traversal always terminates
/// and each category contributes its properties at most once. No case is an
/// error.
#[must_use]
pub fn resolve_properties(
    catalog: &Catalog,
    category_id: Option<CategoryId>,
) -> Vec<PropertyDefinition> {
    let mut resolved = Vec::new();
    let mut visited = HashSet::new();

    let mut current = category_id.and_then(|id| catalog.get(id));
    while let Some(category) = current {
        if !visited.insert(category.id) {
            break;
        }
        resolved.extend(category.properties.iter().cloned());
        current = category.parent.and_then(|parent| catalog.get(parent));
    }

    resolved
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn prop(name: &str, values: &[&str]) -> PropertyDefinition {
        PropertyDefinition::new(name, values.iter().map(ToString::to_string).collect())
    }

    fn category(
        id: i32,
        name: &str,
        parent: Option<i32>,
        properties: Vec<PropertyDefinition>,
    ) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
            parent: parent.map(CategoryId::new),
            properties,
        }
    }

    #[test]
    fn test_unset_category_resolves_empty() {
        let catalog = Catalog::from_categories([category(1, "sweets", None, vec![])]);
        assert!(resolve_properties(&catalog, None).is_empty());
    }

    #[test]
    fn test_unknown_category_resolves_empty() {
        let catalog = Catalog::from_categories([category(1, "sweets", None, vec![])]);
        let resolved = resolve_properties(&catalog, Some(CategoryId::new(99)));
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_empty_catalog_resolves_empty() {
        let catalog = Catalog::default();
        assert!(resolve_properties(&catalog, Some(CategoryId::new(1))).is_empty());
    }

    #[test]
    fn test_root_category_resolves_own_properties() {
        let catalog = Catalog::from_categories([category(
            1,
            "laddu",
            None,
            vec![prop("size", &["S", "M", "L"]), prop("ghee", &["yes", "no"])],
        )]);

        let resolved = resolve_properties(&catalog, Some(CategoryId::new(1)));
        assert_eq!(
            resolved,
            vec![prop("size", &["S", "M", "L"]), prop("ghee", &["yes", "no"])]
        );
    }

    #[test]
    fn test_three_level_chain_concatenates_leaf_to_root() {
        // A -> B -> C, C has no parent
        let catalog = Catalog::from_categories([
            category(1, "besan laddu", Some(2), vec![prop("flavor", &["plain"])]),
            category(2, "laddu", Some(3), vec![prop("size", &["S", "M"])]),
            category(3, "sweets", None, vec![prop("box", &["250g", "500g"])]),
        ]);

        let resolved = resolve_properties(&catalog, Some(CategoryId::new(1)));
        assert_eq!(
            resolved,
            vec![
                prop("flavor", &["plain"]),
                prop("size", &["S", "M"]),
                prop("box", &["250g", "500g"]),
            ]
        );
    }

    #[test]
    fn test_dangling_parent_stops_traversal() {
        let catalog = Catalog::from_categories([category(
            1,
            "laddu",
            Some(42),
            vec![prop("size", &["S"])],
        )]);

        let resolved = resolve_properties(&catalog, Some(CategoryId::new(1)));
        assert_eq!(resolved, vec![prop("size", &["S"])]);
    }

    #[test]
    fn test_self_referential_parent_terminates() {
        let catalog = Catalog::from_categories([category(
            1,
            "laddu",
            Some(1),
            vec![prop("size", &["S"])],
        )]);

        let resolved = resolve_properties(&catalog, Some(CategoryId::new(1)));
        assert_eq!(resolved, vec![prop("size", &["S"])]);
    }

    #[test]
    fn test_cycle_terminates_with_one_pass_each() {
        // A -> B -> A
        let catalog = Catalog::from_categories([
            category(1, "a", Some(2), vec![prop("color", &["red"])]),
            category(2, "b", Some(1), vec![prop("size", &["M"])]),
        ]);

        let resolved = resolve_properties(&catalog, Some(CategoryId::new(1)));
        assert_eq!(resolved, vec![prop("color", &["red"]), prop("size", &["M"])]);
    }

    #[test]
    fn test_duplicate_property_names_retained_at_every_level() {
        let catalog = Catalog::from_categories([
            category(1, "leaf", Some(2), vec![prop("color", &["red", "blue"])]),
            category(2, "root", None, vec![prop("color", &["green"])]),
        ]);

        let resolved = resolve_properties(&catalog, Some(CategoryId::new(1)));
        assert_eq!(
            resolved,
            vec![prop("color", &["red", "blue"]), prop("color", &["green"])]
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let catalog = Catalog::from_categories([
            category(1, "a", Some(2), vec![prop("color", &["red", "blue"])]),
            category(2, "b", None, vec![prop("size", &["S", "M", "L"])]),
        ]);

        let first = resolve_properties(&catalog, Some(CategoryId::new(1)));
        let second = resolve_properties(&catalog, Some(CategoryId::new(1)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_two_level_example() {
        // catalog = {A: {parent: B, [color: red|blue]}, B: {parent: null, [size: S|M|L]}}
        let catalog = Catalog::from_categories([
            category(1, "A", Some(2), vec![prop("color", &["red", "blue"])]),
            category(2, "B", None, vec![prop("size", &["S", "M", "L"])]),
        ]);

        let resolved = resolve_properties(&catalog, Some(CategoryId::new(1)));
        assert_eq!(
            resolved,
            vec![
                prop("color", &["red", "blue"]),
                prop("size", &["S", "M", "L"]),
            ]
        );
    }

    #[test]
    fn test_catalog_later_duplicate_wins() {
        let catalog = Catalog::from_categories([
            category(1, "old", None, vec![]),
            category(1, "new", None, vec![prop("size", &["S"])]),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(CategoryId::new(1)).unwrap().name, "new");
    }
}
