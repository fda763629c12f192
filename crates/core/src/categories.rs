//! Well-known event category constants.
//!
//! These must match the values accepted by the `events.category` CHECK
//! constraint in the initial migration.

pub const CATEGORY_ACADEMICS: &str = "academics";
pub const CATEGORY_SPORTS: &str = "sports";
pub const CATEGORY_WORKSHOPS: &str = "workshops";
pub const CATEGORY_CULTURAL: &str = "cultural";
pub const CATEGORY_OTHER: &str = "other";

/// Every category an event row may carry.
pub const ALL_CATEGORIES: &[&str] = &[
    CATEGORY_ACADEMICS,
    CATEGORY_SPORTS,
    CATEGORY_WORKSHOPS,
    CATEGORY_CULTURAL,
    CATEGORY_OTHER,
];

/// Check whether a string names a known category.
pub fn is_valid_category(category: &str) -> bool {
    ALL_CATEGORIES.contains(&category)
}
