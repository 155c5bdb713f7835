use crate::models::PropertyRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Ordering applied to the filtered listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Keep the order the API returned
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    AreaDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::AreaDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::AreaDesc => "area_desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "Newest",
            SortKey::PriceAsc => "Price: Low → High",
            SortKey::PriceDesc => "Price: High → Low",
            SortKey::AreaDesc => "Area: Large → Small",
        }
    }

    fn compare(self, a: &PropertyRecord, b: &PropertyRecord) -> Ordering {
        match self {
            SortKey::Newest => Ordering::Equal,
            SortKey::PriceAsc => a.price.total_cmp(&b.price),
            SortKey::PriceDesc => b.price.total_cmp(&a.price),
            SortKey::AreaDesc => b.area.total_cmp(&a.area),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised keys fall back to `newest`, so parsing never fails.
impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "price_asc" => SortKey::PriceAsc,
            "price_desc" => SortKey::PriceDesc,
            "area_desc" => SortKey::AreaDesc,
            _ => SortKey::Newest,
        })
    }
}

/// Property type choices offered by the list view; `None` means all types.
pub const PROPERTY_TYPES: [(&str, Option<&str>); 5] = [
    ("All Types", None),
    ("Apartment", Some("apartment")),
    ("Villa", Some("villa")),
    ("Office", Some("office")),
    ("Land", Some("land")),
];

/// Looks up a type choice by value or label, ignoring case. `all` selects
/// every type; `None` means the input is not in [`PROPERTY_TYPES`].
pub fn property_type_choice(input: &str) -> Option<Option<&'static str>> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return Some(None);
    }
    PROPERTY_TYPES
        .iter()
        .find(|(label, value)| {
            label.eq_ignore_ascii_case(input)
                || value.map_or(false, |value| value.eq_ignore_ascii_case(input))
        })
        .map(|(_, value)| *value)
}

/// Search, type and sort state of the property list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub search_query: String,
    pub selected_type: Option<String>,
    pub sort_key: SortKey,
}

impl FilterConfig {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn matches(&self, query: &str, record: &PropertyRecord) -> bool {
        let property_type = record.property_type.to_lowercase();

        let matches_search = query.is_empty()
            || record.city.to_lowercase().contains(query)
            || record.district.to_lowercase().contains(query)
            || property_type.contains(query);

        let matches_type = self
            .selected_type
            .as_deref()
            .map_or(true, |selected| property_type == selected);

        matches_search && matches_type
    }
}

/// Returns the records passing `config`, ordered by its sort key.
///
/// The input slice is left untouched; ties keep their input order.
pub fn apply(records: &[PropertyRecord], config: &FilterConfig) -> Vec<PropertyRecord> {
    let query = config.search_query.trim().to_lowercase();

    let mut list: Vec<PropertyRecord> = records
        .iter()
        .filter(|record| config.matches(&query, record))
        .cloned()
        .collect();

    if config.sort_key != SortKey::Newest {
        // sort_by is stable
        list.sort_by(|a, b| config.sort_key.compare(a, b));
    }

    list
}
