use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marker written to the normalized table for an absent categorical value.
pub const MISSING_MARKER: &str = "NA";

/// Label shown (and grouped under) for an absent categorical value.
pub const UNKNOWN_LABEL: &str = "Unknown";

// ---------------------------------------------------------------------------
// Category – a categorical cell that may be absent
// ---------------------------------------------------------------------------

/// A categorical value that is either present or explicitly missing.
///
/// Persisted as the value itself or [`MISSING_MARKER`]. Reading back, both the
/// marker and an empty cell become [`Category::Missing`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Known(String),
    Missing,
}

impl Category {
    /// Build from raw text: empty (after trimming) or the marker is missing.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == MISSING_MARKER {
            Category::Missing
        } else {
            Category::Known(trimmed.to_string())
        }
    }

    /// Missing, or a value that already reads "Unknown".
    pub fn is_missing(&self) -> bool {
        match self {
            Category::Missing => true,
            Category::Known(v) => v.eq_ignore_ascii_case(UNKNOWN_LABEL),
        }
    }

    /// Display label: the value, or [`UNKNOWN_LABEL`] for either form of
    /// missingness.
    pub fn label(&self) -> &str {
        match self {
            Category::Known(v) if !self.is_missing() => v.as_str(),
            _ => UNKNOWN_LABEL,
        }
    }

    /// Whether a selection made from display labels picks this value.
    /// `Unknown` and the missing marker both select missing values.
    pub fn matches(&self, selected: &str) -> bool {
        if self.is_missing() {
            selected.eq_ignore_ascii_case(UNKNOWN_LABEL) || selected == MISSING_MARKER
        } else {
            self.label() == selected
        }
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Category::from_raw(&raw)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Known(v) => v,
            Category::Missing => MISSING_MARKER.to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// RoleSimple – simplified role category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleSimple {
    Winner,
    Shortlisted,
    Other,
}

impl RoleSimple {
    pub const ALL: [RoleSimple; 3] = [RoleSimple::Winner, RoleSimple::Shortlisted, RoleSimple::Other];

    /// Derive the simplified role from a free-text role description.
    ///
    /// Case-insensitive substring rules, first match wins:
    /// `winner` → Winner, `shortlist` / `short-listed` → Shortlisted,
    /// anything else → Other.
    pub fn from_description(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("winner") {
            RoleSimple::Winner
        } else if lower.contains("shortlist") || lower.contains("short-listed") {
            RoleSimple::Shortlisted
        } else {
            RoleSimple::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoleSimple::Winner => "Winner",
            RoleSimple::Shortlisted => "Shortlisted",
            RoleSimple::Other => "Other",
        }
    }
}

impl fmt::Display for RoleSimple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleSimple {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleSimple::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role '{s}' (expected Winner, Shortlisted or Other)"))
    }
}

// ---------------------------------------------------------------------------
// RawRecord – one row of the raw prize dataset
// ---------------------------------------------------------------------------

/// A raw prize record as supplied upstream, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub prize_id: String,
    pub prize_name: String,
    pub prize_alias: String,
    pub prize_institution: String,
    pub prize_year: i32,
    pub prize_genre: String,
    pub person_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub uk_residence: bool,
    pub ethnicity_macro: String,
    pub highest_degree: String,
    pub degree_field_cat: String,
    pub degree_institution: String,
    pub degree_field: String,
    pub person_role: String,
    pub book_id: String,
    pub book_title: String,
}

// ---------------------------------------------------------------------------
// PrizeEntry – one row of the normalized table
// ---------------------------------------------------------------------------

/// One person–prize–year association after cleaning.
///
/// Field order is the column order of the persisted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeEntry {
    pub prize_id: String,
    pub prize_name: String,
    pub prize_alias: String,
    pub prize_institution: String,
    pub prize_year: i32,
    pub prize_genre: String,
    pub person_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Category,
    pub uk_residence: bool,
    pub ethnicity_macro: Category,
    pub highest_degree: Category,
    pub degree_field_cat: String,
    pub degree_institution: String,
    pub degree_field: String,
    pub role_simple: RoleSimple,
    pub person_role: String,
    pub book_id: String,
    pub book_title: String,
}

// ---------------------------------------------------------------------------
// PrizeTable – the loaded, read-only dataset
// ---------------------------------------------------------------------------

/// The normalized table with pre-computed vocabularies for the filter widgets.
///
/// There is no mutation API; share it behind an `Arc` and hand out `&PrizeTable`.
#[derive(Debug, Clone, Default)]
pub struct PrizeTable {
    entries: Vec<PrizeEntry>,
    genres: BTreeSet<String>,
    genders: BTreeSet<String>,
    degrees: BTreeSet<String>,
    year_bounds: Option<(i32, i32)>,
}

impl PrizeTable {
    /// Build the vocabularies from the loaded entries.
    pub fn from_entries(entries: Vec<PrizeEntry>) -> Self {
        let mut genres = BTreeSet::new();
        let mut genders = BTreeSet::new();
        let mut degrees = BTreeSet::new();
        let mut year_bounds: Option<(i32, i32)> = None;

        for e in &entries {
            genres.insert(e.prize_genre.clone());
            genders.insert(e.gender.label().to_string());
            degrees.insert(e.highest_degree.label().to_string());
            year_bounds = Some(match year_bounds {
                Some((lo, hi)) => (lo.min(e.prize_year), hi.max(e.prize_year)),
                None => (e.prize_year, e.prize_year),
            });
        }

        PrizeTable {
            entries,
            genres,
            genders,
            degrees,
            year_bounds,
        }
    }

    pub fn entries(&self) -> &[PrizeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct genres, sorted.
    pub fn genres(&self) -> &BTreeSet<String> {
        &self.genres
    }

    /// Distinct gender labels (missing shown as `Unknown`), sorted.
    pub fn genders(&self) -> &BTreeSet<String> {
        &self.genders
    }

    /// Distinct highest-degree labels (missing shown as `Unknown`), sorted.
    pub fn degrees(&self) -> &BTreeSet<String> {
        &self.degrees
    }

    /// Earliest and latest prize year, `None` for an empty table.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.year_bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_reads_blank_and_marker_as_missing() {
        assert_eq!(Category::from_raw(""), Category::Missing);
        assert_eq!(Category::from_raw("   "), Category::Missing);
        assert_eq!(Category::from_raw("NA"), Category::Missing);
        assert_eq!(Category::from_raw(" Woman "), Category::Known("Woman".into()));
    }

    #[test]
    fn category_persists_missing_as_marker() {
        let s: String = Category::Missing.into();
        assert_eq!(s, MISSING_MARKER);
        let s: String = Category::Known("Man".into()).into();
        assert_eq!(s, "Man");
    }

    #[test]
    fn both_forms_of_missingness_share_a_label() {
        assert_eq!(Category::Missing.label(), UNKNOWN_LABEL);
        assert_eq!(Category::Known("unknown".into()).label(), UNKNOWN_LABEL);
        assert!(Category::Missing.matches("Unknown"));
        assert!(Category::Missing.matches(MISSING_MARKER));
        assert!(Category::Known("Unknown".into()).matches("Unknown"));
        assert!(!Category::Missing.matches("Woman"));
        assert!(Category::Known("Woman".into()).matches("Woman"));
    }

    #[test]
    fn role_rules_apply_in_order() {
        assert_eq!(RoleSimple::from_description("WINNER"), RoleSimple::Winner);
        assert_eq!(RoleSimple::from_description("Short-listed nominee"), RoleSimple::Shortlisted);
        assert_eq!(RoleSimple::from_description("shortlisted"), RoleSimple::Shortlisted);
        assert_eq!(RoleSimple::from_description("Longlisted"), RoleSimple::Other);
        assert_eq!(RoleSimple::from_description("judge"), RoleSimple::Other);
        // winner is checked first
        assert_eq!(RoleSimple::from_description("Shortlisted, then winner"), RoleSimple::Winner);
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("winner".parse::<RoleSimple>(), Ok(RoleSimple::Winner));
        assert_eq!(" SHORTLISTED ".parse::<RoleSimple>(), Ok(RoleSimple::Shortlisted));
        assert!("judge".parse::<RoleSimple>().is_err());
    }
}
