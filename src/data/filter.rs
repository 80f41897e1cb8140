use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::model::{PrizeEntry, PrizeTable, RoleSimple};

// ---------------------------------------------------------------------------
// Choice – a single selection with an "All" sentinel
// ---------------------------------------------------------------------------

/// Sentinel text for an inert single-value selection.
pub const ALL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T> Choice<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Only(v) => Some(v),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str(ALL),
            Choice::Only(v) => write!(f, "{v}"),
        }
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(Choice::All)
        } else {
            s.trim().parse().map(Choice::Only)
        }
    }
}

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// The current filter selections. Every field is inert in its default state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    /// Inclusive `[lo, hi]`; `None` keeps every year.
    pub year_range: Option<(i32, i32)>,
    /// Selected genres; `None` keeps every genre, an empty set keeps nothing.
    pub genres: Option<BTreeSet<String>>,
    pub role: Choice<RoleSimple>,
    /// Gender label; `Unknown` selects missing values.
    pub gender: Choice<String>,
    pub uk_only: bool,
    /// Applied by the demographics view only.
    pub degree: Choice<String>,
}

impl FilterState {
    /// The state the dashboard opens with: the table's full year span and
    /// every genre selected.
    pub fn for_table(table: &PrizeTable) -> Self {
        Self {
            year_range: table.year_bounds(),
            genres: Some(table.genres().clone()),
            ..Self::default()
        }
    }

    /// Whether an entry passes every shared predicate (all but degree).
    pub fn matches(&self, entry: &PrizeEntry) -> bool {
        if let Some((lo, hi)) = self.year_range {
            if entry.prize_year < lo || entry.prize_year > hi {
                return false;
            }
        }
        if let Some(genres) = &self.genres {
            if !genres.contains(&entry.prize_genre) {
                return false;
            }
        }
        if let Choice::Only(role) = self.role {
            if entry.role_simple != role {
                return false;
            }
        }
        if let Choice::Only(gender) = &self.gender {
            if !entry.gender.matches(gender) {
                return false;
            }
        }
        if self.uk_only && !entry.uk_residence {
            return false;
        }
        true
    }

    /// The demographics-only degree predicate.
    pub fn matches_degree(&self, entry: &PrizeEntry) -> bool {
        match &self.degree {
            Choice::All => true,
            Choice::Only(degree) => entry.highest_degree.matches(degree),
        }
    }
}

/// Return the entries that pass all shared filters, in table order.
pub fn filtered_rows<'a>(table: &'a PrizeTable, filters: &FilterState) -> Vec<&'a PrizeEntry> {
    table
        .entries()
        .iter()
        .filter(|e| filters.matches(e))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Category;

    fn entry(year: i32, genre: &str, role: RoleSimple, gender: Category, uk: bool) -> PrizeEntry {
        PrizeEntry {
            prize_id: "1".into(),
            prize_name: "Prize".into(),
            prize_alias: String::new(),
            prize_institution: String::new(),
            prize_year: year,
            prize_genre: genre.into(),
            person_id: format!("p{year}"),
            first_name: "A".into(),
            last_name: "B".into(),
            gender,
            uk_residence: uk,
            ethnicity_macro: Category::Missing,
            highest_degree: Category::Missing,
            degree_field_cat: String::new(),
            degree_institution: String::new(),
            degree_field: String::new(),
            role_simple: role,
            person_role: role.to_string(),
            book_id: format!("b{year}"),
            book_title: "T".into(),
        }
    }

    fn table() -> PrizeTable {
        PrizeTable::from_entries(vec![
            entry(2019, "Fiction", RoleSimple::Winner, Category::Known("Woman".into()), true),
            entry(2020, "Poetry", RoleSimple::Shortlisted, Category::Missing, false),
            entry(2021, "Fiction", RoleSimple::Other, Category::Known("Man".into()), true),
        ])
    }

    #[test]
    fn default_state_keeps_everything() {
        let t = table();
        assert_eq!(filtered_rows(&t, &FilterState::default()).len(), 3);
        assert_eq!(filtered_rows(&t, &FilterState::for_table(&t)).len(), 3);
    }

    #[test]
    fn empty_genre_selection_keeps_nothing() {
        let t = table();
        let filters = FilterState {
            genres: Some(BTreeSet::new()),
            ..FilterState::default()
        };
        assert!(filtered_rows(&t, &filters).is_empty());
    }

    #[test]
    fn year_range_is_inclusive_and_reversed_range_is_empty() {
        let t = table();
        let mut filters = FilterState {
            year_range: Some((2019, 2020)),
            ..FilterState::default()
        };
        assert_eq!(filtered_rows(&t, &filters).len(), 2);
        filters.year_range = Some((2021, 2019));
        assert!(filtered_rows(&t, &filters).is_empty());
    }

    #[test]
    fn predicates_combine_with_and() {
        let t = table();
        let filters = FilterState {
            genres: Some(BTreeSet::from(["Fiction".to_string()])),
            uk_only: true,
            role: Choice::Only(RoleSimple::Other),
            ..FilterState::default()
        };
        let rows = filtered_rows(&t, &filters);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].prize_year, 2021);
    }

    #[test]
    fn unknown_gender_selects_missing_values() {
        let t = table();
        let filters = FilterState {
            gender: Choice::Only("Unknown".into()),
            ..FilterState::default()
        };
        let rows = filtered_rows(&t, &filters);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].prize_genre, "Poetry");
    }

    #[test]
    fn absent_category_matches_nothing() {
        let t = table();
        let filters = FilterState {
            genres: Some(BTreeSet::from(["Drama".to_string()])),
            ..FilterState::default()
        };
        assert!(filtered_rows(&t, &filters).is_empty());
    }

    #[test]
    fn choice_parses_all_sentinel() {
        assert_eq!("all".parse::<Choice<RoleSimple>>(), Ok(Choice::All));
        assert_eq!(
            "Winner".parse::<Choice<RoleSimple>>(),
            Ok(Choice::Only(RoleSimple::Winner))
        );
        assert_eq!(Choice::<String>::All.to_string(), "All");
    }
}
