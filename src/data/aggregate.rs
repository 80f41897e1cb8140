use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::filter::{filtered_rows, FilterState};
use super::model::{PrizeEntry, PrizeTable, RoleSimple};

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
    /// Fraction of the filtered total, in `0.0..=1.0`.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total_rows: usize,
    pub unique_people: usize,
    pub unique_books: usize,
    /// `None` when nothing matches.
    pub year_range: Option<(i32, i32)>,
}

impl Summary {
    /// Key/value lines for a textual summary.
    pub fn key_values(&self) -> Vec<(&'static str, String)> {
        let (first, last) = match self.year_range {
            Some((lo, hi)) => (lo.to_string(), hi.to_string()),
            None => ("n/a".to_string(), "n/a".to_string()),
        };
        vec![
            ("Entries", self.total_rows.to_string()),
            ("Unique authors", self.unique_people.to_string()),
            ("Unique books", self.unique_books.to_string()),
            ("First year", first),
            ("Last year", last),
        ]
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.key_values() {
            writeln!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearGenreCount {
    pub year: i32,
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemographicCount {
    pub genre: String,
    pub gender: String,
    pub degree: String,
    pub count: usize,
}

/// One row of the browsable table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub prize_year: i32,
    pub prize_name: String,
    pub prize_genre: String,
    pub role_simple: RoleSimple,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub uk_residence: bool,
    pub highest_degree: String,
    pub degree_field_cat: String,
    pub book_title: String,
}

impl DisplayRow {
    pub const HEADERS: [&'static str; 11] = [
        "prize_year",
        "prize_name",
        "prize_genre",
        "role_simple",
        "first_name",
        "last_name",
        "gender",
        "uk_residence",
        "highest_degree",
        "degree_field_cat",
        "book_title",
    ];

    pub fn from_entry(e: &PrizeEntry) -> Self {
        Self {
            prize_year: e.prize_year,
            prize_name: e.prize_name.clone(),
            prize_genre: e.prize_genre.clone(),
            role_simple: e.role_simple,
            first_name: e.first_name.clone(),
            last_name: e.last_name.clone(),
            gender: e.gender.label().to_string(),
            uk_residence: e.uk_residence,
            highest_degree: e.highest_degree.label().to_string(),
            degree_field_cat: e.degree_field_cat.clone(),
            book_title: e.book_title.clone(),
        }
    }

    /// Cell text in [`Self::HEADERS`] order.
    pub fn cells(&self) -> [String; 11] {
        [
            self.prize_year.to_string(),
            self.prize_name.clone(),
            self.prize_genre.clone(),
            self.role_simple.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.gender.clone(),
            self.uk_residence.to_string(),
            self.highest_degree.clone(),
            self.degree_field_cat.clone(),
            self.book_title.clone(),
        ]
    }

    /// Case-insensitive substring search over every displayed cell.
    /// `needle` must already be lower case; an empty needle matches.
    pub fn contains(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .cells()
                .iter()
                .any(|cell| cell.to_lowercase().contains(needle))
    }
}

/// Everything the presentation layer draws for one filter state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Views {
    pub genre_distribution: Vec<GenreCount>,
    pub summary: Summary,
    pub time_series: Vec<YearGenreCount>,
    pub demographics: Vec<DemographicCount>,
    pub rows: Vec<DisplayRow>,
}

impl Views {
    pub fn is_empty(&self) -> bool {
        self.summary.total_rows == 0
    }
}

// ---------------------------------------------------------------------------
// Aggregations over an already-filtered subset
// ---------------------------------------------------------------------------

/// Rows per genre with their share of the total, smallest count first.
pub fn genre_distribution(rows: &[&PrizeEntry]) -> Vec<GenreCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for e in rows {
        *counts.entry(e.prize_genre.as_str()).or_default() += 1;
    }

    let total = rows.len() as f64;
    let mut out: Vec<GenreCount> = counts
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
            share: count as f64 / total,
        })
        .collect();
    // BTreeMap already ordered by name, so a stable sort keeps name as tiebreak.
    out.sort_by_key(|g| g.count);
    out
}

pub fn summary(rows: &[&PrizeEntry]) -> Summary {
    let people: HashSet<&str> = rows.iter().map(|e| e.person_id.as_str()).collect();
    let books: HashSet<&str> = rows.iter().map(|e| e.book_id.as_str()).collect();
    let year_range = rows.iter().map(|e| e.prize_year).fold(None, |acc, y| {
        Some(match acc {
            Some((lo, hi)) => (y.min(lo), y.max(hi)),
            None => (y, y),
        })
    });

    Summary {
        total_rows: rows.len(),
        unique_people: people.len(),
        unique_books: books.len(),
        year_range,
    }
}

/// Sparse (year, genre) counts sorted by year then genre.
pub fn time_series(rows: &[&PrizeEntry]) -> Vec<YearGenreCount> {
    let mut counts: BTreeMap<(i32, &str), usize> = BTreeMap::new();
    for e in rows {
        *counts.entry((e.prize_year, e.prize_genre.as_str())).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((year, genre), count)| YearGenreCount {
            year,
            genre: genre.to_string(),
            count,
        })
        .collect()
}

/// (genre, gender, degree) counts after the degree filter, with both forms of
/// missingness grouped under `Unknown`.
pub fn demographics(rows: &[&PrizeEntry], filters: &FilterState) -> Vec<DemographicCount> {
    let mut counts: BTreeMap<(&str, &str, &str), usize> = BTreeMap::new();
    for e in rows.iter().filter(|e| filters.matches_degree(e)) {
        let key = (
            e.prize_genre.as_str(),
            e.gender.label(),
            e.highest_degree.label(),
        );
        *counts.entry(key).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((genre, gender, degree), count)| DemographicCount {
            genre: genre.to_string(),
            gender: gender.to_string(),
            degree: degree.to_string(),
            count,
        })
        .collect()
}

pub fn row_listing(rows: &[&PrizeEntry]) -> Vec<DisplayRow> {
    rows.iter().map(|e| DisplayRow::from_entry(e)).collect()
}

/// Filter the table and compute every view in one pass over the subset.
pub fn compute_views(table: &PrizeTable, filters: &FilterState) -> Views {
    let rows = filtered_rows(table, filters);
    log::debug!("{} of {} entries pass the filters", rows.len(), table.len());

    Views {
        genre_distribution: genre_distribution(&rows),
        summary: summary(&rows),
        time_series: time_series(&rows),
        demographics: demographics(&rows, filters),
        rows: row_listing(&rows),
    }
}
