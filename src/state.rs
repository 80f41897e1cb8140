use std::sync::Arc;

use crate::data::aggregate::{compute_views, Views};
use crate::data::filter::{Choice, FilterState};
use crate::data::model::{PrizeTable, RoleSimple};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One user's view of the shared table: their filters and the views last
/// computed from them.
///
/// The table is shared read-only; every mutator recomputes the views so they
/// always reflect the current filters.
#[derive(Debug, Clone)]
pub struct Session {
    table: Arc<PrizeTable>,
    filters: FilterState,
    views: Views,
}

impl Session {
    /// Open a session with the table's default filters.
    pub fn new(table: Arc<PrizeTable>) -> Self {
        let filters = FilterState::for_table(&table);
        let views = compute_views(&table, &filters);
        Self {
            table,
            filters,
            views,
        }
    }

    pub fn table(&self) -> &PrizeTable {
        &self.table
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    /// Replace the whole filter state.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.refresh();
    }

    /// Recompute every view from the current filters.
    pub fn refresh(&mut self) {
        self.views = compute_views(&self.table, &self.filters);
    }

    /// Back to the state a fresh session opens with.
    pub fn reset(&mut self) {
        self.set_filters(FilterState::for_table(&self.table));
    }

    pub fn set_year_range(&mut self, lo: i32, hi: i32) {
        self.filters.year_range = Some((lo, hi));
        self.refresh();
    }

    /// Toggle a single genre in the selection. An unset selection counts as
    /// every genre selected.
    pub fn toggle_genre(&mut self, genre: &str) {
        let all = self.table.genres();
        let selected = self.filters.genres.get_or_insert_with(|| all.clone());
        if !selected.remove(genre) {
            selected.insert(genre.to_string());
        }
        self.refresh();
    }

    pub fn select_all_genres(&mut self) {
        self.filters.genres = Some(self.table.genres().clone());
        self.refresh();
    }

    pub fn select_no_genres(&mut self) {
        self.filters.genres = Some(Default::default());
        self.refresh();
    }

    pub fn is_genre_selected(&self, genre: &str) -> bool {
        self.filters
            .genres
            .as_ref()
            .map_or(true, |g| g.contains(genre))
    }

    pub fn set_role(&mut self, role: Choice<RoleSimple>) {
        self.filters.role = role;
        self.refresh();
    }

    pub fn set_gender(&mut self, gender: Choice<String>) {
        self.filters.gender = gender;
        self.refresh();
    }

    pub fn set_uk_only(&mut self, uk_only: bool) {
        self.filters.uk_only = uk_only;
        self.refresh();
    }

    pub fn set_degree(&mut self, degree: Choice<String>) {
        self.filters.degree = degree;
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Category, PrizeEntry};

    fn entry(year: i32, genre: &str) -> PrizeEntry {
        PrizeEntry {
            prize_id: "1".into(),
            prize_name: "Prize".into(),
            prize_alias: String::new(),
            prize_institution: String::new(),
            prize_year: year,
            prize_genre: genre.into(),
            person_id: format!("{genre}{year}"),
            first_name: String::new(),
            last_name: String::new(),
            gender: Category::Missing,
            uk_residence: year % 2 == 0,
            ethnicity_macro: Category::Missing,
            highest_degree: Category::Missing,
            degree_field_cat: String::new(),
            degree_institution: String::new(),
            degree_field: String::new(),
            role_simple: RoleSimple::Winner,
            person_role: "Winner".into(),
            book_id: format!("{genre}{year}"),
            book_title: String::new(),
        }
    }

    fn shared() -> Arc<PrizeTable> {
        Arc::new(PrizeTable::from_entries(vec![
            entry(2019, "Fiction"),
            entry(2020, "Fiction"),
            entry(2020, "Poetry"),
        ]))
    }

    #[test]
    fn new_session_shows_everything() {
        let s = Session::new(shared());
        assert_eq!(s.views().summary.total_rows, 3);
        assert_eq!(s.filters().year_range, Some((2019, 2020)));
    }

    #[test]
    fn mutators_recompute_views() {
        let mut s = Session::new(shared());
        s.toggle_genre("Poetry");
        assert!(!s.is_genre_selected("Poetry"));
        assert_eq!(s.views().summary.total_rows, 2);

        s.set_uk_only(true);
        assert_eq!(s.views().summary.total_rows, 1);

        s.select_no_genres();
        assert!(s.views().is_empty());

        s.reset();
        assert_eq!(s.views().summary.total_rows, 3);

        s.set_filters(FilterState::default());
        s.toggle_genre("Fiction");
        assert_eq!(s.views().summary.total_rows, 1);
    }

    #[test]
    fn sessions_sharing_a_table_are_isolated() {
        let table = shared();
        let mut a = Session::new(Arc::clone(&table));
        let b = Session::new(Arc::clone(&table));
        a.set_year_range(2019, 2019);
        assert_eq!(a.views().summary.total_rows, 1);
        assert_eq!(b.views().summary.total_rows, 3);
        assert_eq!(Arc::strong_count(&table), 3);
    }
}
