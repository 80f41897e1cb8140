use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::app::TableView;
use crate::data::aggregate::{DisplayRow, Views};

/// Indices of the rows matching the search box, in listing order.
pub fn search(rows: &[DisplayRow], query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, r)| r.contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Number of pages needed for `n` rows; an empty listing still has one page.
pub fn page_count(n: usize, page_size: usize) -> usize {
    n.div_ceil(page_size.max(1)).max(1)
}

/// Render the searchable, paginated row listing.
pub fn row_listing(ui: &mut Ui, views: &Views, state: &mut TableView, page_size: usize) {
    let page_size = page_size.max(1);

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search:");
        if ui.text_edit_singleline(&mut state.search).changed() {
            state.page = 0;
        }
    });

    let hits = search(&views.rows, &state.search);
    let pages = page_count(hits.len(), page_size);
    state.page = state.page.min(pages - 1);

    ui.horizontal(|ui: &mut Ui| {
        if ui.add_enabled(state.page > 0, egui::Button::new("◀")).clicked() {
            state.page -= 1;
        }
        ui.label(format!("Page {} of {}", state.page + 1, pages));
        if ui.add_enabled(state.page + 1 < pages, egui::Button::new("▶")).clicked() {
            state.page += 1;
        }
        ui.label(format!("{} rows", hits.len()));
    });
    ui.separator();

    if hits.is_empty() {
        ui.label("No entries match the current filters.");
        return;
    }

    let start = state.page * page_size;
    let page: Vec<&DisplayRow> = hits
        .iter()
        .skip(start)
        .take(page_size)
        .map(|&i| &views.rows[i])
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), DisplayRow::HEADERS.len())
        .header(20.0, |mut header| {
            for name in DisplayRow::HEADERS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, page.len(), |mut row| {
                let cells = page[row.index()].cells();
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up_and_never_hits_zero() {
        assert_eq!(page_count(0, 25), 1);
        assert_eq!(page_count(25, 25), 1);
        assert_eq!(page_count(26, 25), 2);
        assert_eq!(page_count(3, 0), 3);
    }
}
