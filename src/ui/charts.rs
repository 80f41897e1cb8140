use std::collections::BTreeMap;

use eframe::egui::{self, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::{generate_palette, ColorMap};
use crate::data::aggregate::Views;
use crate::data::filter::{Choice, ALL};
use crate::state::Session;

const NO_DATA: &str = "No entries match the current filters.";

fn no_data(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(NO_DATA);
    });
}

// ---------------------------------------------------------------------------
// Overview: summary grid + genre distribution
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, views: &Views, colors: &ColorMap) {
    egui::Grid::new("summary_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for (key, value) in views.summary.key_values() {
                ui.strong(key);
                ui.label(value);
                ui.end_row();
            }
        });
    ui.separator();

    if views.genre_distribution.is_empty() {
        no_data(ui);
        return;
    }

    // One chart per genre so each gets its own legend entry and colour.
    Plot::new("genre_distribution")
        .legend(Legend::default())
        .y_axis_label("Genre")
        .x_axis_label("Entries")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, g) in views.genre_distribution.iter().enumerate() {
                let bar = Bar::new(i as f64, g.count as f64)
                    .width(0.7)
                    .name(format!("{} ({:.1}%)", g.genre, g.share * 100.0));
                let chart = BarChart::new(vec![bar])
                    .horizontal()
                    .color(colors.color_for(&g.genre))
                    .name(&g.genre);
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Trends: entries per year, one line per genre
// ---------------------------------------------------------------------------

pub fn trends(ui: &mut Ui, views: &Views, colors: &ColorMap) {
    if views.time_series.is_empty() {
        no_data(ui);
        return;
    }

    let mut by_genre: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in &views.time_series {
        by_genre
            .entry(p.genre.as_str())
            .or_default()
            .push([p.year as f64, p.count as f64]);
    }

    Plot::new("time_series")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Entries")
        .show(ui, |plot_ui| {
            for (genre, points) in by_genre {
                let line = Line::new(PlotPoints::from(points))
                    .name(genre)
                    .color(colors.color_for(genre))
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Demographics: degree selector + entries per genre stacked by gender
// ---------------------------------------------------------------------------

pub fn demographics(ui: &mut Ui, session: &mut Session) {
    let current = session.filters().degree.clone();
    let options: Vec<String> = session.table().degrees().iter().cloned().collect();

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Highest degree");
        egui::ComboBox::from_id_salt("degree")
            .selected_text(current.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                if ui.selectable_label(current.is_all(), ALL).clicked() {
                    session.set_degree(Choice::All);
                }
                for d in options {
                    let selected = current.as_only() == Some(&d);
                    if ui.selectable_label(selected, d.as_str()).clicked() {
                        session.set_degree(Choice::Only(d));
                    }
                }
            });
    });
    ui.separator();

    let rows = &session.views().demographics;
    if rows.is_empty() {
        no_data(ui);
        return;
    }

    // genre → x position, gender → (genre → count)
    let genres: Vec<&str> = {
        let mut g: Vec<&str> = rows.iter().map(|r| r.genre.as_str()).collect();
        g.dedup();
        g
    };
    let mut by_gender: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for r in rows {
        *by_gender
            .entry(r.gender.as_str())
            .or_default()
            .entry(r.genre.as_str())
            .or_default() += r.count;
    }

    let palette = generate_palette(by_gender.len());
    let mut charts: Vec<BarChart> = Vec::with_capacity(by_gender.len());
    for ((gender, counts), color) in by_gender.iter().zip(palette) {
        let bars: Vec<Bar> = genres
            .iter()
            .enumerate()
            .map(|(x, genre)| {
                let count = counts.get(genre).copied().unwrap_or(0);
                Bar::new(x as f64, count as f64)
                    .width(0.7)
                    .name(format!("{genre} / {gender}"))
            })
            .collect();
        let others: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .color(color)
            .name(*gender)
            .stack_on(&others);
        charts.push(chart);
    }

    ui.label(format!("Genres left to right: {}", genres.join(", ")));
    Plot::new("demographics")
        .legend(Legend::default())
        .x_axis_label("Genre")
        .y_axis_label("Entries")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
