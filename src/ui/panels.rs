use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::app::{DashboardApp, Tab};
use crate::data::filter::{Choice, ALL};
use crate::data::model::RoleSimple;
use crate::state::Session;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the filter panel. Returns `true` when any filter changed.
pub fn side_panel(ui: &mut Ui, session: &mut Session) -> bool {
    ui.heading("Filters");
    ui.separator();

    let before = session.filters().clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            year_range(ui, session);
            ui.separator();
            genres(ui, session);
            ui.separator();
            role(ui, session);
            gender(ui, session);
            ui.separator();

            let mut uk_only = session.filters().uk_only;
            if ui.checkbox(&mut uk_only, "UK residents only").changed() {
                session.set_uk_only(uk_only);
            }

            ui.add_space(8.0);
            if ui.button("Reset filters").clicked() {
                session.reset();
            }
        });

    *session.filters() != before
}

fn year_range(ui: &mut Ui, session: &mut Session) {
    let Some((min, max)) = session.table().year_bounds() else {
        return;
    };
    let (mut lo, mut hi) = session.filters().year_range.unwrap_or((min, max));

    ui.strong("Years");
    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        changed |= ui.add(egui::DragValue::new(&mut lo).range(min..=max)).changed();
        ui.label("to");
        changed |= ui.add(egui::DragValue::new(&mut hi).range(min..=max)).changed();
    });
    if changed {
        session.set_year_range(lo, hi);
    }
}

fn genres(ui: &mut Ui, session: &mut Session) {
    let all: Vec<String> = session.table().genres().iter().cloned().collect();
    let n_selected = all.iter().filter(|g| session.is_genre_selected(g)).count();
    let header_text = format!("Genres  ({n_selected}/{})", all.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("genres")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    session.select_all_genres();
                }
                if ui.small_button("None").clicked() {
                    session.select_no_genres();
                }
            });

            for genre in &all {
                let mut checked = session.is_genre_selected(genre);
                if ui.checkbox(&mut checked, genre.as_str()).changed() {
                    session.toggle_genre(genre);
                }
            }
        });
}

fn role(ui: &mut Ui, session: &mut Session) {
    let current = session.filters().role.clone();
    ui.strong("Role");
    egui::ComboBox::from_id_salt("role")
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_all(), ALL).clicked() {
                session.set_role(Choice::All);
            }
            for role in RoleSimple::ALL {
                let selected = current == Choice::Only(role);
                if ui.selectable_label(selected, role.as_str()).clicked() {
                    session.set_role(Choice::Only(role));
                }
            }
        });
}

fn gender(ui: &mut Ui, session: &mut Session) {
    let current = session.filters().gender.clone();
    let options: Vec<String> = session.table().genders().iter().cloned().collect();
    ui.strong("Gender");
    egui::ComboBox::from_id_salt("gender")
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_all(), ALL).clicked() {
                session.set_gender(Choice::All);
            }
            for g in options {
                let selected = current.as_only() == Some(&g);
                if ui.selectable_label(selected, g.as_str()).clicked() {
                    session.set_gender(Choice::Only(g));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu, the tab strip and the status line.
pub fn top_bar(ui: &mut Ui, app: &mut DashboardApp) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(app);
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in Tab::ALL {
            ui.selectable_value(&mut app.tab, tab, tab.title());
        }

        ui.separator();

        if let Some(session) = &app.session {
            ui.label(format!(
                "{} entries loaded, {} match",
                session.table().len(),
                session.views().summary.total_rows
            ));
        }

        if let Some(msg) = &app.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(app: &mut DashboardApp) {
    let file = rfd::FileDialog::new()
        .set_title("Open cleaned prize table")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        app.open_table(&path);
    }
}
