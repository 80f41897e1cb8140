use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::loader::load_table;
use crate::state::Session;
use crate::ui::{charts, panels, table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Trends,
    Demographics,
    Table,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Trends, Tab::Demographics, Tab::Table];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Trends => "Trends",
            Tab::Demographics => "Demographics",
            Tab::Table => "Table",
        }
    }
}

/// Presentation-only state for the row listing.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    pub search: String,
    pub page: usize,
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    /// `None` until a table loads.
    pub session: Option<Session>,
    pub genre_colors: ColorMap,
    pub tab: Tab,
    pub table_view: TableView,
    pub page_size: usize,
    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl DashboardApp {
    /// Start the dashboard, loading the configured table if it exists.
    pub fn new(config: &Config) -> Self {
        let mut app = Self {
            session: None,
            genre_colors: ColorMap::default(),
            tab: Tab::default(),
            table_view: TableView::default(),
            page_size: config.page_size,
            status_message: None,
        };
        app.open_table(&config.table_path);
        app
    }

    /// Load a normalized table and start a fresh session over it. Failures
    /// are logged and shown in the top bar; the previous session survives.
    pub fn open_table(&mut self, path: &Path) {
        match Self::load(path) {
            Ok(table) => {
                self.genre_colors = ColorMap::new(table.genres());
                self.session = Some(Session::new(table));
                self.table_view = TableView::default();
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load table: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    fn load(path: &Path) -> Result<Arc<crate::data::model::PrizeTable>> {
        let table = load_table(path)
            .with_context(|| format!("loading prize table {}", path.display()))?;
        Ok(Arc::new(table))
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, self);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                if let Some(session) = self.session.as_mut() {
                    if panels::side_panel(ui, session) {
                        self.table_view.page = 0;
                    }
                } else {
                    ui.heading("Filters");
                    ui.separator();
                    ui.label("No table loaded.");
                }
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = self.session.as_mut() else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a cleaned prize table  (File → Open…)");
                });
                return;
            };

            match self.tab {
                Tab::Overview => charts::overview(ui, session.views(), &self.genre_colors),
                Tab::Trends => charts::trends(ui, session.views(), &self.genre_colors),
                Tab::Demographics => charts::demographics(ui, session),
                Tab::Table => table::row_listing(ui, session.views(), &mut self.table_view, self.page_size),
            }
        });
    }
}
