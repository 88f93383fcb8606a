use eframe::egui::{self, ScrollArea, Ui};

use redbus_dashboard::config::Config;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RedbusDashboardApp {
    pub state: AppState,
}

impl RedbusDashboardApp {
    pub fn new(config: &Config) -> Self {
        let mut state = AppState::new(config);
        state.load();
        Self { state }
    }
}

impl eframe::App for RedbusDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, table, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.view.as_ref().filter(|_| state.has_data()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No CSV files found or no data loaded  (File → Open folder…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("All Bus Details");
            panels::metrics(ui, &view.overall);
            ui.separator();

            ui.heading(format!("Filtered Buses ({} results)", view.filtered.len()));
            table::data_table(ui, &view.filtered, 320.0);
            ui.separator();

            if let Some(series) = &view.series {
                plot::charts(ui, series, state.bus_type_colors.as_ref());
            }
        });
}
