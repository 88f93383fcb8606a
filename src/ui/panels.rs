use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use redbus_dashboard::data::export::EXPORT_FILE_NAME;
use redbus_dashboard::data::filter::PriceRange;
use redbus_dashboard::data::summary::Summary;

use crate::state::{AppState, Category};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if ui.button("Refresh data").clicked() {
        state.refresh();
    }
    ui.separator();

    if !state.has_data() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            membership_filter(ui, state, Category::Route, "Select Route(s)");
            membership_filter(ui, state, Category::BusType, "Select Bus Type(s)");
            ui.separator();

            price_filter(ui, state);
            ui.separator();

            let mut options = state.view_options;
            ui.checkbox(&mut options.show_visuals, "Show visuals");
            ui.checkbox(
                &mut options.remove_duplicates,
                "Remove duplicate rows (Route + Bus + Link)",
            );
            state.set_view_options(options);
        });
}

/// Checkbox list for one categorical column. Absent columns get no widget.
fn membership_filter(ui: &mut Ui, state: &mut AppState, category: Category, title: &str) {
    let Some(values) = state.category_options(category).map(<[String]>::to_vec) else {
        return;
    };

    let n_selected = values
        .iter()
        .filter(|v| state.membership(category).contains(v))
        .count();
    let header_text = format!("{title}  ({n_selected}/{})", values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(category);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(category);
                }
            });

            for value in &values {
                let mut checked = state.membership(category).contains(value);

                let mut text = RichText::new(value);
                if category == Category::BusType {
                    if let Some(cm) = &state.bus_type_colors {
                        text = text.color(cm.color_for(value));
                    }
                }

                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_value(category, value);
                }
            }
        });
}

fn price_filter(ui: &mut Ui, state: &mut AppState) {
    let (Some(bounds), Some(current)) = (state.options.price, state.effective_price_range()) else {
        return;
    };

    ui.strong("Select Price Range");
    let mut range = current;
    let min_changed = ui
        .add(egui::Slider::new(&mut range.min, bounds.min..=bounds.max).text("min"))
        .changed();
    let max_changed = ui
        .add(egui::Slider::new(&mut range.max, bounds.min..=bounds.max).text("max"))
        .changed();

    if min_changed || max_changed {
        state.set_price_range(PriceRange::new(range.min, range.max));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.has_data(), egui::Button::new("Export filtered…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(state.data_dir.display().to_string());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

/// The four KPI cards over the full table.
pub fn metrics(ui: &mut Ui, summary: &Summary) {
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Total Routes", summary.total_routes.to_string());
        metric(&mut cols[1], "Total Buses", summary.total_buses.to_string());
        metric(&mut cols[2], "Avg Price", summary.avg_price_label());
        metric(&mut cols[3], "Bus Types", summary.bus_types.to_string());
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open bus data folder")
        .set_directory(&state.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.set_data_dir(dir);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered results")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(rows) => {
                state.status_message = None;
                log::info!("Saved {rows} filtered rows to {}", path.display());
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
