use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use redbus_dashboard::data::model::BusTable;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable grid of the filtered rows. Missing cells render blank.
pub fn data_table(ui: &mut Ui, table: &BusTable, max_height: f32) {
    if table.columns().is_empty() {
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0).clip(true), table.columns().len())
        .min_scrolled_height(0.0)
        .max_scroll_height(max_height)
        .header(20.0, |mut header| {
            for name in table.columns() {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, table.len(), |mut row| {
                let cells = &table.rows()[row.index()];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}
