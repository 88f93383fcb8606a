use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

use redbus_dashboard::data::series::{BoxSummary, ChartSeries, HistogramBin};

use crate::color::{generate_palette, ColorMap};

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Chart area (central panel, below the table)
// ---------------------------------------------------------------------------

/// Render whichever of the three charts the series support.
pub fn charts(ui: &mut Ui, series: &ChartSeries, colors: Option<&ColorMap>) {
    if let Some(bins) = &series.price_histogram {
        ui.heading("Price Distribution");
        price_histogram(ui, bins);
    }
    if let Some(routes) = &series.top_routes {
        ui.heading("Top 10 Routes");
        top_routes(ui, routes);
    }
    if let Some(boxes) = &series.price_by_bus_type {
        ui.heading("Price by Bus Type");
        price_by_bus_type(ui, boxes, colors);
    }
}

fn price_histogram(ui: &mut Ui, bins: &[HistogramBin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!("{:.0} – {:.0}", b.start, b.end))
        })
        .collect();

    Plot::new("price_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Price")
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE).name("Price"));
        });
}

/// Horizontal bars, most frequent route on top. Each route is its own chart
/// so the legend doubles as the axis labels.
fn top_routes(ui: &mut Ui, routes: &[(String, usize)]) {
    let palette = generate_palette(routes.len());
    let n = routes.len();

    Plot::new("top_routes")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Number of entries")
        .y_axis_label("Route Name")
        .show_y(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, ((route, count), color)) in routes.iter().zip(palette).enumerate() {
                let bar = Bar::new((n - i) as f64, *count as f64).width(0.8);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .horizontal()
                        .color(color)
                        .name(route),
                );
            }
        });
}

fn price_by_bus_type(ui: &mut Ui, boxes: &[BoxSummary], colors: Option<&ColorMap>) {
    Plot::new("price_by_bus_type")
        .height(CHART_HEIGHT * 1.5)
        .legend(Legend::default())
        .x_axis_label("Bus Type")
        .y_axis_label("Price")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, summary) in boxes.iter().enumerate() {
                let x = i as f64;
                let color = colors
                    .map(|cm| cm.color_for(&summary.label))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(
                        summary.lower_whisker,
                        summary.q1,
                        summary.median,
                        summary.q3,
                        summary.upper_whisker,
                    ),
                )
                .box_width(0.6)
                .whisker_width(0.3)
                .fill(color.linear_multiply(0.3))
                .stroke(Stroke::new(1.5, color));

                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&summary.label));

                if !summary.outliers.is_empty() {
                    let points: PlotPoints = summary.outliers.iter().map(|&y| [x, y]).collect();
                    plot_ui.points(Points::new(points).radius(2.5).color(color).name(&summary.label));
                }
            }
        });
}
