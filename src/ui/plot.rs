use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotBounds, PlotPoints};

use crate::color;
use crate::config::LineStyleConfig;
use crate::data::downsample::AxisRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Padding so a single point or flat line still gets a visible axis.
fn padded(range: AxisRange) -> (f64, f64) {
    if range.span() > 0.0 {
        (range.min, range.max)
    } else {
        (range.min - 0.5, range.max + 0.5)
    }
}

/// Render the combined chart of every loaded slot.
pub fn chart_plot(ui: &mut Ui, state: &mut AppState) {
    if !state.has_data() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a chart file to begin  (File → Open File 1…)");
        });
        return;
    }

    // Per-layer legend titles and styles, indexed like `SeriesView::dataset_index`.
    let (titles, styles): (Vec<String>, Vec<LineStyleConfig>) = state
        .layer_slots()
        .into_iter()
        .filter_map(|slot| {
            let ds = state.slots[slot].dataset.as_ref()?;
            Some((ds.title().to_string(), state.config.style_for(slot).clone()))
        })
        .unzip();

    let fit = state.take_fit_request();
    let view = state.chart_view();
    let (x_min, x_max) = padded(view.x_range);
    let (y_min, y_max) = padded(view.y_range);

    Plot::new("chart_plot")
        .legend(Legend::default())
        .x_axis_label("x")
        .y_axis_label("y")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .include_x(x_min)
        .include_x(x_max)
        .include_y(y_min)
        .include_y(y_max)
        .show(ui, |plot_ui| {
            if fit {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));
            }

            for sv in &view.series {
                let style = &styles[sv.dataset_index];
                let line_color = style
                    .color
                    .map(|[r, g, b]| Color32::from_rgb(r, g, b))
                    .unwrap_or_else(|| color::series_color(sv.series_index));

                let name = format!("{} · S{}", titles[sv.dataset_index], sv.series_index);
                let points: PlotPoints = sv.points.iter().map(|p| p.to_array()).collect();

                let mut line = Line::new(points)
                    .name(&name)
                    .color(line_color)
                    .width(style.width);
                if let Some(length) = style.dash_length {
                    line = line.style(LineStyle::Dashed { length });
                }

                plot_ui.line(line);
            }
        });
}
