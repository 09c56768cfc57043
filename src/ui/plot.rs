use eframe::egui::{self, Align2, FontId, Pos2, Rect, ScrollArea, Sense, Ui, Vec2};
use egui_plot::{Bar, BarChart, Plot, PlotPoints, Points};

use crate::color::{correlation_color, generate_palette, label_color};
use crate::pipeline::RenderArtifacts;

/// Room reserved left of and above the heatmap grid for column names.
const LABEL_MARGIN: f32 = 110.0;
const MAX_LABEL_CHARS: usize = 14;
const HISTOGRAM_BINS: usize = 10;

// ---------------------------------------------------------------------------
// Correlation heatmap (central panel)
// ---------------------------------------------------------------------------

/// Render the thresholded correlation matrix as a labelled grid of cells.
/// Masked or undefined entries are left blank rather than drawn as zero.
pub fn heatmap(ui: &mut Ui, out: &RenderArtifacts) {
    let matrix = &out.filtered;
    let n = matrix.size();

    ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let avail = ui.available_size();
            let cell = ((avail.x.min(avail.y) - LABEL_MARGIN) / n as f32).clamp(28.0, 90.0);
            let side = LABEL_MARGIN + cell * n as f32;
            let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::hover());

            let origin = response.rect.min + Vec2::splat(LABEL_MARGIN);
            let font = FontId::proportional(12.0);
            let text_color = ui.visuals().text_color();

            for (i, name) in matrix.columns.iter().enumerate() {
                let label = short_label(name);
                let offset = (i as f32 + 0.5) * cell;
                painter.text(
                    Pos2::new(origin.x - 6.0, origin.y + offset),
                    Align2::RIGHT_CENTER,
                    &label,
                    font.clone(),
                    text_color,
                );
                painter.text(
                    Pos2::new(origin.x + offset, origin.y - 6.0),
                    Align2::CENTER_BOTTOM,
                    &label,
                    font.clone(),
                    text_color,
                );
            }

            for row in 0..n {
                for col in 0..n {
                    let rect = Rect::from_min_size(
                        origin + Vec2::new(col as f32 * cell, row as f32 * cell),
                        Vec2::splat(cell),
                    );
                    let value = matrix.get(row, col);
                    painter.rect_filled(rect.shrink(1.0), 2.0, correlation_color(value));
                    if let Some(r) = value {
                        painter.text(
                            rect.center(),
                            Align2::CENTER_CENTER,
                            format!("{r:.2}"),
                            font.clone(),
                            label_color(r),
                        );
                    }
                }
            }

            // Tooltip with the unmasked coefficient of the hovered cell.
            let hovered = response.hover_pos().and_then(|pos| {
                let rel = pos - origin;
                if rel.x < 0.0 || rel.y < 0.0 {
                    return None;
                }
                let (row, col) = ((rel.y / cell) as usize, (rel.x / cell) as usize);
                (row < n && col < n).then_some((row, col))
            });
            if let Some((row, col)) = hovered {
                let a = &matrix.columns[row];
                let b = &matrix.columns[col];
                let text = match (out.matrix.get(row, col), matrix.get(row, col)) {
                    (Some(r), Some(_)) => format!("{a} × {b}\nr = {r:.4}"),
                    (Some(r), None) => format!("{a} × {b}\nr = {r:.4} (below threshold)"),
                    (None, _) => format!("{a} × {b}\nundefined"),
                };
                response.on_hover_text_at_pointer(text);
            }

            ui.add_space(8.0);
            color_legend(ui);
        });
}

/// Horizontal -1 … +1 colour bar under the heatmap.
fn color_legend(ui: &mut Ui) {
    const STEPS: usize = 40;
    let (response, painter) = ui.allocate_painter(Vec2::new(240.0, 32.0), Sense::hover());
    let bar = Rect::from_min_size(response.rect.min, Vec2::new(240.0, 14.0));
    let step_width = bar.width() / STEPS as f32;
    for i in 0..STEPS {
        let r = -1.0 + 2.0 * (i as f64 + 0.5) / STEPS as f64;
        let rect = Rect::from_min_size(
            bar.min + Vec2::new(i as f32 * step_width, 0.0),
            Vec2::new(step_width + 0.5, bar.height()),
        );
        painter.rect_filled(rect, 0.0, correlation_color(Some(r)));
    }
    let font = FontId::proportional(11.0);
    let color = ui.visuals().text_color();
    for (x, text) in [(bar.left(), "-1"), (bar.center().x, "0"), (bar.right(), "+1")] {
        painter.text(
            Pos2::new(x, bar.bottom() + 2.0),
            Align2::CENTER_TOP,
            text,
            font.clone(),
            color,
        );
    }
}

fn short_label(name: &str) -> String {
    if name.chars().count() <= MAX_LABEL_CHARS {
        name.to_string()
    } else {
        let head: String = name.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{head}…")
    }
}

// ---------------------------------------------------------------------------
// Scatter matrix
// ---------------------------------------------------------------------------

/// Grid of small plots: pairwise scatter off the diagonal, a histogram of
/// each column on it.
pub fn scatter_matrix(ui: &mut Ui, out: &RenderArtifacts) {
    let columns = &out.scatter_columns;
    if columns.is_empty() {
        ui.label("Pick columns for the scatter matrix in the side panel.");
        return;
    }

    let indices: Vec<usize> = columns
        .iter()
        .filter_map(|c| out.numeric.column_index(c))
        .collect();
    let palette = generate_palette(indices.len());

    let avail = ui.available_size();
    let k = indices.len() as f32;
    let cell = ((avail.x.min(avail.y) - 80.0) / k).max(90.0);

    ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("scatter_matrix")
                .spacing([4.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for name in columns {
                        ui.strong(short_label(name));
                    }
                    ui.end_row();

                    for (row, &y_idx) in indices.iter().enumerate() {
                        ui.strong(short_label(&columns[row]));
                        for (col, &x_idx) in indices.iter().enumerate() {
                            let plot = Plot::new(("scatter_cell", row, col))
                                .width(cell)
                                .height(cell)
                                .show_axes(false)
                                .show_grid(false)
                                .show_x(false)
                                .show_y(false)
                                .allow_drag(false)
                                .allow_zoom(false)
                                .allow_scroll(false)
                                .allow_boxed_zoom(false);

                            if row == col {
                                let values: Vec<f64> =
                                    out.numeric.values[x_idx].iter().flatten().copied().collect();
                                let bars = histogram(&values, HISTOGRAM_BINS)
                                    .into_iter()
                                    .map(|(center, width, count)| {
                                        Bar::new(center, count as f64).width(width)
                                    })
                                    .collect();
                                let chart = BarChart::new(bars).color(palette[row]);
                                plot.show(ui, |plot_ui| plot_ui.bar_chart(chart));
                            } else {
                                let points: PlotPoints = out
                                    .numeric
                                    .paired(x_idx, y_idx)
                                    .into_iter()
                                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                                    .map(|(x, y)| [x, y])
                                    .collect();
                                let points = Points::new(points).radius(2.0).color(palette[col]);
                                plot.show(ui, |plot_ui| plot_ui.points(points));
                            }
                        }
                        ui.end_row();
                    }
                });
        });
}

/// Equal-width bins over the range of `values`, as `(center, width, count)`.
/// A constant column yields a single bin of width 1. Infinite values are skipped.
pub fn histogram(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![(min, 1.0, values.len())];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in &values {
        let bin = (((v - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (min + (i as f64 + 0.5) * width, width, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let bins = histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.2).sum::<usize>(), values.len());
        // The maximum lands in the last bin, not past it.
        assert_eq!(bins[4].2, 1);
        assert!((bins[0].0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn histogram_of_constant_or_empty() {
        assert_eq!(histogram(&[3.0, 3.0], 10), vec![(3.0, 1.0, 2)]);
        assert!(histogram(&[], 10).is_empty());
    }

    #[test]
    fn histogram_skips_infinite_values() {
        let bins = histogram(&[1.0, f64::INFINITY, 2.0, f64::NEG_INFINITY], 2);
        assert_eq!(bins.iter().map(|b| b.2).sum::<usize>(), 2);
        assert!(bins.iter().all(|b| b.0.is_finite()));
    }

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(short_label("x"), "x");
        let label = short_label("a_really_long_column_name");
        assert_eq!(label.chars().count(), MAX_LABEL_CHARS);
        assert!(label.ends_with('…'));
    }
}
