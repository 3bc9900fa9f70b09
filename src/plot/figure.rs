use plotly::common::{ErrorData, ErrorType, Line, Marker, Mode, Title};
use plotly::layout::{Annotation, Axis, GridPattern, Layout, LayoutGrid, Legend, RowOrder};
use plotly::{Plot, Scatter};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::PlotSettings;
use crate::data::store::RecordStore;
use crate::error::{Error, Result};
use crate::plot::series::{workload_series, Series};

/// Axis slots available in one plotly layout.
pub const MAX_PANELS: usize = 8;

const PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

/// Handle to one sub-plot of a `Figure`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelSlot(usize);

impl PanelSlot {
    pub fn index(&self) -> usize {
        self.0
    }

    fn axis_suffix(&self) -> String {
        match self.0 {
            0 => String::new(),
            i => (i + 1).to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct PanelLabels {
    title: String,
    x_label: String,
    y_label: String,
}

/// Vertically stacked panels sharing one legend.
pub struct Figure {
    plot: Plot,
    panels: Vec<PanelLabels>,
    colors: HashMap<String, &'static str>,
    in_legend: HashSet<String>,
    settings: PlotSettings,
}

impl Figure {
    pub fn new(settings: &PlotSettings) -> Self {
        Self {
            plot: Plot::new(),
            panels: Vec::new(),
            colors: HashMap::new(),
            in_legend: HashSet::new(),
            settings: settings.clone(),
        }
    }

    /// Reserve the next panel below the existing ones.
    pub fn add_panel(&mut self) -> Result<PanelSlot> {
        if self.panels.len() >= MAX_PANELS {
            return Err(Error::TooManyPanels {
                requested: self.panels.len() + 1,
                max: MAX_PANELS,
            });
        }
        self.panels.push(PanelLabels::default());
        Ok(PanelSlot(self.panels.len() - 1))
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    fn color_for(&mut self, label: &str) -> &'static str {
        let next = self.colors.len();
        *self
            .colors
            .entry(label.to_string())
            .or_insert(PALETTE[next % PALETTE.len()])
    }

    fn refresh_layout(&mut self) {
        let ticks: Vec<f64> = self.settings.x_ticks.iter().map(|&t| f64::from(t)).collect();
        let n = self.panels.len();

        let mut layout = Layout::new()
            .grid(
                LayoutGrid::new()
                    .rows(n)
                    .columns(1)
                    .pattern(GridPattern::Independent)
                    .row_order(RowOrder::TopToBottom),
            )
            .legend(Legend::new())
            .width(self.settings.width)
            .height(self.settings.panel_height * n.max(1));

        let mut annotations = Vec::with_capacity(n);
        for (i, labels) in self.panels.iter().enumerate() {
            let slot = PanelSlot(i);
            let x_axis = Axis::new()
                .title(Title::new(&labels.x_label))
                .tick_values(ticks.clone());
            let y_axis = Axis::new().title(Title::new(&labels.y_label));
            layout = with_axes(layout, slot, x_axis, y_axis);

            let suffix = slot.axis_suffix();
            annotations.push(
                Annotation::new()
                    .text(&labels.title)
                    .x_ref(&format!("x{suffix} domain"))
                    .y_ref(&format!("y{suffix} domain"))
                    .x(0.5)
                    .y(1.08)
                    .show_arrow(false),
            );
        }
        layout = layout.annotations(annotations);
        self.plot.set_layout(layout);
    }

    /// Standalone HTML page for the figure.
    pub fn to_html(&self) -> String {
        let plot_html = self.plot.to_inline_html(None);
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<script src="https://cdn.plot.ly/plotly-latest.min.js"></script>
</head>
<body>
{plot_html}
</body>
</html>
"#
        )
    }

    /// Write the figure as HTML (and PNG with the `png` feature).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_html())?;
        #[cfg(feature = "png")]
        self.plot.write_image(
            path.with_extension("png"),
            plotly::ImageFormat::PNG,
            self.settings.width,
            self.settings.panel_height * self.panels.len().max(1),
            1.0,
        );
        info!("Wrote {}", path.display());
        Ok(())
    }
}

impl fmt::Debug for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Figure")
            .field("panels", &self.panels)
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

fn with_axes(layout: Layout, slot: PanelSlot, x: Axis, y: Axis) -> Layout {
    match slot.index() {
        0 => layout.x_axis(x).y_axis(y),
        1 => layout.x_axis2(x).y_axis2(y),
        2 => layout.x_axis3(x).y_axis3(y),
        3 => layout.x_axis4(x).y_axis4(y),
        4 => layout.x_axis5(x).y_axis5(y),
        5 => layout.x_axis6(x).y_axis6(y),
        6 => layout.x_axis7(x).y_axis7(y),
        7 => layout.x_axis8(x).y_axis8(y),
        // add_panel never hands out more slots
        _ => layout,
    }
}

/// Draw one error-bar line per series onto `panel`.
pub fn render_panel(
    figure: &mut Figure,
    panel: PanelSlot,
    series: &[Series],
    title: &str,
    x_label: &str,
    y_label: &str,
) {
    let suffix = panel.axis_suffix();
    let (x_ref, y_ref) = (format!("x{suffix}"), format!("y{suffix}"));

    for s in series {
        let bars = s.error_bars();
        let color = figure.color_for(&s.label);
        let first_in_legend = figure.in_legend.insert(s.label.clone());

        let trace = Scatter::new(bars.x, bars.y)
            .name(&s.label)
            .mode(Mode::LinesMarkers)
            .legend_group(&s.label)
            .show_legend(first_in_legend)
            .marker(Marker::new().color(color))
            .line(Line::new().color(color))
            .error_y(
                ErrorData::new(ErrorType::Data)
                    .symmetric(false)
                    .array(bars.plus)
                    .array_minus(bars.minus),
            )
            .x_axis(&x_ref)
            .y_axis(&y_ref);
        figure.plot.add_trace(trace);
    }

    if let Some(labels) = figure.panels.get_mut(panel.index()) {
        *labels = PanelLabels {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        };
    }
    figure.refresh_layout();
}

/// One panel per (workload, algorithms) pair, stacked top to bottom in input order.
///
/// Pairs with no matching records are left out of the figure and do not count
/// towards `MAX_PANELS`.
pub fn render_comparison_figure(
    store: &RecordStore,
    workload_algorithm_pairs: &[(String, Vec<String>)],
    settings: &PlotSettings,
    output_path: impl AsRef<Path>,
) -> Result<Figure> {
    // panels only read the store, so they can be summarized independently
    let panels = workload_algorithm_pairs
        .par_iter()
        .map(|(workload, algorithms)| {
            workload_series(store, workload, algorithms).map(|series| (workload, series))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut figure = Figure::new(settings);
    for (workload, series) in panels {
        if series.is_empty() {
            warn!("No records for workload {}, leaving it out of the figure", workload);
            continue;
        }
        let slot = figure.add_panel()?;
        render_panel(
            &mut figure,
            slot,
            &series,
            workload,
            &settings.x_label,
            &settings.y_label,
        );
    }

    if figure.panel_count() == 0 {
        return Err(Error::EmptyInput);
    }
    figure.save(output_path)?;
    Ok(figure)
}

/// One single-panel figure per workload with every algorithm, named after the workload.
pub fn render_workload_figures(store: &RecordStore, settings: &PlotSettings) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&settings.output_dir)?;
    let algorithms = store.distinct_algorithms().to_vec();

    let mut written = Vec::new();
    for workload in store.distinct_workloads() {
        let path = settings.output_dir.join(figure_file_name(&[workload.as_str()]));
        let pairs = vec![(workload.clone(), algorithms.clone())];
        match render_comparison_figure(store, &pairs, settings, &path) {
            Ok(_) => written.push(path),
            Err(Error::EmptyInput) => warn!("Nothing to plot for {}", workload),
            Err(e) => return Err(e),
        }
    }
    Ok(written)
}

/// File name built from the experiment labels, non-alphanumerics replaced by `_`.
pub fn figure_file_name(labels: &[&str]) -> String {
    let stem = labels
        .iter()
        .map(|l| l.replace(|c: char| !c.is_alphanumeric(), "_"))
        .collect::<Vec<_>>()
        .join("_vs_");
    format!("{stem}.html")
}
