//! # Visualization
//!
//! $$
//! \{(\sigma_p(\mathbf{w}^\*_k), \mu_p(\mathbf{w}^\*_k))\}_k \mapsto \text{return versus volatility chart}
//! $$
//!
use plotly::Layout;
use plotly::Plot;
use plotly::Scatter;
use plotly::common::Line;
use plotly::common::Mode;
use plotly::layout::Axis;

use crate::quant::portfolio::Frontier;

struct FrontierEntry {
  label: String,
  volatilities: Vec<f64>,
  returns: Vec<f64>,
  hover: Vec<String>,
}

/// Builds a `plotly` chart of one or more efficient frontiers. Only converged points are drawn.
pub struct FrontierPlotter {
  entries: Vec<FrontierEntry>,
  line_width: f64,
  show_legend: bool,
  title: String,
}

impl Default for FrontierPlotter {
  fn default() -> Self {
    Self::new()
  }
}

impl FrontierPlotter {
  pub fn new() -> Self {
    Self {
      entries: Vec::new(),
      line_width: 1.5,
      show_legend: true,
      title: String::from("Efficient Frontier"),
    }
  }

  pub fn title(mut self, title: &str) -> Self {
    self.title = title.into();
    self
  }

  pub fn line_width(mut self, w: f64) -> Self {
    self.line_width = w;
    self
  }

  pub fn show_legend(mut self, show: bool) -> Self {
    self.show_legend = show;
    self
  }

  pub fn register(mut self, frontier: &Frontier, label: &str) -> Self {
    let mut entry = FrontierEntry {
      label: label.into(),
      volatilities: Vec::with_capacity(frontier.len()),
      returns: Vec::with_capacity(frontier.len()),
      hover: Vec::with_capacity(frontier.len()),
    };
    for point in frontier.converged() {
      entry.volatilities.push(point.volatility);
      entry.returns.push(point.expected_return);
      let weights = point
        .weights
        .iter()
        .map(|w| format!("{w:.3}"))
        .collect::<Vec<String>>()
        .join(", ");
      entry.hover.push(format!(
        "vol: {:.4}<br>return: {:.4}<br>weights: [{}]",
        point.volatility, point.expected_return, weights
      ));
    }
    self.entries.push(entry);
    self
  }

  pub fn n_series(&self) -> usize {
    self.entries.len()
  }

  pub fn plot(&self) -> Plot {
    let mut plot = Plot::new();
    plot.set_layout(
      Layout::new()
        .title(self.title.as_str())
        .auto_size(true)
        .x_axis(Axis::new().title("Volatility"))
        .y_axis(Axis::new().title("Return")),
    );

    for entry in &self.entries {
      let trace = Scatter::new(entry.volatilities.clone(), entry.returns.clone())
        .mode(Mode::LinesMarkers)
        .line(Line::new().width(self.line_width))
        .name(entry.label.as_str())
        .hover_text_array(entry.hover.clone())
        .hover_template("%{hovertext}<extra></extra>")
        .show_legend(self.show_legend);
      plot.add_trace(trace);
    }

    plot
  }

  pub fn show(self) {
    self.plot().show();
  }
}
