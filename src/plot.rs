//! Line chart of selected compartments over time.
//!
//! The look is deliberately plain: no axis spines, no tick marks, white
//! grid lines over a light grey plot area and a translucent legend.

use std::path::Path;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::model::trajectory::{Compartment, Trajectory};

const PLOT_BACKGROUND: RGBColor = RGBColor(234, 234, 242);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSpec {
    pub series: Vec<Compartment>,
    /// Also draw S+E+I+R+D as a reference line.
    pub show_total: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self { series: vec![Compartment::Dead], show_total: false, width: 1000, height: 400 }
    }
}

fn color(c: Compartment) -> RGBColor {
    match c {
        Compartment::Susceptible => BLUE,
        Compartment::Exposed => YELLOW,
        Compartment::Infected => RED,
        Compartment::Recovered => GREEN,
        Compartment::Dead => BLACK,
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> SimError {
    SimError::Render(e.to_string())
}

/// Render `traj` as an SVG file at `path`.
pub fn render_chart(traj: &Trajectory, spec: &ChartSpec, path: impl AsRef<Path>) -> SimResult<()> {
    let path = path.as_ref();
    if traj.is_empty() {
        return Err(SimError::config("cannot chart an empty trajectory"));
    }
    if spec.series.is_empty() && !spec.show_total {
        return Err(SimError::config("chart has no series selected"));
    }
    if path.extension().and_then(|e| e.to_str()) != Some("svg") {
        return Err(SimError::config(format!("chart path {} must end in .svg", path.display())));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let size = (spec.width, spec.height);
    draw(SVGBackend::new(path, size).into_drawing_area(), traj, spec)?;

    info!("chart written to {}", path.display());
    Ok(())
}

fn draw<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, traj: &Trajectory, spec: &ChartSpec) -> SimResult<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let t_min = traj.points()[0].t;
    let t_max = traj.points()[traj.len() - 1].t.max(t_min + 1.0);

    let mut y_max = spec
        .series
        .iter()
        .flat_map(|c| traj.series(*c))
        .map(|(_, v)| v)
        .fold(0.0, f64::max);
    if spec.show_total {
        y_max = y_max.max(traj.population());
    }
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(t_min..t_max, 0.0..y_max)
        .map_err(render_err)?;

    chart.plotting_area().fill(&PLOT_BACKGROUND).map_err(render_err)?;

    let no_color = WHITE.mix(0.0);
    chart
        .configure_mesh()
        .x_desc("Time (days)")
        .axis_style(no_color)
        .bold_line_style(WHITE.stroke_width(2))
        .light_line_style(no_color)
        .set_all_tick_mark_size(0)
        .draw()
        .map_err(render_err)?;

    for &c in &spec.series {
        let style = color(c).mix(0.7).stroke_width(2);
        chart
            .draw_series(LineSeries::new(traj.series(c), style))
            .map_err(render_err)?
            .label(c.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    if spec.show_total {
        let style = BLACK.mix(0.4).stroke_width(2);
        chart
            .draw_series(DashedLineSeries::new(traj.totals(), 6, 4, style))
            .map_err(render_err)?
            .label("Total")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.5))
        .border_style(BLACK.mix(0.2))
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
