//! Actual-vs-predicted line chart.

use std::ops::Range;
use std::path::Path;

use anyhow::Context;
use plotters::prelude::*;
use tracing::info;

use crate::config::ChartConfig;
use crate::error::PipelineError;

const FONT: &str = "sans-serif";
const X_LABEL_COUNT: usize = 8;

/// Series plotted over the test window.
#[derive(Debug, Clone, Copy)]
pub struct ChartData<'a> {
    pub index: &'a [String],
    pub actual: &'a [f64],
    pub predicted: &'a [f64],
    pub mae: f64,
}

/// Write the chart as a PNG, replacing any existing file at `path`.
pub fn render_chart(path: &Path, data: &ChartData<'_>, config: &ChartConfig) -> anyhow::Result<()> {
    if data.actual.len() != data.predicted.len() {
        return Err(PipelineError::LengthMismatch {
            actual: data.actual.len(),
            predicted: data.predicted.len(),
        }
        .into());
    }
    if data.actual.is_empty() {
        return Err(PipelineError::EmptySeries.into());
    }

    draw(path, data, config).with_context(|| format!("failed to render {}", path.display()))?;
    info!("Wrote chart to {}", path.display());
    Ok(())
}

fn draw(path: &Path, data: &ChartData<'_>, config: &ChartConfig) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let points = data.actual.len();
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Real vs Prediction - MAE {:.3}", data.mae),
            (FONT, 40),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(0..points, value_range(data.actual, data.predicted))?;

    let label_for = |idx: &usize| data.index.get(*idx).cloned().unwrap_or_default();
    chart
        .configure_mesh()
        .x_labels(X_LABEL_COUNT)
        .x_label_formatter(&label_for)
        .x_desc("Timestamp")
        .y_desc("Average Voltage Reading")
        .axis_desc_style((FONT, 32))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            data.actual.iter().copied().enumerate(),
            RED.stroke_width(2),
        ))?
        .label("Real")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    chart
        .draw_series(LineSeries::new(
            data.predicted.iter().copied().enumerate(),
            GREEN.stroke_width(2),
        ))?
        .label("Prediction")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(2)));

    chart
        .configure_series_labels()
        .label_font((FONT, 28))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Y span covering both series with a small margin; non-finite values are ignored.
fn value_range(actual: &[f64], predicted: &[f64]) -> Range<f64> {
    let (lo, hi) = actual
        .iter()
        .chain(predicted)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if lo > hi {
        return 0.0..1.0;
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad)..(hi + pad)
}
