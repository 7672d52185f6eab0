use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::algorithm::Algorithm;
use crate::dataset::{Dataset, IndexAxis, SeriesKind};
use crate::error::Result;
use crate::point::DataPoint;

/// Datasets at or below this many points per available column are drawn
/// as they are.
pub const POINTS_PER_COLUMN: usize = 4;

/// A surface points are rendered onto.
pub trait RenderTarget {
    /// Number of distinct horizontal positions the surface can resolve.
    fn available_columns(&self) -> usize;
}

impl RenderTarget for usize {
    fn available_columns(&self) -> usize {
        *self
    }
}

/// A render target of a fixed pixel width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns(pub usize);

impl RenderTarget for Columns {
    fn available_columns(&self) -> usize {
        self.0
    }
}

/// Chart wide settings that decide whether datasets may be decimated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub index_axis: IndexAxis,
    /// Whether data goes through a custom parsing step before rendering.
    pub parsing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimationOptions {
    pub enabled: bool,
    pub algorithm: String,
}

impl Default for DecimationOptions {
    fn default() -> Self {
        DecimationOptions {
            enabled: false,
            algorithm: Algorithm::MinMax.name().to_string(),
        }
    }
}

/// Why a dataset was left alone during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    IndexAxis(IndexAxis),
    SeriesKind(SeriesKind),
    DiscreteScale,
    Parsing,
    BelowThreshold { points: usize, threshold: usize },
}

/// Check whether `dataset` can be decimated for `columns` pixel columns.
pub fn check_eligibility<P>(
    dataset: &Dataset<P>,
    chart: &ChartOptions,
    columns: usize,
) -> std::result::Result<(), Ineligible> {
    let axis = dataset.index_axis.unwrap_or(chart.index_axis);
    if axis != IndexAxis::X {
        return Err(Ineligible::IndexAxis(axis));
    }
    if dataset.kind != SeriesKind::Line {
        return Err(Ineligible::SeriesKind(dataset.kind));
    }
    if !dataset.x_scale.is_continuous() {
        return Err(Ineligible::DiscreteScale);
    }
    if chart.parsing {
        return Err(Ineligible::Parsing);
    }
    let points = dataset.source_data().len();
    let threshold = POINTS_PER_COLUMN.saturating_mul(columns);
    if points <= threshold {
        return Err(Ineligible::BelowThreshold { points, threshold });
    }
    Ok(())
}

pub fn is_eligible<P>(dataset: &Dataset<P>, chart: &ChartOptions, columns: usize) -> bool {
    check_eligibility(dataset, chart, columns).is_ok()
}

/// Drives decimation of a chart's datasets once per update cycle.
#[derive(Debug, Clone, Default)]
pub struct Decimation {
    options: DecimationOptions,
}

impl Decimation {
    pub fn new(options: DecimationOptions) -> Self {
        Decimation { options }
    }

    pub fn options(&self) -> &DecimationOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DecimationOptions {
        &mut self.options
    }

    /// Run one cycle over `datasets`, before the renderer reads them.
    ///
    /// When disabled, every installed intercept is removed so datasets serve
    /// their original points again. An unknown algorithm name fails the
    /// cycle before any dataset is touched.
    pub fn before_elements_update<P, T>(
        &self,
        target: &T,
        chart: &ChartOptions,
        datasets: &mut [Dataset<P>],
    ) -> Result<()>
    where
        P: DataPoint,
        T: RenderTarget + ?Sized,
    {
        if !self.options.enabled {
            self.destroy(datasets);
            return Ok(());
        }

        let algorithm: Algorithm = self.options.algorithm.parse()?;
        let columns = target.available_columns();

        for dataset in datasets.iter_mut() {
            if let Err(reason) = check_eligibility(dataset, chart, columns) {
                trace!(label = %dataset.label, ?reason, "skipping decimation");
                if let Some(view) = dataset.view_mut() {
                    view.invalidate();
                }
                continue;
            }

            let decimated = algorithm.decimate(dataset.source_data(), columns);
            debug!(
                label = %dataset.label,
                %algorithm,
                columns,
                points = dataset.source_data().len(),
                decimated = decimated.len(),
                "decimated dataset"
            );
            dataset.install_intercept().store(decimated);
        }

        Ok(())
    }

    /// Restore every dataset's original points.
    pub fn destroy<P>(&self, datasets: &mut [Dataset<P>]) {
        for dataset in datasets.iter_mut() {
            if dataset.remove_intercept() {
                info!(label = %dataset.label, "restored original data");
            }
        }
    }
}
