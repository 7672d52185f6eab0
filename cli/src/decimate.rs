use clap::Args;
use decimator::{sort_by_x, ChartOptions, Columns, Dataset, Decimation, Format};
use eyre::Result;
use tokio::io::AsyncWriteExt;

use crate::io::{encode_point, read_points, Output};
use crate::options::DecimationArgs;

#[derive(Args, Debug)]
pub struct Opts {
    #[command(flatten)]
    pub decimation: DecimationArgs,

    /// Output encoding (json, csv)
    #[clap(long, default_value = "json")]
    pub to: String,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    pub output: String,

    /// Input files [default: stdin]
    pub files: Vec<String>,
}

pub async fn decimate(opts: &Opts) -> Result<()> {
    let format: Format = opts.to.parse()?;
    let plugin = Decimation::new(opts.decimation.load().await?);

    let mut points = read_points(&opts.files).await?;
    sort_by_x(&mut points);

    let mut datasets = vec![Dataset::new("points", points)];
    plugin.before_elements_update(
        &Columns(opts.decimation.width),
        &ChartOptions::default(),
        &mut datasets,
    )?;

    let dataset = &datasets[0];
    tracing::info!(
        points = dataset.source_data().len(),
        decimated = dataset.data().len(),
        width = opts.decimation.width,
        "decimation done"
    );

    let mut output = Output::from_filename(&opts.output).await?;
    for point in dataset.data() {
        encode_point(&mut output, format, point).await?;
    }
    output.flush().await?;

    Ok(())
}
