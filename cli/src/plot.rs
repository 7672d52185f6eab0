use std::collections::BTreeMap;

use clap::Args;
use decimator::{sort_by_x, ChartOptions, Columns, Dataset, Decimation, Point};
use eyre::Result;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use crate::io::{read_points, Output};
use crate::options::DecimationArgs;

const DEFAULT_SERIES: &str = "default";

const COLORS: &[&str] = &[
    "#E9D758", "#297373", "#EE7860", "#A1CDF4", "#593C8F", "#DD624E", "#A1674A",
];

#[derive(Args, Debug)]
pub struct Opts {
    #[command(flatten)]
    pub decimation: DecimationArgs,

    /// Plot title
    #[clap(long, default_value = "Decimator Plot")]
    title: String,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    output: String,

    /// Input files [default: stdin]
    pub files: Vec<String>,
}

pub async fn plot(opts: &Opts) -> Result<()> {
    let plugin = Decimation::new(opts.decimation.load().await?);

    let points = read_points(&opts.files).await?;
    if points.is_empty() {
        eyre::bail!("no data to plot");
    }

    let mut datasets = group_series(points);
    plugin.before_elements_update(
        &Columns(opts.decimation.width),
        &ChartOptions::default(),
        &mut datasets,
    )?;

    for dataset in &datasets {
        tracing::info!(
            series = %dataset.label,
            points = dataset.source_data().len(),
            drawn = dataset.data().len(),
            "plotting series"
        );
    }

    let series: Vec<Vec<[f64; 2]>> = datasets
        .iter()
        .map(|ds| ds.data().iter().map(|p| [p.x, p.y]).collect())
        .collect();
    let labels: Vec<&str> = datasets.iter().map(|ds| ds.label.as_str()).collect();
    let colors: Vec<&str> = (0..datasets.len())
        .map(|i| COLORS[i % COLORS.len()])
        .collect();
    let plot_opts = json!({
        "title": opts.title,
        "labels": labels,
        "colors": colors,
        "width": opts.decimation.width,
    });

    let html = generate_plot_html(
        &escape_html(&opts.title),
        &serde_json::to_string(&series)?,
        &script_json(&plot_opts)?,
    );

    let mut output = Output::from_filename(&opts.output).await?;
    output.write_all(html.as_bytes()).await?;
    output.flush().await?;

    Ok(())
}

/// Split points into one x-sorted line dataset per `series` field.
fn group_series(points: Vec<Point>) -> Vec<Dataset<Point>> {
    let mut series_map: BTreeMap<String, Vec<Point>> = BTreeMap::new();
    for point in points {
        let label = point.series().unwrap_or(DEFAULT_SERIES).to_string();
        series_map.entry(label).or_default().push(point);
    }
    series_map
        .into_iter()
        .map(|(label, mut points)| {
            sort_by_x(&mut points);
            Dataset::new(label, points)
        })
        .collect()
}

/// JSON that can sit inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn generate_plot_html(title: &str, series_data: &str, opts: &str) -> String {
    format!(
        r##"<!doctype html>
<html>
<head>
  <title>{title}</title>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <style>
    * {{ box-sizing: border-box; }}
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 20px; background: #0f1419; color: #e6edf3; }}
    .container {{ margin: 0 auto; }}
    h1 {{ font-size: 24px; font-weight: 600; margin: 0 0 20px 0; }}
    .chart {{ background: #161b22; border: 1px solid #30363d; border-radius: 8px; padding: 20px; }}
    .legend {{ display: flex; gap: 16px; margin-top: 12px; flex-wrap: wrap; font-size: 13px; }}
    .legend-item {{ display: flex; align-items: center; gap: 6px; }}
    .legend-dot {{ width: 10px; height: 10px; border-radius: 50%; }}
  </style>
</head>
<body>
  <div class="container">
    <h1>{title}</h1>
    <div class="chart">
      <canvas id="chart" height="500"></canvas>
      <div class="legend" id="legend"></div>
    </div>
  </div>
  <script>
    const opts = {opts};
    const seriesData = {series_data};

    function draw() {{
      const canvas = document.getElementById('chart');
      const ctx = canvas.getContext('2d');
      const dpr = window.devicePixelRatio || 1;
      const pad = {{top: 20, right: 20, bottom: 40, left: 80}};
      const W = opts.width + pad.left + pad.right;
      const H = 500;
      canvas.style.width = W + 'px';
      canvas.width = W * dpr;
      canvas.height = H * dpr;
      ctx.scale(dpr, dpr);
      const pw = opts.width;
      const ph = H - pad.top - pad.bottom;

      ctx.clearRect(0, 0, W, H);

      let xMin = Infinity, xMax = -Infinity, yMin = Infinity, yMax = -Infinity;
      for (const series of seriesData) {{
        for (const [x, y] of series) {{
          xMin = Math.min(xMin, x); xMax = Math.max(xMax, x);
          yMin = Math.min(yMin, y); yMax = Math.max(yMax, y);
        }}
      }}
      if (!isFinite(xMin)) return;

      const xToP = (x) => pad.left + (x - xMin) / (xMax - xMin || 1) * pw;
      const yToP = (y) => pad.top + ph - (y - yMin) / (yMax - yMin || 1) * ph;

      ctx.strokeStyle = '#30363d';
      ctx.lineWidth = 1;
      ctx.fillStyle = '#8b949e';
      ctx.font = '11px monospace';
      for (let i = 0; i <= 5; i++) {{
        const y = pad.top + (ph / 5) * i;
        ctx.beginPath(); ctx.moveTo(pad.left, y); ctx.lineTo(pad.left + pw, y); ctx.stroke();
        ctx.textAlign = 'right';
        ctx.fillText((yMax - (i / 5) * (yMax - yMin)).toPrecision(4), pad.left - 8, y + 4);
        ctx.textAlign = 'center';
        ctx.fillText((xMin + (i / 5) * (xMax - xMin)).toPrecision(4), pad.left + (pw / 5) * i, H - pad.bottom + 20);
      }}

      for (let s = 0; s < seriesData.length; s++) {{
        ctx.strokeStyle = opts.colors[s] || '#8b949e';
        ctx.beginPath();
        seriesData[s].forEach(([x, y], i) => {{
          if (i === 0) ctx.moveTo(xToP(x), yToP(y));
          else ctx.lineTo(xToP(x), yToP(y));
        }});
        ctx.stroke();
      }}

      const legend = document.getElementById('legend');
      legend.innerHTML = '';
      for (let s = 0; s < opts.labels.length; s++) {{
        const item = document.createElement('div');
        item.className = 'legend-item';
        const dot = document.createElement('span');
        dot.className = 'legend-dot';
        dot.style.background = opts.colors[s];
        item.appendChild(dot);
        item.appendChild(document.createTextNode(opts.labels[s] + ' (' + seriesData[s].length + ' points)'));
        legend.appendChild(item);
      }}
    }}

    draw();
  </script>
</body>
</html>"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_series_and_sorts() {
        let points = vec![
            Point::new(2.0, 1.0).with_field("series", "b"),
            Point::new(1.0, 2.0),
            Point::new(0.0, 3.0).with_field("series", "b"),
            Point::new(0.5, 4.0),
        ];
        let datasets = group_series(points);
        let labels: Vec<&str> = datasets.iter().map(|ds| ds.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "default"]);

        let xs: Vec<f64> = datasets[0].data().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0]);
        let xs: Vec<f64> = datasets[1].data().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.5, 1.0]);
    }

    #[test]
    fn title_is_escaped() {
        assert_eq!(escape_html("a <b> & \"c\""), "a &lt;b&gt; &amp; &quot;c&quot;");
    }

    #[test]
    fn script_json_cannot_close_the_tag() {
        let value = json!({ "labels": ["</script><b>"] });
        let out = script_json(&value).unwrap();
        assert!(!out.contains("</script>"));
        assert!(out.contains("<\\/script>"));
    }

    #[test]
    fn html_embeds_data() {
        let html = generate_plot_html("T", "[[[0,1]]]", "{\"width\":10}");
        assert!(html.contains("<title>T</title>"));
        assert!(html.contains("const seriesData = [[[0,1]]];"));
        assert!(html.contains("const opts = {\"width\":10};"));
    }
}
