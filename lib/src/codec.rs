use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};

use crate::error::{Error, Result};
use crate::point::Point;

/// Encoding of point records, one record per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

const BOM: &[u8] = b"\xEF\xBB\xBF";

impl Format {
    /// Guess the encoding of a stream from its leading bytes, ignoring a
    /// byte order mark and leading whitespace.
    pub fn detect(head: &[u8]) -> Self {
        let head = head.strip_prefix(BOM).unwrap_or(head);
        match head.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => Format::Json,
            _ => Format::Csv,
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            other => Err(Error::Record(format!("unknown encoding: {}", other))),
        }
    }
}

#[async_trait]
pub trait Codec {
    async fn encode<W: AsyncWrite + Unpin + Send>(&self, writer: &mut W, point: &Point) -> Result<()>;
    /// Read the next point, or `None` once the input is exhausted.
    async fn decode<R: AsyncBufRead + Unpin + Send>(&self, reader: &mut R) -> Result<Option<Point>>;
}

/// Newline delimited JSON objects.
pub struct JsonCodec;

#[async_trait]
impl Codec for JsonCodec {
    async fn encode<W: AsyncWrite + Unpin + Send>(&self, writer: &mut W, point: &Point) -> Result<()> {
        writer.write_all(&serde_json::to_vec(point)?).await?;
        writer.write_all(b"\n").await?;
        Ok(())
    }

    async fn decode<R: AsyncBufRead + Unpin + Send>(&self, reader: &mut R) -> Result<Option<Point>> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                return Ok(None);
            }
            let line = buf.strip_prefix(BOM).unwrap_or(&buf[..]);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let point: Point = serde_json::from_slice(line)?;
            return finite(point).map(Some);
        }
    }
}

/// `x,y[,series]` rows, with an optional `x,y,...` header row.
pub struct CsvCodec;

#[async_trait]
impl Codec for CsvCodec {
    async fn encode<W: AsyncWrite + Unpin + Send>(&self, writer: &mut W, point: &Point) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        let x = point.x.to_string();
        let y = point.y.to_string();
        match point.series() {
            Some(series) => wtr.write_record([x.as_str(), y.as_str(), series])?,
            None => wtr.write_record([x.as_str(), y.as_str()])?,
        }
        let buf = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        writer.write_all(&buf).await?;
        Ok(())
    }

    async fn decode<R: AsyncBufRead + Unpin + Send>(&self, reader: &mut R) -> Result<Option<Point>> {
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }
            if line.trim().is_empty() {
                continue;
            }

            let mut rdr = csv::ReaderBuilder::new()
                .has_headers(false)
                .trim(csv::Trim::All)
                .from_reader(line.trim_start_matches('\u{feff}').as_bytes());
            let Some(record) = rdr.records().next().transpose()? else {
                continue;
            };
            if record.get(0).is_some_and(|f| f.eq_ignore_ascii_case("x")) {
                continue;
            }
            return parse_record(&record).map(Some);
        }
    }
}

fn parse_record(record: &csv::StringRecord) -> Result<Point> {
    let field = |i: usize, name: &str| -> Result<f64> {
        let raw = record
            .get(i)
            .ok_or_else(|| Error::Record(format!("missing {} in {:?}", name, record)))?;
        raw.parse()
            .map_err(|_| Error::Record(format!("bad {} value: {:?}", name, raw)))
    };

    let mut point = Point::new(field(0, "x")?, field(1, "y")?);
    if let Some(series) = record.get(2).filter(|s| !s.is_empty()) {
        point.extra.insert("series".to_string(), Value::from(series));
    }
    finite(point)
}

/// Points must have finite coordinates to be bucketed into columns.
fn finite(point: Point) -> Result<Point> {
    if point.x.is_finite() && point.y.is_finite() {
        Ok(point)
    } else {
        Err(Error::Record(format!(
            "non-finite coordinates x={} y={}",
            point.x, point.y
        )))
    }
}
