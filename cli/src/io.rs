use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use decimator::{Codec, CsvCodec, Format, JsonCodec, Point};
use eyre::{Result, WrapErr};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader, BufWriter, ReadBuf};

#[derive(Debug)]
pub enum Input {
    Stdin(BufReader<tokio::io::Stdin>),
    File(BufReader<File>),
}

impl Input {
    pub async fn from_filename(name: &str) -> Result<Self> {
        match name {
            "stdin" => Ok(Input::Stdin(BufReader::new(tokio::io::stdin()))),
            _ => {
                let f = File::open(name)
                    .await
                    .wrap_err_with(|| format!("opening {}", name))?;
                Ok(Input::File(BufReader::new(f)))
            }
        }
    }

    /// Peek at the buffered head of the input to pick a codec. `None` for
    /// empty input.
    pub async fn detect_format(&mut self) -> Result<Option<Format>> {
        let buf = self.fill_buf().await?;
        if buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(Format::detect(buf)))
    }
}

impl AsyncRead for Input {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Input::Stdin(reader) => Pin::new(reader).poll_read(cx, buf),
            Input::File(reader) => Pin::new(reader).poll_read(cx, buf),
        }
    }
}

impl AsyncBufRead for Input {
    fn poll_fill_buf(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<&[u8]>> {
        match self.get_mut() {
            Input::Stdin(reader) => Pin::new(reader).poll_fill_buf(cx),
            Input::File(reader) => Pin::new(reader).poll_fill_buf(cx),
        }
    }

    fn consume(self: Pin<&mut Self>, amt: usize) {
        match self.get_mut() {
            Input::Stdin(reader) => Pin::new(reader).consume(amt),
            Input::File(reader) => Pin::new(reader).consume(amt),
        }
    }
}

#[derive(Debug)]
pub enum Output {
    Stdout(BufWriter<tokio::io::Stdout>),
    File(BufWriter<File>),
}

impl Output {
    pub async fn from_filename(name: &str) -> Result<Self> {
        match name {
            "stdout" => Ok(Output::Stdout(BufWriter::new(tokio::io::stdout()))),
            _ => {
                let f = File::create(name)
                    .await
                    .wrap_err_with(|| format!("creating {}", name))?;
                Ok(Output::File(BufWriter::new(f)))
            }
        }
    }
}

impl AsyncWrite for Output {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, io::Error>> {
        match self.get_mut() {
            Output::Stdout(writer) => Pin::new(writer).poll_write(cx, buf),
            Output::File(writer) => Pin::new(writer).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        match self.get_mut() {
            Output::Stdout(writer) => Pin::new(writer).poll_flush(cx),
            Output::File(writer) => Pin::new(writer).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        match self.get_mut() {
            Output::Stdout(writer) => Pin::new(writer).poll_shutdown(cx),
            Output::File(writer) => Pin::new(writer).poll_shutdown(cx),
        }
    }
}

/// Source names to read, falling back to stdin.
pub fn sources(files: &[String]) -> Vec<String> {
    if files.is_empty() {
        vec!["stdin".to_string()]
    } else {
        files.to_vec()
    }
}

/// Decode every point from every source, detecting each source's encoding.
pub async fn read_points(files: &[String]) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    for source in sources(files) {
        let mut input = Input::from_filename(&source).await?;
        let Some(format) = input.detect_format().await? else {
            tracing::debug!(%source, "empty input");
            continue;
        };
        let before = points.len();
        while let Some(point) = decode_point(&mut input, format)
            .await
            .wrap_err_with(|| format!("decoding {}", source))?
        {
            points.push(point);
        }
        tracing::debug!(%source, ?format, points = points.len() - before, "read points");
    }
    Ok(points)
}

pub async fn decode_point(input: &mut Input, format: Format) -> decimator::Result<Option<Point>> {
    match format {
        Format::Json => JsonCodec.decode(input).await,
        Format::Csv => CsvCodec.decode(input).await,
    }
}

pub async fn encode_point(output: &mut Output, format: Format, point: &Point) -> decimator::Result<()> {
    match format {
        Format::Json => JsonCodec.encode(output, point).await,
        Format::Csv => CsvCodec.encode(output, point).await,
    }
}
