use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result, bail};
use encoding_rs::{EUC_KR, Encoding, UTF_8};

use super::model::{CellValue, Dataset};
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a `.csv` file on disk.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "csv" {
        bail!("Unsupported file extension: .{ext} (expected .csv)");
    }

    let bytes = std::fs::read(path).context("reading CSV file")?;
    let dataset =
        load_bytes(&bytes).with_context(|| format!("loading {}", path.display()))?;
    Ok(dataset)
}

/// Decode and parse raw CSV bytes.
pub fn load_bytes(bytes: &[u8]) -> Result<Dataset, PipelineError> {
    let text = decode_bytes(bytes)?;
    parse_csv(&text)
}

// ---------------------------------------------------------------------------
// Decoding: UTF-8 first, CP949 second
// ---------------------------------------------------------------------------

/// Decode the file contents as UTF-8 (an optional byte-order mark is
/// stripped), falling back to CP949/EUC-KR.
pub fn decode_bytes(bytes: &[u8]) -> Result<Cow<'_, str>, PipelineError> {
    let body = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == UTF_8 => &bytes[bom_len..],
        _ => bytes,
    };

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(body) {
        return Ok(text);
    }

    log::warn!("Input is not valid UTF-8, retrying as CP949/EUC-KR");
    // encoding_rs's EUC-KR is the WHATWG definition, i.e. windows-949.
    EUC_KR
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or(PipelineError::DecodeFailure)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// First row is the header; every other row becomes a row of typed cells.
fn parse_csv(text: &str) -> Result<Dataset, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let raw_headers = reader.headers()?.clone();
    if raw_headers.is_empty() {
        return Err(PipelineError::Parse {
            line: 1,
            message: "no columns to parse".to_string(),
        });
    }
    let headers = normalize_headers(raw_headers.iter());
    let width = headers.len();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(PipelineError::Parse {
                line,
                message: format!("expected {width} fields, saw {}", record.len()),
            });
        }
        rows.push(record.iter().map(CellValue::parse).collect());
    }

    Ok(Dataset::from_rows(headers, rows))
}

/// Blank headers become `Unnamed: {index}`; repeats of `a` become `a.1`,
/// `a.2`, … so every column name is unique.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (idx, header) in raw.enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 0;
        while names.contains(&name) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        names.push(name);
    }
    names
}
