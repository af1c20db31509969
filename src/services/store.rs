//! CSV persistence for candidates, skip lists, enriched records and the alert log.

use csv::{Reader, StringRecord, Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::types::{AlertLogEntry, DecisionRecord, EnrichedRecord, Fundamentals, SkippedSymbol};

const SYMBOL_COLUMN: &str = "symbol";

/// Headers with any UTF-8 byte order mark and padding removed.
fn clean_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect()
}

fn open_reader(path: &Path) -> Result<(Reader<File>, StringRecord)> {
    let mut reader = Reader::from_path(path)?;
    let headers = clean_headers(reader.headers()?);
    Ok((reader, headers))
}

/// Non-blank values of the `symbol` column, in file order.
pub fn read_symbols(path: &Path) -> Result<Vec<String>> {
    let (mut reader, headers) = open_reader(path)?;
    let column = headers
        .iter()
        .position(|h| h == SYMBOL_COLUMN)
        .ok_or_else(|| {
            AppError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} has no '{}' column", path.display(), SYMBOL_COLUMN),
            ))
        })?;

    let mut symbols = Vec::new();
    for result in reader.records() {
        let record = result?;
        if let Some(symbol) = record.get(column).map(str::trim) {
            if !symbol.is_empty() {
                symbols.push(symbol.to_string());
            }
        }
    }
    Ok(symbols)
}

/// Write scored candidates.
pub fn write_candidates(path: &Path, records: &[&DecisionRecord]) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(DecisionRecord::HEADERS)?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    info!("Saved {} candidates to {}", records.len(), path.display());
    Ok(())
}

/// Parse every data row, logging and dropping the ones that fail.
fn read_rows<T>(
    path: &Path,
    parse: impl Fn(&StringRecord, &StringRecord) -> Result<T>,
) -> Result<Vec<T>> {
    let (mut reader, headers) = open_reader(path)?;
    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        match result.map_err(AppError::from).and_then(|row| parse(&row, &headers)) {
            Ok(row) => rows.push(row),
            // Line numbers count the header.
            Err(e) => warn!("Skipping line {} of {}: {}", i + 2, path.display(), e),
        }
    }
    Ok(rows)
}

/// Read scored candidates. Malformed rows are skipped.
pub fn read_candidates(path: &Path) -> Result<Vec<DecisionRecord>> {
    read_rows(path, |row, headers| Ok(row.deserialize(Some(headers))?))
}

/// Write the single-column list of skipped symbols.
pub fn write_skipped(path: &Path, skipped: &[SkippedSymbol]) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([SYMBOL_COLUMN])?;
    for entry in skipped {
        writer.write_record([entry.symbol.as_str()])?;
    }
    writer.flush()?;
    info!("Saved {} skipped symbols to {}", skipped.len(), path.display());
    Ok(())
}

/// Write enriched records, with or without the commentary columns.
pub fn write_enriched(path: &Path, records: &[EnrichedRecord], with_commentary: bool) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(EnrichedRecord::headers(with_commentary))?;
    for record in records {
        writer.write_record(record.fields(with_commentary))?;
    }
    writer.flush()?;
    info!("Saved {} enriched records to {}", records.len(), path.display());
    Ok(())
}

/// Read enriched records. Missing fundamentals columns read as empty; malformed rows are skipped.
pub fn read_enriched(path: &Path) -> Result<Vec<EnrichedRecord>> {
    read_rows(path, |row, headers| {
        let record: DecisionRecord = row.deserialize(Some(headers))?;
        let fundamentals: Fundamentals = row.deserialize(Some(headers))?;
        Ok(EnrichedRecord::new(record, fundamentals))
    })
}

/// Append one sent alert, writing the header only when the log is new.
pub fn append_alert(path: &Path, entry: &AlertLogEntry) -> Result<()> {
    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new().has_headers(is_new).from_writer(file);
    writer.serialize(entry)?;
    writer.flush()?;
    Ok(())
}
