//! Symbol universes: scan candidates and held positions.

use std::collections::HashSet;
use std::path::Path;
use tracing::{error, info, warn};

use super::store;
use crate::config::StoragePaths;
use crate::error::Result;

/// First `top_n` symbols from the candidate list, in file order.
///
/// A missing or unreadable list yields an empty universe.
pub fn load_candidates(path: &Path, top_n: usize) -> Vec<String> {
    match store::read_symbols(path) {
        Ok(mut symbols) => {
            symbols.truncate(top_n);
            info!("Loaded {} candidate symbols from {}", symbols.len(), path.display());
            symbols
        }
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Keep only symbols listed in the instrument master. Without a master, keep everything.
pub fn filter_by_master(symbols: Vec<String>, master: &Path) -> Vec<String> {
    let known: HashSet<String> = match store::read_symbols(master) {
        Ok(known) => known.into_iter().collect(),
        Err(e) => {
            warn!(
                "Instrument master {} unavailable ({}), scanning unfiltered list",
                master.display(),
                e
            );
            return symbols;
        }
    };

    let before = symbols.len();
    let kept: Vec<String> = symbols.into_iter().filter(|s| known.contains(s)).collect();
    if kept.len() < before {
        info!("Dropped {} symbols missing from the instrument master", before - kept.len());
    }
    kept
}

/// Symbols to scan: the candidate list filtered by the instrument master.
pub fn scan_universe(storage: &StoragePaths, top_n: usize) -> Vec<String> {
    let symbols = load_candidates(&storage.top_losers(), top_n);
    filter_by_master(symbols, &storage.instrument_master())
}

/// Held positions to monitor.
pub fn load_positions(storage: &StoragePaths) -> Result<Vec<String>> {
    let symbols = store::read_symbols(&storage.positions())?;
    info!("Watching {} positions", symbols.len());
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_load_candidates_truncates_in_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "top_losers.csv", "symbol,pct\nSBIN,-3\nITC,-2\nTCS,-1\n");
        let symbols = load_candidates(&dir.path().join("top_losers.csv"), 2);
        assert_eq!(symbols, vec!["SBIN", "ITC"]);
    }

    #[test]
    fn test_missing_candidate_list_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_candidates(&dir.path().join("nope.csv"), 10).is_empty());
    }

    #[test]
    fn test_filter_by_master() {
        let dir = TempDir::new().unwrap();
        write(&dir, "master.csv", "symbol,token\nSBIN,1\nTCS,2\n");
        let kept = filter_by_master(
            vec!["SBIN".into(), "ITC".into(), "TCS".into()],
            &dir.path().join("master.csv"),
        );
        assert_eq!(kept, vec!["SBIN", "TCS"]);
    }

    #[test]
    fn test_missing_master_keeps_everything() {
        let dir = TempDir::new().unwrap();
        let kept = filter_by_master(vec!["ITC".into()], &dir.path().join("missing.csv"));
        assert_eq!(kept, vec!["ITC"]);
    }

    #[test]
    fn test_scan_universe() {
        let dir = TempDir::new().unwrap();
        write(&dir, "top_losers.csv", "symbol\nSBIN\nITC\nTCS\n");
        write(&dir, "MACD_EQ_Segment_ScripMaster.csv", "symbol\nTCS\nSBIN\n");
        let storage = StoragePaths::new(dir.path());
        assert_eq!(scan_universe(&storage, 9999), vec!["SBIN", "TCS"]);
    }

    #[test]
    fn test_load_positions() {
        let dir = TempDir::new().unwrap();
        write(&dir, "my_positions.csv", "symbol,qty\nHDFCBANK,10\n");
        let storage = StoragePaths::new(dir.path());
        assert_eq!(load_positions(&storage).unwrap(), vec!["HDFCBANK"]);

        let empty = StoragePaths::new(dir.path().join("elsewhere"));
        assert!(load_positions(&empty).is_err());
    }
}
