//! CSV run log
//!
//! Appends one row per rendered contract. The header is written only when
//! the file is new or empty.

use std::fs::OpenOptions;
use std::path::Path;

use tracing::info;

use crate::report::ReportRecord;
use crate::Result;

/// Appends `records` to the CSV file at `path`, creating it if needed.
pub fn append(path: &Path, records: &[ReportRecord]) -> Result<()> {
    let needs_header = std::fs::metadata(path)
        .map(|meta| meta.len() == 0)
        .unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(
        path = %path.display(),
        rows = records.len(),
        "Appended CSV log"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Report, Role};
    use compare_core::prelude::*;

    fn record() -> ReportRecord {
        let expiry = Expiry::from_mdy(6, 16, 2023).unwrap();
        let provider = InMemoryProvider::default()
            .with_underlying("SPY", 410.0)
            .with_quote(OptionQuote {
                ticker: "SPY".to_string(),
                expiry,
                strike: 400.0,
                contract_type: ContractType::Call,
                premium: 10.0,
                bid: 9.8,
                ask: 10.2,
                delta: 0.55,
                theta: -0.2,
                gamma: 0.02,
                vega: 0.3,
                implied_volatility: 0.25,
            });
        let analysis = analyse_contract(
            &provider,
            &MetricsEngine::default(),
            parse("SPY 06-16-2023 400C").unwrap(),
        )
        .unwrap();
        let report = Report::new("Fri 16 Jun 2023, 10:30AM".to_string(), analysis, None);
        report.records().remove(0)
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.csv");

        append(&path, &[record()]).unwrap();
        append(&path, &[record()]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("role,ran_on,ticker,expiry,strike,contract_type"));
        assert!(lines[1].starts_with("primary,"));
        assert_eq!(lines[1], lines[2]);
    }

    #[test]
    fn test_rows_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.csv");
        append(&path, &[record()]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        let row = reader.records().next().unwrap().unwrap();
        let field = |name: &str| {
            let idx = headers.iter().position(|h| h == name).unwrap();
            row.get(idx).unwrap().to_string()
        };

        assert_eq!(field("ticker"), "SPY");
        assert_eq!(field("expiry"), "2023-06-16");
        assert_eq!(field("contract_type"), "C");
        assert_eq!(field("occ_symbol"), "SPY230616C00400000");
        assert_eq!(record().role, Role::Primary);
    }
}
