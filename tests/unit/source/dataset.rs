//! Tests for dataset reading and the dataset-backed source

#[cfg(test)]
mod tests {
    use rxnstats::model::bundle::RawStatistics;
    use rxnstats::source::StatsSource;
    use rxnstats::source::calculator::SmilesStatsCalculator;
    use rxnstats::source::dataset::{
        DatasetStatsSource, StatsCalculator, parse_records, read_records,
    };
    use rxnstats::{Result, StatsError};
    use std::path::Path;

    struct BrokenCalculator;

    impl StatsCalculator for BrokenCalculator {
        fn calculate(&self, _records: &[String]) -> Result<RawStatistics> {
            Err(StatsError::InvalidParameter {
                parameter: "records",
                value: "0".to_string(),
                reason: "unusable".to_string(),
            })
        }
    }

    // Tests first token per line is taken and blank lines skipped
    // Verified by keeping whole lines
    #[test]
    fn test_parse_records() {
        let records = parse_records("CCO ethanol\n\n   \nc1ccccc1\tbenzene 2\r\nC\n");

        assert_eq!(records, vec!["CCO", "c1ccccc1", "C"]);
        assert!(parse_records("").is_empty());
    }

    // Tests unreadable dataset reports a file system error
    // Verified by mapping read failures to derivation errors
    #[test]
    fn test_read_records_missing_file() {
        let result = read_records(Path::new("/nonexistent/molecules.smi"));

        assert!(matches!(
            result,
            Err(StatsError::FileSystem {
                operation: "read dataset",
                ..
            })
        ));
    }

    // Tests empty dataset reports a derivation error
    // Verified by returning an empty record list
    #[test]
    fn test_read_records_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "\n\n").unwrap();

        assert!(matches!(
            read_records(file.path()),
            Err(StatsError::StatisticsDerivation { .. })
        ));
    }

    // Tests lines with invalid UTF-8 are skipped and the rest kept
    // Verified by failing the whole read on the first bad byte
    #[test]
    fn test_read_records_skips_invalid_utf8_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.smi");
        std::fs::write(&path, b"C1CC=C1\n\xff\xfeCCO\n").unwrap();

        assert_eq!(read_records(&path).unwrap(), vec!["C1CC=C1"]);

        let raw = DatasetStatsSource::new(&path, SmilesStatsCalculator::new())
            .load()
            .unwrap();
        assert!((raw.average_size - 4.0).abs() < 1e-12);
        assert!(raw.size_std_dev.abs() < 1e-12);

        std::fs::write(&path, b"\xff\xfe\n\xc3\n").unwrap();
        assert!(matches!(
            read_records(&path),
            Err(StatsError::StatisticsDerivation { .. })
        ));
    }

    // Tests dataset source runs the calculator over file records
    // Verified by passing an empty record list to the calculator
    #[test]
    fn test_dataset_source_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mols.smi");
        std::fs::write(&path, "C1=CCCCC1 cyclohexene\nCCO\n").unwrap();

        let source = DatasetStatsSource::new(&path, SmilesStatsCalculator::new());
        let raw = source.load().unwrap();

        assert_eq!(source.path(), path.as_path());
        assert!(source.describe().starts_with("dataset at "));
        assert!((raw.average_size - 4.5).abs() < 1e-12);
    }

    // Tests calculator failures surface as derivation errors
    // Verified by propagating the calculator error unchanged
    #[test]
    fn test_calculator_errors_become_derivation() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "CCO\n").unwrap();

        let source = DatasetStatsSource::new(file.path(), BrokenCalculator);
        match source.load() {
            Err(StatsError::StatisticsDerivation { reason }) => {
                assert!(reason.contains("records"));
            }
            other => panic!("expected derivation error, got {other:?}"),
        }
    }
}
