//! Key-addressed statistics tables and the source that reads them
//!
//! A store maps each key in
//! [`STORE_KEYS`](crate::io::configuration::STORE_KEYS) to a JSON blob: `size_stats` is a
//! two-element `[average, std_dev]` array, rule tables are string arrays and
//! probability tables are number arrays.

use crate::io::configuration::{
    DISTRIBUTION_TOLERANCE, GENERAL_PROBABILITIES_KEY, GENERAL_RULES_KEY,
    RING_CLOSING_PROBABILITIES_KEY, RING_CLOSING_RULES_KEY, RING_FORMING_RULES_KEY,
    SIZE_STATS_KEY, STORE_FILE_EXTENSION,
};
use crate::io::error::{Result, StatsError, corrupt_statistics};
use crate::model::bundle::{RawStatistics, table_defect};
use crate::model::rule::Rule;
use crate::source::StatsSource;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Load array-like tables by name
pub trait TableStore {
    /// Fetch the blob stored under `key`, `None` when the table is absent
    ///
    /// # Errors
    ///
    /// Returns an error if the table exists but cannot be read
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Where the tables live, for logs
    fn location(&self) -> String;
}

/// Tables stored as `<root>/<key>.json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Store rooted at `root`; nothing is touched until a table is read or written
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the table files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing the table for `key`
    pub fn table_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{STORE_FILE_EXTENSION}"))
    }

    /// Persist every table of `statistics`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the directory or a file cannot be written, or
    /// `Serialization` if a table fails to encode
    pub fn write_raw(&self, statistics: &RawStatistics) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|source| StatsError::FileSystem {
            path: self.root.clone(),
            operation: "create store directory",
            source,
        })?;

        for (key, blob) in encode_tables(statistics)? {
            let path = self.table_path(key);
            std::fs::write(&path, blob).map_err(|source| StatsError::FileSystem {
                path,
                operation: "write table",
                source,
            })?;
        }

        tracing::info!(root = %self.root.display(), "Wrote statistics store");
        Ok(())
    }
}

impl TableStore for DirectoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.table_path(key);
        match std::fs::read(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StatsError::FileSystem {
                path,
                operation: "read table",
                source,
            }),
        }
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Tables held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Default tables compiled into the crate
    pub fn packaged() -> Self {
        let mut store = Self::new();
        store.insert(
            SIZE_STATS_KEY,
            include_bytes!("../../data/packaged/size_stats.json").to_vec(),
        );
        store.insert(
            RING_FORMING_RULES_KEY,
            include_bytes!("../../data/packaged/ring_forming_rules.json").to_vec(),
        );
        store.insert(
            RING_CLOSING_RULES_KEY,
            include_bytes!("../../data/packaged/ring_closing_rules.json").to_vec(),
        );
        store.insert(
            RING_CLOSING_PROBABILITIES_KEY,
            include_bytes!("../../data/packaged/ring_closing_probabilities.json").to_vec(),
        );
        store.insert(
            GENERAL_RULES_KEY,
            include_bytes!("../../data/packaged/general_rules.json").to_vec(),
        );
        store.insert(
            GENERAL_PROBABILITIES_KEY,
            include_bytes!("../../data/packaged/general_probabilities.json").to_vec(),
        );
        store
    }

    /// Store holding every table of `statistics`
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a table fails to encode
    pub fn from_raw(statistics: &RawStatistics) -> Result<Self> {
        let mut store = Self::new();
        for (key, blob) in encode_tables(statistics)? {
            store.insert(key, blob);
        }
        Ok(store)
    }

    /// Add or replace a table
    pub fn insert(&mut self, key: impl Into<String>, blob: Vec<u8>) {
        self.tables.insert(key.into(), blob);
    }

    /// Drop a table, returning its blob
    pub fn remove(&mut self, key: &str) -> Option<Vec<u8>> {
        self.tables.remove(key)
    }

    /// Number of tables held
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no tables are held
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.tables.get(key).cloned())
    }

    fn location(&self) -> String {
        format!("memory ({} tables)", self.tables.len())
    }
}

fn encode_table<T: Serialize + ?Sized>(table: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(table).map_err(|source| StatsError::Serialization {
        operation: "table export",
        source,
    })
}

fn encode_tables(statistics: &RawStatistics) -> Result<Vec<(&'static str, Vec<u8>)>> {
    Ok(vec![
        (
            SIZE_STATS_KEY,
            encode_table(&[statistics.average_size, statistics.size_std_dev])?,
        ),
        (
            RING_FORMING_RULES_KEY,
            encode_table(&statistics.ring_forming_rules)?,
        ),
        (
            RING_CLOSING_RULES_KEY,
            encode_table(&statistics.ring_closing_rules)?,
        ),
        (
            RING_CLOSING_PROBABILITIES_KEY,
            encode_table(&statistics.ring_closing_probabilities)?,
        ),
        (GENERAL_RULES_KEY, encode_table(&statistics.general_rules)?),
        (
            GENERAL_PROBABILITIES_KEY,
            encode_table(&statistics.general_probabilities)?,
        ),
    ])
}

/// Reads raw statistics from a [`TableStore`]
#[derive(Debug, Clone)]
pub struct StoreStatsSource<S> {
    store: S,
    tolerance: f64,
}

impl<S: TableStore> StoreStatsSource<S> {
    /// Source over `store` using the default distribution tolerance
    pub const fn new(store: S) -> Self {
        Self {
            store,
            tolerance: DISTRIBUTION_TOLERANCE,
        }
    }

    /// Override the tolerance used when checking loaded distributions
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// The underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn table<T: DeserializeOwned>(&self, key: &'static str) -> Result<T> {
        let blob = self
            .store
            .load(key)?
            .ok_or(StatsError::MissingStatistics { key })?;
        serde_json::from_slice(&blob).map_err(|e| corrupt_statistics(key, &e))
    }

    fn checked_table(
        &self,
        rules_key: &'static str,
        probabilities_key: &'static str,
    ) -> Result<(Vec<Rule>, Vec<f64>)> {
        let rules: Vec<Rule> = self.table(rules_key)?;
        let probabilities: Vec<f64> = self.table(probabilities_key)?;

        if let Some(defect) = table_defect(&rules, &probabilities, self.tolerance) {
            return Err(corrupt_statistics(probabilities_key, &defect));
        }

        Ok((rules, probabilities))
    }
}

impl<S: TableStore> StatsSource for StoreStatsSource<S> {
    fn load(&self) -> Result<RawStatistics> {
        let size_stats: Vec<f64> = self.table(SIZE_STATS_KEY)?;
        let &[average_size, size_std_dev] = size_stats.as_slice() else {
            return Err(corrupt_statistics(
                SIZE_STATS_KEY,
                &format!("expected [average, std_dev], found {} values", size_stats.len()),
            ));
        };
        if !average_size.is_finite() || !size_std_dev.is_finite() || size_std_dev < 0.0 {
            return Err(corrupt_statistics(
                SIZE_STATS_KEY,
                &format!("average {average_size}, std dev {size_std_dev}"),
            ));
        }

        let ring_forming_rules: Vec<Rule> = self.table(RING_FORMING_RULES_KEY)?;
        let (ring_closing_rules, ring_closing_probabilities) =
            self.checked_table(RING_CLOSING_RULES_KEY, RING_CLOSING_PROBABILITIES_KEY)?;
        let (general_rules, general_probabilities) =
            self.checked_table(GENERAL_RULES_KEY, GENERAL_PROBABILITIES_KEY)?;

        tracing::info!(
            location = %self.store.location(),
            ring_forming_rules = ring_forming_rules.len(),
            "Loaded statistics tables"
        );

        Ok(RawStatistics {
            average_size,
            size_std_dev,
            ring_forming_rules,
            ring_closing_rules,
            ring_closing_probabilities,
            general_rules,
            general_probabilities,
        })
    }

    fn describe(&self) -> String {
        format!("store at {}", self.store.location())
    }
}
