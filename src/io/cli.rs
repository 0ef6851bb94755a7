//! Command-line interface for deriving statistics stores and building bundles

use crate::io::configuration::{DEFAULT_SEED, DEFAULT_TARGET_DOUBLE_BOND_PROBABILITY, ModelConfig};
use crate::io::error::{Result, StatsError};
use crate::io::progress::ScanProgress;
use crate::model::{ProbabilityModelBuilder, RuleSampler, StatisticsBundle};
use crate::source::{
    DatasetStatsSource, DirectoryStore, MemoryStore, SmilesStatsCalculator, StatsSource,
    StoreStatsSource,
};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rxnstats")]
#[command(
    version,
    about = "Build reaction-rule probability tables for molecule generation"
)]
/// Command-line arguments for the statistics tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress and summary output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log loading and rescaling details to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
}

/// Subcommands of the statistics tool
#[derive(Subcommand)]
pub enum Command {
    /// Derive raw statistics from a SMILES file and write them as a directory store
    Analyze {
        /// Newline-delimited SMILES file
        #[arg(value_name = "SMILES_FILE")]
        dataset: PathBuf,

        /// Directory receiving one JSON table per statistic
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    /// Build a rescaled statistics bundle
    Build {
        /// Directory store to load (packaged tables when neither source is given)
        #[arg(long, value_name = "DIR", conflicts_with = "smiles")]
        store: Option<PathBuf>,

        /// SMILES file to derive statistics from
        #[arg(long, value_name = "FILE")]
        smiles: Option<PathBuf>,

        /// Aggregate probability of double-bond ring-closing rules
        #[arg(short, long, default_value_t = DEFAULT_TARGET_DOUBLE_BOND_PROBABILITY)]
        target: f64,

        /// Write the bundle as JSON to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Draw this many ring-closing rules from the bundle and print them
        #[arg(long, default_value_t = 0)]
        sample: usize,

        /// Random seed for rule draws
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

impl Cli {
    /// Check if progress and summaries should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Pick the statistics source for a build
///
/// An explicit store wins over a dataset; with neither, the packaged tables
/// are used.
pub fn select_source(
    store: Option<&Path>,
    smiles: Option<&Path>,
    progress: ScanProgress,
) -> Box<dyn StatsSource> {
    match (store, smiles) {
        (Some(root), _) => Box::new(StoreStatsSource::new(DirectoryStore::new(root))),
        (None, Some(dataset)) => Box::new(DatasetStatsSource::new(
            dataset,
            SmilesStatsCalculator::with_progress(progress),
        )),
        (None, None) => Box::new(StoreStatsSource::new(MemoryStore::packaged())),
    }
}

/// Human-readable overview of a bundle
pub fn summarize(bundle: &StatisticsBundle) -> String {
    let mut summary = String::new();
    let _ = writeln!(
        summary,
        "Molecule size: {:.2} +/- {:.2}",
        bundle.average_size(),
        bundle.size_std_dev()
    );
    let _ = writeln!(
        summary,
        "Ring-forming rules: {}",
        bundle.ring_forming_rules().len()
    );
    let _ = writeln!(
        summary,
        "Ring-closing rules: {} (double-bond mass {:.4})",
        bundle.ring_closing_rules().len(),
        bundle.double_bond_mass()
    );
    let _ = write!(summary, "General rules: {}", bundle.general_rules().len());
    summary
}

/// Runs the selected subcommand
pub struct CommandRunner {
    cli: Cli,
}

impl CommandRunner {
    /// Create a runner for the parsed arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Execute the subcommand
    ///
    /// # Errors
    ///
    /// Returns any source, model construction or file system error
    pub fn process(&self) -> Result<()> {
        match &self.cli.command {
            Command::Analyze { dataset, output } => self.analyze(dataset, output),
            Command::Build {
                store,
                smiles,
                target,
                output,
                sample,
                seed,
            } => {
                let source = select_source(store.as_deref(), smiles.as_deref(), self.progress());
                let builder = ProbabilityModelBuilder::new(ModelConfig::with_target(*target))?;
                let bundle = builder.build(source.as_ref())?;

                if let Some(path) = output {
                    write_bundle(&bundle, path)?;
                }

                self.report(&summarize(&bundle));

                if *sample > 0 {
                    self.report(&draw_ring_closures(&bundle, *sample, *seed)?);
                }

                Ok(())
            }
        }
    }

    fn progress(&self) -> ScanProgress {
        if self.cli.should_show_progress() {
            ScanProgress::visible()
        } else {
            ScanProgress::hidden()
        }
    }

    fn analyze(&self, dataset: &Path, output: &Path) -> Result<()> {
        let source = DatasetStatsSource::new(
            dataset,
            SmilesStatsCalculator::with_progress(self.progress()),
        );
        let raw = source.load()?;

        DirectoryStore::new(output).write_raw(&raw)?;

        self.report(&format!(
            "Wrote {} general and {} ring-closing rules to {}",
            raw.general_rules.len(),
            raw.ring_closing_rules.len(),
            output.display()
        ));
        Ok(())
    }

    // Allow print for the command's actual output
    #[allow(clippy::print_stdout)]
    fn report(&self, text: &str) {
        if self.cli.should_show_progress() {
            println!("{text}");
        }
    }
}

fn write_bundle(bundle: &StatisticsBundle, path: &Path) -> Result<()> {
    std::fs::write(path, bundle.to_json()?).map_err(|source| StatsError::FileSystem {
        path: path.to_path_buf(),
        operation: "write bundle",
        source,
    })
}

fn draw_ring_closures(bundle: &StatisticsBundle, count: usize, seed: u64) -> Result<String> {
    let sampler = RuleSampler::ring_closing(bundle)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut drawn = String::new();
    for _ in 0..count {
        if let Some(rule) = sampler.sample(&mut rng) {
            let _ = writeln!(drawn, "{rule}");
        }
    }
    Ok(drawn.trim_end().to_string())
}
