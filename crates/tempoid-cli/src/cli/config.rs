use anyhow::bail;
use clap::{Parser, Subcommand};
use core::time::Duration;
use tempoid::{DEFAULT_EPOCH, GeneratorConfig, SystemClock, TimeSource};

/// Runtime configuration for the `tempoid` binary.
///
/// Generator settings are parsed from CLI arguments or environment variables
/// (a `.env` file is honoured), with defaults matching the library.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tempoid",
    version,
    about = "Generate and inspect time-ordered 64-bit IDs"
)]
pub struct CliArgs {
    /// Reference point of all encoded timestamps, in milliseconds since
    /// 1970-01-01 UTC.
    ///
    /// IDs only decode correctly against the epoch they were generated with.
    ///
    /// Environment variable: `TEMPOID_EPOCH_MILLIS`
    #[arg(long, env = "TEMPOID_EPOCH_MILLIS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_millis: u64,

    /// How far the wall clock may step backward before generation fails.
    ///
    /// Smaller steps are waited out while holding the generator lock.
    ///
    /// Environment variable: `TEMPOID_TOLERANCE_MILLIS`
    #[arg(long, env = "TEMPOID_TOLERANCE_MILLIS", default_value_t = 5)]
    pub tolerance_millis: u64,

    /// Print machine-readable JSON instead of plain text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate one or more IDs
    Generate {
        /// Number of IDs to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Split an ID into timestamp and sequence
    Decode {
        /// Decimal ID.
        id: String,
    },
    /// Check that an ID lies between the epoch and now
    Validate {
        /// Decimal ID.
        id: String,
    },
    /// Generate IDs and print the generator statistics
    Stats {
        /// Number of IDs to generate before taking the snapshot.
        #[arg(short = 'n', long, default_value_t = 1_000)]
        count: usize,
    },
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub generator: GeneratorConfig,
    pub command: Command,
    pub json: bool,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let now = SystemClock.current_millis();
        if args.epoch_millis > now {
            bail!(
                "TEMPOID_EPOCH_MILLIS ({}) is in the future (now = {})",
                args.epoch_millis,
                now
            );
        }

        let generator = GeneratorConfig::new(Duration::from_millis(args.epoch_millis))
            .with_tolerance(Duration::from_millis(args.tolerance_millis));

        Ok(Self {
            generator,
            command: args.command,
            json: args.json,
        })
    }
}
