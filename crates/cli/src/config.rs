//! Command-line configuration.

use crate::commands::Command;
use crate::logging;
use anyhow::Context;
use clap::{ArgAction, Args, Parser, ValueEnum};
use corelib::{Lcg, Ring, RingBuilder};
use tracing::info;

/// Build a Chord ring and query it.
#[derive(Debug, Clone, Parser)]
#[command(name = "chord", version)]
pub struct CliConfig {
    /// Number of identifiers on the ring; a power of two up to 2^20 (e.g. 2^5 = 32)
    #[arg(long, short = 's')]
    pub size: u64,

    #[command(flatten)]
    pub activation: Activation,

    /// Finger table size (defaults to log2 of the ring size)
    #[arg(long)]
    pub table_size: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Where active nodes come from: an explicit list or the LCG.
#[derive(Debug, Clone, Args)]
pub struct Activation {
    /// Active node ids, comma separated
    #[arg(
        long,
        short = 'm',
        value_delimiter = ',',
        required_unless_present = "seed",
        conflicts_with = "seed"
    )]
    pub active: Vec<u64>,

    /// Generator seed
    #[arg(long, requires_all = ["increment", "multiplier"])]
    pub seed: Option<u64>,

    /// Generator increment
    #[arg(long, requires = "seed")]
    pub increment: Option<u64>,

    /// Generator multiplier
    #[arg(long, requires = "seed")]
    pub multiplier: Option<u64>,
}

impl Activation {
    fn apply(&self, builder: RingBuilder) -> RingBuilder {
        let builder = builder.with_active(self.active.iter().copied());
        match (self.seed, self.increment, self.multiplier) {
            (Some(seed), Some(increment), Some(multiplier)) => {
                builder.with_source(Lcg::new(seed, increment, multiplier))
            }
            _ => builder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl CliConfig {
    /// Run the full ring pipeline from the parsed options.
    pub fn build_ring(&self) -> corelib::Result<Ring> {
        let mut builder = self.activation.apply(RingBuilder::new(self.size));
        if let Some(table_size) = self.table_size {
            builder = builder.with_table_size(table_size);
        }
        builder.build()
    }

    pub fn run(self) -> anyhow::Result<()> {
        logging::init(self.verbose)?;

        let ring = self
            .build_ring()
            .with_context(|| format!("failed to build a ring of size {}", self.size))?;
        info!(
            size = ring.size(),
            active = ring.active_count(),
            table_size = ?ring.table_size(),
            "ring ready"
        );

        let result = self.command.execute(&ring)?;
        match self.format {
            OutputFormat::Text => println!("{}", result),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::NodeId;

    #[test]
    fn test_parse_manual_activation() {
        let config =
            CliConfig::try_parse_from(["chord", "--size", "32", "--active", "1,4,7", "active"]).unwrap();
        assert_eq!(config.size, 32);
        assert_eq!(config.activation.active, vec![1, 4, 7]);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(matches!(config.command, Command::Active));
    }

    #[test]
    fn test_parse_generator_activation() {
        let config = CliConfig::try_parse_from([
            "chord", "-s", "16", "--seed", "1", "--increment", "3", "--multiplier", "5", "-vv",
            "lookup", "--start", "1", "--key", "9",
        ])
        .unwrap();
        assert_eq!(config.activation.seed, Some(1));
        assert_eq!(config.verbose, 2);
        assert!(matches!(config.command, Command::Lookup { start: 1, key: 9, .. }));

        let ring = config.build_ring().unwrap();
        assert_eq!(ring.active_count(), 16);
    }

    #[test]
    fn test_activation_is_required() {
        assert!(CliConfig::try_parse_from(["chord", "--size", "32", "active"]).is_err());
    }

    #[test]
    fn test_activation_sources_conflict() {
        let result = CliConfig::try_parse_from([
            "chord", "-s", "8", "-m", "1", "--seed", "1", "--increment", "1", "--multiplier", "1",
            "active",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_generator_requires_all_parameters() {
        assert!(CliConfig::try_parse_from(["chord", "-s", "8", "--seed", "1", "active"]).is_err());
    }

    #[test]
    fn test_build_ring_rejects_bad_size() {
        let config = CliConfig::try_parse_from(["chord", "-s", "24", "-m", "1", "active"]).unwrap();
        assert_eq!(config.build_ring(), Err(corelib::Error::InvalidSize(24)));
    }

    #[test]
    fn test_build_ring_with_table_size() {
        let config = CliConfig::try_parse_from([
            "chord", "-s", "32", "-m", "1,31", "--table-size", "3", "successor", "--key", "20",
        ])
        .unwrap();
        let ring = config.build_ring().unwrap();
        assert_eq!(ring.table_size(), Some(3));
        assert_eq!(ring.successor_of(20), Some(NodeId(31)));
    }
}
