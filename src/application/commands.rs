//! CLI commands and handlers
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::application::services::PoolService;
use crate::domain::oracle::{FeedKey, FeedTable, KeyCodec, ValueCodec};
use crate::shared::config::Config;
use crate::shared::types::FixedValue;

#[derive(Parser)]
#[command(name = "defipool")]
#[command(version, about = "Oracle-priced liquidity pool toolkit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a feed label ("DAI-BNB") into its 32-byte oracle key
    KeyEncode {
        label: String,
    },

    /// Decode a 32-byte oracle key back into its feed label
    KeyDecode {
        key: String,
    },

    /// Decode a raw 32-byte leaf value into a price
    ValueDecode {
        value: String,

        /// Feed label the value belongs to
        #[arg(short, long)]
        label: String,

        /// Config whose [[feeds]] extend the standard precision table
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Encode a decimal price into a raw 32-byte leaf value
    ValueEncode {
        price: String,

        #[arg(short, long)]
        label: String,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Read the configured pool's price from its oracle registry
    Price {
        #[arg(short, long, default_value = "Config.toml")]
        config: PathBuf,

        /// Feed label (overrides config)
        #[arg(short, long)]
        label: Option<String>,

        /// Leaf snapshot (overrides config)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Run the configured deposit/redeem scenario against a mock asset
    Simulate {
        #[arg(short, long, default_value = "Config.toml")]
        config: PathBuf,

        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands) -> Result<()> {
        match command {
            Commands::KeyEncode { label } => {
                let key = Self::key_encode(&label)?;
                println!("{}", key);
            }
            Commands::KeyDecode { key } => {
                println!("{}", Self::key_decode(&key)?);
            }
            Commands::ValueDecode { value, label, config } => {
                let codec = Self::codec(config.as_ref())?;
                let raw: FixedValue = value
                    .parse()
                    .with_context(|| format!("{:?} is not a 32-byte hex value", value))?;
                let price = codec.decode(&raw, &label)?;
                println!("{}", price);
            }
            Commands::ValueEncode { price, label, config } => {
                let codec = Self::codec(config.as_ref())?;
                println!("{}", codec.encode(&price, &label)?);
            }
            Commands::Price { config, label, snapshot, json } => {
                Self::execute_price_command(config, label, snapshot, json).await?;
            }
            Commands::Simulate { config, snapshot, json } => {
                Self::execute_simulate_command(config, snapshot, json).await?;
            }
        }
        Ok(())
    }

    pub fn key_encode(label: &str) -> Result<FeedKey> {
        KeyCodec::encode(label).with_context(|| format!("cannot encode feed label {:?}", label))
    }

    pub fn key_decode(key: &str) -> Result<String> {
        let key: FeedKey = key.parse()?;
        Ok(KeyCodec::decode(&key)?)
    }

    fn codec(config: Option<&PathBuf>) -> Result<ValueCodec> {
        let table = match config {
            Some(path) => Self::load_config(path)?.feed_table()?,
            None => FeedTable::standard(),
        };
        Ok(ValueCodec::new(table))
    }

    fn load_config(path: &PathBuf) -> Result<Config> {
        Config::from_file(path).with_context(|| format!("load config {}", path.display()))
    }

    async fn execute_price_command(
        config_path: PathBuf,
        label: Option<String>,
        snapshot: Option<PathBuf>,
        json: bool,
    ) -> Result<()> {
        let mut config = Self::load_config(&config_path)?;
        if let Some(snapshot) = snapshot {
            config = config.with_snapshot(snapshot);
        }
        if let Some(label) = label {
            config = config.with_label(&label)?;
        }

        info!("Reading {} price for pool {}", config.pool.label, config.pool.address);
        let reading = PoolService::new(config)
            .fetch_price()
            .await
            .context("price read failed")?;

        if json {
            println!("{}", serde_json::to_string_pretty(&reading)?);
        } else {
            println!("{} = {}", reading.label, reading.price);
            println!("raw      {}", reading.raw);
            println!("key      {}", reading.key);
            println!("registry {}", reading.registry);
        }
        Ok(())
    }

    async fn execute_simulate_command(config_path: PathBuf, snapshot: Option<PathBuf>, json: bool) -> Result<()> {
        let mut config = Self::load_config(&config_path)?;
        if let Some(snapshot) = snapshot {
            config = config.with_snapshot(snapshot);
        }

        let report = PoolService::new(config)
            .simulate()
            .await
            .context("simulation failed")?;

        if json {
            println!("{}", report.to_json()?);
        } else {
            println!("{}", report.summary());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["defipool", "value-decode", "0x01", "--label", "DAI-BNB"]).unwrap();
        assert!(matches!(cli.command, Commands::ValueDecode { ref label, config: None, .. } if label == "DAI-BNB"));

        let cli = Cli::try_parse_from(["defipool", "simulate", "--json"]).unwrap();
        match cli.command {
            Commands::Simulate { config, snapshot, json } => {
                assert_eq!(config, PathBuf::from("Config.toml"));
                assert!(snapshot.is_none());
                assert!(json);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_key_round_trip() {
        let key = CommandExecutor::key_encode("DAI-BNB").unwrap();
        assert_eq!(
            key.to_string(),
            "0x000000000000000000000000000000000000000000000000004441492d424e42"
        );
        assert_eq!(CommandExecutor::key_decode(&key.to_string()).unwrap(), "DAI-BNB");
        assert!(CommandExecutor::key_encode("").is_err());
        assert!(CommandExecutor::key_decode("0xzz").is_err());
    }

    #[tokio::test]
    async fn test_value_commands() {
        CommandExecutor::execute(Commands::ValueEncode {
            price: "0.0033".to_string(),
            label: "DAI-BNB".to_string(),
            config: None,
        })
        .await
        .unwrap();

        let unknown = CommandExecutor::execute(Commands::ValueDecode {
            value: "0x000000000000000000000000000000000000000000000000000bb9551fc24000".to_string(),
            label: "XYZ-BNB".to_string(),
            config: None,
        })
        .await;
        assert!(unknown.is_err());
    }
}
