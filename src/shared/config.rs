//! TOML configuration for the pool, its oracle and the simulation scenario

use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::domain::oracle::{FeedTable, KeyCodec};
use crate::domain::pool::PoolMetadata;
use crate::shared::errors::AppError;
use crate::shared::types::AMOUNT_DECIMALS;
use crate::shared::utils::parse_units;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolCfg {
    pub address: Address,
    pub underlyer: Address,
    pub label: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OracleCfg {
    /// JSON leaf snapshot; relative paths resolve against the config file
    pub snapshot: Option<PathBuf>,
    /// Registry address used when no snapshot is given
    pub registry: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedCfg {
    pub label: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioCfg {
    pub depositor: Address,
    pub faucet: String,
    #[serde(default)]
    pub deposits: Vec<String>,
    #[serde(default)]
    pub redeem_all: bool,
}

impl ScenarioCfg {
    pub fn faucet_amount(&self) -> Result<U256, AppError> {
        parse_amount("scenario.faucet", &self.faucet)
    }

    pub fn deposit_amounts(&self) -> Result<Vec<U256>, AppError> {
        self.deposits
            .iter()
            .enumerate()
            .map(|(i, amount)| parse_amount(&format!("scenario.deposits[{}]", i), amount))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub pool: PoolCfg,
    #[serde(default)]
    pub oracle: OracleCfg,
    #[serde(default)]
    pub feeds: Vec<FeedCfg>,
    pub scenario: Option<ScenarioCfg>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let mut config = Self::parse(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> Result<Self, AppError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.pool.address == self.pool.underlyer {
            return Err(AppError::ConfigError(
                "pool.address and pool.underlyer must differ".to_string(),
            ));
        }
        KeyCodec::encode(&self.pool.label)?;

        // Precision of the pool's own feed must be known up front
        self.feed_table()?.precision(&self.pool.label)?;

        if self.oracle.snapshot.is_none() && self.oracle.registry.is_none() {
            return Err(AppError::ConfigError(
                "oracle needs either a snapshot or a registry address".to_string(),
            ));
        }

        if let Some(scenario) = &self.scenario {
            if scenario.depositor == self.pool.address {
                return Err(AppError::ConfigError(
                    "scenario.depositor cannot be the pool itself".to_string(),
                ));
            }
            scenario.faucet_amount()?;
            scenario.deposit_amounts()?;
        }

        Ok(())
    }

    /// Standard feeds plus the `[[feeds]]` entries.
    pub fn feed_table(&self) -> Result<FeedTable, AppError> {
        let mut table = FeedTable::standard();
        for feed in &self.feeds {
            table.register(&feed.label, feed.decimals)?;
        }
        table.validate()?;
        Ok(table)
    }

    pub fn metadata(&self) -> PoolMetadata {
        let defaults = PoolMetadata::default();
        PoolMetadata {
            name: self.pool.name.clone().unwrap_or(defaults.name),
            symbol: self.pool.symbol.clone().unwrap_or(defaults.symbol),
            decimals: defaults.decimals,
        }
    }

    /// Override the snapshot with a path relative to the working directory.
    pub fn with_snapshot(mut self, path: PathBuf) -> Self {
        self.oracle.snapshot = Some(path);
        self.base_dir = None;
        self
    }

    pub fn with_label(mut self, label: &str) -> Result<Self, AppError> {
        self.pool.label = label.to_string();
        self.validate()?;
        Ok(self)
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        let snapshot = self.oracle.snapshot.as_ref()?;
        match &self.base_dir {
            Some(dir) if snapshot.is_relative() => Some(dir.join(snapshot)),
            _ => Some(snapshot.clone()),
        }
    }
}

fn parse_amount(field: &str, value: &str) -> Result<U256, AppError> {
    parse_units(value, AMOUNT_DECIMALS).map_err(|e| AppError::ConfigError(format!("{}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::utils::generate_id;

    const BASE: &str = r#"
[pool]
address = "0x00000000000000000000000000000000000000aa"
underlyer = "0x6b175474e89094c44da98b954eedeac495271d0f"
label = "DAI-BNB"

[oracle]
registry = "0x8f98d3b5c911206c1ac08b9938875620a03bcd59"
"#;

    #[test]
    fn test_minimal_config() {
        let config = Config::parse(BASE).unwrap();
        assert_eq!(config.pool.label, "DAI-BNB");
        assert_eq!(config.metadata(), PoolMetadata::default());
        assert!(config.scenario.is_none());
        assert!(config.snapshot_path().is_none());
    }

    #[test]
    fn test_scenario_and_extra_feeds() {
        let content = format!(
            r#"{}
[[feeds]]
label = "WBTC-BNB"
decimals = 8

[scenario]
depositor = "0x0000000000000000000000000000000000000001"
faucet = "50"
deposits = ["20", "30.5"]
redeem_all = true
"#,
            BASE
        );
        let config = Config::parse(&content).unwrap();

        let table = config.feed_table().unwrap();
        assert_eq!(table.precision("WBTC-BNB").unwrap().decimals, 8);

        let scenario = config.scenario.unwrap();
        assert_eq!(scenario.faucet_amount().unwrap(), parse_units("50", 18).unwrap());
        assert_eq!(scenario.deposit_amounts().unwrap()[1], parse_units("30.5", 18).unwrap());
        assert!(scenario.redeem_all);
    }

    #[test]
    fn test_pool_feed_must_have_precision() {
        let content = BASE.replace("DAI-BNB", "XYZ-BNB");
        assert!(matches!(Config::parse(&content), Err(AppError::OracleError(_))));
    }

    #[test]
    fn test_oracle_source_required() {
        let content = BASE.replace(
            "registry = \"0x8f98d3b5c911206c1ac08b9938875620a03bcd59\"",
            "",
        );
        assert!(matches!(Config::parse(&content), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_bad_scenario_amount() {
        let content = format!(
            "{}\n[scenario]\ndepositor = \"0x0000000000000000000000000000000000000001\"\nfaucet = \"fifty\"\n",
            BASE
        );
        assert!(matches!(Config::parse(&content), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_snapshot_resolves_against_config_dir() {
        let dir = std::env::temp_dir().join(generate_id());
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("Config.toml");
        let content = BASE.replace(
            "registry = \"0x8f98d3b5c911206c1ac08b9938875620a03bcd59\"",
            "snapshot = \"snapshot.json\"",
        );
        fs::write(&path, content).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.snapshot_path().unwrap(), dir.join("snapshot.json"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::parse(BASE)
            .unwrap()
            .with_snapshot(PathBuf::from("leaves.json"))
            .with_label("ETH-BNB")
            .unwrap();
        assert_eq!(config.snapshot_path().unwrap(), PathBuf::from("leaves.json"));
        assert_eq!(config.pool.label, "ETH-BNB");

        assert!(Config::parse(BASE).unwrap().with_label("NOPE-BNB").is_err());
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join(format!("{}.toml", generate_id()));
        assert!(matches!(Config::from_file(path), Err(AppError::ConfigError(_))));
    }
}
