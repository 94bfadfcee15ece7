//! Application services and use cases

use std::sync::Arc;

use alloy_primitives::{Address, B256};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::asset::AssetLedger;
use crate::domain::oracle::{OracleRegistry, PricePort, PriceValue, ValueCodec};
use crate::domain::pool::LiquidityPool;
use crate::infrastructure::ledger::MockToken;
use crate::infrastructure::registry::{InMemoryRegistry, SnapshotRegistry};
use crate::report::{PoolSnapshot, SimulationReport, StepOutcome};
use crate::shared::config::Config;
use crate::shared::errors::AppError;

pub type SharedRegistry = Arc<dyn OracleRegistry>;

/// One price read, raw and decoded.
#[derive(Debug, Clone, Serialize)]
pub struct PriceReading {
    pub label: String,
    pub key: B256,
    pub registry: Address,
    pub raw: B256,
    pub price: PriceValue,
}

/// Wires a configured pool to its oracle and runs use cases against it.
pub struct PoolService {
    config: Config,
}

impl PoolService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot registry when one is configured, otherwise an empty
    /// in-memory registry at the configured address.
    pub async fn build_registry(&self) -> Result<SharedRegistry, AppError> {
        if let Some(path) = self.config.snapshot_path() {
            let registry = SnapshotRegistry::load(&path).await?;
            return Ok(Arc::new(registry));
        }

        let address = self.config.oracle.registry.ok_or_else(|| {
            AppError::ConfigError("oracle needs either a snapshot or a registry address".to_string())
        })?;
        warn!("No oracle snapshot configured, registry {} starts empty", address);
        Ok(Arc::new(InMemoryRegistry::new(address)))
    }

    pub async fn build_pool(&self) -> Result<LiquidityPool<SharedRegistry>, AppError> {
        let registry = self.build_registry().await?;
        self.pool_with_registry(registry)
    }

    pub fn pool_with_registry<R: OracleRegistry>(&self, registry: R) -> Result<LiquidityPool<R>, AppError> {
        let codec = ValueCodec::new(self.config.feed_table()?);
        let port = PricePort::new(registry, &self.config.pool.label, codec)?;
        Ok(LiquidityPool::new(
            self.config.pool.address,
            self.config.pool.underlyer,
            self.config.metadata(),
            port,
        ))
    }

    pub async fn fetch_price(&self) -> Result<PriceReading, AppError> {
        let pool = self.build_pool().await?;
        Self::read_price(&pool).await
    }

    pub async fn read_price<R: OracleRegistry>(pool: &LiquidityPool<R>) -> Result<PriceReading, AppError> {
        let raw = pool.get_token_bnb_price().await?;
        let price = pool.current_price().await?;
        info!("{} = {} (raw {})", pool.feed_label(), price, raw);

        Ok(PriceReading {
            label: pool.feed_label().to_string(),
            key: pool.key_pair().as_b256(),
            registry: pool.price_registry(),
            raw,
            price,
        })
    }

    /// Run the configured deposit/redeem scenario against a fresh mock asset.
    pub async fn simulate(&self) -> Result<SimulationReport, AppError> {
        let mut pool = self.build_pool().await?;
        self.run_scenario(&mut pool).await
    }

    pub async fn run_scenario<R: OracleRegistry>(&self, pool: &mut LiquidityPool<R>) -> Result<SimulationReport, AppError> {
        let scenario = self
            .config
            .scenario
            .as_ref()
            .ok_or_else(|| AppError::ConfigError("no [scenario] section in config".to_string()))?;
        let depositor = scenario.depositor;

        let mut asset = MockToken::new(pool.underlyer(), "UND");
        let mut report = SimulationReport::new(
            pool.address(),
            pool.metadata().symbol.clone(),
            pool.underlyer(),
            pool.price_registry(),
            pool.key_pair().as_b256(),
            pool.feed_label().to_string(),
        );

        let faucet = scenario.faucet_amount()?;
        if asset.faucet(depositor, faucet) {
            report.push_step(StepOutcome::ok("faucet", faucet, asset.balance_of(depositor)));
        } else {
            report.push_step(StepOutcome::failed("faucet", faucet, "mint overflow"));
        }

        for amount in scenario.deposit_amounts()? {
            asset.approve(depositor, pool.address(), amount);
            match pool.add_liquidity(&mut asset, depositor, amount) {
                Ok(minted) => report.push_step(StepOutcome::ok("deposit", amount, minted)),
                Err(e) => {
                    warn!("Scenario deposit of {} failed: {}", amount, e);
                    report.push_step(StepOutcome::failed("deposit", amount, e));
                }
            }
        }

        if scenario.redeem_all {
            let held = pool.balance_of(depositor);
            if held.is_zero() {
                info!("Scenario: {} holds no shares, nothing to redeem", depositor);
            } else {
                match pool.redeem(&mut asset, depositor, held) {
                    Ok(payout) => report.push_step(StepOutcome::ok("redeem", held, payout)),
                    Err(e) => {
                        warn!("Scenario redeem of {} failed: {}", held, e);
                        report.push_step(StepOutcome::failed("redeem", held, e));
                    }
                }
            }
        }

        report.events = pool.events().to_vec();
        report.final_state = PoolSnapshot {
            total_supply: pool.total_supply(),
            pool_balance: asset.balance_of(pool.address()),
            depositor_shares: pool.balance_of(depositor),
            depositor_balance: asset.balance_of(depositor),
        };

        let report = match pool.get_token_bnb_price().await {
            Ok(raw) => match pool.current_price().await {
                Ok(price) => report.with_price(raw, Some(price)),
                Err(e) => report.with_price(raw, None).with_price_error(e),
            },
            Err(e) => report.with_price_error(e),
        };

        info!(
            "Scenario {} finished: {} steps, {} failed",
            report.run_id,
            report.steps.len(),
            report.failed_steps()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::oracle::KeyCodec;
    use crate::shared::errors::OracleError;
    use crate::shared::utils::{generate_id, parse_units};
    use alloy_primitives::U256;
    use std::fs;

    const DAI_BNB_LEAF: &str = "0x000000000000000000000000000000000000000000000000000bb9551fc24000";

    fn config(oracle: &str, scenario: &str) -> Config {
        let content = format!(
            r#"
[pool]
address = "0x00000000000000000000000000000000000000aa"
underlyer = "0x6b175474e89094c44da98b954eedeac495271d0f"
label = "DAI-BNB"
symbol = "dDAI"

[oracle]
{}

[scenario]
depositor = "0x0000000000000000000000000000000000000001"
{}
"#,
            oracle, scenario
        );
        Config::parse(&content).unwrap()
    }

    fn in_memory() -> &'static str {
        "registry = \"0x8f98d3b5c911206c1ac08b9938875620a03bcd59\""
    }

    #[tokio::test]
    async fn test_deposit_then_redeem_everything() {
        let service = PoolService::new(config(
            in_memory(),
            "faucet = \"50\"\ndeposits = [\"50\"]\nredeem_all = true",
        ));

        let report = service.simulate().await.unwrap();

        let fifty = parse_units("50", 18).unwrap();
        assert_eq!(report.failed_steps(), 0);
        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.steps[1].result, Some(fifty));
        assert_eq!(report.steps[2].result, Some(fifty));
        assert_eq!(report.final_state.total_supply, U256::ZERO);
        assert_eq!(report.final_state.pool_balance, U256::ZERO);
        assert_eq!(report.final_state.depositor_shares, U256::ZERO);
        assert_eq!(report.final_state.depositor_balance, fifty);
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.symbol, "dDAI");
        assert_eq!(KeyCodec::encode("DAI-BNB").unwrap().as_b256(), report.key_pair);
        // Empty in-memory registry has no leaf to report
        assert!(report.price_error.is_some());
    }

    #[tokio::test]
    async fn test_failed_deposit_is_reported() {
        let service = PoolService::new(config(
            in_memory(),
            "faucet = \"10\"\ndeposits = [\"5\", \"20\"]",
        ));

        let report = service.simulate().await.unwrap();

        assert_eq!(report.failed_steps(), 1);
        assert!(report.steps[2].error.is_some());
        assert_eq!(report.final_state.total_supply, parse_units("5", 18).unwrap());
        assert_eq!(report.final_state.depositor_balance, parse_units("5", 18).unwrap());
    }

    #[tokio::test]
    async fn test_price_from_snapshot() {
        let dir = std::env::temp_dir().join(generate_id());
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("snapshot.json"),
            format!(
                r#"{{"registry": "0x8f98d3b5c911206c1ac08b9938875620a03bcd59", "leaves": {{"DAI-BNB": "{}"}}}}"#,
                DAI_BNB_LEAF
            ),
        )
        .unwrap();
        let config_path = dir.join("Config.toml");
        fs::write(
            &config_path,
            r#"
[pool]
address = "0x00000000000000000000000000000000000000aa"
underlyer = "0x6b175474e89094c44da98b954eedeac495271d0f"
label = "DAI-BNB"

[oracle]
snapshot = "snapshot.json"
"#,
        )
        .unwrap();

        let service = PoolService::new(Config::from_file(&config_path).unwrap());
        let reading = service.fetch_price().await.unwrap();

        assert_eq!(reading.label, "DAI-BNB");
        assert_eq!(reading.raw, DAI_BNB_LEAF.parse::<B256>().unwrap());
        assert_eq!(reading.price.to_string(), "0.0033");
        assert_eq!(reading.registry, "0x8f98d3b5c911206c1ac08b9938875620a03bcd59".parse::<Address>().unwrap());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_price_with_seeded_registry() {
        let service = PoolService::new(config(in_memory(), "faucet = \"1\""));
        let registry = Arc::new(InMemoryRegistry::new(Address::repeat_byte(0x0e)));
        registry
            .set_label("DAI-BNB", DAI_BNB_LEAF.parse().unwrap())
            .await
            .unwrap();

        let pool = service.pool_with_registry(Arc::clone(&registry)).unwrap();
        let reading = PoolService::read_price(&pool).await.unwrap();
        assert_eq!(reading.price.to_string(), "0.0033");

        let empty = service.pool_with_registry(InMemoryRegistry::new(Address::ZERO)).unwrap();
        assert!(matches!(
            PoolService::read_price(&empty).await,
            Err(AppError::OracleError(OracleError::RegistryUnavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_missing_scenario() {
        let content = r#"
[pool]
address = "0x00000000000000000000000000000000000000aa"
underlyer = "0x6b175474e89094c44da98b954eedeac495271d0f"
label = "DAI-BNB"

[oracle]
registry = "0x8f98d3b5c911206c1ac08b9938875620a03bcd59"
"#;
        let service = PoolService::new(Config::parse(content).unwrap());
        assert!(matches!(service.simulate().await, Err(AppError::ConfigError(_))));
    }
}
