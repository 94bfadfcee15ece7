// src/report.rs
use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::oracle::PriceValue;
use crate::domain::pool::PoolEvent;
use crate::shared::types::AMOUNT_DECIMALS;
use crate::shared::utils::{format_units, generate_id};

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,

    // Pool parameters
    pub pool: Address,
    pub symbol: String,
    pub underlyer: Address,
    pub price_registry: Address,
    pub key_pair: B256,
    pub label: String,

    pub steps: Vec<StepOutcome>,
    pub events: Vec<PoolEvent>,
    pub final_state: PoolSnapshot,

    // Oracle read at the end of the run
    pub raw_price: Option<B256>,
    pub price: Option<String>,
    pub price_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub action: String,
    pub amount: U256,
    pub result: Option<U256>,
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn ok(action: impl Into<String>, amount: U256, result: U256) -> Self {
        Self {
            action: action.into(),
            amount,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(action: impl Into<String>, amount: U256, error: impl ToString) -> Self {
        Self {
            action: action.into(),
            amount,
            result: None,
            error: Some(error.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PoolSnapshot {
    pub total_supply: U256,
    pub pool_balance: U256,
    pub depositor_shares: U256,
    pub depositor_balance: U256,
}

impl SimulationReport {
    pub fn new(pool: Address, symbol: String, underlyer: Address, price_registry: Address, key_pair: B256, label: String) -> Self {
        Self {
            run_id: generate_id(),
            timestamp: Utc::now(),
            pool,
            symbol,
            underlyer,
            price_registry,
            key_pair,
            label,
            steps: Vec::new(),
            events: Vec::new(),
            final_state: PoolSnapshot::default(),
            raw_price: None,
            price: None,
            price_error: None,
        }
    }

    pub fn push_step(&mut self, step: StepOutcome) {
        self.steps.push(step);
    }

    pub fn with_price(mut self, raw: B256, price: Option<PriceValue>) -> Self {
        self.raw_price = Some(raw);
        self.price = price.map(|p| p.to_string());
        self
    }

    pub fn with_price_error(mut self, error: impl ToString) -> Self {
        self.price_error = Some(error.to_string());
        self
    }

    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.succeeded()).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text rendering for the terminal.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Run {} at {}", self.run_id, self.timestamp.to_rfc3339()),
            format!("Pool {} ({}) over {}", self.pool, self.symbol, self.underlyer),
            format!("Feed {} = {} via {}", self.label, self.key_pair, self.price_registry),
        ];

        for (i, step) in self.steps.iter().enumerate() {
            let amount = format_units(step.amount, AMOUNT_DECIMALS);
            let line = match (&step.result, &step.error) {
                (Some(result), _) => format!(
                    "  {}. {} {} -> {}",
                    i + 1,
                    step.action,
                    amount,
                    format_units(*result, AMOUNT_DECIMALS)
                ),
                (None, Some(error)) => format!("  {}. {} {} failed: {}", i + 1, step.action, amount, error),
                (None, None) => format!("  {}. {} {}", i + 1, step.action, amount),
            };
            lines.push(line);
        }

        lines.push(format!(
            "Supply {} | pool balance {} | depositor shares {} | depositor balance {}",
            format_units(self.final_state.total_supply, AMOUNT_DECIMALS),
            format_units(self.final_state.pool_balance, AMOUNT_DECIMALS),
            format_units(self.final_state.depositor_shares, AMOUNT_DECIMALS),
            format_units(self.final_state.depositor_balance, AMOUNT_DECIMALS),
        ));

        match (&self.raw_price, &self.price, &self.price_error) {
            (_, _, Some(error)) => lines.push(format!("Price unavailable: {}", error)),
            (Some(raw), Some(price), None) => lines.push(format!("Price {} (raw {})", price, raw)),
            (Some(raw), None, None) => lines.push(format!("Price raw {}", raw)),
            _ => {}
        }

        lines.join("\n")
    }
}
