use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::insights::DEFAULT_LOW_SATISFACTION_THRESHOLD;
use crate::models::{parse_amount, parse_goal_amount, MAX_LEVEL, MIN_LEVEL};

pub(crate) const ENV_DB: &str = "WORTHIT_DB";
pub(crate) const ENV_THRESHOLD: &str = "WORTHIT_THRESHOLD";
pub(crate) const ENV_GOAL: &str = "WORTHIT_GOAL";
pub(crate) const ENV_SAVING: &str = "WORTHIT_SAVING";
pub(crate) const ENV_LOG: &str = "WORTHIT_LOG";

const DEFAULT_GOAL_AMOUNT: Decimal = Decimal::ONE_THOUSAND;
const DEFAULT_MONTHLY_SAVING: Decimal = Decimal::ONE_HUNDRED;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    /// Expenses rated below this are flagged.
    pub(crate) threshold: u8,
    /// Defaults for the goal simulation shown on the insights screen.
    pub(crate) goal_amount: Decimal,
    pub(crate) monthly_saving: Decimal,
    pub(crate) log_filter: Option<String>,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "worthit", "WorthIt")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        data_dir: PathBuf,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = get(ENV_DB)
            .map(|p| PathBuf::from(crate::run::shellexpand(p.trim())))
            .unwrap_or_else(|| data_dir.join("worthit.db"));

        let threshold = match get(ENV_THRESHOLD) {
            Some(raw) => parse_threshold(&raw).with_context(|| format!("Invalid {ENV_THRESHOLD}"))?,
            None => DEFAULT_LOW_SATISFACTION_THRESHOLD,
        };

        let goal_amount = match get(ENV_GOAL) {
            Some(raw) => parse_goal_amount(&raw).with_context(|| format!("Invalid {ENV_GOAL}"))?,
            None => DEFAULT_GOAL_AMOUNT,
        };

        let monthly_saving = match get(ENV_SAVING) {
            Some(raw) => parse_amount(&raw).with_context(|| format!("Invalid {ENV_SAVING}"))?,
            None => DEFAULT_MONTHLY_SAVING,
        };

        Ok(Self {
            data_dir,
            db_path,
            threshold,
            goal_amount,
            monthly_saving,
            log_filter: get(ENV_LOG),
        })
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join("worthit.log")
    }
}

/// A threshold of `MAX_LEVEL + 1` flags every rated expense; anything above
/// that is meaningless.
pub(crate) fn parse_threshold(raw: &str) -> Result<u8> {
    let value: u8 = raw
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a whole number", raw.trim()))?;
    if !(MIN_LEVEL..=MAX_LEVEL + 1).contains(&value) {
        anyhow::bail!(
            "threshold must be between {MIN_LEVEL} and {}, got {value}",
            MAX_LEVEL + 1
        );
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(PathBuf::from("/tmp/worthit"), |k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/worthit/worthit.db"));
        assert_eq!(config.threshold, 5);
        assert_eq!(config.goal_amount, dec!(1000));
        assert_eq!(config.monthly_saving, dec!(100));
        assert!(config.log_filter.is_none());
        assert_eq!(config.log_path(), PathBuf::from("/tmp/worthit/worthit.log"));
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            (ENV_DB, "/data/money.db"),
            (ENV_THRESHOLD, "7"),
            (ENV_GOAL, "1200"),
            (ENV_SAVING, "150.50"),
            (ENV_LOG, "debug"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/money.db"));
        assert_eq!(config.threshold, 7);
        assert_eq!(config.goal_amount, dec!(1200));
        assert_eq!(config.monthly_saving, dec!(150.50));
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_with(&[(ENV_THRESHOLD, "  "), (ENV_LOG, "")]).unwrap();
        assert_eq!(config.threshold, 5);
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config_with(&[(ENV_THRESHOLD, "0")]).is_err());
        assert!(config_with(&[(ENV_THRESHOLD, "12")]).is_err());
        assert!(config_with(&[(ENV_THRESHOLD, "five")]).is_err());
        assert!(config_with(&[(ENV_GOAL, "-10")]).is_err());
        assert!(config_with(&[(ENV_SAVING, "lots")]).is_err());
    }

    #[test]
    fn test_parse_threshold_bounds() {
        assert_eq!(parse_threshold("1").unwrap(), 1);
        assert_eq!(parse_threshold(" 11 ").unwrap(), 11);
        assert!(parse_threshold("-1").is_err());
    }
}
