use anyhow::{Context, Result};
use runway_core::{ForecastSettings, OneTimePolicy, UserPlan, DEFAULT_FORECAST_MONTHS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_runway_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub forecast: ForecastSection,
    #[serde(default)]
    pub display: DisplaySection,
}

/// Fallback forecast settings for plans that don't store their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSection {
    pub months: u32,
    pub include_goal_contributions: bool,
    pub conservative_mode: bool,
    pub one_time_expenses: OneTimePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySection {
    pub currency: String,
    pub decimals: usize,
}

impl Default for ForecastSection {
    fn default() -> Self {
        Self {
            months: DEFAULT_FORECAST_MONTHS,
            include_goal_contributions: true,
            conservative_mode: false,
            one_time_expenses: OneTimePolicy::Exclude,
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency: "$".to_string(),
            decimals: 2,
        }
    }
}

impl Config {
    /// Fill any forecast setting the plan leaves unset from this config.
    /// Settings stored in the plan win.
    pub fn apply_to_plan(&self, plan: &mut UserPlan) {
        let settings = plan.forecast_settings.get_or_insert_with(ForecastSettings::default);
        settings.months.get_or_insert(self.forecast.months);
        settings
            .include_goal_contributions
            .get_or_insert(self.forecast.include_goal_contributions);
        settings
            .conservative_mode
            .get_or_insert(self.forecast.conservative_mode);
        settings
            .one_time_expenses
            .get_or_insert(self.forecast.one_time_expenses);
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_runway_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config_from(&p)?;
    let source = if p.exists() { "file" } else { "defaults" };
    println!("# {} ({})", p.display(), source);
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
