use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::allocator::{SolveOptions, SolverLimits, TableStrategy};
use crate::core::interrupt::Interrupt;
use crate::core::sweep::DEFAULT_MAX_SWEEP_POINTS;
use crate::error::{PlanError, Result};

/// Project-level config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "siteplan.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SITEPLAN_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?
                .ok_or_else(|| PlanError::Config(format!("config {} not found", path.display())))?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_dir.join(PROJECT_CONFIG_FILE))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Path of the per-user config file, if the platform has a config dir.
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("siteplan/config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| PlanError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| PlanError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.solver {
            self.solver.merge(patch);
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("SITEPLAN_SOLVER_STRATEGY") {
            self.solver.strategy = TableStrategy::from_str(&value)
                .map_err(|err| PlanError::Config(format!("invalid SITEPLAN_SOLVER_STRATEGY: {err}")))?;
        }
        if let Some(value) = parse_env::<u64>(&lookup, "SITEPLAN_SOLVER_MAX_TABLE_CELLS")? {
            self.solver.max_table_cells = value;
        }
        if let Some(value) = parse_env::<u64>(&lookup, "SITEPLAN_SOLVER_FULL_TABLE_MAX_CELLS")? {
            self.solver.full_table_max_cells = value;
        }
        if let Some(value) = parse_env::<u64>(&lookup, "SITEPLAN_SOLVER_MAX_TABLE_BYTES")? {
            self.solver.max_table_bytes = value;
        }
        if let Some(value) = parse_env::<u64>(&lookup, "SITEPLAN_SOLVER_MAX_SWEEP_POINTS")? {
            self.solver.max_sweep_points = value;
        }
        if let Some(value) = lookup("SITEPLAN_SOLVER_TIMEOUT") {
            self.solver.timeout = Some(parse_duration(&value).map_err(|err| {
                PlanError::Config(format!("invalid SITEPLAN_SOLVER_TIMEOUT value {value}: {err}"))
            })?);
        }
        if let Some(value) = parse_env::<f64>(&lookup, "SITEPLAN_SOLVER_COST_UNIT")? {
            self.solver.cost_unit = value;
        }
        if let Some(value) = lookup("SITEPLAN_OUTPUT_FORMAT") {
            self.output.format = value;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !self.solver.cost_unit.is_finite() || self.solver.cost_unit <= 0.0 {
            return Err(PlanError::Config(format!(
                "solver.cost_unit must be positive, got {}",
                self.solver.cost_unit
            )));
        }
        for (key, value) in [
            ("solver.max_table_cells", self.solver.max_table_cells),
            ("solver.max_table_bytes", self.solver.max_table_bytes),
            ("solver.max_sweep_points", self.solver.max_sweep_points),
        ] {
            if value == 0 {
                return Err(PlanError::Config(format!("{key} must be positive")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub strategy: TableStrategy,
    #[serde(default)]
    pub max_table_cells: u64,
    #[serde(default)]
    pub full_table_max_cells: u64,
    #[serde(default)]
    pub max_table_bytes: u64,
    #[serde(default)]
    pub max_sweep_points: u64,
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    #[serde(default)]
    pub cost_unit: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let limits = SolverLimits::default();
        Self {
            strategy: TableStrategy::Auto,
            max_table_cells: limits.max_table_cells,
            full_table_max_cells: limits.full_table_max_cells,
            max_table_bytes: limits.max_table_bytes,
            max_sweep_points: DEFAULT_MAX_SWEEP_POINTS,
            timeout: None,
            cost_unit: 1.0,
        }
    }
}

impl SolverConfig {
    fn merge(&mut self, patch: SolverPatch) {
        if let Some(value) = patch.strategy {
            self.strategy = value;
        }
        if let Some(value) = patch.max_table_cells {
            self.max_table_cells = value;
        }
        if let Some(value) = patch.full_table_max_cells {
            self.full_table_max_cells = value;
        }
        if let Some(value) = patch.max_table_bytes {
            self.max_table_bytes = value;
        }
        if let Some(value) = patch.max_sweep_points {
            self.max_sweep_points = value;
        }
        if let Some(value) = patch.timeout {
            self.timeout = Some(value);
        }
        if let Some(value) = patch.cost_unit {
            self.cost_unit = value;
        }
    }

    #[must_use]
    pub const fn limits(&self) -> SolverLimits {
        SolverLimits {
            max_table_cells: self.max_table_cells,
            full_table_max_cells: self.full_table_max_cells,
            max_table_bytes: self.max_table_bytes,
        }
    }

    /// Allocator options, with the timeout armed from now.
    #[must_use]
    pub fn solve_options(&self) -> SolveOptions {
        let interrupt = self
            .timeout
            .map_or_else(Interrupt::none, |timeout| Interrupt::none().with_timeout(timeout));
        SolveOptions {
            strategy: self.strategy,
            limits: self.limits(),
            interrupt,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format when no flag picks one.
    #[serde(default)]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
        }
    }
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub solver: Option<SolverPatch>,
    pub output: Option<OutputPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SolverPatch {
    pub strategy: Option<TableStrategy>,
    pub max_table_cells: Option<u64>,
    pub full_table_max_cells: Option<u64>,
    pub max_table_bytes: Option<u64>,
    pub max_sweep_points: Option<u64>,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    pub cost_unit: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputPatch {
    pub format: Option<String>,
}

/// Parse a human duration such as `500ms`, `5s` or `2m`.
pub fn parse_duration(raw: &str) -> std::result::Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(raw.trim()).map_err(|err| err.to_string())
}

fn parse_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|err| {
            PlanError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        None => Ok(None),
    }
}
