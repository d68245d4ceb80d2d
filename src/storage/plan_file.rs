//! Plan files: the candidate table and budget on disk.
//!
//! ```toml
//! budget = 300
//!
//! [[site]]
//! name = "Dokki"
//! population = 500000
//! cost = 100
//! ```
//!
//! The same shape is accepted as JSON or YAML, chosen by file extension.
//! Costs and the budget may be real numbers; they are quantized with the
//! cost unit when the plan is resolved.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::candidate::{Candidate, CandidateSet, SAMPLE_BUDGET, slugify};
use crate::core::quantize::{quantize, quantize_budget, whole_population};
use crate::error::{PlanError, Result};

/// On-disk encoding of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Toml,
    Json,
    Yaml,
}

impl PlanFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(PlanError::PlanFile(format!(
                "{}: unsupported extension (use .toml, .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }
}

/// A number as written in the plan, before quantization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Int(i64),
    Real(f64),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Ok(value) = raw.parse::<i64>() {
            return Ok(Self::Int(value));
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self::Real(value)),
            _ => Err(format!("not a number: {raw}")),
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(
            |_| {
                #[allow(clippy::cast_precision_loss)]
                let real = value as f64;
                Self::Real(real)
            },
            Self::Int,
        )
    }
}

impl Amount {
    #[must_use]
    pub const fn is_real(self) -> bool {
        matches!(self, Self::Real(_))
    }

    #[allow(clippy::float_cmp, clippy::cast_precision_loss)]
    fn cost_units(self, field: &str, unit: f64) -> Result<u64> {
        match self {
            Self::Int(v) if unit == 1.0 => u64::try_from(v).map_err(|_| {
                PlanError::InvalidInput(format!("{field} must be non-negative, got {v}"))
            }),
            Self::Int(v) => quantize(v as f64, unit),
            Self::Real(v) => quantize(v, unit),
        }
    }

    #[allow(clippy::float_cmp, clippy::cast_precision_loss)]
    fn budget_units(self, unit: f64) -> Result<u64> {
        match self {
            Self::Int(v) if unit == 1.0 => u64::try_from(v).map_err(|_| {
                PlanError::InvalidInput(format!("budget must be non-negative, got {v}"))
            }),
            Self::Int(v) => quantize_budget(v as f64, unit),
            Self::Real(v) => quantize_budget(v, unit),
        }
    }

    fn population(self, site: &str) -> Result<u64> {
        match self {
            Self::Int(v) => u64::try_from(v).map_err(|_| {
                PlanError::InvalidInput(format!(
                    "population of '{site}' must be non-negative, got {v}"
                ))
            }),
            Self::Real(v) => whole_population(v),
        }
    }
}

/// One `[[site]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub population: Amount,
    pub cost: Amount,
}

impl From<&Candidate> for SiteEntry {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: (candidate.id != slugify(&candidate.name)).then(|| candidate.id.clone()),
            name: candidate.name.clone(),
            population: Amount::from(candidate.population),
            cost: Amount::from(candidate.cost),
        }
    }
}

/// A plan exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    pub budget: Amount,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteEntry>,
}

/// A plan in solver units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub budget: u64,
    pub candidates: CandidateSet,
}

impl PlanFile {
    /// The built-in Cairo sample.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            budget: Amount::from(SAMPLE_BUDGET),
            sites: CandidateSet::sample().iter().map(SiteEntry::from).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PlanError::PlanNotFound(path.display().to_string()));
        }
        let format = PlanFormat::from_path(path)?;
        let raw = std::fs::read_to_string(path)?;
        let plan = Self::parse(&raw, format)
            .map_err(|err| PlanError::PlanFile(format!("parse {}: {err}", path.display())))?;
        debug!(path = %path.display(), sites = plan.sites.len(), "loaded plan");
        Ok(plan)
    }

    /// Parse plan text; the error is the underlying parser message.
    pub fn parse(raw: &str, format: PlanFormat) -> std::result::Result<Self, String> {
        match format {
            PlanFormat::Toml => toml::from_str(raw).map_err(|err| err.to_string()),
            PlanFormat::Json => serde_json::from_str(raw).map_err(|err| err.to_string()),
            PlanFormat::Yaml => serde_yaml::from_str(raw).map_err(|err| err.to_string()),
        }
    }

    pub fn render(&self, format: PlanFormat) -> Result<String> {
        Ok(match format {
            PlanFormat::Toml => toml::to_string_pretty(self)?,
            PlanFormat::Json => serde_json::to_string_pretty(self)?,
            PlanFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let format = PlanFormat::from_path(path)?;
        let payload = self.render(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, payload)?;
        debug!(path = %path.display(), sites = self.sites.len(), "saved plan");
        Ok(())
    }

    /// Whether any cost or the budget is written as a real number.
    #[must_use]
    pub fn has_real_amounts(&self) -> bool {
        self.budget.is_real() || self.sites.iter().any(|site| site.cost.is_real())
    }

    /// Convert to solver units, quantizing costs and budget with `cost_unit`.
    pub fn resolve(&self, cost_unit: f64) -> Result<Plan> {
        let budget = self.budget.budget_units(cost_unit)?;
        let candidates = self
            .sites
            .iter()
            .map(|site| {
                let population = site.population.population(&site.name)?;
                let cost = site.cost.cost_units("cost", cost_unit)?;
                let candidate = Candidate::new(site.name.clone(), population, cost);
                Ok(match &site.id {
                    Some(id) => candidate.with_id(id.clone()),
                    None => candidate,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Plan {
            budget,
            candidates: CandidateSet::from_candidates(candidates)?,
        })
    }

    /// Validate `candidate` against the current sites and append it.
    pub fn add_site(&mut self, candidate: &Candidate) -> Result<usize> {
        let mut resolved = self.resolve(1.0).map_or_else(
            |_| self.ids_only(),
            |plan| Ok(plan.candidates),
        )?;
        let index = resolved.add(candidate.clone())?;
        self.sites.push(SiteEntry::from(candidate));
        Ok(index)
    }

    /// Drop the site with `id` and return its entry.
    pub fn remove_site(&mut self, id: &str) -> Result<SiteEntry> {
        let index = self
            .ids_only()?
            .find(id)
            .ok_or_else(|| PlanError::CandidateNotFound(id.to_string()))?;
        Ok(self.sites.remove(index))
    }

    // Real-valued plans cannot resolve at unit 1; duplicate checks only
    // need ids.
    fn ids_only(&self) -> Result<CandidateSet> {
        let candidates = self
            .sites
            .iter()
            .map(|site| {
                let candidate = Candidate::new(site.name.clone(), 0, 0);
                match &site.id {
                    Some(id) => candidate.with_id(id.clone()),
                    None => candidate,
                }
            })
            .collect();
        CandidateSet::from_candidates(candidates)
    }
}
