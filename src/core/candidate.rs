//! Candidate sites and the caller-owned candidate table.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Budget that accompanies [`CandidateSet::sample`].
pub const SAMPLE_BUDGET: u64 = 300;

/// A site eligible for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable identifier. Derived from the name when not given explicitly.
    pub id: String,
    /// Display name of the area.
    pub name: String,
    /// Population served if the site is selected.
    pub population: u64,
    /// Deployment cost in budget units.
    pub cost: u64,
}

impl Candidate {
    pub fn new(name: impl Into<String>, population: u64, cost: u64) -> Self {
        let name = name.into();
        Self {
            id: slugify(&name),
            name,
            population,
            cost,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Ordered list of candidates.
///
/// Position in the list is the index the allocator reports, so insertion
/// order is preserved by every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    /// Build a set from already-entered data, rejecting duplicate ids.
    ///
    /// Zero populations and costs are accepted here; only interactive
    /// entry through [`CandidateSet::add`] refuses them.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Result<Self> {
        let mut seen = HashSet::new();
        for candidate in &candidates {
            if candidate.id.trim().is_empty() {
                return Err(PlanError::CandidateRejected(format!(
                    "site '{}' has an empty id",
                    candidate.name
                )));
            }
            if !seen.insert(candidate.id.as_str()) {
                return Err(PlanError::CandidateRejected(format!(
                    "duplicate site id '{}'",
                    candidate.id
                )));
            }
        }
        Ok(Self { candidates })
    }

    /// The five Cairo areas the planner ships with.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            candidates: vec![
                Candidate::new("Dokki", 500_000, 100),
                Candidate::new("New Cairo", 700_000, 150),
                Candidate::new("New Giza", 300_000, 70),
                Candidate::new("Administrative Capital", 800_000, 200),
                Candidate::new("Obour", 400_000, 90),
            ],
        }
    }

    /// Append a new area and return its index.
    pub fn add(&mut self, candidate: Candidate) -> Result<usize> {
        if candidate.name.trim().is_empty() {
            return Err(PlanError::CandidateRejected(
                "area name must not be empty".to_string(),
            ));
        }
        if candidate.population == 0 {
            return Err(PlanError::CandidateRejected(format!(
                "area '{}' needs a positive population",
                candidate.name
            )));
        }
        if candidate.cost == 0 {
            return Err(PlanError::CandidateRejected(format!(
                "area '{}' needs a positive cost",
                candidate.name
            )));
        }
        if candidate.id.trim().is_empty() {
            return Err(PlanError::CandidateRejected(format!(
                "area '{}' has an empty id",
                candidate.name
            )));
        }
        if self.find(&candidate.id).is_some() {
            return Err(PlanError::CandidateRejected(format!(
                "duplicate site id '{}'",
                candidate.id
            )));
        }

        self.candidates.push(candidate);
        Ok(self.candidates.len() - 1)
    }

    /// Remove a candidate by id. Later candidates shift down one index.
    pub fn remove(&mut self, id: &str) -> Result<Candidate> {
        let index = self
            .find(id)
            .ok_or_else(|| PlanError::CandidateNotFound(id.to_string()))?;
        Ok(self.candidates.remove(index))
    }

    /// Index of the candidate with the given id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<usize> {
        self.candidates.iter().position(|c| c.id == id)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    #[must_use]
    pub fn populations(&self) -> Vec<u64> {
        self.candidates.iter().map(|c| c.population).collect()
    }

    #[must_use]
    pub fn costs(&self) -> Vec<u64> {
        self.candidates.iter().map(|c| c.cost).collect()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Lowercase, dash-separated id derived from a display name.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
