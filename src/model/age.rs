use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Tolerance on the population shares summing to one.
pub const SHARE_SUM_TOLERANCE: f64 = 1e-9;

/// Age bands used by the fatality and population tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "0-29")]
    Age0To29,
    #[serde(rename = "30-59")]
    Age30To59,
    #[serde(rename = "60-89")]
    Age60To89,
    #[serde(rename = "89+")]
    Age89Plus,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Age0To29,
        AgeGroup::Age30To59,
        AgeGroup::Age60To89,
        AgeGroup::Age89Plus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Age0To29 => "0-29",
            AgeGroup::Age30To59 => "30-59",
            AgeGroup::Age60To89 => "60-89",
            AgeGroup::Age89Plus => "89+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeGroup {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|g| g.label() == s.trim())
            .ok_or_else(|| SimError::config(format!("unknown age group '{s}'")))
    }
}

/// Case-fatality rate and population share per age group.
///
/// Both tables are checked when the profile is built: identical key sets,
/// values in [0, 1], shares summing to 1. A constructed profile always
/// yields a well-defined `alpha`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAgeProfile", into = "RawAgeProfile")]
pub struct AgeProfile {
    fatality_rate: BTreeMap<AgeGroup, f64>,
    population_share: BTreeMap<AgeGroup, f64>,
}

#[derive(Serialize, Deserialize)]
struct RawAgeProfile {
    fatality_rate: BTreeMap<AgeGroup, f64>,
    population_share: BTreeMap<AgeGroup, f64>,
}

impl TryFrom<RawAgeProfile> for AgeProfile {
    type Error = SimError;

    fn try_from(raw: RawAgeProfile) -> Result<Self, Self::Error> {
        AgeProfile::new(raw.fatality_rate, raw.population_share)
    }
}

impl From<AgeProfile> for RawAgeProfile {
    fn from(p: AgeProfile) -> Self {
        RawAgeProfile { fatality_rate: p.fatality_rate, population_share: p.population_share }
    }
}

impl AgeProfile {
    pub fn new(
        fatality_rate: BTreeMap<AgeGroup, f64>,
        population_share: BTreeMap<AgeGroup, f64>,
    ) -> SimResult<Self> {
        if fatality_rate.is_empty() {
            return Err(SimError::config("age profile has no age groups"));
        }
        if !fatality_rate.keys().eq(population_share.keys()) {
            let missing_share: Vec<_> =
                fatality_rate.keys().filter(|g| !population_share.contains_key(g)).map(|g| g.label()).collect();
            let missing_rate: Vec<_> =
                population_share.keys().filter(|g| !fatality_rate.contains_key(g)).map(|g| g.label()).collect();
            return Err(SimError::config(format!(
                "age tables disagree on groups (no share for {missing_share:?}, no fatality rate for {missing_rate:?})"
            )));
        }

        for (table, values) in [("fatality_rate", &fatality_rate), ("population_share", &population_share)] {
            for (group, v) in values {
                if !(v.is_finite() && (0.0..=1.0).contains(v)) {
                    return Err(SimError::config(format!("{table}[{group}] = {v} is outside [0, 1]")));
                }
            }
        }

        let share_sum: f64 = population_share.values().sum();
        if (share_sum - 1.0).abs() > SHARE_SUM_TOLERANCE {
            return Err(SimError::config(format!("population shares sum to {share_sum}, expected 1")));
        }

        Ok(Self { fatality_rate, population_share })
    }

    /// Swedish case-fatality by age (dead / confirmed) and age distribution.
    pub fn sweden() -> SimResult<Self> {
        let fatality_rate = BTreeMap::from([
            (AgeGroup::Age0To29, 0.00001),
            (AgeGroup::Age30To59, 0.0001),
            (AgeGroup::Age60To89, 0.08),
            (AgeGroup::Age89Plus, 0.305),
        ]);
        let population_share = BTreeMap::from([
            (AgeGroup::Age0To29, 0.36),
            (AgeGroup::Age30To59, 0.385),
            (AgeGroup::Age60To89, 0.245),
            (AgeGroup::Age89Plus, 0.01),
        ]);
        Self::new(fatality_rate, population_share)
    }

    /// Population-weighted case-fatality proportion.
    pub fn alpha(&self) -> f64 {
        self.fatality_rate
            .iter()
            .map(|(g, rate)| rate * self.population_share[g])
            .sum()
    }

    pub fn fatality_rate(&self) -> &BTreeMap<AgeGroup, f64> {
        &self.fatality_rate
    }

    pub fn population_share(&self) -> &BTreeMap<AgeGroup, f64> {
        &self.population_share
    }
}
