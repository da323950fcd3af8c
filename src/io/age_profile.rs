use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::model::age::{AgeGroup, AgeProfile};

#[derive(Debug, Deserialize)]
struct AgeRow {
    age_group: AgeGroup,
    fatality_rate: f64,
    population_share: f64,
}

/// Load an age profile from a CSV file with columns
/// `age_group,fatality_rate,population_share`.
pub fn load_age_profile_csv(path: impl AsRef<Path>) -> SimResult<AgeProfile> {
    let rdr = csv::Reader::from_path(path.as_ref())?;
    read_age_profile(rdr)
}

pub fn read_age_profile<R: std::io::Read>(mut rdr: csv::Reader<R>) -> SimResult<AgeProfile> {
    let mut rates = BTreeMap::new();
    let mut shares = BTreeMap::new();
    for result in rdr.deserialize::<AgeRow>() {
        let row = result?;
        if rates.insert(row.age_group, row.fatality_rate).is_some() {
            return Err(SimError::config(format!("age group '{}' listed twice", row.age_group)));
        }
        shares.insert(row.age_group, row.population_share);
    }
    AgeProfile::new(rates, shares)
}
