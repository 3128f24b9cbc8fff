//! Deterministic synthetic comp generator
//!
//! Generates 8-20 plausible comps around the subject. The RNG is seeded from
//! a SHA-256 digest of `zip-tenure-type`, so the same neighbourhood and
//! profile always produce the same draws. Subject size and condition are not
//! part of the seed, so varying them leaves the random draws unchanged.

use async_trait::async_trait;
use chrono::Duration;
use compest_common::models::{AddressSpec, Comp, PropertySpec, Tenure, MIN_SQFT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{CompQuery, CompSource};

const MIN_COMPS: usize = 8;
const MAX_COMPS: usize = 20;
const MIN_DISTANCE_KM: f64 = 0.2;
const MAX_DISTANCE_KM: f64 = 4.0;
const MAX_AGE_DAYS: u32 = 120;
const SQFT_JITTER: i64 = 100;
const BASE_PRICE: f64 = 200_000.0;
const MIN_PRICE_PER_SQFT: f64 = 100.0;
const MAX_PRICE_PER_SQFT: f64 = 400.0;
/// Monthly rent is modelled as sale price / 200
const RENT_DIVISOR: f64 = 200.0;
const SOURCE_LABEL: &str = "fake";

/// Seeded generator of synthetic comps
#[derive(Debug, Clone, Default)]
pub struct SyntheticCompSource;

impl SyntheticCompSource {
    pub fn new() -> Self {
        Self
    }

    /// Seed derived from the neighbourhood and profile
    pub fn seed_for(address: &AddressSpec, property: &PropertySpec) -> u64 {
        let key = format!(
            "{}-{}-{}",
            address.zip,
            property.tenure.as_str(),
            property.property_type.as_str()
        );
        let digest = Sha256::digest(key.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Generate the comp set synchronously
    pub fn generate(
        &self,
        address: &AddressSpec,
        property: &PropertySpec,
        query: &CompQuery,
    ) -> Vec<Comp> {
        let mut rng = StdRng::seed_from_u64(Self::seed_for(address, property));
        let count = rng.gen_range(MIN_COMPS..=MAX_COMPS);
        let max_distance = query.radius_km.min(MAX_DISTANCE_KM).max(MIN_DISTANCE_KM);
        let max_age = query.days.min(MAX_AGE_DAYS);

        (0..count)
            .map(|i| {
                let distance = round_km(rng.gen_range(MIN_DISTANCE_KM..=max_distance));
                let age_days = rng.gen_range(0..=max_age);
                let per_sqft = rng.gen_range(MIN_PRICE_PER_SQFT..MAX_PRICE_PER_SQFT);
                let jitter = rng.gen_range(-SQFT_JITTER..=SQFT_JITTER);

                let base_price = BASE_PRICE + property.sqft as f64 * per_sqft;
                let price = match property.tenure {
                    Tenure::Sale => round_to(base_price, 1000.0),
                    Tenure::Rent => round_to(base_price / RENT_DIVISOR, 10.0),
                };
                let sqft = (property.sqft as i64 + jitter).max(MIN_SQFT as i64) as u32;

                Comp {
                    id: format!("fake-{}", i),
                    address: format!(
                        "{} Example St, {}, {} {}",
                        i + 1,
                        address.city,
                        address.state,
                        address.zip
                    ),
                    distance_km: distance,
                    beds: property.beds,
                    baths: property.baths,
                    sqft,
                    price,
                    closed_or_listed_date: query.as_of - Duration::days(age_days as i64),
                    property_type: property.property_type,
                    source: SOURCE_LABEL.to_string(),
                }
            })
            .collect()
    }
}

#[async_trait]
impl CompSource for SyntheticCompSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn get_comps(
        &self,
        address: &AddressSpec,
        property: &PropertySpec,
        query: &CompQuery,
    ) -> anyhow::Result<Vec<Comp>> {
        let comps = self.generate(address, property, query);
        debug!(zip = %address.zip, count = comps.len(), "Generated synthetic comps");
        Ok(comps)
    }
}

/// Round to a whole multiple of `step` (step >= 1)
fn round_to(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Round to two decimal places
fn round_km(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
