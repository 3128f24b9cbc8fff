//! Shared fixtures for compest-es integration tests

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use compest_common::models::{AddressSpec, Comp, PropertySpec, PropertyType, Tenure};

/// Fixed recency reference date used across tests
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn address() -> AddressSpec {
    AddressSpec {
        street: "100 Market St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip: "62701".to_string(),
    }
}

pub fn subject(sqft: u32, condition: u8) -> PropertySpec {
    PropertySpec {
        beds: 3,
        baths: 2.0,
        sqft,
        property_type: PropertyType::SingleFamily,
        condition,
        tenure: Tenure::Sale,
    }
}

/// Twelve single-family comps at 0.25-3.0 km, $250k-$580k, 5-115 days old
pub fn fixture_comps() -> Vec<Comp> {
    (0..12)
        .map(|i| Comp {
            id: format!("fixture-{}", i),
            address: format!("{} Fixture Ave, Springfield, IL 62701", i + 1),
            distance_km: 0.25 * (i + 1) as f64,
            beds: 3,
            baths: 2.0,
            sqft: 1200 + 50 * i,
            price: 250_000.0 + 30_000.0 * i as f64,
            closed_or_listed_date: reference_date() - Duration::days(5 + 10 * i as i64),
            property_type: PropertyType::SingleFamily,
            source: "fixture".to_string(),
        })
        .collect()
}

/// `fixture_comps` with every comp retyped
pub fn fixture_comps_of_type(property_type: PropertyType) -> Vec<Comp> {
    fixture_comps()
        .into_iter()
        .map(|c| Comp { property_type, ..c })
        .collect()
}

pub fn scenario_address() -> AddressSpec {
    AddressSpec {
        zip: "12345".to_string(),
        ..address()
    }
}

/// 1200 sqft condo in average condition, valued for sale
pub fn scenario_subject() -> PropertySpec {
    PropertySpec {
        beds: 2,
        baths: 2.0,
        sqft: 1200,
        property_type: PropertyType::Condo,
        condition: 3,
        tenure: Tenure::Sale,
    }
}

fn condo(i: usize, distance_km: f64, sqft: u32, price: f64, age_days: i64) -> Comp {
    Comp {
        id: format!("condo-{}", i),
        address: format!("{} Lake Dr, Springfield, IL 12345", i + 1),
        distance_km,
        beds: 2,
        baths: 2.0,
        sqft,
        price,
        closed_or_listed_date: reference_date() - Duration::days(age_days),
        property_type: PropertyType::Condo,
        source: "fixture".to_string(),
    }
}

/// Twelve condos at 0.2-3.0 km priced $250k-$600k; nearer comps are cheaper
pub fn scenario_comps() -> Vec<Comp> {
    const PRICES: [f64; 12] = [
        250_000.0, 285_000.0, 320_000.0, 355_000.0, 390_000.0, 425_000.0, 460_000.0, 495_000.0,
        530_000.0, 565_000.0, 585_000.0, 600_000.0,
    ];
    PRICES
        .iter()
        .enumerate()
        .map(|(i, &price)| {
            let distance = if i < 11 { 0.2 + 0.25 * i as f64 } else { 3.0 };
            condo(i, distance, 1100 + 20 * i as u32, price, 7 + 9 * i as i64)
        })
        .collect()
}

/// Twelve condos priced within a few percent of $400k
pub fn tight_comps() -> Vec<Comp> {
    (0..12)
        .map(|i| {
            let price = 390_000.0 + (i % 4) as f64 * 7_000.0 + i as f64 * 500.0;
            condo(i, 0.3 + 0.2 * i as f64, 1150 + 10 * i as u32, price, 5 + 8 * i as i64)
        })
        .collect()
}
