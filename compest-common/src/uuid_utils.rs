//! Estimate identifier utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new estimate identifier in its stored string form
pub fn new_estimate_id() -> String {
    generate().to_string()
}
