//! Identifier, seed, and timestamp generation for scene elements.

use rand::RngExt;
use rand::distr::Alphanumeric;

/// Length of generated element identifiers.
const ID_LENGTH: usize = 20;

/// Generate a fresh element identifier.
///
/// Ids are excalidraw-style 20-character alphanumerics. They only need to be
/// unique within a single scene, so a non-cryptographic PRNG is sufficient.
#[must_use]
pub fn element_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Random seed for an element's hand-drawn rendering style.
#[must_use]
pub fn random_seed() -> u32 {
    rand::rng().random()
}

/// Current time in milliseconds since the unix epoch.
#[must_use]
pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
