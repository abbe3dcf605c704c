//! Deterministic cat generation from a text seed.
//!
//! The seed is hashed with SHA-256 and the first eight bytes seed a
//! `ChaCha8Rng`, so the same seed always yields the same personality,
//! appearance, name and spawn point.

use crate::error::Result;
use crate::personality::BoundariesLogic;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;
use whiskers_data::{
    Appearance, Boundaries, CatDefinition, CoatPattern, Dimensions, Personality, Position,
};

const SYLLABLES: [&str; 16] = [
    "mi", "lo", "whis", "ker", "pa", "tch", "bi", "scuit", "mo", "chi", "nu", "tmeg", "pe",
    "bble", "zi", "ggy",
];

const PATTERNS: [CoatPattern; 5] = [
    CoatPattern::Solid,
    CoatPattern::Tabby,
    CoatPattern::Tuxedo,
    CoatPattern::Calico,
    CoatPattern::Spotted,
];

/// Base coat colours, jittered per cat.
const COATS: [(u8, u8, u8); 6] = [
    (230, 150, 70),
    (60, 60, 60),
    (240, 235, 225),
    (150, 110, 80),
    (170, 170, 180),
    (210, 180, 140),
];

/// Result of expanding a seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SeededCat {
    pub definition: CatDefinition,
    pub position: Position,
    /// Seed for the cat's own decision RNG.
    pub rng_seed: u64,
}

pub fn hash_seed(seed: &str) -> u64 {
    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

pub fn rng_from_seed(seed: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(hash_seed(seed))
}

/// Expands `seed` into a full definition placed inside `boundaries`.
/// Every call gets a fresh id; everything else depends only on the seed.
pub fn cat_from_seed(seed: &str, boundaries: &Boundaries) -> Result<SeededCat> {
    boundaries.validate()?;
    let mut rng = rng_from_seed(seed);
    let personality = random_personality(&mut rng);
    let appearance = random_appearance(&mut rng);
    let name = random_name(&mut rng);
    let position = random_position(&mut rng, boundaries);
    let rng_seed = rng.gen();

    Ok(SeededCat {
        definition: CatDefinition {
            id: Uuid::new_v4(),
            name,
            seed: Some(seed.to_string()),
            personality,
            appearance,
            dimensions: Dimensions {
                width: 64.0 * appearance.size,
                height: 64.0 * appearance.size,
            },
        },
        position,
        rng_seed,
    })
}

pub fn random_personality(rng: &mut impl Rng) -> Personality {
    Personality {
        curiosity: rng.gen_range(0.0..=1.0),
        energy: rng.gen_range(0.0..=1.0),
        independence: rng.gen_range(0.0..=1.0),
        sociability: rng.gen_range(0.0..=1.0),
        rest_bias: rng.gen_range(0.0..=1.0),
    }
}

pub fn random_appearance(rng: &mut impl Rng) -> Appearance {
    let (r, g, b) = COATS[rng.gen_range(0..COATS.len())];
    Appearance {
        r: jitter(r, rng),
        g: jitter(g, rng),
        b: jitter(b, rng),
        pattern: PATTERNS[rng.gen_range(0..PATTERNS.len())],
        size: rng.gen_range(0.8..=1.2),
    }
}

fn jitter(channel: u8, rng: &mut impl Rng) -> u8 {
    (channel as i16 + rng.gen_range(-20i16..=20)).clamp(0, 255) as u8
}

pub fn random_name(rng: &mut impl Rng) -> String {
    let count = rng.gen_range(2..=3);
    let mut name = String::new();
    for _ in 0..count {
        name.push_str(SYLLABLES[rng.gen_range(0..SYLLABLES.len())]);
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

/// Uniform point inside `boundaries`, which must already be valid.
pub fn random_position(rng: &mut impl Rng, boundaries: &Boundaries) -> Position {
    Position::new(
        rng.gen_range(boundaries.min_x..=boundaries.max_x),
        rng.gen_range(boundaries.min_y..=boundaries.max_y),
    )
}
