//! Intrinsic prime registry.
//!
//! Ten fixed `(glyph, prime, meaning, vibe)` entries in canonical order.
//! Primes are the first ten primes starting at 2. The table is a `static`
//! and never changes for the lifetime of the process.
//!
//! | Glyph | Prime | Meaning |
//! |-------|-------|---------|
//! | 🪐 | 2 | Universal anchor |
//! | 🎩 | 3 | Transformation |
//! | 🔢 | 5 | Quantity |
//! | 🎲 | 7 | Chance |
//! | 🎶 | 11 | Harmony |
//! | 🎷 | 13 | Improvisation |
//! | 📜 | 17 | Record |
//! | 🧬 | 19 | Structure |
//! | 🎯 | 23 | Intent |
//! | 🚀 | 29 | Momentum |

use serde::Serialize;

/// Number of intrinsic primes.
pub const PRIME_COUNT: usize = 10;

/// Prime used as the universal anchor.
pub const ANCHOR_PRIME: u32 = 2;

/// One registry row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrimeEntry {
    pub glyph: char,
    pub prime: u32,
    pub meaning: &'static str,
    pub vibe: &'static str,
}

static ENTRIES: [PrimeEntry; PRIME_COUNT] = [
    PrimeEntry { glyph: '🪐', prime: 2, meaning: "Universal anchor", vibe: "orbit" },
    PrimeEntry { glyph: '🎩', prime: 3, meaning: "Transformation", vibe: "magic" },
    PrimeEntry { glyph: '🔢', prime: 5, meaning: "Quantity", vibe: "logic" },
    PrimeEntry { glyph: '🎲', prime: 7, meaning: "Chance", vibe: "chaos" },
    PrimeEntry { glyph: '🎶', prime: 11, meaning: "Harmony", vibe: "rhythm" },
    PrimeEntry { glyph: '🎷', prime: 13, meaning: "Improvisation", vibe: "jazz" },
    PrimeEntry { glyph: '📜', prime: 17, meaning: "Record", vibe: "memory" },
    PrimeEntry { glyph: '🧬', prime: 19, meaning: "Structure", vibe: "life" },
    PrimeEntry { glyph: '🎯', prime: 23, meaning: "Intent", vibe: "focus" },
    PrimeEntry { glyph: '🚀', prime: 29, meaning: "Momentum", vibe: "launch" },
];

/// Read-only view over the static registry table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimeRegistry;

impl PrimeRegistry {
    /// Entries in canonical order.
    pub fn entries() -> &'static [PrimeEntry; PRIME_COUNT] {
        &ENTRIES
    }

    /// Canonical index and entry for a glyph.
    pub fn by_glyph(glyph: char) -> Option<(usize, &'static PrimeEntry)> {
        ENTRIES.iter().enumerate().find(|(_, e)| e.glyph == glyph)
    }

    pub fn by_prime(prime: u32) -> Option<&'static PrimeEntry> {
        ENTRIES.iter().find(|e| e.prime == prime)
    }

    pub fn contains(glyph: char) -> bool {
        Self::by_glyph(glyph).is_some()
    }

    pub fn primes() -> impl Iterator<Item = u32> {
        ENTRIES.iter().map(|e| e.prime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primes_are_first_ten() {
        let primes: Vec<u32> = PrimeRegistry::primes().collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_glyphs_are_unique() {
        let entries = PrimeRegistry::entries();
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                assert_ne!(a.glyph, b.glyph);
            }
        }
    }

    #[test]
    fn test_lookup_by_glyph_and_prime() {
        let (idx, entry) = PrimeRegistry::by_glyph('📜').expect("registered glyph");
        assert_eq!(idx, 6);
        assert_eq!(entry.prime, 17);
        assert_eq!(PrimeRegistry::by_prime(ANCHOR_PRIME).map(|e| e.glyph), Some('🪐'));
        assert!(PrimeRegistry::by_glyph('|').is_none());
        assert!(PrimeRegistry::by_prime(4).is_none());
        assert!(!PrimeRegistry::contains('a'));
    }
}
