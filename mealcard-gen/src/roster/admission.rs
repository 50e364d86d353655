//! Admission number normalisation and synthetic number allocation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Prefix marking an admission number made up by the tool
pub const SYNTHETIC_PREFIX: &str = "AUTO-";

/// Clean a raw admission number
///
/// Trims whitespace and drops a trailing `.0` left behind when a numeric
/// column was read as a decimal (`"1023.0"` -> `"1023"`).
pub fn normalize_admission_number(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_suffix(".0") {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            digits.to_string()
        }
        _ => trimmed.to_string(),
    }
}

pub fn is_synthetic(admission_number: &str) -> bool {
    admission_number.starts_with(SYNTHETIC_PREFIX)
}

/// Hands out `AUTO-xxxxxxxx` numbers for students with a blank admission number
///
/// Every number already stored or already present in the batch is reserved
/// first; a draw that hits a reserved or previously issued number is redrawn.
pub struct AdmissionNumberAllocator {
    taken: HashSet<String>,
    rng: StdRng,
}

impl AdmissionNumberAllocator {
    pub fn new() -> Self {
        Self {
            taken: HashSet::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic allocator for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            taken: HashSet::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn reserve(&mut self, admission_number: impl Into<String>) {
        self.taken.insert(admission_number.into());
    }

    pub fn reserve_all<I, S>(&mut self, admission_numbers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for number in admission_numbers {
            self.reserve(number);
        }
    }

    /// Numbers reserved or issued so far
    pub fn taken_count(&self) -> usize {
        self.taken.len()
    }

    /// Draw a fresh synthetic admission number
    pub fn allocate(&mut self) -> String {
        loop {
            let candidate = format!("{}{:08x}", SYNTHETIC_PREFIX, self.rng.gen::<u32>());
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

impl Default for AdmissionNumberAllocator {
    fn default() -> Self {
        Self::new()
    }
}
