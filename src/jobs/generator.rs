use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::num::NonZeroU64;

use super::types::{Addon, CarMake, CustomerId, Job, WashTier};

const MAX_CUSTOMER_ID: u64 = 999_999;

/// Produces random jobs for the worker host loop
///
/// Add-ons are drawn with replacement, so generated jobs regularly carry
/// duplicate add-on keys.
#[derive(Debug)]
pub struct JobGenerator {
    rng: StdRng,
    max_addons: usize,
}

impl JobGenerator {
    pub fn new(max_addons: usize) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max_addons,
        }
    }

    /// Deterministic generator for tests and reproducible runs
    pub fn with_seed(seed: u64, max_addons: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_addons,
        }
    }

    pub fn next_job(&mut self) -> Job {
        let raw_id = self.rng.gen_range(1..=MAX_CUSTOMER_ID);
        let customer_id = CustomerId::from(NonZeroU64::new(raw_id).unwrap_or(NonZeroU64::MIN));

        let make = *CarMake::ALL.choose(&mut self.rng).unwrap_or(&CarMake::Ford);
        let wash_tier = *WashTier::ALL.choose(&mut self.rng).unwrap_or(&WashTier::Basic);

        let count = self.rng.gen_range(0..=self.max_addons);
        let addons: Vec<Addon> = (0..count)
            .filter_map(|_| Addon::ALL.choose(&mut self.rng).copied())
            .collect();

        Job::new(customer_id, make, wash_tier, addons)
    }
}

impl Iterator for JobGenerator {
    type Item = Job;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_job())
    }
}
