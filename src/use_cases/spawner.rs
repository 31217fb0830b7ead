// Impostor injection policy for offline play. Human submissions count toward
// a randomized threshold; reaching it produces one AI seed and re-rolls.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::Rng;

use crate::domain::ItemSeed;

const SPAWN_THRESHOLD: RangeInclusive<u32> = 3..=7;

pub const IMPOSTOR_AUTHOR: &str = "AI artist";

const IMPOSTOR_NAMES: &[&str] = &[
    "Bubbles", "Shimmer", "Pearl", "Coral", "Starfish", "Droplet", "Wave", "Deep Blue",
    "Jade", "Amber", "Moonlight", "Stardust", "Dawn", "Dusk", "Aurora", "Goldie",
    "Silverfin", "Rainbow", "Pebble", "Kelp",
];

const IMPOSTOR_DESCRIPTIONS: &[&str] = &[
    "A happy little fish~",
    "Swimming freely along the seabed!",
    "I'm the prettiest fish here!",
    "Lovely weather today",
    "Looking for tasty seaweed...",
    "Playing with my friends",
    "Exploring the mysterious deep",
    "The sunlight feels warm down here",
    "My scales sparkle in the light",
    "Swim, swim, so much fun",
];

/// Counts human submissions against a random threshold; when it is reached
/// an impostor seed comes out and the threshold re-rolls.
pub struct ImpostorSpawner {
    human_count: u32,
    threshold: u32,
    used_names: HashSet<usize>,
}

impl Default for ImpostorSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl ImpostorSpawner {
    pub fn new() -> Self {
        Self {
            human_count: 0,
            threshold: roll_threshold(),
            used_names: HashSet::new(),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Registers one human submission. Returns a seed for the impostor to
    /// inject when the threshold is reached; the counter resets and the
    /// threshold re-rolls on every trigger.
    pub fn on_human_submission(&mut self) -> Option<ItemSeed> {
        self.human_count += 1;
        if self.human_count < self.threshold {
            return None;
        }
        self.human_count = 0;
        self.threshold = roll_threshold();
        Some(self.next_seed())
    }

    fn next_seed(&mut self) -> ItemSeed {
        let mut rng = rand::thread_rng();
        let description =
            IMPOSTOR_DESCRIPTIONS[rng.gen_range(0..IMPOSTOR_DESCRIPTIONS.len())].to_string();

        let mut seed = ItemSeed::impostor(self.pick_name(&mut rng));
        seed.description = Some(description);
        seed.author = Some(IMPOSTOR_AUTHOR.to_string());
        seed
    }

    /// Picks a pool name not handed out yet; once the pool is exhausted the
    /// used set clears and names repeat.
    fn pick_name(&mut self, rng: &mut impl Rng) -> String {
        if self.used_names.len() >= IMPOSTOR_NAMES.len() {
            self.used_names.clear();
        }
        loop {
            let idx = rng.gen_range(0..IMPOSTOR_NAMES.len());
            if self.used_names.insert(idx) {
                return IMPOSTOR_NAMES[idx].to_string();
            }
        }
    }
}

fn roll_threshold() -> u32 {
    rand::thread_rng().gen_range(SPAWN_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_stays_within_the_roll_range() {
        for _ in 0..50 {
            let spawner = ImpostorSpawner::new();
            assert!(SPAWN_THRESHOLD.contains(&spawner.threshold()));
        }
    }

    #[test]
    fn submissions_trigger_a_spawn_at_the_threshold() {
        let mut spawner = ImpostorSpawner::new();
        let threshold = spawner.threshold();

        for n in 1..threshold {
            assert!(spawner.on_human_submission().is_none(), "early spawn at {n}");
        }
        let seed = spawner.on_human_submission().expect("spawn at the threshold");
        assert!(seed.is_ai);
        assert!(seed.name.is_some());
        assert_eq!(seed.author.as_deref(), Some(IMPOSTOR_AUTHOR));
    }

    #[test]
    fn trigger_resets_the_counter_and_rerolls() {
        let mut spawner = ImpostorSpawner::new();
        for _ in 1..spawner.threshold() {
            spawner.on_human_submission();
        }
        spawner.on_human_submission().expect("first trigger");

        // The next trigger needs at least the minimum roll again.
        assert!(spawner.on_human_submission().is_none());
        assert!(spawner.on_human_submission().is_none());
        assert!(SPAWN_THRESHOLD.contains(&spawner.threshold()));
    }

    #[test]
    fn names_do_not_repeat_until_the_pool_runs_out() {
        let mut spawner = ImpostorSpawner::new();
        let mut rng = rand::thread_rng();
        let mut seen = HashSet::new();
        for _ in 0..IMPOSTOR_NAMES.len() {
            assert!(seen.insert(spawner.pick_name(&mut rng)));
        }
        // Pool exhausted; the set clears and names come around again.
        assert!(!seen.insert(spawner.pick_name(&mut rng)));
    }
}
