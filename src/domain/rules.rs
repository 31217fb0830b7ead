// Win/loss and turbidity math, kept pure so both session modes share it.

use crate::domain::GameEndReason;
use crate::frameworks::config::{DEFEAT_MAX_AI_COUNT, MAX_HUMANS_KILLED, VICTORY_MIN_HUMAN_COUNT};

/// Outcome of an end-condition evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Victory,
    Defeat(GameEndReason),
}

/// Water turbidity derived from the live AI population. Always recomputed
/// from this formula; incremental updates are not allowed to drift it.
pub fn turbidity(ai_count: u32) -> f32 {
    (ai_count as f32 / DEFEAT_MAX_AI_COUNT as f32).min(1.0)
}

/// Evaluates the end conditions against the live populations.
///
/// Victory requires a clean tank with enough surviving humans. Defeat fires
/// when the AI population overflows the tank or too many humans were shot.
/// `None` means the round continues.
pub fn evaluate(ai_remaining: u32, human_remaining: u32, humans_killed: u32) -> Option<GameOutcome> {
    if ai_remaining == 0 && human_remaining >= VICTORY_MIN_HUMAN_COUNT {
        return Some(GameOutcome::Victory);
    }
    if ai_remaining > DEFEAT_MAX_AI_COUNT {
        return Some(GameOutcome::Defeat(GameEndReason::AiMajority));
    }
    if humans_killed >= MAX_HUMANS_KILLED {
        return Some(GameOutcome::Defeat(GameEndReason::TooManyHumansKilled));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turbidity_is_clamped_ratio() {
        assert_eq!(turbidity(0), 0.0);
        assert_eq!(turbidity(DEFEAT_MAX_AI_COUNT), 1.0);
        assert_eq!(turbidity(DEFEAT_MAX_AI_COUNT * 2), 1.0);
    }

    #[test]
    fn victory_needs_clean_tank_and_enough_humans() {
        assert_eq!(evaluate(0, 5, 0), Some(GameOutcome::Victory));
        assert_eq!(evaluate(0, 4, 0), None);
        assert_eq!(evaluate(1, 9, 0), None);
    }

    #[test]
    fn defeat_on_ai_overflow() {
        assert_eq!(
            evaluate(6, 4, 0),
            Some(GameOutcome::Defeat(GameEndReason::AiMajority))
        );
        // Exactly at the cap the round continues.
        assert_eq!(evaluate(5, 4, 0), None);
    }

    #[test]
    fn defeat_on_friendly_fire_limit() {
        assert_eq!(
            evaluate(1, 4, 3),
            Some(GameOutcome::Defeat(GameEndReason::TooManyHumansKilled))
        );
        assert_eq!(evaluate(1, 4, 2), None);
    }

    #[test]
    fn ai_overflow_wins_over_friendly_fire() {
        // Both defeat conditions hold; the overflow reason is reported.
        assert_eq!(
            evaluate(6, 1, 3),
            Some(GameOutcome::Defeat(GameEndReason::AiMajority))
        );
    }
}
