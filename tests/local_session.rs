// End-to-end offline rounds: full vote/chase flows driving eliminations
// through to victory and both defeat conditions.

use std::time::{Duration, Instant};

use fishbowl::LocalSession;
use fishbowl::domain::{BattleAction, GameEndReason, GamePhase, ItemSeed};
use fishbowl::frameworks::config::{COOLDOWN_DURATION, ELIMINATION_THRESHOLD};

fn after_cooldown() -> Instant {
    Instant::now() + COOLDOWN_DURATION + Duration::from_millis(10)
}

/// Lands `hits` consecutive shots on one fish, reloading between shots.
fn land_hits(session: &mut LocalSession, fish_id: &str, hits: u32) {
    for _ in 0..hits {
        assert!(
            session.attack(fish_id).is_some(),
            "attack on {fish_id} rejected"
        );
        session.tick(after_cooldown());
    }
}

fn setup_tank(humans: usize, impostors: usize) -> LocalSession {
    let mut session = LocalSession::new();
    for n in 0..humans {
        session.submit_drawing(ItemSeed::named(format!("drawing {n}")));
    }
    for n in 0..impostors {
        session.spawn_impostor(ItemSeed::impostor(format!("impostor {n}")));
    }
    session
}

fn find_impostor(session: &LocalSession) -> String {
    session
        .store()
        .items()
        .into_iter()
        .find(|i| i.is_ai)
        .expect("impostor present")
        .id
}

/// Shoots down every impostor in the tank, including any that slipped in
/// alongside the submissions.
fn shoot_every_impostor(session: &mut LocalSession) {
    while let Some(impostor) = session.store().items().into_iter().find(|i| i.is_ai) {
        land_hits(session, &impostor.id, ELIMINATION_THRESHOLD);
    }
}

fn find_other_human(session: &LocalSession) -> String {
    let own = session.store().player_fish_id().unwrap().to_string();
    session
        .store()
        .items()
        .into_iter()
        .find(|i| !i.is_ai && i.id != own)
        .expect("another human fish present")
        .id
}

#[test]
fn hunting_down_the_impostors_wins_the_round() {
    let mut session = setup_tank(5, 1);
    let impostor = find_impostor(&session);

    // First shot votes, the rest chase after each reload.
    assert_eq!(session.attack(&impostor), Some(BattleAction::Vote));
    session.tick(after_cooldown());
    land_hits(&mut session, &impostor, ELIMINATION_THRESHOLD - 1);
    // Submissions may have attracted more impostors; clean them out too.
    shoot_every_impostor(&mut session);

    let result = session.store().game_result().expect("round should end");
    assert!(result.is_victory);
    assert_eq!(result.ai_remaining, 0);
    assert_eq!(result.human_remaining, 5);
    assert_eq!(session.store().phase(), GamePhase::Gameover);
    assert!(session.ai_killed() >= 1);
    // Turbidity cleared with the last impostor.
    assert_eq!(session.store().turbidity(), 0.0);
}

#[test]
fn shooting_real_drawings_loses_the_round() {
    // One impostor stays alive so the clean-tank victory can't trigger.
    let mut session = setup_tank(6, 1);

    for _ in 0..3 {
        let target = find_other_human(&session);
        land_hits(&mut session, &target, ELIMINATION_THRESHOLD);
        if session.store().game_result().is_some() {
            break;
        }
    }

    let result = session.store().game_result().expect("round should end");
    assert!(!result.is_victory);
    assert_eq!(result.reason, Some(GameEndReason::TooManyHumansKilled));
    assert_eq!(result.humans_killed, Some(3));
    assert_eq!(session.humans_killed(), 3);
}

#[test]
fn impostor_overflow_loses_without_any_shot() {
    let mut session = setup_tank(3, 0);
    for n in 0..6 {
        session.spawn_impostor(ItemSeed::impostor(format!("swarm {n}")));
    }

    let result = session.store().game_result().expect("round should end");
    assert!(!result.is_victory);
    assert_eq!(result.reason, Some(GameEndReason::AiMajority));
    assert_eq!(result.ai_remaining, 6);
    // Turbidity saturates at full murk.
    assert_eq!(session.store().turbidity(), 1.0);
}

#[test]
fn cooldown_blocks_chase_until_tick_reloads() {
    let mut session = setup_tank(2, 1);
    let impostor = find_impostor(&session);

    assert_eq!(session.attack(&impostor), Some(BattleAction::Vote));
    // Cooling: a repeat attack on the same fish is refused.
    assert_eq!(session.attack(&impostor), None);
    assert_eq!(session.store().vote_count(&impostor), 1);

    // Before the deadline nothing reloads.
    session.tick(Instant::now());
    assert_eq!(session.attack(&impostor), None);

    session.tick(after_cooldown());
    assert_eq!(session.attack(&impostor), Some(BattleAction::Chase));
    assert_eq!(session.store().vote_count(&impostor), 2);
}

#[test]
fn switching_targets_moves_the_vote() {
    let mut session = setup_tank(3, 2);
    let impostors: Vec<String> = session
        .store()
        .items()
        .into_iter()
        .filter(|i| i.is_ai)
        .map(|i| i.id)
        .collect();

    assert_eq!(session.attack(&impostors[0]), Some(BattleAction::Vote));
    // Still cooling, but redirecting the placed vote is allowed.
    assert_eq!(
        session.attack(&impostors[1]),
        Some(BattleAction::Switch {
            previous: impostors[0].clone()
        })
    );

    assert_eq!(session.store().vote_count(&impostors[0]), 0);
    assert_eq!(session.store().vote_count(&impostors[1]), 1);
    assert_eq!(
        session.store().bullet().current_target.as_deref(),
        Some(impostors[1].as_str())
    );
}

#[test]
fn own_fish_is_protected() {
    let mut session = setup_tank(2, 1);
    let own = session.store().player_fish_id().unwrap().to_string();

    assert_eq!(session.attack(&own), None);
    assert_eq!(session.store().vote_count(&own), 0);
    assert!(session.store().bullet().status.is_ready());
}

#[test]
fn reset_starts_a_fresh_round_after_gameover() {
    let mut session = setup_tank(5, 1);
    shoot_every_impostor(&mut session);
    assert!(session.store().game_result().is_some());

    session.reset();

    assert_eq!(session.store().phase(), GamePhase::Lobby);
    assert!(session.store().game_result().is_none());
    assert_eq!(session.store().total_items(), 0);
    assert!(session.store().bullet().status.is_ready());

    // The fresh round plays out normally.
    let mut fresh = setup_tank(5, 1);
    shoot_every_impostor(&mut fresh);
    assert!(fresh.store().game_result().unwrap().is_victory);
}
