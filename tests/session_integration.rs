use std::time::{Duration, Instant};

use fuzzy_racer_lib::fuzzy::{FuzzyController, PerceptionFrame};
use fuzzy_racer_lib::game_server::{
    GameServer, PowerUp, PowerUpKind, Race, RaceConfig, RaceStatus, ScriptedSource, TrafficCar,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn quiet_race() -> Race {
    Race::with_rng(RaceConfig::default(), Box::new(ScriptedSource::never()))
}

fn frame(angle: f64, hand_count: i32, gesture: i32) -> PerceptionFrame {
    PerceptionFrame {
        angle,
        hand_count,
        gesture,
        ..Default::default()
    }
}

#[test]
fn controller_reset_is_history_independent() {
    let mut a = FuzzyController::new();
    let mut b = FuzzyController::new();
    for angle in [-80.0, -10.0, 45.0, 89.0] {
        b.compute(angle, 1, 2);
    }
    a.reset();
    b.reset();
    assert_eq!(a.compute(0.0, 2, 0), b.compute(0.0, 2, 0));
}

#[test]
fn boundary_inputs_stay_in_range() {
    let mut controller = FuzzyController::new();
    for angle in [-90.0, 90.0] {
        for hands in 0..=2 {
            for gesture in 0..=3 {
                let cmd = controller.compute(angle, hands, gesture);
                assert!((-100.0..=100.0).contains(&cmd.steering));
                assert!((0.0..=100.0).contains(&cmd.speed));
                assert!((0.0..=100.0).contains(&cmd.nitro));
            }
        }
    }
}

#[test]
fn full_throttle_from_rest_approaches_top_speed() {
    let mut race = quiet_race();
    let mut previous = 0.0;
    let mut reached = false;
    for _ in 0..300 {
        let snapshot = race.update(0.0, 100.0, 0.0, 0.016);
        if !reached {
            assert!(snapshot.speed > previous);
            reached = snapshot.speed >= snapshot.max_speed;
        }
        assert_eq!(snapshot.player_x, 0.0);
        previous = snapshot.speed;
    }
    assert!(reached);
    assert!((race.vehicle.speed - 150.0).abs() <= 1.6 + 1e-9);
}

#[test]
fn unshielded_collision_is_terminal() {
    let mut race = quiet_race();
    race.traffic.push(TrafficCar::new(0.0, 0.85, 45.0));

    let snapshot = race.update(0.0, 50.0, 0.0, 0.016);
    assert!(snapshot.game_over);

    let before = race.vehicle.clone();
    for _ in 0..10 {
        race.update(100.0, 100.0, 100.0, 0.05);
    }
    assert_eq!(race.vehicle, before);
}

#[test]
fn shield_absorbs_collision() {
    let mut race = quiet_race();
    race.vehicle.grant_shield(10.0);
    race.traffic.push(TrafficCar::new(0.0, 0.85, 45.0));
    let score_before = race.vehicle.score;

    let snapshot = race.update(0.0, 0.0, 0.0, 0.016);

    assert!(!snapshot.shield);
    assert!(snapshot.invincible);
    assert_eq!(race.vehicle.invincible_timer, 1.0);
    assert!(snapshot.traffic.is_empty());
    assert_eq!(snapshot.score, score_before + 50);
    assert!(!snapshot.game_over);

    // invincibility runs out after a second of play
    for _ in 0..11 {
        race.update(0.0, 0.0, 0.0, 0.1);
    }
    assert!(!race.vehicle.flags.invincible);
}

#[test]
fn broken_shield_does_not_cover_a_second_car() {
    let mut race = quiet_race();
    race.vehicle.grant_shield(10.0);
    race.traffic.push(TrafficCar::new(0.0, 0.80, 45.0));
    race.traffic.push(TrafficCar::new(0.0, 0.90, 45.0));

    let snapshot = race.update(0.0, 0.0, 0.0, 0.016);

    assert!(snapshot.game_over);
    assert!(!snapshot.shield);
    assert_eq!(snapshot.traffic.len(), 1);
    assert_eq!(snapshot.score, 50);
    assert_eq!(race.status(), RaceStatus::GameOver);
}

#[test]
fn points_powerup_is_collected() {
    let mut race = quiet_race();
    race.powerups.push(PowerUp::new(0.0, 0.85, PowerUpKind::Points));

    let snapshot = race.update(0.0, 0.0, 0.0, 0.016);

    assert_eq!(snapshot.score, 200);
    assert!(snapshot.powerups.is_empty());
}

#[test]
fn caps_hold_over_a_long_seeded_run() {
    let config = RaceConfig {
        rng_seed: Some(0xFACADE),
        ..Default::default()
    };
    let mut race = Race::new(config);
    // shielded forever so the run never ends
    for i in 0..20_000 {
        if i % 50 == 0 {
            race.vehicle.grant_shield(10.0);
        }
        let snapshot = race.update(0.0, 100.0, 0.0, 0.016);
        assert!(snapshot.traffic.len() <= 4);
        assert!(snapshot.powerups.len() <= 1);
        assert!(snapshot.traffic.iter().all(|c| (0.0..1.2).contains(&c.z)));
        assert!((-0.8..=0.8).contains(&snapshot.player_x));
        assert!((0.0..=100.0).contains(&snapshot.nitro));
        assert!((0.0..1.0).contains(&snapshot.road_offset));
    }
}

#[test]
fn seeded_sessions_are_deterministic() {
    let run = || {
        let start = Instant::now();
        let mut session =
            GameServer::with_rng(RaceConfig::default(), Box::new(StdRng::seed_from_u64(9)), start);
        let mut last = None;
        for i in 1..=400u64 {
            let angle = ((i % 40) as f64 - 20.0) * 2.0;
            let report = session.tick(&frame(angle, 2, (i % 4) as i32), start + Duration::from_millis(25 * i));
            last = Some(report.game);
        }
        last
    };
    assert_eq!(run(), run());
}

#[test]
fn session_reset_returns_to_active() {
    let start = Instant::now();
    let mut session =
        GameServer::with_rng(RaceConfig::default(), Box::new(ScriptedSource::never()), start);
    session.race_mut().traffic.push(TrafficCar::new(0.0, 0.85, 45.0));
    session.tick(&frame(0.0, 2, 0), start + Duration::from_millis(20));
    assert_eq!(session.get_state(), RaceStatus::GameOver);

    session.start(start + Duration::from_millis(40));
    assert_eq!(session.get_state(), RaceStatus::Active);
    let snapshot = session.get_snapshot();
    assert_eq!(snapshot.score, 0);
    assert!(snapshot.traffic.is_empty());
    assert_eq!(session.race().vehicle.nitro, 100.0);
}
