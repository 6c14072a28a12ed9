//! Collision - Zone based hit tests against traffic and power-ups
//!
//! An entity touches the player when its depth is inside the player's
//! zone and it is laterally within half a lane.

use serde::{Deserialize, Serialize};

use crate::game_server::spawner::{PowerUp, PowerUpKind, TrafficCar};
use crate::game_server::vehicle::VehicleState;

/// What happened to the player during one resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionEvent {
    /// Unshielded hit, the session is over
    Crash,
    /// Shield took the hit and broke
    ShieldAbsorbed,
    Collected(PowerUpKind),
}

pub struct CollisionDetector;

impl CollisionDetector {
    const TRAFFIC_ZONE: (f64, f64) = (0.75, 0.95);
    const PICKUP_ZONE: (f64, f64) = (0.7, 1.0);
    const LATERAL_REACH: f64 = 0.25;

    const SHIELD_HIT_BONUS: u64 = 50;
    const INVINCIBLE_AFTER_HIT: f64 = 1.0;

    const NITRO_REFILL: f64 = 50.0;
    const NITRO_BONUS: u64 = 30;
    const SHIELD_DURATION: f64 = 10.0;
    const SHIELD_BONUS: u64 = 50;
    const POINTS_BONUS: u64 = 200;

    fn in_zone(z: f64, (near, far): (f64, f64)) -> bool {
        near < z && z < far
    }

    pub fn hits_traffic(player_x: f64, car: &TrafficCar) -> bool {
        Self::in_zone(car.z, Self::TRAFFIC_ZONE) && (car.x - player_x).abs() < Self::LATERAL_REACH
    }

    pub fn reaches_powerup(player_x: f64, powerup: &PowerUp) -> bool {
        Self::in_zone(powerup.z, Self::PICKUP_ZONE)
            && (powerup.x - player_x).abs() < Self::LATERAL_REACH
    }

    /// Resolve contacts for this tick, removing absorbed cars and collected
    /// power-ups. Nothing is checked if the player starts the pass
    /// invincible; a shield broken mid-pass leaves later cars lethal.
    pub fn resolve(
        state: &mut VehicleState,
        traffic: &mut Vec<TrafficCar>,
        powerups: &mut Vec<PowerUp>,
    ) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        if state.flags.invincible || state.flags.game_over {
            return events;
        }

        let mut remaining = Vec::with_capacity(traffic.len());
        for car in std::mem::take(traffic) {
            if state.flags.game_over || !Self::hits_traffic(state.player_x, &car) {
                remaining.push(car);
                continue;
            }

            if state.flags.shield {
                state.flags.shield = false;
                state.shield_timer = 0.0;
                state.grant_invincibility(Self::INVINCIBLE_AFTER_HIT);
                state.score += Self::SHIELD_HIT_BONUS;
                events.push(CollisionEvent::ShieldAbsorbed);
            } else {
                state.flags.game_over = true;
                events.push(CollisionEvent::Crash);
                remaining.push(car);
            }
        }
        *traffic = remaining;

        if state.flags.game_over {
            return events;
        }

        let (collected, missed): (Vec<_>, Vec<_>) = std::mem::take(powerups)
            .into_iter()
            .partition(|p| Self::reaches_powerup(state.player_x, p));
        *powerups = missed;

        for powerup in collected {
            Self::apply(state, powerup.kind);
            events.push(CollisionEvent::Collected(powerup.kind));
        }
        events
    }

    fn apply(state: &mut VehicleState, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Nitro => {
                state.add_nitro(Self::NITRO_REFILL);
                state.score += Self::NITRO_BONUS;
            }
            PowerUpKind::Shield => {
                state.grant_shield(Self::SHIELD_DURATION);
                state.score += Self::SHIELD_BONUS;
            }
            PowerUpKind::Points => {
                state.score += Self::POINTS_BONUS;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> VehicleState {
        VehicleState::new(150.0)
    }

    #[test]
    fn unshielded_hit_ends_the_game() {
        let mut state = player();
        let mut traffic = vec![TrafficCar::new(0.0, 0.85, 40.0)];
        let mut powerups = vec![PowerUp::new(0.0, 0.85, PowerUpKind::Points)];

        let events = CollisionDetector::resolve(&mut state, &mut traffic, &mut powerups);

        assert_eq!(events, vec![CollisionEvent::Crash]);
        assert!(state.flags.game_over);
        assert_eq!(traffic.len(), 1);
        // no pickups once crashed
        assert_eq!(powerups.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn shield_absorbs_hit() {
        let mut state = player();
        state.grant_shield(5.0);
        let mut traffic = vec![TrafficCar::new(0.1, 0.85, 40.0), TrafficCar::new(0.55, 0.85, 40.0)];
        let mut powerups = Vec::new();

        let events = CollisionDetector::resolve(&mut state, &mut traffic, &mut powerups);

        assert_eq!(events, vec![CollisionEvent::ShieldAbsorbed]);
        assert!(!state.flags.shield);
        assert!(state.flags.invincible);
        assert_eq!(state.invincible_timer, 1.0);
        assert_eq!(state.score, 50);
        assert!(!state.flags.game_over);
        assert_eq!(traffic, vec![TrafficCar::new(0.55, 0.85, 40.0)]);
    }

    #[test]
    fn second_car_in_same_tick_crashes_after_absorb() {
        let mut state = player();
        state.grant_shield(5.0);
        let mut traffic = vec![TrafficCar::new(0.0, 0.8, 40.0), TrafficCar::new(0.1, 0.9, 40.0)];
        let mut powerups = vec![PowerUp::new(0.0, 0.85, PowerUpKind::Points)];

        let events = CollisionDetector::resolve(&mut state, &mut traffic, &mut powerups);

        assert_eq!(events, vec![CollisionEvent::ShieldAbsorbed, CollisionEvent::Crash]);
        assert!(state.flags.game_over);
        assert!(!state.flags.shield);
        assert_eq!(state.score, 50);
        assert_eq!(traffic, vec![TrafficCar::new(0.1, 0.9, 40.0)]);
        assert_eq!(powerups.len(), 1);
    }

    #[test]
    fn invincible_player_skips_checks() {
        let mut state = player();
        state.grant_invincibility(1.0);
        let mut traffic = vec![TrafficCar::new(0.0, 0.85, 40.0)];
        let mut powerups = vec![PowerUp::new(0.0, 0.85, PowerUpKind::Points)];

        let events = CollisionDetector::resolve(&mut state, &mut traffic, &mut powerups);

        assert!(events.is_empty());
        assert!(!state.flags.game_over);
        assert_eq!(powerups.len(), 1);
    }

    #[test]
    fn zone_bounds_are_exclusive() {
        let at = |x, z| TrafficCar::new(x, z, 40.0);
        assert!(!CollisionDetector::hits_traffic(0.0, &at(0.0, 0.75)));
        assert!(!CollisionDetector::hits_traffic(0.0, &at(0.0, 0.95)));
        assert!(CollisionDetector::hits_traffic(0.0, &at(0.0, 0.76)));
        assert!(!CollisionDetector::hits_traffic(0.0, &at(0.25, 0.85)));
        assert!(CollisionDetector::hits_traffic(0.0, &at(0.24, 0.85)));
    }

    #[test]
    fn powerups_apply_their_effects() {
        let mut state = player();
        state.nitro = 70.0;
        let mut traffic = Vec::new();
        let mut powerups = vec![
            PowerUp::new(0.0, 0.85, PowerUpKind::Nitro),
            PowerUp::new(0.1, 0.75, PowerUpKind::Shield),
            PowerUp::new(0.5, 0.85, PowerUpKind::Points),
        ];

        let events = CollisionDetector::resolve(&mut state, &mut traffic, &mut powerups);

        assert_eq!(
            events,
            vec![
                CollisionEvent::Collected(PowerUpKind::Nitro),
                CollisionEvent::Collected(PowerUpKind::Shield),
            ]
        );
        assert_eq!(state.nitro, 100.0);
        assert!(state.flags.shield);
        assert_eq!(state.shield_timer, 10.0);
        assert_eq!(state.score, 80);
        assert_eq!(powerups, vec![PowerUp::new(0.5, 0.85, PowerUpKind::Points)]);
    }

    #[test]
    fn points_powerup_scores_200() {
        let mut state = player();
        let mut powerups = vec![PowerUp::new(0.0, 0.85, PowerUpKind::Points)];
        CollisionDetector::resolve(&mut state, &mut Vec::new(), &mut powerups);
        assert_eq!(state.score, 200);
        assert!(powerups.is_empty());
    }
}
