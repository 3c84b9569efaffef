use std::f32::consts::{PI, TAU};

use engine::{InputAction, InputSnapshot, InputSource, SceneView, Vec3};

const FACING_TOLERANCE_RADIANS: f32 = 0.08;
const WALK_WHILE_TURNING_RADIANS: f32 = 0.6;
const STAND_OFF_DISTANCE: f32 = 2.5;
const SWING_DISTANCE: f32 = 4.0;
const SWING_INTERVAL_TICKS: u32 = 20;

/// Headless stand-in for a player: faces the nearest hostile, closes in, and
/// swings on a fixed cadence once in reach.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    ticks_since_swing: u32,
}

impl InputSource for Autopilot {
    fn snapshot_for_tick(&mut self, view: &SceneView) -> InputSnapshot {
        self.ticks_since_swing = self.ticks_since_swing.saturating_add(1);
        let Some(target) = nearest_hostile(view) else {
            return InputSnapshot::empty();
        };

        let heading_error = heading_error(view.player_position, view.player_yaw, target);
        let distance = view.player_position.horizontal_distance(target);
        let mut snapshot = InputSnapshot::empty()
            .with_action_down(
                InputAction::TurnLeft,
                heading_error > FACING_TOLERANCE_RADIANS,
            )
            .with_action_down(
                InputAction::TurnRight,
                heading_error < -FACING_TOLERANCE_RADIANS,
            )
            .with_action_down(
                InputAction::MoveForward,
                distance > STAND_OFF_DISTANCE && heading_error.abs() < WALK_WHILE_TURNING_RADIANS,
            );

        if distance < SWING_DISTANCE && self.ticks_since_swing >= SWING_INTERVAL_TICKS {
            self.ticks_since_swing = 0;
            snapshot = snapshot.with_attack_pressed(true);
        }
        snapshot
    }
}

fn nearest_hostile(view: &SceneView) -> Option<Vec3> {
    view.hostile_positions.iter().copied().min_by(|left, right| {
        let left_distance = view.player_position.horizontal_distance(*left);
        let right_distance = view.player_position.horizontal_distance(*right);
        left_distance.total_cmp(&right_distance)
    })
}

/// Signed yaw change that would face `target`; positive means turn left.
fn heading_error(from: Vec3, yaw: f32, target: Vec3) -> f32 {
    let desired = (target.x - from.x).atan2(target.z - from.z);
    let error = (desired - yaw).rem_euclid(TAU);
    if error > PI {
        error - TAU
    } else {
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with(player_yaw: f32, hostiles: Vec<Vec3>) -> SceneView {
        SceneView {
            player_position: Vec3::ZERO,
            player_yaw,
            hostile_positions: hostiles,
            halted: false,
        }
    }

    #[test]
    fn no_hostiles_means_no_intent() {
        let mut autopilot = Autopilot::default();
        let snapshot = autopilot.snapshot_for_tick(&view_with(0.0, Vec::new()));
        assert_eq!(snapshot.forward_axis(), 0.0);
        assert_eq!(snapshot.turn_axis(), 0.0);
        assert!(!snapshot.attack_pressed());
    }

    #[test]
    fn walks_straight_at_target_ahead() {
        let mut autopilot = Autopilot::default();
        let snapshot =
            autopilot.snapshot_for_tick(&view_with(0.0, vec![Vec3::new(0.0, 0.0, 20.0)]));
        assert_eq!(snapshot.forward_axis(), 1.0);
        assert_eq!(snapshot.turn_axis(), 0.0);
    }

    #[test]
    fn turns_left_toward_target_on_positive_x() {
        let mut autopilot = Autopilot::default();
        let snapshot =
            autopilot.snapshot_for_tick(&view_with(0.0, vec![Vec3::new(20.0, 0.0, 0.0)]));
        assert_eq!(snapshot.turn_axis(), 1.0);
        assert_eq!(snapshot.forward_axis(), 0.0);
    }

    #[test]
    fn picks_nearest_hostile() {
        let view = view_with(
            0.0,
            vec![Vec3::new(0.0, 0.0, -50.0), Vec3::new(0.0, 0.0, 10.0)],
        );
        assert_eq!(nearest_hostile(&view), Some(Vec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn swings_on_cadence_when_in_reach() {
        let mut autopilot = Autopilot::default();
        let view = view_with(0.0, vec![Vec3::new(0.0, 0.0, 2.0)]);
        let swings = (0..SWING_INTERVAL_TICKS * 3)
            .filter(|_| autopilot.snapshot_for_tick(&view).attack_pressed())
            .count();
        assert_eq!(swings, 3);
        assert_eq!(autopilot.snapshot_for_tick(&view).forward_axis(), 0.0);
    }

    #[test]
    fn heading_error_wraps_across_pi() {
        let error = heading_error(Vec3::ZERO, 3.0, Vec3::new(-0.5, 0.0, -10.0));
        assert!(error > 0.0 && error < 0.5);
    }
}
