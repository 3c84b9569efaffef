use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

use super::input::{ActionStates, InputAction};
use super::rendering::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    Continue,
    /// Terminal: the host schedules no further ticks.
    Halt,
}

/// Logical intents for one tick. Movement and turning are held states; attack,
/// jump and equip are edges that the input collaborator clears after each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    attack_pressed: bool,
    jump_pressed: bool,
    look_delta: (f32, f32),
    equip_request: Option<usize>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    /// Forward/back axis in `[-1, 1]`.
    pub fn forward_axis(&self) -> f32 {
        self.actions
            .axis(InputAction::MoveForward, InputAction::MoveBack)
    }

    /// Left/right axis in `[-1, 1]`, positive toward the player's left.
    pub fn strafe_axis(&self) -> f32 {
        self.actions.axis(InputAction::MoveLeft, InputAction::MoveRight)
    }

    pub fn turn_axis(&self) -> f32 {
        self.actions.axis(InputAction::TurnLeft, InputAction::TurnRight)
    }

    pub fn attack_pressed(&self) -> bool {
        self.attack_pressed
    }

    pub fn jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    /// Pointer-look movement since the previous tick, in pointer units.
    pub fn look_delta(&self) -> (f32, f32) {
        self.look_delta
    }

    pub fn equip_request(&self) -> Option<usize> {
        self.equip_request
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_attack_pressed(mut self, attack_pressed: bool) -> Self {
        self.attack_pressed = attack_pressed;
        self
    }

    pub fn with_jump_pressed(mut self, jump_pressed: bool) -> Self {
        self.jump_pressed = jump_pressed;
        self
    }

    pub fn with_look_delta(mut self, dx: f32, dy: f32) -> Self {
        self.look_delta = (dx, dy);
        self
    }

    pub fn with_equip_request(mut self, inventory_index: Option<usize>) -> Self {
        self.equip_request = inventory_index;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    pub fn horizontal_distance(self, other: Vec3) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Unit vector, or zero when the input has no length.
    pub fn normalized(self) -> Vec3 {
        let length = self.length();
        if length <= f32::EPSILON {
            return Vec3::ZERO;
        }
        self * (1.0 / length)
    }

    /// Unit direction from `self` toward `target` on the ground plane.
    pub fn horizontal_direction_to(self, target: Vec3) -> Vec3 {
        Vec3 {
            x: target.x - self.x,
            y: 0.0,
            z: target.z - self.z,
        }
        .normalized()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Read-only projection of scene state handed to host collaborators between ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneView {
    pub player_position: Vec3,
    pub player_yaw: f32,
    pub hostile_positions: Vec<Vec3>,
    pub halted: bool,
}

pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&mut self, viewport: Viewport);
    fn unload(&mut self);
    fn view(&self) -> SceneView;
    fn entity_count(&self) -> usize;
    fn debug_title(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_default_to_released() {
        let snapshot = InputSnapshot::empty();
        assert!(!snapshot.attack_pressed());
        assert!(!snapshot.jump_pressed());
        assert_eq!(snapshot.equip_request(), None);
        assert_eq!(snapshot.look_delta(), (0.0, 0.0));
    }

    #[test]
    fn strafe_axis_is_positive_toward_left() {
        let snapshot = InputSnapshot::empty().with_action_down(InputAction::MoveLeft, true);
        assert_eq!(snapshot.strafe_axis(), 1.0);
        assert_eq!(snapshot.forward_axis(), 0.0);
    }

    #[test]
    fn horizontal_direction_ignores_height() {
        let from = Vec3::new(0.0, 10.0, 0.0);
        let to = Vec3::new(3.0, -4.0, 4.0);
        let direction = from.horizontal_direction_to(to);
        assert!((direction.x - 0.6).abs() < 1e-6);
        assert_eq!(direction.y, 0.0);
        assert!((direction.z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalizing_zero_vector_stays_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
        assert_eq!(
            Vec3::new(1.0, 0.0, 1.0).horizontal_direction_to(Vec3::new(1.0, 5.0, 1.0)),
            Vec3::ZERO
        );
    }

    #[test]
    fn allocator_hands_out_increasing_ids() {
        let mut allocator = EntityIdAllocator::default();
        let first = allocator.allocate();
        let second = allocator.allocate();
        assert!(second > first);
    }
}
