use glam::{Mat4, Quat, Vec3};

use crate::collision::Aabb;

/// The player's cube. Yaw is the only rotational degree of freedom.
pub struct Player {
    pub position: Vec3,
    pub yaw: f32,
    pub size: f32,
}

impl Player {
    pub fn new(size: f32) -> Self {
        Self::spawn_at(Vec3::new(0.0, size / 2.0, 0.0), size)
    }

    pub fn spawn_at(position: Vec3, size: f32) -> Self {
        Self {
            position,
            yaw: 0.0,
            size,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    pub fn rotate(&mut self, angle: f32) {
        self.yaw += angle;
    }

    pub fn advance(&mut self, local_dir: Vec3, distance: f32) {
        self.position += self.rotation() * local_dir * distance;
    }

    /// Keeps the cube resting on the y = 0 floor.
    pub fn clamp_to_ground(&mut self) {
        let floor = self.size / 2.0;
        if self.position.y < floor {
            self.position.y = floor;
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.position)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(self.size / 2.0))
            .transformed(self.model_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn spawns_resting_on_floor() {
        let player = Player::new(0.5);
        assert_eq!(player.position, Vec3::new(0.0, 0.25, 0.0));
        assert_eq!(player.yaw, 0.0);
    }

    #[test]
    fn ground_clamp_snaps_and_is_idempotent() {
        let mut player = Player::spawn_at(Vec3::new(1.0, -3.0, 2.0), 0.5);
        player.clamp_to_ground();
        assert_eq!(player.position.y, 0.25);
        player.clamp_to_ground();
        assert_eq!(player.position, Vec3::new(1.0, 0.25, 2.0));
    }

    #[test]
    fn ground_clamp_leaves_higher_positions() {
        let mut player = Player::spawn_at(Vec3::new(0.0, 4.0, 0.0), 0.5);
        player.clamp_to_ground();
        assert_eq!(player.position.y, 4.0);
    }

    #[test]
    fn advance_follows_yaw() {
        let mut player = Player::spawn_at(Vec3::ZERO, 0.5);
        player.advance(Vec3::NEG_Z, 1.0);
        assert!(player.position.abs_diff_eq(Vec3::NEG_Z, 1e-6));

        player.position = Vec3::ZERO;
        player.yaw = FRAC_PI_2;
        player.advance(Vec3::NEG_Z, 2.0);
        assert!(player.position.abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), 1e-6));
        player.advance(Vec3::Z, 2.0);
        assert!(player.position.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn bounds_axis_aligned_at_zero_yaw() {
        let player = Player::spawn_at(Vec3::new(0.0, 0.5, 25.0), 0.5);
        let b = player.bounds();
        assert!(b.min.abs_diff_eq(Vec3::new(-0.25, 0.25, 24.75), 1e-5));
        assert!(b.max.abs_diff_eq(Vec3::new(0.25, 0.75, 25.25), 1e-5));
    }
}
