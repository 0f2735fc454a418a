use glam::{Mat4, Quat, Vec3};

use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }
}

/// Third-person camera that snaps behind the player every tick.
pub struct ChaseCamera {
    pub offset: Vec3,
}

impl ChaseCamera {
    pub fn new(offset: Vec3) -> Self {
        Self { offset }
    }

    pub fn follow(&self, player: &Player) -> CameraPose {
        let offset = Quat::from_rotation_y(player.yaw) * self.offset;
        CameraPose {
            position: player.position + offset,
            target: player.position,
        }
    }
}
