use glam::Vec3;

use crate::camera::{CameraPose, ChaseCamera};
use crate::collision::{ObstacleCollider, first_contact};
use crate::config::Tuning;
use crate::input::InputIntent;
use crate::player::Player;

pub struct GameState {
    pub player: Player,
    pub obstacles: Vec<ObstacleCollider>,
    pub in_contact: bool,
    pub camera: CameraPose,
    chase: ChaseCamera,
    tuning: Tuning,
}

impl GameState {
    pub fn new(tuning: Tuning) -> Self {
        Self::with_player(Player::new(tuning.player_size), tuning)
    }

    pub fn with_player(player: Player, tuning: Tuning) -> Self {
        let chase = ChaseCamera::new(tuning.camera_offset);
        let camera = chase.follow(&player);
        Self {
            player,
            obstacles: Vec::new(),
            in_contact: false,
            camera,
            chase,
            tuning,
        }
    }

    /// Installs the obstacle list once the scene has loaded.
    pub fn set_obstacles(&mut self, obstacles: Vec<ObstacleCollider>) {
        log::info!("Tracking {} obstacle colliders", obstacles.len());
        self.obstacles = obstacles;
    }

    /// One frame: rotate, move along the new heading, clamp to the floor,
    /// test obstacles, then snap the camera behind the player.
    pub fn tick(&mut self, intent: InputIntent) {
        let t = &self.tuning;

        if intent.rotate_left {
            self.player.rotate(t.rotate_speed);
        }
        if intent.rotate_right {
            self.player.rotate(-t.rotate_speed);
        }

        if intent.move_forward {
            self.player.advance(Vec3::NEG_Z, t.move_speed);
        }
        if intent.move_backward {
            self.player.advance(Vec3::Z, t.move_speed);
        }

        self.player.clamp_to_ground();

        let hit = first_contact(&self.player.bounds(), &self.obstacles);
        match (hit, self.in_contact) {
            (Some(idx), false) => log::info!("Contact with {}", self.obstacles[idx].name),
            (None, true) => log::debug!("Contact cleared"),
            _ => {}
        }
        self.in_contact = hit.is_some();

        self.camera = self.chase.follow(&self.player);
    }
}
