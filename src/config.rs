use glam::Vec3;

// Player
pub const PLAYER_SIZE: f32 = 0.5;
pub const MOVE_SPEED: f32 = 0.05; // units per tick
pub const ROTATE_SPEED: f32 = 0.03; // radians per tick
pub const PLAYER_COLOR: [f32; 3] = [0.0, 1.0, 0.533];

// Camera
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 5.0);
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// Scene
pub const SCENE_PATH: &str = "models/dummy_model.glb";
#[cfg(target_arch = "wasm32")]
pub const SCENE_URL: &str = "/models/dummy_model.glb";
pub const OBSTACLE_NAME_MARKER: &str = "Column";
pub const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 0.627,
    g: 0.627,
    b: 0.627,
    a: 1.0,
};

// Lighting
pub const AMBIENT_INTENSITY: f32 = 0.6;
pub const SUN_INTENSITY: f32 = 0.8;
pub const SUN_POSITION: Vec3 = Vec3::new(10.0, 10.0, 10.0);

// Overlay
#[cfg(target_arch = "wasm32")]
pub const OVERLAY_VIDEO_ID: &str = "k2i73lmL3CM";

/// Per-tick tunables for the frame update.
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    pub move_speed: f32,
    pub rotate_speed: f32,
    pub player_size: f32,
    pub camera_offset: Vec3,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            rotate_speed: ROTATE_SPEED,
            player_size: PLAYER_SIZE,
            camera_offset: CAMERA_OFFSET,
        }
    }
}
