pub const TICK_DT: f32 = 1. / 100.;
pub const MAX_TICKS_PER_FRAME: u32 = 5;

pub const WINDOW_TITLE: &str = "Space Invaders";
pub const SCREEN_SIZE: (u32, u32) = (800, 600);
pub const CLEAR_COLOR: [f32; 4] = [0., 0., 0., 1.];

pub const SHIP_START: (f32, f32) = (370., 550.);
pub const SHIP_SPEED: f32 = 300.;

pub const ALIEN_ROWS: u32 = 5;
pub const ALIEN_COLUMNS: u32 = 12;
pub const ALIEN_ORIGIN: (f32, f32) = (100., 50.);
pub const ALIEN_SPACING: (f32, f32) = (50., 30.);
pub const ALIEN_SPEED: f32 = 75.;
pub const ALIEN_DROP: f32 = 10.;
pub const ALIEN_SPEEDUP: f32 = 1.02;
/// An alien below this line has reached the player.
pub const ALIEN_LANDING_Y: f32 = 570.;

// horizontal limits shared by the ship and the alien formation
pub const LEFT_EDGE: f32 = 10.;
pub const RIGHT_EDGE: f32 = 750.;

pub const SHOT_SPEED: f32 = -300.;
pub const SHOT_OFFSET: (f32, f32) = (15., -16.);
pub const SHOT_EXPIRY_Y: f32 = -100.;
/// Seconds of game time between two shots.
pub const FIRING_INTERVAL: f32 = 0.5;

pub const MESSAGE_Y: f32 = 250.;
