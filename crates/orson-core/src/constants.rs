//! Reference tuning parameters.
//!
//! Time values are in host timestamp units (milliseconds); speeds and growth
//! rates are per simulation step.

// --- Field ---

pub const FIELD_WIDTH: f64 = 800.0;
pub const FIELD_HEIGHT: f64 = 600.0;

/// How far outside the field new threats appear.
pub const SPAWN_MARGIN: f64 = 20.0;

/// Side-edge spawns use only the upper part of the field height.
pub const SIDE_SPAWN_HEIGHT_FRACTION: f64 = 0.6;

// --- Batteries ---

/// Battery row: (x, y, max ammo), left to right.
pub const BATTERY_LAYOUT: [(f64, f64, u32); 5] = [
    (40.0, 560.0, 25),
    (220.0, 560.0, 25),
    (400.0, 560.0, 55),
    (580.0, 560.0, 25),
    (760.0, 560.0, 25),
];

/// Index of the battery that fires triple volleys.
pub const CENTER_BATTERY: usize = 2;

/// Index of the battery that starts with a shield.
pub const SHIELDED_BATTERY: usize = 2;

/// Target-x offsets of a center-battery volley, in firing order.
pub const CENTER_VOLLEY_OFFSETS: [f64; 3] = [0.0, -40.0, 40.0];

/// Target-x offsets of a side-battery volley.
pub const SIDE_VOLLEY_OFFSETS: [f64; 2] = [0.0, 20.0];

/// Destroyed batteries that end the run.
pub const LOSS_DESTROYED_BATTERIES: usize = 3;

// --- Cities ---

pub const CITY_LAYOUT: [(f64, f64); 4] = [
    (120.0, 570.0),
    (300.0, 570.0),
    (500.0, 570.0),
    (680.0, 570.0),
];

// --- Projectiles ---

pub const INTERCEPTOR_SPEED: f64 = 15.0;

pub const EXPLOSION_MAX_RADIUS: f64 = 120.0;
pub const EXPLOSION_GROWTH_RATE: f64 = 2.0;

pub const THREAT_BASE_SPEED: f64 = 0.4;
pub const THREAT_SPEED_PER_LEVEL: f64 = 0.075;

/// Half-size of the box around an impact point that damages structures.
pub const IMPACT_TOLERANCE: f64 = 20.0;

/// Clicks closer than this to a threat make the volley heat-track it.
pub const TRACKING_RADIUS: f64 = 150.0;

// --- Spawning ---

pub const SPAWN_INTERVAL_BASE: f64 = 2000.0;
pub const SPAWN_INTERVAL_PER_LEVEL: f64 = 150.0;
pub const SPAWN_INTERVAL_MIN: f64 = 400.0;

// --- Scoring & progression ---

pub const WIN_SCORE: u32 = 1000;
pub const KILL_SCORE: u32 = 20;

/// Level-end bonus per remaining round in surviving batteries.
pub const AMMO_BONUS_PER_ROUND: u32 = 5;

/// Delay between a level ending and the next one starting.
pub const LEVEL_START_DELAY: f64 = 2000.0;

/// Kills without an intervening impact that trigger a combo message.
pub const COMBO_THRESHOLD: u32 = 5;
pub const COMBO_MESSAGE_DURATION: f64 = 2000.0;
pub const COMBO_MESSAGE_TEXT: &str = "干得漂亮";

// --- Difficulty table: (threat quota per level, speed multiplier) ---

pub const DIFFICULTY_SIMPLE: (u32, f64) = (10, 0.8);
pub const DIFFICULTY_MEDIUM: (u32, f64) = (15, 1.0);
pub const DIFFICULTY_HARD: (u32, f64) = (20, 1.3);

// --- Host loop ---

/// Nominal frame period of the browser host (60 Hz).
pub const FRAME_PERIOD_MS: f64 = 1000.0 / 60.0;
