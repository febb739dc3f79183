//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Pools ---

/// Ticks a dead object stays in the garbage list before its slot is freed.
pub const GARBAGE_TTL: u32 = 15;

/// Slot capacity of each bullet pool (player-owned and enemy-owned).
pub const BULLET_POOL_CAPACITY: usize = 1024;

/// Slot capacity of the enemy pool.
pub const ENEMY_POOL_CAPACITY: usize = 128;

// --- Vitals ---

/// Full health for every object.
pub const MAX_HEALTH: f32 = 100.0;

// --- Collision ---

/// Blaster ray is stretched to approximate the bolt's visible length.
pub const BLASTER_RAY_FACTOR: f32 = 3.0;

pub const TORPEDO_RAY_FACTOR: f32 = 1.0;

/// Slug is instant-hit: a long fixed-length cast.
pub const SLUG_RAY_LENGTH: f32 = 1000.0;

pub const PLAYER_COLLISION_RADIUS: f32 = 4.0;
pub const ENEMY_COLLISION_RADIUS: f32 = 4.0;
pub const BLASTER_COLLISION_RADIUS: f32 = 0.5;
pub const TORPEDO_COLLISION_RADIUS: f32 = 1.0;
pub const SLUG_COLLISION_RADIUS: f32 = 0.25;

/// Speed given to a roster Blaster or Torpedo that omits a usable speed.
pub const FALLBACK_BULLET_SPEED: f32 = 300.0;

/// Slug alpha lost per second. Alpha starts at 1.0.
pub const SLUG_FADE_PER_SEC: f32 = 2.0;

// --- Targeting ---

/// Turn rate per tick = speed * TURN_RATE_FACTOR * dt (radians).
pub const TURN_RATE_FACTOR: f32 = 0.02;

/// Half-angle of the auto-aim and target-lock cone (degrees).
pub const AIM_CONE_HALF_ANGLE_DEG: f32 = 15.0;

/// Tolerance on the cone cosine so the boundary is inclusive.
pub const AIM_CONE_EPSILON: f32 = 1e-6;

/// Fixed-point iterations for lead prediction.
pub const LEAD_ITERATIONS: usize = 10;

// --- Player ---

pub const PLAYER_MAX_WEAPONS: usize = 3;
pub const PLAYER_MIN_SPEED: f32 = 20.0;
pub const PLAYER_DEFAULT_SPEED: f32 = 60.0;
pub const PLAYER_THROTTLE_ACCEL: f32 = 40.0;

/// Rotation rates at full stick deflection (rad/s).
pub const PLAYER_PITCH_RATE: f32 = 1.5;
pub const PLAYER_YAW_RATE: f32 = 1.0;
pub const PLAYER_ROLL_RATE: f32 = 2.5;

/// Distance ahead of the player's center where bullets spawn.
pub const MUZZLE_OFFSET: f32 = 6.0;

pub const PLAYER_MAX_ENERGY: f32 = 100.0;
pub const PLAYER_ENERGY_REGEN: f32 = 12.0;

/// Callsign reserved for the player. Enemies count up from 1.
pub const PLAYER_CALLSIGN: u32 = 0;

// --- Enemies ---

/// Enemies spawn on a shell around the player between these radii.
pub const ENEMY_SPAWN_MIN_RADIUS: f32 = 400.0;
pub const ENEMY_SPAWN_MAX_RADIUS: f32 = 700.0;
