use std::{env, ops::Range, time::Duration};

// Runtime/network settings (env-overridable) and gameplay tuning constants.

pub fn ws_url() -> String {
    env::var("FISHBOWL_WS_URL").unwrap_or_else(|_| "ws://127.0.0.1:3001/ws".to_string())
}

pub fn api_url() -> String {
    env::var("FISHBOWL_API_URL").unwrap_or_else(|_| "http://127.0.0.1:3001".to_string())
}

pub fn request_timeout() -> Duration {
    let millis = env::var("FISHBOWL_REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(10_000);
    Duration::from_millis(millis)
}

// Battle tuning.
pub const COOLDOWN_DURATION: Duration = Duration::from_millis(7500);
pub const ELIMINATION_THRESHOLD: u32 = 4;
pub const VICTORY_MIN_HUMAN_COUNT: u32 = 5;
pub const DEFEAT_MAX_AI_COUNT: u32 = 5;
pub const MAX_HUMANS_KILLED: u32 = 3;

// Tank physics ranges used when randomizing missing item fields.
pub const BOUNDS_X: Range<f32> = 60.0..340.0;
pub const BOUNDS_Y: Range<f32> = 60.0..440.0;
pub const VELOCITY_VX: Range<f32> = 0.8..1.5;
pub const VELOCITY_VY: Range<f32> = -0.2..0.2;
pub const SCALE: Range<f32> = 0.8..1.2;
pub const ROTATION_DEGREES: Range<f32> = -5.0..5.0;

// Ephemeral UI queue bounds and lifetimes.
pub const MAX_TOASTS: usize = 5;
pub const MAX_FLOATING_DAMAGES: usize = 20;
pub const TOAST_DURATION: Duration = Duration::from_millis(2000);
pub const FLOATING_DAMAGE_DURATION: Duration = Duration::from_millis(1000);
pub const ATTACK_WARNING_DURATION: Duration = Duration::from_millis(5000);

// Housekeeping cadence for cooldown reload and queue expiry.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

// Reconnect policy for the sync client.
pub const RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_DELAY: Duration = Duration::from_millis(1000);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// Channel capacities.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
pub const NET_EVENT_CHANNEL_CAPACITY: usize = 256;
