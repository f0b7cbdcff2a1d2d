use std::{env, str::FromStr, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;
pub const NOTICE_CHANNEL_CAPACITY: usize = 32;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_TICK_RATE_HZ: u32 = 30;
const DEFAULT_BROADCAST_RATE_HZ: u32 = 20;
const DEFAULT_OBSTACLE_COUNT: usize = 80;

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

pub fn http_port() -> u16 {
    env_parse("ARENA_SERVER_PORT").unwrap_or(DEFAULT_PORT)
}

pub fn tick_interval() -> Duration {
    rate_to_interval(env_parse("ARENA_TICK_RATE_HZ").unwrap_or(DEFAULT_TICK_RATE_HZ))
}

pub fn broadcast_interval() -> Duration {
    rate_to_interval(env_parse("ARENA_BROADCAST_RATE_HZ").unwrap_or(DEFAULT_BROADCAST_RATE_HZ))
}

pub fn obstacle_count() -> usize {
    env_parse("ARENA_OBSTACLE_COUNT").unwrap_or(DEFAULT_OBSTACLE_COUNT)
}

/// Fixed RNG seed, when set. Unset means a fresh seed per run.
pub fn seed() -> Option<u64> {
    env_parse("ARENA_SEED")
}

// Zero would make the interval panic; treat it as 1 Hz.
fn rate_to_interval(hz: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1)))
}
