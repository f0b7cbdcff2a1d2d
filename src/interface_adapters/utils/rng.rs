use crate::domain::PlayerId;
use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Returns a process-unique, monotonically increasing identifier for log correlation.
///
/// Seeded from the clock so ids from different runs rarely collide in aggregated logs.
pub fn rand_id() -> u64 {
    static COUNTER: OnceLock<AtomicU64> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| AtomicU64::new(now_nanos()));
    counter.fetch_add(1, Ordering::Relaxed)
}

/// Returns the next player id, starting at 1.
///
/// Kept small so it survives a round trip through a JavaScript number.
pub fn next_player_id() -> PlayerId {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = rand_id();
        let b = rand_id();
        assert!(b > a);

        let p = next_player_id();
        let q = next_player_id();
        assert!(q > p && p >= 1);
    }
}
