//! Wall-clock helper used to stamp session and presence timestamps.

/// Milliseconds since the Unix epoch.
///
/// Uses `Date.now()` in the browser and `SystemTime` elsewhere; a clock set
/// before the epoch yields `0`.
#[cfg_attr(feature = "hydrate", allow(clippy::cast_possible_truncation))]
pub fn now_ms() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(feature = "hydrate"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};

        let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
            return 0;
        };
        i64::try_from(dur.as_millis()).unwrap_or(0)
    }
}
