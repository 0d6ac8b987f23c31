//! Millisecond time source for the tracker cadence.
//!
//! The counter is a wrapping `u32`, the same width as an Arduino-style
//! `millis()`. It rolls over after roughly 49.7 days, so every elapsed-time
//! computation must go through [`elapsed_ms`].

/// Monotonic millisecond counter that wraps at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Milliseconds from `since` to `now`, correct across a single rollover.
pub fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Clock backed by the embassy time driver.
#[cfg(feature = "esp32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "esp32")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the rollover
        embassy_time::Instant::now().as_millis() as u32
    }
}
