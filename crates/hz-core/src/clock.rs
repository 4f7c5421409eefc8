use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Source of the holds that pace the animation.
///
/// Every frame is held by calling [`Clock::sleep`]; swapping the clock is
/// how tests observe hold durations without waiting for them.
///
/// Shared by the render thread and the fan-out lanes, hence `Send + Sync`.
pub trait Clock: Send + Sync {
    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that never blocks and records every hold it is asked for.
///
/// Every field is atomic or behind a mutex, so one clock can be shared by
/// all fan-out lanes.
///
/// # Example
/// ```
/// use hz_core::clock::{Clock, ManualClock};
/// use std::time::Duration;
/// let clock = ManualClock::new();
/// clock.sleep(Duration::from_millis(90));
/// clock.sleep(Duration::from_millis(150));
/// assert_eq!(clock.count(), 2);
/// assert_eq!(clock.elapsed(), Duration::from_millis(240));
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    /// Total virtual time, in microseconds.
    elapsed_us: AtomicU64,
    /// Number of holds seen.
    count: AtomicUsize,
    /// Every hold, in call order.
    holds: Mutex<Vec<Duration>>,
}

impl ManualClock {
    /// Fresh clock at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time accumulated by all holds.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_us.load(Ordering::Relaxed))
    }

    /// Number of holds recorded so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Copy of every hold, in call order.
    #[must_use]
    pub fn holds(&self) -> Vec<Duration> {
        self.holds
            .lock()
            .map(|h| h.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Clock for ManualClock {
    fn sleep(&self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        self.elapsed_us.fetch_add(micros, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        match self.holds.lock() {
            Ok(mut holds) => holds.push(duration),
            Err(poisoned) => poisoned.into_inner().push(duration),
        }
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    #[inline]
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}
