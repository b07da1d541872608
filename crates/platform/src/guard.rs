//! Session guards
//!
//! A register session (prepare … unprepare) may optionally run under an
//! exclusive guard so that no other execution context touches the shared
//! registers in between. The guard is a type parameter of the driver: pick
//! [`CriticalSectionGuard`] when other contexts write the same registers, or
//! [`NoGuard`] when the caller can guarantee exclusive use and wants the
//! guard to cost nothing.
//!
//! Unlike a scoped lock, acquisition and release are separate calls because
//! the session spans two driver calls.

use critical_section::RestoreState;

/// Exclusive access spanning an acquire/release pair.
pub trait SessionGuard {
    /// Enter the exclusive section. Must be paired with [`release`](Self::release).
    fn acquire(&mut self);

    /// Leave the exclusive section entered by the last [`acquire`](Self::acquire).
    fn release(&mut self);
}

/// Guard that does nothing; both calls inline away.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoGuard;

impl SessionGuard for NoGuard {
    #[inline(always)]
    fn acquire(&mut self) {}

    #[inline(always)]
    fn release(&mut self) {}
}

/// Guard backed by the global `critical-section` implementation.
///
/// On a single-core target this masks interrupts; on the dual-core ESP32 the
/// HAL's implementation additionally takes a cross-core spinlock. The restore
/// token is kept inside the guard between `acquire` and `release`.
#[derive(Default)]
pub struct CriticalSectionGuard {
    token: Option<RestoreState>,
}

impl core::fmt::Debug for CriticalSectionGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CriticalSectionGuard")
            .field("held", &self.is_held())
            .finish()
    }
}

impl CriticalSectionGuard {
    /// Create a guard that is not yet held.
    pub const fn new() -> Self {
        Self { token: None }
    }

    /// Whether the critical section is currently held through this guard.
    pub fn is_held(&self) -> bool {
        self.token.is_some()
    }
}

impl SessionGuard for CriticalSectionGuard {
    #[inline]
    fn acquire(&mut self) {
        if self.token.is_some() {
            return;
        }
        // SAFETY: the returned token is stored and handed back to `release`
        // exactly once, either from `release` or from `Drop`.
        let token = unsafe { critical_section::acquire() };
        self.token = Some(token);
    }

    #[inline]
    fn release(&mut self) {
        if let Some(token) = self.token.take() {
            // SAFETY: `token` came from the matching `acquire` above and has
            // not been released yet (`take` clears it).
            unsafe { critical_section::release(token) };
        }
    }
}

impl Drop for CriticalSectionGuard {
    fn drop(&mut self) {
        self.release();
    }
}
