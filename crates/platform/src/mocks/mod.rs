//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits for use
//! in unit and integration tests. The register and guard mocks can share an
//! [`EventLog`], which records every bus access and guard transition together
//! with the thread that performed it, so tests can check ordering across
//! execution contexts.

#![cfg(any(test, feature = "std"))]

use std::collections::BTreeMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use crate::error::GpioError;
use crate::gpio::{GpioNum, PinConfigurator, Pull};
use crate::guard::SessionGuard;
use crate::mmio::RegisterBus;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking test thread must not hide the log from the others.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One recorded hardware interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Register load
    Read {
        /// Register address
        addr: u32,
        /// Value returned
        value: u32,
    },
    /// Register store
    Write {
        /// Register address
        addr: u32,
        /// Value stored
        value: u32,
    },
    /// Guard acquired
    Acquire,
    /// Guard released
    Release,
}

impl Event {
    /// Whether this is a register access (as opposed to a guard transition).
    pub fn is_bus_access(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Write { .. })
    }
}

/// An [`Event`] tagged with the thread that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Thread that performed the access
    pub thread: ThreadId,
    /// What happened
    pub event: Event,
}

/// Shared, append-only log of hardware interactions.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Arc<Mutex<Vec<Record>>>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event on behalf of the current thread.
    pub fn push(&self, event: Event) {
        lock(&self.records).push(Record {
            thread: thread::current().id(),
            event,
        });
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<Record> {
        lock(&self.records).clone()
    }

    /// Snapshot of all events so far, without thread tags.
    pub fn events(&self) -> Vec<Event> {
        lock(&self.records).iter().map(|r| r.event).collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        lock(&self.records).clear();
    }
}

/// Mock register file.
///
/// Unset registers read as zero. Clones share the same registers and log, so
/// one clone can be handed to a driver while the test keeps another.
#[derive(Debug, Clone, Default)]
pub struct MockRegisters {
    regs: Arc<Mutex<BTreeMap<u32, u32>>>,
    log: EventLog,
}

impl MockRegisters {
    /// Create a register file with every register reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a register file that records into an existing log.
    pub fn with_log(log: EventLog) -> Self {
        Self {
            regs: Arc::default(),
            log,
        }
    }

    /// Set a register's initial value.
    pub fn preset(self, addr: u32, value: u32) -> Self {
        self.poke(addr, value);
        self
    }

    /// Current value of a register, without recording a read.
    pub fn peek(&self, addr: u32) -> u32 {
        lock(&self.regs).get(&addr).copied().unwrap_or(0)
    }

    /// Change a register behind the driver's back (another context, or the
    /// hardware itself), without recording a write.
    pub fn poke(&self, addr: u32, value: u32) {
        lock(&self.regs).insert(addr, value);
    }

    /// The log this register file records into.
    pub fn log(&self) -> &EventLog {
        &self.log
    }
}

impl RegisterBus for MockRegisters {
    fn read(&self, addr: u32) -> u32 {
        let value = self.peek(addr);
        self.log.push(Event::Read { addr, value });
        value
    }

    fn write(&mut self, addr: u32, value: u32) {
        self.poke(addr, value);
        self.log.push(Event::Write { addr, value });
    }
}

#[derive(Debug, Default)]
struct GuardLock {
    held: Mutex<bool>,
    freed: Condvar,
}

/// Mock session guard with real mutual exclusion.
///
/// Clones share one lock, so two drivers on two threads holding clones of the
/// same `MockGuard` exclude each other exactly like a critical section would.
/// Acquire and release transitions are recorded in the guard's [`EventLog`].
#[derive(Debug, Clone, Default)]
pub struct MockGuard {
    lock: Arc<GuardLock>,
    log: EventLog,
}

impl MockGuard {
    /// Create an unheld guard with its own log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unheld guard that records into an existing log.
    pub fn with_log(log: EventLog) -> Self {
        Self {
            lock: Arc::default(),
            log,
        }
    }

    /// Whether any clone currently holds the guard.
    pub fn is_held(&self) -> bool {
        *lock(&self.lock.held)
    }

    /// Number of acquisitions recorded so far.
    pub fn acquisitions(&self) -> usize {
        self.log
            .events()
            .iter()
            .filter(|e| matches!(e, Event::Acquire))
            .count()
    }

    /// Number of releases recorded so far.
    pub fn releases(&self) -> usize {
        self.log
            .events()
            .iter()
            .filter(|e| matches!(e, Event::Release))
            .count()
    }
}

impl SessionGuard for MockGuard {
    fn acquire(&mut self) {
        let mut held = lock(&self.lock.held);
        while *held {
            held = self
                .lock
                .freed
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *held = true;
        // Logged while still holding the state mutex so the Acquire record
        // cannot be overtaken by another thread's Release.
        self.log.push(Event::Acquire);
    }

    fn release(&mut self) {
        let mut held = lock(&self.lock.held);
        self.log.push(Event::Release);
        *held = false;
        self.lock.freed.notify_one();
    }
}

/// Mock pin configurator that records every configured pin.
#[derive(Debug, Default)]
pub struct MockPins {
    configured: heapless::Vec<(GpioNum, Pull), 16>,
    fail_on: Option<GpioNum>,
}

impl MockPins {
    /// Create a configurator that accepts every pin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configurator that rejects `pin` with [`GpioError::FlashPin`].
    pub fn failing_on(pin: GpioNum) -> Self {
        Self {
            configured: heapless::Vec::new(),
            fail_on: Some(pin),
        }
    }

    /// Pins configured so far, in call order.
    pub fn configured(&self) -> &[(GpioNum, Pull)] {
        &self.configured
    }
}

impl PinConfigurator for MockPins {
    type Error = GpioError;

    fn configure_input(&mut self, pin: GpioNum, pull: Pull) -> Result<(), Self::Error> {
        if self.fail_on == Some(pin) {
            return Err(GpioError::FlashPin(pin.number()));
        }
        // Store pins for verification
        if self.configured.len() < self.configured.capacity() {
            let _ = self.configured.push((pin, pull));
        }
        Ok(())
    }
}
