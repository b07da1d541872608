//! Hardware Abstraction Layer (HAL) for the oscilloscope clock
//!
//! This crate provides trait-based abstractions for the handful of hardware
//! primitives the analog output driver needs, so that the driver can be
//! developed and tested without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Waveform generation (out of tree)
//!         ↓
//! Analog output driver (fastdac crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (memory-mapped registers, critical-section impl)
//! ```
//!
//! # Abstractions
//!
//! - [`RegisterBus`] - 32-bit memory-mapped register access
//! - [`Field`] - register bitfield arithmetic
//! - [`SessionGuard`] - optional exclusive access for a register session
//! - [`PinConfigurator`] - digital input configuration
//! - [`ActiveLow`] - pulled-up button reads on top of `embedded-hal`
//! - [`config`] - board constants (axis ranges, pin layouts)
//!
//! # Features
//!
//! - `std`: Enable host mocks ([`mocks`]) for downstream tests
//! - `hardware`: Physical hardware implementation of [`RegisterBus`] ([`Mmio`])
//! - `defmt`: Enable defmt formatting of platform types
//!
//! # Example
//!
//! ```
//! use platform::{Field, RegisterBus};
//!
//! fn set_level<B: RegisterBus>(bus: &mut B, addr: u32, level: u32) {
//!     bus.write_field(addr, Field::new(0xFF, 19), level);
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod gpio;
pub mod guard;
pub mod input;
pub mod mmio;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export main traits
pub use gpio::{GpioNum, PinConfigurator, Pull};
pub use guard::{CriticalSectionGuard, NoGuard, SessionGuard};
pub use mmio::{Field, RegisterBus};

#[cfg(feature = "hardware")]
pub use mmio::Mmio;

// Re-export input and board types
pub use config::{PinLayout, AXIS_MAX_X, AXIS_MAX_Y};
pub use error::{ChannelError, GpioError};
pub use input::{ActiveLow, Button, Direction};
