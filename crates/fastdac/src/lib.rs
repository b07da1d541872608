//! Fast DAC driver for the ESP32 oscilloscope clock
//!
//! Drives the X and Y deflection of an analog oscilloscope from the ESP32's
//! two 8-bit DACs, fast enough to trace vector graphics sample by sample.
//!
//! # Architecture
//!
//! ```text
//! Waveform generation (out of tree)
//!         ↓
//! FastDac (driver: sessions, single-store writes)
//!         ↓
//! Platform HAL (RegisterBus, SessionGuard, PinConfigurator)
//!         ↓
//! Hardware (volatile MMIO, critical-section impl) or host mocks
//! ```
//!
//! # Usage
//!
//! ```
//! use fastdac::{Channel, Esp32Gpio, FastDac};
//! use platform::mocks::{MockGuard, MockRegisters};
//!
//! let regs = MockRegisters::new();
//! let mut dac = FastDac::new(regs.clone(), MockGuard::new());
//! dac.initialize(&mut Esp32Gpio::new(regs.clone()))?;
//!
//! dac.prepare(true);
//! for x in 0..=255 {
//!     dac.write_channel1(x);
//!     dac.write(Channel::Two, 255 - x);
//! }
//! dac.unprepare(true);
//! # Ok::<(), platform::GpioError>(())
//! ```
//!
//! # Features
//!
//! - `hardware` - Volatile MMIO bus and [`FastDac::steal`] for the ESP32
//! - `std` - Re-enable the platform host mocks for downstream tests
//! - `defmt` - Log through defmt (target)
//! - `tracing` - Log through tracing (host)
//!
//! # Build
//!
//! ```bash
//! cargo +esp build --release -p fastdac --features hardware,defmt \
//!     --target xtensa-esp32-none-elf -Zbuild-std=core
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer defmt/tracing over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::inline_always)] // the write path must inline into the sample loop

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
pub mod driver;
pub mod gpio;
pub mod registers;

pub use channel::Channel;
pub use driver::{FastDac, Session};
pub use gpio::Esp32Gpio;

// Re-export the HAL types that appear in this crate's signatures
pub use platform::{
    ChannelError, CriticalSectionGuard, GpioError, GpioNum, NoGuard, PinConfigurator,
    PinLayout, Pull, RegisterBus, SessionGuard,
};
