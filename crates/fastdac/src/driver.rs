//! Fast dual-channel DAC driver
//!
//! The vector renderer streams tens of thousands of X/Y samples per frame, so
//! a sample must reach the pad register in a single store. The driver gets
//! there by splitting the work into three phases:
//!
//! 1. [`FastDac::initialize`] powers up both DAC pads once and configures the
//!    front-panel inputs.
//! 2. [`FastDac::prepare`] disables the cosine generator, parks both outputs at
//!    full scale and caches each pad register with its level field cleared.
//! 3. [`FastDac::write`] ORs the new level into the cached word and stores it.
//!    No read, no branch on register state.
//!
//! [`FastDac::unprepare`] closes the session. Nothing is restored; the outputs
//! keep the last written level.
//!
//! # Exclusive sessions
//!
//! Between `prepare` and `unprepare` the cached words are only valid while no
//! other context modifies the pad registers. Passing `use_guard = true` makes
//! the session run under the driver's [`SessionGuard`], which is acquired in
//! `prepare` and released in `unprepare`. Both calls of a session must pass
//! the same flag; [`FastDac::session`] ties them together.
//!
//! # Example
//!
//! ```
//! use fastdac::{Channel, FastDac};
//! use platform::mocks::{MockPins, MockRegisters};
//! use platform::NoGuard;
//!
//! let mut dac = FastDac::new(MockRegisters::new(), NoGuard);
//! dac.initialize(&mut MockPins::new())?;
//!
//! let mut session = dac.session(false);
//! session.write(Channel::One, 128);
//! session.write(Channel::Two, 64);
//! drop(session);
//! # Ok::<(), platform::GpioError>(())
//! ```

use platform::{
    CriticalSectionGuard, PinConfigurator, PinLayout, Pull, RegisterBus, SessionGuard,
};

use crate::channel::Channel;
use crate::registers::{
    DAC_FULL_SCALE, PDAC_DAC, PDAC_DAC_XPD_FORCE, PDAC_FUN_IE, PDAC_MUX_SEL, PDAC_RDE,
    PDAC_RUE, PDAC_XPD_DAC, RTC_IO_PAD_DAC1_REG, RTC_IO_PAD_DAC2_REG, SENS_SAR_DAC_CTRL1_REG,
    SENS_SAR_DAC_CTRL2_REG, SENS_SW_TONE_EN,
};

/// Dual-channel DAC driver.
///
/// `R` is the register bus (volatile MMIO on hardware, a mock in tests) and
/// `G` the guard used for sessions opened with `use_guard = true`.
pub struct FastDac<R, G = CriticalSectionGuard> {
    bus: R,
    guard: G,
    // Pad registers as last seen by `prepare`, level field cleared
    clean_dac1: u32,
    clean_dac2: u32,
    // Guard flag of the open session, `None` between sessions
    #[cfg(debug_assertions)]
    open_session: Option<bool>,
}

impl<R: RegisterBus, G: SessionGuard> FastDac<R, G> {
    /// Wrap a register bus and a session guard.
    ///
    /// Touches no hardware; call [`initialize`](Self::initialize) before the
    /// first session.
    pub fn new(bus: R, guard: G) -> Self {
        Self {
            bus,
            guard,
            clean_dac1: 0,
            clean_dac2: 0,
            #[cfg(debug_assertions)]
            open_session: None,
        }
    }

    /// Enable both DAC outputs and configure the front-panel inputs of the
    /// standard clock board.
    ///
    /// See [`initialize_with_layout`](Self::initialize_with_layout).
    pub fn initialize<P: PinConfigurator>(&mut self, pins: &mut P) -> Result<(), P::Error> {
        self.initialize_with_layout(pins, &PinLayout::STANDARD)
    }

    /// Enable both DAC outputs and configure the eight inputs of `layout` as
    /// pulled-up digital inputs.
    ///
    /// The DAC pads are enabled first, so they are live even if configuring
    /// an input fails. Pin configuration stops at the first error.
    pub fn initialize_with_layout<P: PinConfigurator>(
        &mut self,
        pins: &mut P,
        layout: &PinLayout,
    ) -> Result<(), P::Error> {
        for channel in Channel::ALL {
            self.enable_output(channel);
        }
        info!("DAC outputs enabled on GPIO25/GPIO26");

        if let Err(err) = pins.configure_inputs(layout.inputs(), Pull::Up) {
            warn!("front-panel input configuration failed");
            return Err(err);
        }
        info!("front-panel inputs configured");
        Ok(())
    }

    /// Hand a DAC pad to the RTC domain and power up its DAC.
    ///
    /// Idempotent. Leaves the output level untouched.
    pub fn enable_output(&mut self, channel: Channel) {
        let addr = channel.pad_register();
        self.bus.modify(addr, |v| {
            (v | PDAC_MUX_SEL) & !(PDAC_RUE | PDAC_RDE | PDAC_FUN_IE)
        });
        self.bus.set_bits(addr, PDAC_XPD_DAC | PDAC_DAC_XPD_FORCE);
        debug!("DAC{} pad enabled", channel.number());
    }

    /// Open a write session.
    ///
    /// With `use_guard` the session guard is acquired first and held until
    /// [`unprepare`](Self::unprepare). Then the cosine generator is disabled
    /// for both channels, both outputs are set to full scale and the pad
    /// registers are snapshotted for [`write`](Self::write).
    pub fn prepare(&mut self, use_guard: bool) {
        self.open(use_guard);
        if use_guard {
            self.guard.acquire();
        }

        self.bus.clear_bits(SENS_SAR_DAC_CTRL1_REG, SENS_SW_TONE_EN);
        self.bus.clear_bits(
            SENS_SAR_DAC_CTRL2_REG,
            Channel::One.tone_enable_bit() | Channel::Two.tone_enable_bit(),
        );

        for channel in Channel::ALL {
            self.bus
                .write_field(channel.pad_register(), PDAC_DAC, DAC_FULL_SCALE);
        }

        self.clean_dac1 = PDAC_DAC.clear(self.bus.read(RTC_IO_PAD_DAC1_REG));
        self.clean_dac2 = PDAC_DAC.clear(self.bus.read(RTC_IO_PAD_DAC2_REG));
        trace!("DAC session opened (guarded: {})", use_guard);
    }

    /// Set the output level of `channel`.
    ///
    /// Only the low 8 bits of `value` are used. Performs exactly one register
    /// store and no load. Must be called inside a session.
    #[inline(always)]
    pub fn write(&mut self, channel: Channel, value: u32) {
        match channel {
            Channel::One => self.write_channel1(value),
            Channel::Two => self.write_channel2(value),
        }
    }

    /// [`write`](Self::write) to channel 1 without the channel dispatch.
    #[inline(always)]
    pub fn write_channel1(&mut self, value: u32) {
        self.assert_open();
        self.bus
            .write(RTC_IO_PAD_DAC1_REG, self.clean_dac1 | PDAC_DAC.insert(value));
    }

    /// [`write`](Self::write) to channel 2 without the channel dispatch.
    #[inline(always)]
    pub fn write_channel2(&mut self, value: u32) {
        self.assert_open();
        self.bus
            .write(RTC_IO_PAD_DAC2_REG, self.clean_dac2 | PDAC_DAC.insert(value));
    }

    /// Close the session opened by [`prepare`](Self::prepare).
    ///
    /// `use_guard` must match the flag passed to `prepare`; with it set the
    /// session guard is released. Registers are left as they are.
    pub fn unprepare(&mut self, use_guard: bool) {
        self.close(use_guard);
        if use_guard {
            self.guard.release();
        }
        trace!("DAC session closed (guarded: {})", use_guard);
    }

    /// Open a session that closes itself when dropped.
    pub fn session(&mut self, use_guard: bool) -> Session<'_, R, G> {
        self.prepare(use_guard);
        Session {
            dac: self,
            use_guard,
        }
    }

    /// Pad register word cached for `channel` by the last `prepare`, level
    /// field cleared. Zero before the first session.
    pub fn clean_value(&self, channel: Channel) -> u32 {
        match channel {
            Channel::One => self.clean_dac1,
            Channel::Two => self.clean_dac2,
        }
    }

    /// Release the bus and guard.
    pub fn into_parts(self) -> (R, G) {
        (self.bus, self.guard)
    }

    // Session bookkeeping. Misuse is a caller bug, so it is only checked in
    // debug builds and costs nothing in release.

    #[inline(always)]
    fn open(&mut self, use_guard: bool) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(
                self.open_session.is_none(),
                "prepare called while a DAC session is already open"
            );
            self.open_session = Some(use_guard);
        }
        #[cfg(not(debug_assertions))]
        let _ = use_guard;
    }

    #[inline(always)]
    fn close(&mut self, use_guard: bool) {
        #[cfg(debug_assertions)]
        {
            let opened = self.open_session.take();
            debug_assert!(opened.is_some(), "unprepare called without prepare");
            debug_assert!(
                opened.is_none() || opened == Some(use_guard),
                "unprepare guard flag does not match prepare"
            );
        }
        #[cfg(not(debug_assertions))]
        let _ = use_guard;
    }

    #[inline(always)]
    fn assert_open(&self) {
        #[cfg(debug_assertions)]
        debug_assert!(
            self.open_session.is_some(),
            "DAC write outside a prepare/unprepare session"
        );
    }
}

impl<R, G> core::fmt::Debug for FastDac<R, G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FastDac")
            .field("clean_dac1", &format_args!("{:#010x}", self.clean_dac1))
            .field("clean_dac2", &format_args!("{:#010x}", self.clean_dac2))
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "hardware")]
impl<G: SessionGuard> FastDac<platform::Mmio, G> {
    /// Driver on the real ESP32 registers.
    ///
    /// # Safety
    ///
    /// At most one `FastDac` may exist, and nothing else may write the DAC
    /// pad or SENS DAC control registers outside a guarded session.
    pub unsafe fn steal(guard: G) -> Self {
        // SAFETY: forwarded to the caller.
        Self::new(unsafe { platform::Mmio::steal() }, guard)
    }
}

/// An open DAC session.
///
/// Created by [`FastDac::session`]. Dropping it runs
/// [`FastDac::unprepare`] with the flag the session was opened with.
pub struct Session<'a, R: RegisterBus, G: SessionGuard> {
    dac: &'a mut FastDac<R, G>,
    use_guard: bool,
}

impl<R: RegisterBus, G: SessionGuard> Session<'_, R, G> {
    /// See [`FastDac::write`].
    #[inline(always)]
    pub fn write(&mut self, channel: Channel, value: u32) {
        self.dac.write(channel, value);
    }

    /// See [`FastDac::write_channel1`].
    #[inline(always)]
    pub fn write_channel1(&mut self, value: u32) {
        self.dac.write_channel1(value);
    }

    /// See [`FastDac::write_channel2`].
    #[inline(always)]
    pub fn write_channel2(&mut self, value: u32) {
        self.dac.write_channel2(value);
    }

    /// Whether this session holds the guard.
    pub fn is_guarded(&self) -> bool {
        self.use_guard
    }
}

impl<R: RegisterBus, G: SessionGuard> Drop for Session<'_, R, G> {
    fn drop(&mut self) {
        self.dac.unprepare(self.use_guard);
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::{Event, MockGuard, MockPins, MockRegisters};
    use platform::{GpioError, GpioNum, NoGuard};

    // Pad word with the DAC powered and routed, plus the sleep-mode select
    // bit 14 that the driver must carry through untouched.
    const PAD_IDLE: u32 = PDAC_XPD_DAC | PDAC_MUX_SEL | PDAC_DAC_XPD_FORCE | (1 << 14);

    fn prepared(regs: &MockRegisters) -> FastDac<MockRegisters, NoGuard> {
        let mut dac = FastDac::new(regs.clone(), NoGuard);
        dac.prepare(false);
        regs.log().clear();
        dac
    }

    #[test]
    fn test_new_touches_nothing() {
        let regs = MockRegisters::new();
        let dac = FastDac::new(regs.clone(), NoGuard);
        assert!(regs.log().is_empty());
        assert_eq!(dac.clean_value(Channel::One), 0);
        assert_eq!(dac.clean_value(Channel::Two), 0);
    }

    #[test]
    fn test_enable_output_sets_power_and_mux() {
        let regs = MockRegisters::new().preset(RTC_IO_PAD_DAC1_REG, PDAC_RUE | PDAC_FUN_IE);
        let mut dac = FastDac::new(regs.clone(), NoGuard);
        dac.enable_output(Channel::One);

        let pad = regs.peek(RTC_IO_PAD_DAC1_REG);
        assert_eq!(pad & (PDAC_RUE | PDAC_RDE | PDAC_FUN_IE), 0);
        assert_eq!(
            pad & (PDAC_MUX_SEL | PDAC_XPD_DAC | PDAC_DAC_XPD_FORCE),
            PDAC_MUX_SEL | PDAC_XPD_DAC | PDAC_DAC_XPD_FORCE
        );
        // Channel 2 untouched
        assert_eq!(regs.peek(RTC_IO_PAD_DAC2_REG), 0);
    }

    #[test]
    fn test_enable_output_keeps_level() {
        let level = PDAC_DAC.insert(0x5A);
        let regs = MockRegisters::new().preset(RTC_IO_PAD_DAC2_REG, level);
        let mut dac = FastDac::new(regs.clone(), NoGuard);
        dac.enable_output(Channel::Two);
        assert_eq!(PDAC_DAC.extract(regs.peek(RTC_IO_PAD_DAC2_REG)), 0x5A);
    }

    #[test]
    fn test_initialize_configures_standard_inputs() {
        let regs = MockRegisters::new();
        let mut pins = MockPins::new();
        let mut dac = FastDac::new(regs.clone(), NoGuard);

        assert!(dac.initialize(&mut pins).is_ok());
        let configured: Vec<(u8, Pull)> = pins
            .configured()
            .iter()
            .map(|(pin, pull)| (pin.number(), *pull))
            .collect();
        assert_eq!(
            configured,
            [15u8, 13, 12, 14, 16, 17, 18, 19].map(|n| (n, Pull::Up))
        );
    }

    #[test]
    fn test_initialize_reports_pin_error_after_enabling_dacs() {
        let regs = MockRegisters::new();
        let mut pins = MockPins::failing_on(GpioNum::from_const(12));
        let mut dac = FastDac::new(regs.clone(), NoGuard);

        assert_eq!(dac.initialize(&mut pins), Err(GpioError::FlashPin(12)));
        assert_ne!(regs.peek(RTC_IO_PAD_DAC1_REG) & PDAC_XPD_DAC, 0);
        assert_ne!(regs.peek(RTC_IO_PAD_DAC2_REG) & PDAC_XPD_DAC, 0);
    }

    #[test]
    fn test_prepare_disables_tone_generator() {
        let regs = MockRegisters::new()
            .preset(SENS_SAR_DAC_CTRL1_REG, SENS_SW_TONE_EN | 0xFF)
            .preset(SENS_SAR_DAC_CTRL2_REG, u32::MAX);
        let mut dac = FastDac::new(regs.clone(), NoGuard);
        dac.prepare(false);

        assert_eq!(regs.peek(SENS_SAR_DAC_CTRL1_REG), 0xFF);
        assert_eq!(
            regs.peek(SENS_SAR_DAC_CTRL2_REG),
            !(Channel::One.tone_enable_bit() | Channel::Two.tone_enable_bit())
        );
        dac.unprepare(false);
    }

    #[test]
    fn test_prepare_sets_full_scale_and_snapshots() {
        let regs = MockRegisters::new()
            .preset(RTC_IO_PAD_DAC1_REG, PAD_IDLE | PDAC_DAC.insert(3))
            .preset(RTC_IO_PAD_DAC2_REG, PAD_IDLE);
        let mut dac = FastDac::new(regs.clone(), NoGuard);
        dac.prepare(false);

        for channel in Channel::ALL {
            let pad = regs.peek(channel.pad_register());
            assert_eq!(PDAC_DAC.extract(pad), DAC_FULL_SCALE);
            assert_eq!(dac.clean_value(channel), PAD_IDLE);
        }
        dac.unprepare(false);
    }

    #[test]
    fn test_write_is_a_single_store() {
        let regs = MockRegisters::new()
            .preset(RTC_IO_PAD_DAC1_REG, PAD_IDLE)
            .preset(RTC_IO_PAD_DAC2_REG, PAD_IDLE);
        let mut dac = prepared(&regs);

        dac.write(Channel::One, 128);
        assert_eq!(
            regs.log().events(),
            [Event::Write {
                addr: RTC_IO_PAD_DAC1_REG,
                value: PAD_IDLE | (128 << 19),
            }]
        );
        dac.unprepare(false);
    }

    #[test]
    fn test_write_truncates_to_eight_bits() {
        let regs = MockRegisters::new().preset(RTC_IO_PAD_DAC2_REG, PAD_IDLE);
        let mut dac = prepared(&regs);

        dac.write(Channel::Two, 300);
        assert_eq!(PDAC_DAC.extract(regs.peek(RTC_IO_PAD_DAC2_REG)), 44);
        assert_eq!(PDAC_DAC.clear(regs.peek(RTC_IO_PAD_DAC2_REG)), PAD_IDLE);
        dac.unprepare(false);
    }

    #[test]
    fn test_write_uses_snapshot_not_live_register() {
        let regs = MockRegisters::new().preset(RTC_IO_PAD_DAC1_REG, PAD_IDLE);
        let mut dac = prepared(&regs);

        // Someone flips a bit behind the driver's back mid-session.
        regs.poke(RTC_IO_PAD_DAC1_REG, PAD_IDLE | PDAC_RUE);
        dac.write_channel1(7);
        assert_eq!(regs.peek(RTC_IO_PAD_DAC1_REG), PAD_IDLE | PDAC_DAC.insert(7));
        dac.unprepare(false);
    }

    #[test]
    fn test_reprepare_refreshes_snapshot() {
        let regs = MockRegisters::new().preset(RTC_IO_PAD_DAC1_REG, PAD_IDLE);
        let mut dac = FastDac::new(regs.clone(), NoGuard);
        dac.prepare(false);
        dac.unprepare(false);

        regs.poke(RTC_IO_PAD_DAC1_REG, PAD_IDLE | PDAC_RDE);
        dac.prepare(false);
        assert_eq!(dac.clean_value(Channel::One), PAD_IDLE | PDAC_RDE);
        dac.unprepare(false);
    }

    #[test]
    fn test_unprepare_leaves_registers() {
        let regs = MockRegisters::new().preset(RTC_IO_PAD_DAC1_REG, PAD_IDLE);
        let mut dac = prepared(&regs);
        dac.write_channel1(90);
        let before = regs.peek(RTC_IO_PAD_DAC1_REG);
        regs.log().clear();

        dac.unprepare(false);
        assert!(regs.log().is_empty());
        assert_eq!(regs.peek(RTC_IO_PAD_DAC1_REG), before);
    }

    #[test]
    fn test_guard_held_for_whole_session() {
        let guard = MockGuard::new();
        let mut dac = FastDac::new(MockRegisters::new(), guard.clone());

        dac.prepare(true);
        assert!(guard.is_held());
        dac.write_channel2(1);
        assert!(guard.is_held());
        dac.unprepare(true);
        assert!(!guard.is_held());
        assert_eq!((guard.acquisitions(), guard.releases()), (1, 1));
    }

    #[test]
    fn test_unguarded_session_skips_guard() {
        let guard = MockGuard::new();
        let mut dac = FastDac::new(MockRegisters::new(), guard.clone());
        dac.prepare(false);
        dac.write_channel1(1);
        dac.unprepare(false);
        assert_eq!(guard.acquisitions(), 0);
        assert_eq!(guard.releases(), 0);
    }

    #[test]
    fn test_session_unprepares_on_drop() {
        let guard = MockGuard::new();
        let regs = MockRegisters::new();
        let mut dac = FastDac::new(regs.clone(), guard.clone());
        {
            let mut session = dac.session(true);
            assert!(session.is_guarded());
            session.write(Channel::One, 10);
            session.write(Channel::Two, 20);
            assert!(guard.is_held());
        }
        assert!(!guard.is_held());
        assert_eq!(PDAC_DAC.extract(regs.peek(RTC_IO_PAD_DAC1_REG)), 10);
        assert_eq!(PDAC_DAC.extract(regs.peek(RTC_IO_PAD_DAC2_REG)), 20);

        // A closed session can be followed by a new one.
        dac.prepare(false);
        dac.unprepare(false);
    }

    #[test]
    fn test_into_parts_returns_bus() {
        let regs = MockRegisters::new();
        let mut dac = FastDac::new(regs.clone(), NoGuard);
        dac.prepare(false);
        dac.write_channel1(1);
        dac.unprepare(false);
        let (bus, NoGuard) = dac.into_parts();
        assert_eq!(bus.peek(RTC_IO_PAD_DAC1_REG), PDAC_DAC.insert(1));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside a prepare/unprepare session")]
    fn test_write_without_prepare_panics_in_debug() {
        let mut dac = FastDac::new(MockRegisters::new(), NoGuard);
        dac.write_channel1(1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "without prepare")]
    fn test_unprepare_without_prepare_panics_in_debug() {
        let mut dac = FastDac::new(MockRegisters::new(), NoGuard);
        dac.unprepare(false);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not match")]
    fn test_mismatched_guard_flag_panics_in_debug() {
        let mut dac = FastDac::new(MockRegisters::new(), NoGuard);
        dac.prepare(true);
        dac.unprepare(false);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "already open")]
    fn test_nested_prepare_panics_in_debug() {
        let mut dac = FastDac::new(MockRegisters::new(), NoGuard);
        dac.prepare(false);
        dac.prepare(false);
    }
}
