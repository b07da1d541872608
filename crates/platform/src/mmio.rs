//! Memory-mapped register access
//!
//! Everything the analog output driver does to the chip is a 32-bit load or
//! store at a fixed peripheral address. [`RegisterBus`] abstracts those two
//! primitives so the same driver code runs against real MMIO ([`Mmio`]) and
//! against [`crate::mocks::MockRegisters`] on the host.

/// A bitfield inside a 32-bit register.
///
/// `mask` is right-aligned (e.g. `0xFF` for an 8-bit field) and `shift` is the
/// position of the field's least significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Right-aligned value mask
    pub mask: u32,
    /// Bit position of the field's LSB
    pub shift: u32,
}

impl Field {
    /// Describe a field of `mask` bits starting at bit `shift`.
    pub const fn new(mask: u32, shift: u32) -> Self {
        Self { mask, shift }
    }

    /// The field's bits in register position.
    #[inline(always)]
    pub const fn in_place_mask(self) -> u32 {
        self.mask.wrapping_shl(self.shift)
    }

    /// Truncate `value` to the field width and move it into position.
    ///
    /// High-order bits beyond the field width are discarded.
    #[inline(always)]
    pub const fn insert(self, value: u32) -> u32 {
        (value & self.mask).wrapping_shl(self.shift)
    }

    /// Read the field out of a register word.
    #[inline(always)]
    pub const fn extract(self, reg: u32) -> u32 {
        reg.wrapping_shr(self.shift) & self.mask
    }

    /// `reg` with the field zeroed and every other bit preserved.
    #[inline(always)]
    pub const fn clear(self, reg: u32) -> u32 {
        reg & !self.in_place_mask()
    }

    /// `reg` with the field replaced by `value` (truncated to the field width).
    #[inline(always)]
    pub const fn replace(self, reg: u32, value: u32) -> u32 {
        self.clear(reg) | self.insert(value)
    }
}

/// 32-bit memory-mapped register access.
///
/// Only [`read`](Self::read) and [`write`](Self::write) are required; the
/// read-modify-write helpers are built on top of them. Callers that must not
/// pay for a read (the DAC hot path) use `write` directly.
pub trait RegisterBus {
    /// Load the register at `addr`.
    fn read(&self, addr: u32) -> u32;

    /// Store `value` into the register at `addr`.
    fn write(&mut self, addr: u32, value: u32);

    /// Read-modify-write the register at `addr`.
    #[inline]
    fn modify<F>(&mut self, addr: u32, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(addr);
        self.write(addr, f(value));
    }

    /// Set every bit of `mask`.
    #[inline]
    fn set_bits(&mut self, addr: u32, mask: u32) {
        self.modify(addr, |v| v | mask);
    }

    /// Clear every bit of `mask`.
    #[inline]
    fn clear_bits(&mut self, addr: u32, mask: u32) {
        self.modify(addr, |v| v & !mask);
    }

    /// Replace one bitfield, preserving all other bits.
    #[inline]
    fn write_field(&mut self, addr: u32, field: Field, value: u32) {
        self.modify(addr, |v| field.replace(v, value));
    }
}

/// Direct volatile access to the peripheral address space.
///
/// Zero-sized; every call compiles down to a single load or store.
#[cfg(feature = "hardware")]
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

#[cfg(feature = "hardware")]
impl Mmio {
    /// Obtain the MMIO bus.
    ///
    /// # Safety
    ///
    /// The caller must be running on the chip whose register map the
    /// addresses passed to this bus belong to, and must not create aliasing
    /// owners of the same registers outside a [`crate::SessionGuard`]
    /// discipline.
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

#[cfg(feature = "hardware")]
impl RegisterBus for Mmio {
    #[inline(always)]
    fn read(&self, addr: u32) -> u32 {
        // SAFETY: `Mmio` can only be obtained through `steal`, whose contract
        // guarantees `addr` is a valid, aligned peripheral register.
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    #[inline(always)]
    fn write(&mut self, addr: u32, value: u32) {
        // SAFETY: see `read`.
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, value) }
    }
}
