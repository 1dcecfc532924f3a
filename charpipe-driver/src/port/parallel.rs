//! Parallel attachment ports
//!
//! Shared strobe discipline: data lines and RS settle first, RW stays
//! low, then E pulses high, hold, low, hold. The device latches on the
//! falling edge. The two widths differ only in how many data pins exist
//! and which payload bits they carry; that split already happened in the
//! encoder.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use charpipe_core::frame::Register;

use super::{BusFault, BusPort, STROBE_HOLD_US};

/// Full-byte bus: D0..D7 plus RS, RW, E.
pub struct Parallel8Port<P, D> {
    data: [P; 8],
    register_select: P,
    read_write: P,
    strobe: P,
    delay: D,
}

impl<P, D> Parallel8Port<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// `data` is D0..D7 in bit order.
    pub fn new(data: [P; 8], register_select: P, read_write: P, strobe: P, delay: D) -> Self {
        Self {
            data,
            register_select,
            read_write,
            strobe,
            delay,
        }
    }
}

impl<P, D> BusPort for Parallel8Port<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    async fn transfer(&mut self, register: Register, lines: u8) -> Result<(), BusFault> {
        present(&mut self.data, lines, 0)?;
        select_register(&mut self.register_select, register)?;
        self.read_write.set_low().map_err(|_| BusFault::Pin)?;
        pulse(&mut self.strobe, &mut self.delay).await
    }
}

/// Nibble bus: D4..D7 plus RS, RW, E. `lines` carries its payload in the
/// upper half, the way the encoder planned it.
pub struct Parallel4Port<P, D> {
    data: [P; 4],
    register_select: P,
    read_write: P,
    strobe: P,
    delay: D,
}

impl<P, D> Parallel4Port<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// `data` is D4..D7 in bit order.
    pub fn new(data: [P; 4], register_select: P, read_write: P, strobe: P, delay: D) -> Self {
        Self {
            data,
            register_select,
            read_write,
            strobe,
            delay,
        }
    }
}

impl<P, D> BusPort for Parallel4Port<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    async fn transfer(&mut self, register: Register, lines: u8) -> Result<(), BusFault> {
        present(&mut self.data, lines, 4)?;
        select_register(&mut self.register_select, register)?;
        self.read_write.set_low().map_err(|_| BusFault::Pin)?;
        pulse(&mut self.strobe, &mut self.delay).await
    }
}

/// Drive bits `offset..offset + N` of `lines` onto the data pins.
fn present<P: OutputPin, const N: usize>(
    data: &mut [P; N],
    lines: u8,
    offset: u8,
) -> Result<(), BusFault> {
    for (bit, pin) in data.iter_mut().enumerate() {
        let level = (lines >> (offset + bit as u8)) & 1 == 1;
        pin.set_state(PinState::from(level))
            .map_err(|_| BusFault::Pin)?;
    }
    Ok(())
}

fn select_register<P: OutputPin>(pin: &mut P, register: Register) -> Result<(), BusFault> {
    pin.set_state(PinState::from(register == Register::Data))
        .map_err(|_| BusFault::Pin)
}

async fn pulse<P: OutputPin, D: DelayNs>(strobe: &mut P, delay: &mut D) -> Result<(), BusFault> {
    strobe.set_high().map_err(|_| BusFault::Pin)?;
    delay.delay_us(STROBE_HOLD_US).await;
    strobe.set_low().map_err(|_| BusFault::Pin)?;
    delay.delay_us(STROBE_HOLD_US).await;
    Ok(())
}
