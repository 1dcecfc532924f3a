//! Bus ports: the electrical seam
//!
//! A port owns the wires and nothing else. One call per bus transaction:
//! already-positioned line bytes in, strobed transfer out. Planning
//! (nibble splitting) stays in `charpipe-core`; pacing (the settle delay)
//! stays in the dispatcher.

pub mod parallel;
pub mod serial;

pub use parallel::{Parallel4Port, Parallel8Port};
pub use serial::SerialPort;

use charpipe_core::frame::Register;

/// Strobe hold time on each edge, microseconds.
///
/// The controller itself needs well under a microsecond; 1 ms also covers
/// ribbon cabling and the serial shift-register path.
pub const STROBE_HOLD_US: u32 = 1_000;

/// Electrical failure while driving the bus. Fatal to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// A GPIO refused to drive
    Pin,
    /// The serial link failed mid-frame
    Link,
}

/// One bus transaction: present `lines`, address `register`, strobe.
#[allow(async_fn_in_trait)]
pub trait BusPort {
    async fn transfer(&mut self, register: Register, lines: u8) -> Result<(), BusFault>;
}

/// Port selected at boot from the bus configuration.
///
/// Keeps the dispatcher task monomorphic: one task signature covers all
/// three attachment modes.
pub enum AnyPort<P, S, D> {
    Parallel8(Parallel8Port<P, D>),
    Parallel4(Parallel4Port<P, D>),
    Serial(SerialPort<S, P, D>),
}

impl<P, S, D> BusPort for AnyPort<P, S, D>
where
    P: embedded_hal::digital::OutputPin,
    S: embedded_hal_async::spi::SpiBus,
    D: embedded_hal_async::delay::DelayNs,
{
    async fn transfer(&mut self, register: Register, lines: u8) -> Result<(), BusFault> {
        match self {
            AnyPort::Parallel8(port) => port.transfer(register, lines).await,
            AnyPort::Parallel4(port) => port.transfer(register, lines).await,
            AnyPort::Serial(port) => port.transfer(register, lines).await,
        }
    }
}
