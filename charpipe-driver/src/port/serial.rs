//! Serial attachment port
//!
//! The payload is shifted out over SPI to an external register that fans
//! out to the display pins, so the strobe cannot be a GPIO edge. It rides
//! in a control byte instead: one transfer is two framed writes inside a
//! single chip-select window, strobe bit set then cleared, each followed
//! by the hold delay.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

use charpipe_core::frame::Register;

use super::{BusFault, BusPort, STROBE_HOLD_US};

/// Control byte bits understood by the shift-register glue
#[allow(dead_code)]
mod ctrl {
    /// Register select (set = data register)
    pub const REGISTER_DATA: u8 = 0b0000_0001;
    /// Read direction, never set here (write-only pipeline)
    pub const READ: u8 = 0b0000_0010;
    /// Strobe to the display's E input
    pub const STROBE: u8 = 0b0000_0100;
}

/// SPI bus plus chip select and the hold delay.
pub struct SerialPort<S, P, D> {
    spi: S,
    chip_select: P,
    delay: D,
}

impl<S, P, D> SerialPort<S, P, D>
where
    S: SpiBus,
    P: OutputPin,
    D: DelayNs,
{
    /// `chip_select` must start deasserted (high).
    pub fn new(spi: S, chip_select: P, delay: D) -> Self {
        Self {
            spi,
            chip_select,
            delay,
        }
    }

    async fn framed_write(&mut self, control: u8, lines: u8) -> Result<(), BusFault> {
        self.spi
            .write(&[control, lines])
            .await
            .map_err(|_| BusFault::Link)?;
        self.spi.flush().await.map_err(|_| BusFault::Link)?;
        self.delay.delay_us(STROBE_HOLD_US).await;
        Ok(())
    }

    /// Strobe set, then cleared, with the same lines in both frames.
    async fn strobed_frames(&mut self, control: u8, lines: u8) -> Result<(), BusFault> {
        self.framed_write(control | ctrl::STROBE, lines).await?;
        self.framed_write(control, lines).await
    }
}

impl<S, P, D> BusPort for SerialPort<S, P, D>
where
    S: SpiBus,
    P: OutputPin,
    D: DelayNs,
{
    async fn transfer(&mut self, register: Register, lines: u8) -> Result<(), BusFault> {
        let mut control = 0;
        if register == Register::Data {
            control |= ctrl::REGISTER_DATA;
        }

        self.chip_select.set_low().map_err(|_| BusFault::Pin)?;
        let framed = self.strobed_frames(control, lines).await;
        // Deassert even when the link failed mid-frame
        let deassert = self.chip_select.set_high().map_err(|_| BusFault::Pin);
        framed.and(deassert)
    }
}
