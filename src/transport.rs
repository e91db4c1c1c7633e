//! Bus side of a transaction: a select line plus a blocking full-duplex
//! byte exchange.

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

use crate::error::Error;

pub trait BusTransport {
    type Error;

    /// Asserts the board's select line.
    fn select(&mut self) -> Result<(), Self::Error>;

    fn deselect(&mut self) -> Result<(), Self::Error>;

    /// Clocks `out` to the board and returns the byte clocked in during the
    /// same cycle.
    fn transfer_byte(&mut self, out: u8) -> Result<u8, Self::Error>;
}

/// [`BusTransport`] over an `embedded-hal` SPI bus and an active-low select
/// pin. Mode, clock rate and bit order are configured on `spi` beforehand.
#[derive(Debug)]
pub struct HalTransport<SPI, CS> {
    spi: SPI,
    select: CS,
}

impl<SPI, CS> HalTransport<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    pub fn new(spi: SPI, select: CS) -> Self {
        Self { spi, select }
    }

    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.select)
    }
}

fn bus_error<E: spi::Error>(e: E) -> Error {
    Error::Bus(e.kind())
}

fn pin_error<E: digital::Error>(e: E) -> Error {
    Error::Select(e.kind())
}

impl<SPI, CS> BusTransport for HalTransport<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    type Error = Error;

    fn select(&mut self) -> Result<(), Error> {
        self.select.set_low().map_err(pin_error)
    }

    fn deselect(&mut self) -> Result<(), Error> {
        // Let the last byte finish clocking. The board is released even if
        // the bus reports a fault.
        let flushed = self.spi.flush().map_err(bus_error);
        self.select.set_high().map_err(pin_error)?;
        flushed
    }

    fn transfer_byte(&mut self, out: u8) -> Result<u8, Error> {
        let mut word = [out];
        self.spi.transfer_in_place(&mut word).map_err(bus_error)?;
        Ok(word[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{InputPacket, OutputPacket};
    use crate::transaction::Servoshock;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::spi::ErrorType as SpiErrorType;

    /// Loopback bus that returns each byte inverted.
    #[derive(Default)]
    struct InvertingBus {
        sent: Vec<u8>,
        flushes: usize,
    }

    impl SpiErrorType for InvertingBus {
        type Error = spi::ErrorKind;
    }

    impl SpiBus<u8> for InvertingBus {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            words.iter_mut().for_each(|w| *w = 0xFF);
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            self.sent.extend_from_slice(words);
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
            self.sent.extend_from_slice(write);
            for (r, w) in read.iter_mut().zip(write) {
                *r = !w;
            }
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            self.sent.extend_from_slice(words);
            words.iter_mut().for_each(|w| *w = !*w);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Pin {
        levels: Vec<bool>,
    }

    impl PinErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.levels.push(true);
            Ok(())
        }
    }

    struct FailingBus;

    impl SpiErrorType for FailingBus {
        type Error = spi::ErrorKind;
    }

    impl SpiBus<u8> for FailingBus {
        fn read(&mut self, _: &mut [u8]) -> Result<(), Self::Error> {
            Err(spi::ErrorKind::Overrun)
        }

        fn write(&mut self, _: &[u8]) -> Result<(), Self::Error> {
            Err(spi::ErrorKind::Overrun)
        }

        fn transfer(&mut self, _: &mut [u8], _: &[u8]) -> Result<(), Self::Error> {
            Err(spi::ErrorKind::Overrun)
        }

        fn transfer_in_place(&mut self, _: &mut [u8]) -> Result<(), Self::Error> {
            Err(spi::ErrorKind::Overrun)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Err(spi::ErrorKind::Overrun)
        }
    }

    #[test]
    fn test_transfer_byte_is_full_duplex() {
        let mut transport = HalTransport::new(InvertingBus::default(), Pin::default());
        transport.select().unwrap();
        assert_eq!(transport.transfer_byte(0x0F).unwrap(), 0xF0);
        assert_eq!(transport.transfer_byte(0xCD).unwrap(), 0x32);
        transport.deselect().unwrap();

        let (bus, pin) = transport.release();
        assert_eq!(bus.sent, vec![0x0F, 0xCD]);
        assert_eq!(bus.flushes, 1);
        assert_eq!(pin.levels, vec![false, true]);
    }

    #[test]
    fn test_bus_error_kind_is_kept() {
        let mut transport = HalTransport::new(FailingBus, Pin::default());
        assert_eq!(
            transport.transfer_byte(0),
            Err(Error::Bus(spi::ErrorKind::Overrun))
        );
    }

    #[test]
    fn test_faulted_bus_still_releases_select() {
        let mut transport = HalTransport::new(FailingBus, Pin::default());
        transport.select().unwrap();
        assert_eq!(
            transport.deselect(),
            Err(Error::Bus(spi::ErrorKind::Overrun))
        );
        let (_, pin) = transport.release();
        assert_eq!(pin.levels, vec![false, true]);
    }

    #[test]
    fn test_failed_transaction_releases_select() {
        let mut board = Servoshock::new(HalTransport::new(FailingBus, Pin::default()));
        let mut input = InputPacket::new();
        assert_eq!(
            board.execute(&OutputPacket::new(), &mut input),
            Err(Error::Bus(spi::ErrorKind::Overrun))
        );
        let (_, pin) = board.release().release();
        assert_eq!(pin.levels, vec![false, true]);
    }
}
