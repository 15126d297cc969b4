//! Hardware reset through the chip's `/RESET` line.
//!
//! A reset returns the chip to its power-on state, which includes `IOCON.BANK = 0`.  Reset
//! before initializing a session, never underneath a live one.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::Smbus;

/// `IODIRA` and `GPIOA` in the power-on layout.
const IODIRA: u8 = 0x00;
const GPIOA: u8 = 0x12;

/// Pulse `line` until the chip reports its power-on register values.
///
/// Each attempt drives the line low, waits, drives it high, waits again and then reads
/// `IODIRA` and `GPIOA`.  The wait starts at 1 µs and grows by 1 µs per attempt; the loop ends
/// once `IODIRA == 0xFF` and `GPIOA == 0x00`.  There is no attempt limit.
///
/// Returns the number of attempts that were needed.
pub fn hardware_reset<S, P, D>(
    bus: &mut S,
    address: u8,
    line: &mut P,
    delay: &mut D,
) -> Result<u32, ResetError<S::Error, P::Error>>
where
    S: Smbus,
    P: OutputPin,
    D: DelayNs,
{
    bus.set_slave_address(address).map_err(ResetError::Bus)?;

    let mut attempts = 0;
    loop {
        attempts += 1;
        let wait_us = attempts;

        line.set_low().map_err(ResetError::Line)?;
        delay.delay_us(wait_us);
        line.set_high().map_err(ResetError::Line)?;
        delay.delay_us(wait_us);

        let iodir = bus.read_byte_data(IODIRA).map_err(ResetError::Bus)?;
        let gpio = bus.read_byte_data(GPIOA).map_err(ResetError::Bus)?;
        if iodir == 0xff && gpio == 0x00 {
            log::debug!("reset took {attempts} attempts");
            return Ok(attempts);
        }
        log::trace!("reset attempt {attempts}: IODIRA=0x{iodir:02x} GPIOA=0x{gpio:02x}");
    }
}

/// Failure of [`hardware_reset`].
#[derive(Debug)]
pub enum ResetError<E, L> {
    /// Reading the chip failed
    Bus(E),
    /// Driving the reset line failed
    Line(L),
}

impl<E: core::fmt::Debug, L: core::fmt::Debug> core::fmt::Display for ResetError<E, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ResetError::Bus(e) => write!(f, "bus error during reset: {e:?}"),
            ResetError::Line(e) => write!(f, "reset line error: {e:?}"),
        }
    }
}

impl<E: core::fmt::Debug, L: core::fmt::Debug> std::error::Error for ResetError<E, L> {}

#[cfg(feature = "linux")]
pub use self::linux::{LineError, StdDelay, SysfsResetLine, DEFAULT_RESET_LINE};

#[cfg(feature = "linux")]
mod linux {
    use std::time::Duration;

    use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

    /// GPIO4, the line the reset is wired to on the usual Raspberry Pi hookup.
    pub const DEFAULT_RESET_LINE: u64 = 4;

    /// A `/RESET` line driven through the sysfs GPIO interface.
    ///
    /// The line is exported on creation and unexported on drop.
    pub struct SysfsResetLine {
        pin: sysfs_gpio::Pin,
    }

    impl SysfsResetLine {
        pub fn export(line: u64) -> Result<Self, LineError> {
            let pin = sysfs_gpio::Pin::new(line);
            pin.export().map_err(LineError)?;
            // udev needs a moment to set permissions on the freshly exported files.
            std::thread::sleep(Duration::from_millis(200));
            pin.set_direction(sysfs_gpio::Direction::Out)
                .map_err(LineError)?;
            log::debug!("exported reset line gpio{line}");
            Ok(Self { pin })
        }
    }

    impl Drop for SysfsResetLine {
        fn drop(&mut self) {
            if let Err(e) = self.pin.unexport() {
                log::warn!("unexport gpio{}: {}", self.pin.get_pin_num(), e);
            }
        }
    }

    impl ErrorType for SysfsResetLine {
        type Error = LineError;
    }

    impl OutputPin for SysfsResetLine {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.pin.set_value(0).map_err(LineError)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.pin.set_value(1).map_err(LineError)
        }
    }

    /// Failure on a sysfs GPIO line.
    #[derive(Debug)]
    pub struct LineError(pub sysfs_gpio::Error);

    impl core::fmt::Display for LineError {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "gpio: {}", self.0)
        }
    }

    impl std::error::Error for LineError {}

    impl embedded_hal::digital::Error for LineError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// [`DelayNs`](embedded_hal::delay::DelayNs) by putting the thread to sleep.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct StdDelay;

    impl embedded_hal::delay::DelayNs for StdDelay {
        fn delay_ns(&mut self, ns: u32) {
            std::thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HalBus;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    #[test]
    fn polls_until_power_on_values() {
        let expectations = [
            mock_i2c::Transaction::write_read(0x21, vec![0x00], vec![0x00]),
            mock_i2c::Transaction::write_read(0x21, vec![0x12], vec![0x04]),
            // IODIRA is back to 0xff but GPIOA still shows a driven pin
            mock_i2c::Transaction::write_read(0x21, vec![0x00], vec![0xff]),
            mock_i2c::Transaction::write_read(0x21, vec![0x12], vec![0x04]),
            mock_i2c::Transaction::write_read(0x21, vec![0x00], vec![0xff]),
            mock_i2c::Transaction::write_read(0x21, vec![0x12], vec![0x00]),
        ];
        let mut i2c = mock_i2c::Mock::new(&expectations);

        let pulses: Vec<_> = (0..3)
            .flat_map(|_| [PinTransaction::set(State::Low), PinTransaction::set(State::High)])
            .collect();
        let mut line = PinMock::new(&pulses);

        let mut bus = HalBus::new(i2c.clone());
        let attempts = hardware_reset(&mut bus, 0x21, &mut line, &mut NoopDelay::new()).unwrap();
        assert_eq!(attempts, 3);

        line.done();
        i2c.done();
    }

    #[test]
    fn bus_errors_end_the_loop() {
        let expectations = [mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0x00])
            .with_error(ErrorKind::Other)];
        let mut i2c = mock_i2c::Mock::new(&expectations);
        let mut line = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);

        let mut bus = HalBus::new(i2c.clone());
        let res = hardware_reset(&mut bus, 0x20, &mut line, &mut NoopDelay::new());
        assert!(matches!(res, Err(ResetError::Bus(ErrorKind::Other))));

        line.done();
        i2c.done();
    }
}
