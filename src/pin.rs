use core::marker::PhantomData;
use embedded_hal::digital::{self as hal_digital, ErrorType};

use crate::{Bit, Error, Session, SessionMutex, Smbus};

/// Representation of one expander pin.
///
/// `Pin` is not constructed directly, this type is created by wrapping a session in an
/// [`Mcp23017`](crate::Mcp23017) and then getting access to all its pins using the `.split()`
/// method.  Every call locks the session once.
pub struct Pin<'a, MODE, MUTEX> {
    bit: Bit,
    session: &'a MUTEX,
    _m: PhantomData<MODE>,
}

impl<'a, MODE, MUTEX, S> Pin<'a, MODE, MUTEX>
where
    S: Smbus,
    MUTEX: SessionMutex<Session = Session<S>>,
{
    pub(crate) fn new(bit: Bit, session: &'a MUTEX) -> Self {
        Self {
            bit,
            session,
            _m: PhantomData,
        }
    }

    pub fn bit(&self) -> Bit {
        self.bit
    }

    pub fn into_input(self) -> Result<Pin<'a, crate::mode::Input, MUTEX>, Error<S::Error>> {
        let (a, b) = self.port_masks();
        self.session.lock(|s| s.set_input_pins(a, b))?;
        Ok(Pin::new(self.bit, self.session))
    }

    pub fn into_output(self) -> Result<Pin<'a, crate::mode::Output, MUTEX>, Error<S::Error>> {
        let (a, b) = self.port_masks();
        self.session.lock(|s| s.set_output_pins(a, b))?;
        Ok(Pin::new(self.bit, self.session))
    }

    fn port_masks(&self) -> (u8, u8) {
        match self.bit.port() {
            crate::Port::A => (self.bit.mask(), 0),
            crate::Port::B => (0, self.bit.mask()),
        }
    }
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, S> Pin<'a, MODE, MUTEX>
where
    S: Smbus,
    MUTEX: SessionMutex<Session = Session<S>>,
{
    /// Logic level on the pin, from the port's `GPIO` register.
    pub fn is_high(&self) -> Result<bool, Error<S::Error>> {
        let port = self.session.lock(|s| s.read_port(self.bit.port()))?;
        Ok(port & self.bit.mask() != 0)
    }

    pub fn is_low(&self) -> Result<bool, Error<S::Error>> {
        self.is_high().map(|b| !b)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, S> Pin<'a, MODE, MUTEX>
where
    S: Smbus,
    MUTEX: SessionMutex<Session = Session<S>>,
{
    pub fn set_high(&mut self) -> Result<(), Error<S::Error>> {
        self.session.lock(|s| s.set_bit(self.bit))
    }

    pub fn set_low(&mut self) -> Result<(), Error<S::Error>> {
        self.session.lock(|s| s.clear_bit(self.bit))
    }

    /// Latched output state, from the port's `OLAT` register.
    pub fn is_set_high(&self) -> Result<bool, Error<S::Error>> {
        let latch = self.session.lock(|s| s.read_latch(self.bit.port()))?;
        Ok(latch & self.bit.mask() != 0)
    }

    pub fn is_set_low(&self) -> Result<bool, Error<S::Error>> {
        self.is_set_high().map(|b| !b)
    }

    pub fn toggle(&mut self) -> Result<(), Error<S::Error>> {
        let bit = self.bit;
        self.session.lock(|s| {
            let latch = s.read_latch(bit.port())?;
            if latch & bit.mask() != 0 {
                s.clear_bit(bit)
            } else {
                s.set_bit(bit)
            }
        })
    }
}

impl<'a, MODE, MUTEX, S> ErrorType for Pin<'a, MODE, MUTEX>
where
    S: Smbus,
    MUTEX: SessionMutex<Session = Session<S>>,
{
    type Error = Error<S::Error>;
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, S> hal_digital::InputPin for Pin<'a, MODE, MUTEX>
where
    S: Smbus,
    MUTEX: SessionMutex<Session = Session<S>>,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, S> hal_digital::OutputPin for Pin<'a, MODE, MUTEX>
where
    S: Smbus,
    MUTEX: SessionMutex<Session = Session<S>>,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Pin::set_low(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Pin::set_high(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, S> hal_digital::StatefulOutputPin
    for Pin<'a, MODE, MUTEX>
where
    S: Smbus,
    MUTEX: SessionMutex<Session = Session<S>>,
{
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_set_high(self)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_set_low(self)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        Pin::toggle(self)
    }
}
