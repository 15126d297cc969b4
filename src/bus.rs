use embedded_hal::i2c as hal_i2c;

/// Capability flags of a bus adapter, using the kernel's `I2C_FUNC_*` bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Functionality(u32);

impl Functionality {
    pub const SMBUS_READ_BYTE_DATA: Functionality = Functionality(0x0008_0000);
    pub const SMBUS_WRITE_BYTE_DATA: Functionality = Functionality(0x0010_0000);

    /// Everything the driver needs from the bus.
    pub const REQUIRED: Functionality = Functionality(
        Self::SMBUS_READ_BYTE_DATA.0 | Self::SMBUS_WRITE_BYTE_DATA.0,
    );

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Functionality) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flags of `other` that are not present in `self`.
    pub const fn missing(self, other: Functionality) -> Functionality {
        Functionality(other.0 & !self.0)
    }
}

impl core::ops::BitOr for Functionality {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::fmt::Display for Functionality {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (flag, name) in [
            (Self::SMBUS_READ_BYTE_DATA, "I2C_FUNC_SMBUS_READ_BYTE_DATA"),
            (Self::SMBUS_WRITE_BYTE_DATA, "I2C_FUNC_SMBUS_WRITE_BYTE_DATA"),
        ] {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            write!(f, "0x{:08x}", self.0)?;
        }
        Ok(())
    }
}

/// Byte-oriented SMBus register access on an opened bus device.
///
/// This is the only seam through which the driver touches the hardware.  Every method is a
/// single blocking bus transaction (or ioctl) and is never retried.
pub trait Smbus {
    type Error: core::fmt::Debug;

    /// Query which transfer types the adapter supports.
    fn functionality(&mut self) -> Result<Functionality, Self::Error>;

    /// Direct all following transfers to the 7-bit `address`.
    fn set_slave_address(&mut self, address: u8) -> Result<(), Self::Error>;

    /// SMBus "read byte data": one byte from register `register`.
    fn read_byte_data(&mut self, register: u8) -> Result<u8, Self::Error>;

    /// SMBus "write byte data": one byte to register `register`.
    fn write_byte_data(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;
}

impl<T: Smbus + ?Sized> Smbus for &mut T {
    type Error = T::Error;

    fn functionality(&mut self) -> Result<Functionality, Self::Error> {
        T::functionality(self)
    }

    fn set_slave_address(&mut self, address: u8) -> Result<(), Self::Error> {
        T::set_slave_address(self, address)
    }

    fn read_byte_data(&mut self, register: u8) -> Result<u8, Self::Error> {
        T::read_byte_data(self, register)
    }

    fn write_byte_data(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        T::write_byte_data(self, register, value)
    }
}

/// [`Smbus`] on top of any embedded-hal I2C bus.
///
/// Byte-data transfers map onto plain I2C: a read is a `write_read` of the register address
/// followed by one byte, a write sends the register address and the value.  Capabilities are
/// always reported as complete.
pub struct HalBus<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C> HalBus<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            addr: crate::common::DEFAULT_ADDRESS,
        }
    }

    /// Currently bound slave address.
    pub fn address(&self) -> u8 {
        self.addr
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: hal_i2c::I2c> Smbus for HalBus<I2C> {
    type Error = I2C::Error;

    fn functionality(&mut self) -> Result<Functionality, Self::Error> {
        Ok(Functionality::REQUIRED)
    }

    fn set_slave_address(&mut self, address: u8) -> Result<(), Self::Error> {
        self.addr = address;
        Ok(())
    }

    fn read_byte_data(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut buf = [0x00];
        self.i2c.write_read(self.addr, &[register], &mut buf)?;
        Ok(buf[0])
    }

    fn write_byte_data(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.addr, &[register, value])
    }
}
