//! [`Smbus`] on Linux `/dev/i2c-N` character devices.
//!
//! Transfers go through [`i2cdev`]; the adapter capability query (`I2C_FUNCS`) is a plain ioctl
//! on the same file descriptor.

use std::io;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;

use crate::{Config, Error, Functionality, Session, Smbus};

const I2C_FUNCS: u16 = 0x0705;

nix::ioctl_read_bad!(i2c_funcs, I2C_FUNCS, libc::c_ulong);

/// An opened Linux I2C adapter.
///
/// The file descriptor is closed when this is dropped.
pub struct LinuxSmbus {
    dev: LinuxI2CDevice,
}

impl LinuxSmbus {
    /// Open the adapter at `path` for reading and writing, bound to `address`.
    pub fn open<P: AsRef<Path>>(path: P, address: u8) -> io::Result<Self> {
        let dev = LinuxI2CDevice::new(path.as_ref(), u16::from(address)).map_err(|e| {
            log::warn!("open({}): {}", path.as_ref().display(), e);
            io::Error::from(e)
        })?;
        Ok(Self { dev })
    }
}

impl Smbus for LinuxSmbus {
    type Error = io::Error;

    fn functionality(&mut self) -> Result<Functionality, Self::Error> {
        let mut funcs: libc::c_ulong = 0;
        // SAFETY: I2C_FUNCS writes exactly one `unsigned long` through the pointer.
        unsafe { i2c_funcs(self.dev.as_raw_fd(), &mut funcs) }?;
        Ok(Functionality::from_bits(funcs as u32))
    }

    fn set_slave_address(&mut self, address: u8) -> Result<(), Self::Error> {
        self.dev
            .set_slave_address(u16::from(address))
            .map_err(io::Error::from)
    }

    fn read_byte_data(&mut self, register: u8) -> Result<u8, Self::Error> {
        self.dev
            .smbus_read_byte_data(register)
            .map_err(io::Error::from)
    }

    fn write_byte_data(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.dev
            .smbus_write_byte_data(register, value)
            .map_err(io::Error::from)
    }
}

impl Session<LinuxSmbus> {
    /// Open `config.device` and initialize a session on it.
    ///
    /// The device/address claim is taken before the device is opened, so a second session for
    /// the same chip fails without touching the bus.
    pub fn open(config: &Config) -> Result<Self, Error<io::Error>> {
        let claim = crate::session::claim::<io::Error>(config)?;
        let bus = LinuxSmbus::open(&config.device, config.address)?;
        Session::configure(bus, claim, config)
    }
}
