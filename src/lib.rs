//! Register-level driver for the `MCP23017` 16-bit I/O expander on an SMBus.
//!
//! A [`Session`] binds one bus device and slave address, picks the register layout
//! ([`Bank`]) and offers direction, whole-port and single-pin operations on top of validated
//! byte-register reads and writes.
//!
//! ```no_run
//! # #[cfg(feature = "linux")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mcp23017_smbus::{Bit, Config, Session};
//!
//! let mut session = Session::open(&Config::default())?;
//! session.set_output_pins(0x0f, 0x00)?;
//! session.set_bit(Bit::GPA2)?;
//! println!("GPIOA: 0x{:02x}", session.read_port_a()?);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "linux"))]
//! # fn main() {}
//! ```
//!
//! Any `embedded-hal` I2C bus works through [`HalBus`] and [`Session::init`].

mod bit;
mod bus;
mod common;
mod error;
mod expander;
#[cfg(feature = "linux")]
mod linux;
mod mutex;
mod pin;
pub mod registers;
mod registry;
pub mod reset;
mod session;

pub use bit::{Bit, ParseBitError, Port};
pub use bus::{Functionality, HalBus, Smbus};
pub use common::mode;
pub use common::{address, Direction, DEFAULT_ADDRESS, DEFAULT_DEVICE};
pub use error::Error;
pub use expander::{Mcp23017, Parts};
#[cfg(feature = "linux")]
pub use linux::LinuxSmbus;
pub use mutex::SessionMutex;
pub use pin::Pin;
pub use registers::{Bank, Register, RegisterMap};
pub use session::{Config, Session};
