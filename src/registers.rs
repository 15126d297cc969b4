//! Register map of the `MCP23017` for both register-bank layouts
//!
//! Datasheet: https://ww1.microchip.com/downloads/en/devicedoc/20001952c.pdf
//!
//! The chip powers up with `IOCON.BANK = 0`, where the A and B registers of each kind are
//! interleaved (`IODIRA = 0x00`, `IODIRB = 0x01`, ...).  Setting `IOCON.BANK = 1` moves all port
//! B registers into a second block starting at `0x10`.  This driver only ever touches six of the
//! registers, listed in [`Register`].
//!
//! For all registers, the reset value is 0x00, except for IODIR{A,B} which are 0xFF (making all
//! pins inputs) at reset.

use crate::bit::Port;

/// Address of `IOCON` while the chip is still in its power-on bank 0 layout.
pub const IOCON_BANK0: u8 = 0x0a;

/// Address of `IOCON` in the bank 1 layout.
pub const IOCON_BANK1: u8 = 0x05;

/// `IOCON.BANK`: 0 = interleaved layout, 1 = separated layout.
pub const IOCON_BANK: u8 = 0x80;

/// Register address layout, selected through `IOCON.BANK`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    /// Power-on layout with interleaved A/B registers.
    #[default]
    Bank0,
    /// Alternate layout with the port B registers in a separate block.
    Bank1,
}

impl core::str::FromStr for Bank {
    type Err = ParseBankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Bank::Bank0),
            "1" => Ok(Bank::Bank1),
            _ => Err(ParseBankError),
        }
    }
}

impl core::fmt::Display for Bank {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Bank::Bank0 => f.write_str("IOCON.BANK=0"),
            Bank::Bank1 => f.write_str("IOCON.BANK=1"),
        }
    }
}

/// A bank designator other than `0` or `1` was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseBankError;

impl core::fmt::Display for ParseBankError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("register bank must be 0 or 1")
    }
}

impl std::error::Error for ParseBankError {}

/// Logical registers used by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// IODIR: input/output direction: 0=output; 1=input
    IODIRA,
    IODIRB,
    /// GPIO: reflects logic level on pins
    GPIOA,
    GPIOB,
    /// OLAT: output latches: sets state for pins configured as outputs
    OLATA,
    OLATB,
}

impl Register {
    pub const ALL: [Register; 6] = [
        Register::IODIRA,
        Register::IODIRB,
        Register::GPIOA,
        Register::GPIOB,
        Register::OLATA,
        Register::OLATB,
    ];

    pub fn direction(port: Port) -> Self {
        match port {
            Port::A => Register::IODIRA,
            Port::B => Register::IODIRB,
        }
    }

    pub fn gpio(port: Port) -> Self {
        match port {
            Port::A => Register::GPIOA,
            Port::B => Register::GPIOB,
        }
    }

    pub fn latch(port: Port) -> Self {
        match port {
            Port::A => Register::OLATA,
            Port::B => Register::OLATB,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::IODIRA => "IODIRA",
            Register::IODIRB => "IODIRB",
            Register::GPIOA => "GPIOA",
            Register::GPIOB => "GPIOB",
            Register::OLATA => "OLATA",
            Register::OLATB => "OLATB",
        }
    }
}

impl core::fmt::Display for Register {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.name())
    }
}

/// Physical addresses of the logical registers for one [`Bank`].
///
/// A session picks its map once during init and keeps it until cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMap {
    bank: Bank,
    addrs: [u8; 6],
}

impl RegisterMap {
    pub const fn new(bank: Bank) -> Self {
        // Same order as `Register::ALL`.
        let addrs = match bank {
            Bank::Bank0 => [0x00, 0x01, 0x12, 0x13, 0x14, 0x15],
            Bank::Bank1 => [0x00, 0x10, 0x09, 0x19, 0x0a, 0x1a],
        };
        Self { bank, addrs }
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    /// Physical address of `reg` in this layout.
    pub fn address(&self, reg: Register) -> u8 {
        self.addrs[reg as usize]
    }

    /// Logical register living at `addr`, if any.
    pub fn resolve(&self, addr: u8) -> Option<Register> {
        Register::ALL
            .iter()
            .copied()
            .find(|&reg| self.address(reg) == addr)
    }

    /// Whether `addr` is one of the six addresses of this layout.
    pub fn is_valid(&self, addr: u8) -> bool {
        self.resolve(addr).is_some()
    }
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self::new(Bank::Bank0)
    }
}
