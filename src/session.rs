//! A driver session on one `MCP23017`.
//!
//! A [`Session`] owns the bus transport bound to one slave address and the [`RegisterMap`] that
//! was selected when it was initialized.  All register and pin operations go through it.
//!
//! Read-modify-write operations ([`Session::set_ones`], [`Session::set_zeros`],
//! [`Session::set_bit`], [`Session::clear_bit`]) are a read followed by a write on the bus with
//! no locking in between.  Nothing else may write the same registers meanwhile; callers sharing
//! a chip have to serialize access themselves, e.g. through [`Mcp23017`](crate::Mcp23017).
use crate::registers::{IOCON_BANK, IOCON_BANK0, IOCON_BANK1};
use crate::registry::Claim;
use crate::{Bank, Bit, Direction, Error, Functionality, Port, Register, RegisterMap, Smbus};

/// Where to find the chip and which register layout to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bus character device, e.g. `/dev/i2c-1`.
    pub device: String,
    /// 7-bit slave address.
    pub address: u8,
    /// Register layout.  [`Bank::Bank1`] switches the chip to the alternate layout during init.
    pub bank: Bank,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: crate::DEFAULT_DEVICE.to_owned(),
            address: crate::DEFAULT_ADDRESS,
            bank: Bank::Bank0,
        }
    }
}

impl Config {
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_bank(mut self, bank: Bank) -> Self {
        self.bank = bank;
        self
    }
}

/// Claim the device/address pair of `config` for a new session.
pub(crate) fn claim<E>(config: &Config) -> Result<Claim, Error<E>> {
    Claim::acquire(&config.device, config.address).ok_or_else(|| {
        log::warn!(
            "{} at 0x{:02x} already has a session",
            config.device,
            config.address
        );
        Error::AlreadyInitialized {
            device: config.device.clone(),
            address: config.address,
        }
    })
}

/// Initialized driver session.
///
/// Dropping the session performs [`cleanup`](Session::cleanup).
pub struct Session<S: Smbus> {
    bus: Option<S>,
    claim: Option<Claim>,
    map: RegisterMap,
}

impl<S: Smbus> Session<S> {
    /// Initialize a session on an opened bus.
    ///
    /// Fails with [`Error::AlreadyInitialized`] if a live session already owns the same device
    /// and address, with [`Error::Capability`] if the bus cannot do byte-data reads and writes,
    /// and with [`Error::Io`] if binding the address or switching the bank fails.  On failure
    /// the bus is dropped, which closes it.
    pub fn init(bus: S, config: &Config) -> Result<Self, Error<S::Error>> {
        let claim = claim::<S::Error>(config)?;
        Self::configure(bus, claim, config)
    }

    pub(crate) fn configure(
        mut bus: S,
        claim: Claim,
        config: &Config,
    ) -> Result<Self, Error<S::Error>> {
        let funcs = bus.functionality()?;
        if !funcs.contains(Functionality::REQUIRED) {
            let missing = funcs.missing(Functionality::REQUIRED);
            log::warn!("{}: {} not available", claim.device(), missing);
            return Err(Error::Capability { missing });
        }

        bus.set_slave_address(claim.address())?;

        if config.bank == Bank::Bank1 {
            // The chip is assumed to still be in its power-on layout, so IOCON is at 0x0a.
            let iocon = bus.read_byte_data(IOCON_BANK0)?;
            bus.write_byte_data(IOCON_BANK0, iocon | IOCON_BANK)?;
        }

        log::debug!(
            "{}: session on 0x{:02x} with {}",
            claim.device(),
            claim.address(),
            config.bank
        );
        Ok(Self {
            bus: Some(bus),
            claim: Some(claim),
            map: RegisterMap::new(config.bank),
        })
    }

    /// Close the bus and release the device/address claim.
    ///
    /// Calling this more than once is harmless.  Afterwards every operation fails with
    /// [`Error::NotInitialized`].
    pub fn cleanup(&mut self) {
        let Some(bus) = self.bus.take() else {
            return;
        };
        drop(bus);
        if let Some(claim) = self.claim.take() {
            log::debug!("{}: closed session on 0x{:02x}", claim.device(), claim.address());
        }
    }

    /// Switch the chip back to its power-on register layout (`IOCON.BANK = 0`).
    ///
    /// Init assumes the power-on layout, so a chip left in bank 1 has to go through this (or a
    /// hardware reset) before another session is initialized on it.  The other `IOCON` bits are
    /// kept.  Does nothing for a bank 0 session.
    pub fn revert_bank(&mut self) -> Result<(), Error<S::Error>> {
        let bank = self.map.bank();
        let bus = self.bus()?;
        if bank == Bank::Bank0 {
            return Ok(());
        }
        let iocon = bus.read_byte_data(IOCON_BANK1)?;
        bus.write_byte_data(IOCON_BANK1, iocon & !IOCON_BANK)?;
        self.map = RegisterMap::new(Bank::Bank0);
        log::debug!("reverted to {}", Bank::Bank0);
        Ok(())
    }

    /// Clean up and hand back the bus, if the session was still initialized.
    pub fn release(mut self) -> Option<S> {
        let bus = self.bus.take();
        self.claim = None;
        bus
    }

    pub fn is_initialized(&self) -> bool {
        self.bus.is_some()
    }

    /// Bus device this session was initialized on.
    pub fn device(&self) -> Option<&str> {
        self.claim.as_ref().map(Claim::device)
    }

    /// Slave address this session is bound to.
    pub fn slave_address(&self) -> Option<u8> {
        self.claim.as_ref().map(Claim::address)
    }

    pub fn bank(&self) -> Bank {
        self.map.bank()
    }

    pub fn register_map(&self) -> &RegisterMap {
        &self.map
    }

    /// Physical address of `reg` in the active layout.
    pub fn address(&self, reg: Register) -> u8 {
        self.map.address(reg)
    }

    /// Whether `addr` is one of the six registers of the active layout.
    pub fn is_valid_register(&self, addr: u8) -> bool {
        self.map.is_valid(addr)
    }

    fn bus(&mut self) -> Result<&mut S, Error<S::Error>> {
        self.bus.as_mut().ok_or(Error::NotInitialized)
    }

    fn check(&mut self, addr: u8) -> Result<&mut S, Error<S::Error>> {
        if self.bus.is_some() && !self.map.is_valid(addr) {
            log::warn!("invalid reg: 0x{addr:02x}");
            return Err(Error::InvalidRegister(addr));
        }
        self.bus()
    }

    /// Read a register by physical address.
    pub fn read_register(&mut self, addr: u8) -> Result<u8, Error<S::Error>> {
        let value = self.check(addr)?.read_byte_data(addr)?;
        log::trace!("read 0x{addr:02x} -> 0x{value:02x}");
        Ok(value)
    }

    /// Write a register by physical address.
    pub fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Error<S::Error>> {
        let bus = self.check(addr)?;
        log::trace!("write 0x{addr:02x} <- 0x{value:02x}");
        bus.write_byte_data(addr, value)?;
        Ok(())
    }

    /// Validated register read for diagnostics, e.g. register dumps.
    pub fn get_register(&mut self, addr: u8) -> Result<u8, Error<S::Error>> {
        self.read_register(addr)
    }

    fn update(&mut self, addr: u8, mask_set: u8, mask_clear: u8) -> Result<(), Error<S::Error>> {
        self.check(addr)?;
        if mask_set | mask_clear == 0 {
            return Ok(());
        }
        let mut val = self.read_register(addr)?;
        val |= mask_set;
        val &= !mask_clear;
        self.write_register(addr, val)
    }

    /// Set all bits of `mask` in register `addr`; no bus traffic if `mask` is 0.
    pub fn set_ones(&mut self, addr: u8, mask: u8) -> Result<(), Error<S::Error>> {
        self.update(addr, mask, 0)
    }

    /// Clear all bits of `mask` in register `addr`; no bus traffic if `mask` is 0.
    pub fn set_zeros(&mut self, addr: u8, mask: u8) -> Result<(), Error<S::Error>> {
        self.update(addr, 0, mask)
    }

    /// Change the direction of the pins in the masks; all other pins keep their direction.
    ///
    /// Port A is written first.  If port B then fails, the port A change stays applied.
    pub fn set_direction(
        &mut self,
        port_a_mask: u8,
        port_b_mask: u8,
        dir: Direction,
    ) -> Result<(), Error<S::Error>> {
        for (port, mask) in [(Port::A, port_a_mask), (Port::B, port_b_mask)] {
            let addr = self.map.address(Register::direction(port));
            match dir {
                Direction::Input => self.set_ones(addr, mask)?,
                Direction::Output => self.set_zeros(addr, mask)?,
            }
        }
        Ok(())
    }

    /// Make the pins set in the masks outputs.
    pub fn set_output_pins(
        &mut self,
        port_a_mask: u8,
        port_b_mask: u8,
    ) -> Result<(), Error<S::Error>> {
        self.set_direction(port_a_mask, port_b_mask, Direction::Output)
    }

    /// Make the pins set in the masks inputs.
    pub fn set_input_pins(
        &mut self,
        port_a_mask: u8,
        port_b_mask: u8,
    ) -> Result<(), Error<S::Error>> {
        self.set_direction(port_a_mask, port_b_mask, Direction::Input)
    }

    /// Write the whole `GPIO` register of `port`.
    ///
    /// Only pins configured as outputs are driven, but the write is issued regardless.
    pub fn write_port(&mut self, port: Port, value: u8) -> Result<(), Error<S::Error>> {
        let addr = self.map.address(Register::gpio(port));
        self.write_register(addr, value)
    }

    /// Read the whole `GPIO` register of `port`.
    pub fn read_port(&mut self, port: Port) -> Result<u8, Error<S::Error>> {
        let addr = self.map.address(Register::gpio(port));
        self.read_register(addr)
    }

    pub fn write_port_a(&mut self, value: u8) -> Result<(), Error<S::Error>> {
        self.write_port(Port::A, value)
    }

    pub fn write_port_b(&mut self, value: u8) -> Result<(), Error<S::Error>> {
        self.write_port(Port::B, value)
    }

    pub fn read_port_a(&mut self) -> Result<u8, Error<S::Error>> {
        self.read_port(Port::A)
    }

    pub fn read_port_b(&mut self) -> Result<u8, Error<S::Error>> {
        self.read_port(Port::B)
    }

    /// Read the output latch of `port`.
    pub fn read_latch(&mut self, port: Port) -> Result<u8, Error<S::Error>> {
        let addr = self.map.address(Register::latch(port));
        self.read_register(addr)
    }

    /// Current direction of `bit`, read from its port's `IODIR` register.
    pub fn direction(&mut self, bit: Bit) -> Result<Direction, Error<S::Error>> {
        let addr = self.map.address(Register::direction(bit.port()));
        let iodir = self.read_register(addr)?;
        Ok(Direction::from_iodir(iodir, bit.mask()))
    }

    /// Whether `bit` is currently configured as an output.
    ///
    /// Any failure to find out is logged and reported as `false`.
    pub fn is_output_bit(&mut self, bit: Bit) -> bool {
        let addr = self.map.address(Register::direction(bit.port()));
        match self.read_register(addr) {
            Ok(iodir) if Direction::from_iodir(iodir, bit.mask()) == Direction::Output => true,
            Ok(iodir) => {
                log::warn!(
                    "bit {bit} is not an output (mask:0x{:02x} val:0x{iodir:02x})",
                    bit.mask()
                );
                false
            }
            Err(e) => {
                log::warn!("can't get direction of {bit}: {e}");
                false
            }
        }
    }

    fn write_bit(&mut self, bit: Bit, high: bool) -> Result<(), Error<S::Error>> {
        if self.direction(bit)? != Direction::Output {
            log::warn!("bit {bit} is not an output");
            return Err(Error::Direction(bit));
        }

        let port = bit.port();
        let mut latch = self.read_latch(port)?;
        if high {
            latch |= bit.mask();
        } else {
            latch &= !bit.mask();
        }
        self.write_port(port, latch)
    }

    /// Drive output pin `bit` high, leaving the other pins of its port as latched.
    pub fn set_bit(&mut self, bit: Bit) -> Result<(), Error<S::Error>> {
        self.write_bit(bit, true)
    }

    /// Drive output pin `bit` low, leaving the other pins of its port as latched.
    pub fn clear_bit(&mut self, bit: Bit) -> Result<(), Error<S::Error>> {
        self.write_bit(bit, false)
    }

    /// Read all six registers of the active layout, in [`Register::ALL`] order.
    pub fn dump_registers(&mut self) -> Result<[(Register, u8); 6], Error<S::Error>> {
        let mut dump = Register::ALL.map(|reg| (reg, 0));
        for (reg, value) in dump.iter_mut() {
            *value = self.read_register(self.map.address(*reg))?;
        }
        Ok(dump)
    }
}

impl<S: Smbus> Drop for Session<S> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl<S: Smbus> core::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("device", &self.device())
            .field("address", &self.slave_address())
            .field("bank", &self.map.bank())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
