//! Simulated `MCP23017` for integration tests.
#![allow(dead_code)]

use mcp23017_smbus::{Config, Functionality, Smbus};
use std::cell::RefCell;
use std::rc::Rc;

/// Records operations performed on the simulated chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Register read, with the physical address used on the bus
    Read(u8),
    /// Register write, with the physical address used on the bus
    Write(u8, u8),
    /// Slave address binding
    Bind(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

/// Chip state, indexed by the bank 0 address of each register
#[derive(Debug)]
struct ChipState {
    regs: [u8; 0x16],
    /// Levels applied to the pins from outside, port A in the low byte
    inputs: u16,
    functionality: Functionality,
    operations: Vec<Operation>,
    fail_read_at: Option<u8>,
    fail_write_at: Option<u8>,
    fail_bind: bool,
}

const IODIRA: usize = 0x00;
const IODIRB: usize = 0x01;
const IOCONA: usize = 0x0a;
const IOCONB: usize = 0x0b;
const GPIOA: usize = 0x12;
const GPIOB: usize = 0x13;
const OLATA: usize = 0x14;
const OLATB: usize = 0x15;

impl ChipState {
    fn new() -> Self {
        let mut regs = [0x00; 0x16];
        regs[IODIRA] = 0xff;
        regs[IODIRB] = 0xff;
        Self {
            regs,
            inputs: 0x0000,
            functionality: Functionality::REQUIRED,
            operations: Vec::new(),
            fail_read_at: None,
            fail_write_at: None,
            fail_bind: false,
        }
    }

    fn bank1(&self) -> bool {
        self.regs[IOCONA] & 0x80 != 0
    }

    /// Map a bus address onto the bank 0 register index.
    fn index(&self, addr: u8) -> Option<usize> {
        let addr = addr as usize;
        if self.bank1() {
            match addr {
                0x00..=0x0a => Some(addr * 2),
                0x10..=0x1a => Some((addr - 0x10) * 2 + 1),
                _ => None,
            }
        } else {
            (addr < 0x16).then_some(addr)
        }
    }

    fn read(&self, addr: u8) -> u8 {
        let Some(idx) = self.index(addr) else {
            return 0x00;
        };
        match idx {
            GPIOA => {
                let iodir = self.regs[IODIRA];
                (self.regs[OLATA] & !iodir) | (self.inputs as u8 & iodir)
            }
            GPIOB => {
                let iodir = self.regs[IODIRB];
                (self.regs[OLATB] & !iodir) | ((self.inputs >> 8) as u8 & iodir)
            }
            _ => self.regs[idx],
        }
    }

    fn write(&mut self, addr: u8, value: u8) {
        let Some(idx) = self.index(addr) else {
            return;
        };
        match idx {
            GPIOA => self.regs[OLATA] = value,
            GPIOB => self.regs[OLATB] = value,
            IOCONA | IOCONB => {
                self.regs[IOCONA] = value;
                self.regs[IOCONB] = value;
            }
            _ => self.regs[idx] = value,
        }
    }
}

/// Handle to a simulated chip; clones share the same chip.
#[derive(Debug, Clone)]
pub struct SimChip {
    state: Rc<RefCell<ChipState>>,
}

impl SimChip {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ChipState::new())),
        }
    }

    pub fn with_functionality(self, functionality: Functionality) -> Self {
        self.state.borrow_mut().functionality = functionality;
        self
    }

    pub fn fail_read_at(&self, addr: u8) {
        self.state.borrow_mut().fail_read_at = Some(addr);
    }

    pub fn fail_write_at(&self, addr: u8) {
        self.state.borrow_mut().fail_write_at = Some(addr);
    }

    pub fn fail_bind(&self) {
        self.state.borrow_mut().fail_bind = true;
    }

    /// Drive input pins from outside, port A in the low byte.
    pub fn set_inputs(&self, levels: u16) {
        self.state.borrow_mut().inputs = levels;
    }

    /// Register value by its bank 0 address, bypassing the bus.
    pub fn peek(&self, bank0_addr: u8) -> u8 {
        let state = self.state.borrow();
        match bank0_addr as usize {
            GPIOA | GPIOB => {
                // GPIO depends on the layout-independent pin model
                let bank1 = state.bank1();
                let addr = match (bank0_addr as usize, bank1) {
                    (GPIOA, true) => 0x09,
                    (GPIOB, true) => 0x19,
                    _ => bank0_addr,
                };
                state.read(addr)
            }
            idx => state.regs[idx],
        }
    }

    pub fn is_bank1(&self) -> bool {
        self.state.borrow().bank1()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }

    pub fn transfer_count(&self) -> usize {
        self.state
            .borrow()
            .operations
            .iter()
            .filter(|op| !matches!(op, Operation::Bind(_)))
            .count()
    }
}

impl Smbus for SimChip {
    type Error = SimError;

    fn functionality(&mut self) -> Result<Functionality, Self::Error> {
        Ok(self.state.borrow().functionality)
    }

    fn set_slave_address(&mut self, address: u8) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_bind {
            return Err(SimError);
        }
        state.operations.push(Operation::Bind(address));
        Ok(())
    }

    fn read_byte_data(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut state = self.state.borrow_mut();
        state.operations.push(Operation::Read(register));
        if state.fail_read_at == Some(register) {
            return Err(SimError);
        }
        Ok(state.read(register))
    }

    fn write_byte_data(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.operations.push(Operation::Write(register, value));
        if state.fail_write_at == Some(register) {
            return Err(SimError);
        }
        state.write(register, value);
        Ok(())
    }
}

/// Config with a device name unique to the calling test, so parallel tests don't collide.
pub fn config(test: &str) -> Config {
    Config::default().with_device(format!("sim:{test}"))
}
