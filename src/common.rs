/// Pin direction as encoded in the `IODIR` registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Direction bit is 1.
    Input,
    /// Direction bit is 0.
    Output,
}

impl Direction {
    /// Direction of the pin selected by `mask` in an `IODIR` value.
    pub fn from_iodir(iodir: u8, mask: u8) -> Self {
        if iodir & mask != 0 {
            Direction::Input
        } else {
            Direction::Output
        }
    }
}

/// Default bus character device.
pub const DEFAULT_DEVICE: &str = "/dev/i2c-1";

/// Default slave address, with A0..A2 all tied low.
pub const DEFAULT_ADDRESS: u8 = 0x20;

/// Slave address for the given state of the A0..A2 address pins.
pub fn address(a0: bool, a1: bool, a2: bool) -> u8 {
    DEFAULT_ADDRESS | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8)
}

/// Pin Modes
pub mod mode {
    /// Trait for pin-modes which can be used to set a logic level.
    pub trait HasOutput {}
    /// Trait for pin-modes which can be used to read a logic level.
    pub trait HasInput {}

    /// Pin configured as an input.
    pub struct Input;
    impl HasInput for Input {}

    /// Pin configured as an output.
    pub struct Output;
    impl HasOutput for Output {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_bits() {
        assert_eq!(Direction::from_iodir(0xff, 0x04), Direction::Input);
        assert_eq!(Direction::from_iodir(0xfb, 0x04), Direction::Output);
    }

    #[test]
    fn address_pins() {
        assert_eq!(address(false, false, false), 0x20);
        assert_eq!(address(false, true, false), 0x22);
        assert_eq!(address(true, true, true), 0x27);
    }
}
