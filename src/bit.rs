//! Pin identifiers of the two eight-bit ports.

/// One of the two eight-bit GPIO ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    A,
    B,
}

impl core::fmt::Display for Port {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Port::A => f.write_str("A"),
            Port::B => f.write_str("B"),
        }
    }
}

/// A single pin of the expander.
///
/// Pins are numbered contiguously: `GPA0..=GPA7` are 0 to 7 and `GPB0..=GPB7` are 8 to 15, so
/// the discriminant minus the port's first pin is the bit position inside that port's registers.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Bit {
    GPA0 = 0,
    GPA1,
    GPA2,
    GPA3,
    GPA4,
    GPA5,
    GPA6,
    GPA7,
    GPB0,
    GPB1,
    GPB2,
    GPB3,
    GPB4,
    GPB5,
    GPB6,
    GPB7,
}

impl Bit {
    pub const ALL: [Bit; 16] = [
        Bit::GPA0,
        Bit::GPA1,
        Bit::GPA2,
        Bit::GPA3,
        Bit::GPA4,
        Bit::GPA5,
        Bit::GPA6,
        Bit::GPA7,
        Bit::GPB0,
        Bit::GPB1,
        Bit::GPB2,
        Bit::GPB3,
        Bit::GPB4,
        Bit::GPB5,
        Bit::GPB6,
        Bit::GPB7,
    ];

    /// Pin with the given index, `0..16`.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Pin `offset` (`0..8`) of `port`.
    pub fn new(port: Port, offset: u8) -> Option<Self> {
        if offset > 7 {
            return None;
        }
        let base = match port {
            Port::A => Bit::GPA0,
            Port::B => Bit::GPB0,
        };
        Self::from_index(base as u8 + offset)
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Port whose registers hold this pin.
    pub fn port(self) -> Port {
        if self < Bit::GPB0 {
            Port::A
        } else {
            Port::B
        }
    }

    /// Bit position inside the port's registers.
    pub fn offset(self) -> u8 {
        match self.port() {
            Port::A => self as u8 - Bit::GPA0 as u8,
            Port::B => self as u8 - Bit::GPB0 as u8,
        }
    }

    /// Single-bit mask for this pin inside its port's registers.
    pub fn mask(self) -> u8 {
        1 << self.offset()
    }
}

impl core::fmt::Display for Bit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "GP{}{}", self.port(), self.offset())
    }
}

impl TryFrom<u8> for Bit {
    type Error = ParseBitError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Bit::from_index(index).ok_or(ParseBitError::OutOfRange)
    }
}

/// Parses the `GP<A|B><0-7>` designator, e.g. `GPA3` or `gpb7`.
impl core::str::FromStr for Bit {
    type Err = ParseBitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let rest = match s.get(..2) {
            Some(prefix) if prefix.eq_ignore_ascii_case("GP") => &s[2..],
            _ => return Err(ParseBitError::Syntax),
        };

        let mut chars = rest.chars();
        let port = match chars.next() {
            Some('A' | 'a') => Port::A,
            Some('B' | 'b') => Port::B,
            Some(_) => return Err(ParseBitError::Port),
            None => return Err(ParseBitError::Syntax),
        };

        let offset: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| ParseBitError::Syntax)?;
        Bit::new(port, offset).ok_or(ParseBitError::OutOfRange)
    }
}

/// Failure to decode a pin identifier from text or a raw index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseBitError {
    /// Not of the form `GP<port><offset>`.
    Syntax,
    /// Port letter other than `A` or `B`.
    Port,
    /// Offset above 7, or index above 15.
    OutOfRange,
}

impl core::fmt::Display for ParseBitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseBitError::Syntax => f.write_str("expected a pin like \"GPA0\" or \"GPB7\""),
            ParseBitError::Port => f.write_str("specify the port as \"GPA\" or \"GPB\""),
            ParseBitError::OutOfRange => f.write_str("pin index out of range (0 <= n <= 7)"),
        }
    }
}

impl std::error::Error for ParseBitError {}
