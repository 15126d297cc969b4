use crate::{Bit, Functionality};

/// Errors of a driver session.
///
/// `E` is the error type of the underlying [`Smbus`](crate::Smbus) transport.
#[derive(Debug)]
pub enum Error<E> {
    /// Opening the bus device, binding the address or a bus transfer failed
    Io(E),
    /// The bus adapter lacks byte-data read or write support
    Capability {
        /// Required flags the adapter did not report
        missing: Functionality,
    },
    /// Address is not one of the six registers of the active layout; nothing was sent
    InvalidRegister(u8),
    /// Pin is configured as an input; the latch was not touched
    Direction(Bit),
    /// The session was cleaned up
    NotInitialized,
    /// Another live session already owns this device and address
    AlreadyInitialized {
        device: String,
        address: u8,
    },
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Io(error)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "bus error: {e:?}"),
            Error::Capability { missing } => write!(f, "{missing} not available"),
            Error::InvalidRegister(reg) => write!(f, "invalid reg: 0x{reg:02x}"),
            Error::Direction(bit) => write!(f, "{bit} is not an output"),
            Error::NotInitialized => f.write_str("session is not initialized"),
            Error::AlreadyInitialized { device, address } => write!(
                f,
                "{device} at address 0x{address:02x} is already in use by another session"
            ),
        }
    }
}

impl<E: core::fmt::Debug> std::error::Error for Error<E> {}

impl<E: core::fmt::Debug> embedded_hal::digital::Error for Error<E> {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
