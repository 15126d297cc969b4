//! Process-wide bookkeeping of which device/address pairs have a live session.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

static CLAIMS: Mutex<BTreeSet<(String, u8)>> = Mutex::new(BTreeSet::new());

/// Exclusive claim on one slave address of one bus device.
///
/// Released on drop.
#[derive(Debug)]
pub(crate) struct Claim {
    device: String,
    address: u8,
}

impl Claim {
    /// Claim `address` on `device`, or `None` if some other session holds it.
    pub(crate) fn acquire(device: &str, address: u8) -> Option<Self> {
        let mut claims = CLAIMS.lock().unwrap_or_else(PoisonError::into_inner);
        if !claims.insert((device.to_owned(), address)) {
            return None;
        }
        Some(Self {
            device: device.to_owned(),
            address,
        })
    }

    pub(crate) fn device(&self) -> &str {
        &self.device
    }

    pub(crate) fn address(&self) -> u8 {
        self.address
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        let mut claims = CLAIMS.lock().unwrap_or_else(PoisonError::into_inner);
        claims.remove(&(core::mem::take(&mut self.device), self.address));
    }
}
