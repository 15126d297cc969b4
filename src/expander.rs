//! Lock-guarded sharing of one session between several users.
//!
//! The pins handed out by [`Mcp23017::split`] start out typed as inputs, which is the chip's
//! power-on state.  Use `into_output()` to reconfigure them.
use crate::{Bit, Session, SessionMutex, Smbus};

/// `MCP23017` session behind a [`SessionMutex`].
pub struct Mcp23017<M>(M);

impl<S: Smbus> Mcp23017<core::cell::RefCell<Session<S>>> {
    /// Share `session` within a single thread.
    pub fn new(session: Session<S>) -> Self {
        Self::with_mutex(session)
    }
}

impl<S, M> Mcp23017<M>
where
    S: Smbus,
    M: SessionMutex<Session = Session<S>>,
{
    pub fn with_mutex(session: Session<S>) -> Self {
        Self(SessionMutex::create(session))
    }

    /// Run `f` with the session locked.
    ///
    /// Everything done inside `f` happens without interference from other users of this
    /// `Mcp23017`, which makes multi-step sequences safe.
    pub fn lock<R, F: FnOnce(&mut Session<S>) -> R>(&self, f: F) -> R {
        self.0.lock(f)
    }

    /// Handle for a single pin.
    pub fn pin(&self, bit: Bit) -> crate::Pin<'_, crate::mode::Input, M> {
        crate::Pin::new(bit, &self.0)
    }

    pub fn split(&mut self) -> Parts<'_, M> {
        Parts {
            gpa0: crate::Pin::new(Bit::GPA0, &self.0),
            gpa1: crate::Pin::new(Bit::GPA1, &self.0),
            gpa2: crate::Pin::new(Bit::GPA2, &self.0),
            gpa3: crate::Pin::new(Bit::GPA3, &self.0),
            gpa4: crate::Pin::new(Bit::GPA4, &self.0),
            gpa5: crate::Pin::new(Bit::GPA5, &self.0),
            gpa6: crate::Pin::new(Bit::GPA6, &self.0),
            gpa7: crate::Pin::new(Bit::GPA7, &self.0),
            gpb0: crate::Pin::new(Bit::GPB0, &self.0),
            gpb1: crate::Pin::new(Bit::GPB1, &self.0),
            gpb2: crate::Pin::new(Bit::GPB2, &self.0),
            gpb3: crate::Pin::new(Bit::GPB3, &self.0),
            gpb4: crate::Pin::new(Bit::GPB4, &self.0),
            gpb5: crate::Pin::new(Bit::GPB5, &self.0),
            gpb6: crate::Pin::new(Bit::GPB6, &self.0),
            gpb7: crate::Pin::new(Bit::GPB7, &self.0),
        }
    }

    pub fn into_inner(self) -> M {
        self.0
    }
}

pub struct Parts<'a, M> {
    pub gpa0: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa1: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa2: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa3: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa4: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa5: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa6: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa7: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb0: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb1: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb2: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb3: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb4: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb5: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb6: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb7: crate::Pin<'a, crate::mode::Input, M>,
}
