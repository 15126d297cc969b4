/// Lock guarding a [`Session`](crate::Session) that several users share.
///
/// [`Session::set_bit`](crate::Session::set_bit) reads `OLAT` and then writes `GPIO`.  If two
/// users each set a different pin of the same port and their reads both happen before either
/// write, the second write drops the first pin's change again.  [`Mcp23017`](crate::Mcp23017)
/// keeps the session inside a `SessionMutex` and runs each pin operation, or each
/// [`Mcp23017::lock`](crate::Mcp23017::lock) closure, with the lock held.
///
/// | Mutex | Shared between |
/// | --- | --- |
/// | [`core::cell::RefCell`] | Pins of one thread |
/// | [`std::sync::Mutex`] | Threads; a poisoned lock is taken over as is |
///
/// Any other lock works through a newtype:
///
/// ```
/// use mcp23017_smbus::{Session, SessionMutex, Smbus};
///
/// /// Refuses to hand out a session whose lock was poisoned.
/// struct StrictLock<S: Smbus>(std::sync::Mutex<Session<S>>);
///
/// impl<S: Smbus> SessionMutex for StrictLock<S> {
///     type Session = Session<S>;
///
///     fn create(session: Session<S>) -> Self {
///         Self(std::sync::Mutex::new(session))
///     }
///
///     fn lock<R, F: FnOnce(&mut Self::Session) -> R>(&self, f: F) -> R {
///         let mut session = self.0.lock().expect("session lock poisoned");
///         f(&mut session)
///     }
/// }
/// ```
pub trait SessionMutex {
    type Session;

    fn create(session: Self::Session) -> Self;

    /// Run `f` on the session with the lock held; nobody else reaches the bus meanwhile.
    fn lock<R, F: FnOnce(&mut Self::Session) -> R>(&self, f: F) -> R;
}

impl<T> SessionMutex for core::cell::RefCell<T> {
    type Session = T;

    fn create(session: Self::Session) -> Self {
        core::cell::RefCell::new(session)
    }

    fn lock<R, F: FnOnce(&mut Self::Session) -> R>(&self, f: F) -> R {
        // panics if a pin operation re-enters the lock from within `f`
        f(&mut self.borrow_mut())
    }
}

impl<T> SessionMutex for std::sync::Mutex<T> {
    type Session = T;

    fn create(session: Self::Session) -> Self {
        std::sync::Mutex::new(session)
    }

    fn lock<R, F: FnOnce(&mut Self::Session) -> R>(&self, f: F) -> R {
        let mut guard = self.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }
}
