//! Typestate markers for the display driver lifecycle
//!
//! A driver starts out [`Uninitialized`] and only becomes [`Active`] once the controller's
//! oscillator has been started. Rendering and control operations are only implemented for the
//! active state, so the type system rejects any use of a display that has not been brought up.

/// The controller has not been sent its start-up sequence yet
pub struct Uninitialized;
/// The oscillator is running and the display accepts commands
pub struct Active;

/// A sealed marker trait for the driver lifecycle states
///
/// Since this trait is sealed, no further states can be added outside of this crate.
pub trait DriverState: sealed::Sealed {}

mod sealed {
    use super::{Active, Uninitialized};

    pub trait Sealed {}
    impl Sealed for Uninitialized {}
    impl Sealed for Active {}
}

impl DriverState for Uninitialized {}
impl DriverState for Active {}
