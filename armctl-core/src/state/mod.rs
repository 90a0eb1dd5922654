//! Controller errors and engine events

pub mod error;
pub mod events;

pub use error::ArmError;
pub use events::Event;
