//! Domain layer with calendar values and pure grid algorithms.

/// Calendar-day values and the public value contract.
pub mod date;
/// Error types.
pub mod errors;
/// Focus-target resolution.
pub mod focus;
/// Grid construction.
pub mod grid;
/// Bounded movement across enabled dates.
pub mod movement;
/// Keyboard navigation reducer.
pub mod navigation;
/// Range-selection geometry.
pub mod range;

pub use date::{DateValue, Granularity, TextDirection};
pub use errors::DateError;
pub use navigation::NavOutcome;
