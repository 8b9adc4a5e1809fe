//! Domain layer: pure value types with no I/O.
//!
//! Everything here is cheap to clone, compares by value, and can be built in
//! a test without any runtime.

pub mod color;
pub mod event;
pub mod session;

pub use color::{Color, ColorPalette, PaletteError};
pub use event::{DrawEvent, Point};
pub use session::{Session, SessionId};
