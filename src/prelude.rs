//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use classclock::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, DisplayConfig};
pub use crate::core::errors::{ClockError, Result};

// Clock
pub use crate::clock::{ClockState, InstantSource, TimeSampler, WeekdayFormatter};

// Display
pub use crate::display::activity::ActivityState;
pub use crate::display::input::InputKind;
pub use crate::display::pulse::PulseFlags;
pub use crate::display::{ClockDisplay, DisplayEvent};

// Presentation
pub use crate::presentation::{PresentationTree, UiFlags};
