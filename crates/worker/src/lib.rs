//! Worker primitives shared by the navigation crates.
//!
//! * [`TaskClass`]: what kind of work a spawned task performs, for tracing
//! * [`spawn`]: runtime-aware task spawning
//! * [`GenerationClock`] / [`GenerationToken`]: tagging of in-flight fetches so
//!   late completions can be recognised and dropped

mod class;
mod panic;
mod spawn;
mod token;

pub use class::TaskClass;
pub use panic::join_error_panic_message;
pub use spawn::spawn;
pub use token::{GenerationClock, GenerationToken};
