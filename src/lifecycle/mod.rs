//! Lifecycle Management
//!
//! Sequences one service through startup, running, and shutdown, with an
//! operator-triggered restart path.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Argument Parsing
//!    ↓
//! 2. .env Loading (optional)
//!    ↓
//! 3. Module Preloading (optional)
//!    ↓
//! 4. Manifest Loading
//!    ↓
//! 5. Placeholder Resolution
//!    ↓
//! 6. Signal Registration
//!    ↓
//! 7. Composition + Server Start
//!    ↓
//! [Running...]
//!    ↓
//! 8a. Termination Signal → stop() → exit 0
//! 8b. Restart Signal     → stop() → back to 1 with the original argv
//! ```
//!
//! Every startup failure is fatal to the attempt and maps to exit code 1;
//! there is no automatic retry. The restart signal is a deliberate
//! redeploy trigger, not an error-recovery path.

mod controller;
mod signals;

pub use controller::LifecycleController;
pub use signals::{SignalEvent, SignalListener};
