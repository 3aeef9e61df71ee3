//! Weekly weigh-in reminders.
//!
//! Recipients are split into chunks that fit one multicast call. A chunk
//! that fails does not stop the rest, and every chunk's outcome is reported
//! back to the caller.

mod dispatch;

pub use dispatch::{ChunkOutcome, DispatchReport, dispatch_reminder, reminder_message};
