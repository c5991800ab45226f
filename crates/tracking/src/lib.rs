//! Event ingestion and session aggregation for SiteSentry.
//!
//! The [`Recorder`](recorder::Recorder) is the write pipeline: validate the
//! payload, append it to the matching event log, then maintain the
//! session-summary aggregate best-effort. Honeypot events additionally run
//! through the [`threat`] classifier and raise the session's suspicious
//! flags.
//!
//! [`script`] renders the client-side half of the system -- the tracking
//! script that mints the session token and reports events back.

pub mod contact;
pub mod events;
pub mod recorder;
pub mod script;
pub mod threat;
pub mod traps;

pub use events::{ClickPayload, ClientContext, HoneypotPayload, PageViewPayload, VisitorPayload};
pub use recorder::Recorder;
pub use threat::{classify, ThreatLevel};
