//! Integration test fixture for autotag.
//!
//! Wires an in-memory tag store to a running constraint handler and
//! exposes name-based helpers so scenario tests read like the events a
//! download client would report.

mod error;

pub use assertion::Expect;
pub use error::{FixtureError, FixtureResult};
pub use fixture::{Fixture, FixtureBuilder};

/// Everything a scenario test needs.
pub mod prelude {
    pub use crate::{Expect, Fixture, FixtureBuilder, FixtureError, FixtureResult};
    pub use autotag_core::{
        Download, ManualClock, Network, ScriptError, ScriptHost, ScriptResult, ShareRatio, Tag, TagRef, Value,
    };
    pub use autotag_handler::{HandlerConfig, HandlerError, TagState};
    pub use autotag_store::DownloadAttrs;
    pub use std::time::Duration;
}
