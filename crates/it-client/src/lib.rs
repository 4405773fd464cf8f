//! # it-client
//!
//! Client side of the tracker REST API.
//!
//! - `gateway` - the [`TrackerGateway`] trait over the read endpoints
//! - `http` - [`HttpGateway`], its reqwest implementation
//! - `listing` - [`IssueListing`], filter/sort state plus last-issued-wins refreshes
//! - `login` - token verification and session persistence

pub mod error;
pub mod gateway;
pub mod http;
pub mod listing;
pub mod login;

pub use gateway::TrackerGateway;
#[cfg(any(test, feature = "mock"))]
pub use gateway::MockTrackerGateway;
pub use http::HttpGateway;
pub use listing::{IssueListing, ListingSnapshot, RefreshOutcome, LOAD_FAILED_MESSAGE};
pub use login::{login, logout, whoami, Identity};
