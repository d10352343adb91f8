//! Application Layer
//!
//! Use cases that wire infrastructure into domain services.
//!
//! - `Tracker` - per-root "needs build?" / "mark built" flow

mod tracker;

pub use tracker::Tracker;
