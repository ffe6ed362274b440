//! Data model shared between the checksheet API and its clients.
//!
//! Everything in here is plain serde data: the backend owns persistence and
//! policy, this crate only fixes the wire shapes.

pub mod model;
pub mod requests;
