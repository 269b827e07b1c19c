//! Core domain types
//!
//! These types are shared between the HTTP client (which produces
//! [`export::ExportStatus`] values) and the poller (which folds them into
//! [`poll::PollState`]).

pub mod export;
pub mod poll;
