//! Data Transfer Objects for the export service API
//!
//! DTOs mirror the JSON the export service sends over the wire. They are
//! converted into domain types before anything else looks at them.

pub mod status;
