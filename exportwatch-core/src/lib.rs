//! Exportwatch Core
//!
//! Core types for tracking a server-side export job.
//!
//! This crate contains:
//! - Domain types: the export identifier, reported export status and the
//!   poll state a watcher maintains
//! - DTOs: the JSend envelope the export service answers with

pub mod domain;
pub mod dto;
