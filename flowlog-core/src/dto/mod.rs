//! Data Transfer Objects for the backend log API
//!
//! Each DTO serializes to the exact query string of one endpoint. Optional
//! fields that were not supplied are skipped entirely rather than sent empty.

pub mod log;
