//! Core domain types
//!
//! Log entries themselves are owned by the backend and relayed verbatim,
//! so the only domain type modelled here is the level filter.

pub mod log;
