//! Flowlog Core
//!
//! Core types for the Flowlog log-query adapter.
//!
//! This crate contains:
//! - Domain types: log levels accepted by the backend filters
//! - DTOs: query-parameter shapes sent to the backend log API

pub mod domain;
pub mod dto;
