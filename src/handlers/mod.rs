//! HTTP request handlers
//!
//! This module organizes all API handlers into logical groups:
//! - `api` - Root descriptor and health check
//! - `speech` - Text-to-speech endpoint
//! - `voices` - Voice listing endpoint
//! - `capabilities` - Capability report endpoint

pub mod api;
pub mod capabilities;
pub mod speech;
pub mod voices;
