//! Mock infrastructure for the upstream services
//!
//! This module provides wiremock servers standing in for:
//! - Gemini (generateContent)
//! - Sanity (data/query and data/mutate)
//!
//! All mocks support success, error and slow-response scenarios, and can
//! assert how many calls reached them.

pub mod gemini;

pub use gemini::*;
pub use sanity::*;
