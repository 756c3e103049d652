//! Test helpers module
//!
//! Mock servers and sample data shared by the integration tests.

#![allow(dead_code)]

pub mod form_mock;
pub mod test_data;

pub use form_mock::*;
pub use test_data::*;
