//! Shared helpers for the integration tests.

#![allow(dead_code)]

pub mod fake_canvas;
pub mod fixtures;
