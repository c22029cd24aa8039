//! Course maintenance toolkit
//!
//! This library lists Panopto folder recordings, merges and restores Canvas
//! wiki pages, and sorts the assignments of a Canvas assignment group.

pub mod artifacts;
pub mod assignments;
pub mod canvas;
pub mod cli;
pub mod color;
pub mod commands;
pub mod config;
pub mod http;
pub mod pages;
pub mod panopto;
pub mod prompt;
