//! Route-level pages.

pub mod generator;
