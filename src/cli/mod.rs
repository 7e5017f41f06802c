//! Terminal front ends, compiled with the `cli` feature.

pub mod dashboard;
