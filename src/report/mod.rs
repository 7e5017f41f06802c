//! Report data: payload ingestion, view models and the two panel renderers.

pub mod aggregate;
pub mod chart;
pub mod classify;
pub mod cloud;
pub mod payload;
pub mod series;
