#![forbid(unsafe_code)]

//! DreamLens report (dlr): the monthly dream-journal report dashboard.
//!
//! A report payload for one month is turned into:
//! 1. **Dream-type chart** with good, bad and normal dreams in fixed order
//! 2. **Emotion chart** colored by a first-match keyword rule table
//! 3. **Keyword cloud** with weight-scaled sizes, retried until its engine loads
//!
//! The dashboard renders through host traits, so the same controller drives
//! the headless page used in tests and by `dlr render`, and the terminal UI.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use dreamlens_report::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use dreamlens_report::core::config::Config;
//! use dreamlens_report::report::aggregate::build_dream_view_model;
//! ```

pub mod prelude;

#[cfg(feature = "cli")]
pub mod cli;
pub mod core;
pub mod dashboard;
pub mod host;
pub mod logger;
pub mod report;
