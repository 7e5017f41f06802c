//! Report dashboard: Elm-style state, pure reducer, controller and runtime.

pub mod controller;
pub mod model;
pub mod runtime;
pub mod update;

#[cfg(test)]
mod test_properties;

pub use controller::DashboardController;
pub use model::{DashboardCmd, DashboardMsg, DashboardState, Tab};
