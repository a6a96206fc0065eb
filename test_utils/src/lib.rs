//! Utility helpers for tests.
//!
//! Builders for synthetic hands placed at screen positions and for small
//! physics scenes, shared by the integration suites.

pub mod hands;
pub mod scene;

pub use hands::{detection, open_hand_at, pinching_hand_at, to_normalised};
pub use scene::{add_body, material, step_input, test_engine, unit_mass_circle};
