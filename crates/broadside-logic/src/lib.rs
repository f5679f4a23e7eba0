//! Pure simulation logic for Broadside.
//!
//! This crate contains the math that is independent of the engine and its
//! state model. Functions take plain data and return results, making them
//! unit-testable and portable to tooling.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`angles`] | Degree normalization, precision limiting, range mapping |
//! | [`circles`] | Circle-circle perimeter intersection |
//! | [`gunnery`] | Shell detonation prediction and kill-zone checks |
//! | [`steering`] | Rotation/thrust controllers for guided objects |
//! | [`xy`] | 2D vector with the degrees-counter-clockwise convention |

pub mod angles;
pub mod circles;
pub mod gunnery;
pub mod steering;
pub mod xy;
