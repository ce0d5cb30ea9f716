//! # Framecode Core
//!
//! Core numeric types shared by the Framecode crates.
//!
//! - [`Rational`]: an exact, always-reduced fraction used for frame rates
//!   and second-based timestamps, with half-even rounding helpers.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod rational;

pub use error::{RationalError, Result};
pub use rational::Rational;
