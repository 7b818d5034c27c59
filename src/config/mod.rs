//! Engine configuration.

pub mod defaults;
