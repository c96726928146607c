//! fareprep: flight fare feature engineering
//!
//! Turns raw flight booking records into numeric features for a fare
//! regression model. The [`pipeline`] module holds the transforms and the
//! pipeline types that chain them; [`cli`], [`report`] and [`utils`] back
//! the `fareprep` binary.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
