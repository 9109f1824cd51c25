//! Bike-share usage pipeline.
//!
//! Raw hourly records are classified once into a [`dataset::Dataset`]; each
//! query filters that snapshot with a [`filter::FilterSelection`], builds the
//! aggregation views and summarizes them into a [`types::Dashboard`] that can
//! be printed, exported as CSV, or published to S3.

pub mod aggregate;
pub mod dataset;
pub mod features;
pub mod filter;
pub mod publish;
pub mod summary;
pub mod tier;
pub mod types;
pub mod utility;
