//! # Campground Scan
//!
//! This crate turns recreation.gov data into answers: which campsites of an
//! asset match a set of filters and which nights they are free. It provides
//! the campsite catalog, month-by-month availability aggregation, the
//! name-dispatched filter chains both run through, and the consolidation of
//! free nights into date ranges.

/// Errors for campground scan operations
mod error;
pub use error::*;

/// Date keys and month anchors
mod dates;
pub use dates::*;

/// Collapsing available nights into consecutive ranges
mod consolidate;
pub use consolidate::*;

/// Filters looked up by name and applied in order
mod filter_chain;
pub use filter_chain::*;

/// A single campsite and its availability
mod campsite;
pub use campsite::*;

/// Accumulated per-site availability and its filters
mod availability;
pub use availability::*;

/// All campsites of an asset and their filters
mod catalog;
pub use catalog::*;

/// Month fetching and availability filtering for an asset
mod aggregator;
pub use aggregator::*;

#[cfg(test)]
mod test_fixtures;
