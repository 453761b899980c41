//! Manufacturer identity resolution for electronic-component part numbers.
//!
//! Given a part number, the [`Pipeline`] searches the web for candidate
//! pages, drops distributor listings, extracts a manufacturer name (from
//! structured data, page metadata, or the result title), looks up the
//! manufacturer's headquarters address with a second search, and reduces
//! that address to a `City, Region` pair.

pub mod address;
pub mod error;
pub mod extract;
pub mod filter;
pub mod locality;
mod meta;
pub mod pipeline;
pub mod scorer;
pub mod state;
pub mod strategy;
pub mod structured;

pub use error::{ResolveError, StageMiss};
pub use pipeline::{Pipeline, PipelineOptions, Resolution};
pub use state::{PipelineState, Stage};
pub use strategy::NameStrategy;
