#![forbid(unsafe_code)]

//! Data model for directed chord diagrams (headless).
//!
//! - [`FlowTable`]: ordered, validated entity-by-entity flows built from loose records
//! - [`ExpandedMatrix`]: the `2N x 2N` directional matrix that feeds the angular layout
//! - [`ChordConfig`]: typed configuration with partial JSON overrides

pub mod config;
pub mod error;
pub mod flow;
pub mod matrix;

pub use config::{ChordConfig, FontConfig, IsolatedEntities, Margin, SubgroupOrder};
pub use error::{Error, Result};
pub use flow::{Entity, FlowTable, coerce_flow};
pub use matrix::{Direction, ExpandedMatrix, ZoneKey};
