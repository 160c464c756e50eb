#![forbid(unsafe_code)]

//! Headless layout and hover model for directed chord diagrams.
//!
//! Pipeline: [`chordal_core::ExpandedMatrix`] -> [`chord::layout_chords`] ->
//! [`node::assemble_nodes`] -> [`label::LabelPlanner`]. Hover events go through
//! [`highlight::HighlightResolver`], which reads the finished [`context::LayoutContext`].
//! Drawing is left to the host: [`scene::ChordScene`] carries every arc, ribbon and label as
//! plain angles, radii and paint.

pub mod chord;
pub mod color;
pub mod context;
pub mod diagram;
pub mod highlight;
pub mod label;
pub mod node;
pub mod scene;
pub mod text;
pub mod theme;

use crate::context::LayoutContext;
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use chordal_core::{ChordConfig, FlowTable};
use serde_json::Value;
use std::sync::Arc;

pub use diagram::ChordDiagram;
pub use highlight::{HighlightListener, HoverTarget};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] chordal_core::Error),
    #[error("invalid layout model: {message}")]
    InvalidModel { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions").finish_non_exhaustive()
    }
}

pub fn layout_flow_table(
    table: FlowTable,
    config: &ChordConfig,
    options: &LayoutOptions,
) -> Result<LayoutContext> {
    LayoutContext::build(table, config, options.text_measurer.as_ref(), None)
}

pub fn layout_records(
    records: &[Value],
    config: &ChordConfig,
    options: &LayoutOptions,
) -> Result<LayoutContext> {
    let table = FlowTable::from_records(records, &config.name_key)?;
    layout_flow_table(table, config, options)
}
