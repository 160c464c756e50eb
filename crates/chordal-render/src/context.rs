use crate::chord::{ChordLayout, Zone, layout_chords};
use crate::label::{LabelGuide, LabelPlan, LabelPlanner};
use crate::node::{Node, assemble_nodes};
use crate::text::{TextMeasurer, TextStyle};
use crate::Result;
use chordal_core::{ChordConfig, ExpandedMatrix, FlowTable, IsolatedEntities};
use serde::{Deserialize, Serialize};

/// Center and radii of the three rings (nodes, zones, ribbons) and the label guide circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub zone_inner_radius: f64,
    pub zone_outer_radius: f64,
    pub ribbon_radius: f64,
    pub label_radius: f64,
    pub corner_radius: f64,
}

impl RingGeometry {
    pub fn from_config(config: &ChordConfig) -> Self {
        let inner_w = config.inner_width();
        let inner_h = config.inner_height();
        let outer_radius = inner_w.min(inner_h) / 2.0;
        let inner_radius = (outer_radius - config.node_thickness).max(0.0);
        let half_zone = config.zone_thickness / 2.0;
        Self {
            center_x: config.margin.left + inner_w / 2.0,
            center_y: config.margin.top + inner_h / 2.0,
            outer_radius,
            inner_radius,
            zone_inner_radius: (inner_radius - half_zone).max(0.0),
            zone_outer_radius: inner_radius + half_zone,
            ribbon_radius: inner_radius,
            label_radius: (inner_radius + outer_radius) / 2.0,
            corner_radius: config.corner_radius,
        }
    }
}

/// Everything computed for one dataset. Replaced wholesale when the data or geometry changes.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutContext {
    pub table: FlowTable,
    pub matrix: ExpandedMatrix,
    pub layout: ChordLayout,
    pub nodes: Vec<Node>,
    pub labels: Vec<LabelPlan>,
    pub guides: Vec<LabelGuide>,
    pub geometry: RingGeometry,
}

impl LayoutContext {
    pub fn build(
        table: FlowTable,
        config: &ChordConfig,
        measurer: &dyn TextMeasurer,
        id_prefix: Option<&str>,
    ) -> Result<Self> {
        let table = match config.isolated_entities {
            IsolatedEntities::Render => table,
            IsolatedEntities::Omit => table.without_isolated(),
        };
        let matrix = ExpandedMatrix::build(&table);
        let layout = layout_chords(&matrix, config.pad_angle, config.subgroup_order);
        let mut nodes = assemble_nodes(table.names(), &layout.zones, config.node_angle_margin)?;
        let geometry = RingGeometry::from_config(config);

        let style = TextStyle::from(&config.label_font);
        let planner = LabelPlanner::new(geometry.label_radius, config.label_margin, &style, measurer);
        let labels = planner.plan_all(&nodes);
        for (node, label) in nodes.iter_mut().zip(&labels) {
            node.short_name = label.text.clone();
        }
        let guides = planner.guides(id_prefix);

        tracing::debug!(
            entities = table.len(),
            nodes = nodes.len(),
            chords = layout.chords.len(),
            abbreviated = labels.iter().filter(|l| l.abbreviated).count(),
            "built chord layout context"
        );

        Ok(Self {
            table,
            matrix,
            layout,
            nodes,
            labels,
            guides,
            geometry,
        })
    }

    pub fn zones(&self) -> &[Zone] {
        &self.layout.zones
    }

    pub fn entity_name(&self, entity: usize) -> Option<&str> {
        self.table.name(entity)
    }

    pub fn entity_index(&self, name: &str) -> Option<usize> {
        self.table.index_of(name)
    }

    /// Index of the chord carrying `source -> target`, if that flow is non-zero.
    pub fn chord_between(&self, source: usize, target: usize) -> Option<usize> {
        self.layout
            .chords
            .iter()
            .position(|c| c.source_entity() == source && c.target_entity() == target)
    }
}
