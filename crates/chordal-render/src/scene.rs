//! Typed draw records handed to the external renderer.

use crate::chord::ChordEnd;
use crate::context::{LayoutContext, RingGeometry};
use crate::highlight::{Emphasis, HighlightState, HoverTarget};
use crate::label::{GuidePath, LabelGuide};
use crate::text::TextStyle;
use crate::theme::{ChordTheme, Paint};
use chordal_core::ZoneKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcGeometry {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeShape {
    pub entity: usize,
    pub name: String,
    pub value: f64,
    pub arc: ArcGeometry,
    pub paint: Paint,
    pub emphasis: Emphasis,
    pub hovered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneShape {
    pub zone: ZoneKey,
    pub value: f64,
    pub arc: ArcGeometry,
    pub paint: Paint,
    pub emphasis: Emphasis,
    pub hovered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RibbonShape {
    pub index: usize,
    pub source: ChordEnd,
    pub target: ChordEnd,
    pub radius: f64,
    /// Tooltip text.
    pub title: String,
    pub paint: Paint,
    pub emphasis: Emphasis,
    pub hovered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelShape {
    pub entity: usize,
    pub text: String,
    pub guide_id: String,
    pub guide: GuidePath,
    pub offset: f64,
    pub text_anchor: String,
    pub font: TextStyle,
    pub opacity: f64,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordScene {
    pub width: f64,
    pub height: f64,
    /// Everything below is drawn relative to this translation (the circle's center).
    pub translate_x: f64,
    pub translate_y: f64,
    pub geometry: RingGeometry,
    pub chords: Vec<RibbonShape>,
    pub nodes: Vec<NodeShape>,
    pub zones: Vec<ZoneShape>,
    pub guides: Vec<LabelGuide>,
    pub labels: Vec<LabelShape>,
}

fn fmt_number(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.6}", (v * 1e6).round() / 1e6);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

pub fn build_scene(
    context: &LayoutContext,
    state: &HighlightState,
    theme: &ChordTheme,
    width: f64,
    height: f64,
    font: &TextStyle,
) -> ChordScene {
    let g = context.geometry;

    let chords = context
        .layout
        .chords
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let emphasis = state.chord_emphasis(i);
            let hovered = state.is_hovered(HoverTarget::Chord(i));
            RibbonShape {
                index: i,
                source: c.source,
                target: c.target,
                radius: g.ribbon_radius,
                title: fmt_number(c.value()),
                paint: theme.chord_paint(emphasis, hovered),
                emphasis,
                hovered,
            }
        })
        .collect();

    let zones = context
        .zones()
        .iter()
        .map(|z| {
            let emphasis = state.zone_emphasis(z.key);
            let hovered = state.is_hovered(HoverTarget::Zone(z.key));
            ZoneShape {
                zone: z.key,
                value: z.value,
                arc: ArcGeometry {
                    start_angle: z.start_angle,
                    end_angle: z.end_angle,
                    inner_radius: g.zone_inner_radius,
                    outer_radius: g.zone_outer_radius,
                    corner_radius: g.corner_radius,
                },
                paint: theme.zone_paint(z.key.direction, emphasis, hovered),
                emphasis,
                hovered,
            }
        })
        .collect();

    let nodes = context
        .nodes
        .iter()
        .map(|n| {
            let emphasis = state.node_emphasis(n.index);
            let hovered = state.is_hovered(HoverTarget::Node(n.index));
            NodeShape {
                entity: n.index,
                name: n.name.clone(),
                value: n.value,
                arc: ArcGeometry {
                    start_angle: n.start_angle,
                    end_angle: n.end_angle,
                    inner_radius: g.inner_radius,
                    outer_radius: g.outer_radius,
                    corner_radius: g.corner_radius,
                },
                paint: theme.node_paint(emphasis, hovered),
                emphasis,
                hovered,
            }
        })
        .collect();

    let labels = context
        .labels
        .iter()
        .map(|l| {
            let emphasis = state.node_emphasis(l.node);
            let guide_id = context
                .guides
                .get(l.guide.index())
                .map(|gd| gd.id.clone())
                .unwrap_or_default();
            LabelShape {
                entity: l.node,
                text: l.text.clone(),
                guide_id,
                guide: l.guide,
                offset: l.offset,
                text_anchor: "middle".to_string(),
                font: font.clone(),
                opacity: theme.label_opacity(emphasis),
                emphasis,
            }
        })
        .collect();

    ChordScene {
        width,
        height,
        translate_x: g.center_x,
        translate_y: g.center_y,
        geometry: g,
        chords,
        nodes,
        zones,
        guides: context.guides.clone(),
        labels,
    }
}
