//! Hover emphasis: which nodes, zones and chords light up together.
//!
//! Node and zone hovers expand to every neighbor they exchange flow with. A chord hover stays
//! local to its two zones but always brings its twin (the opposite-direction chord between the
//! same two entities) along.

use crate::chord::ChordLayout;
use crate::context::LayoutContext;
use chordal_core::{Direction, ZoneKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverTarget {
    Node(usize),
    Zone(ZoneKey),
    Chord(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSet {
    /// Indices into the chord array.
    pub chords: BTreeSet<usize>,
    pub zones: BTreeSet<ZoneKey>,
}

impl HighlightSet {
    pub fn contains_chord(&self, chord: usize) -> bool {
        self.chords.contains(&chord)
    }

    pub fn contains_zone(&self, zone: ZoneKey) -> bool {
        self.zones.contains(&zone)
    }

    /// A node is emphasized when either of its zones is.
    pub fn contains_node(&self, entity: usize) -> bool {
        self.contains_zone(ZoneKey::outgoing(entity)) || self.contains_zone(ZoneKey::incoming(entity))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Default,
    Full,
    Dimmed,
}

/// Chords touching any seed zone, and every zone those chords touch (seeds included).
fn expand_from_zones(layout: &ChordLayout, seeds: &[ZoneKey]) -> HighlightSet {
    let mut set = HighlightSet {
        chords: BTreeSet::new(),
        zones: seeds.iter().copied().collect(),
    };
    for (i, chord) in layout.chords.iter().enumerate() {
        if seeds.iter().any(|&z| chord.touches(z)) {
            set.chords.insert(i);
            set.zones.insert(chord.source.zone);
            set.zones.insert(chord.target.zone);
        }
    }
    set
}

/// Computes the emphasis set for `target`, or `None` when it no longer exists in `layout`.
pub fn resolve_highlight(layout: &ChordLayout, target: HoverTarget) -> Option<HighlightSet> {
    match target {
        HoverTarget::Node(entity) => {
            if entity >= layout.entity_count() {
                return None;
            }
            Some(expand_from_zones(
                layout,
                &[ZoneKey::outgoing(entity), ZoneKey::incoming(entity)],
            ))
        }
        HoverTarget::Zone(zone) => {
            layout.zone(zone)?;
            Some(expand_from_zones(layout, &[zone]))
        }
        HoverTarget::Chord(index) => {
            let hovered = layout.chords.get(index)?;
            let chords = layout
                .chords
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_twin_of(hovered))
                .map(|(i, _)| i)
                .collect();
            let zones = [hovered.source.zone, hovered.target.zone].into_iter().collect();
            Some(HighlightSet { chords, zones })
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum HighlightState {
    #[default]
    Idle,
    Focused {
        target: HoverTarget,
        set: HighlightSet,
    },
}

impl HighlightState {
    pub fn is_idle(&self) -> bool {
        matches!(self, HighlightState::Idle)
    }

    pub fn target(&self) -> Option<HoverTarget> {
        match self {
            HighlightState::Idle => None,
            HighlightState::Focused { target, .. } => Some(*target),
        }
    }

    pub fn set(&self) -> Option<&HighlightSet> {
        match self {
            HighlightState::Idle => None,
            HighlightState::Focused { set, .. } => Some(set),
        }
    }

    fn emphasis(&self, hit: impl FnOnce(&HighlightSet) -> bool) -> Emphasis {
        match self {
            HighlightState::Idle => Emphasis::Default,
            HighlightState::Focused { set, .. } => {
                if hit(set) {
                    Emphasis::Full
                } else {
                    Emphasis::Dimmed
                }
            }
        }
    }

    pub fn chord_emphasis(&self, chord: usize) -> Emphasis {
        self.emphasis(|s| s.contains_chord(chord))
    }

    pub fn zone_emphasis(&self, zone: ZoneKey) -> Emphasis {
        self.emphasis(|s| s.contains_zone(zone))
    }

    pub fn node_emphasis(&self, entity: usize) -> Emphasis {
        self.emphasis(|s| s.contains_node(entity))
    }

    pub fn is_hovered(&self, target: HoverTarget) -> bool {
        self.target() == Some(target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeHighlight {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneHighlight {
    pub name: String,
    pub direction: Direction,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordHighlight {
    pub source_name: String,
    pub target_name: String,
    pub value: f64,
}

/// Host callbacks, one per event kind. Every method defaults to doing nothing.
pub trait HighlightListener {
    fn on_highlight_node(&mut self, _event: &NodeHighlight) {}
    fn on_highlight_zone(&mut self, _event: &ZoneHighlight) {}
    fn on_highlight_chord(&mut self, _event: &ChordHighlight) {}
    fn on_clear(&mut self) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl HighlightListener for NoopListener {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HighlightEvent {
    HighlightNode(NodeHighlight),
    HighlightZone(ZoneHighlight),
    HighlightChord(ChordHighlight),
    Clear,
}

/// Keeps every event it receives, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    pub events: Vec<HighlightEvent>,
}

impl HighlightListener for RecordingListener {
    fn on_highlight_node(&mut self, event: &NodeHighlight) {
        self.events.push(HighlightEvent::HighlightNode(event.clone()));
    }

    fn on_highlight_zone(&mut self, event: &ZoneHighlight) {
        self.events.push(HighlightEvent::HighlightZone(event.clone()));
    }

    fn on_highlight_chord(&mut self, event: &ChordHighlight) {
        self.events.push(HighlightEvent::HighlightChord(event.clone()));
    }

    fn on_clear(&mut self) {
        self.events.push(HighlightEvent::Clear);
    }
}

/// Two-state hover machine (`Idle` / `Focused`) over one layout context.
#[derive(Debug, Clone, Default)]
pub struct HighlightResolver {
    state: HighlightState,
}

impl HighlightResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    /// Hover-enter. Replaces any active highlight in one step; a target that no longer exists
    /// clears instead. Returns whether the resolver ended up focused.
    pub fn enter(
        &mut self,
        context: &LayoutContext,
        target: HoverTarget,
        listener: &mut dyn HighlightListener,
    ) -> bool {
        let Some(set) = resolve_highlight(&context.layout, target) else {
            tracing::trace!(?target, "hover target is stale; clearing");
            self.exit(listener);
            return false;
        };
        tracing::trace!(
            ?target,
            chords = set.chords.len(),
            zones = set.zones.len(),
            "focused highlight"
        );
        self.state = HighlightState::Focused { target, set };
        Self::notify(context, target, listener);
        true
    }

    /// Hover-exit. Does nothing when already idle.
    pub fn exit(&mut self, listener: &mut dyn HighlightListener) {
        if self.state.is_idle() {
            return;
        }
        self.state = HighlightState::Idle;
        tracing::trace!("cleared highlight");
        listener.on_clear();
    }

    fn notify(context: &LayoutContext, target: HoverTarget, listener: &mut dyn HighlightListener) {
        match target {
            HoverTarget::Node(entity) => {
                if let Some(name) = context.entity_name(entity) {
                    listener.on_highlight_node(&NodeHighlight {
                        name: name.to_string(),
                    });
                }
            }
            HoverTarget::Zone(zone) => {
                if let (Some(name), Some(z)) = (context.entity_name(zone.entity), context.layout.zone(zone))
                {
                    listener.on_highlight_zone(&ZoneHighlight {
                        name: name.to_string(),
                        direction: zone.direction,
                        value: z.value,
                    });
                }
            }
            HoverTarget::Chord(index) => {
                let Some(chord) = context.layout.chords.get(index) else {
                    return;
                };
                if let (Some(source), Some(target)) = (
                    context.entity_name(chord.source_entity()),
                    context.entity_name(chord.target_entity()),
                ) {
                    listener.on_highlight_chord(&ChordHighlight {
                        source_name: source.to_string(),
                        target_name: target.to_string(),
                        value: chord.value(),
                    });
                }
            }
        }
    }
}
