//! Angular layout of zones and chords around a full circle.

use chordal_core::{Direction, ExpandedMatrix, SubgroupOrder, ZoneKey};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::TAU;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub key: ZoneKey,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

impl Zone {
    /// Position in layout order.
    pub fn index(&self) -> usize {
        self.key.slot()
    }

    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// One end of a chord: the sub-arc of a zone the ribbon attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordEnd {
    pub zone: ZoneKey,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

impl ChordEnd {
    pub fn index(&self) -> usize {
        self.zone.slot()
    }
}

/// A directed ribbon from an outgoing zone to another entity's incoming zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub source: ChordEnd,
    pub target: ChordEnd,
}

impl Chord {
    pub fn source_entity(&self) -> usize {
        self.source.zone.entity
    }

    pub fn target_entity(&self) -> usize {
        self.target.zone.entity
    }

    pub fn value(&self) -> f64 {
        self.source.value
    }

    pub fn touches(&self, zone: ZoneKey) -> bool {
        self.source.zone == zone || self.target.zone == zone
    }

    /// Whether `other` links the same two entities, in either direction.
    pub fn is_twin_of(&self, other: &Chord) -> bool {
        let (s, t) = (self.source_entity(), self.target_entity());
        let (os, ot) = (other.source_entity(), other.target_entity());
        (os == s && ot == t) || (os == t && ot == s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChordLayout {
    /// All `2N` zones in layout order (`zones[k].index() == k`).
    pub zones: Vec<Zone>,
    /// Chords ordered by source entity, then target entity.
    pub chords: Vec<Chord>,
    /// Gap actually placed after every zone.
    pub pad_angle: f64,
}

impl ChordLayout {
    pub fn entity_count(&self) -> usize {
        self.zones.len() / 2
    }

    pub fn zone(&self, key: ZoneKey) -> Option<&Zone> {
        if key.entity >= self.entity_count() {
            return None;
        }
        self.zones.get(key.slot())
    }
}

fn f64_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Zones on the other side of every non-zero cell in `key`'s row (outgoing) or column (incoming).
fn partners(matrix: &ExpandedMatrix, key: ZoneKey, order: SubgroupOrder) -> Vec<(ZoneKey, f64)> {
    let n = matrix.entity_count();
    let mut out: Vec<(ZoneKey, f64)> = (0..n)
        .filter(|&other| other != key.entity)
        .filter_map(|other| {
            let (partner, v) = match key.direction {
                Direction::Outgoing => (ZoneKey::incoming(other), matrix.flow(key.entity, other)),
                Direction::Incoming => (ZoneKey::outgoing(other), matrix.flow(other, key.entity)),
            };
            (v > 0.0).then_some((partner, v))
        })
        .collect();

    match order {
        SubgroupOrder::Index => {}
        SubgroupOrder::Ascending => {
            out.sort_by(|a, b| f64_cmp(a.1, b.1).then_with(|| a.0.cmp(&b.0)));
        }
        SubgroupOrder::Descending => {
            out.sort_by(|a, b| f64_cmp(b.1, a.1).then_with(|| a.0.cmp(&b.0)));
        }
    }
    out
}

/// Lays the `2N` zones of `matrix` around the circle starting at angle 0.
///
/// Each zone's width is proportional to its value; `pad_angle` is inserted after every zone.
/// The pad is capped at `2π / 2N`, and when there is no flow at all the whole circle is
/// distributed as padding, so zone spans plus gaps always add up to `2π`.
pub fn layout_chords(matrix: &ExpandedMatrix, pad_angle: f64, order: SubgroupOrder) -> ChordLayout {
    let dim = matrix.dimension();
    if dim == 0 {
        return ChordLayout::default();
    }

    let values: Vec<f64> = matrix.zone_keys().map(|k| matrix.zone_value(k)).collect();
    let total: f64 = values.iter().sum();

    let mut pad = if pad_angle.is_finite() && pad_angle > 0.0 {
        pad_angle
    } else {
        0.0
    };
    pad = pad.min(TAU / dim as f64);

    let (k, gap) = if total > 0.0 {
        ((TAU - pad * dim as f64).max(0.0) / total, pad)
    } else {
        (0.0, TAU / dim as f64)
    };

    let mut sub_arcs: FxHashMap<(ZoneKey, ZoneKey), ChordEnd> = FxHashMap::default();
    let mut zones = Vec::with_capacity(dim);
    let mut x = 0.0;
    for (key, value) in matrix.zone_keys().zip(values.iter().copied()) {
        let x0 = x;
        for (partner, v) in partners(matrix, key, order) {
            let a0 = x;
            x += v * k;
            sub_arcs.insert(
                (key, partner),
                ChordEnd {
                    zone: key,
                    start_angle: a0,
                    end_angle: x,
                    value: v,
                },
            );
        }
        zones.push(Zone {
            key,
            start_angle: x0,
            end_angle: x,
            value,
        });
        x += gap;
    }

    let n = matrix.entity_count();
    let mut chords = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let out = ZoneKey::outgoing(i);
            let inc = ZoneKey::incoming(j);
            let (Some(source), Some(target)) =
                (sub_arcs.get(&(out, inc)), sub_arcs.get(&(inc, out)))
            else {
                continue;
            };
            chords.push(Chord {
                source: *source,
                target: *target,
            });
        }
    }

    tracing::debug!(
        zones = zones.len(),
        chords = chords.len(),
        total,
        pad_angle = gap,
        "laid out chord zones"
    );

    ChordLayout {
        zones,
        chords,
        pad_angle: gap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordal_core::{Entity, FlowTable};

    fn matrix(entities: &[Entity]) -> ExpandedMatrix {
        ExpandedMatrix::build(&FlowTable::from_entities(entities).unwrap())
    }

    fn abc() -> ExpandedMatrix {
        matrix(&[
            Entity::new("A").with_flow("B", 10.0),
            Entity::new("B").with_flow("A", 4.0).with_flow("C", 6.0),
            Entity::new("C"),
        ])
    }

    #[test]
    fn zone_widths_are_proportional_to_values() {
        let layout = layout_chords(&abc(), 0.04, SubgroupOrder::Index);
        let k = (TAU - 0.04 * 6.0) / 36.0;
        for zone in &layout.zones {
            assert!((zone.span() - zone.value * k).abs() < 1e-12);
        }
        assert_eq!(layout.zones[4].span(), 0.0);
        assert!((layout.zones[1].start_angle - (layout.zones[0].end_angle + 0.04)).abs() < 1e-12);
    }

    #[test]
    fn chords_pair_outgoing_and_incoming_sub_arcs() {
        let layout = layout_chords(&abc(), 0.04, SubgroupOrder::Index);
        let pairs: Vec<(usize, usize)> = layout
            .chords
            .iter()
            .map(|c| (c.source.index(), c.target.index()))
            .collect();
        assert_eq!(pairs, vec![(0, 3), (2, 1), (2, 5)]);

        for chord in &layout.chords {
            assert_eq!(chord.source.zone.direction, Direction::Outgoing);
            assert_eq!(chord.target.zone.direction, Direction::Incoming);
            assert_ne!(chord.source_entity(), chord.target_entity());
            assert_eq!(chord.source.value, chord.target.value);
        }
    }

    #[test]
    fn incoming_zone_orders_sources_by_index() {
        // B receives from A (3) and from C (1); index order puts A's sub-arc first.
        let m = matrix(&[
            Entity::new("A").with_flow("B", 3.0),
            Entity::new("B"),
            Entity::new("C").with_flow("B", 1.0),
        ]);
        let layout = layout_chords(&m, 0.0, SubgroupOrder::Index);
        let b_in = layout.zone(ZoneKey::incoming(1)).unwrap();
        let from_a = layout.chords.iter().find(|c| c.source_entity() == 0).unwrap();
        let from_c = layout.chords.iter().find(|c| c.source_entity() == 2).unwrap();
        assert_eq!(from_a.target.start_angle, b_in.start_angle);
        assert_eq!(from_c.target.end_angle, b_in.end_angle);

        let layout = layout_chords(&m, 0.0, SubgroupOrder::Ascending);
        let from_c = layout.chords.iter().find(|c| c.source_entity() == 2).unwrap();
        let b_in = layout.zone(ZoneKey::incoming(1)).unwrap();
        assert_eq!(from_c.target.start_angle, b_in.start_angle);
    }

    #[test]
    fn descending_order_puts_largest_partner_first() {
        let m = matrix(&[
            Entity::new("A").with_flow("B", 1.0).with_flow("C", 5.0),
            Entity::new("B"),
            Entity::new("C"),
        ]);
        let layout = layout_chords(&m, 0.0, SubgroupOrder::Descending);
        let a_out = layout.zone(ZoneKey::outgoing(0)).unwrap();
        let to_c = layout.chords.iter().find(|c| c.target_entity() == 2).unwrap();
        assert_eq!(to_c.source.start_angle, a_out.start_angle);
        // Chord order itself does not depend on the sub-arc order.
        assert_eq!(layout.chords[0].target_entity(), 1);
    }

    #[test]
    fn all_zero_flow_spreads_padding_over_the_circle() {
        let m = matrix(&[Entity::new("A"), Entity::new("B"), Entity::new("C")]);
        let layout = layout_chords(&m, 0.04, SubgroupOrder::Index);
        assert_eq!(layout.zones.len(), 6);
        assert!(layout.chords.is_empty());
        assert!((layout.pad_angle - TAU / 6.0).abs() < 1e-12);
        for zone in &layout.zones {
            assert_eq!(zone.span(), 0.0);
            assert!(zone.start_angle.is_finite());
        }
    }

    #[test]
    fn oversized_pad_angle_is_capped() {
        let layout = layout_chords(&abc(), 10.0, SubgroupOrder::Index);
        assert!((layout.pad_angle - TAU / 6.0).abs() < 1e-12);
        for zone in &layout.zones {
            assert!(zone.span().abs() < 1e-12);
        }
    }

    #[test]
    fn empty_matrix_lays_out_nothing() {
        let layout = layout_chords(&matrix(&[]), 0.04, SubgroupOrder::Index);
        assert!(layout.zones.is_empty());
        assert!(layout.chords.is_empty());
    }

    #[test]
    fn zone_lookup_misses_for_unknown_entities() {
        let layout = layout_chords(&abc(), 0.04, SubgroupOrder::Index);
        assert!(layout.zone(ZoneKey::incoming(2)).is_some());
        assert!(layout.zone(ZoneKey::outgoing(3)).is_none());
        assert!(layout.zone(ZoneKey::incoming(usize::MAX)).is_none());
        assert!(layout.zone(ZoneKey::outgoing(usize::MAX / 2 + 1)).is_none());
    }
}
