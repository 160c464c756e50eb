use crate::chord::Zone;
use crate::{Error, Result};
use chordal_core::ZoneKey;
use serde::{Deserialize, Serialize};

/// One entity's arc: both of its zones plus a small angular margin on either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub index: usize,
    pub name: String,
    /// Label text; the full name until the label planner abbreviates it.
    pub short_name: String,
    pub outgoing: ZoneKey,
    pub incoming: ZoneKey,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

impl Node {
    pub fn zones(&self) -> [ZoneKey; 2] {
        [self.outgoing, self.incoming]
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Folds the zone array into one node per entity.
///
/// `zones` must hold exactly two zones (outgoing, incoming) per name, in layout order.
pub fn assemble_nodes(names: &[String], zones: &[Zone], angle_margin: f64) -> Result<Vec<Node>> {
    if zones.len() != names.len() * 2 {
        return Err(Error::InvalidModel {
            message: format!(
                "expected {} zones for {} entities, got {}",
                names.len() * 2,
                names.len(),
                zones.len()
            ),
        });
    }

    let nodes = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let out = &zones[ZoneKey::outgoing(i).slot()];
            let inc = &zones[ZoneKey::incoming(i).slot()];
            Node {
                index: i,
                name: name.clone(),
                short_name: name.clone(),
                outgoing: out.key,
                incoming: inc.key,
                start_angle: out.start_angle - angle_margin,
                end_angle: inc.end_angle + angle_margin,
                value: out.value + inc.value,
            }
        })
        .collect();
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(slot: usize, start: f64, end: f64, value: f64) -> Zone {
        Zone {
            key: ZoneKey::from_slot(slot),
            start_angle: start,
            end_angle: end,
            value,
        }
    }

    #[test]
    fn node_spans_both_zones_with_margin() {
        let zones = vec![zone(0, 0.0, 1.0, 10.0), zone(1, 1.04, 1.5, 4.0)];
        let nodes = assemble_nodes(&["A".to_string()], &zones, 0.01).unwrap();
        assert_eq!(nodes.len(), 1);
        let a = &nodes[0];
        assert_eq!(a.start_angle, -0.01);
        assert!((a.end_angle - 1.51).abs() < 1e-12);
        assert_eq!(a.value, 14.0);
        assert_eq!(a.zones(), [ZoneKey::outgoing(0), ZoneKey::incoming(0)]);
        assert_eq!(a.short_name, "A");
    }

    #[test]
    fn mismatched_zone_count_is_an_invalid_model() {
        let zones = vec![zone(0, 0.0, 1.0, 1.0)];
        let err = assemble_nodes(&["A".to_string()], &zones, 0.01).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid layout model: expected 2 zones for 1 entities, got 1"
        );
    }
}
