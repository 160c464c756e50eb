//! Directional expansion of a flow table.
//!
//! Every entity contributes two zones to the circle: an outgoing half that carries the flow it
//! sends and an incoming half that carries the flow it receives. The expanded matrix is indexed by
//! [`ZoneKey`] on both axes and only ever populates `(outgoing i, incoming j)` cells for `i != j`.

use crate::flow::FlowTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Outgoing => "outgoing",
            Direction::Incoming => "incoming",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names one half-arc of the circle.
///
/// Keys order by entity first and outgoing before incoming, which is exactly the order zones are
/// laid out around the circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneKey {
    pub entity: usize,
    pub direction: Direction,
}

impl ZoneKey {
    pub fn outgoing(entity: usize) -> Self {
        Self {
            entity,
            direction: Direction::Outgoing,
        }
    }

    pub fn incoming(entity: usize) -> Self {
        Self {
            entity,
            direction: Direction::Incoming,
        }
    }

    /// Position of this zone in layout order (`2 * entity` for outgoing, `2 * entity + 1` for
    /// incoming). Saturates for entity indices no layout can hold, so lookups miss.
    pub fn slot(self) -> usize {
        let base = self.entity.saturating_mul(2);
        match self.direction {
            Direction::Outgoing => base,
            Direction::Incoming => base.saturating_add(1),
        }
    }

    pub fn from_slot(slot: usize) -> Self {
        if slot % 2 == 0 {
            Self::outgoing(slot / 2)
        } else {
            Self::incoming(slot / 2)
        }
    }

    /// The other half of the same entity.
    pub fn sibling(self) -> Self {
        Self {
            entity: self.entity,
            direction: self.direction.opposite(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedMatrix {
    entity_count: usize,
    cells: Vec<f64>,
}

impl ExpandedMatrix {
    /// Builds the `2N x 2N` matrix for `table`: `(outgoing i, incoming j) = flow(i -> j)`, every
    /// other cell is zero.
    pub fn build(table: &FlowTable) -> Self {
        let n = table.len();
        let dim = n * 2;
        let mut cells = vec![0.0; dim * dim];
        for i in 0..n {
            let row = ZoneKey::outgoing(i).slot();
            for j in 0..n {
                if i == j {
                    continue;
                }
                let col = ZoneKey::incoming(j).slot();
                cells[row * dim + col] = table.flow(i, j);
            }
        }
        tracing::debug!(
            entities = n,
            dimension = dim,
            total = table.total_flow(),
            "built expanded flow matrix"
        );
        Self {
            entity_count: n,
            cells,
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Number of rows (and columns).
    pub fn dimension(&self) -> usize {
        self.entity_count * 2
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count == 0
    }

    pub fn get(&self, row: ZoneKey, col: ZoneKey) -> f64 {
        self.cell(row.slot(), col.slot())
    }

    pub fn cell(&self, row: usize, col: usize) -> f64 {
        let dim = self.dimension();
        if row >= dim || col >= dim {
            return 0.0;
        }
        self.cells[row * dim + col]
    }

    /// Entity-level flow `source -> target`.
    pub fn flow(&self, source: usize, target: usize) -> f64 {
        self.get(ZoneKey::outgoing(source), ZoneKey::incoming(target))
    }

    pub fn row_sum(&self, key: ZoneKey) -> f64 {
        let dim = self.dimension();
        let row = key.slot();
        if row >= dim {
            return 0.0;
        }
        self.cells[row * dim..(row + 1) * dim].iter().sum()
    }

    pub fn column_sum(&self, key: ZoneKey) -> f64 {
        let dim = self.dimension();
        let col = key.slot();
        if col >= dim {
            return 0.0;
        }
        (0..dim).map(|row| self.cells[row * dim + col]).sum()
    }

    /// Flow carried by one zone: the row sum of an outgoing half (everything the entity sends) or
    /// the column sum of an incoming half (everything it receives).
    pub fn zone_value(&self, key: ZoneKey) -> f64 {
        match key.direction {
            Direction::Outgoing => self.row_sum(key),
            Direction::Incoming => self.column_sum(key),
        }
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    pub fn zone_keys(&self) -> impl Iterator<Item = ZoneKey> + '_ {
        (0..self.dimension()).map(ZoneKey::from_slot)
    }

    /// Dense row-major copy, mainly for debugging and snapshots.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        let dim = self.dimension();
        self.cells.chunks(dim.max(1)).map(|r| r.to_vec()).collect()
    }
}
