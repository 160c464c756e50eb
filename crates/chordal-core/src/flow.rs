use crate::{Error, Result};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::Value;

/// One input row: a named entity and the flow it sends to other entities, keyed by target name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    pub name: String,
    pub flows: IndexMap<String, f64>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flows: IndexMap::new(),
        }
    }

    pub fn with_flow(mut self, target: impl Into<String>, value: f64) -> Self {
        self.flows.insert(target.into(), value);
        self
    }
}

/// Ordered, validated entity-by-entity flow table.
///
/// Order is significant: it fixes each entity's index and therefore its position on the circle.
/// The diagonal is always zero and every stored value is finite and non-negative.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowTable {
    names: Vec<String>,
    flows: Vec<Vec<f64>>,
    index_by_name: FxHashMap<String, usize>,
}

/// Coerces a cell to a flow value. Anything that is not a finite, non-negative number (or a string
/// holding one) reads as zero.
pub fn coerce_flow(value: &Value) -> f64 {
    let v = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        _ => 0.0,
    };
    repair_flow(v)
}

fn repair_flow(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn record_name(index: usize, value: Option<&Value>, name_key: &str) -> Result<String> {
    let name = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            return Err(Error::InvalidRecord {
                index,
                message: format!("name under key {name_key:?} must be a string or number"),
            });
        }
        None => {
            return Err(Error::InvalidRecord {
                index,
                message: format!("missing name key {name_key:?}"),
            });
        }
    };
    if name.is_empty() {
        return Err(Error::InvalidRecord {
            index,
            message: "entity name is blank".to_string(),
        });
    }
    Ok(name)
}

impl FlowTable {
    /// Builds a table from names and a dense `flows[source][target]` grid.
    ///
    /// Missing cells read as zero, extra cells are ignored and invalid values are repaired to zero.
    pub fn new(names: Vec<String>, flows: Vec<Vec<f64>>) -> Result<Self> {
        let n = names.len();
        let mut index_by_name = FxHashMap::default();
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(Error::InvalidRecord {
                    index: i,
                    message: "entity name is blank".to_string(),
                });
            }
            if index_by_name.insert(name.clone(), i).is_some() {
                return Err(Error::DuplicateEntity { name: name.clone() });
            }
        }

        let mut dense = vec![vec![0.0; n]; n];
        for (i, row) in flows.iter().enumerate().take(n) {
            for (j, v) in row.iter().enumerate().take(n) {
                if i != j {
                    dense[i][j] = repair_flow(*v);
                }
            }
        }

        Ok(Self {
            names,
            flows: dense,
            index_by_name,
        })
    }

    pub fn from_entities(entities: &[Entity]) -> Result<Self> {
        let names: Vec<String> = entities.iter().map(|e| e.name.clone()).collect();
        let mut table = Self::new(names, Vec::new())?;
        for (i, entity) in entities.iter().enumerate() {
            for (target, value) in &entity.flows {
                let Some(j) = table.index_of(target) else {
                    tracing::trace!(source = %entity.name, target = %target, "ignoring flow to unknown entity");
                    continue;
                };
                if i != j {
                    table.flows[i][j] = repair_flow(*value);
                }
            }
        }
        Ok(table)
    }

    /// Parses records shaped like `{"<name_key>": "A", "B": 10, "C": "4"}`.
    pub fn from_records(records: &[Value], name_key: &str) -> Result<Self> {
        let mut entities = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let Some(obj) = record.as_object() else {
                return Err(Error::InvalidRecord {
                    index,
                    message: "record must be a JSON object".to_string(),
                });
            };
            let name = record_name(index, obj.get(name_key), name_key)?;
            let mut entity = Entity::new(name);
            for (key, value) in obj {
                if key == name_key {
                    continue;
                }
                entity.flows.insert(key.clone(), coerce_flow(value));
            }
            entities.push(entity);
        }
        Self::from_entities(&entities)
    }

    pub fn from_json_str(text: &str, name_key: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Array(records) => Self::from_records(&records, name_key),
            _ => Err(Error::InvalidRecord {
                index: 0,
                message: "expected a JSON array of records".to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    pub fn flow(&self, source: usize, target: usize) -> f64 {
        self.flows
            .get(source)
            .and_then(|row| row.get(target))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn outgoing_total(&self, index: usize) -> f64 {
        self.flows.get(index).map(|r| r.iter().sum()).unwrap_or(0.0)
    }

    pub fn incoming_total(&self, index: usize) -> f64 {
        self.flows.iter().map(|r| r.get(index).copied().unwrap_or(0.0)).sum()
    }

    pub fn total_flow(&self) -> f64 {
        self.flows.iter().flatten().sum()
    }

    /// An entity that neither sends nor receives anything.
    pub fn is_isolated(&self, index: usize) -> bool {
        self.outgoing_total(index) == 0.0 && self.incoming_total(index) == 0.0
    }

    /// Copy of the table with isolated entities removed; remaining entities keep their relative
    /// order but are re-indexed densely.
    pub fn without_isolated(&self) -> Self {
        let keep: Vec<usize> = (0..self.len()).filter(|&i| !self.is_isolated(i)).collect();
        if keep.len() == self.len() {
            return self.clone();
        }
        tracing::debug!(
            omitted = self.len() - keep.len(),
            "omitting isolated entities"
        );

        let names: Vec<String> = keep.iter().map(|&i| self.names[i].clone()).collect();
        let flows: Vec<Vec<f64>> = keep
            .iter()
            .map(|&i| keep.iter().map(|&j| self.flows[i][j]).collect())
            .collect();
        let index_by_name = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self {
            names,
            flows,
            index_by_name,
        }
    }
}
