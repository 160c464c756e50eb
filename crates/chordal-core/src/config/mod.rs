use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PRIMARY_COLOR: &str = "#b2182b";
pub const DEFAULT_SECONDARY_COLOR: &str = "#2166ac";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 20.0,
            left: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontConfig {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_family: Some("sans-serif".to_string()),
            font_size: 16.0,
            font_weight: None,
        }
    }
}

/// What to do with an entity that has no flow in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolatedEntities {
    /// Keep it as a zero-width arc between two padding gaps.
    #[default]
    Render,
    /// Drop it before the matrix is built.
    Omit,
}

/// Order of chord endpoints inside one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubgroupOrder {
    /// Ascending by the paired zone's position on the circle.
    #[default]
    Index,
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChordConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub node_thickness: f64,
    pub zone_thickness: f64,
    pub corner_radius: f64,
    /// Gap between adjacent zones, in radians.
    pub pad_angle: f64,
    /// How far a node arc extends past its two zones on each side, in radians.
    pub node_angle_margin: f64,
    /// Pixels a label must leave free along its node arc before it gets abbreviated.
    pub label_margin: f64,
    pub label_font: FontConfig,
    pub primary_color: String,
    pub secondary_color: String,
    pub isolated_entities: IsolatedEntities,
    pub subgroup_order: SubgroupOrder,
    /// Record key that holds the row's own entity name.
    pub name_key: String,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            margin: Margin::default(),
            node_thickness: 40.0,
            zone_thickness: 10.0,
            corner_radius: 5.0,
            pad_angle: 0.04,
            node_angle_margin: 0.01,
            label_margin: 10.0,
            label_font: FontConfig::default(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            isolated_entities: IsolatedEntities::Render,
            subgroup_order: SubgroupOrder::Index,
            name_key: String::new(),
        }
    }
}

impl ChordConfig {
    /// Applies a partial JSON object on top of the defaults.
    pub fn from_json(overrides: &Value) -> Result<Self> {
        let mut base = serde_json::to_value(Self::default())?;
        deep_merge_value(&mut base, overrides);
        let cfg: Self = serde_json::from_value(base).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        if !overrides.is_object() {
            return Err(Error::InvalidConfig {
                message: "config must be a JSON object".to_string(),
            });
        }
        Self::from_json(&overrides)
    }

    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("width", self.width),
            ("height", self.height),
            ("margin.top", self.margin.top),
            ("margin.right", self.margin.right),
            ("margin.bottom", self.margin.bottom),
            ("margin.left", self.margin.left),
            ("nodeThickness", self.node_thickness),
            ("zoneThickness", self.zone_thickness),
            ("cornerRadius", self.corner_radius),
            ("padAngle", self.pad_angle),
            ("nodeAngleMargin", self.node_angle_margin),
            ("labelMargin", self.label_margin),
        ];
        for (key, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{key} must be a finite, non-negative number (got {v})"),
                });
            }
        }
        if !(self.label_font.font_size.is_finite() && self.label_font.font_size > 0.0) {
            return Err(Error::InvalidConfig {
                message: "labelFont.fontSize must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    pub fn set_width(&mut self, width: f64) -> f64 {
        std::mem::replace(&mut self.width, width)
    }

    pub fn set_height(&mut self, height: f64) -> f64 {
        std::mem::replace(&mut self.height, height)
    }

    pub fn set_primary_color(&mut self, color: impl Into<String>) -> String {
        std::mem::replace(&mut self.primary_color, color.into())
    }

    pub fn set_secondary_color(&mut self, color: impl Into<String>) -> String {
        std::mem::replace(&mut self.secondary_color, color.into())
    }

    pub fn set_pad_angle(&mut self, pad_angle: f64) -> f64 {
        std::mem::replace(&mut self.pad_angle, pad_angle)
    }

    pub fn set_node_thickness(&mut self, thickness: f64) -> f64 {
        std::mem::replace(&mut self.node_thickness, thickness)
    }

    pub fn set_zone_thickness(&mut self, thickness: f64) -> f64 {
        std::mem::replace(&mut self.zone_thickness, thickness)
    }

    pub fn set_isolated_entities(&mut self, policy: IsolatedEntities) -> IsolatedEntities {
        std::mem::replace(&mut self.isolated_entities, policy)
    }

    pub fn set_subgroup_order(&mut self, order: SubgroupOrder) -> SubgroupOrder {
        std::mem::replace(&mut self.subgroup_order, order)
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_overrides_keep_nested_defaults() {
        let cfg = ChordConfig::from_json(&json!({
            "width": 600,
            "margin": { "top": 5 },
            "labelFont": { "fontSize": 12 }
        }))
        .unwrap();
        assert_eq!(cfg.width, 600.0);
        assert_eq!(cfg.height, 800.0);
        assert_eq!(cfg.margin.top, 5.0);
        assert_eq!(cfg.margin.left, 20.0);
        assert_eq!(cfg.label_font.font_size, 12.0);
        assert_eq!(cfg.label_font.font_family.as_deref(), Some("sans-serif"));
    }

    #[test]
    fn enum_options_parse_lowercase() {
        let cfg = ChordConfig::from_json(&json!({
            "isolatedEntities": "omit",
            "subgroupOrder": "descending"
        }))
        .unwrap();
        assert_eq!(cfg.isolated_entities, IsolatedEntities::Omit);
        assert_eq!(cfg.subgroup_order, SubgroupOrder::Descending);
    }

    #[test]
    fn type_errors_and_negative_sizes_are_rejected() {
        let err = ChordConfig::from_json(&json!({ "width": "wide" })).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let err = ChordConfig::from_json(&json!({ "padAngle": -0.5 })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid config: padAngle must be a finite, non-negative number (got -0.5)"
        );
    }

    #[test]
    fn setters_return_previous_value() {
        let mut cfg = ChordConfig::default();
        assert_eq!(cfg.set_width(500.0), 800.0);
        assert_eq!(cfg.width, 500.0);
        assert_eq!(cfg.set_primary_color("#000"), DEFAULT_PRIMARY_COLOR);
        assert_eq!(
            cfg.set_isolated_entities(IsolatedEntities::Omit),
            IsolatedEntities::Render
        );
    }

    #[test]
    fn inner_size_subtracts_margins_and_never_goes_negative() {
        let mut cfg = ChordConfig::default();
        assert_eq!(cfg.inner_width(), 760.0);
        cfg.set_height(10.0);
        assert_eq!(cfg.inner_height(), 0.0);
    }
}
