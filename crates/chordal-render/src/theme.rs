use crate::color::LinearColorScale;
use crate::highlight::Emphasis;
use chordal_core::config::{DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR};
use chordal_core::{ChordConfig, Direction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    pub fill: String,
    pub fill_opacity: f64,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: f64,
}

/// Opacity for one element kind at each emphasis level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmphasisOpacity {
    pub default: f64,
    pub full: f64,
    pub dimmed: f64,
}

impl EmphasisOpacity {
    pub fn at(&self, emphasis: Emphasis) -> f64 {
        match emphasis {
            Emphasis::Default => self.default,
            Emphasis::Full => self.full,
            Emphasis::Dimmed => self.dimmed,
        }
    }
}

const HOVER_STROKE: &str = "black";

#[derive(Debug, Clone, PartialEq)]
pub struct ChordTheme {
    pub primary: LinearColorScale,
    pub secondary: LinearColorScale,
    pub chord_opacity: EmphasisOpacity,
    pub element_opacity: EmphasisOpacity,
}

impl ChordTheme {
    pub fn from_config(config: &ChordConfig) -> Self {
        Self {
            primary: LinearColorScale::from_white(&config.primary_color, DEFAULT_PRIMARY_COLOR),
            secondary: LinearColorScale::from_white(
                &config.secondary_color,
                DEFAULT_SECONDARY_COLOR,
            ),
            chord_opacity: EmphasisOpacity {
                default: 0.5,
                full: 0.9,
                dimmed: 0.1,
            },
            element_opacity: EmphasisOpacity {
                default: 1.0,
                full: 1.0,
                dimmed: 0.25,
            },
        }
    }

    pub fn node_paint(&self, emphasis: Emphasis, hovered: bool) -> Paint {
        let (stroke, width) = if hovered {
            (self.primary.at(1.0), 3.0)
        } else {
            (self.primary.at(0.75), 2.0)
        };
        Paint {
            fill: self.primary.at(0.25),
            fill_opacity: 1.0,
            stroke: Some(stroke),
            stroke_width: Some(width),
            opacity: self.element_opacity.at(emphasis),
        }
    }

    pub fn zone_paint(&self, direction: Direction, emphasis: Emphasis, hovered: bool) -> Paint {
        let fill = match direction {
            Direction::Outgoing => self.primary.at(1.0),
            Direction::Incoming => self.secondary.at(1.0),
        };
        Paint {
            fill,
            fill_opacity: 1.0,
            stroke: hovered.then(|| HOVER_STROKE.to_string()),
            stroke_width: None,
            opacity: self.element_opacity.at(emphasis),
        }
    }

    pub fn chord_paint(&self, emphasis: Emphasis, hovered: bool) -> Paint {
        Paint {
            fill: self.secondary.at(1.0),
            fill_opacity: self.chord_opacity.at(emphasis),
            stroke: hovered.then(|| HOVER_STROKE.to_string()),
            stroke_width: None,
            opacity: 1.0,
        }
    }

    pub fn label_opacity(&self, emphasis: Emphasis) -> f64 {
        self.element_opacity.at(emphasis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paint_uses_red_and_blue_scales() {
        let theme = ChordTheme::from_config(&ChordConfig::default());
        let node = theme.node_paint(Emphasis::Default, false);
        assert_eq!(node.fill, "#ecc5ca");
        assert_eq!(node.stroke_width, Some(2.0));

        let out = theme.zone_paint(Direction::Outgoing, Emphasis::Default, false);
        let inc = theme.zone_paint(Direction::Incoming, Emphasis::Default, false);
        assert_eq!(out.fill, "#b2182b");
        assert_eq!(inc.fill, "#2166ac");
        assert_eq!(out.stroke, None);
    }

    #[test]
    fn emphasis_levels_are_binary_around_default() {
        let theme = ChordTheme::from_config(&ChordConfig::default());
        assert_eq!(theme.chord_paint(Emphasis::Default, false).fill_opacity, 0.5);
        assert_eq!(theme.chord_paint(Emphasis::Full, false).fill_opacity, 0.9);
        assert_eq!(theme.chord_paint(Emphasis::Dimmed, false).fill_opacity, 0.1);
        assert_eq!(theme.node_paint(Emphasis::Dimmed, false).opacity, 0.25);
    }

    #[test]
    fn hovered_elements_get_a_stroke() {
        let theme = ChordTheme::from_config(&ChordConfig::default());
        let node = theme.node_paint(Emphasis::Full, true);
        assert_eq!(node.stroke.as_deref(), Some("#b2182b"));
        assert_eq!(node.stroke_width, Some(3.0));
        assert_eq!(
            theme.chord_paint(Emphasis::Full, true).stroke.as_deref(),
            Some("black")
        );
    }
}
