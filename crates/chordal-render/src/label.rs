//! Label fitting and orientation along the node ring.
//!
//! Labels run along one of two invisible guide circles at the middle of the node ring. The
//! forward guide sweeps clockwise from 12 o'clock; the mirrored guide sweeps counter-clockwise,
//! so text placed on it in the lower half of the circle still reads left to right.

use crate::node::Node;
use crate::text::{TextMeasurer, TextStyle};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidePath {
    Forward,
    Mirrored,
}

impl GuidePath {
    pub fn index(self) -> usize {
        match self {
            GuidePath::Forward => 0,
            GuidePath::Mirrored => 1,
        }
    }
}

/// A hidden full circle that label text is laid along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelGuide {
    pub id: String,
    pub path: GuidePath,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPlan {
    pub node: usize,
    pub text: String,
    pub abbreviated: bool,
    pub guide: GuidePath,
    /// Distance along the guide path to the label's center.
    pub offset: f64,
    pub text_width: f64,
}

/// Upper-cased first character of every whitespace-separated word, each followed by a period.
///
/// `"New York City"` becomes `"N.Y.C."`.
pub fn initials(name: &str) -> String {
    let mut out = String::new();
    for word in name.split_whitespace() {
        if let Some(first) = word.chars().next() {
            out.extend(first.to_uppercase());
            out.push('.');
        }
    }
    if out.is_empty() {
        name.to_string()
    } else {
        out
    }
}

/// Whether an angle (radians, clockwise from 12 o'clock) lies strictly in the lower half.
pub fn is_lower_half(angle: f64) -> bool {
    let a = angle.rem_euclid(TAU);
    a > FRAC_PI_2 && a < PI + FRAC_PI_2
}

pub struct LabelPlanner<'a> {
    radius: f64,
    margin: f64,
    style: &'a TextStyle,
    measurer: &'a dyn TextMeasurer,
}

impl<'a> LabelPlanner<'a> {
    pub fn new(
        radius: f64,
        margin: f64,
        style: &'a TextStyle,
        measurer: &'a dyn TextMeasurer,
    ) -> Self {
        Self {
            radius,
            margin,
            style,
            measurer,
        }
    }

    pub fn arc_length(&self, angle: f64) -> f64 {
        self.radius * angle
    }

    pub fn circumference(&self) -> f64 {
        self.arc_length(TAU)
    }

    /// Room for text along `node`'s arc once the margin is reserved.
    pub fn available_length(&self, node: &Node) -> f64 {
        self.arc_length(node.end_angle) - self.arc_length(node.start_angle) - self.margin
    }

    pub fn plan(&self, node: &Node) -> LabelPlan {
        let available = self.available_length(node);
        let full_width = self.measurer.measure(&node.name, self.style).width;

        let (text, abbreviated, text_width) = if full_width > available {
            let short = initials(&node.name);
            let w = self.measurer.measure(&short, self.style).width;
            (short, true, w)
        } else {
            (node.name.clone(), false, full_width)
        };
        tracing::trace!(
            node = %node.name,
            available,
            full_width,
            abbreviated,
            "planned node label"
        );

        let mid = node.mid_angle().rem_euclid(TAU);
        let along = self.arc_length(mid);
        let (guide, offset) = if is_lower_half(mid) {
            (GuidePath::Mirrored, self.circumference() - along)
        } else {
            (GuidePath::Forward, along)
        };

        LabelPlan {
            node: node.index,
            text,
            abbreviated,
            guide,
            offset,
            text_width,
        }
    }

    pub fn plan_all(&self, nodes: &[Node]) -> Vec<LabelPlan> {
        nodes.iter().map(|n| self.plan(n)).collect()
    }

    /// The two guide circles, ids optionally namespaced for pages showing several diagrams.
    pub fn guides(&self, id_prefix: Option<&str>) -> Vec<LabelGuide> {
        [GuidePath::Forward, GuidePath::Mirrored]
            .into_iter()
            .map(|path| {
                let base = format!("labelCircle{}", path.index());
                let id = match id_prefix {
                    Some(prefix) if !prefix.is_empty() => format!("{prefix}-{base}"),
                    _ => base,
                };
                LabelGuide {
                    id,
                    path,
                    radius: self.radius,
                    start_angle: 0.0,
                    end_angle: match path {
                        GuidePath::Forward => TAU,
                        GuidePath::Mirrored => -TAU,
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;
    use chordal_core::ZoneKey;

    fn node(name: &str, start: f64, end: f64) -> Node {
        Node {
            index: 0,
            name: name.to_string(),
            short_name: name.to_string(),
            outgoing: ZoneKey::outgoing(0),
            incoming: ZoneKey::incoming(0),
            start_angle: start,
            end_angle: end,
            value: 1.0,
        }
    }

    #[test]
    fn initials_take_first_letter_of_each_word() {
        assert_eq!(initials("New York City"), "N.Y.C.");
        assert_eq!(initials("  los   angeles "), "L.A.");
        assert_eq!(initials("ßerlin"), "SS.");
        assert_eq!(initials("Paris"), "P.");
    }

    #[test]
    fn lower_half_is_strict() {
        assert!(!is_lower_half(0.0));
        assert!(!is_lower_half(FRAC_PI_2));
        assert!(is_lower_half(PI));
        assert!(!is_lower_half(PI + FRAC_PI_2));
        assert!(!is_lower_half(-0.1));
    }

    #[test]
    fn long_names_are_abbreviated_when_they_do_not_fit() {
        // 10px font, 6px per character.
        let measurer = DeterministicTextMeasurer::default();
        let style = TextStyle {
            font_size: 10.0,
            ..Default::default()
        };
        let planner = LabelPlanner::new(100.0, 10.0, &style, &measurer);

        // 0.5 rad at r=100 leaves 40px: "Rome" (24px) fits, "New York City" (78px) does not.
        let fits = planner.plan(&node("Rome", 0.0, 0.5));
        assert_eq!(fits.text, "Rome");
        assert!(!fits.abbreviated);

        let squeezed = planner.plan(&node("New York City", 0.0, 0.5));
        assert_eq!(squeezed.text, "N.Y.C.");
        assert!(squeezed.abbreviated);
        assert_eq!(squeezed.text_width, 36.0);
    }

    #[test]
    fn lower_half_labels_use_the_mirrored_guide() {
        let measurer = DeterministicTextMeasurer::default();
        let style = TextStyle::default();
        let planner = LabelPlanner::new(100.0, 10.0, &style, &measurer);

        let top = planner.plan(&node("A", 0.2, 0.4));
        assert_eq!(top.guide, GuidePath::Forward);
        assert!((top.offset - 30.0).abs() < 1e-9);

        let bottom = planner.plan(&node("B", 3.0, 3.2));
        assert_eq!(bottom.guide, GuidePath::Mirrored);
        assert!((bottom.offset - (planner.circumference() - 310.0)).abs() < 1e-9);
    }

    #[test]
    fn guides_sweep_in_opposite_directions() {
        let measurer = DeterministicTextMeasurer::default();
        let style = TextStyle::default();
        let planner = LabelPlanner::new(50.0, 10.0, &style, &measurer);

        let guides = planner.guides(Some("chart"));
        assert_eq!(guides[0].id, "chart-labelCircle0");
        assert_eq!(guides[0].end_angle, TAU);
        assert_eq!(guides[1].id, "chart-labelCircle1");
        assert_eq!(guides[1].end_angle, -TAU);
        assert_eq!(planner.guides(None)[1].id, "labelCircle1");
    }
}
