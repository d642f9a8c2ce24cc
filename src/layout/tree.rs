//! Recursive layout model of the controller surface.
//!
//! The tree is built once from a [`LayoutConfig`] and never changes shape
//! afterwards. Divider ratios are the only mutable values and can only be
//! written through [`LayoutTree::set_ratio`], which enforces the ratio bounds.

use crate::layout::config::{AreaConfig, LayoutConfig};
use crate::layout::error::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Lower bound for every stored divider ratio
pub const MIN_RATIO: f32 = 0.1;
/// Upper bound for every stored divider ratio
pub const MAX_RATIO: f32 = 0.9;
/// Ceiling for the position of a divider handle, keeps it off the far edge
pub const HANDLE_DISPLAY_MAX: f32 = 0.8;

const DIVIDER_ID_PREFIX: &str = "divider-";

/// Clamps a ratio into `[MIN_RATIO, MAX_RATIO]`. NaN maps to an even split.
pub fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.5
    } else {
        ratio.clamp(MIN_RATIO, MAX_RATIO)
    }
}

/// Ratio used to place the divider handle, never the region split.
pub fn display_ratio(ratio: f32) -> f32 {
    clamp_ratio(ratio).min(HANDLE_DISPLAY_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Areas side by side, moved by horizontal drags
    Vertical,
    /// Areas stacked top to bottom, moved by vertical drags
    Horizontal,
}

impl Orientation {
    /// Class name the renderer uses for a container split this way
    pub fn split_class(&self) -> &'static str {
        match self {
            Orientation::Vertical => "v-split",
            Orientation::Horizontal => "h-split",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafKind {
    #[default]
    Button,
    /// Larger touch zone, behaves like a button
    Pad,
}

/// Stable divider identity, numbered in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DividerId(pub usize);

impl fmt::Display for DividerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DIVIDER_ID_PREFIX, self.0)
    }
}

impl FromStr for DividerId {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(DIVIDER_ID_PREFIX)
            .and_then(|index| index.parse::<usize>().ok())
            .map(DividerId)
            .ok_or_else(|| LayoutError::InvalidDividerId(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Divider {
    id: DividerId,
    orientation: Orientation,
    ratio: f32,
}

impl Divider {
    fn new(id: DividerId, orientation: Orientation, ratio: f32) -> Self {
        Self {
            id,
            orientation,
            ratio: clamp_ratio(ratio),
        }
    }

    pub fn id(&self) -> DividerId {
        self.id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Share of the container assigned to `area_a`
    pub fn ratio(&self) -> f32 {
        self.ratio
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub name: String,
    pub label: String,
    pub kind: LeafKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    Container {
        divider: Divider,
        area_a: Box<LayoutNode>,
        area_b: Box<LayoutNode>,
    },
    Leaf(Leaf),
}

impl LayoutNode {
    fn build(area: &AreaConfig, next_id: &mut usize) -> Self {
        match area {
            AreaConfig::Container(container) => {
                let id = DividerId(*next_id);
                *next_id += 1;
                let divider = Divider::new(
                    id,
                    container.divider.orientation,
                    container.divider.initial_position / 100.0,
                );
                let area_a = Box::new(Self::build(&container.area_a, next_id));
                let area_b = Box::new(Self::build(&container.area_b, next_id));
                LayoutNode::Container {
                    divider,
                    area_a,
                    area_b,
                }
            }
            AreaConfig::Input(input) => LayoutNode::Leaf(Leaf {
                name: input.name.clone(),
                label: input.text.clone(),
                kind: input.kind,
            }),
        }
    }

    fn find_divider_mut(&mut self, id: DividerId) -> Option<&mut Divider> {
        match self {
            LayoutNode::Container {
                divider,
                area_a,
                area_b,
            } => {
                if divider.id == id {
                    Some(divider)
                } else {
                    area_a
                        .find_divider_mut(id)
                        .or_else(|| area_b.find_divider_mut(id))
                }
            }
            LayoutNode::Leaf(_) => None,
        }
    }

    fn collect_dividers<'a>(&'a self, out: &mut Vec<&'a Divider>) {
        if let LayoutNode::Container {
            divider,
            area_a,
            area_b,
        } = self
        {
            out.push(divider);
            area_a.collect_dividers(out);
            area_b.collect_dividers(out);
        }
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf>) {
        match self {
            LayoutNode::Container { area_a, area_b, .. } => {
                area_a.collect_leaves(out);
                area_b.collect_leaves(out);
            }
            LayoutNode::Leaf(leaf) => out.push(leaf),
        }
    }

    fn plan_into(&self, side: Option<Side>, out: &mut Vec<RenderItem>) {
        match self {
            LayoutNode::Container {
                divider,
                area_a,
                area_b,
            } => {
                out.push(RenderItem::OpenArea {
                    side,
                    divider: divider.id,
                    orientation: divider.orientation,
                    ratio: divider.ratio,
                });
                area_a.plan_into(None, out);
                area_b.plan_into(None, out);
                out.push(RenderItem::CloseArea);
            }
            LayoutNode::Leaf(leaf) => out.push(RenderItem::Input {
                name: leaf.name.clone(),
                label: leaf.label.clone(),
                kind: leaf.kind,
            }),
        }
    }
}

/// Top-level column of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Center,
    Right,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::Left, Side::Center, Side::Right];

    pub fn class_name(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Center => "center",
            Side::Right => "right",
        }
    }
}

/// One instruction of the flattened tree, consumed in order by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem {
    /// Starts a split area; `side` is set for top-level areas only
    OpenArea {
        side: Option<Side>,
        divider: DividerId,
        orientation: Orientation,
        ratio: f32,
    },
    Input {
        name: String,
        label: String,
        kind: LeafKind,
    },
    CloseArea,
}

impl RenderItem {
    /// Class list of an area, e.g. `"left area v-split"`
    pub fn area_class(&self) -> Option<String> {
        match self {
            RenderItem::OpenArea {
                side, orientation, ..
            } => Some(match side {
                Some(side) => format!("{} area {}", side.class_name(), orientation.split_class()),
                None => format!("area {}", orientation.split_class()),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTree {
    left: LayoutNode,
    center: LayoutNode,
    right: LayoutNode,
}

impl LayoutTree {
    /// Builds the tree by recursive descent. Dividers are numbered depth
    /// first, `area_a` before `area_b`, left before center before right.
    pub fn from_config(config: &LayoutConfig) -> Self {
        let mut next_id = 0;
        let left = LayoutNode::build(&config.left, &mut next_id);
        let center = LayoutNode::build(&config.center, &mut next_id);
        let right = LayoutNode::build(&config.right, &mut next_id);
        info!("Layout tree created with {} dividers", next_id);
        Self {
            left,
            center,
            right,
        }
    }

    pub fn side(&self, side: Side) -> &LayoutNode {
        match side {
            Side::Left => &self.left,
            Side::Center => &self.center,
            Side::Right => &self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut LayoutNode {
        match side {
            Side::Left => &mut self.left,
            Side::Center => &mut self.center,
            Side::Right => &mut self.right,
        }
    }

    pub fn dividers(&self) -> Vec<&Divider> {
        let mut out = Vec::new();
        for side in Side::ALL {
            self.side(side).collect_dividers(&mut out);
        }
        out
    }

    pub fn divider(&self, id: DividerId) -> Option<&Divider> {
        self.dividers().into_iter().find(|divider| divider.id == id)
    }

    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        for side in Side::ALL {
            self.side(side).collect_leaves(&mut out);
        }
        out
    }

    /// Stores a new ratio for the divider, clamped into the ratio bounds.
    /// Returns the stored value, or `None` when the id is unknown.
    pub fn set_ratio(&mut self, id: DividerId, ratio: f32) -> Option<f32> {
        for side in Side::ALL {
            if let Some(divider) = self.side_mut(side).find_divider_mut(id) {
                divider.ratio = clamp_ratio(ratio);
                debug!("{} ratio set to {:.3}", id, divider.ratio);
                return Some(divider.ratio);
            }
        }

        warn!("Ignoring ratio write for unknown {}", id);
        None
    }

    /// Flattens the tree in render order.
    pub fn render_plan(&self) -> Vec<RenderItem> {
        let mut out = Vec::new();
        for side in Side::ALL {
            self.side(side).plan_into(Some(side), &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::AreaConfig;

    fn tree() -> LayoutTree {
        LayoutTree::from_config(&LayoutConfig::default_config())
    }

    #[test]
    fn dividers_are_numbered_in_render_order() {
        let tree = tree();
        let ids: Vec<DividerId> = tree.dividers().iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![DividerId(0), DividerId(1), DividerId(2), DividerId(3)]);

        let center_outer = tree.divider(DividerId(1)).unwrap();
        assert_eq!(center_outer.orientation(), Orientation::Horizontal);
        assert!((center_outer.ratio() - 0.33).abs() < 1e-6);
    }

    #[test]
    fn initial_positions_are_clamped() {
        let config = LayoutConfig {
            left: AreaConfig::container(
                Orientation::Vertical,
                2.0,
                AreaConfig::input(LeafKind::Button, "x", "X"),
                AreaConfig::input(LeafKind::Button, "y", "Y"),
            ),
            center: AreaConfig::input(LeafKind::Button, "start", "Start"),
            right: AreaConfig::container(
                Orientation::Vertical,
                100.0,
                AreaConfig::input(LeafKind::Button, "a", "A"),
                AreaConfig::input(LeafKind::Button, "b", "B"),
            ),
        };
        let tree = LayoutTree::from_config(&config);

        assert_eq!(tree.divider(DividerId(0)).unwrap().ratio(), MIN_RATIO);
        assert_eq!(tree.divider(DividerId(1)).unwrap().ratio(), MAX_RATIO);
    }

    #[test]
    fn set_ratio_clamps_and_reports_unknown_ids() {
        let mut tree = tree();

        assert_eq!(tree.set_ratio(DividerId(3), 0.95), Some(MAX_RATIO));
        assert_eq!(tree.set_ratio(DividerId(3), -4.0), Some(MIN_RATIO));
        assert_eq!(tree.set_ratio(DividerId(2), 0.42), Some(0.42));
        assert_eq!(tree.divider(DividerId(2)).unwrap().ratio(), 0.42);
        assert_eq!(tree.set_ratio(DividerId(17), 0.5), None);
    }

    #[test]
    fn display_ratio_has_its_own_ceiling() {
        let mut tree = tree();
        tree.set_ratio(DividerId(0), 0.9);

        let divider = tree.divider(DividerId(0)).unwrap();
        assert_eq!(divider.ratio(), 0.9);
        assert_eq!(display_ratio(divider.ratio()), HANDLE_DISPLAY_MAX);
        assert_eq!(display_ratio(0.3), 0.3);
    }

    #[test]
    fn nan_ratio_falls_back_to_even_split() {
        assert_eq!(clamp_ratio(f32::NAN), 0.5);
        assert_eq!(clamp_ratio(f32::INFINITY), MAX_RATIO);
        assert_eq!(clamp_ratio(f32::NEG_INFINITY), MIN_RATIO);
    }

    #[test]
    fn leaves_follow_depth_first_order() {
        let tree = tree();
        let names: Vec<&str> = tree.leaves().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["left", "right", "start", "select", "menu", "a", "b"]);
    }

    #[test]
    fn render_plan_nests_areas_with_split_classes() {
        let tree = tree();
        let plan = tree.render_plan();

        let classes: Vec<String> = plan.iter().filter_map(|item| item.area_class()).collect();
        assert_eq!(
            classes,
            vec![
                "left area v-split",
                "center area h-split",
                "area h-split",
                "right area h-split",
            ]
        );

        let opens = plan
            .iter()
            .filter(|item| matches!(item, RenderItem::OpenArea { .. }))
            .count();
        let closes = plan
            .iter()
            .filter(|item| matches!(item, RenderItem::CloseArea))
            .count();
        assert_eq!(opens, closes);

        assert_eq!(
            plan[1],
            RenderItem::Input {
                name: "left".to_string(),
                label: "Left".to_string(),
                kind: LeafKind::Button,
            }
        );
    }

    #[test]
    fn bare_leaf_columns_render_as_single_inputs() {
        let config = LayoutConfig {
            left: AreaConfig::input(LeafKind::Pad, "stick", "Stick"),
            center: AreaConfig::input(LeafKind::Button, "start", "Start"),
            right: AreaConfig::input(LeafKind::Button, "a", "A"),
        };
        let plan = LayoutTree::from_config(&config).render_plan();

        assert_eq!(plan.len(), 3);
        assert!(plan
            .iter()
            .all(|item| matches!(item, RenderItem::Input { .. })));
    }

    #[test]
    fn divider_ids_round_trip_through_their_tag_form() {
        assert_eq!(DividerId(7).to_string(), "divider-7");
        assert_eq!("divider-7".parse::<DividerId>(), Ok(DividerId(7)));
        assert!("handle-7".parse::<DividerId>().is_err());
        assert!("divider-x".parse::<DividerId>().is_err());
    }
}
