//! Surface geometry for the reference renderer.
//!
//! [`arrange`] walks the render plan of a [`LayoutTree`] and hands every
//! container its rectangle, split by the divider ratio. The result is the
//! rendered instantiation the pointer core hit-tests against.

use crate::input::adjuster::handle_offset;
use crate::input::resolver::{HitTarget, HitTest};
use crate::layout::tree::{
    DividerId, LayoutTree, LeafKind, Orientation, RenderItem,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Thickness of a divider handle hit target, in points
pub const HANDLE_THICKNESS: f32 = 28.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment, so neighbouring areas never both match
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn extent(&self) -> Extent {
        Extent {
            width: self.width,
            height: self.height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Splits into `(area_a, area_b)`; `area_a` receives `ratio` of the extent
    /// along the axis the orientation divides.
    pub fn split(&self, orientation: Orientation, ratio: f32) -> (Rect, Rect) {
        match orientation {
            Orientation::Vertical => {
                let width_a = self.width * ratio;
                (
                    Rect::new(self.x, self.y, width_a, self.height),
                    Rect::new(self.x + width_a, self.y, self.width - width_a, self.height),
                )
            }
            Orientation::Horizontal => {
                let height_a = self.height * ratio;
                (
                    Rect::new(self.x, self.y, self.width, height_a),
                    Rect::new(self.x, self.y + height_a, self.width, self.height - height_a),
                )
            }
        }
    }

    /// Thin strip straddling the divider line for the stored `ratio`, held
    /// below the display ceiling.
    fn handle(&self, orientation: Orientation, ratio: f32) -> Rect {
        let half = HANDLE_THICKNESS / 2.0;
        match orientation {
            Orientation::Vertical => {
                let line = self.x + handle_offset(ratio, self.width);
                Rect::new(line - half, self.y, HANDLE_THICKNESS, self.height)
            }
            Orientation::Horizontal => {
                let line = self.y + handle_offset(ratio, self.height);
                Rect::new(self.x, line - half, self.width, HANDLE_THICKNESS)
            }
        }
    }
}

/// Width shares of the three columns.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ColumnShares {
    pub left: f32,
    pub center: f32,
    pub right: f32,
}

impl Default for ColumnShares {
    fn default() -> Self {
        Self {
            left: 0.4,
            center: 0.2,
            right: 0.4,
        }
    }
}

impl ColumnShares {
    /// Column rectangles left to right. Shares are normalised, so they do
    /// not need to add up to one; unusable shares fall back to the default.
    pub fn columns(&self, bounds: Rect) -> [Rect; 3] {
        let shares = [self.left, self.center, self.right];
        let usable = shares.iter().all(|s| s.is_finite() && *s >= 0.0)
            && shares.iter().sum::<f32>() > 0.0;
        let shares = if usable {
            shares
        } else {
            warn!("Unusable column shares {:?}, using defaults", self);
            let d = ColumnShares::default();
            [d.left, d.center, d.right]
        };
        let total: f32 = shares.iter().sum();

        let mut x = bounds.x;
        let mut out = [Rect::default(); 3];
        for (slot, share) in out.iter_mut().zip(shares) {
            let width = bounds.width * share / total;
            *slot = Rect::new(x, bounds.y, width, bounds.height);
            x += width;
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedButton {
    pub name: String,
    pub label: String,
    pub kind: LeafKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedDivider {
    pub id: DividerId,
    pub orientation: Orientation,
    /// Rectangle of the owning container, its size is the drag extent
    pub container: Rect,
    pub handle: Rect,
}

/// Rendered instantiation of a layout tree at a given size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrangedSurface {
    pub buttons: Vec<PlacedButton>,
    pub dividers: Vec<PlacedDivider>,
    /// Divider handles are only hit targets while adjusting
    pub handles_active: bool,
}

pub fn arrange(
    tree: &LayoutTree,
    bounds: Rect,
    shares: ColumnShares,
    handles_active: bool,
) -> ArrangedSurface {
    let mut surface = ArrangedSurface {
        handles_active,
        ..Default::default()
    };

    // Pending areas in pop order; children are pushed b-then-a so that
    // area_a is consumed first, matching the render plan.
    let mut pending: Vec<Rect> = shares.columns(bounds).into_iter().rev().collect();

    for item in tree.render_plan() {
        match item {
            RenderItem::OpenArea {
                divider,
                orientation,
                ratio,
                ..
            } => {
                let Some(container) = pending.pop() else {
                    warn!("Render plan opened {} without a free area", divider);
                    break;
                };
                let (area_a, area_b) = container.split(orientation, ratio);
                surface.dividers.push(PlacedDivider {
                    id: divider,
                    orientation,
                    container,
                    handle: container.handle(orientation, ratio),
                });
                pending.push(area_b);
                pending.push(area_a);
            }
            RenderItem::Input { name, label, kind } => {
                let Some(rect) = pending.pop() else {
                    warn!("Render plan placed {} without a free area", name);
                    break;
                };
                surface.buttons.push(PlacedButton {
                    name,
                    label,
                    kind,
                    rect,
                });
            }
            RenderItem::CloseArea => {}
        }
    }

    debug!(
        "Arranged {} buttons and {} dividers",
        surface.buttons.len(),
        surface.dividers.len()
    );
    surface
}

impl ArrangedSurface {
    pub fn button(&self, name: &str) -> Option<&PlacedButton> {
        self.buttons.iter().find(|button| button.name == name)
    }

    pub fn divider(&self, id: DividerId) -> Option<&PlacedDivider> {
        self.dividers.iter().find(|divider| divider.id == id)
    }
}

impl HitTest for ArrangedSurface {
    fn hit_test(&self, x: f32, y: f32) -> HitTarget {
        if self.handles_active {
            // Later dividers are nested deeper, they win on overlap
            if let Some(divider) = self
                .dividers
                .iter()
                .rev()
                .find(|divider| divider.handle.contains(x, y))
            {
                return HitTarget::divider_handle(divider.id);
            }
        }

        match self.buttons.iter().find(|button| button.rect.contains(x, y)) {
            Some(button) => HitTarget::button(&button.name),
            None => HitTarget::none(),
        }
    }

    fn container_extent(&self, divider: DividerId) -> Option<Extent> {
        self.divider(divider).map(|placed| placed.container.extent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::resolver::{BUTTON_TAG, DIVIDER_HANDLE_TAG, NONE_TAG};
    use crate::layout::config::LayoutConfig;

    fn surface(handles_active: bool) -> ArrangedSurface {
        let tree = LayoutTree::from_config(&LayoutConfig::default_config());
        arrange(
            &tree,
            Rect::new(0.0, 0.0, 1000.0, 500.0),
            ColumnShares::default(),
            handles_active,
        )
    }

    #[test]
    fn columns_follow_shares() {
        let columns = ColumnShares::default().columns(Rect::new(0.0, 0.0, 1000.0, 500.0));
        assert_eq!(columns[0], Rect::new(0.0, 0.0, 400.0, 500.0));
        assert_eq!(columns[1], Rect::new(400.0, 0.0, 200.0, 500.0));
        assert_eq!(columns[2], Rect::new(600.0, 0.0, 400.0, 500.0));
    }

    #[test]
    fn broken_shares_fall_back_to_defaults() {
        let shares = ColumnShares {
            left: -1.0,
            center: 0.0,
            right: 0.0,
        };
        let columns = shares.columns(Rect::new(0.0, 0.0, 1000.0, 500.0));
        assert_eq!(columns[1].width, 200.0);
    }

    #[test]
    fn containers_split_by_ratio() {
        let surface = surface(false);

        assert_eq!(
            surface.button("left").unwrap().rect,
            Rect::new(0.0, 0.0, 200.0, 500.0)
        );
        assert_eq!(
            surface.button("right").unwrap().rect,
            Rect::new(200.0, 0.0, 200.0, 500.0)
        );
        assert_eq!(
            surface.button("a").unwrap().rect,
            Rect::new(600.0, 0.0, 400.0, 250.0)
        );

        let start = surface.button("start").unwrap().rect;
        assert!((start.height - 165.0).abs() < 1e-3);
        let select = surface.button("select").unwrap().rect;
        assert!((select.y - 165.0).abs() < 1e-3);
    }

    #[test]
    fn divider_records_its_container_extent() {
        let surface = surface(true);
        assert_eq!(
            surface.container_extent(DividerId(0)),
            Some(Extent {
                width: 400.0,
                height: 500.0
            })
        );
        assert_eq!(surface.container_extent(DividerId(42)), None);
    }

    #[test]
    fn handles_only_hit_while_adjusting() {
        let on_line = (200.0, 250.0);

        let playing = surface(false);
        let target = playing.hit_test(on_line.0, on_line.1);
        assert_eq!(target.tag, BUTTON_TAG);
        assert_eq!(target.name.as_deref(), Some("right"));

        let adjusting = surface(true);
        let target = adjusting.hit_test(on_line.0, on_line.1);
        assert_eq!(target.tag, DIVIDER_HANDLE_TAG);
        assert_eq!(target.name.as_deref(), Some("divider-0"));
    }

    #[test]
    fn handle_position_stops_at_display_ceiling() {
        let mut tree = LayoutTree::from_config(&LayoutConfig::default_config());
        tree.set_ratio(DividerId(0), 0.9);
        let surface = arrange(
            &tree,
            Rect::new(0.0, 0.0, 1000.0, 500.0),
            ColumnShares::default(),
            true,
        );

        let placed = surface.divider(DividerId(0)).unwrap();
        let (handle_center, _) = placed.handle.center();
        assert!((handle_center - 320.0).abs() < 1e-3);
        assert!((surface.button("left").unwrap().rect.width - 360.0).abs() < 1e-3);
    }

    #[test]
    fn horizontal_handles_follow_the_stored_ratio() {
        let mut tree = LayoutTree::from_config(&LayoutConfig::default_config());
        tree.set_ratio(DividerId(3), 0.25);
        let surface = arrange(
            &tree,
            Rect::new(0.0, 0.0, 1000.0, 500.0),
            ColumnShares::default(),
            true,
        );

        let placed = surface.divider(DividerId(3)).unwrap();
        assert_eq!(placed.orientation, Orientation::Horizontal);
        let (_, handle_center) = placed.handle.center();
        assert!((handle_center - 125.0).abs() < 1e-3);

        tree.set_ratio(DividerId(3), 0.9);
        let surface = arrange(
            &tree,
            Rect::new(0.0, 0.0, 1000.0, 500.0),
            ColumnShares::default(),
            true,
        );
        let (_, handle_center) = surface.divider(DividerId(3)).unwrap().handle.center();
        assert!((handle_center - 400.0).abs() < 1e-3);
    }

    #[test]
    fn points_outside_every_area_hit_nothing() {
        let target = surface(true).hit_test(-5.0, 20.0);
        assert_eq!(target.tag, NONE_TAG);
        assert_eq!(target.name, None);
    }
}
