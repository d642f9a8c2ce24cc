//! Serializable layout configuration.
//!
//! The configuration mirrors the shape of the surface: three top-level areas
//! (`left`, `center`, `right`), each either a container holding a divider and
//! two sub-areas, or an input area. Divider positions are stored in percent.
//!
//! ```toml
//! [layout.left.divider]
//! type = "vertical"
//! initial_position = 50.0
//!
//! [layout.left.area_a]
//! type = "button"
//! name = "left"
//! text = "Left"
//! ```

use crate::layout::error::LayoutError;
use crate::layout::tree::{LeafKind, Orientation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Complete surface layout, one area per column.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub left: AreaConfig,
    /// Center column, usually holding the menu buttons
    pub center: AreaConfig,
    pub right: AreaConfig,
}

/// Either a container splitting its area in two, or a single input.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum AreaConfig {
    Container(ContainerConfig),
    Input(InputConfig),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ContainerConfig {
    pub divider: DividerConfig,
    pub area_a: Box<AreaConfig>,
    pub area_b: Box<AreaConfig>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct DividerConfig {
    #[serde(rename = "type")]
    pub orientation: Orientation,
    /// Share of the container given to `area_a`, in percent
    pub initial_position: f32,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct InputConfig {
    #[serde(rename = "type", default)]
    pub kind: LeafKind,
    pub name: String,
    pub text: String,
}

impl AreaConfig {
    pub fn input(kind: LeafKind, name: &str, text: &str) -> Self {
        AreaConfig::Input(InputConfig {
            kind,
            name: name.to_string(),
            text: text.to_string(),
        })
    }

    pub fn container(
        orientation: Orientation,
        initial_position: f32,
        area_a: AreaConfig,
        area_b: AreaConfig,
    ) -> Self {
        AreaConfig::Container(ContainerConfig {
            divider: DividerConfig {
                orientation,
                initial_position,
            },
            area_a: Box::new(area_a),
            area_b: Box::new(area_b),
        })
    }

    fn validate_into<'a>(&'a self, seen: &mut HashSet<&'a str>) -> Result<(), LayoutError> {
        match self {
            AreaConfig::Container(container) => {
                let position = container.divider.initial_position;
                if !position.is_finite() || !(0.0..=100.0).contains(&position) {
                    return Err(LayoutError::InvalidPosition(position));
                }
                container.area_a.validate_into(seen)?;
                container.area_b.validate_into(seen)
            }
            AreaConfig::Input(input) => {
                if input.name.trim().is_empty() {
                    return Err(LayoutError::EmptyName(input.text.clone()));
                }
                if !seen.insert(input.name.as_str()) {
                    return Err(LayoutError::DuplicateName(input.name.clone()));
                }
                Ok(())
            }
        }
    }
}

impl LayoutConfig {
    /// Checks the structural contract the tree builder relies on: every
    /// control has a non-empty name, names are unique across all three
    /// columns and divider positions are valid percentages.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        self.left.validate_into(&mut seen)?;
        self.center.validate_into(&mut seen)?;
        self.right.validate_into(&mut seen)?;
        debug!("Layout configuration valid with {} controls", seen.len());
        Ok(())
    }

    /// Built-in gamepad: direction buttons on the left, menu buttons in the
    /// center and two action buttons on the right.
    pub fn default_config() -> Self {
        Self {
            left: AreaConfig::container(
                Orientation::Vertical,
                50.0,
                AreaConfig::input(LeafKind::Button, "left", "Left"),
                AreaConfig::input(LeafKind::Button, "right", "Right"),
            ),
            center: AreaConfig::container(
                Orientation::Horizontal,
                33.0,
                AreaConfig::input(LeafKind::Button, "start", "Start"),
                AreaConfig::container(
                    Orientation::Horizontal,
                    50.0,
                    AreaConfig::input(LeafKind::Button, "select", "Select"),
                    AreaConfig::input(LeafKind::Button, "menu", "Menu"),
                ),
            ),
            right: AreaConfig::container(
                Orientation::Horizontal,
                50.0,
                AreaConfig::input(LeafKind::Button, "a", "A"),
                AreaConfig::input(LeafKind::Button, "b", "B"),
            ),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
