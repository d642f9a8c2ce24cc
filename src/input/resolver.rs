//! Interpretation of host hit-test answers.
//!
//! The renderer owns the geometry, so "what is under this point" is asked of
//! a [`HitTest`] implementation. The resolver decides what the answer means
//! for the pointer core: a divider handle, a button, or nothing.

use crate::layout::geometry::Extent;
use crate::layout::tree::DividerId;
use tracing::{debug, warn};

pub const BUTTON_TAG: &str = "button";
pub const DIVIDER_HANDLE_TAG: &str = "divider-handle";
pub const NONE_TAG: &str = "none";

/// Raw answer of a host hit-test, in the tagged form renderers produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitTarget {
    pub tag: String,
    /// Button name or divider id, depending on the tag
    pub name: Option<String>,
}

impl HitTarget {
    pub fn button(name: &str) -> Self {
        Self {
            tag: BUTTON_TAG.to_string(),
            name: Some(name.to_string()),
        }
    }

    pub fn divider_handle(divider: DividerId) -> Self {
        Self {
            tag: DIVIDER_HANDLE_TAG.to_string(),
            name: Some(divider.to_string()),
        }
    }

    pub fn none() -> Self {
        Self {
            tag: NONE_TAG.to_string(),
            name: None,
        }
    }
}

/// Capability the rendering collaborator provides to the pointer core.
pub trait HitTest {
    /// Control at the given point of the rendered surface
    fn hit_test(&self, x: f32, y: f32) -> HitTarget;

    /// Size of the container owning the divider, used as the drag extent
    fn container_extent(&self, divider: DividerId) -> Option<Extent>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitResult {
    None,
    Button(String),
    DividerHandle(DividerId),
}

pub struct RegionResolver<'a, H: HitTest + ?Sized> {
    hits: &'a H,
}

impl<'a, H: HitTest + ?Sized> RegionResolver<'a, H> {
    pub fn new(hits: &'a H) -> Self {
        Self { hits }
    }

    /// Never fails; anything the resolver does not understand is `None`.
    pub fn resolve(&self, x: f32, y: f32) -> HitResult {
        let target = self.hits.hit_test(x, y);
        let result = Self::interpret(target);
        debug!("Resolved ({:.1}, {:.1}) to {:?}", x, y, result);
        result
    }

    fn interpret(target: HitTarget) -> HitResult {
        match target.tag.as_str() {
            DIVIDER_HANDLE_TAG => match target.name.as_deref().map(str::parse::<DividerId>) {
                Some(Ok(divider)) => HitResult::DividerHandle(divider),
                Some(Err(e)) => {
                    warn!("Divider handle with unusable id: {}", e);
                    HitResult::None
                }
                None => {
                    warn!("Divider handle without id");
                    HitResult::None
                }
            },
            BUTTON_TAG => match target.name {
                Some(name) if !name.is_empty() => HitResult::Button(name),
                _ => {
                    warn!("Button hit without a button name");
                    HitResult::None
                }
            },
            NONE_TAG => HitResult::None,
            other => {
                warn!("Unrecognized hit-test tag: {}", other);
                HitResult::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(HitTarget);

    impl HitTest for Fixed {
        fn hit_test(&self, _x: f32, _y: f32) -> HitTarget {
            self.0.clone()
        }

        fn container_extent(&self, _divider: DividerId) -> Option<Extent> {
            None
        }
    }

    fn resolve(target: HitTarget) -> HitResult {
        RegionResolver::new(&Fixed(target)).resolve(0.0, 0.0)
    }

    #[test]
    fn buttons_resolve_by_name() {
        assert_eq!(
            resolve(HitTarget::button("start")),
            HitResult::Button("start".to_string())
        );
    }

    #[test]
    fn divider_handles_resolve_to_their_id() {
        assert_eq!(
            resolve(HitTarget::divider_handle(DividerId(3))),
            HitResult::DividerHandle(DividerId(3))
        );
    }

    #[test]
    fn anomalies_resolve_to_none() {
        assert_eq!(resolve(HitTarget::none()), HitResult::None);
        assert_eq!(
            resolve(HitTarget {
                tag: "scrollbar".to_string(),
                name: Some("start".to_string()),
            }),
            HitResult::None
        );
        assert_eq!(
            resolve(HitTarget {
                tag: BUTTON_TAG.to_string(),
                name: None,
            }),
            HitResult::None
        );
        assert_eq!(
            resolve(HitTarget {
                tag: DIVIDER_HANDLE_TAG.to_string(),
                name: Some("left".to_string()),
            }),
            HitResult::None
        );
    }

    #[test]
    fn works_through_trait_objects() {
        let hits: Box<dyn HitTest> = Box::new(Fixed(HitTarget::button("a")));
        let resolver = RegionResolver::new(hits.as_ref());
        assert_eq!(resolver.resolve(1.0, 2.0), HitResult::Button("a".to_string()));
    }
}
