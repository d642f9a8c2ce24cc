//! Surface mode as a typestate.
//!
//! The surface is either `Playing` (buttons only) or `Adjusting` (buttons
//! plus divider handles). Mode changes consume the surface so the pointer
//! state machine is always told about them.

use crate::input::emitter::ButtonEvent;
use crate::input::pointer::{PointerSample, PointerStateMachine};
use crate::input::resolver::HitTest;
use crate::layout::tree::LayoutTree;
use statum::{machine, state};
use tracing::info;

#[state]
#[derive(Debug, Clone)]
pub enum SurfaceMode {
    Playing,   // Buttons react, handles are inert
    Adjusting, // Handles can be dragged to resize areas
}

#[machine]
pub struct InputSurface<S: SurfaceMode> {
    tree: LayoutTree,
    pointers: PointerStateMachine,
}

impl<S: SurfaceMode> InputSurface<S> {
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn pointers(&self) -> &PointerStateMachine {
        &self.pointers
    }

    pub fn handle<H: HitTest + ?Sized>(
        &mut self,
        sample: PointerSample,
        hits: &H,
    ) -> Vec<ButtonEvent> {
        self.pointers.handle(&mut self.tree, hits, sample)
    }
}

impl InputSurface<Playing> {
    pub fn create(tree: LayoutTree) -> Self {
        info!("Creating input surface with {} controls", tree.leaves().len());
        Self::new(tree, PointerStateMachine::new())
    }

    pub fn enter_adjust(mut self) -> InputSurface<Adjusting> {
        self.pointers.set_adjusting(true);
        self.transition()
    }
}

impl InputSurface<Adjusting> {
    /// Ends adjusting. Pointers still dragging a divider are forgotten.
    pub fn exit_adjust(mut self) -> InputSurface<Playing> {
        self.pointers.set_adjusting(false);
        self.transition()
    }
}

/// Runtime wrapper for hosts that pick the mode from a toggle.
pub enum ControllerSurface {
    Playing(InputSurface<Playing>),
    Adjusting(InputSurface<Adjusting>),
}

impl ControllerSurface {
    pub fn new(tree: LayoutTree, adjusting: bool) -> Self {
        ControllerSurface::Playing(InputSurface::create(tree)).set_adjusting(adjusting)
    }

    pub fn set_adjusting(self, adjusting: bool) -> Self {
        match (self, adjusting) {
            (ControllerSurface::Playing(surface), true) => {
                ControllerSurface::Adjusting(surface.enter_adjust())
            }
            (ControllerSurface::Adjusting(surface), false) => {
                ControllerSurface::Playing(surface.exit_adjust())
            }
            (unchanged, _) => unchanged,
        }
    }

    pub fn is_adjusting(&self) -> bool {
        matches!(self, ControllerSurface::Adjusting(_))
    }

    pub fn tree(&self) -> &LayoutTree {
        match self {
            ControllerSurface::Playing(surface) => surface.tree(),
            ControllerSurface::Adjusting(surface) => surface.tree(),
        }
    }

    pub fn pointers(&self) -> &PointerStateMachine {
        match self {
            ControllerSurface::Playing(surface) => surface.pointers(),
            ControllerSurface::Adjusting(surface) => surface.pointers(),
        }
    }

    pub fn handle<H: HitTest + ?Sized>(
        &mut self,
        sample: PointerSample,
        hits: &H,
    ) -> Vec<ButtonEvent> {
        match self {
            ControllerSurface::Playing(surface) => surface.handle(sample, hits),
            ControllerSurface::Adjusting(surface) => surface.handle(sample, hits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::emitter::ButtonEventKind;
    use crate::input::testing::{two_button_tree, ScriptedHits};
    use crate::layout::tree::DividerId;

    #[test]
    fn typestate_transitions_toggle_pointer_mode() {
        let surface = InputSurface::create(two_button_tree());
        assert!(!surface.pointers().is_adjusting());

        let surface = surface.enter_adjust();
        assert!(surface.pointers().is_adjusting());

        let surface = surface.exit_adjust();
        assert!(!surface.pointers().is_adjusting());
    }

    #[test]
    fn drag_only_moves_dividers_while_adjusting() {
        let hits = ScriptedHits::two_buttons();
        let mut surface = ControllerSurface::new(two_button_tree(), false);

        surface.handle(PointerSample::down(1, 100.0, 10.0), &hits);
        surface.handle(PointerSample::moved(1, 140.0, 10.0), &hits);
        surface.handle(PointerSample::up(1), &hits);
        assert_eq!(surface.tree().divider(DividerId(0)).unwrap().ratio(), 0.5);

        let mut surface = surface.set_adjusting(true);
        assert!(surface.is_adjusting());
        surface.handle(PointerSample::down(1, 100.0, 10.0), &hits);
        surface.handle(PointerSample::moved(1, 140.0, 10.0), &hits);
        let ratio = surface.tree().divider(DividerId(0)).unwrap().ratio();
        assert!((ratio - 0.7).abs() < 1e-6);
    }

    #[test]
    fn leaving_adjust_keeps_held_buttons() {
        let hits = ScriptedHits::two_buttons();
        let mut surface = ControllerSurface::new(two_button_tree(), true);

        surface.handle(PointerSample::down(1, 100.0, 10.0), &hits);
        let pressed = surface.handle(PointerSample::down(2, 150.0, 10.0), &hits);
        assert_eq!(pressed[0].kind, ButtonEventKind::Active);

        let mut surface = surface.set_adjusting(false);
        assert_eq!(surface.pointers().active_pointers(), 1);

        let released = surface.handle(PointerSample::up(2), &hits);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].name, "R");
        assert!(surface.handle(PointerSample::up(1), &hits).is_empty());
    }

    #[test]
    fn redundant_mode_changes_are_no_ops() {
        let surface = ControllerSurface::new(two_button_tree(), false).set_adjusting(false);
        assert!(!surface.is_adjusting());
        let surface = surface.set_adjusting(true).set_adjusting(true);
        assert!(surface.pointers().is_adjusting());
    }
}
