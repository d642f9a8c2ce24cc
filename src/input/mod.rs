//! Pointer input core.
//!
//! Raw pointer samples go through the [`PointerStateMachine`], which asks a
//! [`HitTest`] collaborator what is under each point, resolves the answer
//! with the [`RegionResolver`] and turns button transitions into
//! [`ButtonEvent`]s via the edge-triggered [`ButtonEventEmitter`]. While the
//! surface is adjusting, pointers can also lock onto divider handles and drag
//! them; [`adjuster`] holds the ratio arithmetic for that.

pub mod adjuster;
pub mod emitter;
pub mod pointer;
pub mod resolver;
pub mod surface;

pub use adjuster::{compute_new_ratio, DividerDrag};
pub use emitter::{ButtonEvent, ButtonEventEmitter, ButtonEventKind};
pub use pointer::{PointerEntry, PointerId, PointerPhase, PointerSample, PointerStateMachine};
pub use resolver::{HitResult, HitTarget, HitTest, RegionResolver};
pub use surface::{ControllerSurface, InputSurface};
