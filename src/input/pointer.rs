//! Per-pointer state machine.
//!
//! Every active pointer identifier owns one [`PointerEntry`]. An entry is
//! either tracking the button under the pointer or locked onto a divider:
//!
//! ```text
//!            down on handle (adjusting)
//!   Idle ─────────────────────────────────► DividerLocked
//!    │ ▲                                        │
//!    │ └──────────────── up ◄──────────────────┘
//!    │ down                                     (exit adjust drops the lock)
//!    ▼
//!   ButtonDown ── move ──► ButtonDown (edge events on button change)
//!    │
//!    └── up ──► Idle (Inactive for the tracked button)
//! ```
//!
//! Stream anomalies (a down on a locked pointer, moves or ups for unknown
//! identifiers) are logged and ignored.

use crate::input::adjuster::DividerDrag;
use crate::input::emitter::{ButtonEvent, ButtonEventEmitter};
use crate::input::resolver::{HitResult, HitTest, RegionResolver};
use crate::layout::tree::{DividerId, LayoutTree};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Host-assigned pointer identifier; the mouse uses [`MOUSE_POINTER`].
pub type PointerId = u64;

pub const MOUSE_POINTER: PointerId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// One pointer sample as delivered by the host input system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
    pub id: PointerId,
}

impl PointerSample {
    pub fn down(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Down,
            x,
            y,
            id,
        }
    }

    pub fn moved(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Move,
            x,
            y,
            id,
        }
    }

    /// Releases carry no meaningful position
    pub fn up(id: PointerId) -> Self {
        Self {
            phase: PointerPhase::Up,
            x: 0.0,
            y: 0.0,
            id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerEntry {
    last_button: Option<String>,
    locked_divider: Option<DividerDrag>,
}

impl PointerEntry {
    pub fn last_button(&self) -> Option<&str> {
        self.last_button.as_deref()
    }

    pub fn locked_divider(&self) -> Option<&DividerDrag> {
        self.locked_divider.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked_divider.is_some()
    }
}

#[derive(Debug, Default)]
pub struct PointerStateMachine {
    entries: HashMap<PointerId, PointerEntry>,
    emitter: ButtonEventEmitter,
    adjusting: bool,
}

impl PointerStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_adjusting(&self) -> bool {
        self.adjusting
    }

    /// Switches adjust mode. Leaving it drops every divider lock without
    /// emitting events; pointers on buttons are unaffected.
    pub fn set_adjusting(&mut self, adjusting: bool) {
        if self.adjusting == adjusting {
            return;
        }
        self.adjusting = adjusting;

        if adjusting {
            info!("Adjust mode on");
        } else {
            let before = self.entries.len();
            self.entries.retain(|_, entry| !entry.is_locked());
            info!(
                "Adjust mode off, dropped {} divider locks",
                before - self.entries.len()
            );
        }
    }

    pub fn entry(&self, id: PointerId) -> Option<&PointerEntry> {
        self.entries.get(&id)
    }

    pub fn active_pointers(&self) -> usize {
        self.entries.len()
    }

    pub fn emitter(&self) -> &ButtonEventEmitter {
        &self.emitter
    }

    /// Dispatches a sample to the matching phase handler.
    pub fn handle<H: HitTest + ?Sized>(
        &mut self,
        tree: &mut LayoutTree,
        hits: &H,
        sample: PointerSample,
    ) -> Vec<ButtonEvent> {
        match sample.phase {
            PointerPhase::Down => self.pointer_down(tree, hits, sample.x, sample.y, sample.id),
            PointerPhase::Move => self.pointer_move(tree, hits, sample.x, sample.y, sample.id),
            PointerPhase::Up => self.pointer_up(sample.id),
        }
    }

    pub fn pointer_down<H: HitTest + ?Sized>(
        &mut self,
        tree: &LayoutTree,
        hits: &H,
        x: f32,
        y: f32,
        id: PointerId,
    ) -> Vec<ButtonEvent> {
        if self.entries.get(&id).is_some_and(PointerEntry::is_locked) {
            warn!("Pointer {} pressed again while locked to a divider", id);
            return Vec::new();
        }

        let mut hit = RegionResolver::new(hits).resolve(x, y);
        let mut events = Vec::new();

        if self.adjusting {
            if let HitResult::DividerHandle(divider) = hit {
                match Self::lock_divider(tree, hits, divider, x, y) {
                    Some(drag) => {
                        // A pointer that slid off a button onto a handle
                        // releases the button before it locks
                        if let Some(previous) = self
                            .entries
                            .remove(&id)
                            .and_then(|entry| entry.last_button)
                        {
                            events.extend(self.emitter.set_pressed(&previous, false));
                        }
                        info!("Pointer {} locked to {}", id, divider);
                        self.entries.insert(
                            id,
                            PointerEntry {
                                last_button: None,
                                locked_divider: Some(drag),
                            },
                        );
                        return events;
                    }
                    None => hit = HitResult::None,
                }
            }
        }

        let entry = self.entries.entry(id).or_default();
        Self::track_button(&mut self.emitter, entry, hit, &mut events);
        events
    }

    pub fn pointer_move<H: HitTest + ?Sized>(
        &mut self,
        tree: &mut LayoutTree,
        hits: &H,
        x: f32,
        y: f32,
        id: PointerId,
    ) -> Vec<ButtonEvent> {
        let Some(entry) = self.entries.get_mut(&id) else {
            debug!("Dropping move for pointer {} without a press", id);
            return Vec::new();
        };

        if let Some(drag) = &entry.locked_divider {
            tree.set_ratio(drag.divider, drag.ratio_at(x, y));
            return Vec::new();
        }

        let hit = RegionResolver::new(hits).resolve(x, y);
        let mut events = Vec::new();
        Self::track_button(&mut self.emitter, entry, hit, &mut events);
        events
    }

    pub fn pointer_up(&mut self, id: PointerId) -> Vec<ButtonEvent> {
        let Some(entry) = self.entries.remove(&id) else {
            debug!("Release for unknown pointer {}", id);
            return Vec::new();
        };

        if let Some(drag) = entry.locked_divider {
            debug!("Pointer {} released {}", id, drag.divider);
            return Vec::new();
        }

        entry
            .last_button
            .and_then(|name| self.emitter.set_pressed(&name, false))
            .into_iter()
            .collect()
    }

    fn lock_divider<H: HitTest + ?Sized>(
        tree: &LayoutTree,
        hits: &H,
        id: DividerId,
        x: f32,
        y: f32,
    ) -> Option<DividerDrag> {
        let Some(divider) = tree.divider(id) else {
            warn!("Handle names {} which is not in the layout", id);
            return None;
        };
        let Some(extent) = hits.container_extent(id) else {
            warn!("No container extent for {}", id);
            return None;
        };

        Some(DividerDrag {
            divider: id,
            orientation: divider.orientation(),
            anchor_ratio: divider.ratio(),
            start_x: x,
            start_y: y,
            extent,
        })
    }

    /// Edge-triggered button transition for one pointer: release the old
    /// button before pressing the new one.
    fn track_button(
        emitter: &mut ButtonEventEmitter,
        entry: &mut PointerEntry,
        hit: HitResult,
        events: &mut Vec<ButtonEvent>,
    ) {
        match hit {
            HitResult::Button(name) => {
                if entry.last_button.as_deref() == Some(name.as_str()) {
                    return;
                }
                if let Some(previous) = entry.last_button.take() {
                    events.extend(emitter.set_pressed(&previous, false));
                }
                events.extend(emitter.set_pressed(&name, true));
                entry.last_button = Some(name);
            }
            HitResult::None | HitResult::DividerHandle(_) => {
                if let Some(previous) = entry.last_button.take() {
                    events.extend(emitter.set_pressed(&previous, false));
                }
            }
        }
    }
}
