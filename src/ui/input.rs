use crate::input::pointer::{PointerId, PointerSample, MOUSE_POINTER};
use eframe::egui::{Event, PointerButton, TouchPhase};
use tracing::{debug, info};

/// Turns egui input events into pointer samples.
///
/// Touches keep their own identity, shifted by one so they never collide with
/// the mouse pointer. The primary mouse button acts as pointer `0` and its
/// moves only count while the button is held. egui mirrors the first touch
/// as mouse events, so mouse input is ignored once a touch has been seen.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    mouse_down: bool,
    touch_seen: bool,
}

impl PointerTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &Event) -> Option<PointerSample> {
        match event {
            Event::Touch { id, phase, pos, .. } => {
                if !self.touch_seen {
                    info!("Touch input detected, ignoring mouse from now on");
                    self.touch_seen = true;
                    self.mouse_down = false;
                }
                let id = touch_pointer(id.0);
                Some(match phase {
                    TouchPhase::Start => PointerSample::down(id, pos.x, pos.y),
                    TouchPhase::Move => PointerSample::moved(id, pos.x, pos.y),
                    TouchPhase::End | TouchPhase::Cancel => PointerSample::up(id),
                })
            }
            _ if self.touch_seen => None,
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                ..
            } => {
                if *pressed {
                    self.mouse_down = true;
                    Some(PointerSample::down(MOUSE_POINTER, pos.x, pos.y))
                } else if self.mouse_down {
                    self.mouse_down = false;
                    Some(PointerSample::up(MOUSE_POINTER))
                } else {
                    None
                }
            }
            Event::PointerMoved(pos) if self.mouse_down => {
                Some(PointerSample::moved(MOUSE_POINTER, pos.x, pos.y))
            }
            Event::PointerGone if self.mouse_down => {
                debug!("Mouse left the window while pressed");
                self.mouse_down = false;
                Some(PointerSample::up(MOUSE_POINTER))
            }
            _ => None,
        }
    }
}

fn touch_pointer(touch: u64) -> PointerId {
    touch.wrapping_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::pointer::PointerPhase;
    use eframe::egui::{pos2, Modifiers, TouchDeviceId, TouchId};

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> Event {
        Event::Touch {
            device_id: TouchDeviceId(0),
            id: TouchId(id),
            phase,
            pos: pos2(x, y),
            force: None,
        }
    }

    fn mouse_button(pressed: bool, button: PointerButton) -> Event {
        Event::PointerButton {
            pos: pos2(10.0, 20.0),
            button,
            pressed,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn mouse_moves_only_count_while_pressed() {
        let mut translator = PointerTranslator::new();

        assert_eq!(translator.translate(&Event::PointerMoved(pos2(1.0, 1.0))), None);

        let down = translator
            .translate(&mouse_button(true, PointerButton::Primary))
            .unwrap();
        assert_eq!(down, PointerSample::down(MOUSE_POINTER, 10.0, 20.0));

        let moved = translator
            .translate(&Event::PointerMoved(pos2(30.0, 40.0)))
            .unwrap();
        assert_eq!(moved, PointerSample::moved(MOUSE_POINTER, 30.0, 40.0));

        let up = translator
            .translate(&mouse_button(false, PointerButton::Primary))
            .unwrap();
        assert_eq!(up.phase, PointerPhase::Up);
        assert_eq!(translator.translate(&Event::PointerMoved(pos2(5.0, 5.0))), None);
    }

    #[test]
    fn secondary_buttons_are_ignored() {
        let mut translator = PointerTranslator::new();
        assert_eq!(
            translator.translate(&mouse_button(true, PointerButton::Secondary)),
            None
        );
    }

    #[test]
    fn leaving_the_window_releases_the_mouse() {
        let mut translator = PointerTranslator::new();
        translator.translate(&mouse_button(true, PointerButton::Primary));

        assert_eq!(
            translator.translate(&Event::PointerGone),
            Some(PointerSample::up(MOUSE_POINTER))
        );
        assert_eq!(translator.translate(&Event::PointerGone), None);
    }

    #[test]
    fn touches_keep_distinct_ids() {
        let mut translator = PointerTranslator::new();

        let first = translator.translate(&touch(0, TouchPhase::Start, 1.0, 2.0)).unwrap();
        let second = translator.translate(&touch(7, TouchPhase::Start, 3.0, 4.0)).unwrap();
        assert_eq!(first, PointerSample::down(1, 1.0, 2.0));
        assert_eq!(second, PointerSample::down(8, 3.0, 4.0));

        let moved = translator.translate(&touch(7, TouchPhase::Move, 5.0, 6.0)).unwrap();
        assert_eq!(moved, PointerSample::moved(8, 5.0, 6.0));

        let cancelled = translator.translate(&touch(0, TouchPhase::Cancel, 0.0, 0.0)).unwrap();
        assert_eq!(cancelled, PointerSample::up(1));
    }

    #[test]
    fn mirrored_mouse_events_are_dropped_after_a_touch() {
        let mut translator = PointerTranslator::new();
        translator.translate(&touch(0, TouchPhase::Start, 1.0, 2.0));

        assert_eq!(
            translator.translate(&mouse_button(true, PointerButton::Primary)),
            None
        );
        assert_eq!(translator.translate(&Event::PointerMoved(pos2(1.0, 1.0))), None);
    }
}
