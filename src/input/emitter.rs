use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Kind of a button event.
///
/// Only `Active` and `Inactive` are produced by the pointer core. The gesture
/// kinds are part of the event vocabulary receivers understand, for gesture
/// detection layered on top of press and release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonEventKind {
    Active,
    Inactive,
    Tap,
    LongPress,
    SwipeUp,
    SwipeLeft,
    SwipeRight,
    SwipeDown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonEvent {
    pub name: String,
    pub kind: ButtonEventKind,
    pub pressed: bool,
    pub timestamp: DateTime<Local>,
}

/// Edge-triggered press tracking, one entry per button name.
#[derive(Debug, Default, Clone)]
pub struct ButtonEventEmitter {
    pressed: HashMap<String, bool>,
}

impl ButtonEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pressed state of `name` and returns an event only when
    /// the state actually changed.
    pub fn set_pressed(&mut self, name: &str, pressed: bool) -> Option<ButtonEvent> {
        let previous = self.pressed.get(name).copied().unwrap_or(false);
        if previous == pressed {
            debug!("Button {} already {}", name, state_word(pressed));
            return None;
        }
        self.pressed.insert(name.to_string(), pressed);

        let timestamp = Local::now();
        info!(
            "Button {} {} at {}",
            name,
            state_word(pressed),
            timestamp.format("%H:%M:%S.%3f")
        );
        Some(ButtonEvent {
            name: name.to_string(),
            kind: if pressed {
                ButtonEventKind::Active
            } else {
                ButtonEventKind::Inactive
            },
            pressed,
            timestamp,
        })
    }

    pub fn is_pressed(&self, name: &str) -> bool {
        self.pressed.get(name).copied().unwrap_or(false)
    }
}

fn state_word(pressed: bool) -> &'static str {
    if pressed {
        "pressed"
    } else {
        "released"
    }
}
