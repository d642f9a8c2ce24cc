//! # Controller Surface User Interface
//!
//! Reference host for the pointer core, built on eframe/egui. Each frame it
//!
//! 1. arranges the layout tree into rectangles for the available screen area,
//! 2. feeds this frame's touch and mouse events through the [`ControllerSurface`],
//! 3. forwards emitted button events to the transport channel,
//! 4. paints buttons (highlighted while pressed) and, while adjusting, the
//!    divider handles.
//!
//! ## Layout
//! - **Top Panel**: display text, the "Adjust" toggle and the transport state
//! - **Central Panel**: the controller surface, filling the rest of the screen
//!
//! ## Event Flow
//! egui events go through the [`PointerTranslator`] into pointer samples. The
//! arranged surface is the hit-test collaborator; it is rebuilt after every
//! sample while adjusting so other pointers see the moved dividers.

pub mod common;
pub mod input;

use crate::config::GamepadOptions;
use crate::input::emitter::ButtonEvent;
use crate::input::surface::ControllerSurface;
use crate::layout::geometry::{arrange, ArrangedSurface, ColumnShares, PlacedButton, Rect};
use crate::layout::tree::{LayoutTree, LeafKind};
use crate::transport::ConnectionState;
use eframe::egui::{self, Align2, Event, FontId, Layout, Sense, Stroke, StrokeKind};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use self::common::{connection_badge, create_frame, from_egui_rect, to_egui_rect, UiColors};
use self::input::PointerTranslator;

const BUTTON_RADIUS: f32 = 8.0;
const PAD_RADIUS: f32 = 24.0;
const CONTROL_GAP: f32 = 3.0;

pub struct VirtualpadUI {
    /// `None` only for the duration of a mode switch
    surface: Option<ControllerSurface>,
    translator: PointerTranslator,
    options: GamepadOptions,
    columns: ColumnShares,
    /// State of the "Adjust" toggle
    adjusting: bool,
    event_sender: mpsc::Sender<ButtonEvent>,
    connection: watch::Receiver<ConnectionState>,
}

impl VirtualpadUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        tree: LayoutTree,
        options: GamepadOptions,
        columns: ColumnShares,
        adjusting: bool,
        event_sender: mpsc::Sender<ButtonEvent>,
        connection: watch::Receiver<ConnectionState>,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        VirtualpadUI {
            surface: Some(ControllerSurface::new(tree, adjusting)),
            translator: PointerTranslator::new(),
            options,
            columns,
            adjusting,
            event_sender,
            connection,
        }
    }

    fn apply_mode(&mut self) {
        let Some(surface) = self.surface.take() else {
            return;
        };
        if surface.is_adjusting() != self.adjusting {
            info!(
                "Switching surface to {}",
                if self.adjusting { "adjusting" } else { "playing" }
            );
        }
        self.surface = Some(surface.set_adjusting(self.adjusting));
    }

    fn arrange(&self, surface: &ControllerSurface, bounds: Rect) -> ArrangedSurface {
        arrange(surface.tree(), bounds, self.columns, surface.is_adjusting())
    }

    fn process_events(&mut self, events: &[Event], bounds: Rect) {
        let Some(mut surface) = self.surface.take() else {
            return;
        };
        let mut arranged = self.arrange(&surface, bounds);

        for event in events {
            let Some(sample) = self.translator.translate(event) else {
                continue;
            };
            for emitted in surface.handle(sample, &arranged) {
                self.forward(emitted);
            }
            if surface.is_adjusting() {
                arranged = self.arrange(&surface, bounds);
            }
        }

        self.surface = Some(surface);
    }

    fn forward(&self, event: ButtonEvent) {
        if let Err(e) = self.event_sender.try_send(event) {
            warn!("Dropping button event, transport not keeping up: {}", e);
        }
    }

    fn paint_surface(&self, painter: &egui::Painter, bounds: Rect) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let arranged = self.arrange(surface, bounds);
        let emitter = surface.pointers().emitter();

        for button in &arranged.buttons {
            paint_control(painter, button, emitter.is_pressed(&button.name));
        }

        if arranged.handles_active {
            for divider in &arranged.dividers {
                painter.rect_filled(to_egui_rect(divider.handle), 4.0, UiColors::HANDLE);
            }
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        let (status, color) = connection_badge(*self.connection.borrow());
        ui.horizontal_centered(|ui| {
            ui.label(self.options.text.as_str());
            ui.toggle_value(&mut self.adjusting, "Adjust");
            ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(color, status);
                ui.label(self.options.connection_code.as_str());
            });
        });
    }
}

fn paint_control(painter: &egui::Painter, button: &PlacedButton, pressed: bool) {
    let rect = to_egui_rect(button.rect).shrink(CONTROL_GAP);
    let radius = match button.kind {
        LeafKind::Button => BUTTON_RADIUS,
        LeafKind::Pad => PAD_RADIUS,
    };
    let fill = if pressed {
        UiColors::PRESSED
    } else {
        UiColors::BUTTON
    };

    painter.rect_filled(rect, radius, fill);
    painter.rect_stroke(
        rect,
        radius,
        Stroke::new(1.0, UiColors::BORDER),
        StrokeKind::Inside,
    );
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        &button.label,
        FontId::proportional(24.0),
        UiColors::TEXT,
    );
}

impl eframe::App for VirtualpadUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(Duration::from_millis(33));

        egui::TopBottomPanel::top("top_panel")
            .frame(create_frame(UiColors::INNER_BG, UiColors::BORDER))
            .show_separator_line(false)
            .show(ctx, |ui| self.top_bar(ui));
        self.apply_mode();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(UiColors::MAIN_BG))
            .show(ctx, |ui| {
                let area = ui.max_rect();
                // Claim the surface so egui does not start drags or scrolls on it
                ui.allocate_rect(area, Sense::click_and_drag());

                let bounds = from_egui_rect(area);
                let events = ui.input(|input| input.events.clone());
                self.process_events(&events, bounds);
                self.paint_surface(ui.painter(), bounds);
            });
    }
}
