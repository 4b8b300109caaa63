//! Translates raw egui input into card gesture events.

use egui::{Event, PointerButton, Rect, TouchId, TouchPhase};
use swipe_core::InputEvent;

/// Per-window input state for the card.
///
/// Drags only start inside the card; moves and releases are tracked anywhere
/// in the window. A touch drag follows the finger that started it and every
/// other finger is ignored until that one lifts. When a frame carries touch
/// events the pointer events egui synthesizes from them are skipped so a
/// finger is not counted twice.
#[derive(Debug, Default)]
pub struct CardInput {
    active_touch: Option<TouchId>,
}

impl CardInput {
    /// Forgets the tracked finger, e.g. when input was not delivered.
    pub fn reset(&mut self) {
        self.active_touch = None;
    }

    pub fn events(&mut self, events: &[Event], card_rect: Rect) -> Vec<InputEvent> {
        let has_touch = events.iter().any(|event| matches!(event, Event::Touch { .. }));

        events
            .iter()
            .filter_map(|event| match event {
                Event::Touch { id, phase, pos, .. } => self.touch(*id, *phase, pos.x, || {
                    card_rect.contains(*pos)
                }),
                _ if has_touch => None,
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if *pressed {
                        card_rect
                            .contains(*pos)
                            .then_some(InputEvent::MouseDown { x: pos.x })
                    } else {
                        Some(InputEvent::MouseUp)
                    }
                }
                Event::PointerMoved(pos) => Some(InputEvent::MouseMove { x: pos.x }),
                Event::PointerGone => Some(InputEvent::MouseLeave),
                _ => None,
            })
            .collect()
    }

    fn touch(
        &mut self,
        id: TouchId,
        phase: TouchPhase,
        x: f32,
        on_card: impl FnOnce() -> bool,
    ) -> Option<InputEvent> {
        match (phase, self.active_touch) {
            (TouchPhase::Start, None) if on_card() => {
                self.active_touch = Some(id);
                Some(InputEvent::TouchStart { touches: vec![x] })
            }
            (_, Some(active)) if active != id => None,
            (_, None) => None,
            (TouchPhase::Start, Some(_)) => None,
            (TouchPhase::Move, Some(_)) => Some(InputEvent::TouchMove { touches: vec![x] }),
            (TouchPhase::End, Some(_)) => {
                self.active_touch = None;
                Some(InputEvent::TouchEnd)
            }
            (TouchPhase::Cancel, Some(_)) => {
                self.active_touch = None;
                Some(InputEvent::TouchCancel)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Modifiers, TouchDeviceId};

    fn card() -> Rect {
        Rect::from_min_max(pos2(100.0, 100.0), pos2(500.0, 600.0))
    }

    fn button(x: f32, y: f32, pressed: bool) -> Event {
        Event::PointerButton {
            pos: pos2(x, y),
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::default(),
        }
    }

    fn card_input_events(events: &[Event], card_rect: Rect) -> Vec<InputEvent> {
        CardInput::default().events(events, card_rect)
    }

    fn touch(phase: TouchPhase, x: f32, y: f32) -> Event {
        finger(1, phase, x, y)
    }

    fn finger(id: u64, phase: TouchPhase, x: f32, y: f32) -> Event {
        Event::Touch {
            device_id: TouchDeviceId(0),
            id: TouchId(id),
            phase,
            pos: pos2(x, y),
            force: None,
        }
    }

    #[test]
    fn mouse_drag_maps_to_mouse_events() {
        let events = vec![
            button(200.0, 300.0, true),
            Event::PointerMoved(pos2(260.0, 310.0)),
            button(330.0, 310.0, false),
        ];
        assert_eq!(
            card_input_events(&events, card()),
            vec![
                InputEvent::MouseDown { x: 200.0 },
                InputEvent::MouseMove { x: 260.0 },
                InputEvent::MouseUp,
            ]
        );
    }

    #[test]
    fn presses_outside_the_card_do_not_start_a_drag() {
        let events = vec![button(20.0, 20.0, true), touch(TouchPhase::Start, 20.0, 20.0)];
        assert!(card_input_events(&events, card()).is_empty());
    }

    #[test]
    fn leaving_the_window_releases() {
        assert_eq!(
            card_input_events(&[Event::PointerGone], card()),
            vec![InputEvent::MouseLeave]
        );
    }

    #[test]
    fn touch_frames_ignore_synthesized_pointer_events() {
        let events = vec![
            touch(TouchPhase::Start, 150.0, 200.0),
            button(150.0, 200.0, true),
            touch(TouchPhase::Move, 40.0, 200.0),
            Event::PointerMoved(pos2(40.0, 200.0)),
            touch(TouchPhase::Cancel, 40.0, 200.0),
        ];
        assert_eq!(
            card_input_events(&events, card()),
            vec![
                InputEvent::TouchStart { touches: vec![150.0] },
                InputEvent::TouchMove { touches: vec![40.0] },
                InputEvent::TouchCancel,
            ]
        );
    }

    #[test]
    fn secondary_button_is_ignored() {
        let events = vec![Event::PointerButton {
            pos: pos2(200.0, 300.0),
            button: PointerButton::Secondary,
            pressed: true,
            modifiers: Modifiers::default(),
        }];
        assert!(card_input_events(&events, card()).is_empty());
    }

    #[test]
    fn second_finger_cannot_move_or_release_the_drag() {
        let mut input = CardInput::default();
        let frame_one = input.events(&[finger(1, TouchPhase::Start, 150.0, 200.0)], card());
        assert_eq!(frame_one, vec![InputEvent::TouchStart { touches: vec![150.0] }]);

        let frame_two = input.events(
            &[
                finger(2, TouchPhase::Start, 300.0, 200.0),
                finger(2, TouchPhase::Move, 400.0, 200.0),
                finger(2, TouchPhase::End, 400.0, 200.0),
            ],
            card(),
        );
        assert!(frame_two.is_empty());

        let frame_three = input.events(
            &[
                finger(1, TouchPhase::Move, 170.0, 200.0),
                finger(1, TouchPhase::End, 170.0, 200.0),
            ],
            card(),
        );
        assert_eq!(
            frame_three,
            vec![InputEvent::TouchMove { touches: vec![170.0] }, InputEvent::TouchEnd]
        );
    }

    #[test]
    fn stationary_finger_with_a_moving_second_finger_does_not_commit() {
        let mut controller = swipe_core::SessionController::new(1);
        controller.begin_loading();
        let items = swipe_core::FallbackItems::from_settings(&swipe_core::Settings::default())
            .expect("fallback")
            .generate(1);
        controller.load(items).expect("load");

        let mut input = CardInput::default();
        let frames = [
            vec![finger(1, TouchPhase::Start, 150.0, 200.0)],
            vec![
                finger(2, TouchPhase::Start, 160.0, 220.0),
                finger(2, TouchPhase::Move, 400.0, 220.0),
                finger(2, TouchPhase::End, 400.0, 220.0),
            ],
        ];
        for frame in &frames {
            for event in input.events(frame, card()) {
                if let Some(signal) = swipe_core::pointer_signal(&event) {
                    controller.handle_pointer(signal).expect("pointer");
                }
            }
        }
        assert!(controller.is_dragging());
        assert!(controller.session().liked().is_empty());
        assert_eq!(controller.session().cursor(), 0);
    }

    #[test]
    fn a_new_finger_can_start_after_the_first_lifts() {
        let mut input = CardInput::default();
        input.events(&[finger(1, TouchPhase::Start, 150.0, 200.0)], card());
        input.events(&[finger(1, TouchPhase::Cancel, 150.0, 200.0)], card());
        assert_eq!(
            input.events(&[finger(2, TouchPhase::Start, 180.0, 200.0)], card()),
            vec![InputEvent::TouchStart { touches: vec![180.0] }]
        );
    }

    #[test]
    fn reset_drops_the_tracked_finger() {
        let mut input = CardInput::default();
        input.events(&[finger(1, TouchPhase::Start, 150.0, 200.0)], card());
        input.reset();
        assert!(input
            .events(&[finger(1, TouchPhase::Move, 300.0, 200.0)], card())
            .is_empty());
    }
}
