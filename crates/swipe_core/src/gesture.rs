//! Drag tracking for the active card.
//!
//! Mouse and touch input are first reduced to a single [`PointerSignal`]
//! stream by [`pointer_signal`]; the [`GestureTracker`] only ever sees
//! horizontal positions from that stream.

use std::time::Duration;

use shared::domain::SwipeDirection;

/// Displacement (px) below which no preview is shown.
pub const PREVIEW_DEAD_ZONE: f32 = 50.0;
/// Displacement (px) at which the preview reaches full intensity.
pub const PREVIEW_FULL_SCALE: f32 = 100.0;
/// Card rotation per pixel of drag, in degrees.
pub const DRAG_ROTATION_PER_PX: f32 = 0.05;
pub const EXIT_OFFSET: f32 = 200.0;
pub const EXIT_ROTATION_DEG: f32 = 20.0;
pub const SWIPE_ANIMATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    pub active: bool,
    pub origin_x: f32,
    pub current_x: f32,
}

impl GestureState {
    pub fn displacement(&self) -> f32 {
        self.current_x - self.origin_x
    }
}

/// Like/dislike overlay intensities in `0.0..=1.0`. At most one is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Preview {
    pub like: f32,
    pub dislike: f32,
}

impl Preview {
    pub fn for_displacement(displacement: f32) -> Self {
        let magnitude = displacement.abs();
        if magnitude <= PREVIEW_DEAD_ZONE || magnitude.is_nan() {
            return Self::default();
        }
        let intensity = (magnitude / PREVIEW_FULL_SCALE).min(1.0);
        if displacement > 0.0 {
            Self {
                like: intensity,
                dislike: 0.0,
            }
        } else {
            Self {
                like: 0.0,
                dislike: intensity,
            }
        }
    }

    pub fn is_clear(&self) -> bool {
        self.like == 0.0 && self.dislike == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFeedback {
    pub displacement: f32,
    pub preview: Preview,
}

/// Single-card drag state machine: Idle -> Dragging -> Idle.
#[derive(Debug, Default)]
pub struct GestureTracker {
    state: GestureState,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.active
    }

    /// Begins a drag. Returns `false` if one is already in progress.
    pub fn on_start(&mut self, x: f32) -> bool {
        if self.state.active {
            return false;
        }
        self.state = GestureState {
            active: true,
            origin_x: x,
            current_x: x,
        };
        true
    }

    pub fn on_move(&mut self, x: f32) -> Option<DragFeedback> {
        if !self.state.active {
            return None;
        }
        self.state.current_x = x;
        let displacement = self.state.displacement();
        Some(DragFeedback {
            displacement,
            preview: Preview::for_displacement(displacement),
        })
    }

    /// Ends the drag and yields its final displacement.
    pub fn on_end(&mut self) -> Option<f32> {
        if !self.state.active {
            return None;
        }
        let displacement = self.state.displacement();
        self.state = GestureState::default();
        Some(displacement)
    }

    pub fn reset(&mut self) {
        self.state = GestureState::default();
    }
}

/// Raw input as delivered by a windowing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown { x: f32 },
    MouseMove { x: f32 },
    MouseUp,
    MouseLeave,
    TouchStart { touches: Vec<f32> },
    TouchMove { touches: Vec<f32> },
    TouchEnd,
    TouchCancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSignal {
    Press(f32),
    Move(f32),
    Release,
}

pub fn pointer_signal(event: &InputEvent) -> Option<PointerSignal> {
    match event {
        InputEvent::MouseDown { x } => Some(PointerSignal::Press(*x)),
        InputEvent::MouseMove { x } => Some(PointerSignal::Move(*x)),
        InputEvent::MouseUp | InputEvent::MouseLeave => Some(PointerSignal::Release),
        InputEvent::TouchStart { touches } => touches.first().copied().map(PointerSignal::Press),
        InputEvent::TouchMove { touches } => touches.first().copied().map(PointerSignal::Move),
        InputEvent::TouchEnd | InputEvent::TouchCancel => Some(PointerSignal::Release),
    }
}

/// Visual transform of the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    pub offset_x: f32,
    pub rotation_deg: f32,
    pub opacity: f32,
}

impl Default for CardPose {
    fn default() -> Self {
        Self::rest()
    }
}

impl CardPose {
    pub fn rest() -> Self {
        Self {
            offset_x: 0.0,
            rotation_deg: 0.0,
            opacity: 1.0,
        }
    }

    pub fn dragging(displacement: f32) -> Self {
        Self {
            offset_x: displacement,
            rotation_deg: displacement * DRAG_ROTATION_PER_PX,
            opacity: 1.0,
        }
    }

    pub fn exited(direction: SwipeDirection) -> Self {
        Self {
            offset_x: EXIT_OFFSET * direction.sign(),
            rotation_deg: EXIT_ROTATION_DEG * direction.sign(),
            opacity: 0.0,
        }
    }

    /// Pose `elapsed` into the exit animation that started at `from`.
    pub fn exiting(from: CardPose, direction: SwipeDirection, elapsed: Duration) -> Self {
        let t = (elapsed.as_secs_f32() / SWIPE_ANIMATION.as_secs_f32()).clamp(0.0, 1.0);
        let to = Self::exited(direction);
        if t >= 1.0 {
            return to;
        }
        let lerp = |a: f32, b: f32| a + (b - a) * t;
        Self {
            offset_x: lerp(from.offset_x, to.offset_x),
            rotation_deg: lerp(from.rotation_deg, to.rotation_deg),
            opacity: lerp(from.opacity, to.opacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_start_while_dragging_is_ignored() {
        let mut tracker = GestureTracker::new();
        assert!(tracker.on_start(10.0));
        assert!(!tracker.on_start(500.0));
        assert_eq!(tracker.state().origin_x, 10.0);
    }

    #[test]
    fn move_and_end_require_active_drag() {
        let mut tracker = GestureTracker::new();
        assert!(tracker.on_move(30.0).is_none());
        assert!(tracker.on_end().is_none());
    }

    #[test]
    fn displacement_is_measured_from_origin() {
        let mut tracker = GestureTracker::new();
        tracker.on_start(200.0);
        let feedback = tracker.on_move(130.0).expect("dragging");
        assert_eq!(feedback.displacement, -70.0);
        assert_eq!(tracker.on_end(), Some(-70.0));
        assert!(!tracker.is_dragging());
        assert_eq!(tracker.state(), GestureState::default());
    }

    #[test]
    fn preview_has_dead_zone_and_saturates() {
        assert!(Preview::for_displacement(40.0).is_clear());
        assert!(Preview::for_displacement(-50.0).is_clear());

        let partial = Preview::for_displacement(90.0);
        assert!((partial.like - 0.9).abs() < f32::EPSILON);
        assert_eq!(partial.dislike, 0.0);

        let full = Preview::for_displacement(-240.0);
        assert_eq!(full.dislike, 1.0);
        assert_eq!(full.like, 0.0);
    }

    #[test]
    fn gesture_trace_previews_then_reports_final_displacement() {
        let mut tracker = GestureTracker::new();
        tracker.on_start(0.0);
        let previews: Vec<Preview> = [40.0, 90.0, 110.0]
            .into_iter()
            .filter_map(|x| tracker.on_move(x))
            .map(|feedback| feedback.preview)
            .collect();
        assert!(previews[0].is_clear());
        assert!(previews[1].like > 0.0 && previews[1].like < 1.0);
        assert_eq!(previews[2].like, 1.0);
        assert_eq!(tracker.on_end(), Some(110.0));
    }

    #[test]
    fn touch_uses_first_contact_and_leave_releases() {
        assert_eq!(
            pointer_signal(&InputEvent::TouchStart {
                touches: vec![12.0, 80.0]
            }),
            Some(PointerSignal::Press(12.0))
        );
        assert_eq!(
            pointer_signal(&InputEvent::TouchMove { touches: vec![] }),
            None
        );
        assert_eq!(
            pointer_signal(&InputEvent::MouseLeave),
            Some(PointerSignal::Release)
        );
        assert_eq!(
            pointer_signal(&InputEvent::TouchCancel),
            Some(PointerSignal::Release)
        );
    }

    #[test]
    fn drag_pose_rotates_with_displacement() {
        let pose = CardPose::dragging(-60.0);
        assert_eq!(pose.offset_x, -60.0);
        assert!((pose.rotation_deg + 3.0).abs() < 1e-5);
        assert_eq!(pose.opacity, 1.0);
    }

    #[test]
    fn exit_animation_interpolates_to_off_screen() {
        let from = CardPose::dragging(120.0);
        let start = CardPose::exiting(from, SwipeDirection::Right, Duration::ZERO);
        assert_eq!(start, from);

        let end = CardPose::exiting(from, SwipeDirection::Right, SWIPE_ANIMATION * 2);
        assert_eq!(end, CardPose::exited(SwipeDirection::Right));
        assert_eq!(end.offset_x, 200.0);
        assert_eq!(end.opacity, 0.0);

        let left = CardPose::exited(SwipeDirection::Left);
        assert_eq!(left.rotation_deg, -20.0);
    }
}
