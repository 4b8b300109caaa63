//! Threshold policy that turns a released drag into a [`Decision`].

use shared::domain::Decision;

/// Horizontal travel (px) a release must exceed to commit a decision.
pub const COMMIT_THRESHOLD: f32 = 100.0;

/// Classifies a final horizontal displacement.
///
/// Every gesture is judged on its own displacement; there is no memory of
/// earlier gestures. Exactly `±COMMIT_THRESHOLD` is still a cancel.
pub fn resolve(displacement: f32) -> Decision {
    if displacement > COMMIT_THRESHOLD {
        Decision::Like
    } else if displacement < -COMMIT_THRESHOLD {
        Decision::Dislike
    } else {
        Decision::Cancel
    }
}
