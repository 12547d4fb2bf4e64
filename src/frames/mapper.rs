//! Physical quantity <-> frame index <-> playback time conversions.

use super::{FRAME_COUNT, MAX_FRAME, MAX_OFFSET, NEUTRAL_FRAME};

/// Earliest playback time ever sent to a channel.
pub const MIN_TIME: f32 = 0.01;
/// Latest playback time ever sent to a channel.
pub const MAX_TIME: f32 = 0.99;

/// Normalized playback time for a frame, kept off the timeline ends to avoid
/// wrap artifacts in the host player.
#[must_use]
pub fn normalized_time(frame: i32) -> f32 {
    (frame as f32 / FRAME_COUNT as f32).clamp(MIN_TIME, MAX_TIME)
}

/// Frame index for a signed offset from neutral, saturated at the ends of
/// the timeline.
#[must_use]
pub fn offset_to_frame(offset: i32) -> i32 {
    NEUTRAL_FRAME.saturating_add(offset).clamp(0, MAX_FRAME)
}

/// Physical size of one frame step for a given travel limit.
///
/// The full `2 * limit` sweep is spread over [`MAX_OFFSET`] frames, so a
/// displacement of `limit / 2` already reaches the timeline end. Callers
/// double their displacement before converting to use the full sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScale {
    per_frame: f32,
}

impl FrameScale {
    /// Scale for a linear (units) or angular (degrees) travel limit.
    #[must_use]
    pub fn new(limit: f32) -> Self {
        Self {
            per_frame: (limit * 2.0) / MAX_OFFSET as f32,
        }
    }

    /// Signed frame offset for a physical value, truncated toward zero.
    ///
    /// Non-finite values (including a degenerate zero scale) map to 0.
    #[must_use]
    pub fn frame_offset(&self, value: f32) -> i32 {
        let shift = value / self.per_frame;
        if shift.is_finite() {
            shift as i32
        } else {
            0
        }
    }

    /// Like [`frame_offset`](Self::frame_offset) but saturated to
    /// `[-MAX_OFFSET, MAX_OFFSET]` before truncation.
    #[must_use]
    pub fn saturated_offset(&self, value: f32) -> i32 {
        let limit = MAX_OFFSET as f32;
        let shift = value / self.per_frame;
        if shift.is_finite() {
            shift.clamp(-limit, limit) as i32
        } else {
            0
        }
    }

    /// Frame index for a physical value.
    #[must_use]
    pub fn to_frame(&self, value: f32) -> i32 {
        offset_to_frame(self.frame_offset(value))
    }
}
