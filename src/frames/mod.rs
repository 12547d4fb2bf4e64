//! Discrete frame space standing in for continuous mechanical travel.
//!
//! Each of the four mechanism axes is an index into a pose timeline of
//! [`FRAME_COUNT`] frames. [`NEUTRAL_FRAME`] is the rest pose; the two ends
//! are the travel extremes in each direction.
//!
//! - [`mapper`] converts physical quantities to frames and frames to
//!   normalized playback time.
//! - [`tracker`] steps a frame toward its target at a bounded rate.

pub mod mapper;
pub mod tracker;

use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

pub use mapper::{normalized_time, offset_to_frame, FrameScale};
use serde::{Deserialize, Serialize};
pub use tracker::advance;

/// Number of frames in every axis timeline.
pub const FRAME_COUNT: i32 = 401;
/// Highest valid frame index.
pub const MAX_FRAME: i32 = FRAME_COUNT - 1;
/// Frame index of the neutral (zero displacement) pose.
pub const NEUTRAL_FRAME: i32 = 200;
/// Largest signed offset from neutral, in frames.
pub const MAX_OFFSET: i32 = (FRAME_COUNT - 1) / 2;

/// One of the four independently driven mechanism axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Lateral translation along X.
    TranslateX,
    /// Lateral translation along Y.
    TranslateY,
    /// Tip rotation about X.
    RotateX,
    /// Tip rotation about Y.
    RotateY,
}

impl Axis {
    /// All axes, translation first.
    pub const ALL: [Self; 4] =
        [Self::TranslateX, Self::TranslateY, Self::RotateX, Self::RotateY];

    /// Whether this axis belongs to the translating stage.
    #[must_use]
    pub fn is_translation(self) -> bool {
        matches!(self, Self::TranslateX | Self::TranslateY)
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TranslateX => f.write_str("x-translate"),
            Self::TranslateY => f.write_str("y-translate"),
            Self::RotateX => f.write_str("x-rotate"),
            Self::RotateY => f.write_str("y-rotate"),
        }
    }
}

/// One frame index per axis.
///
/// Used both for where the mechanism currently is and for where it is being
/// driven. Values written through [`set`](Self::set) are clamped into
/// `[0, MAX_FRAME]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct AxisFrames {
    /// X-translate frame.
    pub translate_x: i32,
    /// Y-translate frame.
    pub translate_y: i32,
    /// X-rotate frame.
    pub rotate_x: i32,
    /// Y-rotate frame.
    pub rotate_y: i32,
}

impl AxisFrames {
    /// All four axes at the neutral frame.
    pub const NEUTRAL: Self = Self {
        translate_x: NEUTRAL_FRAME,
        translate_y: NEUTRAL_FRAME,
        rotate_x: NEUTRAL_FRAME,
        rotate_y: NEUTRAL_FRAME,
    };

    /// Set a single axis, clamped into the valid frame range.
    pub fn set(&mut self, axis: Axis, frame: i32) {
        self[axis] = frame.clamp(0, MAX_FRAME);
    }

    /// Reset both translation axes to neutral, leaving rotation untouched.
    pub fn neutral_translation(&mut self) {
        self.translate_x = NEUTRAL_FRAME;
        self.translate_y = NEUTRAL_FRAME;
    }

    /// Reset both rotation axes to neutral, leaving translation untouched.
    pub fn neutral_rotation(&mut self) {
        self.rotate_x = NEUTRAL_FRAME;
        self.rotate_y = NEUTRAL_FRAME;
    }

    /// Whether every axis sits on the neutral frame.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Copy with every axis clamped into `[0, MAX_FRAME]`.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        for axis in Axis::ALL {
            self.set(axis, self[axis]);
        }
        self
    }

    /// Advance every axis toward `target` by at most `step` frames.
    #[must_use]
    pub fn stepped_toward(&self, target: &Self, step: i32) -> Self {
        let mut next = *self;
        for axis in Axis::ALL {
            next[axis] = advance(target[axis], self[axis], step);
        }
        next
    }
}

impl Default for AxisFrames {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl Index<Axis> for AxisFrames {
    type Output = i32;

    fn index(&self, axis: Axis) -> &Self::Output {
        match axis {
            Axis::TranslateX => &self.translate_x,
            Axis::TranslateY => &self.translate_y,
            Axis::RotateX => &self.rotate_x,
            Axis::RotateY => &self.rotate_y,
        }
    }
}

impl IndexMut<Axis> for AxisFrames {
    fn index_mut(&mut self, axis: Axis) -> &mut Self::Output {
        match axis {
            Axis::TranslateX => &mut self.translate_x,
            Axis::TranslateY => &mut self.translate_y,
            Axis::RotateX => &mut self.rotate_x,
            Axis::RotateY => &mut self.rotate_y,
        }
    }
}
