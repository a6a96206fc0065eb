//! Detector landmark types and their projection to screen space.
//!
//! The detector reports each hand as 21 points in image-normalised
//! coordinates. The camera preview is mirrored, so screen x is flipped:
//! `x' = (1 - x) * width`.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Viewport;
use crate::constants::{INDEX_TIP, LANDMARK_COUNT, PALM_LANDMARKS, THUMB_TIP};
use crate::vector_math::centroid;

/// One landmark in image-normalised `[0, 1]` coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 at the left of the camera image.
    pub x: f32,
    /// Vertical position, 0 at the top of the camera image.
    pub y: f32,
    /// Relative depth; unused by the 2D pipeline.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    /// Landmark at `(x, y)` with zero depth.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar position in normalised space.
    #[must_use]
    pub const fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Rejected raw hand input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LandmarkError {
    /// The hand did not carry exactly 21 landmarks.
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    WrongCount(usize),
    /// A landmark coordinate was NaN or infinite.
    #[error("landmark {0} has a non-finite coordinate")]
    NonFinite(usize),
}

/// Screen-space positions of all 21 landmarks.
pub type ScreenHand = [Vec2; LANDMARK_COUNT];

/// A validated 21-point hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandLandmarks([Landmark; LANDMARK_COUNT]);

impl HandLandmarks {
    /// Validates a full set of landmarks.
    ///
    /// # Errors
    /// Returns [`LandmarkError::NonFinite`] for the first non-finite point.
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Result<Self, LandmarkError> {
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(LandmarkError::NonFinite(index));
        }
        Ok(Self(points))
    }

    /// Landmark `index`, or the origin for an out-of-range index.
    #[must_use]
    pub fn get(&self, index: usize) -> Landmark {
        self.0.get(index).copied().unwrap_or_default()
    }

    /// All landmarks.
    #[must_use]
    pub const fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.0
    }

    /// Thumb-tip to index-tip distance in normalised space.
    #[must_use]
    pub fn pinch_distance(&self) -> f32 {
        self.get(THUMB_TIP).xy().distance(self.get(INDEX_TIP).xy())
    }

    /// Projects every landmark to mirrored screen pixels.
    #[must_use]
    pub fn to_screen(&self, viewport: &Viewport) -> ScreenHand {
        self.0
            .map(|p| Vec2::new((1.0 - p.x) * viewport.width, p.y * viewport.height))
    }
}

impl TryFrom<&[Landmark]> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(points: &[Landmark]) -> Result<Self, Self::Error> {
        let array: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(points.len()))?;
        Self::new(array)
    }
}

/// Pixel distance between thumb and index tips divided by the smaller
/// viewport dimension.
#[must_use]
pub fn screen_pinch_distance(screen: &ScreenHand, viewport: &Viewport) -> f32 {
    let thumb = screen.get(THUMB_TIP).copied().unwrap_or_default();
    let index = screen.get(INDEX_TIP).copied().unwrap_or_default();
    thumb.distance(index) / viewport.min_dimension()
}

/// Midpoint between thumb and index tips.
#[must_use]
pub fn pinch_anchor(screen: &ScreenHand) -> Vec2 {
    let thumb = screen.get(THUMB_TIP).copied().unwrap_or_default();
    let index = screen.get(INDEX_TIP).copied().unwrap_or_default();
    (thumb + index) * 0.5
}

/// Average of the wrist and four knuckles.
#[must_use]
pub fn palm_center(screen: &ScreenHand) -> Vec2 {
    centroid(PALM_LANDMARKS.iter().filter_map(|&i| screen.get(i).copied())).unwrap_or_default()
}

/// One detector callback's worth of hands.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Detection {
    /// Host timestamp of the analysed frame, in seconds.
    pub timestamp: f64,
    /// Hands in detector order; index `i` feeds hand slot `i`.
    pub hands: Vec<HandLandmarks>,
}

impl Detection {
    /// Builds a detection from raw landmark lists, dropping malformed hands.
    pub fn from_raw<'a>(timestamp: f64, raw: impl IntoIterator<Item = &'a [Landmark]>) -> Self {
        let hands = raw
            .into_iter()
            .filter_map(|points| match HandLandmarks::try_from(points) {
                Ok(hand) => Some(hand),
                Err(err) => {
                    log::warn!("skipping malformed hand: {err}");
                    None
                }
            })
            .collect();
        Self { timestamp, hands }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn flat_hand() -> [Landmark; LANDMARK_COUNT] {
        [Landmark::new(0.5, 0.5); LANDMARK_COUNT]
    }

    #[rstest]
    fn wrong_count_is_rejected() {
        let short = [Landmark::new(0.1, 0.1); 20];
        assert_eq!(
            HandLandmarks::try_from(&short[..]),
            Err(LandmarkError::WrongCount(20))
        );
    }

    #[rstest]
    fn non_finite_point_is_rejected() {
        let mut points = flat_hand();
        if let Some(p) = points.get_mut(3) {
            p.y = f32::NAN;
        }
        assert_eq!(HandLandmarks::new(points), Err(LandmarkError::NonFinite(3)));
    }

    #[rstest]
    fn projection_mirrors_x() {
        let mut points = flat_hand();
        if let Some(p) = points.get_mut(0) {
            *p = Landmark::new(0.25, 0.75);
        }
        let hand = HandLandmarks::new(points).expect("valid hand");
        let screen = hand.to_screen(&Viewport::new(800.0, 600.0));
        assert_relative_eq!(screen[0].x, 600.0);
        assert_relative_eq!(screen[0].y, 450.0);
    }

    #[rstest]
    fn malformed_hands_are_dropped_from_detection() {
        let good = flat_hand();
        let bad = [Landmark::new(0.1, 0.1); 5];
        let detection = Detection::from_raw(1.0, [&good[..], &bad[..]]);
        assert_eq!(detection.hands.len(), 1);
    }
}
