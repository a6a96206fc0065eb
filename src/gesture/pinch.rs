//! Schmitt-trigger pinch classification.
//!
//! A pinch starts when the fingertip distance drops below `start` and only
//! ends once it rises above `end`. Distances between the two thresholds keep
//! the previous state, which suppresses flicker at the boundary.

/// Transition reported by [`PinchClassifier::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchEdge {
    /// No change this frame.
    None,
    /// The hand started pinching.
    Started,
    /// The hand stopped pinching.
    Ended,
}

/// Hysteresis state for one hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinchClassifier {
    pinching: bool,
}

impl PinchClassifier {
    /// Whether the hand is currently classified as pinching.
    #[must_use]
    pub const fn is_pinching(&self) -> bool {
        self.pinching
    }

    /// Feeds one distance sample.
    ///
    /// # Examples
    /// ```
    /// use palmtide::gesture::pinch::{PinchClassifier, PinchEdge};
    /// let mut pinch = PinchClassifier::default();
    /// assert_eq!(pinch.update(0.03, 0.045, 0.065), PinchEdge::Started);
    /// assert_eq!(pinch.update(0.05, 0.045, 0.065), PinchEdge::None);
    /// assert!(pinch.is_pinching());
    /// assert_eq!(pinch.update(0.07, 0.045, 0.065), PinchEdge::Ended);
    /// ```
    pub fn update(&mut self, distance: f32, start: f32, end: f32) -> PinchEdge {
        if self.pinching {
            if distance > end {
                self.pinching = false;
                return PinchEdge::Ended;
            }
        } else if distance < start {
            self.pinching = true;
            return PinchEdge::Started;
        }
        PinchEdge::None
    }

    /// Forces the not-pinching state without reporting an edge.
    pub fn reset(&mut self) {
        self.pinching = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn nan_distance_never_toggles() {
        let mut pinch = PinchClassifier::default();
        assert_eq!(pinch.update(f32::NAN, 0.045, 0.065), PinchEdge::None);
        pinch.update(0.01, 0.045, 0.065);
        assert_eq!(pinch.update(f32::NAN, 0.045, 0.065), PinchEdge::None);
        assert!(pinch.is_pinching());
    }
}
