//! Per-hand tracking state.
//!
//! There is one [`HandState`] per tracked hand slot. The detector callback is
//! the only writer of the gesture fields (pointer, smoothed points, pinch
//! state, colliders); the rendering tick only reads them. The grab id is a
//! weak handle: the body it names may have been cleared, in which case the
//! next lookup simply misses and the grab is dropped.

use glam::Vec2;

use crate::constants::MAX_HANDS;
use crate::gesture::colliders::HandColliders;
use crate::gesture::landmarks::ScreenHand;
use crate::gesture::pinch::PinchClassifier;
use crate::gesture::velocity::VelocityEstimator;
use crate::grab::throw::ThrowHistory;
use crate::world::body::BodyId;

/// Pointer derived from the pinch anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Screen-space pinch anchor; `Some` only while pinching and tracked.
    pub pinch: Option<Vec2>,
    /// Anchor from the previous callback.
    pub prev_pinch: Option<Vec2>,
    velocity: VelocityEstimator,
}

impl PointerState {
    /// Smoothed world-space anchor velocity.
    #[must_use]
    pub const fn pinch_vel(&self) -> Vec2 {
        self.velocity.velocity()
    }

    pub(crate) fn estimator_mut(&mut self) -> &mut VelocityEstimator {
        &mut self.velocity
    }
}

/// Everything known about one hand slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandState {
    /// Whether the slot received landmarks in the latest callback.
    pub tracked: bool,
    /// Pinch anchor and its velocity.
    pub pointer: PointerState,
    /// Hysteresis classifier.
    pub pinch: PinchClassifier,
    /// Body held by this hand.
    pub grab_active_id: Option<BodyId>,
    /// Exponentially smoothed screen points for rendering.
    pub smoothed: Option<ScreenHand>,
    /// Screen-space palm centre.
    pub palm: Option<Vec2>,
    /// World-space palm velocity.
    pub palm_velocity: VelocityEstimator,
    /// Pointer velocities recorded during the current grab.
    pub throw_history: ThrowHistory,
    /// Kinematic palm and knuckle colliders.
    pub colliders: HandColliders,
}

impl HandState {
    /// Whether the hand is pinching right now.
    #[must_use]
    pub const fn is_pinching(&self) -> bool {
        self.tracked && self.pinch.is_pinching()
    }

    /// Clears all transient state after the hand disappears.
    ///
    /// The grab must already have been released through the normal path.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Fixed-size array of hand slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandSlots {
    slots: [HandState; MAX_HANDS],
}

impl HandSlots {
    /// Slot `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HandState> {
        self.slots.get(index)
    }

    /// Mutable slot `index`, if in range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut HandState> {
        self.slots.get_mut(index)
    }

    /// Iterates over `(index, state)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &HandState)> {
        self.slots.iter().enumerate()
    }

    /// Mutable iteration over the slots.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut HandState)> {
        self.slots.iter_mut().enumerate()
    }

    /// The hand holding `body`, if any.
    #[must_use]
    pub fn holder_of(&self, body: BodyId) -> Option<usize> {
        self.slots
            .iter()
            .position(|h| h.grab_active_id == Some(body))
    }

    /// Whether `body` is held by a hand other than `hand`.
    #[must_use]
    pub fn held_by_other(&self, body: BodyId, hand: usize) -> bool {
        self.holder_of(body).is_some_and(|holder| holder != hand)
    }

    /// Resets every slot.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }
}
