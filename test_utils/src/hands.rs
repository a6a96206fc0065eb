//! Synthetic hands positioned in screen space.

use glam::Vec2;
use palmtide::replay::synthesize_hand;
use palmtide::{Detection, HandLandmarks, Viewport};

/// Converts a screen point to the mirrored, normalised landmark space.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use palmtide::Viewport;
/// use test_utils::to_normalised;
/// let n = to_normalised(Vec2::new(200.0, 300.0), &Viewport::new(800.0, 600.0));
/// assert!((n.x - 0.75).abs() < 1e-6);
/// assert!((n.y - 0.5).abs() < 1e-6);
/// ```
pub fn to_normalised(screen: Vec2, viewport: &Viewport) -> Vec2 {
    Vec2::new(1.0 - screen.x / viewport.width, screen.y / viewport.height)
}

/// A pinching hand whose pinch anchor projects onto `screen`.
///
/// # Panics
/// Panics if `screen` is not finite.
pub fn pinching_hand_at(screen: Vec2, viewport: &Viewport) -> HandLandmarks {
    synthesize_hand(to_normalised(screen, viewport), true).expect("finite hand")
}

/// An open hand whose fingertip midpoint projects onto `screen`.
///
/// # Panics
/// Panics if `screen` is not finite.
pub fn open_hand_at(screen: Vec2, viewport: &Viewport) -> HandLandmarks {
    synthesize_hand(to_normalised(screen, viewport), false).expect("finite hand")
}

/// Wraps hands into a detection at host time `timestamp`.
pub fn detection(timestamp: f64, hands: Vec<HandLandmarks>) -> Detection {
    Detection { timestamp, hands }
}
