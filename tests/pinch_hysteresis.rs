//! Schmitt-trigger pinch classification over distance sequences.

use palmtide::config::GestureConfig;
use palmtide::gesture::pinch::{PinchClassifier, PinchEdge};
use rstest::{fixture, rstest};

#[fixture]
fn thresholds() -> (f32, f32) {
    let config = GestureConfig::default();
    (config.pinch_start, config.pinch_end)
}

fn run(sequence: &[f32], (start, end): (f32, f32)) -> Vec<bool> {
    let mut classifier = PinchClassifier::default();
    sequence
        .iter()
        .map(|&distance| {
            classifier.update(distance, start, end);
            classifier.is_pinching()
        })
        .collect()
}

#[rstest]
fn staying_between_thresholds_keeps_pinching(thresholds: (f32, f32)) {
    let (start, end) = thresholds;
    let between = (start + end) * 0.5;
    let states = run(&[0.2, start * 0.5, between, between, end, between], thresholds);
    assert_eq!(states, vec![false, true, true, true, true, true]);
}

#[rstest]
fn crossing_above_end_releases(thresholds: (f32, f32)) {
    let (start, end) = thresholds;
    let states = run(&[start * 0.5, end * 1.5, (start + end) * 0.5], thresholds);
    assert_eq!(states, vec![true, false, false]);
}

#[rstest]
#[case::just_above_start(0.0451, PinchEdge::None)]
#[case::below_start(0.03, PinchEdge::Started)]
fn idle_hand_needs_to_cross_start(thresholds: (f32, f32), #[case] distance: f32, #[case] edge: PinchEdge) {
    let (start, end) = thresholds;
    let mut classifier = PinchClassifier::default();
    assert_eq!(classifier.update(distance, start, end), edge);
}

#[rstest]
fn edges_are_reported_once(thresholds: (f32, f32)) {
    let (start, end) = thresholds;
    let mut classifier = PinchClassifier::default();
    let edges: Vec<PinchEdge> = [0.01, 0.01, 0.2, 0.2]
        .iter()
        .map(|&d| classifier.update(d, start, end))
        .collect();
    assert_eq!(
        edges,
        vec![PinchEdge::Started, PinchEdge::None, PinchEdge::Ended, PinchEdge::None]
    );
}
