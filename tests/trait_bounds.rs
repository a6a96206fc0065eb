//! Compile-time guarantees about core types.

use palmtide::gesture::landmarks::ScreenHand;
use palmtide::snapshot::RenderSnapshot;
use palmtide::{
    BodyId, Detection, Engine, EngineConfig, HandLandmarks, HandState, Landmark, Settings, Shape,
};
use static_assertions::{assert_eq_size, assert_impl_all, assert_not_impl_any};

// Ids are cheap handles usable as map keys.
assert_impl_all!(BodyId: Copy, Eq, std::hash::Hash, Ord, Send, Sync);
assert_eq_size!(BodyId, u64);

// Landmark sets are plain data that can cross threads.
assert_impl_all!(HandLandmarks: Copy, Send, Sync);
assert_impl_all!(Landmark: Copy, serde::Serialize);
assert_eq_size!(ScreenHand, [glam::Vec2; 21]);

// Hands hold growable buffers and are cloned, not copied.
assert_not_impl_any!(HandState: Copy);
assert_impl_all!(Shape: Copy, serde::Serialize);

assert_impl_all!(Engine: Clone, Send, Sync, std::fmt::Debug);
assert_impl_all!(EngineConfig: Default, serde::de::DeserializeOwned);
assert_impl_all!(Settings: Copy, Default);
assert_impl_all!(Detection: Clone, Default);
assert_impl_all!(RenderSnapshot: serde::Serialize, Clone);

#[test]
fn trait_bounds_hold() {}
