use super::*;

fn linear_track() -> Track<f64> {
    let mut t = Track::default();
    t.insert(FrameIndex(10), 10.0, Ease::Linear);
    t.insert(FrameIndex(0), 0.0, Ease::Linear);
    t
}

#[test]
fn empty_track_has_no_value() {
    let t: Track<f64> = Track::default();
    assert!(t.is_empty());
    assert_eq!(t.sample(FrameIndex(3)), None);
}

#[test]
fn insert_keeps_keys_sorted() {
    let t = linear_track();
    let frames: Vec<u64> = t.keys().iter().map(|k| k.frame.0).collect();
    assert_eq!(frames, vec![0, 10]);
}

#[test]
fn insert_at_same_frame_replaces() {
    let mut t = linear_track();
    t.insert(FrameIndex(10), 20.0, Ease::Linear);
    assert_eq!(t.keys().len(), 2);
    assert_eq!(t.sample(FrameIndex(10)), Some(20.0));
}

#[test]
fn linear_interpolates_and_holds_outside() {
    let t = linear_track();
    assert_eq!(t.sample(FrameIndex(5)), Some(5.0));
    assert_eq!(t.sample(FrameIndex(40)), Some(10.0));
}

#[test]
fn constant_ease_holds_between_keys() {
    let mut t = Track::default();
    t.insert(FrameIndex(0), 1.0, Ease::Constant);
    t.insert(FrameIndex(10), 3.0, Ease::Constant);
    assert_eq!(t.sample(FrameIndex(9)), Some(1.0));
    assert_eq!(t.sample(FrameIndex(10)), Some(3.0));
}

#[test]
fn vec3_track_holds_before_first_key() {
    let mut t = Track::default();
    t.insert(FrameIndex(3), Vec3::new(0.0, 0.0, 3.0), Ease::InOutCubic);
    t.insert(FrameIndex(13), Vec3::new(10.0, 0.0, 3.0), Ease::InOutCubic);
    assert_eq!(t.sample(FrameIndex(0)), Some(Vec3::new(0.0, 0.0, 3.0)));
    assert_eq!(t.sample(FrameIndex(8)), Some(Vec3::new(5.0, 0.0, 3.0)));
}

#[test]
fn visibility_switches_at_next_key() {
    let mut t = Track::default();
    t.insert(FrameIndex(0), Visibility::HIDDEN, Ease::Linear);
    t.insert(FrameIndex(2), Visibility::SHOWN, Ease::Linear);
    assert_eq!(t.sample(FrameIndex(1)), Some(Visibility::HIDDEN));
    assert_eq!(t.sample(FrameIndex(2)), Some(Visibility::SHOWN));
}
