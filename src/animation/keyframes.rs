use crate::{
    animation::ease::Ease,
    foundation::core::{Euler, FrameIndex, Vec3, Visibility},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec3::new(
            f64::lerp(&a.x, &b.x, t),
            f64::lerp(&a.y, &b.y, t),
            f64::lerp(&a.z, &b.z, t),
        )
    }
}

impl Lerp for Euler {
    // Component-wise, no shortest-arc wrapping: the engine interpolates raw channels too.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Euler::new(
            f64::lerp(&a.x, &b.x, t),
            f64::lerp(&a.y, &b.y, t),
            f64::lerp(&a.z, &b.z, t),
        )
    }
}

impl Lerp for Visibility {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if t >= 1.0 { *b } else { *a }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    pub frame: FrameIndex,
    pub value: T,
    pub ease: Ease, // ease applied toward next key
}

/// One animated channel: keys kept sorted by frame, at most one key per frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Track<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> Default for Track<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<T> Track<T>
where
    T: Lerp + Clone,
{
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Insert a key, replacing any key already at `frame`.
    pub fn insert(&mut self, frame: FrameIndex, value: T, ease: Ease) {
        let key = Keyframe { frame, value, ease };
        match self.keys.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => self.keys[i] = key,
            Err(i) => self.keys.insert(i, key),
        }
    }

    /// Value at `frame`; before the first key and after the last the nearest key holds.
    pub fn sample(&self, frame: FrameIndex) -> Option<T> {
        let first = self.keys.first()?;
        let f = frame.0;
        let idx = self.keys.partition_point(|k| k.frame.0 <= f);

        if idx == 0 {
            return Some(first.value.clone());
        }
        if idx >= self.keys.len() {
            return self.keys.last().map(|k| k.value.clone());
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let denom = b.frame.0 - a.frame.0;
        let t = ((f - a.frame.0) as f64) / (denom as f64);
        Some(T::lerp(&a.value, &b.value, a.ease.apply(t)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
