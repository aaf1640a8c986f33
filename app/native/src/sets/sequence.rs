//! Frame sequences and cache keys.

use std::sync::Arc;

use serde::Serialize;

use crate::imaging::{Frame, Size};

/// How a set is stored in the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SetKind {
    /// Numbered still images `name1` ..= `name10`.
    Static,
    /// A single `name.gif` container.
    Animated,
}

impl std::fmt::Display for SetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Animated => f.write_str("gif"),
        }
    }
}

/// Cache key of a loaded set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetKey {
    pub name: String,
    pub kind: SetKind,
}

impl SetKey {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SetKind) -> Self {
        Self { name: name.into(), kind }
    }
}

/// An immutable, cheaply cloneable list of frames.
///
/// Clones share storage, so [`FrameSequence::ptr_eq`] tells whether two
/// sequences came from the same cache entry.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Arc<[Frame]>,
    canvas: Option<Size>,
}

impl FrameSequence {
    #[must_use]
    pub fn new(frames: Vec<Frame>) -> Self { Self { frames: frames.into(), canvas: None } }

    /// A sequence whose frames were already fitted into `canvas`.
    #[must_use]
    pub fn normalized(frames: Vec<Frame>, canvas: Size) -> Self {
        Self { frames: frames.into(), canvas: Some(canvas) }
    }

    /// Canvas the frames were fitted into, if they went through the resizer.
    #[must_use]
    pub const fn canvas(&self) -> Option<Size> { self.canvas }

    #[must_use]
    pub fn empty() -> Self { Self::default() }

    #[must_use]
    pub fn len(&self) -> usize { self.frames.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.frames.is_empty() }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Frame> { self.frames.get(index) }

    #[must_use]
    pub fn first(&self) -> Option<&Frame> { self.frames.first() }

    #[must_use]
    pub fn frames(&self) -> &[Frame] { &self.frames }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> { self.frames.iter() }

    /// Returns `true` if both sequences share the same storage.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool { Arc::ptr_eq(&a.frames, &b.frames) }
}

impl From<Vec<Frame>> for FrameSequence {
    fn from(frames: Vec<Frame>) -> Self { Self::new(frames) }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}
