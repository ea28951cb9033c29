use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{HemascopeError, Result};
use crate::geometry::ImageRect;

/// A labelled detection rectangle in image-pixel space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub rect: ImageRect,
    pub label: String,
}

impl Annotation {
    pub fn new(rect: ImageRect, label: impl Into<String>) -> Self {
        Self {
            rect,
            label: label.into(),
        }
    }

    /// Convert from the `(x0, y0, x1, y1)` corner convention used by
    /// detection output files.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32, label: impl Into<String>) -> Self {
        Self::new(ImageRect::from_corners(x0, y0, x1, y1), label)
    }

    /// Check that the rectangle is drawable. `index` is only used for the error.
    pub fn validate(&self, index: usize) -> Result<()> {
        match self.rect.defect() {
            Some(reason) => Err(HemascopeError::MalformedAnnotation { index, reason }),
            None => Ok(()),
        }
    }
}

/// Immutable, shared annotation sequence.
///
/// Cloning is cheap. Two sets are "the same input" for redraw purposes only if
/// they share the same allocation; see [`AnnotationSet::same_as`].
#[derive(Clone, Debug)]
pub struct AnnotationSet {
    items: Arc<[Annotation]>,
}

impl AnnotationSet {
    pub fn new(items: Vec<Annotation>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.items
    }

    /// Reference identity, not structural equality.
    pub fn same_as(&self, other: &AnnotationSet) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl Default for AnnotationSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Annotation>> for AnnotationSet {
    fn from(items: Vec<Annotation>) -> Self {
        Self::new(items)
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
