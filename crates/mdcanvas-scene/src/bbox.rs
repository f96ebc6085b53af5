//! Bounding boxes over placed elements.

use crate::element::SceneElement;

/// Axis-aligned bounding box of one or more placed elements.
///
/// Invariant: `max_x >= min_x` and `max_y >= min_y`, so width and height are
/// never negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Componentwise union of two optional boxes.
    ///
    /// `None` acts as the identity, so the extent of several diagram regions
    /// can be folded together.
    #[must_use]
    pub fn merge(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (None, other) | (other, None) => other,
            (Some(a), Some(b)) => Some(Self {
                min_x: a.min_x.min(b.min_x),
                min_y: a.min_y.min(b.min_y),
                max_x: a.max_x.max(b.max_x),
                max_y: a.max_y.max(b.max_y),
            }),
        }
    }

    /// Bounding box of a set of elements, skipping deleted ones.
    ///
    /// Returns `None` when no drawable element remains.
    #[must_use]
    pub fn of_elements(elements: &[SceneElement]) -> Option<Self> {
        elements
            .iter()
            .map(SceneElement::common)
            .filter(|c| !c.is_deleted)
            .map(|c| Self {
                min_x: c.x,
                min_y: c.y,
                max_x: c.x + c.width,
                max_y: c.y + c.height,
            })
            .fold(None, |acc, next| Self::merge(acc, Some(next)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::element::RectSpec;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> SceneElement {
        SceneElement::rectangle(RectSpec {
            x,
            y,
            width: w,
            height: h,
            ..RectSpec::default()
        })
    }

    #[test]
    fn test_of_elements_empty() {
        assert_eq!(BoundingBox::of_elements(&[]), None);
    }

    #[test]
    fn test_of_elements_union() {
        let elements = vec![rect(0.0, 0.0, 10.0, 10.0), rect(50.0, -5.0, 20.0, 10.0)];
        let bbox = BoundingBox::of_elements(&elements).unwrap();
        assert_eq!(bbox.min_x, 0.0);
        assert_eq!(bbox.min_y, -5.0);
        assert_eq!(bbox.max_x, 70.0);
        assert_eq!(bbox.max_y, 10.0);
        assert_eq!(bbox.width(), 70.0);
        assert_eq!(bbox.height(), 15.0);
    }

    #[test]
    fn test_of_elements_skips_deleted() {
        let mut gone = rect(1000.0, 1000.0, 10.0, 10.0);
        gone.common_mut().is_deleted = true;
        let elements = vec![rect(0.0, 0.0, 10.0, 10.0), gone];
        let bbox = BoundingBox::of_elements(&elements).unwrap();
        assert_eq!(bbox.max_x, 10.0);
    }

    #[test]
    fn test_merge_identity() {
        let a = BoundingBox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 5.0,
            max_y: 5.0,
        };
        assert_eq!(BoundingBox::merge(Some(a), None), Some(a));
        assert_eq!(BoundingBox::merge(None, Some(a)), Some(a));
        assert_eq!(BoundingBox::merge(None, None), None);
    }
}
