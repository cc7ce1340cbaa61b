//! Axis-aligned bounding boxes.

use nalgebra::Point2;
use serde::ser::{Serialize, Serializer};

use crate::Axis;

/// An axis-aligned bounding box in 2D.
///
/// The corner convention is `left <= right` and `top <= bottom` (screen
/// coordinates: `top` is the minimum Y). The serialized form is the array
/// `[left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BBox {
    /// Creates a degenerate box containing a single point.
    pub fn from_point(point: &Point2<f64>) -> Self {
        Self {
            left: point.x,
            top: point.y,
            right: point.x,
            bottom: point.y,
        }
    }

    /// Computes the bounding box of a set of points.
    ///
    /// Returns `None` for an empty set.
    pub fn of_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2<f64>>,
    {
        let mut iter = points.into_iter();
        let mut bbox = Self::from_point(iter.next()?);
        for point in iter {
            bbox.include_point(point);
        }
        Some(bbox)
    }

    /// Grows the box to contain `point`.
    pub fn include_point(&mut self, point: &Point2<f64>) {
        self.left = self.left.min(point.x);
        self.top = self.top.min(point.y);
        self.right = self.right.max(point.x);
        self.bottom = self.bottom.max(point.y);
    }

    /// Returns the smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Width of the box (extent along X).
    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the box (extent along Y).
    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Area of the box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the extent of the box along `axis`.
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width(),
            Axis::Y => self.height(),
        }
    }

    /// Returns the center coordinate of the box along `axis`.
    #[inline]
    pub fn center(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => (self.left + self.right) / 2.0,
            Axis::Y => (self.top + self.bottom) / 2.0,
        }
    }

    /// Area of the intersection of two boxes, or `0.0` if they are disjoint.
    pub fn intersection_area(&self, other: &BBox) -> f64 {
        let w = self.right.min(other.right) - self.left.max(other.left);
        let h = self.bottom.min(other.bottom) - self.top.max(other.top);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

impl Serialize for BBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.left, self.top, self.right, self.bottom].serialize(serializer)
    }
}
