use std::fmt;

use cgmath::{Point3, Vector3};
use num_traits::Float;


/// An axis aligned bounding box.
#[derive(Clone, Copy, PartialEq)]
pub struct BoundingBox<F: Float> {
    x_range: [F; 2],
    y_range: [F; 2],
    z_range: [F; 2],
}

impl<F: Float> BoundingBox<F> {
    /// Creates an invalid bounding box: all lower bounds are ∞, all upper
    /// bounds are -∞. Once you added a single point, the bounding box will be
    /// valid.
    pub fn new() -> Self {
        Self {
            x_range: [F::infinity(), F::neg_infinity()],
            y_range: [F::infinity(), F::neg_infinity()],
            z_range: [F::infinity(), F::neg_infinity()],
        }
    }

    /// Creates a bounding box around all points of the given iterator. If the
    /// iterator is empty, an invalid bounding box is returned (see
    /// [`BoundingBox::new`]).
    pub fn around<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Point3<F>>,
    {
        let mut out = Self::new();
        for pos in iter {
            out.add_point(pos);
        }
        out
    }

    /// Returns the `[lower, upper]` limits for the x coordinate.
    pub fn x(&self) -> [F; 2] {
        self.x_range
    }

    /// Returns the `[lower, upper]` limits for the y coordinate.
    pub fn y(&self) -> [F; 2] {
        self.y_range
    }

    /// Returns the `[lower, upper]` limits for the z coordinate.
    pub fn z(&self) -> [F; 2] {
        self.z_range
    }

    pub fn min(&self) -> Point3<F> {
        Point3::new(self.x_range[0], self.y_range[0], self.z_range[0])
    }

    pub fn max(&self) -> Point3<F> {
        Point3::new(self.x_range[1], self.y_range[1], self.z_range[1])
    }

    /// Returns the center of this bounding box.
    pub fn center(&self) -> Point3<F> {
        let two = F::one() + F::one();
        Point3::new(
            (self.x_range[1] + self.x_range[0]) / two,
            (self.y_range[1] + self.y_range[0]) / two,
            (self.z_range[1] + self.z_range[0]) / two,
        )
    }

    /// The vector from the lower to the upper corner.
    pub fn diagonal(&self) -> Vector3<F> {
        Vector3::new(
            self.x_range[1] - self.x_range[0],
            self.y_range[1] - self.y_range[0],
            self.z_range[1] - self.z_range[0],
        )
    }

    /// Adds a point to the bounding box, enlarging it if the point lies
    /// outside of the box.
    pub fn add_point(&mut self, p: Point3<F>) {
        fn min<F: PartialOrd>(state: &mut F, new: F) {
            if new < *state {
                *state = new;
            }
        }
        fn max<F: PartialOrd>(state: &mut F, new: F) {
            if new > *state {
                *state = new;
            }
        }


        min(&mut self.x_range[0], p.x);
        max(&mut self.x_range[1], p.x);
        min(&mut self.y_range[0], p.y);
        max(&mut self.y_range[1], p.y);
        min(&mut self.z_range[0], p.z);
        max(&mut self.z_range[1], p.z);
    }

    /// Enlarges this box so that it contains `other`.
    pub fn add_box(&mut self, other: &Self) {
        if other.is_valid() {
            self.add_point(other.min());
            self.add_point(other.max());
        }
    }

    pub fn contains(&self, p: Point3<F>) -> bool {
        self.x_range[0] <= p.x && p.x <= self.x_range[1]
            && self.y_range[0] <= p.y && p.y <= self.y_range[1]
            && self.z_range[0] <= p.z && p.z <= self.z_range[1]
    }

    /// Returns `true` if all bounds are finite.
    pub fn is_valid(&self) -> bool {
        self.x_range[0].is_finite()
            && self.x_range[1].is_finite()
            && self.y_range[0].is_finite()
            && self.y_range[1].is_finite()
            && self.z_range[0].is_finite()
            && self.z_range[1].is_finite()
    }
}

impl<F: Float> Default for BoundingBox<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float + fmt::Debug> fmt::Debug for BoundingBox<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BoundingBox")
            .field("x", &(self.x_range[0]..self.x_range[1]))
            .field("y", &(self.y_range[0]..self.y_range[1]))
            .field("z", &(self.z_range[0]..self.z_range[1]))
            .finish()
    }
}
