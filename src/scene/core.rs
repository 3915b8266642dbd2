use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a Vec3 from an array.
    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Convert to an array.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub const fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    #[must_use]
    pub const fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    #[must_use]
    pub const fn mul_scalar(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    /// Rotate about the Z axis by `angle` radians.
    #[must_use]
    pub fn rotated_z(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos, self.z)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BoundingBox
// ─────────────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box. `min` and `max` are inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all given points. `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let mut bounds = Self::new(first, first);
        for point in &points[1..] {
            bounds.min = bounds.min.min(*point);
            bounds.max = bounds.max.max(*point);
        }
        Some(bounds)
    }

    /// Union of two boxes.
    #[must_use]
    pub fn union(self, rhs: Self) -> Self {
        Self::new(self.min.min(rhs.min), self.max.max(rhs.max))
    }

    #[must_use]
    pub fn center(self) -> Vec3 {
        self.min.add(self.max).mul_scalar(0.5)
    }

    /// Extent along the X axis.
    #[must_use]
    pub fn width_x(self) -> f64 {
        self.max.x - self.min.x
    }

    /// True when the box has no usable extent (inverted, zero-width or
    /// non-finite corners).
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !self.min.is_finite() || !self.max.is_finite() || self.max.x <= self.min.x
    }

    /// The eight corner points.
    #[must_use]
    pub fn corners(self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Bounding box of this box after scaling, rotating about Z and
    /// translating. Rotation happens around the local origin, matching the
    /// order in which link transforms are applied.
    #[must_use]
    pub fn transformed(self, scale: f64, rotation_z: f64, translation: Vec3) -> Self {
        let corners = self.corners().map(|corner| {
            corner
                .mul_scalar(scale)
                .rotated_z(rotation_z)
                .add(translation)
        });
        // Eight corners, never empty.
        Self::from_points(&corners).unwrap_or(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundingBox, Vec3};

    #[test]
    fn from_points_spans_extremes() {
        let bounds = BoundingBox::from_points(&[
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -0.5),
        ])
        .unwrap();

        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, -0.5));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn from_points_rejects_empty_input() {
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn translation_moves_both_corners() {
        let bounds = BoundingBox::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let moved = bounds.transformed(1.0, 0.0, Vec3::new(5.0, 0.0, 0.0));

        assert!((moved.min.x - 4.0).abs() < 1e-12);
        assert!((moved.max.x - 6.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_about_z_grows_axis_aligned_extent() {
        let bounds = BoundingBox::new(Vec3::new(-2.0, -1.0, 0.0), Vec3::new(2.0, 1.0, 0.0));
        let rotated = bounds.transformed(1.0, std::f64::consts::FRAC_PI_2, Vec3::ZERO);

        // A quarter turn swaps the X and Y extents.
        assert!((rotated.width_x() - 2.0).abs() < 1e-9);
        assert!((rotated.max.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_detection() {
        let flat = BoundingBox::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0));
        assert!(flat.is_degenerate());

        let ok = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        assert!(!ok.is_degenerate());
    }
}
