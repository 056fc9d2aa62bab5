pub trait FloatExt: Copy {
    /// Equality within [`crate::EPSILON`].
    fn approximately_eq(self, other: Self) -> bool;

    /// Equality within an explicit absolute tolerance.
    fn within(self, other: Self, tolerance: Self) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        self.within(other, crate::EPSILON as f32)
    }

    fn within(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() < tolerance
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        self.within(other, crate::EPSILON)
    }

    fn within(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() < tolerance
    }
}
