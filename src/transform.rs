/// A 2D affine transform stored as a row-major 2x3 matrix.
///
/// ```text
/// | a  b  tx |
/// | c  d  ty |
/// ```
///
/// Used by canvas implementations to map local drawing coordinates onto
/// the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Matrix data: [a, b, tx, c, d, ty]
    pub data: [f32; 6],
}

impl Transform {
    pub const IDENTITY: Self = Self {
        data: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            data: [1.0, 0.0, x, 0.0, 1.0, y],
        }
    }

    /// Rotation about the origin. Positive angles turn clockwise on a y-down surface.
    pub fn rotate(angle_radians: f32) -> Self {
        let (sin, cos) = angle_radians.sin_cos();
        Self {
            data: [cos, -sin, 0.0, sin, cos, 0.0],
        }
    }

    pub fn rotate_degrees(angle_degrees: f32) -> Self {
        Self::rotate(angle_degrees.to_radians())
    }

    /// Compose: applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Transform {
        let [a, b, tx, c, d, ty] = self.data;
        let [oa, ob, otx, oc, od, oty] = other.data;
        Transform {
            data: [
                a * oa + b * oc,
                a * ob + b * od,
                a * otx + b * oty + tx,
                c * oa + d * oc,
                c * ob + d * od,
                c * otx + d * oty + ty,
            ],
        }
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, tx, c, d, ty] = self.data;
        (a * x + b * y + tx, c * x + d * y + ty)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Current transform plus the saved ones, as used by `save`/`restore`.
#[derive(Clone, Debug, Default)]
pub struct TransformStack {
    current: Transform,
    saved: Vec<Transform>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Transform {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Returns `false` when there was nothing to restore.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(transform) => {
                self.current = transform;
                true
            }
            None => false,
        }
    }

    /// Apply `local` before everything already on the stack.
    pub fn concat(&mut self, local: Transform) {
        self.current = self.current.then(&local);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_identity() {
        let t = Transform::identity();
        assert!(t.is_identity());
        assert_eq!(t.transform_point(3.0, 4.0), (3.0, 4.0));
    }

    #[test]
    fn test_translate() {
        let t = Transform::translate(10.0, 20.0);
        let (x, y) = t.transform_point(5.0, 5.0);
        assert!(approx_eq(x, 15.0));
        assert!(approx_eq(y, 25.0));
    }

    #[test]
    fn test_rotate_is_clockwise_on_screen() {
        let t = Transform::rotate_degrees(90.0);
        let (x, y) = t.transform_point(1.0, 0.0);
        assert!(approx_eq(x, 0.0));
        assert!(approx_eq(y, 1.0));
    }

    #[test]
    fn test_compose_order() {
        // Rotate in local space, then move into place.
        let composed = Transform::translate(10.0, 0.0).then(&Transform::rotate_degrees(90.0));
        let (x, y) = composed.transform_point(1.0, 0.0);
        assert!(approx_eq(x, 10.0));
        assert!(approx_eq(y, 1.0));
    }

    #[test]
    fn test_stack_save_restore() {
        let mut stack = TransformStack::new();
        stack.save();
        stack.concat(Transform::translate(4.0, 0.0));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current().transform_point(0.0, 0.0), (4.0, 0.0));
        assert!(stack.restore());
        assert!(stack.current().is_identity());
        assert!(!stack.restore());
    }
}
