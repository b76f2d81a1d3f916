use nalgebra::{Matrix3, Vector3};

/// Constant rotation between simulation axes (x forward, y up, z starboard) and
/// aircraft body axes (x forward, y starboard, z down).
pub struct AxisTransform;

impl AxisTransform {
    /// Rows map simulation components onto aircraft components: (x, y, z) -> (x, z, -y)
    pub fn matrix() -> Matrix3<f64> {
        Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, //
            0.0, -1.0, 0.0,
        )
    }

    /// Express a moment or rotation vector in aircraft body axes.
    pub fn to_aircraft_moment(v: &Vector3<f64>) -> Vector3<f64> {
        Self::matrix() * v
    }

    /// Inverse of [`AxisTransform::to_aircraft_moment`].
    pub fn from_aircraft_moment(v: &Vector3<f64>) -> Vector3<f64> {
        Self::matrix().transpose() * v
    }

    /// Invert the axial (x) component so drag reads positive against the stream.
    pub fn flip_axial(v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(-v.x, v.y, v.z)
    }
}
