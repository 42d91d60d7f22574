use std::f32::consts::TAU;

use glam::Vec3;

/// Position of element `index` on a segment of `count` evenly spaced elements.
///
/// The index loops over the sequence, the last element lands on `end`.
pub fn line_position(start: Vec3, end: Vec3, index: u32, count: u32) -> Vec3 {
    let count = count.max(1);
    let t = (index % count) as f32 / (count - 1).max(1) as f32;
    start.lerp(end, t)
}

/// Position of element `index` on a circle of `count` evenly spaced elements.
///
/// Element zero sits in the `up` direction and the sequence turns towards
/// `normal x up`.
pub fn circle_position(
    center: Vec3,
    radius: f32,
    normal: Vec3,
    up: Vec3,
    index: u32,
    count: u32,
) -> Vec3 {
    let count = count.max(1);
    let angle = (index % count) as f32 / count as f32 * TAU;
    let left = normal.cross(up).normalize_or_zero();
    let (sin, cos) = angle.sin_cos();
    center + (up * cos + left * sin) * radius
}

/// Position of element `index` in a lattice of `count_x * count_y * count_z` elements.
///
/// X varies fastest, then Y, then Z.
#[allow(clippy::too_many_arguments)]
pub fn lattice_position(
    origin: Vec3,
    axis_x: Vec3,
    axis_y: Vec3,
    axis_z: Vec3,
    index: u32,
    count_x: u32,
    count_y: u32,
    count_z: u32,
) -> Vec3 {
    let (cx, cy, cz) = (
        count_x.max(1) as u64,
        count_y.max(1) as u64,
        count_z.max(1) as u64,
    );
    let index = index as u64 % cx.saturating_mul(cy).saturating_mul(cz);

    let x = index % cx;
    let y = (index / cx) % cy;
    let z = index / (cx * cy);

    fn ratio(cell: u64, count: u64) -> f32 {
        cell as f32 / (count - 1).max(1) as f32
    }

    origin + axis_x * ratio(x, cx) + axis_y * ratio(y, cy) + axis_z * ratio(z, cz)
}

#[cfg(test)]
mod test {
    use glam::Vec3;

    use super::*;

    #[test]
    fn test_line() {
        let start = Vec3::ZERO;
        let end = Vec3::new(3.0, 0.0, 0.0);
        assert!(line_position(start, end, 0, 4).abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!(line_position(start, end, 1, 4).abs_diff_eq(Vec3::X, 1e-6));
        assert!(line_position(start, end, 3, 4).abs_diff_eq(end, 1e-6));
        // wraps back to the start
        assert!(line_position(start, end, 4, 4).abs_diff_eq(start, 1e-6));
    }

    #[test]
    fn test_line_degenerate_count() {
        let end = Vec3::ONE;
        assert_eq!(line_position(Vec3::ZERO, end, 7, 0), Vec3::ZERO);
        assert_eq!(line_position(Vec3::ZERO, end, 7, 1), Vec3::ZERO);
    }

    #[test]
    fn test_circle() {
        let p0 = circle_position(Vec3::ZERO, 2.0, Vec3::Z, Vec3::Y, 0, 4);
        assert!(p0.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));

        let p1 = circle_position(Vec3::ZERO, 2.0, Vec3::Z, Vec3::Y, 1, 4);
        assert!(p1.abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), 1e-5));

        let wrapped = circle_position(Vec3::ONE, 1.0, Vec3::Z, Vec3::Y, 5, 4);
        let p = circle_position(Vec3::ONE, 1.0, Vec3::Z, Vec3::Y, 1, 4);
        assert!(wrapped.abs_diff_eq(p, 1e-5));
    }

    #[test]
    fn test_lattice() {
        let p = lattice_position(Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z, 3, 2, 2, 2);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));

        let last = lattice_position(Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z, 7, 2, 2, 2);
        assert!(last.abs_diff_eq(Vec3::ONE, 1e-6));

        let wrapped = lattice_position(Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z, 8, 2, 2, 2);
        assert_eq!(wrapped, Vec3::ZERO);
    }
}
