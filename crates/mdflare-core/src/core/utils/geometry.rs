use nalgebra::{Point3, Unit, Vector3};

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Normal of the best plane through a closed polygon (Newell's method).
///
/// Returns `None` for fewer than three points or a degenerate (collinear) polygon.
pub fn plane_normal(points: &[Point3<f64>]) -> Option<Unit<Vector3<f64>>> {
    if points.len() < 3 {
        return None;
    }
    let mut normal = Vector3::zeros();
    for (i, current) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    Unit::try_new(normal, 1e-9)
}

pub fn angle_between_degrees(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    let denom = a.norm() * b.norm();
    if denom < 1e-12 {
        return None;
    }
    let cosine = (a.dot(b) / denom).clamp(-1.0, 1.0);
    Some(cosine.acos().to_degrees())
}

/// Angle between two undirected axes, folded into `[0, 90]`.
pub fn axis_angle_degrees(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    angle_between_degrees(a, b).map(|angle| angle.min(180.0 - angle))
}

/// The angle `a`–`vertex`–`b` in degrees.
pub fn vertex_angle_degrees(
    a: &Point3<f64>,
    vertex: &Point3<f64>,
    b: &Point3<f64>,
) -> Option<f64> {
    angle_between_degrees(&(a - vertex), &(b - vertex))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexagon(z: f64) -> Vec<Point3<f64>> {
        (0..6)
            .map(|i| {
                let theta = (i as f64) * std::f64::consts::PI / 3.0;
                Point3::new(1.4 * theta.cos(), 1.4 * theta.sin(), z)
            })
            .collect()
    }

    #[test]
    fn centroid_of_empty_slice_is_none() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn centroid_averages_points() {
        let c = centroid(&[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, -6.0)]).unwrap();
        assert_eq!(c, Point3::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn centroid_of_regular_hexagon_is_its_center() {
        let c = centroid(&hexagon(3.0)).unwrap();
        assert!((c - Point3::new(0.0, 0.0, 3.0)).norm() < 1e-9);
    }

    #[test]
    fn plane_normal_of_xy_hexagon_is_z_axis() {
        let n = plane_normal(&hexagon(0.0)).unwrap();
        assert!((n.z.abs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn plane_normal_rejects_degenerate_input() {
        assert!(plane_normal(&[Point3::origin(), Point3::new(1.0, 0.0, 0.0)]).is_none());
        let collinear = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(plane_normal(&collinear).is_none());
    }

    #[test]
    fn axis_angle_folds_antiparallel_axes() {
        let z = Vector3::z();
        assert!(axis_angle_degrees(&z, &-z).unwrap().abs() < 1e-9);
        assert!((axis_angle_degrees(&z, &Vector3::x()).unwrap() - 90.0).abs() < 1e-9);
        let tilted = Vector3::new(0.0, 1.0, -1.0);
        assert!((axis_angle_degrees(&z, &tilted).unwrap() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn vertex_angle_of_straight_line_is_180() {
        let angle = vertex_angle_degrees(
            &Point3::new(-1.0, 0.0, 0.0),
            &Point3::origin(),
            &Point3::new(2.0, 0.0, 0.0),
        )
        .unwrap();
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn vertex_angle_with_coincident_points_is_none() {
        assert!(vertex_angle_degrees(&Point3::origin(), &Point3::origin(), &Point3::new(1.0, 0.0, 0.0)).is_none());
    }
}
