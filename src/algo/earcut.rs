//! Triangulation of simple polygons by ear clipping (via `earcutr`).
//!
//! The output triangles refer to the input points by their position in the
//! input slice and keep the orientation of the polygon.

use cgmath::{Point2, Point3};
use tracing::warn;

use super::newell_normal;


/// Triangulates a simple polygon in 3D space.
///
/// The polygon is projected onto the coordinate plane most parallel to it
/// (determined by its normal) and then triangulated in 2D. Polygons with
/// less than three points yield no triangles.
pub fn ear_cut(polygon: &[Point3<f64>]) -> Vec<[usize; 3]> {
    if polygon.len() < 3 {
        return Vec::new();
    }

    let n = newell_normal(polygon);
    let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
    let projected = polygon.iter()
        .map(|p| {
            if az >= ax && az >= ay {
                Point2::new(p.x, p.y)
            } else if ay >= ax {
                Point2::new(p.z, p.x)
            } else {
                Point2::new(p.y, p.z)
            }
        })
        .collect::<Vec<_>>();

    ear_cut_2d(&projected)
}

/// Triangulates a simple polygon in the plane. Works for both orientations;
/// the triangles have the orientation of the polygon.
///
/// Collinear and duplicated points might not be used by any triangle. If
/// the polygon cannot be triangulated at all, the result is empty.
pub fn ear_cut_2d(polygon: &[Point2<f64>]) -> Vec<[usize; 3]> {
    let n = polygon.len();
    if n < 3 {
        return Vec::new();
    }
    if n == 3 {
        return vec![[0, 1, 2]];
    }

    let flat = polygon.iter().flat_map(|p| [p.x, p.y]).collect::<Vec<_>>();
    let indices = match earcutr::earcut(&flat, &[], 2) {
        Ok(indices) => indices,
        Err(e) => {
            warn!("failed to triangulate polygon with {} vertices: {:?}", n, e);
            return Vec::new();
        }
    };

    // Twice the signed area, positive for counter clockwise polygons.
    let area = (0..n)
        .map(|i| {
            let (p, q) = (polygon[i], polygon[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum::<f64>();

    indices.chunks_exact(3)
        .map(|t| {
            if cross(polygon[t[0]], polygon[t[1]], polygon[t[2]]) * area < 0.0 {
                [t[0], t[2], t[1]]
            } else {
                [t[0], t[1], t[2]]
            }
        })
        .collect()
}

fn cross(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}


#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn area_2d(polygon: &[Point2<f64>], tris: &[[usize; 3]]) -> f64 {
        tris.iter().map(|t| cross(polygon[t[0]], polygon[t[1]], polygon[t[2]]) / 2.0).sum()
    }

    #[test]
    fn too_small() {
        assert!(ear_cut(&[]).is_empty());
        assert!(ear_cut(&[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]).is_empty());
    }

    #[test]
    fn square() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let tris = ear_cut_2d(&square);
        assert_eq!(tris.len(), 2);
        assert_relative_eq!(area_2d(&square, &tris), 1.0);
    }

    #[test]
    fn concave_l_shape() {
        //
        //   5 --- 4
        //   |     |
        //   |     3 --- 2
        //   |           |
        //   0 --------- 1
        //
        let l = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let tris = ear_cut_2d(&l);
        assert_eq!(tris.len(), 4);
        assert_relative_eq!(area_2d(&l, &tris), 3.0);

        // Every triangle keeps the counter clockwise orientation.
        for t in &tris {
            assert!(cross(l[t[0]], l[t[1]], l[t[2]]) > 0.0);
        }
    }

    #[test]
    fn clockwise_input() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        let tris = ear_cut_2d(&square);
        assert_eq!(tris.len(), 2);
        assert_relative_eq!(area_2d(&square, &tris), -1.0);
    }

    #[test]
    fn collinear_vertices() {
        let polygon = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let tris = ear_cut_2d(&polygon);
        assert!(!tris.is_empty());
        assert_relative_eq!(area_2d(&polygon, &tris), 2.0);
        for t in &tris {
            assert!(cross(polygon[t[0]], polygon[t[1]], polygon[t[2]]) >= 0.0);
        }
    }

    #[test]
    fn coincident_points() {
        let polygon = [Point2::new(1.0, 1.0); 4];
        assert!(ear_cut_2d(&polygon).is_empty());
    }

    #[test]
    fn clockwise_concave_polygon_keeps_orientation() {
        // The L shape from above, in clockwise order.
        let l = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 2.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 0.0),
        ];
        let tris = ear_cut_2d(&l);
        assert_eq!(tris.len(), 4);
        assert_relative_eq!(area_2d(&l, &tris), -3.0);
        for t in &tris {
            assert!(cross(l[t[0]], l[t[1]], l[t[2]]) < 0.0);
        }
    }

    #[test]
    fn vertical_polygon_in_3d() {
        // Lies in the x-z plane.
        let polygon = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.5, 0.0, 0.4),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let tris = ear_cut(&polygon);
        assert_eq!(tris.len(), 3);

        let mut used = tris.iter().flatten().copied().collect::<Vec<_>>();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used, [0, 1, 2, 3, 4]);
    }
}
