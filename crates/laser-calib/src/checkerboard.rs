//! Planar checkerboard projection.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use laser_calib_core::PoseEstimate3D;

use crate::traits::CheckerboardProjector;

/// Reference projector: an R x C grid of corner points on the target plane.
///
/// The grid is centered on the target, rotated about z by the pose yaw and
/// translated by the pose position. The board hangs flat at the target
/// height, so every point inherits the pose z. Row-major point order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanarCheckerboard {
    /// Inner-corner rows.
    pub rows: u32,
    /// Inner-corner columns.
    pub cols: u32,
    /// Corner-to-corner spacing, meters.
    pub square_size: f64,
}

impl Default for PlanarCheckerboard {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 9,
            square_size: 0.03,
        }
    }
}

impl PlanarCheckerboard {
    pub fn new(rows: u32, cols: u32, square_size: f64) -> Self {
        Self {
            rows,
            cols,
            square_size,
        }
    }
}

impl CheckerboardProjector for PlanarCheckerboard {
    fn project(&self, pose: &PoseEstimate3D) -> Vec<Point3<f64>> {
        let (sin_yaw, cos_yaw) = pose.yaw().sin_cos();
        let x0 = -(self.cols.saturating_sub(1) as f64) * self.square_size / 2.0;
        let y0 = -(self.rows.saturating_sub(1) as f64) * self.square_size / 2.0;

        let mut points = Vec::with_capacity((self.rows * self.cols) as usize);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let bx = x0 + col as f64 * self.square_size;
                let by = y0 + row as f64 * self.square_size;
                points.push(Point3::new(
                    pose.position.x + cos_yaw * bx - sin_yaw * by,
                    pose.position.y + sin_yaw * bx + cos_yaw * by,
                    pose.position.z,
                ));
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::f64::consts::FRAC_PI_2;

    fn pose(x: f64, y: f64, z: f64, yaw: f64) -> PoseEstimate3D {
        PoseEstimate3D::new(Vector3::new(x, y, z), Vector3::new(0.0, 0.0, yaw))
    }

    #[test]
    fn projects_rows_times_cols_points() {
        let board = PlanarCheckerboard::default();
        let points = board.project(&pose(0.0, 0.0, 0.2, 0.0));
        assert_eq!(points.len(), 54);
    }

    #[test]
    fn projection_is_idempotent() {
        let board = PlanarCheckerboard::new(4, 5, 0.025);
        let p = pose(1.1, -0.4, 0.2, 0.7);
        assert_eq!(board.project(&p), board.project(&p));
    }

    #[test]
    fn grid_is_centered_on_the_pose() {
        let board = PlanarCheckerboard::new(3, 3, 0.1);
        let points = board.project(&pose(2.0, 1.0, 0.2, 0.0));

        // The middle corner of an odd grid is the target center.
        let center = points[4];
        assert_relative_eq!(center.x, 2.0);
        assert_relative_eq!(center.y, 1.0);
        assert_relative_eq!(center.z, 0.2);
    }

    #[test]
    fn yaw_rotates_the_grid_about_z() {
        let board = PlanarCheckerboard::new(1, 3, 0.1);
        let points = board.project(&pose(0.0, 0.0, 0.2, FRAC_PI_2));

        // The board x axis maps onto the base y axis.
        assert_relative_eq!(points[0].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(points[0].y, -0.1, epsilon = 1e-12);
        assert_relative_eq!(points[2].y, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn all_points_share_the_pose_height() {
        let board = PlanarCheckerboard::default();
        for point in board.project(&pose(0.3, -0.2, 0.2, 1.3)) {
            assert_eq!(point.z, 0.2);
        }
    }
}
