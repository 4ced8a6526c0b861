use std::collections::BTreeMap;

use crate::{error::Error, pointcloud::point::Point3D};

pub trait PointCloudDecimator {
    fn decimate(&self, points: &[Point3D]) -> Vec<Point3D>;
}

/// Keeps one point per occupied voxel: the one nearest the voxel center.
///
/// Output is ordered by voxel index, so the same input always thins to the
/// same sequence.
#[derive(Debug, Clone, Copy)]
pub struct VoxelDecimator {
    voxel_size: f64,
}

impl VoxelDecimator {
    pub fn new(voxel_size: f64) -> Result<Self, Error> {
        if !voxel_size.is_finite() || voxel_size <= 0.0 {
            return Err(Error::Config(format!(
                "voxel size must be a positive number, got {}",
                voxel_size
            )));
        }
        Ok(Self { voxel_size })
    }

    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }
}

impl PointCloudDecimator for VoxelDecimator {
    fn decimate(&self, points: &[Point3D]) -> Vec<Point3D> {
        let voxel_size = self.voxel_size;
        let mut cells: BTreeMap<(i64, i64, i64), Point3D> = BTreeMap::new();

        for point in points {
            let index = self.get_voxel_index(point, voxel_size);
            let center = self.get_voxel_center(index, voxel_size);
            cells
                .entry(index)
                .and_modify(|kept| {
                    if self.squared_distance(point, center) < self.squared_distance(kept, center) {
                        *kept = *point;
                    }
                })
                .or_insert(*point);
        }

        cells.into_values().collect()
    }
}

impl VoxelDecimator {
    fn get_voxel_index(&self, point: &Point3D, voxel_size: f64) -> (i64, i64, i64) {
        let x_idx = (point.x / voxel_size).floor() as i64;
        let y_idx = (point.y / voxel_size).floor() as i64;
        let z_idx = (point.z / voxel_size).floor() as i64;
        (x_idx, y_idx, z_idx)
    }

    fn get_voxel_center(&self, index: (i64, i64, i64), voxel_size: f64) -> (f64, f64, f64) {
        let (x_idx, y_idx, z_idx) = index;
        (
            (x_idx as f64 + 0.5) * voxel_size,
            (y_idx as f64 + 0.5) * voxel_size,
            (z_idx as f64 + 0.5) * voxel_size,
        )
    }

    fn squared_distance(&self, a: &Point3D, b: (f64, f64, f64)) -> f64 {
        (a.x - b.0).powi(2) + (a.y - b.1).powi(2) + (a.z - b.2).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_point_nearest_voxel_center() {
        let decimator = VoxelDecimator::new(1.0).unwrap();
        let points = vec![
            Point3D::new(0.1, 0.1, 0.1),
            Point3D::new(0.45, 0.55, 0.5),
            Point3D::new(0.9, 0.9, 0.9),
        ];
        let kept = decimator.decimate(&points);
        assert_eq!(kept, vec![Point3D::new(0.45, 0.55, 0.5)]);
    }

    #[test]
    fn one_point_per_occupied_voxel_in_index_order() {
        let decimator = VoxelDecimator::new(1.0).unwrap();
        let points = vec![
            Point3D::new(2.5, 0.5, 0.5),
            Point3D::new(-0.5, 0.5, 0.5),
            Point3D::new(2.4, 0.6, 0.5),
            Point3D::new(0.5, 0.5, 0.5),
        ];
        let kept = decimator.decimate(&points);
        let xs: Vec<f64> = kept.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![-0.5, 0.5, 2.5]);
    }

    #[test]
    fn empty_input_stays_empty() {
        let decimator = VoxelDecimator::new(0.5).unwrap();
        assert!(decimator.decimate(&[]).is_empty());
    }

    #[test]
    fn rejects_non_positive_voxel_size() {
        assert!(VoxelDecimator::new(0.0).is_err());
        assert!(VoxelDecimator::new(-1.0).is_err());
        assert!(VoxelDecimator::new(f64::NAN).is_err());
    }
}
