use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Points in the order they were encountered in the input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSequence {
    points: Vec<Point3D>,
}

impl PointSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Point3D) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point3D> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point3D> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3D> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Point3D] {
        &self.points
    }
}

impl From<Vec<Point3D>> for PointSequence {
    fn from(points: Vec<Point3D>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point3D> for PointSequence {
    fn from_iter<I: IntoIterator<Item = Point3D>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PointSequence {
    type Item = Point3D;
    type IntoIter = std::vec::IntoIter<Point3D>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a PointSequence {
    type Item = &'a Point3D;
    type IntoIter = std::slice::Iter<'a, Point3D>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// How downstream consumers should read a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordered trajectory; first and last points are start and end.
    Path,
    /// Spatial sample; order carries no meaning.
    #[default]
    Cloud,
}

#[derive(Debug, Clone)]
pub struct PointCloud {
    pub points: PointSequence,
    pub metadata: Metadata,
}

impl PointCloud {
    pub fn new(points: PointSequence, role: Role) -> Self {
        let bounding_volume = BoundingVolume::from_points(points.iter());

        let metadata = Metadata {
            role,
            point_count: points.len(),
            bounding_volume,
        };

        PointCloud { points, metadata }
    }

    pub fn path(points: PointSequence) -> Self {
        Self::new(points, Role::Path)
    }

    pub fn cloud(points: PointSequence) -> Self {
        Self::new(points, Role::Cloud)
    }

    pub fn role(&self) -> Role {
        self.metadata.role
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Start and end of the sequence, or `None` when it holds no points.
    pub fn endpoints(&self) -> Option<(Point3D, Point3D)> {
        match (self.points.first(), self.points.last()) {
            (Some(start), Some(end)) => Some((*start, *end)),
            _ => None,
        }
    }
}

// Axis-aligned extent of the points. Empty sequences have none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingVolume {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingVolume {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3D>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;

        let mut bounding_volume = BoundingVolume {
            min: first.to_array(),
            max: first.to_array(),
        };

        for point in points {
            bounding_volume.max[0] = bounding_volume.max[0].max(point.x);
            bounding_volume.max[1] = bounding_volume.max[1].max(point.y);
            bounding_volume.max[2] = bounding_volume.max[2].max(point.z);
            bounding_volume.min[0] = bounding_volume.min[0].min(point.x);
            bounding_volume.min[1] = bounding_volume.min[1].min(point.y);
            bounding_volume.min[2] = bounding_volume.min[2].min(point.z);
        }

        Some(bounding_volume)
    }
}

#[derive(Debug, Clone)]
pub struct Metadata {
    pub role: Role,
    pub point_count: usize,
    pub bounding_volume: Option<BoundingVolume>,
}
