//! Renderer-agnostic description of a point sequence for 3D viewers.
//!
//! A path is drawn as a polyline with distinct start and end markers; a cloud
//! as scattered points. Markers are absent for an empty sequence.

use std::io::{self, Write};

use serde::Serialize;

use pcd_core::pointcloud::point::{BoundingVolume, PointCloud, Role};

use crate::Exporter;

#[derive(Debug, Serialize)]
pub struct Scene {
    pub title: String,
    pub role: Role,
    pub point_count: usize,
    pub polyline: Vec<[f64; 3]>,
    pub start: Option<[f64; 3]>,
    pub end: Option<[f64; 3]>,
    pub bounds: Option<BoundingVolume>,
}

impl Scene {
    pub fn from_point_cloud(point_cloud: &PointCloud, title: &str) -> Self {
        let endpoints = match point_cloud.role() {
            Role::Path => point_cloud.endpoints(),
            Role::Cloud => None,
        };

        Scene {
            title: title.to_string(),
            role: point_cloud.role(),
            point_count: point_cloud.len(),
            polyline: point_cloud.points.iter().map(|p| p.to_array()).collect(),
            start: endpoints.map(|(start, _)| start.to_array()),
            end: endpoints.map(|(_, end)| end.to_array()),
            bounds: point_cloud.metadata.bounding_volume,
        }
    }
}

pub struct SceneExporter {
    pub title: String,
}

impl Default for SceneExporter {
    fn default() -> Self {
        Self {
            title: "3D SLAM Path".to_string(),
        }
    }
}

impl Exporter for SceneExporter {
    fn write(&self, point_cloud: &PointCloud, writer: &mut dyn Write) -> io::Result<()> {
        let scene = Scene::from_point_cloud(point_cloud, &self.title);
        serde_json::to_writer_pretty(&mut *writer, &scene)?;
        writeln!(writer)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
