//! Mesh asset for the product viewer.
//!
//! The asset is JSON: `{"positions": [x, y, z, ...], "indices": [...]}` with
//! optional `normals`. Loading centers the mesh on its bounding box and
//! scales it to unit radius so the pivot turns it about its middle.

use glam::Vec3;
use serde::Deserialize;

use crate::error::{FxError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelData {
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
    #[serde(default)]
    pub normals: Option<Vec<f32>>,
}

/// Interleaved position + normal triples ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedModel {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl ModelData {
    pub fn parse(raw: &str) -> Result<Self> {
        let data: ModelData = serde_json::from_str(raw)?;
        data.validate()?;
        Ok(data)
    }

    fn validate(&self) -> Result<()> {
        if self.positions.is_empty() || self.positions.len() % 3 != 0 {
            return Err(FxError::Js("positions must be non-empty xyz triples".into()));
        }
        let count = self.positions.len() / 3;
        if self.indices.len() % 3 != 0 || self.indices.iter().any(|&i| i as usize >= count) {
            return Err(FxError::Js("indices must be in-range triangles".into()));
        }
        if let Some(n) = &self.normals {
            if n.len() != self.positions.len() {
                return Err(FxError::Js("normals must match positions".into()));
            }
        }
        Ok(())
    }

    fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.chunks_exact(3).map(Vec3::from_slice)
    }

    /// Bounding-box center and the radius of the centered mesh.
    pub fn bounds(&self) -> (Vec3, f32) {
        let (min, max) = self.points().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(p), hi.max(p)),
        );
        let center = (min + max) * 0.5;
        let radius = self
            .points()
            .map(|p| (p - center).length())
            .fold(0.0f32, f32::max);
        (center, radius)
    }

    fn smooth_normals(&self) -> Vec<Vec3> {
        let points: Vec<Vec3> = self.points().collect();
        let mut normals = vec![Vec3::ZERO; points.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let n = (points[b] - points[a]).cross(points[c] - points[a]);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        normals.into_iter().map(|n| n.normalize_or_zero()).collect()
    }

    pub fn prepare(&self) -> PreparedModel {
        let (center, radius) = self.bounds();
        let scale = if radius > 0.0 { 1.0 / radius } else { 1.0 };
        let normals: Vec<Vec3> = match &self.normals {
            Some(n) => n.chunks_exact(3).map(Vec3::from_slice).collect(),
            None => self.smooth_normals(),
        };
        let mut vertices = Vec::with_capacity(self.positions.len() * 2);
        for (p, n) in self.points().zip(normals) {
            vertices.extend_from_slice(&((p - center) * scale).to_array());
            vertices.extend_from_slice(&n.to_array());
        }
        PreparedModel {
            vertices,
            indices: self.indices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRI: &str = r#"{"positions": [2,0,0, 4,0,0, 2,2,0], "indices": [0,1,2]}"#;

    #[test]
    fn centers_and_scales() {
        let m = ModelData::parse(TRI).unwrap();
        let (center, radius) = m.bounds();
        assert_eq!(center, Vec3::new(3.0, 1.0, 0.0));
        assert!((radius - 2f32.sqrt()).abs() < 1e-6);
        let prepared = m.prepare();
        assert_eq!(prepared.vertices.len(), 18);
        let max = prepared
            .vertices
            .chunks(6)
            .map(|v| Vec3::from_slice(&v[..3]).length())
            .fold(0.0f32, f32::max);
        assert!((max - 1.0).abs() < 1e-5);
        // Counter-clockwise in the xy plane faces +z.
        assert!((prepared.vertices[5] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_out_of_range_indices() {
        assert!(ModelData::parse(r#"{"positions": [0,0,0], "indices": [0,1,2]}"#).is_err());
        assert!(ModelData::parse(r#"{"positions": [], "indices": []}"#).is_err());
    }
}
