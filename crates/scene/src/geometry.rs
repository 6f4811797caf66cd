//! Procedural geometry generators.
//!
//! Layouts follow the usual parametric conventions: the torus lies in the XY
//! plane facing +Z, the sphere's poles sit on the Y axis.

use rand::Rng;
use std::f32::consts::{PI, TAU};

/// How a geometry's vertices are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Points,
}

/// CPU-side vertex data, uploaded once per mount.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub label: &'static str,
    pub topology: Topology,
    pub positions: Vec<[f32; 3]>,
    /// Empty for point clouds.
    pub normals: Vec<[f32; 3]>,
    /// Empty for point clouds.
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Largest distance of any vertex from the local origin.
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt())
            .fold(0.0, f32::max)
    }
}

/// Ring with major radius `radius` and tube radius `tube`.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Geometry {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut positions = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);
    let mut normals = Vec::with_capacity(positions.capacity());

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        let (sin_v, cos_v) = v.sin_cos();
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let (sin_u, cos_u) = u.sin_cos();
            let ring = radius + tube * cos_v;
            let p = [ring * cos_u, ring * sin_u, tube * sin_v];
            let center = [radius * cos_u, radius * sin_u, 0.0];
            let n = [p[0] - center[0], p[1] - center[1], p[2] - center[2]];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt().max(f32::EPSILON);
            positions.push(p);
            normals.push([n[0] / len, n[1] / len, n[2] / len]);
        }
    }

    let row = tubular + 1;
    let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Geometry {
        label: "ring",
        topology: Topology::Triangles,
        positions,
        normals,
        indices,
    }
}

/// UV sphere centered on the origin.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut positions = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    let mut normals = Vec::with_capacity(positions.capacity());

    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        let (sin_phi, cos_phi) = (v * PI).sin_cos();
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let (sin_theta, cos_theta) = (u * TAU).sin_cos();
            let n = [-cos_theta * sin_phi, cos_phi, sin_theta * sin_phi];
            positions.push([n[0] * radius, n[1] * radius, n[2] * radius]);
            normals.push(n);
        }
    }

    let row = w + 1;
    let mut indices = Vec::new();
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // Pole rows collapse to a single triangle per quad.
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Geometry {
        label: "core",
        topology: Topology::Triangles,
        positions,
        normals,
        indices,
    }
}

/// `count` points scattered uniformly in a cube of edge `extent` centered on
/// the origin.
pub fn star_field<R: Rng + ?Sized>(rng: &mut R, count: u32, extent: f32) -> Geometry {
    let positions = (0..count)
        .map(|_| {
            [
                (rng.r#gen::<f32>() - 0.5) * extent,
                (rng.r#gen::<f32>() - 0.5) * extent,
                (rng.r#gen::<f32>() - 0.5) * extent,
            ]
        })
        .collect();

    Geometry {
        label: "stars",
        topology: Topology::Points,
        positions,
        normals: Vec::new(),
        indices: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn torus_counts_and_extent() {
        let g = torus(1.5, 0.1, 16, 100);
        assert_eq!(g.vertex_count(), 17 * 101);
        assert_eq!(g.index_count(), 16 * 100 * 6);
        assert_eq!(g.normals.len(), g.vertex_count());
        assert!((g.bounding_radius() - 1.6).abs() < 1e-4);
        assert!(g.indices.iter().all(|&i| (i as usize) < g.vertex_count()));
        // Lies in the XY plane: depth bounded by the tube radius.
        assert!(g.positions.iter().all(|p| p[2].abs() <= 0.1 + 1e-6));
    }

    #[test]
    fn sphere_counts_and_normals() {
        let g = uv_sphere(0.3, 32, 32);
        assert_eq!(g.vertex_count(), 33 * 33);
        assert_eq!(g.index_count(), 32 * (2 * 32 - 2) * 3);
        assert!(g.indices.iter().all(|&i| (i as usize) < g.vertex_count()));
        for (p, n) in g.positions.iter().zip(&g.normals) {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
            assert!((p[1] - n[1] * 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn star_field_stays_inside_cube() {
        let mut rng = StdRng::seed_from_u64(1);
        let g = star_field(&mut rng, 5000, 15.0);
        assert_eq!(g.vertex_count(), 5000);
        assert_eq!(g.topology, Topology::Points);
        assert!(g.indices.is_empty());
        assert!(
            g.positions
                .iter()
                .flatten()
                .all(|c| (-7.5..7.5).contains(c))
        );
    }

    #[test]
    fn star_field_is_reproducible_per_seed() {
        let a = star_field(&mut StdRng::seed_from_u64(3), 64, 15.0);
        let b = star_field(&mut StdRng::seed_from_u64(3), 64, 15.0);
        let c = star_field(&mut StdRng::seed_from_u64(4), 64, 15.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
