//! Euclidean distance to the background.
//!
//! The transform is the separable lower-envelope algorithm of Felzenszwalb
//! and Huttenlocher, run along x, then y, then z on squared distances. The
//! grid is padded by one voxel so that everything outside the domain counts
//! as background.

use glam::IVec3;

use crate::domain::VoxelDomain;
use crate::object::DigitalObject;

/// Read-only priority used by the critical-kernel scheme.
///
/// Values must be non-negative and stay fixed for the duration of a run.
pub trait DistanceMap {
    fn distance(&self, point: IVec3) -> f64;
}

impl<T: DistanceMap + ?Sized> DistanceMap for &T {
    fn distance(&self, point: IVec3) -> f64 {
        (**self).distance(point)
    }
}

// Finite stand-in for "no background seen yet"; keeps the envelope
// intersections free of inf - inf.
const FAR: f64 = 1e20;

/// Exact Euclidean distance transform of a [`DigitalObject`].
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    domain: VoxelDomain,
    values: Vec<f64>,
}

impl DistanceField {
    /// Computes the distance from every member of `object` to the nearest
    /// non-member voxel center.
    #[must_use]
    pub fn compute(object: &DigitalObject) -> Self {
        let domain = object.domain().padded(1);
        let mut values: Vec<f64> = domain
            .points()
            .map(|p| if object.contains(p) { FAR } else { 0.0 })
            .collect();

        let extent = domain.extent();
        let (nx, ny, nz) = (extent.x as usize, extent.y as usize, extent.z as usize);
        transform_lines(&mut values, nx, 1, 1, ny * nz, nx);
        transform_lines(&mut values, ny, nx, nx, nz, nx * ny);
        transform_lines(&mut values, nz, nx * ny, nx * ny, 1, 0);

        for v in &mut values {
            *v = v.sqrt();
        }
        log::debug!(
            "distance field over {} voxels, max {:.3}",
            values.len(),
            values.iter().copied().fold(0.0, f64::max)
        );
        Self { domain, values }
    }

    /// Largest value in the field.
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

impl DistanceMap for DistanceField {
    /// Distance at `point`; zero for background and for points off the grid.
    fn distance(&self, point: IVec3) -> f64 {
        self.domain
            .index_of(point)
            .map_or(0.0, |i| self.values[i])
    }
}

/// Transforms every line of length `n` whose elements are `stride` apart.
///
/// Lines start at `outer * outer_step + inner` for `inner < inner_count` and
/// `outer < outer_count`.
fn transform_lines(
    values: &mut [f64],
    n: usize,
    stride: usize,
    inner_count: usize,
    outer_count: usize,
    outer_step: usize,
) {
    let mut scratch = Envelope::new(n);
    let mut line = vec![0.0; n];
    for outer in 0..outer_count {
        for inner in 0..inner_count {
            let start = outer * outer_step + inner;
            for (i, v) in line.iter_mut().enumerate() {
                *v = values[start + i * stride];
            }
            scratch.transform(&mut line);
            for (i, v) in line.iter().enumerate() {
                values[start + i * stride] = *v;
            }
        }
    }
}

/// Buffers for the 1D squared distance transform.
struct Envelope {
    vertices: Vec<usize>,
    bounds: Vec<f64>,
    input: Vec<f64>,
}

impl Envelope {
    fn new(n: usize) -> Self {
        Self {
            vertices: vec![0; n],
            bounds: vec![0.0; n + 1],
            input: vec![0.0; n],
        }
    }

    /// Replaces `f` by `min_q (p - q)^2 + f(q)`.
    fn transform(&mut self, f: &mut [f64]) {
        let n = f.len();
        if n == 0 {
            return;
        }
        self.input.copy_from_slice(f);
        let input = &self.input;
        let parabola = |q: usize| input[q] + (q * q) as f64;
        let intersect = |q: usize, r: usize| (parabola(q) - parabola(r)) / (2.0 * (q as f64 - r as f64));

        let mut k = 0;
        self.vertices[0] = 0;
        self.bounds[0] = f64::NEG_INFINITY;
        self.bounds[1] = f64::INFINITY;
        for q in 1..n {
            let mut s = intersect(q, self.vertices[k]);
            while s <= self.bounds[k] {
                k -= 1;
                s = intersect(q, self.vertices[k]);
            }
            k += 1;
            self.vertices[k] = q;
            self.bounds[k] = s;
            self.bounds[k + 1] = f64::INFINITY;
        }

        k = 0;
        for (q, out) in f.iter_mut().enumerate() {
            while self.bounds[k + 1] < q as f64 {
                k += 1;
            }
            let v = self.vertices[k];
            let d = q as f64 - v as f64;
            *out = d * d + input[v];
        }
    }
}
