//! Procedural tube mesh generation around the chain's visual curve.

use crate::chain::BodyChain;
use bytemuck::{Pod, Zeroable};

/// Angular step between ring vertices, in degrees.
const RING_STEP_DEGREES: usize = 4;
/// Vertices per cross-section ring.
pub const RING_VERTEX_COUNT: usize = 360 / RING_STEP_DEGREES;
/// Texture tiling scale along the body.
const UV_TILE_SCALE: f32 = 10.0;
/// Radius multiplier the taper converges toward at the tail.
const TAPER_TAIL_SCALE: f32 = 0.25;

/// Vertex with position, normal, and UV, ready for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Mesh data rebuilt from scratch every frame (no incremental update; ring
/// count and taper can change with the chain).
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<TubeVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Radius multiplier for the segment at `index` in a chain of
/// `segment_count` nodes: 1.0 up to a quarter of the chain, then a linear
/// fade toward [`TAPER_TAIL_SCALE`]. The fade spans the full node count (head
/// and tail included, even though they emit no ring), so the last ring lands
/// slightly above the tail scale.
pub fn taper_modifier(index: usize, segment_count: usize) -> f32 {
    let taper_begin = segment_count / 4;
    if index < taper_begin {
        return 1.0;
    }
    let span = (segment_count - taper_begin) as f32;
    let normalized = (index - taper_begin) as f32 / span;
    1.0 + (TAPER_TAIL_SCALE - 1.0) * normalized
}

/// Builds a closed triangulated tube around the chain's visual positions.
///
/// Every interior segment contributes one ring of [`RING_VERTEX_COUNT`]
/// vertices in the plane spanned by the segment's lateral direction and the
/// cross product of that with the direction to the next segment. Consecutive
/// rings are stitched into a quad strip; the very first and last segments
/// have no full frame and produce no geometry, leaving the tube capless at
/// both ends.
#[derive(Debug, Clone, Copy)]
pub struct TubeMeshBuilder {
    /// Untapered tube radius.
    pub base_radius: f32,
}

impl Default for TubeMeshBuilder {
    fn default() -> Self {
        Self { base_radius: 2.0 }
    }
}

impl TubeMeshBuilder {
    pub fn new(base_radius: f32) -> Self {
        Self { base_radius }
    }

    /// Build the tube into a fresh buffer. Writes each ring's radius back to
    /// the segment's `thickness`.
    pub fn build(&self, chain: &mut BodyChain) -> MeshData {
        let mut mesh = MeshData::new();
        self.build_into(chain, &mut mesh);
        mesh
    }

    /// Build the tube, reusing `mesh`'s allocations.
    pub fn build_into(&self, chain: &mut BodyChain, mesh: &mut MeshData) {
        mesh.clear();

        let count = chain.len();
        if count < 3 {
            return;
        }

        let segments = chain.segments_mut();
        for i in 1..count - 1 {
            let curr = segments[i].visual_position();
            let next = segments[i + 1].visual_position();
            let to_next = next - curr;

            // Ring frame: the segment's own lateral direction, and the axis
            // perpendicular to both it and the run of the body.
            let r_axis = segments[i].visual.right();
            let s_axis = r_axis.cross(to_next).normalize_or_zero();

            let radius = self.base_radius * taper_modifier(i, count);
            segments[i].thickness = radius;

            for degrees in (0..360).step_by(RING_STEP_DEGREES) {
                let angle = (degrees as f32).to_radians();
                let offset = (r_axis * angle.cos() + s_axis * angle.sin()) * radius;
                let position = curr + offset;
                let normal = offset.normalize_or_zero();
                let uv = [
                    i as f32 / count as f32 * UV_TILE_SCALE,
                    degrees as f32 / 360.0,
                ];
                mesh.vertices.push(TubeVertex {
                    position: position.into(),
                    normal: normal.into(),
                    uv,
                });
            }
        }

        // Stitch consecutive rings into a closed quad strip.
        let ring_count = count - 2;
        let ring_size = RING_VERTEX_COUNT as u32;
        for ring in 0..ring_count.saturating_sub(1) as u32 {
            let this_ring = ring * ring_size;
            let next_ring = (ring + 1) * ring_size;

            for j in 0..ring_size {
                let j_next = (j + 1) % ring_size;

                mesh.indices.push(this_ring + j);
                mesh.indices.push(next_ring + j);
                mesh.indices.push(this_ring + j_next);

                mesh.indices.push(next_ring + j);
                mesh.indices.push(next_ring + j_next);
                mesh.indices.push(this_ring + j_next);
            }
        }
    }
}
