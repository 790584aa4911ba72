use wgpu::util::DeviceExt;

use crate::core::MeshKind;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    pos: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[inline]
fn v(pos: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex { pos, normal, uv }
}

/// GPU buffers for one [`MeshKind`].
pub(crate) struct Mesh {
    pub(crate) vertices: wgpu::Buffer,
    pub(crate) indices: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    pub(crate) fn build(device: &wgpu::Device, kind: MeshKind) -> Self {
        let (verts, idx) = match kind {
            MeshKind::Quad => quad(),
            MeshKind::Disc { segments } => disc(segments.max(3)),
            MeshKind::Cube => cube(),
            MeshKind::Tube { segments, radial } => tube_grid(segments.max(1), radial.max(3)),
        };
        log::debug!(
            "[render] built mesh {:?}: {} verts, {} indices",
            kind,
            verts.len(),
            idx.len()
        );
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertices"),
            contents: bytemuck::cast_slice(&verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&idx),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices,
            indices,
            index_count: idx.len() as u32,
        }
    }
}

fn quad() -> (Vec<Vertex>, Vec<u32>) {
    let n = [0.0, 0.0, 1.0];
    let verts = vec![
        v([-0.5, -0.5, 0.0], n, [0.0, 1.0]),
        v([0.5, -0.5, 0.0], n, [1.0, 1.0]),
        v([0.5, 0.5, 0.0], n, [1.0, 0.0]),
        v([-0.5, 0.5, 0.0], n, [0.0, 0.0]),
    ];
    (verts, vec![0, 1, 2, 0, 2, 3])
}

fn disc(segments: u32) -> (Vec<Vertex>, Vec<u32>) {
    let n = [0.0, 0.0, 1.0];
    let mut verts = Vec::with_capacity(segments as usize + 1);
    verts.push(v([0.0, 0.0, 0.0], n, [0.5, 0.5]));
    for i in 0..segments {
        let a = i as f32 / segments as f32 * std::f32::consts::TAU;
        let (s, c) = a.sin_cos();
        verts.push(v([c, s, 0.0], n, [0.5 + 0.5 * c, 0.5 - 0.5 * s]));
    }
    let mut idx = Vec::with_capacity(segments as usize * 3);
    for i in 0..segments {
        idx.extend_from_slice(&[0, 1 + i, 1 + (i + 1) % segments]);
    }
    (verts, idx)
}

fn cube() -> (Vec<Vertex>, Vec<u32>) {
    // (normal, u axis, v axis) per face
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let mut verts = Vec::with_capacity(24);
    let mut idx = Vec::with_capacity(36);
    for (n, a, b) in FACES {
        let base = verts.len() as u32;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let p = [
                n[0] * 0.5 + a[0] * su + b[0] * sv,
                n[1] * 0.5 + a[1] * su + b[1] * sv,
                n[2] * 0.5 + a[2] * su + b[2] * sv,
            ];
            verts.push(v(p, n, [su + 0.5, 0.5 - sv]));
        }
        idx.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (verts, idx)
}

/// Parametric grid; the vertex stage places it along the curve table.
/// `uv.x` runs along the tube, `uv.y` around it.
fn tube_grid(segments: u32, radial: u32) -> (Vec<Vertex>, Vec<u32>) {
    let cols = radial + 1;
    let mut verts = Vec::with_capacity(((segments + 1) * cols) as usize);
    for i in 0..=segments {
        for j in 0..=radial {
            verts.push(v(
                [0.0; 3],
                [0.0, 0.0, 1.0],
                [i as f32 / segments as f32, j as f32 / radial as f32],
            ));
        }
    }
    let mut idx = Vec::with_capacity((segments * radial * 6) as usize);
    for i in 0..segments {
        for j in 0..radial {
            let a = i * cols + j;
            let b = a + cols;
            idx.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    (verts, idx)
}
