use std::rc::Rc;

use fnv::FnvHashMap;
use glam::Mat4;
use web_sys as web;

use crate::core::curve::CurveTable;
use crate::core::{DrawItem, DrawList, MeshKind, TextureSource, SCENE_WGSL};

mod helpers;
mod mesh;
mod targets;

use mesh::Mesh;
use targets::{PortalTarget, RenderTargets, PORTAL_FORMAT};

/// Upper bound on draws per frame across the main and portal passes.
const MAX_DRAWS: u64 = 1024;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
    extra: [f32; 4],
}

struct VideoTexture {
    width: u32,
    height: u32,
    tex: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct CurveTexture {
    samples: u32,
    tex: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    source: Option<Rc<CurveTable>>,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    surface_pipeline: wgpu::RenderPipeline,
    portal_pipeline: wgpu::RenderPipeline,
    texture_bgl: wgpu::BindGroupLayout,
    curve_bgl: wgpu::BindGroupLayout,

    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    staging: Vec<u8>,

    linear_sampler: wgpu::Sampler,
    blank_bind_group: wgpu::BindGroup,
    video: Option<VideoTexture>,
    curve: CurveTexture,

    targets: RenderTargets,
    portals: FnvHashMap<usize, PortalTarget>,
    meshes: FnvHashMap<MeshKind, Mesh>,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_size = std::mem::size_of::<DrawUniforms>() as u64;
        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        let draw_stride = uniform_size.div_ceil(align) * align;

        let draw_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(uniform_size),
                },
                count: None,
            }],
        });
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let curve_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("curve_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });

        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniforms"),
            size: draw_stride * MAX_DRAWS,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bg"),
            layout: &draw_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(uniform_size),
                }),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&draw_bgl, &texture_bgl, &curve_bgl],
            push_constant_ranges: &[],
        });
        let surface_pipeline = helpers::make_mesh_pipeline(&device, &pipeline_layout, &shader, format);
        let portal_pipeline =
            helpers::make_mesh_pipeline(&device, &pipeline_layout, &shader, PORTAL_FORMAT);

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // 1x1 white so untextured draws can share one bind group layout.
        let (blank_tex, blank_view) = helpers::create_color_texture(
            &device,
            "blank_tex",
            1,
            1,
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &blank_tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[255u8; 4],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let blank_bind_group =
            helpers::texture_bind_group(&device, &texture_bgl, "blank_bg", &blank_view, &linear_sampler);

        let curve = create_curve_texture(&device, &curve_bgl, 2);
        let targets = RenderTargets::new(&device, width, height);

        log::info!(
            "[render] surface {}x{} {:?}, draw stride {}",
            width,
            height,
            format,
            draw_stride
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            surface_pipeline,
            portal_pipeline,
            texture_bgl,
            curve_bgl,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            staging: Vec::new(),
            linear_sampler,
            blank_bind_group,
            video: None,
            curve,
            targets,
            portals: FnvHashMap::default(),
            meshes: FnvHashMap::default(),
            width,
            height,
            clear_color: wgpu::Color {
                r: 0.03,
                g: 0.04,
                b: 0.08,
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets.recreate(&self.device, width, height);
        }
    }

    /// Reconfigure after the surface reports `Lost` or `Outdated`.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Render one frame: portal passes first, then the main pass.
    pub fn render(
        &mut self,
        list: &DrawList,
        video: Option<&web::HtmlVideoElement>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.sync_curve(list.curve.as_ref());
        if list.video_active {
            if let Some(v) = video {
                self.sync_video(v);
            }
        }
        for pass in &list.portals {
            self.ensure_portal(pass.id, pass.width, pass.height);
            for item in &pass.items {
                self.ensure_mesh(item.mesh);
            }
        }
        for item in &list.items {
            self.ensure_mesh(item.mesh);
        }
        self.stage_uniforms(list);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        self.encode(&mut encoder, list, &view);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn ensure_mesh(&mut self, kind: MeshKind) {
        let device = &self.device;
        self.meshes
            .entry(kind)
            .or_insert_with(|| Mesh::build(device, kind));
    }

    fn ensure_portal(&mut self, id: usize, width: u32, height: u32) {
        if self.portals.get(&id).is_some_and(|t| t.matches(width, height)) {
            return;
        }
        log::debug!("[render] portal {} target {}x{}", id, width, height);
        let target = PortalTarget::new(
            &self.device,
            &self.texture_bgl,
            &self.linear_sampler,
            width,
            height,
        );
        self.portals.insert(id, target);
    }

    /// Upload the curve table when the scene hands over a new one.
    fn sync_curve(&mut self, table: Option<&Rc<CurveTable>>) {
        let Some(table) = table else {
            return;
        };
        if self
            .curve
            .source
            .as_ref()
            .is_some_and(|s| Rc::ptr_eq(s, table))
        {
            return;
        }
        let samples = table.len() as u32;
        if samples < 2 {
            return;
        }
        if samples != self.curve.samples {
            self.curve = create_curve_texture(&self.device, &self.curve_bgl, samples);
        }
        let texels = table.texels();
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.curve.tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&texels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(samples * 16),
                rows_per_image: Some(2),
            },
            wgpu::Extent3d {
                width: samples,
                height: 2,
                depth_or_array_layers: 1,
            },
        );
        self.curve.source = Some(table.clone());
    }

    /// Copy the current video frame into the panel texture.
    fn sync_video(&mut self, video: &web::HtmlVideoElement) {
        // HAVE_CURRENT_DATA
        if video.ready_state() < 2 {
            return;
        }
        let (width, height) = (video.video_width(), video.video_height());
        if width == 0 || height == 0 {
            return;
        }
        let stale = self
            .video
            .as_ref()
            .map_or(true, |t| t.width != width || t.height != height);
        if stale {
            let (tex, view) = helpers::create_color_texture(
                &self.device,
                "video_tex",
                width,
                height,
                wgpu::TextureFormat::Rgba8UnormSrgb,
                wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::RENDER_ATTACHMENT,
            );
            let bind_group = helpers::texture_bind_group(
                &self.device,
                &self.texture_bgl,
                "video_bg",
                &view,
                &self.linear_sampler,
            );
            log::info!("[render] video texture {}x{}", width, height);
            self.video = Some(VideoTexture {
                width,
                height,
                tex,
                bind_group,
            });
        }
        let Some(target) = &self.video else {
            return;
        };
        self.queue.copy_external_image_to_texture(
            &wgpu::CopyExternalImageSourceInfo {
                source: wgpu::ExternalImageSource::HTMLVideoElement(video.clone()),
                origin: wgpu::Origin2d::ZERO,
                flip_y: false,
            },
            wgpu::CopyExternalImageDestInfo {
                texture: &target.tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
                color_space: wgpu::PredefinedColorSpace::Srgb,
                premultiplied_alpha: false,
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Write every draw's uniforms into consecutive dynamic-offset slots,
    /// in the same order `encode` walks them.
    fn stage_uniforms(&mut self, list: &DrawList) {
        let samples = self.curve.samples as f32;
        let stride = self.draw_stride as usize;
        let total = list.portals.iter().map(|p| p.items.len()).sum::<usize>() + list.items.len();
        let count = total.min(MAX_DRAWS as usize);
        if total > count {
            log::warn!("[render] {} draws exceed capacity {}", total, MAX_DRAWS);
        }
        self.staging.clear();
        self.staging.resize(count * stride, 0);

        let draws = list
            .portals
            .iter()
            .flat_map(|p| p.items.iter().map(move |i| (p.view_proj, i)))
            .chain(list.items.iter().map(|i| (list.view_proj, i)))
            .take(count);
        for (slot, (view_proj, item)) in draws.enumerate() {
            let u = pack(view_proj, item, samples);
            let start = slot * stride;
            self.staging[start..start + std::mem::size_of::<DrawUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&u));
        }
        if !self.staging.is_empty() {
            self.queue.write_buffer(&self.draw_buffer, 0, &self.staging);
        }
    }

    fn encode(&self, encoder: &mut wgpu::CommandEncoder, list: &DrawList, view: &wgpu::TextureView) {
        let mut slot = 0u64;
        for pass in &list.portals {
            let Some(target) = self.portals.get(&pass.id) else {
                slot += pass.items.len() as u64;
                continue;
            };
            let [r, g, b, a] = pass.clear;
            let mut rpass = begin_pass(
                encoder,
                "portal_pass",
                &target.color_view,
                &target.depth_view,
                wgpu::Color { r, g, b, a },
            );
            rpass.set_pipeline(&self.portal_pipeline);
            rpass.set_bind_group(2, &self.curve.bind_group, &[]);
            for item in &pass.items {
                self.draw_item(&mut rpass, item, &mut slot);
            }
        }

        let mut rpass = begin_pass(
            encoder,
            "scene_pass",
            view,
            &self.targets.depth_view,
            self.clear_color,
        );
        rpass.set_pipeline(&self.surface_pipeline);
        rpass.set_bind_group(2, &self.curve.bind_group, &[]);
        for item in &list.items {
            self.draw_item(&mut rpass, item, &mut slot);
        }
    }

    fn draw_item(&self, rpass: &mut wgpu::RenderPass<'_>, item: &DrawItem, slot: &mut u64) {
        let current = *slot;
        *slot += 1;
        if current >= MAX_DRAWS {
            return;
        }
        let Some(mesh) = self.meshes.get(&item.mesh) else {
            return;
        };
        let offset = (current * self.draw_stride) as wgpu::DynamicOffset;
        rpass.set_bind_group(0, &self.draw_bind_group, &[offset]);
        rpass.set_bind_group(1, self.texture_for(item.texture), &[]);
        rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
        rpass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    fn texture_for(&self, source: TextureSource) -> &wgpu::BindGroup {
        match source {
            TextureSource::None => &self.blank_bind_group,
            TextureSource::Video => self
                .video
                .as_ref()
                .map_or(&self.blank_bind_group, |v| &v.bind_group),
            TextureSource::Portal(id) => self
                .portals
                .get(&id)
                .map_or(&self.blank_bind_group, |p| &p.bind_group),
        }
    }
}

fn pack(view_proj: Mat4, item: &DrawItem, curve_samples: f32) -> DrawUniforms {
    DrawUniforms {
        view_proj: view_proj.to_cols_array_2d(),
        model: item.model.to_cols_array_2d(),
        color: item.color.to_array(),
        params: item.params.to_array(),
        extra: [curve_samples, 0.0, 0.0, 0.0],
    }
}

fn begin_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    color: &wgpu::TextureView,
    depth: &wgpu::TextureView,
    clear: wgpu::Color,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}

fn create_curve_texture(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    samples: u32,
) -> CurveTexture {
    let (tex, view) = helpers::create_color_texture(
        device,
        "curve_tex",
        samples,
        2,
        wgpu::TextureFormat::Rgba32Float,
        wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
    );
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("curve_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::TextureView(&view),
        }],
    });
    CurveTexture {
        samples,
        tex,
        bind_group,
        source: None,
    }
}
