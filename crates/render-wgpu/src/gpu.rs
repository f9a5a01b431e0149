use crate::batch::{DrawCall, FrameBatch, QuadVertex, VERTICES_PER_QUAD};
use crate::shaders;
use crate::texture::{self, GpuTexture};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use skyview_assets::TextureSet;
use skyview_camera::ViewTransform;
use skyview_common::Projection;
use skyview_render::{DepthWrite, Quad, QuadSink, TextureSlot};
use std::collections::HashMap;
use wgpu::util::DeviceExt;

/// Light pointing from (1, 1, 1) toward the origin, in world space. It does
/// not follow the view.
const LIGHT_DIR: [f32; 4] = [1.0, 1.0, 1.0, 0.0];
const LIGHT_AMBIENT: f32 = 0.2;
const LIGHT_DIFFUSE: f32 = 1.0;
const MATERIAL_REFLECTANCE: f32 = 0.8;

/// Enough room for the skybox and ground with headroom.
const MAX_QUADS: u32 = 64;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
    light: [f32; 4],
}

impl Uniforms {
    fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_dir: LIGHT_DIR,
            light: [LIGHT_AMBIENT, LIGHT_DIFFUSE, MATERIAL_REFLECTANCE, 0.0],
        }
    }
}

/// Errors from encoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("frame has {requested} quads, capacity is {capacity}")]
    BatchOverflow { requested: u32, capacity: u32 },
}

/// Counters for one submitted frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub quads: u32,
    pub vertices: u32,
    pub textured: u32,
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    depth_write_pipeline: wgpu::RenderPipeline,
    no_depth_write_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<TextureSlot, GpuTexture>,
    white: GpuTexture,
    vertex_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
    projection: Projection,
    aspect: f32,
    batch: FrameBatch,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    depth_write: DepthWrite,
) -> wgpu::RenderPipeline {
    let label = match depth_write {
        DepthWrite::Enabled => "quad_pipeline",
        DepthWrite::Disabled => "quad_pipeline_no_depth_write",
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &QuadVertex::ATTRIBUTES,
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        // Quads are wound inconsistently across faces, so nothing is culled.
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: depth_write == DepthWrite::Enabled,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        projection: Projection,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::new(Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = texture::bind_group_layout(device);
        let sampler = texture::repeat_sampler(device);
        let white = GpuTexture::white(device, queue, &texture_layout, &sampler);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::QUAD_SHADER.into()),
        });

        let depth_write_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            DepthWrite::Enabled,
        );
        let no_depth_write_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            DepthWrite::Disabled,
        );

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad_vertex_buffer"),
            size: (MAX_QUADS * VERTICES_PER_QUAD) as u64 * std::mem::size_of::<QuadVertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            depth_write_pipeline,
            no_depth_write_pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            sampler,
            textures: HashMap::new(),
            white,
            vertex_buffer,
            depth_texture,
            projection,
            aspect: width as f32 / height.max(1) as f32,
            batch: FrameBatch::default(),
        }
    }

    /// Upload every loaded texture. Empty slots keep drawing flat colors.
    pub fn upload_textures(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, set: &TextureSet) {
        let slots = set
            .skybox
            .iter()
            .enumerate()
            .map(|(i, image)| (TextureSlot::Skybox(i), image))
            .chain(std::iter::once((TextureSlot::Ground, &set.ground)));

        for (slot, image) in slots {
            let Some(image) = image else { continue };
            let label = format!("{slot:?}_texture");
            let gpu = GpuTexture::upload(
                device,
                queue,
                &self.texture_layout,
                &self.sampler,
                image,
                &label,
            );
            self.textures.insert(slot, gpu);
        }
        tracing::info!("uploaded {} textures", self.textures.len());
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Start recording a frame into `target`.
    pub fn frame<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        target: &'a wgpu::TextureView,
    ) -> FrameRecorder<'a> {
        FrameRecorder {
            renderer: self,
            device,
            queue,
            target,
        }
    }

    fn pipeline(&self, depth: DepthWrite) -> &wgpu::RenderPipeline {
        match depth {
            DepthWrite::Enabled => &self.depth_write_pipeline,
            DepthWrite::Disabled => &self.no_depth_write_pipeline,
        }
    }

    fn bind_group_for(&self, draw: &DrawCall) -> &wgpu::BindGroup {
        draw.texture
            .and_then(|slot| self.textures.get(&slot))
            .map(|t| &t.bind_group)
            .unwrap_or(&self.white.bind_group)
    }

    fn encode(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
    ) -> Result<FrameStats, RenderError> {
        let quads = self.batch.draws.len() as u32;
        if quads > MAX_QUADS {
            return Err(RenderError::BatchOverflow {
                requested: quads,
                capacity: MAX_QUADS,
            });
        }

        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::new(self.batch.view_proj)),
        );
        if !self.batch.vertices.is_empty() {
            queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&self.batch.vertices),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            let mut current: Option<DepthWrite> = None;
            for draw in &self.batch.draws {
                if current != Some(draw.depth) {
                    pass.set_pipeline(self.pipeline(draw.depth));
                    current = Some(draw.depth);
                }
                pass.set_bind_group(1, self.bind_group_for(draw), &[]);
                pass.draw(
                    draw.first_vertex..draw.first_vertex + VERTICES_PER_QUAD,
                    0..1,
                );
            }
        }

        queue.submit(std::iter::once(encoder.finish()));

        Ok(FrameStats {
            quads,
            vertices: self.batch.vertices.len() as u32,
            textured: self
                .batch
                .draws
                .iter()
                .filter(|d| d.texture.is_some_and(|s| self.textures.contains_key(&s)))
                .count() as u32,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// One frame in flight; quads submitted here are drawn on `end_frame`.
pub struct FrameRecorder<'a> {
    renderer: &'a mut WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    target: &'a wgpu::TextureView,
}

impl QuadSink for FrameRecorder<'_> {
    type Output = Result<FrameStats, RenderError>;

    fn begin_frame(&mut self, view: &ViewTransform) {
        let r = &mut *self.renderer;
        let view_proj = r.projection.matrix(r.aspect) * view.matrix();
        r.batch.reset(view_proj);
    }

    fn submit(&mut self, quad: &Quad, depth: DepthWrite) {
        self.renderer.batch.push(quad, depth);
    }

    fn end_frame(&mut self) -> Self::Output {
        let stats = self.renderer.encode(self.device, self.queue, self.target)?;
        tracing::trace!(?stats, "frame submitted");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn uniforms_layout() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 96);
        let u = Uniforms::new(Mat4::IDENTITY);
        assert_eq!(u.light, [0.2, 1.0, 0.8, 0.0]);
    }

    #[test]
    fn light_points_down_onto_ground() {
        let dir = Vec3::new(LIGHT_DIR[0], LIGHT_DIR[1], LIGHT_DIR[2]).normalize();
        let shade = (LIGHT_AMBIENT + dir.dot(Vec3::Y) * LIGHT_DIFFUSE) * MATERIAL_REFLECTANCE;
        assert!(shade > LIGHT_AMBIENT * MATERIAL_REFLECTANCE);
        assert!(shade <= 1.0);
    }

    #[test]
    fn overflow_error_message() {
        let err = RenderError::BatchOverflow {
            requested: 70,
            capacity: MAX_QUADS,
        };
        assert_eq!(err.to_string(), "frame has 70 quads, capacity is 64");
    }
}
