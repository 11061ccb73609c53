use bytemuck::Zeroable;
use wgpu::{
    BindGroup, Buffer, BufferUsages, Device, Queue, RenderPipeline, TextureFormat, TextureView,
};

use crate::simulation::{EntanglementTable, Grid, SuperpositionField};

/// Per-cell view uploaded to the fragment shader each frame (16 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CellView {
    /// 1 if the cell is alive, 0 otherwise.
    pub alive: u32,
    /// Accumulated superposition in [0.0, 1.0], used for color blending.
    pub superposition: f32,
    /// 1 if the cell has an entangled partner (draws a border).
    pub entangled: u32,
    pub _padding: u32,
}

/// Render parameters (16 bytes, uniform-aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct RenderParams {
    grid_size: u32,
    /// Entanglement border width as a fraction of one cell.
    border_width: f32,
    _padding: [f32; 2],
}

/// Draws the grid as a fullscreen triangle whose fragment shader looks up
/// the cell under each pixel in a storage buffer. The simulation owns the
/// state; this type only ever reads a finished generation.
pub struct GridRenderer {
    pipeline: RenderPipeline,
    cells_buffer: Buffer,
    bind_group: BindGroup,
    grid_size: u32,
    staging: Vec<CellView>,
}

impl GridRenderer {
    pub fn new(device: &Device, queue: &Queue, format: TextureFormat, grid_size: u32, cell_size: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grid-render-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/render.wgsl").into()),
        });

        let cell_count = (grid_size * grid_size) as usize;
        let cells_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cell-view-buffer"),
            size: (cell_count * std::mem::size_of::<CellView>()) as u64,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("render-params-buffer"),
            size: std::mem::size_of::<RenderParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // The table is fixed for the run, so the params never change either:
        // a one-pixel border at the configured cell size.
        let params = RenderParams {
            grid_size,
            border_width: 1.0 / cell_size as f32,
            _padding: [0.0; 2],
        };
        queue.write_buffer(&params_buffer, 0, bytemuck::bytes_of(&params));

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("grid-render-bind-group-layout"),
            entries: &[
                // Cell views (read-only storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Render parameters (uniform)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("grid-render-bind-group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: cells_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("grid-render-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grid-render-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            cells_buffer,
            bind_group,
            grid_size,
            staging: vec![CellView::zeroed(); cell_count],
        }
    }

    /// Upload a finished generation into the cell storage buffer.
    pub fn upload(
        &mut self,
        queue: &Queue,
        grid: &Grid,
        superposition: &SuperpositionField,
        entanglement: &EntanglementTable,
    ) {
        let size = self.grid_size as usize;
        debug_assert_eq!(grid.size(), size, "grid size changed mid-run");

        for y in 0..size {
            for x in 0..size {
                self.staging[y * size + x] = CellView {
                    alive: grid.is_alive(x, y) as u32,
                    superposition: superposition.get(x, y),
                    entangled: entanglement.is_entangled((x, y)) as u32,
                    _padding: 0,
                };
            }
        }
        queue.write_buffer(&self.cells_buffer, 0, bytemuck::cast_slice(&self.staging));
    }

    /// Draw the uploaded state to the given surface view.
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("grid-render-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1); // Fullscreen triangle
    }
}
