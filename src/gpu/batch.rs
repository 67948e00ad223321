//! Instance data and pipelines for drawing a display list.
//!
//! Lines and discs are drawn as instanced quads: six vertices per instance,
//! expanded in the vertex shader. Coordinates stay in logical pixels until the
//! shader maps them to clip space with the view uniform.

use bytemuck::{Pod, Zeroable};

use crate::recording::DisplayList;

/// View parameters shared by both pipelines.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct ViewUniforms {
    pub logical_size: [f32; 2],
    pub _pad: [f32; 2],
}

/// One link segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct LineInstance {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: [f32; 4],
    pub width: f32,
    pub _pad: [f32; 3],
}

/// One filled point.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct DiscInstance {
    pub color: [f32; 4],
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
}

const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 4] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4, 3 => Float32];

const DISC_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x2, 2 => Float32];

pub(crate) fn line_instances(list: &DisplayList) -> Vec<LineInstance> {
    list.lines()
        .map(|(from, to, color, width)| LineInstance {
            from: from.to_array(),
            to: to.to_array(),
            color: color.to_linear(),
            width,
            _pad: [0.0; 3],
        })
        .collect()
}

pub(crate) fn disc_instances(list: &DisplayList) -> Vec<DiscInstance> {
    list.discs()
        .map(|(center, radius, color)| DiscInstance {
            color: color.to_linear(),
            center: center.to_array(),
            radius,
            _pad: 0.0,
        })
        .collect()
}

/// A vertex buffer that grows to fit what is written into it.
pub(crate) struct InstanceBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
}

impl InstanceBuffer {
    const MIN_CAPACITY: usize = 64;

    pub fn new<T: Pod>(device: &wgpu::Device, label: &'static str) -> Self {
        let capacity = Self::MIN_CAPACITY * std::mem::size_of::<T>();
        Self {
            label,
            buffer: Self::allocate(device, label, capacity),
            capacity,
            len: 0,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, size: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: size as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn write<T: Pod>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        if bytes.len() > self.capacity {
            self.capacity = bytes.len().next_power_of_two();
            self.buffer = Self::allocate(device, self.label, self.capacity);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = data.len() as u32;
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn len(&self) -> u32 {
        self.len
    }
}

pub(crate) fn create_pipelines(
    device: &wgpu::Device,
    uniform_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
) -> (wgpu::RenderPipeline, wgpu::RenderPipeline) {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Particle Field Shader"),
        source: wgpu::ShaderSource::Wgsl(SHADER.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Particle Field Pipeline Layout"),
        bind_group_layouts: &[uniform_layout],
        push_constant_ranges: &[],
    });

    let line = create_pipeline(
        device,
        &pipeline_layout,
        &shader,
        surface_format,
        "Link Pipeline",
        ("vs_line", "fs_line"),
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &LINE_ATTRIBUTES,
        },
    );
    let disc = create_pipeline(
        device,
        &pipeline_layout,
        &shader,
        surface_format,
        "Point Pipeline",
        ("vs_disc", "fs_disc"),
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<DiscInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &DISC_ATTRIBUTES,
        },
    );
    (line, disc)
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    label: &str,
    (vertex_entry, fragment_entry): (&str, &str),
    instance_layout: wgpu::VertexBufferLayout<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vertex_entry),
            buffers: &[instance_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
    })
}

pub(crate) const SHADER: &str = r#"
struct View {
    logical_size: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> view: View;

fn to_clip(p: vec2<f32>) -> vec4<f32> {
    let ndc = p / view.logical_size * 2.0 - vec2<f32>(1.0, 1.0);
    return vec4<f32>(ndc.x, -ndc.y, 0.0, 1.0);
}

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) from_pos: vec2<f32>,
    @location(1) to_pos: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) width: f32,
) -> LineOutput {
    var dir = to_pos - from_pos;
    if length(dir) < 0.0001 {
        dir = vec2<f32>(1.0, 0.0);
    }
    let normal = normalize(vec2<f32>(-dir.y, dir.x)) * (width * 0.5);

    var pos: vec2<f32>;
    switch vertex_index {
        case 0u: { pos = from_pos - normal; }
        case 1u: { pos = from_pos + normal; }
        case 2u: { pos = to_pos - normal; }
        case 3u: { pos = from_pos + normal; }
        case 4u: { pos = to_pos - normal; }
        default: { pos = to_pos + normal; }
    }

    var out: LineOutput;
    out.clip_position = to_clip(pos);
    out.color = color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}

struct DiscOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) offset_px: vec2<f32>,
    @location(2) radius: f32,
};

@vertex
fn vs_disc(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) color: vec4<f32>,
    @location(1) center: vec2<f32>,
    @location(2) radius: f32,
) -> DiscOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    // One extra pixel around the disc for the anti-aliased edge.
    let offset = corners[vertex_index] * (radius + 1.0);

    var out: DiscOutput;
    out.clip_position = to_clip(center + offset);
    out.color = color;
    out.offset_px = offset;
    out.radius = radius;
    return out;
}

@fragment
fn fs_disc(in: DiscOutput) -> @location(0) vec4<f32> {
    let coverage = clamp(in.radius + 0.5 - length(in.offset_px), 0.0, 1.0);
    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * coverage);
}
"#;
