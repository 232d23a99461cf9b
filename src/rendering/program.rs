//! Shader stage compilation and the linked program.
//!
//! `ShaderStage` parses and validates one WGSL stage up front so compile
//! diagnostics surface as readable text instead of a device panic.
//! `ShaderProgram` links a vertex/fragment pair into one render pipeline,
//! resolves every named uniform slot by reflection, and exposes typed
//! setters that upload into GPU uniform storage — skipping slots the linked
//! shaders never declared.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Mat4, Vec4};

use crate::geometry::Drawable;

use super::error::ShaderError;
use super::reflect::{self, BlockLayout};

/// Bind group and binding indices for the two uniform blocks.
const UNIFORM_GROUP: u32 = 0;
const FRAME_BINDING: u32 = 0;
const DRAW_BINDING: u32 = 1;

/// Vertex attribute locations the draw path understands.
const POSITION_LOCATION: u32 = 0;
const NORMAL_LOCATION: u32 = 1;
const COLOR_LOCATION: u32 = 2;

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(1);

/// Which pipeline stage a shader source feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    const fn label(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        }
    }
}

/// One compiled (parsed + validated) shader stage.
#[derive(Debug)]
pub struct ShaderStage {
    kind: StageKind,
    module: naga::Module,
}

impl ShaderStage {
    /// Parse and validate WGSL source for one stage.
    ///
    /// Fails with the compiler's diagnostic text rendered against the
    /// source, annotated with the offending span.
    pub fn compile(kind: StageKind, source: &str) -> Result<Self, ShaderError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
            stage: kind.label(),
            log: e.emit_to_string(source),
        })?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage: kind.label(),
            log: e.emit_to_string(source),
        })?;

        Ok(Self { kind, module })
    }
}

/// Every uniform the program knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniform {
    // Per-frame block
    ViewProj,
    Color,
    LightPosition,
    LightColor,
    CameraPosition,
    Time,
    TimeFrequency,
    NoiseFrequency,
    NoiseAmplitude,
    NoisePersistence,
    NoiseOctaves,
    Roughness,
    Metallic,
    // Per-draw block
    Model,
    ModelInvTranspose,
    InstancePosition,
}

impl Uniform {
    /// WGSL struct member name this slot resolves against.
    pub const fn field_name(self) -> &'static str {
        match self {
            Uniform::ViewProj => "view_proj",
            Uniform::Color => "color",
            Uniform::LightPosition => "light_pos",
            Uniform::LightColor => "light_color",
            Uniform::CameraPosition => "camera_pos",
            Uniform::Time => "time",
            Uniform::TimeFrequency => "time_frequency",
            Uniform::NoiseFrequency => "noise_frequency",
            Uniform::NoiseAmplitude => "noise_amplitude",
            Uniform::NoisePersistence => "noise_persistence",
            Uniform::NoiseOctaves => "noise_octaves",
            Uniform::Roughness => "roughness",
            Uniform::Metallic => "metallic",
            Uniform::Model => "model",
            Uniform::ModelInvTranspose => "model_inv_tr",
            Uniform::InstancePosition => "instance_pos",
        }
    }

    /// Whether the slot lives in the per-draw block.
    pub const fn is_per_draw(self) -> bool {
        matches!(
            self,
            Uniform::Model | Uniform::ModelInvTranspose | Uniform::InstancePosition
        )
    }
}

/// Resolved uniform slots for one linked program.
#[derive(Debug, Default, Clone)]
pub struct SlotTable {
    frame: Option<BlockLayout>,
    draw: Option<BlockLayout>,
}

impl SlotTable {
    /// Build the table from the two stages' reflected blocks.
    ///
    /// Cross-stage layout conflicts are link errors.
    pub fn link(vertex: &naga::Module, fragment: &naga::Module) -> Result<Self, ShaderError> {
        let frame = reflect::merge_blocks(
            reflect::uniform_block(
                vertex,
                UNIFORM_GROUP,
                FRAME_BINDING,
                wgpu::ShaderStages::VERTEX,
            ),
            reflect::uniform_block(
                fragment,
                UNIFORM_GROUP,
                FRAME_BINDING,
                wgpu::ShaderStages::FRAGMENT,
            ),
        )
        .map_err(|log| ShaderError::Link { log })?;

        let draw = reflect::merge_blocks(
            reflect::uniform_block(
                vertex,
                UNIFORM_GROUP,
                DRAW_BINDING,
                wgpu::ShaderStages::VERTEX,
            ),
            reflect::uniform_block(
                fragment,
                UNIFORM_GROUP,
                DRAW_BINDING,
                wgpu::ShaderStages::FRAGMENT,
            ),
        )
        .map_err(|log| ShaderError::Link { log })?;

        Ok(Self { frame, draw })
    }

    /// Byte offset of a slot inside its block, or `None` when the linked
    /// shaders never declared the member (the GL `-1` sentinel).
    pub fn resolve(&self, uniform: Uniform) -> Option<u64> {
        let block = if uniform.is_per_draw() {
            self.draw.as_ref()
        } else {
            self.frame.as_ref()
        };
        block.and_then(|b| b.offset(uniform.field_name()))
    }

    pub fn frame_block(&self) -> Option<&BlockLayout> {
        self.frame.as_ref()
    }

    pub fn draw_block(&self) -> Option<&BlockLayout> {
        self.draw.as_ref()
    }
}

/// Tracks which program is bound to the current render pass so consecutive
/// draws through the same program skip redundant pipeline switches.
///
/// Owned by the renderer and passed into draw calls; reset when a new pass
/// begins.
#[derive(Debug, Default)]
pub struct PipelineBinding {
    active: Option<u64>,
}

impl PipelineBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the bound program (a fresh pass has no pipeline set).
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Record `id` as active. Returns `true` when the caller must issue the
    /// pipeline switch, `false` when `id` is already bound.
    pub fn activate(&mut self, id: u64) -> bool {
        if self.active == Some(id) {
            false
        } else {
            self.active = Some(id);
            true
        }
    }
}

/// A linked GPU program: render pipeline, uniform storage, and the slot
/// table resolved at link time.
pub struct ShaderProgram {
    id: u64,
    pipeline: wgpu::RenderPipeline,
    topology: wgpu::PrimitiveTopology,
    slots: SlotTable,
    attributes: Vec<VertexAttr>,
    frame_buffer: wgpu::Buffer,
    draw_buffer: wgpu::Buffer,
    draw_stride: u64,
    draw_capacity: u32,
    bind_group: wgpu::BindGroup,
    has_draw_block: bool,
}

/// Vertex attributes in pipeline buffer-slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexAttr {
    Position,
    Normal,
    Color,
}

impl ShaderProgram {
    /// Link a vertex/fragment pair into one render pipeline.
    ///
    /// `draw_capacity` sizes the per-draw uniform buffer: one 256-aligned
    /// record per draw the program can issue within a frame.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        vertex: ShaderStage,
        fragment: ShaderStage,
        draw_capacity: u32,
    ) -> Result<Self, ShaderError> {
        debug_assert_eq!(vertex.kind, StageKind::Vertex);
        debug_assert_eq!(fragment.kind, StageKind::Fragment);

        let slots = SlotTable::link(&vertex.module, &fragment.module)?;
        let locations = reflect::vertex_locations(&vertex.module);

        let mut attributes = Vec::new();
        for (location, attr) in [
            (POSITION_LOCATION, VertexAttr::Position),
            (NORMAL_LOCATION, VertexAttr::Normal),
            (COLOR_LOCATION, VertexAttr::Color),
        ] {
            if locations.contains_key(&location) {
                attributes.push(attr);
            }
        }

        // Everything below goes through the device; collect validation
        // failures into one link diagnostic.
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Field Vertex Shader"),
            source: wgpu::ShaderSource::Naga(std::borrow::Cow::Owned(vertex.module)),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Field Fragment Shader"),
            source: wgpu::ShaderSource::Naga(std::borrow::Cow::Owned(fragment.module)),
        });

        let frame_size = slots.frame_block().map_or(16, |b| b.size.max(16));
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: frame_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let align = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let draw_size = slots.draw_block().map_or(16, |b| b.size.max(16));
        let draw_stride = draw_size.div_ceil(align) * align;
        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniform Buffer"),
            size: draw_stride * u64::from(draw_capacity.max(1)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut layout_entries = Vec::new();
        let mut group_entries = Vec::new();
        if let Some(block) = slots.frame_block() {
            layout_entries.push(wgpu::BindGroupLayoutEntry {
                binding: FRAME_BINDING,
                visibility: block.visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            });
            group_entries.push(wgpu::BindGroupEntry {
                binding: FRAME_BINDING,
                resource: frame_buffer.as_entire_binding(),
            });
        }
        let has_draw_block = slots.draw_block().is_some();
        if let Some(block) = slots.draw_block() {
            layout_entries.push(wgpu::BindGroupLayoutEntry {
                binding: DRAW_BINDING,
                visibility: block.visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: None,
                },
                count: None,
            });
            group_entries.push(wgpu::BindGroupEntry {
                binding: DRAW_BINDING,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: NonZeroU64::new(draw_size),
                }),
            });
        }

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Program Bind Group Layout"),
                entries: &layout_entries,
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Program Bind Group"),
            layout: &bind_group_layout,
            entries: &group_entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Program Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // One tightly packed vec4 buffer per attribute the shader declares.
        let buffer_layouts: Vec<wgpu::VertexBufferLayout> = attributes
            .iter()
            .map(|attr| wgpu::VertexBufferLayout {
                array_stride: 16,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: std::slice::from_ref(match attr {
                    VertexAttr::Position => &POSITION_ATTR,
                    VertexAttr::Normal => &NORMAL_ATTR,
                    VertexAttr::Color => &COLOR_ATTR,
                }),
            })
            .collect();

        let topology = wgpu::PrimitiveTopology::TriangleList;
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Field Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                buffers: &buffer_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                log: error.to_string(),
            });
        }

        Ok(Self {
            id: NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed),
            pipeline,
            topology,
            slots,
            attributes,
            frame_buffer,
            draw_buffer,
            draw_stride,
            draw_capacity: draw_capacity.max(1),
            bind_group,
            has_draw_block,
        })
    }

    /// Resolved slot table (offsets by uniform name).
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// Whether a slot resolved at link time.
    pub fn has(&self, uniform: Uniform) -> bool {
        self.slots.resolve(uniform).is_some()
    }

    /// Generic per-frame upload: write `value` at the slot's offset, or do
    /// nothing when the slot is unresolved.
    fn write_frame<T: bytemuck::Pod>(&self, queue: &wgpu::Queue, uniform: Uniform, value: T) {
        if let Some(offset) = self.slots.resolve(uniform) {
            queue.write_buffer(&self.frame_buffer, offset, bytemuck::bytes_of(&value));
        }
    }

    /// Generic per-draw upload at `draw_index`'s record.
    fn write_draw<T: bytemuck::Pod>(
        &self,
        queue: &wgpu::Queue,
        draw_index: u32,
        uniform: Uniform,
        value: T,
    ) {
        debug_assert!(draw_index < self.draw_capacity);
        if let Some(offset) = self.slots.resolve(uniform) {
            let base = u64::from(draw_index) * self.draw_stride;
            queue.write_buffer(&self.draw_buffer, base + offset, bytemuck::bytes_of(&value));
        }
    }

    pub fn set_view_proj(&self, queue: &wgpu::Queue, view_proj: Mat4) {
        self.write_frame(queue, Uniform::ViewProj, view_proj.to_cols_array_2d());
    }

    pub fn set_geometry_color(&self, queue: &wgpu::Queue, color: Vec4) {
        self.write_frame(queue, Uniform::Color, color.to_array());
    }

    pub fn set_time(&self, queue: &wgpu::Queue, time: i32) {
        self.write_frame(queue, Uniform::Time, time);
    }

    pub fn set_time_frequency(&self, queue: &wgpu::Queue, frequency: f32) {
        self.write_frame(queue, Uniform::TimeFrequency, frequency);
    }

    pub fn set_noise_frequency(&self, queue: &wgpu::Queue, frequency: f32) {
        self.write_frame(queue, Uniform::NoiseFrequency, frequency);
    }

    pub fn set_noise_amplitude(&self, queue: &wgpu::Queue, amplitude: f32) {
        self.write_frame(queue, Uniform::NoiseAmplitude, amplitude);
    }

    pub fn set_noise_persistence(&self, queue: &wgpu::Queue, persistence: f32) {
        self.write_frame(queue, Uniform::NoisePersistence, persistence);
    }

    pub fn set_noise_octaves(&self, queue: &wgpu::Queue, octaves: i32) {
        self.write_frame(queue, Uniform::NoiseOctaves, octaves);
    }

    pub fn set_light_position(&self, queue: &wgpu::Queue, position: Vec4) {
        self.write_frame(queue, Uniform::LightPosition, position.to_array());
    }

    pub fn set_light_color(&self, queue: &wgpu::Queue, color: Vec4) {
        self.write_frame(queue, Uniform::LightColor, color.to_array());
    }

    pub fn set_camera_position(&self, queue: &wgpu::Queue, position: Vec4) {
        self.write_frame(queue, Uniform::CameraPosition, position.to_array());
    }

    pub fn set_roughness(&self, queue: &wgpu::Queue, roughness: f32) {
        self.write_frame(queue, Uniform::Roughness, roughness);
    }

    pub fn set_metallic(&self, queue: &wgpu::Queue, metallic: f32) {
        self.write_frame(queue, Uniform::Metallic, metallic);
    }

    /// Upload a draw's model matrix, deriving the inverse-transpose when the
    /// shaders declare that slot. A singular model matrix is not
    /// special-cased; the inverse is whatever the math library produces.
    pub fn set_model_matrix(&self, queue: &wgpu::Queue, draw_index: u32, model: Mat4) {
        self.write_draw(queue, draw_index, Uniform::Model, model.to_cols_array_2d());
        if self.has(Uniform::ModelInvTranspose) {
            let inv_tr = inverse_transpose(model);
            self.write_draw(
                queue,
                draw_index,
                Uniform::ModelInvTranspose,
                inv_tr.to_cols_array_2d(),
            );
        }
    }

    pub fn set_instance_position(&self, queue: &wgpu::Queue, draw_index: u32, position: Vec4) {
        self.write_draw(
            queue,
            draw_index,
            Uniform::InstancePosition,
            position.to_array(),
        );
    }

    /// Record one indexed draw of `drawable` using `draw_index`'s per-draw
    /// uniform record.
    ///
    /// Binds the pipeline only when `binding` shows a different program
    /// active, then binds every attribute buffer the shader declares and
    /// the drawable supplies.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        binding: &mut PipelineBinding,
        drawable: &dyn Drawable,
        draw_index: u32,
    ) {
        debug_assert_eq!(drawable.topology(), self.topology);

        if binding.activate(self.id) {
            pass.set_pipeline(&self.pipeline);
        }

        let offsets = [(u64::from(draw_index) * self.draw_stride) as u32];
        let dynamic_offsets: &[u32] = if self.has_draw_block { &offsets } else { &[] };
        pass.set_bind_group(UNIFORM_GROUP, &self.bind_group, dynamic_offsets);

        for (slot, attr) in self.attributes.iter().enumerate() {
            let buffer = match attr {
                VertexAttr::Position => Some(drawable.position_buffer()),
                VertexAttr::Normal => drawable.normal_buffer(),
                VertexAttr::Color => drawable.color_buffer(),
            };
            let Some(buffer) = buffer else {
                log::warn!("drawable lacks the {attr:?} buffer the shader declares; draw skipped");
                return;
            };
            pass.set_vertex_buffer(slot as u32, buffer.slice(..));
        }

        pass.set_index_buffer(drawable.index_buffer().slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..drawable.index_count(), 0, 0..1);
    }
}

const POSITION_ATTR: wgpu::VertexAttribute = wgpu::VertexAttribute {
    offset: 0,
    shader_location: POSITION_LOCATION,
    format: wgpu::VertexFormat::Float32x4,
};
const NORMAL_ATTR: wgpu::VertexAttribute = wgpu::VertexAttribute {
    offset: 0,
    shader_location: NORMAL_LOCATION,
    format: wgpu::VertexFormat::Float32x4,
};
const COLOR_ATTR: wgpu::VertexAttribute = wgpu::VertexAttribute {
    offset: 0,
    shader_location: COLOR_LOCATION,
    format: wgpu::VertexFormat::Float32x4,
};

/// Inverse of the transpose, the normal-matrix derivation.
pub fn inverse_transpose(model: Mat4) -> Mat4 {
    model.transpose().inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn stage(kind: StageKind, source: &str) -> ShaderStage {
        ShaderStage::compile(kind, source).expect("test stage compiles")
    }

    const VERT: &str = include_str!("../../shaders/field_vert.wgsl");
    const FRAG: &str = include_str!("../../shaders/field_frag.wgsl");

    #[test]
    fn shipped_stages_compile() {
        stage(StageKind::Vertex, VERT);
        stage(StageKind::Fragment, FRAG);
    }

    #[test]
    fn compile_error_carries_diagnostics() {
        let err = ShaderStage::compile(StageKind::Vertex, "fn broken( {").unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, "vertex");
                assert!(!log.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn shipped_stages_resolve_every_slot() {
        let vertex = stage(StageKind::Vertex, VERT);
        let fragment = stage(StageKind::Fragment, FRAG);
        let slots = SlotTable::link(&vertex.module, &fragment.module).expect("links");

        for uniform in [
            Uniform::ViewProj,
            Uniform::Color,
            Uniform::LightPosition,
            Uniform::LightColor,
            Uniform::CameraPosition,
            Uniform::Time,
            Uniform::TimeFrequency,
            Uniform::NoiseFrequency,
            Uniform::NoiseAmplitude,
            Uniform::NoisePersistence,
            Uniform::NoiseOctaves,
            Uniform::Roughness,
            Uniform::Metallic,
            Uniform::Model,
            Uniform::ModelInvTranspose,
            Uniform::InstancePosition,
        ] {
            assert!(
                slots.resolve(uniform).is_some(),
                "{uniform:?} should resolve in the shipped shaders"
            );
        }
    }

    #[test]
    fn absent_members_resolve_to_none() {
        let vertex = stage(
            StageKind::Vertex,
            r#"
            struct FrameUniforms { view_proj: mat4x4<f32> }
            @group(0) @binding(0) var<uniform> u_frame: FrameUniforms;
            @vertex
            fn vs_main(@location(0) position: vec4<f32>) -> @builtin(position) vec4<f32> {
                return u_frame.view_proj * position;
            }
            "#,
        );
        let fragment = stage(
            StageKind::Fragment,
            r#"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0);
            }
            "#,
        );
        let slots = SlotTable::link(&vertex.module, &fragment.module).expect("links");

        assert!(slots.resolve(Uniform::ViewProj).is_some());
        // Setters for all of these must skip the upload
        assert_eq!(slots.resolve(Uniform::Color), None);
        assert_eq!(slots.resolve(Uniform::Roughness), None);
        assert_eq!(slots.resolve(Uniform::Model), None);
        assert_eq!(slots.resolve(Uniform::InstancePosition), None);
    }

    #[test]
    fn per_draw_slots_resolve_against_the_draw_block() {
        let vertex = stage(StageKind::Vertex, VERT);
        let fragment = stage(StageKind::Fragment, FRAG);
        let slots = SlotTable::link(&vertex.module, &fragment.module).expect("links");

        assert_eq!(slots.resolve(Uniform::Model), Some(0));
        assert_eq!(slots.resolve(Uniform::ModelInvTranspose), Some(64));
        assert_eq!(slots.resolve(Uniform::InstancePosition), Some(128));
    }

    #[test]
    fn pipeline_binding_activates_once_per_program() {
        let mut binding = PipelineBinding::new();
        let mut activations = 0;

        for _ in 0..5 {
            if binding.activate(7) {
                activations += 1;
            }
        }
        assert_eq!(activations, 1);

        // Switching programs re-activates, switching back re-activates again
        assert!(binding.activate(9));
        assert!(binding.activate(7));
        assert!(!binding.activate(7));

        // A new pass starts unbound
        binding.reset();
        assert!(binding.activate(7));
    }

    #[test]
    fn inverse_transpose_of_identity_is_identity() {
        let m = inverse_transpose(Mat4::IDENTITY);
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn inverse_transpose_matches_definition() {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::new(0.1, 0.1, 0.1),
            glam::Quat::from_rotation_y(0.7),
            Vec3::new(3.0, 0.0, -2.0),
        );
        let expected = model.transpose().inverse();
        assert!(inverse_transpose(model).abs_diff_eq(expected, 1e-6));

        // Sanity: product with the transpose of the original is identity
        let product = inverse_transpose(model) * model.transpose();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }
}
