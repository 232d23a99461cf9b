//! Uniform-block and vertex-input reflection over naga IR.
//!
//! The shader stages are the source of truth for which uniforms exist and
//! where they live: a member present in a stage's uniform block resolves to
//! its WGSL-computed byte offset, a member the shaders never declare stays
//! unresolved and every upload for it is skipped. This is the explicit
//! rendition of GL's `getUniformLocation` returning -1.

use std::collections::HashMap;

/// Byte layout of one uniform block, merged across the stages declaring it.
#[derive(Debug, Clone)]
pub struct BlockLayout {
    /// Total struct size in bytes (the WGSL struct span).
    pub size: u64,
    /// Stages that declare this block.
    pub visibility: wgpu::ShaderStages,
    members: HashMap<String, u64>,
}

impl BlockLayout {
    /// Byte offset of a member, or `None` if the shaders never declared it.
    pub fn offset(&self, name: &str) -> Option<u64> {
        self.members.get(name).copied()
    }
}

/// Reflect the uniform struct bound at `(group, binding)`, if the module
/// declares one.
pub fn uniform_block(
    module: &naga::Module,
    group: u32,
    binding: u32,
    stage: wgpu::ShaderStages,
) -> Option<BlockLayout> {
    for (_, var) in module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform {
            continue;
        }
        let Some(res) = &var.binding else { continue };
        if res.group != group || res.binding != binding {
            continue;
        }
        if let naga::TypeInner::Struct { members, span } = &module.types[var.ty].inner {
            let mut table = HashMap::new();
            for member in members {
                if let Some(name) = &member.name {
                    table.insert(name.clone(), u64::from(member.offset));
                }
            }
            return Some(BlockLayout {
                size: u64::from(*span),
                visibility: stage,
                members: table,
            });
        }
    }
    None
}

/// Merge the layouts two stages declare for the same binding.
///
/// Members are unioned; a member both stages declare must sit at the same
/// offset, otherwise the stages do not agree on the block's memory layout
/// and the program cannot link.
pub fn merge_blocks(
    a: Option<BlockLayout>,
    b: Option<BlockLayout>,
) -> Result<Option<BlockLayout>, String> {
    match (a, b) {
        (None, None) => Ok(None),
        (Some(block), None) | (None, Some(block)) => Ok(Some(block)),
        (Some(mut merged), Some(other)) => {
            for (name, offset) in &other.members {
                match merged.members.get(name) {
                    Some(existing) if existing != offset => {
                        return Err(format!(
                            "uniform member `{name}` declared at offset {existing} by one stage \
                             and {offset} by the other"
                        ));
                    }
                    Some(_) => {}
                    None => {
                        merged.members.insert(name.clone(), *offset);
                    }
                }
            }
            merged.size = merged.size.max(other.size);
            merged.visibility |= other.visibility;
            Ok(Some(merged))
        }
    }
}

/// Vertex entry-point inputs as a `location -> name` map.
///
/// Handles both bare `@location` arguments and struct arguments whose
/// members carry the locations.
pub fn vertex_locations(module: &naga::Module) -> HashMap<u32, String> {
    let mut out = HashMap::new();
    for ep in &module.entry_points {
        if ep.stage != naga::ShaderStage::Vertex {
            continue;
        }
        for arg in &ep.function.arguments {
            if let Some(naga::Binding::Location { location, .. }) = &arg.binding {
                out.insert(*location, arg.name.clone().unwrap_or_default());
            } else if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                for member in members {
                    if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                        out.insert(*location, member.name.clone().unwrap_or_default());
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> naga::Module {
        naga::front::wgsl::parse_str(source).expect("test shader parses")
    }

    const FULL_BLOCK: &str = r#"
        struct FrameUniforms {
            view_proj: mat4x4<f32>,
            color: vec4<f32>,
            light_pos: vec4<f32>,
            light_color: vec4<f32>,
            camera_pos: vec4<f32>,
            time: i32,
            time_frequency: f32,
            noise_frequency: f32,
            noise_amplitude: f32,
            noise_persistence: f32,
            noise_octaves: i32,
            roughness: f32,
            metallic: f32,
        }
        @group(0) @binding(0) var<uniform> u_frame: FrameUniforms;

        @vertex
        fn vs_main(@location(0) position: vec4<f32>, @location(1) normal: vec4<f32>)
            -> @builtin(position) vec4<f32> {
            return u_frame.view_proj * position + normal * 0.0;
        }
    "#;

    #[test]
    fn full_block_resolves_wgsl_offsets() {
        let module = parse(FULL_BLOCK);
        let block = uniform_block(&module, 0, 0, wgpu::ShaderStages::VERTEX)
            .expect("block is declared");

        assert_eq!(block.offset("view_proj"), Some(0));
        assert_eq!(block.offset("color"), Some(64));
        assert_eq!(block.offset("light_pos"), Some(80));
        assert_eq!(block.offset("light_color"), Some(96));
        assert_eq!(block.offset("camera_pos"), Some(112));
        assert_eq!(block.offset("time"), Some(128));
        assert_eq!(block.offset("time_frequency"), Some(132));
        assert_eq!(block.offset("noise_frequency"), Some(136));
        assert_eq!(block.offset("noise_amplitude"), Some(140));
        assert_eq!(block.offset("noise_persistence"), Some(144));
        assert_eq!(block.offset("noise_octaves"), Some(148));
        assert_eq!(block.offset("roughness"), Some(152));
        assert_eq!(block.offset("metallic"), Some(156));
        assert_eq!(block.size, 160);
    }

    #[test]
    fn omitted_member_is_unresolved() {
        let module = parse(
            r#"
            struct FrameUniforms {
                view_proj: mat4x4<f32>,
                color: vec4<f32>,
            }
            @group(0) @binding(0) var<uniform> u_frame: FrameUniforms;

            @vertex
            fn vs_main(@location(0) position: vec4<f32>) -> @builtin(position) vec4<f32> {
                return u_frame.view_proj * position * u_frame.color.x;
            }
        "#,
        );
        let block = uniform_block(&module, 0, 0, wgpu::ShaderStages::VERTEX).unwrap();
        assert_eq!(block.offset("view_proj"), Some(0));
        assert_eq!(block.offset("roughness"), None);
        assert_eq!(block.offset("time"), None);
    }

    #[test]
    fn missing_block_reflects_as_none() {
        let module = parse(
            r#"
            @vertex
            fn vs_main(@location(0) position: vec4<f32>) -> @builtin(position) vec4<f32> {
                return position;
            }
        "#,
        );
        assert!(uniform_block(&module, 0, 0, wgpu::ShaderStages::VERTEX).is_none());
        assert!(uniform_block(&module, 0, 1, wgpu::ShaderStages::VERTEX).is_none());
    }

    #[test]
    fn merge_unions_members_and_visibility() {
        let vertex = parse(FULL_BLOCK);
        let fragment = parse(
            r#"
            struct FrameUniforms {
                view_proj: mat4x4<f32>,
                color: vec4<f32>,
            }
            @group(0) @binding(0) var<uniform> u_frame: FrameUniforms;

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return u_frame.color;
            }
        "#,
        );

        let merged = merge_blocks(
            uniform_block(&vertex, 0, 0, wgpu::ShaderStages::VERTEX),
            uniform_block(&fragment, 0, 0, wgpu::ShaderStages::FRAGMENT),
        )
        .expect("layouts agree")
        .expect("block present");

        assert_eq!(
            merged.visibility,
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT
        );
        assert_eq!(merged.offset("color"), Some(64));
        assert_eq!(merged.offset("metallic"), Some(156));
        assert_eq!(merged.size, 160);
    }

    #[test]
    fn conflicting_offsets_fail_to_merge() {
        let a = parse(FULL_BLOCK);
        // `color` sits at offset 0 here instead of 64
        let b = parse(
            r#"
            struct FrameUniforms {
                color: vec4<f32>,
            }
            @group(0) @binding(0) var<uniform> u_frame: FrameUniforms;

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return u_frame.color;
            }
        "#,
        );

        let result = merge_blocks(
            uniform_block(&a, 0, 0, wgpu::ShaderStages::VERTEX),
            uniform_block(&b, 0, 0, wgpu::ShaderStages::FRAGMENT),
        );
        let err = result.expect_err("offset conflict must not merge");
        assert!(err.contains("color"));
    }

    #[test]
    fn vertex_inputs_reflect_from_bare_arguments() {
        let module = parse(FULL_BLOCK);
        let locations = vertex_locations(&module);
        assert_eq!(locations.get(&0).map(String::as_str), Some("position"));
        assert_eq!(locations.get(&1).map(String::as_str), Some("normal"));
        assert!(!locations.contains_key(&2));
    }

    #[test]
    fn vertex_inputs_reflect_from_struct_arguments() {
        let module = parse(
            r#"
            struct VertexInput {
                @location(0) position: vec4<f32>,
                @location(1) normal: vec4<f32>,
                @location(2) color: vec4<f32>,
            }
            @vertex
            fn vs_main(in: VertexInput) -> @builtin(position) vec4<f32> {
                return in.position + in.normal * 0.0 + in.color * 0.0;
            }
        "#,
        );
        let locations = vertex_locations(&module);
        assert_eq!(locations.get(&0).map(String::as_str), Some("position"));
        assert_eq!(locations.get(&1).map(String::as_str), Some("normal"));
        assert_eq!(locations.get(&2).map(String::as_str), Some("color"));
    }
}
