use crate::RenderError;
use std::path::Path;
use tracing::info;

/// File names looked up in a shader directory.
pub const VERTEX_SHADER_FILE: &str = "vertex.wgsl";
pub const FRAGMENT_SHADER_FILE: &str = "fragment.wgsl";

/// Vertex stage. Entry point `vs_main`.
pub const VERTEX_SHADER: &str = r#"
struct Uniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light_color: vec3<f32>,
    light_position: vec3<f32>,
    camera_position: vec3<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) vertex_color: vec4<f32>,
    @location(2) vertex_normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) fragment_position: vec3<f32>,
    @location(1) fragment_color: vec4<f32>,
    @location(2) fragment_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = uniforms.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.projection * uniforms.view * world_pos;
    out.fragment_position = world_pos.xyz;
    out.fragment_color = vertex.vertex_color;
    out.fragment_normal = (uniforms.model * vec4<f32>(vertex.vertex_normal, 0.0)).xyz;
    return out;
}
"#;

/// Fragment stage: ambient + diffuse + specular from the single light.
/// Entry point `fs_main`.
pub const FRAGMENT_SHADER: &str = r#"
struct Uniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light_color: vec3<f32>,
    light_position: vec3<f32>,
    camera_position: vec3<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct FragmentInput {
    @location(0) fragment_position: vec3<f32>,
    @location(1) fragment_color: vec4<f32>,
    @location(2) fragment_normal: vec3<f32>,
};

@fragment
fn fs_main(frag: FragmentInput) -> @location(0) vec4<f32> {
    var normal = frag.fragment_normal;
    if (length(normal) > 0.0) {
        normal = normalize(normal);
    }

    let light_dir = normalize(uniforms.light_position - frag.fragment_position);
    let view_dir = normalize(uniforms.camera_position - frag.fragment_position);
    let reflect_dir = reflect(-light_dir, normal);

    let ambient = 0.3 * uniforms.light_color;
    let diffuse = max(dot(normal, light_dir), 0.0) * uniforms.light_color;
    let specular = 0.5 * pow(max(dot(view_dir, reflect_dir), 0.0), 32.0) * uniforms.light_color;

    let lit = (ambient + diffuse + specular) * frag.fragment_color.rgb;
    return vec4<f32>(lit, frag.fragment_color.a);
}
"#;

/// WGSL source for the two shader stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ShaderSources {
    pub fn builtin() -> Self {
        Self {
            vertex: VERTEX_SHADER.to_owned(),
            fragment: FRAGMENT_SHADER.to_owned(),
        }
    }

    /// Read `vertex.wgsl` and `fragment.wgsl` from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path)
                .map_err(|source| RenderError::ShaderSource { path, source })
        };
        let sources = Self {
            vertex: read(VERTEX_SHADER_FILE)?,
            fragment: read(FRAGMENT_SHADER_FILE)?,
        };
        info!("loaded shaders from {}", dir.display());
        Ok(sources)
    }
}

/// Where the shader stages expect their inputs.
///
/// Renderer code addresses attributes and uniforms through this table only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderBindings {
    pub position: u32,
    pub vertex_color: u32,
    pub vertex_normal: u32,
    /// Bind group holding the `Uniforms` block.
    pub uniform_group: u32,
    pub uniform_binding: u32,
}

pub const SHADER_BINDINGS: ShaderBindings = ShaderBindings {
    position: 0,
    vertex_color: 1,
    vertex_normal: 2,
    uniform_group: 0,
    uniform_binding: 0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sources_expose_uniform_contract() {
        let sources = ShaderSources::builtin();
        for name in [
            "model",
            "view",
            "projection",
            "light_color",
            "light_position",
            "camera_position",
        ] {
            assert!(sources.vertex.contains(&format!("{name}:")), "{name}");
            assert!(sources.fragment.contains(&format!("{name}:")), "{name}");
        }
        assert!(sources.vertex.contains("fn vs_main"));
        assert!(sources.fragment.contains("fn fs_main"));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VERTEX_SHADER_FILE), "// vertex").unwrap();
        std::fs::write(dir.path().join(FRAGMENT_SHADER_FILE), "// fragment").unwrap();

        let sources = ShaderSources::load(dir.path()).unwrap();
        assert_eq!(sources.vertex, "// vertex");
        assert_eq!(sources.fragment, "// fragment");
    }

    #[test]
    fn missing_stage_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VERTEX_SHADER_FILE), "// vertex").unwrap();

        let err = ShaderSources::load(dir.path()).unwrap_err();
        match err {
            RenderError::ShaderSource { path, .. } => {
                assert!(path.ends_with(FRAGMENT_SHADER_FILE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
