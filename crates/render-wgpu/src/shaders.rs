/// WGSL shader for every scene quad.
///
/// Group 0 holds the per-frame uniforms, group 1 the quad's texture. Flat
/// colored quads bind a 1x1 white texture and carry their color per vertex.
pub const QUAD_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    // xyz: direction toward the light
    light_dir: vec4<f32>,
    // x: ambient, y: diffuse, z: material reflectance
    light: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var t_surface: texture_2d<f32>;
@group(1) @binding(1)
var s_surface: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) color: vec3<f32>,
    @location(3) normal: vec3<f32>,
    @location(4) lit: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) normal: vec3<f32>,
    @location(3) lit: f32,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    out.color = vertex.color;
    out.normal = vertex.normal;
    out.lit = vertex.lit;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(t_surface, s_surface, in.uv).rgb * in.color;
    let n = normalize(in.normal);
    let diffuse = max(dot(n, normalize(uniforms.light_dir.xyz)), 0.0);
    let shade = min((uniforms.light.x + diffuse * uniforms.light.y) * uniforms.light.z, 1.0);
    let factor = mix(1.0, shade, in.lit);
    return vec4<f32>(base * factor, 1.0);
}
"#;
