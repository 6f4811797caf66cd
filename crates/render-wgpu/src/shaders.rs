/// WGSL shader for lit, instanced meshes (ring and core).
pub const MESH_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    ambient: vec4<f32>,
    key_dir: vec4<f32>,
    key_color: vec4<f32>,
    glow_pos: vec4<f32>,
    glow_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) emissive: vec4<f32>,
    @location(8) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: vec3<f32>,
    @location(4) params: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    out.emissive = instance.emissive.rgb;
    out.params = instance.params.xy;
    return out;
}

fn shade(n: vec3<f32>, v: vec3<f32>, l: vec3<f32>, radiance: vec3<f32>,
         diffuse: vec3<f32>, specular: vec3<f32>, shininess: f32) -> vec3<f32> {
    let ndl = max(dot(n, l), 0.0);
    let h = normalize(l + v);
    let spec = pow(max(dot(n, h), 0.0), shininess) * ndl;
    return (diffuse * ndl + specular * spec) * radiance;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(globals.camera_pos.xyz - in.world_pos);
    let metalness = in.params.x;
    let roughness = in.params.y;
    let base = in.color.rgb;
    let diffuse = base * (1.0 - metalness);
    let specular = mix(vec3<f32>(0.04), base, metalness);
    let shininess = mix(256.0, 4.0, roughness);

    var color = globals.ambient.rgb * (diffuse + specular * 0.5);

    let key_l = normalize(globals.key_dir.xyz);
    color += shade(n, v, key_l, globals.key_color.rgb, diffuse, specular, shininess);

    let to_glow = globals.glow_pos.xyz - in.world_pos;
    let d = length(to_glow);
    var falloff = 1.0 / (1.0 + d * d);
    if (globals.glow_pos.w > 0.0) {
        let fade = clamp(1.0 - d / globals.glow_pos.w, 0.0, 1.0);
        falloff *= fade * fade;
    }
    if (d > 0.0001) {
        color += shade(n, v, to_glow / d, globals.glow_color.rgb * falloff,
                       diffuse, specular, shininess);
    }

    color += in.emissive;
    return vec4<f32>(color, in.color.a);
}
"#;

/// WGSL shader for the unlit star field.
pub const POINTS_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    ambient: vec4<f32>,
    key_dir: vec4<f32>,
    key_color: vec4<f32>,
    glow_pos: vec4<f32>,
    glow_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) emissive: vec4<f32>,
    @location(8) params: vec4<f32>,
};

struct PointOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_points(vertex: VertexInput, instance: InstanceInput) -> PointOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    var out: PointOutput;
    out.clip_position = globals.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_points(in: PointOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
