//! GLSL ES 3.00 sources.

pub const FULLSCREEN_VERTEX: &str = r#"#version 300 es
precision highp float;
const vec2 POSITIONS[3] = vec2[](
    vec2(-1.0, -1.0),
    vec2(3.0, -1.0),
    vec2(-1.0, 3.0)
);

out vec2 v_uv;

void main() {
    vec2 p = POSITIONS[gl_VertexID];
    v_uv = p * 0.5 + 0.5;
    gl_Position = vec4(p, 0.0, 1.0);
}
"#;

pub const BLIT_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_source;

in vec2 v_uv;
out vec4 fragColor;

void main() {
    fragColor = texture(u_source, v_uv);
}
"#;

pub const TUNNEL_VERTEX: &str = r#"#version 300 es
precision highp float;

layout (location = 0) in vec3 a_position;

uniform mat4 u_projection;
uniform mat4 u_view;
uniform mat4 u_model;
uniform float u_length;

out float v_depth;

void main() {
    v_depth = clamp(-a_position.z / max(u_length, 0.0001), 0.0, 1.0);
    gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
"#;

pub const TUNNEL_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform vec3 u_color;
uniform float u_fade;

in float v_depth;
out vec4 fragColor;

void main() {
    float alpha = 1.0 - smoothstep(1.0 - u_fade, 1.0, v_depth);
    fragColor = vec4(u_color, alpha);
}
"#;

pub const MESH_VERTEX: &str = r#"#version 300 es
precision highp float;

layout (location = 0) in vec3 a_position;
layout (location = 1) in vec3 a_normal;

uniform mat4 u_projection;
uniform mat4 u_view;
uniform mat4 u_model;

out vec3 v_normal;

void main() {
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
"#;

pub const MESH_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform vec3 u_color;
uniform vec3 u_light;

in vec3 v_normal;
out vec4 fragColor;

void main() {
    float diffuse = max(dot(normalize(v_normal), normalize(u_light)), 0.0);
    fragColor = vec4(u_color * (0.25 + 0.75 * diffuse), 1.0);
}
"#;

pub const HOVER_VERTEX: &str = r#"#version 300 es
precision highp float;

layout (location = 0) in vec2 a_uv;

uniform vec2 u_resolution;
uniform vec2 u_center;
uniform vec2 u_size;
uniform vec2 u_ripple;

out vec2 v_uv;

const float PI = 3.14159265;

void main() {
    v_uv = a_uv;
    vec2 local = (a_uv - 0.5) * u_size;
    local.x += sin(a_uv.y * PI) * u_ripple.x * u_size.x;
    local.y += sin(a_uv.x * PI) * u_ripple.y * u_size.y;
    vec2 pixel = u_center + local;
    vec2 clip = pixel / u_resolution * 2.0 - 1.0;
    gl_Position = vec4(clip.x, -clip.y, 0.0, 1.0);
}
"#;

pub const HOVER_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_image;
uniform float u_alpha;
uniform vec2 u_ripple;

in vec2 v_uv;
out vec4 fragColor;

void main() {
    vec2 uv = vec2(v_uv.x, 1.0 - v_uv.y);
    float r = texture(u_image, uv + u_ripple * 0.5).r;
    vec2 gb = texture(u_image, uv).gb;
    fragColor = vec4(r, gb, u_alpha);
}
"#;

/// Flow texel: xy = flow vector, z = magnitude. When `u_encoded` is set the
/// surface is 8-bit and signed values are stored as v * 0.5 + 0.5.
pub const FLOWMAP_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_previous;
uniform vec2 u_pointer;
uniform vec2 u_velocity;
uniform float u_aspect;
uniform float u_falloff;
uniform float u_alpha;
uniform float u_dissipation;
uniform float u_gain;
uniform float u_encoded;

in vec2 v_uv;
out vec4 fragColor;

vec3 decode(vec4 t) {
    return u_encoded > 0.5 ? t.xyz * 2.0 - 1.0 : t.xyz;
}

void main() {
    vec3 prev = decode(texture(u_previous, v_uv)) * u_dissipation;

    vec2 cursor = v_uv - u_pointer;
    cursor.x *= u_aspect;
    float strength = clamp(1.0 - length(cursor) / max(u_falloff, 0.000001), 0.0, 1.0) * u_alpha;
    vec2 stamp = u_velocity * u_gain;
    vec3 impulse = vec3(stamp, 1.0) * strength;

    vec3 flow = clamp(mix(prev, impulse, min(strength, 1.0) * 0.5), -1.0, 1.0);
    fragColor = vec4(u_encoded > 0.5 ? flow * 0.5 + 0.5 : flow, 1.0);
}
"#;

pub const FLOW_DISTORT_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_image;
uniform sampler2D u_flow;
uniform sampler2D u_previous;
uniform vec2 u_cover;
uniform float u_aberration;
uniform float u_blur;
uniform float u_encoded;

in vec2 v_uv;
out vec4 fragColor;

void main() {
    vec4 raw = texture(u_flow, v_uv);
    vec3 flow = u_encoded > 0.5 ? raw.xyz * 2.0 - 1.0 : raw.xyz;
    vec2 uv = (v_uv - 0.5) * u_cover + 0.5;

    vec2 shift = flow.xy * u_aberration;
    float r = texture(u_image, uv - shift * 1.5).r;
    float g = texture(u_image, uv - shift).g;
    float b = texture(u_image, uv - shift * 0.5).b;
    vec4 color = vec4(r, g, b, 1.0);

    vec4 previous = texture(u_previous, v_uv);
    float trail = clamp(abs(flow.z), 0.0, 1.0) * u_blur;
    fragColor = mix(color, previous, trail);
}
"#;

pub const IMAGE_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_image;
uniform vec2 u_cover;

in vec2 v_uv;
out vec4 fragColor;

void main() {
    fragColor = texture(u_image, (v_uv - 0.5) * u_cover + 0.5);
}
"#;

/// Must match `distortion::displace`.
pub const POINTER_DISTORT_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_source;
uniform vec2 u_pointer;
uniform float u_aspect;
uniform float u_radius;
uniform float u_strength;

in vec2 v_uv;
out vec4 fragColor;

void main() {
    vec2 d = v_uv - u_pointer;
    d.x *= u_aspect;
    float dist = length(d);
    vec2 uv = v_uv;
    if (dist > 0.0) {
        float falloff = 1.0 - smoothstep(0.0, u_radius, dist);
        vec2 offset = d / dist * falloff * u_strength * dist / max(u_radius, 0.000001);
        offset.x /= u_aspect;
        uv -= offset;
    }
    fragColor = texture(u_source, uv);
}
"#;
