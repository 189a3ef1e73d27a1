use std::fmt;

/// WGSL source of the vertex stage: `projection * view * model * position`.
pub const VERTEX_SHADER: &str = include_str!("../shaders/t_prism.vert.wgsl");

/// WGSL source of the fragment stage: one constant opaque color.
pub const FRAGMENT_SHADER: &str = include_str!("../shaders/t_prism.frag.wgsl");

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            ShaderStage::Vertex => VERTEX_SHADER,
            ShaderStage::Fragment => FRAGMENT_SHADER,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "T Prism Vertex Shader",
            ShaderStage::Fragment => "T Prism Fragment Shader",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}
