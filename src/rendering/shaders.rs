//! Wave shader sources: a pair of files on disk with a built-in fallback pair.

use std::path::Path;

/// Vertex shader file name inside the shader directory
pub const VERTEX_FILE: &str = "wave.vert.wgsl";

/// Fragment shader file name inside the shader directory
pub const FRAGMENT_FILE: &str = "wave.frag.wgsl";

/// Vertex + fragment WGSL sources for the wave pipeline
#[derive(Debug, Clone)]
pub struct ShaderPair {
    /// Where the sources came from (for logs and error messages)
    pub origin: String,
    pub vertex: String,
    pub fragment: String,
}

impl ShaderPair {
    /// Read `wave.vert.wgsl` and `wave.frag.wgsl` from `dir`
    pub fn from_dir(dir: &Path) -> Result<Self, String> {
        let vertex_path = dir.join(VERTEX_FILE);
        let fragment_path = dir.join(FRAGMENT_FILE);
        log::info!(
            "Loading shaders from: {} and {}",
            vertex_path.display(),
            fragment_path.display()
        );

        Ok(Self {
            origin: dir.display().to_string(),
            vertex: read_source(&vertex_path)?,
            fragment: read_source(&fragment_path)?,
        })
    }

    /// Unlit shader pair compiled into the binary
    pub fn builtin() -> Self {
        Self {
            origin: "built-in basic shaders".to_string(),
            vertex: include_str!("shaders/basic.vert.wgsl").to_string(),
            fragment: include_str!("shaders/basic.frag.wgsl").to_string(),
        }
    }

    /// Candidate pairs in the order they should be tried
    pub fn candidates(dir: &Path) -> Vec<Result<ShaderPair, String>> {
        vec![Self::from_dir(dir), Ok(Self::builtin())]
    }
}

fn read_source(path: &Path) -> Result<String, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to open shader file {}: {}", path.display(), e))?;
    if source.trim().is_empty() {
        return Err(format!("Shader file {} is empty", path.display()));
    }
    Ok(source)
}

/// Compile one WGSL module, capturing validation errors instead of panicking
pub async fn compile_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, String> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match device.pop_error_scope().await {
        Some(error) => Err(format!("Shader compilation error ({}): {}", label, error)),
        None => Ok(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn shader_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")
    }

    fn validate(source: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(source).expect("WGSL should parse");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("WGSL should validate");
        module
    }

    fn has_entry_point(module: &naga::Module, name: &str, stage: naga::ShaderStage) -> bool {
        module
            .entry_points
            .iter()
            .any(|ep| ep.name == name && ep.stage == stage)
    }

    #[test]
    fn test_missing_dir_is_error() {
        let result = ShaderPair::from_dir(Path::new("/nonexistent/wavesim/shaders"));
        let err = result.expect_err("missing files should fail");
        assert!(err.contains(VERTEX_FILE), "{}", err);
    }

    #[test]
    fn test_candidates_fall_back_to_builtin() {
        let candidates = ShaderPair::candidates(Path::new("/nonexistent"));
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].is_err());
        assert!(candidates[1].is_ok());
    }

    #[test]
    fn test_disk_shaders_validate() {
        let pair = ShaderPair::from_dir(&shader_dir()).expect("repo shaders should load");
        let vertex = validate(&pair.vertex);
        let fragment = validate(&pair.fragment);
        assert!(has_entry_point(&vertex, "vs_main", naga::ShaderStage::Vertex));
        assert!(has_entry_point(&fragment, "fs_main", naga::ShaderStage::Fragment));
    }

    #[test]
    fn test_builtin_shaders_validate() {
        let pair = ShaderPair::builtin();
        let vertex = validate(&pair.vertex);
        let fragment = validate(&pair.fragment);
        assert!(has_entry_point(&vertex, "vs_main", naga::ShaderStage::Vertex));
        assert!(has_entry_point(&fragment, "fs_main", naga::ShaderStage::Fragment));
    }

    #[test]
    fn test_blit_shader_validates() {
        let module = validate(include_str!("shaders/blit.wgsl"));
        assert!(has_entry_point(&module, "vs_main", naga::ShaderStage::Vertex));
        assert!(has_entry_point(&module, "fs_main", naga::ShaderStage::Fragment));
    }
}
