use std::{fmt, str::FromStr};

use thiserror::Error;

/// How sprites get onto the screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderBackend {
    /// Sprites composited on the CPU into one frame buffer.
    Software,
    /// All sprites packed in one texture atlas, one draw call per frame.
    Gl,
    /// One texture and one draw call per sprite.
    GlTexture,
}

impl RenderBackend {
    pub const ALL: [RenderBackend; 3] = [
        RenderBackend::Software,
        RenderBackend::Gl,
        RenderBackend::GlTexture,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RenderBackend::Software => "software",
            RenderBackend::Gl => "gl",
            RenderBackend::GlTexture => "gl-texture",
        }
    }
}

impl Default for RenderBackend {
    fn default() -> Self {
        RenderBackend::Software
    }
}

impl fmt::Display for RenderBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unknown rendering type specified: {0} (expected one of: software, gl, gl-texture)")]
    UnknownBackend(String),
    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

impl FromStr for RenderBackend {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "software" | "soft" | "2d" => Ok(RenderBackend::Software),
            "gl" | "opengl" => Ok(RenderBackend::Gl),
            "gl-texture" | "gl_texture" => Ok(RenderBackend::GlTexture),
            other => Err(SettingsError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub backend: RenderBackend,
}

impl Settings {
    /// Parses the arguments following the program name.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Settings, SettingsError> {
        let mut args = args.into_iter();
        let backend = match args.next() {
            Some(arg) => arg.parse()?,
            None => RenderBackend::default(),
        };
        if let Some(extra) = args.next() {
            return Err(SettingsError::UnexpectedArgument(extra));
        }
        Ok(Settings { backend })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_software() {
        let settings = Settings::from_args(args(&[])).unwrap();
        assert_eq!(settings.backend, RenderBackend::Software);
    }

    #[test]
    fn backend_names_parse_back() {
        for backend in RenderBackend::ALL.iter() {
            let settings = Settings::from_args(args(&[backend.name()])).unwrap();
            assert_eq!(settings.backend, *backend);
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = Settings::from_args(args(&["vulkan"])).unwrap_err();
        assert_eq!(err, SettingsError::UnknownBackend("vulkan".to_string()));
        assert!(err.to_string().contains("vulkan"));
    }

    #[test]
    fn extra_arguments_are_rejected() {
        let err = Settings::from_args(args(&["gl", "fullscreen"])).unwrap_err();
        assert_eq!(err, SettingsError::UnexpectedArgument("fullscreen".to_string()));
    }
}
