//! Error types for Circular Motion.
//!
//! Construction of a [`CircularMotion`](crate::CircularMotion) is the only
//! place the effect itself can fail. The remaining enums cover the hosts
//! around it: color and options parsing, the window viewer and the exporter.

use std::fmt;

/// Errors that can occur while constructing a motion controller.
///
/// All variants are fatal to construction. Once a controller exists, no
/// further operation on it can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The selector resolved to nothing, or the element is not a drawable canvas.
    InvalidSurfaceReference {
        /// The selector that was looked up, if construction went through one.
        selector: Option<String>,
    },
    /// The surface refused to hand out a 2D drawing context.
    SurfaceContextUnavailable,
    /// The merged options violate a constraint.
    InvalidOptions {
        /// Name of the offending option, as spelled in configuration files.
        field: &'static str,
        /// Human readable description of the violation.
        reason: String,
    },
}

impl ConfigurationError {
    pub(crate) fn invalid_option(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidOptions {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::InvalidSurfaceReference { selector: Some(selector) } => write!(
                f,
                "Selector '{}' does not resolve to a canvas element",
                selector
            ),
            ConfigurationError::InvalidSurfaceReference { selector: None } => {
                write!(f, "Surface handle is not a canvas element")
            }
            ConfigurationError::SurfaceContextUnavailable => {
                write!(f, "Failed to acquire a 2D drawing context from the surface")
            }
            ConfigurationError::InvalidOptions { field, reason } => {
                write!(f, "Invalid option '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Errors that can occur when parsing a CSS-style color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The input was empty or whitespace.
    Empty,
    /// A `#` color with the wrong length or non-hex digits.
    InvalidHex(String),
    /// An `rgb()`/`rgba()` call with the wrong arity or out-of-range components.
    InvalidFunction(String),
    /// Not a hex color, a color function, or a known color name.
    Unrecognized(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::Empty => write!(f, "Color string is empty"),
            ColorParseError::InvalidHex(s) => write!(f, "Invalid hex color: '{}'", s),
            ColorParseError::InvalidFunction(s) => write!(f, "Invalid color function: '{}'", s),
            ColorParseError::Unrecognized(s) => write!(f, "Unrecognized color: '{}'", s),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Errors that can occur when loading or saving an options file.
#[derive(Debug)]
pub enum OptionsError {
    /// Failed to read or write the file.
    Io(std::io::Error),
    /// The file is not valid options JSON.
    Json(serde_json::Error),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::Io(e) => write!(f, "Failed to access options file: {}", e),
            OptionsError::Json(e) => write!(f, "Failed to parse options: {}", e),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptionsError::Io(e) => Some(e),
            OptionsError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for OptionsError {
    fn from(e: std::io::Error) -> Self {
        OptionsError::Io(e)
    }
}

impl From<serde_json::Error> for OptionsError {
    fn from(e: serde_json::Error) -> Self {
        OptionsError::Json(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the window viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The motion controller could not be constructed.
    Configuration(ConfigurationError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            ViewerError::Window(e) => write!(f, "Failed to create window: {}", e),
            ViewerError::Gpu(e) => write!(f, "GPU error: {}", e),
            ViewerError::Configuration(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::Gpu(e) => Some(e),
            ViewerError::Configuration(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        ViewerError::Window(e)
    }
}

impl From<GpuError> for ViewerError {
    fn from(e: GpuError) -> Self {
        ViewerError::Gpu(e)
    }
}

impl From<ConfigurationError> for ViewerError {
    fn from(e: ConfigurationError) -> Self {
        ViewerError::Configuration(e)
    }
}

/// Errors that can occur when exporting rendered frames to an image file.
#[derive(Debug)]
pub enum ExportError {
    /// The motion controller could not be constructed.
    Configuration(ConfigurationError),
    /// Failed to encode or write the image.
    Image(image::ImageError),
    /// The canvas buffer does not match its reported dimensions.
    BufferSize {
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
        /// Length of the RGBA buffer in bytes.
        len: usize,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Configuration(e) => write!(f, "Configuration error: {}", e),
            ExportError::Image(e) => write!(f, "Failed to write image: {}", e),
            ExportError::BufferSize { width, height, len } => write!(
                f,
                "Canvas buffer of {} bytes does not fit {}x{} RGBA pixels",
                len, width, height
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Configuration(e) => Some(e),
            ExportError::Image(e) => Some(e),
            ExportError::BufferSize { .. } => None,
        }
    }
}

impl From<ConfigurationError> for ExportError {
    fn from(e: ConfigurationError) -> Self {
        ExportError::Configuration(e)
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}
