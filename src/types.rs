//! Type definitions and aliases

use std::path::Path;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Diagnostic tools driven by netstats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    Ping,
    Traceroute,
}

impl Tool {
    /// Default executable name looked up on PATH
    pub fn default_binary(&self) -> &'static str {
        match self {
            Tool::Ping => "ping",
            Tool::Traceroute => "traceroute",
        }
    }

    /// Human-readable name used in log messages
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Ping => "ping",
            Tool::Traceroute => "traceroute",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Image formats the boxplot renderer can write, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Vector output through the SVG backend
    Svg,
    /// Raster output (png, jpeg, bmp) through the bitmap backend
    Bitmap,
    /// SVG rendering converted to a single-page PDF
    Pdf,
}

impl ImageFormat {
    pub const SUPPORTED_EXTENSIONS: &'static [&'static str] = &["svg", "png", "jpg", "jpeg", "bmp", "pdf"];

    /// Detect the format from the path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "svg" => Ok(Self::Svg),
            "png" | "jpg" | "jpeg" | "bmp" => Ok(Self::Bitmap),
            "pdf" => Ok(Self::Pdf),
            "" => Err(AppError::validation(format!(
                "Graph path '{}' has no extension (supported: {})",
                path.display(),
                Self::SUPPORTED_EXTENSIONS.join(", ")
            ))),
            other => Err(AppError::validation(format!(
                "Unsupported image format '.{}' for '{}' (supported: {})",
                other,
                path.display(),
                Self::SUPPORTED_EXTENSIONS.join(", ")
            ))),
        }
    }
}

/// Latency classification used for console coloring
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LatencyLevel {
    /// Below 20ms
    Excellent,
    /// 20-80ms
    Good,
    /// 80-200ms
    Fair,
    /// 200ms and above
    Poor,
}

impl LatencyLevel {
    /// Classify a latency value in milliseconds
    pub fn from_ms(ms: f64) -> Self {
        if ms < 20.0 {
            Self::Excellent
        } else if ms < 80.0 {
            Self::Good
        } else if ms < 200.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Get descriptive text
    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_image_format_detection() {
        assert_eq!(ImageFormat::from_path(&PathBuf::from("out/hops.svg")).unwrap(), ImageFormat::Svg);
        assert_eq!(ImageFormat::from_path(&PathBuf::from("hops.PNG")).unwrap(), ImageFormat::Bitmap);
        assert_eq!(ImageFormat::from_path(&PathBuf::from("hops.jpeg")).unwrap(), ImageFormat::Bitmap);
        assert_eq!(ImageFormat::from_path(&PathBuf::from("report/hops.Pdf")).unwrap(), ImageFormat::Pdf);
    }

    #[test]
    fn test_image_format_rejects_unknown() {
        let err = ImageFormat::from_path(&PathBuf::from("hops.gif")).unwrap_err();
        assert!(err.to_string().contains("Unsupported image format '.gif'"));

        let err = ImageFormat::from_path(&PathBuf::from("hops")).unwrap_err();
        assert!(err.to_string().contains("no extension"));
    }

    #[test]
    fn test_latency_levels() {
        assert_eq!(LatencyLevel::from_ms(1.2), LatencyLevel::Excellent);
        assert_eq!(LatencyLevel::from_ms(45.0), LatencyLevel::Good);
        assert_eq!(LatencyLevel::from_ms(120.0), LatencyLevel::Fair);
        assert_eq!(LatencyLevel::from_ms(350.0), LatencyLevel::Poor);
    }

    #[test]
    fn test_tool_binaries() {
        assert_eq!(Tool::Ping.default_binary(), "ping");
        assert_eq!(Tool::Traceroute.to_string(), "traceroute");
    }
}
