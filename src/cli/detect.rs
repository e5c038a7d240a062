//! Rule-set format auto-detection

use anyhow::{Context, Result};
use std::path::Path;

use super::args::RuleSetFormat;

/// Detected format with the method that found it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDetection {
    /// Detected format
    pub format: RuleSetFormat,
    /// Detection method used
    pub method: DetectionMethod,
}

/// Method used to detect a rule-set format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Heuristic detection via file extension
    Extension,
    /// Heuristic detection via file content analysis
    Content,
    /// User explicitly specified
    UserSpecified,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extension => write!(f, "heuristic (file extension)"),
            Self::Content => write!(f, "heuristic (content analysis)"),
            Self::UserSpecified => write!(f, "user specified"),
        }
    }
}

/// Detect the format of an existing rule-set file
pub fn detect_format(path: &Path, user_format: Option<RuleSetFormat>) -> Result<FormatDetection> {
    if let Some(format) = user_format {
        return Ok(FormatDetection {
            format,
            method: DetectionMethod::UserSpecified,
        });
    }

    if let Some(format) = format_from_extension(path) {
        return Ok(FormatDetection {
            format,
            method: DetectionMethod::Extension,
        });
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule set: {}", path.display()))?;
    Ok(FormatDetection {
        format: format_from_content(&contents),
        method: DetectionMethod::Content,
    })
}

/// Format implied by a path's extension, if recognised
pub fn format_from_extension(path: &Path) -> Option<RuleSetFormat> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "json" => Some(RuleSetFormat::Json),
        "sc" | "txt" | "lsc" => Some(RuleSetFormat::Text),
        _ => None,
    }
}

/// JSON documents start with `{`; anything else is text.
pub fn format_from_content(contents: &str) -> RuleSetFormat {
    if contents.trim_start().starts_with('{') {
        RuleSetFormat::Json
    } else {
        RuleSetFormat::Text
    }
}
