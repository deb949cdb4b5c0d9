use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::DevicePixelRatio;
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::gesture::tracker::GestureConfig;
use crate::layout::LayoutConfig;
use crate::template::TemplateSpec;

/// Editor configuration. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BadgeConfig {
    /// Template artwork and mask.
    pub template: TemplateSpec,
    /// Avatar shown before any upload, relative to the assets root.
    pub placeholder: Option<String>,
    /// Device pixel ratio of the render surface.
    pub dpr: DevicePixelRatio,
    /// Straight-alpha color filled under the template.
    pub clear_rgba: Option<[u8; 4]>,
    /// Responsive display box.
    pub layout: LayoutConfig,
    /// Gesture sensitivities.
    pub gestures: GestureConfig,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            template: TemplateSpec::default(),
            placeholder: Some("placeholder-avatar.png".to_string()),
            dpr: DevicePixelRatio::ONE,
            clear_rgba: None,
            layout: LayoutConfig::default(),
            gestures: GestureConfig::default(),
        }
    }
}

impl BadgeConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BadgeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| BadgeError::validation(format!("parse badge config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BadgeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BadgeError::validation(format!("open badge config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every section.
    pub fn validate(&self) -> BadgeResult<()> {
        self.template.validate()?;
        if let Some(p) = &self.placeholder {
            crate::assets::store::normalize_rel_path(p)?;
        }
        self.layout.validate()?;
        self.gestures.validate()?;
        let (w, h) = self.template.canvas.physical(self.dpr);
        if w > u32::from(u16::MAX) || h > u32::from(u16::MAX) {
            return Err(BadgeError::validation(format!(
                "render surface {w}x{h} is too large for the rasterizer"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
