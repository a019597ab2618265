//! Configuration management and validation.
//!
//! Field widths, precisions and field positions of the legacy formats are
//! configuration constants here rather than literals inside format strings,
//! so a writer and the reader it must round-trip with always agree.

use crate::constants;
use crate::error::{Result, VfpError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Fixed-column layout used when writing GEO files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLayout {
    /// Width of every real field
    pub real_width: usize,

    /// Width of every integer field
    pub int_width: usize,

    /// Decimal places for section scalars and surface coordinates
    pub coordinate_precision: usize,

    /// Decimal places for fuselage radius data
    pub radius_precision: usize,

    /// Decimal places for the end conditions on line 1
    pub header_precision: usize,
}

impl Default for GeoLayout {
    fn default() -> Self {
        Self {
            real_width: constants::geo::REAL_WIDTH,
            int_width: constants::geo::INT_WIDTH,
            coordinate_precision: constants::geo::COORDINATE_PRECISION,
            radius_precision: constants::geo::RADIUS_PRECISION,
            header_precision: constants::geo::HEADER_PRECISION,
        }
    }
}

impl GeoLayout {
    /// Largest difference a write/read cycle may introduce in a coordinate
    pub fn coordinate_tolerance(&self) -> f64 {
        10f64.powi(-(self.coordinate_precision as i32))
    }

    /// Largest difference a write/read cycle may introduce in a radius pair
    pub fn radius_tolerance(&self) -> f64 {
        10f64.powi(-(self.radius_precision as i32))
    }

    fn validate(&self) -> Result<()> {
        if self.real_width == 0 || self.int_width == 0 {
            return Err(VfpError::Configuration {
                message: "GEO field widths must be positive".to_string(),
            });
        }
        let widest = self
            .coordinate_precision
            .max(self.radius_precision)
            .max(self.header_precision);
        // "0." plus the decimals must fit in a real field
        if widest + 2 > self.real_width {
            return Err(VfpError::Configuration {
                message: format!(
                    "precision {} leaves no room for the integer part in a {}-column field",
                    widest, self.real_width
                ),
            });
        }
        Ok(())
    }
}

/// Layout of the level blocks in a flow condition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowLayout {
    /// Lines in every level block
    pub block_lines: usize,

    /// First token of a level block
    pub level_token: String,

    /// Whitespace field holding the Mach number
    pub mach_field: usize,

    /// Whitespace field holding the angle of attack
    pub aoa_field: usize,

    /// Whitespace field whose leading digit marks a continuation run
    pub restart_field: usize,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self {
            block_lines: constants::flow::BLOCK_LINES,
            level_token: constants::flow::LEVEL_TOKEN.to_string(),
            mach_field: constants::flow::MACH_FIELD,
            aoa_field: constants::flow::AOA_FIELD,
            restart_field: constants::flow::RESTART_FIELD,
        }
    }
}

/// Which levels of a multi-level report to keep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPolicy {
    /// Every level, keyed by level number
    #[default]
    All,
    /// Only the given level (the legacy summary tools read level 1)
    Only(u32),
}

impl LevelPolicy {
    pub fn accepts(&self, level: u32) -> bool {
        match self {
            LevelPolicy::All => true,
            LevelPolicy::Only(wanted) => *wanted == level,
        }
    }
}

/// Report parser settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub levels: LevelPolicy,
}

/// Angle-of-attack sweep settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOptions {
    /// Flag trimmed sweep members as continuation runs
    pub mark_continuation: bool,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            mark_continuation: true,
        }
    }
}

/// Global configuration for VFP file processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VfpConfig {
    /// GEO writer layout
    pub geo: GeoLayout,

    /// Flow condition block layout
    pub flow: FlowLayout,

    /// Report parser settings
    pub reports: ReportConfig,

    /// Sweep generation settings
    pub sweep: SweepOptions,

    /// Maximum files parsed at once by the batch processor
    pub max_concurrent_files: usize,
}

impl Default for VfpConfig {
    fn default() -> Self {
        Self {
            geo: GeoLayout::default(),
            flow: FlowLayout::default(),
            reports: ReportConfig::default(),
            sweep: SweepOptions::default(),
            max_concurrent_files: num_cpus::get(),
        }
    }
}

impl VfpConfig {
    /// Load a JSON configuration file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: VfpConfig = serde_json::from_str(&text)?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Set the GEO writer layout
    pub fn with_geo_layout(mut self, layout: GeoLayout) -> Self {
        self.geo = layout;
        self
    }

    /// Set the flow block layout
    pub fn with_flow_layout(mut self, layout: FlowLayout) -> Self {
        self.flow = layout;
        self
    }

    /// Restrict report parsing to one level
    pub fn with_level_policy(mut self, levels: LevelPolicy) -> Self {
        self.reports.levels = levels;
        self
    }

    /// Do not flag sweep members as continuation runs
    pub fn without_continuation(mut self) -> Self {
        self.sweep.mark_continuation = false;
        self
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    /// Reject settings no file could be read or written with
    pub fn validate(&self) -> Result<()> {
        self.geo.validate()?;

        if self.flow.block_lines == 0 {
            return Err(VfpError::Configuration {
                message: "flow level blocks must span at least one line".to_string(),
            });
        }
        if self.flow.level_token.trim().is_empty() {
            return Err(VfpError::Configuration {
                message: "flow level token must not be blank".to_string(),
            });
        }
        // Field 0 is the level token itself
        for (name, field) in [
            ("mach_field", self.flow.mach_field),
            ("aoa_field", self.flow.aoa_field),
            ("restart_field", self.flow.restart_field),
        ] {
            if field == 0 {
                return Err(VfpError::Configuration {
                    message: format!("flow {name} must follow the level token (got 0)"),
                });
            }
        }
        if self.max_concurrent_files == 0 {
            return Err(VfpError::Configuration {
                message: "max_concurrent_files must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
