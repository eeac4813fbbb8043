//! Rendering configuration.

use serde::{Deserialize, Serialize};
use sky_lut::{DEFAULT_GAMMA, GammaTable};

/// Configuration for a rendering context.
///
/// Applied at engine construction; the gamma table is built once from it
/// and shared by every worker the engine spawns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Perceptual gamma exponent. `1.0` disables correction.
    pub gamma: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { gamma: DEFAULT_GAMMA }
    }
}

impl RenderConfig {
    /// Builds the gamma table for this configuration.
    ///
    /// The default gamma reuses the process-wide cached table.
    pub fn gamma_table(&self) -> GammaTable {
        if self.gamma == DEFAULT_GAMMA {
            GammaTable::shared().clone()
        } else {
            GammaTable::build(self.gamma)
        }
    }
}
