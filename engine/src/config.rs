//! Editor configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::{self, VarError};
use std::str::FromStr;

use crate::consts::{GRID_SIZE, HIT_TOLERANCE_PX, NUDGE_STEP, NUDGE_STEP_LARGE, PASTE_OFFSET, SIMPLIFY_TOLERANCE};

/// Configuration failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{var} is not valid unicode")]
    NotUnicode { var: &'static str },
}

/// Tunable editor behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Snap step in world units while the scene grid is on.
    pub grid_size: f64,
    /// Arrow-key nudge distance.
    pub nudge_step: f64,
    /// Arrow-key nudge distance with shift held.
    pub nudge_step_large: f64,
    /// Keep drawing tools active after a create gesture.
    pub tool_lock: bool,
    /// RDP tolerance applied to freehand strokes.
    pub simplify_tolerance: f64,
    /// Hit slop in screen pixels.
    pub hit_tolerance: f64,
    /// Offset applied to pasted and duplicated elements.
    pub paste_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            nudge_step: NUDGE_STEP,
            nudge_step_large: NUDGE_STEP_LARGE,
            tool_lock: false,
            simplify_tolerance: SIMPLIFY_TOLERANCE,
            hit_tolerance: HIT_TOLERANCE_PX,
            paste_offset: PASTE_OFFSET,
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// - `FOLIO_GRID_SIZE`: default 20
    /// - `FOLIO_NUDGE_STEP`: default 1
    /// - `FOLIO_NUDGE_STEP_LARGE`: default 10
    /// - `FOLIO_TOOL_LOCK`: `true`/`false`, default false
    /// - `FOLIO_SIMPLIFY_TOLERANCE`: default 0.5
    /// - `FOLIO_HIT_TOLERANCE`: default 8 (screen pixels)
    /// - `FOLIO_PASTE_OFFSET`: default 20
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set but does not parse, or when a
    /// size or step is not positive.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            grid_size: env_positive("FOLIO_GRID_SIZE", defaults.grid_size)?,
            nudge_step: env_positive("FOLIO_NUDGE_STEP", defaults.nudge_step)?,
            nudge_step_large: env_positive("FOLIO_NUDGE_STEP_LARGE", defaults.nudge_step_large)?,
            tool_lock: env_parse("FOLIO_TOOL_LOCK", defaults.tool_lock)?,
            simplify_tolerance: env_non_negative("FOLIO_SIMPLIFY_TOLERANCE", defaults.simplify_tolerance)?,
            hit_tolerance: env_non_negative("FOLIO_HIT_TOLERANCE", defaults.hit_tolerance)?,
            paste_offset: env_parse("FOLIO_PASTE_OFFSET", defaults.paste_offset)?,
        })
    }
}

fn env_parse<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { var, value: raw }),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var }),
    }
}

fn env_positive(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = env_parse(var, default)?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::Invalid { var, value: value.to_string() })
    }
}

fn env_non_negative(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = env_parse(var, default)?;
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::Invalid { var, value: value.to_string() })
    }
}
