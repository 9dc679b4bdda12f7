//! Gaze-controlled foveated observations.
//!
//! The agent does not see the rendered frame directly. It steers a gaze point
//! with four extra discrete actions appended after the task's own actions and
//! receives three co-registered views of every frame:
//!
//! - `full`: the frame, unmodified
//! - `fovea`: a window cropped at the gaze, `floor(h * f) x floor(w * f)` pixels
//! - `peripheral`: the frame with that same window zeroed
//!
//! The gaze is not clamped. Windows that leave the frame are truncated (or
//! become empty) using Python slice semantics, never an error.

pub mod frame;

use std::collections::HashMap;
use std::ops::Range;

use ndarray::s;

use crate::core::{GymError, Result};
use crate::spaces::{Discrete, FoveatedSpace, PixelBox};

pub use frame::{frame_from_render, render_from_frame, Frame};

pub const FULL: &str = "full";
pub const FOVEA: &str = "fovea";
pub const PERIPHERAL: &str = "peripheral";

/// Number of gaze actions appended after the task actions.
pub const GAZE_ACTIONS: u32 = 4;

/// Stringly-typed constructor arguments, e.g. forwarded from a task factory.
pub type KwArgs = HashMap<String, String>;

/// One of the four gaze movements, in action-index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum GazeAction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl GazeAction {
    pub const ALL: [GazeAction; 4] = [GazeAction::Up, GazeAction::Down, GazeAction::Left, GazeAction::Right];

    /// Unit `(row, col)` delta.
    pub fn delta(self) -> (i64, i64) {
        match self {
            GazeAction::Up => (-1, 0),
            GazeAction::Down => (1, 0),
            GazeAction::Left => (0, -1),
            GazeAction::Right => (0, 1),
        }
    }

    /// Offset of this movement inside the gaze-action range.
    pub fn offset(self) -> u32 { self as u32 }

    pub fn from_offset(offset: u32) -> Option<Self> {
        Self::ALL.get(offset as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            GazeAction::Up => "up",
            GazeAction::Down => "down",
            GazeAction::Left => "left",
            GazeAction::Right => "right",
        }
    }
}

/// Fixation point in `(row, col)` pixel coordinates. May lie outside the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gaze {
    pub row: i64,
    pub col: i64,
}

impl Gaze {
    pub const ORIGIN: Gaze = Gaze { row: 0, col: 0 };

    pub fn new(row: i64, col: i64) -> Self { Self { row, col } }

    pub fn moved(self, action: GazeAction) -> Self {
        let (dr, dc) = action.delta();
        Self { row: self.row + dr, col: self.col + dc }
    }
}

/// Shape declared for the `fovea` sub-space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FoveaSpaceShape {
    /// Same shape as the full frame, although actual crops are smaller.
    #[default]
    MatchFrame,
    /// The nominal window shape `floor(h * f) x floor(w * f)`.
    Window,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoveaConfig {
    /// Size of the task-specific action range.
    pub num_actions: u32,
    /// Fraction of each linear frame dimension covered by the fovea.
    pub fov_fraction: f64,
    pub fovea_space: FoveaSpaceShape,
}

impl Default for FoveaConfig {
    fn default() -> Self {
        Self { num_actions: 0, fov_fraction: 0.1, fovea_space: FoveaSpaceShape::MatchFrame }
    }
}

impl FoveaConfig {
    pub fn new(num_actions: u32) -> Self { Self { num_actions, ..Self::default() } }

    pub fn with_fov_fraction(mut self, fov_fraction: f64) -> Self {
        self.fov_fraction = fov_fraction;
        self
    }

    pub fn with_fovea_space(mut self, shape: FoveaSpaceShape) -> Self {
        self.fovea_space = shape;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fov_fraction.is_finite() || !(0.0..=1.0).contains(&self.fov_fraction) {
            return Err(GymError::InvalidConfig(format!(
                "fov_fraction must be within [0, 1], got {}",
                self.fov_fraction
            )));
        }
        if !fits_action_space(self.num_actions) {
            return Err(GymError::InvalidConfig(format!("num_actions {} is too large", self.num_actions)));
        }
        Ok(())
    }

    /// Build from string kwargs. Recognised keys: `num_actions` (required),
    /// `fov_fraction`, `fovea_space` (`"frame"` or `"window"`). Unknown keys
    /// are left for the task to consume.
    pub fn from_kwargs(kwargs: &KwArgs) -> Result<Self> {
        let num_actions = kwargs
            .get("num_actions")
            .ok_or_else(|| GymError::InvalidConfig("missing num_actions".into()))?
            .trim()
            .parse::<u32>()
            .map_err(|e| GymError::InvalidConfig(format!("num_actions: {e}")))?;
        let mut config = Self::new(num_actions);
        if let Some(v) = kwargs.get("fov_fraction") {
            config.fov_fraction = v
                .trim()
                .parse::<f64>()
                .map_err(|e| GymError::InvalidConfig(format!("fov_fraction: {e}")))?;
        }
        if let Some(v) = kwargs.get("fovea_space") {
            config.fovea_space = match v.trim() {
                "frame" => FoveaSpaceShape::MatchFrame,
                "window" => FoveaSpaceShape::Window,
                other => return Err(GymError::InvalidConfig(format!("unknown fovea_space {other:?}"))),
            };
        }
        config.validate()?;
        Ok(config)
    }
}

/// Whether `2 * num_actions + 4` action indices fit in a `u32`.
fn fits_action_space(num_actions: u32) -> bool {
    num_actions.checked_mul(2).and_then(|n| n.checked_add(GAZE_ACTIONS)).is_some()
}

/// Resolved crop bounds shared by `fovea` and the blanked region of `peripheral`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoveaWindow {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl FoveaWindow {
    pub fn is_empty(&self) -> bool { self.rows.is_empty() || self.cols.is_empty() }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.rows.contains(&row) && self.cols.contains(&col)
    }
}

/// The three views derived from one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FoveatedObservation {
    pub full: Frame,
    pub fovea: Frame,
    pub peripheral: Frame,
}

impl FoveatedObservation {
    pub fn get(&self, key: &str) -> Option<&Frame> {
        match key {
            FULL => Some(&self.full),
            FOVEA => Some(&self.fovea),
            PERIPHERAL => Some(&self.peripheral),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Frame)> {
        [(FULL, &self.full), (FOVEA, &self.fovea), (PERIPHERAL, &self.peripheral)].into_iter()
    }
}

/// Owns the gaze and turns frames into foveated observations.
#[derive(Clone, Debug)]
pub struct FoveaController {
    gaze: Gaze,
    fov_fraction: f64,
    fovea_space: FoveaSpaceShape,
    num_actions: u32,
    actions_start: u32,
    actions_end: u32,
}

impl FoveaController {
    /// Controller for a task with `num_actions` task actions and the default fovea fraction.
    ///
    /// Panics if `2 * num_actions + 4` does not fit in a `u32`.
    pub fn new(num_actions: u32) -> Self {
        assert!(fits_action_space(num_actions), "num_actions {num_actions} leaves no room for the gaze actions");
        Self::build(&FoveaConfig::new(num_actions))
    }

    pub fn from_config(config: &FoveaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &FoveaConfig) -> Self {
        Self {
            gaze: Gaze::ORIGIN,
            fov_fraction: config.fov_fraction,
            fovea_space: config.fovea_space,
            num_actions: config.num_actions,
            actions_start: config.num_actions,
            actions_end: config.num_actions + GAZE_ACTIONS,
        }
    }

    pub fn gaze(&self) -> Gaze { self.gaze }
    pub fn fov_fraction(&self) -> f64 { self.fov_fraction }
    pub fn num_actions(&self) -> u32 { self.num_actions }

    /// Half-open range of action indices that move the gaze.
    pub fn gaze_actions(&self) -> Range<u32> { self.actions_start..self.actions_end }

    /// The gaze movement an action index maps to, if any.
    pub fn gaze_action(&self, action: u32) -> Option<GazeAction> {
        if self.gaze_actions().contains(&action) {
            GazeAction::from_offset(action - self.actions_start)
        } else {
            None
        }
    }

    /// Action index that triggers `movement`.
    pub fn action_index(&self, movement: GazeAction) -> u32 { self.actions_start + movement.offset() }

    /// `Discrete(num_actions + actions_end)`, i.e. `2 * num_actions + 4`.
    /// The task range is counted twice; this sizing is kept for compatibility
    /// with agents trained against it.
    pub fn action_space(&self) -> Discrete {
        Discrete::new(self.num_actions + self.actions_end)
    }

    /// RGB observation space over `[0, 255]`.
    pub fn observation_space(&self, width: usize, height: usize) -> FoveatedSpace {
        self.observation_space_with(width, height, 3, 0, 255)
    }

    pub fn observation_space_with(&self, width: usize, height: usize, channels: usize, low: u8, high: u8) -> FoveatedSpace {
        let frame = PixelBox::new(height, width, channels, low, high);
        let fovea = match self.fovea_space {
            FoveaSpaceShape::MatchFrame => frame.clone(),
            FoveaSpaceShape::Window => {
                let (ph, pw) = self.window_size(height, width);
                PixelBox::new(ph, pw, channels, low, high)
            }
        };
        FoveatedSpace { full: frame.clone(), fovea, peripheral: frame }
    }

    pub fn reset(&mut self) {
        self.gaze = Gaze::ORIGIN;
    }

    /// Move the gaze if `action` is a gaze action; any other index is left to
    /// the task. `time` is only recorded in the trace.
    pub fn apply_action(&mut self, action: u32, time: u64) -> Option<GazeAction> {
        tracing::debug!(action, time, "received action");
        let movement = self.gaze_action(action)?;
        self.gaze = self.gaze.moved(movement);
        tracing::debug!(row = self.gaze.row, col = self.gaze.col, movement = movement.name(), "new gaze");
        Some(movement)
    }

    /// Nominal `(rows, cols)` of the fovea for a frame of the given size.
    pub fn window_size(&self, height: usize, width: usize) -> (usize, usize) {
        let ph = (height as f64 * self.fov_fraction).floor() as usize;
        let pw = (width as f64 * self.fov_fraction).floor() as usize;
        (ph, pw)
    }

    /// Crop bounds at the current gaze, truncated to the frame.
    pub fn window(&self, height: usize, width: usize) -> FoveaWindow {
        let (ph, pw) = self.window_size(height, width);
        let window = FoveaWindow {
            rows: frame::slice_bounds(self.gaze.row, ph, height),
            cols: frame::slice_bounds(self.gaze.col, pw, width),
        };
        tracing::trace!(?window, ph, pw, "fovea window");
        if window.is_empty() && ph > 0 && pw > 0 {
            tracing::warn!(row = self.gaze.row, col = self.gaze.col, "gaze is off-frame, fovea is empty");
        }
        window
    }

    /// Derive `full`, `fovea` and `peripheral` from a frame.
    pub fn observe(&self, frame: &Frame) -> FoveatedObservation {
        let (h, w, _) = frame.dim();
        let FoveaWindow { rows, cols } = self.window(h, w);
        let fovea = frame.slice(s![rows.clone(), cols.clone(), ..]).to_owned();
        let mut peripheral = frame.clone();
        peripheral.slice_mut(s![rows, cols, ..]).fill(0);

        FoveatedObservation { full: frame.clone(), fovea, peripheral }
    }
}
