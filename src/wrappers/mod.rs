// Active vision wrapper: composes a pixel task with a FoveaController.

use crate::core::{Env, Info, RenderFrame, Result, Step};
use crate::spaces::{Discrete, FoveatedSpace};
use crate::vision::{FoveaConfig, FoveaController, FoveatedObservation, Frame, Gaze};

/// A task environment that can hand out its current frame as `(height, width, channels)`.
pub trait PixelEnv: Env {
    fn frame(&self) -> Frame;
}

/// Wraps a pixel task so the agent only sees it through a movable fovea.
///
/// Every action is forwarded to the task, which treats indices outside its own
/// range as no-ops. Gaze actions additionally move the gaze. Observations are
/// derived from the task's frame after the task has stepped.
pub struct ActiveVision<E: PixelEnv<Act = u32>> {
    inner: E,
    controller: FoveaController,
    time: u64,
}

impl<E: PixelEnv<Act = u32>> ActiveVision<E> {
    /// Wrap `inner`, whose own action range is `[0, num_actions)`, with the default fovea.
    pub fn new(inner: E, num_actions: u32) -> Self {
        Self { inner, controller: FoveaController::new(num_actions), time: 0 }
    }

    pub fn with_config(inner: E, config: &FoveaConfig) -> Result<Self> {
        Ok(Self { inner, controller: FoveaController::from_config(config)?, time: 0 })
    }

    pub fn inner(&self) -> &E { &self.inner }
    pub fn inner_mut(&mut self) -> &mut E { &mut self.inner }
    pub fn into_inner(self) -> E { self.inner }

    pub fn controller(&self) -> &FoveaController { &self.controller }
    pub fn gaze(&self) -> Gaze { self.controller.gaze() }

    pub fn action_space(&self) -> Discrete { self.controller.action_space() }

    /// Observation space sized from the task's current frame.
    pub fn observation_space(&self) -> FoveatedSpace {
        let (h, w, c) = self.inner.frame().dim();
        self.controller.observation_space_with(w, h, c, 0, 255)
    }

    fn observe(&self) -> FoveatedObservation {
        self.controller.observe(&self.inner.frame())
    }

    fn gaze_info(&self) -> Info {
        let gaze = self.controller.gaze();
        let mut info = Info::new();
        info.insert("gaze_row", gaze.row);
        info.insert("gaze_col", gaze.col);
        info
    }
}

impl<E: PixelEnv<Act = u32>> Env for ActiveVision<E> {
    type Obs = FoveatedObservation;
    type Act = u32;

    fn reset(&mut self, seed: Option<u64>) -> (Self::Obs, Info) {
        let (_, mut info) = self.inner.reset(seed);
        self.controller.reset();
        self.time = 0;
        info.extend(self.gaze_info());
        (self.observe(), info)
    }

    fn step(&mut self, action: Self::Act) -> Step<Self::Obs> {
        let movement = self.controller.apply_action(action, self.time);
        self.time += 1;
        let s = self.inner.step(action);
        let obs = self.observe();

        let mut info = s.info;
        info.extend(self.gaze_info());
        if let Some(m) = movement {
            info.insert("gaze_action", m.name());
        }
        Step::new(obs, s.reward, s.terminated, s.truncated, info)
    }

    fn render(&self) -> Option<RenderFrame> { self.inner.render() }
    fn close(&mut self) { self.inner.close() }
}
