//! Active vision for Gymnasium-style pixel tasks.
//!
//! A [`FoveaController`] owns a gaze point steered by four discrete actions
//! appended after a task's own actions, and splits each rendered frame into
//! `full`, `fovea` and `peripheral` views. [`ActiveVision`] plugs the
//! controller into any [`PixelEnv`] task.

pub mod core;
pub mod spaces;
pub mod utils;
pub mod vision;
pub mod wrappers;

pub use crate::core::{Env, GymError, Info, InfoValue, RenderFrame, Result, Step};
pub use crate::spaces::{Discrete, FoveatedSpace, PixelBox, Space};
pub use crate::vision::{
    FoveaConfig, FoveaController, FoveaSpaceShape, FoveaWindow, FoveatedObservation, Frame, Gaze, GazeAction, KwArgs,
};
pub use crate::wrappers::{ActiveVision, PixelEnv};
pub use crate::utils::{encode_png, encode_view_png, save_png};

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{s, Array3};

    /// A counting-style task: the frame shows `count` lit columns.
    struct CountingEnv {
        count: usize,
    }

    impl Env for CountingEnv {
        type Obs = usize;
        type Act = u32;

        fn reset(&mut self, _seed: Option<u64>) -> (Self::Obs, Info) {
            self.count = 0;
            (self.count, Info::new())
        }

        fn step(&mut self, action: Self::Act) -> Step<Self::Obs> {
            if action == 0 { self.count += 1; }
            Step::new(self.count, 0.0, self.count >= 8, false, Info::new())
        }

        fn render(&self) -> Option<RenderFrame> {
            let frame = self.frame();
            vision::render_from_frame(&frame).ok()
        }
    }

    impl PixelEnv for CountingEnv {
        fn frame(&self) -> Frame {
            let mut f = Array3::zeros((40, 40, 3));
            for i in 0..self.count.min(40) {
                f.slice_mut(s![.., i, ..]).fill(200);
            }
            f
        }
    }

    #[test]
    fn counting_task_behind_a_fovea() {
        let mut env = ActiveVision::new(CountingEnv { count: 0 }, 2);
        let (obs, _info) = env.reset(Some(1));
        assert!(obs.fovea.iter().all(|&v| v == 0));

        for _ in 0..4 {
            env.step(0);
        }
        let right = env.controller().action_index(GazeAction::Right);
        let s = env.step(right);
        assert_eq!(env.gaze(), Gaze::new(0, 1));
        // fovea spans columns 1..5; columns 0..4 are lit
        assert_eq!(s.observation.fovea.dim(), (4, 4, 3));
        assert!(s.observation.fovea.slice(s![.., 0..3, ..]).iter().all(|&v| v == 200));
        assert!(s.observation.fovea.slice(s![.., 3, ..]).iter().all(|&v| v == 0));
        assert!(s.observation.peripheral.slice(s![0..4, 1..5, ..]).iter().all(|&v| v == 0));
        assert_eq!(s.observation.peripheral[[4, 1, 0]], 200);
        assert!(matches!(env.render(), Some(RenderFrame::Pixels { width: 40, height: 40, .. })));
        env.close();
    }

    #[test]
    fn observations_fit_declared_window_space() {
        let cfg = FoveaConfig::new(1).with_fovea_space(FoveaSpaceShape::Window);
        let mut env = ActiveVision::with_config(CountingEnv { count: 0 }, &cfg).expect("valid config");
        let (obs, _) = env.reset(None);
        assert!(env.observation_space().contains(&obs));
    }

    #[cfg(not(feature = "image"))]
    #[test]
    fn encode_png_without_feature_not_supported() {
        let frame = RenderFrame::Pixels { width: 2, height: 2, data: vec![255, 0, 0, 255,  0, 255, 0, 255,  0, 0, 255, 255,  255, 255, 255, 255] };
        let err = encode_png(&frame).unwrap_err();
        match err {
            GymError::NotSupported(_) => {}
            other => panic!("Expected NotSupported, got {:?}", other),
        }
    }
}
