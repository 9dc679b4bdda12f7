// Shows the three views of a toy task side by side while a random agent
// moves its gaze. Run with `cargo run --example foveate`.

use active_vision_gym::{ActiveVision, Env, Frame, Info, PixelEnv, Step};
use minifb::{Key, Window, WindowOptions};
use ndarray::{s, Array3};
use rand::Rng;

const SIZE: usize = 160;

/// A bright square drifting across a dark field. The task has one action
/// (reverse direction); every other index is ignored.
struct DriftEnv {
    pos: i64,
    vel: i64,
}

impl Env for DriftEnv {
    type Obs = i64;
    type Act = u32;

    fn reset(&mut self, _seed: Option<u64>) -> (Self::Obs, Info) {
        self.pos = 0;
        self.vel = 1;
        (self.pos, Info::new())
    }

    fn step(&mut self, action: Self::Act) -> Step<Self::Obs> {
        if action == 0 { self.vel = -self.vel; }
        self.pos = (self.pos + self.vel).rem_euclid((SIZE - 20) as i64);
        Step::new(self.pos, 0.0, false, false, Info::new())
    }
}

impl PixelEnv for DriftEnv {
    fn frame(&self) -> Frame {
        let mut f = Array3::from_elem((SIZE, SIZE, 3), 30u8);
        let p = self.pos as usize;
        f.slice_mut(s![p..p + 20, p..p + 20, ..]).fill(230);
        f
    }
}

fn blit(buffer: &mut [u32], stride: usize, x0: usize, view: &Frame) {
    let (h, w, _) = view.dim();
    for r in 0..h {
        for c in 0..w {
            let (red, g, b) = (view[[r, c, 0]] as u32, view[[r, c, 1]] as u32, view[[r, c, 2]] as u32);
            buffer[r * stride + x0 + c] = (red << 16) | (g << 8) | b;
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut env = ActiveVision::new(DriftEnv { pos: 0, vel: 1 }, 1);
    let _ = env.reset(Some(0));
    let n = env.action_space().n();

    let width = SIZE * 3;
    let mut window = Window::new("active-vision-gym: full | fovea | peripheral", width, SIZE, WindowOptions::default())
        .expect("Unable to open window");
    let mut buffer: Vec<u32> = vec![0; width * SIZE];
    let mut rng = rand::thread_rng();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let action = rng.gen_range(0..n);
        let obs = env.step(action).observation;

        buffer.iter_mut().for_each(|p| *p = 0);
        blit(&mut buffer, width, 0, &obs.full);
        blit(&mut buffer, width, SIZE, &obs.fovea);
        blit(&mut buffer, width, 2 * SIZE, &obs.peripheral);
        window.update_with_buffer(&buffer, width, SIZE).expect("Failed to update window buffer");
    }
}
