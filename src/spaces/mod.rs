//! Action and observation space descriptors.

pub mod space;

use ndarray::Array3;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::vision::{FoveatedObservation, FULL, FOVEA, PERIPHERAL};

pub use space::Space;

/// A discrete space of integers in [0, n).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Discrete {
    n: u32,
}

impl Discrete {
    pub fn new(n: u32) -> Self {
        assert!(n > 0, "Discrete space requires n > 0");
        Self { n }
    }

    pub fn n(&self) -> u32 { self.n }
}

impl Space for Discrete {
    type Element = u32;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        if self.n == 1 { return 0; }
        Uniform::from(0..self.n).sample(rng)
    }

    fn contains(&self, elem: &Self::Element) -> bool { *elem < self.n }
}

/// A pixel-array space of shape `(height, width, channels)` whose values lie in
/// the inclusive range `[low, high]`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelBox {
    shape: [usize; 3],
    low: u8,
    high: u8,
}

impl PixelBox {
    pub fn new(height: usize, width: usize, channels: usize, low: u8, high: u8) -> Self {
        assert!(low <= high, "PixelBox requires low <= high ({low} > {high})");
        Self { shape: [height, width, channels], low, high }
    }

    /// Full 8-bit range, `[0, 255]`.
    pub fn rgb(height: usize, width: usize) -> Self { Self::new(height, width, 3, 0, 255) }

    /// `[height, width, channels]`.
    pub fn shape(&self) -> [usize; 3] { self.shape }
    pub fn low(&self) -> u8 { self.low }
    pub fn high(&self) -> u8 { self.high }
}

impl Space for PixelBox {
    type Element = Array3<u8>;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        let dist = Uniform::new_inclusive(self.low, self.high);
        let [h, w, c] = self.shape;
        Array3::from_shape_simple_fn((h, w, c), || dist.sample(&mut *rng))
    }

    fn contains(&self, elem: &Self::Element) -> bool {
        elem.shape() == self.shape.as_slice()
            && elem.iter().all(|&v| self.low <= v && v <= self.high)
    }
}

/// Composite observation space with one [`PixelBox`] per view.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoveatedSpace {
    pub full: PixelBox,
    pub fovea: PixelBox,
    pub peripheral: PixelBox,
}

impl FoveatedSpace {
    /// Look a sub-space up by view name (`"full"`, `"fovea"`, `"peripheral"`).
    pub fn get(&self, key: &str) -> Option<&PixelBox> {
        match key {
            FULL => Some(&self.full),
            FOVEA => Some(&self.fovea),
            PERIPHERAL => Some(&self.peripheral),
            _ => None,
        }
    }

    pub fn keys(&self) -> [&'static str; 3] { [FULL, FOVEA, PERIPHERAL] }
}

impl Space for FoveatedSpace {
    type Element = FoveatedObservation;

    /// Views are sampled independently; they are not co-registered.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        FoveatedObservation {
            full: self.full.sample(rng),
            fovea: self.fovea.sample(rng),
            peripheral: self.peripheral.sample(rng),
        }
    }

    fn contains(&self, elem: &Self::Element) -> bool {
        self.full.contains(&elem.full)
            && self.fovea.contains(&elem.fovea)
            && self.peripheral.contains(&elem.peripheral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::rng_from_seed;

    #[test]
    fn discrete_samples_stay_in_range() {
        let mut rng = rng_from_seed(42);
        let d = Discrete::new(10);
        for v in d.sample_n(&mut rng, 200) {
            assert!(d.contains(&v));
        }
        assert!(!d.contains(&10));
        assert_eq!(Discrete::new(1).sample(&mut rng), 0);
    }

    #[test]
    #[should_panic(expected = "n > 0")]
    fn discrete_rejects_empty() {
        let _ = Discrete::new(0);
    }

    #[test]
    fn pixel_box_checks_shape_and_range() {
        let mut rng = rng_from_seed(7);
        let b = PixelBox::new(4, 6, 3, 10, 20);
        let s = b.sample(&mut rng);
        assert_eq!(s.shape(), &[4, 6, 3]);
        assert!(b.contains(&s));

        let wrong_shape = Array3::<u8>::from_elem((6, 4, 3), 15);
        assert!(!b.contains(&wrong_shape));
        let out_of_range = Array3::<u8>::from_elem((4, 6, 3), 21);
        assert!(!b.contains(&out_of_range));
    }

    #[test]
    fn pixel_box_rgb_is_full_range() {
        let b = PixelBox::rgb(2, 3);
        assert_eq!(b.shape(), [2, 3, 3]);
        assert_eq!((b.low(), b.high()), (0, 255));
        assert!(b.contains(&Array3::from_elem((2, 3, 3), 255)));
    }

    #[test]
    fn foveated_space_lookup_by_key() {
        let space = FoveatedSpace {
            full: PixelBox::rgb(8, 8),
            fovea: PixelBox::rgb(2, 2),
            peripheral: PixelBox::rgb(8, 8),
        };
        assert_eq!(space.get("fovea").map(|b| b.shape()), Some([2, 2, 3]));
        assert!(space.get("retina").is_none());
        for key in space.keys() {
            assert!(space.get(key).is_some());
        }

        let mut rng = rng_from_seed(3);
        let obs = space.sample(&mut rng);
        assert!(space.contains(&obs));
    }
}
