use rand::Rng;

/// Implemented by every space descriptor.
///
/// `Element` is the value type living in the space: `u32` for [`Discrete`](super::Discrete),
/// an `Array3<u8>` for [`PixelBox`](super::PixelBox), a whole foveated observation for
/// [`FoveatedSpace`](super::FoveatedSpace).
pub trait Space {
    type Element;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element;

    /// Return true if the given element is a valid member of the space.
    fn contains(&self, elem: &Self::Element) -> bool;

    /// Draw `n` independent samples.
    fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<Self::Element> {
        (0..n).map(|_| self.sample(&mut *rng)).collect()
    }
}
