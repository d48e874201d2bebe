//! Complex numbers.

/// A complex number in Cartesian form.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

/// Complex number with `f32` parts.
pub type Complex32 = Complex<f32>;
/// Complex number with `f64` parts.
pub type Complex64 = Complex<f64>;

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

impl From<Complex32> for Complex64 {
    fn from(c: Complex32) -> Self {
        Self::new(c.re as f64, c.im as f64)
    }
}
