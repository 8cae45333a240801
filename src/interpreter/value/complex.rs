use std::{fmt,
          ops::{Add, Div, Mul, Neg, Sub}};

/// A complex number with 64-bit floating point components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexNumber {
    pub real: f64,
    pub imag: f64,
}

impl ComplexNumber {
    /// Creates a new complex number from its real and imaginary parts.
    ///
    /// # Example
    /// ```
    /// use calcora::interpreter::value::complex::ComplexNumber;
    ///
    /// let z = ComplexNumber::new(3.0, -4.0);
    /// assert_eq!(z.real,  3.0);
    /// assert_eq!(z.imag, -4.0);
    /// ```
    pub const fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    /// Creates a complex number with a zero imaginary part.
    pub const fn from_real(real: f64) -> Self {
        Self { real, imag: 0.0 }
    }

    /// Returns the magnitude (absolute value) of the complex number.
    pub fn magnitude(&self) -> f64 {
        self.real.hypot(self.imag)
    }

    /// Returns `true` if the imaginary part is exactly zero.
    pub fn is_real(&self) -> bool {
        self.imag == 0.0
    }
}

impl Add for ComplexNumber {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.real + rhs.real, self.imag + rhs.imag)
    }
}

impl Sub for ComplexNumber {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.real - rhs.real, self.imag - rhs.imag)
    }
}

impl Mul for ComplexNumber {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.real * rhs.real - self.imag * rhs.imag,
                  self.real * rhs.imag + self.imag * rhs.real)
    }
}

impl Div for ComplexNumber {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        let denominator = rhs.real * rhs.real + rhs.imag * rhs.imag;

        Self::new((self.real * rhs.real + self.imag * rhs.imag) / denominator,
                  (self.imag * rhs.real - self.real * rhs.imag) / denominator)
    }
}

impl Neg for ComplexNumber {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.real, -self.imag)
    }
}

impl fmt::Display for ComplexNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.imag == 0.0 {
            return write!(f, "{}", self.real);
        }

        if self.real == 0.0 {
            return write!(f, "{}i", self.imag);
        }

        if self.imag < 0.0 {
            write!(f, "{} - {}i", self.real, -self.imag)
        } else {
            write!(f, "{} + {}i", self.real, self.imag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplication_follows_i_squared_rule() {
        let i = ComplexNumber::new(0.0, 1.0);

        assert_eq!(i * i, ComplexNumber::new(-1.0, 0.0));
    }

    #[test]
    fn division_by_conjugate_is_real() {
        let z = ComplexNumber::new(3.0, 4.0);
        let w = z / z;

        assert_eq!(w, ComplexNumber::new(1.0, 0.0));
    }

    #[test]
    fn display_handles_signs() {
        assert_eq!(ComplexNumber::new(1.0, -2.0).to_string(), "1 - 2i");
        assert_eq!(ComplexNumber::new(0.0, 5.0).to_string(), "5i");
        assert_eq!(ComplexNumber::new(7.0, 0.0).to_string(), "7");
    }
}
