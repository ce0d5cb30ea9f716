//! Rational number type for exact time and rate arithmetic.

use crate::error::{RationalError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

/// A rational number represented as a numerator and denominator.
///
/// Values are always kept in lowest terms with a positive denominator, so
/// two rationals that denote the same number compare equal field by field.
/// Intermediate products are computed in `i128` and narrowed after
/// reduction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRational", into = "RawRational")]
pub struct Rational {
    num: i64,
    den: i64,
}

#[derive(Serialize, Deserialize)]
struct RawRational {
    num: i64,
    den: i64,
}

impl Rational {
    /// Create a new rational number in lowest terms.
    ///
    /// # Panics
    ///
    /// Panics if denominator is zero, or if the reduced value is
    /// `i64::MIN / -1`.
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "Denominator cannot be zero");
        Self::from_wide(num as i128, den as i128).expect("reduced i64 ratio fits in i64")
    }

    /// Create a new rational number, rejecting a zero denominator.
    pub fn try_new(num: i64, den: i64) -> Result<Self> {
        if den == 0 {
            return Err(RationalError::ZeroDenominator);
        }
        Self::from_wide(num as i128, den as i128).ok_or(RationalError::Overflow)
    }

    /// Create a rational from an integer.
    pub const fn from_int(n: i64) -> Self {
        Self { num: n, den: 1 }
    }

    /// Create a zero rational.
    pub const fn zero() -> Self {
        Self { num: 0, den: 1 }
    }

    /// Create a rational representing one.
    pub const fn one() -> Self {
        Self { num: 1, den: 1 }
    }

    /// Numerator of the reduced fraction.
    pub const fn num(&self) -> i64 {
        self.num
    }

    /// Denominator of the reduced fraction (always positive).
    pub const fn den(&self) -> i64 {
        self.den
    }

    /// Check if this rational is zero.
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Check if this rational is positive.
    pub fn is_positive(&self) -> bool {
        self.num > 0
    }

    /// Check if this rational is negative.
    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    /// Check if this rational is a whole number.
    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    /// Convert to f64.
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Self {
            num: self.num.abs(),
            den: self.den,
        }
    }

    /// Get the reciprocal of this rational.
    ///
    /// # Panics
    ///
    /// Panics if the numerator is zero.
    pub fn recip(&self) -> Self {
        assert!(self.num != 0, "Cannot take reciprocal of zero");
        Self::new(self.den, self.num)
    }

    /// Multiply by an integer.
    pub fn mul_int(&self, n: i64) -> Self {
        *self * Self::from_int(n)
    }

    /// Divide by an integer.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn div_int(&self, n: i64) -> Self {
        assert!(n != 0, "Cannot divide by zero");
        *self / Self::from_int(n)
    }

    /// Largest integer less than or equal to this value.
    pub fn floor(&self) -> i64 {
        self.num.div_euclid(self.den)
    }

    /// Integer part, truncated toward zero.
    pub fn trunc(&self) -> i64 {
        self.num / self.den
    }

    /// Fractional part, with the sign of the value.
    pub fn fract(&self) -> Self {
        *self - Self::from_int(self.trunc())
    }

    /// Round to the nearest integer, ties to even.
    pub fn round(&self) -> i64 {
        round_half_even(self.num as i128, self.den as i128) as i64
    }

    /// Round `self * factor` to the nearest integer, ties to even, without
    /// narrowing the intermediate product.
    pub fn mul_round(&self, factor: Self) -> i128 {
        round_half_even(
            self.num as i128 * factor.num as i128,
            self.den as i128 * factor.den as i128,
        )
    }

    /// Round to `digits` decimal places, ties to even.
    ///
    /// `Rational::new(2997, 100)` is what `30000/1001` rounds to at two
    /// digits.
    ///
    /// # Panics
    ///
    /// Panics if the scaled value does not fit in `i64`.
    pub fn round_to(&self, digits: u32) -> Self {
        let scale = 10i128.pow(digits);
        let scaled = round_half_even(self.num as i128 * scale, self.den as i128);
        Self::from_wide(scaled, scale).expect("rounded value fits in i64")
    }

    /// Checked addition.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let num = self.num as i128 * rhs.den as i128 + rhs.num as i128 * self.den as i128;
        Self::from_wide(num, self.den as i128 * rhs.den as i128)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.checked_add(-rhs)
    }

    /// Checked multiplication.
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        Self::from_wide(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }

    /// Checked division. Returns `None` when `rhs` is zero.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.num == 0 {
            return None;
        }
        Self::from_wide(
            self.num as i128 * rhs.den as i128,
            self.den as i128 * rhs.num as i128,
        )
    }

    /// Convert a float to the rational its shortest decimal form denotes.
    ///
    /// `23.976_f64` becomes `2997/125`, not the binary expansion of the
    /// double.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(RationalError::NonFinite(value.to_string()));
        }
        value.to_string().parse()
    }

    fn from_wide(num: i128, den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        if num == 0 {
            return Some(Self::zero());
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i128;
        Some(Self {
            num: i64::try_from(num / g).ok()?,
            den: i64::try_from(den / g).ok()?,
        })
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({}/{})", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// Decimal digits an `i128` can always hold.
const MAX_DECIMAL_PLACES: usize = 38;

/// `int_part.frac_part` rounded half up to `places` fraction digits, as a
/// numerator over `10^places`.
fn scaled_decimal(int_part: &str, frac_part: &str, places: usize) -> Option<(i128, i128)> {
    let mut num: i128 = 0;
    for b in int_part.bytes().chain(frac_part.bytes().take(places)) {
        num = num.checked_mul(10)?.checked_add(i128::from(b - b'0'))?;
    }
    if frac_part.as_bytes().get(places).is_some_and(|&b| b >= b'5') {
        num = num.checked_add(1)?;
    }
    let den = 10i128.checked_pow(u32::try_from(places).ok()?)?;
    Some((num, den))
}

impl FromStr for Rational {
    type Err = RationalError;

    /// Parse `"num/den"`, `"123"` or a decimal such as `"29.97"`.
    ///
    /// Decimals are exact unless the reduced value does not fit in `i64`;
    /// then the fraction is rounded half up to as many places as fit.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((num, den)) = s.split_once('/') {
            let num: i64 = num
                .trim()
                .parse()
                .map_err(|_| RationalError::parse(s))?;
            let den: i64 = den
                .trim()
                .parse()
                .map_err(|_| RationalError::parse(s))?;
            return Self::try_new(num, den);
        }

        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(RationalError::parse(s));
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(RationalError::parse(s));
        }

        // Exact when it fits, otherwise rounded to the most fraction digits
        // that do.
        let sign = if negative { -1 } else { 1 };
        (0..=frac_part.len().min(MAX_DECIMAL_PLACES))
            .rev()
            .find_map(|places| {
                let (num, den) = scaled_decimal(int_part, frac_part, places)?;
                Self::from_wide(sign * num, den)
            })
            .ok_or(RationalError::Overflow)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        lhs.cmp(&rhs)
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            num: -self.num,
            den: self.den,
        }
    }
}

impl Add for Rational {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the reduced sum does not fit in `i64`.
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect("rational addition overflowed")
    }
}

impl Sub for Rational {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the reduced difference does not fit in `i64`.
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect("rational subtraction overflowed")
    }
}

impl Mul for Rational {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the reduced product does not fit in `i64`.
    fn mul(self, rhs: Self) -> Self::Output {
        self.checked_mul(rhs).expect("rational multiplication overflowed")
    }
}

impl Div for Rational {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if `rhs` is zero or the quotient does not fit in `i64`.
    fn div(self, rhs: Self) -> Self::Output {
        assert!(rhs.num != 0, "Cannot divide by zero");
        self.checked_div(rhs).expect("rational division overflowed")
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Self::from_int(n as i64)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_int(n)
    }
}

impl From<u32> for Rational {
    fn from(n: u32) -> Self {
        Self::from_int(n as i64)
    }
}

impl TryFrom<(i64, i64)> for Rational {
    type Error = RationalError;

    fn try_from((num, den): (i64, i64)) -> Result<Self> {
        Self::try_new(num, den)
    }
}

impl TryFrom<RawRational> for Rational {
    type Error = RationalError;

    fn try_from(raw: RawRational) -> Result<Self> {
        Self::try_new(raw.num, raw.den)
    }
}

impl From<Rational> for RawRational {
    fn from(r: Rational) -> Self {
        Self { num: r.num, den: r.den }
    }
}

/// Divide with ties rounded to the even neighbour. `den` must be positive.
fn round_half_even(num: i128, den: i128) -> i128 {
    let q = num.div_euclid(den);
    let r = num.rem_euclid(den);
    match (2 * r).cmp(&den) {
        Ordering::Less => q,
        Ordering::Greater => q + 1,
        Ordering::Equal if q % 2 == 0 => q,
        Ordering::Equal => q + 1,
    }
}

/// Calculate the greatest common divisor using Euclidean algorithm.
fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rational_new_reduces() {
        let r = Rational::new(4, 8);
        assert_eq!(r.num(), 1);
        assert_eq!(r.den(), 2);
    }

    #[test]
    fn test_rational_negative_den() {
        let r = Rational::new(1, -2);
        assert_eq!(r.num(), -1);
        assert_eq!(r.den(), 2);
    }

    #[test]
    fn test_rational_zero_denominator() {
        assert_eq!(Rational::try_new(1, 0), Err(RationalError::ZeroDenominator));
    }

    #[test]
    fn test_rational_add_sub() {
        let a = Rational::new(1, 2);
        let b = Rational::new(1, 3);
        assert_eq!(a + b, Rational::new(5, 6));
        assert_eq!(b - a, Rational::new(-1, 6));
    }

    #[test]
    fn test_rational_mul_div() {
        let a = Rational::new(2, 3);
        let b = Rational::new(3, 4);
        assert_eq!(a * b, Rational::new(1, 2));
        assert_eq!(a / b, Rational::new(8, 9));
        assert_eq!(a.checked_div(Rational::zero()), None);
    }

    #[test]
    fn test_rational_ord() {
        assert!(Rational::new(1, 2) > Rational::new(1, 3));
        assert!(Rational::new(-1, 2) < Rational::zero());
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(Rational::new(5, 2).round(), 2);
        assert_eq!(Rational::new(7, 2).round(), 4);
        assert_eq!(Rational::new(-5, 2).round(), -2);
        assert_eq!(Rational::new(24024, 1000).round(), 24);
        assert_eq!(Rational::new(2997, 125).mul_round(Rational::new(1001, 1000)), 24);
    }

    #[test]
    fn test_round_to_digits() {
        assert_eq!(Rational::new(30000, 1001).round_to(2), Rational::new(2997, 100));
        assert_eq!(Rational::new(60000, 1001).round_to(2), Rational::new(5994, 100));
        assert_eq!(Rational::new(1, 8).round_to(2), Rational::new(12, 100));
    }

    #[test]
    fn test_floor_trunc_fract() {
        let r = Rational::new(-7, 2);
        assert_eq!(r.floor(), -4);
        assert_eq!(r.trunc(), -3);
        assert_eq!(Rational::new(7, 2).fract(), Rational::new(1, 2));
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!("30000/1001".parse::<Rational>().unwrap(), Rational::new(30000, 1001));
        assert_eq!("29.97".parse::<Rational>().unwrap(), Rational::new(2997, 100));
        assert_eq!("24".parse::<Rational>().unwrap(), Rational::from_int(24));
        assert_eq!("-.5".parse::<Rational>().unwrap(), Rational::new(-1, 2));
        assert!("abc".parse::<Rational>().is_err());
        assert!("1/0".parse::<Rational>().is_err());
        assert!(".".parse::<Rational>().is_err());
    }

    #[test]
    fn test_parse_long_decimal_rounds_to_fit() {
        let r: Rational = "0.33333333333333333333333333".parse().unwrap();
        assert!(r.den() <= 1_000_000_000_000_000_000);
        assert!((r.to_f64() - 1.0 / 3.0).abs() < 1e-15);

        let r: Rational = "23.976023976023976023976023976".parse().unwrap();
        assert!((r.to_f64() - 24_000.0 / 1001.0).abs() < 1e-12);

        // Digits that fit stay exact.
        assert_eq!(
            "0.123456789".parse::<Rational>().unwrap(),
            Rational::new(123_456_789, 1_000_000_000)
        );
        assert!("99999999999999999999".parse::<Rational>().is_err());
    }

    #[test]
    fn test_from_f64_uses_shortest_decimal() {
        assert_eq!(Rational::from_f64(23.976).unwrap(), Rational::new(2997, 125));
        assert_eq!(Rational::from_f64(0.5).unwrap(), Rational::new(1, 2));
        assert!(Rational::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_checked_overflow() {
        let big = Rational::from_int(i64::MAX);
        assert_eq!(big.checked_add(big), None);
    }

    #[test]
    fn test_serde_revalidates() {
        let json = serde_json::to_string(&Rational::new(30000, 1001)).unwrap();
        assert_eq!(json, r#"{"num":30000,"den":1001}"#);
        let back: Rational = serde_json::from_str(r#"{"num":4,"den":8}"#).unwrap();
        assert_eq!(back, Rational::new(1, 2));
        assert!(serde_json::from_str::<Rational>(r#"{"num":1,"den":0}"#).is_err());
    }
}
