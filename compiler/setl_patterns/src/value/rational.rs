//! Exact rationals over arbitrary-precision integers.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Size limit of exact powers, in bits (about five million decimal digits).
pub const MAX_POWER_BITS: u64 = 1 << 24;

/// `numerator / denominator`, always reduced with a positive denominator.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    /// `None` for a zero denominator.
    pub fn new(num: BigInt, den: BigInt) -> Option<Self> {
        if den.is_zero() {
            return None;
        }
        Some(Self::normalized(num, den))
    }

    fn normalized(num: BigInt, den: BigInt) -> Self {
        let g = num.gcd(&den);
        let (mut num, mut den) = if g.is_one() || g.is_zero() {
            (num, den)
        } else {
            (num / &g, den / &g)
        };
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        if num.is_zero() {
            den = BigInt::one();
        }
        Rational { num, den }
    }

    pub fn from_integer(i: impl Into<BigInt>) -> Self {
        Rational {
            num: i.into(),
            den: BigInt::one(),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// Exact value of a finite double.
    pub fn from_f64(f: f64) -> Option<Self> {
        if !f.is_finite() {
            return None;
        }
        if f == 0.0 {
            return Some(Self::zero());
        }
        let bits = f.to_bits();
        let sign = if bits >> 63 == 0 { 1 } else { -1 };
        let exponent = i32::try_from((bits >> 52) & 0x7ff).ok()?;
        let mantissa = if exponent == 0 {
            (bits & 0x000f_ffff_ffff_ffff) << 1
        } else {
            (bits & 0x000f_ffff_ffff_ffff) | 0x0010_0000_0000_0000
        };
        let exp = exponent - 1075;
        let m = BigInt::from(mantissa) * sign;
        let two = BigInt::from(2);
        let r = if exp >= 0 {
            Self::from_integer(m * num_traits::pow(two, usize::try_from(exp).ok()?))
        } else {
            Self::normalized(m, num_traits::pow(two, usize::try_from(-exp).ok()?))
        };
        Some(r)
    }

    pub fn numerator(&self) -> &BigInt {
        &self.num
    }

    pub fn denominator(&self) -> &BigInt {
        &self.den
    }

    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    /// The integer value, if the denominator is one.
    pub fn to_integer(&self) -> Option<&BigInt> {
        self.is_integer().then_some(&self.num)
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_integer().and_then(ToPrimitive::to_i64)
    }

    pub fn to_f64(&self) -> f64 {
        match (self.num.to_f64(), self.den.to_f64()) {
            (Some(n), Some(d)) if n.is_finite() && d.is_finite() => n / d,
            _ => {
                // Scale both down to keep the quotient representable.
                let shift = self.num.bits().max(self.den.bits()).saturating_sub(1000);
                let n = (&self.num >> shift).to_f64().unwrap_or(f64::NAN);
                let d = (&self.den >> shift).to_f64().unwrap_or(f64::NAN);
                n / d
            }
        }
    }

    #[must_use]
    pub fn add(&self, other: &Rational) -> Rational {
        if self.is_integer() && other.is_integer() {
            return Self::from_integer(&self.num + &other.num);
        }
        Self::normalized(
            &self.num * &other.den + &other.num * &self.den,
            &self.den * &other.den,
        )
    }

    #[must_use]
    pub fn sub(&self, other: &Rational) -> Rational {
        self.add(&other.neg())
    }

    #[must_use]
    pub fn mul(&self, other: &Rational) -> Rational {
        Self::normalized(&self.num * &other.num, &self.den * &other.den)
    }

    /// `None` on division by zero.
    pub fn div(&self, other: &Rational) -> Option<Rational> {
        if other.is_zero() {
            return None;
        }
        Some(Self::normalized(&self.num * &other.den, &self.den * &other.num))
    }

    #[must_use]
    pub fn neg(&self) -> Rational {
        Rational {
            num: -&self.num,
            den: self.den.clone(),
        }
    }

    #[must_use]
    pub fn abs(&self) -> Rational {
        Rational {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }

    /// Largest integer not greater than `self`.
    pub fn floor(&self) -> BigInt {
        self.num.div_floor(&self.den)
    }

    pub fn ceil(&self) -> BigInt {
        -((-&self.num).div_floor(&self.den))
    }

    /// Integer division rounding towards negative infinity.
    pub fn int_div(&self, other: &Rational) -> Option<Rational> {
        self.div(other).map(|q| Self::from_integer(q.floor()))
    }

    /// `self - other * floor(self / other)`; takes the sign of `other`.
    pub fn modulo(&self, other: &Rational) -> Option<Rational> {
        let q = self.int_div(other)?;
        Some(self.sub(&other.mul(&q)))
    }

    /// Whether `self ** exp` would need more than [`MAX_POWER_BITS`] bits
    /// in its numerator or denominator.
    pub fn power_too_large(&self, exp: i64) -> bool {
        let magnitude = self.num.bits().max(self.den.bits()).saturating_sub(1);
        magnitude.saturating_mul(exp.unsigned_abs()) > MAX_POWER_BITS
    }

    /// Exact integer power; `None` for `0 ** negative`.
    ///
    /// Unbounded: callers check [`Rational::power_too_large`] first.
    pub fn pow(&self, exp: i64) -> Option<Rational> {
        let e = usize::try_from(exp.unsigned_abs()).ok()?;
        let r = Rational {
            num: num_traits::pow(self.num.clone(), e),
            den: num_traits::pow(self.den.clone(), e),
        };
        if exp < 0 {
            Rational::one().div(&r)
        } else {
            Some(r)
        }
    }

    pub fn signum(&self) -> i32 {
        match self.num.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.den == other.den {
            return self.num.cmp(&other.num);
        }
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl From<i64> for Rational {
    fn from(i: i64) -> Self {
        Rational::from_integer(i)
    }
}

impl From<BigInt> for Rational {
    fn from(i: BigInt) -> Self {
        Rational::from_integer(i)
    }
}
