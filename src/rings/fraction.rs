use crate::error::{MatrixError, Result};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Float, One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;
use std::ops;
use std::str::FromStr;

/// Exact rational number, always kept reduced with a positive denominator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fraction {
    num: BigInt,
    den: BigInt,
}

impl Fraction {
    /// # Panics
    ///
    /// Panics if `den` is zero, use [`Fraction::try_new`] for untrusted input.
    pub fn new(num: BigInt, den: BigInt) -> Self {
        if den.is_zero() {
            panic!("Denominator cannot be zero");
        }
        Self::reduced(num, den)
    }

    pub fn try_new(num: BigInt, den: BigInt) -> Result<Self> {
        if den.is_zero() {
            return Err(MatrixError::DivideByZero);
        }
        Ok(Self::reduced(num, den))
    }

    fn reduced(num: BigInt, den: BigInt) -> Self {
        let g = &num.gcd(&den);
        let num = num / g;
        let den = den / g;

        if den.is_negative() {
            return Self {
                num: -num,
                den: -den,
            };
        }
        Self { num, den }
    }

    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    pub fn checked_recip(&self) -> Result<Fraction> {
        Fraction::try_new(self.den.clone(), self.num.clone())
    }

    pub fn checked_div(&self, rhs: &Fraction) -> Result<Fraction> {
        if rhs.is_zero() {
            return Err(MatrixError::DivideByZero);
        }
        Ok(self / rhs)
    }
}

impl FromStr for Fraction {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            BigInt::from_str(part.trim()).map_err(|_| MatrixError::ParseNumber(s.to_string()))
        };

        let mut parts = s.split('/');
        let num = parse(parts.next().unwrap_or_default())?;
        let den = match parts.next() {
            Some(den) => parse(den)?,
            None => BigInt::one(),
        };
        if parts.next().is_some() {
            return Err(MatrixError::ParseNumber(s.to_string()));
        }

        Fraction::try_new(num, den)
    }
}

impl From<BigInt> for Fraction {
    fn from(num: BigInt) -> Self {
        Self {
            num,
            den: BigInt::one(),
        }
    }
}

impl From<i64> for Fraction {
    fn from(num: i64) -> Self {
        BigInt::from(num).into()
    }
}

impl From<i32> for Fraction {
    fn from(num: i32) -> Self {
        BigInt::from(num).into()
    }
}

// Every finite float is a dyadic rational: mantissa * 2^exponent.
impl TryFrom<f64> for Fraction {
    type Error = MatrixError;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(MatrixError::InexactNumber(value));
        }

        let (mantissa, exponent, sign) = Float::integer_decode(value);
        let mut num = BigInt::from(mantissa);
        if sign < 0 {
            num = -num;
        }

        if exponent >= 0 {
            Ok((num << exponent as usize).into())
        } else {
            Ok(Fraction::new(num, BigInt::one() << (-exponent) as usize))
        }
    }
}

impl ops::Add<&Fraction> for &Fraction {
    type Output = Fraction;

    fn add(self, rhs: &Fraction) -> Fraction {
        if self.den == rhs.den {
            return Fraction::reduced(&self.num + &rhs.num, self.den.clone());
        }

        Fraction::reduced(
            &self.num * &rhs.den + &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl ops::Sub<&Fraction> for &Fraction {
    type Output = Fraction;

    fn sub(self, rhs: &Fraction) -> Fraction {
        self + &-rhs
    }
}

impl ops::Mul<&Fraction> for &Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &Fraction) -> Fraction {
        Fraction::reduced(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl ops::Div<&Fraction> for &Fraction {
    type Output = Fraction;

    fn div(self, rhs: &Fraction) -> Fraction {
        Fraction::new(&self.num * &rhs.den, &self.den * &rhs.num)
    }
}

macro_rules! forward_owned_binop {
    ($($imp:ident, $method:ident);*) => {$(
        impl ops::$imp for Fraction {
            type Output = Fraction;

            fn $method(self, rhs: Fraction) -> Fraction {
                (&self).$method(&rhs)
            }
        }
    )*};
}

forward_owned_binop!(Add, add; Sub, sub; Mul, mul; Div, div);

impl ops::Neg for &Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl ops::Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction {
            num: -self.num,
            den: self.den,
        }
    }
}

impl One for Fraction {
    fn one() -> Fraction {
        BigInt::one().into()
    }
}

impl Zero for Fraction {
    fn zero() -> Fraction {
        BigInt::zero().into()
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            return write!(f, "{}", self.num);
        }
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl PartialEq<i64> for Fraction {
    fn eq(&self, rhs: &i64) -> bool {
        self.num == &self.den * *rhs
    }
}

impl PartialOrd<Fraction> for Fraction {
    fn partial_cmp(&self, rhs: &Fraction) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}

impl Ord for Fraction {
    fn cmp(&self, rhs: &Fraction) -> Ordering {
        (&self.num * &rhs.den).cmp(&(&rhs.num * &self.den))
    }
}

impl std::iter::Sum<Fraction> for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Fraction {
        iter.fold(Fraction::zero(), |acc, f| acc + f)
    }
}

impl std::iter::Product<Fraction> for Fraction {
    fn product<I: Iterator<Item = Fraction>>(iter: I) -> Fraction {
        iter.fold(Fraction::one(), |acc, f| acc * f)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
