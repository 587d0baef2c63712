//! Math utilities.

use selfcheck_harness::{Harness, expecting, log_return};

use crate::{NEGATIVE_SIGN, POSITIVE_SIGN};

#[derive(Debug, Clone, Copy)]
pub struct MathUtility<'h> {
    harness: &'h Harness,
}

impl<'h> MathUtility<'h> {
    #[must_use]
    pub const fn new(harness: &'h Harness) -> Self {
        Self { harness }
    }

    pub fn is_even(&self, n: i32) -> bool {
        expecting!(self.harness, "return true", n => 2);
        expecting!(self.harness, "return false", n => 3);
        expecting!(self.harness, "return true", n => 4);

        let even = n % 2 == 0;
        log_return!(self.harness, "return {even}");
        even
    }

    /// Length of the hypotenuse of a right triangle with legs `a` and `b`.
    pub fn hypotenuse(&self, a: f64, b: f64) -> f64 {
        expecting!(self.harness, "return 5.0", a => 3.0, b => 4.0);
        expecting!(
            self.harness,
            &format!("return {:?}", 9.0_f64.hypot(16.0)),
            a => 9.0,
            b => 16.0
        );
        expecting!(
            self.harness,
            &format!("return {:?}", 100.0_f64.hypot(200.0)),
            a => 100.0,
            b => 200.0
        );

        let result = a.hypot(b);
        log_return!(self.harness, "return {result:?}");
        result
    }

    /// Prime factors of `n` in ascending order, with multiplicity.
    pub fn prime_factors(&self, n: u32) -> Vec<u32> {
        expecting!(self.harness, "[2, 2, 2]", n => 8);
        expecting!(self.harness, "[2, 617]", n => 1234);
        expecting!(self.harness, "[5, 7, 13, 29]", n => 13195);

        let mut factors = Vec::new();
        let mut rest = n;
        let mut divisor = 2;
        while u64::from(divisor) * u64::from(divisor) <= u64::from(rest) {
            if rest % divisor == 0 {
                factors.push(divisor);
                rest /= divisor;
            } else {
                divisor += 1;
            }
        }
        if rest > 1 {
            factors.push(rest);
        }

        log_return!(self.harness, "{factors:?}");
        factors
    }

    /// Expand `(x1·x + ones1)(x2·x + ones2)` with FOIL, e.g.
    /// `(1, 3, 1, 2)` gives `x^2 + 5x + 6`.
    pub fn multiply_simple_binomials(&self, x1: i16, ones1: i16, x2: i16, ones2: i16) -> String {
        expecting!(self.harness, "return x^2 + 5x + 6", x1 => 1, ones1 => 3, x2 => 1, ones2 => 2);
        expecting!(self.harness, "return x^2 - 7x + 12", x1 => 1, ones1 => -4, x2 => 1, ones2 => -3);
        expecting!(self.harness, "return -4x^2 + 4", x1 => 2, ones1 => 2, x2 => -2, ones2 => 2);
        expecting!(self.harness, "return -12x^2 + 7x - 1", x1 => -4, ones1 => 1, x2 => 3, ones2 => -1);
        expecting!(self.harness, "return 88x^2 + 49x + 6", x1 => -11, ones1 => -2, x2 => -8, ones2 => -3);

        // The middle sum of two i16 products can exceed i32.
        let (x1, ones1) = (i64::from(x1), i64::from(ones1));
        let (x2, ones2) = (i64::from(x2), i64::from(ones2));
        let first = x1 * x2;
        let middle = x1 * ones2 + ones1 * x2;
        let last = ones1 * ones2;

        let mut terms: Vec<String> = Vec::new();
        for (coefficient, variable) in [(first, "x^2"), (middle, "x"), (last, "")] {
            if coefficient == 0 {
                continue;
            }
            let magnitude = coefficient.abs();
            let digits = if magnitude == 1 && !variable.is_empty() {
                String::new()
            } else {
                magnitude.to_string()
            };
            let term = if terms.is_empty() {
                let sign = if coefficient < 0 { NEGATIVE_SIGN } else { "" };
                format!("{sign}{digits}{variable}")
            } else {
                let sign = if coefficient < 0 { NEGATIVE_SIGN } else { POSITIVE_SIGN };
                format!("{sign} {digits}{variable}")
            };
            terms.push(term);
        }
        let product = if terms.is_empty() {
            "0".to_string()
        } else {
            terms.join(" ")
        };

        log_return!(self.harness, "return {product}");
        product
    }

    /// Convert `amount` at exchange `rate`.
    ///
    /// Zero amounts or rates short-circuit to zero and a rate of one returns
    /// the amount unchanged; neither path is logged.
    pub fn convert_currency(&self, amount: f32, rate: f32) -> f32 {
        expecting!(self.harness, "return 0.61", amount => 1.0_f32, rate => 0.61_f32);
        expecting!(self.harness, "return 73.0", amount => 100.0_f32, rate => 0.73_f32);

        if amount == 0.0 || rate == 0.0 {
            return 0.0;
        }
        if rate == 1.0 {
            return amount;
        }
        let converted = amount * rate;
        log_return!(self.harness, "return {converted:?}");
        converted
    }
}
