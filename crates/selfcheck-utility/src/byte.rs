//! Byte utilities.

use selfcheck_harness::{Harness, expecting, log_return};

use crate::string::StringUtility;
use crate::{BITS_IN_BYTE, ZERO_STRING};

#[derive(Debug, Clone, Copy)]
pub struct ByteUtility<'h> {
    harness: &'h Harness,
}

impl<'h> ByteUtility<'h> {
    #[must_use]
    pub const fn new(harness: &'h Harness) -> Self {
        Self { harness }
    }

    /// Binary digits of `b` without leading zeros; negative bytes are
    /// rendered as their eight-digit two's complement.
    pub fn byte_to_binary_string(&self, b: i8) -> String {
        expecting!(self.harness, "return 111001", b => 57);
        expecting!(self.harness, "return 0", b => 0);
        expecting!(self.harness, "return 11000111", b => -57);

        if b == 0 {
            log_return!(self.harness, "return {}", ZERO_STRING);
            return ZERO_STRING.to_string();
        }

        let magnitude = format!("{:b}", b.unsigned_abs());
        let binary = if b < 0 {
            StringUtility::new(self.harness).binary_byte_twos_complement(&magnitude)
        } else {
            magnitude
        };

        log_return!(self.harness, "return {binary}");
        binary
    }

    /// Shift `b` by `places` bits, left or (arithmetically) right.
    ///
    /// Shifts outside `0..=8` yield zero.
    pub fn shift_byte(&self, b: i8, places: i32, left: bool) -> i8 {
        expecting!(self.harness, "return 10", b => 5, places => 1, left => true);
        expecting!(self.harness, "return 3", b => 15, places => 2, left => false);
        expecting!(self.harness, "return 0", b => 56, places => 9, left => false);

        let in_range = usize::try_from(places).is_ok_and(|p| p <= BITS_IN_BYTE);
        let shifted = if !in_range {
            0
        } else if left {
            // Truncation back to eight bits is the point of the operation.
            (i32::from(b) << places) as i8
        } else {
            (i32::from(b) >> places) as i8
        };

        log_return!(self.harness, "return {shifted}");
        shifted
    }
}
