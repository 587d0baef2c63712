//! String utilities.

use selfcheck_harness::{Harness, expecting, log_return};

use crate::{BINARY_REPRESENTATION_ERROR, BITS_IN_BYTE, INVALID_VALUE};

const VOWELS: [char; 10] = ['a', 'A', 'e', 'E', 'i', 'I', 'o', 'O', 'u', 'U'];

#[derive(Debug, Clone, Copy)]
pub struct StringUtility<'h> {
    harness: &'h Harness,
}

impl<'h> StringUtility<'h> {
    #[must_use]
    pub const fn new(harness: &'h Harness) -> Self {
        Self { harness }
    }

    /// Number of ASCII vowels in `text`; `None` counts as zero.
    pub fn count_vowels(&self, text: Option<&str>) -> usize {
        expecting!(self.harness, "return 0", text => "bcd fgh jkl mnp qrs tvw xyz");
        expecting!(self.harness, "return 3", text => "PROGRAMMING");
        expecting!(
            self.harness,
            "return 13",
            text => "This is a test of the emergency broadcast system"
        );

        let Some(text) = text else {
            return 0;
        };
        let count = text.chars().filter(|c| VOWELS.contains(c)).count();
        log_return!(self.harness, "return {count}");
        count
    }

    /// Two's complement of a binary byte string, padded to eight digits.
    ///
    /// Empty input, or input containing anything but `0`/`1`, yields
    /// [`BINARY_REPRESENTATION_ERROR`].
    pub fn binary_byte_twos_complement(&self, binary: &str) -> String {
        expecting!(self.harness, "return 11001101", binary => "00110011");
        expecting!(self.harness, "return 00000000", binary => "00000000");
        expecting!(self.harness, "return 10000001", binary => "01111111");

        if binary.is_empty() || !binary.chars().all(|c| c == '0' || c == '1') {
            log_return!(self.harness, "{}", BINARY_REPRESENTATION_ERROR);
            return BINARY_REPRESENTATION_ERROR.to_string();
        }

        let padded = format!("{binary:0>width$}", width = BITS_IN_BYTE);
        // Flip every bit, then add one from the least significant end.
        let mut digits: Vec<char> = padded
            .chars()
            .map(|c| if c == '0' { '1' } else { '0' })
            .collect();
        for digit in digits.iter_mut().rev() {
            if *digit == '0' {
                *digit = '1';
                break;
            }
            *digit = '0';
        }
        let complement: String = digits.into_iter().collect();

        let formatted = self.format_binary_byte_string(Some(&complement));
        log_return!(self.harness, "return {formatted}");
        formatted
    }

    /// Left-pad with zeros, or keep the last eight digits, so the result is
    /// exactly eight characters.
    pub fn format_binary_byte_string(&self, binary: Option<&str>) -> String {
        expecting!(self.harness, "return 00000101", binary => "0101");
        expecting!(self.harness, "return 00000101", binary => "000000000000000101");
        expecting!(self.harness, "return 00000001", binary => "1");

        let Some(binary) = binary else {
            log_return!(self.harness, "{}", BINARY_REPRESENTATION_ERROR);
            return BINARY_REPRESENTATION_ERROR.to_string();
        };

        let len = binary.chars().count();
        let formatted = if len < BITS_IN_BYTE {
            format!("{binary:0>width$}", width = BITS_IN_BYTE)
        } else {
            binary.chars().skip(len - BITS_IN_BYTE).collect()
        };
        log_return!(self.harness, "return {formatted}");
        formatted
    }

    /// Index of the first `needle` in `text`, counted in characters.
    pub fn index_of_first_char(&self, text: Option<&str>, needle: char) -> Option<usize> {
        expecting!(self.harness, "return 2", text => "hello", needle => 'l');
        expecting!(self.harness, "return 0", text => "hello", needle => 'h');
        expecting!(self.harness, INVALID_VALUE, text => "hello", needle => 'z');

        match text.and_then(|t| t.chars().position(|c| c == needle)) {
            Some(index) => {
                log_return!(self.harness, "return {index}");
                Some(index)
            }
            None => {
                log_return!(self.harness, "{}", INVALID_VALUE);
                None
            }
        }
    }

    /// Index of the last `needle` in `text`, counted in characters.
    pub fn index_of_last_char(&self, text: Option<&str>, needle: char) -> Option<usize> {
        expecting!(self.harness, "return 3", text => "hello", needle => 'l');
        expecting!(self.harness, "return 0", text => "hello", needle => 'h');
        expecting!(self.harness, INVALID_VALUE, text => "hello", needle => 'z');

        let found = text.and_then(|t| {
            let chars: Vec<char> = t.chars().collect();
            chars.iter().rposition(|&c| c == needle)
        });
        match found {
            Some(index) => {
                log_return!(self.harness, "return {index}");
                Some(index)
            }
            None => {
                log_return!(self.harness, "{}", INVALID_VALUE);
                None
            }
        }
    }
}
