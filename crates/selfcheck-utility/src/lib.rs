//! Byte, math and string utilities that verify themselves through a
//! [`selfcheck_harness::Harness`].
//!
//! Each utility borrows the harness, declares the messages it should log for
//! a handful of known inputs, and logs the message for every return. With a
//! disabled harness the instrumentation reduces to a flag check.

#![forbid(unsafe_code)]

pub mod byte;
pub mod math;
pub mod string;

pub use byte::ByteUtility;
pub use math::MathUtility;
pub use string::StringUtility;

pub const BITS_IN_BYTE: usize = 8;
pub const ZERO_STRING: &str = "0";
pub const POSITIVE_SIGN: &str = "+";
pub const NEGATIVE_SIGN: &str = "-";
pub const BINARY_REPRESENTATION_ERROR: &str = "Binary representation error";
pub const INVALID_VALUE: &str = "Invalid value";
