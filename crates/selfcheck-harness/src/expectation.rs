//! Expectations declared by instrumented methods.

use std::borrow::Cow;

use crate::value::ArgValue;

/// Drop generic and lifetime arguments from a type path, so
/// `a::MathUtility<'_>::is_even` becomes `a::MathUtility::is_even`.
///
/// Only brackets that follow an identifier are removed; a qualified-self
/// prefix such as `<a::B as a::T>::m` keeps its outer brackets.
#[must_use]
pub fn method_name(raw: &'static str) -> Cow<'static, str> {
    if !raw.contains('<') {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0_usize;
    let mut prev = ' ';
    for ch in raw.chars() {
        if depth > 0 {
            match ch {
                '<' => depth += 1,
                // `->` inside a fn-pointer argument is not a closing bracket.
                '>' if prev != '-' => depth -= 1,
                _ => {}
            }
        } else if ch == '<' && (prev.is_alphanumeric() || prev == '_') {
            depth = 1;
        } else {
            out.push(ch);
        }
        prev = ch;
    }
    Cow::Owned(out)
}

/// A message a method declared it would log for a specific set of inputs.
///
/// Created only when every guard pair matched, and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationRecord {
    method: String,
    expected_message: String,
    arguments: Vec<ArgValue>,
}

impl ExpectationRecord {
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        expected_message: impl Into<String>,
        arguments: Vec<ArgValue>,
    ) -> Self {
        Self {
            method: method.into(),
            expected_message: expected_message.into(),
            arguments,
        }
    }

    /// Identity of the method that registered this expectation.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn expected_message(&self) -> &str {
        &self.expected_message
    }

    /// The actual argument values that satisfied the guard, in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[ArgValue] {
        &self.arguments
    }

    /// Render the arguments as `(a, b, c)` for report cells.
    #[must_use]
    pub fn argument_list(&self) -> String {
        let joined = self
            .arguments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("({joined})")
    }
}
