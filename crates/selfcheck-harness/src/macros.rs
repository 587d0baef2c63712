//! Call-site macros for instrumented code.
//!
//! The macros check [`Harness::is_enabled`](crate::Harness::is_enabled) before
//! building argument values or formatting messages, so a disabled harness
//! costs one flag check per call site.

/// Identity of the enclosing function, e.g. `my_crate::math::MathUtility::is_even`.
///
/// Expands to a `Cow<'static, str>` without generic or lifetime arguments.
/// Inside a closure the path ends in `{{closure}}`, so expectations and logs
/// for one method must be issued from the same body.
#[macro_export]
macro_rules! method_id {
    () => {{
        fn __selfcheck_here() {}
        let name = ::std::any::type_name_of_val(&__selfcheck_here);
        $crate::expectation::method_name(name.strip_suffix("::__selfcheck_here").unwrap_or(name))
    }};
}

/// Register an expectation for the enclosing function.
///
/// ```ignore
/// expecting!(harness, "return true", num => 2);
/// expecting!(harness, "return 5.0", a => 3.0, b => 4.0);
/// ```
#[macro_export]
macro_rules! expecting {
    ($harness:expr, $message:expr $(, $actual:expr => $expected:expr)* $(,)?) => {{
        let harness: &$crate::Harness = &$harness;
        if harness.is_enabled() {
            harness.register_if_match(
                &$crate::method_id!(),
                $message,
                &[$($crate::Condition::new($actual, $expected)),*],
            );
        }
    }};
}

/// Log the message the enclosing function is about to return with.
///
/// Accepts `format!` arguments; formatting only happens when enabled.
#[macro_export]
macro_rules! log_return {
    ($harness:expr, $($fmt:tt)+) => {{
        let harness: &$crate::Harness = &$harness;
        if harness.is_enabled() {
            harness.log(&$crate::method_id!(), &::std::format!($($fmt)+));
        }
    }};
}
