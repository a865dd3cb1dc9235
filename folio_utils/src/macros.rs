/// Asserts that an expression matches a pattern, with an optional guard.
///
/// The expression is matched by reference, so bindings in the pattern are
/// references as well.
#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat $(if $guard:expr)? $(,)?) => {
        match &$expr {
            $pat $(if $guard)? => {}
            value => ::core::panic!(
                "assertion failed: `{:?}` does not match `{}`",
                value,
                ::core::stringify!($pat $(if $guard)?),
            ),
        }
    };
}
