//! Stack growth for the recursive grammar analyses.
//!
//! Grammar queries and the passes built on them recurse once per combinator
//! nesting level. Grammars written by hand stay shallow, but
//! generated ones can nest thousands of levels deep.

/// Grow the stack when less than this remains (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space allocated per growth (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
