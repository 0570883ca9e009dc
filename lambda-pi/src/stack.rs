use std::cell::Cell;

/// Maximum nesting of `type_check`, `value`, `reduce` and `eval` calls on one
/// thread before they give up with a `TooDeep` error.
pub const MAX_DEPTH: usize = 10_000;

/// When less than this much stack remains, switch to a fresh segment.
const RED_ZONE: usize = 256 * 1024;
/// Size of each fresh stack segment.
const STACK_GROWTH: usize = 4 * 1024 * 1024;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Runs `f`, first moving to a new stack segment if the current one is close
/// to exhausted.
pub(crate) fn grow<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_GROWTH, f)
}

/// One level of counted recursion, released on drop.
#[derive(Debug)]
pub(crate) struct Depth(());

impl Depth {
    /// Returns `None` once [`MAX_DEPTH`] levels are already entered.
    pub(crate) fn enter() -> Option<Depth> {
        DEPTH.with(|depth| {
            let current = depth.get();
            if current >= MAX_DEPTH {
                return None;
            }
            depth.set(current + 1);
            Some(Depth(()))
        })
    }
}

impl Drop for Depth {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
