//! Arena capacity limits, grounded on `ori_ir/src/arena.rs`'s
//! `to_u32`/`panic_capacity_exceeded` pair: convert a `usize` length into a
//! `u32` arena index, panicking with a clear message instead of silently
//! wrapping (or requiring `.expect()`, denied workspace-wide) on overflow.

#[cold]
#[inline(never)]
fn panic_capacity_exceeded(value: usize, context: &str) -> ! {
    panic!("arena capacity exceeded: {context} has {value} entries, max is {}", u32::MAX)
}

#[inline]
pub(crate) fn to_u32(value: usize, context: &str) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic_capacity_exceeded(value, context))
}
