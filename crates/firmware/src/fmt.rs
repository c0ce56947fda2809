//! Logging macros.
//!
//! One call site, three back ends: `defmt` over RTT on the board, `tracing`
//! on the desktop emulator, nothing in host unit tests. Format strings must
//! stay within the subset both back ends accept: `{}` for integers and
//! strings, `{:?}` for everything else.
//!
//! Declared first in `lib.rs` with `#[macro_use]`, so the macros are in
//! textual scope everywhere below it. A `use` re-export would collide with
//! the built-in `#[warn]` attribute.

#![allow(unused_macros)]

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($s $(, $x)*);
        #[cfg(feature = "tracing")]
        ::tracing::trace!($s $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($s $(, $x)*);
        #[cfg(feature = "tracing")]
        ::tracing::debug!($s $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($s $(, $x)*);
        #[cfg(feature = "tracing")]
        ::tracing::info!($s $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($s $(, $x)*);
        #[cfg(feature = "tracing")]
        ::tracing::warn!($s $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($s $(, $x)*);
        #[cfg(feature = "tracing")]
        ::tracing::error!($s $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($( & $x ),*);
    }};
}

/// Logs any `Debug` value through either back end.
///
/// Driver error types only promise `Debug`; defmt needs `Format`.
pub(crate) struct Dbg<'a, T: ?Sized>(pub &'a T);

impl<T: core::fmt::Debug + ?Sized> core::fmt::Debug for Dbg<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(feature = "defmt")]
impl<T: core::fmt::Debug + ?Sized> defmt::Format for Dbg<'_, T> {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "{:?}", defmt::Debug2Format(self.0));
    }
}

#[cfg(test)]
mod tests {
    use super::Dbg;

    #[test]
    fn every_level_expands_without_a_back_end() {
        let n = 3u32;
        trace!("Bytes read: {}", n);
        debug!("debug {}", n);
        info!("no arguments");
        warn!("warn {} {}", n, "str");
        error!("error {:?}", Dbg(&n));
    }

    #[test]
    fn dbg_forwards_debug() {
        assert_eq!(format!("{:?}", Dbg(&Some(7))), "Some(7)");
    }
}
