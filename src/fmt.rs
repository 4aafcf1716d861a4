//! Internal logging shim.
//!
//! Forwards `debug!` to `log` or `defmt` depending on the enabled feature,
//! and compiles to nothing when neither logger is selected. Format strings
//! must stick to plain `{}` placeholders so both backends accept them.

macro_rules! debug {
    ($s:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::debug!($s $(, $arg)*);
        #[cfg(feature = "defmt-0-3")]
        ::defmt::debug!($s $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}
