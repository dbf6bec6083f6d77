//! Logging macros
//!
//! Forward to `defmt` in the firmware build, to `println!` in host tests, and
//! compile to nothing otherwise. Arguments must implement `defmt::Format` as
//! well as `Display`/`Debug`, so enums are always logged with `{:?}`.

#![allow(unused_macros)]

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "rp2350")]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(all(not(feature = "rp2350"), test))]
            ::std::println!(concat!("[TRACE] ", $s) $(, $x)*);
            #[cfg(not(any(feature = "rp2350", test)))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "rp2350")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(all(not(feature = "rp2350"), test))]
            ::std::println!(concat!("[DEBUG] ", $s) $(, $x)*);
            #[cfg(not(any(feature = "rp2350", test)))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "rp2350")]
            ::defmt::info!($s $(, $x)*);
            #[cfg(all(not(feature = "rp2350"), test))]
            ::std::println!(concat!("[INFO] ", $s) $(, $x)*);
            #[cfg(not(any(feature = "rp2350", test)))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "rp2350")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(all(not(feature = "rp2350"), test))]
            ::std::println!(concat!("[WARN] ", $s) $(, $x)*);
            #[cfg(not(any(feature = "rp2350", test)))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "rp2350")]
            ::defmt::error!($s $(, $x)*);
            #[cfg(all(not(feature = "rp2350"), test))]
            ::std::println!(concat!("[ERROR] ", $s) $(, $x)*);
            #[cfg(not(any(feature = "rp2350", test)))]
            let _ = ($( & $x ),*);
        }
    };
}
