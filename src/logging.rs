//! Logging macros
//!
//! - Board (`target_os = "none"`): forwards to `defmt`, shipped over RTT.
//! - Host tests: prints to stdout/stderr with a level prefix.
//! - Other host builds: arguments are type-checked and dropped.
//!
//! Format strings must stay within what both `defmt` and `core::fmt` accept,
//! so stick to `{}` for integers and strings and `{:?}` for crate types.

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(target_os = "none"), test))]
        println!("[INFO] {}", format!($($arg)*));

        #[cfg(all(not(target_os = "none"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log a warning
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(target_os = "none"), test))]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(all(not(target_os = "none"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log an error
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(target_os = "none"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));

        #[cfg(all(not(target_os = "none"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log a debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(target_os = "none"), test))]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(all(not(target_os = "none"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
