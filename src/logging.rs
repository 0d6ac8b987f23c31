//! Logging macros
//!
//! On the device (`esp32` feature) these forward to `defmt`, which esp-println
//! carries to the console. Host unit tests print to stdout. Any other host
//! build compiles them away.

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "esp32"), test))]
        ::std::println!("[INFO] {}", ::std::format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "esp32"), test))]
        ::std::println!("[WARN] {}", ::std::format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "esp32"), test))]
        ::std::println!("[ERROR] {}", ::std::format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "esp32"), test))]
        ::std::println!("[DEBUG] {}", ::std::format!($($arg)*));
    }};
}
