//! Tracing targets the CLI formatter treats specially.
//!
//! `success!` forwards to `tracing::info!` under [`SUCCESS_TARGET`] so the
//! formatter can highlight it.

pub const SUCCESS_TARGET: &str = "riskmap::success";
pub const PRINT_TARGET: &str = "riskmap::print";

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: $crate::log::SUCCESS_TARGET, $($arg)*)
    };
}
