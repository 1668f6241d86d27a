//! Load-time configuration errors.
//!
//! Per the error taxonomy, these never surface on the hot receive/send path,
//! they are only ever returned from [`crate::Protocol::load`] and
//! [`crate::Parser::new`], at configuration time.

/// A problem detected while loading a [`crate::Protocol`] table.
///
/// The affected protocol is simply not usable; callers are expected to trace
/// this once (eg via `defmt::warn!`) and continue without it, rather than
/// treat it as fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `min_code_len` was greater than `max_code_len`.
    CodeLenRange,
    /// `base_time` was zero; every symbol window would collapse to zero width.
    ZeroBaseTime,
}
