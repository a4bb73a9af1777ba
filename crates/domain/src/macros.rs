//! Macro for implementing string conversions on fieldless domain enums
//!
//! Build statuses, lifecycle events and configuration switches all travel as
//! lowercase strings (tags, config files, CLI arguments). This macro gives
//! each enum a single source of truth for that spelling.
//!
//! # Example
//!
//! ```rust
//! use buildhound_domain::impl_str_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Phase {
//!     Queued,
//!     Running,
//! }
//!
//! impl_str_enum_conversions!(Phase {
//!     Queued => "queued",
//!     Running => "running",
//! });
//!
//! assert_eq!(Phase::Running.as_str(), "running");
//! assert_eq!("QUEUED".parse::<Phase>().unwrap(), Phase::Queued);
//! ```

/// Implements `as_str`, `Display` and `FromStr` for fieldless enums
///
/// - `as_str` / `Display`: the canonical lowercase spelling
/// - `FromStr`: case-insensitive, surrounding whitespace ignored; the error
///   names the enum and echoes the rejected input
#[macro_export]
macro_rules! impl_str_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical lowercase spelling of this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
