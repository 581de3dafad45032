//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Roles, tool names and log formats all travel as lowercase strings. This
//! macro gives each of them a single source of truth for the string form and
//! case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use calcopilot_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Weekday {
//!     Saturday,
//!     Sunday,
//! }
//!
//! impl_domain_status_conversions!(Weekday {
//!     Saturday => "saturday",
//!     Sunday => "sunday",
//! });
//!
//! assert_eq!("SUNDAY".parse::<Weekday>().unwrap(), Weekday::Sunday);
//! ```

/// Implements Display and FromStr traits for wire-name enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their wire string
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
