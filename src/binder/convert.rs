//! Leaf value conversion
//!
//! Configuration values arrive as strings. Conversion never depends on the
//! process locale: numbers use `.` as the decimal separator, booleans are
//! `true`/`false` in any case, durations use the invariant time-span layout.
//! Integers also accept a `0x` prefix for hexadecimal.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;

/// A leaf value could not be converted to its target type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    pub target_type: &'static str,
    pub reason: String,
}

impl ConvertError {
    pub fn new(target_type: &'static str, reason: impl Into<String>) -> Self {
        Self {
            target_type,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot convert to {}: {}", self.target_type, self.reason)
    }
}

impl std::error::Error for ConvertError {}

/// Types that can be bound from a single configuration string.
///
/// Implement this for custom scalars, or use [`impl_from_config_value!`]
/// for any type with a `FromStr` implementation.
///
/// [`impl_from_config_value!`]: crate::impl_from_config_value
pub trait FromConfigValue: Sized {
    /// Name reported when conversion fails
    const TYPE_NAME: &'static str;

    fn from_config_value(raw: &str) -> Result<Self, ConvertError>;
}

/// Implement [`FromConfigValue`] through `FromStr`, trimming surrounding
/// whitespace first.
///
/// # Example
/// ```rust
/// use confbind::{impl_from_config_value, FromConfigValue};
///
/// #[derive(Debug, PartialEq)]
/// enum LogFormat { Json, Pretty }
///
/// impl std::str::FromStr for LogFormat {
///     type Err = String;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         match s.to_ascii_lowercase().as_str() {
///             "json" => Ok(LogFormat::Json),
///             "pretty" => Ok(LogFormat::Pretty),
///             other => Err(format!("unknown log format '{other}'")),
///         }
///     }
/// }
///
/// impl_from_config_value!(LogFormat);
///
/// assert_eq!(LogFormat::from_config_value(" Json ").unwrap(), LogFormat::Json);
/// ```
#[macro_export]
macro_rules! impl_from_config_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromConfigValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_config_value(raw: &str) -> ::std::result::Result<Self, $crate::ConvertError> {
                    raw.trim()
                        .parse::<$ty>()
                        .map_err(|e| $crate::ConvertError::new(stringify!($ty), e.to_string()))
                }
            }
        )+
    };
}

impl_from_config_value!(f32, f64, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);

macro_rules! impl_integer {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromConfigValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
                    let v = raw.trim();
                    let parsed = match hex_digits(v) {
                        Some(digits) => <$ty>::from_str_radix(digits, 16),
                        None => v.parse::<$ty>(),
                    };
                    parsed.map_err(|e| ConvertError::new(Self::TYPE_NAME, e.to_string()))
                }
            }
        )+
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Digits after a `0x`/`0X` prefix; a sign after the prefix is not hex
fn hex_digits(v: &str) -> Option<&str> {
    v.strip_prefix("0x")
        .or_else(|| v.strip_prefix("0X"))
        .filter(|digits| !digits.starts_with(['+', '-']))
}

#[cfg(feature = "decimal")]
impl FromConfigValue for rust_decimal::Decimal {
    const TYPE_NAME: &'static str = "Decimal";

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        use std::str::FromStr;

        rust_decimal::Decimal::from_str(raw.trim())
            .map_err(|e| ConvertError::new(Self::TYPE_NAME, e.to_string()))
    }
}

impl FromConfigValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        Ok(raw.to_string())
    }
}

impl FromConfigValue for PathBuf {
    const TYPE_NAME: &'static str = "PathBuf";

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        Ok(PathBuf::from(raw))
    }
}

impl FromConfigValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        let v = raw.trim();
        if v.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if v.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ConvertError::new(Self::TYPE_NAME, format!("'{v}' is not true or false")))
        }
    }
}

impl FromConfigValue for char {
    const TYPE_NAME: &'static str = "char";

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        let single = |s: &str| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        };
        single(raw)
            .or_else(|| single(raw.trim()))
            .ok_or_else(|| ConvertError::new(Self::TYPE_NAME, "expected exactly one character"))
    }
}

impl<T: FromConfigValue> FromConfigValue for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        T::from_config_value(raw).map(Some)
    }
}

impl FromConfigValue for Uuid {
    const TYPE_NAME: &'static str = "Uuid";

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        Uuid::parse_str(raw.trim()).map_err(|e| ConvertError::new(Self::TYPE_NAME, e.to_string()))
    }
}

impl FromConfigValue for OffsetDateTime {
    const TYPE_NAME: &'static str = "OffsetDateTime";

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        OffsetDateTime::parse(raw.trim(), &time::format_description::well_known::Rfc3339)
            .map_err(|e| ConvertError::new(Self::TYPE_NAME, e.to_string()))
    }
}

impl FromConfigValue for PrimitiveDateTime {
    const TYPE_NAME: &'static str = "PrimitiveDateTime";

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        // Accept both `2024-01-02T03:04:05` and `2024-01-02 03:04:05`
        let normalized = raw.trim().replacen(' ', "T", 1);
        let with_fraction =
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
        let with_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
        let minutes_only = format_description!("[year]-[month]-[day]T[hour]:[minute]");

        PrimitiveDateTime::parse(&normalized, &with_fraction)
            .or_else(|_| PrimitiveDateTime::parse(&normalized, &with_seconds))
            .or_else(|_| PrimitiveDateTime::parse(&normalized, &minutes_only))
            .map_err(|e| ConvertError::new(Self::TYPE_NAME, e.to_string()))
    }
}

impl FromConfigValue for Date {
    const TYPE_NAME: &'static str = "Date";

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        Date::parse(raw.trim(), &format_description!("[year]-[month]-[day]"))
            .map_err(|e| ConvertError::new(Self::TYPE_NAME, e.to_string()))
    }
}

impl FromConfigValue for Duration {
    const TYPE_NAME: &'static str = "Duration";

    fn from_config_value(raw: &str) -> Result<Self, ConvertError> {
        parse_time_span(raw.trim()).map_err(|reason| ConvertError::new(Self::TYPE_NAME, reason))
    }
}

/// Parse the invariant time-span layout `[d.]hh:mm[:ss[.fffffff]]`.
///
/// A bare integer is a number of days.
fn parse_time_span(s: &str) -> Result<Duration, String> {
    if s.is_empty() {
        return Err("empty value".into());
    }
    if s.starts_with('-') {
        return Err("negative durations are not supported".into());
    }

    let number = |part: &str, what: &str| {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid {what} '{part}'"));
        }
        part.parse::<u64>().map_err(|e| format!("invalid {what} '{part}': {e}"))
    };

    let Some(first_colon) = s.find(':') else {
        let days = number(s, "days")?;
        return days
            .checked_mul(86_400)
            .map(Duration::from_secs)
            .ok_or_else(|| "duration overflow".to_string());
    };

    let (days, clock) = match s[..first_colon].split_once('.') {
        Some((d, _)) => (number(d, "days")?, &s[d.len() + 1..]),
        None => (0, s),
    };

    let mut parts = clock.split(':');
    let hours = number(parts.next().unwrap_or_default(), "hours")?;
    let minutes = number(parts.next().unwrap_or_default(), "minutes")?;
    let (seconds, nanos) = match parts.next() {
        None => (0, 0),
        Some(sec) => match sec.split_once('.') {
            Some((whole, fraction)) => (number(whole, "seconds")?, fraction_to_nanos(fraction)?),
            None => (number(sec, "seconds")?, 0),
        },
    };
    if parts.next().is_some() {
        return Err(format!("too many components in '{s}'"));
    }
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(format!("component out of range in '{s}'"));
    }

    let total = days
        .checked_mul(86_400)
        .and_then(|d| d.checked_add(hours * 3_600 + minutes * 60 + seconds))
        .ok_or_else(|| "duration overflow".to_string())?;
    Ok(Duration::new(total, nanos))
}

fn fraction_to_nanos(fraction: &str) -> Result<u32, String> {
    if fraction.is_empty() || fraction.len() > 7 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid fraction '{fraction}'"));
    }
    let padded = format!("{fraction:0<9}");
    padded.parse::<u32>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_are_trimmed() {
        assert_eq!(i32::from_config_value(" 42 ").unwrap(), 42);
        assert_eq!(u16::from_config_value("5432").unwrap(), 5432);
    }

    #[test]
    fn test_integer_failure() {
        let err = i32::from_config_value("not-a-number").unwrap_err();
        assert_eq!(err.target_type, "i32");
    }

    #[test]
    fn test_hex_integers() {
        assert_eq!(u16::from_config_value("0x1F").unwrap(), 31);
        assert_eq!(i32::from_config_value(" 0X10 ").unwrap(), 16);
        assert_eq!(u8::from_config_value("0xff").unwrap(), 255);

        let err = u8::from_config_value("0x100").unwrap_err();
        assert_eq!(err.target_type, "u8");
        assert!(i32::from_config_value("0x-1").is_err());
        assert!(u16::from_config_value("0x").is_err());
    }

    #[cfg(feature = "decimal")]
    #[test]
    fn test_decimal_is_exact_and_invariant() {
        use rust_decimal::Decimal;

        let price = Decimal::from_config_value(" 12.50 ").unwrap();
        assert_eq!(price, Decimal::new(1250, 2));
        assert_eq!(price.to_string(), "12.50");
        assert_eq!(<Decimal as FromConfigValue>::TYPE_NAME, "Decimal");

        let err = Decimal::from_config_value("1,5").unwrap_err();
        assert_eq!(err.target_type, "Decimal");
    }

    #[test]
    fn test_float_uses_invariant_separator() {
        assert_eq!(f64::from_config_value("1.5").unwrap(), 1.5);
        assert!(f64::from_config_value("1,5").is_err());
    }

    #[test]
    fn test_bool_case_insensitive() {
        assert!(bool::from_config_value("True").unwrap());
        assert!(!bool::from_config_value(" FALSE ").unwrap());
        assert!(bool::from_config_value("yes").is_err());
    }

    #[test]
    fn test_string_is_untouched() {
        assert_eq!(String::from_config_value("  padded ").unwrap(), "  padded ");
    }

    #[test]
    fn test_char() {
        assert_eq!(char::from_config_value("x").unwrap(), 'x');
        assert_eq!(char::from_config_value(" y ").unwrap(), 'y');
        assert!(char::from_config_value("xy").is_err());
        assert!(char::from_config_value("").is_err());
    }

    #[test]
    fn test_option_unwraps_inner_type() {
        assert_eq!(Option::<u8>::from_config_value("7").unwrap(), Some(7));
        assert_eq!(<Option<u8> as FromConfigValue>::TYPE_NAME, "u8");
        assert!(Option::<u8>::from_config_value("300").is_err());
    }

    #[test]
    fn test_uuid_forms() {
        let hyphenated = Uuid::from_config_value("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let braced = Uuid::from_config_value("{67e55044-10b1-426f-9247-bb680e5fe0c8}").unwrap();
        let simple = Uuid::from_config_value("67e5504410b1426f9247bb680e5fe0c8").unwrap();
        assert_eq!(hyphenated, braced);
        assert_eq!(hyphenated, simple);
    }

    #[test]
    fn test_time_span_layouts() {
        assert_eq!(Duration::from_config_value("00:00:30").unwrap(), Duration::from_secs(30));
        assert_eq!(Duration::from_config_value("01:30").unwrap(), Duration::from_secs(5_400));
        assert_eq!(
            Duration::from_config_value("1.02:00:00").unwrap(),
            Duration::from_secs(86_400 + 7_200)
        );
        assert_eq!(
            Duration::from_config_value("00:00:01.5").unwrap(),
            Duration::from_millis(1_500)
        );
        assert_eq!(Duration::from_config_value("2").unwrap(), Duration::from_secs(2 * 86_400));
    }

    #[test]
    fn test_time_span_rejects_garbage() {
        assert!(Duration::from_config_value("-00:00:01").is_err());
        assert!(Duration::from_config_value("25:00:00").is_err());
        assert!(Duration::from_config_value("00:61").is_err());
        assert!(Duration::from_config_value("1:2:3:4").is_err());
        assert!(Duration::from_config_value("soon").is_err());
    }

    #[test]
    fn test_dates() {
        let dt = OffsetDateTime::from_config_value("2024-05-01T10:00:00Z").unwrap();
        assert_eq!(dt.year(), 2024);

        let local = PrimitiveDateTime::from_config_value("2024-05-01 10:20:30").unwrap();
        assert_eq!(local.minute(), 20);

        let date = Date::from_config_value("2024-05-01").unwrap();
        assert_eq!(u8::from(date.month()), 5);

        assert!(Date::from_config_value("05/01/2024").is_err());
    }

    #[test]
    fn test_ip_and_socket_addresses() {
        let addr = SocketAddr::from_config_value("127.0.0.1:5672").unwrap();
        assert_eq!(addr.port(), 5672);
        assert!(IpAddr::from_config_value("::1").unwrap().is_loopback());
    }
}
