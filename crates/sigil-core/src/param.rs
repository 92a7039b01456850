//! Parameter kinds and typed decoding.
//!
//! A [`ParameterKind`] is chosen once, when a command is registered, and owns
//! everything needed to scan a placeholder out of the input and convert the
//! scanned text into a [`ParamValue`]. Integer and float kinds have a fixed
//! scan shape; string kinds carry the caller's pattern because free text has
//! no natural boundary.

use std::fmt;
use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::Regex;

use crate::cursor::Cursor;
use crate::error::{ParamError, ParamResult};

static INT_SCAN: LazyLock<Regex> =
    LazyLock::new(|| anchored(r"[+-]?\d+").expect("integer scan pattern"));
static FLOAT_SCAN: LazyLock<Regex> =
    LazyLock::new(|| anchored(r"[+-]?\d+(\.\d+)?").expect("float scan pattern"));

/// Compiles `pattern` so that it can only match at the start of the text.
pub fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})"))
}

/// Bit width of an integer parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// Number of bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    fn bounds(self, signed: bool) -> (i128, i128) {
        let bits = self.bits();
        if signed {
            (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
        } else {
            (0, (1i128 << bits) - 1)
        }
    }
}

/// Precision of a floating-point parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    /// 32-bit IEEE float.
    Single,
    /// 64-bit IEEE float.
    Double,
    /// Decimal precision, carried as a 64-bit float.
    Decimal,
}

/// The declared type of a handler parameter.
///
/// This is the full vocabulary the dispatcher understands. Rust types map onto
/// it through `FromParam` in the framework crate; anything outside of it simply
/// has no mapping and fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Str,
}

impl ParamType {
    /// Short display name used in usage strings and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
            Self::Str => "text",
        }
    }

    /// Returns `true` for the string type, which needs a declared pattern.
    pub fn needs_pattern(self) -> bool {
        matches!(self, Self::Str)
    }
}

/// A closed set of parameter decoders.
#[derive(Debug, Clone)]
pub enum ParameterKind {
    /// Integer of a fixed width and signedness.
    Int { width: IntWidth, signed: bool },
    /// Floating-point number.
    Float { width: FloatWidth },
    /// Free text bounded by an anchored pattern.
    Str { pattern: Regex },
}

impl ParameterKind {
    /// Builds the kind for a declared type.
    ///
    /// Returns `None` for [`ParamType::Str`] when no pattern is given.
    pub fn from_type(ty: ParamType, pattern: Option<Regex>) -> Option<Self> {
        use ParamType::*;

        let int = |width, signed| Some(Self::Int { width, signed });
        match ty {
            I8 => int(IntWidth::W8, true),
            I16 => int(IntWidth::W16, true),
            I32 => int(IntWidth::W32, true),
            I64 => int(IntWidth::W64, true),
            U8 => int(IntWidth::W8, false),
            U16 => int(IntWidth::W16, false),
            U32 => int(IntWidth::W32, false),
            U64 => int(IntWidth::W64, false),
            F32 => Some(Self::Float {
                width: FloatWidth::Single,
            }),
            F64 => Some(Self::Float {
                width: FloatWidth::Double,
            }),
            Decimal => Some(Self::Float {
                width: FloatWidth::Decimal,
            }),
            Str => pattern.map(|pattern| Self::Str { pattern }),
        }
    }

    /// Builds a string kind from an unanchored pattern source.
    pub fn string(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Str {
            pattern: anchored(pattern)?,
        })
    }

    /// The declared type this kind decodes.
    pub fn param_type(&self) -> ParamType {
        use ParamType::*;
        match self {
            Self::Int { width, signed } => match (width, signed) {
                (IntWidth::W8, true) => I8,
                (IntWidth::W16, true) => I16,
                (IntWidth::W32, true) => I32,
                (IntWidth::W64, true) => I64,
                (IntWidth::W8, false) => U8,
                (IntWidth::W16, false) => U16,
                (IntWidth::W32, false) => U32,
                (IntWidth::W64, false) => U64,
            },
            Self::Float { width } => match width {
                FloatWidth::Single => F32,
                FloatWidth::Double => F64,
                FloatWidth::Decimal => Decimal,
            },
            Self::Str { .. } => Str,
        }
    }

    /// Display name of this kind.
    pub fn name(&self) -> &'static str {
        self.param_type().name()
    }

    /// Scans one parameter at the cursor and validates it.
    ///
    /// `stop` is the next literal the template expects after this placeholder.
    /// String kinds only look at the input up to that character so free text
    /// cannot swallow it; when the character is not present the scan is
    /// unbounded. The cursor only moves when the whole read succeeds.
    pub fn read<'a>(&self, cursor: &mut Cursor<'a>, stop: Option<char>) -> ParamResult<&'a str> {
        let mut probe = *cursor;
        let scanned = match self {
            Self::Int { .. } => probe.read_matching(&INT_SCAN, None),
            Self::Float { .. } => probe.read_matching(&FLOAT_SCAN, None),
            Self::Str { pattern } => {
                let limit = stop.and_then(|ch| probe.find(ch));
                probe.read_matching(pattern, limit)
            }
        };

        let raw = scanned
            .filter(|raw| !raw.is_empty())
            .ok_or(ParamError::Missing {
                expected: self.name(),
            })?;
        self.decode(raw)?;

        *cursor = probe;
        Ok(raw)
    }

    /// Converts scanned text into a value.
    pub fn decode(&self, raw: &str) -> ParamResult<ParamValue> {
        match self {
            Self::Int { width, signed } => self.decode_int(raw, *width, *signed),
            Self::Float { width } => self.decode_float(raw, *width),
            Self::Str { pattern } => {
                let whole = pattern
                    .find(raw)
                    .is_some_and(|m| m.start() == 0 && m.end() == raw.len());
                if raw.is_empty() || !whole {
                    return Err(self.malformed(raw));
                }
                Ok(ParamValue::Text(raw.to_owned()))
            }
        }
    }

    fn decode_int(&self, raw: &str, width: IntWidth, signed: bool) -> ParamResult<ParamValue> {
        let value: i128 = raw.parse().map_err(|e: std::num::ParseIntError| {
            match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => self.out_of_range(raw),
                _ => self.malformed(raw),
            }
        })?;

        let (min, max) = width.bounds(signed);
        if value < min || value > max {
            return Err(self.out_of_range(raw));
        }

        if signed {
            i64::try_from(value)
                .map(ParamValue::Signed)
                .map_err(|_| self.out_of_range(raw))
        } else {
            u64::try_from(value)
                .map(ParamValue::Unsigned)
                .map_err(|_| self.out_of_range(raw))
        }
    }

    fn decode_float(&self, raw: &str, width: FloatWidth) -> ParamResult<ParamValue> {
        let value = match width {
            FloatWidth::Single => raw.parse::<f32>().map(f64::from),
            FloatWidth::Double | FloatWidth::Decimal => raw.parse::<f64>(),
        }
        .map_err(|_| self.malformed(raw))?;

        if !value.is_finite() {
            return Err(self.out_of_range(raw));
        }
        Ok(ParamValue::Float(value))
    }

    fn malformed(&self, raw: &str) -> ParamError {
        ParamError::Malformed {
            raw: raw.to_owned(),
            expected: self.name(),
        }
    }

    fn out_of_range(&self, raw: &str) -> ParamError {
        ParamError::OutOfRange {
            raw: raw.to_owned(),
            expected: self.name(),
        }
    }
}

/// A decoded parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u8_kind() -> ParameterKind {
        ParameterKind::from_type(ParamType::U8, None).unwrap()
    }

    #[test]
    fn test_unsigned_rejects_overflow_and_sign() {
        let kind = u8_kind();
        assert!(matches!(
            kind.decode("999"),
            Err(ParamError::OutOfRange { .. })
        ));
        assert!(matches!(
            kind.decode("-1"),
            Err(ParamError::OutOfRange { .. })
        ));
        assert_eq!(kind.decode("01"), Ok(ParamValue::Unsigned(1)));
        assert_eq!(kind.decode("255"), Ok(ParamValue::Unsigned(255)));
    }

    #[test]
    fn test_signed_folds_sign() {
        let kind = ParameterKind::from_type(ParamType::I8, None).unwrap();
        assert_eq!(kind.decode("+1"), Ok(ParamValue::Signed(1)));
        assert_eq!(kind.decode("-128"), Ok(ParamValue::Signed(-128)));
        assert!(kind.decode("128").is_err());
    }

    #[test]
    fn test_huge_integer_is_out_of_range() {
        let kind = ParameterKind::from_type(ParamType::U64, None).unwrap();
        let raw = "9".repeat(60);
        assert!(matches!(
            kind.decode(&raw),
            Err(ParamError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_float_widths() {
        let single = ParameterKind::from_type(ParamType::F32, None).unwrap();
        let double = ParameterKind::from_type(ParamType::F64, None).unwrap();
        assert_eq!(single.decode("1.5"), Ok(ParamValue::Float(1.5)));
        assert_eq!(double.decode("-2"), Ok(ParamValue::Float(-2.0)));
        let huge = format!("1{}", "0".repeat(50));
        assert!(single.decode(&huge).is_err());
        assert!(double.decode(&huge).is_ok());
    }

    #[test]
    fn test_kind_reports_its_type() {
        use ParamType::*;
        for ty in [I8, I16, I32, I64, U8, U16, U32, U64, F32, F64, Decimal] {
            let kind = ParameterKind::from_type(ty, None).unwrap();
            assert_eq!(kind.param_type(), ty);
            assert_eq!(kind.name(), ty.name());
        }
        let text = ParameterKind::string(r"\w+").unwrap();
        assert_eq!(text.param_type(), Str);
        assert_eq!(text.name(), "text");
    }

    #[test]
    fn test_string_requires_pattern() {
        assert!(ParameterKind::from_type(ParamType::Str, None).is_none());
        let kind = ParameterKind::from_type(ParamType::Str, Some(anchored(r"\w+").unwrap()));
        assert!(matches!(kind, Some(ParameterKind::Str { .. })));
    }

    #[test]
    fn test_read_restores_cursor_on_failure() {
        let kind = u8_kind();
        let mut cursor = Cursor::new("999 rest");
        assert!(kind.read(&mut cursor, None).is_err());
        assert_eq!(cursor.position(), 0);

        let mut cursor = Cursor::new("42 rest");
        assert_eq!(kind.read(&mut cursor, None), Ok("42"));
        assert_eq!(cursor.remaining(), " rest");
    }

    #[test]
    fn test_string_read_stops_before_literal() {
        let kind = ParameterKind::string(r".+").unwrap();
        let mut cursor = Cursor::new("Fun raid/tomorrow");
        assert_eq!(kind.read(&mut cursor, Some('/')), Ok("Fun raid"));
        assert_eq!(cursor.current(), Some('/'));
    }

    #[test]
    fn test_string_read_unbounded_when_stop_missing() {
        let kind = ParameterKind::string(r".+").unwrap();
        let mut cursor = Cursor::new("Fun raid");
        assert_eq!(kind.read(&mut cursor, Some('/')), Ok("Fun raid"));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_string_read_empty_window_fails() {
        let kind = ParameterKind::string(r".*").unwrap();
        let mut cursor = Cursor::new("/x");
        assert_eq!(
            kind.read(&mut cursor, Some('/')),
            Err(ParamError::Missing { expected: "text" })
        );
    }
}
