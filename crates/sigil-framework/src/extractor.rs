//! Conversion from decoded parameters into handler argument types.
//!
//! Every handler argument after the [`CommandContext`](crate::CommandContext)
//! must implement [`FromParam`]. The trait ties a Rust type to the
//! [`ParamType`] the dispatcher scans for, so the parameter kinds of a command
//! are derived from the handler's signature at registration time.
//!
//! ```rust,ignore
//! async fn volume(ctx: CommandContext, level: u8) -> String {
//!     format!("volume set to {level}")
//! }
//! ```

use sigil_core::{ParamError, ParamType, ParamValue};

/// A handler argument that can be produced from a decoded parameter.
pub trait FromParam: Sized + Send + 'static {
    /// The declared type scanned for this argument.
    const PARAM_TYPE: ParamType;

    /// Converts a decoded value into `Self`.
    fn from_value(value: ParamValue) -> Result<Self, ParamError>;
}

fn mismatch(value: &ParamValue, target: &'static str) -> ParamError {
    ParamError::TypeMismatch {
        value: value.to_string(),
        target,
    }
}

macro_rules! impl_from_param_int {
    ($($ty:ty => $param:ident, $variant:ident;)*) => {
        $(
            impl FromParam for $ty {
                const PARAM_TYPE: ParamType = ParamType::$param;

                fn from_value(value: ParamValue) -> Result<Self, ParamError> {
                    match value {
                        ParamValue::$variant(v) => <$ty>::try_from(v)
                            .map_err(|_| mismatch(&ParamValue::$variant(v), stringify!($ty))),
                        other => Err(mismatch(&other, stringify!($ty))),
                    }
                }
            }
        )*
    };
}

impl_from_param_int! {
    i8 => I8, Signed;
    i16 => I16, Signed;
    i32 => I32, Signed;
    i64 => I64, Signed;
    u8 => U8, Unsigned;
    u16 => U16, Unsigned;
    u32 => U32, Unsigned;
    u64 => U64, Unsigned;
}

impl FromParam for f32 {
    const PARAM_TYPE: ParamType = ParamType::F32;

    fn from_value(value: ParamValue) -> Result<Self, ParamError> {
        match value {
            ParamValue::Float(v) => Ok(v as f32),
            other => Err(mismatch(&other, "f32")),
        }
    }
}

impl FromParam for f64 {
    const PARAM_TYPE: ParamType = ParamType::F64;

    fn from_value(value: ParamValue) -> Result<Self, ParamError> {
        match value {
            ParamValue::Float(v) => Ok(v),
            other => Err(mismatch(&other, "f64")),
        }
    }
}

/// A decimal-precision number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Decimal(pub f64);

impl FromParam for Decimal {
    const PARAM_TYPE: ParamType = ParamType::Decimal;

    fn from_value(value: ParamValue) -> Result<Self, ParamError> {
        match value {
            ParamValue::Float(v) => Ok(Self(v)),
            other => Err(mismatch(&other, "Decimal")),
        }
    }
}

impl FromParam for String {
    const PARAM_TYPE: ParamType = ParamType::Str;

    fn from_value(value: ParamValue) -> Result<Self, ParamError> {
        match value {
            ParamValue::Text(v) => Ok(v),
            other => Err(mismatch(&other, "String")),
        }
    }
}
