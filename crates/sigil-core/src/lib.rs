//! # Sigil Core
//!
//! The matching engine of the Sigil command dispatcher.
//!
//! This crate knows nothing about handlers, modules or chat transports. It
//! provides the pieces a dispatcher is built from:
//!
//! - **[`Cursor`]**: forward-only scanning over a line of input
//! - **[`ParameterKind`]**: the closed set of typed decoders (integers, floats,
//!   pattern-bound text)
//! - **[`Template`]**: a parsed signature of literals, whitespace runs and
//!   placeholders
//! - **[`match_signature`]**: the single-pass, non-backtracking matcher that
//!   scores how far an input gets through a template
//!
//! ```rust
//! use sigil_core::{ParamType, ParameterKind, Template, match_signature};
//!
//! let template = Template::parse("volume {level}").unwrap();
//! let kinds = [ParameterKind::from_type(ParamType::U8, None).unwrap()];
//!
//! let result = match_signature(&template, &kinds, "VOLUME 70");
//! assert!(result.complete);
//! assert_eq!(result.extracted, vec!["70"]);
//! ```

pub mod cursor;
pub mod error;
pub mod matcher;
pub mod param;
pub mod template;

pub use cursor::Cursor;
pub use error::{
    ParamError, ParamResult, RegistrationError, RegistrationResult, TemplateError, TemplateResult,
};
pub use matcher::{MatchResult, match_signature};
pub use param::{FloatWidth, IntWidth, ParamType, ParamValue, ParameterKind, anchored};
pub use template::{Segment, Template, Token};
