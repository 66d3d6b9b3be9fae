//! Standalone method signature decoding (ECMA-335 II.23.2).
//!
//! Indirect-call instructions (`calli`) carry a token that resolves to an
//! out-of-line signature blob: one calling-convention byte, a compressed
//! parameter count, then a return type and parameter types in the compressed
//! element-type encoding. This module decodes that blob into a
//! [`MethodSignature`].
//!
//! # Key Types
//! - [`SignatureParser`] - Walks a blob once, front to back
//! - [`MethodSignature`] - Convention, flags, return and parameter types
//! - [`CallKind`] - The seven supported convention kinds
//! - [`SigFlags`] - `HasThis` / `ExplicitThis` modifier bits
//! - [`SigType`] - A decoded parameter or return type
//!
//! Signatures are decoded lazily, once per `calli` site, the first time the
//! instruction's value is requested; see
//! [`crate::disassembler::SignatureSite`].

mod parser;
mod types;

pub use parser::SignatureParser;
pub use types::{CallKind, MethodSignature, SigFlags, SigType};
