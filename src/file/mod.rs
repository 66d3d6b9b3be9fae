//! Low-level buffer access for CIL method bodies.
//!
//! This module provides the primitive reading layer underneath the instruction
//! decoder and the signature decoder: endian-aware bounds-checked reads over an
//! in-memory byte buffer, plus the cursor-based [`parser::Parser`] with the
//! compressed-integer and compressed-token encodings of ECMA-335 II.23.2.

pub mod io;
pub mod parser;
