// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # cildasm
//!
//! A decoder and assembler-style text renderer for CIL (ECMA-335) method-body
//! bytecode. Given the raw byte stream of one method body, `cildasm` produces
//! an ordered, byte-exact sequence of typed instructions with resolved
//! operands, and renders each instruction as a text line of the form
//! `IL_XXXX: mnemonic [operand]`.
//!
//! ## Features
//!
//! - **Complete opcode catalog** - every single-byte and `0xFE`-prefixed
//!   instruction of ECMA-335, as a static data table
//! - **Two-phase resolution** - one linear decode pass, then one explicit
//!   resolve pass computing forward/backward branch targets and mapping
//!   metadata tokens through a pluggable resolver
//! - **Signature decoding** - the compressed-integer signature sub-format used
//!   by indirect-call (`calli`) sites
//! - **Faithful rendering** - the full type-name grammar (assembly qualifiers,
//!   nesting, generics, arrays, by-ref) and string-literal escaping with the
//!   `bytearray(..)` fallback
//! - **Failures recorded, not thrown** - a caller always receives an
//!   [`disassembler::InstructionList`], possibly marked invalid, with the
//!   decoded prefix retained for diagnostics
//!
//! ## Quick Start
//!
//! ```rust
//! use cildasm::prelude::*;
//!
//! let body = [0x00, 0x2A]; // nop, ret
//! let mut list = InstructionList::decode(body.as_slice(), None)?;
//! list.resolve(&EmptyResolver);
//!
//! for index in 0..list.len() {
//!     println!("{}", format_instruction(&list, index, &EmptyResolver)?);
//! }
//! # Ok::<(), cildasm::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `cildasm` is organized into the following modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and functions
//! - [`disassembler`] - Opcode catalog, decode/resolve passes, text rendering
//! - [`metadata`] - Tokens, the resolver capability interface, the entity
//!   model and signature decoding
//! - [`file`] - Bounds-checked primitive reads and the cursor parser with the
//!   ECMA-335 compressed encodings
//! - [`Error`] and [`Result`] - Crate-wide error handling
//!
//! The core never inspects an assembly on its own: token and slot lookups go
//! through the [`metadata::resolver::MetadataResolver`] trait, and a concrete
//! adapter per embedding supplies the metadata facilities behind it.
//!
//! ## Standards Compliance
//!
//! `cildasm` implements the instruction encodings and signature formats of the
//! **ECMA-335 specification** (6th edition). One deliberate deviation is
//! preserved from the original behavior this library models: the 4-byte
//! compressed-integer form is decoded leniently (the third high bit of the
//! first byte is not required to be clear).
//!
//! ### References
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Official CLI specification
//! - [.NET Runtime](https://github.com/dotnet/runtime) - Microsoft's reference implementation

#[macro_use]
pub(crate) mod error;

/// Low-level buffer access: endian-aware reads and the cursor parser.
pub mod file;

/// Convenient re-exports of the most commonly used types and functions.
///
/// # Example
///
/// ```rust
/// use cildasm::prelude::*;
///
/// let mut list = InstructionList::decode([0x2A].as_slice(), None)?;
/// list.resolve(&EmptyResolver);
/// assert_eq!(list.len(), 1);
/// # Ok::<(), cildasm::Error>(())
/// ```
pub mod prelude;

/// Instruction decoding, resolution and disassembly text rendering.
pub mod disassembler;

/// Tokens, the metadata resolver interface, entities and signatures.
pub mod metadata;

/// `cildasm` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is
/// always [`Error`]. Used consistently throughout the crate for all fallible
/// operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `cildasm` Error type
///
/// The main error type for all operations in this crate. Decode and resolve
/// failures inside a method body are recorded on the list rather than raised;
/// the variants here surface through public entry points.
pub use error::Error;

/// Low-level parsing utility for decoding CIL bytecode and signature blobs.
///
/// # Example
///
/// ```rust
/// use cildasm::{Parser, disassembler::decode_instruction};
/// let code = [0x2A]; // ret
/// let mut parser = Parser::new(&code);
/// let instruction = decode_instruction(&mut parser, 0)?;
/// assert_eq!(instruction.opcode.mnemonic, "ret");
/// # Ok::<(), cildasm::Error>(())
/// ```
pub use file::parser::Parser;
