//! CIL (Common Intermediate Language) method-body decoding and disassembly.
//!
//! This module turns the raw bytes of one method body into an ordered,
//! byte-exact [`InstructionList`] and renders each instruction as an
//! assembler-style text line.
//!
//! Three phases, always in this order:
//!
//! 1. **Decode** ([`InstructionList::decode`]) - one linear pass over the
//!    buffer, producing immutable instructions with raw operands
//! 2. **Resolve** ([`InstructionList::resolve`]) - one explicit pass filling
//!    the parallel resolution table: branch/switch targets by binary search,
//!    metadata entities through the
//!    [`crate::metadata::resolver::MetadataResolver`]
//! 3. **Format** ([`format_instruction`]) - a pure function from a resolved
//!    instruction to its `IL_XXXX: mnemonic operand` line, invoked on demand
//!
//! # Key Types
//! - [`Instruction`] - A decoded CIL instruction with its raw operand
//! - [`InstructionList`] - The owned buffer, instruction sequence and resolution table
//! - [`OpCode`] - A static catalog descriptor
//! - [`Operand`] / [`Resolved`] - Raw and resolved operand unions
//! - [`Diagnostic`] - Recorded decode/resolve failures
//!
//! # Example
//! ```rust
//! use cildasm::{disassembler::{format_instruction, InstructionList},
//!     metadata::resolver::EmptyResolver};
//!
//! let body = [0x00, 0x2A]; // nop, ret
//! let mut list = InstructionList::decode(body.as_slice(), None)?;
//! list.resolve(&EmptyResolver);
//!
//! assert_eq!(format_instruction(&list, 0, &EmptyResolver)?, "IL_0000: nop");
//! assert_eq!(format_instruction(&list, 1, &EmptyResolver)?, "IL_0001: ret");
//! # Ok::<(), cildasm::Error>(())
//! ```

mod decoder;
mod formatter;
mod instruction;
mod instructions;
mod list;
mod resolver;

pub use decoder::decode_instruction;
pub use formatter::{format_instruction, format_signature, format_string_literal, format_type_name, label};
pub use instruction::{
    BranchTarget, Diagnostic, Instruction, Operand, OperandKind, Resolved, SignatureSite, SlotKind,
};
pub use instructions::{lookup, OpCode, INSTRUCTIONS, INSTRUCTIONS_FE};
pub use list::InstructionList;
