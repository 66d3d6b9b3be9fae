//! # cildasm Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! and functions of the library. Import this module to get quick access to the
//! essential types for CIL method-body disassembly.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cildasm operations
pub use crate::Error;

/// The result type used throughout cildasm
pub use crate::Result;

/// Low-level bytecode parsing utility
pub use crate::Parser;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The decoded method body: instructions plus their resolution table
pub use crate::disassembler::InstructionList;

/// Single-instruction decoding
pub use crate::disassembler::decode_instruction;

/// Disassembly text rendering
pub use crate::disassembler::{
    format_instruction, format_signature, format_string_literal, format_type_name, label,
};

// ================================================================================================
// Instruction Model
// ================================================================================================

/// Decoded instruction and operand types
pub use crate::disassembler::{
    BranchTarget, Diagnostic, Instruction, OpCode, Operand, OperandKind, Resolved, SignatureSite,
    SlotKind,
};

/// The static opcode catalog
pub use crate::disassembler::{lookup, INSTRUCTIONS, INSTRUCTIONS_FE};

// ================================================================================================
// Metadata System
// ================================================================================================

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// The metadata resolver capability interface and the always-empty resolver
pub use crate::metadata::resolver::{EmptyResolver, MetadataResolver};

/// The resolved-entity model rendered by the formatter
pub use crate::metadata::typesystem::{
    BuiltinType, CilField, CilMember, CilMethod, CilType, SlotDescriptor,
};

/// Signature decoding for indirect-call sites
pub use crate::metadata::signatures::{
    CallKind, MethodSignature, SigFlags, SigType, SignatureParser,
};
