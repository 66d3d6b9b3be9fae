//! CIL instruction representation and decoding metadata.
//!
//! This module defines the type system for decoded CIL instructions: the operand
//! encoding categories of the opcode catalog, the tagged-union raw operand with
//! one discriminant per category, the immutable [`Instruction`] itself, and the
//! [`Resolved`] union the resolve pass fills in. Formatting and analysis are
//! pattern matches over these discriminants, never polymorphic dispatch.
//!
//! # Key Components
//!
//! - [`Instruction`] - Complete decoded instruction (offset, size, descriptor, raw operand)
//! - [`Operand`] - Type-safe raw operand representation with per-category payload
//! - [`OperandKind`] - Operand encoding categories with their declared byte sizes
//! - [`SlotKind`] - Parameter/local disambiguation for the shared slot encodings
//! - [`Resolved`] - Resolve-pass results (branch targets, entities, strings, signatures)
//! - [`Diagnostic`] - Recorded decode/resolve failures

use std::sync::OnceLock;

use crate::{
    disassembler::instructions::OpCode,
    metadata::{
        resolver::MetadataResolver,
        signatures::{MethodSignature, SignatureParser},
        token::Token,
        typesystem::{CilField, CilMember, CilMethod, CilType, SlotDescriptor},
    },
    Result,
};

/// Operand encoding categories for CIL instructions.
///
/// Each category fixes how many operand bytes follow the opcode and how they are
/// interpreted. The names follow the ECMA-335 operand-type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// No operand bytes
    InlineNone,
    /// Signed 8-bit integer
    ShortInlineI,
    /// Signed 32-bit integer
    InlineI,
    /// Signed 64-bit integer
    InlineI8,
    /// 32-bit floating point
    ShortInlineR,
    /// 64-bit floating point
    InlineR,
    /// 1-byte signed relative branch target
    ShortInlineBrTarget,
    /// 4-byte signed relative branch target
    InlineBrTarget,
    /// Metadata token naming a type
    InlineType,
    /// Metadata token naming a method
    InlineMethod,
    /// Metadata token naming a field
    InlineField,
    /// Metadata token naming a type, method or field (`ldtoken`)
    InlineTok,
    /// Metadata token into the user-string heap
    InlineString,
    /// Metadata token naming a standalone signature
    InlineSig,
    /// 4-byte count followed by that many 4-byte relative targets
    InlineSwitch,
    /// 1-byte parameter or local slot index
    ShortInlineVar,
    /// 2-byte parameter or local slot index
    InlineVar,
}

impl OperandKind {
    /// Returns the declared operand size in bytes, or `None` for the
    /// variable-length switch table.
    #[must_use]
    pub const fn size(&self) -> Option<usize> {
        match self {
            OperandKind::InlineNone => Some(0),
            OperandKind::ShortInlineI
            | OperandKind::ShortInlineBrTarget
            | OperandKind::ShortInlineVar => Some(1),
            OperandKind::InlineVar => Some(2),
            OperandKind::InlineI
            | OperandKind::ShortInlineR
            | OperandKind::InlineBrTarget
            | OperandKind::InlineType
            | OperandKind::InlineMethod
            | OperandKind::InlineField
            | OperandKind::InlineTok
            | OperandKind::InlineString
            | OperandKind::InlineSig => Some(4),
            OperandKind::InlineI8 | OperandKind::InlineR => Some(8),
            OperandKind::InlineSwitch => None, // Variable size: 4 + (count * 4)
        }
    }

    /// Whether this category carries a metadata token.
    #[must_use]
    pub const fn is_token(&self) -> bool {
        matches!(
            self,
            OperandKind::InlineType
                | OperandKind::InlineMethod
                | OperandKind::InlineField
                | OperandKind::InlineTok
                | OperandKind::InlineString
                | OperandKind::InlineSig
        )
    }
}

/// Disambiguation of the shared parameter/local slot encodings.
///
/// `ShortInlineVar` and `InlineVar` are identical at the binary level for the
/// `ldarg`/`ldloc` families; the catalog carries the logical kind per mnemonic
/// so no runtime string matching is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Not a slot-bearing instruction
    None,
    /// Method parameter slot
    Parameter,
    /// Local variable slot
    Local,
}

/// Raw operand of a decoded instruction.
///
/// One discriminant per operand-type category; branch and switch variants carry
/// the branch base (the offset right after the instruction) captured at decode
/// time for the resolve phase.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand present
    None,
    /// Signed 8-bit immediate value
    Int8(i8),
    /// Signed 32-bit immediate value
    Int32(i32),
    /// Signed 64-bit immediate value
    Int64(i64),
    /// 32-bit floating point immediate value
    Float32(f32),
    /// 64-bit floating point immediate value
    Float64(f64),
    /// Metadata token reference
    Token(Token),
    /// 1-byte relative branch with its branch base
    BranchNear {
        /// Signed relative displacement
        relative: i8,
        /// Offset immediately following this instruction
        base: usize,
    },
    /// 4-byte relative branch with its branch base
    BranchFar {
        /// Signed relative displacement
        relative: i32,
        /// Offset immediately following this instruction
        base: usize,
    },
    /// Switch table with its shared branch base
    Switch {
        /// Signed relative displacements, one per case
        relatives: Vec<i32>,
        /// Offset immediately following the count and all targets
        base: usize,
    },
    /// Parameter or local slot index read from an explicit operand
    Slot(u16),
    /// Parameter or local slot index pre-bound by the mnemonic, no bytes consumed
    ImplicitSlot(u16),
}

/// A decoded CIL instruction.
///
/// Instructions are owned exclusively by the [`crate::disassembler::InstructionList`]
/// that created them and are immutable once the decode pass has produced them;
/// resolved values live in the list's parallel resolution table.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Byte offset of this instruction within the method body
    pub offset: usize,
    /// Size of this instruction in bytes, opcode and operand included
    pub size: usize,
    /// Catalog descriptor for this instruction
    pub opcode: &'static OpCode,
    /// The raw operand data
    pub operand: Operand,
}

impl Instruction {
    /// Check if this instruction is a branch or switch instruction.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        matches!(
            self.opcode.operand,
            OperandKind::ShortInlineBrTarget
                | OperandKind::InlineBrTarget
                | OperandKind::InlineSwitch
        )
    }

    /// Extracts the metadata token from the instruction, if its operand carries one.
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        match &self.operand {
            Operand::Token(token) => Some(*token),
            _ => None,
        }
    }
}

/// Computed branch-resolution entry.
///
/// The absolute target (branch base plus signed relative displacement) and,
/// when that target landed exactly on an instruction boundary, the index of
/// the instruction at that offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchTarget {
    /// Absolute target offset; may lie outside the method
    pub target: i64,
    /// Index of the instruction at the target offset, when one exists
    pub index: Option<usize>,
}

/// A `calli` site: the raw signature blob plus its lazily decoded signature.
///
/// The signature is parsed once, the first time it is requested, and cached;
/// repeated requests return the cached value unchanged.
#[derive(Debug)]
pub struct SignatureSite {
    /// The standalone-signature token the instruction referenced
    pub token: Token,
    blob: Vec<u8>,
    cache: OnceLock<MethodSignature>,
}

impl SignatureSite {
    pub(crate) fn new(token: Token, blob: Vec<u8>) -> Self {
        SignatureSite {
            token,
            blob,
            cache: OnceLock::new(),
        }
    }

    /// The raw signature blob bytes.
    #[must_use]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Decode the signature, parsing the blob on first use.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedSignature`] for unsupported
    /// calling-convention sub-kinds, or [`crate::Error::Malformed`] /
    /// [`crate::Error::OutOfBounds`] for structurally invalid blobs. Errors are
    /// raised to the caller, never swallowed.
    pub fn signature(&self, resolver: &dyn MetadataResolver) -> Result<&MethodSignature> {
        if let Some(signature) = self.cache.get() {
            return Ok(signature);
        }

        let signature = SignatureParser::new(&self.blob).parse_method_signature(resolver)?;
        Ok(self.cache.get_or_init(|| signature))
    }
}

/// A resolved instruction value, one variant per operand payload shape.
///
/// Kept in a parallel table on the [`crate::disassembler::InstructionList`],
/// indexed by instruction position and assembled in one explicit resolve pass.
#[derive(Debug)]
pub enum Resolved {
    /// Branch instruction target
    Branch(BranchTarget),
    /// Switch instruction targets, one entry per case
    Switch(Vec<BranchTarget>),
    /// Resolved type entity
    Type(CilType),
    /// Resolved method entity
    Method(CilMethod),
    /// Resolved field entity
    Field(CilField),
    /// Resolved ambiguous member (`ldtoken`)
    Member(CilMember),
    /// Resolved user-string literal
    String(String),
    /// Indirect-call signature site
    Signature(SignatureSite),
    /// Resolved parameter slot
    Parameter(SlotDescriptor),
    /// Resolved local-variable slot
    Variable(SlotDescriptor),
}

/// Per-list record of a decode or resolve failure.
///
/// Failures are recorded, not thrown: the caller always receives an
/// [`crate::disassembler::InstructionList`], possibly marked invalid, with the
/// conditions that occurred listed here.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Numeric code not present in the opcode catalog; decoding aborted here
    UnknownOpCode {
        /// Offset of the offending code
        offset: usize,
        /// The code that was read
        code: u16,
    },
    /// Structural operand violation; decoding aborted here
    MalformedOperand {
        /// Offset of the offending instruction
        offset: usize,
        /// Description of the violation
        message: String,
    },
    /// The metadata resolver answered "not found"; resolution continued
    UnresolvableToken {
        /// Index of the affected instruction
        index: usize,
        /// The token that failed to resolve
        token: Token,
    },
    /// A branch or switch target does not match any instruction offset; non-fatal
    OutOfRangeBranchTarget {
        /// Index of the affected instruction
        index: usize,
        /// The computed absolute target
        target: i64,
    },
}
