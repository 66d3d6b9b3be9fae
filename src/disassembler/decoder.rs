//! CIL instruction decoding.
//!
//! This module implements the single linear decode pass: at each position read
//! the 1-or-2-byte code, look up its catalog descriptor, then dispatch on the
//! operand-type category to consume exactly the declared operand bytes. Any
//! failure aborts the remaining decode and is recorded on the list, keeping the
//! instructions decoded so far.
//!
//! # Example: Decoding a Single Instruction
//!
//! ```rust
//! use cildasm::{disassembler::decode_instruction, Parser};
//!
//! let code = [0x2A]; // ret
//! let mut parser = Parser::new(&code);
//! let instruction = decode_instruction(&mut parser, 0)?;
//! assert_eq!(instruction.opcode.mnemonic, "ret");
//! # Ok::<(), cildasm::Error>(())
//! ```

use crate::{
    disassembler::{
        instruction::{Diagnostic, Instruction, Operand, OperandKind},
        instructions,
    },
    file::parser::Parser,
    metadata::token::Token,
    Error, Result,
};

/// Everything one decode pass produces.
pub(crate) struct DecodeOutcome {
    /// Instructions decoded before the end of the buffer or the first failure.
    pub instructions: Vec<Instruction>,
    /// Failures recorded during the pass.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the pass failed before consuming the whole buffer.
    pub invalid: bool,
}

/// Run the single forward pass over a whole method body.
///
/// Decoding continues until the buffer is exhausted or a failure occurs; a
/// failure marks the outcome invalid and retains the decoded prefix.
pub(crate) fn decode(buffer: &[u8]) -> DecodeOutcome {
    let mut parser = Parser::new(buffer);
    let mut instructions = Vec::new();
    let mut diagnostics = Vec::new();
    let mut invalid = false;

    while parser.has_more_data() {
        let offset = parser.pos();

        match decode_instruction(&mut parser, offset) {
            Ok(instruction) => instructions.push(instruction),
            Err(Error::UnknownOpCode(code)) => {
                diagnostics.push(Diagnostic::UnknownOpCode { offset, code });
                invalid = true;
                break;
            }
            Err(error) => {
                diagnostics.push(Diagnostic::MalformedOperand {
                    offset,
                    message: error.to_string(),
                });
                invalid = true;
                break;
            }
        }
    }

    DecodeOutcome {
        instructions,
        diagnostics,
        invalid,
    }
}

/// Decodes a single CIL instruction from the current parser position.
///
/// This is the core instruction decoding function. It reads the 1-or-2-byte
/// code, looks up the catalog descriptor, and dispatches on the operand-type
/// category:
///
/// - **no operand**: zero bytes; the shorthand forms carry their pre-bound
///   slot index as the operand instead
/// - **fixed-width numeric**: exactly the declared byte width
/// - **branch**: the signed displacement plus the branch base (the offset
///   right after this instruction), captured for the resolve phase
/// - **token-bearing**: a 4-byte [`Token`]
/// - **switch**: a 4-byte non-negative count, then that many 4-byte signed
///   relative targets; the branch base follows all of them
/// - **slot**: the declared 1- or 2-byte slot index; parameter vs local comes
///   from the catalog, never from the mnemonic text
///
/// The parser advances past the instruction on success.
///
/// # Arguments
///
/// * `parser` - A parser positioned at the start of an instruction
/// * `offset` - The byte offset of the instruction within its method body
///
/// # Errors
///
/// Returns [`crate::Error::UnknownOpCode`] for codes outside the catalog,
/// [`crate::Error::Malformed`] for structural operand violations (negative
/// switch count), or [`crate::Error::OutOfBounds`] when the buffer ends inside
/// the instruction.
pub fn decode_instruction(parser: &mut Parser, offset: usize) -> Result<Instruction> {
    let start = parser.pos();

    let code = parser.read_opcode()?;
    let Some(opcode) = instructions::lookup(code) else {
        return Err(Error::UnknownOpCode(code));
    };

    let operand = match opcode.operand {
        OperandKind::InlineNone => match opcode.implicit {
            Some(index) => Operand::ImplicitSlot(index),
            None => Operand::None,
        },
        OperandKind::ShortInlineI => Operand::Int8(parser.read_le::<i8>()?),
        OperandKind::InlineI => Operand::Int32(parser.read_le::<i32>()?),
        OperandKind::InlineI8 => Operand::Int64(parser.read_le::<i64>()?),
        OperandKind::ShortInlineR => Operand::Float32(parser.read_le::<f32>()?),
        OperandKind::InlineR => Operand::Float64(parser.read_le::<f64>()?),
        OperandKind::ShortInlineBrTarget => {
            let relative = parser.read_le::<i8>()?;
            Operand::BranchNear {
                relative,
                base: offset + (parser.pos() - start),
            }
        }
        OperandKind::InlineBrTarget => {
            let relative = parser.read_le::<i32>()?;
            Operand::BranchFar {
                relative,
                base: offset + (parser.pos() - start),
            }
        }
        OperandKind::InlineType
        | OperandKind::InlineMethod
        | OperandKind::InlineField
        | OperandKind::InlineTok
        | OperandKind::InlineString
        | OperandKind::InlineSig => Operand::Token(Token::new(parser.read_le::<u32>()?)),
        OperandKind::InlineSwitch => {
            let count = parser.read_le::<i32>()?;
            if count < 0 {
                return Err(malformed_error!("Negative switch count - {}", count));
            }

            #[allow(clippy::cast_sign_loss)]
            let count = count as usize;
            parser.ensure_remaining(count.checked_mul(4).ok_or(Error::OutOfBounds)?)?;

            let mut relatives = Vec::with_capacity(count);
            for _ in 0..count {
                relatives.push(parser.read_le::<i32>()?);
            }

            Operand::Switch {
                relatives,
                base: offset + (parser.pos() - start),
            }
        }
        OperandKind::ShortInlineVar => Operand::Slot(u16::from(parser.read_le::<u8>()?)),
        OperandKind::InlineVar => Operand::Slot(parser.read_le::<u16>()?),
    };

    Ok(Instruction {
        offset,
        size: parser.pos() - start,
        opcode,
        operand,
    })
}
