//! The resolve pass: branch/switch targets and metadata entities.
//!
//! A single explicit pass over the decoded, offset-sorted instruction sequence
//! fills the list's parallel resolution table. Branch and switch operands
//! compute their absolute targets (branch base plus signed displacement) and
//! binary-search the sequence for an exact offset match; token operands go
//! through the [`MetadataResolver`]. Failures are recorded on the list, never
//! thrown:
//!
//! - a resolver "not found" answer leaves the value unset, records
//!   [`Diagnostic::UnresolvableToken`] and marks the list invalid, but
//!   resolution continues for the remaining instructions
//! - a target that matches no instruction offset records the non-fatal
//!   [`Diagnostic::OutOfRangeBranchTarget`]; rendering falls back to the `?`
//!   sentinel form

use crate::{
    disassembler::{
        instruction::{
            BranchTarget, Diagnostic, Instruction, Operand, OperandKind, Resolved, SignatureSite,
            SlotKind,
        },
        list::InstructionList,
    },
    metadata::{
        resolver::MetadataResolver,
        token::{table, Token},
        typesystem::CilMember,
    },
};

/// Run the resolve pass over a decoded list.
///
/// Idempotent: a list that has already been resolved is left untouched.
pub(crate) fn resolve(list: &mut InstructionList, resolver: &dyn MetadataResolver) {
    if list.resolved {
        return;
    }

    let InstructionList {
        instructions,
        resolutions,
        branch_targets,
        diagnostics,
        invalid,
        resolved,
        ..
    } = list;

    for (index, instruction) in instructions.iter().enumerate() {
        let resolution = match &instruction.operand {
            Operand::BranchNear { relative, base } => {
                let entry = locate(instructions, *base, i64::from(*relative));
                match entry.index {
                    Some(target) => branch_targets[target] = true,
                    None => diagnostics.push(Diagnostic::OutOfRangeBranchTarget {
                        index,
                        target: entry.target,
                    }),
                }
                Some(Resolved::Branch(entry))
            }
            Operand::BranchFar { relative, base } => {
                let entry = locate(instructions, *base, i64::from(*relative));
                match entry.index {
                    Some(target) => branch_targets[target] = true,
                    None => diagnostics.push(Diagnostic::OutOfRangeBranchTarget {
                        index,
                        target: entry.target,
                    }),
                }
                Some(Resolved::Branch(entry))
            }
            Operand::Switch { relatives, base } => {
                let mut entries = Vec::with_capacity(relatives.len());
                for relative in relatives {
                    let entry = locate(instructions, *base, i64::from(*relative));
                    match entry.index {
                        Some(target) => branch_targets[target] = true,
                        None => diagnostics.push(Diagnostic::OutOfRangeBranchTarget {
                            index,
                            target: entry.target,
                        }),
                    }
                    entries.push(entry);
                }
                Some(Resolved::Switch(entries))
            }
            Operand::Token(token) => {
                let value = resolve_token(instruction.opcode.operand, *token, resolver);
                if value.is_none() {
                    diagnostics.push(Diagnostic::UnresolvableToken {
                        index,
                        token: *token,
                    });
                    *invalid = true;
                }
                value
            }
            Operand::Slot(slot) | Operand::ImplicitSlot(slot) => {
                match instruction.opcode.slot {
                    SlotKind::Parameter => resolver.resolve_parameter(*slot).map(Resolved::Parameter),
                    SlotKind::Local => resolver.resolve_variable(*slot).map(Resolved::Variable),
                    SlotKind::None => None,
                }
            }
            _ => None,
        };

        resolutions[index] = resolution;
    }

    *resolved = true;
}

/// Compute an absolute branch target and binary-search the offset-sorted
/// sequence for an exact match.
fn locate(instructions: &[Instruction], base: usize, relative: i64) -> BranchTarget {
    #[allow(clippy::cast_possible_wrap)]
    let target = base as i64 + relative;

    let index = usize::try_from(target).ok().and_then(|offset| {
        instructions
            .binary_search_by(|instruction| instruction.offset.cmp(&offset))
            .ok()
    });

    BranchTarget { target, index }
}

/// Classify a token operand by its table tag and resolve it to the concrete
/// payload shape of the instruction.
fn resolve_token(
    kind: OperandKind,
    token: Token,
    resolver: &dyn MetadataResolver,
) -> Option<Resolved> {
    match kind {
        OperandKind::InlineType => resolver.resolve_type(token).map(Resolved::Type),
        OperandKind::InlineMethod => resolver.resolve_method(token).map(Resolved::Method),
        OperandKind::InlineField => resolver.resolve_field(token).map(Resolved::Field),
        OperandKind::InlineString => resolver.resolve_string(token).map(Resolved::String),
        OperandKind::InlineSig => resolver
            .resolve_signature(token)
            .map(|blob| Resolved::Signature(SignatureSite::new(token, blob))),
        OperandKind::InlineTok => resolve_member_token(token, resolver).map(Resolved::Member),
        _ => None,
    }
}

/// Dispatch an ambiguous-member token by table tag; `MemberRef` tokens fall
/// through to the resolver's own by-shape dispatch.
fn resolve_member_token(token: Token, resolver: &dyn MetadataResolver) -> Option<CilMember> {
    match token.table() {
        table::TYPE_DEF | table::TYPE_REF | table::TYPE_SPEC => {
            resolver.resolve_type(token).map(CilMember::Type)
        }
        table::FIELD => resolver.resolve_field(token).map(CilMember::Field),
        table::METHOD_DEF | table::METHOD_SPEC => {
            resolver.resolve_method(token).map(CilMember::Method)
        }
        _ => resolver.resolve_member(token),
    }
}
