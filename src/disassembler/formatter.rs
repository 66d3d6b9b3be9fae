//! Assembler-style text rendering for resolved instructions.
//!
//! Pure functions from a resolved instruction to its disassembly line:
//! `IL_XXXX: mnemonic [operand]`. The owning [`InstructionList`] is consulted
//! only to know which assembly the method lives in (so redundant `[Assembly]`
//! qualifiers are omitted) and to look up resolved branch targets.
//!
//! Rendering rules:
//!
//! - Built-in types map to fixed keywords; other types render as
//!   `[Assembly]Namespace.Name`, nested types joined by `/`, generic arguments
//!   in `<...>`, one `[]`/`[,..]` suffix per array rank, trailing `&` for
//!   by-reference types
//! - Member operands render `DeclaringType::Name`; methods include the return
//!   type and full parameter list, ambiguous-member operands carry a
//!   `field`/`method` keyword
//! - String literals are escaped; a character the text grammar cannot carry
//!   forces the whole literal into the `bytearray(XX XX ..)` form, two bytes
//!   per UTF-16 code unit
//! - Explicit parameter/local slots render their resolved name (or index)
//!   inline; the pre-bound shorthand slots render a trailing `// name` comment
//! - Unresolved values render the `?` sentinel, with a best-effort computed
//!   `// IL_xxxx` comment for branches

use widestring::U16String;

use crate::{
    disassembler::{
        instruction::{BranchTarget, Instruction, Operand, Resolved},
        list::InstructionList,
    },
    metadata::{
        resolver::MetadataResolver,
        signatures::{CallKind, MethodSignature, SigFlags, SigType},
        typesystem::{CilField, CilMember, CilMethod, CilType, SlotDescriptor},
    },
    Error, Result,
};

/// Render one instruction as `IL_XXXX: mnemonic [operand]`.
///
/// The resolver is consulted only for lazily decoded signature sites; all other
/// resolved values come from the list's resolution table.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] for an out-of-range index, or the
/// signature decoder's error for a `calli` site whose signature blob cannot be
/// decoded (see [`crate::Error::UnsupportedSignature`]).
pub fn format_instruction(
    list: &InstructionList,
    index: usize,
    resolver: &dyn MetadataResolver,
) -> Result<String> {
    let instruction = list.instruction(index).ok_or(Error::OutOfBounds)?;

    let mut line = format!(
        "{}: {}",
        label(instruction.offset as i64),
        instruction.opcode.mnemonic
    );
    if let Some(operand) = format_operand(list, index, instruction, resolver)? {
        line.push(' ');
        line.push_str(&operand);
    }

    Ok(line)
}

/// The label of a byte offset: `IL_` plus the 4-hex-digit zero-padded offset.
#[must_use]
pub fn label(offset: i64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let offset = offset as u32;
    format!("IL_{offset:04x}")
}

fn format_operand(
    list: &InstructionList,
    index: usize,
    instruction: &Instruction,
    resolver: &dyn MetadataResolver,
) -> Result<Option<String>> {
    let resolution = list.resolved(index);

    let text = match &instruction.operand {
        Operand::None => return Ok(None),
        Operand::Int8(value) => value.to_string(),
        Operand::Int32(value) => value.to_string(),
        Operand::Int64(value) => value.to_string(),
        Operand::Float32(value) => value.to_string(),
        Operand::Float64(value) => value.to_string(),
        Operand::BranchNear { relative, base } => {
            branch_text(list, resolution, *base, i64::from(*relative))
        }
        Operand::BranchFar { relative, base } => {
            branch_text(list, resolution, *base, i64::from(*relative))
        }
        Operand::Switch { relatives, .. } => switch_text(list, resolution, relatives.len()),
        Operand::Token(_) => return token_text(list, resolution, resolver).map(Some),
        Operand::Slot(slot) => explicit_slot_text(resolution, *slot),
        Operand::ImplicitSlot(slot) => match implicit_slot_comment(resolution, *slot) {
            Some(comment) => comment,
            None => return Ok(None),
        },
    };

    Ok(Some(text))
}

fn branch_text(
    list: &InstructionList,
    resolution: Option<&Resolved>,
    base: usize,
    relative: i64,
) -> String {
    let entry = match resolution {
        Some(Resolved::Branch(entry)) => *entry,
        _ => {
            #[allow(clippy::cast_possible_wrap)]
            let target = base as i64 + relative;
            BranchTarget {
                target,
                index: None,
            }
        }
    };

    match entry.index.and_then(|target| list.instruction(target)) {
        Some(target) => label(target.offset as i64),
        None => format!("? // {}", label(entry.target)),
    }
}

fn switch_text(list: &InstructionList, resolution: Option<&Resolved>, count: usize) -> String {
    let entries: Vec<String> = match resolution {
        Some(Resolved::Switch(entries)) => entries
            .iter()
            .map(
                |entry| match entry.index.and_then(|target| list.instruction(target)) {
                    Some(target) => label(target.offset as i64),
                    None => "?".to_string(),
                },
            )
            .collect(),
        _ => vec!["?".to_string(); count],
    };

    format!("({})", entries.join(", "))
}

fn token_text(
    list: &InstructionList,
    resolution: Option<&Resolved>,
    resolver: &dyn MetadataResolver,
) -> Result<String> {
    let home = list.assembly();

    match resolution {
        Some(Resolved::Type(ty)) => Ok(format_type_name(ty, home, false)),
        Some(Resolved::Method(method)) => Ok(format_method(method, home)),
        Some(Resolved::Field(field)) => Ok(format_field(field, home)),
        Some(Resolved::Member(member)) => Ok(match member {
            CilMember::Type(ty) => format_type_name(ty, home, false),
            CilMember::Method(method) => format!("method {}", format_method(method, home)),
            CilMember::Field(field) => format!("field {}", format_field(field, home)),
        }),
        Some(Resolved::String(text)) => Ok(format_string_literal(text)),
        Some(Resolved::Signature(site)) => {
            let signature = site.signature(resolver)?;
            Ok(format_signature(signature, home))
        }
        _ => Ok("?".to_string()),
    }
}

fn explicit_slot_text(resolution: Option<&Resolved>, slot: u16) -> String {
    match resolution {
        Some(Resolved::Parameter(descriptor) | Resolved::Variable(descriptor)) => {
            slot_name(descriptor, slot)
        }
        _ => slot.to_string(),
    }
}

fn implicit_slot_comment(resolution: Option<&Resolved>, slot: u16) -> Option<String> {
    match resolution {
        Some(Resolved::Parameter(descriptor) | Resolved::Variable(descriptor)) => {
            Some(format!("// {}", slot_name(descriptor, slot)))
        }
        _ => None,
    }
}

fn slot_name(descriptor: &SlotDescriptor, slot: u16) -> String {
    if descriptor.is_this {
        return "this".to_string();
    }
    descriptor
        .name
        .clone()
        .unwrap_or_else(|| slot.to_string())
}

/// Render a type name.
///
/// `with_modifiers` adds the `valuetype `/`class ` prefix for non-built-in
/// types; it is requested inside member signatures, not for bare type operands.
/// The `[Assembly]` qualifier is omitted iff the type's owning assembly equals
/// `home`.
#[must_use]
pub fn format_type_name(ty: &CilType, home: Option<&str>, with_modifiers: bool) -> String {
    if let Some(builtin) = ty.builtin() {
        let mut text = builtin.keyword().to_string();
        if ty.by_ref {
            text.push('&');
        }
        return text;
    }

    let mut text = String::new();
    if with_modifiers {
        text.push_str(if ty.is_value_type {
            "valuetype "
        } else {
            "class "
        });
    }

    if let Some(assembly) = ty.assembly.as_deref() {
        if home != Some(assembly) {
            text.push('[');
            text.push_str(assembly);
            text.push(']');
        }
    }

    text.push_str(&qualified_name(ty));

    if !ty.generic_args.is_empty() {
        let args: Vec<String> = ty
            .generic_args
            .iter()
            .map(|arg| format_type_name(arg, home, with_modifiers))
            .collect();
        text.push('<');
        text.push_str(&args.join(", "));
        text.push('>');
    }

    for &rank in &ty.array_shape {
        text.push('[');
        for _ in 1..rank {
            text.push(',');
        }
        text.push(']');
    }

    if ty.by_ref {
        text.push('&');
    }

    text
}

/// Dotted namespace.name, nested types joined by `/` from the outermost
/// declaring type inwards.
fn qualified_name(ty: &CilType) -> String {
    let mut chain = vec![ty];
    let mut current = ty;
    while let Some(declaring) = current.declaring.as_deref() {
        chain.push(declaring);
        current = declaring;
    }
    chain.reverse();

    chain
        .iter()
        .map(|link| {
            if link.namespace.is_empty() {
                link.name.clone()
            } else {
                format!("{}.{}", link.namespace, link.name)
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn format_method(method: &CilMethod, home: Option<&str>) -> String {
    let mut text = String::new();
    if method.has_this {
        text.push_str("instance ");
    }
    text.push_str(&format_type_name(&method.return_type, home, true));
    text.push(' ');
    text.push_str(&format_type_name(&method.declaring, home, false));
    text.push_str("::");
    text.push_str(&method.name);
    text.push('(');
    let params: Vec<String> = method
        .params
        .iter()
        .map(|param| format_type_name(param, home, true))
        .collect();
    text.push_str(&params.join(", "));
    text.push(')');
    text
}

fn format_field(field: &CilField, home: Option<&str>) -> String {
    format!(
        "{} {}::{}",
        format_type_name(&field.field_type, home, true),
        format_type_name(&field.declaring, home, false),
        field.name
    )
}

/// Render a decoded indirect-call signature as
/// `[conventions] returnType(required..., "..." optional...)`.
#[must_use]
pub fn format_signature(signature: &MethodSignature, home: Option<&str>) -> String {
    let mut text = String::new();
    if signature.flags.contains(SigFlags::HAS_THIS) {
        text.push_str("instance ");
    }
    if signature.flags.contains(SigFlags::EXPLICIT_THIS) {
        text.push_str("explicit ");
    }

    match signature.convention {
        CallKind::Default => {}
        CallKind::VarArg => text.push_str("vararg "),
        kind => {
            text.push_str("unmanaged ");
            text.push_str(kind.keyword());
            text.push(' ');
        }
    }

    text.push_str(&sig_type_text(&signature.return_type, home));
    text.push('(');

    let mut parts: Vec<String> = signature
        .params
        .iter()
        .map(|param| sig_type_text(param, home))
        .collect();
    if !signature.varargs.is_empty() {
        parts.push("...".to_string());
        parts.extend(
            signature
                .varargs
                .iter()
                .map(|param| sig_type_text(param, home)),
        );
    }
    text.push_str(&parts.join(", "));
    text.push(')');
    text
}

fn sig_type_text(sig_type: &SigType, home: Option<&str>) -> String {
    match sig_type {
        SigType::Builtin(builtin) => builtin.keyword().to_string(),
        SigType::Class {
            resolved: Some(ty), ..
        }
        | SigType::ValueType {
            resolved: Some(ty), ..
        } => format_type_name(ty, home, true),
        SigType::Class { .. } | SigType::ValueType { .. } => "?".to_string(),
    }
}

/// Render a user-string literal as a quoted, escaped literal.
///
/// `\ " \a \b \f \n \r \t \v` use named escapes; printable characters pass
/// through; control characters 1-19 render as a zero-padded 3-digit octal
/// escape; any other character forces the whole literal into the
/// `bytearray(XX XX ..)` form, because the text grammar cannot represent it.
#[must_use]
pub fn format_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');

    for character in text.chars() {
        match character {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0B' => out.push_str("\\v"),
            c if is_displayable(c) => out.push(c),
            c if (1..=19).contains(&(c as u32)) => {
                out.push('\\');
                out.push_str(&format!("{:03o}", c as u32));
            }
            _ => return bytearray_literal(text),
        }
    }

    out.push('"');
    out
}

/// Whether the text grammar carries this character as-is.
fn is_displayable(character: char) -> bool {
    if character.is_ascii() {
        character == ' ' || character.is_ascii_graphic()
    } else {
        character.is_alphanumeric()
    }
}

/// The `bytearray(..)` fallback: two bytes per UTF-16 code unit, little-endian.
fn bytearray_literal(text: &str) -> String {
    let units = U16String::from_str(text);

    let mut out = String::from("bytearray(");
    for (position, unit) in units.as_slice().iter().enumerate() {
        if position > 0 {
            out.push(' ');
        }
        let bytes = unit.to_le_bytes();
        out.push_str(&format!("{:02X} {:02X}", bytes[0], bytes[1]));
    }
    out.push(')');
    out
}
