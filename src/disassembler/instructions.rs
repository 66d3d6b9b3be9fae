//! The static CIL opcode catalog.
//!
//! Two once-built tables cover the whole instruction set: [`INSTRUCTIONS`] is
//! indexed directly by the single-byte codes `0x00`-`0xE0`, and
//! [`INSTRUCTIONS_FE`] by the second byte of the `0xFE`-prefixed codes.
//! Reserved encodings hold entries with an empty mnemonic so lookups stay a
//! plain array index.
//!
//! Each [`OpCode`] carries the operand encoding category, the parameter/local
//! slot disambiguation for the encodings the two families share, and the
//! pre-bound slot index of the shorthand forms (`ldarg.0`-`ldarg.3`,
//! `ldloc.0`-`ldloc.3`, `stloc.0`-`stloc.3`). Both columns are fixed data, so
//! no mnemonic inspection ever happens at decode time.

use crate::disassembler::instruction::{OperandKind, SlotKind};

/// A single entry of the static opcode catalog.
///
/// Descriptors are immutable and created once; decoded instructions reference
/// them by `&'static` pointer.
#[derive(Debug, PartialEq, Eq)]
pub struct OpCode {
    /// Assembler mnemonic; empty for reserved encodings.
    pub mnemonic: &'static str,
    /// Numeric code; two-byte opcodes carry the `0xFE` prefix in the high byte.
    pub code: u16,
    /// Operand encoding category.
    pub operand: OperandKind,
    /// Parameter/local disambiguation for the shared slot encodings.
    pub slot: SlotKind,
    /// Pre-bound slot index for the shorthand forms.
    pub implicit: Option<u16>,
}

const fn op(mnemonic: &'static str, code: u16, operand: OperandKind) -> OpCode {
    OpCode {
        mnemonic,
        code,
        operand,
        slot: SlotKind::None,
        implicit: None,
    }
}

const fn slot(mnemonic: &'static str, code: u16, operand: OperandKind, slot: SlotKind) -> OpCode {
    OpCode {
        mnemonic,
        code,
        operand,
        slot,
        implicit: None,
    }
}

const fn shorthand(mnemonic: &'static str, code: u16, slot: SlotKind, index: u16) -> OpCode {
    OpCode {
        mnemonic,
        code,
        operand: OperandKind::InlineNone,
        slot,
        implicit: Some(index),
    }
}

const fn reserved(code: u16) -> OpCode {
    op("", code, OperandKind::InlineNone)
}

/// Catalog of the single-byte opcodes, indexed by code.
pub static INSTRUCTIONS: [OpCode; 0xE1] = [
    // 0x00
    op("nop", 0x00, OperandKind::InlineNone),
    op("break", 0x01, OperandKind::InlineNone),
    shorthand("ldarg.0", 0x02, SlotKind::Parameter, 0),
    shorthand("ldarg.1", 0x03, SlotKind::Parameter, 1),
    shorthand("ldarg.2", 0x04, SlotKind::Parameter, 2),
    shorthand("ldarg.3", 0x05, SlotKind::Parameter, 3),
    shorthand("ldloc.0", 0x06, SlotKind::Local, 0),
    shorthand("ldloc.1", 0x07, SlotKind::Local, 1),
    shorthand("ldloc.2", 0x08, SlotKind::Local, 2),
    shorthand("ldloc.3", 0x09, SlotKind::Local, 3),
    shorthand("stloc.0", 0x0A, SlotKind::Local, 0),
    shorthand("stloc.1", 0x0B, SlotKind::Local, 1),
    shorthand("stloc.2", 0x0C, SlotKind::Local, 2),
    shorthand("stloc.3", 0x0D, SlotKind::Local, 3),
    slot("ldarg.s", 0x0E, OperandKind::ShortInlineVar, SlotKind::Parameter),
    slot("ldarga.s", 0x0F, OperandKind::ShortInlineVar, SlotKind::Parameter),
    // 0x10
    slot("starg.s", 0x10, OperandKind::ShortInlineVar, SlotKind::Parameter),
    slot("ldloc.s", 0x11, OperandKind::ShortInlineVar, SlotKind::Local),
    slot("ldloca.s", 0x12, OperandKind::ShortInlineVar, SlotKind::Local),
    slot("stloc.s", 0x13, OperandKind::ShortInlineVar, SlotKind::Local),
    op("ldnull", 0x14, OperandKind::InlineNone),
    op("ldc.i4.m1", 0x15, OperandKind::InlineNone),
    op("ldc.i4.0", 0x16, OperandKind::InlineNone),
    op("ldc.i4.1", 0x17, OperandKind::InlineNone),
    op("ldc.i4.2", 0x18, OperandKind::InlineNone),
    op("ldc.i4.3", 0x19, OperandKind::InlineNone),
    op("ldc.i4.4", 0x1A, OperandKind::InlineNone),
    op("ldc.i4.5", 0x1B, OperandKind::InlineNone),
    op("ldc.i4.6", 0x1C, OperandKind::InlineNone),
    op("ldc.i4.7", 0x1D, OperandKind::InlineNone),
    op("ldc.i4.8", 0x1E, OperandKind::InlineNone),
    op("ldc.i4.s", 0x1F, OperandKind::ShortInlineI),
    // 0x20
    op("ldc.i4", 0x20, OperandKind::InlineI),
    op("ldc.i8", 0x21, OperandKind::InlineI8),
    op("ldc.r4", 0x22, OperandKind::ShortInlineR),
    op("ldc.r8", 0x23, OperandKind::InlineR),
    reserved(0x24),
    op("dup", 0x25, OperandKind::InlineNone),
    op("pop", 0x26, OperandKind::InlineNone),
    op("jmp", 0x27, OperandKind::InlineMethod),
    op("call", 0x28, OperandKind::InlineMethod),
    op("calli", 0x29, OperandKind::InlineSig),
    op("ret", 0x2A, OperandKind::InlineNone),
    op("br.s", 0x2B, OperandKind::ShortInlineBrTarget),
    op("brfalse.s", 0x2C, OperandKind::ShortInlineBrTarget),
    op("brtrue.s", 0x2D, OperandKind::ShortInlineBrTarget),
    op("beq.s", 0x2E, OperandKind::ShortInlineBrTarget),
    op("bge.s", 0x2F, OperandKind::ShortInlineBrTarget),
    // 0x30
    op("bgt.s", 0x30, OperandKind::ShortInlineBrTarget),
    op("ble.s", 0x31, OperandKind::ShortInlineBrTarget),
    op("blt.s", 0x32, OperandKind::ShortInlineBrTarget),
    op("bne.un.s", 0x33, OperandKind::ShortInlineBrTarget),
    op("bge.un.s", 0x34, OperandKind::ShortInlineBrTarget),
    op("bgt.un.s", 0x35, OperandKind::ShortInlineBrTarget),
    op("ble.un.s", 0x36, OperandKind::ShortInlineBrTarget),
    op("blt.un.s", 0x37, OperandKind::ShortInlineBrTarget),
    op("br", 0x38, OperandKind::InlineBrTarget),
    op("brfalse", 0x39, OperandKind::InlineBrTarget),
    op("brtrue", 0x3A, OperandKind::InlineBrTarget),
    op("beq", 0x3B, OperandKind::InlineBrTarget),
    op("bge", 0x3C, OperandKind::InlineBrTarget),
    op("bgt", 0x3D, OperandKind::InlineBrTarget),
    op("ble", 0x3E, OperandKind::InlineBrTarget),
    op("blt", 0x3F, OperandKind::InlineBrTarget),
    // 0x40
    op("bne.un", 0x40, OperandKind::InlineBrTarget),
    op("bge.un", 0x41, OperandKind::InlineBrTarget),
    op("bgt.un", 0x42, OperandKind::InlineBrTarget),
    op("ble.un", 0x43, OperandKind::InlineBrTarget),
    op("blt.un", 0x44, OperandKind::InlineBrTarget),
    op("switch", 0x45, OperandKind::InlineSwitch),
    op("ldind.i1", 0x46, OperandKind::InlineNone),
    op("ldind.u1", 0x47, OperandKind::InlineNone),
    op("ldind.i2", 0x48, OperandKind::InlineNone),
    op("ldind.u2", 0x49, OperandKind::InlineNone),
    op("ldind.i4", 0x4A, OperandKind::InlineNone),
    op("ldind.u4", 0x4B, OperandKind::InlineNone),
    op("ldind.i8", 0x4C, OperandKind::InlineNone),
    op("ldind.i", 0x4D, OperandKind::InlineNone),
    op("ldind.r4", 0x4E, OperandKind::InlineNone),
    op("ldind.r8", 0x4F, OperandKind::InlineNone),
    // 0x50
    op("ldind.ref", 0x50, OperandKind::InlineNone),
    op("stind.ref", 0x51, OperandKind::InlineNone),
    op("stind.i1", 0x52, OperandKind::InlineNone),
    op("stind.i2", 0x53, OperandKind::InlineNone),
    op("stind.i4", 0x54, OperandKind::InlineNone),
    op("stind.i8", 0x55, OperandKind::InlineNone),
    op("stind.r4", 0x56, OperandKind::InlineNone),
    op("stind.r8", 0x57, OperandKind::InlineNone),
    op("add", 0x58, OperandKind::InlineNone),
    op("sub", 0x59, OperandKind::InlineNone),
    op("mul", 0x5A, OperandKind::InlineNone),
    op("div", 0x5B, OperandKind::InlineNone),
    op("div.un", 0x5C, OperandKind::InlineNone),
    op("rem", 0x5D, OperandKind::InlineNone),
    op("rem.un", 0x5E, OperandKind::InlineNone),
    op("and", 0x5F, OperandKind::InlineNone),
    // 0x60
    op("or", 0x60, OperandKind::InlineNone),
    op("xor", 0x61, OperandKind::InlineNone),
    op("shl", 0x62, OperandKind::InlineNone),
    op("shr", 0x63, OperandKind::InlineNone),
    op("shr.un", 0x64, OperandKind::InlineNone),
    op("neg", 0x65, OperandKind::InlineNone),
    op("not", 0x66, OperandKind::InlineNone),
    op("conv.i1", 0x67, OperandKind::InlineNone),
    op("conv.i2", 0x68, OperandKind::InlineNone),
    op("conv.i4", 0x69, OperandKind::InlineNone),
    op("conv.i8", 0x6A, OperandKind::InlineNone),
    op("conv.r4", 0x6B, OperandKind::InlineNone),
    op("conv.r8", 0x6C, OperandKind::InlineNone),
    op("conv.u4", 0x6D, OperandKind::InlineNone),
    op("conv.u8", 0x6E, OperandKind::InlineNone),
    op("callvirt", 0x6F, OperandKind::InlineMethod),
    // 0x70
    op("cpobj", 0x70, OperandKind::InlineType),
    op("ldobj", 0x71, OperandKind::InlineType),
    op("ldstr", 0x72, OperandKind::InlineString),
    op("newobj", 0x73, OperandKind::InlineMethod),
    op("castclass", 0x74, OperandKind::InlineType),
    op("isinst", 0x75, OperandKind::InlineType),
    op("conv.r.un", 0x76, OperandKind::InlineNone),
    reserved(0x77),
    reserved(0x78),
    op("unbox", 0x79, OperandKind::InlineType),
    op("throw", 0x7A, OperandKind::InlineNone),
    op("ldfld", 0x7B, OperandKind::InlineField),
    op("ldflda", 0x7C, OperandKind::InlineField),
    op("stfld", 0x7D, OperandKind::InlineField),
    op("ldsfld", 0x7E, OperandKind::InlineField),
    op("ldsflda", 0x7F, OperandKind::InlineField),
    // 0x80
    op("stsfld", 0x80, OperandKind::InlineField),
    op("stobj", 0x81, OperandKind::InlineType),
    op("conv.ovf.i1.un", 0x82, OperandKind::InlineNone),
    op("conv.ovf.i2.un", 0x83, OperandKind::InlineNone),
    op("conv.ovf.i4.un", 0x84, OperandKind::InlineNone),
    op("conv.ovf.i8.un", 0x85, OperandKind::InlineNone),
    op("conv.ovf.u1.un", 0x86, OperandKind::InlineNone),
    op("conv.ovf.u2.un", 0x87, OperandKind::InlineNone),
    op("conv.ovf.u4.un", 0x88, OperandKind::InlineNone),
    op("conv.ovf.u8.un", 0x89, OperandKind::InlineNone),
    op("conv.ovf.i.un", 0x8A, OperandKind::InlineNone),
    op("conv.ovf.u.un", 0x8B, OperandKind::InlineNone),
    op("box", 0x8C, OperandKind::InlineType),
    op("newarr", 0x8D, OperandKind::InlineType),
    op("ldlen", 0x8E, OperandKind::InlineNone),
    op("ldelema", 0x8F, OperandKind::InlineType),
    // 0x90
    op("ldelem.i1", 0x90, OperandKind::InlineNone),
    op("ldelem.u1", 0x91, OperandKind::InlineNone),
    op("ldelem.i2", 0x92, OperandKind::InlineNone),
    op("ldelem.u2", 0x93, OperandKind::InlineNone),
    op("ldelem.i4", 0x94, OperandKind::InlineNone),
    op("ldelem.u4", 0x95, OperandKind::InlineNone),
    op("ldelem.i8", 0x96, OperandKind::InlineNone),
    op("ldelem.i", 0x97, OperandKind::InlineNone),
    op("ldelem.r4", 0x98, OperandKind::InlineNone),
    op("ldelem.r8", 0x99, OperandKind::InlineNone),
    op("ldelem.ref", 0x9A, OperandKind::InlineNone),
    op("stelem.i", 0x9B, OperandKind::InlineNone),
    op("stelem.i1", 0x9C, OperandKind::InlineNone),
    op("stelem.i2", 0x9D, OperandKind::InlineNone),
    op("stelem.i4", 0x9E, OperandKind::InlineNone),
    op("stelem.i8", 0x9F, OperandKind::InlineNone),
    // 0xA0
    op("stelem.r4", 0xA0, OperandKind::InlineNone),
    op("stelem.r8", 0xA1, OperandKind::InlineNone),
    op("stelem.ref", 0xA2, OperandKind::InlineNone),
    op("ldelem", 0xA3, OperandKind::InlineType),
    op("stelem", 0xA4, OperandKind::InlineType),
    op("unbox.any", 0xA5, OperandKind::InlineType),
    reserved(0xA6),
    reserved(0xA7),
    reserved(0xA8),
    reserved(0xA9),
    reserved(0xAA),
    reserved(0xAB),
    reserved(0xAC),
    reserved(0xAD),
    reserved(0xAE),
    reserved(0xAF),
    // 0xB0
    reserved(0xB0),
    reserved(0xB1),
    reserved(0xB2),
    op("conv.ovf.i1", 0xB3, OperandKind::InlineNone),
    op("conv.ovf.u1", 0xB4, OperandKind::InlineNone),
    op("conv.ovf.i2", 0xB5, OperandKind::InlineNone),
    op("conv.ovf.u2", 0xB6, OperandKind::InlineNone),
    op("conv.ovf.i4", 0xB7, OperandKind::InlineNone),
    op("conv.ovf.u4", 0xB8, OperandKind::InlineNone),
    op("conv.ovf.i8", 0xB9, OperandKind::InlineNone),
    op("conv.ovf.u8", 0xBA, OperandKind::InlineNone),
    reserved(0xBB),
    reserved(0xBC),
    reserved(0xBD),
    reserved(0xBE),
    reserved(0xBF),
    // 0xC0
    reserved(0xC0),
    reserved(0xC1),
    op("refanyval", 0xC2, OperandKind::InlineType),
    op("ckfinite", 0xC3, OperandKind::InlineNone),
    reserved(0xC4),
    reserved(0xC5),
    op("mkrefany", 0xC6, OperandKind::InlineType),
    reserved(0xC7),
    reserved(0xC8),
    reserved(0xC9),
    reserved(0xCA),
    reserved(0xCB),
    reserved(0xCC),
    reserved(0xCD),
    reserved(0xCE),
    reserved(0xCF),
    // 0xD0
    op("ldtoken", 0xD0, OperandKind::InlineTok),
    op("conv.u2", 0xD1, OperandKind::InlineNone),
    op("conv.u1", 0xD2, OperandKind::InlineNone),
    op("conv.i", 0xD3, OperandKind::InlineNone),
    op("conv.ovf.i", 0xD4, OperandKind::InlineNone),
    op("conv.ovf.u", 0xD5, OperandKind::InlineNone),
    op("add.ovf", 0xD6, OperandKind::InlineNone),
    op("add.ovf.un", 0xD7, OperandKind::InlineNone),
    op("mul.ovf", 0xD8, OperandKind::InlineNone),
    op("mul.ovf.un", 0xD9, OperandKind::InlineNone),
    op("sub.ovf", 0xDA, OperandKind::InlineNone),
    op("sub.ovf.un", 0xDB, OperandKind::InlineNone),
    op("endfinally", 0xDC, OperandKind::InlineNone),
    op("leave", 0xDD, OperandKind::InlineBrTarget),
    op("leave.s", 0xDE, OperandKind::ShortInlineBrTarget),
    op("stind.i", 0xDF, OperandKind::InlineNone),
    // 0xE0
    op("conv.u", 0xE0, OperandKind::InlineNone),
];

/// Catalog of the `0xFE`-prefixed opcodes, indexed by the second byte.
pub static INSTRUCTIONS_FE: [OpCode; 0x1F] = [
    // 0xFE00
    op("arglist", 0xFE00, OperandKind::InlineNone),
    op("ceq", 0xFE01, OperandKind::InlineNone),
    op("cgt", 0xFE02, OperandKind::InlineNone),
    op("cgt.un", 0xFE03, OperandKind::InlineNone),
    op("clt", 0xFE04, OperandKind::InlineNone),
    op("clt.un", 0xFE05, OperandKind::InlineNone),
    op("ldftn", 0xFE06, OperandKind::InlineMethod),
    op("ldvirtftn", 0xFE07, OperandKind::InlineMethod),
    reserved(0xFE08),
    slot("ldarg", 0xFE09, OperandKind::InlineVar, SlotKind::Parameter),
    slot("ldarga", 0xFE0A, OperandKind::InlineVar, SlotKind::Parameter),
    slot("starg", 0xFE0B, OperandKind::InlineVar, SlotKind::Parameter),
    slot("ldloc", 0xFE0C, OperandKind::InlineVar, SlotKind::Local),
    slot("ldloca", 0xFE0D, OperandKind::InlineVar, SlotKind::Local),
    slot("stloc", 0xFE0E, OperandKind::InlineVar, SlotKind::Local),
    op("localloc", 0xFE0F, OperandKind::InlineNone),
    // 0xFE10
    reserved(0xFE10),
    op("endfilter", 0xFE11, OperandKind::InlineNone),
    op("unaligned.", 0xFE12, OperandKind::ShortInlineI),
    op("volatile.", 0xFE13, OperandKind::InlineNone),
    op("tail.", 0xFE14, OperandKind::InlineNone),
    op("initobj", 0xFE15, OperandKind::InlineType),
    op("constrained.", 0xFE16, OperandKind::InlineType),
    op("cpblk", 0xFE17, OperandKind::InlineNone),
    op("initblk", 0xFE18, OperandKind::InlineNone),
    op("no.", 0xFE19, OperandKind::ShortInlineI),
    op("rethrow", 0xFE1A, OperandKind::InlineNone),
    reserved(0xFE1B),
    op("sizeof", 0xFE1C, OperandKind::InlineType),
    op("refanytype", 0xFE1D, OperandKind::InlineNone),
    op("readonly.", 0xFE1E, OperandKind::InlineNone),
];

/// Look up the catalog descriptor for a numeric code.
///
/// Two-byte codes carry the `0xFE` prefix in the high byte. Returns `None` for
/// codes outside either table and for reserved encodings.
#[must_use]
pub fn lookup(code: u16) -> Option<&'static OpCode> {
    let entry = if code & 0xFF00 == 0xFE00 {
        INSTRUCTIONS_FE.get((code & 0x00FF) as usize)
    } else if code <= 0x00FF {
        INSTRUCTIONS.get(code as usize)
    } else {
        None
    }?;

    if entry.mnemonic.is_empty() {
        None
    } else {
        Some(entry)
    }
}
