//! End-to-end decode/resolve/format tests over crafted method bodies.

use cildasm::prelude::*;

/// A fixed metadata context standing in for one small method:
/// `instance void Demo.Program::Run(int32 count)` with one local `counter`.
struct DemoResolver;

impl MetadataResolver for DemoResolver {
    fn resolve_type(&self, token: Token) -> Option<CilType> {
        match token.value() {
            0x0100_0001 => Some(CilType::named("System", "Int32").in_assembly("mscorlib")),
            0x0200_0002 => {
                let mut ty = CilType::named("Demo", "Program");
                ty.assembly = Some("Demo".to_string());
                Some(ty)
            }
            _ => None,
        }
    }

    fn resolve_method(&self, token: Token) -> Option<CilMethod> {
        match token.value() {
            0x0A00_000F => Some(CilMethod {
                name: "WriteLine".to_string(),
                declaring: CilType::named("System", "Console").in_assembly("mscorlib"),
                return_type: CilType::named("System", "Void"),
                params: vec![CilType::named("System", "String")],
                has_this: false,
            }),
            0x0600_0003 => Some(CilMethod {
                name: "Helper".to_string(),
                declaring: CilType::named("Demo", "Program").in_assembly("Demo"),
                return_type: CilType::named("System", "Int32"),
                params: vec![],
                has_this: true,
            }),
            _ => None,
        }
    }

    fn resolve_field(&self, token: Token) -> Option<CilField> {
        match token.value() {
            0x0400_0001 => Some(CilField {
                name: "_count".to_string(),
                declaring: CilType::named("Demo", "Program").in_assembly("Demo"),
                field_type: CilType::named("System", "Int32"),
            }),
            _ => None,
        }
    }

    fn resolve_string(&self, token: Token) -> Option<String> {
        match token.value() {
            0x7000_0001 => Some("hello\n".to_string()),
            0x7000_0002 => Some("A\u{80}".to_string()),
            _ => None,
        }
    }

    fn resolve_signature(&self, token: Token) -> Option<Vec<u8>> {
        match token.value() {
            // unmanaged cdecl int32(int32)
            0x1100_0001 => Some(vec![0x01, 0x01, 0x08, 0x08]),
            _ => None,
        }
    }

    fn resolve_parameter(&self, index: u16) -> Option<SlotDescriptor> {
        match index {
            0 => Some(SlotDescriptor::this()),
            1 => Some(SlotDescriptor::named("count")),
            _ => None,
        }
    }

    fn resolve_variable(&self, index: u16) -> Option<SlotDescriptor> {
        match index {
            0 => Some(SlotDescriptor::named("counter")),
            _ => Some(SlotDescriptor::default()),
        }
    }
}

fn disassemble(body: &[u8]) -> (InstructionList, Vec<String>) {
    let mut list = InstructionList::decode(body, Some("Demo")).unwrap();
    list.resolve(&DemoResolver);

    let lines = (0..list.len())
        .map(|index| format_instruction(&list, index, &DemoResolver).unwrap())
        .collect();

    (list, lines)
}

#[test]
fn offsets_partition_the_buffer_exactly() {
    let body = [
        0x72, 0x01, 0x00, 0x00, 0x70, // ldstr
        0x28, 0x0F, 0x00, 0x00, 0x0A, // call
        0x02, // ldarg.0
        0x06, // ldloc.0
        0x1F, 0x0A, // ldc.i4.s 10
        0x2E, 0x02, // beq.s +2
        0x00, // nop
        0x2A, // ret
        0x2A, // ret
    ];
    let (list, _) = disassemble(&body);

    assert_eq!(list.len(), 9);
    assert_eq!(list.instructions()[0].offset, 0);
    for window in list.instructions().windows(2) {
        assert_eq!(window[0].offset + window[0].size, window[1].offset);
    }
    let last = list.instructions().last().unwrap();
    assert_eq!(last.offset + last.size, body.len());
    assert!(!list.is_invalid());
}

#[test]
fn full_method_renders_line_by_line() {
    let body = [
        0x72, 0x01, 0x00, 0x00, 0x70, // ldstr "hello\n"
        0x28, 0x0F, 0x00, 0x00, 0x0A, // call Console::WriteLine
        0x02, // ldarg.0
        0x06, // ldloc.0
        0x1F, 0x0A, // ldc.i4.s 10
        0x2E, 0x02, // beq.s -> IL_0012
        0x00, // nop
        0x2A, // ret
        0x2A, // ret (branch target)
    ];
    let (list, lines) = disassemble(&body);

    assert_eq!(
        lines,
        vec![
            "IL_0000: ldstr \"hello\\n\"",
            "IL_0005: call void [mscorlib]System.Console::WriteLine(string)",
            "IL_000a: ldarg.0 // this",
            "IL_000b: ldloc.0 // counter",
            "IL_000c: ldc.i4.s 10",
            "IL_000e: beq.s IL_0012",
            "IL_0010: nop",
            "IL_0011: ret",
            "IL_0012: ret",
        ]
    );

    // Only the final ret is a branch target
    for index in 0..list.len() - 1 {
        assert!(!list.is_branch_target(index), "index {index}");
    }
    assert!(list.is_branch_target(list.len() - 1));
}

#[test]
fn far_branch_resolves_to_following_instruction() {
    // beq +1, nop, ret -> 3 instructions, target is the instruction at IL_0006
    let body = [0x3B, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2A];
    let (list, lines) = disassemble(&body);

    assert_eq!(list.len(), 3);
    assert_eq!(lines[0], "IL_0000: beq IL_0006");
    assert!(list.is_branch_target(2));
}

#[test]
fn out_of_range_branch_renders_sentinel_with_computed_label() {
    // beq +123 with nothing at the computed offset
    let body = [0x3B, 0x7B, 0x00, 0x00, 0x00, 0x00, 0x2A];
    let (list, lines) = disassemble(&body);

    assert_eq!(lines[0], "IL_0000: beq ? // IL_0080");
    assert!(!list.is_invalid());
    assert!(matches!(
        list.diagnostics()[0],
        Diagnostic::OutOfRangeBranchTarget {
            index: 0,
            target: 0x80
        }
    ));
}

#[test]
fn switch_produces_one_entry_per_target() {
    // switch (IL_000d, IL_000f), nop, ret, nop, ret
    let body = [
        0x45, 0x02, 0x00, 0x00, 0x00, // switch, 2 cases
        0x00, 0x00, 0x00, 0x00, // case 0: +0
        0x02, 0x00, 0x00, 0x00, // case 1: +2
        0x00, // IL_000d nop
        0x2A, // IL_000e ret
        0x00, // IL_000f nop
        0x2A, // IL_0010 ret
    ];
    let (list, lines) = disassemble(&body);

    // branch base = offset + opcode + 4 * (N + 1) = 0 + 1 + 12 = 13
    match list.resolved(0) {
        Some(Resolved::Switch(entries)) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].target, 13);
            assert_eq!(entries[1].target, 15);
            assert!(entries.iter().all(|entry| entry.index.is_some()));
        }
        other => panic!("Expected Resolved::Switch, got {other:?}"),
    }
    assert_eq!(lines[0], "IL_0000: switch (IL_000d, IL_000f)");
    assert!(list.is_branch_target(1));
    assert!(list.is_branch_target(3));
}

#[test]
fn string_outside_text_grammar_renders_bytearray() {
    let body = [0x72, 0x02, 0x00, 0x00, 0x70, 0x2A]; // ldstr "A\u{80}", ret
    let (_, lines) = disassemble(&body);

    assert_eq!(lines[0], "IL_0000: ldstr bytearray(41 00 80 00)");
}

#[test]
fn calli_renders_decoded_signature() {
    let body = [0x29, 0x01, 0x00, 0x00, 0x11, 0x2A]; // calli, ret
    let (list, lines) = disassemble(&body);

    assert_eq!(lines[0], "IL_0000: calli unmanaged cdecl int32(int32)");

    // The signature is cached on the instruction; a second request is identical
    let first = list.signature(0, &DemoResolver).unwrap();
    assert_eq!(first.convention, CallKind::Cdecl);
    let second = list.signature(0, &DemoResolver).unwrap();
    assert_eq!(first, second);
}

#[test]
fn home_assembly_qualifier_is_omitted() {
    // call Demo.Program::Helper from within assembly Demo
    let body = [0x28, 0x03, 0x00, 0x00, 0x06, 0x2A];
    let (_, lines) = disassemble(&body);

    assert_eq!(
        lines[0],
        "IL_0000: call instance int32 Demo.Program::Helper()"
    );
}

#[test]
fn field_and_token_operands_render_member_text() {
    let body = [
        0x7B, 0x01, 0x00, 0x00, 0x04, // ldfld Demo.Program::_count
        0xD0, 0x01, 0x00, 0x00, 0x04, // ldtoken field
        0xD0, 0x02, 0x00, 0x00, 0x02, // ldtoken type Demo.Program
        0x2A, // ret
    ];
    let (_, lines) = disassemble(&body);

    assert_eq!(lines[0], "IL_0000: ldfld int32 Demo.Program::_count");
    assert_eq!(lines[1], "IL_0005: ldtoken field int32 Demo.Program::_count");
    assert_eq!(lines[2], "IL_000a: ldtoken Demo.Program");
}

#[test]
fn unresolvable_token_marks_invalid_and_renders_sentinel() {
    let body = [0x28, 0x63, 0x00, 0x00, 0x0A, 0x2A]; // call <unknown>, ret
    let (list, lines) = disassemble(&body);

    assert_eq!(lines[0], "IL_0000: call ?");
    assert_eq!(lines[1], "IL_0005: ret");
    assert!(list.is_invalid());
    assert_eq!(
        list.diagnostics(),
        &[Diagnostic::UnresolvableToken {
            index: 0,
            token: Token::new(0x0A00_0063)
        }]
    );
}

#[test]
fn unknown_opcode_keeps_partial_prefix() {
    let body = [0x00, 0x00, 0x24, 0x2A]; // nop, nop, reserved, ret
    let (list, lines) = disassemble(&body);

    assert!(list.is_invalid());
    assert_eq!(list.len(), 2);
    assert_eq!(lines, vec!["IL_0000: nop", "IL_0001: nop"]);
    assert_eq!(
        list.diagnostics(),
        &[Diagnostic::UnknownOpCode {
            offset: 2,
            code: 0x0024
        }]
    );
}

#[test]
fn truncated_operand_keeps_partial_prefix() {
    let body = [0x00, 0x20, 0x01, 0x02]; // nop, ldc.i4 <truncated>
    let (list, _) = disassemble(&body);

    assert!(list.is_invalid());
    assert_eq!(list.len(), 1);
    assert!(matches!(
        list.diagnostics()[0],
        Diagnostic::MalformedOperand { offset: 1, .. }
    ));
}

#[test]
fn resolving_twice_is_idempotent() {
    let body = [0x28, 0x0F, 0x00, 0x00, 0x0A, 0x2B, 0x00, 0x2A]; // call, br.s +0, ret
    let mut list = InstructionList::decode(body, Some("Demo")).unwrap();

    list.resolve(&DemoResolver);
    let first: Vec<String> = (0..list.len())
        .map(|index| format_instruction(&list, index, &DemoResolver).unwrap())
        .collect();

    list.resolve(&DemoResolver);
    let second: Vec<String> = (0..list.len())
        .map(|index| format_instruction(&list, index, &DemoResolver).unwrap())
        .collect();

    assert_eq!(first, second);
    assert_eq!(list.diagnostics().len(), 0);
}

#[test]
fn explicit_slots_render_names_inline() {
    let body = [
        0x0E, 0x01, // ldarg.s 1 -> "count"
        0x11, 0x00, // ldloc.s 0 -> "counter"
        0x11, 0x05, // ldloc.s 5 -> unnamed, renders the index
        0xFE, 0x0C, 0x04, 0x01, // ldloc 260 -> unnamed, renders the index
        0x2A, // ret
    ];
    let (_, lines) = disassemble(&body);

    assert_eq!(lines[0], "IL_0000: ldarg.s count");
    assert_eq!(lines[1], "IL_0002: ldloc.s counter");
    assert_eq!(lines[2], "IL_0004: ldloc.s 5");
    assert_eq!(lines[3], "IL_0006: ldloc 260");
}

#[test]
fn implicit_slot_without_descriptor_renders_bare_mnemonic() {
    let body = [0x02, 0x2A]; // ldarg.0, ret
    let mut list = InstructionList::decode(body, None).unwrap();
    list.resolve(&EmptyResolver);

    assert_eq!(
        format_instruction(&list, 0, &EmptyResolver).unwrap(),
        "IL_0000: ldarg.0"
    );
}

#[test]
fn numeric_operands_render_decimal() {
    let body = [
        0x1F, 0xF6, // ldc.i4.s -10
        0x20, 0x40, 0xE2, 0x01, 0x00, // ldc.i4 123456
        0x21, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // ldc.i8 4294967296
        0x2A, // ret
    ];
    let (_, lines) = disassemble(&body);

    assert_eq!(lines[0], "IL_0000: ldc.i4.s -10");
    assert_eq!(lines[1], "IL_0002: ldc.i4 123456");
    assert_eq!(lines[2], "IL_0007: ldc.i8 4294967296");
}
