//! Type-name grammar and literal rendering through the public API.

use cildasm::prelude::*;

/// Hands out one configurable type for every type token.
struct TypeResolver(CilType);

impl MetadataResolver for TypeResolver {
    fn resolve_type(&self, _: Token) -> Option<CilType> {
        Some(self.0.clone())
    }

    fn resolve_method(&self, _: Token) -> Option<CilMethod> {
        None
    }

    fn resolve_field(&self, _: Token) -> Option<CilField> {
        None
    }

    fn resolve_string(&self, _: Token) -> Option<String> {
        None
    }

    fn resolve_signature(&self, _: Token) -> Option<Vec<u8>> {
        None
    }

    fn resolve_parameter(&self, _: u16) -> Option<SlotDescriptor> {
        None
    }

    fn resolve_variable(&self, _: u16) -> Option<SlotDescriptor> {
        None
    }
}

fn render_box_of(ty: CilType, home: Option<&str>) -> String {
    let resolver = TypeResolver(ty);
    let body = [0x8C, 0x01, 0x00, 0x00, 0x02, 0x2A]; // box <type>, ret
    let mut list = InstructionList::decode(body.as_slice(), home).unwrap();
    list.resolve(&resolver);
    format_instruction(&list, 0, &resolver).unwrap()
}

#[test]
fn builtin_types_use_keywords() {
    assert_eq!(
        render_box_of(CilType::named("System", "Int32"), None),
        "IL_0000: box int32"
    );
    assert_eq!(
        render_box_of(CilType::named("System", "UIntPtr"), None),
        "IL_0000: box native uint"
    );
}

#[test]
fn qualified_names_respect_home_assembly() {
    let ty = CilType::named("Demo.Widgets", "Widget").in_assembly("Demo.Core");

    assert_eq!(
        render_box_of(ty.clone(), None),
        "IL_0000: box [Demo.Core]Demo.Widgets.Widget"
    );
    assert_eq!(
        render_box_of(ty, Some("Demo.Core")),
        "IL_0000: box Demo.Widgets.Widget"
    );
}

#[test]
fn nested_types_join_with_slash() {
    let outer = CilType::named("Demo", "Outer").in_assembly("Demo.Core");
    let mut inner = CilType::named("", "Inner");
    inner.assembly = Some("Demo.Core".to_string());
    inner.declaring = Some(Box::new(outer));

    assert_eq!(
        render_box_of(inner, Some("Demo.Core")),
        "IL_0000: box Demo.Outer/Inner"
    );
}

#[test]
fn generic_arguments_render_recursively() {
    let mut list_ty = CilType::named("System.Collections.Generic", "List`1");
    list_ty.assembly = Some("mscorlib".to_string());

    let mut inner = CilType::named("System.Collections.Generic", "List`1");
    inner.assembly = Some("mscorlib".to_string());
    inner.generic_args.push(CilType::named("System", "String"));

    list_ty.generic_args.push(inner);

    assert_eq!(
        render_box_of(list_ty, Some("mscorlib")),
        "IL_0000: box System.Collections.Generic.List`1<System.Collections.Generic.List`1<string>>"
    );
}

#[test]
fn array_ranks_and_byref_suffix() {
    let mut ty = CilType::named("Demo", "Grid").in_assembly("Demo.Core");
    ty.array_shape.push(2);
    ty.by_ref = true;

    assert_eq!(
        render_box_of(ty, Some("Demo.Core")),
        "IL_0000: box Demo.Grid[,]&"
    );
}

#[test]
fn string_escape_table() {
    // Named escapes, pass-through and octal, all in one literal
    assert_eq!(
        format_string_literal("tab\there \u{5} bye"),
        "\"tab\\there \\005 bye\""
    );

    // The eight named escapes
    assert_eq!(
        format_string_literal("\\\"\u{7}\u{8}\u{c}\n\r\t\u{b}"),
        "\"\\\\\\\"\\a\\b\\f\\n\\r\\t\\v\""
    );
}

#[test]
fn bytearray_uses_two_bytes_per_character() {
    // A surrogate pair encodes as two UTF-16 code units, four bytes
    assert_eq!(
        format_string_literal("\u{1F600}"),
        "bytearray(3D D8 00 DE)"
    );
}
