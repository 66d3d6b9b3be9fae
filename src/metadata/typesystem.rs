//! Resolved-entity model for CIL disassembly.
//!
//! The types in this module describe what the [`crate::metadata::resolver::MetadataResolver`]
//! hands back for a metadata token: types with their full nesting/generic/array
//! shape, methods, fields, and parameter/local slot descriptors. The disassembly
//! formatter renders these into assembler-style text; nothing in here performs
//! metadata lookups itself.

use strum::IntoStaticStr;

#[allow(non_snake_case, dead_code, missing_docs)]
/// Possible bytes that represent various 'Types' for a signature - from coreclr
pub mod ELEMENT_TYPE {
    //Marks end of a list
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0a;
    pub const U8: u8 = 0x0b;
    pub const R4: u8 = 0x0c;
    pub const R8: u8 = 0x0d;
    pub const STRING: u8 = 0x0e;
    // Followed by type
    pub const PTR: u8 = 0x0f;
    // Followed by type
    pub const BYREF: u8 = 0x10;
    // Followed by TypeDef or TypeRef token
    pub const VALUETYPE: u8 = 0x11;
    // Followed by TypeDef or TypeRef token
    pub const CLASS: u8 = 0x12;
    // Generic parameter in a generic type definition, represented as number
    pub const VAR: u8 = 0x13;
    // type rank boundsCount bound1 … loCount lo1 …
    pub const ARRAY: u8 = 0x14;
    // Generic type instantiation. Followed by type type-arg-count type-1 ... type-n
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    // System.IntPtr
    pub const I: u8 = 0x18;
    // System.UIntPtr
    pub const U: u8 = 0x19;
    // Followed by full method signature
    pub const FNPTR: u8 = 0x1b;
    // System.Object
    pub const OBJECT: u8 = 0x1c;
    // Single-dim array with 0 lower bound
    pub const SZARRAY: u8 = 0x1d;
    // Generic parameter in a generic method definition, represented as number
    pub const MVAR: u8 = 0x1e;
    // Required modifier : followed by a TypeDef or TypeRef token
    pub const CMOD_REQD: u8 = 0x1f;
    // Optional modifier : followed by a TypeDef or TypeRef token
    pub const CMOD_OPT: u8 = 0x20;
    // Sentinel for vararg method signature
    pub const SENTINEL: u8 = 0x41;
    // Denotes a local variable that points at a pinned object
    pub const PINNED: u8 = 0x45;
}

/// The built-in types of the CLS with their assembler keywords.
///
/// These map to fixed keywords via a direct table lookup; everything not in this
/// table renders as a (possibly assembly-qualified) dotted type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum BuiltinType {
    /// `System.Void`
    #[strum(serialize = "void")]
    Void,
    /// `System.Boolean`
    #[strum(serialize = "bool")]
    Boolean,
    /// `System.Char`
    #[strum(serialize = "char")]
    Char,
    /// `System.SByte`
    #[strum(serialize = "int8")]
    I1,
    /// `System.Byte`
    #[strum(serialize = "uint8")]
    U1,
    /// `System.Int16`
    #[strum(serialize = "int16")]
    I2,
    /// `System.UInt16`
    #[strum(serialize = "uint16")]
    U2,
    /// `System.Int32`
    #[strum(serialize = "int32")]
    I4,
    /// `System.UInt32`
    #[strum(serialize = "uint32")]
    U4,
    /// `System.Int64`
    #[strum(serialize = "int64")]
    I8,
    /// `System.UInt64`
    #[strum(serialize = "uint64")]
    U8,
    /// `System.Single`
    #[strum(serialize = "float32")]
    R4,
    /// `System.Double`
    #[strum(serialize = "float64")]
    R8,
    /// `System.String`
    #[strum(serialize = "string")]
    String,
    /// `System.Object`
    #[strum(serialize = "object")]
    Object,
    /// `System.TypedReference`
    #[strum(serialize = "typedref")]
    TypedRef,
    /// `System.IntPtr`
    #[strum(serialize = "native int")]
    I,
    /// `System.UIntPtr`
    #[strum(serialize = "native uint")]
    U,
}

impl BuiltinType {
    /// The assembler keyword for this built-in type.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        self.into()
    }

    /// Table lookup from the runtime type name within the `System` namespace.
    #[must_use]
    pub fn from_system_name(name: &str) -> Option<Self> {
        Some(match name {
            "Void" => BuiltinType::Void,
            "Boolean" => BuiltinType::Boolean,
            "Char" => BuiltinType::Char,
            "SByte" => BuiltinType::I1,
            "Byte" => BuiltinType::U1,
            "Int16" => BuiltinType::I2,
            "UInt16" => BuiltinType::U2,
            "Int32" => BuiltinType::I4,
            "UInt32" => BuiltinType::U4,
            "Int64" => BuiltinType::I8,
            "UInt64" => BuiltinType::U8,
            "Single" => BuiltinType::R4,
            "Double" => BuiltinType::R8,
            "String" => BuiltinType::String,
            "Object" => BuiltinType::Object,
            "TypedReference" => BuiltinType::TypedRef,
            "IntPtr" => BuiltinType::I,
            "UIntPtr" => BuiltinType::U,
            _ => return None,
        })
    }
}

/// A type as surfaced by the metadata resolver.
///
/// Carries everything the formatter needs to render the type name: the owning
/// assembly (for the `[Assembly]` qualifier), the dotted namespace/name, the
/// declaring chain for nested types, generic arguments, array suffixes and the
/// by-reference marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CilType {
    /// Name of the assembly that owns this type; `None` when unknown.
    pub assembly: Option<String>,
    /// Namespace, empty for nested types and the global namespace.
    pub namespace: String,
    /// Simple type name.
    pub name: String,
    /// The type that declares this one, innermost first along the chain.
    pub declaring: Option<Box<CilType>>,
    /// Generic arguments, each rendered recursively.
    pub generic_args: Vec<CilType>,
    /// One entry per array suffix; the value is the rank of that suffix.
    pub array_shape: Vec<u32>,
    /// Whether the type is passed by reference (`&` suffix).
    pub by_ref: bool,
    /// Whether the type is a value type (`valuetype` vs `class` modifier).
    pub is_value_type: bool,
}

impl CilType {
    /// Create a plain named type with no assembly, nesting or shape.
    #[must_use]
    pub fn named(namespace: &str, name: &str) -> Self {
        CilType {
            namespace: namespace.to_string(),
            name: name.to_string(),
            ..CilType::default()
        }
    }

    /// Attach the owning assembly name.
    #[must_use]
    pub fn in_assembly(mut self, assembly: &str) -> Self {
        self.assembly = Some(assembly.to_string());
        self
    }

    /// The built-in keyword mapping for this type, if it is one of the
    /// built-in `System` types with no nesting, generics or array shape.
    #[must_use]
    pub fn builtin(&self) -> Option<BuiltinType> {
        if self.namespace == "System"
            && self.declaring.is_none()
            && self.generic_args.is_empty()
            && self.array_shape.is_empty()
        {
            BuiltinType::from_system_name(&self.name)
        } else {
            None
        }
    }
}

/// A method as surfaced by the metadata resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct CilMethod {
    /// Method name.
    pub name: String,
    /// The type declaring this method.
    pub declaring: CilType,
    /// Return type.
    pub return_type: CilType,
    /// Parameter types in declaration order.
    pub params: Vec<CilType>,
    /// Whether the method takes a `this` pointer (`instance` keyword).
    pub has_this: bool,
}

/// A field as surfaced by the metadata resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct CilField {
    /// Field name.
    pub name: String,
    /// The type declaring this field.
    pub declaring: CilType,
    /// Declared field type.
    pub field_type: CilType,
}

/// A member resolved from an ambiguous-member token (`ldtoken`).
///
/// The resolver dispatches by result shape: a `MemberRef` token can name a
/// method or a field, and the type tables name types.
#[derive(Debug, Clone, PartialEq)]
pub enum CilMember {
    /// The token named a type.
    Type(CilType),
    /// The token named a method.
    Method(CilMethod),
    /// The token named a field.
    Field(CilField),
}

/// A parameter or local-variable slot as surfaced by the metadata resolver.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlotDescriptor {
    /// Declared name; `None` for unnamed slots, which render by index.
    pub name: Option<String>,
    /// Whether this slot is the implicit `this` parameter.
    pub is_this: bool,
}

impl SlotDescriptor {
    /// A named slot.
    #[must_use]
    pub fn named(name: &str) -> Self {
        SlotDescriptor {
            name: Some(name.to_string()),
            is_this: false,
        }
    }

    /// The implicit `this` parameter slot.
    #[must_use]
    pub fn this() -> Self {
        SlotDescriptor {
            name: None,
            is_this: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keywords() {
        assert_eq!(BuiltinType::I4.keyword(), "int32");
        assert_eq!(BuiltinType::Void.keyword(), "void");
        assert_eq!(BuiltinType::String.keyword(), "string");
        assert_eq!(BuiltinType::TypedRef.keyword(), "typedref");
        assert_eq!(BuiltinType::I.keyword(), "native int");
        assert_eq!(BuiltinType::U.keyword(), "native uint");
    }

    #[test]
    fn test_builtin_from_system_name() {
        assert_eq!(
            BuiltinType::from_system_name("Int32"),
            Some(BuiltinType::I4)
        );
        assert_eq!(
            BuiltinType::from_system_name("Single"),
            Some(BuiltinType::R4)
        );
        assert_eq!(BuiltinType::from_system_name("Console"), None);
    }

    #[test]
    fn test_ciltype_builtin_detection() {
        let int32 = CilType::named("System", "Int32");
        assert_eq!(int32.builtin(), Some(BuiltinType::I4));

        // A generic instantiation over Int32 is not the builtin itself
        let mut generic = CilType::named("System", "Int32");
        generic.generic_args.push(CilType::named("System", "Int32"));
        assert_eq!(generic.builtin(), None);

        // Arrays of builtins are not builtins
        let mut array = CilType::named("System", "Int32");
        array.array_shape.push(1);
        assert_eq!(array.builtin(), None);

        // By-ref does not disturb the builtin mapping
        let mut by_ref = CilType::named("System", "Int32");
        by_ref.by_ref = true;
        assert_eq!(by_ref.builtin(), Some(BuiltinType::I4));

        let console = CilType::named("System", "Console");
        assert_eq!(console.builtin(), None);
    }

    #[test]
    fn test_element_type_constants() {
        assert_eq!(ELEMENT_TYPE::VOID, 0x01);
        assert_eq!(ELEMENT_TYPE::I4, 0x08);
        assert_eq!(ELEMENT_TYPE::VALUETYPE, 0x11);
        assert_eq!(ELEMENT_TYPE::CLASS, 0x12);
        assert_eq!(ELEMENT_TYPE::SENTINEL, 0x41);
    }
}
