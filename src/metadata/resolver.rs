//! The metadata resolver capability interface.
//!
//! The decoder core never owns a metadata reader: token and slot lookups go
//! through the [`MetadataResolver`] trait, and a concrete adapter per target
//! ecosystem supplies the lookups, backed by that ecosystem's own metadata
//! facilities. The core issues no writes through this interface; implementations
//! are expected to be reentrant and read-only from the core's perspective.
//!
//! Any lookup may answer "not found" (`None`). The core treats that as an
//! unresolved value, not a fatal error: the affected instruction keeps its raw
//! operand, the list is flagged per [`crate::Error::UnresolvableToken`]
//! semantics, and rendering falls back to the `?` sentinel.

use crate::metadata::{
    token::Token,
    typesystem::{CilField, CilMember, CilMethod, CilType, SlotDescriptor},
};

/// Maps metadata tokens and slot indices to concrete entities.
///
/// One resolver instance is scoped to one method body: the parameter and
/// variable lookups are relative to the method being disassembled.
pub trait MetadataResolver {
    /// Resolve a type token (`TypeDef`, `TypeRef` or `TypeSpec`).
    fn resolve_type(&self, token: Token) -> Option<CilType>;

    /// Resolve a method token (`MethodDef`, `MemberRef` or `MethodSpec`).
    fn resolve_method(&self, token: Token) -> Option<CilMethod>;

    /// Resolve a field token (`Field` or `MemberRef`).
    fn resolve_field(&self, token: Token) -> Option<CilField>;

    /// Resolve an ambiguous member token, dispatching by result shape.
    ///
    /// The default implementation tries methods, then fields, then types.
    fn resolve_member(&self, token: Token) -> Option<CilMember> {
        if let Some(method) = self.resolve_method(token) {
            return Some(CilMember::Method(method));
        }
        if let Some(field) = self.resolve_field(token) {
            return Some(CilMember::Field(field));
        }
        self.resolve_type(token).map(CilMember::Type)
    }

    /// Resolve a user-string token to its literal text.
    fn resolve_string(&self, token: Token) -> Option<String>;

    /// Resolve a standalone-signature token to its raw blob bytes.
    fn resolve_signature(&self, token: Token) -> Option<Vec<u8>>;

    /// Resolve a parameter slot of the current method.
    fn resolve_parameter(&self, index: u16) -> Option<SlotDescriptor>;

    /// Resolve a local-variable slot of the current method.
    fn resolve_variable(&self, index: u16) -> Option<SlotDescriptor>;
}

/// A resolver that answers "not found" for everything.
///
/// Useful for rendering raw disassembly when no metadata context exists; every
/// token operand renders as the `?` sentinel.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResolver;

impl MetadataResolver for EmptyResolver {
    fn resolve_type(&self, _: Token) -> Option<CilType> {
        None
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
