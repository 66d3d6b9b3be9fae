use bitflags::bitflags;
use strum::IntoStaticStr;

use crate::{
    metadata::{token::Token, typesystem::BuiltinType, typesystem::CilType},
    Error, Result,
};

bitflags! {
    /// Modifier bits of the calling-convention byte (ECMA-335 II.23.2.3).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SigFlags: u8 {
        /// Used to encode the keyword `instance` in the calling convention, see §II.15.3
        const HAS_THIS = 0x20;
        /// Used to encode the keyword `explicit` in the calling convention, see §II.15.3
        const EXPLICIT_THIS = 0x40;
    }
}

/// The calling-convention kind of a standalone method signature.
///
/// Two managed kinds plus the five unmanaged kinds are supported; every other
/// convention-kind value in a blob is an [`Error::UnsupportedSignature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum CallKind {
    /// Managed, default calling convention.
    #[strum(serialize = "default")]
    Default,
    /// Managed, variable argument list.
    #[strum(serialize = "vararg")]
    VarArg,
    /// Unmanaged C calling convention.
    #[strum(serialize = "cdecl")]
    Cdecl,
    /// Unmanaged stdcall.
    #[strum(serialize = "stdcall")]
    StdCall,
    /// Unmanaged thiscall.
    #[strum(serialize = "thiscall")]
    ThisCall,
    /// Unmanaged fastcall.
    #[strum(serialize = "fastcall")]
    FastCall,
    /// Unmanaged platform-default convention.
    #[strum(serialize = "winapi")]
    WinApi,
}

impl CallKind {
    /// Map the convention-kind bits of the leading signature byte.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedSignature`] for any kind outside the seven
    /// supported conventions (local-variable, property and generic signature
    /// shapes among them).
    pub fn from_byte(value: u8) -> Result<Self> {
        match value & 0x0F {
            0x0 => Ok(CallKind::Default),
            0x1 => Ok(CallKind::Cdecl),
            0x2 => Ok(CallKind::StdCall),
            0x3 => Ok(CallKind::ThisCall),
            0x4 => Ok(CallKind::FastCall),
            0x5 => Ok(CallKind::VarArg),
            0x9 => Ok(CallKind::WinApi),
            other => Err(Error::UnsupportedSignature(other)),
        }
    }

    /// Whether this kind is one of the five unmanaged conventions.
    #[must_use]
    pub fn is_unmanaged(self) -> bool {
        !matches!(self, CallKind::Default | CallKind::VarArg)
    }

    /// The assembler keyword for this convention kind.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        self.into()
    }
}

/// A parameter or return type decoded from a signature blob.
///
/// Only the shapes an indirect-call signature can carry are represented:
/// primitive element types map directly to built-ins, `Class` and `ValueType`
/// element types carry a compressed `TypeDefOrRef` token which may or may not
/// have resolved to an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum SigType {
    /// A primitive element type, mapped directly to a built-in keyword.
    Builtin(BuiltinType),
    /// A reference type named by a compressed token.
    Class {
        /// The decoded `TypeDefOrRef` token.
        token: Token,
        /// The resolved entity, `None` when the resolver answered "not found".
        resolved: Option<CilType>,
    },
    /// A value type named by a compressed token.
    ValueType {
        /// The decoded `TypeDefOrRef` token.
        token: Token,
        /// The resolved entity, `None` when the resolver answered "not found".
        resolved: Option<CilType>,
    },
}

/// A decoded standalone method signature (ECMA-335 II.23.2.3).
///
/// Produced once per signature token by the signature decoder; the required and
/// optional parameter lists are disjoint in order, split exactly at the first
/// Sentinel marker of the blob.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    /// `HasThis` / `ExplicitThis` modifier bits.
    pub flags: SigFlags,
    /// The managed or unmanaged convention kind.
    pub convention: CallKind,
    /// Return type.
    pub return_type: SigType,
    /// Required parameters, in original byte order.
    pub params: Vec<SigType>,
    /// Optional (post-sentinel) parameters, in original byte order.
    pub varargs: Vec<SigType>,
}

impl MethodSignature {
    /// Whether this signature uses one of the unmanaged calling conventions.
    #[must_use]
    pub fn is_unmanaged(&self) -> bool {
        self.convention.is_unmanaged()
    }
}
