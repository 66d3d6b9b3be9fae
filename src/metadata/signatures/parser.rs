use crate::{
    file::parser::Parser,
    metadata::{
        resolver::MetadataResolver,
        signatures::{CallKind, MethodSignature, SigFlags, SigType},
        typesystem::{BuiltinType, ELEMENT_TYPE},
    },
    Result,
};

/// Decoder for standalone method signature blobs (ECMA-335 II.23.2.3).
///
/// `calli` instructions reference an out-of-line blob describing the calling
/// convention, return type and parameter types of the indirect call site. The
/// parser walks the blob once, front to back: convention byte, compressed
/// parameter count, return type, then that many parameter types. A Sentinel
/// element byte splits the parameters into the required and optional lists.
///
/// # Example
///
/// ```rust
/// use cildasm::metadata::{resolver::EmptyResolver, signatures::SignatureParser};
///
/// // default convention, 1 param, int32 return, int32 param
/// let blob = [0x00, 0x01, 0x08, 0x08];
/// let mut parser = SignatureParser::new(&blob);
/// let sig = parser.parse_method_signature(&EmptyResolver)?;
/// assert_eq!(sig.params.len(), 1);
/// # Ok::<(), cildasm::Error>(())
/// ```
///
/// ## Notes:
/// - Besides ECMA-335, it's also worth looking at
///   <https://github.com/dotnet/runtime/blob/main/docs/design/coreclr/profiling/davbr-blog-archive/samples/sigparse.cpp>
/// - Do not re-use a parser instance for multiple signatures.
pub struct SignatureParser<'a> {
    parser: Parser<'a>,
}

impl<'a> SignatureParser<'a> {
    /// Create a new `SignatureParser` from a byte slice
    ///
    /// ## Arguments
    /// * 'data' - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        SignatureParser {
            parser: Parser::new(data),
        }
    }

    /// Parse one type from the signature blob.
    ///
    /// A Sentinel marker flips the running `optional` flag and the real element
    /// type byte is re-read behind it. Primitive element types map directly to
    /// built-ins with no further read; `Class` and `ValueType` additionally
    /// decode a compressed `TypeDefOrRef` token and resolve it through the
    /// metadata resolver (a "not found" answer is kept as an unresolved type,
    /// not an error).
    fn parse_type(
        &mut self,
        resolver: &dyn MetadataResolver,
        optional: &mut bool,
    ) -> Result<SigType> {
        let mut element = self.parser.read_le::<u8>()?;
        if element == ELEMENT_TYPE::SENTINEL {
            *optional = true;
            element = self.parser.read_le::<u8>()?;
        }

        match element {
            ELEMENT_TYPE::VOID => Ok(SigType::Builtin(BuiltinType::Void)),
            ELEMENT_TYPE::BOOLEAN => Ok(SigType::Builtin(BuiltinType::Boolean)),
            ELEMENT_TYPE::CHAR => Ok(SigType::Builtin(BuiltinType::Char)),
            ELEMENT_TYPE::I1 => Ok(SigType::Builtin(BuiltinType::I1)),
            ELEMENT_TYPE::U1 => Ok(SigType::Builtin(BuiltinType::U1)),
            ELEMENT_TYPE::I2 => Ok(SigType::Builtin(BuiltinType::I2)),
            ELEMENT_TYPE::U2 => Ok(SigType::Builtin(BuiltinType::U2)),
            ELEMENT_TYPE::I4 => Ok(SigType::Builtin(BuiltinType::I4)),
            ELEMENT_TYPE::U4 => Ok(SigType::Builtin(BuiltinType::U4)),
            ELEMENT_TYPE::I8 => Ok(SigType::Builtin(BuiltinType::I8)),
            ELEMENT_TYPE::U8 => Ok(SigType::Builtin(BuiltinType::U8)),
            ELEMENT_TYPE::R4 => Ok(SigType::Builtin(BuiltinType::R4)),
            ELEMENT_TYPE::R8 => Ok(SigType::Builtin(BuiltinType::R8)),
            ELEMENT_TYPE::STRING => Ok(SigType::Builtin(BuiltinType::String)),
            ELEMENT_TYPE::OBJECT => Ok(SigType::Builtin(BuiltinType::Object)),
            ELEMENT_TYPE::TYPEDBYREF => Ok(SigType::Builtin(BuiltinType::TypedRef)),
            ELEMENT_TYPE::I => Ok(SigType::Builtin(BuiltinType::I)),
            ELEMENT_TYPE::U => Ok(SigType::Builtin(BuiltinType::U)),
            ELEMENT_TYPE::VALUETYPE => {
                let token = self.parser.read_compressed_token()?;
                Ok(SigType::ValueType {
                    token,
                    resolved: resolver.resolve_type(token),
                })
            }
            ELEMENT_TYPE::CLASS => {
                let token = self.parser.read_compressed_token()?;
                Ok(SigType::Class {
                    token,
                    resolved: resolver.resolve_type(token),
                })
            }
            _ => Err(malformed_error!(
                "Unsupported ELEMENT_TYPE - {}",
                element
            )),
        }
    }

    /// Parse a standalone method signature from the blob.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedSignature`] for a convention kind
    /// outside the seven supported shapes, [`crate::Error::Malformed`] for an
    /// element type the grammar cannot carry, or [`crate::Error::OutOfBounds`]
    /// when the blob is truncated.
    pub fn parse_method_signature(
        &mut self,
        resolver: &dyn MetadataResolver,
    ) -> Result<MethodSignature> {
        let convention_byte = self.parser.read_le::<u8>()?;
        let flags = SigFlags::from_bits_truncate(convention_byte);
        let convention = CallKind::from_byte(convention_byte)?;

        let param_count = self.parser.read_compressed_uint()?;

        let mut optional = false;
        let return_type = self.parse_type(resolver, &mut optional)?;

        let mut signature = MethodSignature {
            flags,
            convention,
            return_type,
            params: Vec::new(),
            varargs: Vec::new(),
        };

        for _ in 0..param_count {
            let param = self.parse_type(resolver, &mut optional)?;
            if optional {
                signature.varargs.push(param);
            } else {
                signature.params.push(param);
            }
        }

        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{resolver::EmptyResolver, token::Token, typesystem::CilType},
        Error,
    };

    struct NamedTypes;

    impl MetadataResolver for NamedTypes {
        fn resolve_type(&self, token: Token) -> Option<CilType> {
            let mut ty = CilType::named("Demo", "Point");
            ty.is_value_type = token.table() == 0x02;
            Some(ty)
        }

        fn resolve_method(
            &self,
            _: Token,
        ) -> Option<crate::metadata::typesystem::CilMethod> {
            None
        }

        fn resolve_field(&self, _: Token) -> Option<crate::metadata::typesystem::CilField> {
            None
        }

        fn resolve_string(&self, _: Token) -> Option<String> {
            None
        }

        fn resolve_signature(&self, _: Token) -> Option<Vec<u8>> {
            None
        }

        fn resolve_parameter(
            &self,
            _: u16,
        ) -> Option<crate::metadata::typesystem::SlotDescriptor> {
            None
        }

        fn resolve_variable(
            &self,
            _: u16,
        ) -> Option<crate::metadata::typesystem::SlotDescriptor> {
            None
        }
    }

    #[test]
    fn test_managed_default() {
        // default, 1 param, string return, int32 param
        let blob = [0x00, 0x01, 0x0E, 0x08];
        let sig = SignatureParser::new(&blob)
            .parse_method_signature(&EmptyResolver)
            .unwrap();

        assert_eq!(sig.convention, CallKind::Default);
        assert!(!sig.is_unmanaged());
        assert_eq!(sig.return_type, SigType::Builtin(BuiltinType::String));
        assert_eq!(sig.params, vec![SigType::Builtin(BuiltinType::I4)]);
        assert!(sig.varargs.is_empty());
    }

    #[test]
    fn test_unmanaged_cdecl() {
        // unmanaged cdecl, 1 param, int32 return, int32 param
        let blob = [0x01, 0x01, 0x08, 0x08];
        let sig = SignatureParser::new(&blob)
            .parse_method_signature(&EmptyResolver)
            .unwrap();

        assert_eq!(sig.convention, CallKind::Cdecl);
        assert!(sig.is_unmanaged());
        assert_eq!(sig.return_type, SigType::Builtin(BuiltinType::I4));
        assert_eq!(sig.params.len(), 1);
    }

    #[test]
    fn test_has_this_flag() {
        // instance default, 0 params, void return
        let blob = [0x20, 0x00, 0x01];
        let sig = SignatureParser::new(&blob)
            .parse_method_signature(&EmptyResolver)
            .unwrap();

        assert!(sig.flags.contains(SigFlags::HAS_THIS));
        assert_eq!(sig.convention, CallKind::Default);
        assert_eq!(sig.return_type, SigType::Builtin(BuiltinType::Void));
    }

    #[test]
    fn test_sentinel_splits_params() {
        // vararg, 3 params, void return: int32, SENTINEL, float64, string
        let blob = [0x05, 0x03, 0x01, 0x08, 0x41, 0x0D, 0x0E];
        let sig = SignatureParser::new(&blob)
            .parse_method_signature(&EmptyResolver)
            .unwrap();

        assert_eq!(sig.convention, CallKind::VarArg);
        assert_eq!(sig.params, vec![SigType::Builtin(BuiltinType::I4)]);
        assert_eq!(
            sig.varargs,
            vec![
                SigType::Builtin(BuiltinType::R8),
                SigType::Builtin(BuiltinType::String)
            ]
        );
    }

    #[test]
    fn test_class_and_valuetype_tokens() {
        // default, 2 params, void return:
        //   class (TypeRef row 1 -> compressed 0x05)
        //   valuetype (TypeDef row 2 -> compressed 0x08)
        let blob = [0x00, 0x02, 0x01, 0x12, 0x05, 0x11, 0x08];
        let sig = SignatureParser::new(&blob)
            .parse_method_signature(&NamedTypes)
            .unwrap();

        match &sig.params[0] {
            SigType::Class { token, resolved } => {
                assert_eq!(token.value(), 0x0100_0001);
                assert!(resolved.is_some());
            }
            other => panic!("Expected SigType::Class, got {other:?}"),
        }
        match &sig.params[1] {
            SigType::ValueType { token, resolved } => {
                assert_eq!(token.value(), 0x0200_0002);
                assert!(resolved.as_ref().unwrap().is_value_type);
            }
            other => panic!("Expected SigType::ValueType, got {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_token_is_kept() {
        let blob = [0x00, 0x01, 0x01, 0x12, 0x05];
        let sig = SignatureParser::new(&blob)
            .parse_method_signature(&EmptyResolver)
            .unwrap();

        match &sig.params[0] {
            SigType::Class { resolved, .. } => assert!(resolved.is_none()),
            other => panic!("Expected SigType::Class, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_convention() {
        // local-variable signature shape (0x07)
        let blob = [0x07, 0x01, 0x08];
        let result = SignatureParser::new(&blob).parse_method_signature(&EmptyResolver);
        assert!(matches!(result, Err(Error::UnsupportedSignature(0x07))));
    }

    #[test]
    fn test_unsupported_element_type() {
        // SZARRAY is not part of the indirect-call grammar here
        let blob = [0x00, 0x01, 0x01, 0x1D, 0x08];
        let result = SignatureParser::new(&blob).parse_method_signature(&EmptyResolver);
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_truncated_blob() {
        let blob = [0x00, 0x02, 0x01, 0x08];
        let result = SignatureParser::new(&blob).parse_method_signature(&EmptyResolver);
        assert!(matches!(result, Err(Error::OutOfBounds)));
    }
}
