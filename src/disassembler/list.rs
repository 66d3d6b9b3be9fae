//! The decoded method body: instructions plus their resolution table.
//!
//! [`InstructionList`] owns the immutable byte buffer and the ordered
//! instruction sequence produced by the decode pass. Resolved values live in a
//! parallel table indexed by instruction position, assembled in one explicit
//! resolve pass; the instructions themselves stay immutable. Once decode and
//! resolve have completed the list is read-only and safe to share for
//! concurrent reads.

use crate::{
    disassembler::{
        decoder,
        instruction::{Diagnostic, Instruction, Resolved},
        resolver as resolve_pass,
    },
    metadata::{resolver::MetadataResolver, signatures::MethodSignature},
    Error, Result,
};

/// An ordered, byte-exact sequence of decoded instructions for one method body.
///
/// Created once per method body: the decode pass fills the instruction
/// sequence, a single [`InstructionList::resolve`] pass fills the parallel
/// resolution table and branch-target flags. The `invalid` flag is set if any
/// decode or resolve step failed; the decoded prefix is retained for
/// diagnostic use.
///
/// # Example
///
/// ```rust
/// use cildasm::{disassembler::InstructionList, metadata::resolver::EmptyResolver};
///
/// let body = [0x00, 0x2A]; // nop, ret
/// let mut list = InstructionList::decode(body.as_slice(), None)?;
/// list.resolve(&EmptyResolver);
///
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.instructions()[0].opcode.mnemonic, "nop");
/// assert_eq!(list.instructions()[1].opcode.mnemonic, "ret");
/// assert!(!list.is_invalid());
/// # Ok::<(), cildasm::Error>(())
/// ```
#[derive(Debug)]
pub struct InstructionList {
    /// The method body bytes this list was decoded from.
    pub(crate) buffer: Box<[u8]>,
    /// Name of the assembly the method lives in; qualifiers for types of this
    /// assembly are omitted when rendering.
    pub(crate) assembly: Option<String>,
    /// Decoded instructions, offset-sorted.
    pub(crate) instructions: Vec<Instruction>,
    /// Resolution results, parallel to `instructions`.
    pub(crate) resolutions: Vec<Option<Resolved>>,
    /// Branch-target flags, parallel to `instructions`.
    pub(crate) branch_targets: Vec<bool>,
    /// Recorded decode and resolve failures.
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Whether any decode or resolve step failed.
    pub(crate) invalid: bool,
    /// Whether the resolve pass has run.
    pub(crate) resolved: bool,
}

impl InstructionList {
    /// Decode one method body.
    ///
    /// Performs the single linear decode pass over the whole buffer. Decode
    /// failures do not surface as errors: the list comes back marked invalid
    /// with the instructions decoded so far and a diagnostic describing the
    /// failure.
    ///
    /// # Arguments
    /// * `buffer` - The method body bytes; the list takes ownership
    /// * `assembly` - Name of the assembly owning the method, used to omit
    ///   redundant `[Assembly]` qualifiers when rendering
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if the buffer contains no bytes.
    pub fn decode(buffer: impl Into<Vec<u8>>, assembly: Option<&str>) -> Result<Self> {
        let buffer = buffer.into().into_boxed_slice();
        if buffer.is_empty() {
            return Err(Error::Empty);
        }

        let outcome = decoder::decode(&buffer);
        let count = outcome.instructions.len();

        Ok(InstructionList {
            buffer,
            assembly: assembly.map(str::to_string),
            instructions: outcome.instructions,
            resolutions: std::iter::repeat_with(|| None).take(count).collect(),
            branch_targets: vec![false; count],
            diagnostics: outcome.diagnostics,
            invalid: outcome.invalid,
            resolved: false,
        })
    }

    /// Run the resolve pass, filling the resolution table and branch-target
    /// flags through the given metadata resolver.
    ///
    /// The pass is idempotent: resolving an already-resolved list leaves every
    /// resolved value unchanged.
    pub fn resolve(&mut self, resolver: &dyn MetadataResolver) {
        resolve_pass::resolve(self, resolver);
    }

    /// Number of decoded instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the list contains no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Whether any decode or resolve step failed.
    ///
    /// An invalid list retains the instructions decoded so far for diagnostic
    /// use, but is not guaranteed complete.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Name of the assembly the method lives in, when known.
    #[must_use]
    pub fn assembly(&self) -> Option<&str> {
        self.assembly.as_deref()
    }

    /// The method body bytes this list was decoded from.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// The decoded instruction sequence, offset-sorted.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The instruction at the given position, if in range.
    #[must_use]
    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// The resolved value of the instruction at the given position.
    ///
    /// `None` while the resolve pass has not run, for instructions whose raw
    /// operand is the displayed value, and for values the resolver could not
    /// supply.
    #[must_use]
    pub fn resolved(&self, index: usize) -> Option<&Resolved> {
        self.resolutions.get(index).and_then(Option::as_ref)
    }

    /// Whether the instruction at the given position is the target of a branch
    /// or switch in this list.
    #[must_use]
    pub fn is_branch_target(&self, index: usize) -> bool {
        self.branch_targets.get(index).copied().unwrap_or(false)
    }

    /// The recorded decode and resolve failures.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Binary search for the instruction starting exactly at `offset`.
    ///
    /// Returns the instruction's index; mid-instruction offsets return `None`.
    #[must_use]
    pub fn instruction_at(&self, offset: usize) -> Option<usize> {
        self.instructions
            .binary_search_by(|instruction| instruction.offset.cmp(&offset))
            .ok()
    }

    /// The decoded indirect-call signature of the instruction at `index`.
    ///
    /// The signature is parsed from its blob on first request and cached on
    /// the instruction's resolution slot.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the instruction at `index` has no
    /// resolved signature site, or the signature decoder's error if the blob
    /// cannot be decoded (see [`crate::Error::UnsupportedSignature`]).
    pub fn signature(
        &self,
        index: usize,
        resolver: &dyn MetadataResolver,
    ) -> Result<&MethodSignature> {
        match self.resolved(index) {
            Some(Resolved::Signature(site)) => site.signature(resolver),
            _ => Err(malformed_error!(
                "Instruction has no signature site - {}",
                index
            )),
        }
    }
}
