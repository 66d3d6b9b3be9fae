//! Metadata-facing types of the decoder core.
//!
//! The decoder itself never reads metadata tables; it sees metadata through
//! three narrow surfaces collected here:
//!
//! - [`token::Token`] - the 4-byte table-tag/row-id references embedded in
//!   instruction operands
//! - [`resolver::MetadataResolver`] - the capability interface an embedding
//!   supplies to map tokens and slot indices to entities
//! - [`signatures`] - the decoder for the out-of-line signature blobs used by
//!   indirect-call instructions
//!
//! The entity model the resolver hands back lives in [`typesystem`].

pub mod resolver;
pub mod signatures;
pub mod token;
pub mod typesystem;
