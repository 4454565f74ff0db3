//! Relnote Fragments - Release-note fragment lifecycle
//!
//! Fragments are small markdown files written by humans in a staging
//! directory. This crate creates them, splits them into named sections,
//! converts each section to the release-notes markup and writes one YAML
//! note record per fragment.

pub mod compiler;
pub mod convert;
pub mod creator;
pub mod parser;
pub mod store;
pub mod types;

pub use compiler::{CompileReport, CompiledNote, FailedFragment, FragmentCompiler};
pub use convert::{converter_for, MarkupConverter, NativeConverter, PandocConverter};
pub use creator::{EditOutcome, EditorMode, FragmentCreator};
pub use parser::FragmentParser;
pub use store::FragmentStore;
pub use types::{Fragment, NoteRecord, ParsedFragment, Section};
