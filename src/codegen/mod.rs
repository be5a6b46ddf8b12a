//! Go code generation
//!
//! - [`emitter`]: walks complex types and writes one struct per file
//! - [`fields`]: projects declarations into struct fields
//! - [`render`]: formats Go source
//! - [`output`]: destinations for generated files

pub mod emitter;
pub mod fields;
pub mod output;
pub mod render;

pub use emitter::{EmitContext, EmittedStruct, Emitter};
pub use fields::{FieldSpec, GoType, TypeNaming};
pub use output::{FsOutput, MemoryOutput, OutputSink};
pub use render::{StructFile, GENERATED_HEADER};
