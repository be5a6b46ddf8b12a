//! Schema loading and resolution
//!
//! - [`graph`]: loaded documents and their include/import edges
//! - [`parser`]: builds model nodes and symbol tables from document trees
//! - [`model`]: the arena of types, declarations and groups
//! - [`symbols`]: per-document symbol tables
//! - [`resolver`]: memoized reference and content resolution
//! - [`builtins`]: XSD built-in types

pub mod builtins;
pub mod graph;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod symbols;

pub use builtins::{BuiltinType, Primitive};
pub use graph::{SchemaDocument, SchemaGraph};
pub use model::{DocId, ElementId, Model, TypeDef, TypeId};
pub use resolver::{ContentModel, Member, MemberKind, ParticleContext, ResolvedType, Resolver};
pub use symbols::{SymbolId, SymbolTable};
