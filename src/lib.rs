//! Query XML documents from the command line by compiling a small template
//! language into an XSLT 1.0 stylesheet and handing it to an external
//! transformation engine.
//!
//! The pipeline runs in three stages: [`cli`] parses the global flags,
//! [`compiler`] and [`assembler`] turn the template tokens into a stylesheet
//! held in a [`tree::ProgramTree`], and [`engine`] applies the serialized
//! stylesheet to each input document.

pub mod assembler;
pub mod cli;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod namespaces;
pub mod output;
pub mod sort;
pub mod sortkey;
pub mod tree;

pub use engine::{SubprocessEngine, TransformEngine};
pub use error::{EngineError, SelectError, UsageError};
