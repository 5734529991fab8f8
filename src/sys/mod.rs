//! System Definitions.
//!
//! Taxonomia de erros do driver e a ponte para `Errno` do kernel.

pub mod error;

pub use error::{AttachError, Errno, ProgrammingError};
