//! Error types and error handling for the interpreter.
//!
//! This module defines the error types shared by every pipeline stage:
//!
//! - Error structures with source position information
//! - Specific error variants for syntax, resolution and evaluation failures
//! - The error family names reported to users (`TypeError`, `KeyError`, ...)
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
