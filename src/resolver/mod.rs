//! Static name resolution.
//!
//! Rewrites every variable reference in a parsed tree into a de Bruijn depth:
//! the number of bindings that sit above it on the environment stack at the
//! moment it is evaluated. Assignments are tagged with whether they overwrite
//! an existing binding or declare a fresh one.

pub mod resolver;

#[cfg(test)]
mod tests;
