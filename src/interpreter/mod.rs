//! Evaluation of resolved syntax trees.
//!
//! - `value`: runtime values, closures and the ordered map type
//! - `environment`: the depth-addressed binding stack
//! - `operators`: arithmetic, comparison and logical operators
//! - `console`: where `print` and `input` talk to
//! - `interpreter`: the tree walker itself

pub mod console;
pub mod environment;
pub mod interpreter;
pub mod operators;
pub mod value;
