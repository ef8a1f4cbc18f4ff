/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the tree structure
///
/// Submodules:
/// - ast: The closed expression tree shared by the parser, resolver and interpreter
/// - operators: Binary operator kinds and their source symbols
pub mod ast;
pub mod operators;
