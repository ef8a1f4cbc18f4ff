use super::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

/// The runtime binding stack.
///
/// Bindings are addressed by depth: 0 is the most recently pushed binding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Environment {
    bindings: Vec<Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Environment { bindings: vec![] }
    }

    pub fn push(&mut self, name: String, value: Value) {
        self.bindings.push(Binding { name, value });
    }

    fn index_of(&self, depth: usize) -> Option<usize> {
        self.bindings.len().checked_sub(depth + 1)
    }

    pub fn get(&self, depth: usize) -> Option<&Value> {
        self.index_of(depth).map(|index| &self.bindings[index].value)
    }

    /// Overwrites the binding at `depth`. Returns false if there is none.
    pub fn set(&mut self, depth: usize, value: Value) -> bool {
        match self.index_of(depth) {
            Some(index) => {
                self.bindings[index].value = value;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn truncate(&mut self, len: usize) {
        self.bindings.truncate(len);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|binding| binding.name.as_str())
    }
}
