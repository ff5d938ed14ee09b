// Sun Oct 18 2026 - Alex

use crate::symbol::SymbolName;
use indexmap::IndexSet;

/// Exported names of one library, duplicate-free, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTable {
    names: IndexSet<SymbolName>,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the name was already present.
    pub fn insert(&mut self, name: SymbolName) -> bool {
        self.names.insert(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.as_str() == name)
    }

    pub fn get_index_of(&self, name: &SymbolName) -> Option<usize> {
        self.names.get_index_of(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolName> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.names.iter().map(|n| n.as_str()).collect()
    }
}

impl FromIterator<SymbolName> for ExportTable {
    fn from_iter<I: IntoIterator<Item = SymbolName>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ExportTable {
    type Item = &'a SymbolName;
    type IntoIter = indexmap::set::Iter<'a, SymbolName>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
