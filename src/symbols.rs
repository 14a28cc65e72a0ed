//! The symbol table: label to resolved address, insert-once.

use std::collections::HashMap;

use crate::error::ErrorKind;

/// Built by pass one, read-only in pass two.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a label to an address. Rebinding an existing label is fatal.
    pub fn define(&mut self, label: &str, address: u32) -> Result<(), ErrorKind> {
        if self.symbols.contains_key(label) {
            return Err(ErrorKind::DuplicateSymbol(label.to_string()));
        }
        self.symbols.insert(label.to_string(), address);
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        self.symbols.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.symbols.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
