//! Contract interface - method table keyed by method name

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A function parameter specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name (may be empty)
    pub name: String,
    /// Canonical Solidity type (e.g., "address", "uint256", "(uint256,address)")
    pub kind: String,
}

/// A callable contract method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpec {
    /// 4-byte function selector
    pub selector: [u8; 4],
    /// Function name as declared in the ABI
    pub name: String,
    /// Canonical signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    pub inputs: Vec<ParamSpec>,
    pub outputs: Vec<ParamSpec>,
}

impl MethodSpec {
    /// Get selector as hex string
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }
}

/// Immutable method table built by the ABI loader
#[derive(Debug, Default, Clone)]
pub struct ContractInterface {
    methods: HashMap<String, MethodSpec>,
}

impl ContractInterface {
    /// Create a new empty interface
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a method and return the key it was stored under.
    ///
    /// Overloads keep the first declaration under the plain name; later ones
    /// are stored as `name0`, `name1`, ...
    pub fn insert(&mut self, method: MethodSpec) -> String {
        let mut key = method.name.clone();
        let mut idx = 0;
        while self.methods.contains_key(&key) {
            key = format!("{}{}", method.name, idx);
            idx += 1;
        }
        self.methods.insert(key.clone(), method);
        key
    }

    /// Look up a method by name
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.get(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Method names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodSpec> {
        self.methods.values()
    }
}
