//! Variable values passed to a calculation

use indexmap::IndexMap;

use crate::error::CalcError;
use crate::names::{is_valid_name, normalize_var};

/// A single variable binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The name as it was provided
    pub name: String,

    /// The bound value
    pub value: f64,
}

/// Variable values keyed by normalized name.
///
/// Names are case-insensitive and the `$` prefix is optional, so `x`, `X`
/// and `$x` all refer to the same variable.
///
/// # Example
///
/// ```
/// use arith::Vars;
///
/// let mut vars = Vars::new();
/// vars.insert("myVar", 2.0).unwrap();
///
/// assert_eq!(vars.get("$MYVAR"), Some(2.0));
/// assert!(vars.insert("MYVAR", 3.0).is_err()); // duplicate
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vars {
    bindings: IndexMap<String, Binding>,
}

impl Vars {
    /// Create an empty set of variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from name/value pairs.
    ///
    /// # Errors
    ///
    /// - `InvalidVariableName` if a name is not an identifier
    /// - `DuplicateVariable` if two names normalize to the same variable
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, CalcError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut vars = Self::new();
        for (name, value) in pairs {
            vars.insert(name.as_ref(), value)?;
        }
        Ok(vars)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition
    // ═══════════════════════════════════════════════════════════════════

    /// Define a new variable. Fails if it is already defined.
    pub fn insert(&mut self, name: &str, value: f64) -> Result<(), CalcError> {
        let normalized = Self::checked_name(name)?;
        if self.bindings.contains_key(&normalized) {
            return Err(CalcError::DuplicateVariable(name.to_string()));
        }
        self.bindings.insert(
            normalized,
            Binding {
                name: name.to_string(),
                value,
            },
        );
        Ok(())
    }

    /// Define or overwrite a variable.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), CalcError> {
        let normalized = Self::checked_name(name)?;
        self.bindings.insert(
            normalized,
            Binding {
                name: name.to_string(),
                value,
            },
        );
        Ok(())
    }

    /// Remove a variable, returning its value if it was defined.
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.bindings
            .shift_remove(&normalize_var(name))
            .map(|b| b.value)
    }

    fn checked_name(name: &str) -> Result<String, CalcError> {
        let normalized = normalize_var(name);
        if !is_valid_name(&normalized) {
            return Err(CalcError::InvalidVariableName(name.to_string()));
        }
        Ok(normalized)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a variable by name (any case, optional `$`).
    pub fn get(&self, name: &str) -> Option<f64> {
        self.get_normalized(&normalize_var(name))
    }

    /// Look up a variable by its already normalized name.
    pub fn get_normalized(&self, normalized: &str) -> Option<f64> {
        self.bindings.get(normalized).map(|b| b.value)
    }

    /// Check if a variable is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(&normalize_var(name))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Iteration and Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Iterate over bindings in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    /// Names as they were provided, in definition order.
    pub fn names(&self) -> Vec<&str> {
        self.bindings.values().map(|b| b.name.as_str()).collect()
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if no variables are defined.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Remove all variables.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
