use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A call found in an expression: its name plus the source text of every argument.
///
/// Two calls are the same fact iff the name and the whole ordered argument list match.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct CallFact {
    pub name: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CallFact {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl std::fmt::Display for CallFact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

/// Deduplicated references and calls of one parsed expression.
///
/// Both sets are ordered, so iteration and serialization order is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FactSet {
    #[serde(default)]
    pub references: BTreeSet<String>,
    #[serde(default)]
    pub calls: BTreeSet<CallFact>,
}

impl FactSet {
    pub fn insert_reference(&mut self, name: impl Into<String>) -> bool {
        self.references.insert(name.into())
    }

    pub fn insert_call(&mut self, call: CallFact) -> bool {
        self.calls.insert(call)
    }

    /// Distinct call names, in order.
    pub fn call_names(&self) -> BTreeSet<&str> {
        self.calls.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn calls_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CallFact> + 'a {
        self.calls.iter().filter(move |c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty() && self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_identity_includes_arguments() {
        let mut facts = FactSet::default();
        assert!(facts.insert_call(CallFact::new("hasRole", vec!["'A'".into()])));
        assert!(facts.insert_call(CallFact::new("hasRole", vec!["'B'".into()])));
        assert!(!facts.insert_call(CallFact::new("hasRole", vec!["'A'".into()])));
        assert_eq!(facts.calls.len(), 2);
        assert_eq!(facts.call_names().into_iter().collect::<Vec<_>>(), vec!["hasRole"]);
    }

    #[test]
    fn call_displays_like_source() {
        let call = CallFact::new("hasAnyRole", vec!["'A'".into(), "'B'".into()]);
        assert_eq!(call.to_string(), "hasAnyRole('A', 'B')");
    }
}
