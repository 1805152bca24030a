use crate::expr::{Node, ParsedExpression};
use exprguard_types::{CallFact, FactSet};

/// Collect every symbolic reference and call in the tree, at any depth.
///
/// Call arguments are rendered as their exact source text and then walked
/// themselves, so `@a.outer(@b.inner())` yields both references and both calls.
pub fn extract(parsed: &ParsedExpression) -> FactSet {
    let mut facts = FactSet::default();
    // Explicit stack: the parser already bounds depth, but extraction should not
    // depend on that to stay off the call stack.
    let mut pending: Vec<&Node> = vec![parsed.root()];

    while let Some(node) = pending.pop() {
        match node {
            Node::Literal { .. } => {}
            Node::SymbolicReference { name, .. } => {
                facts.insert_reference(name.as_str());
            }
            Node::CallReference { name, args, .. } => {
                let rendered = args
                    .iter()
                    .map(|arg| parsed.text_of(arg).to_string())
                    .collect();
                facts.insert_call(CallFact::new(name.as_str(), rendered));
                pending.extend(args.iter().rev());
            }
            Node::Composite { children, .. } => {
                pending.extend(children.iter().rev());
            }
        }
    }

    facts
}
