/// Half-open byte range `[start, end)` into the expression text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    InstanceOf,
    Matches,
    Between,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
}

/// What a [`Node::Composite`] stands for. Extraction ignores it; it only exists so the
/// tree stays readable in tests and debug output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeKind {
    /// Two or more operands joined by the same operator.
    Binary(BinaryOp),
    Unary(UnaryOp),
    /// `( expr )`
    Group,
    /// `cond ? then : otherwise`
    Ternary,
    /// `value ?: fallback`
    Elvis,
    /// `base.segment?.segment[index]...`; children are the segments in source order.
    Chain,
    /// `[expr]` inside a chain.
    Index,
    /// `{a, b, c}`
    InlineList,
    /// `#fn(args)`; first child is the variable, the rest are arguments.
    VariableCall,
}

/// Structural expression tree. Only references and calls carry meaning downstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Any leaf that is neither a reference nor a call; `text` is its single token.
    Literal { text: String, span: Span },
    /// `@name` or `@'quoted.name'`.
    SymbolicReference { name: String, span: Span },
    /// `name(args...)`, either free-standing or as a chain segment.
    CallReference {
        name: String,
        args: Vec<Node>,
        span: Span,
    },
    Composite {
        kind: CompositeKind,
        children: Vec<Node>,
        span: Span,
    },
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Literal { span, .. }
            | Node::SymbolicReference { span, .. }
            | Node::CallReference { span, .. }
            | Node::Composite { span, .. } => *span,
        }
    }

    /// Direct children: call arguments or composite operands. Leaves have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Literal { .. } | Node::SymbolicReference { .. } => &[],
            Node::CallReference { args, .. } => args,
            Node::Composite { children, .. } => children,
        }
    }

    pub(crate) fn composite(kind: CompositeKind, children: Vec<Node>) -> Node {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => first.span().to(last.span()),
            _ => Span::default(),
        };
        Node::Composite {
            kind,
            children,
            span,
        }
    }
}
