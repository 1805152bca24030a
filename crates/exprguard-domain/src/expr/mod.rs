//! Structural parser for authorization expressions.
//!
//! The grammar follows the usual security-expression shape (`hasRole('ADMIN') and
//! @authz.canRead(#id)`), but the parser only builds enough structure to locate bean
//! references and calls. Nothing is evaluated.
//!
//! ```ignore
//! let parsed = exprguard_domain::parse("@beanA.outer(@beanB.inner())")?;
//! let facts = exprguard_domain::extract(&parsed);
//! ```

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::{BinaryOp, CompositeKind, Node, Span, UnaryOp};
pub use error::SyntaxError;
pub use parser::{parse, ParsedExpression};
