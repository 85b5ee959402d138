//! Boolean condition expressions for WHERE clauses.
//!
//! A [`Condition`] accumulates a flat, single-pass stream of predicate and
//! connector tokens; [`Condition::make`] compiles the stream into one
//! left-to-right boolean expression. Grouping is explicit: `and_group` /
//! `or_group` open a parenthesized group that the following predicates fall
//! into, and `end_group` steps back out. Compilation parses the stream into
//! a token tree and renders it recursively, so bracket nesting never relies
//! on string rewriting.
//!
//! Two construction modes, chosen at creation and fixed for the lifetime of
//! the builder:
//!
//! - **literal** ([`Condition::new`]): comparison values are rendered inline
//!   immediately, with text quote-wrapped and nothing escaped;
//! - **parameterized** ([`Condition::prepared`]): every comparison value
//!   becomes a `?` placeholder and is pushed, in encounter order, onto a side
//!   list retrievable via [`Condition::values`]. The placeholders in the
//!   compiled text align 1:1, left to right, with that list.
//!
//! # Example
//!
//! ```
//! use sqlforge::Condition;
//!
//! let cond = Condition::new()
//!     .eq("age", 12)
//!     .and_group()
//!     .eq("c", "d")
//!     .or()
//!     .eq("name", "nihao");
//! assert_eq!(cond.make(), "age=12 AND ( c='d' OR name='nihao')");
//! ```

use crate::value::Value;

/// Boolean connector between predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joiner {
    And,
    Or,
}

impl Joiner {
    fn as_str(self) -> &'static str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
        }
    }
}

/// One queued instruction of the flat stream.
#[derive(Debug, Clone)]
enum Token {
    /// A fully rendered predicate, e.g. `age=12` or `age=?`.
    Pred(String),
    /// A bare connector.
    Join(Joiner),
    /// A connector that opens a parenthesized group.
    Open(Joiner),
    /// Close the most recently opened, still-unclosed group.
    Close,
}

/// Compiled tree node. Predicates and connectors stay in stream order;
/// groups own their children.
#[derive(Debug)]
enum Node {
    Pred(String),
    Join(Joiner),
    Group {
        joiner: Joiner,
        items: Vec<Node>,
        /// Explicitly closed groups render ` )`; groups still open when the
        /// stream ends are auto-closed and render `)` with no space.
        closed: bool,
    },
}

/// A boolean condition expression builder.
#[derive(Debug, Clone, Default)]
pub struct Condition {
    tokens: Vec<Token>,
    values: Vec<Value>,
    prepared: bool,
}

impl Condition {
    /// Create an empty condition in literal mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty condition in parameterized mode: comparison values are
    /// replaced with `?` and collected for [`Condition::values`].
    pub fn prepared() -> Self {
        Self {
            prepared: true,
            ..Self::default()
        }
    }

    /// Whether this condition was built in parameterized mode.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Bound values accumulated in encounter order (parameterized mode only;
    /// empty in literal mode).
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    // ==================== Predicates ====================

    /// Add an equality predicate: `column=value`
    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.cmp(column, "=", value)
    }

    /// Add an inequality predicate: `column!=value`
    pub fn ne(self, column: &str, value: impl Into<Value>) -> Self {
        self.cmp(column, "!=", value)
    }

    /// Add a `column>value` predicate.
    ///
    /// The intent-to-symbol mapping is inherited and deliberately inverted:
    /// `lt` emits `>`, [`st`](Condition::st) emits `<`.
    pub fn lt(self, column: &str, value: impl Into<Value>) -> Self {
        self.cmp(column, ">", value)
    }

    /// Add a `column<value` predicate (see [`lt`](Condition::lt) for the
    /// naming quirk).
    pub fn st(self, column: &str, value: impl Into<Value>) -> Self {
        self.cmp(column, "<", value)
    }

    /// Add a `column>=value` predicate.
    pub fn lt_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.cmp(column, ">=", value)
    }

    /// Add a `column<=value` predicate.
    pub fn st_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.cmp(column, "<=", value)
    }

    /// Add a pattern-match predicate: `column LIKE value`
    pub fn like(mut self, column: &str, value: impl Into<Value>) -> Self {
        let operand = self.operand(value.into());
        self.tokens.push(Token::Pred(format!("{column} LIKE {operand}")));
        self
    }

    /// Add a membership predicate: `column IN (v1,v2,...)`
    pub fn in_list<V: Into<Value>>(self, column: &str, values: Vec<V>) -> Self {
        self.membership(column, "IN", values)
    }

    /// Add a negated membership predicate: `column NOT IN (v1,v2,...)`
    pub fn not_in<V: Into<Value>>(self, column: &str, values: Vec<V>) -> Self {
        self.membership(column, "NOT IN", values)
    }

    // ==================== Connectors ====================

    /// Connect the previous and next predicate with `AND`.
    pub fn and(mut self) -> Self {
        self.tokens.push(Token::Join(Joiner::And));
        self
    }

    /// Connect with `OR`.
    pub fn or(mut self) -> Self {
        self.tokens.push(Token::Join(Joiner::Or));
        self
    }

    /// Connect with `AND` and open a parenthesized group; the following
    /// predicates land inside until [`end_group`](Condition::end_group).
    pub fn and_group(mut self) -> Self {
        self.tokens.push(Token::Open(Joiner::And));
        self
    }

    /// Connect with `OR` and open a parenthesized group.
    pub fn or_group(mut self) -> Self {
        self.tokens.push(Token::Open(Joiner::Or));
        self
    }

    /// Close the most recently opened group. A no-op when no group is open;
    /// groups still open when [`make`](Condition::make) runs are closed for
    /// you at the end of the expression.
    pub fn end_group(mut self) -> Self {
        self.tokens.push(Token::Close);
        self
    }

    // ==================== Compile ====================

    /// Compile the token stream into a boolean expression string.
    ///
    /// Returns the empty string for an empty stream. Non-mutating and
    /// idempotent: the same stream always compiles to the same text.
    /// Pathological streams (trailing connectors, unclosed groups) never
    /// panic; they yield deterministic, possibly syntactically loose SQL.
    pub fn make(&self) -> String {
        if self.tokens.is_empty() {
            return String::new();
        }
        let tree = parse(&self.tokens);
        render(&tree).trim().to_string()
    }

    // ==================== Internals ====================

    fn cmp(mut self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        let operand = self.operand(value.into());
        self.tokens.push(Token::Pred(format!("{column}{op}{operand}")));
        self
    }

    fn membership<V: Into<Value>>(mut self, column: &str, op: &str, values: Vec<V>) -> Self {
        let operands: Vec<String> = values
            .into_iter()
            .map(|v| self.operand(v.into()))
            .collect();
        self.tokens
            .push(Token::Pred(format!("{column} {op} ({})", operands.join(","))));
        self
    }

    /// Render one comparison operand, or swap it for a placeholder and queue
    /// the raw value.
    fn operand(&mut self, value: Value) -> String {
        if self.prepared {
            self.values.push(value);
            "?".to_string()
        } else {
            value.literal()
        }
    }
}

/// Parse the flat stream into a tree. A stack frame per open group; stray
/// closers are dropped, unterminated groups are attached unclosed.
fn parse(tokens: &[Token]) -> Vec<Node> {
    // The root frame is never popped inside the loop, so `last_mut` is
    // always available.
    let mut stack: Vec<(Joiner, Vec<Node>)> = vec![(Joiner::And, Vec::new())];
    for token in tokens {
        match token {
            Token::Pred(s) => push_top(&mut stack, Node::Pred(s.clone())),
            Token::Join(j) => push_top(&mut stack, Node::Join(*j)),
            Token::Open(j) => stack.push((*j, Vec::new())),
            Token::Close => {
                if stack.len() > 1 {
                    if let Some((joiner, items)) = stack.pop() {
                        push_top(
                            &mut stack,
                            Node::Group {
                                joiner,
                                items,
                                closed: true,
                            },
                        );
                    }
                }
            }
        }
    }
    while stack.len() > 1 {
        if let Some((joiner, items)) = stack.pop() {
            push_top(
                &mut stack,
                Node::Group {
                    joiner,
                    items,
                    closed: false,
                },
            );
        }
    }
    stack.pop().map(|(_, items)| items).unwrap_or_default()
}

fn push_top(stack: &mut [(Joiner, Vec<Node>)], node: Node) {
    if let Some((_, items)) = stack.last_mut() {
        items.push(node);
    }
}

fn render(items: &[Node]) -> String {
    let parts: Vec<String> = items
        .iter()
        .map(|node| match node {
            Node::Pred(s) => s.clone(),
            Node::Join(j) => j.as_str().to_string(),
            Node::Group {
                joiner,
                items,
                closed,
            } => {
                let inner = render(items);
                if inner.is_empty() {
                    format!("{} ( )", joiner.as_str())
                } else if *closed {
                    format!("{} ( {inner} )", joiner.as_str())
                } else {
                    format!("{} ( {inner})", joiner.as_str())
                }
            }
        })
        .collect();
    parts.join(" ")
}
