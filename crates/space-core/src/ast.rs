// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Abstract syntax tree for SPACE programs.
//!
//! The AST is a family of tagged sum types with typed payloads. Every node
//! carries a [`Span`]; line/column positions are resolved on demand against
//! the source buffer. Ownership is strictly tree-shaped: every node owns its
//! children and the tree is released with the [`Module`] root.
//!
//! # Example
//!
//! Source `var x:int = 3 + 4 * 5;` parses to a [`Statement::Var`] whose
//! initializer is a `+` node with `3` on the left and `4 * 5` on the right,
//! mirroring operator precedence.

use ecow::EcoString;

use crate::source_analysis::Span;

/// Top-level container for one parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// The ordered top-level statements.
    pub statements: Vec<Statement>,
    /// Span covering the whole file.
    pub span: Span,
}

impl Module {
    /// Creates a module from its statements.
    #[must_use]
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self { statements, span }
    }
}

/// A named reference with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// The identifier text.
    pub name: EcoString,
    /// Source location.
    pub span: Span,
}

impl Identifier {
    /// Creates an identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Visibility of a declaration.
///
/// Absence of a modifier keyword means [`Modifier::PGlobal`], the default
/// file-private visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    /// Default visibility when no modifier keyword is written.
    #[default]
    PGlobal,
    /// `global`
    Global,
    /// `private`
    Private,
    /// `secure`
    Secure,
}

impl Modifier {
    /// Returns the modifier keyword, or `None` for the default.
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::PGlobal => None,
            Self::Global => Some("global"),
            Self::Private => Some("private"),
            Self::Secure => Some("secure"),
        }
    }

    /// Returns `true` when a modifier keyword was written in source.
    #[must_use]
    pub const fn is_explicit(self) -> bool {
        !matches!(self, Self::PGlobal)
    }
}

/// A type annotation: base name plus array dimension suffix.
///
/// `int[][]` has base `int` and dimension 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    /// The base type name (`int`, `String`, a class name, …).
    pub base: EcoString,
    /// Number of `[]` groups after the base name.
    pub dimension: u32,
    /// Source location of the whole annotation.
    pub span: Span,
}

impl TypeName {
    /// Creates a scalar type annotation.
    #[must_use]
    pub fn new(base: impl Into<EcoString>, span: Span) -> Self {
        Self {
            base: base.into(),
            dimension: 0,
            span,
        }
    }

    /// Creates an array type annotation.
    #[must_use]
    pub fn with_dimension(base: impl Into<EcoString>, dimension: u32, span: Span) -> Self {
        Self {
            base: base.into(),
            dimension,
            span,
        }
    }
}

/// A declared parameter of a function, constructor or catch clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: Identifier,
    /// Optional type annotation.
    pub type_name: Option<TypeName>,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
}

impl BinaryOp {
    /// Returns the operator as written in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }
}

/// Comparison operators inside conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
}

impl CompareOp {
    /// Returns the operator as written in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
        }
    }
}

/// Boolean connectives of a chained condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    /// `and`
    And,
    /// `or`
    Or,
}

impl LogicalOp {
    /// Returns the keyword as written in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// The two access operators of a member/class access chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessOp {
    /// `.` for member access.
    Member,
    /// `->` for class access.
    Class,
}

impl AccessOp {
    /// Returns the operator as written in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => ".",
            Self::Class => "->",
        }
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
}

impl AssignOp {
    /// Returns the operator as written in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
        }
    }
}

/// `++` and `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncDecOp {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

impl IncDecOp {
    /// Returns the operator as written in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }
}

/// A function call with its argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Callee name.
    pub name: Identifier,
    /// Ordered arguments.
    pub arguments: Vec<Argument>,
    /// Span of the whole call including the closing parenthesis.
    pub span: Span,
}

/// A call argument with its optional `: Type` annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// The argument expression.
    pub value: Expression,
    /// Optional type annotation following the expression.
    pub type_name: Option<TypeName>,
}

/// One link of an access chain: the operator plus the element it reaches.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessLink {
    /// `.` or `->`.
    pub op: AccessOp,
    /// The reached element (identifier, call or array access).
    pub element: Expression,
}

/// A member/class access chain such as `List->toList().getItem()`.
///
/// Chains longer than one element are flattened so the semantic pass can
/// walk down the spine segment by segment.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessChain {
    /// The leftmost element, resolved in the enclosing scope chain.
    pub head: Box<Expression>,
    /// The remaining segments, left to right.
    pub links: Vec<AccessLink>,
    /// Span of the whole chain.
    pub span: Span,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// An integer literal.
    Integer(EcoString, Span),
    /// A floating-point literal.
    Float(EcoString, Span),
    /// A string literal (without quotes).
    Str(EcoString, Span),
    /// A character-array literal (without quotes).
    CharArray(EcoString, Span),
    /// `true` or `false`.
    Bool(bool, Span),
    /// `null`.
    Null(Span),
    /// `this`.
    This(Span),
    /// A bare identifier reference.
    Identifier(Identifier),
    /// An arithmetic node.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expression>,
        /// Right operand.
        right: Box<Expression>,
        /// Node span.
        span: Span,
    },
    /// A comparison node.
    Comparison {
        /// The operator.
        op: CompareOp,
        /// Left operand.
        left: Box<Expression>,
        /// Right operand.
        right: Box<Expression>,
        /// Node span.
        span: Span,
    },
    /// An `and`/`or` node of a chained condition.
    Logical {
        /// The connective.
        op: LogicalOp,
        /// Left condition.
        left: Box<Expression>,
        /// Right condition.
        right: Box<Expression>,
        /// Node span.
        span: Span,
    },
    /// A function call.
    Call(FunctionCall),
    /// A member/class access chain.
    Access(AccessChain),
    /// One or more `[index]` groups applied to a target.
    ArrayAccess {
        /// The indexed expression.
        target: Box<Expression>,
        /// One index expression per `[ ]` group, outermost first.
        indices: Vec<Expression>,
        /// Node span.
        span: Span,
    },
    /// A brace-delimited array creation: `{1, 2, 3}`.
    ArrayLiteral {
        /// The element expressions.
        elements: Vec<Expression>,
        /// Node span.
        span: Span,
    },
    /// An increment/decrement assignment: `i++`, `count--`.
    IncDec {
        /// `++` or `--`.
        op: IncDecOp,
        /// The mutated target.
        target: Box<Expression>,
        /// Node span.
        span: Span,
    },
    /// A conditional assignment: `cond ? a : b`.
    Conditional {
        /// The chained condition.
        condition: Box<Expression>,
        /// Value when the condition holds.
        if_true: Box<Expression>,
        /// Value otherwise; may itself be a conditional assignment.
        if_false: Box<Expression>,
        /// Node span.
        span: Span,
    },
    /// A `new ClassPath(args)` instance creation.
    New {
        /// The constructor path: a call, or an access chain ending in one.
        target: Box<Expression>,
        /// Node span.
        span: Span,
    },
}

impl Expression {
    /// Returns the source span of this expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Integer(_, span)
            | Self::Float(_, span)
            | Self::Str(_, span)
            | Self::CharArray(_, span)
            | Self::Bool(_, span)
            | Self::Null(span)
            | Self::This(span)
            | Self::Binary { span, .. }
            | Self::Comparison { span, .. }
            | Self::Logical { span, .. }
            | Self::ArrayAccess { span, .. }
            | Self::ArrayLiteral { span, .. }
            | Self::IncDec { span, .. }
            | Self::Conditional { span, .. }
            | Self::New { span, .. } => *span,
            Self::Identifier(identifier) => identifier.span,
            Self::Call(call) => call.span,
            Self::Access(chain) => chain.span,
        }
    }

    /// Returns `true` for `and`/`or` and comparison nodes.
    #[must_use]
    pub const fn is_condition(&self) -> bool {
        matches!(self, Self::Logical { .. } | Self::Comparison { .. } | Self::Bool(..))
    }
}

/// Classification of a variable declaration, decided by lookahead before
/// the declaration commits to a parse shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarDeclKind {
    /// Plain scalar declaration.
    Normal,
    /// Declaration with an array type or array-creation initializer.
    Array,
    /// Declaration initialized by a conditional assignment.
    Conditional,
    /// Declaration initialized by `new ClassPath(…)`.
    Instance,
}

/// A `var`/`const` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Declared name.
    pub name: Identifier,
    /// Visibility modifier.
    pub modifier: Modifier,
    /// `true` for `const` declarations.
    pub constant: bool,
    /// Shape decided by lookahead.
    pub kind: VarDeclKind,
    /// Optional `: Type` annotation.
    pub type_name: Option<TypeName>,
    /// Optional initializer.
    pub initializer: Option<Expression>,
    /// Statement span.
    pub span: Span,
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Function name.
    pub name: Identifier,
    /// Visibility modifier.
    pub modifier: Modifier,
    /// Optional return type written after `function:`.
    pub return_type: Option<TypeName>,
    /// Declared parameters.
    pub parameters: Vec<Parameter>,
    /// Function body.
    pub body: Block,
    /// Statement span.
    pub span: Span,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Class name.
    pub name: Identifier,
    /// Visibility modifier.
    pub modifier: Modifier,
    /// Optional parenthesized parameter list after the class name.
    pub parameters: Vec<Parameter>,
    /// Optional `extends` superclass.
    pub superclass: Option<Identifier>,
    /// Interfaces after `with`, in source order.
    pub interfaces: Vec<Identifier>,
    /// Class body.
    pub body: Block,
    /// Statement span.
    pub span: Span,
}

/// A constructor declaration (`this::constructor(…) {…}`).
///
/// Constructors are anonymous; overloads are told apart by their parameter
/// type signature during semantic analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    /// Declared parameters.
    pub parameters: Vec<Parameter>,
    /// Constructor body.
    pub body: Block,
    /// Statement span.
    pub span: Span,
}

/// One enumerator of an enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    /// Enumerator name.
    pub name: Identifier,
    /// Resolved value: explicit after `:`, otherwise auto-incremented from
    /// the previous value (starting at zero).
    pub value: i64,
    /// Whether the value was written in source.
    pub explicit: bool,
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    /// Enum name.
    pub name: Identifier,
    /// Ordered enumerators.
    pub enumerators: Vec<Enumerator>,
    /// Statement span.
    pub span: Span,
}

/// A brace-delimited sequence of statements (a runnable).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Ordered statements.
    pub statements: Vec<Statement>,
    /// Span from the opening to the closing brace.
    pub span: Span,
}

impl Block {
    /// Creates a block.
    #[must_use]
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self { statements, span }
    }
}

/// An `if` or `else if` statement with its condition and body.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// The chained condition.
    pub condition: Expression,
    /// The body runnable.
    pub body: Block,
    /// Statement span.
    pub span: Span,
}

/// A `while` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    /// The chained condition.
    pub condition: Expression,
    /// The body runnable.
    pub body: Block,
    /// Statement span.
    pub span: Span,
}

/// A `do … while (cond);` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DoStatement {
    /// The body runnable.
    pub body: Block,
    /// The trailing condition.
    pub condition: Expression,
    /// Statement span.
    pub span: Span,
}

/// A `for (init; cond; action) body` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    /// The init variable declaration.
    pub init: Box<Statement>,
    /// The loop condition.
    pub condition: Expression,
    /// The per-iteration action (assignment or inc/dec).
    pub action: Box<Statement>,
    /// The body runnable.
    pub body: Block,
    /// Statement span.
    pub span: Span,
}

/// A `check (expr) { is …: … }` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckStatement {
    /// The discriminator expression.
    pub value: Expression,
    /// The body; only [`Statement::Is`] arms are permitted inside.
    pub body: Block,
    /// Statement span.
    pub span: Span,
}

/// One `is value: …` arm of a check statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IsArm {
    /// The matched value.
    pub value: Expression,
    /// Statements run on a match, up to the next arm.
    pub body: Block,
    /// Statement span.
    pub span: Span,
}

/// A `try { … }` statement; its `catch` follows as a sibling.
#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    /// The guarded runnable.
    pub body: Block,
    /// Statement span.
    pub span: Span,
}

/// A `catch (Type name) { … }` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchStatement {
    /// The caught exception type.
    pub error_type: Identifier,
    /// The binding for the caught value.
    pub name: Identifier,
    /// The handler runnable.
    pub body: Block,
    /// Statement span.
    pub span: Span,
}

/// An assignment statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// The assigned target (identifier, access chain or array access).
    pub target: Expression,
    /// The assignment operator.
    pub op: AssignOp,
    /// The assigned value.
    pub value: Expression,
    /// Statement span.
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Variable or constant declaration.
    Var(VarDecl),
    /// Function declaration.
    Function(FunctionDecl),
    /// Class declaration.
    Class(ClassDecl),
    /// Constructor declaration.
    Constructor(ConstructorDecl),
    /// Enum declaration.
    Enum(EnumDecl),
    /// `include "path";`
    Include(Identifier),
    /// `export "name";`
    Export(Identifier),
    /// `if (…) {…}`
    If(IfStatement),
    /// `else if (…) {…}`
    ElseIf(IfStatement),
    /// `else {…}`
    Else(Block, Span),
    /// `while (…) {…}`
    While(WhileStatement),
    /// `do {…} while (…);`
    Do(DoStatement),
    /// `for (…;…;…) {…}`
    For(ForStatement),
    /// `check (…) {…}`
    Check(CheckStatement),
    /// `is …: …` arm (valid only inside a check body).
    Is(IsArm),
    /// `try {…}`
    Try(TryStatement),
    /// `catch (Type name) {…}`
    Catch(CatchStatement),
    /// `return expr?;`
    Return(Option<Expression>, Span),
    /// `break;`
    Break(Span),
    /// `continue;`
    Continue(Span),
    /// Assignment statement.
    Assignment(Assignment),
    /// Bare expression statement (function call, inc/dec, access).
    Expression(Expression, Span),
}

impl Statement {
    /// Returns the source span of this statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Var(decl) => decl.span,
            Self::Function(decl) => decl.span,
            Self::Class(decl) => decl.span,
            Self::Constructor(decl) => decl.span,
            Self::Enum(decl) => decl.span,
            Self::Include(identifier) | Self::Export(identifier) => identifier.span,
            Self::If(stmt) | Self::ElseIf(stmt) => stmt.span,
            Self::Else(_, span)
            | Self::Return(_, span)
            | Self::Break(span)
            | Self::Continue(span)
            | Self::Expression(_, span) => *span,
            Self::While(stmt) => stmt.span,
            Self::Do(stmt) => stmt.span,
            Self::For(stmt) => stmt.span,
            Self::Check(stmt) => stmt.span,
            Self::Is(arm) => arm.span,
            Self::Try(stmt) => stmt.span,
            Self::Catch(stmt) => stmt.span,
            Self::Assignment(assignment) => assignment.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn operator_spellings() {
        assert_eq!(BinaryOp::Mod.as_str(), "%");
        assert_eq!(CompareOp::GreaterEq.as_str(), ">=");
        assert_eq!(LogicalOp::And.as_str(), "and");
        assert_eq!(AccessOp::Class.as_str(), "->");
        assert_eq!(AssignOp::DivAssign.as_str(), "/=");
        assert_eq!(IncDecOp::Decrement.as_str(), "--");
    }

    #[test]
    fn modifier_default_is_implicit() {
        assert_eq!(Modifier::default(), Modifier::PGlobal);
        assert!(!Modifier::PGlobal.is_explicit());
        assert_eq!(Modifier::Secure.keyword(), Some("secure"));
        assert_eq!(Modifier::PGlobal.keyword(), None);
    }

    #[test]
    fn expression_spans() {
        let expr = Expression::Binary {
            op: BinaryOp::Add,
            left: Box::new(Expression::Integer("1".into(), span())),
            right: Box::new(Expression::Integer("2".into(), Span::new(4, 5))),
            span: Span::new(0, 5),
        };
        assert_eq!(expr.span(), Span::new(0, 5));

        let identifier = Expression::Identifier(Identifier::new("x", Span::new(3, 4)));
        assert_eq!(identifier.span(), Span::new(3, 4));
    }

    #[test]
    fn condition_predicate() {
        let cmp = Expression::Comparison {
            op: CompareOp::Less,
            left: Box::new(Expression::Identifier(Identifier::new("x", span()))),
            right: Box::new(Expression::Integer("10".into(), span())),
            span: span(),
        };
        assert!(cmp.is_condition());
        assert!(Expression::Bool(true, span()).is_condition());
        assert!(!Expression::Null(span()).is_condition());
    }
}
