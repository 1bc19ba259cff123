//! Abstract Syntax Tree types for ESTree-shaped programs
//!
//! The evaluator never parses source text. It consumes the JSON tree produced by
//! an external ECMAScript parser (acorn, esprima, espree, ...) and deserializes it
//! into the closed enums below. Node kinds the evaluator does not implement land
//! in an `Unsupported` variant and only fail when they are actually executed.

use std::rc::Rc;

use serde::Deserialize;

use crate::value::JsString;

/// Line/column pair from an ESTree `loc` record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// ESTree `loc` record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

/// A complete program (script)
#[derive(Debug, Clone, Deserialize)]
pub struct Program {
    pub body: Vec<Statement>,
}

impl Program {
    /// Deserialize a program from ESTree JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Deserialize a program from an already-parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

// ============ STATEMENTS ============

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(Rc<Function>),

    #[serde(rename = "ExpressionStatement")]
    Expression(ExpressionStatement),
    #[serde(rename = "BlockStatement")]
    Block(BlockStatement),
    #[serde(rename = "EmptyStatement")]
    Empty,

    // Control Flow
    #[serde(rename = "IfStatement")]
    If(IfStatement),
    #[serde(rename = "ForStatement")]
    For(ForStatement),
    #[serde(rename = "WhileStatement")]
    While(WhileStatement),
    #[serde(rename = "DoWhileStatement")]
    DoWhile(DoWhileStatement),
    #[serde(rename = "SwitchStatement")]
    Switch(SwitchStatement),
    #[serde(rename = "TryStatement")]
    Try(TryStatement),

    // Jump
    #[serde(rename = "ReturnStatement")]
    Return(ReturnStatement),
    #[serde(rename = "BreakStatement")]
    Break(JumpStatement),
    #[serde(rename = "ContinueStatement")]
    Continue(JumpStatement),
    #[serde(rename = "ThrowStatement")]
    Throw(ThrowStatement),

    /// Any statement kind the evaluator does not implement (classes, labels,
    /// `for..in`, modules, ...)
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableDeclaration {
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableDeclarator {
    pub id: Pattern,
    #[serde(default)]
    pub init: Option<Expression>,
}

/// Shared shape of function declarations, function expressions and arrows
#[derive(Debug, Clone, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
    #[serde(default)]
    pub generator: bool,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    #[serde(default)]
    pub loc: Option<SourceLocation>,
}

impl Function {
    pub fn name(&self) -> Option<&JsString> {
        self.id.as_ref().map(|id| &id.name)
    }
}

/// Function body: a block, or a bare expression for concise arrows
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FunctionBody {
    Block(BlockStatement),
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Box<Statement>,
    #[serde(default)]
    pub alternate: Option<Box<Statement>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForStatement {
    #[serde(default)]
    pub init: Option<ForInit>,
    #[serde(default)]
    pub test: Option<Expression>,
    #[serde(default)]
    pub update: Option<Expression>,
    pub body: Box<Statement>,
}

/// `for` initializer: a declaration or an expression
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ForInit {
    Variable(VariableDeclaration),
    Expression(Expression),
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhileStatement {
    pub test: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoWhileStatement {
    pub body: Box<Statement>,
    pub test: Expression,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwitchStatement {
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwitchCase {
    /// `None` for `default:`
    #[serde(default)]
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TryStatement {
    pub block: BlockStatement,
    #[serde(default)]
    pub handler: Option<CatchClause>,
    #[serde(default)]
    pub finalizer: Option<BlockStatement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatchClause {
    #[serde(default)]
    pub param: Option<Pattern>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReturnStatement {
    #[serde(default)]
    pub argument: Option<Expression>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JumpStatement {
    #[serde(default)]
    pub label: Option<Identifier>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThrowStatement {
    pub argument: Expression,
}

// ============ EXPRESSIONS ============

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    #[serde(rename = "ThisExpression")]
    This,
    #[serde(rename = "ArrayExpression")]
    Array(ArrayExpression),
    #[serde(rename = "ObjectExpression")]
    Object(ObjectExpression),
    #[serde(rename = "FunctionExpression")]
    Function(Rc<Function>),
    #[serde(rename = "ArrowFunctionExpression")]
    ArrowFunction(Rc<Function>),
    #[serde(rename = "TemplateLiteral")]
    Template(TemplateLiteral),

    #[serde(rename = "UnaryExpression")]
    Unary(UnaryExpression),
    #[serde(rename = "UpdateExpression")]
    Update(UpdateExpression),
    #[serde(rename = "BinaryExpression")]
    Binary(BinaryExpression),
    #[serde(rename = "LogicalExpression")]
    Logical(LogicalExpression),
    #[serde(rename = "AssignmentExpression")]
    Assignment(AssignmentExpression),
    #[serde(rename = "ConditionalExpression")]
    Conditional(ConditionalExpression),
    #[serde(rename = "SequenceExpression")]
    Sequence(SequenceExpression),

    #[serde(rename = "MemberExpression")]
    Member(MemberExpression),
    #[serde(rename = "CallExpression")]
    Call(CallExpression),
    #[serde(rename = "NewExpression")]
    New(NewExpression),

    /// Only valid inside array literals and argument lists
    #[serde(rename = "SpreadElement")]
    Spread(SpreadElement),

    /// Any expression kind the evaluator does not implement (classes,
    /// `await`, `yield`, optional chains, ...)
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Identifier {
    pub name: JsString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Literal {
    #[serde(default)]
    pub value: LiteralValue,
    /// Present on regular expression literals
    #[serde(default)]
    pub regex: Option<RegExpLiteral>,
    /// Present on BigInt literals
    #[serde(default)]
    pub bigint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(JsString),
    /// Placeholder some serializers emit for regex/bigint values
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegExpLiteral {
    pub pattern: String,
    pub flags: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArrayExpression {
    /// `None` entries are holes (`[1, , 3]`)
    pub elements: Vec<Option<Expression>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectExpression {
    pub properties: Vec<ObjectMember>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectMember {
    Property(Property),
    #[serde(rename = "SpreadElement")]
    Spread(SpreadElement),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Property {
    pub key: Expression,
    pub value: Expression,
    #[serde(default)]
    pub kind: PropertyKind,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub method: bool,
    #[serde(default)]
    pub shorthand: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpreadElement {
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateLiteral {
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateElement {
    pub value: TemplateElementValue,
    #[serde(default)]
    pub tail: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateElementValue {
    #[serde(default)]
    pub cooked: Option<String>,
    pub raw: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnaryExpression {
    pub operator: UnaryOp,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "~")]
    BitNot,
    #[serde(rename = "typeof")]
    Typeof,
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "delete")]
    Delete,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExpression {
    pub operator: UpdateOp,
    pub prefix: bool,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum UpdateOp {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinaryExpression {
    pub operator: BinaryOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "**")]
    Exp,

    // Comparison
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "===")]
    StrictEq,
    #[serde(rename = "!==")]
    StrictNotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,

    // Bitwise
    #[serde(rename = "&")]
    BitAnd,
    #[serde(rename = "|")]
    BitOr,
    #[serde(rename = "^")]
    BitXor,
    #[serde(rename = "<<")]
    LShift,
    #[serde(rename = ">>")]
    RShift,
    #[serde(rename = ">>>")]
    URShift,

    // Other
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    Instanceof,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogicalExpression {
    pub operator: LogicalOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LogicalOp {
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "??")]
    NullishCoalescing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentExpression {
    pub operator: AssignmentOp,
    pub left: AssignmentTarget,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AssignmentOp {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    AddAssign,
    #[serde(rename = "-=")]
    SubAssign,
    #[serde(rename = "*=")]
    MulAssign,
    #[serde(rename = "/=")]
    DivAssign,
    #[serde(rename = "%=")]
    ModAssign,
    #[serde(rename = "**=")]
    ExpAssign,
    #[serde(rename = "&=")]
    BitAndAssign,
    #[serde(rename = "|=")]
    BitOrAssign,
    #[serde(rename = "^=")]
    BitXorAssign,
    #[serde(rename = "<<=")]
    LShiftAssign,
    #[serde(rename = ">>=")]
    RShiftAssign,
    #[serde(rename = ">>>=")]
    URShiftAssign,
    #[serde(rename = "&&=")]
    AndAssign,
    #[serde(rename = "||=")]
    OrAssign,
    #[serde(rename = "??=")]
    NullishAssign,
}

impl AssignmentOp {
    /// The binary operator a compound assignment applies, if any
    pub fn binary_op(self) -> Option<BinaryOp> {
        match self {
            AssignmentOp::AddAssign => Some(BinaryOp::Add),
            AssignmentOp::SubAssign => Some(BinaryOp::Sub),
            AssignmentOp::MulAssign => Some(BinaryOp::Mul),
            AssignmentOp::DivAssign => Some(BinaryOp::Div),
            AssignmentOp::ModAssign => Some(BinaryOp::Mod),
            AssignmentOp::ExpAssign => Some(BinaryOp::Exp),
            AssignmentOp::BitAndAssign => Some(BinaryOp::BitAnd),
            AssignmentOp::BitOrAssign => Some(BinaryOp::BitOr),
            AssignmentOp::BitXorAssign => Some(BinaryOp::BitXor),
            AssignmentOp::LShiftAssign => Some(BinaryOp::LShift),
            AssignmentOp::RShiftAssign => Some(BinaryOp::RShift),
            AssignmentOp::URShiftAssign => Some(BinaryOp::URShift),
            AssignmentOp::Assign
            | AssignmentOp::AndAssign
            | AssignmentOp::OrAssign
            | AssignmentOp::NullishAssign => None,
        }
    }
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum AssignmentTarget {
    Identifier(Identifier),
    #[serde(rename = "MemberExpression")]
    Member(MemberExpression),
    /// Destructuring targets are not implemented
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionalExpression {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SequenceExpression {
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Box<Expression>,
    #[serde(default)]
    pub computed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExpression {
    pub callee: Box<Expression>,
    #[serde(default)]
    pub arguments: Vec<Expression>,
}

// ============ PATTERNS ============

/// Binding target for declarations, parameters and catch clauses
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    Identifier(Identifier),
    /// Parameter with a default value: `function f(a = 1) {}`
    #[serde(rename = "AssignmentPattern")]
    Assignment(AssignmentPattern),
    /// Rest parameter: `function f(...rest) {}`
    #[serde(rename = "RestElement")]
    Rest(RestElement),
    /// Object and array destructuring are not implemented
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentPattern {
    pub left: Box<Pattern>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestElement {
    pub argument: Box<Pattern>,
}
