//! Declaration tree for TypeScript declaration fragments.
//!
//! One [`Fragment`] per input file. Every node carries a kind tag (the
//! enum discriminant) and kind-specific children; the model builder and
//! the type normalizer dispatch on those tags only and never look at
//! source text again.

use std::fmt;

/// A parsed declaration fragment: one input unit contributing symbol
/// declarations to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub decls: Vec<Decl>,
}

/// A top-level declaration inside a fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Interface(InterfaceDecl),
    Function(FunctionDecl),
    Namespace(NamespaceDecl),
    Class(ClassDecl),
    TypeAlias(TypeAliasDecl),
}

/// `declare var name: Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub is_const: bool,
}

/// `interface Name<T> extends Base { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeExpr>,
    pub members: Vec<Member>,
}

/// `declare function name<T>(params): Return;`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
}

/// `declare namespace Name { decls }`, or `declare module X { decls }`.
///
/// String-named ambient modules (`declare module "pkg"`) set `ambient`;
/// they augment packages rather than the global surface and the builder
/// skips them.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub name: String,
    pub decls: Vec<Decl>,
    pub ambient: bool,
}

/// `declare class Name<T> extends Base implements I { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<TypeExpr>,
    pub implements: Vec<TypeExpr>,
    pub members: Vec<Member>,
}

/// `type Name<T> = Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub ty: TypeExpr,
}

/// A generic type parameter with optional constraint and default.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<TypeExpr>,
    pub default: Option<TypeExpr>,
}

/// A function, method, or constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub optional: bool,
    pub rest: bool,
}

/// A member name: a plain identifier or a bracketed computed name such
/// as `[Symbol.iterator]` (stored with its brackets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberName {
    Ident(String),
    Computed(String),
}

impl MemberName {
    /// The member name as it appears in catalog keys.
    pub fn text(&self) -> &str {
        match self {
            MemberName::Ident(s) | MemberName::Computed(s) => s,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, MemberName::Computed(_))
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A member of an interface body, class body, or type literal.
///
/// `is_static` is the explicit per-member modifier: `Some(_)` only when
/// the source carried one (class members); interface members leave it
/// `None` and take their staticness from the owning declaration's
/// classification.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Property(PropertySig),
    Method(MethodSig),
    Call(CallSig),
    Construct(ConstructSig),
    Index(IndexSig),
}

/// `name?: Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySig {
    pub name: MemberName,
    pub ty: Option<TypeExpr>,
    pub optional: bool,
    pub readonly: bool,
    pub is_static: Option<bool>,
}

/// `name<T>(params): Return;`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub name: MemberName,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub optional: bool,
    pub is_static: Option<bool>,
    pub is_async: bool,
}

/// `(params): Return;`
#[derive(Debug, Clone, PartialEq)]
pub struct CallSig {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
}

/// `new (params): Return;` — also used for class `constructor(params)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructSig {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
}

/// `[key: string]: Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSig {
    pub key_name: String,
    pub key_type: TypeExpr,
    pub value_type: TypeExpr,
    pub readonly: bool,
}

/// A type expression. The normalizer dispatches on exactly this tag set;
/// anything the parser recognizes syntactically but cannot classify is
/// preserved as [`TypeExpr::Unknown`] with its kind name.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A primitive keyword token: `string`, `number`, `void`, ...
    Token(TypeToken),
    /// A named reference with optional type arguments: `Promise<T>`.
    Named { name: String, args: Vec<TypeExpr> },
    /// `"GET"`
    StringLit(String),
    /// `42`, `1.5`
    NumberLit(String),
    /// `true`, `false`
    BoolLit(bool),
    /// `T[]`
    Array(Box<TypeExpr>),
    /// `A | B`
    Union(Vec<TypeExpr>),
    /// `A & B`
    Intersection(Vec<TypeExpr>),
    /// `[A, B, ...C[]]`
    Tuple(Vec<TupleSlot>),
    /// `(a: A) => R`
    Function(Box<FunctionShape>),
    /// `new (a: A) => R`
    Constructor(Box<FunctionShape>),
    /// `{ name: T; (call): R; new (c): R; [k: string]: T }`
    Literal(Vec<Member>),
    /// `{ [K in C]?: V }`
    Mapped {
        key: String,
        constraint: Box<TypeExpr>,
        value: Box<TypeExpr>,
        optional: bool,
        readonly: bool,
    },
    /// `C extends E ? T : F` — rendered symbolically, never evaluated.
    Conditional {
        check: Box<TypeExpr>,
        extends: Box<TypeExpr>,
        then: Box<TypeExpr>,
        otherwise: Box<TypeExpr>,
    },
    /// `keyof T`, `readonly T`, `unique T`
    Operator { op: TypeOp, operand: Box<TypeExpr> },
    /// `typeof name`
    Query(String),
    /// `T[K]`
    Index {
        object: Box<TypeExpr>,
        index: Box<TypeExpr>,
    },
    /// `name is T`
    Predicate { target: String, ty: Box<TypeExpr> },
    /// `` `prefix-${T}` ``
    Template(Vec<TemplatePart>),
    /// `infer T`
    Infer(String),
    /// `(T)`
    Paren(Box<TypeExpr>),
    /// `this`
    This,
    /// `...T` (tuple rest position)
    Rest(Box<TypeExpr>),
    /// A construct the grammar recognizes but the catalog does not
    /// model; carries the kind name for the normalizer's inline marker.
    Unknown(String),
}

/// Primitive type keyword tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeToken {
    String,
    Number,
    Boolean,
    Void,
    Null,
    Undefined,
    Any,
    Unknown,
    Never,
    Object,
    Symbol,
    BigInt,
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TypeToken::String => "string",
            TypeToken::Number => "number",
            TypeToken::Boolean => "boolean",
            TypeToken::Void => "void",
            TypeToken::Null => "null",
            TypeToken::Undefined => "undefined",
            TypeToken::Any => "any",
            TypeToken::Unknown => "unknown",
            TypeToken::Never => "never",
            TypeToken::Object => "object",
            TypeToken::Symbol => "symbol",
            TypeToken::BigInt => "bigint",
        };
        f.write_str(text)
    }
}

/// Prefix type operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOp {
    KeyOf,
    Readonly,
    Unique,
}

impl TypeOp {
    pub fn text(self) -> &'static str {
        match self {
            TypeOp::KeyOf => "keyof",
            TypeOp::Readonly => "readonly",
            TypeOp::Unique => "unique",
        }
    }
}

/// `(a: A) => R` and `new (a: A) => R` share one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionShape {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub ret: TypeExpr,
}

/// One element of a tuple type.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleSlot {
    pub ty: TypeExpr,
    pub name: Option<String>,
    pub optional: bool,
    pub rest: bool,
}

/// One piece of a template literal type.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Str(String),
    Ty(TypeExpr),
}

impl TypeExpr {
    /// The bare referenced name when this expression is a simple named
    /// reference without type arguments; the pre-classifier uses this to
    /// link variables to their constructor interfaces.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named { name, args } if args.is_empty() => Some(name),
            _ => None,
        }
    }

    /// The kind tag as a short name, used by diagnostics and the
    /// normalizer's verbose mode.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeExpr::Token(_) => "Token",
            TypeExpr::Named { .. } => "Named",
            TypeExpr::StringLit(_) => "StringLit",
            TypeExpr::NumberLit(_) => "NumberLit",
            TypeExpr::BoolLit(_) => "BoolLit",
            TypeExpr::Array(_) => "Array",
            TypeExpr::Union(_) => "Union",
            TypeExpr::Intersection(_) => "Intersection",
            TypeExpr::Tuple(_) => "Tuple",
            TypeExpr::Function(_) => "Function",
            TypeExpr::Constructor(_) => "Constructor",
            TypeExpr::Literal(_) => "Literal",
            TypeExpr::Mapped { .. } => "Mapped",
            TypeExpr::Conditional { .. } => "Conditional",
            TypeExpr::Operator { .. } => "Operator",
            TypeExpr::Query(_) => "Query",
            TypeExpr::Index { .. } => "Index",
            TypeExpr::Predicate { .. } => "Predicate",
            TypeExpr::Template(_) => "Template",
            TypeExpr::Infer(_) => "Infer",
            TypeExpr::Paren(_) => "Paren",
            TypeExpr::This => "This",
            TypeExpr::Rest(_) => "Rest",
            TypeExpr::Unknown(_) => "Unknown",
        }
    }
}

impl Member {
    /// The member's name, when it has one (call/construct/index
    /// signatures do not).
    pub fn name(&self) -> Option<&MemberName> {
        match self {
            Member::Property(p) => Some(&p.name),
            Member::Method(m) => Some(&m.name),
            Member::Call(_) | Member::Construct(_) | Member::Index(_) => None,
        }
    }
}
