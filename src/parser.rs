//! Parser for TypeScript declaration fragments.
//!
//! Recursive descent over the token stream. Syntax errors are fatal (the
//! caller treats them as a startup failure); constructs the grammar can
//! skip over but the catalog does not model (import types, template
//! interpolations that fail to sub-parse) degrade to
//! [`TypeExpr::Unknown`] instead of erroring.

use crate::ast::*;
use crate::lexer::{Lexer, RawTemplatePart, Token, TokenKind};

/// A parse error with the byte offset it occurred at.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub pos: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error at {}: {}", self.pos, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a declaration fragment source into a [`Fragment`].
pub fn parse(src: &str) -> ParseResult<Fragment> {
    let mut parser = Parser::new(src);
    parser.parse_fragment()
}

/// Parse a standalone type expression (template literal interpolations,
/// tests).
pub fn parse_type_str(src: &str) -> ParseResult<TypeExpr> {
    let mut parser = Parser::new(src);
    parser.parse_type()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(src: &str) -> Self {
        let tokens = Lexer::new(src).tokenize();
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_nth(&self, n: usize) -> &TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", kind, self.peek())))
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            pos: self.current().start,
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        if let TokenKind::Ident(name) = self.peek().clone() {
            self.advance();
            return Ok(name);
        }
        // Some keywords double as identifiers in declaration position
        if let Some(keyword) = self.keyword_text() {
            self.advance();
            return Ok(keyword.to_string());
        }
        Err(self.error(format!("expected identifier, found {:?}", self.peek())))
    }

    /// The textual form of the current token when it is a keyword;
    /// PropertyName allows every keyword, so member parsing leans on this.
    fn keyword_text(&self) -> Option<&'static str> {
        let text = match self.peek() {
            TokenKind::Declare => "declare",
            TokenKind::Function => "function",
            TokenKind::Interface => "interface",
            TokenKind::Class => "class",
            TokenKind::Type => "type",
            TokenKind::Namespace => "namespace",
            TokenKind::Module => "module",
            TokenKind::Export => "export",
            TokenKind::Import => "import",
            TokenKind::Const => "const",
            TokenKind::Let => "let",
            TokenKind::Var => "var",
            TokenKind::Readonly => "readonly",
            TokenKind::Extends => "extends",
            TokenKind::Implements => "implements",
            TokenKind::New => "new",
            TokenKind::Typeof => "typeof",
            TokenKind::Keyof => "keyof",
            TokenKind::Unique => "unique",
            TokenKind::Infer => "infer",
            TokenKind::As => "as",
            TokenKind::Is => "is",
            TokenKind::Default => "default",
            TokenKind::Static => "static",
            TokenKind::Async => "async",
            TokenKind::Public => "public",
            TokenKind::Private => "private",
            TokenKind::Protected => "protected",
            TokenKind::Abstract => "abstract",
            TokenKind::In => "in",
            TokenKind::Out => "out",
            TokenKind::This => "this",
            TokenKind::String_ => "string",
            TokenKind::Number_ => "number",
            TokenKind::Boolean_ => "boolean",
            TokenKind::Void_ => "void",
            TokenKind::Null_ => "null",
            TokenKind::Undefined_ => "undefined",
            TokenKind::Any_ => "any",
            TokenKind::Unknown_ => "unknown",
            TokenKind::Never_ => "never",
            TokenKind::Object_ => "object",
            TokenKind::Symbol_ => "symbol",
            TokenKind::BigInt_ => "bigint",
            TokenKind::True_ => "true",
            TokenKind::False_ => "false",
            _ => return None,
        };
        Some(text)
    }

    /// A member name: identifier, keyword, string literal, or a
    /// bracketed computed name such as `[Symbol.iterator]`.
    fn parse_member_name(&mut self) -> ParseResult<MemberName> {
        if self.check(&TokenKind::LBracket) {
            self.advance();
            let mut path = self.expect_ident()?;
            while self.matches(&TokenKind::Dot) {
                path.push('.');
                path.push_str(&self.expect_ident()?);
            }
            self.expect(&TokenKind::RBracket)?;
            return Ok(MemberName::Computed(format!("[{path}]")));
        }

        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(MemberName::Ident(name))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(MemberName::Ident(s))
            }
            _ => {
                if let Some(keyword) = self.keyword_text() {
                    self.advance();
                    return Ok(MemberName::Ident(keyword.to_string()));
                }
                Err(self.error(format!("expected member name, found {:?}", self.peek())))
            }
        }
    }

    /// Disambiguate a modifier keyword from a member that happens to be
    /// named like one: `static name: T` is a modifier, `static: T` is a
    /// member named "static".
    fn is_modifier_not_property(&self) -> bool {
        !matches!(
            self.peek_nth(1),
            TokenKind::Colon | TokenKind::Question | TokenKind::LParen | TokenKind::LAngle
        )
    }

    fn parse_fragment(&mut self) -> ParseResult<Fragment> {
        let mut decls = Vec::new();

        while !self.check(&TokenKind::Eof) {
            if let Some(decl) = self.parse_decl()? {
                decls.push(decl);
            }
        }

        Ok(Fragment { decls })
    }

    fn parse_decl(&mut self) -> ParseResult<Option<Decl>> {
        let mut has_export = false;

        loop {
            match self.peek() {
                TokenKind::Export => {
                    has_export = true;
                    self.advance();
                }
                TokenKind::Declare | TokenKind::Abstract => {
                    self.advance();
                }
                _ => break,
            }
        }

        // `export = x;`, `export default x;`, `export { ... };` carry no
        // global-surface declarations.
        if has_export {
            if self.matches(&TokenKind::Eq) || self.matches(&TokenKind::Default) {
                self.skip_until_semicolon();
                return Ok(None);
            }
            if self.check(&TokenKind::LBrace) {
                while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
                    self.advance();
                }
                self.matches(&TokenKind::RBrace);
                self.matches(&TokenKind::Semicolon);
                return Ok(None);
            }
        }

        match self.peek() {
            TokenKind::Function => Ok(Some(Decl::Function(self.parse_function()?))),
            TokenKind::Interface => Ok(Some(Decl::Interface(self.parse_interface()?))),
            TokenKind::Class => Ok(Some(Decl::Class(self.parse_class()?))),
            TokenKind::Type => Ok(Some(Decl::TypeAlias(self.parse_type_alias()?))),
            TokenKind::Const | TokenKind::Let | TokenKind::Var => {
                Ok(Some(Decl::Var(self.parse_variable()?)))
            }
            TokenKind::Namespace => Ok(Some(Decl::Namespace(self.parse_namespace()?))),
            TokenKind::Module => Ok(Some(Decl::Namespace(self.parse_module()?))),
            TokenKind::Import => {
                self.skip_until_semicolon();
                Ok(None)
            }
            TokenKind::Semicolon => {
                self.advance();
                Ok(None)
            }
            TokenKind::Eof => Ok(None),
            _ => {
                // Skip unknown token
                self.advance();
                Ok(None)
            }
        }
    }

    fn skip_until_semicolon(&mut self) {
        while !self.check(&TokenKind::Semicolon) && !self.check(&TokenKind::Eof) {
            self.advance();
        }
        self.matches(&TokenKind::Semicolon);
    }

    fn parse_function(&mut self) -> ParseResult<FunctionDecl> {
        self.expect(&TokenKind::Function)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let ret = if self.matches(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.matches(&TokenKind::Semicolon);

        Ok(FunctionDecl {
            name,
            type_params,
            params,
            ret,
        })
    }

    fn parse_interface(&mut self) -> ParseResult<InterfaceDecl> {
        self.expect(&TokenKind::Interface)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;

        let mut extends = Vec::new();
        if self.matches(&TokenKind::Extends) {
            loop {
                extends.push(self.parse_type()?);
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let members = self.parse_member_block()?;

        Ok(InterfaceDecl {
            name,
            type_params,
            extends,
            members,
        })
    }

    fn parse_class(&mut self) -> ParseResult<ClassDecl> {
        self.expect(&TokenKind::Class)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;

        let extends = if self.matches(&TokenKind::Extends) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let mut implements = Vec::new();
        if self.matches(&TokenKind::Implements) {
            loop {
                implements.push(self.parse_type()?);
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let members = self.parse_member_block()?;

        Ok(ClassDecl {
            name,
            type_params,
            extends,
            implements,
            members,
        })
    }

    fn parse_member_block(&mut self) -> ParseResult<Vec<Member>> {
        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            if let Some(member) = self.parse_member()? {
                members.push(member);
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(members)
    }

    /// One member of an interface body, class body, or type literal.
    fn parse_member(&mut self) -> ParseResult<Option<Member>> {
        let mut is_static = None;
        let mut readonly = false;
        let mut is_async = false;

        loop {
            match self.peek() {
                TokenKind::Public | TokenKind::Private | TokenKind::Protected
                    if self.is_modifier_not_property() =>
                {
                    self.advance();
                }
                TokenKind::Abstract if self.is_modifier_not_property() => {
                    self.advance();
                }
                TokenKind::Static if self.is_modifier_not_property() => {
                    is_static = Some(true);
                    self.advance();
                }
                TokenKind::Readonly if self.is_modifier_not_property() => {
                    readonly = true;
                    self.advance();
                }
                TokenKind::Async if self.is_modifier_not_property() => {
                    is_async = true;
                    self.advance();
                }
                _ => break,
            }
        }

        // Index signature `[key: string]: T` — a computed name has a dot
        // or closing bracket after the identifier instead of a colon.
        if self.check(&TokenKind::LBracket) && matches!(self.peek_nth(2), TokenKind::Colon) {
            let sig = self.parse_index_signature(readonly)?;
            return Ok(Some(Member::Index(sig)));
        }

        // Call signature
        if self.check(&TokenKind::LParen) || self.check(&TokenKind::LAngle) {
            let (type_params, params, ret) = self.parse_signature()?;
            self.matches(&TokenKind::Semicolon);
            self.matches(&TokenKind::Comma);
            return Ok(Some(Member::Call(CallSig {
                type_params,
                params,
                ret,
            })));
        }

        // Construct signature — only when `new` opens a signature,
        // otherwise it is a member named "new"
        if self.check(&TokenKind::New)
            && matches!(self.peek_nth(1), TokenKind::LParen | TokenKind::LAngle)
        {
            self.advance();
            let (type_params, params, ret) = self.parse_signature()?;
            self.matches(&TokenKind::Semicolon);
            self.matches(&TokenKind::Comma);
            return Ok(Some(Member::Construct(ConstructSig {
                type_params,
                params,
                ret,
            })));
        }

        let name = match self.parse_member_name() {
            Ok(n) => n,
            Err(_) => {
                // Skip unknown token
                self.advance();
                return Ok(None);
            }
        };

        let optional = self.matches(&TokenKind::Question);

        if self.check(&TokenKind::LParen) || self.check(&TokenKind::LAngle) {
            let (type_params, params, ret) = self.parse_signature()?;
            self.matches(&TokenKind::Semicolon);
            self.matches(&TokenKind::Comma);

            // A class `constructor(...)` is a construct signature
            if name == MemberName::Ident("constructor".to_string()) {
                return Ok(Some(Member::Construct(ConstructSig {
                    type_params,
                    params,
                    ret,
                })));
            }

            return Ok(Some(Member::Method(MethodSig {
                name,
                type_params,
                params,
                ret,
                optional,
                is_static,
                is_async,
            })));
        }

        // Property; ambient class properties may omit the type
        let ty = if self.matches(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.matches(&TokenKind::Semicolon);
        self.matches(&TokenKind::Comma);

        Ok(Some(Member::Property(PropertySig {
            name,
            ty,
            optional,
            readonly,
            is_static,
        })))
    }

    /// `<T>(params): Return` — shared by methods and call/construct
    /// signatures.
    fn parse_signature(
        &mut self,
    ) -> ParseResult<(Vec<TypeParam>, Vec<Param>, Option<TypeExpr>)> {
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let ret = if self.matches(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        Ok((type_params, params, ret))
    }

    fn parse_index_signature(&mut self, readonly: bool) -> ParseResult<IndexSig> {
        self.expect(&TokenKind::LBracket)?;
        let key_name = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let key_type = self.parse_type()?;
        self.expect(&TokenKind::RBracket)?;
        self.expect(&TokenKind::Colon)?;
        let value_type = self.parse_type()?;
        self.matches(&TokenKind::Semicolon);
        self.matches(&TokenKind::Comma);

        Ok(IndexSig {
            key_name,
            key_type,
            value_type,
            readonly,
        })
    }

    fn parse_type_alias(&mut self) -> ParseResult<TypeAliasDecl> {
        self.expect(&TokenKind::Type)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        self.expect(&TokenKind::Eq)?;
        let ty = self.parse_type()?;
        self.matches(&TokenKind::Semicolon);

        Ok(TypeAliasDecl {
            name,
            type_params,
            ty,
        })
    }

    fn parse_variable(&mut self) -> ParseResult<VarDecl> {
        let is_const = self.matches(&TokenKind::Const);
        if !is_const {
            self.matches(&TokenKind::Let);
            self.matches(&TokenKind::Var);
        }

        let name = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.matches(&TokenKind::Semicolon);

        Ok(VarDecl { name, ty, is_const })
    }

    fn parse_namespace(&mut self) -> ParseResult<NamespaceDecl> {
        self.expect(&TokenKind::Namespace)?;
        let name = self.expect_ident()?;
        let decls = self.parse_decl_block()?;
        Ok(NamespaceDecl {
            name,
            decls,
            ambient: false,
        })
    }

    fn parse_module(&mut self) -> ParseResult<NamespaceDecl> {
        self.expect(&TokenKind::Module)?;

        let (name, ambient) = match self.peek().clone() {
            TokenKind::StringLiteral(s) => {
                self.advance();
                (s, true)
            }
            _ => (self.expect_ident()?, false),
        };

        let decls = self.parse_decl_block()?;
        Ok(NamespaceDecl {
            name,
            decls,
            ambient,
        })
    }

    fn parse_decl_block(&mut self) -> ParseResult<Vec<Decl>> {
        self.expect(&TokenKind::LBrace)?;
        let mut decls = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            if let Some(decl) = self.parse_decl()? {
                decls.push(decl);
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(decls)
    }

    fn parse_type_params(&mut self) -> ParseResult<Vec<TypeParam>> {
        if !self.matches(&TokenKind::LAngle) {
            return Ok(Vec::new());
        }

        let mut params = Vec::new();
        loop {
            // Variance markers carry nothing for the catalog
            self.matches(&TokenKind::In);
            self.matches(&TokenKind::Out);

            let name = self.expect_ident()?;

            let constraint = if self.matches(&TokenKind::Extends) {
                Some(self.parse_type()?)
            } else {
                None
            };

            let default = if self.matches(&TokenKind::Eq) {
                Some(self.parse_type()?)
            } else {
                None
            };

            params.push(TypeParam {
                name,
                constraint,
                default,
            });

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RAngle)?;
        Ok(params)
    }

    fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;

        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.check(&TokenKind::Eof) {
            // `this` parameters annotate the receiver, not the surface
            if self.check(&TokenKind::This) && self.peek_nth(1) == &TokenKind::Colon {
                self.advance();
                self.advance();
                let _receiver = self.parse_type()?;
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
                continue;
            }

            let rest = self.matches(&TokenKind::DotDotDot);
            let name = self.expect_ident()?;
            let optional = self.matches(&TokenKind::Question);

            let ty = if self.matches(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };

            params.push(Param {
                name,
                ty,
                optional,
                rest,
            });

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    pub(crate) fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        // Type predicate: `name is T` / `this is T`
        if let TokenKind::Ident(name) = self.peek().clone() {
            if self.peek_nth(1) == &TokenKind::Is {
                self.advance();
                self.advance();
                let ty = self.parse_type()?;
                return Ok(TypeExpr::Predicate {
                    target: name,
                    ty: Box::new(ty),
                });
            }
        }
        if self.check(&TokenKind::This) && self.peek_nth(1) == &TokenKind::Is {
            self.advance();
            self.advance();
            let ty = self.parse_type()?;
            return Ok(TypeExpr::Predicate {
                target: "this".to_string(),
                ty: Box::new(ty),
            });
        }

        let check = self.parse_union_type()?;

        // Conditional: `C extends E ? T : F`, lowest precedence
        if self.matches(&TokenKind::Extends) {
            let extends = self.parse_union_type()?;
            self.expect(&TokenKind::Question)?;
            let then = self.parse_type()?;
            self.expect(&TokenKind::Colon)?;
            let otherwise = self.parse_type()?;
            return Ok(TypeExpr::Conditional {
                check: Box::new(check),
                extends: Box::new(extends),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            });
        }

        Ok(check)
    }

    fn parse_union_type(&mut self) -> ParseResult<TypeExpr> {
        self.matches(&TokenKind::Pipe);

        let mut types = vec![self.parse_intersection_type()?];

        while self.matches(&TokenKind::Pipe) {
            types.push(self.parse_intersection_type()?);
        }

        if types.len() == 1 {
            Ok(types.remove(0))
        } else {
            Ok(TypeExpr::Union(types))
        }
    }

    fn parse_intersection_type(&mut self) -> ParseResult<TypeExpr> {
        let mut types = vec![self.parse_postfix_type()?];

        while self.matches(&TokenKind::Amp) {
            types.push(self.parse_postfix_type()?);
        }

        if types.len() == 1 {
            Ok(types.remove(0))
        } else {
            Ok(TypeExpr::Intersection(types))
        }
    }

    fn parse_postfix_type(&mut self) -> ParseResult<TypeExpr> {
        let mut ty = self.parse_primary_type()?;

        loop {
            // Array suffix `T[]`
            if self.check(&TokenKind::LBracket) && self.peek_nth(1) == &TokenKind::RBracket {
                self.advance();
                self.advance();
                ty = TypeExpr::Array(Box::new(ty));
                continue;
            }

            // Indexed access `T[K]`
            if self.check(&TokenKind::LBracket) {
                self.advance();
                let index = self.parse_type()?;
                self.expect(&TokenKind::RBracket)?;
                ty = TypeExpr::Index {
                    object: Box::new(ty),
                    index: Box::new(index),
                };
                continue;
            }

            break;
        }

        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> ParseResult<TypeExpr> {
        let token = |t| Ok(TypeExpr::Token(t));

        match self.peek().clone() {
            TokenKind::String_ => {
                self.advance();
                token(TypeToken::String)
            }
            TokenKind::Number_ => {
                self.advance();
                token(TypeToken::Number)
            }
            TokenKind::Boolean_ => {
                self.advance();
                token(TypeToken::Boolean)
            }
            TokenKind::Void_ => {
                self.advance();
                token(TypeToken::Void)
            }
            TokenKind::Null_ => {
                self.advance();
                token(TypeToken::Null)
            }
            TokenKind::Undefined_ => {
                self.advance();
                token(TypeToken::Undefined)
            }
            TokenKind::Any_ => {
                self.advance();
                token(TypeToken::Any)
            }
            TokenKind::Unknown_ => {
                self.advance();
                token(TypeToken::Unknown)
            }
            TokenKind::Never_ => {
                self.advance();
                token(TypeToken::Never)
            }
            TokenKind::Object_ => {
                self.advance();
                token(TypeToken::Object)
            }
            TokenKind::Symbol_ => {
                self.advance();
                token(TypeToken::Symbol)
            }
            TokenKind::BigInt_ => {
                self.advance();
                token(TypeToken::BigInt)
            }
            TokenKind::True_ => {
                self.advance();
                Ok(TypeExpr::BoolLit(true))
            }
            TokenKind::False_ => {
                self.advance();
                Ok(TypeExpr::BoolLit(false))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(TypeExpr::StringLit(s))
            }
            TokenKind::NumberLiteral(n) => {
                self.advance();
                Ok(TypeExpr::NumberLit(n))
            }
            TokenKind::Template(parts) => {
                self.advance();
                Ok(self.convert_template(parts))
            }
            TokenKind::Typeof => {
                self.advance();
                let name = self.parse_dotted_name()?;
                Ok(TypeExpr::Query(name))
            }
            TokenKind::Keyof => {
                self.advance();
                let operand = self.parse_postfix_type()?;
                Ok(TypeExpr::Operator {
                    op: TypeOp::KeyOf,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Readonly => {
                self.advance();
                let operand = self.parse_postfix_type()?;
                Ok(TypeExpr::Operator {
                    op: TypeOp::Readonly,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Unique => {
                self.advance();
                let operand = self.parse_postfix_type()?;
                Ok(TypeExpr::Operator {
                    op: TypeOp::Unique,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Infer => {
                self.advance();
                let name = self.expect_ident()?;
                Ok(TypeExpr::Infer(name))
            }
            TokenKind::This => {
                self.advance();
                Ok(TypeExpr::This)
            }
            TokenKind::New => {
                self.advance();
                let type_params = self.parse_type_params()?;
                let params = self.parse_params()?;
                self.expect(&TokenKind::Arrow)?;
                let ret = self.parse_type()?;
                Ok(TypeExpr::Constructor(Box::new(FunctionShape {
                    type_params,
                    params,
                    ret,
                })))
            }
            TokenKind::Import => {
                self.advance();
                self.skip_import_type()?;
                Ok(TypeExpr::Unknown("import".to_string()))
            }
            TokenKind::Abstract => {
                // `abstract new (...) => T` — the abstractness is not
                // part of the catalog surface
                self.advance();
                self.parse_primary_type()
            }
            TokenKind::LParen => self.parse_paren_or_function_type(),
            TokenKind::LBrace => self.parse_object_type(),
            TokenKind::LBracket => self.parse_tuple_type(),
            TokenKind::LAngle => {
                let type_params = self.parse_type_params()?;
                let params = self.parse_params()?;
                self.expect(&TokenKind::Arrow)?;
                let ret = self.parse_type()?;
                Ok(TypeExpr::Function(Box::new(FunctionShape {
                    type_params,
                    params,
                    ret,
                })))
            }
            TokenKind::Ident(name) => {
                self.advance();
                self.parse_named_type(name)
            }
            _ => Err(self.error(format!(
                "unexpected token in type position: {:?}",
                self.peek()
            ))),
        }
    }

    fn parse_dotted_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_ident()?;
        while self.matches(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }
        Ok(name)
    }

    fn parse_named_type(&mut self, first: String) -> ParseResult<TypeExpr> {
        let mut name = first;
        while self.matches(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }

        let args = if self.check(&TokenKind::LAngle) {
            self.parse_type_args()?
        } else {
            Vec::new()
        };

        Ok(TypeExpr::Named { name, args })
    }

    fn parse_type_args(&mut self) -> ParseResult<Vec<TypeExpr>> {
        self.expect(&TokenKind::LAngle)?;
        let mut args = Vec::new();

        loop {
            args.push(self.parse_type()?);
            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RAngle)?;
        Ok(args)
    }

    fn convert_template(&mut self, parts: Vec<RawTemplatePart>) -> TypeExpr {
        let converted = parts
            .into_iter()
            .map(|part| match part {
                RawTemplatePart::Str(s) => TemplatePart::Str(s),
                RawTemplatePart::Expr(src) => match parse_type_str(&src) {
                    Ok(ty) => TemplatePart::Ty(ty),
                    // A busted interpolation degrades locally; the
                    // template itself still renders
                    Err(_) => TemplatePart::Ty(TypeExpr::Unknown("template-expr".to_string())),
                },
            })
            .collect();
        TypeExpr::Template(converted)
    }

    /// Skip `("module")`, an optional `.a.b` path, and optional type
    /// arguments after an `import` type.
    fn skip_import_type(&mut self) -> ParseResult<()> {
        self.expect(&TokenKind::LParen)?;
        while !self.check(&TokenKind::RParen) && !self.check(&TokenKind::Eof) {
            self.advance();
        }
        self.expect(&TokenKind::RParen)?;
        while self.matches(&TokenKind::Dot) {
            self.expect_ident()?;
        }
        if self.check(&TokenKind::LAngle) {
            let mut depth = 0usize;
            loop {
                match self.peek() {
                    TokenKind::LAngle => depth += 1,
                    TokenKind::RAngle => {
                        depth -= 1;
                        if depth == 0 {
                            self.advance();
                            break;
                        }
                    }
                    TokenKind::Eof => break,
                    _ => {}
                }
                self.advance();
            }
        }
        Ok(())
    }

    fn parse_paren_or_function_type(&mut self) -> ParseResult<TypeExpr> {
        let start_pos = self.pos;
        self.expect(&TokenKind::LParen)?;

        // `() => R`
        if self.check(&TokenKind::RParen) {
            self.advance();
            self.expect(&TokenKind::Arrow)?;
            let ret = self.parse_type()?;
            return Ok(TypeExpr::Function(Box::new(FunctionShape {
                type_params: Vec::new(),
                params: Vec::new(),
                ret,
            })));
        }

        // A parameter list starts with `...`, `this`, or `name:`/`name?`
        let is_function = match self.peek() {
            TokenKind::DotDotDot | TokenKind::This => true,
            TokenKind::Ident(_) => {
                matches!(self.peek_nth(1), TokenKind::Colon | TokenKind::Question)
            }
            _ => false,
        };

        if is_function {
            self.pos = start_pos;
            let params = self.parse_params()?;
            self.expect(&TokenKind::Arrow)?;
            let ret = self.parse_type()?;
            return Ok(TypeExpr::Function(Box::new(FunctionShape {
                type_params: Vec::new(),
                params,
                ret,
            })));
        }

        let inner = self.parse_type()?;
        self.expect(&TokenKind::RParen)?;

        // `(T) => R` — single unnamed parameter
        if self.matches(&TokenKind::Arrow) {
            let ret = self.parse_type()?;
            return Ok(TypeExpr::Function(Box::new(FunctionShape {
                type_params: Vec::new(),
                params: vec![Param {
                    name: "_".to_string(),
                    ty: Some(inner),
                    optional: false,
                    rest: false,
                }],
                ret,
            })));
        }

        Ok(TypeExpr::Paren(Box::new(inner)))
    }

    fn parse_object_type(&mut self) -> ParseResult<TypeExpr> {
        self.expect(&TokenKind::LBrace)?;

        if self.at_mapped_type() {
            return self.parse_mapped_type();
        }

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            if let Some(member) = self.parse_member()? {
                members.push(member);
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(TypeExpr::Literal(members))
    }

    /// After the opening brace: `[K in ...` possibly preceded by a
    /// readonly modifier marks a mapped type.
    fn at_mapped_type(&self) -> bool {
        let mut n = 0;
        if matches!(self.peek(), TokenKind::Plus | TokenKind::Minus) {
            n += 1;
        }
        if matches!(self.peek_nth(n), TokenKind::Readonly) {
            n += 1;
        }
        matches!(self.peek_nth(n), TokenKind::LBracket)
            && matches!(self.peek_nth(n + 1), TokenKind::Ident(_))
            && matches!(self.peek_nth(n + 2), TokenKind::In)
    }

    fn parse_mapped_type(&mut self) -> ParseResult<TypeExpr> {
        let readonly = if self.matches(&TokenKind::Readonly) {
            true
        } else if self.matches(&TokenKind::Plus) {
            self.expect(&TokenKind::Readonly)?;
            true
        } else if self.matches(&TokenKind::Minus) {
            self.expect(&TokenKind::Readonly)?;
            false
        } else {
            false
        };

        self.expect(&TokenKind::LBracket)?;
        let key = self.expect_ident()?;
        self.expect(&TokenKind::In)?;
        let constraint = self.parse_type()?;
        // `[K in C as R]` remapping — the remapped key is not modeled
        if self.matches(&TokenKind::As) {
            let _ = self.parse_type()?;
        }
        self.expect(&TokenKind::RBracket)?;

        let optional = if self.matches(&TokenKind::Question) {
            true
        } else if self.matches(&TokenKind::Plus) {
            self.expect(&TokenKind::Question)?;
            true
        } else if self.matches(&TokenKind::Minus) {
            self.expect(&TokenKind::Question)?;
            false
        } else {
            false
        };

        self.expect(&TokenKind::Colon)?;
        let value = self.parse_type()?;
        self.matches(&TokenKind::Semicolon);
        self.expect(&TokenKind::RBrace)?;

        Ok(TypeExpr::Mapped {
            key,
            constraint: Box::new(constraint),
            value: Box::new(value),
            optional,
            readonly,
        })
    }

    fn parse_tuple_type(&mut self) -> ParseResult<TypeExpr> {
        self.expect(&TokenKind::LBracket)?;

        let mut slots = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.check(&TokenKind::Eof) {
            let rest = self.matches(&TokenKind::DotDotDot);

            // Named slot: `name: T` or `name?: T`
            let (name, optional, ty) = if let TokenKind::Ident(_) = self.peek() {
                if matches!(self.peek_nth(1), TokenKind::Colon | TokenKind::Question) {
                    let n = self.expect_ident()?;
                    let opt = self.matches(&TokenKind::Question);
                    self.expect(&TokenKind::Colon)?;
                    (Some(n), opt, self.parse_type()?)
                } else {
                    (None, false, self.parse_type()?)
                }
            } else {
                (None, false, self.parse_type()?)
            };

            slots.push(TupleSlot {
                ty,
                name,
                optional,
                rest,
            });

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBracket)?;
        Ok(TypeExpr::Tuple(slots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_variable() {
        let src = "declare var Foo: FooConstructor;";
        let frag = parse(src).unwrap();

        assert_eq!(frag.decls.len(), 1);
        if let Decl::Var(v) = &frag.decls[0] {
            assert_eq!(v.name, "Foo");
            assert_eq!(v.ty.simple_name(), Some("FooConstructor"));
        } else {
            panic!("expected variable");
        }
    }

    #[test]
    fn parse_constructor_interface() {
        let src = r#"
            interface FooConstructor {
                new (): Foo;
                readonly prototype: Foo;
                parse(text: string): Foo;
            }
        "#;
        let frag = parse(src).unwrap();

        if let Decl::Interface(i) = &frag.decls[0] {
            assert_eq!(i.name, "FooConstructor");
            assert_eq!(i.members.len(), 3);
            assert!(matches!(i.members[0], Member::Construct(_)));
            assert!(matches!(i.members[1], Member::Property(_)));
            assert!(matches!(i.members[2], Member::Method(_)));
        } else {
            panic!("expected interface");
        }
    }

    #[test]
    fn parse_computed_member_name() {
        let src = "interface Arr { [Symbol.iterator](): Iter; [index: number]: string; }";
        let frag = parse(src).unwrap();

        if let Decl::Interface(i) = &frag.decls[0] {
            if let Member::Method(m) = &i.members[0] {
                assert_eq!(m.name, MemberName::Computed("[Symbol.iterator]".to_string()));
            } else {
                panic!("expected method");
            }
            assert!(matches!(i.members[1], Member::Index(_)));
        } else {
            panic!("expected interface");
        }
    }

    #[test]
    fn parse_class_with_static_members() {
        let src = r#"
            declare class Point {
                constructor(x: number, y: number);
                static origin(): Point;
                x: number;
            }
        "#;
        let frag = parse(src).unwrap();

        if let Decl::Class(c) = &frag.decls[0] {
            assert!(matches!(c.members[0], Member::Construct(_)));
            if let Member::Method(m) = &c.members[1] {
                assert_eq!(m.is_static, Some(true));
            } else {
                panic!("expected method");
            }
            if let Member::Property(p) = &c.members[2] {
                assert_eq!(p.is_static, None);
            } else {
                panic!("expected property");
            }
        } else {
            panic!("expected class");
        }
    }

    #[test]
    fn parse_conditional_type() {
        let src = "type T = A extends B ? C : D;";
        let frag = parse(src).unwrap();

        if let Decl::TypeAlias(a) = &frag.decls[0] {
            assert!(matches!(a.ty, TypeExpr::Conditional { .. }));
        } else {
            panic!("expected alias");
        }
    }

    #[test]
    fn parse_mapped_type_with_modifiers() {
        let src = "type Partial2<T> = { [K in keyof T]?: T[K] };";
        let frag = parse(src).unwrap();

        if let Decl::TypeAlias(a) = &frag.decls[0] {
            if let TypeExpr::Mapped { key, optional, .. } = &a.ty {
                assert_eq!(key, "K");
                assert!(optional);
            } else {
                panic!("expected mapped type, got {:?}", a.ty);
            }
        } else {
            panic!("expected alias");
        }
    }

    #[test]
    fn parse_predicate_return() {
        let src = "declare function isArr(x: unknown): x is unknown[];";
        let frag = parse(src).unwrap();

        if let Decl::Function(f) = &frag.decls[0] {
            assert!(matches!(f.ret, Some(TypeExpr::Predicate { .. })));
        } else {
            panic!("expected function");
        }
    }

    #[test]
    fn parse_constructor_type() {
        let src = "type C = new (x: string) => Widget;";
        let frag = parse(src).unwrap();

        if let Decl::TypeAlias(a) = &frag.decls[0] {
            assert!(matches!(a.ty, TypeExpr::Constructor(_)));
        } else {
            panic!("expected alias");
        }
    }

    #[test]
    fn parse_union_keeps_declaration_order() {
        let src = "type U = \"b\" | \"a\" | number;";
        let frag = parse(src).unwrap();

        if let Decl::TypeAlias(a) = &frag.decls[0] {
            if let TypeExpr::Union(arms) = &a.ty {
                assert_eq!(arms[0], TypeExpr::StringLit("b".to_string()));
                assert_eq!(arms[1], TypeExpr::StringLit("a".to_string()));
            } else {
                panic!("expected union");
            }
        } else {
            panic!("expected alias");
        }
    }

    #[test]
    fn parse_import_type_degrades_to_unknown() {
        let src = "type X = import(\"other\").Thing;";
        let frag = parse(src).unwrap();

        if let Decl::TypeAlias(a) = &frag.decls[0] {
            assert_eq!(a.ty, TypeExpr::Unknown("import".to_string()));
        } else {
            panic!("expected alias");
        }
    }

    #[test]
    fn parse_ambient_module_is_tagged() {
        let src = "declare module \"pkg\" { interface Hidden {} }";
        let frag = parse(src).unwrap();

        if let Decl::Namespace(ns) = &frag.decls[0] {
            assert!(ns.ambient);
            assert_eq!(ns.name, "pkg");
        } else {
            panic!("expected namespace");
        }
    }

    #[test]
    fn parse_namespace_keeps_nested_decls() {
        let src = r#"
            declare namespace Intl {
                var version: string;
                interface Collator { compare(a: string, b: string): number; }
                function getCanonicalLocales(locales: string[]): string[];
            }
        "#;
        let frag = parse(src).unwrap();

        if let Decl::Namespace(ns) = &frag.decls[0] {
            assert_eq!(ns.name, "Intl");
            assert_eq!(ns.decls.len(), 3);
        } else {
            panic!("expected namespace");
        }
    }

    #[test]
    fn parse_template_literal_type() {
        let src = "type E = `on${string}`;";
        let frag = parse(src).unwrap();

        if let Decl::TypeAlias(a) = &frag.decls[0] {
            if let TypeExpr::Template(parts) = &a.ty {
                assert_eq!(parts[0], TemplatePart::Str("on".to_string()));
                assert_eq!(parts[1], TemplatePart::Ty(TypeExpr::Token(TypeToken::String)));
            } else {
                panic!("expected template");
            }
        } else {
            panic!("expected alias");
        }
    }
}
