// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing: variables, functions, classes, constructors, enums
//! and include/export statements.

use crate::ast::{
    ClassDecl, ConstructorDecl, EnumDecl, Enumerator, Expression, FunctionDecl, Identifier,
    Modifier, Parameter, Statement, TypeName, VarDecl, VarDeclKind,
};
use crate::diagnostics::Diagnostic;
use crate::source_analysis::{Keyword, TokenKind};

use super::Parser;

impl Parser {
    /// Parses a statement that starts with a visibility modifier. Modifiers
    /// may prefix classes, functions and variable declarations only.
    pub(super) fn parse_modified_statement(&mut self) -> Result<Statement, Diagnostic> {
        let modifier = match self.current_kind() {
            TokenKind::Keyword(Keyword::Global) => Modifier::Global,
            TokenKind::Keyword(Keyword::Private) => Modifier::Private,
            TokenKind::Keyword(Keyword::Secure) => Modifier::Secure,
            _ => return Err(self.syntax_mismatch("a visibility modifier")),
        };
        self.advance();

        match self.current_kind() {
            TokenKind::Keyword(Keyword::Function) => self.parse_function_decl(modifier),
            TokenKind::Keyword(Keyword::Class) => self.parse_class_decl(modifier),
            TokenKind::Keyword(Keyword::Var | Keyword::Const) => self.parse_var_decl(modifier),
            _ => Err(self.syntax_mismatch("\"function\", \"class\", \"var\" or \"const\"")),
        }
    }

    /// Parses a `var`/`const` declaration. The declaration classifies
    /// itself into NORMAL, ARRAY, CONDITIONAL or INSTANCE based on its type
    /// suffix and initializer shape.
    pub(super) fn parse_var_decl(&mut self, modifier: Modifier) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        let constant = matches!(keyword.kind(), TokenKind::Keyword(Keyword::Const));

        let name = self.expect_identifier()?;
        let type_name = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type_name()?)
        } else {
            None
        };
        let initializer = if self.eat(&TokenKind::Assign) {
            Some(self.parse_initializer()?)
        } else {
            None
        };
        let semicolon = self.expect(&TokenKind::Semicolon)?;

        let kind = classify_var_decl(type_name.as_ref(), initializer.as_ref());
        Ok(Statement::Var(VarDecl {
            name,
            modifier,
            constant,
            kind,
            type_name,
            initializer,
            span: keyword.span().merge(semicolon.span()),
        }))
    }

    /// Parses a type annotation: a base name plus a trailing `[]…[]`
    /// dimension suffix.
    pub(super) fn parse_type_name(&mut self) -> Result<TypeName, Diagnostic> {
        let base = self.expect_identifier()?;
        let mut dimension = 0u32;
        let mut span = base.span;

        while matches!(self.current_kind(), TokenKind::LeftBracket) {
            self.advance();
            let close = self.expect(&TokenKind::RightBracket)?;
            span = span.merge(close.span());
            dimension += 1;
        }

        Ok(TypeName {
            base: base.name,
            dimension,
            span,
        })
    }

    /// Parses a function declaration:
    /// `function[:Type] name(param[:Type], …) { … }`.
    pub(super) fn parse_function_decl(
        &mut self,
        modifier: Modifier,
    ) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        let return_type = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type_name()?)
        } else {
            None
        };
        let name = self.expect_identifier()?;
        let parameters = self.parse_parameter_list()?;
        let body = self.parse_block()?;
        let span = keyword.span().merge(body.span);

        Ok(Statement::Function(FunctionDecl {
            name,
            modifier,
            return_type,
            parameters,
            body,
            span,
        }))
    }

    /// Parses a class declaration:
    /// `class Name[(params)] [extends Base] [with I1, I2, …] [=>] { … }`.
    pub(super) fn parse_class_decl(&mut self, modifier: Modifier) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        let name = self.expect_identifier()?;

        let parameters = if matches!(self.current_kind(), TokenKind::LeftParen) {
            self.parse_parameter_list()?
        } else {
            Vec::new()
        };

        let superclass = if self.eat(&TokenKind::Keyword(Keyword::Extends)) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let mut interfaces = Vec::new();
        if self.eat(&TokenKind::Keyword(Keyword::With)) {
            loop {
                interfaces.push(self.expect_identifier()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        // The class creator arrow is accepted and carries no meaning.
        self.eat(&TokenKind::FatArrow);

        let body = self.parse_block()?;
        let span = keyword.span().merge(body.span);

        Ok(Statement::Class(ClassDecl {
            name,
            modifier,
            parameters,
            superclass,
            interfaces,
            body,
            span,
        }))
    }

    /// Parses a constructor declaration: `this::constructor(params) { … }`.
    pub(super) fn parse_constructor_decl(&mut self) -> Result<Statement, Diagnostic> {
        let this = self.expect(&TokenKind::Keyword(Keyword::This))?;
        self.expect(&TokenKind::Colon)?;
        self.expect(&TokenKind::Colon)?;

        let marker = self.expect_identifier()?;
        if marker.name != "constructor" {
            return Err(Diagnostic::new(
                crate::diagnostics::Category::SyntaxMismatch,
                format!("Expected \"constructor\", but got \"{}\".", marker.name),
                marker.span,
            ));
        }

        let parameters = self.parse_parameter_list()?;
        let body = self.parse_block()?;
        let span = this.span().merge(body.span);

        Ok(Statement::Constructor(ConstructorDecl {
            parameters,
            body,
            span,
        }))
    }

    /// Parses an enum declaration: `enum Name { A, B : 4, C }`.
    ///
    /// Unspecified enumerator values auto-increment from the last explicit
    /// value, starting at zero.
    pub(super) fn parse_enum_decl(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LeftBrace)?;

        let mut enumerators = Vec::new();
        let mut next_value = 0i64;

        if !matches!(self.current_kind(), TokenKind::RightBrace) {
            loop {
                let enumerator_name = self.expect_identifier()?;
                let explicit = self.eat(&TokenKind::Colon);
                if explicit {
                    let value_token = self.advance();
                    let TokenKind::Integer(text) = value_token.kind() else {
                        return Err(Diagnostic::new(
                            crate::diagnostics::Category::SyntaxMismatch,
                            format!(
                                "Expected an integer enumerator value, but got \"{}\".",
                                value_token.kind()
                            ),
                            value_token.span(),
                        ));
                    };
                    next_value = text.parse().unwrap_or(0);
                }
                enumerators.push(Enumerator {
                    name: enumerator_name,
                    value: next_value,
                    explicit,
                });
                next_value += 1;

                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let close = self.expect(&TokenKind::RightBrace)?;
        self.eat(&TokenKind::Semicolon);

        Ok(Statement::Enum(EnumDecl {
            name,
            enumerators,
            span: keyword.span().merge(close.span()),
        }))
    }

    /// Parses `include "path";`.
    pub(super) fn parse_include(&mut self) -> Result<Statement, Diagnostic> {
        let path = self.parse_quoted_path()?;
        Ok(Statement::Include(path))
    }

    /// Parses `export "name";`.
    pub(super) fn parse_export(&mut self) -> Result<Statement, Diagnostic> {
        let path = self.parse_quoted_path()?;
        Ok(Statement::Export(path))
    }

    /// Shared tail of include/export: a string literal plus semicolon.
    fn parse_quoted_path(&mut self) -> Result<Identifier, Diagnostic> {
        let keyword = self.advance();
        let token = self.advance();
        let TokenKind::Str(path) = token.kind() else {
            return Err(Diagnostic::new(
                crate::diagnostics::Category::SyntaxMismatch,
                format!("Expected a quoted path, but got \"{}\".", token.kind()),
                token.span(),
            ));
        };
        let path = path.clone();
        let semicolon = self.expect(&TokenKind::Semicolon)?;
        Ok(Identifier::new(path, keyword.span().merge(semicolon.span())))
    }

    /// Parses a parenthesized parameter list: `(name[:Type], …)`.
    pub(super) fn parse_parameter_list(&mut self) -> Result<Vec<Parameter>, Diagnostic> {
        self.expect(&TokenKind::LeftParen)?;
        let mut parameters = Vec::new();

        if !matches!(self.current_kind(), TokenKind::RightParen) {
            loop {
                let name = self.expect_identifier()?;
                let type_name = if self.eat(&TokenKind::Colon) {
                    Some(self.parse_type_name()?)
                } else {
                    None
                };
                parameters.push(Parameter { name, type_name });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(&TokenKind::RightParen)?;
        Ok(parameters)
    }
}

/// Decides the declaration shape from the type suffix and initializer.
fn classify_var_decl(
    type_name: Option<&TypeName>,
    initializer: Option<&Expression>,
) -> VarDeclKind {
    match initializer {
        Some(Expression::New { .. }) => VarDeclKind::Instance,
        Some(Expression::Conditional { .. }) => VarDeclKind::Conditional,
        Some(Expression::ArrayLiteral { .. }) => VarDeclKind::Array,
        _ if type_name.is_some_and(|t| t.dimension > 0) => VarDeclKind::Array,
        _ => VarDeclKind::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Module;
    use crate::diagnostics::Category;
    use crate::parse::parse;
    use crate::source_analysis::{SourceBuffer, lex};

    fn parse_source(source: &str) -> Module {
        let buffer = SourceBuffer::new("test.spc", source);
        parse(lex(&buffer).unwrap()).unwrap()
    }

    fn parse_error(source: &str) -> Diagnostic {
        let buffer = SourceBuffer::new("test.spc", source);
        parse(lex(&buffer).unwrap()).unwrap_err()
    }

    #[test]
    fn var_decl_with_type_and_initializer() {
        let module = parse_source("var x:int = 3;");
        let Statement::Var(decl) = &module.statements[0] else {
            panic!("expected var declaration");
        };
        assert_eq!(decl.name.name, "x");
        assert!(!decl.constant);
        assert_eq!(decl.kind, VarDeclKind::Normal);
        assert_eq!(decl.type_name.as_ref().unwrap().base, "int");
    }

    #[test]
    fn const_decl_sets_constant_flag() {
        let module = parse_source("const limit:int = 100;");
        let Statement::Var(decl) = &module.statements[0] else {
            panic!("expected declaration");
        };
        assert!(decl.constant);
    }

    #[test]
    fn var_decl_classification() {
        let cases = [
            ("var a = 1;", VarDeclKind::Normal),
            ("var b:int[] = {1, 2};", VarDeclKind::Array),
            ("var c:int[][];", VarDeclKind::Array),
            ("var d = x == 1 ? 2 : 3;", VarDeclKind::Conditional),
            ("var e = new Page();", VarDeclKind::Instance),
        ];
        for (source, expected) in cases {
            let module = parse_source(source);
            let Statement::Var(decl) = &module.statements[0] else {
                panic!("expected declaration for {source}");
            };
            assert_eq!(decl.kind, expected, "classification of {source}");
        }
    }

    #[test]
    fn array_type_counts_dimension_groups() {
        let module = parse_source("var grid:int[][] = {{1}, {2}};");
        let Statement::Var(decl) = &module.statements[0] else {
            panic!("expected declaration");
        };
        assert_eq!(decl.type_name.as_ref().unwrap().dimension, 2);
    }

    #[test]
    fn function_with_return_type_and_params() {
        let module = parse_source("global function:int add(a:int, b:int) { return a + b; }");
        let Statement::Function(decl) = &module.statements[0] else {
            panic!("expected function");
        };
        assert_eq!(decl.name.name, "add");
        assert_eq!(decl.modifier, Modifier::Global);
        assert_eq!(decl.return_type.as_ref().unwrap().base, "int");
        assert_eq!(decl.parameters.len(), 2);
        assert_eq!(decl.body.statements.len(), 1);
    }

    #[test]
    fn class_with_extends_and_interfaces() {
        let module = parse_source("class Book extends Media with Readable, Printable { }");
        let Statement::Class(decl) = &module.statements[0] else {
            panic!("expected class");
        };
        assert_eq!(decl.superclass.as_ref().unwrap().name, "Media");
        assert_eq!(decl.interfaces.len(), 2);
        assert_eq!(decl.interfaces[1].name, "Printable");
    }

    #[test]
    fn class_accepts_creator_arrow() {
        let module = parse_source("class Handle(resource) => { }");
        let Statement::Class(decl) = &module.statements[0] else {
            panic!("expected class");
        };
        assert_eq!(decl.parameters.len(), 1);
    }

    #[test]
    fn constructor_inside_class() {
        let module = parse_source("class A { this::constructor(p:int) { } }");
        let Statement::Class(decl) = &module.statements[0] else {
            panic!("expected class");
        };
        let Statement::Constructor(constructor) = &decl.body.statements[0] else {
            panic!("expected constructor");
        };
        assert_eq!(constructor.parameters.len(), 1);
        assert_eq!(
            constructor.parameters[0].type_name.as_ref().unwrap().base,
            "int"
        );
    }

    #[test]
    fn enum_values_auto_increment() {
        let module = parse_source("enum Level { Low, Mid : 10, High }");
        let Statement::Enum(decl) = &module.statements[0] else {
            panic!("expected enum");
        };
        let values: Vec<i64> = decl.enumerators.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![0, 10, 11]);
        assert!(!decl.enumerators[0].explicit);
        assert!(decl.enumerators[1].explicit);
    }

    #[test]
    fn include_and_export_take_quoted_paths() {
        let module = parse_source("include \"../math.spc\";\nexport \"math\";");
        assert!(matches!(
            &module.statements[0],
            Statement::Include(path) if path.name == "../math.spc"
        ));
        assert!(matches!(
            &module.statements[1],
            Statement::Export(path) if path.name == "math"
        ));
    }

    #[test]
    fn modifier_requires_declaration() {
        let err = parse_error("global return;");
        assert_eq!(err.category(), Category::SyntaxMismatch);
    }

    #[test]
    fn missing_semicolon_is_a_syntax_mismatch() {
        let err = parse_error("var x = 3");
        assert_eq!(err.category(), Category::SyntaxMismatch);
        assert!(err.message().contains("\";\""));
    }
}
