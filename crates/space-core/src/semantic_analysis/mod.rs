// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis.
//!
//! The analyzer walks the AST top-down from a synthetic MAIN scope. Every
//! declaration-shaped statement creates a [`SemanticEntry`]; statements
//! that introduce a nested scope (functions, classes, constructors, enums
//! and control-flow blocks) allocate a child table in the [`ScopeArena`],
//! populate its parameters and recurse into the body.
//!
//! Analysis accumulates its diagnostics instead of aborting: the produced
//! sequence is deterministic, so running the analyzer twice over the same
//! AST yields the same reports.
//!
//! # Example
//!
//! ```
//! use space_core::parse::parse;
//! use space_core::semantic_analysis::analyse;
//! use space_core::source_analysis::{lex, SourceBuffer};
//!
//! let buffer = SourceBuffer::new("main.spc", "var x:int = 3 + 4 * 5;");
//! let module = parse(lex(&buffer).unwrap()).unwrap();
//! let analysis = analyse(&module);
//! assert!(analysis.diagnostics.is_empty());
//! ```

use ecow::EcoString;

use crate::ast::{
    CatchStatement, CheckStatement, ClassDecl, ConstructorDecl, DoStatement, EnumDecl, Expression,
    ForStatement, FunctionDecl, Identifier, IfStatement, Module, Statement, TryStatement, VarDecl,
    VarDeclKind, WhileStatement,
};
use crate::diagnostics::Diagnostic;
use crate::source_analysis::Span;

mod error;
pub mod scope;
mod type_checker;
pub mod types;

pub use scope::{EntryKind, ScopeArena, ScopeId, ScopeKind, SemanticEntry, Visibility};
pub use types::{BaseType, VarDec};

/// One access through an `include`d symbol, queued for the linker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalAccess {
    /// The external symbol name.
    pub name: EcoString,
    /// The access site.
    pub span: Span,
}

/// Everything semantic analysis produces.
#[derive(Debug)]
pub struct AnalysisResult {
    /// Accumulated diagnostics, in source order of discovery.
    pub diagnostics: Vec<Diagnostic>,
    /// The `include` paths of the module, in source order.
    pub includes: Vec<Identifier>,
    /// The `export` names of the module, in source order.
    pub exports: Vec<Identifier>,
    /// Ordered accesses through external symbols.
    pub external_accesses: Vec<ExternalAccess>,
    /// The scope tree.
    pub scopes: ScopeArena,
    /// The MAIN scope.
    pub root: ScopeId,
}

/// Analyzes a module.
#[must_use]
pub fn analyse(module: &Module) -> AnalysisResult {
    let mut analyser = Analyser::new();
    let root = analyser
        .scopes
        .alloc(ScopeKind::Main, "main", None, module.span);
    analyser.analyse_runnable(root, &module.statements);

    AnalysisResult {
        diagnostics: analyser.diagnostics,
        includes: analyser.includes,
        exports: analyser.exports,
        external_accesses: analyser.externals,
        scopes: analyser.scopes,
        root,
    }
}

/// The analyzer state threaded through the walk.
pub(crate) struct Analyser {
    pub(crate) scopes: ScopeArena,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) includes: Vec<Identifier>,
    pub(crate) exports: Vec<Identifier>,
    pub(crate) externals: Vec<ExternalAccess>,
}

impl Analyser {
    fn new() -> Self {
        Self {
            scopes: ScopeArena::new(),
            diagnostics: Vec::new(),
            includes: Vec::new(),
            exports: Vec::new(),
            externals: Vec::new(),
        }
    }

    /// Records a failed check and continues the walk.
    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Walks the statements of one runnable within `scope`.
    fn analyse_runnable(&mut self, scope: ScopeId, statements: &[Statement]) {
        for index in 0..statements.len() {
            self.analyse_statement(scope, statements, index);
        }
    }

    /// Dispatches one statement; sibling context is needed for the
    /// adjacency rules of `catch`, `else` and `else if`.
    fn analyse_statement(&mut self, scope: ScopeId, statements: &[Statement], index: usize) {
        match &statements[index] {
            Statement::Var(decl) => self.add_var(scope, decl),
            Statement::Function(decl) => self.add_function(scope, decl),
            Statement::Class(decl) => self.add_class(scope, decl),
            Statement::Constructor(decl) => self.add_constructor(scope, decl),
            Statement::Enum(decl) => self.add_enum(scope, decl),
            Statement::Include(path) => self.add_include(scope, path),
            Statement::Export(path) => self.add_export(scope, path),
            Statement::Try(stmt) => self.add_try(scope, stmt, statements, index),
            Statement::Catch(stmt) => self.add_catch(scope, stmt, statements, index),
            Statement::While(stmt) => self.add_while(scope, stmt),
            Statement::Do(stmt) => self.add_do(scope, stmt),
            Statement::For(stmt) => self.add_for(scope, stmt),
            Statement::If(stmt) => self.add_if(scope, stmt),
            Statement::ElseIf(stmt) => self.add_else_if(scope, stmt, statements, index),
            Statement::Else(body, span) => {
                self.add_else(scope, &body.statements, *span, statements, index);
            }
            Statement::Check(stmt) => self.add_check(scope, stmt),
            Statement::Is(_) => {
                // Arms are handled by `add_check`; the parser rejects
                // stray arms before analysis sees them.
            }
            Statement::Return(value, span) => self.check_return(scope, value.as_ref(), *span),
            Statement::Break(span) => self.check_break_or_continue(scope, "Breaks", *span),
            Statement::Continue(span) => self.check_break_or_continue(scope, "Continues", *span),
            Statement::Assignment(assignment) => {
                let target = match self.evaluate_access(&assignment.target, scope) {
                    Ok(dec) => dec,
                    Err(diagnostic) => {
                        self.report(diagnostic);
                        return;
                    }
                };
                if let Err(diagnostic) = self.check_term(&target, &assignment.value, scope) {
                    self.report(diagnostic);
                }
            }
            Statement::Expression(expr, _) => {
                if let Err(diagnostic) = self.check_term(&VarDec::custom(), expr, scope) {
                    self.report(diagnostic);
                }
            }
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Adds a variable declaration to the current table.
    fn add_var(&mut self, scope: ScopeId, decl: &VarDecl) {
        if decl.modifier.is_explicit() && self.scopes.get(scope).kind == ScopeKind::Main {
            self.report(error::modifier_outside_class(decl.span));
        }

        // Variables declared directly in a try block are checked against
        // the enclosing scope.
        let check_scope = if self.scopes.get(scope).kind == ScopeKind::Try {
            self.scopes.get(scope).parent.unwrap_or(scope)
        } else {
            scope
        };

        if self.scopes.is_defined(check_scope, &decl.name.name) {
            self.report(error::already_defined(&decl.name.name, decl.name.span));
            return;
        }

        if decl.kind == VarDeclKind::Instance {
            self.add_instance_var(scope, decl);
            return;
        }

        let dec = decl.type_name.as_ref().map_or_else(
            || {
                let mut custom = VarDec::custom();
                custom.constant = decl.constant;
                custom
            },
            |type_name| VarDec::from_type_name(type_name, decl.constant),
        );

        if let Some(initializer) = &decl.initializer {
            if let Err(diagnostic) = self.check_assignment(&dec, initializer, check_scope) {
                self.report(diagnostic);
                return;
            }
        }

        self.scopes.define(
            scope,
            SemanticEntry {
                name: decl.name.name.clone(),
                dec,
                visibility: decl.modifier.into(),
                kind: EntryKind::Variable,
                reference: None,
                span: decl.name.span,
            },
        );
    }

    /// Adds a class-instance variable (`var a = new A(…)`), verifying the
    /// class exists and one of its constructors accepts the arguments.
    fn add_instance_var(&mut self, scope: ScopeId, decl: &VarDecl) {
        let Some(Expression::New { target, span }) = &decl.initializer else {
            return;
        };

        let dec = match self.check_instance_creation(target, *span, scope) {
            Ok(dec) => dec,
            Err(diagnostic) => {
                self.report(diagnostic);
                return;
            }
        };

        self.scopes.define(
            scope,
            SemanticEntry {
                name: decl.name.name.clone(),
                dec,
                visibility: decl.modifier.into(),
                kind: EntryKind::Variable,
                reference: None,
                span: decl.name.span,
            },
        );
    }

    /// Adds a function declaration and recurses into its body.
    fn add_function(&mut self, scope: ScopeId, decl: &FunctionDecl) {
        let kind = self.scopes.get(scope).kind;
        if kind != ScopeKind::Main && kind != ScopeKind::Class {
            self.report(error::misplacement(
                "Functions are only allowed in classes and the outest scope.",
                decl.span,
            ));
            return;
        }
        if decl.modifier.is_explicit() && kind == ScopeKind::Main {
            self.report(error::modifier_outside_class(decl.span));
        }
        if self.scopes.is_defined(scope, &decl.name.name) {
            self.report(error::already_defined(&decl.name.name, decl.name.span));
            return;
        }

        let return_dec = decl
            .return_type
            .as_ref()
            .map_or_else(VarDec::custom, |t| VarDec::from_type_name(t, false));

        let function_scope =
            self.scopes
                .alloc(ScopeKind::Function, decl.name.name.clone(), Some(scope), decl.span);
        for parameter in &decl.parameters {
            let dec = parameter
                .type_name
                .as_ref()
                .map_or_else(VarDec::custom, |t| VarDec::from_type_name(t, false));
            self.scopes.add_param(
                function_scope,
                SemanticEntry {
                    name: parameter.name.name.clone(),
                    dec,
                    visibility: Visibility::PGlobal,
                    kind: EntryKind::Variable,
                    reference: None,
                    span: parameter.name.span,
                },
            );
        }

        self.scopes.define(
            scope,
            SemanticEntry {
                name: decl.name.name.clone(),
                dec: return_dec,
                visibility: decl.modifier.into(),
                kind: EntryKind::Function,
                reference: Some(function_scope),
                span: decl.name.span,
            },
        );

        self.analyse_runnable(function_scope, &decl.body.statements);
    }

    /// Adds a class declaration and recurses into its body.
    fn add_class(&mut self, scope: ScopeId, decl: &ClassDecl) {
        if self.scopes.get(scope).kind != ScopeKind::Main {
            self.report(error::misplacement(
                "Classes have to be in the outest scope.",
                decl.span,
            ));
            return;
        }
        if self.scopes.is_defined(scope, &decl.name.name) {
            self.report(error::already_defined(&decl.name.name, decl.name.span));
            return;
        }

        let class_scope =
            self.scopes
                .alloc(ScopeKind::Class, decl.name.name.clone(), Some(scope), decl.span);

        for parameter in &decl.parameters {
            let dec = parameter
                .type_name
                .as_ref()
                .map_or_else(VarDec::custom, |t| VarDec::from_type_name(t, false));
            self.scopes.add_param(
                class_scope,
                SemanticEntry {
                    name: parameter.name.name.clone(),
                    dec,
                    visibility: Visibility::PGlobal,
                    kind: EntryKind::Variable,
                    reference: None,
                    span: parameter.name.span,
                },
            );
        }
        for bound in decl.superclass.iter().chain(&decl.interfaces) {
            self.scopes.add_param(
                class_scope,
                SemanticEntry {
                    name: bound.name.clone(),
                    dec: VarDec::new(BaseType::ExtClassOrInterface),
                    visibility: Visibility::PGlobal,
                    kind: EntryKind::Interface,
                    reference: None,
                    span: bound.span,
                },
            );
        }

        self.scopes.define(
            scope,
            SemanticEntry {
                name: decl.name.name.clone(),
                dec: VarDec::class_ref(decl.name.name.clone(), 0),
                visibility: decl.modifier.into(),
                kind: EntryKind::Class,
                reference: Some(class_scope),
                span: decl.name.span,
            },
        );

        self.analyse_runnable(class_scope, &decl.body.statements);
    }

    /// Adds a constructor to the class parameter list, rejecting overloads
    /// whose parameter type list strictly equals an existing one.
    fn add_constructor(&mut self, scope: ScopeId, decl: &ConstructorDecl) {
        if self.scopes.get(scope).kind != ScopeKind::Class {
            self.report(error::misplacement(
                "Constructors are only allowed in classes.",
                decl.span,
            ));
            return;
        }

        let signature: Vec<VarDec> = decl
            .parameters
            .iter()
            .map(|parameter| {
                parameter
                    .type_name
                    .as_ref()
                    .map_or_else(VarDec::custom, |t| VarDec::from_type_name(t, false))
            })
            .collect();

        if self.constructor_with_signature(scope, &signature).is_some() {
            self.report(error::already_defined("constructor", decl.span));
            return;
        }

        let constructor_scope =
            self.scopes
                .alloc(ScopeKind::Constructor, "constructor", Some(scope), decl.span);
        for (parameter, dec) in decl.parameters.iter().zip(&signature) {
            self.scopes.add_param(
                constructor_scope,
                SemanticEntry {
                    name: parameter.name.name.clone(),
                    dec: dec.clone(),
                    visibility: Visibility::PGlobal,
                    kind: EntryKind::Variable,
                    reference: None,
                    span: parameter.name.span,
                },
            );
        }

        self.scopes.add_param(
            scope,
            SemanticEntry {
                name: "constructor".into(),
                dec: VarDec::new(BaseType::ConstructorParam),
                visibility: Visibility::Global,
                kind: EntryKind::Constructor,
                reference: Some(constructor_scope),
                span: decl.span,
            },
        );

        self.analyse_runnable(constructor_scope, &decl.body.statements);
    }

    /// Finds a declared constructor whose parameter types strictly equal
    /// the given signature.
    fn constructor_with_signature(&self, class: ScopeId, signature: &[VarDec]) -> Option<ScopeId> {
        for entry in self.scopes.constructors(class) {
            let Some(constructor_scope) = entry.reference else {
                continue;
            };
            let params = &self.scopes.get(constructor_scope).params;
            if params.len() != signature.len() {
                continue;
            }
            let equal = params
                .iter()
                .zip(signature)
                .all(|(param, dec)| param.dec.strict_matches(dec));
            if equal {
                return Some(constructor_scope);
            }
        }
        None
    }

    /// Adds an enum and its enumerators.
    fn add_enum(&mut self, scope: ScopeId, decl: &EnumDecl) {
        if self.scopes.get(scope).kind != ScopeKind::Main {
            self.report(error::misplacement(
                "Enums have to be in the outest scope.",
                decl.span,
            ));
            return;
        }
        if self.scopes.is_defined(scope, &decl.name.name) {
            self.report(error::already_defined(&decl.name.name, decl.name.span));
            return;
        }

        let enum_scope =
            self.scopes
                .alloc(ScopeKind::Enum, decl.name.name.clone(), Some(scope), decl.span);
        for enumerator in &decl.enumerators {
            if self
                .scopes
                .lookup_local(enum_scope, &enumerator.name.name)
                .is_some()
            {
                self.report(error::already_defined(
                    &enumerator.name.name,
                    enumerator.name.span,
                ));
                continue;
            }
            self.scopes.define(
                enum_scope,
                SemanticEntry {
                    name: enumerator.name.name.clone(),
                    dec: VarDec::new(BaseType::Integer),
                    visibility: Visibility::PGlobal,
                    kind: EntryKind::Enumerator,
                    reference: None,
                    span: enumerator.name.span,
                },
            );
        }

        self.scopes.define(
            scope,
            SemanticEntry {
                name: decl.name.name.clone(),
                dec: VarDec::null(),
                visibility: Visibility::PGlobal,
                kind: EntryKind::Enum,
                reference: Some(enum_scope),
                span: decl.name.span,
            },
        );
    }

    /// Adds an `include`: an EXTERNAL entry named by the included file's
    /// stem, plus a record on the include list.
    fn add_include(&mut self, scope: ScopeId, path: &Identifier) {
        if self.scopes.get(scope).kind != ScopeKind::Main {
            self.report(error::misplacement(
                "Includes have to be in the outest scope.",
                path.span,
            ));
            return;
        }

        let name = include_stem(&path.name);
        if self.scopes.is_defined(scope, &name) {
            self.report(error::already_defined(&name, path.span));
            return;
        }

        self.scopes.define(
            scope,
            SemanticEntry {
                name: name.clone(),
                dec: VarDec::null(),
                visibility: Visibility::PGlobal,
                kind: EntryKind::External,
                reference: None,
                span: path.span,
            },
        );
        self.includes.push(path.clone());
    }

    /// Records an `export`; exports bind nothing locally.
    fn add_export(&mut self, scope: ScopeId, path: &Identifier) {
        if self.scopes.get(scope).kind != ScopeKind::Main {
            self.report(error::misplacement(
                "Exports have to be in the outest scope.",
                path.span,
            ));
            return;
        }
        self.exports.push(path.clone());
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// A `try` must be immediately followed by its `catch`.
    fn add_try(&mut self, scope: ScopeId, stmt: &TryStatement, siblings: &[Statement], index: usize) {
        if !matches!(siblings.get(index + 1), Some(Statement::Catch(_))) {
            self.report(error::misplacement(
                "Try statements have to have a catch statement.",
                stmt.span,
            ));
        }

        let try_scope = self
            .scopes
            .alloc(ScopeKind::Try, "try", Some(scope), stmt.span);
        self.analyse_runnable(try_scope, &stmt.body.statements);
    }

    /// A `catch` must immediately follow its `try`; it binds the caught
    /// value as a typed constant parameter.
    fn add_catch(
        &mut self,
        scope: ScopeId,
        stmt: &CatchStatement,
        siblings: &[Statement],
        index: usize,
    ) {
        if index == 0 || !matches!(siblings.get(index - 1), Some(Statement::Try(_))) {
            self.report(error::misplacement(
                "Catch statements have to be placed after a try statement.",
                stmt.span,
            ));
            return;
        }

        let catch_scope = self
            .scopes
            .alloc(ScopeKind::Catch, "catch", Some(scope), stmt.span);
        self.scopes.add_param(
            catch_scope,
            SemanticEntry {
                name: stmt.name.name.clone(),
                dec: VarDec::class_ref(stmt.error_type.name.clone(), 0).into_constant(),
                visibility: Visibility::PGlobal,
                kind: EntryKind::Variable,
                reference: None,
                span: stmt.name.span,
            },
        );
        self.analyse_runnable(catch_scope, &stmt.body.statements);
    }

    fn add_while(&mut self, scope: ScopeId, stmt: &WhileStatement) {
        self.check_condition(&stmt.condition, scope);
        let while_scope = self
            .scopes
            .alloc(ScopeKind::While, "while", Some(scope), stmt.span);
        self.analyse_runnable(while_scope, &stmt.body.statements);
    }

    fn add_do(&mut self, scope: ScopeId, stmt: &DoStatement) {
        self.check_condition(&stmt.condition, scope);
        let do_scope = self.scopes.alloc(ScopeKind::Do, "do", Some(scope), stmt.span);
        self.analyse_runnable(do_scope, &stmt.body.statements);
    }

    /// The `for` scope owns the init declaration, condition, action and
    /// body.
    fn add_for(&mut self, scope: ScopeId, stmt: &ForStatement) {
        let for_scope = self.scopes.alloc(ScopeKind::For, "for", Some(scope), stmt.span);

        let init = std::slice::from_ref(&*stmt.init);
        self.analyse_statement(for_scope, init, 0);
        self.check_condition(&stmt.condition, for_scope);
        let action = std::slice::from_ref(&*stmt.action);
        self.analyse_statement(for_scope, action, 0);

        self.analyse_runnable(for_scope, &stmt.body.statements);
    }

    fn add_if(&mut self, scope: ScopeId, stmt: &IfStatement) {
        self.check_condition(&stmt.condition, scope);
        let if_scope = self.scopes.alloc(ScopeKind::If, "if", Some(scope), stmt.span);
        self.analyse_runnable(if_scope, &stmt.body.statements);
    }

    /// `else if` is valid only directly after `if` or `else if`.
    fn add_else_if(
        &mut self,
        scope: ScopeId,
        stmt: &IfStatement,
        siblings: &[Statement],
        index: usize,
    ) {
        let after_if = index > 0
            && matches!(
                siblings.get(index - 1),
                Some(Statement::If(_) | Statement::ElseIf(_))
            );
        if !after_if {
            self.report(error::misplacement(
                "Else-if statements are only allowed after an if and else-if statement.",
                stmt.span,
            ));
            return;
        }

        self.check_condition(&stmt.condition, scope);
        let else_if_scope = self
            .scopes
            .alloc(ScopeKind::ElseIf, "else_if", Some(scope), stmt.span);
        self.analyse_runnable(else_if_scope, &stmt.body.statements);
    }

    /// `else` is valid only directly after `if` or `else if`.
    fn add_else(
        &mut self,
        scope: ScopeId,
        body: &[Statement],
        span: Span,
        siblings: &[Statement],
        index: usize,
    ) {
        let after_if = index > 0
            && matches!(
                siblings.get(index - 1),
                Some(Statement::If(_) | Statement::ElseIf(_))
            );
        if !after_if {
            self.report(error::misplacement(
                "Else statements are only allowed after an if and else-if statement.",
                span,
            ));
            return;
        }

        let else_scope = self.scopes.alloc(ScopeKind::Else, "else", Some(scope), span);
        self.analyse_runnable(else_scope, body);
    }

    /// `check` evaluates its discriminator once; every `is` arm value must
    /// match it non-strictly, and each arm body gets an IS scope.
    fn add_check(&mut self, scope: ScopeId, stmt: &CheckStatement) {
        let discriminator = match self.check_term(&VarDec::custom(), &stmt.value, scope) {
            Ok(dec) => dec,
            Err(diagnostic) => {
                self.report(diagnostic);
                VarDec::custom()
            }
        };

        let check_scope = self
            .scopes
            .alloc(ScopeKind::Check, "check", Some(scope), stmt.span);

        for arm in &stmt.body.statements {
            let Statement::Is(arm) = arm else { continue };
            if let Err(diagnostic) = self.check_term(&discriminator, &arm.value, scope) {
                self.report(diagnostic);
            }
            let is_scope = self
                .scopes
                .alloc(ScopeKind::Is, "is", Some(check_scope), arm.span);
            self.analyse_runnable(is_scope, &arm.body.statements);
        }
    }

    /// `break`/`continue` must sit inside a loop (or `is` arm), bridged
    /// only through conditional and try scopes.
    fn check_break_or_continue(&mut self, scope: ScopeId, what: &str, span: Span) {
        let mut current = Some(scope);
        let mut met_loop = false;

        while let Some(id) = current {
            let kind = self.scopes.get(id).kind;
            if kind.is_loop() {
                met_loop = true;
                break;
            }
            if !kind.bridges_break() {
                break;
            }
            current = self.scopes.get(id).parent;
        }

        if !met_loop {
            self.report(error::misplacement(
                &format!("{what} are only allowed within a loop scope."),
                span,
            ));
        }
    }

    /// Type-checks a `return` against the enclosing function's declared
    /// return type.
    fn check_return(&mut self, scope: ScopeId, value: Option<&Expression>, span: Span) {
        let expected = self.enclosing_return_type(scope);

        match value {
            Some(expr) => {
                if let Err(diagnostic) = self.check_assignment(&expected, expr, scope) {
                    self.report(diagnostic);
                }
            }
            None => {
                let void_ok = matches!(
                    expected.base,
                    BaseType::Void | BaseType::Custom | BaseType::ExternalRet
                );
                if !void_ok {
                    self.report(error::type_mismatch(
                        &expected,
                        &VarDec::new(BaseType::Void),
                        span,
                    ));
                }
            }
        }
    }

    /// Resolves the declared return type of the function enclosing
    /// `scope`; constructors and MAIN return the unconstrained type.
    fn enclosing_return_type(&self, scope: ScopeId) -> VarDec {
        let function_scope = self.scopes.next_of_kind(scope, ScopeKind::Function);
        let table = self.scopes.get(function_scope);
        if table.kind != ScopeKind::Function {
            return VarDec::custom();
        }
        let name = table.name.clone();
        table
            .parent
            .and_then(|parent| self.scopes.lookup_local(parent, &name))
            .map_or_else(VarDec::custom, |entry| entry.dec.clone())
    }

    /// Evaluates a chained condition, reporting any failure.
    fn check_condition(&mut self, condition: &Expression, scope: ScopeId) {
        if let Err(diagnostic) = self.check_chained_condition(condition, scope) {
            self.report(diagnostic);
        }
    }
}

/// Reduces an include path to the symbol name it introduces:
/// `"../math.spc"` binds `math`.
fn include_stem(path: &str) -> EcoString {
    let name = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path);
    let name = name.strip_suffix(".spc").unwrap_or(name);
    EcoString::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Category;
    use crate::parse::parse;
    use crate::source_analysis::{SourceBuffer, lex};

    fn analyse_source(source: &str) -> AnalysisResult {
        let buffer = SourceBuffer::new("test.spc", source);
        let module = parse(lex(&buffer).unwrap()).unwrap();
        analyse(&module)
    }

    fn categories(result: &AnalysisResult) -> Vec<Category> {
        result.diagnostics.iter().map(Diagnostic::category).collect()
    }

    #[test]
    fn simple_declaration_enters_main_scope() {
        let result = analyse_source("var x:int = 3 + 4 * 5;");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let entry = result.scopes.lookup_local(result.root, "x").unwrap();
        assert_eq!(entry.dec.base, BaseType::Integer);
        assert_eq!(entry.kind, EntryKind::Variable);
    }

    #[test]
    fn class_with_function_and_instance_call() {
        let result = analyse_source(
            "class A { global function:int f(y:int) { return y; } }\n\
             var a = new A();\n\
             a->f(1);",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let a = result.scopes.lookup_local(result.root, "a").unwrap();
        assert_eq!(a.dec.base, BaseType::ClassRef);
        assert_eq!(a.dec.class_name.as_deref(), Some("A"));
    }

    #[test]
    fn private_function_rejected_from_outside() {
        let result = analyse_source(
            "class A { private function:int g() { return 0; } }\nA->g();",
        );
        assert_eq!(categories(&result), vec![Category::Modifier]);
    }

    #[test]
    fn duplicate_constructor_signatures_collide() {
        let result = analyse_source(
            "class B { this::constructor(p:int) { } this::constructor(p:int) { } }",
        );
        assert_eq!(categories(&result), vec![Category::AlreadyDefined]);
    }

    #[test]
    fn distinct_constructor_signatures_coexist() {
        let result = analyse_source(
            "class B { this::constructor(p:int) { } this::constructor(p:double) { } }",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn break_inside_loop_is_valid() {
        let result = analyse_source("var x = 0;\nwhile (x < 10) { break; }");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn break_at_main_is_misplaced() {
        let result = analyse_source("break;");
        assert_eq!(categories(&result), vec![Category::StatementMisplacement]);
    }

    #[test]
    fn break_bridges_through_if_inside_loop() {
        let result = analyse_source(
            "var x = 0;\nwhile (x < 10) { if (x == 5) { break; } }",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn if_else_chain_is_accepted() {
        let result = analyse_source(
            "var a = 0;\nvar b = 0;\nvar c = 0;\n\
             if (a == 1 and b == 2) { } else if (c == 3) { } else { }",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn orphan_else_is_misplaced() {
        let result = analyse_source("else { }");
        assert_eq!(categories(&result), vec![Category::StatementMisplacement]);
    }

    #[test]
    fn catch_requires_preceding_try() {
        let result = analyse_source("catch (Exception e) { }");
        assert_eq!(categories(&result), vec![Category::StatementMisplacement]);
    }

    #[test]
    fn try_requires_following_catch() {
        let result = analyse_source("try { }");
        assert_eq!(categories(&result), vec![Category::StatementMisplacement]);
    }

    #[test]
    fn try_catch_pair_is_valid() {
        let result = analyse_source("try { } catch (Exception e) { }");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn class_inside_class_is_misplaced() {
        let result = analyse_source("class A { class B { } }");
        assert_eq!(categories(&result), vec![Category::StatementMisplacement]);
    }

    #[test]
    fn constructor_outside_class_is_misplaced() {
        let result = analyse_source("this::constructor() { }");
        assert_eq!(categories(&result), vec![Category::StatementMisplacement]);
    }

    #[test]
    fn duplicate_names_collide_across_scope_chain() {
        let result = analyse_source("var x = 1;\nclass A { }\nvar x = 2;");
        assert_eq!(categories(&result), vec![Category::AlreadyDefined]);
    }

    #[test]
    fn enum_enumerators_resolve_as_integers() {
        let result = analyse_source(
            "enum Level { Low, High : 10 }\nvar l:int = Level.High;",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn include_binds_external_symbol() {
        let result = analyse_source("include \"../math.spc\";\nMath->sqrt(4);\nmath->sqrt(4);");
        // `Math` is undefined, `math` is the included stem.
        assert_eq!(categories(&result), vec![Category::NotDefined]);
        assert_eq!(result.includes.len(), 1);
        assert_eq!(result.external_accesses.len(), 1);
        assert_eq!(result.external_accesses[0].name, "math");
    }

    #[test]
    fn modifier_on_main_declaration_is_rejected() {
        let result = analyse_source("global var x = 1;");
        assert_eq!(categories(&result), vec![Category::Modifier]);
    }

    #[test]
    fn analysis_is_idempotent() {
        let buffer = SourceBuffer::new(
            "test.spc",
            "class A { private function:int g() { return 0; } }\nA->g();\nbreak;",
        );
        let module = parse(lex(&buffer).unwrap()).unwrap();
        let first = analyse(&module);
        let second = analyse(&module);
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn return_type_mismatch_is_reported() {
        let result = analyse_source(
            "function:int f() { return \"text\"; }",
        );
        assert_eq!(categories(&result), vec![Category::TypeMismatch]);
    }

    #[test]
    fn for_scope_owns_its_init_declaration() {
        let result = analyse_source(
            "var total = 0;\nfor (var i = 0; i < 10; i++) { total += i; }\nvar i = 1;",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn check_arm_values_match_discriminator() {
        let result = analyse_source(
            "var mode:int = 1;\ncheck (mode) { is 1: mode += 1; is \"two\": mode += 2; }",
        );
        assert_eq!(categories(&result), vec![Category::TypeMismatch]);
    }
}
