// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Expression type checking and name resolution.
//!
//! Every expression evaluates to a [`VarDec`]. Terms compare their leaves
//! against the expected type under non-strict equality; member/class
//! access chains resolve their leftmost element in the enclosing scope
//! chain and every further segment in the previously resolved entry's
//! child scope. Reaching an `include`d symbol turns the whole expression
//! into `EXTERNAL_RET` and queues the access for the linker.

use ecow::EcoString;

use crate::ast::{AccessChain, AccessOp, Argument, Expression, FunctionCall};
use crate::diagnostics::Diagnostic;
use crate::source_analysis::Span;

use super::error;
use super::scope::{EntryKind, ScopeId, ScopeKind, SemanticEntry, Visibility};
use super::types::{BaseType, VarDec};
use super::{Analyser, ExternalAccess};

impl Analyser {
    /// Evaluates the right-hand side of a declaration, assignment or
    /// return against the expected type.
    pub(crate) fn check_assignment(
        &mut self,
        expected: &VarDec,
        expr: &Expression,
        scope: ScopeId,
    ) -> Result<VarDec, Diagnostic> {
        self.check_term(expected, expr, scope)
    }

    /// Evaluates a term. Arithmetic nodes require both children to agree
    /// under non-strict equality, with `CUSTOM` propagating upward; every
    /// other node yields its own type and is compared against `expected`.
    pub(crate) fn check_term(
        &mut self,
        expected: &VarDec,
        expr: &Expression,
        scope: ScopeId,
    ) -> Result<VarDec, Diagnostic> {
        let predicted = match expr {
            Expression::Integer(..) => VarDec::new(BaseType::Integer),
            // Floating literals carry double precision.
            Expression::Float(..) => VarDec::new(BaseType::Double),
            Expression::Str(..) => VarDec::new(BaseType::Str),
            Expression::CharArray(text, _) => {
                if text.chars().count() > 1 {
                    VarDec::new(BaseType::Str)
                } else {
                    VarDec::new(BaseType::Char)
                }
            }
            Expression::Bool(..) => VarDec::new(BaseType::Boolean),
            Expression::Null(_) => VarDec::null(),

            Expression::Binary {
                left, right, span, ..
            } => {
                let left_dec = self.check_term(expected, left, scope)?;
                let right_dec = self.check_term(expected, right, scope)?;
                if !left_dec.non_strict_matches(&right_dec) {
                    return Err(error::type_mismatch(&left_dec, &right_dec, *span));
                }
                let result = if left_dec.base == BaseType::Custom {
                    right_dec
                } else {
                    left_dec
                };
                return Ok(result);
            }

            Expression::Comparison { .. } | Expression::Logical { .. } => {
                self.check_chained_condition(expr, scope)?
            }

            Expression::Conditional {
                condition,
                if_true,
                if_false,
                ..
            } => {
                self.check_chained_condition(condition, scope)?;
                let true_dec = self.check_term(expected, if_true, scope)?;
                self.check_term(expected, if_false, scope)?;
                return Ok(true_dec);
            }

            Expression::ArrayLiteral { elements, .. } => {
                let element_expected = if expected.dimension > 0 {
                    let mut inner = expected.clone();
                    inner.dimension -= 1;
                    inner
                } else {
                    VarDec::custom()
                };
                for element in elements {
                    self.check_term(&element_expected, element, scope)?;
                }
                return Ok(expected.clone());
            }

            Expression::Identifier(_)
            | Expression::Call(_)
            | Expression::Access(_)
            | Expression::ArrayAccess { .. }
            | Expression::IncDec { .. }
            | Expression::This(_)
            | Expression::New { .. } => self.evaluate_access(expr, scope)?,
        };

        if expected.non_strict_matches(&predicted) {
            Ok(predicted)
        } else {
            Err(error::type_mismatch(expected, &predicted, expr.span()))
        }
    }

    /// Evaluates a chained condition: `and`/`or` nodes recurse, comparison
    /// nodes evaluate both sides, and a lone boolean literal counts as a
    /// full condition.
    pub(crate) fn check_chained_condition(
        &mut self,
        condition: &Expression,
        scope: ScopeId,
    ) -> Result<VarDec, Diagnostic> {
        match condition {
            Expression::Logical { left, right, .. } => {
                self.check_chained_condition(left, scope)?;
                self.check_chained_condition(right, scope)?;
            }
            Expression::Comparison { left, right, .. } => {
                self.check_term(&VarDec::custom(), left, scope)?;
                self.check_term(&VarDec::custom(), right, scope)?;
            }
            Expression::Bool(..) => {}
            other => {
                self.check_term(&VarDec::custom(), other, scope)?;
            }
        }
        Ok(VarDec::new(BaseType::Boolean))
    }

    /// Resolves an identifier, call, access chain, array access or
    /// instance creation to its type.
    pub(crate) fn evaluate_access(
        &mut self,
        expr: &Expression,
        scope: ScopeId,
    ) -> Result<VarDec, Diagnostic> {
        match expr {
            Expression::Identifier(identifier) => {
                let (declaring, entry) = self.resolve_name(scope, &identifier.name, identifier.span)?;
                if entry.kind == EntryKind::External {
                    return Ok(self.external_reached(&entry.name, identifier.span));
                }
                self.check_hidden(&entry, declaring, scope, identifier.span)?;
                Ok(entry.dec)
            }

            Expression::This(span) => {
                let Some(class) = self.scopes.enclosing_class(scope) else {
                    return Err(error::misplacement(
                        "\"this\" is only allowed inside a class.",
                        *span,
                    ));
                };
                let name = self.scopes.get(class).name.clone();
                Ok(VarDec::class_ref(name, 0))
            }

            Expression::Call(call) => {
                let (declaring, entry) = self.resolve_name(scope, &call.name.name, call.name.span)?;
                if entry.kind == EntryKind::External {
                    return Ok(self.external_reached(&entry.name, call.name.span));
                }
                self.check_hidden(&entry, declaring, scope, call.name.span)?;
                self.evaluate_call(call, &entry, scope)
            }

            Expression::ArrayAccess {
                target,
                indices,
                span,
            } => {
                let dec = self.evaluate_access(target, scope)?;
                self.reduce_dimension(dec, indices, *span, scope)
            }

            Expression::IncDec { target, .. } => self.evaluate_access(target, scope),

            Expression::Access(chain) => self.evaluate_chain(chain, scope),

            Expression::New { target, span } => self.check_instance_creation(target, *span, scope),

            other => self.check_term(&VarDec::custom(), other, scope),
        }
    }

    /// Walks a member/class access chain down its spine.
    fn evaluate_chain(&mut self, chain: &AccessChain, scope: ScopeId) -> Result<VarDec, Diagnostic> {
        let (mut current_dec, head_entry) = self.evaluate_chain_head(&chain.head, scope)?;
        if current_dec.base == BaseType::ExternalRet {
            return Ok(current_dec);
        }
        let mut reachable = head_entry.and_then(|entry| self.entry_scope(&entry, scope));

        for link in &chain.links {
            let element_span = link.element.span();
            let Some(target_scope) = reachable else {
                return Err(error::not_defined(
                    &element_name(&link.element),
                    element_span,
                ));
            };

            self.check_accessor(link.op, target_scope, scope, element_span)?;

            let name = element_name(&link.element);
            let Some(entry) = self.scopes.lookup_local(target_scope, &name).cloned() else {
                return Err(error::not_defined(&name, element_span));
            };
            if entry.kind == EntryKind::External {
                return Ok(self.external_reached(&entry.name, element_span));
            }
            self.check_hidden(&entry, target_scope, scope, element_span)?;

            current_dec = self.evaluate_chain_element(&link.element, &entry, scope)?;
            reachable = self.entry_scope(&entry, scope);
        }

        Ok(current_dec)
    }

    /// Resolves the leftmost chain element in the enclosing scope chain.
    fn evaluate_chain_head(
        &mut self,
        head: &Expression,
        scope: ScopeId,
    ) -> Result<(VarDec, Option<SemanticEntry>), Diagnostic> {
        let (core, indices, span) = split_array_access(head);

        match core {
            Expression::This(span) => {
                let Some(class) = self.scopes.enclosing_class(scope) else {
                    return Err(error::misplacement(
                        "\"this\" is only allowed inside a class.",
                        *span,
                    ));
                };
                let name = self.scopes.get(class).name.clone();
                let entry = SemanticEntry {
                    name: name.clone(),
                    dec: VarDec::class_ref(name, 0),
                    visibility: Visibility::PGlobal,
                    kind: EntryKind::Class,
                    reference: Some(class),
                    span: *span,
                };
                Ok((entry.dec.clone(), Some(entry)))
            }
            Expression::Identifier(identifier) => {
                let (declaring, entry) = self.resolve_name(scope, &identifier.name, identifier.span)?;
                if entry.kind == EntryKind::External {
                    return Ok((self.external_reached(&entry.name, identifier.span), None));
                }
                self.check_hidden(&entry, declaring, scope, identifier.span)?;
                let dec = self.reduce_dimension(entry.dec.clone(), indices, span, scope)?;
                Ok((dec, Some(entry)))
            }
            Expression::Call(call) => {
                let (declaring, entry) = self.resolve_name(scope, &call.name.name, call.name.span)?;
                if entry.kind == EntryKind::External {
                    return Ok((self.external_reached(&entry.name, call.name.span), None));
                }
                self.check_hidden(&entry, declaring, scope, call.name.span)?;
                let dec = self.evaluate_call(call, &entry, scope)?;
                let dec = self.reduce_dimension(dec, indices, span, scope)?;
                Ok((dec, Some(entry)))
            }
            other => {
                let dec = self.check_term(&VarDec::custom(), other, scope)?;
                Ok((dec, None))
            }
        }
    }

    /// Evaluates one resolved (non-head) chain element.
    fn evaluate_chain_element(
        &mut self,
        element: &Expression,
        entry: &SemanticEntry,
        scope: ScopeId,
    ) -> Result<VarDec, Diagnostic> {
        let (core, indices, span) = split_array_access(element);
        let dec = match core {
            Expression::Call(call) => self.evaluate_call(call, entry, scope)?,
            _ => entry.dec.clone(),
        };
        self.reduce_dimension(dec, indices, span, scope)
    }

    /// Enforces the access operator rules: `->` reaches into class
    /// scopes, `.` reaches non-class members; enum accesses are exempt
    /// from the dot rule, and a class may dot into itself.
    fn check_accessor(
        &mut self,
        op: AccessOp,
        target_scope: ScopeId,
        origin: ScopeId,
        span: Span,
    ) -> Result<(), Diagnostic> {
        let target_kind = self.scopes.get(target_scope).kind;
        match op {
            AccessOp::Class => {
                if target_kind != ScopeKind::Class {
                    return Err(error::wrong_accessor(
                        "Used \"->\" for a non-class access instead of \".\".",
                        span,
                    ));
                }
            }
            AccessOp::Member => {
                let same_class = self.scopes.is_within(origin, target_scope);
                if target_kind == ScopeKind::Class && !same_class {
                    return Err(error::wrong_accessor(
                        "Used \".\" for a class access instead of \"->\".",
                        span,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Checks a call against the callee's parameter list: the entry must
    /// be callable, the arity must match, and each argument must match
    /// the parameter type non-strictly.
    fn evaluate_call(
        &mut self,
        call: &FunctionCall,
        entry: &SemanticEntry,
        scope: ScopeId,
    ) -> Result<VarDec, Diagnostic> {
        if entry.kind != EntryKind::Function {
            return Err(error::type_mismatch(
                &VarDec::new(BaseType::EFunctionCall),
                &VarDec::new(BaseType::ENonFunctionCall),
                call.span,
            ));
        }
        let Some(function_scope) = entry.reference else {
            return Err(error::not_defined(&entry.name, call.span));
        };

        let params: Vec<VarDec> = self
            .scopes
            .get(function_scope)
            .params
            .iter()
            .map(|param| param.dec.clone())
            .collect();

        if params.len() != call.arguments.len() {
            return Err(error::wrong_argument_count(call.span));
        }

        for (argument, param) in call.arguments.iter().zip(&params) {
            self.check_argument(argument, param, scope)?;
        }

        Ok(entry.dec.clone())
    }

    /// Checks one call argument; an explicit `: Type` annotation stands
    /// in for the evaluated type.
    fn check_argument(
        &mut self,
        argument: &Argument,
        param: &VarDec,
        scope: ScopeId,
    ) -> Result<(), Diagnostic> {
        if let Some(annotation) = &argument.type_name {
            let annotated = VarDec::from_type_name(annotation, false);
            if !param.non_strict_matches(&annotated) {
                return Err(error::type_mismatch(param, &annotated, argument.value.span()));
            }
            return Ok(());
        }
        self.check_term(param, &argument.value, scope)?;
        Ok(())
    }

    /// Verifies a `new ClassPath(args)` creation and yields the class
    /// reference type.
    pub(crate) fn check_instance_creation(
        &mut self,
        target: &Expression,
        span: Span,
        scope: ScopeId,
    ) -> Result<VarDec, Diagnostic> {
        let Some(call) = constructor_call(target) else {
            return Err(error::not_defined("constructor", span));
        };

        // If the path starts at an included symbol, the creation defers to
        // the linker.
        if let Expression::Access(chain) = target {
            if let Expression::Identifier(head) = chain.head.as_ref() {
                if let Some((_, entry)) = self
                    .scopes
                    .lookup(scope, &head.name)
                    .map(|(s, e)| (s, e.clone()))
                {
                    if entry.kind == EntryKind::External {
                        return Ok(self.external_reached(&entry.name, head.span));
                    }
                }
            }
        }

        let main = self.scopes.next_of_kind(scope, ScopeKind::Main);
        let Some(class_entry) = self.scopes.lookup_local(main, &call.name.name).cloned() else {
            return Err(error::not_defined(&call.name.name, call.name.span));
        };
        if class_entry.kind == EntryKind::External {
            return Ok(self.external_reached(&class_entry.name, call.name.span));
        }
        let Some(class_scope) = (class_entry.kind == EntryKind::Class)
            .then_some(class_entry.reference)
            .flatten()
        else {
            return Err(error::not_defined(&call.name.name, call.name.span));
        };

        self.check_constructor_call(class_scope, call, scope)?;
        Ok(VarDec::class_ref(call.name.name.clone(), 0))
    }

    /// Resolves a constructor call by linear search over the class's
    /// overloads: matching arity first, then non-strict type equality per
    /// position.
    fn check_constructor_call(
        &mut self,
        class_scope: ScopeId,
        call: &FunctionCall,
        scope: ScopeId,
    ) -> Result<(), Diagnostic> {
        let overloads: Vec<Vec<VarDec>> = self
            .scopes
            .constructors(class_scope)
            .filter_map(|entry| entry.reference)
            .collect::<Vec<_>>()
            .into_iter()
            .map(|constructor_scope| {
                self.scopes
                    .get(constructor_scope)
                    .params
                    .iter()
                    .map(|param| param.dec.clone())
                    .collect()
            })
            .collect();

        // A class without declared constructors still offers the implicit
        // zero-argument constructor.
        if overloads.is_empty() {
            if call.arguments.is_empty() {
                return Ok(());
            }
            return Err(error::wrong_argument_count(call.span));
        }

        let mut predicted = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            let dec = match &argument.type_name {
                Some(annotation) => VarDec::from_type_name(annotation, false),
                None => self.check_term(&VarDec::custom(), &argument.value, scope)?,
            };
            predicted.push(dec);
        }

        let arity_matches: Vec<&Vec<VarDec>> = overloads
            .iter()
            .filter(|params| params.len() == predicted.len())
            .collect();
        if arity_matches.is_empty() {
            return Err(error::wrong_argument_count(call.span));
        }

        for params in &arity_matches {
            let matches = params
                .iter()
                .zip(&predicted)
                .all(|(param, arg)| param.non_strict_matches(arg));
            if matches {
                return Ok(());
            }
        }

        // No overload fits: report the first mismatching position of the
        // first arity-compatible overload.
        let params = arity_matches[0];
        for (index, (param, arg)) in params.iter().zip(&predicted).enumerate() {
            if !param.non_strict_matches(arg) {
                return Err(error::type_mismatch(
                    param,
                    arg,
                    call.arguments[index].value.span(),
                ));
            }
        }
        Err(error::wrong_argument_count(call.span))
    }

    // ========================================================================
    // Resolution helpers
    // ========================================================================

    /// Resolves a name through the scope chain, cloning the entry out of
    /// the arena.
    fn resolve_name(
        &self,
        scope: ScopeId,
        name: &str,
        span: Span,
    ) -> Result<(ScopeId, SemanticEntry), Diagnostic> {
        self.scopes
            .lookup(scope, name)
            .map(|(declaring, entry)| (declaring, entry.clone()))
            .ok_or_else(|| error::not_defined(name, span))
    }

    /// The scope an entry lets an access chain continue into: its own
    /// nested scope, or the scope of the class its type references.
    fn entry_scope(&self, entry: &SemanticEntry, scope: ScopeId) -> Option<ScopeId> {
        if entry.reference.is_some() {
            return entry.reference;
        }
        if entry.dec.base == BaseType::ClassRef {
            let main = self.scopes.next_of_kind(scope, ScopeKind::Main);
            let class_name = entry.dec.class_name.as_deref()?;
            let class_entry = self.scopes.lookup_local(main, class_name)?;
            if class_entry.kind == EntryKind::Class {
                return class_entry.reference;
            }
        }
        None
    }

    /// Rejects private/secure entries reached from outside their class.
    fn check_hidden(
        &self,
        entry: &SemanticEntry,
        declaring: ScopeId,
        origin: ScopeId,
        span: Span,
    ) -> Result<(), Diagnostic> {
        if self.scopes.get(declaring).kind != ScopeKind::Class {
            return Ok(());
        }
        if self.scopes.is_within(origin, declaring) {
            return Ok(());
        }
        if matches!(entry.visibility, Visibility::Private | Visibility::Secure) {
            return Err(error::hidden_access(span));
        }
        Ok(())
    }

    /// Applies `[index]` groups to a type: the dimension drops by one per
    /// group and every index must check against INTEGER. A negative
    /// resulting dimension is a diagnostic, reported once.
    fn reduce_dimension(
        &mut self,
        mut dec: VarDec,
        indices: &[Expression],
        span: Span,
        scope: ScopeId,
    ) -> Result<VarDec, Diagnostic> {
        if indices.is_empty() {
            return Ok(dec);
        }

        let integer = VarDec::new(BaseType::Integer);
        for index in indices {
            self.check_term(&integer, index, scope)?;
        }

        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_possible_wrap,
            reason = "access chains never approach i32::MAX groups"
        )]
        let drop = indices.len() as i32;
        dec.dimension -= drop;
        if dec.dimension < 0 {
            return Err(error::no_such_array_dimension(span));
        }
        Ok(dec)
    }

    /// Queues an access through an external symbol and yields the
    /// wildcard type.
    fn external_reached(&mut self, name: &EcoString, span: Span) -> VarDec {
        self.externals.push(ExternalAccess {
            name: name.clone(),
            span,
        });
        VarDec::external_ret()
    }
}

/// Splits an element into its core and any applied `[index]` groups.
fn split_array_access(expr: &Expression) -> (&Expression, &[Expression], Span) {
    match expr {
        Expression::ArrayAccess {
            target,
            indices,
            span,
        } => (target, indices, *span),
        other => (other, &[], other.span()),
    }
}

/// The name an access chain element resolves by.
fn element_name(expr: &Expression) -> EcoString {
    let (core, _, _) = split_array_access(expr);
    match core {
        Expression::Identifier(identifier) => identifier.name.clone(),
        Expression::Call(call) => call.name.name.clone(),
        Expression::This(_) => "this".into(),
        other => EcoString::from(format!("{other:?}")),
    }
}

/// The constructor call at the end of a `new` path.
fn constructor_call(target: &Expression) -> Option<&FunctionCall> {
    match target {
        Expression::Call(call) => Some(call),
        Expression::Access(chain) => match &chain.links.last()?.element {
            Expression::Call(call) => Some(call),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Category;
    use crate::parse::parse;
    use crate::semantic_analysis::{AnalysisResult, analyse};
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
    fn term_type_mismatch_renders_expected_and_got() {
        let result = analyse_source("var x:int = \"text\";");
        assert_eq!(categories(&result), vec![Category::TypeMismatch]);
        assert!(
            result.diagnostics[0]
                .message()
                .contains("Expected INTEGER, but got STRING instead.")
        );
    }

    #[test]
    fn float_and_double_interchange() {
        let result = analyse_source("var a:double = 3.5;\nvar b:float = 2.25;");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn undefined_reference_is_reported() {
        let result = analyse_source("var x = y;");
        assert_eq!(categories(&result), vec![Category::NotDefined]);
        assert!(result.diagnostics[0].message().contains("\"y\""));
    }

    #[test]
    fn array_access_reduces_dimension() {
        let result = analyse_source("var grid:int[][] = {{1}};\nvar row:int[] = grid[0];\nvar cell:int = grid[0][1];");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn excess_array_access_is_reported_once() {
        let result = analyse_source("var row:int[] = {1, 2};\nvar bad = row[0][1];");
        assert_eq!(categories(&result), vec![Category::NoSuchArrayDimension]);
    }

    #[test]
    fn array_index_must_be_integer() {
        let result = analyse_source("var row:int[] = {1, 2};\nvar bad = row[\"zero\"];");
        assert_eq!(categories(&result), vec![Category::TypeMismatch]);
    }

    #[test]
    fn call_arity_is_enforced() {
        let result = analyse_source("function:int f(a:int) { return a; }\nvar x = f(1, 2);");
        assert_eq!(categories(&result), vec![Category::WrongArgument]);
    }

    #[test]
    fn call_argument_types_are_enforced() {
        let result = analyse_source("function:int f(a:int) { return a; }\nvar x = f(\"one\");");
        assert_eq!(categories(&result), vec![Category::TypeMismatch]);
    }

    #[test]
    fn calling_a_variable_is_a_mismatch() {
        let result = analyse_source("var f = 1;\nf();");
        assert_eq!(categories(&result), vec![Category::TypeMismatch]);
        assert!(result.diagnostics[0].message().contains("<FUNCTION_CALL>"));
    }

    #[test]
    fn constructor_call_type_mismatch_names_first_position() {
        let result = analyse_source(
            "class B { this::constructor(p:int, q:int) { } }\nvar b = new B(\"one\", 2);",
        );
        assert_eq!(categories(&result), vec![Category::TypeMismatch]);
        assert!(
            result.diagnostics[0]
                .message()
                .contains("Expected INTEGER, but got STRING instead.")
        );
    }

    #[test]
    fn constructor_overloads_resolve_by_argument_types() {
        let result = analyse_source(
            "class B { this::constructor(p:int) { } this::constructor(p:String) { } }\n\
             var b = new B(\"text\");",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn implicit_default_constructor_accepts_no_arguments() {
        let result = analyse_source("class A { }\nvar a = new A();\nvar b = new A(1);");
        assert_eq!(categories(&result), vec![Category::WrongArgument]);
    }

    #[test]
    fn arrow_into_non_class_is_wrong_accessor() {
        let result = analyse_source("enum Level { Low }\nLevel->Low;");
        assert_eq!(categories(&result), vec![Category::WrongAccessor]);
        assert!(result.diagnostics[0].message().contains("\"->\""));
    }

    #[test]
    fn dot_into_class_is_wrong_accessor() {
        let result = analyse_source("class A { global function:int f() { return 1; } }\nA.f();");
        assert_eq!(categories(&result), vec![Category::WrongAccessor]);
    }

    #[test]
    fn enum_dot_access_is_exempt() {
        let result = analyse_source("enum Level { Low, High }\nvar l:int = Level.High;");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn this_dot_reaches_own_members() {
        let result = analyse_source(
            "class Counter {\n\
               var count:int = 0;\n\
               global function:int bump() { this.count += 1; return this.count; }\n\
             }",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn external_access_defers_checking() {
        let result = analyse_source("include \"vector.spc\";\nvar v = vector->make(1, 2, 3);");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.external_accesses.len(), 1);
        assert_eq!(result.external_accesses[0].name, "vector");
    }

    #[test]
    fn arithmetic_operands_must_agree() {
        let result = analyse_source("var x = 1 + \"two\";");
        assert_eq!(categories(&result), vec![Category::TypeMismatch]);
    }

    #[test]
    fn custom_propagates_through_arithmetic() {
        let result = analyse_source("function f(a, b) { return a + b; }");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn conditional_assignment_checks_both_arms() {
        let result = analyse_source("var x:int = 1 == 1 ? 2 : \"three\";");
        assert_eq!(categories(&result), vec![Category::TypeMismatch]);
    }

    #[test]
    fn char_array_length_decides_char_or_string() {
        let result = analyse_source("var c:char = 'a';\nvar s:String = 'word';");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }
}
