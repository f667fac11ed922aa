// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! The scope tree.
//!
//! Scopes live in a [`ScopeArena`]: the arena owns every table, children
//! reach their parent through a plain [`ScopeId`] back-reference, and the
//! chain of parents always terminates at the single MAIN scope. Each table
//! holds a symbol map plus an ordered parameter list; constructors are
//! stored in their class table's parameter list and told apart by
//! signature, never by name.

use std::collections::HashMap;

use ecow::EcoString;

use crate::ast::Modifier;
use crate::source_analysis::Span;

use super::types::VarDec;

/// Index of a scope table inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// Reconstructs an id from a raw arena index, for whole-tree walks.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// The raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The kind of a scope table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The synthetic outermost scope.
    Main,
    /// A class body.
    Class,
    /// A function body.
    Function,
    /// A constructor body.
    Constructor,
    /// An `if` body.
    If,
    /// An `else if` body.
    ElseIf,
    /// An `else` body.
    Else,
    /// A `while` body.
    While,
    /// A `do` body.
    Do,
    /// A `for` body (holds the init declaration).
    For,
    /// A `try` body.
    Try,
    /// A `catch` body (holds the caught binding).
    Catch,
    /// A `check` body.
    Check,
    /// An `is` arm body.
    Is,
    /// An enum body (holds the enumerators).
    Enum,
}

impl ScopeKind {
    /// Returns `true` for the loop scopes a `break`/`continue` may target.
    #[must_use]
    pub const fn is_loop(self) -> bool {
        matches!(self, Self::For | Self::While | Self::Do | Self::Is)
    }

    /// Returns `true` for the transparent scopes a `break`/`continue`
    /// search may bridge through.
    #[must_use]
    pub const fn bridges_break(self) -> bool {
        matches!(
            self,
            Self::If | Self::ElseIf | Self::Else | Self::Try | Self::Catch | Self::Check
        )
    }
}

/// Visibility attached to a semantic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Default file-private visibility.
    #[default]
    PGlobal,
    /// `global`
    Global,
    /// `private`
    Private,
    /// `secure`
    Secure,
}

impl From<Modifier> for Visibility {
    fn from(modifier: Modifier) -> Self {
        match modifier {
            Modifier::PGlobal => Self::PGlobal,
            Modifier::Global => Self::Global,
            Modifier::Private => Self::Private,
            Modifier::Secure => Self::Secure,
        }
    }
}

/// What a semantic entry declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A variable or parameter.
    Variable,
    /// A function.
    Function,
    /// A class.
    Class,
    /// A constructor overload.
    Constructor,
    /// An enum.
    Enum,
    /// One enumerator of an enum.
    Enumerator,
    /// A symbol introduced by `include`; its type defers to the linker.
    External,
    /// An interface bound in a class header.
    Interface,
}

/// One declaration inside a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticEntry {
    /// Declared name.
    pub name: EcoString,
    /// Declared type.
    pub dec: VarDec,
    /// Declared visibility.
    pub visibility: Visibility,
    /// Entry kind.
    pub kind: EntryKind,
    /// The nested scope this entry introduces, when it introduces one.
    pub reference: Option<ScopeId>,
    /// Declaration site.
    pub span: Span,
}

/// One scope table.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    /// The scope kind.
    pub kind: ScopeKind,
    /// Name of the declaring construct; synthetic for control scopes.
    pub name: EcoString,
    /// Parent back-reference; `None` only for MAIN.
    pub parent: Option<ScopeId>,
    /// Named declarations.
    pub symbols: HashMap<EcoString, SemanticEntry>,
    /// Ordered parameters; also holds constructor overloads for classes.
    pub params: Vec<SemanticEntry>,
    /// Creation site.
    pub span: Span,
}

/// Owner of every scope table of one analysis.
#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<ScopeTable>,
}

impl ScopeArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a scope and returns its id.
    pub fn alloc(
        &mut self,
        kind: ScopeKind,
        name: impl Into<EcoString>,
        parent: Option<ScopeId>,
        span: Span,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeTable {
            kind,
            name: name.into(),
            parent,
            symbols: HashMap::new(),
            params: Vec::new(),
            span,
        });
        id
    }

    /// Returns a scope table.
    #[must_use]
    pub fn get(&self, id: ScopeId) -> &ScopeTable {
        &self.scopes[id.0]
    }

    /// Returns a scope table mutably.
    pub fn get_mut(&mut self, id: ScopeId) -> &mut ScopeTable {
        &mut self.scopes[id.0]
    }

    /// Number of allocated scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns `true` when no scope has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Inserts a named declaration into a scope.
    pub fn define(&mut self, scope: ScopeId, entry: SemanticEntry) {
        self.get_mut(scope).symbols.insert(entry.name.clone(), entry);
    }

    /// Appends an entry to a scope's ordered parameter list.
    pub fn add_param(&mut self, scope: ScopeId, entry: SemanticEntry) {
        self.get_mut(scope).params.push(entry);
    }

    /// Looks a name up in one scope only: symbol map first, then the
    /// parameter list.
    #[must_use]
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&SemanticEntry> {
        let table = self.get(scope);
        table
            .symbols
            .get(name)
            .or_else(|| table.params.iter().find(|entry| entry.name == name))
    }

    /// Looks a name up from a scope outwards to MAIN. Returns the scope
    /// that declares it together with the entry.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<(ScopeId, &SemanticEntry)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(entry) = self.lookup_local(id, name) {
                return Some((id, entry));
            }
            current = self.get(id).parent;
        }
        None
    }

    /// Returns `true` if the name is declared anywhere on the scope chain.
    #[must_use]
    pub fn is_defined(&self, scope: ScopeId, name: &str) -> bool {
        self.lookup(scope, name).is_some()
    }

    /// Walks outwards until a scope of the given kind; stops at MAIN.
    /// Returns the found scope, or MAIN itself when the kind never
    /// appears.
    #[must_use]
    pub fn next_of_kind(&self, scope: ScopeId, kind: ScopeKind) -> ScopeId {
        let mut current = scope;
        loop {
            let table = self.get(current);
            if table.kind == kind || table.kind == ScopeKind::Main {
                return current;
            }
            match table.parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// The enclosing class scope, if the scope sits inside one.
    #[must_use]
    pub fn enclosing_class(&self, scope: ScopeId) -> Option<ScopeId> {
        let candidate = self.next_of_kind(scope, ScopeKind::Class);
        (self.get(candidate).kind == ScopeKind::Class).then_some(candidate)
    }

    /// Returns `true` if `inner` equals `outer` or sits anywhere below it.
    #[must_use]
    pub fn is_within(&self, inner: ScopeId, outer: ScopeId) -> bool {
        let mut current = Some(inner);
        while let Some(id) = current {
            if id == outer {
                return true;
            }
            current = self.get(id).parent;
        }
        false
    }

    /// Iterates over the constructor entries of a class scope.
    pub fn constructors(&self, class: ScopeId) -> impl Iterator<Item = &SemanticEntry> {
        self.get(class)
            .params
            .iter()
            .filter(|entry| entry.kind == EntryKind::Constructor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic_analysis::types::BaseType;

    fn span() -> Span {
        Span::new(0, 1)
    }

    fn variable(name: &str) -> SemanticEntry {
        SemanticEntry {
            name: name.into(),
            dec: VarDec::new(BaseType::Integer),
            visibility: Visibility::PGlobal,
            kind: EntryKind::Variable,
            reference: None,
            span: span(),
        }
    }

    #[test]
    fn lookup_walks_parent_chain_to_main() {
        let mut arena = ScopeArena::new();
        let main = arena.alloc(ScopeKind::Main, "main", None, span());
        let class = arena.alloc(ScopeKind::Class, "A", Some(main), span());
        let function = arena.alloc(ScopeKind::Function, "f", Some(class), span());

        arena.define(main, variable("top"));
        arena.define(function, variable("local"));

        assert!(arena.lookup(function, "top").is_some());
        assert!(arena.lookup(function, "local").is_some());
        assert!(arena.lookup(main, "local").is_none());
        assert_eq!(arena.lookup(function, "top").unwrap().0, main);
    }

    #[test]
    fn params_participate_in_lookup() {
        let mut arena = ScopeArena::new();
        let main = arena.alloc(ScopeKind::Main, "main", None, span());
        let function = arena.alloc(ScopeKind::Function, "f", Some(main), span());
        arena.add_param(function, variable("y"));

        assert!(arena.lookup_local(function, "y").is_some());
        assert!(arena.is_defined(function, "y"));
    }

    #[test]
    fn next_of_kind_stops_at_main() {
        let mut arena = ScopeArena::new();
        let main = arena.alloc(ScopeKind::Main, "main", None, span());
        let while_scope = arena.alloc(ScopeKind::While, "while", Some(main), span());

        let found = arena.next_of_kind(while_scope, ScopeKind::Class);
        assert_eq!(arena.get(found).kind, ScopeKind::Main);
        assert_eq!(arena.enclosing_class(while_scope), None);
    }

    #[test]
    fn enclosing_class_finds_class_through_control_scopes() {
        let mut arena = ScopeArena::new();
        let main = arena.alloc(ScopeKind::Main, "main", None, span());
        let class = arena.alloc(ScopeKind::Class, "A", Some(main), span());
        let function = arena.alloc(ScopeKind::Function, "f", Some(class), span());
        let if_scope = arena.alloc(ScopeKind::If, "if", Some(function), span());

        assert_eq!(arena.enclosing_class(if_scope), Some(class));
        assert!(arena.is_within(if_scope, class));
        assert!(!arena.is_within(class, if_scope));
    }

    #[test]
    fn loop_and_bridge_predicates() {
        assert!(ScopeKind::For.is_loop());
        assert!(ScopeKind::Is.is_loop());
        assert!(!ScopeKind::Function.is_loop());
        assert!(ScopeKind::Catch.bridges_break());
        assert!(!ScopeKind::Class.bridges_break());
    }
}
