//! Symbol table and scope management
//!
//! Scopes live in an arena indexed by [`ScopeId`]: each scope holds its
//! symbols and an index to its parent. Entering a block pushes a child
//! scope and moves the cursor; leaving moves the cursor back. The records
//! themselves persist for the lifetime of the run, so the type checker can
//! revisit any scope the parser created by id.
//!
//! `declare` never aborts: a name collision is returned as a
//! [`DeclareConflict`] for the caller to report, and the first declaration
//! stays in the table.

use crate::diagnostics::SourceLocation;
use crate::semantic::types::Type;
use rustc_hash::FxHashMap;

/// Index of a scope in the arena.
pub type ScopeId = usize;

/// The global scope is always the first record in the arena.
pub const GLOBAL_SCOPE: ScopeId = 0;

/// What a name was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
    Array,
}

/// A named, typed declaration tracked for lookup and conflict detection.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Type,
    /// For functions: whether a body has been seen (prototypes start false)
    pub defined: bool,
    pub location: SourceLocation,
}

/// Returned by [`SymbolTable::declare`] when the name already exists in
/// the current scope. The existing declaration is left untouched.
#[derive(Debug, Clone)]
pub struct DeclareConflict {
    /// True when the existing declaration has the same kind and type
    /// (a redefinition); false when it differs (a redeclaration).
    pub same_kind_and_type: bool,
}

#[derive(Debug)]
struct Scope {
    symbols: FxHashMap<String, Symbol>,
    parent: Option<ScopeId>,
}

/// Arena-backed lexical scope chain.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table containing only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                symbols: FxHashMap::default(),
                parent: None,
            }],
            current: GLOBAL_SCOPE,
        }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    /// Push a child of the current scope and move into it.
    pub fn enter_scope(&mut self) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(Scope {
            symbols: FxHashMap::default(),
            parent: Some(self.current),
        });
        self.current = id;
        id
    }

    /// Move back to the parent scope. Exiting the global scope is a no-op.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// Insert a symbol into the current scope. On a name collision the
    /// existing symbol wins and the conflict is described to the caller.
    pub fn declare(&mut self, symbol: Symbol) -> Result<(), DeclareConflict> {
        let scope = &mut self.scopes[self.current];
        if let Some(existing) = scope.symbols.get(&symbol.name) {
            return Err(DeclareConflict {
                same_kind_and_type: existing.kind == symbol.kind && existing.ty == symbol.ty,
            });
        }
        scope.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Insert a symbol into the global scope regardless of the cursor.
    /// Function symbols are global even though their headers are parsed
    /// after the parameter scope has been entered.
    pub fn declare_global(&mut self, symbol: Symbol) -> Result<(), DeclareConflict> {
        let scope = &mut self.scopes[GLOBAL_SCOPE];
        if let Some(existing) = scope.symbols.get(&symbol.name) {
            return Err(DeclareConflict {
                same_kind_and_type: existing.kind == symbol.kind && existing.ty == symbol.ty,
            });
        }
        scope.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Look up a name in exactly one scope, without walking ancestors.
    pub fn lookup_in(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes[scope].symbols.get(name)
    }

    /// Mark a function in the global scope as defined (body seen).
    pub fn mark_defined(&mut self, name: &str) {
        if let Some(symbol) = self.scopes[GLOBAL_SCOPE].symbols.get_mut(name) {
            symbol.defined = true;
        }
    }

    /// Look up a name from the current scope outward.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.lookup_from(self.current, name)
    }

    /// Look up a name from the given scope outward.
    pub fn lookup_from(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            if let Some(symbol) = self.scopes[id].symbols.get(name) {
                return Some(symbol);
            }
            cursor = self.scopes[id].parent;
        }
        None
    }

    /// Look up a name from the given scope outward, ignoring symbols
    /// declared after `use_site`. This preserves declare-before-use
    /// semantics even though checking runs after the whole unit is parsed:
    /// a later declaration in an inner scope does not capture an earlier
    /// use, which instead resolves outward (or not at all).
    pub fn lookup_before(
        &self,
        scope: ScopeId,
        name: &str,
        use_site: SourceLocation,
    ) -> Option<&Symbol> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            if let Some(symbol) = self.scopes[id].symbols.get(name) {
                if symbol.location <= use_site {
                    return Some(symbol);
                }
            }
            cursor = self.scopes[id].parent;
        }
        None
    }
}
