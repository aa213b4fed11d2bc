use crate::error::SourceRange;
use crate::intern::NameID;
use rustc_hash::FxHashMap;

crate::define_id!(pub ScopeID);

/// Lexically scoped symbol table built alongside the parse.
/// Scopes form a tree; `active` tracks the currently open chain.
pub struct SymbolTable {
    scopes: Vec<Scope>,
    active: Vec<ScopeID>,
    symbol_count: usize,
}

struct Scope {
    ident: NameID,
    parent: Option<ScopeID>,
    symbols: FxHashMap<NameID, Symbol>,
}

#[derive(Copy, Clone, Debug)]
pub struct Symbol {
    pub name: NameID,
    pub kind: SymbolKind,
    pub src: SourceRange,
}

crate::enum_as_str! {
    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    pub enum SymbolKind {
        Module "module",
        Const "constant",
        Type "type",
        Var "variable",
        Proc "procedure",
        Field "record field",
        ValueParam "value parameter",
        VarParam "variable parameter",
        ConstParam "constant parameter",
    }
}

#[derive(Debug, PartialEq)]
pub enum SymbolError {
    /// The name is already bound in the innermost open scope.
    IdentNotUnique,
    /// Insert without any open scope.
    MissingScope,
    /// Close names a scope that is not currently open.
    InvalidScope,
}

// the outermost scope holds a whole compilation unit,
// nested scopes are procedures and local modules
const GLOBAL_SCOPE_CAP: usize = 97;
const NESTED_SCOPE_CAP: usize = 17;

impl SymbolTable {
    /// Opens a table with a single top-level scope named `top`.
    pub fn new(top: NameID) -> SymbolTable {
        let mut table = SymbolTable { scopes: Vec::new(), active: Vec::new(), symbol_count: 0 };
        table.open_scope(top);
        table
    }

    pub fn open_scope(&mut self, ident: NameID) -> ScopeID {
        let parent = self.active.last().copied();
        let cap = if parent.is_none() { GLOBAL_SCOPE_CAP } else { NESTED_SCOPE_CAP };
        let scope_id = ScopeID::new(self.scopes.len());
        self.scopes.push(Scope {
            ident,
            parent,
            symbols: FxHashMap::with_capacity_and_hasher(cap, Default::default()),
        });
        self.active.push(scope_id);
        scope_id
    }

    /// Pops open scopes up to and including the innermost one named
    /// `ident`. When no open scope carries that name nothing is
    /// popped and the close fails.
    pub fn close_scope(&mut self, ident: NameID) -> Result<ScopeID, SymbolError> {
        let position = self
            .active
            .iter()
            .rposition(|&scope_id| self.scopes[scope_id.index()].ident == ident)
            .ok_or(SymbolError::InvalidScope)?;
        let scope_id = self.active[position];
        self.active.truncate(position);
        Ok(scope_id)
    }

    /// Binds `name` in the innermost open scope. On a duplicate the
    /// existing symbol is returned untouched inside the error.
    pub fn insert(
        &mut self,
        name: NameID,
        kind: SymbolKind,
        src: SourceRange,
    ) -> Result<(), (SymbolError, Option<Symbol>)> {
        let scope_id = match self.active.last().copied() {
            Some(scope_id) => scope_id,
            None => return Err((SymbolError::MissingScope, None)),
        };
        let scope = &mut self.scopes[scope_id.index()];
        if let Some(existing) = scope.symbols.get(&name) {
            return Err((SymbolError::IdentNotUnique, Some(*existing)));
        }
        scope.symbols.insert(name, Symbol { name, kind, src });
        self.symbol_count += 1;
        Ok(())
    }

    /// Searches the open scope chain innermost-out.
    pub fn lookup(&self, name: NameID) -> Option<&Symbol> {
        let mut current = self.active.last().copied();
        while let Some(scope_id) = current {
            let scope = &self.scopes[scope_id.index()];
            if let Some(symbol) = scope.symbols.get(&name) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }

    /// Searches a single closed scope, used for qualified names.
    pub fn lookup_in(&self, scope_id: ScopeID, name: NameID) -> Option<&Symbol> {
        self.scopes.get(scope_id.index())?.symbols.get(&name)
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::InternPool;
    use crate::session::ModuleID;
    use crate::text::TextRange;

    fn src() -> SourceRange {
        SourceRange::new(ModuleID::dummy(), TextRange::zero())
    }

    #[test]
    fn shadowing_across_scopes() {
        let mut intern = InternPool::new(0);
        let unit = intern.intern("Buffer");
        let proc = intern.intern("Push");
        let name = intern.intern("count");

        let mut table = SymbolTable::new(unit);
        table.insert(name, SymbolKind::Var, src()).unwrap();

        table.open_scope(proc);
        // same name in a nested scope is a new binding
        table.insert(name, SymbolKind::ValueParam, src()).unwrap();
        assert_eq!(table.lookup(name).unwrap().kind, SymbolKind::ValueParam);

        table.close_scope(proc).unwrap();
        assert_eq!(table.lookup(name).unwrap().kind, SymbolKind::Var);
        assert_eq!(table.symbol_count(), 2);
        assert_eq!(table.scope_count(), 2);
    }

    #[test]
    fn duplicate_in_same_scope() {
        let mut intern = InternPool::new(0);
        let unit = intern.intern("Buffer");
        let name = intern.intern("x");

        let mut table = SymbolTable::new(unit);
        table.insert(name, SymbolKind::Const, src()).unwrap();

        let (error, existing) = table.insert(name, SymbolKind::Var, src()).unwrap_err();
        assert_eq!(error, SymbolError::IdentNotUnique);
        assert_eq!(existing.unwrap().kind, SymbolKind::Const);
        assert_eq!(table.symbol_count(), 1);
    }

    #[test]
    fn close_matches_scope_ident() {
        let mut intern = InternPool::new(0);
        let unit = intern.intern("Buffer");
        let proc = intern.intern("Push");
        let other = intern.intern("Pop");
        let name = intern.intern("x");

        let mut table = SymbolTable::new(unit);
        table.open_scope(proc);

        // a name that is not open pops nothing
        assert_eq!(table.close_scope(other).unwrap_err(), SymbolError::InvalidScope);
        table.insert(name, SymbolKind::Var, src()).unwrap();
        assert_eq!(table.lookup(name).unwrap().kind, SymbolKind::Var);

        // closing an outer scope pops everything nested inside it
        table.close_scope(unit).unwrap();
        let (error, _) = table.insert(name, SymbolKind::Var, src()).unwrap_err();
        assert_eq!(error, SymbolError::MissingScope);
        assert_eq!(table.close_scope(unit).unwrap_err(), SymbolError::InvalidScope);
    }
}
