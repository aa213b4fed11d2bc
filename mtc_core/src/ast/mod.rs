pub mod shape;

use crate::intern::{InternPool, NameID};
use crate::support::Arena;
use shape::Arity;

crate::enum_as_str! {
    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    pub enum NodeKind {
        Empty "EMPTY",
        Root "ROOT",
        Filename "FILENAME",
        Options "OPTIONS",

        DefMod "DEFMOD",
        ImpMod "IMPMOD",
        PgmMod "PGMMOD",
        ImpList "IMPLIST",
        Import "IMPORT",
        FromImport "FROMIMPORT",
        Export "EXPORT",
        QualExport "QUALEXPORT",

        DefList "DEFLIST",
        ConstDef "CONSTDEF",
        TypeDef "TYPEDEF",
        ProcDef "PROCDEF",
        DeclList "DECLLIST",
        VarDecl "VARDECL",
        Proc "PROC",
        ModDecl "MODDECL",
        Block "BLOCK",

        FParamList "FPARAMLIST",
        ValParam "VALPARAM",
        VarParam "VARPARAM",
        OpenArray "OPENARRAY",
        FTypeList "FTYPELIST",
        VarFType "VARFTYPE",

        Subrange "SUBR",
        Enum "ENUM",
        Set "SET",
        Array "ARRAY",
        IndexList "INDEXLIST",
        Record "RECORD",
        ExtRec "EXTREC",
        VrntRec "VRNTREC",
        VsRec "VSREC",
        Pointer "POINTER",
        ProcType "PROCTYPE",

        FieldListSeq "FIELDLISTSEQ",
        FieldList "FIELDLIST",
        Vrnt "VRNT",
        VrntList "VRNTLIST",
        VrntFields "VRNTFIELDS",
        CaseLabelList "CLABELLIST",

        StmtSeq "STMTSEQ",
        Assign "ASSIGN",
        PCall "PCALL",
        Return "RETURN",
        With "WITH",
        If "IF",
        ElsifSeq "ELSIFSEQ",
        Elsif "ELSIF",
        Switch "SWITCH",
        CaseList "CASELIST",
        Case "CASE",
        Loop "LOOP",
        While "WHILE",
        Repeat "REPEAT",
        ForTo "FORTO",
        Exit "EXIT",

        Deref "DEREF",
        Index "INDEX",
        FieldSel "FIELD",
        FCall "FCALL",
        SetVal "SETVAL",
        Range "RANGE",
        ExprList "EXPRLIST",

        Neg "NEG",
        Not "NOT",
        Eq "EQ",
        Neq "NEQ",
        Lt "LT",
        LtEq "LTEQ",
        Gt "GT",
        GtEq "GTEQ",
        In "IN",
        Plus "PLUS",
        Minus "MINUS",
        Or "OR",
        Mul "MUL",
        Slash "SLASH",
        Div "DIV",
        Mod "MOD",
        And "AND",

        Ident "IDENT",
        Qualident "QUALIDENT",
        IdentList "IDENTLIST",
        IntVal "INTVAL",
        RealVal "REALVAL",
        ChrVal "CHRVAL",
        QuotedVal "QUOTEDVAL",
    }
}

/// Arena allocated syntax tree node. Branch nodes carry ordered
/// children, terminal nodes carry interned values; the constructors
/// enforce the arity and child-type rules of `ast::shape`, so a
/// well-formed tree contains only legal child shapes.
#[derive(Copy, Clone)]
pub struct Node<'ast> {
    kind: NodeKind,
    children: &'ast [&'ast Node<'ast>],
    values: &'ast [NameID],
}

static EMPTY_NODE: Node<'static> = Node { kind: NodeKind::Empty, children: &[], values: &[] };

impl<'ast> Node<'ast> {
    /// The shared `(EMPTY)` singleton.
    pub fn empty() -> &'static Node<'static> {
        &EMPTY_NODE
    }

    /// Fixed-arity or list branch node. `None` when the child count or
    /// any child kind violates the shape table; nothing is allocated.
    pub fn branch(
        arena: &mut Arena<'ast>,
        kind: NodeKind,
        children: &[&'ast Node<'ast>],
    ) -> Option<&'ast Node<'ast>> {
        if shape::is_terminal(kind) || kind == NodeKind::Empty {
            return None;
        }
        if !shape::arity(kind).accepts(children.len()) {
            return None;
        }
        for (index, child) in children.iter().enumerate() {
            if !shape::legal_child(kind, child.kind, index) {
                return None;
            }
        }
        let children = arena.alloc_slice(children);
        Some(arena.alloc(Node { kind, children, values: &[] }))
    }

    /// Terminal node with a single interned value.
    pub fn terminal(
        arena: &mut Arena<'ast>,
        kind: NodeKind,
        value: NameID,
    ) -> Option<&'ast Node<'ast>> {
        Node::terminal_list(arena, kind, &[value])
    }

    /// Terminal node over a list of interned values
    /// (IDENTLIST, QUALIDENT, OPTIONS).
    pub fn terminal_list(
        arena: &mut Arena<'ast>,
        kind: NodeKind,
        values: &[NameID],
    ) -> Option<&'ast Node<'ast>> {
        let arity = shape::value_arity(kind)?;
        if !arity.accepts(values.len()) {
            return None;
        }
        let values = arena.alloc_slice(values);
        Some(arena.alloc(Node { kind, children: &[], values }))
    }

    /// Non-destructive child replacement: allocates a new node with
    /// slot `index` swapped, returns it with the previous occupant.
    pub fn replace_child(
        arena: &mut Arena<'ast>,
        node: &'ast Node<'ast>,
        index: usize,
        new_child: &'ast Node<'ast>,
    ) -> Option<(&'ast Node<'ast>, &'ast Node<'ast>)> {
        let prev = *node.children.get(index)?;
        if !shape::legal_child(node.kind, new_child.kind, index) {
            return None;
        }
        let mut children: Vec<&'ast Node<'ast>> = node.children.to_vec();
        children[index] = new_child;
        let children = arena.alloc_slice(&children);
        let replaced = arena.alloc(Node { kind: node.kind, children, values: node.values });
        Some((&*replaced, prev))
    }

    /// Non-destructive value replacement, same contract as `replace_child`.
    pub fn replace_value(
        arena: &mut Arena<'ast>,
        node: &'ast Node<'ast>,
        index: usize,
        new_value: NameID,
    ) -> Option<(&'ast Node<'ast>, NameID)> {
        let prev = *node.values.get(index)?;
        let mut values: Vec<NameID> = node.values.to_vec();
        values[index] = new_value;
        let values = arena.alloc_slice(&values);
        let replaced = arena.alloc(Node { kind: node.kind, children: node.children, values });
        Some((&*replaced, prev))
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }
    pub fn children(&self) -> &'ast [&'ast Node<'ast>] {
        self.children
    }
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
    pub fn child(&self, index: usize) -> Option<&'ast Node<'ast>> {
        self.children.get(index).copied()
    }
    pub fn values(&self) -> &'ast [NameID] {
        self.values
    }
    pub fn value_count(&self) -> usize {
        self.values.len()
    }
    pub fn value(&self, index: usize) -> Option<NameID> {
        self.values.get(index).copied()
    }
    pub fn is_empty_node(&self) -> bool {
        self.kind == NodeKind::Empty
    }
}

/// Parse output: the root node plus the arena and intern pool that
/// own every node and lexeme reachable from it.
pub struct SyntaxTree<'syn> {
    pub arena: Arena<'syn>,
    pub intern: InternPool<'syn>,
    pub root: &'syn Node<'syn>,
}

impl<'syn> SyntaxTree<'syn> {
    pub fn name(&self, id: NameID) -> &str {
        self.intern.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_shared_singleton() {
        let a = Node::empty();
        let b = Node::empty();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.kind(), NodeKind::Empty);
        assert_eq!(a.child_count(), 0);
        assert_eq!(a.value_count(), 0);
    }

    #[test]
    fn branch_enforces_arity_and_child_kinds() {
        let mut arena = Arena::new();
        let mut intern = InternPool::new(0);
        let k = intern.intern("k");

        let ident = Node::terminal(&mut arena, NodeKind::Ident, k).unwrap();
        let intval = Node::terminal(&mut arena, NodeKind::IntVal, intern.intern("42")).unwrap();

        let constdef = Node::branch(&mut arena, NodeKind::ConstDef, &[ident, intval]).unwrap();
        assert_eq!(constdef.kind(), NodeKind::ConstDef);
        assert_eq!(constdef.child_count(), 2);
        assert_eq!(constdef.child(0).unwrap().kind(), NodeKind::Ident);

        // wrong arity
        assert!(Node::branch(&mut arena, NodeKind::ConstDef, &[ident]).is_none());
        // wrong child kind in slot 0
        assert!(Node::branch(&mut arena, NodeKind::ConstDef, &[intval, intval]).is_none());
        // list node must not be empty
        assert!(Node::branch(&mut arena, NodeKind::DefList, &[]).is_none());
        assert!(Node::branch(&mut arena, NodeKind::DefList, &[constdef]).is_some());
    }

    #[test]
    fn terminal_list_shapes() {
        let mut arena = Arena::new();
        let mut intern = InternPool::new(0);
        let a = intern.intern("a");
        let b = intern.intern("b");

        // a lone ident is an IDENT terminal, not a QUALIDENT
        assert!(Node::terminal_list(&mut arena, NodeKind::Qualident, &[a]).is_none());
        let qualident = Node::terminal_list(&mut arena, NodeKind::Qualident, &[a, b]).unwrap();
        assert_eq!(qualident.value_count(), 2);

        assert!(Node::terminal_list(&mut arena, NodeKind::IdentList, &[]).is_none());
        let identlist = Node::terminal_list(&mut arena, NodeKind::IdentList, &[a]).unwrap();
        assert_eq!(identlist.value(0), Some(a));

        // branch kinds reject terminal construction
        assert!(Node::terminal(&mut arena, NodeKind::Assign, a).is_none());
    }

    #[test]
    fn replace_child_returns_previous() {
        let mut arena = Arena::new();
        let mut intern = InternPool::new(0);
        let x = Node::terminal(&mut arena, NodeKind::Ident, intern.intern("x")).unwrap();
        let one = Node::terminal(&mut arena, NodeKind::IntVal, intern.intern("1")).unwrap();
        let two = Node::terminal(&mut arena, NodeKind::IntVal, intern.intern("2")).unwrap();

        let assign = Node::branch(&mut arena, NodeKind::Assign, &[x, one]).unwrap();
        let (replaced, prev) = Node::replace_child(&mut arena, assign, 1, two).unwrap();
        assert!(std::ptr::eq(prev, one));
        assert!(std::ptr::eq(replaced.child(1).unwrap(), two));
        // original node is untouched
        assert!(std::ptr::eq(assign.child(1).unwrap(), one));
        // illegal replacement kind is rejected
        assert!(Node::replace_child(&mut arena, assign, 0, one).is_none());
    }
}
