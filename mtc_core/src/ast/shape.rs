use super::NodeKind;

/// Child (or value) count rule for a node kind.
/// `List(min)` nodes take any count >= min.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Arity {
    Fixed(u32),
    List(u32),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => count == n as usize,
            Arity::List(min) => count >= min as usize,
        }
    }
}

/// Child arity per node kind. Terminal kinds carry no children.
pub fn arity(kind: NodeKind) -> Arity {
    use Arity::{Fixed, List};
    use NodeKind::*;
    match kind {
        Empty | Exit => Fixed(0),

        Root => Fixed(3),
        DefMod => Fixed(3),
        ImpMod | PgmMod => Fixed(4),

        ImpList => List(1),
        Import | Export | QualExport => Fixed(1),
        FromImport => Fixed(2),

        DefList | DeclList => List(1),
        ConstDef | TypeDef | VarDecl => Fixed(2),
        ProcDef => Fixed(3),
        Proc => Fixed(4),
        ModDecl => Fixed(5),
        Block => Fixed(2),

        FParamList | FTypeList => List(1),
        ValParam | VarParam => Fixed(2),
        OpenArray | VarFType => Fixed(1),

        Subrange | Array | ExtRec | ProcType => Fixed(2),
        Enum | Set | Record | VrntRec | VsRec | Pointer => Fixed(1),
        IndexList => List(1),

        FieldListSeq | VrntList | CaseLabelList => List(1),
        FieldList | VrntFields => Fixed(2),
        Vrnt => Fixed(4),

        StmtSeq | ElsifSeq | CaseList | ExprList => List(1),
        Assign | With | Elsif | Case | While | Repeat => Fixed(2),
        PCall | FCall | Index | FieldSel => Fixed(2),
        Return | Loop | Deref | Neg | Not => Fixed(1),
        If => Fixed(4),
        Switch => Fixed(3),
        ForTo => Fixed(5),

        SetVal | Range => Fixed(2),
        Eq | Neq | Lt | LtEq | Gt | GtEq | In | Plus | Minus | Or | Mul | Slash | Div | Mod
        | And => Fixed(2),

        // terminals
        Ident | Qualident | IdentList | IntVal | RealVal | ChrVal | QuotedVal | Filename
        | Options => Fixed(0),
    }
}

/// Value arity for terminal kinds, `None` for branch kinds.
pub fn value_arity(kind: NodeKind) -> Option<Arity> {
    use Arity::{Fixed, List};
    use NodeKind::*;
    match kind {
        Ident | IntVal | RealVal | ChrVal | QuotedVal | Filename => Some(Fixed(1)),
        Qualident => Some(List(2)),
        IdentList | Options => Some(List(1)),
        _ => None,
    }
}

pub fn is_terminal(kind: NodeKind) -> bool {
    value_arity(kind).is_some()
}

pub fn is_expr(kind: NodeKind) -> bool {
    use NodeKind::*;
    matches!(
        kind,
        IntVal | RealVal | ChrVal | QuotedVal | FCall | SetVal | Neg | Not | Eq | Neq | Lt
            | LtEq | Gt | GtEq | In | Plus | Minus | Or | Mul | Slash | Div | Mod | And
    ) || is_designator(kind)
}

pub fn is_designator(kind: NodeKind) -> bool {
    use NodeKind::*;
    matches!(kind, Ident | Qualident | Deref | Index | FieldSel)
}

pub fn is_type(kind: NodeKind) -> bool {
    use NodeKind::*;
    matches!(
        kind,
        Array | Record | ExtRec | VrntRec | VsRec | Set | Pointer | ProcType
    ) || is_simple_type(kind)
}

pub fn is_simple_type(kind: NodeKind) -> bool {
    use NodeKind::*;
    matches!(kind, Ident | Qualident | Subrange | Enum)
}

fn is_formal_type(kind: NodeKind) -> bool {
    use NodeKind::*;
    matches!(kind, Ident | Qualident | OpenArray)
}

fn is_definition(kind: NodeKind) -> bool {
    use NodeKind::*;
    matches!(kind, ConstDef | TypeDef | VarDecl | ProcDef)
}

fn is_declaration(kind: NodeKind) -> bool {
    use NodeKind::*;
    matches!(kind, ConstDef | TypeDef | VarDecl | Proc | ModDecl)
}

pub fn is_stmt(kind: NodeKind) -> bool {
    use NodeKind::*;
    matches!(
        kind,
        Assign | PCall | Return | With | If | Switch | Loop | While | Repeat | ForTo | Exit
    )
}

fn is_unit(kind: NodeKind) -> bool {
    use NodeKind::*;
    matches!(kind, DefMod | ImpMod | PgmMod)
}

fn is_label(kind: NodeKind) -> bool {
    kind == NodeKind::Range || is_expr(kind)
}

/// Pure legality predicate for a child slot: does `child` fit
/// slot `index` of a `parent` node? For list kinds the index is
/// ignored, every element obeys the same rule.
pub fn legal_child(parent: NodeKind, child: NodeKind, index: usize) -> bool {
    use NodeKind::*;
    let empty = child == Empty;
    match parent {
        Root => match index {
            0 => child == Filename,
            1 => child == Options || empty,
            // empty unit slot survives a failed start symbol
            2 => is_unit(child) || empty,
            _ => false,
        },
        DefMod => match index {
            0 => child == Ident,
            1 => child == ImpList || empty,
            _ => child == DefList || empty,
        },
        ImpMod | PgmMod => match index {
            0 => child == Ident,
            1 => is_expr(child) || empty,
            2 => child == ImpList || empty,
            _ => child == Block,
        },
        ImpList => child == Import || child == FromImport,
        Import | Export | QualExport => child == IdentList,
        FromImport => match index {
            0 => child == Ident,
            _ => child == IdentList,
        },

        DefList => is_definition(child),
        DeclList => is_declaration(child),
        ConstDef => match index {
            0 => child == Ident,
            _ => is_expr(child),
        },
        TypeDef => match index {
            0 => child == Ident,
            _ => is_type(child) || empty,
        },
        VarDecl => match index {
            0 => child == IdentList,
            _ => is_type(child),
        },
        // open array fields appear in extensible-mode records
        FieldList => match index {
            0 => child == IdentList,
            _ => is_type(child) || child == OpenArray,
        },
        ProcDef | Proc => match index {
            0 => child == Ident,
            1 => child == FParamList || empty,
            2 => child == Ident || child == Qualident || empty,
            _ => child == Block,
        },
        ModDecl => match index {
            0 => child == Ident,
            1 => is_expr(child) || empty,
            2 => child == ImpList || empty,
            3 => child == Export || child == QualExport || empty,
            _ => child == Block,
        },
        Block => match index {
            0 => child == DeclList || empty,
            _ => child == StmtSeq || empty,
        },

        FParamList => child == ValParam || child == VarParam,
        ValParam | VarParam => match index {
            0 => child == IdentList,
            _ => is_formal_type(child),
        },
        OpenArray => child == Ident || child == Qualident,
        FTypeList => is_formal_type(child) || child == VarFType,
        VarFType => is_formal_type(child),

        Subrange => is_expr(child),
        Enum => child == IdentList,
        Set => is_simple_type(child),
        Array => match index {
            0 => child == IndexList,
            _ => is_type(child),
        },
        IndexList => is_simple_type(child),
        Record | VrntRec => child == FieldListSeq || empty,
        VsRec => child == FieldListSeq,
        ExtRec => match index {
            0 => child == Ident || child == Qualident || empty,
            _ => child == FieldListSeq || empty,
        },
        Pointer => is_type(child),
        ProcType => match index {
            0 => child == FTypeList || empty,
            _ => child == Ident || child == Qualident || empty,
        },

        FieldListSeq => child == FieldList || child == Vrnt,
        Vrnt => match index {
            0 => child == Ident || empty,
            1 => child == Ident || child == Qualident,
            2 => child == VrntList,
            _ => child == FieldListSeq || empty,
        },
        VrntList => child == VrntFields,
        VrntFields => match index {
            0 => child == CaseLabelList,
            _ => child == FieldListSeq || empty,
        },
        CaseLabelList => is_label(child),

        StmtSeq => is_stmt(child),
        Assign => match index {
            0 => is_designator(child),
            _ => is_expr(child),
        },
        PCall | FCall => match index {
            0 => is_designator(child),
            _ => child == ExprList || empty,
        },
        Return => is_expr(child) || empty,
        With => match index {
            0 => is_designator(child),
            _ => child == StmtSeq || empty,
        },
        If => match index {
            0 => is_expr(child),
            1 => child == StmtSeq || empty,
            2 => child == ElsifSeq || empty,
            _ => child == StmtSeq || empty,
        },
        ElsifSeq => child == Elsif,
        Elsif | While => match index {
            0 => is_expr(child),
            _ => child == StmtSeq || empty,
        },
        Switch => match index {
            0 => is_expr(child),
            1 => child == CaseList || empty,
            _ => child == StmtSeq || empty,
        },
        CaseList => child == Case,
        Case => match index {
            0 => child == CaseLabelList,
            _ => child == StmtSeq || empty,
        },
        Loop => child == StmtSeq || empty,
        Repeat => match index {
            0 => child == StmtSeq || empty,
            _ => is_expr(child),
        },
        ForTo => match index {
            0 => child == Ident,
            1 | 2 => is_expr(child),
            3 => is_expr(child) || empty,
            _ => child == StmtSeq || empty,
        },

        Deref => is_designator(child) || child == FCall,
        Index => match index {
            0 => is_designator(child) || child == FCall,
            _ => child == ExprList,
        },
        FieldSel => match index {
            0 => is_designator(child) || child == FCall,
            _ => child == Ident,
        },
        SetVal => match index {
            0 => child == Ident || child == Qualident || empty,
            _ => child == ExprList || empty,
        },
        Range => is_expr(child),
        ExprList => is_label(child),

        Neg | Not => is_expr(child),
        Eq | Neq | Lt | LtEq | Gt | GtEq | In | Plus | Minus | Or | Mul | Slash | Div | Mod
        | And => is_expr(child),

        // leaf kinds never take children
        Empty | Exit | Ident | Qualident | IdentList | IntVal | RealVal | ChrVal | QuotedVal
        | Filename | Options => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::AsStr;

    #[test]
    fn terminal_kinds_have_no_children() {
        for kind in NodeKind::ALL.iter().copied() {
            if is_terminal(kind) {
                assert_eq!(arity(kind), Arity::Fixed(0), "{}", kind.as_str());
                assert!(!legal_child(kind, NodeKind::Empty, 0), "{}", kind.as_str());
            }
        }
    }

    #[test]
    fn list_kinds_require_one_child() {
        for kind in [
            NodeKind::ImpList,
            NodeKind::DefList,
            NodeKind::DeclList,
            NodeKind::StmtSeq,
            NodeKind::FieldListSeq,
            NodeKind::ExprList,
        ] {
            assert_eq!(arity(kind), Arity::List(1));
            assert!(!arity(kind).accepts(0));
            assert!(arity(kind).accepts(1));
            assert!(arity(kind).accepts(5));
        }
    }

    #[test]
    fn qualident_needs_two_values() {
        let qualident = value_arity(NodeKind::Qualident).unwrap();
        assert!(!qualident.accepts(1));
        assert!(qualident.accepts(2));
        assert_eq!(value_arity(NodeKind::Ident), Some(Arity::Fixed(1)));
        assert_eq!(value_arity(NodeKind::Assign), None);
    }

    #[test]
    fn record_slot_rules() {
        assert!(legal_child(NodeKind::Record, NodeKind::FieldListSeq, 0));
        assert!(legal_child(NodeKind::Record, NodeKind::Empty, 0));
        assert!(!legal_child(NodeKind::Record, NodeKind::StmtSeq, 0));
        assert!(legal_child(NodeKind::Vrnt, NodeKind::Empty, 0));
        assert!(!legal_child(NodeKind::Vrnt, NodeKind::Empty, 1));
        assert!(legal_child(NodeKind::Vrnt, NodeKind::Qualident, 1));
    }
}
