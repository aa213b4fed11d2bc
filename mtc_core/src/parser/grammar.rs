use super::sets;
use super::{Parser, SourceKind};
use crate::ast::{Node, NodeKind};
use crate::error::SourceRange;
use crate::errors as err;
use crate::intern::NameID;
use crate::support::AsStr;
use crate::symtab::{SymbolError, SymbolKind};
use crate::text::TextRange;
use crate::token::{Token, TokenSet, T};

pub fn root<'syn>(
    p: &mut Parser<'syn, '_, '_>,
    source_kind: SourceKind,
    filename_id: NameID,
) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let filename = terminal(p, NodeKind::Filename, filename_id);
    let options = option_flags(p);

    let unit = match p.peek() {
        T![definition] => {
            if source_kind == SourceKind::Mod {
                let src = p.make_src();
                err::syntax_wrong_source_kind(
                    &mut p.state.errw,
                    src,
                    "program or implementation module",
                    "definition module",
                );
            }
            def_module(p)
        }
        T![implementation] | T![module] => {
            if source_kind == SourceKind::Def {
                let src = p.make_src();
                err::syntax_wrong_source_kind(
                    &mut p.state.errw,
                    src,
                    "definition module",
                    "program or implementation module",
                );
            }
            program_module(p)
        }
        _ => {
            let src = p.make_src();
            let found = p.peek();
            err::syntax_invalid_start_symbol(&mut p.state.errw, src, found);
            p.resync(TokenSet::EMPTY);
            Node::empty()
        }
    };

    if !p.at(T![eof]) {
        let src = p.make_src();
        let found = p.peek();
        err::syntax_symbols_after_unit(&mut p.state.errw, src, found);
    }
    let _ = p.state.symbols.close_scope(filename_id);
    branch(p, NodeKind::Root, &[filename, options, unit], start)
}

fn option_flags<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let flags = p.config.nondefault_options();
    if flags.is_empty() {
        return Node::empty();
    }
    let state = &mut *p.state;
    let offset = state.names.start();
    for flag in flags {
        let id = state.intern.intern(flag);
        state.names.push(id);
    }
    let node = Node::terminal_list(&mut state.arena, NodeKind::Options, state.names.view(&offset));
    state.names.pop_view(offset);
    node.unwrap_or(Node::empty())
}

//==================== MODULES ====================

fn def_module<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    p.match_token(T![module], sets::IMPORT_OR_IDENT_OR_SEMICOLON);
    let (name, name_id, name_range) = ident(p, sets::IMPORT_OR_IDENT_OR_SEMICOLON);
    declare(p, name_id, name_range, SymbolKind::Module);
    let scope = name_id.unwrap_or(NameID::dummy());
    p.state.symbols.open_scope(scope);
    p.match_token(T![;], sets::IMPORT_OR_DEFINITION_OR_END);

    let imports = import_list(p);
    let defs = definitions(p);

    p.match_token(T![end], sets::IDENT_OR_SEMICOLON);
    end_ident(p, name_id, name_range, sets::IDENT_OR_SEMICOLON);
    p.match_token(T![.], TokenSet::EMPTY);
    let _ = p.state.symbols.close_scope(scope);
    branch(p, NodeKind::DefMod, &[name, imports, defs], start)
}

fn program_module<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let kind = if p.eat(T![implementation]) { NodeKind::ImpMod } else { NodeKind::PgmMod };
    p.match_token(T![module], sets::IMPORT_OR_IDENT_OR_SEMICOLON);
    let (name, name_id, name_range) = ident(p, sets::IMPORT_OR_IDENT_OR_SEMICOLON);
    declare(p, name_id, name_range, SymbolKind::Module);
    let scope = name_id.unwrap_or(NameID::dummy());
    p.state.symbols.open_scope(scope);
    let priority = module_priority(p, sets::IMPORT_OR_BLOCK);
    p.match_token(T![;], sets::IMPORT_OR_BLOCK);

    let imports = import_list(p);
    let body = block(p);

    end_ident(p, name_id, name_range, sets::IDENT_OR_SEMICOLON);
    p.match_token(T![.], TokenSet::EMPTY);
    let _ = p.state.symbols.close_scope(scope);
    branch(p, kind, &[name, priority, imports, body], start)
}

fn module_priority<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    if p.eat(T!['[']) {
        let priority = expr(p, resync);
        p.match_token(T![']'], resync);
        priority
    } else {
        Node::empty()
    }
}

fn import_list<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let offset = p.state.nodes.start();
    while p.at_set(sets::FIRST_IMPORT) {
        let import_start = p.peek_range();
        let import = if p.eat(T![from]) {
            let (name, _, _) = ident(p, sets::IMPORT_OR_IDENT_OR_SEMICOLON);
            p.match_token(T![import], sets::IDENT_OR_SEMICOLON);
            let names = ident_list(p, sets::COMMA_OR_SEMICOLON);
            p.match_token(T![;], sets::IMPORT_OR_DEFINITION_OR_END);
            branch(p, NodeKind::FromImport, &[name, names], import_start)
        } else {
            p.bump();
            let names = ident_list(p, sets::COMMA_OR_SEMICOLON);
            p.match_token(T![;], sets::IMPORT_OR_DEFINITION_OR_END);
            branch(p, NodeKind::Import, &[names], import_start)
        };
        push_node(p, import);
    }
    list_node(p, NodeKind::ImpList, offset)
}

fn export<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    if !p.eat(T![export]) {
        return Node::empty();
    }
    let kind = if p.eat(T![qualified]) { NodeKind::QualExport } else { NodeKind::Export };
    let names = ident_list(p, sets::COMMA_OR_SEMICOLON);
    p.match_token(T![;], sets::DECLARATION_OR_SEMICOLON);
    branch(p, kind, &[names], start)
}

//==================== DEFINITIONS & DECLARATIONS ====================

fn definitions<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let offset = p.state.nodes.start();
    while p.at_set(sets::FIRST_DEFINITION) {
        if p.eat(T![const]) {
            while p.at(T![ident]) {
                let def = const_def(p);
                push_node(p, def);
            }
        } else if p.eat(T![type]) {
            while p.at(T![ident]) {
                let def = type_def(p);
                push_node(p, def);
            }
        } else if p.eat(T![var]) {
            while p.at(T![ident]) {
                let def = var_decl(p, sets::DEFINITION_OR_IDENT_OR_SEMICOLON);
                push_node(p, def);
            }
        } else {
            let def = proc_def(p);
            push_node(p, def);
        }
    }
    list_node(p, NodeKind::DefList, offset)
}

fn declarations<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let offset = p.state.nodes.start();
    while p.at_set(sets::FIRST_DECLARATION) {
        if p.eat(T![const]) {
            while p.at(T![ident]) {
                let decl = const_def(p);
                push_node(p, decl);
            }
        } else if p.eat(T![type]) {
            while p.at(T![ident]) {
                let decl = type_def(p);
                push_node(p, decl);
            }
        } else if p.eat(T![var]) {
            while p.at(T![ident]) {
                let decl = var_decl(p, sets::DECLARATION_OR_IDENT_OR_SEMICOLON);
                push_node(p, decl);
            }
        } else if p.at(T![procedure]) {
            let decl = proc_decl(p);
            push_node(p, decl);
        } else {
            let decl = module_decl(p);
            push_node(p, decl);
        }
    }
    list_node(p, NodeKind::DeclList, offset)
}

fn const_def<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let (name, name_id, name_range) = ident(p, sets::DEFINITION_OR_IDENT_OR_SEMICOLON);
    declare(p, name_id, name_range, SymbolKind::Const);
    p.match_token(T![=], sets::DEFINITION_OR_SEMICOLON);
    let value = expr(p, sets::DEFINITION_OR_SEMICOLON);
    p.match_token(T![;], sets::DEFINITION_OR_IDENT_OR_SEMICOLON);
    branch(p, NodeKind::ConstDef, &[name, value], start)
}

fn type_def<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let (name, name_id, name_range) = ident(p, sets::DEFINITION_OR_IDENT_OR_SEMICOLON);
    declare(p, name_id, name_range, SymbolKind::Type);
    // opaque types carry no `= type` part
    let ty = if p.eat(T![=]) { ty(p, sets::DEFINITION_OR_SEMICOLON) } else { Node::empty() };
    p.match_token(T![;], sets::DEFINITION_OR_IDENT_OR_SEMICOLON);
    branch(p, NodeKind::TypeDef, &[name, ty], start)
}

fn var_decl<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let names = ident_list_declared(p, sets::COMMA_OR_SEMICOLON, SymbolKind::Var);
    p.match_token(T![:], sets::TYPE_OR_COMMA_OR_OF);
    let ty = ty(p, sets::DEFINITION_OR_SEMICOLON);
    p.match_token(T![;], resync);
    branch(p, NodeKind::VarDecl, &[names, ty], start)
}

fn proc_def<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let (name, name_id, name_range) = ident(p, sets::DEFINITION_OR_IDENT_OR_SEMICOLON);
    declare(p, name_id, name_range, SymbolKind::Proc);
    let scope = name_id.unwrap_or(NameID::dummy());
    p.state.symbols.open_scope(scope);
    let params = formal_params(p);
    let ret = return_type(p);
    p.match_token(T![;], sets::DEFINITION_OR_IDENT_OR_SEMICOLON);
    let _ = p.state.symbols.close_scope(scope);
    branch(p, NodeKind::ProcDef, &[name, params, ret], start)
}

fn proc_decl<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let (name, name_id, name_range) = ident(p, sets::DECLARATION_OR_IDENT_OR_SEMICOLON);
    declare(p, name_id, name_range, SymbolKind::Proc);
    let scope = name_id.unwrap_or(NameID::dummy());
    p.state.symbols.open_scope(scope);
    let params = formal_params(p);
    let ret = return_type(p);
    p.match_token(T![;], sets::DECLARATION_OR_SEMICOLON);

    let body = block(p);
    end_ident(p, name_id, name_range, sets::DECLARATION_OR_IDENT_OR_SEMICOLON);
    p.match_token(T![;], sets::DECLARATION_OR_SEMICOLON);
    let _ = p.state.symbols.close_scope(scope);
    branch(p, NodeKind::Proc, &[name, params, ret, body], start)
}

fn module_decl<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let (name, name_id, name_range) = ident(p, sets::DECLARATION_OR_IDENT_OR_SEMICOLON);
    declare(p, name_id, name_range, SymbolKind::Module);
    let scope = name_id.unwrap_or(NameID::dummy());
    p.state.symbols.open_scope(scope);
    let priority = module_priority(p, sets::IMPORT_OR_BLOCK);
    p.match_token(T![;], sets::IMPORT_OR_BLOCK);

    let imports = import_list(p);
    let exports = export(p);
    let body = block(p);

    end_ident(p, name_id, name_range, sets::DECLARATION_OR_IDENT_OR_SEMICOLON);
    p.match_token(T![;], sets::DECLARATION_OR_SEMICOLON);
    let _ = p.state.symbols.close_scope(scope);
    branch(p, NodeKind::ModDecl, &[name, priority, imports, exports, body], start)
}

fn block<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let decls = declarations(p);
    let stmts = if p.eat(T![begin]) { stmt_seq_required(p) } else { Node::empty() };
    p.match_token(T![end], sets::IDENT_OR_SEMICOLON);
    branch(p, NodeKind::Block, &[decls, stmts], start)
}

//==================== FORMAL PARAMETERS ====================

fn formal_params<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    if !p.at(T!['(']) {
        return Node::empty();
    }
    p.bump();
    let offset = p.state.nodes.start();
    if !p.at(T![')']) {
        loop {
            let param = formal_param(p);
            push_node(p, param);
            if p.eat(T![;]) {
                if p.at(T![')']) {
                    let src = p.prev_src();
                    errant_semicolon(p, src);
                    break;
                }
                continue;
            }
            break;
        }
    }
    p.match_token(T![')'], sets::COLON_OR_SEMICOLON);
    list_node(p, NodeKind::FParamList, offset)
}

fn formal_param<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let (kind, symbol_kind) = if p.eat(T![var]) {
        (NodeKind::VarParam, SymbolKind::VarParam)
    } else {
        (NodeKind::ValParam, SymbolKind::ValueParam)
    };
    let names = ident_list_declared(p, sets::COLON_OR_SEMICOLON, symbol_kind);
    p.match_token(T![:], sets::COMMA_OR_RIGHT_PAREN);
    let ty = formal_type(p, sets::COMMA_OR_RIGHT_PAREN);
    branch(p, kind, &[names, ty], start)
}

fn formal_type<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    if p.eat(T![array]) {
        p.match_token(T![of], resync);
        let elem = qualident_node(p, resync);
        branch(p, NodeKind::OpenArray, &[elem], start)
    } else if p.at(T![ident]) {
        qualident_node(p, resync)
    } else {
        p.match_set(sets::FIRST_FORMAL_TYPE, resync);
        Node::empty()
    }
}

fn return_type<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    if p.eat(T![:]) {
        qualident_node(p, sets::DECLARATION_OR_SEMICOLON)
    } else {
        Node::empty()
    }
}

//==================== TYPES ====================

fn ty<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    match p.peek() {
        T![ident] | T!['['] | T!['('] => simple_ty(p, resync),
        T![set] => set_ty(p, resync),
        T![array] => array_ty(p, resync),
        T![record] => record_ty(p),
        T![pointer] => pointer_ty(p, resync),
        T![procedure] => proc_ty(p, resync),
        _ => {
            p.match_set(sets::FIRST_TYPE, resync);
            Node::empty()
        }
    }
}

/// Types permitted as array index types: named, subrange, enumeration.
fn simple_ty<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    match p.peek() {
        T![ident] => qualident_node(p, resync),
        T!['['] => {
            p.bump();
            let low = expr(p, resync);
            p.match_token(T![..], resync);
            let high = expr(p, resync);
            p.match_token(T![']'], resync);
            branch(p, NodeKind::Subrange, &[low, high], start)
        }
        T!['('] => {
            p.bump();
            let names = ident_list(p, sets::COMMA_OR_RIGHT_PAREN);
            p.match_token(T![')'], resync);
            branch(p, NodeKind::Enum, &[names], start)
        }
        _ => {
            p.match_set(sets::FIRST_TYPE, resync);
            Node::empty()
        }
    }
}

fn set_ty<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    p.match_token(T![of], resync);
    let base = simple_ty(p, resync);
    branch(p, NodeKind::Set, &[base], start)
}

fn array_ty<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    if p.eat(T![of]) {
        // `ARRAY OF T` open array form
        let elem = qualident_node(p, resync);
        return branch(p, NodeKind::OpenArray, &[elem], start);
    }
    let offset = p.state.nodes.start();
    loop {
        let index = simple_ty(p, sets::TYPE_OR_COMMA_OR_OF);
        push_node(p, index);
        if !p.eat(T![,]) {
            break;
        }
    }
    let indices = list_node(p, NodeKind::IndexList, offset);
    p.match_token(T![of], sets::TYPE_OR_COMMA_OR_OF);
    let elem = ty(p, resync);
    branch(p, NodeKind::Array, &[indices, elem], start)
}

fn pointer_ty<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    p.match_token(T![to], resync);
    let target = ty(p, resync);
    branch(p, NodeKind::Pointer, &[target], start)
}

fn proc_ty<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let params = if p.at(T!['(']) {
        p.bump();
        let offset = p.state.nodes.start();
        if !p.at(T![')']) {
            loop {
                let param = formal_ty_item(p);
                push_node(p, param);
                if !p.eat(T![,]) {
                    break;
                }
            }
        }
        p.match_token(T![')'], sets::COLON_OR_SEMICOLON);
        list_node(p, NodeKind::FTypeList, offset)
    } else {
        Node::empty()
    };
    let ret = if p.eat(T![:]) { qualident_node(p, resync) } else { Node::empty() };
    branch(p, NodeKind::ProcType, &[params, ret], start)
}

fn formal_ty_item<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    if p.eat(T![var]) {
        let ty = formal_type(p, sets::COMMA_OR_RIGHT_PAREN);
        branch(p, NodeKind::VarFType, &[ty], start)
    } else {
        formal_type(p, sets::COMMA_OR_RIGHT_PAREN)
    }
}

//==================== RECORDS ====================

fn record_ty<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let node = if p.config.variant_records {
        variant_record_ty(p, start)
    } else {
        extensible_record_ty(p, start)
    };
    p.match_token(T![end], sets::SEMICOLON_OR_END);
    node
}

fn variant_record_ty<'syn>(p: &mut Parser<'syn, '_, '_>, start: TextRange) -> &'syn Node<'syn> {
    let fields = field_list_seq(p, true);
    if fields.is_empty_node() {
        let src = p.make_src();
        err::syntax_empty_field_list_seq(&mut p.state.errw, src);
        return branch(p, NodeKind::Record, &[Node::empty()], start);
    }
    let has_variant = fields.children().iter().any(|field| field.kind() == NodeKind::Vrnt);
    let kind = if has_variant { NodeKind::VrntRec } else { NodeKind::Record };
    branch(p, kind, &[fields], start)
}

fn extensible_record_ty<'syn>(p: &mut Parser<'syn, '_, '_>, start: TextRange) -> &'syn Node<'syn> {
    let base = if p.eat(T!['(']) {
        let base = qualident_node(p, sets::COMMA_OR_RIGHT_PAREN);
        p.match_token(T![')'], sets::SEMICOLON_OR_END);
        Some(base)
    } else {
        None
    };
    let fields = field_list_seq(p, false);
    if fields.is_empty_node() && base.is_none() {
        let src = p.make_src();
        err::syntax_empty_field_list_seq(&mut p.state.errw, src);
        return branch(p, NodeKind::Record, &[Node::empty()], start);
    }
    match base {
        Some(base) => branch(p, NodeKind::ExtRec, &[base, fields], start),
        None => {
            let last_is_open = fields
                .children()
                .last()
                .and_then(|field| field.child(1))
                .map(|ty| ty.kind() == NodeKind::OpenArray)
                .unwrap_or(false);
            let kind = if last_is_open { NodeKind::VsRec } else { NodeKind::Record };
            branch(p, kind, &[fields], start)
        }
    }
}

fn field_list_seq<'syn>(p: &mut Parser<'syn, '_, '_>, variants: bool) -> &'syn Node<'syn> {
    let offset = p.state.nodes.start();
    loop {
        if p.at(T![ident]) {
            let field = field_list(p);
            push_node(p, field);
        } else if p.at(T![case]) {
            if variants {
                let variant = variant_part(p);
                push_node(p, variant);
            } else {
                p.match_set(sets::FIRST_FIELD, sets::SEMICOLON_OR_END);
            }
        } else {
            break;
        }
        if p.eat(T![;]) {
            let mut semi_src = p.prev_src();
            while p.eat(T![;]) {
                semi_src = p.prev_src();
            }
            if !p.at(T![ident]) && !p.at(T![case]) {
                errant_semicolon(p, semi_src);
                break;
            }
            continue;
        }
        break;
    }
    list_node(p, NodeKind::FieldListSeq, offset)
}

fn field_list<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let names = ident_list(p, sets::COLON_OR_SEMICOLON);
    p.match_token(T![:], sets::SEMICOLON_OR_END);
    // `ARRAY OF T` as the final field type marks a variable-size record
    let ty = ty(p, sets::SEMICOLON_OR_END);
    branch(p, NodeKind::FieldList, &[names, ty], start)
}

fn variant_part<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    // `CASE tag : type OF` vs the untagged `CASE : type OF` / `CASE type OF`
    let (tag, tag_ty) = variant_head(p);
    p.match_token(T![of], sets::SEMICOLON_OR_END);

    let offset = p.state.nodes.start();
    loop {
        if p.eat(T![|]) {
            continue;
        }
        if p.at(T![else]) || p.at(T![end]) || p.at(T![;]) || p.at(T![eof]) {
            break;
        }
        let arm = variant_fields(p);
        push_node(p, arm);
        if !p.eat(T![|]) {
            break;
        }
    }
    let arms = list_node(p, NodeKind::VrntList, offset);

    let else_fields = if p.eat(T![else]) { field_list_seq(p, true) } else { Node::empty() };
    p.match_token(T![end], sets::SEMICOLON_OR_END);
    branch(p, NodeKind::Vrnt, &[tag, tag_ty, arms, else_fields], start)
}

fn variant_head<'syn>(p: &mut Parser<'syn, '_, '_>) -> (&'syn Node<'syn>, &'syn Node<'syn>) {
    if p.eat(T![:]) {
        let ty = qualident_node(p, sets::SEMICOLON_OR_END);
        return (Node::empty(), ty);
    }
    if p.at(T![ident]) && p.peek_next() == T![:] {
        let (tag, _, _) = ident(p, sets::SEMICOLON_OR_END);
        p.bump();
        let ty = qualident_node(p, sets::SEMICOLON_OR_END);
        return (tag, ty);
    }
    let ty = qualident_node(p, sets::SEMICOLON_OR_END);
    (Node::empty(), ty)
}

fn variant_fields<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let labels = case_label_list(p);
    p.match_token(T![:], sets::SEMICOLON_OR_END);
    let fields = field_list_seq(p, true);
    branch(p, NodeKind::VrntFields, &[labels, fields], start)
}

//==================== STATEMENTS ====================

fn stmt_seq<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let offset = p.state.nodes.start();
    loop {
        if p.at_set(sets::FIRST_STATEMENT) {
            let stmt = statement(p);
            push_node(p, stmt);
        } else if p.at(T![;]) {
            // fall through to the separator handling below
        } else if p.at_set(sets::FOLLOW_STATEMENT) || p.at(T![eof]) {
            break;
        } else {
            p.match_set(sets::FIRST_STATEMENT, sets::FIRST_OR_FOLLOW_OF_STATEMENT);
            continue;
        }
        if p.eat(T![;]) {
            let mut semi_src = p.prev_src();
            while p.eat(T![;]) {
                semi_src = p.prev_src();
            }
            if !p.at_set(sets::FIRST_STATEMENT) {
                errant_semicolon(p, semi_src);
                break;
            }
            continue;
        }
        break;
    }
    list_node(p, NodeKind::StmtSeq, offset)
}

/// Statement sequence of a block-structured body, where an
/// empty sequence deserves a diagnostic. Case arms use the
/// plain `stmt_seq` since empty arms are conventional.
fn stmt_seq_required<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let stmts = stmt_seq(p);
    if stmts.is_empty_node() {
        let src = p.make_src();
        err::syntax_empty_stmt_seq(&mut p.state.errw, src);
    }
    stmts
}

fn statement<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    match p.peek() {
        T![ident] => assign_or_call(p),
        T![if] => if_stmt(p),
        T![case] => case_stmt(p),
        T![while] => while_stmt(p),
        T![repeat] => repeat_stmt(p),
        T![loop] => loop_stmt(p),
        T![for] => for_stmt(p),
        T![with] => with_stmt(p),
        T![exit] => {
            let start = p.peek_range();
            p.bump();
            branch(p, NodeKind::Exit, &[], start)
        }
        T![return] => {
            let start = p.peek_range();
            p.bump();
            let value = if p.at_set(sets::FIRST_EXPR) {
                expr(p, sets::FOLLOW_STATEMENT)
            } else {
                Node::empty()
            };
            branch(p, NodeKind::Return, &[value], start)
        }
        _ => {
            p.match_set(sets::FIRST_STATEMENT, sets::FIRST_OR_FOLLOW_OF_STATEMENT);
            Node::empty()
        }
    }
}

fn assign_or_call<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let target = designator(p, sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    if p.eat(T![:=]) {
        let value = expr(p, sets::FOLLOW_STATEMENT);
        branch(p, NodeKind::Assign, &[target, value], start)
    } else if p.at(T!['(']) {
        let args = actual_params(p);
        branch(p, NodeKind::PCall, &[target, args], start)
    } else {
        branch(p, NodeKind::PCall, &[target, Node::empty()], start)
    }
}

fn if_stmt<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let cond_resync = TokenSet::union(sets::ELSIF_OR_ELSE_OR_END, TokenSet::new(&[T![then]]));
    let cond = expr(p, cond_resync);
    p.match_token(T![then], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    let then_stmts = stmt_seq_required(p);

    let offset = p.state.nodes.start();
    while p.at(T![elsif]) {
        let elsif_start = p.peek_range();
        p.bump();
        let elsif_cond = expr(p, cond_resync);
        p.match_token(T![then], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
        let elsif_stmts = stmt_seq_required(p);
        let elsif = branch(p, NodeKind::Elsif, &[elsif_cond, elsif_stmts], elsif_start);
        push_node(p, elsif);
    }
    let elsifs = list_node(p, NodeKind::ElsifSeq, offset);

    let else_stmts = if p.eat(T![else]) { stmt_seq_required(p) } else { Node::empty() };
    p.match_token(T![end], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    branch(p, NodeKind::If, &[cond, then_stmts, elsifs, else_stmts], start)
}

fn case_stmt<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let select_resync = TokenSet::union(sets::ELSE_OR_END, TokenSet::new(&[T![of]]));
    let select = expr(p, select_resync);
    p.match_token(T![of], sets::FIRST_OR_FOLLOW_OF_STATEMENT);

    let offset = p.state.nodes.start();
    loop {
        if p.eat(T![|]) {
            continue;
        }
        if p.at(T![else]) || p.at(T![end]) || p.at(T![eof]) {
            break;
        }
        let arm = case_arm(p);
        push_node(p, arm);
        if !p.eat(T![|]) {
            break;
        }
    }
    let arms = list_node(p, NodeKind::CaseList, offset);

    let else_stmts = if p.eat(T![else]) { stmt_seq_required(p) } else { Node::empty() };
    p.match_token(T![end], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    branch(p, NodeKind::Switch, &[select, arms, else_stmts], start)
}

fn case_arm<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let labels = case_label_list(p);
    p.match_token(T![:], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    let stmts = stmt_seq(p);
    branch(p, NodeKind::Case, &[labels, stmts], start)
}

fn case_label_list<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let label_resync = TokenSet::new(&[T![,], T![:], T![|], T![else], T![end]]);
    let offset = p.state.nodes.start();
    loop {
        let label_start = p.peek_range();
        let low = expr(p, label_resync);
        let label = if p.eat(T![..]) {
            let high = expr(p, label_resync);
            branch(p, NodeKind::Range, &[low, high], label_start)
        } else {
            low
        };
        push_node(p, label);
        if !p.eat(T![,]) {
            break;
        }
    }
    list_node(p, NodeKind::CaseLabelList, offset)
}

fn while_stmt<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let cond_resync = TokenSet::union(sets::ELSE_OR_END, TokenSet::new(&[T![do]]));
    let cond = expr(p, cond_resync);
    p.match_token(T![do], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    let body = stmt_seq_required(p);
    p.match_token(T![end], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    branch(p, NodeKind::While, &[cond, body], start)
}

fn repeat_stmt<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let body = stmt_seq_required(p);
    p.match_token(T![until], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    let cond = expr(p, sets::FOLLOW_STATEMENT);
    branch(p, NodeKind::Repeat, &[body, cond], start)
}

fn loop_stmt<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let body = stmt_seq_required(p);
    p.match_token(T![end], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    branch(p, NodeKind::Loop, &[body], start)
}

fn for_stmt<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let (control, _, _) = ident(p, sets::FOR_LOOP_BODY);
    p.match_token(T![:=], sets::FOR_LOOP_BODY);
    let from = expr(p, sets::FOR_LOOP_BODY);
    p.match_token(T![to], sets::FOR_LOOP_BODY);
    let to = expr(p, sets::FOR_LOOP_BODY);
    let by = if p.eat(T![by]) { expr(p, sets::FOR_LOOP_BODY) } else { Node::empty() };
    p.match_token(T![do], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    let body = stmt_seq_required(p);
    p.match_token(T![end], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    branch(p, NodeKind::ForTo, &[control, from, to, by, body], start)
}

fn with_stmt<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let start = p.peek_range();
    p.bump();
    let target_resync = TokenSet::union(sets::ELSE_OR_END, TokenSet::new(&[T![do]]));
    let target = designator(p, target_resync);
    p.match_token(T![do], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    let body = stmt_seq_required(p);
    p.match_token(T![end], sets::FIRST_OR_FOLLOW_OF_STATEMENT);
    branch(p, NodeKind::With, &[target, body], start)
}

//==================== EXPRESSIONS ====================

fn expr<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let lhs = simple_expr(p, resync);
    if p.at_set(sets::RELATION_OPS) {
        let op = p.peek().as_bin_op();
        p.bump();
        let rhs = simple_expr(p, resync);
        if let Some(kind) = op {
            return branch(p, kind, &[lhs, rhs], start);
        }
    }
    lhs
}

fn simple_expr<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let negated = if p.eat(T![-]) {
        true
    } else {
        p.eat(T![+]);
        false
    };
    let mut lhs = term(p, resync);
    if negated {
        lhs = branch(p, NodeKind::Neg, &[lhs], start);
    }
    while p.at_set(sets::ADD_OPS) {
        let op = p.peek().as_bin_op();
        p.bump();
        let rhs = term(p, resync);
        if let Some(kind) = op {
            lhs = branch(p, kind, &[lhs, rhs], start);
        }
    }
    lhs
}

fn term<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let mut lhs = factor(p, resync);
    while p.at_set(sets::MUL_OPS) {
        let op = p.peek().as_bin_op();
        p.bump();
        let rhs = factor(p, resync);
        if let Some(kind) = op {
            lhs = branch(p, kind, &[lhs, rhs], start);
        }
    }
    lhs
}

fn factor<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    match p.peek() {
        T![int_lit] => literal(p, NodeKind::IntVal),
        T![real_lit] => literal(p, NodeKind::RealVal),
        T![char_lit] => literal(p, NodeKind::ChrVal),
        T![string_lit] => quoted_literal(p),
        T!['('] => {
            p.bump();
            let inner = expr(p, resync);
            p.match_token(T![')'], resync);
            inner
        }
        T![not] => {
            p.bump();
            let operand = factor(p, resync);
            branch(p, NodeKind::Not, &[operand], start)
        }
        T!['{'] => set_value(p, Node::empty(), start),
        T![ident] => {
            let target = designator(p, resync);
            if p.at(T!['{'])
                && matches!(target.kind(), NodeKind::Ident | NodeKind::Qualident)
            {
                set_value(p, target, start)
            } else if p.at(T!['(']) {
                let args = actual_params(p);
                branch(p, NodeKind::FCall, &[target, args], start)
            } else {
                target
            }
        }
        _ => {
            p.match_set(sets::FIRST_EXPR, resync);
            Node::empty()
        }
    }
}

fn literal<'syn>(p: &mut Parser<'syn, '_, '_>, kind: NodeKind) -> &'syn Node<'syn> {
    let value = p.lexeme_id();
    p.bump();
    terminal(p, kind, value)
}

/// The stored value drops the surrounding quotes, the tree
/// writers put them back.
fn quoted_literal<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    let range = p.peek_range();
    let lexeme = p.lexeme_str(range);
    let content = if lexeme.len() >= 2 { &lexeme[1..lexeme.len() - 1] } else { lexeme };
    let value = p.state.intern.intern(content);
    p.bump();
    terminal(p, NodeKind::QuotedVal, value)
}

fn set_value<'syn>(
    p: &mut Parser<'syn, '_, '_>,
    set_ty: &'syn Node<'syn>,
    start: TextRange,
) -> &'syn Node<'syn> {
    p.bump();
    let elems = if p.at(T!['}']) {
        Node::empty()
    } else {
        let elem_resync = TokenSet::new(&[T![,], T!['}']]);
        expr_list(p, elem_resync, true)
    };
    p.match_token(T!['}'], sets::FOLLOW_STATEMENT);
    branch(p, NodeKind::SetVal, &[set_ty, elems], start)
}

fn designator<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    let start = p.peek_range();
    let mut node = qualident_node(p, resync);
    loop {
        if p.eat(T![^]) {
            node = branch(p, NodeKind::Deref, &[node], start);
        } else if p.at(T!['[']) {
            p.bump();
            let index_resync = TokenSet::new(&[T![,], T![']']]);
            let indices = expr_list(p, index_resync, false);
            p.match_token(T![']'], resync);
            node = branch(p, NodeKind::Index, &[node, indices], start);
        } else if p.at(T![.]) && p.peek_next() == T![ident] {
            p.bump();
            let (field, _, _) = ident(p, resync);
            node = branch(p, NodeKind::FieldSel, &[node, field], start);
        } else {
            break;
        }
    }
    node
}

fn actual_params<'syn>(p: &mut Parser<'syn, '_, '_>) -> &'syn Node<'syn> {
    p.bump();
    let args = if p.at(T![')']) {
        Node::empty()
    } else {
        let arg_resync = TokenSet::new(&[T![,], T![')']]);
        expr_list(p, arg_resync, false)
    };
    p.match_token(T![')'], sets::FOLLOW_STATEMENT);
    args
}

fn expr_list<'syn>(
    p: &mut Parser<'syn, '_, '_>,
    resync: TokenSet,
    with_ranges: bool,
) -> &'syn Node<'syn> {
    let offset = p.state.nodes.start();
    loop {
        let elem_start = p.peek_range();
        let elem = expr(p, resync);
        let elem = if with_ranges && p.eat(T![..]) {
            let high = expr(p, resync);
            branch(p, NodeKind::Range, &[elem, high], elem_start)
        } else {
            elem
        };
        push_node(p, elem);
        if !p.eat(T![,]) {
            break;
        }
    }
    list_node(p, NodeKind::ExprList, offset)
}

//==================== IDENTIFIERS ====================

fn ident<'syn>(
    p: &mut Parser<'syn, '_, '_>,
    resync: TokenSet,
) -> (&'syn Node<'syn>, Option<NameID>, TextRange) {
    let range = p.peek_range();
    if p.at(T![ident]) {
        let id = p.lexeme_id();
        p.bump();
        let node = terminal(p, NodeKind::Ident, id);
        (node, Some(id), range)
    } else {
        p.match_token(T![ident], resync);
        (Node::empty(), None, range)
    }
}

fn qualident_node<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    if !p.at(T![ident]) {
        p.match_set(TokenSet::new(&[T![ident]]), resync);
        return Node::empty();
    }
    let first = p.lexeme_id();
    p.bump();
    if !(p.at(T![.]) && p.peek_next() == T![ident]) {
        return terminal(p, NodeKind::Ident, first);
    }
    let offset = p.state.names.start();
    p.state.names.push(first);
    while p.at(T![.]) && p.peek_next() == T![ident] {
        p.bump();
        let id = p.lexeme_id();
        p.state.names.push(id);
        p.bump();
    }
    let state = &mut *p.state;
    let node =
        Node::terminal_list(&mut state.arena, NodeKind::Qualident, state.names.view(&offset));
    state.names.pop_view(offset);
    node.unwrap_or(Node::empty())
}

/// Comma-separated identifier list with duplicate detection.
fn ident_list<'syn>(p: &mut Parser<'syn, '_, '_>, resync: TokenSet) -> &'syn Node<'syn> {
    ident_list_impl(p, resync, None)
}

/// Identifier list whose names are also entered into the
/// current scope (VAR declarations, formal parameters).
fn ident_list_declared<'syn>(
    p: &mut Parser<'syn, '_, '_>,
    resync: TokenSet,
    kind: SymbolKind,
) -> &'syn Node<'syn> {
    ident_list_impl(p, resync, Some(kind))
}

fn ident_list_impl<'syn>(
    p: &mut Parser<'syn, '_, '_>,
    resync: TokenSet,
    declare_as: Option<SymbolKind>,
) -> &'syn Node<'syn> {
    let names_offset = p.state.names.start();
    let ranges_offset = p.state.ranges.start();
    loop {
        if p.at(T![ident]) {
            let range = p.peek_range();
            let id = p.lexeme_id();
            let src = p.src_of(range);
            let state = &mut *p.state;
            if state.names.push_unique(&names_offset, id) {
                state.ranges.push(range);
            } else {
                let first = state
                    .names
                    .view(&names_offset)
                    .iter()
                    .position(|&name| name == id)
                    .map(|index| state.ranges.view(&ranges_offset)[index]);
                if let Some(first_range) = first {
                    let first_src = SourceRange::new(p.module_id(), first_range);
                    let name = p.state.intern.get(id);
                    err::syntax_duplicate_ident(&mut p.state.errw, src, first_src, name);
                }
            }
            if let Some(kind) = declare_as {
                declare(p, Some(id), range, kind);
            }
            p.bump();
        } else {
            p.match_token(T![ident], resync);
            if !p.at(T![,]) {
                break;
            }
        }
        if !p.eat(T![,]) {
            break;
        }
    }
    let state = &mut *p.state;
    let node =
        Node::terminal_list(&mut state.arena, NodeKind::IdentList, state.names.view(&names_offset));
    state.names.pop_view(names_offset);
    state.ranges.pop_view(ranges_offset);
    node.unwrap_or(Node::empty())
}

fn end_ident(
    p: &mut Parser<'_, '_, '_>,
    head: Option<NameID>,
    head_range: TextRange,
    resync: TokenSet,
) {
    if !p.at(T![ident]) {
        p.match_token(T![ident], resync);
        return;
    }
    let range = p.peek_range();
    let id = p.lexeme_id();
    p.bump();
    if let Some(head_id) = head {
        if head_id != id {
            let end_src = p.src_of(range);
            let head_src = p.src_of(head_range);
            let head_name = p.state.intern.get(head_id);
            let end_name = p.state.intern.get(id);
            err::syntax_end_ident_mismatch(
                &mut p.state.errw,
                end_src,
                head_src,
                head_name,
                end_name,
            );
        }
    }
}

//==================== NODE BUILDING ====================

fn branch<'syn>(
    p: &mut Parser<'syn, '_, '_>,
    kind: NodeKind,
    children: &[&'syn Node<'syn>],
    at: TextRange,
) -> &'syn Node<'syn> {
    match Node::branch(&mut p.state.arena, kind, children) {
        Some(node) => node,
        None => {
            // recovery already produced an error when a slot holds `(EMPTY)`
            if !children.iter().any(|child| child.is_empty_node()) {
                let src = p.src_of(at);
                err::syntax_malformed_construct(&mut p.state.errw, src, kind.as_str());
            }
            Node::empty()
        }
    }
}

fn terminal<'syn>(p: &mut Parser<'syn, '_, '_>, kind: NodeKind, value: NameID) -> &'syn Node<'syn> {
    Node::terminal(&mut p.state.arena, kind, value).unwrap_or(Node::empty())
}

fn list_node<'syn>(
    p: &mut Parser<'syn, '_, '_>,
    kind: NodeKind,
    offset: crate::support::TempOffset<&'syn Node<'syn>>,
) -> &'syn Node<'syn> {
    let state = &mut *p.state;
    let node = Node::branch(&mut state.arena, kind, state.nodes.view(&offset));
    state.nodes.pop_view(offset);
    node.unwrap_or(Node::empty())
}

fn push_node<'syn>(p: &mut Parser<'syn, '_, '_>, node: &'syn Node<'syn>) {
    if !node.is_empty_node() {
        p.state.nodes.push(node);
    }
}

fn declare(p: &mut Parser<'_, '_, '_>, id: Option<NameID>, range: TextRange, kind: SymbolKind) {
    let Some(id) = id else {
        return;
    };
    let src = p.src_of(range);
    match p.state.symbols.insert(id, kind, src) {
        Ok(()) => {}
        Err((SymbolError::IdentNotUnique, existing)) => {
            let existing_src = existing.map(|symbol| symbol.src).unwrap_or(src);
            let name = p.state.intern.get(id);
            err::syntax_name_redefined(&mut p.state.errw, src, existing_src, name);
        }
        Err(_) => {}
    }
}

fn errant_semicolon(p: &mut Parser<'_, '_, '_>, src: SourceRange) {
    if p.config.errant_semicolon {
        err::syntax_errant_semicolon(&mut p.state.errw, src);
    } else {
        err::syntax_errant_semicolon_error(&mut p.state.errw, src);
    }
}
