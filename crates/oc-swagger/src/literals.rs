//! Builders for the synthesized syntax: string and array literals, option
//! objects, namespace-qualified decorator calls and the static accessor.

use swc_common::{SyntaxContext, DUMMY_SP};
use swc_ecma_ast::*;

pub fn str_lit(value: &str) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    })))
}

pub fn string_array(values: &[String]) -> Box<Expr> {
    Box::new(Expr::Array(ArrayLit {
        span: DUMMY_SP,
        elems: values
            .iter()
            .map(|value| {
                Some(ExprOrSpread {
                    spread: None,
                    expr: str_lit(value),
                })
            })
            .collect(),
    }))
}

/// Whether `name` can be written as a bare property key
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Property key: an identifier when possible, otherwise a string literal
pub fn prop_name(key: &str) -> PropName {
    if is_identifier(key) {
        PropName::Ident(IdentName::new(key.into(), DUMMY_SP))
    } else {
        PropName::Str(Str {
            span: DUMMY_SP,
            value: key.into(),
            raw: None,
        })
    }
}

pub fn key_value(key: &str, value: Box<Expr>) -> PropOrSpread {
    PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
        key: prop_name(key),
        value,
    })))
}

pub fn object_lit(props: Vec<PropOrSpread>) -> ObjectLit {
    ObjectLit {
        span: DUMMY_SP,
        props,
    }
}

/// `namespace.name(args)`
pub fn namespaced_call(namespace: &str, name: &str, args: Vec<ExprOrSpread>) -> Box<Expr> {
    let callee = Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(Expr::Ident(Ident::new_no_ctxt(namespace.into(), DUMMY_SP))),
        prop: MemberProp::Ident(IdentName::new(name.into(), DUMMY_SP)),
    });
    Box::new(Expr::Call(CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: Callee::Expr(Box::new(callee)),
        args,
        type_args: None,
    }))
}

/// `@namespace.name({ ...options })`
pub fn options_decorator(namespace: &str, name: &str, options: ObjectLit) -> Decorator {
    Decorator {
        span: DUMMY_SP,
        expr: namespaced_call(
            namespace,
            name,
            vec![ExprOrSpread {
                spread: None,
                expr: Box::new(Expr::Object(options)),
            }],
        ),
    }
}

/// `static name() { return <object>; }`
pub fn static_object_method(name: &str, object: ObjectLit) -> ClassMember {
    let body = BlockStmt {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        stmts: vec![Stmt::Return(ReturnStmt {
            span: DUMMY_SP,
            arg: Some(Box::new(Expr::Object(object))),
        })],
    };
    ClassMember::Method(ClassMethod {
        span: DUMMY_SP,
        key: prop_name(name),
        function: Box::new(Function {
            params: Vec::new(),
            decorators: Vec::new(),
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            body: Some(body),
            is_generator: false,
            is_async: false,
            type_params: None,
            return_type: None,
        }),
        kind: MethodKind::Method,
        is_static: true,
        accessibility: None,
        is_abstract: false,
        is_optional: false,
        is_override: false,
    })
}

/// `import alias = require("module")`
pub fn import_equals(alias: &str, module: &str) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(Box::new(TsImportEqualsDecl {
        span: DUMMY_SP,
        is_export: false,
        is_type_only: false,
        id: Ident::new_no_ctxt(alias.into(), DUMMY_SP),
        module_ref: TsModuleRef::TsExternalModuleRef(TsExternalModuleRef {
            span: DUMMY_SP,
            expr: Str {
                span: DUMMY_SP,
                value: module.into(),
                raw: None,
            },
        }),
    })))
}

/// Value of a string literal expression
pub fn string_value(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(Lit::Str(str)) => str.value.as_str().map(str::to_string),
        _ => None,
    }
}
