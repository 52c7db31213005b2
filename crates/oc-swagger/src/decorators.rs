use oc_core::SynthesisError;
use swc_common::{BytePos, Span};
use swc_ecma_ast::*;

/// Name a decorator is matched by: the last segment of its callee, so
/// `@ApiProperty()` and `@openapi.ApiProperty()` both yield `ApiProperty`
pub fn decorator_name(decorator: &Decorator) -> Option<&str> {
    callee_name(decorator.expr.as_ref())
}

fn callee_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.as_ref()),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(ident) => Some(ident.sym.as_ref()),
            _ => None,
        },
        Expr::Call(call) => match &call.callee {
            Callee::Expr(callee) => callee_name(callee),
            _ => None,
        },
        Expr::Paren(paren) => callee_name(&paren.expr),
        _ => None,
    }
}

/// Index of the first decorator whose name is one of `names`
pub fn find_decorator(decorators: &[Decorator], names: &[&str]) -> Option<usize> {
    decorators.iter().position(|decorator| {
        decorator_name(decorator).is_some_and(|name| names.contains(&name))
    })
}

/// Object literal passed as the first argument of a decorator call.
///
/// `Ok(None)` for a call without arguments.
pub fn decorator_options(decorator: &Decorator) -> Result<Option<&ObjectLit>, SynthesisError> {
    let name = decorator_name(decorator).unwrap_or_default();
    let Expr::Call(call) = decorator.expr.as_ref() else {
        return Err(SynthesisError::BareDecorator {
            decorator: name.to_string(),
        });
    };
    match call.args.first() {
        None => Ok(None),
        Some(arg) => match arg.expr.as_ref() {
            Expr::Object(object) if arg.spread.is_none() => Ok(Some(object)),
            _ => Err(SynthesisError::NonObjectArgument {
                decorator: name.to_string(),
            }),
        },
    }
}

/// Start of a declaration: the smallest real position among its own span
/// and the spans of its decorators
pub fn declaration_start(span: Span, decorators: &[Decorator]) -> Option<BytePos> {
    std::iter::once(span)
        .chain(decorators.iter().map(|decorator| decorator.span))
        .filter(|span| !span.is_dummy())
        .map(|span| span.lo)
        .min()
}

/// Text of a property name; `None` for computed names
pub fn prop_name_text(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(ident) => Some(ident.sym.as_ref().to_string()),
        PropName::Str(str) => str.value.as_str().map(str::to_string),
        PropName::Num(num) => Some(num.value.to_string()),
        _ => None,
    }
}

/// Key of an object literal entry; `None` for spreads and computed keys
pub fn prop_key(prop: &PropOrSpread) -> Option<String> {
    let PropOrSpread::Prop(prop) = prop else {
        return None;
    };
    match prop.as_ref() {
        Prop::KeyValue(kv) => prop_name_text(&kv.key),
        Prop::Shorthand(ident) => Some(ident.sym.as_ref().to_string()),
        Prop::Method(method) => prop_name_text(&method.key),
        Prop::Getter(getter) => prop_name_text(&getter.key),
        Prop::Setter(setter) => prop_name_text(&setter.key),
        _ => None,
    }
}

/// Whether an object literal already has an entry named `key`
pub fn has_property_key(props: &[PropOrSpread], key: &str) -> bool {
    props
        .iter()
        .any(|prop| prop_key(prop).is_some_and(|name| name == key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_core::parsers::{ParsedFile, TypeScriptParser};

    fn parse(source: &str) -> ParsedFile {
        TypeScriptParser::new()
            .parse_source(source, "sample.dto.ts")
            .unwrap()
    }

    fn first_class_props(file: &ParsedFile) -> Vec<&ClassProp> {
        let ModuleItem::Stmt(Stmt::Decl(Decl::Class(class_decl))) = &file.module.body[0] else {
            panic!("expected a class declaration");
        };
        class_decl
            .class
            .body
            .iter()
            .filter_map(|member| match member {
                ClassMember::ClassProp(prop) => Some(prop),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_find_decorator_by_plain_and_qualified_name() {
        let file = parse(
            r#"
class UserDto {
  @IsString()
  @openapi.ApiProperty({ description: 'x' })
  name: string;

  @ApiHideProperty()
  secret: string;
}
"#,
        );
        let props = first_class_props(&file);

        assert_eq!(
            find_decorator(&props[0].decorators, &["ApiProperty", "ApiPropertyOptional"]),
            Some(1)
        );
        assert_eq!(decorator_name(&props[0].decorators[0]), Some("IsString"));
        assert_eq!(find_decorator(&props[1].decorators, &["ApiHideProperty"]), Some(0));
        assert_eq!(find_decorator(&props[1].decorators, &["ApiProperty"]), None);
    }

    #[test]
    fn test_decorator_options_shapes() {
        let file = parse(
            r#"
class UserDto {
  @ApiProperty({ description: 'x', 'example': 1 })
  a: string;

  @ApiProperty()
  b: string;

  @ApiProperty(options)
  c: string;

  @ApiProperty
  d: string;
}
"#,
        );
        let props = first_class_props(&file);

        let options = decorator_options(&props[0].decorators[0]).unwrap().unwrap();
        assert!(has_property_key(&options.props, "description"));
        assert!(has_property_key(&options.props, "example"));
        assert!(!has_property_key(&options.props, "examples"));

        assert!(decorator_options(&props[1].decorators[0]).unwrap().is_none());
        assert_eq!(
            decorator_options(&props[2].decorators[0]),
            Err(SynthesisError::NonObjectArgument {
                decorator: "ApiProperty".to_string()
            })
        );
        assert_eq!(
            decorator_options(&props[3].decorators[0]),
            Err(SynthesisError::BareDecorator {
                decorator: "ApiProperty".to_string()
            })
        );
    }

    #[test]
    fn test_prop_name_text_variants() {
        let file = parse(
            r#"
class UserDto {
  plain: string;
  'first-name': string;
  42: string;
  [computed]: string;
}
"#,
        );
        let names: Vec<Option<String>> = first_class_props(&file)
            .iter()
            .map(|prop| prop_name_text(&prop.key))
            .collect();
        assert_eq!(
            names,
            vec![
                Some("plain".to_string()),
                Some("first-name".to_string()),
                Some("42".to_string()),
                None
            ]
        );
    }

    #[test]
    fn test_declaration_start_skips_dummy_spans() {
        let real = Span::new(BytePos(10), BytePos(20));
        let decorator = Decorator {
            span: Span::new(BytePos(4), BytePos(9)),
            expr: Box::new(Expr::Ident(Ident::new_no_ctxt("Dec".into(), Span::default()))),
        };
        assert_eq!(declaration_start(real, &[decorator.clone()]), Some(BytePos(4)));

        let synthesized = Decorator {
            span: Span::default(),
            ..decorator
        };
        assert_eq!(declaration_start(real, &[synthesized]), Some(BytePos(10)));
        assert_eq!(declaration_start(Span::default(), &[]), None);
    }
}
