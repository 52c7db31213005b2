use crate::accumulator::{ClassMetadata, MetadataAccumulator, Registration};
use crate::constants::*;
use crate::decorators::{
    declaration_start, decorator_name, decorator_options, find_decorator, has_property_key,
    prop_key, prop_name_text,
};
use crate::literals::{key_value, object_lit, static_object_method, str_lit, string_array};
use crate::walker::{
    ClassDeclaration, DeclarationKind, FileContext, PropertyDeclaration, Synthesizer,
};
use oc_core::models::{Change, Severity};
use oc_core::SynthesisError;
use swc_ecma_ast::*;

/// Metadata synthesized for one property
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedProperty {
    /// Existing decorator options followed by the entries taken from the comment
    pub literal: ObjectLit,
    /// Description added from the comment
    pub description: Option<String>,
    /// Examples added from the comment
    pub examples: Vec<String>,
}

/// Outcome of inspecting one property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyOutcome {
    Synthesized(SynthesizedProperty),
    /// Nothing to register
    Empty,
    /// The property is left unmodified
    Failed(SynthesisError),
}

/// Moves property documentation of model classes (DTOs, entities) into a
/// static `_OPENAPI_METADATA_FACTORY` accessor
pub struct ModelClassSynthesizer<'a> {
    accumulator: &'a mut MetadataAccumulator,
}

impl<'a> ModelClassSynthesizer<'a> {
    pub fn new(accumulator: &'a mut MetadataAccumulator) -> Self {
        Self { accumulator }
    }

    /// Computes the metadata of a property without touching it.
    ///
    /// `existing` holds the options of its metadata decorator, if any.
    pub fn inspect(
        &self,
        property: &ClassProp,
        existing: Vec<PropOrSpread>,
        cx: &FileContext<'_>,
    ) -> PropertyOutcome {
        let Some(start) = declaration_start(property.span, &property.decorators) else {
            return PropertyOutcome::Failed(SynthesisError::NoSourcePosition);
        };
        let extracted = match cx.comments.extract(start, true) {
            Ok(extracted) => extracted,
            Err(err) => return PropertyOutcome::Failed(err),
        };

        let mut props = existing;
        let description = extracted
            .description
            .filter(|_| !has_property_key(&props, DESCRIPTION_KEY));
        let examples = if has_property_key(&props, EXAMPLE_KEY)
            || has_property_key(&props, EXAMPLES_KEY)
        {
            Vec::new()
        } else {
            extracted.examples
        };

        if let Some(description) = &description {
            props.push(key_value(DESCRIPTION_KEY, str_lit(description)));
        }
        match examples.as_slice() {
            [] => {}
            [single] => props.push(key_value(EXAMPLE_KEY, str_lit(single))),
            many => props.push(key_value(EXAMPLES_KEY, string_array(many))),
        }

        if props.is_empty() {
            return PropertyOutcome::Empty;
        }
        PropertyOutcome::Synthesized(SynthesizedProperty {
            literal: object_lit(props),
            description,
            examples,
        })
    }

    fn flush(&mut self, name: &str, mut class: Box<Class>, cx: &mut FileContext<'_>) -> Box<Class> {
        let Some(flushed) = self.accumulator.take(name, cx.file_name()) else {
            return class;
        };
        let class_pos = Some(class.span.lo).filter(|_| !class.span.is_dummy());
        if let Some(previous) = &flushed.collision {
            cx.diagnose(
                Severity::Warning,
                class_pos,
                Some(name),
                None,
                format!(
                    "class name `{}` was already flushed from {}; \
                     metadata of same-named classes shares one entry",
                    name, previous
                ),
            );
        }

        match find_metadata_factory(&class.body) {
            Some(idx) => {
                if let ClassMember::Method(method) = &mut class.body[idx] {
                    merge_into_factory(name, method, flushed.metadata, cx);
                }
            }
            None => {
                let properties: Vec<String> = flushed.metadata.keys().cloned().collect();
                let entries = flushed
                    .metadata
                    .into_iter()
                    .map(|(property, literal)| {
                        key_value(&property, Box::new(Expr::Object(literal)))
                    })
                    .collect();
                class
                    .body
                    .push(static_object_method(METADATA_FACTORY_NAME, object_lit(entries)));
                tracing::debug!(
                    file = %cx.file_name(),
                    class = %name,
                    properties = properties.len(),
                    "Generated metadata accessor"
                );
                cx.record(Change::AccessorGenerated {
                    class: name.to_string(),
                    properties,
                });
            }
        }
        class
    }
}

impl Synthesizer for ModelClassSynthesizer<'_> {
    fn handles(&self, kind: DeclarationKind) -> bool {
        matches!(kind, DeclarationKind::Class | DeclarationKind::Property)
    }

    fn visit_property(
        &mut self,
        decl: PropertyDeclaration,
        cx: &mut FileContext<'_>,
    ) -> PropertyDeclaration {
        let PropertyDeclaration { host, mut property } = decl;
        if find_decorator(&property.decorators, &[API_HIDE_PROPERTY]).is_some() {
            return PropertyDeclaration { host, property };
        }

        let name = prop_name_text(&property.key);
        let pos = declaration_start(property.span, &property.decorators);
        let metadata_decorator =
            find_decorator(&property.decorators, &[API_PROPERTY, API_PROPERTY_OPTIONAL]);

        let options = metadata_decorator.map(|idx| decorator_options(&property.decorators[idx]));
        let existing = match options {
            None | Some(Ok(None)) => Ok(Vec::new()),
            Some(Ok(Some(options))) => Ok(options.props.clone()),
            Some(Err(err)) => Err(err),
        };
        let existing = match existing {
            Ok(existing) => existing,
            Err(err) => {
                cx.diagnose(
                    Severity::Warning,
                    pos,
                    host.as_deref(),
                    name.as_deref(),
                    err.to_string(),
                );
                return PropertyDeclaration { host, property };
            }
        };
        if property.is_static {
            if let Some(idx) = metadata_decorator {
                migrate_decorator(&mut property, idx, &host, &name, cx);
            }
            return PropertyDeclaration { host, property };
        }

        let outcome = match (&host, &name) {
            (Some(_), Some(_)) => self.inspect(&property, existing, cx),
            _ => PropertyOutcome::Empty,
        };
        if let PropertyOutcome::Failed(err) = &outcome {
            cx.diagnose(Severity::Warning, pos, host.as_deref(), name.as_deref(), err.to_string());
            return PropertyDeclaration { host, property };
        }

        if let Some(idx) = metadata_decorator {
            migrate_decorator(&mut property, idx, &host, &name, cx);
        }

        if let (PropertyOutcome::Synthesized(synthesized), Some(class), Some(property_name)) =
            (outcome, &host, &name)
        {
            let registration = self
                .accumulator
                .register(class, property_name, synthesized.literal);
            if registration == Registration::Replaced {
                cx.diagnose(
                    Severity::Info,
                    pos,
                    Some(class.as_str()),
                    Some(property_name.as_str()),
                    "property registered twice in this run; \
                     the later metadata replaces the earlier",
                );
            }
            cx.record(Change::PropertyDocumented {
                class: class.clone(),
                property: property_name.clone(),
                description: synthesized.description,
                examples: synthesized.examples,
            });
        }
        PropertyDeclaration { host, property }
    }

    fn visit_class(
        &mut self,
        decl: ClassDeclaration,
        cx: &mut FileContext<'_>,
    ) -> ClassDeclaration {
        let ClassDeclaration { name, class } = decl;
        let class = match &name {
            Some(name) => self.flush(name, class, cx),
            None => class,
        };
        ClassDeclaration { name, class }
    }
}

/// Drops the metadata decorator; its options live on in the accessor
fn migrate_decorator(
    property: &mut ClassProp,
    idx: usize,
    host: &Option<String>,
    name: &Option<String>,
    cx: &mut FileContext<'_>,
) {
    let removed = property.decorators.remove(idx);
    cx.record(Change::DecoratorMigrated {
        class: host.clone(),
        property: name.clone().unwrap_or_default(),
        decorator: decorator_name(&removed).unwrap_or(API_PROPERTY).to_string(),
    });
}

fn find_metadata_factory(members: &[ClassMember]) -> Option<usize> {
    members.iter().position(|member| match member {
        ClassMember::Method(method) => {
            method.is_static
                && matches!(method.kind, MethodKind::Method)
                && prop_name_text(&method.key).as_deref() == Some(METADATA_FACTORY_NAME)
        }
        _ => false,
    })
}

/// Object literal returned by the last `return` of an accessor
fn returned_object(function: &mut Function) -> Option<&mut ObjectLit> {
    let ret = function
        .body
        .as_mut()?
        .stmts
        .iter_mut()
        .rev()
        .find_map(|stmt| match stmt {
            Stmt::Return(ret) => Some(ret),
            _ => None,
        })?;
    match ret.arg.as_deref_mut()? {
        Expr::Object(object) => Some(object),
        Expr::Paren(paren) => match paren.expr.as_mut() {
            Expr::Object(object) => Some(object),
            _ => None,
        },
        _ => None,
    }
}

/// Adds accumulated metadata to an existing accessor; existing entries win
fn merge_into_factory(
    class: &str,
    method: &mut ClassMethod,
    metadata: ClassMetadata,
    cx: &mut FileContext<'_>,
) {
    let pos = Some(method.span.lo).filter(|_| !method.span.is_dummy());
    let Some(object) = returned_object(&mut method.function) else {
        let err = SynthesisError::AccessorNotObject {
            method: METADATA_FACTORY_NAME.to_string(),
        };
        cx.diagnose(Severity::Warning, pos, Some(class), None, err.to_string());
        return;
    };

    let mut added = Vec::new();
    let mut extended = Vec::new();
    for (property, literal) in metadata {
        let current = object.props.iter_mut().find_map(|prop| match prop {
            PropOrSpread::Prop(prop) => match prop.as_mut() {
                Prop::KeyValue(kv)
                    if prop_name_text(&kv.key).as_deref() == Some(property.as_str()) =>
                {
                    Some(kv)
                }
                _ => None,
            },
            PropOrSpread::Spread(_) => None,
        });
        match current {
            Some(kv) => match kv.value.as_mut() {
                Expr::Object(current) => {
                    let missing: Vec<PropOrSpread> = literal
                        .props
                        .into_iter()
                        .filter(|prop| {
                            prop_key(prop)
                                .is_some_and(|key| !has_property_key(&current.props, &key))
                        })
                        .collect();
                    if !missing.is_empty() {
                        current.props.extend(missing);
                        extended.push(property);
                    }
                }
                _ => cx.diagnose(
                    Severity::Info,
                    pos,
                    Some(class),
                    Some(&property),
                    "accessor entry is not an object literal; left unchanged",
                ),
            },
            None => {
                object
                    .props
                    .push(key_value(&property, Box::new(Expr::Object(literal))));
                added.push(property);
            }
        }
    }

    if added.is_empty() && extended.is_empty() {
        return;
    }
    tracing::debug!(
        file = %cx.file_name(),
        class = %class,
        added = added.len(),
        extended = extended.len(),
        "Merged into existing metadata accessor"
    );
    cx.record(Change::AccessorMerged {
        class: class.to_string(),
        added,
        extended,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literals::string_value;
    use crate::walker::TreeWalker;
    use oc_core::models::FileReport;
    use oc_core::parsers::TypeScriptParser;
    use oc_core::FileRoute;

    fn run(source: &str, accumulator: &mut MetadataAccumulator) -> (Module, FileReport) {
        let file = TypeScriptParser::new()
            .parse_source(source, "user.dto.ts")
            .unwrap();
        let mut synthesizer = ModelClassSynthesizer::new(accumulator);
        let cx = FileContext::new(&file.source, FileRoute::Model);
        TreeWalker::new(&mut synthesizer, cx).walk(file.module)
    }

    fn class_members(module: &Module) -> &[ClassMember] {
        module
            .body
            .iter()
            .find_map(|item| match item {
                ModuleItem::Stmt(Stmt::Decl(Decl::Class(class_decl))) => {
                    Some(class_decl.class.body.as_slice())
                }
                _ => None,
            })
            .expect("class")
    }

    /// Accessor entries as (property, [(key, string value)])
    fn accessor_entries(module: &Module) -> Vec<(String, Vec<(String, Option<String>)>)> {
        let members = class_members(module);
        let idx = find_metadata_factory(members).expect("accessor");
        let ClassMember::Method(method) = &members[idx] else {
            unreachable!()
        };
        let mut function = method.function.clone();
        let object = returned_object(&mut function).expect("object").clone();
        object
            .props
            .iter()
            .filter_map(|prop| match prop {
                PropOrSpread::Prop(prop) => match prop.as_ref() {
                    Prop::KeyValue(kv) => Some(kv),
                    _ => None,
                },
                _ => None,
            })
            .map(|kv| {
                let Expr::Object(inner) = kv.value.as_ref() else {
                    return (prop_name_text(&kv.key).unwrap_or_default(), Vec::new());
                };
                let entries = inner
                    .props
                    .iter()
                    .filter_map(|prop| match prop {
                        PropOrSpread::Prop(prop) => match prop.as_ref() {
                            Prop::KeyValue(kv) => Some((
                                prop_name_text(&kv.key).unwrap_or_default(),
                                string_value(&kv.value),
                            )),
                            _ => None,
                        },
                        _ => None,
                    })
                    .collect();
                (prop_name_text(&kv.key).unwrap_or_default(), entries)
            })
            .collect()
    }

    fn entry(key: &str, value: Option<&str>) -> (String, Option<String>) {
        (key.to_string(), value.map(str::to_string))
    }

    #[test]
    fn test_generates_accessor_from_comments() {
        let mut accumulator = MetadataAccumulator::new();
        let (module, report) = run(
            r#"
class UserDto {
  /** user name
   * @example alice */
  name: string;

  age: number;
}
"#,
            &mut accumulator,
        );

        assert_eq!(
            accessor_entries(&module),
            vec![(
                "name".to_string(),
                vec![entry("description", Some("user name")), entry("example", Some("alice"))]
            )]
        );
        assert!(accumulator.is_empty());
        assert!(report.changes.contains(&Change::AccessorGenerated {
            class: "UserDto".to_string(),
            properties: vec!["name".to_string()],
        }));
    }

    #[test]
    fn test_author_values_win_and_decorator_is_migrated() {
        let mut accumulator = MetadataAccumulator::new();
        let (module, report) = run(
            r#"
class UserDto {
  /** from comment
   * @example a
   * @example b */
  @ApiProperty({ description: 'from author', required: false })
  name: string;
}
"#,
            &mut accumulator,
        );

        let ClassMember::ClassProp(prop) = &class_members(&module)[0] else {
            panic!("expected a property");
        };
        assert!(prop.decorators.is_empty());
        assert_eq!(
            accessor_entries(&module),
            vec![(
                "name".to_string(),
                vec![
                    entry("description", Some("from author")),
                    entry("required", None),
                    entry("examples", None)
                ]
            )]
        );
        assert!(report.changes.iter().any(|change| matches!(
            change,
            Change::DecoratorMigrated { decorator, .. } if decorator == "ApiProperty"
        )));
    }

    #[test]
    fn test_hidden_and_static_properties_are_not_documented() {
        let mut accumulator = MetadataAccumulator::new();
        let (module, report) = run(
            r#"
class UserDto {
  /** secret */
  @ApiHideProperty()
  @ApiProperty({ example: 1 })
  password: string;

  /** shared */
  @ApiPropertyOptional({ example: 1 })
  static counter = 0;
}
"#,
            &mut accumulator,
        );

        let members = class_members(&module);
        assert!(find_metadata_factory(members).is_none());
        let ClassMember::ClassProp(hidden) = &members[0] else {
            panic!("expected a property");
        };
        assert_eq!(hidden.decorators.len(), 2);
        let ClassMember::ClassProp(counter) = &members[1] else {
            panic!("expected a property");
        };
        assert!(counter.decorators.is_empty());

        assert_eq!(
            report.changes,
            vec![Change::DecoratorMigrated {
                class: Some("UserDto".to_string()),
                property: "counter".to_string(),
                decorator: API_PROPERTY_OPTIONAL.to_string(),
            }]
        );
        assert!(accumulator.is_empty());
    }

    #[test]
    fn test_non_object_argument_leaves_property_unmodified() {
        let mut accumulator = MetadataAccumulator::new();
        let (module, report) = run(
            r#"
class UserDto {
  /** broken */
  @ApiProperty(sharedOptions)
  broken: string;

  /** fine */
  fine: string;
}
"#,
            &mut accumulator,
        );

        let ClassMember::ClassProp(broken) = &class_members(&module)[0] else {
            panic!("expected a property");
        };
        assert_eq!(broken.decorators.len(), 1);
        assert_eq!(
            accessor_entries(&module),
            vec![("fine".to_string(), vec![entry("description", Some("fine"))])]
        );
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.diagnostics[0].member.as_deref(), Some("broken"));
    }

    #[test]
    fn test_merge_keeps_existing_accessor_entries() {
        let mut accumulator = MetadataAccumulator::new();
        let (module, report) = run(
            r#"
class UserDto {
  /** name from comment
   * @example bob */
  name: string;

  /** email from comment */
  email: string;

  static _OPENAPI_METADATA_FACTORY() {
    return { name: { description: 'kept' } };
  }
}
"#,
            &mut accumulator,
        );

        assert_eq!(
            accessor_entries(&module),
            vec![
                (
                    "name".to_string(),
                    vec![entry("description", Some("kept")), entry("example", Some("bob"))]
                ),
                ("email".to_string(), vec![entry("description", Some("email from comment"))]),
            ]
        );
        assert!(report.changes.contains(&Change::AccessorMerged {
            class: "UserDto".to_string(),
            added: vec!["email".to_string()],
            extended: vec!["name".to_string()],
        }));
        // Still exactly one accessor
        let accessors = class_members(&module)
            .iter()
            .filter(|member| matches!(member, ClassMember::Method(_)))
            .count();
        assert_eq!(accessors, 1);
    }

    #[test]
    fn test_accessor_without_object_is_reported() {
        let mut accumulator = MetadataAccumulator::new();
        let (_, report) = run(
            r#"
class UserDto {
  /** name */
  name: string;

  static _OPENAPI_METADATA_FACTORY() {
    return buildMetadata();
  }
}
"#,
            &mut accumulator,
        );
        assert_eq!(report.warnings().count(), 1);
        assert!(report.diagnostics[0].message.contains("_OPENAPI_METADATA_FACTORY"));
    }

    #[test]
    fn test_quoted_property_keys() {
        let mut accumulator = MetadataAccumulator::new();
        let (module, _) = run(
            "class UserDto {\n  /** first */\n  'first-name': string;\n}\n",
            &mut accumulator,
        );
        let members = class_members(&module);
        let ClassMember::Method(method) = &members[find_metadata_factory(members).unwrap()] else {
            unreachable!()
        };
        let mut function = method.function.clone();
        let object = returned_object(&mut function).unwrap();
        let PropOrSpread::Prop(prop) = &object.props[0] else {
            panic!("expected a property");
        };
        assert!(matches!(
            prop.as_ref(),
            Prop::KeyValue(KeyValueProp {
                key: PropName::Str(_),
                ..
            })
        ));
    }

    #[test]
    fn test_inspect_empty_without_comment_or_options() {
        let file = TypeScriptParser::new()
            .parse_source("class A {\n  plain: string;\n}\n", "a.dto.ts")
            .unwrap();
        let ModuleItem::Stmt(Stmt::Decl(Decl::Class(class_decl))) = &file.module.body[0] else {
            panic!("expected a class");
        };
        let ClassMember::ClassProp(prop) = &class_decl.class.body[0] else {
            panic!("expected a property");
        };
        let mut accumulator = MetadataAccumulator::new();
        let synthesizer = ModelClassSynthesizer::new(&mut accumulator);
        let cx = FileContext::new(&file.source, FileRoute::Model);
        assert_eq!(synthesizer.inspect(prop, Vec::new(), &cx), PropertyOutcome::Empty);

        let mut detached = prop.clone();
        detached.span = swc_common::DUMMY_SP;
        assert_eq!(
            synthesizer.inspect(&detached, Vec::new(), &cx),
            PropertyOutcome::Failed(SynthesisError::NoSourcePosition)
        );
    }
}
