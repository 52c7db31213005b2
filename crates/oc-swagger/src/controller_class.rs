use crate::constants::API_OPERATION;
use crate::decorators::{
    declaration_start, decorator_options, find_decorator, has_property_key, prop_name_text,
};
use crate::literals::{key_value, object_lit, options_decorator, str_lit};
use crate::walker::{DeclarationKind, FileContext, MethodDeclaration, Synthesizer};
use oc_core::models::{Change, Severity};
use oc_core::SynthesisError;
use swc_ecma_ast::*;

/// Adds the doc comment of controller handlers to `@ApiOperation`
pub struct ControllerClassSynthesizer {
    key_of_comment: String,
}

/// Description written onto a handler
struct Documented {
    created: bool,
    description: String,
}

impl ControllerClassSynthesizer {
    pub fn new(key_of_comment: impl Into<String>) -> Self {
        Self {
            key_of_comment: key_of_comment.into(),
        }
    }

    fn describe(
        &self,
        method: &mut ClassMethod,
        cx: &mut FileContext<'_>,
    ) -> Result<Option<Documented>, SynthesisError> {
        let decorators = &method.function.decorators;
        let existing = find_decorator(decorators, &[API_OPERATION]);
        if let Some(idx) = existing {
            if let Some(options) = decorator_options(&decorators[idx])? {
                if has_property_key(&options.props, &self.key_of_comment) {
                    return Ok(None);
                }
            }
        }

        let start =
            declaration_start(method.span, decorators).ok_or(SynthesisError::NoSourcePosition)?;
        let Some(description) = cx.comments.extract(start, false)?.description else {
            return Ok(None);
        };
        let entry = key_value(&self.key_of_comment, str_lit(&description));

        match existing {
            Some(idx) => {
                insert_first(&mut method.function.decorators[idx], entry)?;
                Ok(Some(Documented {
                    created: false,
                    description,
                }))
            }
            None => {
                let namespace = cx.namespace.reference();
                let decorator =
                    options_decorator(&namespace, API_OPERATION, object_lit(vec![entry]));
                method.function.decorators.insert(0, decorator);
                Ok(Some(Documented {
                    created: true,
                    description,
                }))
            }
        }
    }
}

/// Puts `entry` first in the options object of a decorator call, creating
/// the object when the call has no arguments
fn insert_first(decorator: &mut Decorator, entry: PropOrSpread) -> Result<(), SynthesisError> {
    let Expr::Call(call) = decorator.expr.as_mut() else {
        return Err(SynthesisError::BareDecorator {
            decorator: API_OPERATION.to_string(),
        });
    };
    match call.args.first_mut() {
        None => call.args.push(ExprOrSpread {
            spread: None,
            expr: Box::new(Expr::Object(object_lit(vec![entry]))),
        }),
        Some(arg) => match arg.expr.as_mut() {
            Expr::Object(options) => options.props.insert(0, entry),
            _ => {
                return Err(SynthesisError::NonObjectArgument {
                    decorator: API_OPERATION.to_string(),
                })
            }
        },
    }
    Ok(())
}

impl Synthesizer for ControllerClassSynthesizer {
    fn handles(&self, kind: DeclarationKind) -> bool {
        kind == DeclarationKind::Method
    }

    fn visit_method(
        &mut self,
        decl: MethodDeclaration,
        cx: &mut FileContext<'_>,
    ) -> MethodDeclaration {
        let MethodDeclaration { host, mut method } = decl;
        let name = prop_name_text(&method.key);
        let pos = declaration_start(method.span, &method.function.decorators);
        let before = method.function.decorators.clone();

        match self.describe(&mut method, cx) {
            Ok(Some(documented)) => {
                tracing::debug!(
                    file = %cx.file_name(),
                    class = ?host,
                    method = ?name,
                    created = documented.created,
                    "Documented operation"
                );
                cx.record(Change::OperationDocumented {
                    class: host.clone(),
                    method: name.unwrap_or_default(),
                    created: documented.created,
                    description: documented.description,
                });
            }
            Ok(None) => {}
            Err(err) => {
                method.function.decorators = before;
                cx.diagnose(
                    Severity::Warning,
                    pos,
                    host.as_deref(),
                    name.as_deref(),
                    err.to_string(),
                );
            }
        }
        MethodDeclaration { host, method }
    }
}
