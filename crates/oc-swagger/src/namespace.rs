use crate::constants::{IMPLICIT_NAMESPACE, OPENAPI_PACKAGE_NAME};
use crate::literals::import_equals;
use swc_ecma_ast::{Module, ModuleDecl, ModuleItem, TsImportEqualsDecl, TsModuleRef};

/// Tracks the local alias of the OpenAPI package in one file.
///
/// Synthesized decorators are qualified with this alias. Until an
/// `import x = require("@nestjs/swagger")` is seen, the implicit alias is
/// used.
#[derive(Debug, Default)]
pub struct NamespaceResolver {
    alias: Option<String>,
    implicit_used: bool,
}

impl NamespaceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_declared(&self) -> bool {
        self.alias.is_some()
    }

    pub fn namespace(&self) -> &str {
        self.alias.as_deref().unwrap_or(IMPLICIT_NAMESPACE)
    }

    /// Namespace to qualify a synthesized reference with
    pub fn reference(&mut self) -> String {
        if self.alias.is_none() {
            self.implicit_used = true;
        }
        self.namespace().to_string()
    }

    /// Whether synthesized code relied on the implicit alias without any
    /// import of the package in the file
    pub fn implicit_used(&self) -> bool {
        self.implicit_used && self.alias.is_none()
    }

    /// Records the alias of an import-equals of the OpenAPI package.
    ///
    /// Returns true when this import confirmed the namespace.
    pub fn check_import(&mut self, decl: &TsImportEqualsDecl) -> bool {
        if self.alias.is_some() || !is_openapi_import(decl) {
            return false;
        }
        self.alias = Some(decl.id.sym.as_ref().to_string());
        true
    }

    /// Prepends `import <implicit> = require(...)` when the file imports the
    /// package and does not bind the implicit alias yet.
    ///
    /// Returns whether the import was inserted.
    pub fn finish(&self, module: &mut Module) -> bool {
        if self.alias.is_none() || module.body.iter().any(binds_implicit_alias) {
            return false;
        }
        module
            .body
            .insert(0, import_equals(IMPLICIT_NAMESPACE, OPENAPI_PACKAGE_NAME));
        true
    }
}

fn is_openapi_import(decl: &TsImportEqualsDecl) -> bool {
    match &decl.module_ref {
        TsModuleRef::TsExternalModuleRef(external) => {
            external.expr.value.as_str() == Some(OPENAPI_PACKAGE_NAME)
        }
        _ => false,
    }
}

fn binds_implicit_alias(item: &ModuleItem) -> bool {
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(decl)) => {
            decl.id.sym.as_ref() == IMPLICIT_NAMESPACE
        }
        _ => false,
    }
}
