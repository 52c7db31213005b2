use crate::comments::CommentExtractor;
use crate::constants::IMPLICIT_NAMESPACE;
use crate::namespace::NamespaceResolver;
use oc_core::models::{Change, Diagnostic, FileReport, Location, Severity};
use oc_core::parsers::SourceText;
use oc_core::FileRoute;
use swc_common::BytePos;
use swc_ecma_ast::*;

/// Kind of declaration a synthesizer can be handed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Class,
    Method,
    Property,
}

/// Class whose members have already been visited
pub struct ClassDeclaration {
    /// `None` for anonymous class expressions
    pub name: Option<String>,
    pub class: Box<Class>,
}

/// Ordinary (non accessor, non constructor) method of a class
pub struct MethodDeclaration {
    pub host: Option<String>,
    pub method: ClassMethod,
}

/// Property declaration of a class
pub struct PropertyDeclaration {
    pub host: Option<String>,
    pub property: ClassProp,
}

/// Per-file state shared with synthesizers
pub struct FileContext<'a> {
    source: &'a SourceText,
    pub comments: CommentExtractor<'a>,
    pub namespace: NamespaceResolver,
    report: FileReport,
}

impl<'a> FileContext<'a> {
    pub fn new(source: &'a SourceText, route: FileRoute) -> Self {
        Self {
            source,
            comments: CommentExtractor::new(source),
            namespace: NamespaceResolver::new(),
            report: FileReport::new(source.name(), route),
        }
    }

    pub fn file_name(&self) -> &str {
        self.source.name()
    }

    pub fn location(&self, pos: Option<BytePos>) -> Location {
        match pos {
            Some(pos) => self.source.location_of(pos),
            None => Location::file_only(self.source.name()),
        }
    }

    pub fn record(&mut self, change: Change) {
        self.report.changes.push(change);
    }

    /// Records a diagnostic and logs it
    pub fn diagnose(
        &mut self,
        severity: Severity,
        pos: Option<BytePos>,
        class: Option<&str>,
        member: Option<&str>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            severity,
            location: self.location(pos),
            class: class.map(str::to_string),
            member: member.map(str::to_string),
            message: message.into(),
        };
        match severity {
            Severity::Warning => tracing::warn!(
                location = %diagnostic.location,
                class = ?diagnostic.class,
                member = ?diagnostic.member,
                "{}",
                diagnostic.message
            ),
            Severity::Info => tracing::debug!(
                location = %diagnostic.location,
                class = ?diagnostic.class,
                member = ?diagnostic.member,
                "{}",
                diagnostic.message
            ),
        }
        self.report.diagnostics.push(diagnostic);
    }

    pub fn report(&self) -> &FileReport {
        &self.report
    }

    pub fn into_report(self) -> FileReport {
        self.report
    }
}

/// Rewrites the declarations a [`TreeWalker`] hands over.
///
/// Each hook receives a declaration by value and returns its replacement.
/// Only kinds for which [`Synthesizer::handles`] returns true are offered;
/// the members of a handled method or property are not visited further.
pub trait Synthesizer {
    fn handles(&self, kind: DeclarationKind) -> bool;

    /// Called after all members of the class were visited
    fn visit_class(
        &mut self,
        decl: ClassDeclaration,
        _cx: &mut FileContext<'_>,
    ) -> ClassDeclaration {
        decl
    }

    fn visit_method(
        &mut self,
        decl: MethodDeclaration,
        _cx: &mut FileContext<'_>,
    ) -> MethodDeclaration {
        decl
    }

    fn visit_property(
        &mut self,
        decl: PropertyDeclaration,
        _cx: &mut FileContext<'_>,
    ) -> PropertyDeclaration {
        decl
    }
}

/// Depth-first rewrite of one module.
///
/// Classes are found in statements, nested blocks, namespaces, export
/// declarations and expressions. Members of a class are visited before the
/// class itself.
pub struct TreeWalker<'s, 'a, S: Synthesizer> {
    synthesizer: &'s mut S,
    cx: FileContext<'a>,
    /// Names of the enclosing classes, innermost last
    hosts: Vec<Option<String>>,
}

impl<'s, 'a, S: Synthesizer> TreeWalker<'s, 'a, S> {
    pub fn new(synthesizer: &'s mut S, cx: FileContext<'a>) -> Self {
        Self {
            synthesizer,
            cx,
            hosts: Vec::new(),
        }
    }

    pub fn walk(mut self, mut module: Module) -> (Module, FileReport) {
        let items = std::mem::take(&mut module.body);
        module.body = self.fold_module_items(items);

        if self.cx.namespace.finish(&mut module) {
            tracing::debug!(file = %self.cx.file_name(), "Inserted OpenAPI import");
            self.cx.record(Change::ImportInserted {
                alias: IMPLICIT_NAMESPACE.to_string(),
            });
        } else if self.cx.namespace.implicit_used() {
            self.cx.diagnose(
                Severity::Info,
                None,
                None,
                None,
                format!(
                    "synthesized decorators reference `{}` \
                     but the file does not import the OpenAPI package",
                    IMPLICIT_NAMESPACE
                ),
            );
        }
        (module, self.cx.into_report())
    }

    fn fold_module_items(&mut self, items: Vec<ModuleItem>) -> Vec<ModuleItem> {
        items
            .into_iter()
            .map(|item| match item {
                ModuleItem::ModuleDecl(decl) => ModuleItem::ModuleDecl(self.fold_module_decl(decl)),
                ModuleItem::Stmt(stmt) => ModuleItem::Stmt(self.fold_stmt(stmt)),
            })
            .collect()
    }

    fn fold_module_decl(&mut self, decl: ModuleDecl) -> ModuleDecl {
        match decl {
            ModuleDecl::TsImportEquals(import) => {
                // Only until the namespace is confirmed
                if !self.cx.namespace.has_declared() && self.cx.namespace.check_import(&import) {
                    tracing::trace!(
                        file = %self.cx.file_name(),
                        alias = %self.cx.namespace.namespace(),
                        "OpenAPI namespace confirmed"
                    );
                }
                ModuleDecl::TsImportEquals(import)
            }
            ModuleDecl::ExportDecl(mut export) => {
                export.decl = self.fold_decl(export.decl);
                ModuleDecl::ExportDecl(export)
            }
            ModuleDecl::ExportDefaultDecl(mut export) => {
                export.decl = match export.decl {
                    DefaultDecl::Class(class_expr) => {
                        DefaultDecl::Class(self.fold_class_expr(class_expr))
                    }
                    DefaultDecl::Fn(mut fn_expr) => {
                        fn_expr.function = self.fold_function(fn_expr.function);
                        DefaultDecl::Fn(fn_expr)
                    }
                    other => other,
                };
                ModuleDecl::ExportDefaultDecl(export)
            }
            ModuleDecl::ExportDefaultExpr(mut export) => {
                export.expr = self.fold_expr(export.expr);
                ModuleDecl::ExportDefaultExpr(export)
            }
            other => other,
        }
    }

    fn fold_stmt(&mut self, stmt: Stmt) -> Stmt {
        match stmt {
            Stmt::Decl(decl) => Stmt::Decl(self.fold_decl(decl)),
            Stmt::Block(block) => Stmt::Block(self.fold_block(block)),
            Stmt::Expr(mut expr_stmt) => {
                expr_stmt.expr = self.fold_expr(expr_stmt.expr);
                Stmt::Expr(expr_stmt)
            }
            Stmt::Return(mut ret) => {
                ret.arg = ret.arg.map(|arg| self.fold_expr(arg));
                Stmt::Return(ret)
            }
            Stmt::If(mut if_stmt) => {
                if_stmt.cons = self.fold_boxed_stmt(if_stmt.cons);
                if_stmt.alt = if_stmt.alt.map(|alt| self.fold_boxed_stmt(alt));
                Stmt::If(if_stmt)
            }
            Stmt::While(mut while_stmt) => {
                while_stmt.body = self.fold_boxed_stmt(while_stmt.body);
                Stmt::While(while_stmt)
            }
            Stmt::DoWhile(mut do_while) => {
                do_while.body = self.fold_boxed_stmt(do_while.body);
                Stmt::DoWhile(do_while)
            }
            Stmt::For(mut for_stmt) => {
                for_stmt.body = self.fold_boxed_stmt(for_stmt.body);
                Stmt::For(for_stmt)
            }
            Stmt::ForIn(mut for_in) => {
                for_in.body = self.fold_boxed_stmt(for_in.body);
                Stmt::ForIn(for_in)
            }
            Stmt::ForOf(mut for_of) => {
                for_of.body = self.fold_boxed_stmt(for_of.body);
                Stmt::ForOf(for_of)
            }
            Stmt::Try(try_stmt) => {
                let mut try_stmt = *try_stmt;
                try_stmt.block = self.fold_block(try_stmt.block);
                try_stmt.handler = try_stmt.handler.map(|mut handler| {
                    handler.body = self.fold_block(handler.body);
                    handler
                });
                try_stmt.finalizer = try_stmt.finalizer.map(|finalizer| self.fold_block(finalizer));
                Stmt::Try(Box::new(try_stmt))
            }
            Stmt::Switch(mut switch) => {
                switch.cases = switch
                    .cases
                    .into_iter()
                    .map(|mut case| {
                        case.cons = case
                            .cons
                            .into_iter()
                            .map(|stmt| self.fold_stmt(stmt))
                            .collect();
                        case
                    })
                    .collect();
                Stmt::Switch(switch)
            }
            Stmt::Labeled(mut labeled) => {
                labeled.body = self.fold_boxed_stmt(labeled.body);
                Stmt::Labeled(labeled)
            }
            other => other,
        }
    }

    fn fold_boxed_stmt(&mut self, stmt: Box<Stmt>) -> Box<Stmt> {
        Box::new(self.fold_stmt(*stmt))
    }

    fn fold_block(&mut self, mut block: BlockStmt) -> BlockStmt {
        block.stmts = block
            .stmts
            .into_iter()
            .map(|stmt| self.fold_stmt(stmt))
            .collect();
        block
    }

    fn fold_decl(&mut self, decl: Decl) -> Decl {
        match decl {
            Decl::Class(mut class_decl) => {
                let name = Some(class_decl.ident.sym.as_ref().to_string());
                class_decl.class = self.fold_class(name, class_decl.class);
                Decl::Class(class_decl)
            }
            Decl::Fn(mut fn_decl) => {
                fn_decl.function = self.fold_function(fn_decl.function);
                Decl::Fn(fn_decl)
            }
            Decl::Var(var) => {
                let mut var = *var;
                var.decls = var
                    .decls
                    .into_iter()
                    .map(|mut declarator| {
                        declarator.init = declarator.init.map(|init| self.fold_expr(init));
                        declarator
                    })
                    .collect();
                Decl::Var(Box::new(var))
            }
            Decl::TsModule(module) => {
                let mut module = *module;
                module.body = module.body.map(|body| self.fold_namespace_body(body));
                Decl::TsModule(Box::new(module))
            }
            other => other,
        }
    }

    fn fold_namespace_body(&mut self, body: TsNamespaceBody) -> TsNamespaceBody {
        match body {
            TsNamespaceBody::TsModuleBlock(mut block) => {
                block.body = self.fold_module_items(block.body);
                TsNamespaceBody::TsModuleBlock(block)
            }
            TsNamespaceBody::TsNamespaceDecl(mut decl) => {
                decl.body = Box::new(self.fold_namespace_body(*decl.body));
                TsNamespaceBody::TsNamespaceDecl(decl)
            }
        }
    }

    fn fold_function(&mut self, mut function: Box<Function>) -> Box<Function> {
        if let Some(body) = function.body.take() {
            function.body = Some(self.fold_block(body));
        }
        function
    }

    fn fold_expr(&mut self, expr: Box<Expr>) -> Box<Expr> {
        Box::new(self.fold_expr_value(*expr))
    }

    fn fold_expr_value(&mut self, expr: Expr) -> Expr {
        match expr {
            Expr::Class(class_expr) => Expr::Class(self.fold_class_expr(class_expr)),
            Expr::Fn(mut fn_expr) => {
                fn_expr.function = self.fold_function(fn_expr.function);
                Expr::Fn(fn_expr)
            }
            Expr::Arrow(mut arrow) => {
                arrow.body = Box::new(match *arrow.body {
                    BlockStmtOrExpr::BlockStmt(block) => {
                        BlockStmtOrExpr::BlockStmt(self.fold_block(block))
                    }
                    BlockStmtOrExpr::Expr(expr) => BlockStmtOrExpr::Expr(self.fold_expr(expr)),
                });
                Expr::Arrow(arrow)
            }
            Expr::Call(mut call) => {
                call.args = self.fold_args(call.args);
                Expr::Call(call)
            }
            Expr::New(mut new) => {
                new.args = new.args.map(|args| self.fold_args(args));
                Expr::New(new)
            }
            Expr::Paren(mut paren) => {
                paren.expr = self.fold_expr(paren.expr);
                Expr::Paren(paren)
            }
            Expr::Assign(mut assign) => {
                assign.right = self.fold_expr(assign.right);
                Expr::Assign(assign)
            }
            Expr::Seq(mut seq) => {
                seq.exprs = seq.exprs.into_iter().map(|expr| self.fold_expr(expr)).collect();
                Expr::Seq(seq)
            }
            Expr::Cond(mut cond) => {
                cond.cons = self.fold_expr(cond.cons);
                cond.alt = self.fold_expr(cond.alt);
                Expr::Cond(cond)
            }
            Expr::Array(mut array) => {
                array.elems = array
                    .elems
                    .into_iter()
                    .map(|elem| {
                        elem.map(|mut elem| {
                            elem.expr = self.fold_expr(elem.expr);
                            elem
                        })
                    })
                    .collect();
                Expr::Array(array)
            }
            Expr::Object(mut object) => {
                object.props = object
                    .props
                    .into_iter()
                    .map(|prop| match prop {
                        PropOrSpread::Prop(prop) => {
                            PropOrSpread::Prop(Box::new(self.fold_prop(*prop)))
                        }
                        spread => spread,
                    })
                    .collect();
                Expr::Object(object)
            }
            Expr::TsAs(mut ts_as) => {
                ts_as.expr = self.fold_expr(ts_as.expr);
                Expr::TsAs(ts_as)
            }
            Expr::TsNonNull(mut non_null) => {
                non_null.expr = self.fold_expr(non_null.expr);
                Expr::TsNonNull(non_null)
            }
            other => other,
        }
    }

    fn fold_args(&mut self, args: Vec<ExprOrSpread>) -> Vec<ExprOrSpread> {
        args.into_iter()
            .map(|mut arg| {
                arg.expr = self.fold_expr(arg.expr);
                arg
            })
            .collect()
    }

    fn fold_prop(&mut self, prop: Prop) -> Prop {
        match prop {
            Prop::KeyValue(mut kv) => {
                kv.value = self.fold_expr(kv.value);
                Prop::KeyValue(kv)
            }
            Prop::Method(mut method) => {
                method.function = self.fold_function(method.function);
                Prop::Method(method)
            }
            other => other,
        }
    }

    fn fold_class_expr(&mut self, mut class_expr: ClassExpr) -> ClassExpr {
        let name = class_expr
            .ident
            .as_ref()
            .map(|ident| ident.sym.as_ref().to_string());
        class_expr.class = self.fold_class(name, class_expr.class);
        class_expr
    }

    fn fold_class(&mut self, name: Option<String>, mut class: Box<Class>) -> Box<Class> {
        let members = std::mem::take(&mut class.body);
        self.hosts.push(name.clone());
        class.body = members
            .into_iter()
            .map(|member| self.fold_class_member(member))
            .collect();
        self.hosts.pop();

        if !self.synthesizer.handles(DeclarationKind::Class) {
            return class;
        }
        self.synthesizer
            .visit_class(ClassDeclaration { name, class }, &mut self.cx)
            .class
    }

    fn fold_class_member(&mut self, member: ClassMember) -> ClassMember {
        let host = self.hosts.last().cloned().flatten();
        match member {
            ClassMember::Method(method)
                if matches!(method.kind, MethodKind::Method)
                    && self.synthesizer.handles(DeclarationKind::Method) =>
            {
                let decl = MethodDeclaration { host, method };
                ClassMember::Method(self.synthesizer.visit_method(decl, &mut self.cx).method)
            }
            ClassMember::Method(mut method) => {
                method.function = self.fold_function(method.function);
                ClassMember::Method(method)
            }
            ClassMember::ClassProp(property)
                if self.synthesizer.handles(DeclarationKind::Property) =>
            {
                let decl = PropertyDeclaration { host, property };
                ClassMember::ClassProp(self.synthesizer.visit_property(decl, &mut self.cx).property)
            }
            ClassMember::ClassProp(mut property) => {
                property.value = property.value.map(|value| self.fold_expr(value));
                ClassMember::ClassProp(property)
            }
            ClassMember::Constructor(mut constructor) => {
                constructor.body = constructor.body.map(|body| self.fold_block(body));
                ClassMember::Constructor(constructor)
            }
            ClassMember::StaticBlock(mut block) => {
                block.body = self.fold_block(block.body);
                ClassMember::StaticBlock(block)
            }
            other => other,
        }
    }
}
