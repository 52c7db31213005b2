use crate::accumulator::MetadataAccumulator;
use crate::controller_class::ControllerClassSynthesizer;
use crate::model_class::ModelClassSynthesizer;
use crate::walker::{FileContext, TreeWalker};
use oc_core::models::FileReport;
use oc_core::parsers::ParsedFile;
use oc_core::{FileRoute, PluginError, PluginOptions};
use tracing::{debug, info_span};

/// Transform that runs on every file before metadata synthesis
pub trait UpstreamTransform {
    fn transform(&mut self, file: ParsedFile) -> Result<ParsedFile, PluginError>;
}

/// Upstream that returns files unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl UpstreamTransform for Passthrough {
    fn transform(&mut self, file: ParsedFile) -> Result<ParsedFile, PluginError> {
        Ok(file)
    }
}

impl<F> UpstreamTransform for F
where
    F: FnMut(ParsedFile) -> Result<ParsedFile, PluginError>,
{
    fn transform(&mut self, file: ParsedFile) -> Result<ParsedFile, PluginError> {
        self(file)
    }
}

/// A transformed file with what was done to it
pub struct TransformedFile {
    pub file: ParsedFile,
    pub report: FileReport,
}

/// Creates the transform for one compilation run
pub fn before(options: PluginOptions) -> Result<CompilerPlugin, PluginError> {
    CompilerPlugin::new(options)
}

/// Per-run compiler plugin.
///
/// Files are handed to [`CompilerPlugin::transform`] one at a time; property
/// metadata is accumulated across them for the whole run.
pub struct CompilerPlugin<U = Passthrough> {
    options: PluginOptions,
    accumulator: MetadataAccumulator,
    upstream: U,
}

impl CompilerPlugin<Passthrough> {
    pub fn new(options: PluginOptions) -> Result<Self, PluginError> {
        options.validate()?;
        Ok(Self {
            options,
            accumulator: MetadataAccumulator::new(),
            upstream: Passthrough,
        })
    }
}

impl<U: UpstreamTransform> CompilerPlugin<U> {
    /// Replaces the transform that runs first on every file
    pub fn with_upstream<V: UpstreamTransform>(self, upstream: V) -> CompilerPlugin<V> {
        CompilerPlugin {
            options: self.options,
            accumulator: self.accumulator,
            upstream,
        }
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn accumulator(&self) -> &MetadataAccumulator {
        &self.accumulator
    }

    /// Transforms one file.
    ///
    /// Failures of single declarations are reported in the file report; an
    /// error aborts this file only.
    pub fn transform(&mut self, file: ParsedFile) -> Result<TransformedFile, PluginError> {
        let span = info_span!("transform_file", file = %file.name());
        let _enter = span.enter();

        let ParsedFile { module, source } = self.upstream.transform(file)?;
        let route = self.options.route(source.name());
        let cx = FileContext::new(&source, route);

        let (module, report) = match route {
            FileRoute::Model => {
                let mut synthesizer = ModelClassSynthesizer::new(&mut self.accumulator);
                TreeWalker::new(&mut synthesizer, cx).walk(module)
            }
            FileRoute::Controller => {
                let key_of_comment = self.options.controller_key_of_comment.as_str();
                let mut synthesizer = ControllerClassSynthesizer::new(key_of_comment);
                TreeWalker::new(&mut synthesizer, cx).walk(module)
            }
            FileRoute::Untouched => (module, cx.into_report()),
        };

        debug!(
            route = ?route,
            changes = report.changes.len(),
            diagnostics = report.diagnostics.len(),
            "Transformed file"
        );
        Ok(TransformedFile {
            file: ParsedFile { module, source },
            report,
        })
    }
}
