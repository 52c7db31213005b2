use crate::error::ParseError;
use crate::models::Location;
use crate::parsers::LineIndex;
use std::path::{Path, PathBuf};
use swc_common::comments::{CommentKind, SingleThreadedComments};
use swc_common::{sync::Lrc, BytePos, FileName, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};

/// Comment delimiter style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* ... */`, including JSDoc blocks
    Block,
    /// `// ...`
    Line,
}

/// One comment of a file, as byte offsets into its text (delimiters included)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRange {
    pub lo: usize,
    pub hi: usize,
    pub style: CommentStyle,
}

/// Text of one file with its comments, kept next to the syntax tree
pub struct SourceText {
    name: String,
    start_pos: BytePos,
    lines: LineIndex,
    comments: Vec<CommentRange>,
}

impl SourceText {
    /// Creates the text view of a file.
    ///
    /// `start_pos` is the position of the first byte of the file in the
    /// source map that produced the tree; comment ranges are already
    /// relative to the text.
    pub fn new(
        name: &str,
        text: String,
        start_pos: BytePos,
        mut comments: Vec<CommentRange>,
    ) -> Self {
        comments.sort_by_key(|c| (c.lo, c.hi));
        comments.dedup();
        Self {
            name: name.to_string(),
            start_pos,
            lines: LineIndex::new(text),
            comments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        self.lines.text()
    }

    /// All comments of the file, ordered by position
    pub fn comments(&self) -> &[CommentRange] {
        &self.comments
    }

    /// Raw comment text, delimiters included
    pub fn comment_text(&self, comment: &CommentRange) -> &str {
        self.text().get(comment.lo..comment.hi).unwrap_or("")
    }

    /// Converts a tree position to an offset into the text
    pub fn offset_of(&self, pos: BytePos) -> Option<usize> {
        let offset = pos.0.checked_sub(self.start_pos.0)? as usize;
        if offset > self.text().len() {
            return None;
        }
        Some(offset)
    }

    /// Converts a tree position to a 1-based location
    pub fn location_of(&self, pos: BytePos) -> Location {
        match self.offset_of(pos) {
            Some(offset) => {
                let (line, column) = self.lines.position(offset);
                Location {
                    file: self.name.clone(),
                    line,
                    column: Some(column),
                }
            }
            None => Location::file_only(&self.name),
        }
    }
}

/// Syntax tree of one file together with its text
pub struct ParsedFile {
    pub module: Module,
    pub source: SourceText,
}

impl ParsedFile {
    pub fn name(&self) -> &str {
        self.source.name()
    }
}

/// TypeScript code parser (via swc)
pub struct TypeScriptParser {
    source_map: Lrc<SourceMap>,
}

impl TypeScriptParser {
    /// Creates a new parser
    pub fn new() -> Self {
        Self {
            source_map: Lrc::new(SourceMap::default()),
        }
    }

    /// Reads and parses a file
    pub fn parse_file(&self, path: &Path) -> Result<ParsedFile, ParseError> {
        let source = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_source(&source, &path.to_string_lossy())
    }

    /// Parses source code registered under `file_name`
    pub fn parse_source(&self, source: &str, file_name: &str) -> Result<ParsedFile, ParseError> {
        let path = PathBuf::from(file_name);
        let swc_name: Lrc<FileName> = FileName::Real(path.clone()).into();
        let fm = self
            .source_map
            .new_source_file(swc_name, source.to_string());

        let is_tsx = path.extension().and_then(|e| e.to_str()) == Some("tsx");
        let syntax = Syntax::Typescript(TsSyntax {
            tsx: is_tsx,
            decorators: true,
            ..Default::default()
        });

        let comments = SingleThreadedComments::default();
        let (module, recovered) = {
            let lexer = Lexer::new(
                syntax,
                Default::default(),
                StringInput::from(&*fm),
                Some(&comments),
            );
            let mut parser = Parser::new_from(lexer);

            let module = parser.parse_module().map_err(|e| ParseError::Syntax {
                file: file_name.to_string(),
                message: format!("{:?}", e.kind()),
            })?;
            (module, parser.take_errors())
        };

        for error in recovered {
            tracing::warn!(
                file = %file_name,
                error = ?error.kind(),
                "Recovered from syntax error"
            );
        }

        let start_pos = fm.start_pos;
        let mut ranges = Vec::new();
        let (leading, trailing) = comments.take_all();
        for map in [leading, trailing] {
            for list in map.borrow().values() {
                for comment in list.iter() {
                    let (Some(lo), Some(hi)) = (
                        comment.span.lo.0.checked_sub(start_pos.0),
                        comment.span.hi.0.checked_sub(start_pos.0),
                    ) else {
                        continue;
                    };
                    ranges.push(CommentRange {
                        lo: lo as usize,
                        hi: hi as usize,
                        style: match comment.kind {
                            CommentKind::Block => CommentStyle::Block,
                            CommentKind::Line => CommentStyle::Line,
                        },
                    });
                }
            }
        }

        tracing::debug!(
            file = %file_name,
            items = module.body.len(),
            comments = ranges.len(),
            "Parsed TypeScript file"
        );

        Ok(ParsedFile {
            module,
            source: SourceText::new(file_name, source.to_string(), start_pos, ranges),
        })
    }
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}
