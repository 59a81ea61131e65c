//! coco_ast: the parsed form of a single source text.

use crate::node::CompilationUnit;
use coco_core::text::LineMap;
use coco_diagnostics::Diagnostic;

/// A parsed source text together with the diagnostics produced while
/// scanning and parsing it. Owns its text so trees from successive
/// submissions can outlive the strings they were parsed from.
#[derive(Debug)]
pub struct SyntaxTree {
    text: String,
    root: CompilationUnit,
    diagnostics: Vec<Diagnostic>,
}

impl SyntaxTree {
    pub fn new(text: String, root: CompilationUnit, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            text,
            root,
            diagnostics,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> &CompilationUnit {
        &self.root
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Line-offset index over the source text, for reporting.
    pub fn line_map(&self) -> LineMap {
        LineMap::new(&self.text)
    }
}
