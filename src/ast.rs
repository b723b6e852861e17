pub mod cpp;

pub use cpp::CppParser;

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    TranslationUnit,
    Namespace,
    /// `class`, `struct` or `union` with a body.
    Record,
    Enum,
    EnumConstant,
}

/// A declaration node, detached from the parser that produced it.
#[derive(Debug, Clone)]
pub struct Decl {
    pub kind: DeclKind,
    /// Empty for anonymous namespaces, records and enums.
    pub spelling: String,
    /// Comment text exactly as written in the source, several comments joined by `\n`.
    pub raw_comment: Option<String>,
    /// 1-based line of the declaration.
    pub line: usize,
    /// Record declared under `template <...>`; its name alone does not name a type.
    pub is_template: bool,
    pub children: Vec<Decl>,
}

impl Decl {
    pub fn new(kind: DeclKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            raw_comment: None,
            line: 0,
            is_template: false,
            children: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.raw_comment = Some(comment.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Decl>) -> Self {
        self.children = children;
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.spelling.is_empty()
    }

    pub fn as_template(mut self) -> Self {
        self.is_template = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TranslationUnit {
    /// Absolute path of the parsed file.
    pub path: PathBuf,
    pub root: Decl,
}

/// One step of a declaration's qualified-name ancestry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSegment {
    Namespace(String),
    Record(String),
    /// A class template or one of its partial specializations.
    TemplateRecord(String),
}

impl ScopeSegment {
    pub fn name(&self) -> &str {
        match self {
            Self::Namespace(name) | Self::Record(name) | Self::TemplateRecord(name) => name,
        }
    }

    /// Scope entered when descending into `decl`, if it opens a named one.
    pub fn for_decl(decl: &Decl) -> Option<Self> {
        if decl.is_anonymous() {
            return None;
        }
        match decl.kind {
            DeclKind::Namespace => Some(Self::Namespace(decl.spelling.clone())),
            DeclKind::Record if decl.is_template => Some(Self::TemplateRecord(decl.spelling.clone())),
            DeclKind::Record => Some(Self::Record(decl.spelling.clone())),
            _ => None,
        }
    }
}
