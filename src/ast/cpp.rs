use std::path::Path;

use tree_sitter::{Node, Parser};

use super::{Decl, DeclKind, TranslationUnit};
use crate::error::CodegenError;

/// Wrappers an enum or record may sit in; their leading comment documents the inner type.
const DECLARATION_WRAPPERS: &[&str] = &[
    "declaration",
    "field_declaration",
    "type_definition",
    "template_declaration",
];

const TRAILING_MARKERS: &[&str] = &["//<", "///<", "//!<", "/*!<", "/**<"];

/// C++ front end producing [`Decl`] trees with tree-sitter.
pub struct CppParser {
    parser: Parser,
}

impl CppParser {
    pub fn new() -> Result<Self, CodegenError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_cpp::LANGUAGE.into())?;
        Ok(Self { parser })
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<TranslationUnit, CodegenError> {
        let source = std::fs::read_to_string(path).map_err(|source| CodegenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_source(path, &source)
    }

    pub fn parse_source(&mut self, path: &Path, source: &str) -> Result<TranslationUnit, CodegenError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| CodegenError::ParseFailed {
                path: path.to_path_buf(),
            })?;

        let builder = DeclBuilder {
            source: source.as_bytes(),
        };

        let mut root = Decl::new(DeclKind::TranslationUnit, path.display().to_string());
        root.line = 1;
        root.children = builder.collect(tree.root_node());

        Ok(TranslationUnit {
            path: path.to_path_buf(),
            root,
        })
    }
}

struct DeclBuilder<'s> {
    source: &'s [u8],
}

impl<'s> DeclBuilder<'s> {
    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source).unwrap_or_default()
    }

    fn collect(&self, node: Node) -> Vec<Decl> {
        let mut decls = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child, &mut decls);
        }
        decls
    }

    fn visit(&self, node: Node, out: &mut Vec<Decl>) {
        match node.kind() {
            "namespace_definition" => out.push(self.namespace(node)),
            "class_specifier" | "struct_specifier" | "union_specifier"
                if node.child_by_field_name("body").is_some() =>
            {
                out.push(self.record(node))
            }
            "enum_specifier" if node.child_by_field_name("body").is_some() => {
                out.push(self.enumeration(node))
            }
            // Types local to a function cannot be named from a generated file.
            "comment" | "function_definition" | "lambda_expression" => {}
            _ => out.extend(self.collect(node)),
        }
    }

    fn namespace(&self, node: Node) -> Decl {
        // `namespace a::b {` is one node; `namespace {` has no name at all.
        let mut segments: Vec<&str> = match node.child_by_field_name("name") {
            Some(name) => self
                .text(name)
                .split("::")
                .map(|segment| {
                    let segment = segment.trim();
                    segment.strip_prefix("inline ").unwrap_or(segment).trim()
                })
                .filter(|segment| !segment.is_empty())
                .collect(),
            None => Vec::new(),
        };
        if segments.is_empty() {
            segments.push("");
        }

        let children = node
            .child_by_field_name("body")
            .map(|body| self.collect(body))
            .unwrap_or_default();
        let line = line_of(node);

        let innermost = segments.len() - 1;
        let mut decl = Decl::new(DeclKind::Namespace, segments[innermost]).with_children(children);
        decl.line = line;
        for segment in segments[..innermost].iter().rev() {
            let mut outer = Decl::new(DeclKind::Namespace, *segment).with_children(vec![decl]);
            outer.line = line;
            decl = outer;
        }
        decl.raw_comment = self.leading_comment(node);
        decl
    }

    fn record(&self, node: Node) -> Decl {
        let name = node
            .child_by_field_name("name")
            .map(|name| self.text(name).trim())
            .unwrap_or_default();
        let children = node
            .child_by_field_name("body")
            .map(|body| self.collect(body))
            .unwrap_or_default();

        let anchor = declaration_anchor(node);
        let mut decl = Decl::new(DeclKind::Record, name).with_children(children);
        decl.line = line_of(node);
        decl.is_template = is_templated(node, anchor);
        decl.raw_comment = self.leading_comment(anchor);
        decl
    }

    fn enumeration(&self, node: Node) -> Decl {
        let name = node
            .child_by_field_name("name")
            .map(|name| self.text(name).trim())
            .unwrap_or_default();
        let children = node
            .child_by_field_name("body")
            .map(|body| self.enumerators(body))
            .unwrap_or_default();

        let mut decl = Decl::new(DeclKind::Enum, name).with_children(children);
        decl.line = line_of(node);
        decl.raw_comment = self.leading_comment(declaration_anchor(node));
        decl
    }

    /// Enum constants with their comments.
    ///
    /// A comment belongs to the previous constant when it uses a `<` marker or
    /// starts on the line that constant (or its comma) ends on; otherwise it
    /// documents the next constant.
    fn enumerators(&self, list: Node) -> Vec<Decl> {
        let mut values: Vec<Decl> = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        let mut last_row: Option<usize> = None;

        let mut cursor = list.walk();
        for child in list.children(&mut cursor) {
            match child.kind() {
                "enumerator" => {
                    let name = child
                        .child_by_field_name("name")
                        .map(|name| self.text(name))
                        .unwrap_or_default();
                    let mut value = Decl::new(DeclKind::EnumConstant, name);
                    value.line = line_of(child);
                    if !pending.is_empty() {
                        value.raw_comment = Some(pending.join("\n"));
                        pending.clear();
                    }
                    last_row = Some(child.end_position().row);
                    values.push(value);
                }
                "," => {
                    if last_row.is_some() {
                        last_row = Some(child.end_position().row);
                    }
                }
                "comment" => {
                    let text = self.text(child);
                    let trailing = is_trailing_marker(text)
                        || last_row == Some(child.start_position().row);
                    match values.last_mut() {
                        Some(last) if trailing => append_comment(last, text),
                        _ => pending.push(text),
                    }
                }
                _ => {}
            }
        }

        values
    }

    /// Contiguous comments directly above `node`.
    fn leading_comment(&self, node: Node) -> Option<String> {
        let mut comments = Vec::new();
        let mut next_row = node.start_position().row;
        let mut current = node.prev_sibling();

        while let Some(sibling) = current {
            if sibling.kind() != "comment" || sibling.end_position().row + 1 < next_row {
                break;
            }
            let text = self.text(sibling);
            if is_trailing_marker(text) || ends_code_line(sibling) {
                break;
            }
            comments.push(text);
            next_row = sibling.start_position().row;
            current = sibling.prev_sibling();
        }

        if comments.is_empty() {
            return None;
        }
        comments.reverse();
        Some(comments.join("\n"))
    }
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn declaration_anchor(node: Node) -> Node {
    let mut anchor = node;
    while let Some(parent) = anchor.parent() {
        if !DECLARATION_WRAPPERS.contains(&parent.kind()) {
            break;
        }
        anchor = parent;
    }
    anchor
}

/// Whether a `template_declaration` sits between `node` and its anchor.
fn is_templated(node: Node, anchor: Node) -> bool {
    let mut current = node;
    while current.id() != anchor.id() {
        match current.parent() {
            Some(parent) if parent.kind() == "template_declaration" => return true,
            Some(parent) => current = parent,
            None => break,
        }
    }
    false
}

fn is_trailing_marker(comment: &str) -> bool {
    TRAILING_MARKERS
        .iter()
        .any(|marker| comment.starts_with(marker))
}

/// Whether `comment` trails code on the same line, like `int x; // note`.
fn ends_code_line(comment: Node) -> bool {
    comment.prev_sibling().is_some_and(|previous| {
        previous.kind() != "{" && previous.end_position().row == comment.start_position().row
    })
}

fn append_comment(decl: &mut Decl, text: &str) {
    match &mut decl.raw_comment {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(text);
        }
        None => decl.raw_comment = Some(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> TranslationUnit {
        let mut parser = CppParser::new().unwrap();
        parser.parse_source(Path::new("/project/include/colors.hpp"), source).unwrap()
    }

    fn find<'a>(decl: &'a Decl, kind: DeclKind, name: &str) -> Option<&'a Decl> {
        if decl.kind == kind && decl.spelling == name {
            return Some(decl);
        }
        decl.children.iter().find_map(|child| find(child, kind, name))
    }

    #[test]
    fn test_nested_namespace_is_split() {
        let tu = parse(
            r#"
namespace some::cool {
enum class Color { RED };
}
"#,
        );
        let outer = &tu.root.children[0];
        assert_eq!(outer.kind, DeclKind::Namespace);
        assert_eq!(outer.spelling, "some");
        let inner = &outer.children[0];
        assert_eq!(inner.spelling, "cool");
        assert_eq!(inner.children[0].kind, DeclKind::Enum);
        assert_eq!(inner.children[0].spelling, "Color");
    }

    #[test]
    fn test_enum_doc_comment_and_values() {
        let tu = parse(
            r#"#pragma once

namespace demo {
/**
 * @brief Palette.
 * @cpp_codegen
 * json_serialization
 */
enum class Color {
    RED,    //< "red"json
    GREEN,  //< "green"json
    BLUE,
};
}
"#,
        );
        let color = find(&tu.root, DeclKind::Enum, "Color").unwrap();
        assert!(color.raw_comment.as_deref().unwrap().contains("@cpp_codegen"));
        assert_eq!(color.line, 9);

        let names: Vec<_> = color.children.iter().map(|v| v.spelling.as_str()).collect();
        assert_eq!(names, vec!["RED", "GREEN", "BLUE"]);
        assert_eq!(color.children[0].raw_comment.as_deref(), Some("//< \"red\"json"));
        assert_eq!(color.children[1].raw_comment.as_deref(), Some("//< \"green\"json"));
        assert_eq!(color.children[2].raw_comment, None);
    }

    #[test]
    fn test_trailing_comment_continues_on_next_line() {
        let tu = parse(
            r#"
enum class Mode {
    FAST,  //< "fast"s
           //< "Fast"json
    SLOW,
};
"#,
        );
        let mode = find(&tu.root, DeclKind::Enum, "Mode").unwrap();
        assert_eq!(
            mode.children[0].raw_comment.as_deref(),
            Some("//< \"fast\"s\n//< \"Fast\"json")
        );
        assert_eq!(mode.children[1].raw_comment, None);
    }

    #[test]
    fn test_leading_value_comment() {
        let tu = parse(
            r#"
enum Level {
    /// "low" s
    LOW,
    HIGH
};
"#,
        );
        let level = find(&tu.root, DeclKind::Enum, "Level").unwrap();
        assert_eq!(level.children[0].raw_comment.as_deref(), Some("/// \"low\" s"));
        assert_eq!(level.children[1].raw_comment, None);
    }

    #[test]
    fn test_member_enum_inside_class() {
        let tu = parse(
            r#"
namespace outer {
class Holder {
public:
    /**
     * @cpp_codegen
     * string_serialization
     */
    enum class Inner { A, B };
};
}
"#,
        );
        let holder = find(&tu.root, DeclKind::Record, "Holder").unwrap();
        let inner = find(holder, DeclKind::Enum, "Inner").unwrap();
        assert!(inner.raw_comment.as_deref().unwrap().contains("string_serialization"));
        assert_eq!(inner.children.len(), 2);
    }

    #[test]
    fn test_class_template_is_flagged() {
        let tu = parse(
            r#"
template <typename T>
class Box {
public:
    enum class State { EMPTY, FULL };
};

class Plain {
    enum class State { ON };
};
"#,
        );
        assert!(find(&tu.root, DeclKind::Record, "Box").unwrap().is_template);
        assert!(!find(&tu.root, DeclKind::Record, "Plain").unwrap().is_template);
    }

    #[test]
    fn test_detached_comment_is_ignored() {
        let tu = parse(
            r#"
/** @cpp_codegen */

enum class Lonely { ONE };

enum class Bare { TWO };
"#,
        );
        assert_eq!(find(&tu.root, DeclKind::Enum, "Lonely").unwrap().raw_comment, None);
        assert_eq!(find(&tu.root, DeclKind::Enum, "Bare").unwrap().raw_comment, None);
    }

    #[test]
    fn test_anonymous_namespace() {
        let tu = parse(
            r#"
namespace {
enum class Hidden { X };
}
"#,
        );
        let namespace = &tu.root.children[0];
        assert_eq!(namespace.kind, DeclKind::Namespace);
        assert!(namespace.is_anonymous());
        assert_eq!(namespace.children[0].spelling, "Hidden");
    }
}
