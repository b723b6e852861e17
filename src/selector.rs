use std::collections::VecDeque;

use crate::ast::{Decl, DeclKind, ScopeSegment, TranslationUnit};
use crate::generators::Generator;

/// Token opting a declaration into generation.
///
/// Earlier versions of the tool used `@delta_enable_codegen`; only this one is recognised.
pub const CODEGEN_MARKER: &str = "@cpp_codegen";

/// A marked declaration together with the generators that accept it.
pub struct SelectedDecl<'a> {
    pub decl: &'a Decl,
    /// Enclosing namespaces and records, outermost first.
    pub scope: Vec<ScopeSegment>,
    pub generators: Vec<&'a dyn Generator>,
}

pub fn has_marker(decl: &Decl) -> bool {
    decl.raw_comment
        .as_deref()
        .is_some_and(|comment| comment.contains(CODEGEN_MARKER))
}

/// Breadth-first search for marked declarations.
///
/// Enum constants are never visited on their own: they are generated as part
/// of their enum.
pub fn select<'a>(tu: &'a TranslationUnit, generators: &'a [Box<dyn Generator>]) -> Vec<SelectedDecl<'a>> {
    let mut selected = Vec::new();
    let mut queue: VecDeque<(&Decl, Vec<ScopeSegment>)> = VecDeque::new();
    queue.push_back((&tu.root, Vec::new()));

    while let Some((decl, scope)) = queue.pop_front() {
        if has_marker(decl) {
            let accepting: Vec<&dyn Generator> = generators
                .iter()
                .map(|generator| generator.as_ref())
                .filter(|generator| generator.need_to_generate(decl))
                .collect();

            if !accepting.is_empty() {
                selected.push(SelectedDecl {
                    decl,
                    scope: scope.clone(),
                    generators: accepting,
                });
            }
        }

        if decl.kind == DeclKind::Enum {
            continue;
        }

        let mut child_scope = scope;
        if decl.kind != DeclKind::TranslationUnit {
            child_scope.extend(ScopeSegment::for_decl(decl));
        }
        for child in &decl.children {
            queue.push_back((child, child_scope.clone()));
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::GeneratedFile;
    use crate::error::CodegenError;
    use std::path::PathBuf;

    struct KindGenerator(DeclKind);

    impl Generator for KindGenerator {
        fn name(&self) -> &str {
            "kind"
        }

        fn need_to_generate(&self, decl: &Decl) -> bool {
            decl.kind == self.0
        }

        fn generate(
            &self,
            _unit: &SelectedDecl<'_>,
            _tu: &TranslationUnit,
        ) -> Result<Vec<GeneratedFile>, CodegenError> {
            Ok(Vec::new())
        }
    }

    fn marked_enum(name: &str) -> Decl {
        Decl::new(DeclKind::Enum, name)
            .with_comment("/** @cpp_codegen\n * json_serialization */")
            .with_children(vec![
                Decl::new(DeclKind::EnumConstant, "A").with_comment("//< @cpp_codegen"),
            ])
    }

    fn unit(children: Vec<Decl>) -> TranslationUnit {
        TranslationUnit {
            path: PathBuf::from("/project/a.hpp"),
            root: Decl::new(DeclKind::TranslationUnit, "/project/a.hpp").with_children(children),
        }
    }

    #[test]
    fn test_selects_marked_enums_with_scope() {
        let tu = unit(vec![Decl::new(DeclKind::Namespace, "outer").with_children(vec![
            Decl::new(DeclKind::Record, "Holder").with_children(vec![marked_enum("Inner")]),
            marked_enum("Top"),
        ])]);
        let generators: Vec<Box<dyn Generator>> = vec![Box::new(KindGenerator(DeclKind::Enum))];

        let selected = select(&tu, &generators);
        let names: Vec<_> = selected.iter().map(|s| s.decl.spelling.as_str()).collect();
        // Breadth first: `Top` is shallower than `Inner`.
        assert_eq!(names, vec!["Top", "Inner"]);
        assert_eq!(
            selected[1].scope,
            vec![
                ScopeSegment::Namespace("outer".to_string()),
                ScopeSegment::Record("Holder".to_string()),
            ]
        );
    }

    #[test]
    fn test_skips_unmarked_and_uncommented() {
        let tu = unit(vec![
            Decl::new(DeclKind::Enum, "Plain"),
            Decl::new(DeclKind::Enum, "Documented").with_comment("/** just docs */"),
        ]);
        let generators: Vec<Box<dyn Generator>> = vec![Box::new(KindGenerator(DeclKind::Enum))];
        assert!(select(&tu, &generators).is_empty());
    }

    #[test]
    fn test_enum_constants_are_not_dispatched() {
        let tu = unit(vec![marked_enum("Color")]);
        let generators: Vec<Box<dyn Generator>> =
            vec![Box::new(KindGenerator(DeclKind::EnumConstant))];
        assert!(select(&tu, &generators).is_empty());
    }

    #[test]
    fn test_every_accepting_generator_is_paired() {
        let tu = unit(vec![marked_enum("Color")]);
        let generators: Vec<Box<dyn Generator>> = vec![
            Box::new(KindGenerator(DeclKind::Enum)),
            Box::new(KindGenerator(DeclKind::Record)),
            Box::new(KindGenerator(DeclKind::Enum)),
        ];
        let selected = select(&tu, &generators);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].generators.len(), 2);
    }

    #[test]
    fn test_anonymous_namespace_adds_no_scope() {
        let tu = unit(vec![
            Decl::new(DeclKind::Namespace, "").with_children(vec![marked_enum("Hidden")]),
        ]);
        let generators: Vec<Box<dyn Generator>> = vec![Box::new(KindGenerator(DeclKind::Enum))];
        let selected = select(&tu, &generators);
        assert!(selected[0].scope.is_empty());
    }

    #[test]
    fn test_class_template_scope_is_marked() {
        let tu = unit(vec![Decl::new(DeclKind::Record, "Box")
            .as_template()
            .with_children(vec![marked_enum("State")])]);
        let generators: Vec<Box<dyn Generator>> = vec![Box::new(KindGenerator(DeclKind::Enum))];
        let selected = select(&tu, &generators);
        assert_eq!(
            selected[0].scope,
            vec![ScopeSegment::TemplateRecord("Box".to_string())]
        );
    }
}
