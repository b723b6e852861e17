use std::collections::BTreeSet;

use super::conversions::ConversionResult;

fn banner(include_path: &str) -> String {
    format!("// Generated by cpp-enum-codegen from {include_path}, do not edit.\n")
}

fn include_lines(includes: &BTreeSet<String>) -> String {
    includes
        .iter()
        .map(|include| format!("#include <{include}>\n"))
        .collect()
}

/// Top-level header: the annotated header first, then every include the fragments need.
pub fn render_header(include_path: &str, results: &[ConversionResult]) -> String {
    let includes: BTreeSet<String> = results
        .iter()
        .flat_map(|result| result.header_includes.iter().cloned())
        .collect();

    let mut output = banner(include_path);
    output.push_str("#pragma once\n\n");
    output.push_str(&format!("#include <{include_path}>\n"));
    output.push_str(&include_lines(&includes));
    for result in results {
        output.push('\n');
        output.push_str(&result.header_text);
    }
    output
}

/// Top-level source, including its own header through `header_include`.
pub fn render_source(header_include: &str, include_path: &str, results: &[ConversionResult]) -> String {
    let includes: BTreeSet<String> = results
        .iter()
        .flat_map(|result| result.source_includes.iter().cloned())
        .collect();

    let mut output = banner(include_path);
    output.push('\n');
    output.push_str(&format!("#include <{header_include}>\n"));
    if !includes.is_empty() {
        output.push('\n');
        output.push_str(&include_lines(&includes));
    }
    for result in results {
        output.push('\n');
        output.push_str(&result.source_text);
    }
    output
}
