use super::{cpp_string, in_namespace, Conversion, ConversionResult};
use crate::generators::enums::model::{EnumDeclaration, FileInfo, GenerationConfig, ValueLiteral};

/// `to_string(Enum)` next to the enum, `from_string<Enum>(std::string_view)` in the generated namespace.
pub struct ToStringConversion;

impl Conversion for ToStringConversion {
    fn name(&self) -> &'static str {
        "string_serialization"
    }

    fn value_postfix(&self) -> &'static str {
        "s"
    }

    fn convert(
        &self,
        values: &[ValueLiteral],
        enum_decl: &EnumDeclaration,
        _file_info: &FileInfo,
        config: &GenerationConfig,
    ) -> ConversionResult {
        let enum_type = enum_decl.qualified();

        ConversionResult {
            header_text: render_header(&enum_type, &enum_decl.namespace, &config.namespace),
            source_text: render_source(&enum_type, values, &enum_decl.namespace, &config.namespace),
            header_includes: ["string", "string_view"].map(String::from).into(),
            source_includes: ["stdexcept", "unordered_map"].map(String::from).into(),
        }
    }
}

fn render_header(enum_type: &str, enum_namespace: &[String], namespace: &[String]) -> String {
    let to_string = format!("std::string to_string({enum_type} value);\n");
    let from_string = format!(
        "template <typename T>\n\
         T from_string(std::string_view value);\n\
         \n\
         template <>\n\
         {enum_type} from_string<{enum_type}>(std::string_view value);\n"
    );

    let mut output = in_namespace(enum_namespace, &to_string);
    output.push('\n');
    output.push_str(&in_namespace(namespace, &from_string));
    output
}

fn render_source(
    enum_type: &str,
    values: &[ValueLiteral],
    enum_namespace: &[String],
    namespace: &[String],
) -> String {
    let mut to_string = format!("std::string to_string({enum_type} value) {{\n    switch (value) {{\n");
    for value in values {
        to_string.push_str(&format!(
            "        case {}:\n            return {};\n",
            value.reference,
            cpp_string(&value.literal)
        ));
    }
    to_string.push_str("    }\n");
    to_string.push_str(&format!(
        "    throw std::out_of_range({} + std::to_string(static_cast<long long>(value)));\n}}\n",
        cpp_string(&format!("Unknown {enum_type} value: "))
    ));

    let mut from_string = format!(
        "template <>\n\
         {enum_type} from_string<{enum_type}>(std::string_view value) {{\n\
         \x20   static const std::unordered_map<std::string_view, {enum_type}> values{{\n"
    );
    for value in values {
        from_string.push_str(&format!(
            "        {{{}, {}}},\n",
            cpp_string(&value.literal),
            value.reference
        ));
    }
    from_string.push_str("    };\n");
    from_string.push_str("    const auto it = values.find(value);\n");
    from_string.push_str("    if (it == values.end()) {\n");
    from_string.push_str(&format!(
        "        throw std::invalid_argument({} + std::string(value));\n",
        cpp_string(&format!("Unknown {enum_type} name: "))
    ));
    from_string.push_str("    }\n    return it->second;\n}\n");

    let mut output = in_namespace(enum_namespace, &to_string);
    output.push('\n');
    output.push_str(&in_namespace(namespace, &from_string));
    output
}
