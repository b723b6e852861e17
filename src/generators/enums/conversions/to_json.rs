use super::{cpp_string, in_namespace, Conversion, ConversionResult};
use crate::generators::enums::model::{EnumDeclaration, FileInfo, GenerationConfig, ValueLiteral};

/// `to_json`/`from_json` overloads picked up by `nlohmann::json` through ADL.
pub struct ToJsonConversion;

impl Conversion for ToJsonConversion {
    fn name(&self) -> &'static str {
        "json_serialization"
    }

    fn value_postfix(&self) -> &'static str {
        "json"
    }

    fn convert(
        &self,
        values: &[ValueLiteral],
        enum_decl: &EnumDeclaration,
        _file_info: &FileInfo,
        _config: &GenerationConfig,
    ) -> ConversionResult {
        let enum_type = enum_decl.qualified();

        let header = format!(
            "void to_json(nlohmann::json& json, const {enum_type}& value);\n\
             void from_json(const nlohmann::json& json, {enum_type}& value);\n"
        );

        let mut source = format!(
            "void to_json(nlohmann::json& json, const {enum_type}& value) {{\n    switch (value) {{\n"
        );
        for value in values {
            source.push_str(&format!(
                "        case {}:\n            json = {};\n            return;\n",
                value.reference,
                cpp_string(&value.literal)
            ));
        }
        source.push_str("    }\n");
        source.push_str(&format!(
            "    throw std::out_of_range({} + std::to_string(static_cast<long long>(value)));\n}}\n\n",
            cpp_string(&format!("Unknown {enum_type} value: "))
        ));

        source.push_str(&format!(
            "void from_json(const nlohmann::json& json, {enum_type}& value) {{\n\
             \x20   static const std::unordered_map<std::string, {enum_type}> values{{\n"
        ));
        for value in values {
            source.push_str(&format!(
                "        {{{}, {}}},\n",
                cpp_string(&value.literal),
                value.reference
            ));
        }
        source.push_str("    };\n");
        source.push_str("    const auto it = values.find(json.get<std::string>());\n");
        source.push_str("    if (it == values.end()) {\n");
        source.push_str(&format!(
            "        throw std::invalid_argument({} + json.dump());\n",
            cpp_string(&format!("Unknown {enum_type} name: "))
        ));
        source.push_str("    }\n    value = it->second;\n}\n");

        ConversionResult {
            header_text: in_namespace(&enum_decl.namespace, &header),
            source_text: in_namespace(&enum_decl.namespace, &source),
            header_includes: ["nlohmann/json.hpp"].map(String::from).into(),
            source_includes: ["stdexcept", "string", "unordered_map"].map(String::from).into(),
        }
    }
}
