//! Per-language spelling of an options expression.

use heck::ToSnakeCase;
use serde_json::Value;

use super::TargetLanguage;
use crate::domain::value::ConfigValue;

/// Spelling rules for one target language.
///
/// The renderer decides *what* to emit (which options, enum or literal);
/// a syntax decides *how* each fragment is written.
pub trait TargetSyntax: Send + Sync {
    fn language(&self) -> TargetLanguage;

    /// First fragment, e.g. `Options.builder()`.
    fn opener(&self, options_type: &str) -> String;

    /// Setter or keyword-argument name for an option.
    fn setter(&self, option: &str) -> String;

    fn option_fragment(&self, setter: &str, value: &str) -> String;

    fn closer(&self) -> String;

    fn enum_reference(&self, enum_name: &str, member: &str) -> String {
        format!("{enum_name}.{member}")
    }

    fn literal(&self, value: &ConfigValue) -> String;
}

/// Java builder chain: `Options.builder().name("x").build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaSyntax;

impl TargetSyntax for JavaSyntax {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Java
    }

    fn opener(&self, options_type: &str) -> String {
        format!("{options_type}.builder()")
    }

    fn setter(&self, option: &str) -> String {
        option.to_string()
    }

    fn option_fragment(&self, setter: &str, value: &str) -> String {
        format!(".{setter}({value})")
    }

    fn closer(&self) -> String {
        ".build()".to_string()
    }

    /// JSON literal of the value.
    fn literal(&self, value: &ConfigValue) -> String {
        value.to_json_lossy().to_string()
    }
}

/// Python constructor call with keyword arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonSyntax;

impl TargetSyntax for PythonSyntax {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Python
    }

    fn opener(&self, options_type: &str) -> String {
        format!("{options_type}(")
    }

    fn setter(&self, option: &str) -> String {
        option.to_snake_case()
    }

    fn option_fragment(&self, setter: &str, value: &str) -> String {
        format!("{setter}={value},")
    }

    fn closer(&self) -> String {
        ")".to_string()
    }

    fn literal(&self, value: &ConfigValue) -> String {
        let mut out = String::new();
        write_python(&value.to_json_lossy(), &mut out);
        out
    }
}

fn write_python(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&n.to_string()),
        // a JSON string literal is also a valid Python string literal
        Value::String(s) => out.push_str(&Value::String(s.clone()).to_string()),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_python(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push_str(": ");
                write_python(item, out);
            }
            out.push('}');
        }
    }
}
