//! Output formatting for the `rulekit` binary.
//!
//! JSON output is the wire format and is what a host reads back from the
//! plugin process. Text output is for people running the binary by hand.
//!
//! Line and column numbers are stored zero-based and printed one-based.

use crate::annotation::{Annotation, Location, Response};
use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::version::VersionInfo;
use crate::wire;
use serde::Serialize;

/// Trait for output formatters
pub trait OutputFormatter {
    fn format_check(&self, response: &Response) -> Result<String>;

    fn format_rules(&self, page: &wire::ListRulesResponse) -> Result<String>;

    fn format_categories(&self, page: &wire::ListCategoriesResponse) -> Result<String>;

    fn format_plugin_info(&self, info: &wire::GetPluginInfoResponse) -> Result<String>;

    fn format_version(&self, info: &VersionInfo) -> Result<String>;

    /// Never fails; an error reply must always be producible.
    fn format_error(&self, error: &wire::WireError) -> String;
}

/// Wire JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_check(&self, response: &Response) -> Result<String> {
        let message = wire::CheckResponse {
            annotations: response
                .annotations()
                .iter()
                .map(wire::WireAnnotation::from)
                .collect(),
        };
        self.render(&message)
    }

    fn format_rules(&self, page: &wire::ListRulesResponse) -> Result<String> {
        self.render(page)
    }

    fn format_categories(&self, page: &wire::ListCategoriesResponse) -> Result<String> {
        self.render(page)
    }

    fn format_plugin_info(&self, info: &wire::GetPluginInfoResponse) -> Result<String> {
        self.render(info)
    }

    fn format_version(&self, info: &VersionInfo) -> Result<String> {
        self.render(info)
    }

    fn format_error(&self, error: &wire::WireError) -> String {
        // Two plain strings always serialize.
        self.render(error)
            .unwrap_or_else(|_| format!("{{\"code\":\"{}\",\"message\":{:?}}}", error.code, error.message))
    }
}

/// Human-readable formatter
pub struct TextFormatter;

impl TextFormatter {
    fn location(location: &Location) -> String {
        format!(
            "{}:{}:{}",
            location.file_name,
            location.start_line + 1,
            location.start_column + 1
        )
    }

    fn annotation(annotation: &Annotation) -> String {
        let mut line = match &annotation.location {
            Some(location) => format!("{}:{}", Self::location(location), annotation.message),
            None => annotation.message.clone(),
        };
        line.push_str(&format!(" ({})", annotation.rule_id));
        if let Some(against) = &annotation.against_location {
            line.push_str(&format!(" [against {}]", Self::location(against)));
        }
        line
    }
}

impl OutputFormatter for TextFormatter {
    fn format_check(&self, response: &Response) -> Result<String> {
        if response.is_empty() {
            return Ok("No annotations.".to_string());
        }
        let lines: Vec<String> = response.annotations().iter().map(Self::annotation).collect();
        Ok(lines.join("\n"))
    }

    fn format_rules(&self, page: &wire::ListRulesResponse) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!(
            "{:<24} {:<9} {:<8} {:<20} {}\n",
            "ID", "TYPE", "DEFAULT", "CATEGORIES", "PURPOSE"
        ));
        for rule in &page.rules {
            let mut purpose = rule.purpose.clone();
            if rule.deprecated {
                purpose = if rule.replacement_ids.is_empty() {
                    format!("{} (deprecated)", purpose)
                } else {
                    format!(
                        "{} (deprecated, use {})",
                        purpose,
                        rule.replacement_ids.join(", ")
                    )
                };
            }
            output.push_str(&format!(
                "{:<24} {:<9} {:<8} {:<20} {}\n",
                rule.id,
                rule.rule_type.to_string(),
                if rule.default { "yes" } else { "no" },
                rule.category_ids.join(","),
                purpose
            ));
        }
        push_next_page(&mut output, &page.next_page_token);
        Ok(output.trim_end().to_string())
    }

    fn format_categories(&self, page: &wire::ListCategoriesResponse) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!("{:<24} {}\n", "ID", "PURPOSE"));
        for category in &page.categories {
            let purpose = if category.deprecated {
                format!("{} (deprecated)", category.purpose)
            } else {
                category.purpose.clone()
            };
            output.push_str(&format!("{:<24} {}\n", category.id, purpose));
        }
        push_next_page(&mut output, &page.next_page_token);
        Ok(output.trim_end().to_string())
    }

    fn format_plugin_info(&self, info: &wire::GetPluginInfoResponse) -> Result<String> {
        let mut output = String::new();
        if !info.url.is_empty() {
            output.push_str(&format!("URL: {}\n", info.url));
        }
        if !info.documentation.is_empty() {
            output.push_str(&format!("{}\n", info.documentation));
        }
        if let Some(license) = &info.license {
            if !license.spdx_license_id.is_empty() {
                output.push_str(&format!("License: {}\n", license.spdx_license_id));
            }
            if !license.url.is_empty() {
                output.push_str(&format!("License URL: {}\n", license.url));
            }
            if !license.text.is_empty() {
                output.push_str(&format!("\n{}\n", license.text));
            }
        }
        Ok(output.trim_end().to_string())
    }

    fn format_version(&self, info: &VersionInfo) -> Result<String> {
        Ok(info.to_string())
    }

    fn format_error(&self, error: &wire::WireError) -> String {
        format!("Error ({}): {}", error.code, error.message)
    }
}

fn push_next_page(output: &mut String, next_page_token: &str) {
    if !next_page_token.is_empty() {
        output.push_str(&format!("\nNext page token: {}\n", next_page_token));
    }
}

/// Get formatter for the given output format
pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Text => Box::new(TextFormatter),
    }
}
