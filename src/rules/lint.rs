//! Lint rules.

use super::CATEGORY_BASIC;
use crate::annotation::AnnotationOptions;
use crate::catalog::RuleType;
use crate::checkutil::{file_import_rule_handler, file_rule_handler, IteratorOptions};
use crate::spec::RuleSpec;

pub const SYNTAX_SPECIFIED: &str = "SYNTAX_SPECIFIED";
pub const IMPORT_USED: &str = "IMPORT_USED";

/// Source path of the syntax declaration in a file.
const SYNTAX_PATH: [i32; 1] = [12];
/// Field number of the dependency list in a file.
const DEPENDENCY_FIELD: i32 = 3;

/// Get all lint rules
pub fn get_lint_rules() -> Vec<RuleSpec> {
    vec![syntax_specified_rule(), import_used_rule()]
}

fn syntax_specified_rule() -> RuleSpec {
    RuleSpec::new(
        SYNTAX_SPECIFIED,
        "Checks that all files have their syntax specified.",
        RuleType::Lint,
        file_rule_handler(
            |writer, _, file| {
                if file.is_syntax_unspecified {
                    writer.add_annotation(
                        AnnotationOptions::new()
                            .with_file_name_and_source_path(file.name.clone(), SYNTAX_PATH)
                            .with_message(format!(
                                "Syntax should be specified for file {:?}.",
                                file.name
                            )),
                    );
                }
                Ok(())
            },
            IteratorOptions::without_imports(),
        ),
    )
    .with_categories([CATEGORY_BASIC])
    .as_default()
}

fn import_used_rule() -> RuleSpec {
    RuleSpec::new(
        IMPORT_USED,
        "Checks that all imports are used.",
        RuleType::Lint,
        file_import_rule_handler(
            |writer, _, import| {
                if import.is_unused {
                    let index = i32::try_from(import.index)?;
                    writer.add_annotation(
                        AnnotationOptions::new()
                            .with_file_name_and_source_path(
                                import.file.name.clone(),
                                vec![DEPENDENCY_FIELD, index],
                            )
                            .with_message(format!("Import {:?} is unused.", import.name)),
                    );
                }
                Ok(())
            },
            IteratorOptions::without_imports(),
        ),
    )
    .with_categories([CATEGORY_BASIC])
    .as_default()
}
