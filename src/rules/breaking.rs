//! Breaking change rules.

use super::CATEGORY_FILE;
use crate::annotation::AnnotationOptions;
use crate::catalog::RuleType;
use crate::checkutil::{file_pair_rule_handler, rule_handler_fn, IteratorOptions};
use crate::handler::RuleHandler;
use crate::spec::RuleSpec;
use std::collections::HashSet;
use std::sync::Arc;

pub const FILE_NO_DELETE: &str = "FILE_NO_DELETE";
pub const FILE_SAME_PACKAGE: &str = "FILE_SAME_PACKAGE";
pub const FILE_NO_REMOVE: &str = "FILE_NO_REMOVE";

/// Source path of the package declaration in a file.
const PACKAGE_PATH: [i32; 1] = [2];

/// Get all breaking change rules
pub fn get_breaking_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new(
            FILE_NO_DELETE,
            "Checks that files are not deleted.",
            RuleType::Breaking,
            file_no_delete_handler(),
        )
        .with_categories([CATEGORY_FILE]),
        RuleSpec::new(
            FILE_SAME_PACKAGE,
            "Checks that files keep their package.",
            RuleType::Breaking,
            file_same_package_handler(),
        )
        .with_categories([CATEGORY_FILE]),
        RuleSpec::new(
            FILE_NO_REMOVE,
            "Checks that files are not removed.",
            RuleType::Breaking,
            file_no_delete_handler(),
        )
        .with_categories([CATEGORY_FILE])
        .deprecated_by([FILE_NO_DELETE]),
    ]
}

fn file_no_delete_handler() -> Arc<dyn RuleHandler> {
    rule_handler_fn(|ctx, writer, request| {
        let current: HashSet<&str> = request.files().iter().map(|f| f.name.as_str()).collect();
        for against_file in request.against_files().iter().filter(|f| !f.is_import) {
            if let Some(err) = ctx.err() {
                return Err(err.into());
            }
            if !current.contains(against_file.name.as_str()) {
                writer.add_annotation(
                    AnnotationOptions::new()
                        .with_against_descriptor(against_file.as_descriptor())
                        .with_message(format!(
                            "Previously present file {:?} was deleted.",
                            against_file.name
                        )),
                );
            }
        }
        Ok(())
    })
}

fn file_same_package_handler() -> Arc<dyn RuleHandler> {
    file_pair_rule_handler(
        |writer, _, file, against_file| {
            if file.package != against_file.package {
                writer.add_annotation(
                    AnnotationOptions::new()
                        .with_descriptor(file.descriptor_at(&PACKAGE_PATH))
                        .with_against_descriptor(against_file.descriptor_at(&PACKAGE_PATH))
                        .with_message(format!(
                            "Package changed from {:?} to {:?}.",
                            against_file.package, file.package
                        )),
                );
            }
            Ok(())
        },
        IteratorOptions::without_imports(),
    )
}
