//! Helpers for writing rule handlers.
//!
//! Each helper wraps a per-item callback into a [`RuleHandler`] that walks
//! the request for you. Walks stop early once the call's context is done.

use crate::descriptor::FileDescriptor;
use crate::engine::aggregator::ResponseWriter;
use crate::engine::context::Context;
use crate::handler::RuleHandler;
use crate::request::Request;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Which files a walk visits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IteratorOptions {
    pub without_imports: bool,
}

impl IteratorOptions {
    /// Skip files that are only present as imports.
    pub fn without_imports() -> Self {
        IteratorOptions {
            without_imports: true,
        }
    }

    fn includes(&self, file: &FileDescriptor) -> bool {
        !(self.without_imports && file.is_import)
    }
}

/// One import statement of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileImport<'a> {
    pub file: &'a FileDescriptor,
    /// Position in `file.dependencies`
    pub index: usize,
    pub name: &'a str,
    pub is_unused: bool,
}

/// Box a closure as a handler.
///
/// Plain closures already implement [`RuleHandler`]; going through this
/// function pins down the closure's signature so argument types can be
/// left out.
pub fn rule_handler_fn<F>(f: F) -> Arc<dyn RuleHandler>
where
    F: Fn(&Context, &ResponseWriter<'_>, &Request) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn check_done(ctx: &Context) -> anyhow::Result<()> {
    match ctx.err() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Handler calling `f` for every file of the request.
pub fn file_rule_handler<F>(f: F, options: IteratorOptions) -> Arc<dyn RuleHandler>
where
    F: Fn(&ResponseWriter<'_>, &Request, &FileDescriptor) -> anyhow::Result<()>
        + Send
        + Sync
        + 'static,
{
    rule_handler_fn(move |ctx, writer, request| {
        for file in request.files().iter().filter(|f| options.includes(f)) {
            check_done(ctx)?;
            f(writer, request, file)?;
        }
        Ok(())
    })
}

/// Handler calling `f` for every import of every file of the request.
pub fn file_import_rule_handler<F>(f: F, options: IteratorOptions) -> Arc<dyn RuleHandler>
where
    F: Fn(&ResponseWriter<'_>, &Request, &FileImport<'_>) -> anyhow::Result<()>
        + Send
        + Sync
        + 'static,
{
    rule_handler_fn(move |ctx, writer, request| {
        for file in request.files().iter().filter(|f| options.includes(f)) {
            check_done(ctx)?;
            for (index, name) in file.dependencies.iter().enumerate() {
                let import = FileImport {
                    file,
                    index,
                    name,
                    is_unused: file.unused_dependencies.contains(&index),
                };
                f(writer, request, &import)?;
            }
        }
        Ok(())
    })
}

/// Handler calling `f` for every file that exists in both the request's
/// files and its against files, paired by name, in name order.
pub fn file_pair_rule_handler<F>(f: F, options: IteratorOptions) -> Arc<dyn RuleHandler>
where
    F: Fn(&ResponseWriter<'_>, &Request, &FileDescriptor, &FileDescriptor) -> anyhow::Result<()>
        + Send
        + Sync
        + 'static,
{
    rule_handler_fn(move |ctx, writer, request| {
        let files = by_name(request.files(), options);
        for (name, against_file) in by_name(request.against_files(), options) {
            if let Some(file) = files.get(name) {
                check_done(ctx)?;
                f(writer, request, file, against_file)?;
            }
        }
        Ok(())
    })
}

fn by_name(files: &[FileDescriptor], options: IteratorOptions) -> BTreeMap<&str, &FileDescriptor> {
    files
        .iter()
        .filter(|f| options.includes(f))
        .map(|f| (f.name.as_str(), f))
        .collect()
}
