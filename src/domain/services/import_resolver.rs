//! Import Resolver
//!
//! Enumerates every file a root stylesheet depends on:
//!
//! 1. conventional `@import`s, expanded and reported by the stylesheet
//!    processor (an unresolvable one fails the whole listing);
//! 2. `data-uri(...)` resources with a literal path, resolved with the path
//!    resolver and confirmed on disk (a missing one is reported and dropped).
//!
//! Embedded resources are leaves; they are never scanned themselves.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::reference_scanner::{scan_references, ReferencePath};
use crate::domain::entities::{ImportRecord, StylesheetFile};
use crate::domain::ports::{
    Diagnostic, DiagnosticSink, FileSystem, PathResolver, RenderOptions, SourceUnit,
    StylesheetProcessor,
};
use crate::error::{ImportError, ImportResult, ProcessingFailure};

/// Lists the dependencies of a stylesheet
pub struct ImportResolver {
    processor: Arc<dyn StylesheetProcessor>,
    resolver: Arc<dyn PathResolver>,
    fs: Arc<dyn FileSystem>,
    sink: Arc<dyn DiagnosticSink>,
    options: RenderOptions,
}

impl ImportResolver {
    pub fn new(
        processor: Arc<dyn StylesheetProcessor>,
        resolver: Arc<dyn PathResolver>,
        fs: Arc<dyn FileSystem>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            processor,
            resolver,
            fs,
            sink,
            options: RenderOptions::default(),
        }
    }

    /// Use a private copy of `options` for every listing.
    pub fn with_options(mut self, options: &RenderOptions) -> Self {
        self.options = options.clone();
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// List the dependencies of `file` with the configured options.
    pub fn list_imports(&self, file: Option<StylesheetFile>) -> ImportResult<Vec<ImportRecord>> {
        self.list_imports_with(file, &self.options)
    }

    /// List the dependencies of the file at `path`, read through the
    /// file system port.
    pub fn list_imports_for_path(&self, path: &Path) -> ImportResult<Vec<ImportRecord>> {
        let bytes = self.fs.read(path)?;
        self.list_imports(Some(StylesheetFile::new(path, bytes)))
    }

    /// List the dependencies of `file` with caller-supplied options.
    ///
    /// `options` is only borrowed; the processor gets its own clone.
    pub fn list_imports_with(
        &self,
        file: Option<StylesheetFile>,
        options: &RenderOptions,
    ) -> ImportResult<Vec<ImportRecord>> {
        let Some(file) = file else {
            return Ok(Vec::new());
        };
        let (Some(root), Some(contents)) = file.into_parts() else {
            return Ok(Vec::new());
        };

        let text = contents.into_string().map_err(|source| ImportError::Read {
            path: root.clone(),
            source,
        })?;
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let render_options = options.clone();
        let processed = self
            .processor
            .render(&text, &root, &render_options)
            .map_err(|e| ImportError::processing(&root, e))?;

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for record in processed.imports {
            if seen.insert(record.path().to_path_buf()) {
                records.push(record);
            }
        }

        let units = if processed.sources.is_empty() {
            vec![SourceUnit {
                path: root.clone(),
                text,
            }]
        } else {
            processed.sources
        };

        for unit in &units {
            for resource in self.embedded_resources(&root, unit, &render_options.paths)? {
                if seen.insert(resource.clone()) {
                    records.push(ImportRecord::new(resource));
                }
            }
        }

        Ok(records)
    }

    /// Resolve the literal `data-uri` references of one source unit.
    fn embedded_resources(
        &self,
        root: &Path,
        unit: &SourceUnit,
        search_paths: &[PathBuf],
    ) -> ImportResult<Vec<PathBuf>> {
        let references = scan_references(&unit.text).map_err(|call| {
            ImportError::processing(
                root,
                ProcessingFailure::MalformedReference {
                    file: unit.path.clone(),
                    line: call.line,
                    message: call.message,
                },
            )
        })?;

        let mut resolved = Vec::new();
        for reference in references {
            let ReferencePath::Literal(raw) = reference.path else {
                continue;
            };
            let Some(candidate) = local_file_part(&raw) else {
                continue;
            };

            let base = if Path::new(candidate).is_absolute() {
                PathBuf::new()
            } else {
                unit.path.parent().map(Path::to_path_buf).unwrap_or_default()
            };

            let path = self
                .resolver
                .resolve(&base, candidate, search_paths)
                .map_err(|e| ImportError::processing(root, e))?;

            if self.fs.try_exists(&path)? {
                resolved.push(path);
            } else {
                self.sink
                    .on_diagnostic(Diagnostic::ImportNotFound { path });
            }
        }
        Ok(resolved)
    }
}

/// Strip a `#fragment` and reject references that are not local files.
fn local_file_part(raw: &str) -> Option<&str> {
    let lower = raw.to_ascii_lowercase();
    if raw.starts_with("//")
        || ["http:", "https:", "data:"]
            .iter()
            .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }
    let path = raw.split('#').next().unwrap_or(raw);
    (!path.is_empty()).then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        CollectingSink, ProcessedStylesheet, ProcessorError, ResolveError, ResolveResult,
    };
    use crate::infrastructure::fs::MockFileSystem;
    use std::io;
    use std::sync::Mutex;

    /// Processor that reports fixed imports and records what it was given
    #[derive(Default)]
    struct FakeProcessor {
        imports: Vec<PathBuf>,
        fail_with: Option<String>,
        calls: Mutex<Vec<(String, RenderOptions)>>,
    }

    impl StylesheetProcessor for FakeProcessor {
        fn render(
            &self,
            text: &str,
            _path: &Path,
            options: &RenderOptions,
        ) -> Result<ProcessedStylesheet, ProcessorError> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), options.clone()));
            if let Some(msg) = &self.fail_with {
                return Err(ProcessorError::Other(msg.clone()));
            }
            Ok(ProcessedStylesheet {
                imports: self.imports.iter().cloned().map(ImportRecord::new).collect(),
                sources: Vec::new(),
            })
        }
    }

    /// Resolver that joins base and candidate without checking anything
    #[derive(Default)]
    struct FakeResolver {
        reject: bool,
        calls: Mutex<Vec<(PathBuf, String, Vec<PathBuf>)>>,
    }

    impl PathResolver for FakeResolver {
        fn resolve(
            &self,
            base_dir: &Path,
            candidate: &str,
            search_paths: &[PathBuf],
        ) -> ResolveResult<PathBuf> {
            self.calls.lock().unwrap().push((
                base_dir.to_path_buf(),
                candidate.to_string(),
                search_paths.to_vec(),
            ));
            if self.reject {
                return Err(ResolveError::NotFound {
                    candidate: candidate.to_string(),
                    tried: vec![],
                });
            }
            Ok(base_dir.join(candidate))
        }
    }

    struct Harness {
        processor: Arc<FakeProcessor>,
        resolver: Arc<FakeResolver>,
        fs: MockFileSystem,
        sink: Arc<CollectingSink>,
    }

    impl Harness {
        fn new(processor: FakeProcessor, resolver: FakeResolver) -> Self {
            Self {
                processor: Arc::new(processor),
                resolver: Arc::new(resolver),
                fs: MockFileSystem::new(),
                sink: Arc::new(CollectingSink::new()),
            }
        }

        fn import_resolver(&self) -> ImportResolver {
            ImportResolver::new(
                self.processor.clone(),
                self.resolver.clone(),
                Arc::new(self.fs.clone()),
                self.sink.clone(),
            )
        }
    }

    fn paths(records: &[ImportRecord]) -> Vec<PathBuf> {
        records.iter().map(|r| r.path().to_path_buf()).collect()
    }

    #[test]
    fn absent_or_unresolved_file_lists_nothing() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        let resolver = h.import_resolver();

        assert!(resolver.list_imports(None).unwrap().is_empty());
        assert!(resolver
            .list_imports(Some(StylesheetFile::unresolved()))
            .unwrap()
            .is_empty());
        assert!(h.processor.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_contents_list_nothing() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        let records = h
            .import_resolver()
            .list_imports(Some(StylesheetFile::new("/s/file.less", "")))
            .unwrap();
        assert!(records.is_empty());
        assert!(h.processor.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn processor_failure_is_wrapped_with_root_path() {
        let processor = FakeProcessor {
            fail_with: Some("'x.less' wasn't found".to_string()),
            ..Default::default()
        };
        let h = Harness::new(processor, FakeResolver::default());
        let err = h
            .import_resolver()
            .list_imports(Some(StylesheetFile::new("/s/file.less", "@import 'x.less';")))
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.starts_with("Failed to process imports for '/s/file.less'"));
        assert!(msg.contains("'x.less' wasn't found"));
    }

    #[test]
    fn conventional_imports_come_first_then_resources() {
        let processor = FakeProcessor {
            imports: vec![PathBuf::from("/s/import.less")],
            ..Default::default()
        };
        let h = Harness::new(processor, FakeResolver::default());
        h.fs.add_file("/s/image.svg", "<svg/>");

        let records = h
            .import_resolver()
            .list_imports(Some(StylesheetFile::new(
                "/s/file.less",
                "@import 'import.less';\n.a { b: data-uri('image.svg'); }",
            )))
            .unwrap();

        assert_eq!(
            paths(&records),
            vec![PathBuf::from("/s/import.less"), PathBuf::from("/s/image.svg")]
        );
    }

    #[test]
    fn relative_reference_uses_file_directory_absolute_uses_empty_base() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        h.fs.add_file("/s/img/a.png", "a");
        h.fs.add_file("/abs/b.png", "b");

        h.import_resolver()
            .list_imports(Some(StylesheetFile::new(
                "/s/file.less",
                ".a { b: data-uri('img/a.png'); c: data-uri('/abs/b.png'); }",
            )))
            .unwrap();

        let calls = h.resolver.calls.lock().unwrap();
        assert_eq!(calls[0].0, PathBuf::from("/s"));
        assert_eq!(calls[0].1, "img/a.png");
        assert_eq!(calls[1].0, PathBuf::new());
        assert_eq!(calls[1].1, "/abs/b.png");
    }

    #[test]
    fn dynamic_references_never_reach_the_path_resolver() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        let records = h
            .import_resolver()
            .list_imports(Some(StylesheetFile::new(
                "/s/file.less",
                "@f: 'x.png';\n.a { b: data-uri(@f); c: data-uri(\"@{f}\"); }",
            )))
            .unwrap();

        assert!(records.is_empty());
        assert!(h.resolver.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn search_paths_reach_processor_and_resolver_in_order() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        h.fs.add_file("/s/a.png", "a");
        let options = RenderOptions::default()
            .with_paths(["/vendor", "/shared"])
            .with_extra("strictMath", serde_json::json!(true));
        let before = options.clone();

        h.import_resolver()
            .with_options(&options)
            .list_imports(Some(StylesheetFile::new(
                "/s/file.less",
                ".a { b: data-uri('a.png'); }",
            )))
            .unwrap();

        assert_eq!(options, before);
        let expected = vec![PathBuf::from("/vendor"), PathBuf::from("/shared")];
        assert_eq!(h.processor.calls.lock().unwrap()[0].1, before);
        assert_eq!(h.resolver.calls.lock().unwrap()[0].2, expected);
    }

    #[test]
    fn resolver_rejection_fails_the_listing() {
        let resolver = FakeResolver {
            reject: true,
            ..Default::default()
        };
        let h = Harness::new(FakeProcessor::default(), resolver);
        let err = h
            .import_resolver()
            .list_imports(Some(StylesheetFile::new(
                "/s/file.less",
                ".a { b: data-uri('gone.png'); }",
            )))
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::Processing {
                source: ProcessingFailure::Resolution(_),
                ..
            }
        ));
        assert!(err.to_string().contains("'gone.png' wasn't found"));
    }

    #[test]
    fn missing_resource_is_reported_and_omitted() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        let records = h
            .import_resolver()
            .list_imports(Some(StylesheetFile::new(
                "/s/file.less",
                ".a { b: data-uri('missing.png'); }",
            )))
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(h.sink.messages(), vec!["Import '/s/missing.png' not found."]);
    }

    #[test]
    fn unexpected_fs_fault_propagates_unchanged() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        h.fs.fail("/s/locked.png", io::ErrorKind::PermissionDenied);

        let err = h
            .import_resolver()
            .list_imports(Some(StylesheetFile::new(
                "/s/file.less",
                ".a { b: data-uri('locked.png'); }",
            )))
            .unwrap_err();

        assert!(matches!(err, ImportError::Io(_)));
        assert_eq!(err.to_string(), "Permission denied: /s/locked.png");
    }

    #[test]
    fn malformed_call_fails_the_listing() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        let err = h
            .import_resolver()
            .list_imports(Some(StylesheetFile::new(
                "/s/file.less",
                ".a { b: data-uri(); }",
            )))
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::Processing {
                source: ProcessingFailure::MalformedReference { .. },
                ..
            }
        ));
    }

    #[test]
    fn remote_and_fragment_references() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        h.fs.add_file("/s/icons.svg", "<svg/>");

        let records = h
            .import_resolver()
            .list_imports(Some(StylesheetFile::new(
                "/s/file.less",
                ".a { b: data-uri('https://cdn/x.png'); c: data-uri('icons.svg#home'); }",
            )))
            .unwrap();

        assert_eq!(paths(&records), vec![PathBuf::from("/s/icons.svg")]);
        assert_eq!(h.resolver.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_references_are_listed_once() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        h.fs.add_file("/s/a.png", "a");

        let records = h
            .import_resolver()
            .list_imports(Some(StylesheetFile::new(
                "/s/file.less",
                ".a { b: data-uri('a.png'); }\n.c { d: data-uri('image/png', 'a.png'); }",
            )))
            .unwrap();

        assert_eq!(paths(&records), vec![PathBuf::from("/s/a.png")]);
    }

    #[test]
    fn list_imports_for_path_reads_through_the_port() {
        let h = Harness::new(FakeProcessor::default(), FakeResolver::default());
        h.fs.add_file("/s/file.less", ".a { b: data-uri('a.png'); }");
        h.fs.add_file("/s/a.png", "a");

        let records = h
            .import_resolver()
            .list_imports_for_path(Path::new("/s/file.less"))
            .unwrap();
        assert_eq!(paths(&records), vec![PathBuf::from("/s/a.png")]);
    }
}
