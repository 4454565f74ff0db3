//! Fragment compilation into note records

use std::path::{Path, PathBuf};

use relnote_core::config::Config;
use relnote_core::{Dialect, FailurePolicy, FragmentError, Result};
use tracing::{debug, info, instrument, warn};

use crate::convert::{converter_for, MarkupConverter};
use crate::parser::FragmentParser;
use crate::store::FragmentStore;
use crate::types::{Fragment, NoteRecord};

/// A fragment that was written out and removed
#[derive(Debug, Clone)]
pub struct CompiledNote {
    /// The consumed fragment
    pub fragment: Fragment,
    /// Where its note record was written
    pub output: PathBuf,
    /// Number of sections in the record
    pub sections: usize,
}

/// A fragment left in place because compiling it failed
#[derive(Debug, Clone)]
pub struct FailedFragment {
    /// The fragment that failed
    pub fragment: Fragment,
    /// Rendered error message
    pub error: String,
}

/// Outcome of compiling every pending fragment
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    /// Fragments compiled and removed
    pub compiled: Vec<CompiledNote>,
    /// Fragments that failed (only with [`FailurePolicy::Continue`])
    pub failed: Vec<FailedFragment>,
}

impl CompileReport {
    /// Whether every fragment compiled
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of fragments attempted
    pub fn total(&self) -> usize {
        self.compiled.len() + self.failed.len()
    }
}

/// Turns staged fragments into YAML note records.
///
/// Each fragment is parsed into sections, every section body is converted
/// to the target markup, the record is written to the notes directory and the
/// fragment is deleted once the write succeeded. Two compilers running over
/// the same staging directory at once are not coordinated.
pub struct FragmentCompiler {
    store: FragmentStore,
    notes_dir: PathBuf,
    parser: FragmentParser,
    converter: Box<dyn MarkupConverter>,
    from: Dialect,
    to: Dialect,
    policy: FailurePolicy,
}

impl FragmentCompiler {
    /// Create a compiler converting markdown to rst and aborting on failure
    pub fn new<C: MarkupConverter + 'static>(
        store: FragmentStore,
        notes_dir: impl Into<PathBuf>,
        converter: C,
    ) -> Self {
        Self {
            store,
            notes_dir: notes_dir.into(),
            parser: FragmentParser::default(),
            converter: Box::new(converter),
            from: Dialect::Markdown,
            to: Dialect::Rst,
            policy: FailurePolicy::Abort,
        }
    }

    /// Build a compiler from configuration, resolving paths against a project root
    pub fn from_config(config: &Config, root: &Path) -> Result<Self> {
        Ok(Self {
            store: FragmentStore::from_config(config, root),
            notes_dir: config.notes_path(root),
            parser: FragmentParser::new(config.heading_marker.clone()),
            converter: converter_for(&config.convert)?,
            from: config.convert.from,
            to: config.convert.to,
            policy: config.on_error,
        })
    }

    /// Use a custom parser
    pub fn with_parser(mut self, parser: FragmentParser) -> Self {
        self.parser = parser;
        self
    }

    /// Set source and target dialects
    pub fn with_dialects(mut self, from: Dialect, to: Dialect) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Set the batch failure policy
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The staging store being compiled
    pub fn store(&self) -> &FragmentStore {
        &self.store
    }

    /// Name of the converter in use
    pub fn converter_name(&self) -> &'static str {
        self.converter.name()
    }

    /// Where a fragment's note record goes
    pub fn note_path(&self, fragment: &Fragment) -> PathBuf {
        self.notes_dir.join(fragment.note_file_name())
    }

    /// Parse and convert a fragment without touching the filesystem beyond reading it
    #[instrument(skip(self, fragment), fields(fragment = %fragment.file_name))]
    pub fn render(&self, fragment: &Fragment) -> Result<NoteRecord> {
        let text = self.store.read(fragment)?;
        let parsed = self.parser.parse(&text);

        let mut record = NoteRecord::new();
        for section in &parsed.sections {
            let converted = self.converter.convert(&section.body, self.from, self.to)?;
            debug!(section = %section.name, "section converted");
            record.insert(section.name.clone(), converted);
        }

        if record.is_empty() {
            warn!(fragment = %fragment.file_name, "fragment has no sections");
        }
        Ok(record)
    }

    /// Compile one fragment: write its record, then delete it
    #[instrument(skip(self, fragment), fields(fragment = %fragment.file_name))]
    pub fn compile(&self, fragment: &Fragment) -> Result<CompiledNote> {
        let record = self.render(fragment)?;
        let yaml = record.to_yaml()?;

        let output = self.note_path(fragment);
        std::fs::write(&output, yaml).map_err(|source| FragmentError::Write {
            path: output.clone(),
            source,
        })?;
        self.store.remove(fragment)?;

        info!(output = %output.display(), sections = record.len(), "fragment compiled");
        Ok(CompiledNote {
            fragment: fragment.clone(),
            output,
            sections: record.len(),
        })
    }

    /// Compile every pending fragment.
    ///
    /// With [`FailurePolicy::Abort`] the first failure is returned and later
    /// fragments stay pending. With [`FailurePolicy::Continue`] failures are
    /// collected in the report and the failing fragments stay pending.
    #[instrument(skip(self), fields(policy = ?self.policy))]
    pub fn compile_all(&self) -> Result<CompileReport> {
        let pending = self.store.pending()?;
        let mut report = CompileReport::default();
        if pending.is_empty() {
            info!("no pending fragments");
            return Ok(report);
        }

        std::fs::create_dir_all(&self.notes_dir).map_err(|source| FragmentError::Write {
            path: self.notes_dir.clone(),
            source,
        })?;

        info!(count = pending.len(), converter = self.converter.name(), "compiling fragments");
        for fragment in pending {
            match self.compile(&fragment) {
                Ok(note) => report.compiled.push(note),
                Err(err) if self.policy == FailurePolicy::Continue => {
                    warn!(fragment = %fragment.file_name, error = %err, "fragment failed, continuing");
                    report.failed.push(FailedFragment {
                        fragment,
                        error: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        Ok(report)
    }

    /// Render every pending fragment without writing or deleting anything
    pub fn preview_all(&self) -> Result<Vec<(Fragment, NoteRecord)>> {
        self.store
            .pending()?
            .into_iter()
            .map(|fragment| {
                let record = self.render(&fragment)?;
                Ok((fragment, record))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relnote_core::{ConvertError, RelnoteError};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    /// Wraps text so tests can see it went through the converter
    struct Tagging;

    impl MarkupConverter for Tagging {
        fn name(&self) -> &'static str {
            "tagging"
        }

        fn convert(&self, text: &str, from: Dialect, to: Dialect) -> Result<String> {
            Ok(format!("[{}->{}]{}", from, to, text))
        }
    }

    /// Fails on any section containing "boom"
    struct Exploding;

    impl MarkupConverter for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn convert(&self, text: &str, _from: Dialect, _to: Dialect) -> Result<String> {
            if text.contains("boom") {
                return Err(ConvertError::Failed {
                    backend: self.name().to_string(),
                    message: "boom".to_string(),
                }
                .into());
            }
            Ok(text.to_string())
        }
    }

    struct Workspace {
        temp: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            std::fs::create_dir_all(temp.path().join(".changelog")).unwrap();
            Self { temp }
        }

        fn stage(&self, name: &str, body: &str) -> PathBuf {
            let path = self.temp.path().join(".changelog").join(name);
            std::fs::write(&path, body).unwrap();
            path
        }

        fn compiler<C: MarkupConverter + 'static>(&self, converter: C) -> FragmentCompiler {
            FragmentCompiler::new(
                FragmentStore::new(self.temp.path().join(".changelog"), "md"),
                self.temp.path().join("releasenotes").join("notes"),
                converter,
            )
        }

        fn note(&self, name: &str) -> PathBuf {
            self.temp.path().join("releasenotes").join("notes").join(name)
        }

        fn read_note(&self, name: &str) -> BTreeMap<String, Vec<String>> {
            let yaml = std::fs::read_to_string(self.note(name)).unwrap();
            serde_yaml::from_str(&yaml).unwrap()
        }
    }

    #[test]
    fn test_end_to_end_fragment() {
        let ws = Workspace::new();
        let source = ws.stage(
            "foo-abc123.md",
            "# Fixes\nFixed the thing.\n# Features\nAdded the other thing.\n",
        );

        let report = ws.compiler(Tagging).compile_all().unwrap();

        assert!(report.is_success());
        assert_eq!(report.compiled.len(), 1);
        assert_eq!(report.compiled[0].sections, 2);
        assert_eq!(report.compiled[0].output, ws.note("foo-abc123.yaml"));
        assert!(!source.exists());

        let yaml = std::fs::read_to_string(ws.note("foo-abc123.yaml")).unwrap();
        assert!(!yaml.contains('{'));

        let record = ws.read_note("foo-abc123.yaml");
        assert_eq!(record.len(), 2);
        assert_eq!(
            record["Fixes"],
            vec!["[markdown->rst]Fixed the thing.\n".to_string()]
        );
        assert_eq!(
            record["Features"],
            vec!["[markdown->rst]Added the other thing.\n".to_string()]
        );
    }

    #[test]
    fn test_repeated_heading_converted_once() {
        let ws = Workspace::new();
        ws.stage(
            "fixes-0000000000000001.md",
            "# Fixes\nfirst\n# Features\nnew\n# Fixes\nsecond\n",
        );

        ws.compiler(Tagging).compile_all().unwrap();

        let record = ws.read_note("fixes-0000000000000001.yaml");
        assert_eq!(
            record["Fixes"],
            vec!["[markdown->rst]first\nsecond\n".to_string()]
        );
    }

    #[test]
    fn test_empty_fragment_yields_empty_record_and_is_deleted() {
        let ws = Workspace::new();
        let source = ws.stage("empty-0000000000000001.md", "no headings here\n");

        let report = ws.compiler(Tagging).compile_all().unwrap();

        assert_eq!(report.compiled[0].sections, 0);
        assert!(!source.exists());
        assert!(ws.read_note("empty-0000000000000001.yaml").is_empty());
    }

    #[test]
    fn test_no_pending_fragments() {
        let temp = TempDir::new().unwrap();
        let compiler = FragmentCompiler::new(
            FragmentStore::new(temp.path().join(".changelog"), "md"),
            temp.path().join("notes"),
            Tagging,
        );

        let report = compiler.compile_all().unwrap();
        assert_eq!(report.total(), 0);
        assert!(!temp.path().join("notes").exists());
    }

    #[test]
    fn test_abort_policy_stops_at_first_failure() {
        let ws = Workspace::new();
        let good = ws.stage("a-0000000000000001.md", "# Fixes\nok\n");
        let bad = ws.stage("b-0000000000000002.md", "# Fixes\nboom\n");
        let later = ws.stage("c-0000000000000003.md", "# Fixes\nok too\n");

        let err = ws.compiler(Exploding).compile_all().unwrap_err();

        assert!(matches!(err, RelnoteError::Convert(_)));
        assert!(!good.exists());
        assert!(ws.note("a-0000000000000001.yaml").exists());
        assert!(bad.exists());
        assert!(!ws.note("b-0000000000000002.yaml").exists());
        assert!(later.exists());
    }

    #[test]
    fn test_failed_record_write_keeps_fragment() {
        let ws = Workspace::new();
        let source = ws.stage("x-0000000000000001.md", "# Fixes\nok\n");
        // A directory in the record's place makes the write fail
        std::fs::create_dir_all(ws.note("x-0000000000000001.yaml")).unwrap();

        let compiler = ws.compiler(Tagging);
        let fragment = Fragment::from_path(&source).unwrap();
        let err = compiler.compile(&fragment).unwrap_err();

        assert!(matches!(
            err,
            RelnoteError::Fragment(FragmentError::Write { ref path, .. })
                if *path == ws.note("x-0000000000000001.yaml")
        ));
        assert!(source.exists());
    }

    #[test]
    fn test_continue_policy_isolates_failures() {
        let ws = Workspace::new();
        ws.stage("a-0000000000000001.md", "# Fixes\nok\n");
        let bad = ws.stage("b-0000000000000002.md", "# Fixes\nboom\n");
        ws.stage("c-0000000000000003.md", "# Fixes\nok too\n");

        let report = ws
            .compiler(Exploding)
            .with_policy(FailurePolicy::Continue)
            .compile_all()
            .unwrap();

        assert_eq!(report.compiled.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.total(), 3);
        assert!(!report.is_success());
        assert_eq!(report.failed[0].fragment.file_name, "b-0000000000000002.md");
        assert!(report.failed[0].error.contains("boom"));
        assert!(bad.exists());
        assert!(ws.note("c-0000000000000003.yaml").exists());
    }

    #[test]
    fn test_preview_leaves_fragments_in_place() {
        let ws = Workspace::new();
        let source = ws.stage("foo-0000000000000001.md", "# Notes\nhello\n");

        let previews = ws.compiler(Tagging).preview_all().unwrap();

        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].1.get("Notes"), Some("[markdown->rst]hello\n"));
        assert!(source.exists());
        assert!(!ws.note("foo-0000000000000001.yaml").exists());
    }

    #[test]
    fn test_custom_parser_and_dialects() {
        let ws = Workspace::new();
        ws.stage("foo-0000000000000001.md", "== Notes\nhello\n");

        let compiler = ws
            .compiler(Tagging)
            .with_parser(FragmentParser::new("== "))
            .with_dialects(Dialect::Gfm, Dialect::Html);
        let fragment = compiler.store().pending().unwrap().remove(0);

        let record = compiler.render(&fragment).unwrap();
        assert_eq!(record.get("Notes"), Some("[gfm->html]hello\n"));
    }

    #[test]
    fn test_from_config_with_native_converter() {
        let ws = Workspace::new();
        ws.stage("foo-0000000000000001.md", "# Features\nAdded *fast* mode.\n");

        let mut config = Config::default();
        config.convert.backend = relnote_core::ConverterBackend::Native;
        let compiler = FragmentCompiler::from_config(&config, ws.temp.path()).unwrap();
        assert_eq!(compiler.converter_name(), "native");

        compiler.compile_all().unwrap();
        let record = ws.read_note("foo-0000000000000001.yaml");
        assert_eq!(record["Features"], vec!["Added *fast* mode.\n".to_string()]);
    }

    #[test]
    fn test_existing_note_is_overwritten() {
        let ws = Workspace::new();
        ws.stage("foo-0000000000000001.md", "# Fixes\nnew\n");
        std::fs::create_dir_all(ws.note("")).unwrap();
        std::fs::write(ws.note("foo-0000000000000001.yaml"), "stale").unwrap();

        ws.compiler(Tagging).compile_all().unwrap();

        let record = ws.read_note("foo-0000000000000001.yaml");
        assert_eq!(record["Fixes"], vec!["[markdown->rst]new\n".to_string()]);
    }
}
