//! # Highlight CLI
//!
//! Input discovery, lexer selection and output for the `highlight` binary.

pub mod cli;

pub use cli::{CliArgs, OutputFormat};

use highlight_lexer::config::runtime::{
    FileProcessorPreferences, LexicalPreferences, RenderPreferences,
};
use highlight_lexer::file_processor::{FileProcessor, FileProcessorError};
use highlight_lexer::languages::PLAINTEXT_TAG;
use highlight_lexer::{
    log_error, logging, Extension, ExtensionError, Formatter, HtmlFormatter, JsonFormatter,
    Lexer, LexerRegistry, RenderError,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Input not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("No lexer available for '{name}'")]
    NoLexer { name: String },

    #[error(transparent)]
    File(#[from] FileProcessorError),

    #[error(transparent)]
    Extension(#[from] ExtensionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Built-in lexers plus each extension file, registered in order
pub fn build_registry(extensions: &[PathBuf]) -> Result<LexerRegistry, CliError> {
    let mut registry = LexerRegistry::with_defaults()?;
    for path in extensions {
        let extension = Extension::from_file(path)?;
        let base = registry
            .get(extension.base())
            .ok_or_else(|| ExtensionError::UnknownBase {
                base: extension.base().to_string(),
            })?;
        let lexer = extension.extend(&base)?;
        log::info!(
            "Registered extension {} as '{}' on '{}'",
            path.display(),
            lexer.tag(),
            extension.base()
        );
        registry.register(lexer);
    }
    Ok(registry)
}

/// Expand directories into the files some registered lexer claims.
/// Explicit file arguments are kept as given.
pub fn discover_inputs(
    inputs: &[PathBuf],
    registry: &LexerRegistry,
) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let claimed = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| registry.for_filename(name).is_some());
                if claimed {
                    files.push(entry.into_path());
                } else {
                    log::debug!("Skipping {}", entry.path().display());
                }
            }
        } else {
            return Err(CliError::InputNotFound {
                path: input.clone(),
            });
        }
    }
    Ok(files)
}

/// `dir/<file name>.<format extension>`
pub fn output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.{}", name, format.file_extension()))
}

pub struct Highlighter {
    registry: LexerRegistry,
    processor: FileProcessor,
    lang: Option<String>,
    format: OutputFormat,
    render: RenderPreferences,
    lexical: LexicalPreferences,
}

impl Highlighter {
    pub fn new(registry: LexerRegistry, args: &CliArgs) -> Self {
        let processor = FileProcessor::from_preferences(&FileProcessorPreferences::default())
            .with_known_extensions(registry.known_extensions());
        let render = RenderPreferences {
            wrap_output: args.wrap,
            line_numbers: args.line_numbers,
            ..RenderPreferences::default()
        };

        Self {
            registry,
            processor,
            lang: args.lang.clone(),
            format: args.format,
            render,
            lexical: LexicalPreferences::default(),
        }
    }

    pub fn registry(&self) -> &LexerRegistry {
        &self.registry
    }

    /// `--lang` wins; otherwise the file name decides, then plain text
    pub fn select_lexer(&self, path: &Path) -> Result<Arc<Lexer>, CliError> {
        if let Some(lang) = &self.lang {
            return self.lookup(lang, |r| r.find(lang));
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.registry.for_filename(&name) {
            Some(lexer) => Ok(lexer),
            None => self.lookup(&name, |r| r.get(PLAINTEXT_TAG)),
        }
    }

    fn lookup<F>(&self, name: &str, find: F) -> Result<Arc<Lexer>, CliError>
    where
        F: FnOnce(&LexerRegistry) -> Option<Arc<Lexer>>,
    {
        find(&self.registry).ok_or_else(|| CliError::NoLexer {
            name: name.to_string(),
        })
    }

    /// Read, tokenize and format one file
    pub fn highlight_path(&self, path: &Path) -> Result<String, CliError> {
        let lexer = self.select_lexer(path)?;
        let file = self.processor.process_file(&path.to_string_lossy())?;

        let (tokens, metrics) =
            lexer.tokenize_with_preferences(&file.source, self.lexical.clone());
        log::debug!(
            "{}: {} tokens with '{}', coverage {:.1}%",
            path.display(),
            metrics.total_tokens,
            lexer.tag(),
            metrics.coverage() * 100.0
        );

        let output = match self.format {
            OutputFormat::Html => HtmlFormatter::new(self.render.clone()).format(&tokens)?,
            OutputFormat::Json => JsonFormatter::pretty().format(&tokens)?,
            OutputFormat::Css => String::new(),
        };
        Ok(output)
    }

    /// Stylesheet for the configured CSS class
    pub fn stylesheet(&self) -> String {
        highlight_lexer::Theme::default().css(&format!(".{}", self.render.css_class))
    }
}

/// Files seen and files that failed in one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Highlight every file, printing or writing under `output_dir`.
/// A failing file is logged and counted; the rest of the batch still runs.
pub fn run_batch(
    highlighter: &Highlighter,
    files: &[PathBuf],
    output_dir: Option<&Path>,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for (file_id, path) in files.iter().enumerate() {
        logging::set_file_context(path.clone(), file_id + 1);
        summary.processed += 1;

        let result = highlighter.highlight_path(path).and_then(|output| match output_dir {
            Some(dir) => {
                let target = output_path(dir, path, highlighter.format);
                write_output(&target, &output)?;
                log::info!("{} -> {}", path.display(), target.display());
                Ok(())
            }
            None => {
                println!("{}", output);
                Ok(())
            }
        });

        if let Err(e) = result {
            summary.failed += 1;
            eprintln!("  ✗ {}: {}", path.display(), e);
            log_error!(logging::codes::system::INTERNAL_ERROR, "File highlighting failed",
                "file" => path.display(),
                "error" => e
            );
        }

        logging::clear_file_context();
    }
    summary
}

pub fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    let io_error = |source: std::io::Error| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, contents).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["highlight"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    fn source_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("arena.cpp"), "MemoryArena arena;\n").unwrap();
        fs::write(dir.path().join("nested/types.h"), "typedef int S32;\n").unwrap();
        fs::write(dir.path().join("README.md"), "# notes\n").unwrap();
        dir
    }

    #[test]
    fn test_discover_filters_by_registered_patterns() {
        let dir = source_tree();
        let registry = LexerRegistry::with_defaults().unwrap();
        let files = discover_inputs(&[dir.path().to_path_buf()], &registry).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["arena.cpp", "types.h"]);
    }

    #[test]
    fn test_missing_input() {
        let registry = LexerRegistry::with_defaults().unwrap();
        let result = discover_inputs(&[PathBuf::from("/nonexistent/dir")], &registry);
        assert_matches!(result, Err(CliError::InputNotFound { .. }));
    }

    #[test]
    fn test_select_lexer() {
        let registry = LexerRegistry::with_defaults().unwrap();
        let highlighter = Highlighter::new(registry.clone(), &args(&[]));
        assert_eq!(highlighter.select_lexer(Path::new("a.hpp")).unwrap().tag(), "cpp");
        assert_eq!(highlighter.select_lexer(Path::new("a.h")).unwrap().tag(), "cpp");
        assert_eq!(highlighter.select_lexer(Path::new("a.c")).unwrap().tag(), "c");
        assert_eq!(
            highlighter.select_lexer(Path::new("notes.md")).unwrap().tag(),
            PLAINTEXT_TAG
        );

        let forced = Highlighter::new(registry, &args(&["--lang", "c"]));
        assert_eq!(forced.select_lexer(Path::new("a.cpp")).unwrap().tag(), "c");
    }

    #[test]
    fn test_highlight_path_html() {
        let dir = source_tree();
        let registry = LexerRegistry::with_defaults().unwrap();
        let highlighter = Highlighter::new(registry, &args(&["--wrap"]));

        let html = highlighter
            .highlight_path(&dir.path().join("arena.cpp"))
            .unwrap();
        assert!(html.starts_with("<div class=\"highlight\">"));
        assert!(html.contains("<span class=\"nc\">MemoryArena</span>"));
    }

    #[test]
    fn test_highlight_path_json() {
        let dir = source_tree();
        let registry = LexerRegistry::with_defaults().unwrap();
        let highlighter = Highlighter::new(registry, &args(&["--format", "json"]));

        let json = highlighter
            .highlight_path(&dir.path().join("nested/types.h"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let s32 = value
            .as_array()
            .unwrap()
            .iter()
            .find(|token| token["text"] == "S32")
            .unwrap();
        assert_eq!(s32["category"], "Keyword.Type");
    }

    #[test]
    fn test_extension_file_registers() {
        let dir = TempDir::new().unwrap();
        let toml = dir.path().join("engine.toml");
        fs::write(
            &toml,
            "tag = \"engine\"\n[[rules]]\ncategory = \"Name.Builtin\"\nwords = [\"GPU_SYNC\"]\n",
        )
        .unwrap();

        let registry = build_registry(&[toml]).unwrap();
        let stream = registry.highlight("engine", "GPU_SYNC();");
        assert_eq!(
            stream.category_of("GPU_SYNC"),
            Some(highlight_lexer::TokenCategory::NameBuiltin)
        );
    }

    #[test]
    fn test_extension_unknown_base() {
        let dir = TempDir::new().unwrap();
        let toml = dir.path().join("rust.toml");
        fs::write(
            &toml,
            "base = \"rust\"\n[[rules]]\ncategory = \"Keyword.Type\"\nwords = [\"u32\"]\n",
        )
        .unwrap();

        assert_matches!(
            build_registry(&[toml]),
            Err(CliError::Extension(ExtensionError::UnknownBase { .. }))
        );
    }

    #[test]
    fn test_output_path_and_write() {
        let dir = TempDir::new().unwrap();
        let out = output_path(
            &dir.path().join("out"),
            Path::new("src/arena.cpp"),
            OutputFormat::Html,
        );
        assert_eq!(out, dir.path().join("out/arena.cpp.html"));

        write_output(&out, "<pre></pre>").unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "<pre></pre>");
    }

    #[test]
    fn test_batch_continues_past_write_failure() {
        let dir = source_tree();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let registry = LexerRegistry::with_defaults().unwrap();
        let highlighter = Highlighter::new(registry, &args(&[]));
        let files = vec![
            dir.path().join("arena.cpp"),
            dir.path().join("nested/types.h"),
        ];

        let summary = run_batch(&highlighter, &files, Some(&blocker.join("out")));
        assert_eq!(summary, BatchSummary { processed: 2, failed: 2 });

        let out = dir.path().join("out");
        let summary = run_batch(&highlighter, &files, Some(&out));
        assert_eq!(summary, BatchSummary { processed: 2, failed: 0 });
        assert!(out.join("types.h.html").is_file());
    }

    #[test]
    fn test_write_output_under_a_file_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        assert_matches!(
            write_output(&blocker.join("a.html"), "<pre></pre>"),
            Err(CliError::Write { .. })
        );
    }

    #[test]
    fn test_stylesheet_uses_css_class() {
        let registry = LexerRegistry::with_defaults().unwrap();
        let highlighter = Highlighter::new(registry, &args(&[]));
        let css = highlighter.stylesheet();
        assert!(css.contains(".kt {"));
    }
}
