use clap::{ArgAction, Parser, ValueEnum};
use highlight_lexer::config::runtime::{LogLevel, LoggingPreferences};
use std::path::PathBuf;

/// Highlight C and C++ sources for the site
#[derive(Parser, Debug)]
#[command(name = "highlight")]
#[command(version)]
#[command(about = "Highlight C and C++ sources as site-ready HTML", long_about = None)]
pub struct CliArgs {
    /// Files or directories to highlight. Directories are walked recursively
    /// and filtered by the registered filename patterns.
    pub inputs: Vec<PathBuf>,

    /// Lexer tag or alias to use instead of guessing from the file name
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Vocabulary extension (TOML) to register on top of the built-in lexers.
    /// May be repeated; later files go in front of earlier ones.
    #[arg(short, long = "extension", value_name = "TOML")]
    pub extensions: Vec<PathBuf>,

    /// Wrap HTML in `<div class="highlight"><pre><code>`
    #[arg(long)]
    pub wrap: bool,

    /// Emit a line-number table
    #[arg(long)]
    pub line_numbers: bool,

    /// Write one output file per input here instead of printing
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the registered lexers and exit
    #[arg(long)]
    pub list_lexers: bool,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
    /// Theme stylesheet; inputs are ignored
    Css,
}

impl OutputFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Css => "css",
        }
    }
}

impl CliArgs {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Event logging preferences; `-v` raises the level, the environment decides the rest
    pub fn logging_preferences(&self) -> LoggingPreferences {
        let mut preferences = LoggingPreferences::default();
        match self.verbose {
            0 => {}
            1 => preferences.min_log_level = preferences.min_log_level.max(LogLevel::Info),
            _ => preferences.min_log_level = LogLevel::Debug,
        }
        preferences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let args = CliArgs::try_parse_from([
            "highlight",
            "--lang",
            "c++",
            "--format",
            "json",
            "-e",
            "engine.toml",
            "-e",
            "tools.toml",
            "--wrap",
            "--line-numbers",
            "-o",
            "out",
            "-vv",
            "src",
            "main.cpp",
        ])
        .unwrap();

        assert_eq!(args.lang.as_deref(), Some("c++"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.extensions.len(), 2);
        assert!(args.wrap && args.line_numbers);
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.inputs, vec![PathBuf::from("src"), PathBuf::from("main.cpp")]);
        assert_eq!(args.log_filter(), "debug");
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["highlight", "a.cpp"]).unwrap();
        assert_eq!(args.format, OutputFormat::Html);
        assert!(!args.wrap);
        assert!(!args.list_lexers);
        assert_eq!(args.log_filter(), "warn");
    }

    #[test]
    fn test_verbosity_raises_event_level() {
        let debug = CliArgs::try_parse_from(["highlight", "-vv", "a.cpp"]).unwrap();
        assert_eq!(debug.logging_preferences().min_log_level, LogLevel::Debug);

        let info = CliArgs::try_parse_from(["highlight", "-v", "a.cpp"]).unwrap();
        assert!(info.logging_preferences().min_log_level >= LogLevel::Info);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(CliArgs::try_parse_from(["highlight", "--format", "pdf", "a.cpp"]).is_err());
    }
}
