//! # Highlight CLI
//!

use clap::Parser;
use highlight_cli::{
    build_registry, discover_inputs, run_batch, CliArgs, Highlighter, OutputFormat,
};
use highlight_lexer::{log_success, logging, LexerRegistry};
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let env = env_logger::Env::default().default_filter_or(args.log_filter());
    env_logger::Builder::from_env(env).init();
    logging::config::init_runtime_preferences(args.logging_preferences())?;
    logging::init_global_logging()?;
    log::debug!("{}", logging::config::get_config_summary());
    highlight_lexer::validate_configuration()?;

    let registry = build_registry(&args.extensions)?;
    if args.list_lexers {
        print_lexers(&registry);
        return Ok(());
    }

    let highlighter = Highlighter::new(registry, &args);
    if args.format == OutputFormat::Css {
        print!("{}", highlighter.stylesheet());
        return Ok(());
    }

    if args.inputs.is_empty() {
        eprintln!("Error: no input files or directories given");
        eprintln!("Usage: highlight [OPTIONS] <INPUT>...");
        std::process::exit(2);
    }

    let start = Instant::now();
    let files = discover_inputs(&args.inputs, highlighter.registry())?;
    if files.is_empty() {
        log::warn!("No highlightable files found");
        return Ok(());
    }
    log::info!("Highlighting {} files", files.len());

    let summary = run_batch(&highlighter, &files, args.output_dir.as_deref());

    log_success!(logging::codes::success::RENDER_COMPLETE, "Highlighting completed",
        "files" => summary.processed,
        "failed" => summary.failed,
        "duration_ms" => start.elapsed().as_millis()
    );

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_lexers(registry: &LexerRegistry) {
    for lexer in registry.lexers() {
        let info = lexer.info();
        println!("{:<10} {}", info.tag, info.title);
        if !info.aliases.is_empty() {
            println!("           aliases:   {}", info.aliases.join(", "));
        }
        if !info.filenames.is_empty() {
            println!("           filenames: {}", info.filenames.join(", "));
        }
    }
}
