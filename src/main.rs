//! vellum - HTML section and Markdown rich-text converter

use std::io::Read;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use vellum::{Section, SectionOptions, markdown_to_richtext, parse_sections_with};

#[derive(Parser)]
#[command(name = "vellum")]
#[command(version, about = "HTML section and Markdown rich-text converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    vellum sections page.html --base-url https://example.com/docs
    vellum sections page.html --base-url https://example.com/docs --json
    vellum markdown notes.md --html
    cat notes.md | vellum markdown -")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse an HTML document into its section outline
    Sections {
        /// Input file, or - for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Base URL for resolving relative links
        #[arg(long, value_name = "URL")]
        base_url: String,

        /// Heading depth beyond which subsections are flattened
        #[arg(long, default_value_t = 1)]
        max_depth: usize,

        /// Emit the section tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a Markdown document and re-serialize it
    Markdown {
        /// Input file, or - for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Render as HTML instead of markdown
        #[arg(long)]
        html: bool,

        /// Emit the parsed block model as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Sections {
            file,
            base_url,
            max_depth,
            json,
        } => run_sections(&file, &base_url, max_depth, json),
        Command::Markdown { file, html, json } => run_markdown(&file, html, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_sections(file: &str, base_url: &str, max_depth: usize, json: bool) -> Result<(), String> {
    let html = read_input(file)?;
    let options = SectionOptions { max_depth };
    let root = parse_sections_with(&html, base_url, &options).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&root).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        print_outline(&root);
    }
    Ok(())
}

fn run_markdown(file: &str, html: bool, json: bool) -> Result<(), String> {
    let markdown = read_input(file)?;
    let block = markdown_to_richtext(&markdown).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&block).map_err(|e| e.to_string())?;
        println!("{out}");
    } else if html {
        println!("{}", block.to_html());
    } else {
        println!("{}", block.to_markdown());
    }
    Ok(())
}

fn print_outline(root: &Section) {
    for section in root.walk() {
        if section.is_root() {
            continue;
        }
        let title = section.body.lines().next().unwrap_or("");
        let indent = "  ".repeat(usize::from(section.level).saturating_sub(1));
        println!("{indent}h{} {title}", section.level);
    }
}

fn read_input(file: &str) -> Result<String, String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| e.to_string())?;
        return Ok(buf);
    }
    std::fs::read_to_string(file).map_err(|e| format!("{file}: {e}"))
}
