//! docbench CLI - document extraction benchmark tool

mod openai;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docbench::{
    parse_file_with_options, BatchOptions, BatchRunner, EvalOptions, Evaluator, JsonFormat,
    PageSelection, ParseOptions, RenderOptions,
};

use openai::{OpenAiChat, DEFAULT_API_BASE};

#[derive(Parser)]
#[command(name = "docbench")]
#[command(version)]
#[command(about = "Reconstruct document-analysis responses and score the extracted content", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one response to Markdown, text and JSON
    Convert {
        /// Input response file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Table rendering mode
        #[arg(long, value_enum, default_value = "markdown")]
        table_mode: TableMode,

        /// Render titles and section headers as headings
        #[arg(long)]
        headings: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Skip failing elements instead of failing the document
        #[arg(long)]
        lenient: bool,
    },

    /// Extract every response in a directory to `<stem>.txt`
    Batch {
        /// Directory of response files
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "results")]
        save_dir: PathBuf,

        /// Output format of each file
        #[arg(long, value_enum, default_value = "markdown")]
        format: Format,

        /// Table rendering mode
        #[arg(long, value_enum, default_value = "markdown")]
        table_mode: TableMode,

        /// Render titles and section headers as headings
        #[arg(long)]
        headings: bool,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,

        /// Skip failing elements instead of failing the document
        #[arg(long)]
        lenient: bool,
    },

    /// Score extracted content with question answering
    Eval {
        /// Directory of extracted `*.txt` files
        #[arg(long, value_name = "DIR")]
        content_path: PathBuf,

        /// Directory of question files
        #[arg(long, value_name = "DIR", default_value = "dataset/questions")]
        question_basepath: PathBuf,

        /// Question prompt template
        #[arg(long, default_value = "dataset/templates/question_template.txt")]
        question_template_path: PathBuf,

        /// Evaluation prompt template
        #[arg(long, default_value = "dataset/templates/evaluate_template.txt")]
        evaluate_template_path: PathBuf,

        /// Model answering the questions
        #[arg(long, default_value = "gpt-4o")]
        answering_model: String,

        /// Model scoring the answers
        #[arg(long, default_value = "gpt-4o")]
        evaluate_model: String,

        /// Output directory
        #[arg(long, value_name = "DIR", default_value = "results/")]
        save_basepath: PathBuf,

        /// API key
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// API base URL
        #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,
    },

    /// Show document information
    Info {
        /// Input response file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TableMode {
    /// Markdown pipe tables
    Markdown,
    /// HTML tables with row and column spans
    Html,
}

impl From<TableMode> for docbench::TableMode {
    fn from(mode: TableMode) -> Self {
        match mode {
            TableMode::Markdown => docbench::TableMode::Markdown,
            TableMode::Html => docbench::TableMode::Html,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Markdown
    Markdown,
    /// Plain text
    Text,
    /// JSON
    Json,
}

impl From<Format> for docbench::OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => docbench::OutputFormat::Markdown,
            Format::Text => docbench::OutputFormat::Text,
            Format::Json => docbench::OutputFormat::Json,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            table_mode,
            headings,
            pages,
            lenient,
        } => cmd_convert(
            &input,
            output.as_deref(),
            table_mode,
            headings,
            pages.as_deref(),
            lenient,
        ),
        Commands::Batch {
            input,
            save_dir,
            format,
            table_mode,
            headings,
            sequential,
            lenient,
        } => {
            let parse = if lenient {
                ParseOptions::new().lenient()
            } else {
                ParseOptions::new()
            };
            let options = BatchOptions::new()
                .with_format(format.into())
                .with_parse_options(parse)
                .with_render_options(render_options(table_mode, headings))
                .with_parallel(!sequential);
            cmd_batch(&input, &save_dir, options)
        }
        Commands::Eval {
            content_path,
            question_basepath,
            question_template_path,
            evaluate_template_path,
            answering_model,
            evaluate_model,
            save_basepath,
            api_key,
            api_base,
        } => {
            let options = EvalOptions::new()
                .with_question_dir(question_basepath)
                .with_templates(question_template_path, evaluate_template_path)
                .with_models(answering_model, evaluate_model)
                .with_save_dir(save_basepath);
            cmd_eval(&content_path, options, &api_key, &api_base)
        }
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_options(
    pages: Option<&str>,
    lenient: bool,
) -> Result<ParseOptions, Box<dyn std::error::Error>> {
    let page_selection = match pages {
        Some(p) => PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?,
        None => PageSelection::All,
    };

    let mut options = ParseOptions::new().with_pages(page_selection);
    if lenient {
        options = options.lenient();
    }
    Ok(options)
}

fn render_options(table_mode: TableMode, headings: bool) -> RenderOptions {
    RenderOptions::new()
        .with_table_mode(table_mode.into())
        .with_headings(headings)
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    table_mode: TableMode,
    headings: bool,
    pages: Option<&str>,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });
    fs::create_dir_all(&output_dir)?;

    let doc = parse_file_with_options(input, parse_options(pages, lenient)?)?;
    let options = render_options(table_mode, headings);

    let markdown = docbench::render::to_markdown(&doc, &options)?;
    fs::write(output_dir.join("extract.md"), &markdown)?;

    let text = docbench::render::to_text(&doc, &options)?;
    fs::write(output_dir.join("extract.txt"), &text)?;

    let json = docbench::render::to_json(&doc, JsonFormat::Pretty)?;
    fs::write(output_dir.join("content.json"), &json)?;

    println!("{}", "Output files:".green().bold());
    println!("  {} extract.md", "├─".dimmed());
    println!("  {} extract.txt", "├─".dimmed());
    println!("  {} content.json", "└─".dimmed());

    Ok(())
}

fn cmd_batch(
    input: &Path,
    save_dir: &Path,
    options: BatchOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let total = docbench::batch::collect_inputs(input, &options.extension)?.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = BatchRunner::new(options).run(input, save_dir, |path, _ok| {
        pb.set_message(path.file_name().unwrap_or_default().to_string_lossy().into_owned());
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} extracted, {} failed in {:.2}s (avg {:.2}s)",
        "Batch:".green().bold(),
        report.succeeded.len(),
        report.failed.len(),
        report.elapsed.as_secs_f64(),
        report.average_secs()
    );
    for (path, error) in &report.failed {
        println!("  {} {}: {}", "✗".red(), path.display(), error);
    }

    Ok(())
}

fn cmd_eval(
    content_path: &Path,
    options: EvalOptions,
    api_key: &str,
    api_base: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = OpenAiChat::new(api_key, api_base)?;
    let report = Evaluator::new(model, options).run(content_path)?;

    for (path, error) in &report.failed {
        println!("  {} {}: {}", "✗".red(), path.display(), error);
    }
    match report.summary.mean() {
        Some(mean) => {
            println!("{} {:.4}", "Mean score:".green().bold(), mean);
            println!("Total number of questions: {}", report.summary.count());
        }
        None => println!("{}", "No questions were scored".yellow()),
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, ParseOptions::new().lenient())?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), doc.format);
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Elements".bold(), doc.element_count());
    println!("{}: {}", "Tables".bold(), doc.tables().count());

    println!();
    println!("{}", "Categories".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (category, count) in doc.category_counts() {
        println!("{}: {}", category.bold(), count);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docbench".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document extraction benchmark tool");
    println!();
    println!("License: MIT");
}
