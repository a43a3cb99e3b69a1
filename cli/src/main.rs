//! pdfoutline CLI - heading outlines and section ranking for PDFs

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{list_pdfs, DocumentStatus};
use pdfoutline::rank::{OnnxConfig, OnnxEmbedder};
use pdfoutline::{
    font_profile_from_file, outline_from_file, BatchRunner, BatchSummary, Embedder,
    ExtractOptions, HashingEmbedder, JsonFormat, PipelineProfile, RankRequest, Ranker,
};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(version)]
#[command(about = "Extract heading outlines from PDFs and rank their sections", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    dirs: DirArgs,

    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct DirArgs {
    /// Directory containing the PDFs
    #[arg(value_name = "INPUT", env = "INPUT_DIR", default_value = "input")]
    input: PathBuf,

    /// Directory receiving the JSON files
    #[arg(value_name = "OUTPUT", env = "OUTPUT_DIR", default_value = "output")]
    output: PathBuf,
}

#[derive(Args, Clone, Copy)]
struct CommonArgs {
    /// Treat unreadable pages as blank instead of failing the document
    #[arg(long, global = true)]
    lenient: bool,

    /// Process documents one at a time
    #[arg(long, global = true)]
    sequential: bool,

    /// Write compact JSON
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Args)]
struct ModelArgs {
    /// Sentence-transformer ONNX model: a `model.onnx` file or an exported
    /// model directory (all-MiniLM-L6-v2 by default layout)
    #[arg(long, value_name = "PATH", env = "PDFOUTLINE_MODEL")]
    model: Option<PathBuf>,

    /// tokenizer.json of the model (default: next to the model)
    #[arg(long, value_name = "FILE", env = "PDFOUTLINE_TOKENIZER")]
    tokenizer: Option<PathBuf>,

    /// ONNX Runtime shared library (default: ORT_DYLIB_PATH or the system library)
    #[arg(long, value_name = "FILE")]
    ort_lib: Option<PathBuf>,
}

impl ModelArgs {
    fn config(&self) -> Option<OnnxConfig> {
        let model = self.model.as_ref()?;
        let mut config = if model.is_dir() {
            OnnxConfig::minilm_dir(model)
        } else {
            let dir = model.parent().unwrap_or_else(|| Path::new("."));
            OnnxConfig::minilm(model, dir.join("tokenizer.json"))
        };
        if let Some(tokenizer) = &self.tokenizer {
            config.tokenizer_path = tokenizer.clone();
        }
        if let Some(lib) = &self.ort_lib {
            config = config.with_runtime_library(lib);
        }
        Some(config)
    }
}

impl CommonArgs {
    fn options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::new().with_parallel(!self.sequential);
        if self.lenient {
            options = options.lenient();
        }
        options
    }

    fn format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write one outline JSON per PDF in a directory
    Outline {
        #[command(flatten)]
        dirs: DirArgs,
    },

    /// Rank the sections of all PDFs in a directory for a persona and task
    Rank {
        #[command(flatten)]
        dirs: DirArgs,

        /// Who is reading the documents
        #[arg(long, env = "PERSONA")]
        persona: String,

        /// What the persona wants to get done
        #[arg(long, env = "JOB_TO_BE_DONE")]
        job: String,

        /// Heading keyword language (ISO 639-1)
        #[arg(long, env = "OUTLINE_LANG", default_value = "en")]
        lang: String,

        /// Report file name inside the output directory
        #[arg(long, value_name = "NAME", default_value = pdfoutline::batch::DEFAULT_REPORT_FILE)]
        file: String,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Print or save the outline of a single PDF
    File {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the font clusters used for heading levels
    Fonts {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let common = cli.common;

    let result = match cli.command {
        Some(Commands::Outline { dirs }) => cmd_outline(&dirs.input, &dirs.output, common),
        Some(Commands::Rank {
            dirs,
            persona,
            job,
            lang,
            file,
            model,
        }) => {
            let request = RankRequest::new(persona, job).with_file_name(file);
            cmd_rank(&dirs.input, &dirs.output, &request, &lang, &model, common)
        }
        Some(Commands::File { input, output }) => cmd_file(&input, output.as_deref(), common),
        Some(Commands::Fonts { input }) => cmd_fonts(&input, common),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        // Default behavior: outline every PDF of the input directory
        None => cmd_outline(&cli.dirs.input, &cli.dirs.output, common),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar(len: usize) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn report_progress(pb: &ProgressBar, name: &str, status: &DocumentStatus) {
    if let DocumentStatus::Failed(message) = status {
        pb.println(format!("{} {}: {}", "✗".red(), name, message));
    }
    pb.set_message(name.to_string());
    pb.inc(1);
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "\n{} {} of {} documents",
        "Processed".green().bold(),
        summary.succeeded(),
        summary.documents.len()
    );
    for (i, path) in summary.outputs.iter().enumerate() {
        let branch = if i + 1 == summary.outputs.len() {
            "└─"
        } else {
            "├─"
        };
        println!("  {} {}", branch.dimmed(), path.display());
    }
    if !summary.is_clean() {
        println!("{} {} failed", "Warning:".yellow().bold(), summary.failed.len());
    }
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    common: CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = progress_bar(list_pdfs(input)?.len())?;

    let runner = BatchRunner::new(common.options()).with_format(common.format());
    let summary = runner.run_outlines_with(input, output, |name, status| {
        report_progress(&pb, name, status)
    })?;
    pb.finish_with_message("Done!");

    print_summary(&summary);
    Ok(())
}

fn cmd_rank(
    input: &Path,
    output: &Path,
    request: &RankRequest,
    lang: &str,
    model: &ModelArgs,
    common: CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{} {} | {}",
        "Ranking for".cyan(),
        request.persona.bold(),
        request.job_to_be_done
    );

    match model.config() {
        Some(config) => {
            let embedder = OnnxEmbedder::new(config)?;
            println!("{} {}", "Model:".cyan(), embedder.info().embedding_model_id);
            run_ranking(input, output, request, lang, &Ranker::new(embedder), common)
        }
        None => {
            println!(
                "{} no --model given, ranking by shared words only",
                "Warning:".yellow().bold()
            );
            let ranker = Ranker::<HashingEmbedder>::default();
            run_ranking(input, output, request, lang, &ranker, common)
        }
    }
}

fn run_ranking<E: Embedder>(
    input: &Path,
    output: &Path,
    request: &RankRequest,
    lang: &str,
    ranker: &Ranker<E>,
    common: CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = progress_bar(list_pdfs(input)?.len())?;

    let options = common.options().with_language(lang);
    let runner = BatchRunner::new(options).with_format(common.format());
    let summary = runner.run_ranking_with(input, output, ranker, request, |name, status| {
        report_progress(&pb, name, status)
    })?;
    pb.finish_with_message("Done!");

    print_summary(&summary);
    Ok(())
}

fn cmd_file(
    input: &Path,
    output: Option<&Path>,
    common: CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let outline = outline_from_file(input, &common.options())?;
    let json = pdfoutline::render::to_json(&outline, common.format())?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_fonts(input: &Path, common: CommonArgs) -> Result<(), Box<dyn std::error::Error>> {
    let profile = font_profile_from_file(input, &common.options())?;
    let pipeline = PipelineProfile::outline();

    println!("{}", "Font Clusters".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (rank, cluster) in profile.clusters().iter().enumerate() {
        println!(
            "{} {:>5} {:>3}pt  {} ({} spans)",
            format!("#{}", rank).bold(),
            pipeline.level_for_rank(rank).to_string().green(),
            cluster.size,
            cluster.font_name,
            cluster.occurrence_count
        );
    }
    println!(
        "{}: {}",
        "Other fonts".bold(),
        pipeline.level_for_rank(profile.default_rank())
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF heading outline extraction and section ranking tool");
    println!();
    println!("License: MIT");
}
