//! numpydoc: reformat numpy-style docstrings.
//!
//! - **stdin mode**: `numpydoc < block.txt`
//! - **file mode**: `numpydoc -o out/ -f literal blocks/*.txt`

use anyhow::{Context, Result};
use clap::Parser;
use numpydoc::{create_renderer, parser, Document, InputFormat, RenderOptions, Renderer};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "numpydoc",
    about = "Parse numpy-style docstrings and render them back in a normalized layout"
)]
struct Cli {
    /// Input files, one docstring each (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Input format: numpy (default), json, literal
    #[arg(long, default_value = "numpy")]
    from: InputFormat,

    /// Output format: numpy (default), literal, json
    #[arg(short = 'f', long, default_value = "numpy")]
    format: String,

    /// Maximum line width
    #[arg(short = 'w', long, default_value_t = 100)]
    width: usize,

    /// Spaces per indentation level
    #[arg(short = 't', long, default_value_t = 4)]
    tab_size: usize,

    /// Indentation level of the lines after the first
    #[arg(short = 'i', long, default_value_t = 0)]
    indent_level: usize,

    /// Emit r""" instead of """
    #[arg(long)]
    raw: bool,

    /// Leave out the enclosing triple quotes
    #[arg(long)]
    no_delimiters: bool,

    /// Inherit missing sections and entries from this docstring
    #[arg(long)]
    parent: Option<PathBuf>,

    /// Put inherited entries after the existing ones instead of before
    #[arg(long, requires = "parent")]
    append: bool,
}

impl Cli {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            indent_level: self.indent_level,
            tab_size: self.tab_size,
            is_raw: self.raw,
            include_delimiters: !self.no_delimiters,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let parent = match &cli.parent {
        Some(path) => Some(load(path, cli.from)?),
        None => None,
    };

    if cli.files.is_empty() {
        return stdin_mode(&cli, parent.as_ref());
    }

    file_mode(&cli, parent.as_ref())
}

/// stdin mode: read one docstring from stdin, write the rendering to stdout.
fn stdin_mode(cli: &Cli, parent: Option<&Document>) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let renderer = create_renderer(&cli.format)?;
    let doc = build(&input, cli.from, parent, cli.append).context("failed to parse stdin")?;
    println!("{}", render(renderer.as_ref(), &doc, cli, "<stdin>")?);
    Ok(())
}

/// file mode: one output file per input file, named after the input.
fn file_mode(cli: &Cli, parent: Option<&Document>) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let renderer = create_renderer(&cli.format)?;
    let ext = renderer.file_extension();

    for path in expand_globs(&cli.files)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let doc = build(&content, cli.from, parent, cli.append)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let source = path.display().to_string();
        let output = render(renderer.as_ref(), &doc, cli, &source)?;

        let out_path = output_dir.join(format!("{}.{}", derive_output_name(&path), ext));
        fs::write(&out_path, format!("{}\n", output))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        log::info!("{} -> {}", source, out_path.display());
    }

    Ok(())
}

fn load(path: &Path, from: InputFormat) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    build(&content, from, None, false).with_context(|| format!("failed to parse {}", path.display()))
}

fn build(
    text: &str,
    from: InputFormat,
    parent: Option<&Document>,
    append: bool,
) -> numpydoc::Result<Document> {
    let mut doc = Document::from_sections(parser::parse_as(from, text)?)?;
    if let Some(parent) = parent {
        doc.inherit(parent, append);
    }
    Ok(doc)
}

/// Render `doc`, reporting every diagnostic as a warning.
fn render(renderer: &dyn Renderer, doc: &Document, cli: &Cli, source: &str) -> Result<String> {
    for diagnostic in doc.diagnostics() {
        log::warn!("{}: {}", source, diagnostic);
    }
    let rendered = renderer.render(doc, &cli.render_options())?;
    for diagnostic in &rendered.diagnostics {
        log::warn!("{}: {}", source, diagnostic);
    }
    Ok(rendered.text)
}

/// Expand glob patterns into a list of real file paths.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            log::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// "blocks/parse.txt" -> "parse", "notes" -> "notes"
fn derive_output_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
