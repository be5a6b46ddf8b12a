//! Command-line interface for xsdgo

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xsdgo::{generate, FsOutput, GenerationReport, GeneratorConfig};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsdgo")]
#[command(author, version, about = "Generate Go structs from XML Schema documents", long_about = None)]
struct Cli {
    /// Directory containing the root schemas
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Root schema, relative to the input directory (repeatable; default: every *.xsd)
    #[arg(short, long = "root", value_name = "FILE")]
    roots: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Package for schemas without a target namespace
    #[arg(short, long)]
    package: Option<String>,

    /// Go module path the generated packages live under
    #[arg(short, long, value_name = "MODULE")]
    base_module: Option<String>,

    /// Generate every named complex type, not only those reachable from global elements
    #[arg(long)]
    recursive: bool,

    /// Keep going on duplicate definitions and empty complex types
    #[arg(long)]
    permissive: bool,

    /// JSON configuration file; command-line options override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the generation report as JSON
    #[arg(short, long)]
    json: bool,

    /// Log more (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[cfg(feature = "cli")]
impl Cli {
    fn into_config(self) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)?,
            None => GeneratorConfig::default(),
        };

        if let Some(dir) = self.input_dir {
            config.input_dir = dir;
        }
        if !self.roots.is_empty() {
            config.roots = self.roots;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(package) = self.package {
            config.package = package;
        }
        if let Some(base_module) = self.base_module {
            config.base_module = base_module;
        }
        config.recursive |= self.recursive;
        config.permissive |= self.permissive;
        Ok(config)
    }
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let json = cli.json;

    if let Err(e) = run(cli, json) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn run(cli: Cli, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.into_config()?;
    let mut sink = FsOutput::new(&config.output_dir);
    let report = generate(&config, &mut sink)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&config, &report);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_summary(config: &GeneratorConfig, report: &GenerationReport) {
    for emitted in &report.structs {
        println!(
            "  {}",
            config.output_dir.join(&emitted.package).join(&emitted.file).display()
        );
    }
    println!(
        "Generated {} structs in {} packages from {} schema documents",
        report.structs.len(),
        report.packages.len(),
        report.documents
    );
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
