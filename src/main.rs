use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use colored::Colorize;
use ledgerlens::export::disk_file_name;
use ledgerlens::{build_artifact, render, Config, Document, ExportFormat, ReportSummary};
use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "ledgerlens")]
#[command(author, version, about = "Bank statement analysis viewer. Shows the headline metrics of an analysis report and exports it as JSON or standalone HTML.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the upload-and-view web page
    Serve {
        /// Port to listen on (default from config, else 3030)
        #[arg(short, long)]
        port: Option<u16>,

        /// Interface to bind (default from config, else 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the banner, header and metric tiles for a report
    Summary {
        /// Analysis report (.json)
        file: PathBuf,
    },

    /// Write the JSON and/or HTML export of a report
    Export {
        /// Analysis report (.json)
        file: PathBuf,

        /// Which artifact to write
        #[arg(short, long, value_enum, default_value = "all")]
        format: FormatArg,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Generate shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Json,
    Html,
    All,
}

impl FormatArg {
    fn formats(self) -> &'static [ExportFormat] {
        match self {
            FormatArg::Json => &[ExportFormat::Json],
            FormatArg::Html => &[ExportFormat::Html],
            FormatArg::All => &[ExportFormat::Json, ExportFormat::Html],
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = Config::load();

    let result = match cli.command {
        Command::Serve { port, host } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            ledgerlens::serve::start_viewer_server(&config)
        }
        Command::Summary { file } => print_summary(&file, &config),
        Command::Export {
            file,
            format,
            out_dir,
        } => write_exports(&file, format, &out_dir, &config),
        Command::Completion { shell } => {
            generate(shell, &mut Cli::command(), "ledgerlens", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn print_summary(file: &Path, config: &Config) -> ledgerlens::Result<()> {
    let doc = Document::from_path(file)?;
    let summary = ReportSummary::from_document(&doc, &config.report.default_company);
    render::write_summary(&mut io::stdout().lock(), &summary)?;
    Ok(())
}

fn write_exports(
    file: &Path,
    format: FormatArg,
    out_dir: &Path,
    config: &Config,
) -> ledgerlens::Result<()> {
    let doc = Document::from_path(file)?;
    let company = ledgerlens::resolve_company_name(doc.root(), &config.report.default_company);

    std::fs::create_dir_all(out_dir)?;
    for &export in format.formats() {
        let artifact = build_artifact(&doc, export, &company, &config.report.html_company)?;
        let path = out_dir.join(disk_file_name(&artifact.file_name));
        std::fs::write(&path, artifact.body)?;
        tracing::info!(path = %path.display(), format = %export, "wrote export");
        println!("   {} {}", "Wrote".green(), path.display());
    }

    Ok(())
}
