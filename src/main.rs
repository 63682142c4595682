use clap::{Parser, Subcommand};
use daybook::pipeline::{self, Paths};
use daybook::{config, logging, output};
use std::path::PathBuf;

/// Shared flags for commands that read entry bodies.
#[derive(clap::Args, Clone)]
struct SecretArgs {
    /// Replacement for %SECRET_TOKEN% in entry bodies
    #[arg(long, env = "DAYBOOK_SECRET", hide_env_values = true)]
    secret: Option<String>,
}

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Static site compiler for delimited-text journal entries")]
#[command(long_about = "\
Static site compiler for delimited-text journal entries

Entries live in plain .md/.txt files, separated by a line of eight hyphens:

  TITLE: 夜の作業
  CATEGORY: 日記, map editor
  DATE: 2024-01-05 21:30:00
  BODY:
  Body text, HTML allowed.
  -----
  EXTENDED BODY:
  Shown behind a toggle.
  -----
  --------

Source structure:

  source/
  ├── config.toml                  # Site config (optional)
  ├── categories.toml              # Category label → directory slug (optional)
  ├── templates/
  │   ├── header.html              # Page header, %TITLE% is replaced
  │   └── footer.html
  ├── assets/                      # Copied verbatim to the output root
  └── entries/*.md                 # Any .md/.txt file outside the above

Entries dated after the build time stay hidden until a later build.

Run 'daybook gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Source directory
    #[arg(long, default_value = "source", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "docs", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".daybook-temp", global = true)]
    temp_dir: PathBuf,

    /// Log diagnostics at debug level to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse every source into a manifest
    Scan(SecretArgs),
    /// Parse and index without writing the site
    Check {
        /// Build time, YYYY-MM-DD or YYYY-MM-DD HH:MM:SS (default: now)
        #[arg(long)]
        now: Option<String>,
    },
    /// Run the full pipeline: parse → index → generate
    Build {
        #[command(flatten)]
        secret: SecretArgs,
        /// Build time, YYYY-MM-DD or YYYY-MM-DD HH:MM:SS (default: now)
        #[arg(long)]
        now: Option<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let paths = Paths {
        source: cli.source.clone(),
        output: cli.output.clone(),
        temp_dir: cli.temp_dir.clone(),
    };

    match cli.command {
        Command::Scan(secret_args) => {
            let manifest = pipeline::scan(&paths, secret_args.secret)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Check { now } => {
            println!("==> Checking {}", cli.source.display());
            let (manifest, index) = pipeline::scan_and_index(&paths, None, now.as_deref())?;
            output::print_scan_output(&manifest, &cli.source);
            println!();
            output::print_index_output(&index, &manifest.config);
            println!("==> Sources are valid");
        }
        Command::Build { secret, now } => {
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let report = pipeline::build(&paths, secret.secret, now.as_deref())?;
            output::print_index_output(&report.index, &report.manifest.config);
            println!();
            output::print_generate_output(&report.generated);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
