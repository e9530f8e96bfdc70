use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

mod config;
mod commands;
mod error;

use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "pros2vi")]
#[command(about = "pros2vi - Protein secondary-structure maps")]
#[command(version)]
#[command(long_about = "
pros2vi draws the secondary structure of every chain in a protein as rows of
glyphs with numbered helix and strand annotations, and exports the map as a
PNG or JPEG image (optionally also a PDF).

Examples:
  pros2vi render 1abc.dssp
  pros2vi render 1abc.dssp -n 1ABC -s 'Lysozyme C' -o lysozyme.png --pdf
  pros2vi render assignments.txt -r 40 -d 300 --color helix=#00aa00
  pros2vi config --example > pros2vi.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a structure assignment file to PNG/JPEG (and optionally PDF)
    Render {
        /// Assignment file (.dssp, or a 'chain position residue label' table)
        input: PathBuf,

        /// Title of the map, also the metadata lookup key (default: input file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Subtitle shown under the title
        #[arg(short, long)]
        subtitle: Option<String>,

        /// Scientific name of the source organism
        #[arg(short = 'S', long)]
        scientific_name: Option<String>,

        /// Residues per row (default from config)
        #[arg(short, long)]
        residues_per_line: Option<usize>,

        /// Output image (.png, .jpg or .jpeg; default: <name>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output resolution (default from config)
        #[arg(short, long)]
        dpi: Option<u32>,

        /// Also write a PDF next to the image
        #[arg(long)]
        pdf: bool,

        /// Write every PDF page to its own numbered image instead of overwriting
        #[arg(long)]
        numbered_pages: bool,

        /// JSON file with per-entry titles, organisms and chain accessions
        #[arg(long)]
        metadata: Option<PathBuf>,

        /// Colour override for a glyph group, e.g. 'helix=#00ff00' (repeatable)
        #[arg(long = "color", value_name = "GROUP=COLOR")]
        colors: Vec<String>,
    },

    /// Inspect the configuration
    Config {
        /// Print an example pros2vi.toml with every default filled in
        #[arg(long)]
        example: bool,
    },
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::Render {
            input,
            name,
            subtitle,
            scientific_name,
            residues_per_line,
            output,
            dpi,
            pdf,
            numbered_pages,
            metadata,
            colors,
        } => {
            commands::render::execute(
                &config,
                input,
                name,
                subtitle,
                scientific_name,
                residues_per_line,
                output,
                dpi,
                pdf,
                numbered_pages,
                metadata,
                colors,
            )?;
        }

        Commands::Config { example } => {
            commands::config::execute(&config, example)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    if let Err(err) = setup_logging(cli.verbose, cli.quiet) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
