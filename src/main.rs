use clap::{Parser, Subcommand};
use melody2score::{validate_input, Config, Melody2Score};
use std::path::PathBuf;

/// Melody-to-Score Rhythm Quantizer
#[derive(Parser)]
#[command(name = "melody2score")]
#[command(about = "Snap transcribed MIDI notes to a sixteenth-note grid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quantize a MIDI file and write the cleaned result
    Quantize {
        /// Input MIDI file (.mid/.midi)
        input: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Custom configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fixed BPM (skips the file tempo and the estimator)
        #[arg(long)]
        bpm: Option<f64>,

        /// Subdivisions per quarter note (4 = sixteenth notes)
        #[arg(long)]
        subdivision: Option<u32>,

        /// Skip the JSON analysis report
        #[arg(long)]
        no_analysis: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Quiet output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config: PathBuf,
    },
    /// Show default configuration
    ShowConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Quantize {
            input,
            output,
            config,
            bpm,
            subdivision,
            no_analysis,
            verbose,
            quiet,
        } => {
            if verbose && quiet {
                anyhow::bail!("Cannot specify both --verbose and --quiet");
            }

            // Load configuration
            let mut config = if let Some(config_path) = config {
                melody2score::config::load_config(config_path)?
            } else {
                Config::default()
            };

            // Command-line overrides
            if bpm.is_some() {
                config.tempo.bpm_override = bpm;
            }
            if let Some(subdivision) = subdivision {
                config.grid.subdivision = subdivision;
            }
            if no_analysis {
                config.export.write_analysis = false;
            }

            // Validate input
            validate_input(&input, &config)?;

            // Create processor
            let processor = Melody2Score::new(config);

            if !quiet {
                println!("Quantizing {}...", input.display());
            }

            processor.process(&input, &output)?;

            if !quiet {
                println!("Results saved to {}", output.display());
            }
        }
        Commands::ValidateConfig { config } => {
            let config = melody2score::config::load_config(config)?;
            println!("Configuration is valid");
            if let Ok(json) = serde_json::to_string_pretty(&config) {
                println!("{}", json);
            }
        }
        Commands::ShowConfig => {
            let config = Config::default();
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
    }

    Ok(())
}
