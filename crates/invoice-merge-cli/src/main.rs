use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use invoice_merge::{MergeOptions, PaperSize, ProgressReport};
use invoice_merge_runtime::MergeLogger;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "invm", about = "Merge invoices two per page into one PDF", version)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge PDFs and images into a single PDF, two per page
    Merge {
        /// Input files (pdf, png, jpg, jpeg, gif, bmp, tif, tiff), in output order
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON options file; flags below override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output paper size
        #[arg(long, value_enum, conflicts_with = "page_width_pt")]
        paper: Option<PaperArg>,

        /// Output orientation (named paper sizes only)
        #[arg(long, value_enum, conflicts_with = "page_width_pt")]
        orientation: Option<OrientationArg>,

        /// Custom page width in points
        #[arg(long, requires = "page_height_pt")]
        page_width_pt: Option<f32>,

        /// Custom page height in points
        #[arg(long, requires = "page_width_pt")]
        page_height_pt: Option<f32>,

        /// Page margin in points (all sides)
        #[arg(long)]
        margin: Option<f32>,

        /// Gap between the two images in points
        #[arg(long)]
        spacing: Option<f32>,

        /// Where the two images of a page go
        #[arg(long, value_enum)]
        arrangement: Option<ArrangementArg>,

        /// Scaling mode
        #[arg(long, value_enum)]
        scaling: Option<ScalingArg>,

        /// Resolution for rendering PDF pages
        #[arg(long)]
        dpi: Option<u32>,

        /// Store images uncompressed
        #[arg(long)]
        no_compress: bool,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum ArrangementArg {
    TopBottom,
    LeftRight,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScalingArg {
    Fit,
    ShrinkOnly,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

impl From<OrientationArg> for invoice_merge::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<ArrangementArg> for invoice_merge::SlotArrangement {
    fn from(arg: ArrangementArg) -> Self {
        match arg {
            ArrangementArg::TopBottom => Self::TopBottom,
            ArrangementArg::LeftRight => Self::LeftRight,
        }
    }
}

impl From<ScalingArg> for invoice_merge::ScalingMode {
    fn from(arg: ScalingArg) -> Self {
        match arg {
            ScalingArg::Fit => Self::Fit,
            ScalingArg::ShrinkOnly => Self::ShrinkOnly,
        }
    }
}

fn print_progress(report: &ProgressReport) {
    println!(
        "  {} {}/{}: {}",
        report.phase, report.processed, report.total, report.label
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    MergeLogger::new(1000)
        .with_level(level)
        .with_echo(true)
        .init()?;

    match cli.command {
        Commands::Merge {
            inputs,
            output,
            config,
            paper,
            orientation,
            page_width_pt,
            page_height_pt,
            margin,
            spacing,
            arrangement,
            scaling,
            dpi,
            no_compress,
            stats_only,
        } => {
            let mut options = match &config {
                Some(path) => MergeOptions::load(path)
                    .await
                    .with_context(|| format!("loading {}", path.display()))?,
                None => MergeOptions::default(),
            };

            if let Some(paper) = paper {
                options.paper_size = paper.into();
            }
            if let (Some(width_pt), Some(height_pt)) = (page_width_pt, page_height_pt) {
                options.paper_size = PaperSize::Custom {
                    width_pt,
                    height_pt,
                };
            }
            if let Some(orientation) = orientation {
                options.orientation = orientation.into();
            }
            if let Some(margin) = margin {
                options.margin_pt = margin;
            }
            if let Some(spacing) = spacing {
                options.spacing_pt = spacing;
            }
            if let Some(arrangement) = arrangement {
                options.arrangement = arrangement.into();
            }
            if let Some(scaling) = scaling {
                options.scaling = scaling.into();
            }
            if let Some(dpi) = dpi {
                options.dpi = dpi;
            }
            if no_compress {
                options.compress = false;
            }

            // Reject unsupported files before doing any work
            let documents = invoice_merge::validate_inputs(&inputs)?;

            let stats = invoice_merge::calculate_statistics(documents.len(), &options)?;
            println!("Merge Statistics:");
            println!("  Input files: {}", stats.inputs);
            println!("  Output pages: {}", stats.output_pages);
            println!("  Blank slots: {}", stats.blank_slots);

            if stats_only {
                return Ok(());
            }

            let report =
                invoice_merge::merge(inputs, output.clone(), options, print_progress).await?;

            if !report.skipped.is_empty() {
                println!("Skipped {} file(s):", report.skipped.len());
                for skip in &report.skipped {
                    println!("  {}: {}", skip.path.display(), skip.reason);
                }
            }
            println!(
                "Merged {} file(s) onto {} page(s) → {}",
                report.placed,
                report.output_pages,
                output.display()
            );
        }
    }

    Ok(())
}
