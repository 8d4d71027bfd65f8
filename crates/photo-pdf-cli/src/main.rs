mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use photo_pdf_runtime::{
    ExportDestination, ExportOptions, ImageId, ImageSummary, SessionCommand, SessionUpdate,
    session_worker,
};
use std::path::PathBuf;
use tokio::sync::mpsc;

use logger::CliLogger;

#[derive(Parser)]
#[command(name = "photopdf", about = "Combine photos into a PDF, one per page", version)]
struct Cli {
    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert JPEG and PNG photos into a PDF
    Convert {
        /// Input photos, in page order
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Directory the PDF is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output file name, without extension
        #[arg(long)]
        name: Option<String>,

        /// Rotate the input at this 1-based position (counted in the input
        /// list) a quarter turn clockwise; repeat to turn further
        #[arg(long, value_name = "POSITION")]
        rotate: Vec<usize>,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Save the effective options to this JSON file
        #[arg(long, value_name = "FILE")]
        save_config: Option<PathBuf>,
    },

    /// Show where each photo would be placed, without writing a PDF
    Layout {
        /// Input photos
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

#[derive(Args)]
struct LayoutArgs {
    /// Load options from a JSON file; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page size
    #[arg(long, value_enum)]
    page_size: Option<PageSizeArg>,

    /// Page orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Blank border around each photo
    #[arg(long, value_enum)]
    margin: Option<MarginArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PageSizeArg {
    A4,
    Letter,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum MarginArg {
    None,
    Small,
    Medium,
}

impl From<PageSizeArg> for photo_pdf::PageSize {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::A4 => Self::A4,
            PageSizeArg::Letter => Self::Letter,
        }
    }
}

impl From<OrientationArg> for photo_pdf::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<MarginArg> for photo_pdf::Margin {
    fn from(arg: MarginArg) -> Self {
        match arg {
            MarginArg::None => Self::None,
            MarginArg::Small => Self::Small,
            MarginArg::Medium => Self::Medium,
        }
    }
}

impl LayoutArgs {
    async fn resolve(&self) -> Result<ExportOptions> {
        let mut options = match &self.config {
            Some(path) => ExportOptions::load(path)
                .await
                .with_context(|| format!("Loading {}", path.display()))?,
            None => ExportOptions::default(),
        };
        if let Some(page_size) = self.page_size {
            options.page_size = page_size.into();
        }
        if let Some(orientation) = self.orientation {
            options.orientation = orientation.into();
        }
        if let Some(margin) = self.margin {
            options.margin = margin.into();
        }
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::new(CliLogger::level_for(cli.verbose, cli.quiet)).init()?;

    match cli.command {
        Commands::Convert {
            inputs,
            output_dir,
            name,
            rotate,
            layout,
            save_config,
        } => {
            let mut options = layout.resolve().await?;
            if let Some(name) = name {
                options.output_name = name;
            }
            options.validate()?;

            if let Some(path) = save_config {
                options.save(&path).await?;
                println!("Saved options → {}", path.display());
            }

            convert(inputs, output_dir, rotate, options).await?;
        }

        Commands::Layout { inputs, layout } => {
            let options = layout.resolve().await?;
            options.validate()?;
            print_layout(&inputs, &options).await?;
        }
    }

    Ok(())
}

/// Drive a session worker through ingest, rotation and export
async fn convert(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    rotate: Vec<usize>,
    options: ExportOptions,
) -> Result<()> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(session_worker(command_rx, update_tx));

    // One input per batch, so each input maps to the id it was loaded as
    let mut loaded = Vec::with_capacity(inputs.len());
    let mut count = 0;
    for path in inputs {
        command_tx.send(SessionCommand::AddPaths { paths: vec![path] })?;
        let images = wait_for_collection(&mut update_rx).await?;
        loaded.push(match images.last() {
            Some(image) if images.len() > count => Some(image.id),
            _ => None,
        });
        count = images.len();
    }
    if count == 0 {
        bail!("None of the inputs could be loaded");
    }

    for id in rotation_targets(&loaded, &rotate)? {
        command_tx.send(SessionCommand::Rotate { id })?;
        wait_for_collection(&mut update_rx).await?;
    }

    command_tx.send(SessionCommand::Export {
        options,
        destination: ExportDestination::Directory(output_dir),
    })?;
    drop(command_tx);

    while let Some(update) = update_rx.recv().await {
        match update {
            SessionUpdate::BuildStarted { page_count } => {
                log::info!("Converting {} photos", page_count);
            }
            SessionUpdate::Progress {
                operation,
                current,
                total,
            } => log::info!("{} {}/{}", operation, current, total),
            SessionUpdate::Exported { path, page_count } => {
                println!("Converted {} photos → {}", page_count, path.display());
            }
            SessionUpdate::Error { message } => bail!(message),
            _ => {}
        }
    }

    worker.await?;
    Ok(())
}

/// Ids to rotate for 1-based input positions; `loaded` holds the id of each
/// input, or `None` where the input was skipped
fn rotation_targets(loaded: &[Option<ImageId>], positions: &[usize]) -> Result<Vec<ImageId>> {
    positions
        .iter()
        .map(|&position| {
            match position.checked_sub(1).and_then(|i| loaded.get(i)) {
                Some(Some(id)) => Ok(*id),
                Some(None) => bail!("Cannot rotate input {}: it was skipped", position),
                None => bail!(
                    "No input at position {} (there are {})",
                    position,
                    loaded.len()
                ),
            }
        })
        .collect()
}

/// Collect updates until the worker reports the collection
async fn wait_for_collection(
    update_rx: &mut mpsc::UnboundedReceiver<SessionUpdate>,
) -> Result<Vec<ImageSummary>> {
    while let Some(update) = update_rx.recv().await {
        match update {
            SessionUpdate::CollectionChanged { images } => return Ok(images),
            SessionUpdate::FileSkipped { name, message } => {
                eprintln!("Skipped {}: {}", name, message);
            }
            SessionUpdate::Error { message } => bail!(message),
            _ => {}
        }
    }
    bail!("Session worker stopped unexpectedly")
}

async fn print_layout(inputs: &[PathBuf], options: &ExportOptions) -> Result<()> {
    let (page_width, page_height) = options.page_dimensions();
    println!(
        "{} {:?}, {:?} margin: {:.2} x {:.2} pt",
        options.page_size.name(),
        options.orientation,
        options.margin,
        page_width,
        page_height
    );

    for (index, (name, loaded)) in photo_pdf::load_raw_files(inputs)
        .await
        .into_iter()
        .enumerate()
    {
        let decoded = match loaded {
            Ok(file) => photo_pdf::decode_file_async(file).await,
            Err(e) => Err(e),
        };
        let decoded = match decoded {
            Ok(decoded) => decoded,
            Err(e) => {
                eprintln!("Skipped {}: {}", name, e);
                continue;
            }
        };

        let (width, height) = decoded.dimensions();
        let plan = photo_pdf::plan_page(width, height, options)?;
        let rect = plan.placement.rect;
        println!(
            "  {:>3}. {} ({}x{} px) → {:.2} x {:.2} pt at ({:.2}, {:.2}), scale {:.4}",
            index + 1,
            decoded.name(),
            width,
            height,
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            plan.placement.scale
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_targets_follow_input_order() {
        // Second input was skipped
        let loaded = [Some(ImageId(0)), None, Some(ImageId(1))];

        let ids = rotation_targets(&loaded, &[3, 1, 3]).unwrap();
        assert_eq!(ids, vec![ImageId(1), ImageId(0), ImageId(1)]);

        let err = rotation_targets(&loaded, &[2]).unwrap_err();
        assert!(err.to_string().contains("skipped"));

        assert!(rotation_targets(&loaded, &[0]).is_err());
        assert!(rotation_targets(&loaded, &[4]).is_err());
        assert!(rotation_targets(&loaded, &[]).unwrap().is_empty());
    }
}
