use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use storefront_photos::api::{self, ProductApiClient, ProductDraft, Session};
use storefront_photos::config::{ApiConfig, MAX_HEIGHT, MAX_SIZE_KB, MAX_WIDTH, NormalizerConfig};
use storefront_photos::{
    HasRecoverySuggestion, ImageNormalizer, PhotoError, PhotoSlotManager, RawSelection,
};

/// Product photo tooling for the storefront:
/// - normalize: one file → bounded JPEG
/// - slots: fill the primary/extra photo slots and inspect the payload
/// - submit: create a product with its photos
#[derive(Parser, Debug)]
#[command(name = "photos")]
#[command(about = "📷 Resize and compress product photos for the storefront")]
#[command(long_about = "Resize and compress product photos the way the seller dashboard does:
fit within a bounding box, flatten transparency onto white and re-encode as JPEG under a size budget.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a single image file
    Normalize {
        /// Image to normalize
        input: PathBuf,

        /// Output JPEG path
        #[arg(short, long, help = "Output file (default: <input>_normalized.jpg)")]
        output: Option<PathBuf>,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Assign files to photo slots in order and show the result
    Slots {
        /// Files for slot 0, 1, 2 ...
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Remove this slot after assigning
        #[arg(long, help = "Empty a slot after assignment (later slots are not shifted)")]
        remove: Option<usize>,

        /// Print the images JSON instead of the slot table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Create a product with the given photos
    Submit {
        /// Files for slot 0, 1, 2 ...
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long, help = "API base URL, e.g. https://shop.example/api")]
        api_url: String,

        #[arg(long, help = "Seller session token")]
        token: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        price: f64,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, default_value_t = 1)]
        stock: u32,

        #[command(flatten)]
        limits: LimitArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct LimitArgs {
    #[arg(long, default_value_t = MAX_WIDTH, help = "Maximum output width")]
    max_width: u32,

    #[arg(long, default_value_t = MAX_HEIGHT, help = "Maximum output height")]
    max_height: u32,

    #[arg(long, default_value_t = MAX_SIZE_KB, help = "Target JPEG size in KiB (best effort)")]
    max_size_kb: u64,

    #[arg(long, default_value_t = 5, help = "Largest accepted input in MiB")]
    max_file_mb: u64,
}

impl LimitArgs {
    fn to_config(&self) -> Result<NormalizerConfig, PhotoError> {
        let max_file_bytes = self.max_file_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            PhotoError::config(
                "max_file_mb",
                self.max_file_mb.to_string(),
                "does not fit in a byte count",
            )
        })?;
        Ok(NormalizerConfig::new(
            max_file_bytes,
            self.max_width,
            self.max_height,
            self.max_size_kb,
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    match Cli::parse().command {
        Command::Normalize {
            input,
            output,
            limits,
        } => normalize_file(&input, output, &limits),
        Command::Slots {
            files,
            remove,
            json,
            limits,
        } => {
            let mut photos = fill_slots(&files, &limits).await?;
            if let Some(slot) = remove {
                photos.remove(slot).map_err(explain)?;
            }
            if json {
                let body = api::images_json(&photos.to_payload());
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                print_slots(&photos);
            }
            Ok(())
        }
        Command::Submit {
            files,
            api_url,
            token,
            name,
            price,
            description,
            category,
            stock,
            limits,
        } => {
            let photos = fill_slots(&files, &limits).await?;
            let draft = ProductDraft {
                name,
                description,
                price,
                category,
                stock,
            };
            let client = ProductApiClient::new(ApiConfig::new(api_url)).map_err(explain)?;
            let created = api::submit_product(
                &client,
                &Session::new(token),
                &draft,
                &photos.to_payload(),
            )
            .await
            .map_err(explain)?;
            println!("{}", serde_json::to_string_pretty(&created)?);
            Ok(())
        }
    }
}

fn normalize_file(input: &Path, output: Option<PathBuf>, limits: &LimitArgs) -> Result<()> {
    let normalizer = limits
        .to_config()
        .and_then(ImageNormalizer::new)
        .map_err(explain)?;
    let selection = RawSelection::from_path(input).map_err(explain)?;
    let image = normalizer.normalize(&selection).map_err(explain)?;

    let output = output.unwrap_or_else(|| default_output(input));
    std::fs::write(&output, image.encoded_bytes())
        .with_context(|| format!("writing {}", output.display()))?;

    println!("Output: {}", output.display());
    println!(
        "Size: {}x{}, quality {:.1}, ~{} KiB",
        image.width(),
        image.height(),
        image.quality_used(),
        image.approx_size_bytes() / 1024
    );
    Ok(())
}

async fn fill_slots(files: &[PathBuf], limits: &LimitArgs) -> Result<PhotoSlotManager> {
    let normalizer = limits
        .to_config()
        .and_then(ImageNormalizer::new)
        .map_err(explain)?;
    let mut photos = PhotoSlotManager::with_normalizer(normalizer);
    for (slot, path) in files.iter().enumerate() {
        let selection = RawSelection::from_path(path).map_err(explain)?;
        photos
            .assign_async(slot, selection)
            .await
            .map_err(explain)
            .with_context(|| format!("slot {}: {}", slot, path.display()))?;
    }
    Ok(photos)
}

fn print_slots(photos: &PhotoSlotManager) {
    for slot in 0..photos.capacity() {
        let label = if slot == 0 { " (primary)" } else { "" };
        match photos.get(slot) {
            Some(image) => println!(
                "slot {}{}: {}x{}, quality {:.1}, ~{} KiB",
                slot,
                label,
                image.width(),
                image.height(),
                image.quality_used(),
                image.approx_size_bytes() / 1024
            ),
            None => println!("slot {}{}: empty", slot, label),
        }
    }
    println!("Photos: {}/{}", photos.count(), photos.capacity());
    if photos.has_gap() {
        eprintln!("Note: photos after the first empty slot are not submitted");
    }
}

/// Put the user-facing suggestion in front of the technical message.
fn explain(err: PhotoError) -> anyhow::Error {
    match err.recovery_suggestion().map(str::to_owned) {
        Some(hint) => anyhow::Error::new(err).context(hint),
        None => anyhow::Error::new(err),
    }
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    input.with_file_name(format!("{}_normalized.jpg", stem))
}
