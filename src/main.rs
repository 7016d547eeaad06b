//! # Tinta CLI
//!
//! Local driver for the rendering core: reads a screen description from a
//! JSON file and writes the encoded container to disk. No networking;
//! transport belongs to whatever serves the devices.
//!
//! ## Usage
//!
//! ```bash
//! # List available widgets
//! tinta list
//!
//! # Render a screen description to a BMP
//! tinta render --screen screen.json --out screen.bmp
//!
//! # Same screen as PNG, inverted pixel bytes for panels that want them
//! tinta render --screen screen.json --out screen.png
//! tinta render --screen screen.json --out screen.bmp --invert
//!
//! # Render a single widget at a given size
//! tinta widget --id clock --width 400 --height 480 --out clock.png
//!
//! # Built-in demo screen (clock | message | QR)
//! tinta demo --width 800 --height 480 --out demo.bmp
//! ```

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use tinta::codec::{self, ContainerFormat, bmp};
use tinta::context::{RenderContext, UserInfo};
use tinta::error::TintaError;
use tinta::layout::{LayoutConfig, Orientation, Ratios};
use tinta::render::dither::DitherConfig;
use tinta::screen::{self, ScreenRequest, SlotAssignment};
use tinta::widget;

/// Tinta - e-paper screen rendering utility
#[derive(Parser, Debug)]
#[command(name = "tinta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a screen description file
    Render {
        /// Path to the screen JSON (request plus optional context block)
        #[arg(long, value_name = "FILE")]
        screen: PathBuf,

        /// Output file; format follows the extension unless --format is given
        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Container format: bmp or png
        #[arg(long)]
        format: Option<String>,

        /// Store BMP rows bottom-up (classic positive-height layout)
        #[arg(long)]
        bottom_up: bool,

        /// XOR the BMP pixel bytes for panels that expect inverted data
        #[arg(long)]
        invert: bool,
    },

    /// Render a single widget at an exact size
    Widget {
        /// Widget id (see `tinta list`)
        #[arg(long)]
        id: String,

        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Settings JSON; the widget's defaults when omitted
        #[arg(long)]
        settings: Option<String>,
    },

    /// Render the built-in demo screen
    Demo {
        #[arg(long, default_value = "800")]
        width: u32,

        #[arg(long, default_value = "480")]
        height: u32,

        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },

    /// List the widget registry
    List,
}

/// On-disk screen description: the request itself plus the context block
/// a real deployment would resolve from its device records.
#[derive(Debug, Deserialize)]
struct ScreenFile {
    #[serde(flatten)]
    request: ScreenRequest,
    #[serde(default)]
    context: FileContext,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileContext {
    base_url: Option<String>,
    device_id: Option<String>,
    user: Option<UserInfo>,
}

impl FileContext {
    fn into_render_context(self) -> RenderContext {
        let mut ctx = RenderContext::new(
            self.base_url.unwrap_or_else(|| "http://localhost".into()),
            self.device_id.unwrap_or_else(|| "local".into()),
        )
        .with_now(chrono::Utc::now());
        if let Some(user) = self.user {
            ctx.user = user;
        }
        ctx
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), TintaError> {
    match cli.command {
        Commands::Render {
            screen,
            out,
            format,
            bottom_up,
            invert,
        } => {
            let text = std::fs::read_to_string(&screen)?;
            let file: ScreenFile = serde_json::from_str(&text)
                .map_err(|e| TintaError::InvalidSettings(format!("screen file: {}", e)))?;
            let ctx = file.context.into_render_context();
            let image = screen::render(&file.request, &ctx)?;
            write_image(&image, &out, format.as_deref(), bottom_up, invert)
        }

        Commands::Widget {
            id,
            width,
            height,
            out,
            settings,
        } => {
            let widget = widget::by_id(&id)
                .ok_or_else(|| TintaError::InvalidSettings(format!("unknown widget '{}'", id)))?;
            let settings = match settings {
                Some(text) => serde_json::from_str(&text)
                    .map_err(|e| TintaError::InvalidSettings(format!("settings: {}", e)))?,
                None => widget.default_settings(),
            };
            let ctx = FileContext::default().into_render_context();
            let image = widget::run(
                widget,
                &settings,
                &ctx,
                width,
                height,
                &DitherConfig::default(),
            )?;
            write_image(&image, &out, None, false, false)
        }

        Commands::Demo { width, height, out } => {
            let request = demo_request(width, height);
            let ctx = FileContext::default().into_render_context();
            let image = screen::render(&request, &ctx)?;
            write_image(&image, &out, None, false, false)
        }

        Commands::List => {
            for widget in widget::registry() {
                let sizes = widget.output_sizes();
                let sizes = if sizes.is_empty() {
                    "any size".to_string()
                } else {
                    sizes
                        .iter()
                        .map(|(w, h)| format!("{}x{}", w, h))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("{:<10} {:<14} {}", widget.id(), widget.name(), sizes);
            }
            Ok(())
        }
    }
}

/// Pick the container from flag or file extension and write it out.
fn write_image(
    image: &tinta::MonoImage,
    out: &Path,
    format: Option<&str>,
    bottom_up: bool,
    invert: bool,
) -> Result<(), TintaError> {
    let format = match format {
        Some(name) => ContainerFormat::from_extension(name)
            .ok_or_else(|| TintaError::InvalidSettings(format!("unknown format '{}'", name)))?,
        None => out
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ContainerFormat::from_extension)
            .unwrap_or(ContainerFormat::Bmp),
    };

    let bytes = match format {
        ContainerFormat::Bmp => bmp::encode(
            image,
            bmp::BmpOptions {
                top_down: !bottom_up,
                invert,
            },
        )?,
        ContainerFormat::Png => codec::encode(image, ContainerFormat::Png)?,
    };
    std::fs::write(out, &bytes)?;
    println!(
        "wrote {} ({} bytes, {}x{})",
        out.display(),
        bytes.len(),
        image.width(),
        image.height()
    );
    Ok(())
}

/// Three-slot sample screen: clock, a markdown note, a QR code.
fn demo_request(width: u32, height: u32) -> ScreenRequest {
    ScreenRequest {
        width,
        height,
        layout: LayoutConfig {
            orientation: Orientation::Horizontal,
            portrait: false,
            ratios: Ratios::parse("1:2:1").expect("static ratio string"),
        },
        slots: vec![
            SlotAssignment {
                slot: 0,
                widget: "clock".into(),
                settings: serde_json::json!({}),
            },
            SlotAssignment {
                slot: 1,
                widget: "message".into(),
                settings: serde_json::json!({
                    "text": "# Tinta\n\nMonochrome rendering for e-paper panels"
                }),
            },
            SlotAssignment {
                slot: 2,
                widget: "qr_link".into(),
                settings: serde_json::json!({
                    "url": "https://github.com/",
                    "caption": "source"
                }),
            },
        ],
    }
}
