use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use hemascope_core::case::CaseData;
use hemascope_core::config::ViewerConfig;
use hemascope_core::focus::focus_channel;
use hemascope_core::geometry::{FocusPoint, PanOffset, ScreenPoint, ScreenRect, SurfaceSize};
use hemascope_core::image_handle::{decode_image, ImageLoader};
use hemascope_core::pointer::{FocusMode, PointerContext, PointerController, PointerEvent};
use hemascope_core::raster::RasterSurface;
use hemascope_core::render::{ClampMode, InsetRenderer, RenderStyle, ViewState, ViewportRenderer};
use hemascope_core::zoom::ZoomControl;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::summary::print_render_report;

#[derive(Clone, Copy, ValueEnum)]
pub enum FocusModeArg {
    Surface,
    Image,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Case file (JSON)
    pub case: PathBuf,

    /// Slide image; overrides the image named in the case
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Main view width in pixels
    #[arg(long, default_value = "800")]
    pub width: f32,

    /// Main view height in pixels
    #[arg(long, default_value = "600")]
    pub height: f32,

    /// Main view zoom (clamped to the configured range)
    #[arg(long)]
    pub zoom: Option<f32>,

    /// Horizontal pan in pre-zoom pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub pan_x: f32,

    /// Vertical pan in pre-zoom pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub pan_y: f32,

    /// Pointer position across the main view (0-1)
    #[arg(long, default_value = "0.5")]
    pub focus_x: f32,

    /// Pointer position down the main view (0-1)
    #[arg(long, default_value = "0.5")]
    pub focus_y: f32,

    /// How the pointer position becomes the inset focus
    #[arg(long, value_enum)]
    pub focus_mode: Option<FocusModeArg>,

    /// Inset magnification
    #[arg(long)]
    pub inset_zoom: Option<f32>,

    /// Inset side length in pixels
    #[arg(long)]
    pub inset_size: Option<f32>,

    /// Let the inset crop extend past the image edges
    #[arg(long)]
    pub unclamped: bool,

    /// Hide annotation overlays
    #[arg(long)]
    pub no_annotations: bool,

    /// Draw the pointer indicator in the main view
    #[arg(long)]
    pub pointer: bool,

    /// Main view output
    #[arg(short, long, default_value = "view.png")]
    pub output: PathBuf,

    /// Inset output
    #[arg(long, default_value = "inset.png")]
    pub inset_output: PathBuf,
}

pub fn run(args: &RenderArgs, config: &ViewerConfig) -> Result<()> {
    let mut config = config.clone();
    if let Some(zoom) = args.inset_zoom {
        config.inset.zoom = zoom;
    }
    if let Some(size) = args.inset_size {
        config.inset.width = size;
        config.inset.height = size;
    }
    if args.unclamped {
        config.inset.clamp = ClampMode::Unclamped;
    }
    if let Some(mode) = args.focus_mode {
        config.focus_mode = match mode {
            FocusModeArg::Surface => FocusMode::Surface,
            FocusModeArg::Image => FocusMode::Image,
        };
    }
    config.validate()?;

    let style = RenderStyle {
        show_annotations: !args.no_annotations,
        show_pointer: args.pointer,
        ..config.style.clone()
    };

    let case = CaseData::load(&args.case, &config.detection_filter)
        .with_context(|| format!("Failed to load case {}", args.case.display()))?;
    let image_path = match args.image {
        Some(ref path) => path.clone(),
        None => case.image_path()?.to_path_buf(),
    };

    let mut loader = ImageLoader::with_timeout(config.load_timeout());
    let token = loader.request(image_path.display().to_string());
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message(format!("Decoding {}", image_path.display()));
    pb.enable_steady_tick(Duration::from_millis(80));
    let decoded = decode_image(&image_path);
    pb.finish_and_clear();
    loader.complete(token, decoded);
    let handle = loader.handle();
    if handle.is_failed() {
        warn!(path = %image_path.display(), "Image unavailable, rendering placeholders");
    }

    let size = SurfaceSize::new(args.width, args.height);
    let mut zoom = ZoomControl::new(config.zoom)?;
    if let Some(z) = args.zoom {
        zoom.set(z);
    }

    // Drive the pointer controller with one synthetic move so the inset
    // follows the same focus path as interactive use.
    let (publisher, subscriber) = focus_channel(FocusPoint::CENTER);
    let mut pointer = PointerController::new(publisher, config.focus_mode);
    let mut view = ViewState {
        zoom: zoom.zoom(),
        pan: PanOffset::new(args.pan_x, args.pan_y),
        pointer: None,
    };
    let mut ctx = PointerContext::new(ScreenRect::from_size(size), view.zoom);
    if let Some(slide) = handle.ready() {
        if let Some(transform) = view.transform(slide.size(), size) {
            ctx = ctx.with_view(transform, slide.size());
        }
    }
    pointer.handle(
        PointerEvent::Move(ScreenPoint::new(
            args.focus_x * size.width,
            args.focus_y * size.height,
        )),
        &ctx,
    );
    view.pointer = pointer.indicator();

    let mut main = RasterSurface::for_size(size).context("Invalid main view size")?;
    let main_report =
        ViewportRenderer::new().render(&mut main, handle, case.annotations(), &view, &style);
    main.save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let mut inset = RasterSurface::for_size(config.inset.size()).context("Invalid inset size")?;
    let inset_report = InsetRenderer::new(subscriber).render(
        &mut inset,
        handle,
        case.annotations(),
        &config.inset.params(),
        &style,
    );
    inset.save_png(&args.inset_output)
        .with_context(|| format!("Failed to write {}", args.inset_output.display()))?;

    println!();
    print_render_report("View", &main_report);
    print_render_report("Inset", &inset_report);
    println!();
    println!("Main view saved to {}", args.output.display());
    println!("Inset saved to {}", args.inset_output.display());
    Ok(())
}
