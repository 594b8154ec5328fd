use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use easel_engine::animation::{ease, Animation, FrameBudget};
use easel_engine::config::SceneOptions;
use easel_engine::coords::Vec2;
use easel_engine::logging::{init_logging, LoggingConfig};
use easel_engine::paint::{Color, DrawOptions, LinearGradient, Paint, RadialGradient, StyleSource};
use easel_engine::scene::{Item, Path as ShapePath, Registry, Scene};
use easel_engine::surface::PixmapSurface;
use easel_engine::Surface;

#[derive(Parser)]
#[command(name = "easel-studio")]
#[command(about = "Render and animate a demo easel scene to PNG frames")]
struct Args {
    /// TOML file with scene options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the PNG frames are written to
    #[arg(short, long, default_value = "frames")]
    out: PathBuf,

    /// Stop the animation loop after this many ticks
    #[arg(long)]
    frames: Option<u64>,

    /// TrueType font used for text items
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long, default_value_t = 320)]
    width: u32,

    #[arg(long, default_value_t = 240)]
    height: u32,

    /// Animation length in frames
    #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    duration: u32,

    /// Log filter, e.g. "debug" or "easel_engine::scene=trace"
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(match &args.log {
        Some(filter) => LoggingConfig::with_filter(filter.clone()),
        None => LoggingConfig::default(),
    });

    let options = load_options(args.config.as_deref())?;
    let mut surface = PixmapSurface::new(args.width, args.height).context("creating surface")?;
    match read_font(args.font.as_deref())? {
        Some(bytes) => {
            surface
                .load_font("sans-serif", &bytes)
                .map_err(|e| anyhow::anyhow!("loading font: {}", e.0))?;
        }
        None => log::warn!("no font found; text items will not render"),
    }

    let mut scene = Scene::new(surface, options).context("creating scene")?;
    populate(scene.registry_mut(), args.width as f32, args.height as f32)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    if let Err(err) = scene.redraw(None) {
        log::warn!("initial draw: {err}");
    }
    write_frame(&scene, &args.out, 0)?;

    let budget = FrameBudget::Frames(args.duration);
    for animation in animations() {
        scene.start_animation(&animation, budget);
    }

    let limit = args.frames.unwrap_or(u64::MAX);
    let mut written = 1u64;
    let mut write_error = None;
    let ticks = scene.run_animations_with(|scene| {
        if let Err(err) = write_frame(scene, &args.out, written) {
            write_error = Some(err);
            return ControlFlow::Break(());
        }
        written += 1;
        if written > limit {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    if let Some(err) = write_error {
        return Err(err);
    }
    log::debug!("animation loop ran {ticks} tick(s)");

    println!("wrote {written} frame(s) to {}", args.out.display());
    Ok(())
}

fn load_options(path: Option<&Path>) -> Result<SceneOptions> {
    let mut options = match path {
        Some(path) => SceneOptions::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SceneOptions::default(),
    };
    options.merge_with_env();
    options.validate().context("scene options")?;
    Ok(options)
}

fn read_font(path: Option<&Path>) -> Result<Option<Vec<u8>>> {
    if let Some(path) = path {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        return Ok(Some(bytes));
    }
    Ok([
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok()))
}

fn write_frame(scene: &Scene<PixmapSurface>, dir: &Path, index: u64) -> Result<()> {
    let surface = scene.surface();
    let viewport = surface.viewport();
    let image = image::RgbaImage::from_raw(viewport.width, viewport.height, surface.to_straight_rgba())
        .context("pixel buffer does not match viewport")?;
    let path = dir.join(format!("frame-{index:04}.png"));
    image.save(&path).with_context(|| format!("writing {}", path.display()))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

// ── demo scene ────────────────────────────────────────────────────────────

fn populate(registry: &mut Registry, width: f32, height: f32) -> Result<()> {
    let mut backdrop = Item::rect(0.0, 0.0, width, height);
    backdrop.set_draw_options(&DrawOptions::new().fill(
        LinearGradient::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, height))
            .color_stop(0.0, Color::from_rgba8(24, 28, 48, 255))
            .color_stop(1.0, Color::from_rgba8(64, 40, 88, 255)),
    ));
    registry.insert("backdrop", backdrop)?;

    let mut sun = Item::circle(40.0, height * 0.5, 24.0);
    sun.set_draw_options(
        &DrawOptions::new()
            .fill(
                RadialGradient::new(Vec2::new(0.0, 0.0), 0.0, Vec2::new(0.0, 0.0), 24.0)
                    .color_stop(0.0, Color::from_rgba8(255, 236, 160, 255))
                    .color_stop(1.0, Color::from_rgba8(240, 120, 40, 255)),
            )
            .shadow(3.0, 3.0, 6.0, Color::from_straight(0.0, 0.0, 0.0, 0.4)),
    );
    registry.insert("sun", sun)?;

    let mut star = Item::polygon(width * 0.5, height * 0.5, 5, 30.0);
    star.set_draw_options(
        &DrawOptions::new()
            .fill(StyleSource::dynamic(|item, _| {
                // Warmer as the star turns.
                let turn = item.transform().rotate.unwrap_or(0.0).rem_euclid(std::f32::consts::TAU) / std::f32::consts::TAU;
                Paint::solid(Color::from_straight(0.4 + 0.6 * turn, 0.8, 1.0 - 0.6 * turn, 1.0))
            }))
            .stroke(Color::WHITE)
            .line_width(2.0),
    );
    registry.insert("star", star)?;

    let mut card = Item::rounded_rect(width - 90.0, 20.0, 70.0, 44.0, 10.0);
    card.set_draw_options(
        &DrawOptions::new()
            .fill(Color::from_straight(1.0, 1.0, 1.0, 0.15))
            .stroke(Color::from_rgba8(200, 200, 255, 255)),
    );
    registry.insert("card", card)?;

    let base = height - 30.0;
    let mut wave = ShapePath::new(10.0, base);
    wave.quadratic_curve_to(40.0, base - 30.0, 80.0, base)
        .bezier_curve_to(100.0, base + 30.0, 140.0, base - 30.0, 160.0, base)
        .line_to(width - 20.0, base);
    let mut wave = Item::from(wave);
    wave.set_draw_options(&DrawOptions::new().stroke(Color::from_rgba8(120, 220, 255, 255)).line_width(3.0));
    registry.insert("wave", wave)?;

    let mut title = Item::text(16.0, 30.0, "easel");
    title.set_draw_options(&DrawOptions::new().fill(Color::WHITE).font("bold 20px sans-serif"));
    registry.insert("title", title)?;

    Ok(())
}

fn animations() -> Vec<Animation> {
    vec![
        Animation::new(|f, ctx| {
            let Some(total) = f.duration.total() else { return };
            if let Ok(sun) = ctx.registry().get("sun") {
                sun.borrow_mut().move_by(ease::quad_in_out(240.0, f.frame as f32, total), 0.0);
            }
        }),
        Animation::new(|f, ctx| {
            let Some(total) = f.duration.total() else { return };
            if let Ok(star) = ctx.registry().get("star") {
                star.borrow_mut()
                    .rotate_by(ease::elastic_out(144.0, f.frame as f32, total, ease::DEFAULT_OSCILLATIONS));
            }
        }),
        Animation::new(|f, ctx| {
            let Some(total) = f.duration.total() else { return };
            if let Ok(card) = ctx.registry().get("card") {
                let mut card = card.borrow_mut();
                let current = card.transform().scale.map_or(1.0, |s| s.x);
                let next = current + ease::bounce_out(0.5, f.frame as f32, total);
                card.scale(next, next);
            }
        }),
    ]
}
