//! Tessera command line renderer.
//!
//! Renders a scene file or a built-in demo scene with the tile renderer and
//! writes the result as an image (format chosen by the output extension).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tessera_core::{demo, SceneDescription, TextureCache};
use tessera_renderer::{build_world, RenderConfig, TileRenderer, DEFAULT_TILE_GRID};

#[derive(Debug, Default, Clone, Copy, ValueEnum)]
enum DemoScene {
    /// Diffuse, glass and metal spheres over a ground plane
    #[default]
    Spheres,
    /// Image-textured cube over a checkered ground plane
    Cube,
}

#[derive(Parser, Debug)]
#[command(name = "tessera", version, about = "CPU path tracer")]
struct Args {
    /// Scene description (JSON); overrides --demo
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Built-in scene to render when no scene file is given
    #[arg(long, value_enum, default_value_t)]
    demo: DemoScene,

    /// Image texture for the cube demo
    #[arg(long)]
    texture: Option<String>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 450)]
    height: u32,

    /// Samples per pixel (batch mode); defaults to the scene's camera setting
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum bounces per path; defaults to the scene's camera setting
    #[arg(long)]
    depth: Option<u32>,

    /// Render this many progressive passes instead of one batch pass
    #[arg(long, default_value_t = 0)]
    passes: u32,

    #[arg(long, default_value_t = DEFAULT_TILE_GRID.0)]
    tiles_x: u32,

    #[arg(long, default_value_t = DEFAULT_TILE_GRID.1)]
    tiles_y: u32,

    /// Seed for reproducible renders
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (mut scene, mut textures) = match &args.scene {
        Some(path) => {
            let scene = SceneDescription::load(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?;
            let base_dir = path.parent().map(PathBuf::from).unwrap_or_default();
            (scene, TextureCache::with_base_dir(base_dir))
        }
        None => {
            let scene = match args.demo {
                DemoScene::Spheres => demo::three_spheres(),
                DemoScene::Cube => demo::textured_cube(args.texture.as_deref()),
            };
            (scene, TextureCache::new())
        }
    };

    if let Some(samples) = args.samples {
        scene.camera.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        scene.camera.max_depth = depth;
    }

    let start = Instant::now();
    let world = build_world(&scene, &mut textures).context("Failed to build world")?;
    log::info!(
        "Built {} objects ({} textures) in {:?}",
        world.len(),
        textures.len(),
        start.elapsed()
    );

    let config = RenderConfig {
        columns: args.tiles_x,
        rows: args.tiles_y,
        seed: args.seed,
    };
    let renderer =
        TileRenderer::new(Arc::new(world), scene.camera.clone(), args.width, args.height)
            .with_config(config);

    let start = Instant::now();
    let image = if args.passes > 0 {
        let mut last_pass = 0;
        renderer.render_tiles_incremental(args.passes, |result, _| {
            if result.samples > last_pass {
                last_pass = result.samples;
                log::info!("Pass {}/{}", last_pass, args.passes);
            }
        })?
    } else {
        renderer.render_tiles(|result, _| {
            log::debug!("Composited tile {}", result.tile.index);
        })?
    };
    log::info!("Rendered in {:?}", start.elapsed());

    image
        .to_image()
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Saved to {}", args.output.display());

    Ok(())
}
