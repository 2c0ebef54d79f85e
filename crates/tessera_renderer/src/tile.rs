//! Tile-based parallel rendering.
//!
//! Divides the image into a grid of disjoint tiles and renders each on its
//! own worker thread. Workers share the world read-only and send their
//! pixels back over a channel; the calling thread composites each tile into
//! the full image as soon as it arrives.

use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;

use crate::renderer::{PixelBuffer, PixelRect};
use crate::{Camera, Hittable, RenderError, RenderResult};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tessera_core::CameraSettings;

/// Default tile grid (columns, rows).
pub const DEFAULT_TILE_GRID: (u32, u32) = (2, 2);

/// A rectangular region of the image rendered by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub rect: PixelRect,
    /// Index of this tile in row-major grid order
    pub index: usize,
}

/// Split an image into a `columns` x `rows` grid of tiles.
///
/// Tiles are disjoint and together cover every pixel. Tile edges are spread
/// evenly, so tile sizes differ by at most one pixel. The grid is clamped so
/// no tile is empty.
pub fn generate_tiles(width: u32, height: u32, columns: u32, rows: u32) -> Vec<Tile> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let columns = columns.clamp(1, width);
    let rows = rows.clamp(1, height);

    let edge = |extent: u32, count: u32, i: u32| (extent as u64 * i as u64 / count as u64) as u32;

    let mut tiles = Vec::with_capacity((columns * rows) as usize);
    for row in 0..rows {
        let (y0, y1) = (edge(height, rows, row), edge(height, rows, row + 1));
        for col in 0..columns {
            let (x0, x1) = (edge(width, columns, col), edge(width, columns, col + 1));
            tiles.push(Tile {
                rect: PixelRect::new(x0, y0, x1 - x0, y1 - y0),
                index: tiles.len(),
            });
        }
    }

    tiles
}

/// Everything a worker needs to render one tile.
#[derive(Debug, Clone)]
pub struct TileRequest {
    pub image_width: u32,
    pub image_height: u32,
    pub tile: Tile,
    pub camera: CameraSettings,
}

impl TileRequest {
    /// An initialized camera restricted to this tile.
    pub fn camera(&self) -> Camera {
        let mut camera = Camera::from_settings(&self.camera, self.image_width, self.image_height)
            .with_region(self.tile.rect);
        camera.initialize();
        camera
    }
}

/// Pixels returned by a worker for its tile.
#[derive(Debug, Clone)]
pub struct TileResult {
    pub tile: Tile,
    /// Tile-local RGBA pixels, sized to `tile.rect`
    pub pixels: PixelBuffer,
    /// Samples per pixel averaged into `pixels`
    pub samples: u32,
    /// True for the last update a worker sends for its tile
    pub complete: bool,
}

/// Render one tile in a single batch pass.
pub fn render_tile(request: &TileRequest, world: &dyn Hittable, rng: &mut dyn RngCore) -> TileResult {
    let camera = request.camera();
    let mut pixels = camera.new_buffer();
    camera.render(world, rng, &mut pixels);

    TileResult {
        tile: request.tile,
        pixels,
        samples: camera.samples_per_pixel.max(1),
        complete: true,
    }
}

/// Dispatcher settings.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub columns: u32,
    pub rows: u32,
    /// Base seed for the per-tile random streams; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_TILE_GRID.0,
            rows: DEFAULT_TILE_GRID.1,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Batch,
    Incremental { passes: u32 },
}

/// Renders a world across a fixed pool of tile workers.
pub struct TileRenderer {
    world: Arc<dyn Hittable>,
    camera: CameraSettings,
    width: u32,
    height: u32,
    config: RenderConfig,
}

impl TileRenderer {
    pub fn new(world: Arc<dyn Hittable>, camera: CameraSettings, width: u32, height: u32) -> Self {
        Self {
            world,
            camera,
            width,
            height,
            config: RenderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// One request per tile, in tile index order.
    pub fn requests(&self) -> Vec<TileRequest> {
        generate_tiles(self.width, self.height, self.config.columns, self.config.rows)
            .into_iter()
            .map(|tile| TileRequest {
                image_width: self.width,
                image_height: self.height,
                tile,
                camera: self.camera.clone(),
            })
            .collect()
    }

    /// Render every tile once and return the composited image.
    ///
    /// `on_tile` runs on the calling thread after each tile is composited.
    pub fn render_tiles<F>(&self, on_tile: F) -> RenderResult<PixelBuffer>
    where
        F: FnMut(&TileResult, &PixelBuffer),
    {
        self.dispatch(Mode::Batch, on_tile)
    }

    /// Render `passes` incremental passes per tile, one sample per pixel each.
    ///
    /// Every worker sends an update after each pass, so `on_tile` sees the
    /// image refine progressively.
    pub fn render_tiles_incremental<F>(&self, passes: u32, on_tile: F) -> RenderResult<PixelBuffer>
    where
        F: FnMut(&TileResult, &PixelBuffer),
    {
        self.dispatch(
            Mode::Incremental {
                passes: passes.max(1),
            },
            on_tile,
        )
    }

    fn dispatch<F>(&self, mode: Mode, mut on_tile: F) -> RenderResult<PixelBuffer>
    where
        F: FnMut(&TileResult, &PixelBuffer),
    {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }

        let requests = self.requests();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(requests.len())
            .thread_name(|i| format!("tessera-tile-{i}"))
            .panic_handler(|_| log::error!("Tile worker panicked"))
            .build()?;

        log::info!(
            "Rendering {}x{} in {} tiles ({:?})",
            self.width,
            self.height,
            requests.len(),
            mode
        );

        let (tx, rx) = channel();
        for request in requests.iter().cloned() {
            let tx = tx.clone();
            let world = Arc::clone(&self.world);
            let mut rng = tile_rng(self.config.seed, request.tile.index);

            pool.spawn(move || run_worker(&request, world.as_ref(), &mut rng, mode, &tx));
        }
        // Only workers hold senders now; the loop below ends when all are done
        drop(tx);

        let mut image = PixelBuffer::new(self.width, self.height);
        let mut complete = vec![false; requests.len()];

        for result in rx {
            let rect = result.tile.rect;
            image.blit(&result.pixels, rect.x, rect.y);

            if result.complete {
                complete[result.tile.index] = true;
                log::debug!(
                    "Tile {} done ({} spp)",
                    result.tile.index,
                    result.samples
                );
            }
            on_tile(&result, &image);
        }

        if let Some(tile) = complete.iter().position(|done| !done) {
            log::warn!("Tile {} worker disconnected without finishing", tile);
            return Err(RenderError::WorkerLost { tile });
        }

        log::info!("Render complete");
        Ok(image)
    }
}

/// Independent random stream for a tile.
fn tile_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}

fn run_worker(
    request: &TileRequest,
    world: &dyn Hittable,
    rng: &mut StdRng,
    mode: Mode,
    tx: &Sender<TileResult>,
) {
    match mode {
        Mode::Batch => {
            // A closed channel means the receiver is gone; nothing left to do
            let _ = tx.send(render_tile(request, world, rng));
        }
        Mode::Incremental { passes } => {
            let mut camera = request.camera();
            let mut pixels = camera.new_buffer();

            for pass in 1..=passes {
                camera.incremental_render(world, rng, &mut pixels);
                let update = TileResult {
                    tile: request.tile,
                    pixels: pixels.clone(),
                    samples: camera.sample_count(),
                    complete: pass == passes,
                };
                if tx.send(update).is_err() {
                    return;
                }
            }
        }
    }
}
