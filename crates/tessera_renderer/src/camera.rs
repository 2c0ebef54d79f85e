//! Camera for ray generation and rendering.
//!
//! A camera renders either the whole image or a sub-rectangle of it (a
//! tile). Batch rendering averages `samples_per_pixel` samples at once;
//! incremental rendering adds one sample per pixel per call and keeps the
//! running sums between calls.

use crate::renderer::{color_to_rgba, ray_color, PixelBuffer, PixelRect};
use crate::Hittable;
use rand::RngCore;
use tessera_core::CameraSettings;
use tessera_math::{gen_f64, unit, Color, Ray, Vec3};

/// Camera for generating rays into the scene.
#[derive(Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    vfov: f64, // Vertical field of view in degrees

    /// Region of the image this camera renders (whole image when `None`)
    region: Option<PixelRect>,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,

    // Incremental rendering state
    accumulation: Vec<Color>,
    sample_count: u32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::from_settings(&CameraSettings::default(), 800, 450)
    }

    /// Create a camera from scene settings for an image of the given size.
    ///
    /// The camera still needs `initialize()` before rendering.
    pub fn from_settings(settings: &CameraSettings, width: u32, height: u32) -> Self {
        Self {
            image_width: width,
            image_height: height,
            samples_per_pixel: settings.samples_per_pixel,
            max_depth: settings.max_depth,
            look_from: Vec3::from_array(settings.look_from),
            look_at: Vec3::from_array(settings.look_at),
            vup: Vec3::from_array(settings.vup),
            vfov: settings.vfov,
            region: None,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            accumulation: Vec::new(),
            sample_count: 0,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f64) -> Self {
        self.vfov = vfov;
        self
    }

    /// Restrict rendering to a sub-rectangle of the image.
    pub fn with_region(mut self, region: PixelRect) -> Self {
        self.region = Some(region);
        self
    }

    /// Initialize the camera (must be called before rendering).
    ///
    /// Derives the viewport from the current settings and clears any
    /// accumulated samples.
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        // Camera basis vectors
        self.w = unit(self.look_from - self.look_at);
        self.u = unit(self.vup.cross(self.w));
        self.v = self.w.cross(self.u);

        // Viewport dimensions, placed at the look-at distance
        let focal_length = (self.look_from - self.look_at).length();
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * focal_length;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left =
            self.center - focal_length * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        self.reset_accumulation();
    }

    /// The rectangle of the image this camera renders.
    pub fn region(&self) -> PixelRect {
        self.region
            .unwrap_or_else(|| PixelRect::full(self.image_width, self.image_height))
    }

    /// A black buffer sized for this camera's region.
    pub fn new_buffer(&self) -> PixelBuffer {
        PixelBuffer::for_rect(self.region())
    }

    /// Number of incremental passes accumulated so far.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Discard accumulated incremental samples.
    ///
    /// Call this after changing the scene or camera between incremental passes.
    pub fn reset_accumulation(&mut self) {
        self.accumulation.clear();
        self.accumulation
            .resize(self.region().pixel_count(), Color::ZERO);
        self.sample_count = 0;
    }

    /// Make `out` match the region, returning the region.
    fn fit_buffer(&self, out: &mut PixelBuffer) -> PixelRect {
        let region = self.region();
        if (out.width, out.height) != (region.width, region.height) {
            *out = self.new_buffer();
        }
        region
    }

    /// Generate a ray for pixel (i, j) with a random offset within the pixel.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        Ray::new(self.center, pixel_sample - self.center)
    }

    /// Render the camera's region once, averaging `samples_per_pixel` samples.
    ///
    /// `out` is replaced with a fresh buffer if it is not sized to `region()`.
    pub fn render(&self, world: &dyn Hittable, rng: &mut dyn RngCore, out: &mut PixelBuffer) {
        let region = self.fit_buffer(out);

        let samples = self.samples_per_pixel.max(1);
        let scale = 1.0 / samples as f64;

        for row in 0..region.height {
            for col in 0..region.width {
                let (i, j) = (region.x + col, region.y + row);

                let mut pixel_color = Color::ZERO;
                for _ in 0..samples {
                    let ray = self.get_ray(i, j, rng);
                    pixel_color += ray_color(&ray, world, self.max_depth, rng);
                }

                out.set(col, row, color_to_rgba(pixel_color * scale));
            }
        }
    }

    /// Add one sample per pixel and write the running average into `out`.
    ///
    /// Repeated calls converge to the same image as `render` with that many
    /// samples per pixel.
    pub fn incremental_render(
        &mut self,
        world: &dyn Hittable,
        rng: &mut dyn RngCore,
        out: &mut PixelBuffer,
    ) {
        let region = self.fit_buffer(out);

        if self.accumulation.len() != region.pixel_count() {
            self.reset_accumulation();
        }
        self.sample_count += 1;
        let scale = 1.0 / self.sample_count as f64;

        for row in 0..region.height {
            for col in 0..region.width {
                let ray = self.get_ray(region.x + col, region.y + row, rng);
                let color = ray_color(&ray, world, self.max_depth, rng);

                let idx = (row * region.width + col) as usize;
                self.accumulation[idx] += color;
                out.set(col, row, color_to_rgba(self.accumulation[idx] * scale));
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::sky_gradient;
    use crate::{HittableList, InfinitePlane, Lambertian, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn looking_down_z(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_fov(90.0);
        camera.initialize();
        camera
    }

    fn single_sphere() -> HittableList {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Lambertian::new(Color::new(0.5, 0.5, 0.5)),
        )));
        world
    }

    #[test]
    fn test_camera_basis() {
        let mut camera = Camera::new()
            .with_position(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, Vec3::Y)
            .with_resolution(200, 100);
        camera.initialize();

        assert_eq!(camera.center, Vec3::new(0.0, 0.0, 2.0));
        assert!((camera.w - Vec3::Z).length() < 1e-12);
        assert!((camera.u - Vec3::X).length() < 1e-12);
        assert!((camera.v - Vec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_viewport_geometry() {
        // 90 degree fov at focal length 1: viewport is 2 high, 4 wide at 2:1
        let camera = looking_down_z(200, 100);

        assert!((camera.pixel_delta_u - Vec3::new(4.0 / 200.0, 0.0, 0.0)).length() < 1e-12);
        assert!((camera.pixel_delta_v - Vec3::new(0.0, -2.0 / 100.0, 0.0)).length() < 1e-12);

        let expected00 = Vec3::new(-2.0 + 0.01, 1.0 - 0.01, -1.0);
        assert!((camera.pixel00_loc - expected00).length() < 1e-12);
    }

    #[test]
    fn test_get_ray_jitter_stays_in_pixel() {
        let camera = looking_down_z(100, 100);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let ray = camera.get_ray(10, 20, &mut rng);
            let target = ray.at(1.0);
            let center = camera.pixel00_loc + 10.0 * camera.pixel_delta_u + 20.0 * camera.pixel_delta_v;

            assert_eq!(ray.origin(), Vec3::ZERO);
            assert!((target.x - center.x).abs() <= 0.5 * camera.pixel_delta_u.x + 1e-12);
            assert!((target.y - center.y).abs() <= 0.5 * camera.pixel_delta_v.y.abs() + 1e-12);
        }
    }

    #[test]
    fn test_sphere_end_to_end() {
        let world = single_sphere();
        let camera = looking_down_z(101, 101).with_quality(1, 1);
        let mut rng = StdRng::seed_from_u64(42);

        let mut image = camera.new_buffer();
        camera.render(&world, &mut rng, &mut image);

        let background = |i: u32, j: u32| {
            let center = camera.pixel00_loc
                + i as f64 * camera.pixel_delta_u
                + j as f64 * camera.pixel_delta_v;
            color_to_rgba(sky_gradient(&Ray::new(Vec3::ZERO, center)))
        };

        // Centre pixel hits the sphere; with one bounce allowed it is black
        let centre = image.get(50, 50);
        assert_ne!(centre, background(50, 50));
        assert_eq!(centre, [0, 0, 0, 255]);

        // Top-left corner sees only sky (jitter moves it by at most one level)
        let corner = image.get(0, 0);
        let expected = background(0, 0);
        for c in 0..3 {
            assert!(corner[c].abs_diff(expected[c]) <= 1, "{corner:?} vs {expected:?}");
        }
        assert_eq!(corner[3], 255);
    }

    #[test]
    fn test_region_render_matches_full_image() {
        // A tile renders the same pixels as the full image at those coordinates
        let world = HittableList::new();
        let full = looking_down_z(320, 160).with_quality(1, 1);
        let mut tile = full.clone().with_region(PixelRect::new(160, 80, 160, 80));
        tile.initialize();

        let mut full_image = full.new_buffer();
        full.render(&world, &mut StdRng::seed_from_u64(1), &mut full_image);
        let mut tile_image = tile.new_buffer();
        tile.render(&world, &mut StdRng::seed_from_u64(2), &mut tile_image);

        assert_eq!((tile_image.width, tile_image.height), (160, 80));
        for row in 0..80 {
            for col in 0..160 {
                let a = tile_image.get(col, row);
                let b = full_image.get(col + 160, row + 80);
                for c in 0..3 {
                    assert!(a[c].abs_diff(b[c]) <= 1);
                }
            }
        }
    }

    #[test]
    fn test_incremental_counts_and_resets() {
        let world = single_sphere();
        let mut camera = looking_down_z(8, 8);
        let mut rng = StdRng::seed_from_u64(5);
        let mut image = camera.new_buffer();

        for _ in 0..3 {
            camera.incremental_render(&world, &mut rng, &mut image);
        }
        assert_eq!(camera.sample_count(), 3);

        camera.reset_accumulation();
        assert_eq!(camera.sample_count(), 0);
        assert!(camera.accumulation.iter().all(|c| *c == Color::ZERO));

        camera.incremental_render(&world, &mut rng, &mut image);
        assert_eq!(camera.sample_count(), 1);
    }

    #[test]
    fn test_incremental_converges_to_batch() {
        let mut world = single_sphere();
        world.add(Box::new(InfinitePlane::new(
            -0.5,
            Lambertian::new(Color::new(0.8, 0.8, 0.0)),
        )));

        let k = 64;
        let batch = looking_down_z(12, 12).with_quality(k, 5);
        let mut batch_image = batch.new_buffer();
        batch.render(&world, &mut StdRng::seed_from_u64(100), &mut batch_image);

        let mut incremental = looking_down_z(12, 12).with_quality(1, 5);
        let mut incremental_image = incremental.new_buffer();
        let mut rng = StdRng::seed_from_u64(200);
        for _ in 0..k {
            incremental.incremental_render(&world, &mut rng, &mut incremental_image);
        }
        assert_eq!(incremental.sample_count(), k);

        let mean = |image: &PixelBuffer| {
            let bytes = image.as_bytes();
            let sum: u64 = bytes
                .chunks(4)
                .map(|px| px[0] as u64 + px[1] as u64 + px[2] as u64)
                .sum();
            sum as f64 / (bytes.len() / 4 * 3) as f64
        };

        let difference = (mean(&batch_image) - mean(&incremental_image)).abs();
        assert!(difference < 3.0, "mean channel values differ by {difference}");
    }

    #[test]
    fn test_mismatched_buffer_is_resized() {
        let world = single_sphere();
        let mut camera = looking_down_z(6, 4).with_quality(1, 2);
        let mut rng = StdRng::seed_from_u64(8);

        let mut image = PixelBuffer::new(2, 2);
        camera.render(&world, &mut rng, &mut image);
        assert_eq!((image.width, image.height), (6, 4));

        let mut image = PixelBuffer::new(100, 1);
        camera.incremental_render(&world, &mut rng, &mut image);
        assert_eq!((image.width, image.height), (6, 4));
        assert_eq!(camera.sample_count(), 1);
    }

    #[test]
    fn test_initialize_clears_accumulation() {
        let world = single_sphere();
        let mut camera = looking_down_z(4, 4);
        let mut image = camera.new_buffer();
        camera.incremental_render(&world, &mut StdRng::seed_from_u64(0), &mut image);

        let mut moved = camera.with_position(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        moved.initialize();
        assert_eq!(moved.sample_count(), 0);
    }
}
