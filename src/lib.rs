use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

pub mod assign;
pub mod color;
pub mod cube;
pub mod distance;
pub mod driver;
pub mod error;
pub mod image_io;
pub mod pixels;

pub use assign::{pick, Assigner, Choice, PoolOrder, SubPool, WorkerOutput};
pub use color::{to_lab, to_xyz, LabColor, RgbColor, XyzColor};
pub use cube::{all_colors, ColorPool, CUBE_SIDE, CUBE_SIZE};
pub use distance::{cie76, cie94, rgb_sq, Distance, Metric, Target};
pub use driver::{partition_bounds, Driver, OutputBuffer, RemainderPolicy, RunOutput, RunStats};
pub use error::RemapError;
pub use image_io::SourceImage;
pub use pixels::{extract_rgb_image, extract_rgba, shuffle_pixels, PixelRecord};

#[derive(Debug, Clone)]
pub struct Config {
    /// Candidates examined per pixel.
    pub window: usize,
    pub metric: Metric,
    /// `None` draws a fresh seed from the OS; the seed used is always logged.
    pub seed: Option<u64>,
    pub num_threads: usize,
    pub remainder: RemainderPolicy,
    pub pool_order: PoolOrder,
    pub progress_every: usize,
}

pub fn default_config(fast: bool) -> Config {
    if fast {
        Config { window: 25, metric: Metric::Cie76, seed: None, num_threads: num_cpus::get().max(1), remainder: RemainderPolicy::LastWorker, pool_order: PoolOrder::Preserve, progress_every: 100_000 }
    } else {
        Config { window: 100, metric: Metric::Cie94, seed: None, num_threads: num_cpus::get().max(1), remainder: RemainderPolicy::LastWorker, pool_order: PoolOrder::Preserve, progress_every: 100_000 }
    }
}

impl Default for Config {
    fn default() -> Self {
        default_config(false)
    }
}

impl Config {
    pub fn driver(&self) -> Driver {
        Driver::new(self.num_threads, Assigner::new(self.window, self.pool_order, self.progress_every), self.remainder)
    }
}

#[derive(Debug, Clone)]
pub struct Params {
    pub in_image_name: String,
    pub out_image_name: String,
    /// Rescale the input to 4096x4096 when it does not already hold exactly
    /// one pixel per cube color.
    pub resize: bool,
    pub config: Config,
}

/// Shuffle `pixels` and `pool` with the configured seed and assign every
/// pixel one color from the pool.
pub fn remap(width: u32, height: u32, mut pixels: Vec<PixelRecord>, mut pool: ColorPool, config: &Config) -> error::Result<RunOutput> {
    let seed = config.seed.unwrap_or_else(rand::random);
    info!("Metric: {}, window: {}, threads: {}, seed: {}", config.metric, config.window, config.num_threads, seed);

    // pixels first, then colors, from one stream
    let mut rng = StdRng::seed_from_u64(seed);
    shuffle_pixels(&mut pixels, &mut rng);
    pool.shuffle(&mut rng);
    info!("Shuffled everything");

    let out = config.driver().run(width, height, &pixels, pool, &config.metric)?;
    info!(
        "Mean distance: {:.4} over {} pixels on {} workers in {:.2?}",
        out.stats.mean_distance(),
        out.stats.pixels,
        out.stats.workers,
        out.stats.elapsed
    );
    Ok(out)
}

/// Remap a decoded image onto the full RGB cube. The image must hold
/// exactly `CUBE_SIZE` pixels.
pub fn remap_source(src: &SourceImage, config: &Config) -> Result<RunOutput> {
    require_full_cube(src.pixel_count())?;
    let pixels = extract_rgba(src.width, src.height, &src.rgba)?;
    info!("Converted to points");
    let pool = ColorPool::full_cube();
    info!("Generated all colors");
    Ok(remap(src.width, src.height, pixels, pool, config)?)
}

fn require_full_cube(pixels: usize) -> error::Result<()> {
    if pixels != CUBE_SIZE {
        return Err(RemapError::NotFullCube { pixels });
    }
    Ok(())
}

/// Core algorithm operating on a provided image in memory and returning the output image buffer.
pub fn process_dynamic(dyn_img: &DynamicImage, config: Config) -> Result<RgbImage> {
    info!("Starting rgb_cube_remap in-memory: {}x{}", dyn_img.width(), dyn_img.height());
    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();
    require_full_cube(width as usize * height as usize)?;
    let pixels = extract_rgb_image(&rgb);
    drop(rgb);
    let out = remap(width, height, pixels, ColorPool::full_cube(), &config)?;
    Ok(out.buffer.to_rgb_image())
}

pub fn process(params: Params) -> Result<()> {
    let Params { in_image_name, out_image_name, resize, config } = params;
    info!("Input image: {}", in_image_name);
    info!("Output image: {}", out_image_name);
    let start = Instant::now();

    let mut img = image_io::open(&in_image_name)?;
    info!("Decoded image: {}x{}", img.width(), img.height());
    if resize && img.width() as usize * img.height() as usize != CUBE_SIZE {
        img = img.resize_exact(CUBE_SIDE, CUBE_SIDE, FilterType::Lanczos3);
        info!("Resized to {}x{}", CUBE_SIDE, CUBE_SIDE);
    }
    let src = SourceImage::from_dynamic(&img);
    drop(img);

    let out = remap_source(&src, &config).with_context(|| {
        if resize { format!("remapping {}", in_image_name) } else { format!("remapping {} (try --resize)", in_image_name) }
    })?;
    image_io::encode(&out_image_name, out.buffer.width(), out.buffer.height(), out.buffer.as_slice())?;
    info!("Encoded output in {:.2?}", start.elapsed());
    Ok(())
}
