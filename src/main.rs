// CLI entry for rgb_cube_remap
use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};
use rgb_cube_remap::{default_config, process, Config, Metric, Params, PoolOrder, RemainderPolicy};

#[derive(Parser, Debug)]
#[command(name = "rgb_cube_remap", version, about = "Repaint an image using every 24-bit color exactly once")]
struct Cli {
    /// Fast preset (small window, CIE76)
    #[arg(short = 'f', long = "fast", action = ArgAction::SetTrue)]
    fast: bool,

    /// Candidates examined per pixel
    #[arg(short = 'k', long = "window")]
    window: Option<usize>,
    /// Distance metric: rgb, cie76 or cie94
    #[arg(short = 'm', long = "metric")]
    metric: Option<Metric>,
    /// Seed for the pixel and color shuffles
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,
    /// Number of worker threads
    #[arg(long = "threads")]
    threads: Option<usize>,
    /// Leftover pixels when the count does not divide by threads: last-worker or strict
    #[arg(long = "remainder")]
    remainder: Option<RemainderPolicy>,
    /// Rejected candidates: preserve in place or rotate to the back
    #[arg(long = "pool-order")]
    pool_order: Option<PoolOrder>,
    /// Log progress every N pixels per worker (0 disables)
    #[arg(long = "progress-every")]
    progress_every: Option<usize>,

    /// Rescale the input to 4096x4096 first
    #[arg(long = "resize", action = ArgAction::SetTrue)]
    resize: bool,

    /// Input image path
    #[arg(value_hint = ValueHint::FilePath)]
    input: String,
    /// Output image path
    #[arg(value_hint = ValueHint::FilePath)]
    output: String,
}

fn build_config(cli: &Cli) -> Config {
    let mut cfg = default_config(cli.fast);
    if let Some(v) = cli.window { cfg.window = v; }
    if let Some(v) = cli.metric { cfg.metric = v; }
    if let Some(v) = cli.seed { cfg.seed = Some(v); }
    if let Some(v) = cli.threads { cfg.num_threads = v.max(1); }
    if let Some(v) = cli.remainder { cfg.remainder = v; }
    if let Some(v) = cli.pool_order { cfg.pool_order = v; }
    if let Some(v) = cli.progress_every { cfg.progress_every = v; }
    cfg
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let cfg = build_config(&cli);
    let params = Params {
        in_image_name: cli.input,
        out_image_name: cli.output,
        resize: cli.resize,
        config: cfg,
    };
    process(params)
}
