use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemapError {
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("candidate window must examine at least one color")]
    EmptyWindow,
    #[error("image is {width}x{height} but {pixels} pixel records were supplied")]
    DimensionMismatch { width: u32, height: u32, pixels: usize },
    #[error("color pool holds {colors} colors but there are {pixels} pixels")]
    PoolSizeMismatch { pixels: usize, colors: usize },
    #[error("{pixels} pixels do not split evenly across {workers} workers")]
    IndivisiblePartition { pixels: usize, workers: usize },
    #[error("pixel ({x}, {y}) lies outside a {width}x{height} image")]
    PixelOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
    #[error("expected {expected} bytes of RGBA data, got {actual}")]
    BufferLength { expected: usize, actual: usize },
    #[error("image has {pixels} pixels; the full RGB cube needs exactly 16777216 (e.g. 4096x4096)")]
    NotFullCube { pixels: usize },
    #[error("worker {worker} ran out of colors at pixel {pixel} of its batch")]
    PoolExhausted { worker: usize, pixel: usize },
    #[error("worker {worker} finished with {left} unused colors")]
    PoolNotDrained { worker: usize, left: usize },
    #[error("output slot {index} was written more than once")]
    SlotWrittenTwice { index: usize },
    #[error("output slot {index} was never written")]
    SlotUnfilled { index: usize },
    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
    #[error("unknown distance metric: {0}")]
    UnknownMetric(String),
    #[error("unknown pool order: {0}")]
    UnknownPoolOrder(String),
    #[error("unknown remainder policy: {0}")]
    UnknownRemainderPolicy(String),
}

pub type Result<T> = std::result::Result<T, RemapError>;
