#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("truncated codec payload: needed at least {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },
    #[error("destination buffer too small: needed {needed} bytes, got {got}")]
    DestinationTooSmall { needed: usize, got: usize },
    #[error("GLZ back-reference to image {image_id} outside the current window (head is {window_head})")]
    GlzWindowMiss { image_id: u64, window_head: u64 },
    #[error("malformed GLZ opcode stream")]
    MalformedGlzStream,
    #[error("JPEG decode failed: {0}")]
    Jpeg(String),
    #[error("unsupported pixel format {0}")]
    UnsupportedFormat(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("cache budget exceeded: {used} bytes used, {budget} budget, and no evictable entry remains")]
    CacheBudgetExceeded { used: u64, budget: u64 },
    #[error("cache was aborted")]
    CacheAborted,
    #[error("GLZ window budget exceeded despite eviction: {used} bytes used, {budget} budget")]
    GlzWindowBudgetExceeded { used: u64, budget: u64 },
}
