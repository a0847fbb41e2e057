/// Configuration for STL to vertex conversion.
///
/// # Usage
///
/// ```rust
/// use stlvertex::config::Config;
/// // Defaults: `.vertex` output, 64 KiB buffers, parallel across files
/// let config = Config::default();
///
/// // Full control via builder
/// let config = Config::builder()
///     .extension("vtx")
///     .parallel(false)
///     .strict(true)
///     .build();
/// assert_eq!(config.extension, "vtx");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // ─────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────
    /// Extension given to the output file (default: "vertex")
    pub extension: String,

    // ─────────────────────────────────────────────────────────────
    // I/O
    // ─────────────────────────────────────────────────────────────
    /// Reader and writer buffer size in bytes (default: 64 KiB)
    pub buffer_capacity: usize,
    /// Convert multiple files on the rayon pool (default: true, native only)
    pub parallel: bool,

    // ─────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────
    /// Reject sources shorter than the declared triangle count allows
    /// before creating the destination (default: false)
    pub strict: bool,
}

// ═══════════════════════════════════════════════════════════════════
// Default values as constants for easy reference
// ═══════════════════════════════════════════════════════════════════

impl Config {
    pub const DEFAULT_EXTENSION: &'static str = "vertex";
    pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;
    pub const DEFAULT_PARALLEL: bool = true;
    pub const DEFAULT_STRICT: bool = false;
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: Self::DEFAULT_EXTENSION.to_string(),
            buffer_capacity: Self::DEFAULT_BUFFER_CAPACITY,
            parallel: Self::DEFAULT_PARALLEL,
            strict: Self::DEFAULT_STRICT,
        }
    }
}

impl Config {
    /// Start building a config with the builder pattern
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Buffer size actually handed to `BufReader`/`BufWriter` (never zero)
    #[inline]
    pub fn effective_buffer_capacity(&self) -> usize {
        self.buffer_capacity.max(1)
    }
}

// ═══════════════════════════════════════════════════════════════════
// Builder Pattern
// ═══════════════════════════════════════════════════════════════════

/// Fluent builder for `Config`
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder(Config);

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extension(mut self, value: impl Into<String>) -> Self {
        self.0.extension = value.into();
        self
    }

    pub fn buffer_capacity(mut self, value: usize) -> Self {
        self.0.buffer_capacity = value;
        self
    }

    pub fn parallel(mut self, value: bool) -> Self {
        self.0.parallel = value;
        self
    }

    pub fn strict(mut self, value: bool) -> Self {
        self.0.strict = value;
        self
    }

    /// Consume the builder and return the configured `Config`
    pub fn build(self) -> Config {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extension, "vertex");
        assert_eq!(config.buffer_capacity, 64 * 1024);
        assert!(config.parallel);
        assert!(!config.strict);
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .extension("vtx")
            .buffer_capacity(128)
            .parallel(false)
            .strict(true)
            .build();

        assert_eq!(config.extension, "vtx");
        assert_eq!(config.buffer_capacity, 128);
        assert!(!config.parallel);
        assert!(config.strict);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let config = Config::builder().buffer_capacity(0).build();
        assert_eq!(config.effective_buffer_capacity(), 1);
    }
}
