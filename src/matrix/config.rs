//! Configuration for the compression pipeline

/// System parameters for performance tuning
#[derive(Debug, Clone)]
pub struct SystemParameters {
    /// Number of worker threads for the data-parallel phases
    pub n_threads: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(), // Use all available cores
        }
    }
}

/// Configuration for pattern discovery and selection
///
/// `lambda` weights the sharing benefit of a pattern against its storage
/// overhead: higher values favor compression even for patterns shared by
/// few rows. `n_tries` bounds the number of independently built candidate
/// tries; trie `i` indexes every row with its last `i` symbols dropped,
/// so additional tries discover shared segments ending before the row
/// tail.
#[derive(Debug, Clone)]
pub struct CompressionConfig {
    /// Scoring weight for pattern sharing (the `l` parameter)
    pub lambda: usize,

    /// Number of candidate suffix tries to build (the `m` parameter)
    pub n_tries: usize,

    /// Upper bound on the number of selected patterns
    /// If None, selection stops only when no candidate scores positive
    pub max_patterns: Option<usize>,

    /// System parameters for performance tuning
    pub system_params: SystemParameters,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            lambda: 2,
            n_tries: 10,
            max_patterns: None,
            system_params: SystemParameters::default(),
        }
    }
}

impl CompressionConfig {
    /// Create a config with the two tuning parameters of the scoring
    /// objective, leaving everything else at its default
    pub fn new(lambda: usize, n_tries: usize) -> Self {
        Self {
            lambda,
            n_tries,
            ..Self::default()
        }
    }
}
