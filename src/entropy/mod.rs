//! Entropy calculation and chunked distribution analysis.
//!
//! - [`core`]: Shannon entropy, byte histograms and the chi-square divergence proxy
//! - [`window`]: fixed-window passes producing [`ChunkStats`]
//!
//! # Example
//!
//! ```
//! use stegscan::config::EntropyConfig;
//! use stegscan::entropy::{entropy_variance, shannon_entropy};
//!
//! let data = b"Hello, World!";
//! let h = shannon_entropy(data);
//! assert!(h > 0.0 && h <= 8.0);
//!
//! let cfg = EntropyConfig::default();
//! let (std_dev, high_ratio) = entropy_variance(data, &cfg.variance);
//! assert_eq!(std_dev, 0.0);
//! assert_eq!(high_ratio, 0.0);
//! ```

pub mod core;
pub mod window;

pub use self::core::{chi_square_divergence, shannon_entropy, Histogram};
pub use self::window::{analyze_chunks, entropy_variance, high_entropy_ratio, ChunkStats};
