//! Summary statistics for fitness values produced during training.
//!
//! # Examples
//!
//! ```
//! use evotris_stats::descriptive::DescriptiveStats;
//!
//! let scores = [0.0, 100.0, 300.0, 100.0];
//! let stats = DescriptiveStats::new(scores).unwrap();
//! assert_eq!(stats.count, 4);
//! assert_eq!(stats.max, 300.0);
//! assert_eq!(stats.mean, 125.0);
//! assert_eq!(stats.median, 100.0);
//! ```

pub mod descriptive;
