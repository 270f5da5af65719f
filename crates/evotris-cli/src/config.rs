use std::{fs, path::Path};

use anyhow::Context;
use evotris_policy::policy::Topology;
use evotris_training::trainer::TrainerConfig;

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrainerOverrides {
    pub population_size: Option<usize>,
    pub top_k: Option<usize>,
    pub mutation_rate: Option<f32>,
    pub hidden: Option<usize>,
    pub max_ticks: Option<u64>,
    pub parallel: Option<bool>,
}

impl TrainerOverrides {
    fn apply(&self, config: &mut TrainerConfig) {
        if let Some(population_size) = self.population_size {
            config.population_size = population_size;
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(mutation_rate) = self.mutation_rate {
            config.mutation_rate = mutation_rate;
        }
        if let Some(hidden) = self.hidden {
            config.topology = Topology::for_board(config.board_size, hidden);
        }
        if self.max_ticks.is_some() {
            config.max_ticks = self.max_ticks;
        }
        if let Some(parallel) = self.parallel {
            config.parallel = parallel;
        }
    }
}

/// Builds the training configuration from defaults, an optional JSON file,
/// and command-line overrides, in that order.
pub fn load_trainer_config(
    path: Option<&Path>,
    overrides: &TrainerOverrides,
) -> anyhow::Result<TrainerConfig> {
    let mut config = match path {
        Some(path) => read_json_file("training config", path)?,
        None => TrainerConfig::default(),
    };
    overrides.apply(&mut config);
    config
        .validate()
        .context("Invalid training configuration")?;
    Ok(config)
}

fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", file_kind, path.display()))?;
    serde_json::from_str(&text).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })
}
