use bible_index_core::config::AppConfig;
use bible_index_core::IndexSchema;

/// Command-line values that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_dir: Option<String>,
    pub output: Option<String>,
    pub schema: Option<IndexSchema>,
}

impl Overrides {
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(base) = &self.base_dir {
            cfg.base_dir = base.clone();
        }
        if let Some(output) = &self.output {
            cfg.output_path = output.clone();
        }
        if let Some(schema) = self.schema {
            cfg.schema = schema;
        }
    }
}
