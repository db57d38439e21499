pub mod assist;
pub mod search;

use anyhow::Result;
use slack_triage::config::{self, AppConfig};
use slack_triage::prompts::{self, PromptSet};
use std::path::PathBuf;

/// Flags shared by every subcommand.
pub struct GlobalOpts {
    pub config: Option<String>,
    pub prompts: Option<String>,
}

impl GlobalOpts {
    pub fn load_config(&self) -> Result<AppConfig> {
        let path = self
            .config
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(config::default_config_path);
        Ok(AppConfig::load(&path)?)
    }

    pub fn load_prompts(&self) -> PromptSet {
        let dir = self
            .prompts
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(prompts::default_prompt_dir);
        PromptSet::load(&dir)
    }
}
