use crate::tokenizer::{Stemming, TextPipeline};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Byte budget for result snippets before the `...` marker.
    pub snippet_bytes: usize,
    pub default_max_results: usize,
    pub stemming: Stemming,
    /// NFKC-fold text before preprocessing.
    pub fold_compatibility: bool,
    pub extra_stop_words: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snippet_bytes: 180,
            default_max_results: 10,
            stemming: Stemming::None,
            fold_compatibility: false,
            extra_stop_words: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut f = File::open(path)?;
        let mut buf = String::new();
        f.read_to_string(&mut buf)?;
        let config: EngineConfig = serde_json::from_str(&buf)?;
        Ok(config)
    }

    pub fn pipeline(&self) -> TextPipeline {
        let mut pipeline = TextPipeline::new()
            .with_stemming(self.stemming)
            .with_compatibility_folding(self.fold_compatibility);
        if !self.extra_stop_words.is_empty() {
            pipeline.load_stop_words(&self.extra_stop_words.join("\n"));
        }
        pipeline
    }
}
