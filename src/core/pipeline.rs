//! Stage orchestration over every configured design dir

use crate::core::artifacts::{write_artifacts, Artifacts};
use crate::core::cli::Command;
use crate::core::config_file::ConfigFile;
use crate::design::{
    classify_design_files, collect_available_design, verify_design_files, ClassifyOutcome,
    DesignContext, VerifyOutcome,
};
use anyhow::{Context, Result};
use tracing::info;

/// Runs pipeline stages for one loaded configuration
pub struct Pipeline<'a> {
    config: &'a ConfigFile,
    ctx: &'a DesignContext,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ConfigFile, ctx: &'a DesignContext) -> Self {
        Self { config, ctx }
    }

    /// Run `command` for every size in order, stopping at the first failure
    pub fn run(&self, command: &Command, sizes: &[u32]) -> Result<()> {
        for &px in sizes {
            match command {
                Command::Classify(_) => self.classify(px)?,
                Command::Verify(_) => self.verify(px)?,
                Command::Collect(_) => {
                    self.collect(px)?;
                }
                Command::Build(_) => {
                    self.classify(px)?;
                    self.verify(px)?;
                    self.collect(px)?;
                }
            }
        }
        Ok(())
    }

    pub fn classify(&self, px: u32) -> Result<()> {
        let mut total = 0;
        for design_dir in &self.config.design_dirs {
            let outcome = classify_design_files(design_dir, px, self.ctx).with_context(|| {
                format!("Failed to classify {}px designs in {}", px, design_dir.display())
            })?;
            if let ClassifyOutcome::Classified { files } = outcome {
                total += files;
            }
        }
        info!("Classified {} design files at {}px", total, px);
        Ok(())
    }

    pub fn verify(&self, px: u32) -> Result<()> {
        let mut total = 0;
        for design_dir in &self.config.design_dirs {
            let outcome = verify_design_files(design_dir, px, self.ctx).with_context(|| {
                format!("Failed to verify {}px designs in {}", px, design_dir.display())
            })?;
            if let VerifyOutcome::Verified { files } = outcome {
                total += files;
            }
        }
        info!("Verified {} design files at {}px", total, px);
        Ok(())
    }

    pub fn collect(&self, px: u32) -> Result<Artifacts> {
        let collected = collect_available_design(&self.config.design_dirs, px, self.ctx)
            .with_context(|| format!("Failed to collect {}px designs", px))?;
        let artifacts = write_artifacts(&self.config.outputs_dir, px, &collected)?;
        info!(
            "Collected {} characters at {}px into {}",
            collected.alphabet.len(),
            px,
            artifacts.design_map.display()
        );
        Ok(artifacts)
    }
}
