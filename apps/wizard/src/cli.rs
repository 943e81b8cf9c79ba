use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Config;
use crate::input::TextSubmission;
use crate::models::template::TEMPLATES;
use crate::models::CandidateFile;
use crate::state::WizardServices;
use crate::validation::{validate_job_url, FileValidator, LopdfPageCounter};
use crate::wizard::Wizard;

/// Checks and uploads résumé material the way the wizard's upload step does.
#[derive(Debug, Parser)]
#[clap(name = "resume-wizard", version, about = "Validate and upload résumé files")]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the file-set rules against local files
    Validate {
        #[clap(required = true)]
        files: Vec<PathBuf>,
    },
    /// Validate and upload local files, or pasted text read from a file
    Upload {
        #[clap(required_unless_present = "text_file", conflicts_with = "text_file")]
        files: Vec<PathBuf>,
        /// Upload the file's contents as pasted résumé text
        #[clap(long)]
        text_file: Option<PathBuf>,
    },
    /// Check a job posting URL and fetch its details
    JobUrl { url: String },
    /// List the available résumé templates
    Templates,
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Validate { files } => {
            let files = load_files(&files).await?;
            let validator =
                FileValidator::new(config.limits.clone(), Arc::new(LopdfPageCounter));
            let result = validator.validate(&files).await;
            if let Some(reason) = result.reason {
                bail!(reason);
            }
            println!("OK: {} file(s) pass validation", files.len());
        }
        Commands::Upload { files, text_file } => {
            let services = WizardServices::from_config(&config)?;
            let mut wizard = Wizard::new(services);

            match text_file {
                Some(path) => {
                    let text = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("reading {}", path.display()))?;
                    match wizard.submit_resume_text(&text) {
                        TextSubmission::Committed(_) => {}
                        TextSubmission::Blank => bail!("{} is empty", path.display()),
                        TextSubmission::TooLong { max, actual } => {
                            bail!("Text is {actual} characters; the limit is {max}")
                        }
                        TextSubmission::AttachmentPresent => {
                            bail!("Résumé files are already selected")
                        }
                    }
                }
                None => {
                    wizard.add_resume_files(load_files(&files).await?).await?;
                }
            }

            let response = wizard.upload_resume().await?;
            info!(file_id = response.file_id.as_deref().unwrap_or("-"), "Uploaded");
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::JobUrl { url } => {
            let url = validate_job_url(&url)?;
            let services = WizardServices::from_config(&config)?;
            let details = services.job_fetcher.fetch_job_details(url.as_str()).await?;
            println!("{details}");
        }
        Commands::Templates => {
            for template in TEMPLATES {
                println!("{:<14} {:<14} {}", template.id, template.name, template.description);
            }
        }
    }
    Ok(())
}

async fn load_files(paths: &[PathBuf]) -> Result<Vec<CandidateFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(load_file(path).await?);
    }
    Ok(files)
}

async fn load_file(path: &Path) -> Result<CandidateFile> {
    CandidateFile::from_path(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}
