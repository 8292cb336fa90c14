// Command-line flags. Without `--prompt` the binary opens the interactive
// menu; with it, one request is sent using the flag values.

use crate::api::ImageClient;
use crate::credential::CredentialStore;
use crate::models::{AspectRatio, GenerationOutcome, GenerationRequest, Mode, Model, OutputFormat};
use crate::ui;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "superduck3", about = "Generate images with the Stability AI SD3 API")]
pub struct Args {
    /// Text prompt. Runs a single request instead of the menu.
    #[arg(long)]
    pub prompt: Option<String>,

    #[arg(long, value_enum, default_value_t = AspectRatio::Ratio1x1)]
    pub aspect_ratio: AspectRatio,

    #[arg(long, value_enum, default_value_t = Mode::TextToImage)]
    pub mode: Mode,

    /// Sent as an empty field when not given.
    #[arg(long)]
    pub negative_prompt: Option<String>,

    #[arg(long, value_enum, default_value_t = Model::Sd3)]
    pub model: Model,

    #[arg(long, default_value_t = 0)]
    pub seed: u32,

    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    pub output_format: OutputFormat,

    /// Store this API key before running.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Copy the generated image here (file or directory).
    #[arg(long)]
    pub save_to: Option<PathBuf>,
}

impl Args {
    /// The request described by the flags, if `--prompt` was given.
    pub fn request(&self) -> Option<GenerationRequest> {
        let prompt = self.prompt.clone()?;
        Some(GenerationRequest {
            prompt,
            aspect_ratio: self.aspect_ratio,
            mode: self.mode,
            negative_prompt: Some(self.negative_prompt.clone().unwrap_or_default()),
            model: self.model,
            seed: Some(self.seed),
            output_format: self.output_format,
        })
    }
}

/// Send the single request described by `args` and print the result.
/// Returns the outcome so the caller can pick an exit code.
pub fn run_once(
    args: &Args,
    req: &GenerationRequest,
    api: &ImageClient,
    store: &CredentialStore,
) -> Result<GenerationOutcome> {
    let credential = match &args.api_key {
        Some(key) => store.set(key)?,
        None => store.get(ui::prompt_api_key)?,
    };
    let outcome = ui::run_with_spinner(api, &credential, req)?;
    ui::print_outcome(&outcome)?;

    if let Some(dest) = &args.save_to {
        let saved = match &outcome {
            GenerationOutcome::Image(path) => Some(ui::save_copy(path, dest)?),
            GenerationOutcome::Json(value) => match api.save_embedded_image(value)? {
                Some(path) => Some(ui::save_copy(&path, dest)?),
                None => None,
            },
            GenerationOutcome::Failure { .. } => None,
        };
        if let Some(path) = saved {
            println!("Copied to {}", path.display());
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form_defaults() {
        let args = Args::parse_from(["superduck3", "--prompt", "a duck"]);
        assert_eq!(args.request(), Some(GenerationRequest::new("a duck")));
    }

    #[test]
    fn wire_values_are_accepted() {
        let args = Args::parse_from([
            "superduck3",
            "--prompt",
            "a duck",
            "--aspect-ratio",
            "9:21",
            "--model",
            "sd3-turbo",
            "--output-format",
            "json",
            "--seed",
            "7",
        ]);
        let req = args.request().unwrap();
        assert_eq!(req.aspect_ratio, AspectRatio::Ratio9x21);
        assert_eq!(req.model, Model::Sd3Turbo);
        assert_eq!(req.output_format, OutputFormat::Json);
        assert_eq!(req.seed, Some(7));
    }

    #[test]
    fn no_prompt_means_interactive() {
        let args = Args::parse_from(["superduck3"]);
        assert!(args.request().is_none());
    }

    #[test]
    fn unknown_ratio_is_rejected() {
        let parsed = Args::try_parse_from(["superduck3", "--aspect-ratio", "7:3"]);
        assert!(parsed.is_err());
    }
}
