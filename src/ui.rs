// UI layer: an interactive menu and generation form built on `dialoguer`.
// The form collects a `GenerationRequest` and hands it to the API client;
// nothing here knows about HTTP.

use crate::api::ImageClient;
use crate::credential::CredentialStore;
use crate::models::{
    AspectRatio, Credential, GenerationOutcome, GenerationRequest, Mode, Model, OutputFormat,
};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main interactive menu. Runs until the user picks "Exit".
pub fn main_menu(api: &ImageClient, store: &CredentialStore) -> Result<()> {
    println!("{}", "SuperDuck3: Stability AI image generation".bold());
    loop {
        let items = ["Generate image", "Update API key", "Exit"];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                let credential = store.get(prompt_api_key)?;
                let req = generation_form()?;
                let outcome = run_with_spinner(api, &credential, &req)?;
                show_outcome(api, &outcome)?;
            }
            1 => {
                let token = prompt_api_key()?;
                store.set(&token)?;
                println!("API key saved to {}", store.path().display());
            }
            2 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Ask for the API key with hidden input.
pub fn prompt_api_key() -> Result<String> {
    let token: String = Password::new()
        .with_prompt("Stability API key")
        .interact()?;
    Ok(token.trim().to_string())
}

/// Pick one value from an enum's list, defaulting to `default`.
fn choose<T: Copy + PartialEq + Display>(prompt: &str, all: &[T], default: T) -> Result<T> {
    let start = all.iter().position(|v| *v == default).unwrap_or(0);
    let idx = Select::new()
        .with_prompt(prompt)
        .items(all)
        .default(start)
        .interact()?;
    Ok(all[idx])
}

/// Collect every field of the generation form.
pub fn generation_form() -> Result<GenerationRequest> {
    let prompt: String = Input::new().with_prompt("Prompt").interact_text()?;
    let aspect_ratio = choose("Aspect ratio", AspectRatio::ALL, AspectRatio::default())?;
    let mode = choose("Mode", Mode::ALL, Mode::default())?;
    let negative_prompt: String = Input::new()
        .with_prompt("Negative prompt")
        .allow_empty(true)
        .interact_text()?;
    let model = choose("Model", Model::ALL, Model::default())?;
    let seed: u32 = Input::new()
        .with_prompt("Seed")
        .default(0)
        .interact_text()?;
    let output_format = choose("Output format", OutputFormat::ALL, OutputFormat::default())?;

    Ok(GenerationRequest {
        prompt,
        aspect_ratio,
        mode,
        negative_prompt: Some(negative_prompt),
        model,
        seed: Some(seed),
        output_format,
    })
}

/// Run the blocking request while a spinner ticks.
pub fn run_with_spinner(
    api: &ImageClient,
    credential: &Credential,
    req: &GenerationRequest,
) -> Result<GenerationOutcome> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Generating...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = api.generate(credential, req);
    spinner.finish_and_clear();
    outcome
}

/// Print the result pane: an image path, the JSON document or the error.
pub fn print_outcome(outcome: &GenerationOutcome) -> Result<()> {
    match outcome {
        GenerationOutcome::Image(path) => {
            println!("{} {}", "Image saved:".green(), path.display());
        }
        GenerationOutcome::Json(value) => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        GenerationOutcome::Failure { status, .. } => {
            println!("{} ({})", outcome.to_string().red(), status);
        }
    }
    Ok(())
}

/// Print the result and offer to keep a copy of it.
fn show_outcome(api: &ImageClient, outcome: &GenerationOutcome) -> Result<()> {
    print_outcome(outcome)?;
    match outcome {
        GenerationOutcome::Image(path) => {
            if Confirm::new()
                .with_prompt("Save a copy elsewhere?")
                .default(false)
                .interact()?
            {
                let dest: String = Input::new().with_prompt("Destination path").interact_text()?;
                let dest = save_copy(path, Path::new(&dest))?;
                println!("Copied to {}", dest.display());
            }
        }
        GenerationOutcome::Json(value) => {
            if value.get("image").is_some()
                && Confirm::new()
                    .with_prompt("Decode the embedded image to a file?")
                    .default(true)
                    .interact()?
            {
                match api.save_embedded_image(value)? {
                    Some(path) => println!("{} {}", "Image saved:".green(), path.display()),
                    None => println!("No image found in the response."),
                }
            }
        }
        GenerationOutcome::Failure { .. } => {}
    }
    Ok(())
}

/// Copy a generated file to `dest`. When `dest` is a directory the
/// original file name is kept.
pub fn save_copy(src: &Path, dest: &Path) -> Result<PathBuf> {
    let target = match (dest.is_dir(), src.file_name()) {
        (true, Some(name)) => dest.join(name),
        _ => dest.to_path_buf(),
    };
    std::fs::copy(src, &target)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), target.display()))?;
    tracing::info!(from = %src.display(), to = %target.display(), "image copied");
    Ok(target)
}
