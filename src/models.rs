// Request and result types shared by the API client, the interactive form
// and the flag parser. Every enum knows its wire string so the same value
// can be shown in a menu, parsed from a flag and sent as a form field.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Bearer token for the image API. Stored verbatim, never validated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Keep the secret out of logs and panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Implements `as_str`, `ALL`, `Display` and `FromStr` from one table of
/// variant/wire-string pairs.
macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => anyhow::bail!("unknown {} `{}`", stringify!($name), other),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    #[value(name = "1:1")]
    Ratio1x1,
    #[serde(rename = "16:9")]
    #[value(name = "16:9")]
    Ratio16x9,
    #[serde(rename = "21:9")]
    #[value(name = "21:9")]
    Ratio21x9,
    #[serde(rename = "2:3")]
    #[value(name = "2:3")]
    Ratio2x3,
    #[serde(rename = "3:2")]
    #[value(name = "3:2")]
    Ratio3x2,
    #[serde(rename = "4:5")]
    #[value(name = "4:5")]
    Ratio4x5,
    #[serde(rename = "5:4")]
    #[value(name = "5:4")]
    Ratio5x4,
    #[serde(rename = "9:16")]
    #[value(name = "9:16")]
    Ratio9x16,
    #[serde(rename = "9:21")]
    #[value(name = "9:21")]
    Ratio9x21,
}

wire_enum!(AspectRatio {
    Ratio1x1 => "1:1",
    Ratio16x9 => "16:9",
    Ratio21x9 => "21:9",
    Ratio2x3 => "2:3",
    Ratio3x2 => "3:2",
    Ratio4x5 => "4:5",
    Ratio5x4 => "5:4",
    Ratio9x16 => "9:16",
    Ratio9x21 => "9:21",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    TextToImage,
}

wire_enum!(Mode {
    TextToImage => "text-to-image",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Model {
    #[default]
    Sd3,
    Sd3Turbo,
}

wire_enum!(Model {
    Sd3 => "sd3",
    Sd3Turbo => "sd3-turbo",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Json,
}

wire_enum!(OutputFormat {
    Png => "png",
    Jpeg => "jpeg",
    Json => "json",
});

impl OutputFormat {
    /// Value for the `accept` header.
    pub fn accept(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Png | OutputFormat::Jpeg => "image/*",
        }
    }

    /// File extension for image output. `json` has none of its own.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Png => Some("png"),
            OutputFormat::Jpeg => Some("jpeg"),
            OutputFormat::Json => None,
        }
    }
}

/// One submission of the generation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub mode: Mode,
    pub negative_prompt: Option<String>,
    pub model: Model,
    pub seed: Option<u32>,
    pub output_format: OutputFormat,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        GenerationRequest {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
            mode: Mode::default(),
            negative_prompt: Some(String::new()),
            model: Model::default(),
            seed: Some(0),
            output_format: OutputFormat::default(),
        }
    }

    /// Form fields in wire order. Absent values are dropped; an empty
    /// negative prompt is kept as an explicit empty field.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let fields = [
            ("prompt", Some(self.prompt.clone())),
            ("aspect_ratio", Some(self.aspect_ratio.to_string())),
            ("mode", Some(self.mode.to_string())),
            ("negative_prompt", self.negative_prompt.clone()),
            ("model", Some(self.model.to_string())),
            ("seed", self.seed.map(|s| s.to_string())),
            ("output_format", Some(self.output_format.to_string())),
        ];
        fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}

/// What a finished request produced. API-level failures are a variant
/// here, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Image(PathBuf),
    Json(serde_json::Value),
    Failure {
        status: u16,
        body: serde_json::Value,
    },
}

impl GenerationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, GenerationOutcome::Failure { .. })
    }
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationOutcome::Image(path) => write!(f, "{}", path.display()),
            GenerationOutcome::Json(value) => write!(f, "{}", value),
            GenerationOutcome::Failure { body, .. } => write!(f, "Error: {}", body),
        }
    }
}

/// Body of a successful `application/json` response: the image travels
/// base64-encoded next to the seed that produced it.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct JsonArtifact {
    pub image: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_parse_back() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.as_str().parse::<AspectRatio>().unwrap(), *ratio);
        }
        assert_eq!(AspectRatio::ALL.len(), 9);
        assert_eq!("sd3-turbo".parse::<Model>().unwrap(), Model::Sd3Turbo);
        assert_eq!(Mode::TextToImage.to_string(), "text-to-image");
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&AspectRatio::Ratio9x21).unwrap();
        assert_eq!(json, "\"9:21\"");
        let model: Model = serde_json::from_str("\"sd3-turbo\"").unwrap();
        assert_eq!(model, Model::Sd3Turbo);
    }

    #[test]
    fn accept_header_follows_format() {
        assert_eq!(OutputFormat::Png.accept(), "image/*");
        assert_eq!(OutputFormat::Jpeg.accept(), "image/*");
        assert_eq!(OutputFormat::Json.accept(), "application/json");
        assert_eq!(OutputFormat::Jpeg.extension(), Some("jpeg"));
    }

    #[test]
    fn fields_keep_empty_negative_prompt() {
        let req = GenerationRequest::new("a duck");
        let fields = req.fields();
        let names: Vec<&str> = fields.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            [
                "prompt",
                "aspect_ratio",
                "mode",
                "negative_prompt",
                "model",
                "seed",
                "output_format"
            ]
        );
        assert!(fields.contains(&("negative_prompt", String::new())));
        assert!(fields.contains(&("seed", "0".to_string())));
    }

    #[test]
    fn fields_drop_absent_values() {
        let mut req = GenerationRequest::new("a duck");
        req.negative_prompt = None;
        req.seed = None;
        let fields = req.fields();
        assert_eq!(fields.len(), 5);
        assert!(fields.iter().all(|(n, _)| *n != "seed" && *n != "negative_prompt"));
    }

    #[test]
    fn failure_display_embeds_body() {
        let outcome = GenerationOutcome::Failure {
            status: 403,
            body: serde_json::json!({"error": "bad key"}),
        };
        assert!(outcome.is_failure());
        assert!(outcome.to_string().contains("bad key"));
    }

    #[test]
    fn credential_debug_hides_token() {
        let cred = Credential::new("sk-secret");
        assert!(!format!("{:?}", cred).contains("secret"));
        assert_eq!(cred.bearer(), "Bearer sk-secret");
    }
}
