//! Image generation parameters and generated images

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Largest file accepted on the local upload path (1.5 MiB)
pub const MAX_LOCAL_IMAGE_SIZE: usize = 1_572_864;

/// Content types accepted on the local upload path
pub const ALLOWED_LOCAL_IMAGE_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

/// Square output sizes offered by the generation backend
pub const STANDARD_DIMENSIONS: [Dimensions; 3] = [
    Dimensions::square(512),
    Dimensions::square(768),
    Dimensions::square(1024),
];

/// Text-to-image engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Stable Diffusion 1.6
    Sd16,
    /// Stable Diffusion XL, fixed 1024x1024 output
    Sdxl,
    /// Stable Image Core
    Core,
    /// Stable Image Ultra
    Ultra,
}

impl Engine {
    /// Path segment of the generation endpoint for this engine
    pub fn endpoint(&self) -> String {
        format!("generate-image-{}", self)
    }

    /// Dimensions this engine accepts
    pub fn allowed_dimensions(&self) -> &'static [Dimensions] {
        match self {
            Engine::Sdxl => &STANDARD_DIMENSIONS[2..],
            Engine::Sd16 | Engine::Core | Engine::Ultra => &STANDARD_DIMENSIONS,
        }
    }

    /// Dimensions picked when the caller did not choose any
    ///
    /// Only engines with a single allowed size have a default.
    pub fn forced_dimensions(&self) -> Option<Dimensions> {
        match self.allowed_dimensions() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Check the engine/dimension pairing against the rule table
    pub fn validate_dimensions(&self, dimensions: Dimensions) -> Result<(), Error> {
        if self.allowed_dimensions().contains(&dimensions) {
            Ok(())
        } else {
            Err(Error::ValidationFailed(format!(
                "Engine {} does not support {} output",
                self, dimensions
            )))
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Sd16 => write!(f, "sd16"),
            Engine::Sdxl => write!(f, "sdxl"),
            Engine::Core => write!(f, "core"),
            Engine::Ultra => write!(f, "ultra"),
        }
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sd16" => Ok(Self::Sd16),
            "sdxl" => Ok(Self::Sdxl),
            "core" => Ok(Self::Core),
            "ultra" => Ok(Self::Ultra),
            _ => Err(Error::ValidationFailed(format!("Unknown engine: {}", s))),
        }
    }
}

/// Output size of a generated image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Dimensions {
    /// Square dimensions
    pub const fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::ValidationFailed(format!("Invalid dimensions: {}", s));
        let (height, width) = s.split_once('x').ok_or_else(invalid)?;
        Ok(Self {
            height: height.trim().parse().map_err(|_| invalid())?,
            width: width.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Style preset forwarded to the generation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylePreset {
    /// enhance
    Enhance,
    /// anime
    Anime,
    /// photographic
    Photographic,
    /// digital-art
    DigitalArt,
    /// comic-book
    ComicBook,
    /// fantasy-art
    FantasyArt,
    /// line-art
    LineArt,
    /// analog-film
    AnalogFilm,
    /// neon-punk
    NeonPunk,
    /// isometric
    Isometric,
    /// low-poly
    LowPoly,
    /// origami
    Origami,
    /// cinematic
    Cinematic,
    /// 3d-model
    #[serde(rename = "3d-model")]
    ThreeDModel,
    /// pixel-art
    PixelArt,
}

impl StylePreset {
    /// Every preset, in menu order
    pub const ALL: [StylePreset; 15] = [
        StylePreset::Enhance,
        StylePreset::Anime,
        StylePreset::Photographic,
        StylePreset::DigitalArt,
        StylePreset::ComicBook,
        StylePreset::FantasyArt,
        StylePreset::LineArt,
        StylePreset::AnalogFilm,
        StylePreset::NeonPunk,
        StylePreset::Isometric,
        StylePreset::LowPoly,
        StylePreset::Origami,
        StylePreset::Cinematic,
        StylePreset::ThreeDModel,
        StylePreset::PixelArt,
    ];

    /// Wire name of the preset
    pub fn as_str(&self) -> &'static str {
        match self {
            StylePreset::Enhance => "enhance",
            StylePreset::Anime => "anime",
            StylePreset::Photographic => "photographic",
            StylePreset::DigitalArt => "digital-art",
            StylePreset::ComicBook => "comic-book",
            StylePreset::FantasyArt => "fantasy-art",
            StylePreset::LineArt => "line-art",
            StylePreset::AnalogFilm => "analog-film",
            StylePreset::NeonPunk => "neon-punk",
            StylePreset::Isometric => "isometric",
            StylePreset::LowPoly => "low-poly",
            StylePreset::Origami => "origami",
            StylePreset::Cinematic => "cinematic",
            StylePreset::ThreeDModel => "3d-model",
            StylePreset::PixelArt => "pixel-art",
        }
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StylePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == wanted)
            .ok_or_else(|| Error::ValidationFailed(format!("Unknown style preset: {}", s)))
    }
}

/// Parameters of one generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Engine
    pub engine: Engine,
    /// Output size
    pub dimensions: Dimensions,
    /// Optional style preset
    pub style_preset: Option<StylePreset>,
}

impl GenerationParams {
    /// Create parameters, checking the engine/dimension rule
    pub fn new(
        engine: Engine,
        dimensions: Dimensions,
        style_preset: Option<StylePreset>,
    ) -> Result<Self, Error> {
        engine.validate_dimensions(dimensions)?;
        Ok(Self {
            engine,
            dimensions,
            style_preset,
        })
    }
}

/// Where the current image came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ImageSource {
    /// Produced by the generation backend
    Generated {
        /// Cleaned prompt that was sent
        prompt: String,
        /// Generation parameters
        params: GenerationParams,
    },
    /// Picked from local disk
    Local {
        /// Original file name
        file_name: String,
    },
}

/// Image currently displayed by a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Identity of this image, fresh for every generation
    pub id: Uuid,
    /// `data:` URL or remote URL of the image
    pub url: String,
    /// Origin
    pub source: ImageSource,
}

impl GeneratedImage {
    /// Image returned by the generation backend
    pub fn generated(
        url: impl Into<String>,
        prompt: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            source: ImageSource::Generated {
                prompt: prompt.into(),
                params,
            },
        }
    }

    /// Image picked from disk
    pub fn local(image: &LocalImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: image.to_data_url(),
            source: ImageSource::Local {
                file_name: image.file_name.clone(),
            },
        }
    }

    /// Whether the image is embedded in a `data:` URL
    pub fn is_data_url(&self) -> bool {
        self.url.starts_with("data:")
    }

    /// MIME type declared by the `data:` URL, if any
    pub fn mime(&self) -> Option<&str> {
        let rest = self.url.strip_prefix("data:")?;
        let (header, _) = rest.split_once(',')?;
        header.split(';').next().filter(|m| !m.is_empty())
    }

    /// Decode the bytes embedded in a `data:` URL
    ///
    /// Returns `Ok(None)` for remote URLs.
    pub fn bytes(&self) -> Result<Option<Vec<u8>>, Error> {
        let Some(rest) = self.url.strip_prefix("data:") else {
            return Ok(None);
        };
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::ValidationFailed("Malformed data URL".to_string()))?;

        if !header.ends_with(";base64") {
            return Err(Error::ValidationFailed(
                "Only base64 data URLs are supported".to_string(),
            ));
        }

        STANDARD
            .decode(payload.trim())
            .map(Some)
            .map_err(|e| Error::ValidationFailed(format!("Invalid base64 image data: {}", e)))
    }

    /// File name used when uploading the image
    pub fn file_name(&self) -> String {
        match &self.source {
            ImageSource::Local { file_name } => file_name.clone(),
            ImageSource::Generated { .. } => {
                let extension = match self.mime() {
                    Some("image/webp") => "webp",
                    Some("image/jpeg") | Some("image/jpg") => "jpg",
                    _ => "png",
                };
                format!("generated_image.{}", extension)
            }
        }
    }
}

/// Image file supplied by the user instead of a generated one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    /// Original file name
    pub file_name: String,
    /// Declared content type
    pub content_type: String,
    /// File content
    pub bytes: Vec<u8>,
}

impl LocalImage {
    /// Validate and wrap a local file
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, Error> {
        let content_type = content_type.into();

        if bytes.len() > MAX_LOCAL_IMAGE_SIZE {
            return Err(Error::ValidationFailed(
                "File size exceeds 1.5MB limit.".to_string(),
            ));
        }

        if !ALLOWED_LOCAL_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(Error::ValidationFailed(format!(
                "Unsupported file type {}. Please select a PNG or JPG file.",
                content_type
            )));
        }

        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    /// Guess the content type from a file extension
    pub fn content_type_for(file_name: &str) -> Option<&'static str> {
        let extension = file_name.rsplit_once('.')?.1.to_lowercase();
        match extension.as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            _ => None,
        }
    }

    /// Encode as a base64 `data:` URL
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdxl_forces_1024() {
        assert_eq!(Engine::Sdxl.forced_dimensions(), Some(Dimensions::square(1024)));
        assert!(Engine::Sdxl.validate_dimensions(Dimensions::square(512)).is_err());
        assert!(Engine::Sdxl.validate_dimensions(Dimensions::square(1024)).is_ok());
    }

    #[test]
    fn test_other_engines_accept_standard_sizes() {
        for engine in [Engine::Sd16, Engine::Core, Engine::Ultra] {
            assert_eq!(engine.forced_dimensions(), None);
            for dims in STANDARD_DIMENSIONS {
                assert!(engine.validate_dimensions(dims).is_ok());
            }
            assert!(engine.validate_dimensions(Dimensions::square(640)).is_err());
        }
    }

    #[test]
    fn test_engine_endpoint_and_parse() {
        assert_eq!(Engine::Sd16.endpoint(), "generate-image-sd16");
        assert_eq!(Engine::from_str("SDXL").ok(), Some(Engine::Sdxl));
        assert!(Engine::from_str("dalle").is_err());
    }

    #[test]
    fn test_dimensions_parse() {
        let dims = Dimensions::from_str("768x768").expect("valid");
        assert_eq!(dims, Dimensions::square(768));
        assert_eq!(dims.to_string(), "768x768");
        assert!(Dimensions::from_str("768").is_err());
        assert!(Dimensions::from_str("axb").is_err());
    }

    #[test]
    fn test_style_preset_names() {
        assert_eq!(StylePreset::from_str("3d-model").ok(), Some(StylePreset::ThreeDModel));
        assert_eq!(StylePreset::NeonPunk.to_string(), "neon-punk");
        assert_eq!(
            serde_json::to_string(&StylePreset::ThreeDModel).expect("serialize"),
            "\"3d-model\""
        );
        assert_eq!(
            serde_json::to_string(&StylePreset::DigitalArt).expect("serialize"),
            "\"digital-art\""
        );
        assert!(StylePreset::from_str("watercolor").is_err());
    }

    #[test]
    fn test_data_url_decoding() {
        let image = GeneratedImage::generated(
            "data:image/png;base64,aGVsbG8=",
            "a cat",
            GenerationParams::new(Engine::Sd16, Dimensions::square(512), None).expect("params"),
        );
        assert!(image.is_data_url());
        assert_eq!(image.mime(), Some("image/png"));
        assert_eq!(image.bytes().expect("decode"), Some(b"hello".to_vec()));
        assert_eq!(image.file_name(), "generated_image.png");
    }

    #[test]
    fn test_webp_file_name_and_remote_url() {
        let params =
            GenerationParams::new(Engine::Core, Dimensions::square(1024), None).expect("params");
        let webp = GeneratedImage::generated("data:image/webp;base64,AA==", "x", params.clone());
        assert_eq!(webp.file_name(), "generated_image.webp");

        let remote = GeneratedImage::generated("https://cdn.example.com/a.png", "x", params);
        assert_eq!(remote.bytes().expect("remote"), None);
        assert_eq!(remote.mime(), None);
    }

    #[test]
    fn test_each_generation_has_fresh_id() {
        let params =
            GenerationParams::new(Engine::Sd16, Dimensions::square(512), None).expect("params");
        let a = GeneratedImage::generated("data:image/png;base64,AA==", "x", params.clone());
        let b = GeneratedImage::generated("data:image/png;base64,AA==", "x", params);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_local_image_validation() {
        assert!(LocalImage::new("a.png", "image/png", vec![0; 16]).is_ok());
        assert!(matches!(
            LocalImage::new("a.gif", "image/gif", vec![0; 16]),
            Err(Error::ValidationFailed(_))
        ));
        assert!(matches!(
            LocalImage::new("big.png", "image/png", vec![0; MAX_LOCAL_IMAGE_SIZE + 1]),
            Err(Error::ValidationFailed(_))
        ));
        assert_eq!(LocalImage::content_type_for("photo.JPG"), Some("image/jpeg"));
        assert_eq!(LocalImage::content_type_for("notes.txt"), None);
    }

    #[test]
    fn test_local_image_becomes_data_url() {
        let local = LocalImage::new("mine.png", "image/png", b"hello".to_vec()).expect("valid");
        let image = GeneratedImage::local(&local);
        assert_eq!(image.url, "data:image/png;base64,aGVsbG8=");
        assert_eq!(image.file_name(), "mine.png");
        assert_eq!(image.bytes().expect("decode"), Some(b"hello".to_vec()));
    }
}
