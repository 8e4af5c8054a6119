use crate::error::{Result, TinifyError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMethod {
    /// Scale proportionally; exactly one of width/height
    Scale,
    /// Fit inside width x height, keeping proportions
    Fit,
    /// Crop to width x height around the most interesting area
    Cover,
    /// Like cover, but may add background around small subjects
    Thumb,
}

impl ResizeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeMethod::Scale => "scale",
            ResizeMethod::Fit => "fit",
            ResizeMethod::Cover => "cover",
            ResizeMethod::Thumb => "thumb",
        }
    }
}

impl FromStr for ResizeMethod {
    type Err = TinifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scale" => Ok(ResizeMethod::Scale),
            "fit" => Ok(ResizeMethod::Fit),
            "cover" => Ok(ResizeMethod::Cover),
            "thumb" => Ok(ResizeMethod::Thumb),
            _ => Err(TinifyError::InvalidResize(format!("unknown method '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resize {
    pub method: ResizeMethod,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Resize {
    pub fn new(method: ResizeMethod, width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            method,
            width,
            height,
        }
    }

    pub fn scale_to_width(width: u32) -> Self {
        Self::new(ResizeMethod::Scale, Some(width), None)
    }

    pub fn scale_to_height(height: u32) -> Self {
        Self::new(ResizeMethod::Scale, None, Some(height))
    }

    pub fn fit(width: u32, height: u32) -> Self {
        Self::new(ResizeMethod::Fit, Some(width), Some(height))
    }

    pub fn cover(width: u32, height: u32) -> Self {
        Self::new(ResizeMethod::Cover, Some(width), Some(height))
    }

    pub fn thumb(width: u32, height: u32) -> Self {
        Self::new(ResizeMethod::Thumb, Some(width), Some(height))
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == Some(0) || self.height == Some(0) {
            return Err(TinifyError::InvalidResize(
                "dimensions must be greater than zero".into(),
            ));
        }

        match (self.method, self.width, self.height) {
            (ResizeMethod::Scale, Some(_), Some(_)) | (ResizeMethod::Scale, None, None) => {
                Err(TinifyError::InvalidResize(
                    "scale needs exactly one of width or height".into(),
                ))
            }
            (ResizeMethod::Scale, _, _) => Ok(()),
            (_, Some(_), Some(_)) => Ok(()),
            (method, _, _) => Err(TinifyError::InvalidResize(format!(
                "{} needs both width and height",
                method.as_str()
            ))),
        }
    }
}

/// Target format for a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageType {
    #[serde(rename = "image/avif")]
    Avif,
    #[serde(rename = "image/webp")]
    WebP,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    /// Let the service pick the smallest result
    #[serde(rename = "*/*")]
    Smallest,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Avif => "image/avif",
            ImageType::WebP => "image/webp",
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::Smallest => "*/*",
        }
    }

    /// File extension matching the type, if it names a single format.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ImageType::Avif => Some("avif"),
            ImageType::WebP => Some("webp"),
            ImageType::Jpeg => Some("jpg"),
            ImageType::Png => Some("png"),
            ImageType::Smallest => None,
        }
    }
}

impl FromStr for ImageType {
    type Err = TinifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "image/avif" | "avif" => Ok(ImageType::Avif),
            "image/webp" | "webp" => Ok(ImageType::WebP),
            "image/jpeg" | "jpeg" | "jpg" => Ok(ImageType::Jpeg),
            "image/png" | "png" => Ok(ImageType::Png),
            "*/*" => Ok(ImageType::Smallest),
            _ => Err(TinifyError::InvalidImageType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convert {
    pub types: Vec<ImageType>,

    /// Background used when converting transparent images to a format
    /// without alpha: `white`, `black` or a hex color like `#ff00aa`.
    pub background: Option<String>,
}

impl Convert {
    pub fn to(image_type: ImageType) -> Self {
        Self {
            types: vec![image_type],
            background: None,
        }
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.types.is_empty() {
            return Err(TinifyError::InvalidImageType(
                "at least one target type is required".into(),
            ));
        }

        if let Some(background) = &self.background {
            if !is_valid_background(background) {
                return Err(TinifyError::InvalidImageType(format!(
                    "invalid background '{}'",
                    background
                )));
            }
        }

        Ok(())
    }
}

fn is_valid_background(value: &str) -> bool {
    match value {
        "white" | "black" => true,
        hex => {
            hex.len() == 7
                && hex.starts_with('#')
                && hex[1..].chars().all(|c| c.is_ascii_hexdigit())
        }
    }
}

/// Metadata to carry over from the original image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preserve {
    Copyright,
    Creation,
    Location,
}

impl Preserve {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preserve::Copyright => "copyright",
            Preserve::Creation => "creation",
            Preserve::Location => "location",
        }
    }
}

impl FromStr for Preserve {
    type Err = TinifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "copyright" => Ok(Preserve::Copyright),
            "creation" => Ok(Preserve::Creation),
            "location" => Ok(Preserve::Location),
            _ => Err(TinifyError::InvalidPreserve(s.to_string())),
        }
    }
}

/// An operation applied by the service to an already compressed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    Resize(Resize),
    Convert(Convert),
    Preserve(Vec<Preserve>),
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Resize(_) => "resize",
            Transform::Convert(_) => "convert",
            Transform::Preserve(_) => "preserve",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Transform::Resize(resize) => resize.validate(),
            Transform::Convert(convert) => convert.validate(),
            Transform::Preserve(items) if items.is_empty() => Err(TinifyError::InvalidPreserve(
                "at least one item is required".into(),
            )),
            Transform::Preserve(_) => Ok(()),
        }
    }

    /// Validates the transform and builds the JSON request body.
    pub fn to_json(&self) -> Result<Value> {
        self.validate()?;

        let body = match self {
            Transform::Resize(resize) => json!({ "resize": serde_json::to_value(resize)? }),
            Transform::Convert(convert) => {
                let mut body = json!({ "convert": { "type": serde_json::to_value(&convert.types)? } });
                if let Some(background) = &convert.background {
                    body["transform"] = json!({ "background": background });
                }
                body
            }
            Transform::Preserve(items) => {
                let mut unique: Vec<Preserve> = Vec::with_capacity(items.len());
                for item in items {
                    if !unique.contains(item) {
                        unique.push(*item);
                    }
                }
                json!({ "preserve": serde_json::to_value(unique)? })
            }
        };

        Ok(body)
    }
}
