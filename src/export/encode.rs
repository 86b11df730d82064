use std::{
    io::Cursor,
    path::{Path, PathBuf},
    str::FromStr,
};

use rand::Rng;

use crate::{
    foundation::{
        core::{CanvasDims, FrameRGBA},
        error::{GrainError, GrainResult},
    },
    model::stops::ColorStop,
    render::{
        composite::{flatten_to_rgb, merge_grain},
        compositor::{Compositor, LayerParams},
        noise::NoiseLevel,
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = GrainError;

    fn from_str(s: &str) -> GrainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(GrainError::validation(format!(
                "unsupported export format '{other}'"
            ))),
        }
    }
}

/// Encoded image plus the name it should be saved under.
#[derive(Clone, Debug)]
pub struct ExportedImage {
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl ExportedImage {
    /// Writes into `dir` under the suggested filename.
    pub fn write_to_dir(&self, dir: &Path) -> GrainResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| {
            GrainError::resource(format!("create output dir '{}': {e}", dir.display()))
        })?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)
            .map_err(|e| GrainError::resource(format!("write '{}': {e}", path.display())))?;
        Ok(path)
    }
}

pub fn suggested_filename(width: u32, height: u32, format: ExportFormat) -> String {
    format!("gradient_{width}x{height}.{}", format.extension())
}

/// Export options besides the design itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportRequest {
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    pub jpeg_quality: u8,
}

impl ExportRequest {
    pub fn new(width: u32, height: u32, format: ExportFormat) -> Self {
        Self {
            width,
            height,
            format,
            jpeg_quality: 92,
        }
    }
}

/// Renders `stops` at the requested size with handles hidden, folds the grain
/// in, and encodes.
#[tracing::instrument(skip(compositor, stops, rng), fields(stops = stops.len()))]
pub fn export_image<R: Rng + ?Sized>(
    compositor: &Compositor,
    stops: &[ColorStop],
    noise: NoiseLevel,
    request: ExportRequest,
    rng: &mut R,
) -> GrainResult<ExportedImage> {
    if request.width == 0 || request.height == 0 {
        return Err(GrainError::validation(format!(
            "export size {}x{} must be positive",
            request.width, request.height
        )));
    }
    let dims = CanvasDims::new(f64::from(request.width), f64::from(request.height))?;
    let layers = compositor.render(stops, LayerParams::clean(dims, noise), rng)?;
    let merged = merge_grain(layers.gradient.into_straight(), &layers.noise)?;
    let (width, height) = (merged.width, merged.height);

    let bytes = encode(merged, request.format, request.jpeg_quality)?;
    tracing::debug!(width, height, bytes = bytes.len(), "export encoded");
    Ok(ExportedImage {
        width,
        height,
        format: request.format,
        bytes,
        filename: suggested_filename(width, height, request.format),
    })
}

/// Encodes a straight-alpha frame, taking ownership so the PNG path can hand
/// its buffer to the encoder without a copy. JPEG output is flattened over black.
pub fn encode(frame: FrameRGBA, format: ExportFormat, jpeg_quality: u8) -> GrainResult<Vec<u8>> {
    if frame.premultiplied {
        return Err(GrainError::encoding("encoder expects straight alpha"));
    }
    let mut out = Cursor::new(Vec::new());
    match format {
        ExportFormat::Png => {
            let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data)
                .ok_or_else(|| GrainError::encoding("rgba buffer does not match its size"))?;
            img.write_to(&mut out, image::ImageFormat::Png)
                .map_err(|e| GrainError::encoding(format!("png: {e}")))?;
        }
        ExportFormat::Jpeg => {
            let rgb = flatten_to_rgb(&frame);
            let img = image::RgbImage::from_raw(frame.width, frame.height, rgb)
                .ok_or_else(|| GrainError::encoding("rgb buffer does not match its size"))?;
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, jpeg_quality);
            encoder
                .encode_image(&img)
                .map_err(|e| GrainError::encoding(format!("jpeg: {e}")))?;
        }
    }
    Ok(out.into_inner())
}
