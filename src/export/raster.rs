//! 8-bit RGB raster images.

use std::io::Cursor;

use png::{BitDepth, ColorType, Transformations};

use super::ExportError;

/// Opaque RGB image, 3 bytes per pixel, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl RasterImage {
    pub fn from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, ExportError> {
        if width == 0 || height == 0 {
            return Err(ExportError::EmptyImage);
        }
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(ExportError::Decode(format!(
                "expected {} bytes for {}x{} RGB, got {}",
                expected,
                width,
                height,
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    /// Decode a PNG, flattening palette, gray and alpha variants to RGB.
    ///
    /// Transparent pixels are composited over white.
    pub fn decode_png(bytes: &[u8]) -> Result<Self, ExportError> {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let mut reader = decoder.read_info().map_err(|e| ExportError::Decode(e.to_string()))?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e| ExportError::Decode(e.to_string()))?;
        buf.truncate(info.buffer_size());

        let (color, depth) = reader.output_color_type();
        if depth != BitDepth::Eight {
            return Err(ExportError::Decode(format!("unsupported bit depth {:?}", depth)));
        }

        let rgb = match color {
            ColorType::Rgb => buf,
            ColorType::Rgba => buf
                .chunks_exact(4)
                .flat_map(|px| {
                    let a = px[3];
                    [over_white(px[0], a), over_white(px[1], a), over_white(px[2], a)]
                })
                .collect(),
            ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g]).collect(),
            ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|px| {
                    let g = over_white(px[0], px[1]);
                    [g, g, g]
                })
                .collect(),
            ColorType::Indexed => {
                return Err(ExportError::Decode("palette was not expanded".to_string()));
            }
        };

        Self::from_rgb(info.width, info.height, rgb)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = u16::from(channel);
    let a = u16::from(alpha);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encode raw pixels as a PNG.
    pub(crate) fn encode_png(width: u32, height: u32, color: ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_decode_rgb() {
        let png = encode_png(2, 1, ColorType::Rgb, &[255, 0, 0, 0, 0, 255]);
        let image = RasterImage::decode_png(&png).unwrap();
        assert_eq!((image.width(), image.height()), (2, 1));
        assert_eq!(image.rgb(), &[255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_is_flattened_onto_white() {
        let png = encode_png(2, 1, ColorType::Rgba, &[0, 0, 0, 255, 0, 0, 0, 0]);
        let image = RasterImage::decode_png(&png).unwrap();
        assert_eq!(image.rgb(), &[0, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn test_gray_is_widened() {
        let png = encode_png(1, 2, ColorType::Grayscale, &[10, 200]);
        let image = RasterImage::decode_png(&png).unwrap();
        assert_eq!(image.rgb(), &[10, 10, 10, 200, 200, 200]);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        assert!(matches!(
            RasterImage::decode_png(b"definitely not a png"),
            Err(ExportError::Decode(_))
        ));
    }

    #[test]
    fn test_from_rgb_checks_length() {
        assert!(matches!(RasterImage::from_rgb(0, 5, vec![]), Err(ExportError::EmptyImage)));
        assert!(RasterImage::from_rgb(2, 2, vec![0; 11]).is_err());
        assert!(RasterImage::from_rgb(2, 2, vec![0; 12]).is_ok());
    }
}
