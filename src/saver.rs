//! Writes a finished canvas to disk.  The canvas is copied into a
//! flat RGB buffer and handed to the `image` crate, which picks the
//! encoder from the file extension.

extern crate image;

use std::path::Path;
use std::str::FromStr;

use itertools::iproduct;

use canvas::FractalImage;
use image::ColorType;

/// The file formats the saver knows how to produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    /// Lossless, the usual choice.
    Png,
    /// Uncompressed bitmap.
    Bmp,
    /// Lossy; fine for quick previews.
    Jpeg,
}

impl ImageFormat {
    /// The file extension written for this format.  JPEG uses the
    /// conventional short form.
    pub fn extension(&self) -> &'static str {
        match *self {
            ImageFormat::Png => "png",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<ImageFormat, String> {
        match s {
            "png" => Ok(ImageFormat::Png),
            "bmp" => Ok(ImageFormat::Bmp),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            _ => Err(format!("Unknown image format: {}", s)),
        }
    }
}

/// Encodes the canvas to the file at `path`, choosing the format from
/// the path's extension.
pub fn save_image(fractal: &FractalImage, path: &Path) -> Result<(), String> {
    let mut buffer = Vec::with_capacity(fractal.width * fractal.height * 3);
    for (y, x) in iproduct!(0..fractal.height, 0..fractal.width) {
        if let Some(pixel) = fractal.pixel(x, y) {
            let (red, green, blue) = pixel.channels();
            buffer.push(red);
            buffer.push(green);
            buffer.push(blue);
        }
    }
    image::save_buffer(
        path,
        &buffer,
        fractal.width as u32,
        fractal.height as u32,
        ColorType::RGB(8),
    )
    .map_err(|err| format!("Could not write {}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    extern crate tempfile;

    use super::*;
    use canvas::Color;
    use std::fs;

    #[test]
    fn formats_parse_and_carry_their_extensions() {
        assert_eq!("png".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("bmp".parse::<ImageFormat>().unwrap(), ImageFormat::Bmp);
        assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
        assert!("gif".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn saves_a_canvas_to_png_and_bmp() {
        let dir = tempfile::tempdir().unwrap();
        let fractal = FractalImage::create(2, 2).unwrap();
        fractal
            .pixel(0, 0)
            .unwrap()
            .accumulate(Color::rgb(255, 0, 0));
        for format in &[ImageFormat::Png, ImageFormat::Bmp] {
            let path = dir
                .path()
                .join(format!("flame.{}", format.extension()));
            save_image(&fractal, &path).unwrap();
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }
    }
}
