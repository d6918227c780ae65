//! ESC/POS command builder
//!
//! Provides a typed command vocabulary ([`Command`]) and a fluent API for
//! building ESC/POS print data.

use crate::encoding::{WPC1252_CODE_PAGE, encode_text};
#[cfg(feature = "image")]
use tracing::instrument;

/// Line justification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
    Right,
}

/// Character size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Normal,
    DoubleHeight,
    DoubleWidth,
    Double,
}

/// A single printer directive
///
/// Renderers produce a `Vec<Command>`; [`EscPosBuilder::from_commands`] turns
/// it into bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Justify(Justify),
    Bold(bool),
    Size(TextSize),
    /// One line of text, newline appended
    Line(String),
    /// Print and feed n lines
    Feed(u8),
    /// Full cut
    Cut,
    /// Pre-encoded bytes (e.g. raster logo)
    Raw(Vec<u8>),
}

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers.
/// Text is encoded to Windows-1252 as it is written.
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    /// Create a builder primed with printer reset and code page selection
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(4096);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[0x1B, 0x40]);
        // Select code page (ESC t n)
        buf.extend_from_slice(&[0x1B, 0x74, WPC1252_CODE_PAGE]);
        Self { buf }
    }

    /// Build the bytes for a sequence of directives
    pub fn from_commands(commands: &[Command]) -> Vec<u8> {
        let mut b = Self::new();
        for command in commands {
            b.apply(command);
        }
        b.build()
    }

    /// Append one directive
    pub fn apply(&mut self, command: &Command) -> &mut Self {
        match command {
            Command::Justify(Justify::Left) => self.left(),
            Command::Justify(Justify::Center) => self.center(),
            Command::Justify(Justify::Right) => self.right(),
            Command::Bold(true) => self.bold(),
            Command::Bold(false) => self.bold_off(),
            Command::Size(TextSize::Normal) => self.reset_size(),
            Command::Size(TextSize::DoubleHeight) => self.double_height(),
            Command::Size(TextSize::DoubleWidth) => self.double_width(),
            Command::Size(TextSize::Double) => self.double_size(),
            Command::Line(text) => self.line(text),
            Command::Feed(lines) => self.feed(*lines),
            Command::Cut => self.cut(),
            Command::Raw(bytes) => self.raw(bytes),
        }
    }

    // === Text Output ===

    /// Write raw text (will be code page encoded)
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(&encode_text(s));
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write multiple empty lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n - Print and feed n lines
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Alignment ===

    /// Align text to center
    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    /// Align text to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    /// Align text to right
    pub fn right(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x02]);
        self
    }

    // === Text Style ===

    /// Enable bold text
    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    /// Disable bold text
    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x11]);
        self
    }

    /// Double height only
    pub fn double_height(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x01]);
        self
    }

    /// Double width only
    pub fn double_width(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x10]);
        self
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x00]);
        self
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0 - Full cut
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    // === Raw Commands ===

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    // === Build ===

    /// Return the final byte buffer
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Image Processing
// ============================================================================

/// Process an image file and return ESC/POS raster data
///
/// The image will be:
/// - Resized to fit max width (384 dots)
/// - Converted to 1-bit monochrome
/// - Encoded as GS v 0 raster graphics
#[cfg(feature = "image")]
#[instrument]
pub fn process_logo(path: &str) -> Option<Vec<u8>> {
    use image::GenericImageView;
    use tracing::{error, info};

    info!(path = path, "processing logo");

    let img = match image::open(path) {
        Ok(i) => {
            info!(dimensions = ?i.dimensions(), "logo image opened");
            i
        }
        Err(e) => {
            error!(error = %e, "open logo failed");
            return None;
        }
    };

    Some(rasterize(&img))
}

/// Encode an already decoded image as centered GS v 0 raster data
#[cfg(feature = "image")]
pub fn rasterize(img: &image::DynamicImage) -> Vec<u8> {
    use image::GenericImageView;

    let (w, h) = img.dimensions();

    let max_width = 384;
    let (new_w, new_h) = if w > max_width {
        let ratio = max_width as f64 / w as f64;
        (max_width, ((h as f64 * ratio) as u32).max(1))
    } else {
        (w, h)
    };

    let resized = img.resize_exact(new_w, new_h, image::imageops::FilterType::Nearest);

    let x_bytes = new_w.div_ceil(8);

    let mut data = Vec::with_capacity(8 + (x_bytes * new_h) as usize + 4);

    data.extend_from_slice(&[0x1B, 0x61, 0x01]);

    // GS v 0 m xL xH yL yH
    data.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
    data.push(x_bytes as u8);
    data.push((x_bytes >> 8) as u8);
    data.push(new_h as u8);
    data.push((new_h >> 8) as u8);

    let rgba = resized.to_rgba8();

    for y in 0..new_h {
        for x_byte in 0..x_bytes {
            let mut byte = 0u8;
            for bit in 0..8 {
                let x = x_byte * 8 + bit;
                if x >= new_w {
                    continue;
                }
                let pixel = rgba.get_pixel(x, y);

                // Transparent pixels stay white
                if pixel[3] >= 128 {
                    let luma = (0.299 * pixel[0] as f32
                        + 0.587 * pixel[1] as f32
                        + 0.114 * pixel[2] as f32) as u8;
                    if luma < 128 {
                        byte |= 1 << (7 - bit);
                    }
                }
            }
            data.push(byte);
        }
    }

    data.push(0x0A);

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREAMBLE: [u8; 5] = [0x1B, 0x40, 0x1B, 0x74, WPC1252_CODE_PAGE];

    #[test]
    fn test_builder_starts_with_init_and_code_page() {
        let data = EscPosBuilder::new().build();
        assert_eq!(data, PREAMBLE.to_vec());
    }

    #[test]
    fn test_builder_basic() {
        let mut b = EscPosBuilder::new();
        b.center().double_size().line("TITLE").reset_size().left().line("body");

        let data = b.build();
        let s = String::from_utf8_lossy(&data);
        assert!(s.contains("TITLE\n"));
        assert!(s.contains("body\n"));
    }

    #[test]
    fn test_from_commands() {
        let data = EscPosBuilder::from_commands(&[
            Command::Justify(Justify::Center),
            Command::Bold(true),
            Command::Line("Café".to_string()),
            Command::Bold(false),
            Command::Feed(4),
            Command::Cut,
        ]);

        let mut expected = PREAMBLE.to_vec();
        expected.extend_from_slice(&[0x1B, 0x61, 0x01]);
        expected.extend_from_slice(&[0x1B, 0x45, 0x01]);
        expected.extend_from_slice(&[b'C', b'a', b'f', 0xE9, b'\n']);
        expected.extend_from_slice(&[0x1B, 0x45, 0x00]);
        expected.extend_from_slice(&[0x1B, 0x64, 4]);
        expected.extend_from_slice(&[0x1D, 0x56, 0x00]);
        assert_eq!(data, expected);
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_rasterize_black_square() {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            8,
            2,
            image::Rgba([0, 0, 0, 255]),
        ));

        let data = rasterize(&img);
        // align(3) + GS v 0 header(8) + 2 rows of 1 byte + newline
        assert_eq!(data.len(), 3 + 8 + 2 + 1);
        assert_eq!(&data[3..7], &[0x1D, 0x76, 0x30, 0x00]);
        assert_eq!(&data[11..13], &[0xFF, 0xFF]);
    }
}
