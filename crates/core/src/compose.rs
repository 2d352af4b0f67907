//! Card image composition.
//!
//! The finished card is the background template at its native size, the
//! resident's photo scaled onto it, and four lines of text: first name, last
//! name, card number, validity window. [`CardLayout`] holds the geometry as
//! pure data so the placement math is testable without fonts or image I/O;
//! [`TemplateComposer`] does the actual drawing and JPEG encoding.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use chrono::NaiveDate;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;

use crate::error::CoreError;
use crate::expiry;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Width the photo is scaled to; height follows the photo's aspect ratio.
pub const PHOTO_WIDTH: u32 = 280;

/// Top-left corner of the photo rectangle on the canvas.
pub const PHOTO_LEFT: i32 = 100;
pub const PHOTO_TOP: i32 = 160;

/// Single font size used for every text element.
pub const FONT_SIZE: i32 = 30;

/// Horizontal gap between the photo's right edge and the text column.
const TEXT_GAP: i32 = 20;

/// The name block sits this far above the photo's bottom edge.
const NAME_BLOCK_RAISE: i32 = 60;

/// The card-number line sits this far below the photo's bottom edge.
const NUMBER_DROP: i32 = 60;

/// Extra gap between the card-number line and the validity line.
const VALIDITY_GAP: i32 = 20;

/// Dark green used for the name lines (RGB 32,55,49).
pub const NAME_COLOR: Rgb<u8> = Rgb([32, 55, 49]);

/// Pale gold `#e2deaf` used for the card-number and validity lines.
pub const ACCENT_COLOR: Rgb<u8> = Rgb([0xe2, 0xde, 0xaf]);

/// JPEG quality for the finished card.
const JPEG_QUALITY: u8 = 90;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Placement of the photo rectangle and the four text lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub photo_width: u32,
    pub photo_height: u32,
    pub photo_left: i32,
    pub photo_top: i32,
    /// X coordinate shared by all text lines.
    pub text_x: i32,
    pub first_name_y: i32,
    pub last_name_y: i32,
    pub card_number_y: i32,
    pub validity_y: i32,
}

impl CardLayout {
    /// Compute the layout for a photo of the given native dimensions.
    ///
    /// Fails with a validation error for zero-sized photos; the scaled
    /// height would otherwise come from a division by zero.
    pub fn compute(photo_width: u32, photo_height: u32) -> Result<Self, CoreError> {
        if photo_width == 0 || photo_height == 0 {
            return Err(CoreError::Validation(
                "Photo has zero width or height".to_string(),
            ));
        }

        let aspect = photo_width as f64 / photo_height as f64;
        let scaled_height = (PHOTO_WIDTH as f64 / aspect) as u32;

        let photo_right = PHOTO_LEFT + PHOTO_WIDTH as i32;
        let photo_bottom = PHOTO_TOP + scaled_height as i32;

        let card_number_y = photo_bottom + NUMBER_DROP;

        Ok(CardLayout {
            photo_width: PHOTO_WIDTH,
            photo_height: scaled_height,
            photo_left: PHOTO_LEFT,
            photo_top: PHOTO_TOP,
            text_x: photo_right + TEXT_GAP,
            first_name_y: photo_bottom - 2 * FONT_SIZE - NAME_BLOCK_RAISE,
            last_name_y: photo_bottom - FONT_SIZE - NAME_BLOCK_RAISE,
            card_number_y,
            validity_y: card_number_y + FONT_SIZE + VALIDITY_GAP,
        })
    }
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Seam between the issuance pipeline and the drawing code, so pipeline
/// tests can substitute a deterministic stub.
pub trait Composer: Send + Sync {
    /// Render the finished card as encoded JPEG bytes.
    fn compose(
        &self,
        photo: &DynamicImage,
        first_name: &str,
        last_name: &str,
        card_number: u32,
        issued_on: NaiveDate,
    ) -> Result<Vec<u8>, CoreError>;
}

/// Production composer: background template + TTF font from disk.
///
/// Assets are loaded per composition, matching the one-request-at-a-time
/// issuance model; [`TemplateComposer::verify_assets`] lets the binary fail
/// fast at startup when either file is missing.
pub struct TemplateComposer {
    template_path: PathBuf,
    font_path: PathBuf,
}

impl TemplateComposer {
    pub fn new(template_path: impl Into<PathBuf>, font_path: impl Into<PathBuf>) -> Self {
        TemplateComposer {
            template_path: template_path.into(),
            font_path: font_path.into(),
        }
    }

    /// Check that both assets exist, without decoding them.
    pub fn verify_assets(&self) -> Result<(), CoreError> {
        ensure_asset("card template", &self.template_path)?;
        ensure_asset("card font", &self.font_path)
    }

    fn load_template(&self) -> Result<DynamicImage, CoreError> {
        ensure_asset("card template", &self.template_path)?;
        image::open(&self.template_path).map_err(|e| {
            CoreError::Image(format!(
                "Failed to decode card template {}: {e}",
                self.template_path.display()
            ))
        })
    }

    fn load_font(&self) -> Result<FontVec, CoreError> {
        ensure_asset("card font", &self.font_path)?;
        let bytes = std::fs::read(&self.font_path).map_err(|e| {
            CoreError::Internal(format!(
                "Failed to read card font {}: {e}",
                self.font_path.display()
            ))
        })?;
        FontVec::try_from_vec(bytes).map_err(|_| {
            CoreError::Internal(format!(
                "Card font {} is not a valid font file",
                self.font_path.display()
            ))
        })
    }
}

fn ensure_asset(asset: &'static str, path: &Path) -> Result<(), CoreError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CoreError::MissingAsset {
            asset,
            path: path.display().to_string(),
        })
    }
}

impl Composer for TemplateComposer {
    fn compose(
        &self,
        photo: &DynamicImage,
        first_name: &str,
        last_name: &str,
        card_number: u32,
        issued_on: NaiveDate,
    ) -> Result<Vec<u8>, CoreError> {
        let template = self.load_template()?;
        let font = self.load_font()?;
        let layout = CardLayout::compute(photo.width(), photo.height())?;

        // Canvas is the background at its native size.
        let mut canvas: RgbImage = template.to_rgb8();

        let scaled = photo
            .resize_exact(layout.photo_width, layout.photo_height, FilterType::Lanczos3)
            .to_rgb8();
        image::imageops::overlay(
            &mut canvas,
            &scaled,
            layout.photo_left as i64,
            layout.photo_top as i64,
        );

        let scale = PxScale::from(FONT_SIZE as f32);

        draw_text_mut(
            &mut canvas,
            NAME_COLOR,
            layout.text_x,
            layout.first_name_y,
            scale,
            &font,
            first_name,
        );
        draw_text_mut(
            &mut canvas,
            NAME_COLOR,
            layout.text_x,
            layout.last_name_y,
            scale,
            &font,
            last_name,
        );

        let number_line = format!("NUMER KARTY: {card_number}");
        draw_text_mut(
            &mut canvas,
            ACCENT_COLOR,
            layout.text_x,
            layout.card_number_y,
            scale,
            &font,
            &number_line,
        );

        let expires_on = expiry::expiry_date(issued_on);
        let validity_line = format!("WAŻNA DO: {}", expiry::validity_label(expires_on));
        draw_text_mut(
            &mut canvas,
            ACCENT_COLOR,
            layout.text_x,
            layout.validity_y,
            scale,
            &font,
            &validity_line,
        );

        let mut bytes = Vec::new();
        let mut cursor = Cursor::new(&mut bytes);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        canvas
            .write_with_encoder(encoder)
            .map_err(|e| CoreError::Image(format!("Failed to encode card JPEG: {e}")))?;

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- layout tests --

    #[test]
    fn photo_scaled_to_fixed_width_preserving_aspect() {
        // 4:3 photo: 280 wide -> 210 tall.
        let layout = CardLayout::compute(560, 420).unwrap();
        assert_eq!(layout.photo_width, 280);
        assert_eq!(layout.photo_height, 210);
    }

    #[test]
    fn portrait_photo_scales_taller_than_wide() {
        let layout = CardLayout::compute(300, 400).unwrap();
        assert_eq!(layout.photo_height, 373); // 280 / (300/400), truncated
    }

    #[test]
    fn text_column_sits_right_of_photo() {
        let layout = CardLayout::compute(280, 280).unwrap();
        // Photo right edge 100 + 280, plus the 20 unit gap.
        assert_eq!(layout.text_x, 400);
    }

    #[test]
    fn name_block_anchors_above_photo_bottom() {
        let layout = CardLayout::compute(280, 280).unwrap();
        let photo_bottom = 160 + 280;
        assert_eq!(layout.first_name_y, photo_bottom - 2 * 30 - 60);
        assert_eq!(layout.last_name_y, photo_bottom - 30 - 60);
    }

    #[test]
    fn number_and_validity_lines_below_photo() {
        let layout = CardLayout::compute(280, 280).unwrap();
        let photo_bottom = 160 + 280;
        assert_eq!(layout.card_number_y, photo_bottom + 60);
        assert_eq!(layout.validity_y, layout.card_number_y + 30 + 20);
    }

    #[test]
    fn zero_height_photo_is_rejected() {
        let err = CardLayout::compute(100, 0).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn zero_width_photo_is_rejected() {
        assert!(CardLayout::compute(0, 100).is_err());
    }

    // -- asset tests --

    #[test]
    fn missing_template_is_reported_before_any_draw() {
        let composer = TemplateComposer::new("/nonexistent/karta_a.jpg", "/nonexistent/font.ttf");
        let err = composer.verify_assets().unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingAsset {
                asset: "card template",
                ..
            }
        ));
    }

    #[test]
    fn missing_font_is_reported_when_template_exists() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("karta_a.jpg");
        std::fs::write(&template, b"stub").unwrap();

        let composer = TemplateComposer::new(&template, dir.path().join("font.ttf"));
        let err = composer.verify_assets().unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingAsset {
                asset: "card font",
                ..
            }
        ));
    }
}
