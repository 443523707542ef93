use std::io::Cursor;

use crate::error::Error;

/// How a background page is stored, ready to be written as an image XObject.
pub(crate) enum PageImage {
    /// Baseline JPEG passed through with DCTDecode.
    Jpeg { data: Vec<u8>, gray: bool },
    /// Zlib-compressed RGB samples plus an optional alpha soft mask.
    Flate { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

pub struct TemplatePage {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub(crate) image: PageImage,
}

/// Pre-printed artwork for one document kind, one image per template page.
/// Decoded once; cheap to share behind an `Arc`.
pub struct DocumentTemplate {
    pages: Vec<TemplatePage>,
}

impl DocumentTemplate {
    pub fn from_pages<I, B>(pages: I) -> Result<DocumentTemplate, Error>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, bytes)| {
                decode_page(bytes.as_ref())
                    .map_err(|e| Error::Asset(format!("template page {}: {e}", i + 1)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if pages.is_empty() {
            return Err(Error::Asset("template has no pages".into()));
        }
        Ok(DocumentTemplate { pages })
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, index: usize) -> Option<&TemplatePage> {
        self.pages.get(index)
    }

    /// Template page behind physical page `page_number` (1-based): the first
    /// page gets the cover artwork, continuation pages the second template
    /// page when there is one.
    pub fn page_for(&self, page_number: usize) -> usize {
        if page_number <= 1 || self.pages.len() < 2 {
            0
        } else {
            1
        }
    }
}

fn decode_page(bytes: &[u8]) -> Result<TemplatePage, String> {
    let format = image::guess_format(bytes).map_err(|e| e.to_string())?;
    if !matches!(format, image::ImageFormat::Png | image::ImageFormat::Jpeg) {
        return Err(format!("unsupported image format {format:?}"));
    }
    let reader = image::ImageReader::with_format(Cursor::new(bytes), format);
    let decoded = reader.decode().map_err(|e| e.to_string())?;
    let (w, h) = (decoded.width(), decoded.height());

    if format == image::ImageFormat::Jpeg {
        match decoded.color() {
            image::ColorType::Rgb8 | image::ColorType::L8 => {
                return Ok(TemplatePage {
                    pixel_width: w,
                    pixel_height: h,
                    image: PageImage::Jpeg {
                        data: bytes.to_vec(),
                        gray: decoded.color() == image::ColorType::L8,
                    },
                });
            }
            // CMYK and friends are re-encoded below
            _ => {}
        }
    }

    let rgba = decoded.to_rgba8();
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);
    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);
    let alpha = has_alpha.then(|| {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6)
    });

    Ok(TemplatePage {
        pixel_width: w,
        pixel_height: h,
        image: PageImage::Flate { rgb, alpha },
    })
}
