#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use paperform_pdf::{
    BillRecord, DocumentKind, DocumentTemplate, FontHandle, LineItemRecord, Locale, Party,
    RenderRequest,
};

/// Solid-color PNG standing in for scanned stationery.
pub fn png_page(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 12, image::Rgb(rgb));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// Two-page template: cover artwork and continuation artwork.
pub fn template() -> Arc<DocumentTemplate> {
    static TEMPLATE: OnceLock<Arc<DocumentTemplate>> = OnceLock::new();
    TEMPLATE
        .get_or_init(|| {
            Arc::new(
                DocumentTemplate::from_pages([png_page([250, 250, 240]), png_page([240, 250, 250])])
                    .expect("template"),
            )
        })
        .clone()
}

pub fn helvetica() -> Arc<FontHandle> {
    static FONT: OnceLock<Arc<FontHandle>> = OnceLock::new();
    FONT.get_or_init(|| Arc::new(FontHandle::helvetica())).clone()
}

/// DejaVu Sans, bundled under `tests/fixtures`. Latin and Greek, no Thai or CJK.
pub fn dejavu_bytes() -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("DejaVuSans.ttf");
    std::fs::read(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

pub fn dejavu() -> Arc<FontHandle> {
    static FONT: OnceLock<Arc<FontHandle>> = OnceLock::new();
    FONT.get_or_init(|| Arc::new(FontHandle::load(&dejavu_bytes()).expect("load DejaVu Sans")))
        .clone()
}

pub fn party() -> Party {
    Party {
        name: "Siam Widget Co., Ltd.".into(),
        branch: "00000".into(),
        address: "99/1 Rama IV Road, Khlong Toei, Bangkok 10110".into(),
        tax_id: "0105551234567".into(),
        contact_name: "K. Somchai".into(),
        phone: "02-123-4567".into(),
    }
}

pub fn record(kind: DocumentKind, items: Vec<LineItemRecord>) -> BillRecord {
    let mut record = BillRecord::new(kind, "QT-2026-0042");
    record.date = Some("14/10/2026".into());
    record.party = party();
    record.items = items;
    record.vat_rate = 7.0;
    record.locale = Locale::English;
    record
}

pub fn items(count: usize, name: impl Fn(usize) -> String) -> Vec<LineItemRecord> {
    (0..count)
        .map(|i| LineItemRecord::new(i as u32 + 1, name(i), 2.0, 150.0))
        .collect()
}

pub fn request(record: BillRecord) -> RenderRequest {
    RenderRequest::new(record, template(), helvetica(), "19/10/2026")
}

/// Number of page objects in serialized PDF bytes.
pub fn count_pdf_pages(bytes: &[u8]) -> usize {
    let needle = b"/Type /Page";
    bytes
        .windows(needle.len() + 1)
        .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
        .count()
}
