mod assets;
mod error;
mod fonts;
pub mod layout;
mod model;
mod money;
mod pdf;
mod template;

pub use assets::{AssetCache, AssetStore, DirAssetStore, RecordSource};
pub use error::Error;
pub use fonts::FontHandle;
pub use layout::{RenderRequest, assemble};
pub use model::{
    BillRecord, DocumentKind, DocumentSummary, InstallmentOverride, LineItemRecord, Locale, Party,
    SubItem, SubItems, TerminalRow, parse_sub_items,
};
pub use money::{amount_in_words, format_amount, format_quantity, round2};
pub use template::{DocumentTemplate, TemplatePage};

use std::collections::BTreeSet;
use std::time::Instant;

fn preview(chars: &[char]) -> String {
    let mut shown = chars
        .iter()
        .take(8)
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ");
    if chars.len() > 8 {
        shown.push_str(&format!(" and {} more", chars.len() - 8));
    }
    shown
}

/// Lay out one bill and serialize it to PDF bytes.
///
/// The amount in words must print on every page, so a font without glyphs
/// for it is an [`Error::Asset`]. Other undrawable characters are logged.
pub fn generate(request: &RenderRequest) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();
    let font = &request.font;

    let words = DocumentSummary::from_record(&request.record).words;
    let missing = font.missing_chars(&words);
    if !missing.is_empty() {
        return Err(Error::Asset(format!(
            "font {} cannot draw the amount in words (no glyph for {}); supply a font covering {:?} text",
            font.name(),
            preview(&missing),
            request.record.locale,
        )));
    }

    let pages = layout::assemble(request);
    let t_layout = t0.elapsed();

    let undrawable: BTreeSet<char> = pages
        .iter()
        .flat_map(|p| p.texts())
        .flat_map(|t| t.text.chars())
        .filter(|&ch| !font.has_glyph(ch))
        .collect();
    if !undrawable.is_empty() {
        let missing: Vec<char> = undrawable.into_iter().collect();
        log::warn!(
            "{} {}: font {} has no glyph for {}; those characters will not print",
            request.record.kind.label(),
            request.record.code,
            font.name(),
            preview(&missing)
        );
    }

    let bytes = pdf::write(&pages, request)?;
    let t_total = t0.elapsed();

    log::info!(
        "{} {}: {} item(s) on {} page(s) in {}; layout={:.1}ms, serialize={:.1}ms (output {} bytes)",
        request.record.kind.label(),
        request.record.code,
        request.record.items.len(),
        pages.len(),
        font.name(),
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(bytes)
}

/// Fetch a record and its assets from the collaborators, then generate.
/// A missing record is an error; nothing is rendered for it.
pub fn generate_from_source<R, S>(
    records: &R,
    assets: &AssetCache<S>,
    kind: DocumentKind,
    code: &str,
    as_of: &str,
) -> Result<Vec<u8>, Error>
where
    R: RecordSource + ?Sized,
    S: AssetStore,
{
    let record = records
        .fetch(kind, code)?
        .ok_or_else(|| Error::NotFound {
            kind,
            code: code.to_string(),
        })?;
    let request = RenderRequest::new(record, assets.template(kind)?, assets.font()?, as_of);
    generate(&request)
}
