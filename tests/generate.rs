mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{count_pdf_pages, dejavu, items, png_page, record, request, template};
use paperform_pdf::{
    AssetCache, AssetStore, BillRecord, DirAssetStore, DocumentKind, DocumentTemplate, Error,
    Locale, RecordSource, RenderRequest, assemble, generate, generate_from_source,
};
use rayon::prelude::*;

struct MemoryRecords(HashMap<String, BillRecord>);

impl RecordSource for MemoryRecords {
    fn fetch(&self, _kind: DocumentKind, code: &str) -> Result<Option<BillRecord>, Error> {
        Ok(self.0.get(code).cloned())
    }
}

#[derive(Default)]
struct MemoryAssets {
    template_loads: AtomicUsize,
}

impl AssetStore for MemoryAssets {
    fn font_bytes(&self) -> Result<Option<Vec<u8>>, Error> {
        Ok(None)
    }

    fn template_pages(&self, _kind: DocumentKind) -> Result<Vec<Vec<u8>>, Error> {
        self.template_loads.fetch_add(1, Ordering::SeqCst);
        Ok(vec![png_page([255, 255, 255]), png_page([250, 250, 250])])
    }
}

fn name(i: usize) -> String {
    format!("Drawer runner {} mm", 300 + i * 50)
}

#[test]
fn output_is_a_pdf_with_one_page_per_layout_page() {
    let req = request(record(DocumentKind::Quotation, items(70, name)));
    let bytes = generate(&req).expect("generate");

    assert!(bytes.starts_with(b"%PDF"));
    let pages = assemble(&req);
    assert!(pages.len() > 1);
    assert_eq!(count_pdf_pages(&bytes), pages.len());
}

#[test]
fn identical_inputs_give_identical_bytes() {
    let req = request(record(DocumentKind::Invoice, items(12, name)));
    let first = generate(&req).expect("first");
    let second = generate(&req).expect("second");
    assert_eq!(first, second);
}

#[test]
fn concurrent_generation_matches_sequential() {
    let requests: Vec<_> = DocumentKind::ALL
        .iter()
        .enumerate()
        .map(|(i, &kind)| request(record(kind, items(10 + i * 15, name))))
        .collect();

    let sequential: Vec<Vec<u8>> = requests
        .iter()
        .map(|r| generate(r).expect("sequential"))
        .collect();
    let parallel: Vec<Vec<u8>> = requests
        .par_iter()
        .map(|r| generate(r).expect("parallel"))
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn missing_record_is_not_found() {
    let records = MemoryRecords(HashMap::new());
    let assets = AssetCache::new(MemoryAssets::default());
    let err = generate_from_source(&records, &assets, DocumentKind::Invoice, "IV-404", "19/10/2026")
        .err()
        .expect("must fail");

    match err {
        Error::NotFound { kind, code } => {
            assert_eq!(kind, DocumentKind::Invoice);
            assert_eq!(code, "IV-404");
        }
        other => panic!("expected NotFound, got {other}"),
    }
}

#[test]
fn source_backed_generation_reuses_cached_templates() {
    let rec = record(DocumentKind::Quotation, items(5, name));
    let code = rec.code.clone();
    let records = MemoryRecords(HashMap::from([(code.clone(), rec)]));
    let assets = AssetCache::new(MemoryAssets::default());

    let a = generate_from_source(&records, &assets, DocumentKind::Quotation, &code, "19/10/2026")
        .expect("first");
    let b = generate_from_source(&records, &assets, DocumentKind::Quotation, &code, "19/10/2026")
        .expect("second");

    assert_eq!(a, b);
    assert!(a.starts_with(b"%PDF"));
    assert!(Arc::ptr_eq(
        &assets.font().expect("font"),
        &assets.font().expect("font")
    ));
    let template = assets.template(DocumentKind::Quotation).expect("template");
    assert_eq!(template.len(), 2);
    assert_eq!(assets.store().template_loads.load(Ordering::SeqCst), 1);
}

#[test]
fn bad_template_bytes_are_asset_errors() {
    let garbage = DocumentTemplate::from_pages([b"not an image".to_vec()]);
    assert!(matches!(garbage, Err(Error::Asset(_))));

    let empty = DocumentTemplate::from_pages(Vec::<Vec<u8>>::new());
    assert!(matches!(empty, Err(Error::Asset(_))));
}

#[test]
fn directory_store_reads_pages_in_numeric_order() {
    let root = std::env::temp_dir().join(format!("paperform-assets-{}", std::process::id()));
    let dir = root.join(DocumentKind::Receipt.slug());
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join("page-2.png"), png_page([0, 0, 255])).expect("write");
    std::fs::write(dir.join("page-10.png"), png_page([0, 255, 0])).expect("write");
    std::fs::write(dir.join("page-1.png"), png_page([255, 0, 0])).expect("write");
    std::fs::write(dir.join("notes.txt"), b"ignored").expect("write");

    let store = DirAssetStore::new(&root);
    assert_eq!(store.root(), root.as_path());
    assert!(store.font_bytes().expect("font").is_none());
    let pages = store.template_pages(DocumentKind::Receipt).expect("pages");
    assert_eq!(
        pages,
        vec![
            png_page([255, 0, 0]),
            png_page([0, 0, 255]),
            png_page([0, 255, 0])
        ]
    );

    let missing = store.template_pages(DocumentKind::Invoice);
    assert!(matches!(missing, Err(Error::Asset(_))));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn record_json_round_trips_into_a_pdf() {
    let json = r#"{
        "kind": "tax_invoice",
        "code": "TI-2026-0007",
        "date": "01/10/2026",
        "party": { "name": "Chao Phraya Traders", "branch": "00002" },
        "items": [
            { "index": 1, "name": "Steel shelf", "quantity": 3, "unit_price": 1200, "tax_marker": true },
            { "index": 2, "name": "Assembly", "quantity": 1, "unit_price": 500, "hidden": true }
        ],
        "terminal": { "type": "discount", "label": "Loyalty discount", "amount": -100 },
        "discount": 100,
        "vat_rate": 7,
        "locale": "english"
    }"#;
    let rec: BillRecord = serde_json::from_str(json).expect("record");
    assert_eq!(rec.items.len(), 2);

    let bytes = generate(&request(rec)).expect("generate");
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(count_pdf_pages(&bytes), 1);
}

#[test]
fn words_the_font_cannot_draw_are_an_asset_error() {
    let mut rec = record(DocumentKind::Invoice, items(3, name));
    rec.locale = Locale::Thai;

    let with_helvetica = generate(&request(rec.clone()));
    assert!(matches!(with_helvetica, Err(Error::Asset(_))));

    // DejaVu Sans has Latin but no Thai.
    let with_latin_font = generate(&RenderRequest::new(rec, template(), dejavu(), "19/10/2026"));
    match with_latin_font {
        Err(Error::Asset(msg)) => assert!(msg.contains("amount in words"), "{msg}"),
        Err(other) => panic!("expected Asset, got {other}"),
        Ok(_) => panic!("expected Asset, got a PDF"),
    }
}

#[test]
fn undrawable_text_outside_the_words_still_generates() {
    let mut rows = items(2, name);
    rows[0].name = "ตู้เหล็ก steel cabinet".into();
    let bytes = generate(&request(record(DocumentKind::Invoice, rows))).expect("generate");
    assert!(bytes.starts_with(b"%PDF"));
}
