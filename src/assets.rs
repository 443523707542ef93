//! Boundary to the collaborators that own business records and asset files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::Error;
use crate::fonts::FontHandle;
use crate::model::{BillRecord, DocumentKind};
use crate::template::DocumentTemplate;

/// Supplies already-assembled business records.
pub trait RecordSource {
    fn fetch(&self, kind: DocumentKind, code: &str) -> Result<Option<BillRecord>, Error>;
}

/// Supplies raw font and template bytes.
pub trait AssetStore {
    /// `None` selects the built-in Helvetica.
    fn font_bytes(&self) -> Result<Option<Vec<u8>>, Error>;
    /// One byte blob per template page, in page order.
    fn template_pages(&self, kind: DocumentKind) -> Result<Vec<Vec<u8>>, Error>;
}

/// Assets laid out on disk as:
///
/// ```text
/// <root>/font.ttf            (optional)
/// <root>/<kind>/page-1.png   (or .jpg)
/// <root>/<kind>/page-2.png
/// ```
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory from the `PAPERFORM_ASSETS` environment variable.
    pub fn from_env() -> Option<Self> {
        std::env::var("PAPERFORM_ASSETS")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Self::new)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn page_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !matches!(ext.as_str(), "png" | "jpg" | "jpeg") {
        return None;
    }
    stem.strip_prefix("page-")?.parse().ok()
}

impl AssetStore for DirAssetStore {
    fn font_bytes(&self) -> Result<Option<Vec<u8>>, Error> {
        for name in ["font.ttf", "font.otf"] {
            let path = self.root.join(name);
            if path.is_file() {
                return Ok(Some(std::fs::read(&path)?));
            }
        }
        Ok(None)
    }

    fn template_pages(&self, kind: DocumentKind) -> Result<Vec<Vec<u8>>, Error> {
        let dir = self.root.join(kind.slug());
        let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(&dir)
            .map_err(|e| Error::Asset(format!("{}: {e}", dir.display())))?
            .flatten()
            .map(|entry| entry.path())
            .filter_map(|path| page_number(&path).map(|n| (n, path)))
            .collect();
        pages.sort();
        pages
            .into_iter()
            .map(|(_, path)| std::fs::read(&path).map_err(Error::from))
            .collect()
    }
}

/// Process-wide memo of loaded assets. Loaded fonts and templates are
/// immutable and shared through `Arc`; per-call render state never lives
/// here.
pub struct AssetCache<S> {
    store: S,
    font: OnceLock<Arc<FontHandle>>,
    templates: Mutex<HashMap<DocumentKind, Arc<DocumentTemplate>>>,
}

impl<S: AssetStore> AssetCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            font: OnceLock::new(),
            templates: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn font(&self) -> Result<Arc<FontHandle>, Error> {
        if let Some(font) = self.font.get() {
            return Ok(font.clone());
        }
        let font = match self.store.font_bytes()? {
            Some(bytes) => FontHandle::load(&bytes)?,
            None => FontHandle::helvetica(),
        };
        // A concurrent loader may have won; either copy is identical.
        Ok(self.font.get_or_init(|| Arc::new(font)).clone())
    }

    pub fn template(&self, kind: DocumentKind) -> Result<Arc<DocumentTemplate>, Error> {
        let cached = self
            .templates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .cloned();
        if let Some(template) = cached {
            return Ok(template);
        }

        let t0 = std::time::Instant::now();
        let template = Arc::new(DocumentTemplate::from_pages(self.store.template_pages(kind)?)?);
        log::info!(
            "Loaded {} template: {} page(s) in {:.1}ms",
            kind.slug(),
            template.len(),
            t0.elapsed().as_secs_f64() * 1000.0
        );

        Ok(self
            .templates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(kind)
            .or_insert(template)
            .clone())
    }
}
