use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use paperform_pdf::{
    AssetCache, BillRecord, DirAssetStore, DocumentKind, DocumentTemplate, Error, FontHandle,
    RenderRequest,
};

#[derive(Parser)]
#[command(name = "paperform-pdf", about = "Render a bill record onto its PDF stationery")]
struct Cli {
    /// Bill record as JSON
    record: PathBuf,

    /// Output PDF path
    #[arg(short, long, default_value = "output.pdf")]
    output: PathBuf,

    /// Override the document kind stored in the record
    #[arg(short, long)]
    kind: Option<DocumentKind>,

    /// TrueType/OpenType font (defaults to the assets directory, then Helvetica)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Template page image, repeat in page order
    #[arg(long = "template")]
    templates: Vec<PathBuf>,

    /// Assets directory (defaults to $PAPERFORM_ASSETS)
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Date printed when the record has none (defaults to today)
    #[arg(long)]
    as_of: Option<String>,
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut record: BillRecord = serde_json::from_slice(&std::fs::read(&cli.record)?)?;
    if let Some(kind) = cli.kind {
        record.kind = kind;
    }

    let store = cli
        .assets_dir
        .map(DirAssetStore::new)
        .or_else(DirAssetStore::from_env);
    let cache = store.map(AssetCache::new);

    let font = match (&cli.font, &cache) {
        (Some(path), _) => Arc::new(FontHandle::load(&std::fs::read(path)?)?),
        (None, Some(cache)) => cache.font()?,
        (None, None) => Arc::new(FontHandle::helvetica()),
    };

    let template = if !cli.templates.is_empty() {
        let pages = cli
            .templates
            .iter()
            .map(std::fs::read)
            .collect::<Result<Vec<_>, _>>()?;
        Arc::new(DocumentTemplate::from_pages(pages)?)
    } else if let Some(cache) = &cache {
        cache.template(record.kind)?
    } else {
        return Err(Error::Asset(
            "no template: pass --template or --assets-dir".into(),
        ));
    };

    let as_of = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().format("%d/%m/%Y").to_string());

    let request = RenderRequest::new(record, template, font, as_of);
    let bytes = paperform_pdf::generate(&request)?;
    std::fs::write(&cli.output, &bytes)?;
    log::info!("Wrote {}", cli.output.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
