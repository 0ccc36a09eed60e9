use galkin::{Catalog, CatalogConfig, KinematicRecord};
use galkin::{bench_diagnostics, bench_map};

use clap::Parser;
use anyhow::Result;
use serde::Serialize;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "example_catalog.yaml")]
    file_name: String,

    /// Where to write the JSON-lines records; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run the timing benchmarks instead of a catalog
    #[arg(long, default_value_t = false)]
    bench: bool,
}

/// One output row: the galaxy name plus its record fields
#[derive(Serialize)]
struct RecordRow<'a> {
    galaxy: &'a str,
    #[serde(flatten)]
    record: &'a KinematicRecord,
}

// load here to keep main clean
fn load_catalog_from_yaml(file_name: &str) -> Result<CatalogConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("catalogs").join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let catalog_cfg: CatalogConfig = serde_yaml::from_reader(reader)?;

    Ok(catalog_cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_map();
        bench_diagnostics();
        return Ok(());
    }

    let catalog_cfg = load_catalog_from_yaml(&args.file_name)?;
    let catalog = Catalog::build_catalog(catalog_cfg);

    log::info!("analysing {} galaxies", catalog.galaxies.len());
    let results = catalog.analyze();

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut failed = 0usize;
    for (name, result) in &results {
        match result {
            Ok(record) => {
                let row = RecordRow { galaxy: name, record };
                writeln!(out, "{}", serde_json::to_string(&row)?)?;
            }
            Err(err) => {
                // A failed galaxy is skipped, never a partial row
                log::error!("{name}: skipped: {err}");
                failed += 1;
            }
        }
    }
    out.flush()?;

    log::info!("done: {} records, {} skipped", results.len() - failed, failed);
    Ok(())
}
