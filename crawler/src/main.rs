use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Scan a directory into JSONL documents as the search engine would index them")]
struct Cli {
    /// Directory to scan recursively
    #[arg(long, default_value = "./data")]
    root: String,
    /// Output JSONL file path (stdout when omitted)
    #[arg(long)]
    output: Option<String>,
}

#[derive(Serialize)]
struct OutDoc<'a> {
    id: &'a str,
    title: &'a str,
    content: &'a str,
    source_path: &'a str,
    timestamp: &'a str,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let args = Cli::parse();

    let docs = crawler::scan_directory(&args.root);
    let out: Box<dyn Write> = match &args.output {
        Some(path) => {
            if let Some(dir) = Path::new(path).parent() {
                fs::create_dir_all(dir).ok();
            }
            Box::new(File::create(path)?)
        }
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(out);

    let ts = time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    for doc in &docs {
        let rec = OutDoc { id: &doc.id, title: &doc.title, content: &doc.content, source_path: &doc.source_path, timestamp: &ts };
        serde_json::to_writer(&mut out, &rec)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    tracing::info!(emitted = docs.len(), root = %args.root, "done");
    Ok(())
}
