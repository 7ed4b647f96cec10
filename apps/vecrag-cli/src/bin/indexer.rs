use std::env;
use std::path::PathBuf;

use vecrag_core::chunker::ChunkParams;
use vecrag_core::config::{expand_path, Config};
use vecrag_pipeline::{VectorRag, DEFAULT_DB_DIR, DEFAULT_TABLE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let args: Vec<String> = env::args().skip(1).collect();
    let mut data_dir = None;
    let mut db_dir = None;
    let mut table = None;
    let mut chunk_size = None;
    let mut overlap = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--db" => {
                if i + 1 < args.len() {
                    db_dir = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Error: --db requires a path");
                    std::process::exit(1);
                }
            }
            "--table" => {
                if i + 1 < args.len() {
                    table = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Error: --table requires a name");
                    std::process::exit(1);
                }
            }
            "--chunk-size" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        chunk_size = Some(n);
                        i += 1;
                    } else {
                        eprintln!("Error: --chunk-size requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --chunk-size requires a number");
                    std::process::exit(1);
                }
            }
            "--overlap" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        overlap = Some(n);
                        i += 1;
                    } else {
                        eprintln!("Error: --overlap requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --overlap requires a number");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => data_dir = Some(PathBuf::from(&args[i])),
            _ => {}
        }
        i += 1;
    }

    let data_dir = data_dir.unwrap_or_else(|| {
        let dir: String = config.get("data.docs_dir").unwrap_or_else(|_| "./data".to_string());
        expand_path(dir)
    });
    let db_dir = db_dir.unwrap_or_else(|| {
        config.get("index.db_dir").unwrap_or_else(|_| DEFAULT_DB_DIR.to_string())
    });
    let table = table.unwrap_or_else(|| {
        config.get("index.table").unwrap_or_else(|_| DEFAULT_TABLE.to_string())
    });
    let defaults = ChunkParams::default();
    let chunking = ChunkParams::validated(
        chunk_size.unwrap_or_else(|| config.get("chunking.size").unwrap_or(defaults.size)),
        overlap.unwrap_or_else(|| config.get("chunking.overlap").unwrap_or(defaults.overlap)),
    )?;

    println!("Vector RAG Indexer\n==================");
    println!("Data directory: {}", data_dir.display());
    println!("Store: {} (collection {})", db_dir, table);

    let mut rag = VectorRag::new(expand_path(&db_dir), table).with_chunking(chunking);
    let count = rag.index_folder(&data_dir).await?;
    if count == 0 {
        println!("\nNo matching documents found under {}", data_dir.display());
    } else {
        println!("\n✅ Indexed {} chunks from {}", count, data_dir.display());
    }
    println!("\n💡 To search, use: cargo run --bin vecrag-search '<query>'");
    Ok(())
}
