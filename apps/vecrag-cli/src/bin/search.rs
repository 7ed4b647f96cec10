use std::env;

use vecrag_core::config::{expand_path, Config};
use vecrag_pipeline::{naive_answer, VectorRag, DEFAULT_DB_DIR, DEFAULT_TABLE};

const MAX_K: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load()?;

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: vecrag-search <query> [--limit N] [--db PATH] [--table NAME]");
        std::process::exit(1);
    }

    let mut query = None;
    let mut k = 5usize;
    let mut db_dir = None;
    let mut table = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        k = n;
                        i += 1;
                    } else {
                        eprintln!("Error: --limit requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --limit requires a number");
                    std::process::exit(1);
                }
            }
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
            _ if !args[i].starts_with('-') => query = Some(args[i].clone()),
            _ => {}
        }
        i += 1;
    }

    let Some(query) = query else {
        eprintln!("Error: no query given");
        std::process::exit(1);
    };
    let k = k.clamp(1, MAX_K);
    let db_dir = db_dir.unwrap_or_else(|| {
        config.get("index.db_dir").unwrap_or_else(|_| DEFAULT_DB_DIR.to_string())
    });
    let table = table.unwrap_or_else(|| {
        config.get("index.table").unwrap_or_else(|_| DEFAULT_TABLE.to_string())
    });

    let mut rag = VectorRag::new(expand_path(&db_dir), table);
    let hits = rag.retrieve(&query, k).await?;

    println!("Answer (baseline)\n=================");
    println!("{}", naive_answer(&query, &hits));

    println!("\nRetrieved sources\n=================");
    if hits.is_empty() {
        println!("No hits found.");
    }
    for (i, hit) in hits.iter().enumerate() {
        println!(
            "\n  {}. {} — chunk {}  (distance={:.4})",
            i + 1,
            hit.source,
            hit.chunk_index,
            hit.distance
        );
        let preview: String = hit.text.chars().take(900).collect();
        println!("     {}", preview);
    }
    Ok(())
}
