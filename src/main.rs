use std::path::PathBuf;

use anyhow::{Context, Result};
use beir_loader::{GenericDataLoader, LoaderConfig};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "beir-loader")]
#[command(about = "Load a BEIR-style dataset and print a summary")]
struct Args {
    /// Dataset directory
    data_folder: PathBuf,

    /// Split whose qrels are loaded (train, dev, test, ...)
    #[arg(long, default_value = "test")]
    split: String,

    /// Prefix for the query file and qrels folder, e.g. `msmarco`
    #[arg(long)]
    prefix: Option<String>,

    #[arg(long, default_value = beir_loader::data::loader::DEFAULT_CORPUS_FILE)]
    corpus_file: String,

    #[arg(long, default_value = beir_loader::data::loader::DEFAULT_QUERY_FILE)]
    query_file: String,

    #[arg(long, default_value = beir_loader::data::loader::DEFAULT_QRELS_FOLDER)]
    qrels_folder: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = LoaderConfig::default()
        .with_data_folder(&args.data_folder)
        .with_corpus_file(args.corpus_file)
        .with_query_file(args.query_file)
        .with_qrels_folder(args.qrels_folder);
    if let Some(prefix) = args.prefix {
        config = config.with_prefix(prefix);
    }

    let mut loader = GenericDataLoader::from_config(config);
    let (corpus, queries, qrels) = loader.load(&args.split).with_context(|| {
        format!(
            "loading split '{}' from {}",
            args.split,
            args.data_folder.display()
        )
    })?;

    info!("Finished loading {}", args.data_folder.display());
    println!("documents:       {}", corpus.len());
    println!("queries:         {}", queries.len());
    println!("judged queries:  {}", qrels.len());
    println!("judgments:       {}", qrels.num_judgments());
    Ok(())
}
