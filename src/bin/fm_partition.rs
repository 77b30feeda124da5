//! Minimal CLI driver for the Fiduccia-Mattheyses partitioner.
//!
//! Reads a whitespace/comma-separated square 0/1 adjacency matrix from a
//! file (one row per line) and prints the resulting cutset and partition.

#![forbid(unsafe_code)]

use std::{env, fs, path::Path};

use fm_partition::{Partitioner, Side};
use serde::Serialize;

#[derive(Serialize)]
struct PartitionResult {
    cutset: i64,
    block_a: Vec<usize>,
    block_b: Vec<usize>,
}

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

/// Splits on commas or whitespace, ignores empty tokens and `#` comments.
fn load_matrix_csv(path: &Path) -> anyhow::Result<Vec<Vec<i64>>> {
    let text = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    for line in text.lines() {
        let line = match line.split_once('#') {
            Some((head, _)) => head,
            None => line,
        };
        let row: Vec<i64> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tok| !tok.is_empty())
            .map(|tok| tok.parse::<i64>())
            .collect::<Result<_, _>>()?;
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "fm_partition=info".into()))
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();

    let matrix_path = parse_flag(&args, "--matrix")
        .ok_or_else(|| anyhow::anyhow!("usage: fm_partition --matrix <path> [--restrict i,j,...] [--format text|json]"))?;
    let restrictions: Vec<usize> = parse_flag(&args, "--restrict")
        .map(|s| {
            s.split(',')
                .filter(|tok| !tok.is_empty())
                .map(|tok| tok.parse::<usize>())
                .collect::<Result<_, _>>()
        })
        .transpose()?
        .unwrap_or_default();
    let format = parse_flag(&args, "--format").unwrap_or_else(|| "text".into());

    let rows = load_matrix_csv(Path::new(&matrix_path))?;
    let mut partitioner = Partitioner::from_rows(rows, &restrictions)?;

    let cutset = partitioner.find_mincut();
    tracing::info!(cutset, "mincut converged");

    let block_a: Vec<usize> = partitioner.cells_in(Side::A).into_iter().map(|c| c.as_usize()).collect();
    let block_b: Vec<usize> = partitioner.cells_in(Side::B).into_iter().map(|c| c.as_usize()).collect();

    match format.as_str() {
        "json" => {
            let result = PartitionResult { cutset, block_a, block_b };
            println!("{}", serde_json::to_string(&result)?);
        }
        _ => {
            println!("cutset: {cutset}");
            println!("block A ({}): {:?}", block_a.len(), block_a);
            println!("block B ({}): {:?}", block_b.len(), block_b);
        }
    }

    Ok(())
}
