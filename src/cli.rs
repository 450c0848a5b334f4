// src/cli.rs
use std::{env, path::PathBuf};

use crate::params::Params;
use crate::progress::ConsoleProgress;
use crate::runner;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut params = Params::new();
    parse_cli(&mut params)?;

    let mut progress = ConsoleProgress::default();
    let summary = runner::run(&params, Some(&mut progress))?;

    if !params.index_only {
        println!("Scraped {} characters, {} failed.", summary.scraped, summary.failed.len());
    }
    if !summary.index_files.is_empty() {
        println!("Wrote {} index files.", summary.index_files.len());
    }
    Ok(())
}

fn parse_cli(params: &mut Params) -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str()
        {
            "-c" | "--chars" => {
                let v = args.next().ok_or("Missing value for --chars")?;
                params.chars_file = Some(PathBuf::from(v));}
            "-o" | "--out" => params.out = PathBuf::from(args.next().ok_or("Missing output dir")?),
            "-n" | "--limit" => {
                let v: usize = args.next().ok_or("Missing value for --limit")?.parse()?;
                params.limit = Some(v);}
            "--start" => params.start = args.next().ok_or("Missing value for --start")?.parse()?,
            "--ids" => {
                let v = args.next().ok_or("Missing value for --ids")?;
                params.ids_filter = Some(parse_ids_list(&v));}
            "--delay-ms" => params.delay_ms = args.next().ok_or("Missing value for --delay-ms")?.parse()?,
            "--index-only" => params.index_only = true,
            "--skip-index" => params.skip_index = true,
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    if !params.index_only && params.chars_file.is_none() {
        return Err("Specify --chars <file> (or --index-only)".into());
    }
    Ok(())
}

fn parse_ids_list(s: &str) -> Vec<String> {
    let mut out: Vec<String> = s
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
