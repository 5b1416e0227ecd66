use anyhow::{bail, Context, Result};
use budgetsheet::{
    config::Config,
    fetch::{load_table, urls, Source},
    process::{self, RawTable},
    report::{self, format_idr, month_name, PersonFilter, ReportFilter},
    watch,
};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use reqwest::Client;
use serde::Serialize;
use std::{path::PathBuf, process::ExitCode};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Budget realisation figures from a shared spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "budgetsheet")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Sheet link or CSV URL (overrides the configured one)
    #[arg(short, long, value_name = "URL", global = true, conflicts_with = "file")]
    source: Option<String>,

    /// Read the CSV from a local file instead
    #[arg(short, long, value_name = "PATH", global = true)]
    file: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals, absorption and per-division figures
    Summary,
    /// Workload per team member
    Personnel {
        #[arg(short, long)]
        bidang: Option<String>,
        /// Part of a name, any case
        #[arg(long)]
        search: Option<String>,
    },
    /// Monthly and year-to-date realisation
    Report {
        /// Defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
        /// 1-12, defaults to the current month
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        #[arg(short, long)]
        bidang: Option<String>,
    },
    /// Write the (optionally filtered) rows back out as CSV
    Export {
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
        #[arg(short, long)]
        bidang: Option<String>,
    },
    /// Print the normalised table as JSON
    Dump,
    /// Re-fetch on an interval and log the totals until Ctrl-C
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    // ─── 1) config ───────────────────────────────────────────────────
    let cfg = Config::load(args.config.as_deref())?;

    // ─── 2) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 3) source & client ──────────────────────────────────────────
    let source = resolve_source(args, &cfg)?;
    let client = Client::builder()
        .timeout(cfg.request_timeout())
        .build()
        .context("building HTTP client")?;
    info!(%source, "using source");

    if let Command::Watch = args.command {
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        watch::watch(&client, &source, cfg.retry(), cfg.poll_interval(), shutdown).await;
        return Ok(());
    }

    // ─── 4) load once & run the command ──────────────────────────────
    let table = load_table(&client, &source, cfg.retry()).await?;

    match &args.command {
        Command::Summary => print_summary(&table, args.json),
        Command::Personnel { bidang, search } => {
            let filter = PersonFilter {
                bidang: bidang.clone(),
                search: search.clone(),
            };
            print_personnel(&table, &filter, args.json)
        }
        Command::Report {
            year,
            month,
            bidang,
        } => {
            let today = Local::now().date_naive();
            let filter = ReportFilter {
                year: year.unwrap_or_else(|| today.year()),
                month: month.unwrap_or_else(|| today.month()),
                bidang: bidang.clone(),
            };
            print_report(&table, &filter, today.year(), args.json)
        }
        Command::Export { out, bidang } => {
            let filtered = report::filter_by_bidang(&table, bidang.as_deref());
            if filtered.rows.is_empty() {
                warn!("no rows to export; nothing written");
                return Ok(());
            }
            tokio::fs::write(out, process::to_csv(&filtered))
                .await
                .with_context(|| format!("writing {}", out.display()))?;
            info!(rows = filtered.rows.len(), path = %out.display(), "exported");
            Ok(())
        }
        Command::Dump => print_json(&table),
        Command::Watch => Ok(()),
    }
}

fn resolve_source(args: &Args, cfg: &Config) -> Result<Source> {
    if let Some(path) = &args.file {
        return Ok(Source::File(path.clone()));
    }
    if let Some(arg) = &args.source {
        return Ok(urls::source_from_arg(arg)?);
    }
    match &cfg.sheet_url {
        Some(url) => Ok(Source::Url(urls::export_url(url)?)),
        None => bail!("no source configured: pass --source/--file or set SHEET_URL"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialising output")?;
    println!("{out}");
    Ok(())
}

fn print_summary(table: &RawTable, json: bool) -> Result<()> {
    let kpis = report::kpis(table);
    let stats = report::bidang_stats(table);
    let bidang = report::bidang_summary(table);
    let mak = report::mak_summary(table);

    if json {
        #[derive(Serialize)]
        struct Summary<'a> {
            kpis: report::Kpis,
            bidang_stats: &'a [report::BidangStat],
            bidang_summary: &'a [report::GroupTotal],
            mak_summary: &'a [report::GroupTotal],
        }
        return print_json(&Summary {
            kpis,
            bidang_stats: &stats,
            bidang_summary: &bidang,
            mak_summary: &mak,
        });
    }

    println!("Total costsheet   {}", format_idr(kpis.total_costsheet));
    println!("Total realisasi   {}", format_idr(kpis.total_realisasi));
    println!("Total outstanding {}", format_idr(kpis.total_outstanding));
    println!("Penyerapan        {:.1}%", kpis.absorption_pct);

    println!("\nBidang");
    for s in &stats {
        println!(
            "  {:<12} {:>4} ST  {:>20}  sisa {:>20}",
            s.bidang,
            s.st_count,
            format_idr(s.realisasi),
            format_idr(s.outstanding)
        );
    }
    println!("\nMAK");
    for g in &mak {
        println!("  {:<40} {:>20}", g.key, format_idr(g.total));
    }
    Ok(())
}

fn print_personnel(table: &RawTable, filter: &PersonFilter, json: bool) -> Result<()> {
    let people = report::personnel(table, filter);
    if json {
        return print_json(&people);
    }
    if people.is_empty() {
        println!("no matching personnel");
    }
    for p in &people {
        println!(
            "  [{}] {:<32} {:<8} {:>3} tugas  {:>20}",
            p.initials(),
            p.name,
            p.bidang,
            p.tasks.len(),
            format_idr(p.accumulated)
        );
    }
    Ok(())
}

fn print_report(table: &RawTable, filter: &ReportFilter, current_year: i32, json: bool) -> Result<()> {
    let rep = report::realisasi_report(table, filter);
    if json {
        return print_json(&rep);
    }
    let month = month_name(filter.month).unwrap_or("?");
    let years: Vec<String> = report::available_years(table, current_year)
        .iter()
        .map(|y| y.to_string())
        .collect();

    println!("Tahun tersedia: {}", years.join(", "));
    println!(
        "{} {}: {} ({} baris)",
        month,
        filter.year,
        format_idr(rep.monthly_total),
        rep.monthly.len()
    );
    for r in &rep.monthly {
        println!("  {}  {:>20}", r.date.format("%d-%m-%Y"), format_idr(r.realisasi));
    }
    println!(
        "{}: {} ({} baris)",
        cumulative_heading(filter.year),
        format_idr(rep.cumulative_total),
        rep.cumulative.len()
    );
    Ok(())
}

/// The cumulative view spans the whole year, not just up to the month.
fn cumulative_heading(year: i32) -> String {
    format!("Kumulatif {year}")
}
