use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use vax_projection::config::ImageFormat;
use vax_projection::{AlwaysRefresh, Client, Config, KeepExisting, RefreshDecider};
use vax_projection::{pipeline, stats, storage};

#[derive(Parser, Debug)]
#[command(
    name = "vaxproj",
    version,
    about = "Project a full COVID-19 vaccination date from daily vaccination data"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch data, fit the trend and project (optionally plot, log and print stats).
    Project(ProjectArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FigureFormat {
    Png,
    Svg,
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// ISO3 country code to project (e.g., USA)
    #[arg(short, long)]
    country: Option<String>,
    /// Path of the cached vaccination CSV.
    #[arg(long)]
    data: Option<PathBuf>,
    /// URL of the vaccination CSV feed.
    #[arg(long)]
    url: Option<String>,
    /// Replace an existing data file without asking.
    #[arg(long, conflicts_with = "keep_data")]
    refresh: bool,
    /// Never replace an existing data file (no prompt).
    #[arg(long)]
    keep_data: bool,
    /// Population threshold for "fully vaccinated".
    #[arg(long)]
    threshold: Option<f64>,
    /// Legend label of the threshold line.
    #[arg(long)]
    threshold_label: Option<String>,
    /// Projection horizon in days from the first observed date.
    #[arg(long)]
    horizon: Option<f64>,
    /// Number of sample points of the projection grid.
    #[arg(long)]
    samples: Option<usize>,
    /// Doses needed per fully vaccinated person.
    #[arg(long)]
    doses: Option<f64>,
    /// Projection log path.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Do not append to the projection log.
    #[arg(long)]
    no_log: bool,
    /// Do not write chart images.
    #[arg(long)]
    no_figures: bool,
    /// Directory for chart images.
    #[arg(long)]
    figure_dir: Option<PathBuf>,
    /// Chart image format.
    #[arg(long, value_enum)]
    format: Option<FigureFormat>,
    /// Width of the charts.
    #[arg(long)]
    width: Option<u32>,
    /// Height of the charts.
    #[arg(long)]
    height: Option<u32>,
    /// Locale for axis labels (en, de, fr, es, it, pt, nl).
    #[arg(long)]
    locale: Option<String>,
    /// TTF font used for chart text.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Print summary statistics of the observed series and the fit.
    #[arg(long, default_value_t = false)]
    stats: bool,
    /// Save the projection curve to file (format inferred by --out-format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format of --out (csv or json).
    #[arg(long, value_enum)]
    out_format: Option<OutFormat>,
    /// Run as if today were this date (YYYY-MM-DD).
    #[arg(long, hide = true)]
    today: Option<NaiveDate>,
}

/// Asks on the terminal until it reads y or n; end of input means "n".
struct TerminalPrompt;

impl RefreshDecider for TerminalPrompt {
    fn should_refresh(&mut self, path: &Path) -> bool {
        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            println!(
                "Should the existing {} be replaced by updated data? (y/n)",
                path.display()
            );
            match lines.next() {
                Some(Ok(line)) => match line.trim() {
                    "y" | "Y" => return true,
                    "n" => return false,
                    _ => continue,
                },
                _ => return false,
            }
        }
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Project(args) => cmd_project(args),
    }
}

fn build_config(args: &ProjectArgs) -> Result<Config> {
    let mut cfg = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(c) = &args.country {
        cfg.country_code = c.trim().to_ascii_uppercase();
    }
    if let Some(p) = &args.data {
        cfg.data_path = p.clone();
    }
    if let Some(u) = &args.url {
        cfg.data_url = u.clone();
    }
    if args.refresh {
        cfg.always_refresh = true;
    }
    if let Some(t) = args.threshold {
        cfg.population_threshold = t;
    }
    if let Some(l) = &args.threshold_label {
        cfg.threshold_label = l.clone();
    }
    if let Some(h) = args.horizon {
        cfg.projection_horizon_days = h;
    }
    if let Some(n) = args.samples {
        cfg.samples = n;
    }
    if let Some(d) = args.doses {
        cfg.doses_per_person = d;
    }
    if let Some(p) = &args.log {
        cfg.log_path = p.clone();
    }
    if args.no_log {
        cfg.log_projections = false;
    }
    if args.no_figures {
        cfg.save_figures = false;
    }
    if let Some(d) = &args.figure_dir {
        cfg.figure_dir = d.clone();
    }
    if let Some(f) = args.format {
        cfg.image_format = match f {
            FigureFormat::Png => ImageFormat::Png,
            FigureFormat::Svg => ImageFormat::Svg,
        };
    }
    if let Some(w) = args.width {
        cfg.chart_width = w;
    }
    if let Some(h) = args.height {
        cfg.chart_height = h;
    }
    if let Some(l) = &args.locale {
        cfg.locale = l.clone();
    }
    if let Some(f) = &args.font {
        cfg.font_path = Some(f.clone());
    }
    Ok(cfg)
}

fn cmd_project(args: ProjectArgs) -> Result<()> {
    let cfg = build_config(&args)?;
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let client = Client::new()?;

    let mut decider: Box<dyn RefreshDecider> = if args.keep_data {
        Box::new(KeepExisting)
    } else if cfg.always_refresh {
        Box::new(AlwaysRefresh)
    } else {
        Box::new(TerminalPrompt)
    };

    let run = pipeline::run(&cfg, today, &client, decider.as_mut())
        .context("projection run failed")?;

    for path in &run.report.charts {
        eprintln!("Wrote chart to {}", path.display());
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.out_format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        let curve = &run.analysis.projection.curve;
        match fmt.as_str() {
            "csv" => storage::save_curve_csv(curve, path)?,
            "json" => storage::save_curve_json(curve, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} curve points to {}", curve.len(), path.display());
    }

    if args.stats {
        let a = &run.analysis;
        let s = stats::summarize(&a.country.series.values());
        println!(
            "{} • daily vaccinations  count={} min={} max={} mean={} median={}",
            a.country.country_code,
            s.count,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
        println!(
            "{} • trend  slope={} intercept={} r2={}  fully_vaccinated_today={}",
            a.country.country_code,
            fmt_opt(Some(a.trend.slope)),
            fmt_opt(Some(a.trend.intercept)),
            fmt_opt(Some(a.trend.r_squared)),
            a.country.people_fully_vaccinated_today
        );
    }

    println!("{}", run.report.message);
    Ok(())
}
