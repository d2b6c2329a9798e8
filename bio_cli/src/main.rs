use bio_core::*;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bio")]
#[command(about = "Bio-Score from stimulant intakes, sleep and time of day", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the Bio-Score at a point in time (default: now)
    Score {
        /// Evaluation time, e.g. 2024-03-04T12:00
        #[arg(long, value_parser = parse_time)]
        at: Option<NaiveDateTime>,
    },

    /// Show the Bio-Score timeline for one day
    Day {
        /// Calendar date (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Minutes between samples
        #[arg(long)]
        interval: Option<u32>,

        /// Write the timeline to a CSV file instead of printing JSON
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Log a substance intake
    Log {
        /// elvanse, medikinet, medikinet_retard, mate
        #[arg(value_parser = parse_substance)]
        substance: Substance,

        /// Dose in mg (default: the substance's reference dose)
        #[arg(long)]
        dose: Option<f64>,

        /// Intake time (default: now)
        #[arg(long, value_parser = parse_time)]
        at: Option<NaiveDateTime>,
    },

    /// Record last night's sleep
    Sleep {
        /// Sleep duration in minutes
        #[arg(long)]
        minutes: f64,

        /// Tracker confidence (0-100)
        #[arg(long)]
        confidence: Option<f64>,
    },
}

fn main() -> Result<()> {
    bio_core::logging::init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Some(Commands::Score { at }) => cmd_score(&config, at),
        Some(Commands::Day {
            date,
            interval,
            csv,
        }) => cmd_day(&config, date, interval, csv),
        Some(Commands::Log { substance, dose, at }) => cmd_log(&config, substance, dose, at),
        Some(Commands::Sleep {
            minutes,
            confidence,
        }) => cmd_sleep(&config, minutes, confidence),
        None => cmd_score(&config, None),
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn parse_time(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    parse_timestamp(raw).map_err(|e| e.to_string())
}

fn parse_substance(raw: &str) -> std::result::Result<Substance, String> {
    let substance = Substance::from_tag(raw);
    if substance == Substance::Other && raw.trim().to_lowercase() != "other" {
        return Err(format!(
            "unknown substance '{}' (expected elvanse, medikinet, medikinet_retard, mate or other)",
            raw
        ));
    }
    Ok(substance)
}

fn load_sleep(config: &Config) -> Result<SleepSample> {
    let sample = latest_sleep_sample(&config.data.sleep_sample_path())?;
    Ok(sample.unwrap_or_default())
}

fn cmd_score(config: &Config, at: Option<NaiveDateTime>) -> Result<()> {
    let engine = BioEngine::from_config(config)?;
    let target = at.unwrap_or_else(now);

    let lookback = Duration::hours(i64::from(config.timeline.lookback_hours));
    let intakes = list_intakes(
        &config.data.intake_log_path(),
        target - lookback,
        target + Duration::seconds(1),
    )?;
    let sleep = load_sleep(config)?;

    tracing::info!("Scoring {} with {} intakes", target, intakes.len());

    let sample = engine.compose(target, &intakes, sleep.duration_min, sleep.confidence);
    println!("{}", serde_json::to_string_pretty(&sample)?);
    Ok(())
}

fn cmd_day(
    config: &Config,
    date: Option<NaiveDate>,
    interval: Option<u32>,
    csv: Option<PathBuf>,
) -> Result<()> {
    let engine = BioEngine::from_config(config)?;
    let date = date.unwrap_or_else(|| now().date());
    let interval = interval.unwrap_or(config.timeline.interval_minutes);

    let day_start = bio_core::timeline::start_of_day(date)?;
    let lookback = Duration::hours(i64::from(config.timeline.lookback_hours));
    let intakes = list_intakes(
        &config.data.intake_log_path(),
        day_start - lookback,
        day_start + Duration::days(1),
    )?;
    let sleep = load_sleep(config)?;

    let curve = engine.generate_day(date, &intakes, sleep.duration_min, sleep.confidence, interval)?;

    match csv {
        Some(path) => {
            let count = write_day_curve_csv(&curve, &path)?;
            println!("✓ Exported {} samples for {}", count, date);
            println!("  CSV: {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&curve)?),
    }
    Ok(())
}

fn cmd_log(
    config: &Config,
    substance: Substance,
    dose: Option<f64>,
    at: Option<NaiveDateTime>,
) -> Result<()> {
    if let Some(dose) = dose {
        if !dose.is_finite() || dose <= 0.0 {
            return Err(Error::Validation(format!(
                "Dose must be a positive number of mg, got {}",
                dose
            )));
        }
    }
    if !substance.is_tracked() {
        tracing::warn!("Logging untracked substance; it will not affect the Bio-Score");
    }

    let intake = IntakeEvent::new(substance, at.unwrap_or_else(now), dose);
    let mut log = IntakeLog::new(config.data.intake_log_path());
    log.append(&intake)?;

    let engine = BioEngine::from_config(config)?;
    let dose_text = match intake.dose_mg.or_else(|| engine.library().reference_dose(substance)) {
        Some(mg) => format!("{} mg", mg),
        None => "unknown dose".to_string(),
    };

    println!("✓ Logged {} ({}) at {}", substance, dose_text, intake.timestamp);
    Ok(())
}

fn cmd_sleep(config: &Config, minutes: f64, confidence: Option<f64>) -> Result<()> {
    let sample = SleepSample {
        duration_min: Some(minutes),
        confidence,
    };
    save_sleep_sample(&config.data.sleep_sample_path(), &sample, now())?;

    println!(
        "✓ Sleep recorded: {:.1} h (modifier {:+.1})",
        minutes / 60.0,
        bio_core::sleep::modifier(sample.duration_min, sample.confidence)
    );
    Ok(())
}
