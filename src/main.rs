use anyhow::Result;
use clap::{Parser, ValueEnum};
use kodi2jellyfin::matching::TieBreakStrategy;
use kodi2jellyfin::migrate::KodiTimeZone;
use kodi2jellyfin::{MigrationConfig, MigrationPipeline};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "kodi2jellyfin")]
#[command(about = "Copy Kodi watch history into a Jellyfin data directory", long_about = None)]
struct Args {
    /// A dump of Kodi's watch status (strPath, strFileName, lastPlayed, playCount)
    kodi_tsv: String,

    /// A Jellyfin data directory. Don't be crazy, make a copy and stop Jellyfin first!
    jellyfin_data_dir: String,

    /// The Jellyfin user whose watched status should be updated
    #[arg(long)]
    jellyfin_username: String,

    /// How to choose between library items sharing a file name
    #[arg(long, value_enum, default_value = "longest-suffix")]
    tie_break: TieBreakArg,

    /// Match file names regardless of container extension
    #[arg(long)]
    ignore_extension: bool,

    /// Kodi timestamps are local time (converted to UTC for Jellyfin)
    #[arg(long)]
    local_time: bool,

    /// Match and report, but don't write anything
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TieBreakArg {
    /// Prefer the item sharing the most parent directories
    LongestSuffix,
    /// Report every shared file name as ambiguous
    Strict,
}

impl From<TieBreakArg> for TieBreakStrategy {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::LongestSuffix => TieBreakStrategy::LongestSuffix,
            TieBreakArg::Strict => TieBreakStrategy::Strict,
        }
    }
}

fn config_from_args(args: Args) -> MigrationConfig {
    // Expand ~ in paths
    let kodi_tsv = PathBuf::from(shellexpand::tilde(&args.kodi_tsv).as_ref());
    let data_dir = PathBuf::from(shellexpand::tilde(&args.jellyfin_data_dir).as_ref());

    let time_zone = if args.local_time {
        KodiTimeZone::Local
    } else {
        KodiTimeZone::Utc
    };

    MigrationConfig::new(kodi_tsv, data_dir, args.jellyfin_username)
        .with_tie_break(args.tie_break.into())
        .with_ignore_extension(args.ignore_extension)
        .with_kodi_time_zone(time_zone)
        .with_dry_run(args.dry_run)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    log::info!("Kodi -> Jellyfin watch history migration");
    log::info!("===========================================");

    let config = config_from_args(args);

    if config.dry_run {
        log::info!("Dry run - Jellyfin data will not be modified");
    }

    let mut pipeline = MigrationPipeline::open(config)?;
    let report = pipeline.migrate()?;
    report.log_summary();

    if report.has_failures() {
        log::error!(
            "{} watch state(s) could not be written; review before restarting Jellyfin",
            report.summary().write_errors
        );
        return Ok(ExitCode::FAILURE);
    }

    log::info!("Done. Copy the data directory back and restart Jellyfin.");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> MigrationConfig {
        let mut argv = vec!["kodi2jellyfin", "--jellyfin-username", "alice"];
        argv.extend_from_slice(extra);
        argv.extend_from_slice(&["kodi.tsv", "data"]);
        config_from_args(Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.kodi_time_zone, KodiTimeZone::Utc);
        assert_eq!(config.tie_break, TieBreakStrategy::LongestSuffix);
        assert!(!config.dry_run);
        assert!(!config.ignore_extension);
        assert_eq!(config.jellyfin_username, "alice");
    }

    #[test]
    fn test_flags_reach_config() {
        let config = parse(&["--local-time", "--tie-break", "strict", "--dry-run", "--ignore-extension"]);
        assert_eq!(config.kodi_time_zone, KodiTimeZone::Local);
        assert_eq!(config.tie_break, TieBreakStrategy::Strict);
        assert!(config.dry_run);
        assert!(config.ignore_extension);
        assert_eq!(config.kodi_export, PathBuf::from("kodi.tsv"));
    }
}
