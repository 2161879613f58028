//! Command-line interface for the spotlight binary.
//!
//! The CLI runs the repository pipeline for one user and prints the widget as
//! text, JSON or SVG, either to stdout or to a file.

use std::{
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
    process,
    time::Duration,
};

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use spotlight::{
    Error, OctocrabSource, SpotlightConfig, WidgetController, WidgetState, load_config,
    render_json, render_svg, render_text, widget_view, write_output,
};
use tracing_subscriber::EnvFilter;

/// Command line interface for rendering a top-repositories widget.
#[derive(Debug, Parser,)]
#[command(name = "spotlight", version, about = "Show a GitHub user's top repositories")]
struct Cli
{
    /// GitHub account whose repositories are ranked.
    #[arg(long = "user", short = 'u', value_name = "LOGIN", env = "SPOTLIGHT_USER")]
    user: String,

    /// Optional YAML configuration file.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the rendered widget to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    output: Option<PathBuf,>,

    /// Override the REST API base URL.
    #[arg(long = "api-base", value_name = "URL", env = "SPOTLIGHT_API_BASE")]
    api_base: Option<String,>,

    /// Override the per-request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS")]
    timeout: Option<u64,>,

    /// Override the number of repositories shown.
    #[arg(long = "limit", value_name = "N")]
    limit: Option<usize,>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum,)]
enum OutputFormat
{
    Text,
    Json,
    Svg,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    init_tracing();

    match run(Cli::parse(),).await {
        Ok(true,) => {}
        Ok(false,) => process::exit(1,),
        Err(error,) => {
            eprintln!("{}", error.to_display_string());
            process::exit(1,);
        }
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

/// Executes the CLI using parsed arguments.
///
/// Returns `false` when the pipeline ended in the failed state; the failure
/// message is part of the rendered widget in that case.
///
/// # Errors
///
/// Propagates configuration, client and output errors.
async fn run(cli: Cli,) -> Result<bool, Error,>
{
    let config = resolve_config(&cli,)?;
    let source = OctocrabSource::from_config(&config,)?;
    let controller = WidgetController::new();

    let spinner = loading_spinner(cli.format, &cli.user,);
    controller.refresh(&source, &cli.user, &config,).await;
    if let Some(spinner,) = spinner {
        spinner.finish_and_clear();
    }

    let state = controller.state();
    let view = widget_view(&state, cli.user.trim(), config.description_limit,);
    let rendered = match cli.format {
        OutputFormat::Text => render_text(&view, cli.user.trim(),),
        OutputFormat::Json => render_json(&view,)?,
        OutputFormat::Svg => render_svg(&view, cli.user.trim(),),
    };

    emit(cli.output.as_deref(), &rendered,)?;

    Ok(!matches!(state, WidgetState::Failed { .. }),)
}

/// Merges the optional configuration file with command-line overrides.
fn resolve_config(cli: &Cli,) -> Result<SpotlightConfig, Error,>
{
    let mut config = match cli.config.as_deref() {
        Some(path,) => load_config(path,)?,
        None => SpotlightConfig::default(),
    };

    if let Some(api_base,) = cli.api_base.as_deref() {
        config.api_base = api_base.trim().to_owned();
    }
    if let Some(timeout,) = cli.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(limit,) = cli.limit {
        config.result_limit = limit;
    }

    config.validate()?;
    Ok(config,)
}

fn loading_spinner(format: OutputFormat, user: &str,) -> Option<ProgressBar,>
{
    if format != OutputFormat::Text || !io::stderr().is_terminal() {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style,) = ProgressStyle::with_template("{spinner} {msg}",) {
        spinner.set_style(style,);
    }
    spinner.set_message(format!("Loading repositories for {}", user.trim()),);
    spinner.enable_steady_tick(Duration::from_millis(100,),);
    Some(spinner,)
}

fn emit(output: Option<&Path,>, rendered: &str,) -> Result<(), Error,>
{
    match output {
        Some(path,) => write_output(path, rendered,),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(rendered.as_bytes(),)
                .and_then(|()| handle.flush(),)
                .map_err(|source| spotlight::io_error(Path::new("<stdout>",), source,),)
        }
    }
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use clap::Parser;
    use tempfile::tempdir;

    use super::{Cli, OutputFormat, resolve_config};

    #[test]
    fn cli_parses_defaults()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--user", "alice",],)
            .expect("failed to parse CLI",);

        assert_eq!(cli.user, "alice");
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.output.is_none());

        let config = resolve_config(&cli,).expect("default config",);
        assert_eq!(config.result_limit, 5);
        assert_eq!(config.api_base, "https://api.github.com");
    }

    #[test]
    fn flags_override_config_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("spotlight.yaml",);
        fs::write(&path, "result_limit: 3\nrequest_timeout_secs: 4\n",)
            .expect("failed to write config",);

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "--user",
            "alice",
            "--config",
            path.to_str().expect("utf8",),
            "--limit",
            "2",
            "--api-base",
            "http://127.0.0.1:8080",
            "--format",
            "svg",
        ],)
        .expect("failed to parse CLI",);

        let config = resolve_config(&cli,).expect("config should resolve",);
        assert_eq!(cli.format, OutputFormat::Svg);
        assert_eq!(config.result_limit, 2);
        assert_eq!(config.request_timeout_secs, 4);
        assert_eq!(config.api_base, "http://127.0.0.1:8080");
    }

    #[test]
    fn zero_limit_is_rejected()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--user", "alice", "--limit", "0",],)
            .expect("failed to parse CLI",);

        let error = resolve_config(&cli,).expect_err("expected validation error",);
        assert!(matches!(error, spotlight::Error::Validation { .. }));
    }

    #[test]
    fn user_is_required()
    {
        let result = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--format", "json",],);
        if std::env::var_os("SPOTLIGHT_USER",).is_none() {
            assert!(result.is_err());
        }
    }
}
