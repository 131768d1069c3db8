use std::path::PathBuf;
use std::process::ExitCode;

use thing_secrets::DeviceCredentialBundle;
use thing_secrets_check::{OwnedBundle, Sources, Summary};

#[derive(clap::Parser)]
#[command(name = "thing-secrets-check")]
#[command(about = "Validate a WiFi + AWS IoT credential bundle before flashing")]
struct Cli {
    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Check the bundle compiled into thing-secrets
    Compiled,
    /// Check a bundle assembled from PEM files and values
    Files(FilesArgs),
}

#[derive(clap::Args)]
struct FilesArgs {
    /// AWS IoT endpoint host
    #[arg(long, env = "THING_SECRETS_ENDPOINT")]
    endpoint: String,
    #[arg(long, env = "THING_SECRETS_THING_NAME")]
    thing_name: String,
    #[arg(long, env = "THING_SECRETS_WIFI_SSID")]
    wifi_ssid: String,
    /// Empty for an open network
    #[arg(long, env = "THING_SECRETS_WIFI_PASS", default_value = "", hide_env_values = true)]
    wifi_pass: String,
    /// Root CA PEM file
    #[arg(long, env = "THING_SECRETS_ROOT_CA")]
    root_ca: PathBuf,
    /// Device certificate PEM file
    #[arg(long, env = "THING_SECRETS_CERT")]
    cert: PathBuf,
    /// Device private key PEM file
    #[arg(long, env = "THING_SECRETS_KEY")]
    key: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli: Cli = clap::Parser::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Compiled => check(&thing_secrets::secrets::SECRETS, cli.json),
        Commands::Files(args) => {
            let owned = OwnedBundle::load(Sources {
                iot_endpoint_host: args.endpoint,
                thing_name: args.thing_name,
                wifi_ssid: args.wifi_ssid,
                wifi_passphrase: args.wifi_pass,
                root_ca: args.root_ca,
                device_certificate: args.cert,
                device_private_key: args.key,
            })?;
            check(&owned.as_bundle(), cli.json)
        }
    }
}

fn check(bundle: &DeviceCredentialBundle<'_>, json: bool) -> anyhow::Result<ExitCode> {
    let summary = Summary::of(bundle);
    summary.write(json, &mut std::io::stdout().lock())?;

    Ok(if summary.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
