//! ArmoníaPlus command-line tools
//!
//! Usage:
//!   armonia fir --filters hp:80 ls:200,3     - Design (and optionally upload) an FIR filter
//!   armonia status                           - List all devices
//!   armonia online                           - List online devices
//!   armonia set-fir <ID> <CH> --values ...   - Upload raw FIR coefficients
//!   armonia group create --link ID:CH ...    - Group channels

mod fir;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ap_connector::{ConnectionConfig, DeviceClient, GroupLink};

use crate::fir::{FirArgs, Target};

#[derive(Parser, Debug)]
#[command(name = "armonia", version, about = "ArmoníaPlus FIR design and device control")]
struct Cli {
    /// Controller API base URL (default: $ARMONIA_API_URL or the local controller)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Client token (default: $ARMONIA_AUTH_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Design FIR filters and optionally apply them to a device
    Fir(FirArgs),
    #[command(flatten)]
    Controller(ControllerCommand),
}

#[derive(Subcommand, Debug)]
enum ControllerCommand {
    /// List all devices
    Status,
    /// List online devices
    Online,
    /// Show details for one device
    Device {
        /// Device unique ID
        id: String,
    },
    /// Set Advanced EQ gain
    EqGain {
        id: String,
        channel: u32,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Set Advanced EQ delay
    EqDelay {
        id: String,
        channel: u32,
        value: f64,
    },
    /// Set Output EQ gain
    OutputGain {
        id: String,
        channel: u32,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Set Output EQ phase inversion
    OutputPhase {
        id: String,
        channel: u32,
        #[arg(action = clap::ArgAction::Set)]
        invert: bool,
    },
    /// Upload raw FIR coefficients
    SetFir {
        id: String,
        channel: u32,
        /// Comma-separated coefficients
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        values: Vec<f64>,
        #[arg(long, value_enum, default_value_t = Target::Output)]
        target: Target,
    },
    /// Channel groups
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },
    /// Open a device's detail view in the controller
    OpenEntity {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum GroupAction {
    /// Create a group and assign the channels to it
    Create {
        /// Channel as ID:CH (repeatable)
        #[arg(long = "link", required = true)]
        links: Vec<String>,
    },
    /// Remove the channels from their group
    Unassign {
        /// Channel as ID:CH (repeatable)
        #[arg(long = "link", required = true)]
        links: Vec<String>,
    },
}

impl Cli {
    fn connection_config(&self) -> ConnectionConfig {
        let mut config = ConnectionConfig::from_env();
        if let Some(url) = &self.url {
            config.api_url = url.clone();
        }
        if let Some(token) = &self.token {
            config = config.with_token(token.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.connection_config();

    match cli.command {
        Commands::Fir(args) => fir::run(args, config).await,
        Commands::Controller(command) => run_controller(command, config).await,
    }
}

fn parse_links(links: &[String]) -> Result<Vec<GroupLink>> {
    links
        .iter()
        .map(|s| GroupLink::parse(s).context("Failed to parse --link"))
        .collect()
}

async fn run_controller(command: ControllerCommand, config: ConnectionConfig) -> Result<()> {
    let client = DeviceClient::new(config).context("Invalid connection settings")?;

    match command {
        ControllerCommand::Status => {
            let status = client.system_status().await?;
            if status.devices.is_empty() {
                println!("No devices found");
            }
            for (i, device) in status.devices.iter().enumerate() {
                println!("{}. {}", i + 1, device);
            }
        }
        ControllerCommand::Online => {
            let online = client.online_devices().await?;
            if online.is_empty() {
                println!("No online devices");
            }
            for (i, device) in online.iter().enumerate() {
                println!("{}. {}", i + 1, device);
            }
        }
        ControllerCommand::Device { id } => {
            let device = client.device_details(&id).await?;
            println!("{}", device.details());
        }
        ControllerCommand::EqGain { id, channel, value } => {
            client.set_advanced_eq_gain(&id, channel, value).await?;
            println!("Advanced EQ gain set to {value} dB on {id}, channel {channel}");
        }
        ControllerCommand::EqDelay { id, channel, value } => {
            client.set_advanced_eq_delay(&id, channel, value).await?;
            println!("Advanced EQ delay set to {value} on {id}, channel {channel}");
        }
        ControllerCommand::OutputGain { id, channel, value } => {
            client.set_output_eq_gain(&id, channel, value).await?;
            println!("Output EQ gain set to {value} dB on {id}, channel {channel}");
        }
        ControllerCommand::OutputPhase { id, channel, invert } => {
            client.set_output_eq_phase(&id, channel, invert).await?;
            let state = if invert { "on" } else { "off" };
            println!("Output EQ phase inversion {state} on {id}, channel {channel}");
        }
        ControllerCommand::SetFir { id, channel, values, target } => {
            client.set_fir(target.into(), &id, channel, &values).await?;
            println!("Sent {} taps to {id}, channel {channel}", values.len());
        }
        ControllerCommand::Group { action } => match action {
            GroupAction::Create { links } => {
                let links = parse_links(&links)?;
                match client.create_and_assign_group(links).await? {
                    Some(guid) => println!("Group created: {guid}"),
                    None => println!("Group created"),
                }
            }
            GroupAction::Unassign { links } => {
                client.unassign_group(parse_links(&links)?).await?;
                println!("Group unassigned");
            }
        },
        ControllerCommand::OpenEntity { id } => {
            client.open_entity_details(&id).await?;
            println!("Opened details for {id}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("armonia").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_fir_defaults() {
        let cli = parse(&["fir", "--filters", "hp:80", "ls:200,-3"]);
        let Commands::Fir(args) = cli.command else {
            panic!("expected fir");
        };
        assert_eq!(args.filters, vec!["hp:80", "ls:200,-3"]);
        assert_eq!(args.taps, 1023);
        assert_eq!(args.fs, 48000);
        assert_eq!(args.target, Target::Output);
        assert!(args.weights.is_none());
        assert!(!args.truncate);
    }

    #[test]
    fn test_fir_device_flags() {
        let cli = parse(&[
            "fir", "--filters", "lp:8000", "--weights", "0.5", "--device-id", "A1", "--channel",
            "3", "--target", "speaker", "--truncate",
        ]);
        let Commands::Fir(args) = cli.command else {
            panic!("expected fir");
        };
        assert_eq!(args.weights, Some(vec![0.5]));
        assert_eq!(args.device_id.as_deref(), Some("A1"));
        assert_eq!(args.channel, Some(3));
        assert_eq!(args.target, Target::Speaker);
        assert!(args.truncate);
    }

    #[test]
    fn test_fir_sample_rate_preset() {
        let cli = parse(&["fir", "--filters", "lp:8000", "--fs", "ultra"]);
        let Commands::Fir(args) = cli.command else {
            panic!("expected fir");
        };
        assert_eq!(args.fs, 192_000);
        let bad = ["armonia", "fir", "--filters", "lp:1", "--fs", "cd"];
        assert!(Cli::try_parse_from(bad).is_err());
    }

    #[test]
    fn test_fir_requires_filters() {
        assert!(Cli::try_parse_from(["armonia", "fir"]).is_err());
    }

    #[test]
    fn test_negative_gain() {
        let cli = parse(&["output-gain", "A1", "0", "-6.5"]);
        assert!(matches!(
            cli.command,
            Commands::Controller(ControllerCommand::OutputGain { value, .. }) if value == -6.5
        ));
    }

    #[test]
    fn test_set_fir_values() {
        let cli = parse(&["set-fir", "A1", "1", "--values", "-0.25,0.5,-0.25"]);
        let Commands::Controller(ControllerCommand::SetFir { values, target, .. }) = cli.command
        else {
            panic!("expected set-fir");
        };
        assert_eq!(values, vec![-0.25, 0.5, -0.25]);
        assert_eq!(target, Target::Output);
    }

    #[test]
    fn test_output_phase_flag() {
        let cli = parse(&["output-phase", "A1", "2", "true"]);
        assert!(matches!(
            cli.command,
            Commands::Controller(ControllerCommand::OutputPhase { invert: true, .. })
        ));
    }

    #[test]
    fn test_group_links() {
        let cli = parse(&["group", "create", "--link", "A1:0", "--link", "B2:1"]);
        let Commands::Controller(ControllerCommand::Group {
            action: GroupAction::Create { links },
        }) = cli.command
        else {
            panic!("expected group create");
        };
        let parsed = parse_links(&links).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parse_links(&["nochannel".to_string()]).is_err());
    }

    #[test]
    fn test_global_overrides() {
        let cli = parse(&[
            "status",
            "--url",
            "http://10.0.0.5:40402/api/ARA",
            "--token",
            "t",
            "--timeout-ms",
            "500",
        ]);
        let config = cli.connection_config();
        assert_eq!(config.api_url, "http://10.0.0.5:40402/api/ARA");
        assert_eq!(config.auth_token.as_deref(), Some("t"));
        assert_eq!(config.timeout_ms, 500);
    }
}
