//! yapctl: duty-cycle controller driven by UDP JSON-RPC commands.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  UdpTransport      LogActuator      LogEventSink         │
//! │  (Transport)       (ActuatorPort)   (EventSink)          │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │            AppService (pure logic)                 │  │
//! │  │            ControlLaw · power override             │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                                                          │
//! │  Poller (gateway · event queue · telemetry)              │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use yapctl::adapters::actuator::LogActuator;
use yapctl::adapters::log_sink::LogEventSink;
use yapctl::app::service::AppService;
use yapctl::config::SystemConfig;
use yapctl::control::export::{write_gnuplot, PlotOptions};
use yapctl::control::yap::ControlLaw;
use yapctl::poller::Poller;
use yapctl::rpc::gateway::CommandGateway;
use yapctl::rpc::transport::UdpTransport;

#[derive(Parser, Debug)]
#[command(author, version, about = "Asymmetric tangent-shaped duty-cycle controller")]
struct Args {
    /// JSON configuration file (missing fields take defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// UDP port for commands
    #[arg(long)]
    port: Option<u16>,

    /// Target process value
    #[arg(long)]
    target: Option<f64>,

    /// Lower bound of the control range
    #[arg(long)]
    low: Option<f64>,

    /// Upper bound of the control range
    #[arg(long)]
    high: Option<f64>,

    /// Initial duty cycle (0-100)
    #[arg(long)]
    duty: Option<f64>,

    /// Write a gnuplot script of the response curve and exit ("-" for stdout)
    #[arg(long)]
    plot: Option<String>,

    /// Process value to mark on the plot
    #[arg(long, requires = "plot")]
    plot_pv: Option<f64>,
}

fn load_config(args: &Args) -> Result<SystemConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SystemConfig::default(),
    };

    if let Some(port) = args.port {
        config.gateway.udp_port = port;
    }
    if let Some(target) = args.target {
        config.control.target_pv = target;
    }
    if let Some(low) = args.low {
        config.control.control_range_low = low;
    }
    if let Some(high) = args.high {
        config.control.control_range_high = high;
    }
    if let Some(duty) = args.duty {
        config.initial_duty_cycle = duty;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn write_plot(config: &SystemConfig, target: &str, plot_pv: Option<f64>) -> Result<()> {
    let law = ControlLaw::new(config.control, config.initial_duty_cycle)?;
    let opts = PlotOptions {
        process_value: plot_pv,
        ..PlotOptions::default()
    };

    let marked = if target == "-" {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let marked = write_gnuplot(&law, &opts, &mut out)?;
        out.flush()?;
        marked
    } else {
        let file = File::create(target).with_context(|| format!("creating {target}"))?;
        let mut out = BufWriter::new(file);
        let marked = write_gnuplot(&law, &opts, &mut out)?;
        out.flush()?;
        info!("Plot written to {}", target);
        marked
    };

    if let (Some(pv), Some(duty)) = (plot_pv, marked) {
        info!("pv={} -> duty_cycle={:.2}%", pv, duty);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("yapctl v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;

    if let Some(target) = args.plot.as_deref() {
        return write_plot(&config, target, args.plot_pv);
    }

    let app = AppService::new(&config)?;
    info!("{}", app.law());

    let transport = UdpTransport::bind(&config.gateway.bind_addr, config.gateway.udp_port)?;
    let gateway = CommandGateway::new(transport, config.gateway.recv_buffer_len);

    let mut poller = Poller::new(&config, gateway, app, LogActuator::new(), LogEventSink::new());
    poller.run();

    info!("Final duty cycle: {:.2}%", poller.app().duty_cycle());
    Ok(())
}
