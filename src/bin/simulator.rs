use clap::{App, Arg};
use colored::*;
use nagsim::{SimConfig, TickReport, VehicleSim};
use std::time::Duration;
use tokio::time;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("nagsim-simulator")
        .version("0.1.0")
        .about("Transmission controller and gear selector simulation")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("ticks")
                .short("n")
                .long("ticks")
                .value_name("TICKS")
                .help("Number of ticks to run, 0 runs until interrupted")
                .takes_value(true)
                .validator(|v| match v.parse::<u64>() {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Tick count must be a valid number".into()),
                }),
        )
        .arg(
            Arg::with_name("period")
                .short("p")
                .long("period-ms")
                .value_name("MS")
                .help("Milliseconds between ticks")
                .takes_value(true)
                .validator(|v| match v.parse::<u64>() {
                    Ok(n) if n > 0 => Ok(()),
                    _ => Err("Tick period must be a positive number".into()),
                }),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .takes_value(true)
                .possible_values(&["table", "json"])
                .default_value("table"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log every shift and program change"),
        )
        .get_matches();

    let max_level = if matches.is_present("verbose") {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(max_level).init();

    let mut config = match matches.value_of("config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(ticks) = matches.value_of("ticks") {
        config.ticks = ticks.parse()?;
    }
    if let Some(period) = matches.value_of("period") {
        config.tick_period_ms = period.parse()?;
    }
    let json = matches.value_of("format") == Some("json");

    let ticks = config.ticks;
    let mut interval = time::interval(Duration::from_millis(config.tick_period_ms));
    let mut sim = VehicleSim::new(config)?;
    sim.start();

    if !json {
        print_header();
    }

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }

        let Some(report) = sim.tick() else { break };

        if json {
            match serde_json::to_string(&report) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("failed to encode tick report: {}", e),
            }
        } else {
            print_row(&report);
        }

        if ticks != 0 && report.tick >= ticks {
            break;
        }
    }

    sim.stop();
    let log = sim.transmission().shift_log();
    info!(
        upshifts = log.total_upshifts(),
        downshifts = log.total_downshifts(),
        "simulation finished"
    );
    Ok(())
}

fn print_header() {
    println!(
        "{}",
        format!(
            "{:>5} {:>6} {:>4} {:>8} {:>4} {:>4} {:>6} {:>5}",
            "tick", "rpm", "lvr", "vgear", "gear", "prog", "n2", "limp"
        )
        .bold()
    );
}

fn print_row(report: &TickReport) {
    let program = report.frames.gs418.program.as_char().to_string();
    let program = if report.limp_mode {
        program.red().bold()
    } else {
        program.green()
    };
    let limp = if report.limp_mode { "YES".red() } else { "no".normal() };

    let row = format!(
        "{:>5} {:>6} {:>4} {:>8} {:>4} {:>4} {:>6} {:>5}",
        report.tick,
        report.engine_rpm,
        format!("{:?}", report.selector).chars().next().unwrap_or('?'),
        format!("{:?}", report.virtual_gear),
        report.forward_gear.to_string(),
        program,
        report.output_shaft_rpm,
        limp,
    );

    match report.shift {
        Some(shift) => println!(
            "{}  {}",
            row,
            format!("shift {} -> {} @ {} rpm", shift.from, shift.to, shift.target_rpm).yellow()
        ),
        None => println!("{row}"),
    }
}
