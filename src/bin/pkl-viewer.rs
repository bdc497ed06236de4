//! Command line tool to publish a scatter angle volume to a local viewer

// standard library
use std::path::PathBuf;

// voxtools modules
use voxtools::viewer::{load_scatter_angle, publish_scatter_angle, LocalViewer, PublishOptions};
use voxtools::volume::Narrowing;

// external crates
use clap::Parser;
use log::{debug, info};

/// Publish a pickled 3D volume as an 8-bit viewer layer
///
/// The volume is narrowed to uint8 and added as a single "scatter_angle"
/// layer, with the same voxel size on every axis. The resulting viewer state
/// is written as JSON for an external server to serve, the session URL that
/// server would show is printed, then the tool waits until interrupted.
#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Cli {
    /// Directory holding the dataset
    #[arg(long, value_name = "path", default_value = "data")]
    data_dir: PathBuf,

    /// Dataset file name within the data directory
    #[arg(
        long,
        value_name = "name",
        default_value = "aec_hackathon_gscan_example_smaller_data.pkl"
    )]
    file: String,

    /// Voxel size along every axis, in --units
    #[arg(long, value_name = "value", default_value_t = 10.0)]
    scale: f64,

    /// Unit of the voxel size, SI prefixes allowed
    #[arg(long, value_name = "unit", default_value = "cm")]
    units: String,

    /// Name of the published layer
    #[arg(long, value_name = "name", default_value = "scatter_angle")]
    layer: String,

    /// Address of the external server that serves the state
    #[arg(long, value_name = "addr", default_value = "127.0.0.1:9000")]
    bind_address: String,

    /// How out of range voxels become bytes [saturate, wrap]
    #[arg(long, value_name = "policy", default_value = "saturate")]
    narrowing: Narrowing,

    /// Where to write the viewer state JSON
    #[arg(long, value_name = "path", default_value = "viewer_state.json")]
    state: PathBuf,

    /// Exit once the state is written instead of waiting for an interrupt
    #[arg(long)]
    no_wait: bool,

    /// Verbose logging (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output (overrules --verbose)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    debug!("{cli:?}");

    let volume = load_scatter_angle(&cli.data_dir, &cli.file)?;

    let mut viewer = LocalViewer::new(&cli.bind_address)?;

    let options = PublishOptions::builder()
        .layer_name(&cli.layer)
        .units(&cli.units)
        .scale(cli.scale)
        .narrowing(cli.narrowing)
        .build();

    viewer.txn(|state| publish_scatter_angle(state, &volume, &options))?;
    viewer.state().write_json(&cli.state)?;
    info!("Published layer \"{}\"", cli.layer);

    println!("Viewer state written to {}", cli.state.display());
    println!("Viewer URL (served externally): {}", viewer.url());

    if cli.no_wait {
        return Ok(());
    }
    viewer.wait_forever()
}

fn init_logging(cli: &Cli) -> Result<(), log::SetLoggerError> {
    stderrlog::new()
        .modules(["pkl_viewer", "voxtools", "voxtools_pickle", "voxtools_viewer", "voxtools_volume"])
        .quiet(cli.quiet)
        .verbosity(2 + cli.verbose as usize)
        .show_module_names(false)
        .init()
}
