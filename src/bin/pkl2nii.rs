//! Command line tool to convert pickled 3D arrays into NIfTI volumes

// standard library
use std::path::PathBuf;

// voxtools modules
use voxtools::volume::convert_pickle_to_nifti;

// external crates
use clap::Parser;
use log::debug;

/// Convert a pickled numpy array into a NIfTI image
///
/// The array must be 3D and numeric. Every voxel is written as float32, with
/// the optional voxel size (mm) embedded in the affine.
#[derive(Parser, Debug)]
#[command(version, about, long_about)]
#[command(arg_required_else_help(true))]
struct Cli {
    /// Path to the pickled array (or .npy file)
    #[arg(short, long, value_name = "path")]
    input_file: PathBuf,

    /// Path for the NIfTI file (.nii or .nii.gz)
    #[arg(short, long, value_name = "path", default_value = "")]
    output_file: PathBuf,

    /// Uniform voxel size in mm
    #[arg(short, long, value_name = "mm")]
    voxel_size: Option<f64>,

    /// Verbose logging (-v is taken by the voxel size)
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output (overrules --verbose)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    debug!("{cli:?}");

    convert_pickle_to_nifti(&cli.input_file, &cli.output_file, cli.voxel_size)?;
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<(), log::SetLoggerError> {
    stderrlog::new()
        .modules(["pkl2nii", "voxtools", "voxtools_pickle", "voxtools_volume"])
        .quiet(cli.quiet)
        .verbosity(2 + cli.verbose as usize)
        .show_module_names(false)
        .init()
}
