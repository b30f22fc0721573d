use std::path::PathBuf;

use anyhow::Context;
use circuitlib::{Architecture, ModuleManager, NetlistManager};
use clap::Parser as ClapParser;
use essentials::{
    emit_library, emit_transistor_wrappers, validate, Diagnostic, GateLibrary, SpiceOptions,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    eprintln!("architecture: {:?}", &args.arch);
    eprintln!("output directory: {:?}", &args.out_dir);
    gen_essentials(args)?;
    eprintln!("Netlist writing complete.");

    Ok(())
}

/// Arguments to [`gen_essentials`].
#[derive(ClapParser)]
#[command(
    version,
    about,
    long_about = "Generate transistor-level SPICE netlists for the inverters and buffers of an architecture"
)]
pub struct Args {
    /// The path to the TOML architecture description.
    arch: PathBuf,
    /// The directory where netlists should be saved.
    ///
    /// The directory will be created if necessary.
    /// Existing netlists in it will be overwritten.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// Skip writing the transistor wrapper netlist.
    #[arg(long)]
    no_wrappers: bool,
    /// Log synthesis decisions for every model.
    #[arg(short, long)]
    verbose: bool,
}

/// Generates the essential gates of the given architecture.
pub fn gen_essentials(args: Args) -> anyhow::Result<()> {
    let arch = Architecture::load(&args.arch)
        .with_context(|| format!("Failed to load architecture from {:?}.", args.arch))?;
    let opts = SpiceOptions::from_table(&arch.spice)
        .with_context(|| "Invalid [spice] options in architecture.")?;

    let issues = validate(&arch.circuit_lib, &arch.tech_lib, &arch.bindings);
    for item in issues.iter() {
        eprintln!("{}: {item}", item.severity());
    }
    if issues.has_error() {
        anyhow::bail!("One or more errors in circuit library identified; aborting.")
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create output directory {:?}.", args.out_dir))?;

    let modules = ModuleManager::from_circuit_library(&arch.circuit_lib);
    let mut netlists = NetlistManager::new();

    if !args.no_wrappers {
        emit_transistor_wrappers(&mut netlists, &arch.tech_lib, &args.out_dir, &opts)
            .with_context(|| "Failed to write transistor wrappers.")?;
    }

    let lib = GateLibrary::new(&arch.circuit_lib, &arch.tech_lib, &arch.bindings, &modules);
    let report = match emit_library(&mut netlists, &lib, &args.out_dir, &opts) {
        Ok(report) => report,
        Err(err) => {
            if let Some(netlist) = err.netlist {
                eprintln!(
                    "partial netlist left at {:?}",
                    netlists.netlist_path(netlist)
                );
            }
            return Err(err).with_context(|| "Failed to write essential gates.");
        }
    };
    tracing::info!(
        subckts = report.summary.subckts.len(),
        skipped = report.summary.skipped.len(),
        "essential gates written"
    );

    for id in netlists.netlists_of_kind(circuitlib::NetlistKind::Submodule) {
        println!("{}", netlists.netlist_path(id).display());
    }

    Ok(())
}
