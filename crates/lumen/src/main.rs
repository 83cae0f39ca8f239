use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use lumen_core::{FormatOptions, InspectRequest, Inspector, Registry, SnapshotMemory, VersionTag};
use lumen_utils::{info, init_logging};

/// Format values in a debugger memory snapshot.
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(version)]
#[command(about = "Format Qt and STL values from a debugger memory snapshot", long_about = None)]
struct Cli
{
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Format the value at an address and print its tree
    Inspect
    {
        /// Snapshot file (`0xADDR: hex bytes` lines)
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Address of the value (hex format: 0x1000 or decimal)
        #[arg(short, long, value_parser = parse_address)]
        address: u64,
        /// Type of the value, e.g. `QList<int>`
        #[arg(short = 't', long = "type")]
        type_name: String,
        /// Qt version the snapshot was taken from (6, 5.15.2, 0x060300)
        #[arg(long)]
        qt_version: Option<VersionTag>,
        /// Levels of children to expand
        #[arg(short, long, default_value_t = 2)]
        depth: usize,
        /// Maximum number of children listed per node
        #[arg(long)]
        max_children: Option<usize>,
        /// Maximum rendered string length
        #[arg(long)]
        max_string_len: Option<usize>,
    },
    /// List the types with a dedicated formatter
    Types,
}

fn parse_address(text: &str) -> Result<u64, String>
{
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{text}': {e}"))
}

fn main()
{
    // Initialize logging (reads from RUST_LOG env var)
    let _guard = match init_logging() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    let cli = Cli::parse();
    if let Err(e) = run_command(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(cli: Cli) -> lumen_core::Result<()>
{
    match cli.command {
        Commands::Inspect {
            snapshot,
            address,
            type_name,
            qt_version,
            depth,
            max_children,
            max_string_len,
        } => {
            let memory = SnapshotMemory::from_file(&snapshot)?;
            info!(
                "Loaded {} regions ({} bytes) from {}",
                memory.region_count(),
                memory.mapped_bytes(),
                snapshot.display()
            );

            let mut options = FormatOptions::from_env();
            if let Some(max_children) = max_children {
                options = options.with_max_children(max_children);
            }
            if let Some(max_string_len) = max_string_len {
                options = options.with_max_string_len(max_string_len);
            }
            if let Some(version) = qt_version {
                options = options.with_default_version(version);
            }

            let inspector = Inspector::new(memory, options);
            let handle = inspector.handle(&InspectRequest::new(address, type_name))?;
            print!("{}", inspector.render_tree(&handle, depth));
            Ok(())
        }
        Commands::Types => {
            for ty in Registry::builtin().registered_types() {
                println!("{:<20} {:<12} {}", ty.name, ty.category, ty.versions);
            }
            Ok(())
        }
    }
}
