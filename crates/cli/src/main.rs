use anyhow::Result;
use clap::{Parser, Subcommand};
use host_diff::commands::{
    diff_command, diff_files_command, init_store_command, list_hosts_command,
    list_snapshots_command, show_snapshot_command, status_command, upload_command, OutputFormat,
};

/// Host scan snapshot store and diff tool.
///
/// This CLI is a thin wrapper around `hostdiff-core` (exposed in code as
/// `hostdiff_core`). All substantive logic lives in the library.
#[derive(Parser, Debug)]
#[command(
    name = "host-diff",
    version,
    about = "Store host scan snapshots and diff them",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a snapshot store at the given root.
    ///
    /// Creates `.hostdiff/` (config + database) and `snapshots/`.
    Init {
        /// Store root directory. Defaults to the current working directory.
        #[arg(long, env = "HOSTDIFF_ROOT", default_value = ".")]
        root: String,

        /// Optional store name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show store health: config, paths, and host/snapshot counts.
    Status {
        #[arg(long, env = "HOSTDIFF_ROOT", default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Ingest a snapshot JSON document.
    ///
    /// Host and timestamp are read from the document's `ip`/`timestamp` fields,
    /// falling back to a `host_<ip>_<timestamp>.json` file name.
    Upload {
        #[arg(long, env = "HOSTDIFF_ROOT", default_value = ".")]
        root: String,

        /// Path to the snapshot document.
        #[arg(long)]
        file: String,

        /// Override the host IP.
        #[arg(long)]
        ip: Option<String>,

        /// Override the snapshot timestamp.
        #[arg(long)]
        timestamp: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List hosts with stored snapshots.
    Hosts {
        #[arg(long, env = "HOSTDIFF_ROOT", default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List stored snapshot timestamps for a host.
    Snapshots {
        #[arg(long, env = "HOSTDIFF_ROOT", default_value = ".")]
        root: String,

        /// Host IP.
        #[arg(long)]
        ip: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print a stored snapshot document.
    Show {
        #[arg(long, env = "HOSTDIFF_ROOT", default_value = ".")]
        root: String,

        #[arg(long)]
        ip: String,

        #[arg(long)]
        timestamp: String,
    },

    /// Diff two stored snapshots of a host.
    Diff {
        #[arg(long, env = "HOSTDIFF_ROOT", default_value = ".")]
        root: String,

        #[arg(long)]
        ip: String,

        /// Baseline snapshot timestamp.
        #[arg(long)]
        from: String,

        /// Later snapshot timestamp.
        #[arg(long)]
        to: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Diff two snapshot documents on disk without a store.
    DiffFiles {
        /// Baseline snapshot file.
        old: String,

        /// Later snapshot file.
        new: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    host_diff::logging::init(cli.verbose);

    match cli.command {
        Command::Init { root, name } => init_store_command(&root, name)?,
        Command::Status { root, json } => status_command(&root, json)?,
        Command::Upload { root, file, ip, timestamp, json } => {
            upload_command(&root, &file, ip, timestamp, json)?
        }
        Command::Hosts { root, json } => list_hosts_command(&root, json)?,
        Command::Snapshots { root, ip, json } => list_snapshots_command(&root, &ip, json)?,
        Command::Show { root, ip, timestamp } => show_snapshot_command(&root, &ip, &timestamp)?,
        Command::Diff { root, ip, from, to, format } => {
            diff_command(&root, &ip, &from, &to, format)?
        }
        Command::DiffFiles { old, new, format } => diff_files_command(&old, &new, format)?,
    }

    Ok(())
}
