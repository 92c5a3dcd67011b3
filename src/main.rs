use anyhow::Result;
use clap::Subcommand;

mod cli_exec;
mod cli_runtime;

#[derive(Subcommand)]
enum Commands {
    /// Show the folder tree under the photo root
    Folders {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List the images in a folder
    Images {
        /// Folder path relative to the photo root ("" for the root)
        folder: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Run key presses through the compare key map without a terminal
    Replay {
        /// Space-separated key names, e.g. "enter x u s"
        #[arg(long)]
        keys: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
        /// Images in batch order; the first starts as the best
        #[arg(required = true)]
        images: Vec<String>,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    cli_runtime::run()
}
