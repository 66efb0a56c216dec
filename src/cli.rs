use clap::Parser;

#[derive(Parser)]
#[command(name = "ytcap", about = "YouTube transcript API service", version)]
pub struct Cli {
    /// Listen address (overrides the config file, default 0.0.0.0:8080)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Default the log filter to debug instead of info
    #[arg(short, long)]
    pub verbose: bool,
}
