use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "dblp-etl")]
#[command(about = "Export dblp publications whose title contains a keyword, with per-year counts")]
pub struct CliConfig {
    /// Path to the dblp XML dump
    pub xml_file: String,

    /// Path to the dblp DTD
    pub dtd_file: String,

    /// Optional TOML file with report settings
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}
