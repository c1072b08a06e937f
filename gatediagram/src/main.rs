mod cli;

use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "gatediagram", about = "Gate-level JSON netlist → laid-out circuit diagram")]
struct Cli {
    /// Netlist JSON written by the synthesis tool.
    netlist: String,
    /// Output file (stdout when omitted).
    #[arg(short, long)]
    output: Option<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// YAML file with layout and HTML settings.
    #[arg(long)]
    config: Option<String>,
    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Html,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    cli::render::run(
        &cli.netlist,
        cli.output.as_deref(),
        cli.format == Format::Html,
        cli.config.as_deref(),
        cli.pretty,
    );
}
