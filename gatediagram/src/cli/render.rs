use gatediagram::{emit, DiagramConfig, Netlist};
use std::fs::File;
use std::io::BufReader;
use std::process;

pub fn run(netlist_path: &str, output_path: Option<&str>, html: bool, config_path: Option<&str>, pretty: bool) {
    let config = match config_path {
        Some(path) => DiagramConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error: {path}: {e}");
            process::exit(1);
        }),
        None => DiagramConfig::default(),
    };

    let file = File::open(netlist_path).unwrap_or_else(|e| {
        eprintln!("Error: reading {netlist_path}: {e}");
        process::exit(1);
    });
    let netlist = Netlist::from_reader(BufReader::new(file)).unwrap_or_else(|e| {
        eprintln!("Error: {netlist_path}: {e}");
        process::exit(1);
    });

    let doc = emit(&netlist, &config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let rendered = if html {
        doc.to_html(&config.html)
    } else if pretty {
        doc.to_json_pretty()
    } else {
        doc.to_json()
    };
    let rendered = rendered.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    match output_path {
        Some(path) => {
            std::fs::write(path, rendered).unwrap_or_else(|e| {
                eprintln!("Error: writing {path}: {e}");
                process::exit(1);
            });
            eprintln!(
                "Output: {} ({} library module(s), root `{}`)",
                path,
                doc.library.len(),
                doc.root.name
            );
        }
        None => println!("{rendered}"),
    }
}
