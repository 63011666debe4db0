//! `qtc`: compile quicktemplate documents into Go source.

use qtc::{init_tracing, parse_args, run, Command};

fn print_usage() {
    eprintln!("Usage: qtc [options]");
    eprintln!();
    eprintln!("Compiles *.qtpl templates into Go files placed next to them.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --dir=<path>           Directory to search recursively (default: .)");
    eprintln!("  --file=<path>          Compile a single template instead of --dir");
    eprintln!("  --ext=<ext>            Template file extension (default: qtpl)");
    eprintln!("  --skip-line-comments   Do not emit //line directives");
    eprintln!("  -v, --verbose          Verbose output");
    eprintln!("  -h, --help             Show this help");
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match parse_args(&args) {
        Ok(Command::Compile(config)) => config,
        Ok(Command::Help) => {
            print_usage();
            return;
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };
    init_tracing(config.verbose);

    let summary = match run(&config) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    for failure in &summary.failures {
        eprintln!("error: {failure}");
    }
    println!(
        "Compiled {} template(s), {} failed",
        summary.written.len(),
        summary.failures.len()
    );
    if !summary.is_success() {
        std::process::exit(1);
    }
}
