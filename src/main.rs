use xmlsel::cli;
use xmlsel::engine::SubprocessEngine;
use xmlsel::error::{EXIT_BAD_ARGS, EXIT_SUCCESS};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match args.first().map(String::as_str) {
        Some("sel") | Some("select") => {
            let mut engine = SubprocessEngine::default();
            cli::run(&args[1..], &mut engine)
        }
        Some("--version") => {
            println!("xmlsel {}", env!("CARGO_PKG_VERSION"));
            EXIT_SUCCESS
        }
        Some("-h") | Some("--help") | None => {
            print!("{}", cli::MAIN_USAGE);
            EXIT_SUCCESS
        }
        Some(other) => {
            eprintln!("unknown command '{other}'");
            eprintln!();
            eprint!("{}", cli::MAIN_USAGE);
            EXIT_BAD_ARGS
        }
    };
    std::process::exit(code);
}
