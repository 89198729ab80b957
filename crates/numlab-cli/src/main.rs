use clap::Parser;
use numlab_cli::{logger, Cli};

fn main() {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!(?cli, "parsed arguments");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = numlab_cli::run(&cli, &mut out) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
