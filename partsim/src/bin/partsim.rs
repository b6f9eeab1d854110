use std::io;
use std::process::ExitCode;

use log::error;
use partsim::*;

fn main() -> ExitCode {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "warn");
    }
    pretty_env_logger::init();

    let cli = Args::parse();
    match simulate(&cli, &mut io::stdout().lock()) {
        Ok(())  => ExitCode::SUCCESS,
        Err(e)  => {
            error!("{:#}", e);
            eprintln!("partsim: {:#}", e);
            ExitCode::from(1)
        },
    }
}
