use std::process::ExitCode;

use vault_kv_mv::MoveError;
use vault_kv_mv::cli;
use vault_kv_mv::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            let code = e.downcast_ref::<MoveError>().map_or(1, MoveError::code);
            ExitCode::from(code)
        }
    }
}
