mod check;
mod inspect;
mod models;

use check::run_check;
use inspect::run_inspect;
use models::run_models;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Inspect(args) => run_inspect(args, ctx),
        Command::Check(args) => run_check(args, ctx),
        Command::Models(args) => run_models(args),
    }
}
