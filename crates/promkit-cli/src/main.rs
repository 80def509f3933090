mod cli;
mod commands;
mod telemetry;

use cli::{AstParams, CheckParams, CodegenParams, MigrateParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();
    telemetry::init(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("migrate", m)) => {
            let params = MigrateParams::from_matches(m);
            commands::migrate::run(params.into());
        }
        Some(("codegen", m)) => {
            let params = CodegenParams::from_matches(m);
            commands::codegen::run(params.into());
        }
        Some(("ast", m)) => {
            let params = AstParams::from_matches(m);
            commands::ast::run(params.into());
        }
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
