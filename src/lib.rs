pub mod config;
pub mod logging;
pub mod model;
pub mod providers;
pub mod repl;
pub mod session;

use anyhow::Result;
use std::env;
use tracing::info;

use config::Config;
use repl::run_repl;
use session::Session;

pub fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cfg = Config::from_env();
    info!(
        provider = %cfg.model_provider,
        model = %cfg.model,
        base_url = %cfg.model_base_url,
        "loaded runtime configuration"
    );

    let mut session = Session::new(cfg)?;

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        run_repl(&mut session)
    } else {
        let prompt = args.join(" ");
        let answer = session.prompt(&prompt)?;
        println!("{}", answer.trim());
        Ok(())
    }
}
