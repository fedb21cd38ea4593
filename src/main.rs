mod actions;
mod aggregator;
mod cli;
mod config;
mod dialog;
mod error;
#[cfg(test)]
mod fakes;
mod notify;
mod package_manager;
mod setup;
mod updater;

use actions::SystemActions;
use aggregator::Aggregator;
use anyhow::Result;
use cli::Mode;
use dialog::Zenity;
use package_manager::{ManagerSource, ProcessRunner};
use updater::UpdateDialog;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("错误: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::parse();

    // 加载配置
    let config = config::Config::load_or_default()?;
    let runner = ProcessRunner::new(config.output_limit);

    if let Err(e) = setup::initialize(&config, &runner) {
        eprintln!("Initialization failed. Please check the requirements and try again.");
        return Err(e.into());
    }
    setup::export_session_env();

    match cli.mode() {
        Mode::InstallDesktop => {
            match setup::home_dir()
                .map_err(anyhow::Error::from)
                .and_then(|home| setup::install_desktop_file(&config, &home))
            {
                Ok(path) => println!("Desktop file created at: {}", path.display()),
                Err(e) => eprintln!("Unable to create desktop file: {:#}", e),
            }
        }
        Mode::SetupAutostart => {
            match setup::home_dir()
                .map_err(anyhow::Error::from)
                .and_then(|home| setup::setup_autostart(&config, &home))
            {
                Ok(path) => println!("Autostart entry created at: {}", path.display()),
                Err(e) => eprintln!("Unable to create autostart file: {:#}", e),
            }
        }
        Mode::NotifyOnly | Mode::UpdateDialog => {
            let aggregator = Aggregator::new(ManagerSource::all(&runner));
            let dialog = Zenity::default();
            let actions = SystemActions::new(config.terminal.clone(), &runner);

            if cli.mode() == Mode::NotifyOnly {
                let outcome = notify::run_notify(&aggregator, &dialog, &actions);
                log::info!("通知模式结束: {:?}", outcome);
            } else {
                UpdateDialog::new(&aggregator, &dialog, &actions).run();
            }
        }
    }

    Ok(())
}
