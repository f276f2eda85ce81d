use reforge_assist::args::{Args, Mode};
use reforge_assist::automation::{DEBUG_OUTPUT, ReforgeRunner, create_automation_channels, run_match_test};
use reforge_assist::config::{MonitorConfig, ReforgeConfig};
use reforge_assist::desktop::{DesktopCapture, DesktopInput, spawn_monitor_hotkey, spawn_reforge_hotkey};
use reforge_assist::error::ReforgeResult;
use reforge_assist::gui::{ConfigPaths, run_gui};
use reforge_assist::monitor::{BarMonitor, MonitorEvent};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(args) = Args::parse() else {
        return ExitCode::SUCCESS;
    };

    let default_filter = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let result = match &args.mode {
        Mode::Gui => {
            println!("🚀 Launching Reforge Assist GUI...");
            run_gui(ConfigPaths {
                reforge: args.reforge_config.clone(),
                monitor: args.monitor_config.clone(),
            });
            Ok(())
        }
        Mode::Run => run_headless(&args.reforge_config),
        Mode::Monitor => monitor_headless(&args.monitor_config),
        Mode::MatchTest(screenshot) => match_test(&args.reforge_config, screenshot),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_headless(config_path: &Path) -> ReforgeResult<()> {
    let config = ReforgeConfig::load(config_path)?;
    let (cmd_tx, cmd_rx, _event_tx, _event_rx) = create_automation_channels();
    let mut runner = ReforgeRunner::new(&config, DesktopCapture::new(), DesktopInput::new()?, cmd_rx)?;
    if let Err(e) = spawn_reforge_hotkey(cmd_tx) {
        log::warn!("F12 hotkey unavailable: {}", e);
    }
    println!("⚒️ Reforging, press F12 to stop");
    let summary = runner.run()?;
    println!("✅ {summary}");
    Ok(())
}

fn monitor_headless(config_path: &Path) -> ReforgeResult<()> {
    let config = MonitorConfig::load(config_path)?;
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
    let monitor = BarMonitor::start(&config, DesktopCapture::new(), DesktopInput::new, event_tx)?;
    if let Err(e) = spawn_monitor_hotkey(monitor.running_flag()) {
        log::warn!("F12 hotkey unavailable: {}", e);
    }
    println!("🩸 Monitoring bars, press F12 to stop");

    while let Some(event) = event_rx.blocking_recv() {
        match event {
            MonitorEvent::Reading { hp, mp } => log::debug!("HP {:?} MP {:?}", hp, mp),
            // Presses and errors are already logged by the worker
            MonitorEvent::Pressed { .. } | MonitorEvent::Error(_) => {}
            MonitorEvent::Stopped => break,
        }
    }
    monitor.join();
    println!("⏹ Monitor stopped");
    Ok(())
}

fn match_test(config_path: &Path, screenshot: &Path) -> ReforgeResult<()> {
    let config = ReforgeConfig::load(config_path)?;
    let outcome = run_match_test(&config, screenshot, DEBUG_OUTPUT)?;
    println!("{}", outcome.report);
    if let Some(visual) = outcome.visual {
        println!("🖼️ Annotated result saved to {}", visual.display());
    }
    Ok(())
}
