mod backend_bridge;
mod controller;
mod media;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::SwipeApp;

#[derive(Parser, Debug)]
#[command(name = "desktop_gui", about = "Swipe through cat pictures")]
struct StartupArgs {
    /// Cards per session (overrides TOTAL_ITEMS).
    #[arg(long)]
    total: Option<usize>,
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = StartupArgs::parse();

    let mut settings = swipe_core::load_settings();
    if let Some(total) = args.total {
        settings.total_items = total;
    }
    if let Some(api_url) = args.api_url {
        settings.cat_api_url = api_url;
    }
    tracing::info!(
        total_items = settings.total_items,
        cat_api_url = %settings.cat_api_url,
        "starting desktop gui"
    );

    let total_items = settings.total_items;
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Cat Swipe")
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([400.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Cat Swipe",
        options,
        Box::new(move |_cc| Ok(Box::new(SwipeApp::new(cmd_tx, ui_rx, total_items)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_args_are_optional() {
        let args = StartupArgs::parse_from(["desktop_gui"]);
        assert!(args.total.is_none());
        assert!(args.api_url.is_none());

        let args = StartupArgs::parse_from(["desktop_gui", "--total", "5"]);
        assert_eq!(args.total, Some(5));
    }
}
