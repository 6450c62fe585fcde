//! Entry point for the XRP Ledger globe viewer.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use globe_viewer::app::{App, AppConfig};
use xrpl_feed::FeedConfig;

#[derive(Parser, Debug)]
#[command(name = "globe-viewer", about = "Live XRP Ledger globe visualization")]
struct Args {
    /// Websocket endpoint carrying the ledger stream.
    #[arg(long, env = "XRPL_WS_ENDPOINT", default_value = "wss://xrplcluster.com")]
    ws_endpoint: String,

    /// HTTP JSON-RPC endpoint for expanded ledger detail.
    #[arg(long, env = "XRPL_HTTP_ENDPOINT", default_value = "https://xrplcluster.com")]
    http_endpoint: String,

    /// Transfers below this many drops are not visualized.
    #[arg(long, env = "XRPL_MIN_DROPS", default_value_t = 1_000_000)]
    min_drops: u64,

    /// Seed for the connection heuristic and marker pulse phases.
    #[arg(long, env = "GLOBE_SEED", default_value_t = 0x5852_5047)]
    seed: u64,
}

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = AppConfig {
        feed: FeedConfig {
            ws_endpoint: args.ws_endpoint,
            http_endpoint: args.http_endpoint,
            reconnect_delay: Duration::from_secs(3),
        },
        min_drops: args.min_drops,
        seed: args.seed,
    };

    // Create the event loop and window.
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("XRP Ledger Globe")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    // Initialise the application (async → sync).
    let mut app = pollster::block_on(App::new(window.clone(), config))?;

    // Run the winit event loop.
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                // Forward events to the app; handle unconsumed window events.
                if !app.handle_event(&window, &event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::RedrawRequested => match app.render(&window) {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => {
                                app.resize(app.renderer.gfx.size);
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("WGPU out of memory – exiting.");
                                elwt.exit();
                            }
                            Err(e) => log::error!("Render error: {:?}", e),
                        },
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                // Request a redraw each frame.
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
