//! mousetail daemon
//!
//! Battery gauge for a wireless mouse that reports no battery level. The
//! mouse shows up on the bus only while it charges over its cable, so wired
//! presence doubles as charging state.
//!
//! Runtime shape:
//! 1. Load configuration and restore the persisted estimate
//! 2. Start the presence poller (one scan per second by default)
//! 3. Tick the simulation on the timer, persisting every tick
//! 4. Refresh the displayed band immediately on attach/detach

use anyhow::{Context, Result};
use mousetail_config::{AppConfig, BandPreset, ProbeStrategy};
use mousetail_core::{BandTable, BatteryEstimator, ChargeRates, StateStore};
use mousetail_hal::{DeviceProbe, HidProbe, PresenceDetector, PresenceEvent, UsbId, UsbProbe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Title line prefixed to every status render
const APP_TITLE: &str = "mousetail";

/// Set from the signal handler, checked by the main loop
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

fn main() -> Result<()> {
    setup_logging();

    info!("mousetail starting...");

    setup_signal_handlers()?;

    let config = AppConfig::load_default().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let probe = build_probe(&config).context("Failed to set up the device probe")?;

    let mut estimator = BatteryEstimator::with_settings(
        StateStore::new(&config.battery.state_file),
        ChargeRates {
            increase: config.battery.increase_rate,
            decrease: config.battery.decrease_rate,
        },
        band_table(config.display.bands),
    );
    estimator
        .initialize()
        .context("Failed to restore battery state")?;

    let mut detector = PresenceDetector::new();
    detector.start(
        probe,
        Duration::from_secs(config.device.poll_interval_secs),
    );

    run(&config, &mut estimator, &detector);

    info!("Shutting down");
    detector.stop();

    Ok(())
}

/// Setup logging to the console
fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_ansi(false))
        .init();
}

/// Setup signal handlers for graceful shutdown
fn setup_signal_handlers() -> Result<()> {
    use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

    let action = SigAction::new(
        SigHandler::Handler(handle_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );

    unsafe {
        sigaction(Signal::SIGTERM, &action)?;
        sigaction(Signal::SIGINT, &action)?;
    }

    Ok(())
}

/// Signal handler
extern "C" fn handle_signal(sig: i32) {
    if sig == libc::SIGTERM || sig == libc::SIGINT {
        SHUTDOWN.store(true, Ordering::SeqCst);
    }
}

/// Build the probe the configuration asks for
fn build_probe(config: &AppConfig) -> Result<Box<dyn DeviceProbe>> {
    let probe: Box<dyn DeviceProbe> = match config.device.strategy {
        ProbeStrategy::Usb => {
            let id = UsbId::parse(&config.device.usb_id)?;
            Box::new(UsbProbe::new(id))
        }
        ProbeStrategy::Hid => Box::new(HidProbe::new(
            config.device.vendor_id,
            config.device.product.clone(),
        )?),
    };

    Ok(probe)
}

/// Pick the configured threshold table
fn band_table(preset: BandPreset) -> BandTable {
    match preset {
        BandPreset::Coarse => BandTable::coarse(),
        BandPreset::Fine => BandTable::fine(),
    }
}

/// Log the icon band and status text the tray would show
fn render(estimator: &BatteryEstimator) {
    let band = estimator.display_band();
    let text = estimator.status_text();
    info!(band, "{APP_TITLE}: {text}");
}

/// Timer loop: tick on schedule, refresh on presence changes, exit on signal
fn run(config: &AppConfig, estimator: &mut BatteryEstimator, detector: &PresenceDetector) {
    let tick_rate = Duration::from_secs(config.battery.tick_interval_secs);
    let mut last_tick = Instant::now();

    // First paint happens before any tick or event
    render(estimator);

    while !SHUTDOWN.load(Ordering::SeqCst) {
        // Wake at least once a second to notice shutdown signals
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0))
            .min(Duration::from_secs(1));

        match detector.recv_timeout(timeout) {
            Some(PresenceEvent::Attached) => {
                info!("Mouse attached, charging");
                estimator.set_charging(true);
                render(estimator);
            }
            Some(PresenceEvent::Detached) => {
                info!("Mouse detached, running on battery");
                estimator.set_charging(false);
                render(estimator);
            }
            None => {}
        }

        if last_tick.elapsed() >= tick_rate {
            if let Err(e) = estimator.tick(detector.is_present()) {
                warn!("Failed to persist battery state: {e}");
            }
            render(estimator);
            last_tick = Instant::now();
        }
    }
}
