//! Application entry point — Pi Text Reader.
//!
//! # Startup sequence
//!
//! 1. Load [`AppConfig`] from disk (returns default on first run).
//! 2. Initialise logging (`debug` flag selects the default filter).
//! 3. Create the tokio runtime (multi-thread, 2 workers).
//! 4. Open the GPIO button and LED — a failure here is fatal.
//! 5. Build the external tool adapters from config.
//! 6. Set the mixer volume, announce "OK, ready", turn the LED on.
//! 7. Poll the button every `poll_ms`; on a press run one full read cycle.
//! 8. On Ctrl-C / SIGINT: LED off, GPIO lines released, clean exit.

use std::sync::Arc;

use anyhow::Context;

use pi_text_reader::{
    config::{AppConfig, WorkPaths},
    gpio::{ButtonInput, Indicator, InputState, SysfsButton, SysfsLed},
    pipeline::{new_shared_state, PipelineController, Toolbox, READY_PHRASE},
    tools::{Alsa, AudioOut, CommandCamera, Flite, SpeechEngine, Tesseract},
    watch::SpeechSlot,
};

fn main() -> anyhow::Result<()> {
    // 1. Configuration — loaded before the logger so the debug flag can
    //    drive the default filter; the load error is reported just after.
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // 2. Logging
    let default_filter = if config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    log::info!("pi-text-reader starting up");
    if let Some(e) = load_error {
        log::warn!("failed to load config ({e}); using defaults");
    }

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(run(config))
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    // 4. GPIO — fatal if the pins cannot be opened.
    let button = Arc::new(
        SysfsButton::open(config.gpio.button_pin)
            .with_context(|| format!("opening button pin {}", config.gpio.button_pin))?,
    );
    let led = Arc::new(
        SysfsLed::open(config.gpio.led_pin)
            .with_context(|| format!("opening LED pin {}", config.gpio.led_pin))?,
    );

    // 5. External tool adapters
    let paths = WorkPaths::new(&config.work_dir);
    let speech: Arc<dyn SpeechEngine> = Arc::new(Flite::new(&config.speech));
    let audio: Arc<dyn AudioOut> = Arc::new(Alsa::new());
    let tools = Toolbox {
        camera: Arc::new(CommandCamera::new(
            &config.camera.command,
            paths.image_file.clone(),
        )),
        ocr: Arc::new(Tesseract::new(paths.text_file.clone())),
        speech: Arc::clone(&speech),
        audio: Arc::clone(&audio),
    };

    let state = new_shared_state();
    let controller = PipelineController::new(
        Arc::clone(&state),
        Arc::clone(&button) as Arc<dyn ButtonInput>,
        Arc::clone(&led) as Arc<dyn Indicator>,
        tools,
        Arc::new(SpeechSlot::new()),
        paths,
        config.sounds.shutter_path(),
        config.timing.clone(),
    );

    // 6. Announce readiness.  Best-effort like every tool call — a silent
    //    device is still operable from the LED alone.
    {
        let audio = Arc::clone(&audio);
        let volume = config.speech.volume;
        let speech = Arc::clone(&speech);
        let result = tokio::task::spawn_blocking(move || {
            if let Err(e) = audio.set_volume(volume) {
                log::warn!("startup: set_volume failed: {e}");
            }
            speech.speak_phrase(READY_PHRASE)
        })
        .await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("startup: ready announcement failed: {e}"),
            Err(e) => log::warn!("startup: announcement task failed: {e}"),
        }
    }
    led.set(true);
    log::info!("ready — waiting for button press");

    // 7. Main loop: poll the button while idle, run a cycle on press.
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(e) = result {
                    log::error!("signal listener failed: {e}");
                }
                log::info!("termination signal received, exiting");
                break;
            }
            _ = tokio::time::sleep(config.timing.poll()) => {
                if button.read() == InputState::Pressed {
                    controller.run_cycle().await;
                }
            }
        }
    }

    // 8. Release hardware before exit.
    led.set(false);
    if let Err(e) = button.release() {
        log::warn!("releasing button pin failed: {e}");
    }
    if let Err(e) = led.release() {
        log::warn!("releasing LED pin failed: {e}");
    }

    Ok(())
}
