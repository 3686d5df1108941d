#![no_std]
#![no_main]

// Required for ESP-IDF bootloader compatibility
// Use explicit parameters to ensure correct efuse block revision values
esp_bootloader_esp_idf::esp_app_desc!(
    env!("CARGO_PKG_VERSION"), // version
    env!("CARGO_PKG_NAME"),    // project_name
    "00:00:00",                // build_time
    "2025-01-01",              // build_date
    "0.0.0",                   // idf_ver (not using IDF)
    0x10000,                   // mmu_page_size (64KB)
    0,                         // min_efuse_blk_rev_full (accept all)
    u16::MAX                   // max_efuse_blk_rev_full (accept all)
);

use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Timer};
use esp_backtrace as _;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode as SpiMode;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart, UartRx};
use esp_hal::Async;
use static_cell::StaticCell;

mod aprs;
mod beacon;
mod config;
mod debug;
mod display;
mod gps;
mod lora;
mod tracker;

use aprs::message::BeaconConfig;
use display::StatusScreen;
use gps::source::NmeaFixSource;
use lora::driver::{Sx1262Driver, Sx1262Pins};
use lora::traits::LoraRadio;
use tracker::{Tracker, TrackerCapabilities};

/// How long one loop iteration waits for receiver bytes before re-evaluating
/// the scheduler anyway
const GPS_READ_TIMEOUT_MS: u64 = 100;

/// Static executor for embassy
static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

/// Status sink writing to the JTAG serial console; the OLED of the original
/// hardware is driven the same way through the `StatusScreen` trait.
struct ConsoleScreen;

impl StatusScreen for ConsoleScreen {
    fn show(&mut self, title: &str, lines: &[&str]) {
        esp_println::println!("[{}]", title);
        for line in lines {
            esp_println::println!("  {}", line);
        }
    }
}

#[esp_hal::main]
fn main() -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default());

    // Initialise the RTOS scheduler with timer - MUST be done before any async operations
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Configure SPI for LoRa
    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(1))
            .with_mode(SpiMode::_0),
    )
    .unwrap()
    .with_sck(peripherals.GPIO7)
    .with_miso(peripherals.GPIO8)
    .with_mosi(peripherals.GPIO9)
    .into_async();

    // Configure LoRa control pins
    let lora_pins = Sx1262Pins {
        nss: Output::new(peripherals.GPIO41, Level::High, OutputConfig::default()),
        dio1: Input::new(peripherals.GPIO39, InputConfig::default().with_pull(Pull::Down)),
        nrst: Output::new(peripherals.GPIO42, Level::High, OutputConfig::default()),
        busy: Input::new(peripherals.GPIO40, InputConfig::default().with_pull(Pull::Down)),
    };
    let radio = Sx1262Driver::new(spi, lora_pins);

    // GPS receiver UART
    let uart = Uart::new(
        peripherals.UART1,
        UartConfig::default().with_baudrate(config::gps::BAUD_RATE),
    )
    .unwrap()
    .with_tx(peripherals.GPIO17)
    .with_rx(peripherals.GPIO18)
    .into_async();
    let (gps_rx, _gps_tx) = uart.split();

    // Manual-send button (active low)
    let button = Input::new(peripherals.GPIO38, InputConfig::default().with_pull(Pull::Up));

    // Create and run the embassy executor
    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(|spawner: Spawner| {
        spawner.must_spawn(tracker_task(radio, gps_rx, button));
    })
}

/// The single control-loop task.
///
/// Everything is owned here and runs cooperatively: receiver bytes are
/// drained into the fix source, then one tracker step evaluates the clock
/// and scheduler and performs at most one transmission.
#[embassy_executor::task]
async fn tracker_task(
    mut radio: Sx1262Driver<
        Spi<'static, Async>,
        Output<'static>,
        Input<'static>,
        Output<'static>,
        Input<'static>,
    >,
    mut gps_rx: UartRx<'static, Async>,
    button: Input<'static>,
) {
    let mut screen = ConsoleScreen;
    screen.show("LoRa APRS Tracker", &[config::beacon::CALLSIGN]);

    // Radio init failure is fatal: there is no other way off this device,
    // so report it and park the task.
    if let Err(error) = radio.init().await {
        crate::debug!("LoRa radio init failed: {:?}", error);
        screen.show("ERROR", &["LoRa init failed"]);
        loop {
            Timer::after(Duration::from_secs(3600)).await;
        }
    }
    crate::debug!("LoRa radio init done");

    let mut source = NmeaFixSource::new();
    let mut tracker = Tracker::new(
        BeaconConfig::default(),
        TrackerCapabilities {
            manual_trigger: true,
        },
        config::beacon::INTERVAL_MINUTES,
    );

    loop {
        // Drain whatever the receiver produced; time out so the scheduler
        // keeps running even with a silent receiver
        let mut buf = [0u8; 64];
        let read = embassy_time::with_timeout(
            Duration::from_millis(GPS_READ_TIMEOUT_MS),
            embedded_io_async::Read::read(&mut gps_rx, &mut buf),
        )
        .await;
        if let Ok(Ok(count)) = read {
            for &byte in &buf[..count] {
                source.feed(byte);
            }
        }

        let snapshot = source.snapshot();
        let manual = Some(button.is_low());
        let uptime_ms = Instant::now().as_millis();

        match tracker
            .step(&snapshot, manual, uptime_ms, &mut radio, &mut screen)
            .await
        {
            Ok(outcome) => {
                if outcome.beacon_sent() {
                    crate::debug!("beacon transmitted");
                }
            }
            Err(error) => {
                // This beacon is lost; the schedule has already moved on
                crate::debug!("beacon failed: {:?}", error);
            }
        }
    }
}
