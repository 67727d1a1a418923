#![no_std]
#![no_main]

use cyw43::JoinOptions;
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::{error, info, unwrap, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_net::{Runner as NetRunner, Stack, StackResources};
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker, Timer};
use rand_core::RngCore;
use sensors_to_http::{
    build_request, config, run_send_cycle, BoardSensors, CloseReason, Connection, SampleStore,
    SensorSnapshot, StackTransport,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Signal for passing the latest snapshot from the sampler to the poster.
/// Using Signal instead of Channel provides "latest value wins" semantics:
/// the poster always transmits the most recent sample and never queues
/// history.
static SNAPSHOT_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, SensorSnapshot>> =
    StaticCell::new();

/// Wi-Fi chip driver state.
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();

/// TCP/IP stack resources (sockets, DNS queries).
static NET_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("sensors-to-http starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Sensor setup ---
    let button1 = Input::new(p.PIN_5, Pull::Up);
    let button2 = Input::new(p.PIN_6, Pull::Up);
    let adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let joy_x = Channel::new_pin(p.PIN_27, Pull::None);
    let joy_y = Channel::new_pin(p.PIN_26, Pull::None);
    let temperature = Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);
    let sensors = BoardSensors::new(button1, button2, adc, joy_x, joy_y, temperature);

    // --- Wi-Fi chip bring-up (CYW43439 over PIO SPI) ---
    let fw = include_bytes!("../../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../../cyw43-firmware/43439A0_clm.bin");

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    unwrap!(spawner.spawn(cyw43_task(runner)));

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    // --- TCP/IP stack ---
    let net_config = embassy_net::Config::dhcpv4(Default::default());
    let seed = RoscRng.next_u64();
    let (stack, net_runner) = embassy_net::new(
        net_device,
        net_config,
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    unwrap!(spawner.spawn(net_task(net_runner)));

    // The poster is useless without the link, so keep retrying forever.
    loop {
        match control
            .join(config::WIFI_SSID, JoinOptions::new(config::WIFI_PASS.as_bytes()))
            .await
        {
            Ok(()) => break,
            Err(err) => {
                warn!("wifi join failed (status {}), retrying...", err.status);
                Timer::after(Duration::from_secs(5)).await;
            }
        }
    }
    info!("wifi associated, waiting for DHCP...");
    stack.wait_config_up().await;
    if let Some(cfg) = stack.config_v4() {
        info!("link up, address {}", cfg.address);
    }

    let signal = SNAPSHOT_SIGNAL.init(Signal::new());
    unwrap!(spawner.spawn(sampler_task(sensors, signal)));
    unwrap!(spawner.spawn(poster_task(stack, control, signal)));

    info!("sensors-to-http initialized");
}

/// Wi-Fi chip task - services the CYW43439.
#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

/// Network task - runs the TCP/IP stack.
#[embassy_executor::task]
async fn net_task(mut runner: NetRunner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Sampler task - overwrites the snapshot every sampling period and signals
/// the latest value.
#[embassy_executor::task]
async fn sampler_task(
    mut sensors: BoardSensors<'static>,
    signal: &'static Signal<CriticalSectionRawMutex, SensorSnapshot>,
) {
    let mut store = SampleStore::new();
    let mut ticker = Ticker::every(config::SAMPLE_PERIOD);
    loop {
        store.capture(&mut sensors).await;
        signal.signal(*store.snapshot());
        ticker.next().await;
    }
}

/// Poster task - every posting period, renders the latest snapshot and runs
/// one send cycle to completion. Cycles run back to back, so a new attempt
/// can never overlap a previous one.
#[embassy_executor::task]
async fn poster_task(
    stack: Stack<'static>,
    mut control: cyw43::Control<'static>,
    signal: &'static Signal<CriticalSectionRawMutex, SensorSnapshot>,
) {
    let mut conn = Connection::new();
    let mut ticker = Ticker::every(config::POST_PERIOD);
    loop {
        ticker.next().await;
        let snapshot = signal.wait().await;

        let request = match build_request(&snapshot, &config::TARGET) {
            Ok(request) => request,
            Err(err) => {
                error!("request render failed: {:?}", err);
                continue;
            }
        };

        // On-board LED on while an exchange is in flight.
        control.gpio_set(0, true).await;

        let mut rx_buffer = [0u8; 1024];
        let mut tx_buffer = [0u8; 1024];
        let mut transport = StackTransport::new(stack, &mut rx_buffer, &mut tx_buffer);

        match run_send_cycle(&mut conn, &mut transport, &config::TARGET, request).await {
            Ok(CloseReason::Success) => info!("snapshot posted"),
            Ok(CloseReason::Error(kind)) => error!("post failed: {:?}", kind),
            Err(_) => warn!("previous post still in flight, skipping this cycle"),
        }

        control.gpio_set(0, false).await;
    }
}
