#![no_std]
#![no_main]

use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice;
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    spi::{
        master::{Config as SpiConfig, Spi},
        Mode,
    },
    time::Rate,
    timer::timg::TimerGroup,
    Async,
};
// defmt global logger, console UART at 115200
use esp_println as _;
use static_cell::StaticCell;

use v2sense_node::{
    clock::EmbassyClock,
    config::TrackerConfig,
    gnss::driver::{self as gnss_driver, GnssUart, GNSS_BAUD_RATE},
    lora::driver::{Lora, LoraConfig},
    tracker::Tracker,
};

static SPI_BUS: StaticCell<Mutex<CriticalSectionRawMutex, Spi<'static, Async>>> =
    StaticCell::new();

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    defmt::info!("v2sense node starting");

    // GPS receiver on UART1
    let gnss = GnssUart::new(
        peripherals.UART1,
        gnss_driver::Config {
            baud_rate: GNSS_BAUD_RATE,
            rx_pin: peripherals.GPIO16.into(),
            tx_pin: peripherals.GPIO17.into(),
        },
    )
    .expect("GPS UART configuration rejected");

    // SX1278 on SPI2
    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(1))
            .with_mode(Mode::_0),
    )
    .expect("LoRa SPI configuration rejected")
    .with_sck(peripherals.GPIO9)
    .with_mosi(peripherals.GPIO10)
    .with_miso(peripherals.GPIO11)
    .into_async();

    let spi_bus = SPI_BUS.init(Mutex::new(spi));

    let nss = Output::new(peripherals.GPIO18, Level::High, OutputConfig::default());
    let reset = Output::new(peripherals.GPIO14, Level::High, OutputConfig::default());
    // GPIO26 belongs to the flash interface on the S3
    let dio0 = Input::new(
        peripherals.GPIO4,
        InputConfig::default().with_pull(Pull::None),
    );

    defmt::info!("Initializing LoRa...");
    let spi_device = SpiDevice::new(spi_bus, nss);
    let radio = Lora::new(spi_device, reset, dio0, LoraConfig::default()).await;

    Tracker::boot(gnss, radio, EmbassyClock, TrackerConfig::default())
        .run()
        .await
}
