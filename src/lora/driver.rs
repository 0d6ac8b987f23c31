use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Duration, Timer};
use esp_hal::gpio::{Input, Output};
use esp_hal::spi::master::Spi;
use esp_hal::Async;
use lora_phy::iv::GenericSx127xInterfaceVariant;
use lora_phy::mod_params::{
    Bandwidth, CodingRate, ModulationParams, PacketParams, SpreadingFactor,
};
use lora_phy::sx127x::{self, Sx1276, Sx127x};
use lora_phy::{LoRa, RxMode};

use super::{LoraError, PacketBuffer, RadioLink, MAX_PACKET_SIZE};

const LORA_FREQUENCY: u32 = 433_000_000; // 433 MHz (SX1278 module)

/// How long a receive poll waits for a packet before reporting none.
const RX_POLL_WINDOW: Duration = Duration::from_millis(5);

pub type LoraSpi<'a> = SpiDevice<'a, CriticalSectionRawMutex, Spi<'a, Async>, Output<'a>>;

type Radio<'a> = LoRa<
    Sx127x<LoraSpi<'a>, GenericSx127xInterfaceVariant<Output<'a>, Input<'a>>, Sx1276>,
    Delay,
>;

// Configuration parameters for the LoRa interface. The defaults match the
// Arduino LoRa library so other nodes can hear us.
pub struct LoraConfig {
    pub frequency: u32,
    pub spreading_factor: SpreadingFactor,
    pub bandwidth: Bandwidth,
    pub coding_rate: CodingRate,
    pub preamble_length: u16,
    pub crc_on: bool,
    pub output_power: i32,
}

impl Default for LoraConfig {
    fn default() -> Self {
        Self {
            frequency: LORA_FREQUENCY,
            spreading_factor: SpreadingFactor::_7,
            bandwidth: Bandwidth::_125KHz,
            coding_rate: CodingRate::_4_5,
            preamble_length: 8,
            crc_on: false,
            output_power: 17,
        }
    }
}

pub struct Lora<'a> {
    lora: Radio<'a>,
    modulation_params: ModulationParams,
    tx_packet_params: PacketParams,
    rx_packet_params: PacketParams,
    output_power: i32,
    listening: bool,
    packet: PacketBuffer,
}

impl<'a> Lora<'a> {
    /// Resets and configures the transceiver.
    ///
    /// An error here means the chip did not respond.
    pub async fn new(
        spi_device: LoraSpi<'a>,
        reset: Output<'a>,
        dio0: Input<'a>,
        config: LoraConfig,
    ) -> Result<Self, LoraError> {
        let iv = GenericSx127xInterfaceVariant::new(reset, dio0, None, None)
            .map_err(|_| LoraError::InvalidConfig)?;

        // SX1278 is register compatible with the SX1276 variant
        let sx127x_config = sx127x::Config {
            chip: Sx1276,
            tcxo_used: false,
            tx_boost: true,
            rx_boost: true,
        };

        let radio = Sx127x::new(spi_device, iv, sx127x_config);
        // Private network sync word (0x12), as the Arduino library uses
        let mut lora = LoRa::new(radio, false, Delay).await?;

        let modulation_params = lora.create_modulation_params(
            config.spreading_factor,
            config.bandwidth,
            config.coding_rate,
            config.frequency,
        )?;

        let tx_packet_params = lora.create_tx_packet_params(
            config.preamble_length,
            false,
            config.crc_on,
            false,
            &modulation_params,
        )?;

        let rx_packet_params = lora.create_rx_packet_params(
            config.preamble_length,
            false,
            MAX_PACKET_SIZE as u8,
            config.crc_on,
            false,
            &modulation_params,
        )?;

        Ok(Self {
            lora,
            modulation_params,
            tx_packet_params,
            rx_packet_params,
            output_power: config.output_power,
            listening: false,
            packet: PacketBuffer::new(),
        })
    }

    async fn start_listening(&mut self) -> Result<(), LoraError> {
        if !self.listening {
            self.lora
                .prepare_for_rx(
                    RxMode::Continuous,
                    &self.modulation_params,
                    &self.rx_packet_params,
                )
                .await?;
            self.listening = true;
        }
        Ok(())
    }
}

impl RadioLink for Lora<'_> {
    type Error = LoraError;

    async fn transmit(&mut self, payload: &[u8]) -> Result<(), LoraError> {
        if payload.len() > MAX_PACKET_SIZE {
            return Err(LoraError::PayloadTooLarge);
        }

        // TX leaves the chip in standby
        self.listening = false;

        self.lora
            .prepare_for_tx(
                &self.modulation_params,
                &mut self.tx_packet_params,
                self.output_power,
                payload,
            )
            .await?;

        match self.lora.tx().await {
            Ok(()) => {
                crate::log_debug!("TX DONE");
                Ok(())
            }
            Err(err) => {
                crate::log_error!("Radio error = {}", err);
                Err(LoraError::TransmissionError)
            }
        }
    }

    async fn poll_incoming(&mut self) -> Result<usize, LoraError> {
        self.start_listening().await?;

        let rx_buffer = self.packet.receive_slot();
        let received = select(
            self.lora.rx(&self.rx_packet_params, rx_buffer),
            Timer::after(RX_POLL_WINDOW),
        )
        .await;

        match received {
            Either::First(Ok((received_len, rx_pkt_status))) => {
                crate::log_debug!(
                    "packet info rssi:{} snr:{}",
                    rx_pkt_status.rssi,
                    rx_pkt_status.snr
                );
                Ok(self.packet.commit(received_len as usize))
            }
            Either::First(Err(err)) => {
                self.listening = false;
                Err(err.into())
            }
            Either::Second(_) => Ok(0),
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.packet.next_byte()
    }
}
