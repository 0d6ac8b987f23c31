use core::fmt::Debug;

use defmt::Format;

use crate::clock::{elapsed_ms, Clock};
use crate::config::TrackerConfig;
use crate::gnss::{Fix, GnssDecoder, SerialSource};
use crate::lora::RadioLink;
use crate::telemetry::{InboundPacket, MessageError, StatusMessage};

/// Size of each chunk pulled from the GPS UART while draining.
const SERIAL_CHUNK_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum State {
    Running,
    /// Terminal. Only entered when the radio failed to initialize.
    Halted,
}

/// Send gate measured from one send start to the next.
#[derive(Debug, Clone, Format)]
pub struct Cadence {
    interval_ms: u32,
    last_send_ms: u32,
}

impl Cadence {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_send_ms: 0,
        }
    }

    /// Returns `true`, and restarts the interval at `now_ms`, once strictly
    /// more than the interval has elapsed since the last send.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if elapsed_ms(now_ms, self.last_send_ms) > self.interval_ms {
            self.last_send_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// What a single pass of the loop did.
#[derive(Debug, Default, PartialEq)]
pub struct Iteration {
    pub sent: Option<StatusMessage>,
    pub received: Option<InboundPacket>,
}

/// The vehicle tracker: GPS in, status broadcasts out, inbound packets logged.
pub struct Tracker<S, R, C> {
    serial: S,
    decoder: GnssDecoder,
    // `None` once halted
    radio: Option<R>,
    clock: C,
    config: TrackerConfig,
    cadence: Cadence,
}

impl<S, R, C> Tracker<S, R, C>
where
    S: SerialSource,
    R: RadioLink,
    C: Clock,
{
    /// Builds the tracker from the outcome of radio initialization.
    ///
    /// A failed radio leaves the tracker [`State::Halted`] for good.
    pub fn boot<E: Debug + Format>(
        serial: S,
        radio: Result<R, E>,
        clock: C,
        config: TrackerConfig,
    ) -> Self {
        let radio = match radio {
            Ok(radio) => {
                crate::log_info!("LoRa init succeeded.");
                Some(radio)
            }
            Err(e) => {
                crate::log_error!("LoRa init failed. Check connections. {:?}", e);
                None
            }
        };

        let cadence = Cadence::new(config.send_interval_ms);

        Self {
            serial,
            decoder: GnssDecoder::new(),
            radio,
            clock,
            config,
            cadence,
        }
    }

    pub fn state(&self) -> State {
        if self.radio.is_some() {
            State::Running
        } else {
            State::Halted
        }
    }

    pub fn current_fix(&self) -> Fix {
        self.decoder.current_fix()
    }

    /// Runs the loop forever. A halted tracker parks without doing any work.
    pub async fn run(mut self) -> ! {
        loop {
            match self.state() {
                State::Running => {
                    self.step().await;
                }
                State::Halted => core::future::pending::<()>().await,
            }
        }
    }

    /// One pass: drain GPS input, send if the cadence allows, poll for inbound packets.
    pub async fn step(&mut self) -> Iteration {
        let mut iteration = Iteration::default();
        if self.state() == State::Halted {
            return iteration;
        }

        self.drain_serial();

        if self.cadence.poll(self.clock.now_ms()) {
            iteration.sent = self.send_status().await;
        }

        iteration.received = self.receive().await;
        iteration
    }

    fn drain_serial(&mut self) {
        let mut read_buffer = [0u8; SERIAL_CHUNK_SIZE];

        loop {
            let bytes_read = self.serial.read_available(&mut read_buffer);
            if bytes_read == 0 {
                break;
            }

            for &byte in &read_buffer[..bytes_read] {
                self.decoder.feed(byte);
            }
        }
    }

    fn compose_status(&self) -> Result<StatusMessage, MessageError> {
        let fix = self.decoder.current_fix();
        crate::log_debug!("Fix snapshot: {:?}", fix);

        let coordinate = fix.coordinate_or(self.config.fallback);
        StatusMessage::new(
            self.config.vehicle_id,
            coordinate.latitude,
            coordinate.longitude,
            fix.speed,
        )
    }

    async fn send_status(&mut self) -> Option<StatusMessage> {
        let message = match self.compose_status() {
            Ok(message) => message,
            Err(e) => {
                crate::log_error!("Failed to format status message: {:?}", e);
                return None;
            }
        };

        let radio = self.radio.as_mut()?;
        match radio.transmit(message.as_bytes()).await {
            Ok(()) => crate::log_info!("Sent: {}", message.as_str()),
            Err(e) => crate::log_error!("Failed to send {}: {:?}", message.as_str(), e),
        }

        Some(message)
    }

    async fn receive(&mut self) -> Option<InboundPacket> {
        let radio = self.radio.as_mut()?;

        let pending = match radio.poll_incoming().await {
            Ok(pending) => pending,
            Err(e) => {
                crate::log_warn!("rx unsuccessful: {:?}", e);
                return None;
            }
        };
        if pending == 0 {
            return None;
        }

        let mut packet = InboundPacket::new();
        while let Some(byte) = radio.read_byte() {
            if !packet.push(byte) {
                break;
            }
        }

        match packet.as_text() {
            Some(text) => crate::log_info!("Received: {}", text),
            None => crate::log_info!("Received: {:?}", packet.as_bytes()),
        }

        Some(packet)
    }
}
