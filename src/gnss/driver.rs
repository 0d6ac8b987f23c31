use super::error::GnssError;
use super::SerialSource;
use esp_hal::{
    gpio::AnyPin,
    peripherals::UART1,
    uart::{self, DataBits, Parity, RxConfig, RxError, StopBits, Uart, UartRx, UartTx},
    Blocking,
};

pub const GNSS_BAUD_RATE: u32 = 9600;

pub struct Config {
    pub baud_rate: u32,
    pub rx_pin: AnyPin,
    pub tx_pin: AnyPin,
}

/// UART link to the GPS receiver, 8 data bits, no parity, 1 stop bit.
pub struct GnssUart {
    rx: UartRx<'static, Blocking>,
    // Held so the TX pin stays configured; nothing is sent to the receiver
    _tx: UartTx<'static, Blocking>,
}

impl GnssUart {
    pub fn new(uart1: UART1, config: Config) -> Result<Self, GnssError> {
        let uart_config = uart::Config::default()
            .with_baudrate(config.baud_rate)
            .with_data_bits(DataBits::_8)
            .with_parity(Parity::None)
            .with_stop_bits(StopBits::_1)
            .with_rx(RxConfig::default().with_fifo_full_threshold(1024));

        let uart = Uart::new(uart1, uart_config)
            .map_err(|_| GnssError::UartError)?
            .with_rx(config.rx_pin)
            .with_tx(config.tx_pin);

        let (rx, tx) = uart.split();

        Ok(Self { rx, _tx: tx })
    }

    fn drain_uart_buffer(&mut self) {
        crate::log_debug!("Draining UART buffer");

        loop {
            let mut temp_buf = [0u8; 128];
            match self.rx.read_buffered(&mut temp_buf) {
                Ok(0) => break,
                Ok(_) => continue,
                Err(err) => {
                    crate::log_error!("UART read error while draining: {}", err);
                    break;
                }
            }
        }
    }

    fn handle_uart_error(&mut self, e: RxError) {
        crate::log_warn!("GNSS UART error: {}", e);

        if let RxError::FifoOverflowed = e {
            self.drain_uart_buffer();
        }
    }
}

impl SerialSource for GnssUart {
    fn read_available(&mut self, buffer: &mut [u8]) -> usize {
        match self.rx.read_buffered(buffer) {
            Ok(bytes_read) => bytes_read,
            Err(e) => {
                self.handle_uart_error(e);
                0
            }
        }
    }
}
