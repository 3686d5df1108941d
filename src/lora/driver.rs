//! SX1262 transmit driver
//!
//! Minimal command-level driver for the SX1262 implementing the [`LoraRadio`]
//! trait. The beacon protocol is one-way, so only the transmit paths are
//! implemented; the radio sits in standby between beacons.

use crate::config::{link, tcxo};
use crate::lora::traits::{LoraConfig, LoraError, LoraRadio};
use embassy_time::{Duration, Timer};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::spi::SpiBus;

/// SX1262 command opcodes
mod cmd {
    pub const SET_STANDBY: u8 = 0x80;
    pub const SET_TX: u8 = 0x83;
    pub const SET_RF_FREQUENCY: u8 = 0x86;
    pub const SET_PACKET_TYPE: u8 = 0x8A;
    pub const SET_MODULATION_PARAMS: u8 = 0x8B;
    pub const SET_PACKET_PARAMS: u8 = 0x8C;
    pub const SET_TX_PARAMS: u8 = 0x8E;
    pub const SET_BUFFER_BASE_ADDRESS: u8 = 0x8F;
    pub const SET_PA_CONFIG: u8 = 0x95;
    pub const SET_DIO3_AS_TCXO_CTRL: u8 = 0x97;
    pub const SET_DIO2_AS_RF_SWITCH_CTRL: u8 = 0x9D;
    pub const WRITE_REGISTER: u8 = 0x0D;
    pub const WRITE_BUFFER: u8 = 0x0E;
    pub const GET_IRQ_STATUS: u8 = 0x12;
    pub const CLEAR_IRQ_STATUS: u8 = 0x02;
    pub const SET_DIO_IRQ_PARAMS: u8 = 0x08;
}

/// Over-current protection register
const REG_OCP_CONFIGURATION: u16 = 0x08E7;

/// STDBY_RC standby mode
const STDBY_RC: u8 = 0x00;

/// LoRa packet type
const PACKET_TYPE_LORA: u8 = 0x01;

/// TX_DONE IRQ mask
const IRQ_TX_DONE: u16 = 0x0001;

/// Control pins for the SX1262
pub struct Sx1262Pins<Nss, Dio1, Nrst, Busy> {
    pub nss: Nss,
    pub dio1: Dio1,
    pub nrst: Nrst,
    pub busy: Busy,
}

/// SX1262 transmit driver over a shared SPI bus with manual NSS control.
pub struct Sx1262Driver<Spi, Nss, Dio1, Nrst, Busy>
where
    Spi: SpiBus,
    Nss: OutputPin,
    Dio1: InputPin,
    Nrst: OutputPin,
    Busy: InputPin,
{
    spi: Spi,
    nss: Nss,
    dio1: Dio1,
    nrst: Nrst,
    busy: Busy,
    initialised: bool,
}

impl<Spi, Nss, Dio1, Nrst, Busy> Sx1262Driver<Spi, Nss, Dio1, Nrst, Busy>
where
    Spi: SpiBus,
    Nss: OutputPin,
    Dio1: InputPin,
    Nrst: OutputPin,
    Busy: InputPin,
{
    pub fn new(spi: Spi, pins: Sx1262Pins<Nss, Dio1, Nrst, Busy>) -> Self {
        Self {
            spi,
            nss: pins.nss,
            dio1: pins.dio1,
            nrst: pins.nrst,
            busy: pins.busy,
            initialised: false,
        }
    }

    async fn reset(&mut self) {
        let _ = self.nrst.set_low();
        Timer::after(Duration::from_millis(10)).await;
        let _ = self.nrst.set_high();
        Timer::after(Duration::from_millis(20)).await;
    }

    async fn wait_not_busy(&mut self) -> Result<(), LoraError> {
        for _ in 0..1000 {
            if self.busy.is_low().unwrap_or(false) {
                return Ok(());
            }
            Timer::after(Duration::from_micros(100)).await;
        }
        Err(LoraError::BusyTimeout)
    }

    async fn write_command(&mut self, opcode: u8, data: &[u8]) -> Result<(), LoraError> {
        self.wait_not_busy().await?;

        let _ = self.nss.set_low();

        let mut buf = [0u8; 16];
        buf[0] = opcode;
        let len = 1 + data.len().min(15);
        buf[1..len].copy_from_slice(&data[..len - 1]);

        let result = self.spi.write(&buf[..len]).await;
        let _ = self.nss.set_high();

        result.map_err(|_| LoraError::SpiError)
    }

    async fn read_command(&mut self, opcode: u8, len: usize) -> Result<[u8; 4], LoraError> {
        self.wait_not_busy().await?;

        let _ = self.nss.set_low();

        // Opcode + NOP, then the response bytes
        let mut tx_buf = [0u8; 6];
        let mut rx_buf = [0u8; 6];
        tx_buf[0] = opcode;

        let total_len = 2 + len.min(4);
        let result = self
            .spi
            .transfer(&mut rx_buf[..total_len], &tx_buf[..total_len])
            .await;
        let _ = self.nss.set_high();

        result.map_err(|_| LoraError::SpiError)?;

        let mut response = [0u8; 4];
        response[..len.min(4)].copy_from_slice(&rx_buf[2..total_len]);
        Ok(response)
    }

    async fn write_register(&mut self, addr: u16, value: u8) -> Result<(), LoraError> {
        let data = [(addr >> 8) as u8, (addr & 0xFF) as u8, value];
        self.write_command(cmd::WRITE_REGISTER, &data).await
    }

    /// Configure DIO3 as TCXO supply (about 5 ms startup time)
    async fn configure_tcxo(&mut self) -> Result<(), LoraError> {
        let timeout: u32 = 0x000140;
        let data = [
            tcxo::VOLTAGE_CODE,
            (timeout >> 16) as u8,
            (timeout >> 8) as u8,
            timeout as u8,
        ];
        self.write_command(cmd::SET_DIO3_AS_TCXO_CTRL, &data).await
    }

    async fn set_standby_internal(&mut self) -> Result<(), LoraError> {
        self.write_command(cmd::SET_STANDBY, &[STDBY_RC]).await
    }

    async fn set_frequency(&mut self, freq_hz: u32) -> Result<(), LoraError> {
        // Register value = freq * 2^25 / 32 MHz
        let freq_reg = ((freq_hz as u64 * (1 << 25)) / 32_000_000) as u32;
        let data = [
            (freq_reg >> 24) as u8,
            (freq_reg >> 16) as u8,
            (freq_reg >> 8) as u8,
            freq_reg as u8,
        ];
        self.write_command(cmd::SET_RF_FREQUENCY, &data).await
    }

    async fn set_modulation_params(&mut self, config: &LoraConfig) -> Result<(), LoraError> {
        let bw = match config.bandwidth_khz {
            125 => 0x04,
            250 => 0x05,
            500 => 0x06,
            _ => 0x04,
        };

        let cr = match config.coding_rate {
            5..=8 => config.coding_rate - 4,
            _ => 0x01,
        };

        // Low data rate optimisation is required for SF11/SF12 at 125 kHz,
        // which is the normal LoRa APRS channel configuration
        let ldro = if config.spreading_factor >= 11 && config.bandwidth_khz <= 125 {
            0x01
        } else {
            0x00
        };

        let data = [config.spreading_factor, bw, cr, ldro];
        self.write_command(cmd::SET_MODULATION_PARAMS, &data).await
    }

    async fn set_packet_params(&mut self, payload_len: u8) -> Result<(), LoraError> {
        let data = [
            0x00, 0x08, // Preamble length: 8 symbols
            0x00, // Explicit header
            payload_len,
            0x01, // CRC on
            0x00, // Standard IQ
        ];
        self.write_command(cmd::SET_PACKET_PARAMS, &data).await
    }

    async fn configure_pa(&mut self) -> Result<(), LoraError> {
        // High power PA: paDutyCycle=0x04, hpMax=0x07, deviceSel=SX1262
        self.write_command(cmd::SET_PA_CONFIG, &[0x04, 0x07, 0x00, 0x01])
            .await
    }

    async fn set_tx_power(&mut self, power_dbm: i8) -> Result<(), LoraError> {
        let power = if power_dbm < 0 {
            (256 + power_dbm as i16) as u8
        } else {
            power_dbm as u8
        };
        // Power, ramp time 200us
        self.write_command(cmd::SET_TX_PARAMS, &[power, 0x04]).await
    }

    async fn configure_irq(&mut self, irq_mask: u16) -> Result<(), LoraError> {
        let data = [
            (irq_mask >> 8) as u8,
            irq_mask as u8,
            (irq_mask >> 8) as u8, // DIO1 mask
            irq_mask as u8,
            0x00,
            0x00, // DIO2 mask
            0x00,
            0x00, // DIO3 mask
        ];
        self.write_command(cmd::SET_DIO_IRQ_PARAMS, &data).await
    }

    async fn clear_irq(&mut self) -> Result<(), LoraError> {
        self.write_command(cmd::CLEAR_IRQ_STATUS, &[0xFF, 0xFF]).await
    }

    async fn get_irq_status(&mut self) -> Result<u16, LoraError> {
        let response = self.read_command(cmd::GET_IRQ_STATUS, 2).await?;
        Ok(((response[0] as u16) << 8) | response[1] as u16)
    }

    async fn write_tx_buffer(&mut self, data: &[u8]) -> Result<(), LoraError> {
        self.wait_not_busy().await?;

        let _ = self.nss.set_low();

        let mut buf = [0u8; link::MAX_FRAME_LEN + 2];
        buf[0] = cmd::WRITE_BUFFER;
        buf[1] = 0x00; // offset
        let len = data.len().min(link::MAX_FRAME_LEN);
        buf[2..2 + len].copy_from_slice(&data[..len]);

        let result = self.spi.write(&buf[..2 + len]).await;
        let _ = self.nss.set_high();

        result.map_err(|_| LoraError::SpiError)
    }

    /// Wait for a DIO1 interrupt, with a wall-clock timeout.
    async fn wait_for_irq(&mut self, timeout_ms: u32) -> Result<u16, LoraError> {
        let deadline = embassy_time::Instant::now() + Duration::from_millis(timeout_ms as u64);

        loop {
            if self.dio1.is_high().unwrap_or(false) {
                return self.get_irq_status().await;
            }
            if embassy_time::Instant::now() >= deadline {
                return Err(LoraError::Timeout);
            }
            Timer::after(Duration::from_micros(100)).await;
        }
    }
}

impl<Spi, Nss, Dio1, Nrst, Busy> LoraRadio for Sx1262Driver<Spi, Nss, Dio1, Nrst, Busy>
where
    Spi: SpiBus,
    Nss: OutputPin,
    Dio1: InputPin,
    Nrst: OutputPin,
    Busy: InputPin,
{
    async fn init(&mut self) -> Result<(), LoraError> {
        self.reset().await;
        self.wait_not_busy().await?;

        self.set_standby_internal().await?;
        self.configure_tcxo().await?;
        Timer::after(Duration::from_millis(10)).await;

        self.write_command(cmd::SET_DIO2_AS_RF_SWITCH_CTRL, &[0x01])
            .await?;

        // OCP register value = current / 2.5 mA; limit to 140 mA
        self.write_register(REG_OCP_CONFIGURATION, 56).await?;

        self.write_command(cmd::SET_PACKET_TYPE, &[PACKET_TYPE_LORA])
            .await?;
        self.write_command(cmd::SET_BUFFER_BASE_ADDRESS, &[0x00, 0x80])
            .await?;

        self.configure(&LoraConfig::default()).await?;

        self.initialised = true;
        Ok(())
    }

    async fn transmit(&mut self, data: &[u8]) -> Result<(), LoraError> {
        if !self.initialised {
            return Err(LoraError::NotInitialised);
        }
        if data.is_empty() || data.len() > link::MAX_FRAME_LEN {
            return Err(LoraError::InvalidConfig);
        }

        self.set_standby_internal().await?;
        self.set_packet_params(data.len() as u8).await?;
        self.write_tx_buffer(data).await?;

        self.configure_irq(IRQ_TX_DONE).await?;
        self.clear_irq().await?;

        // Start transmission with no radio-side timeout; SF12 frames take
        // several seconds on the air
        self.write_command(cmd::SET_TX, &[0x00, 0x00, 0x00]).await?;
        let irq_status = self.wait_for_irq(10_000).await?;
        self.clear_irq().await?;

        // Back to standby: nothing to listen for on a one-way beacon
        self.set_standby_internal().await?;

        if irq_status & IRQ_TX_DONE != 0 {
            Ok(())
        } else {
            Err(LoraError::TransmitFailed)
        }
    }

    async fn configure(&mut self, config: &LoraConfig) -> Result<(), LoraError> {
        self.set_standby_internal().await?;
        self.set_frequency(config.frequency_hz).await?;
        self.set_modulation_params(config).await?;
        // PA config must precede SetTxParams
        self.configure_pa().await?;
        self.set_tx_power(config.tx_power_dbm).await?;
        Ok(())
    }

    async fn set_standby(&mut self) -> Result<(), LoraError> {
        self.set_standby_internal().await
    }
}
