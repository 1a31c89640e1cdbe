//! Bring-up configuration for the controller: where it lives on the bus, how many physical columns
//! it has, and the register values sent by `Display::begin`.

use crate::command::consts::*;
use crate::command::{AddressingMode, Command};
use crate::interface;

/// The physical column layout of the controller's display RAM. Both variants show
/// `consts::COLS_USED` columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColumnLayout {
    /// 132-column RAM of which 130 columns are addressed; each row is padded past the visible
    /// area.
    Sh1106,
    /// RAM exactly as wide as the glass; no padding.
    Ssd1306,
}

impl ColumnLayout {
    /// Addressable columns per page.
    pub fn total(self) -> u8 {
        match self {
            ColumnLayout::Sh1106 => SH1106_COLS,
            ColumnLayout::Ssd1306 => SSD1306_COLS,
        }
    }
}

impl Default for ColumnLayout {
    /// The layout selected by the `ssd1306` cargo feature.
    fn default() -> Self {
        if COLS_TOTAL == SSD1306_COLS {
            ColumnLayout::Ssd1306
        } else {
            ColumnLayout::Sh1106
        }
    }
}

/// A configuration for the display. The defaults reproduce the usual 128x64 module bring-up;
/// builder methods override single values.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) address: u8,
    pub(crate) bus_clock_hz: u32,
    pub(crate) columns: ColumnLayout,
    clock_divider: u8,
    contrast: u8,
    precharge: (u8, u8),
    vcom_deselect: u8,
    segment_remap: bool,
    com_scan_reversed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: DEFAULT_ADDRESS,
            bus_clock_hz: BUS_CLOCK_HZ,
            columns: ColumnLayout::default(),
            clock_divider: 0x80,
            contrast: 0xCF,
            precharge: (1, 15),
            vcom_deselect: 0x40,
            segment_remap: true,
            com_scan_reversed: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Talk to the controller at 7-bit bus `address`.
    pub fn address(self, address: u8) -> Self {
        Self { address, ..self }
    }

    /// Bus clock requested from the transport in `Display::begin`.
    pub fn bus_clock(self, hz: u32) -> Self {
        Self {
            bus_clock_hz: hz,
            ..self
        }
    }

    /// Override the column layout chosen at build time.
    pub fn columns(self, columns: ColumnLayout) -> Self {
        Self { columns, ..self }
    }

    /// See `Command::SetContrast`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self { contrast, ..self }
    }

    /// See `Command::SetClockDivider`.
    pub fn clock_divider(self, clock_divider: u8) -> Self {
        Self {
            clock_divider,
            ..self
        }
    }

    /// See `Command::SetPrechargePeriod`.
    pub fn precharge_period(self, phase_1: u8, phase_2: u8) -> Self {
        Self {
            precharge: (phase_1, phase_2),
            ..self
        }
    }

    /// See `Command::SetVcomDeselectLevel`.
    pub fn vcom_deselect_level(self, level: u8) -> Self {
        Self {
            vcom_deselect: level,
            ..self
        }
    }

    /// Mirror the image horizontally when `false`.
    pub fn segment_remap(self, remap: bool) -> Self {
        Self {
            segment_remap: remap,
            ..self
        }
    }

    /// Mirror the image vertically when `false`.
    pub fn com_scan_reversed(self, reversed: bool) -> Self {
        Self {
            com_scan_reversed: reversed,
            ..self
        }
    }

    /// The bring-up sequence, in the order it is sent.
    pub fn init_commands(&self) -> [Command; 15] {
        [
            Command::SetDisplayOn(false),
            Command::SetClockDivider(self.clock_divider),
            Command::SetMultiplexRatio(PAGES * 8),
            Command::SetDisplayOffset(0),
            Command::SetStartLine(0),
            Command::SetChargePump(true),
            Command::SetMemoryAddressingMode(AddressingMode::Horizontal),
            Command::SetSegmentRemap(self.segment_remap),
            Command::SetComScanReversed(self.com_scan_reversed),
            Command::SetComPinConfig(true),
            Command::SetContrast(self.contrast),
            Command::SetPrechargePeriod(self.precharge.0, self.precharge.1),
            Command::SetVcomDeselectLevel(self.vcom_deselect),
            Command::SetEntireDisplayOn(false),
            Command::SetInverse(false),
        ]
    }

    /// Transmit the bring-up sequence to the display at `iface`, one transaction per command.
    /// Every command is sent even after a failure; the first failure is returned.
    pub(crate) fn send<BI>(&self, iface: &mut BI) -> Result<(), BI::Error>
    where
        BI: interface::BusInterface,
    {
        self.init_commands()
            .iter()
            .fold(Ok(()), |result, cmd| result.and(cmd.send(iface, self.address)))
    }
}
