//! The command set for the SH1106, and the senders that frame commands and image data onto the
//! bus.
//!
//! Every transaction is `start(address)`, a control byte telling the controller whether the rest
//! of the transaction is commands or display RAM data, the payload, then `stop()`. Command
//! arguments are masked to their register width; nothing here validates ranges.

use crate::interface::BusInterface;

pub mod consts {
    /// Columns shown on the glass.
    pub const COLS_USED: u8 = 128;
    /// Columns addressable in SH1106 display RAM.
    pub const SH1106_COLS: u8 = 130;
    /// Columns addressable in SSD1306 display RAM.
    pub const SSD1306_COLS: u8 = 128;
    /// Physical column count of the controller selected at build time.
    #[cfg(not(feature = "ssd1306"))]
    pub const COLS_TOTAL: u8 = SH1106_COLS;
    #[cfg(feature = "ssd1306")]
    pub const COLS_TOTAL: u8 = SSD1306_COLS;
    /// Pages of 8 pixel rows each.
    pub const PAGES: u8 = 8;
    /// Bytes in a full frame of visible pixels.
    pub const SCREEN_BUFFER_SIZE: u16 = COLS_USED as u16 * PAGES as u16;

    /// 7-bit bus address (0x78 as an 8-bit write address).
    pub const DEFAULT_ADDRESS: u8 = 0x3C;
    pub const BUS_CLOCK_HZ: u32 = 800_000;

    /// Control byte opening a run of command bytes.
    pub const CONTROL_COMMAND: u8 = 0x00;
    /// Control byte opening a run of display RAM bytes.
    pub const CONTROL_DATA: u8 = 0x40;
}

use self::consts::*;

/// Memory addressing modes a controller may offer. The SH1106 only implements page addressing;
/// see `Display::set_addressing_mode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressingMode {
    Horizontal = 0x00,
    Vertical = 0x01,
    Page = 0x02,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Turn the panel on (`true`) or put it to sleep.
    SetDisplayOn(bool),
    /// Show display RAM inverted (`true`) or normal.
    SetInverse(bool),
    /// Light every pixel regardless of display RAM (`true`), or resume showing RAM.
    SetEntireDisplayOn(bool),
    /// Point the write cursor at a page (0-7) and column (0-131). Sent as page address, column
    /// low nibble and column high nibble in one transaction.
    SetPageColumn(u8, u8),
    /// Set the display clock divide ratio (low nibble) and oscillator frequency (high nibble).
    SetClockDivider(u8),
    /// Set the number of active COM lines, 1-64.
    SetMultiplexRatio(u8),
    /// Shift the COM mapping by 0-63 lines.
    SetDisplayOffset(u8),
    /// Set the display RAM line shown on the first row, 0-63.
    SetStartLine(u8),
    /// Enable the internal charge pump.
    SetChargePump(bool),
    /// Select the memory addressing mode register.
    SetMemoryAddressingMode(AddressingMode),
    /// Map column address 0 to the rightmost segment (`true`).
    SetSegmentRemap(bool),
    /// Scan COM lines from the last to the first (`true`), flipping the image vertically.
    SetComScanReversed(bool),
    /// Use the alternative COM pin layout (`true`) rather than sequential.
    SetComPinConfig(bool),
    /// Set the contrast, 0-255.
    SetContrast(u8),
    /// Set the pre-charge phase lengths (phase 1, phase 2), each 1-15 clocks.
    SetPrechargePeriod(u8, u8),
    /// Set the VCOM deselect level register.
    SetVcomDeselectLevel(u8),
}

impl Command {
    /// Send this command in one transaction, using the sender matching its length.
    pub fn send<BI>(self, iface: &mut BI, address: u8) -> Result<(), BI::Error>
    where
        BI: BusInterface,
    {
        match self {
            Command::SetDisplayOn(on) => send_command1(iface, address, 0xAE | on as u8),
            Command::SetInverse(inverse) => send_command1(iface, address, 0xA6 | inverse as u8),
            Command::SetEntireDisplayOn(on) => send_command1(iface, address, 0xA4 | on as u8),
            Command::SetPageColumn(page, col) => send_command3(
                iface,
                address,
                0xB0 | (page & 0x07),
                col & 0x0F,
                0x10 | ((col >> 4) & 0x0F),
            ),
            Command::SetClockDivider(divider) => send_command2(iface, address, 0xD5, divider),
            Command::SetMultiplexRatio(ratio) => {
                send_command2(iface, address, 0xA8, ratio.wrapping_sub(1) & 0x3F)
            }
            Command::SetDisplayOffset(offset) => {
                send_command2(iface, address, 0xD3, offset & 0x3F)
            }
            Command::SetStartLine(line) => send_command1(iface, address, 0x40 | (line & 0x3F)),
            Command::SetChargePump(enable) => {
                send_command2(iface, address, 0x8D, if enable { 0x14 } else { 0x10 })
            }
            Command::SetMemoryAddressingMode(mode) => {
                send_command2(iface, address, 0x20, mode as u8)
            }
            Command::SetSegmentRemap(remap) => send_command1(iface, address, 0xA0 | remap as u8),
            Command::SetComScanReversed(reversed) => {
                send_command1(iface, address, if reversed { 0xC8 } else { 0xC0 })
            }
            Command::SetComPinConfig(alternative) => {
                send_command2(iface, address, 0xDA, 0x02 | (alternative as u8) << 4)
            }
            Command::SetContrast(contrast) => send_command2(iface, address, 0x81, contrast),
            Command::SetPrechargePeriod(phase_1, phase_2) => send_command2(
                iface,
                address,
                0xD9,
                (phase_2 & 0x0F) << 4 | (phase_1 & 0x0F),
            ),
            Command::SetVcomDeselectLevel(level) => send_command2(iface, address, 0xDB, level),
        }
    }
}

/// Run `body` inside a transaction to `address`. `stop()` is issued even if `body` fails, and the
/// first failure wins.
fn transaction<BI, F>(iface: &mut BI, address: u8, body: F) -> Result<(), BI::Error>
where
    BI: BusInterface,
    F: FnOnce(&mut BI) -> Result<(), BI::Error>,
{
    let result = iface.start(address).and_then(|_| body(iface));
    let stopped = iface.stop();
    result.and(stopped)
}

pub fn send_command1<BI>(iface: &mut BI, address: u8, cmd: u8) -> Result<(), BI::Error>
where
    BI: BusInterface,
{
    transaction(iface, address, |iface| {
        iface.write(CONTROL_COMMAND)?;
        iface.write(cmd)
    })
}

pub fn send_command2<BI>(iface: &mut BI, address: u8, cmd1: u8, cmd2: u8) -> Result<(), BI::Error>
where
    BI: BusInterface,
{
    transaction(iface, address, |iface| {
        iface.write(CONTROL_COMMAND)?;
        iface.write(cmd1)?;
        iface.write(cmd2)
    })
}

pub fn send_command3<BI>(
    iface: &mut BI,
    address: u8,
    cmd1: u8,
    cmd2: u8,
    cmd3: u8,
) -> Result<(), BI::Error>
where
    BI: BusInterface,
{
    transaction(iface, address, |iface| {
        iface.write(CONTROL_COMMAND)?;
        iface.write(cmd1)?;
        iface.write(cmd2)?;
        iface.write(cmd3)
    })
}

/// Stream `data` into display RAM as one transaction. The rest of `data` is dropped once a write
/// fails.
pub fn send_data<BI, I>(iface: &mut BI, address: u8, data: I) -> Result<(), BI::Error>
where
    BI: BusInterface,
    I: IntoIterator<Item = u8>,
{
    transaction(iface, address, |iface| {
        iface.write(CONTROL_DATA)?;
        data.into_iter().try_for_each(|byte| iface.write(byte))
    })
}
