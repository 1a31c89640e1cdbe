//! The main API to the display driver. A `Display` owns the bus for its lifetime, brings the
//! controller up, and streams horizontal-scan frame buffers into page-addressed display RAM.

pub mod paging;

use itertools::repeat_n;

use crate::command::{self, AddressingMode, Command};
use crate::config::{ColumnLayout, Config};
use crate::display::paging::{Cursor, Segments};
use crate::interface;

/// A driver session for one SH1106 display.
///
/// The write cursor survives between calls, so consecutive `fill_screen_sized` calls continue
/// where the previous one stopped, as if the controller supported horizontal addressing. The
/// session is not reentrant; callers sharing it between contexts must serialize access.
pub struct Display<BI>
where
    BI: interface::BusInterface,
{
    iface: BI,
    screen_buffer_size: u16,
    config: Config,
    cursor: Cursor,
    inverted: bool,
}

impl<BI> Display<BI>
where
    BI: interface::BusInterface,
{
    /// Construct a driver on `iface` with the default configuration. `screen_buffer_size` is the
    /// number of bytes `fill_screen` writes.
    pub fn new(iface: BI, screen_buffer_size: u16) -> Self {
        Self::with_config(iface, screen_buffer_size, Config::default())
    }

    pub fn with_config(iface: BI, screen_buffer_size: u16, config: Config) -> Self {
        Display {
            iface,
            screen_buffer_size,
            config,
            cursor: Cursor::default(),
            inverted: false,
        }
    }

    /// Reinitialize the bus and send the bring-up sequence. Call once before writing. The write
    /// cursor is moved back to the top-left cell.
    ///
    /// Every step is attempted even if an earlier one fails; the first failure is returned.
    pub fn begin(&mut self) -> Result<(), BI::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "display bring-up at {=u8:#x}, bus {=u32} Hz",
            self.config.address,
            self.config.bus_clock_hz
        );
        self.cursor = Cursor::default();
        let deinit = self.iface.deinit();
        let init = self.iface.init(self.config.bus_clock_hz);
        deinit.and(init).and(self.config.send(&mut self.iface))
    }

    /// Write `screen_buffer_size` bytes of `buffer` from the current cursor.
    pub fn fill_screen(&mut self, buffer: &[u8]) -> Result<(), BI::Error> {
        self.write_frame(buffer, self.screen_buffer_size)
    }

    /// Write `size` bytes of `buffer` from the current cursor.
    ///
    /// `stride` is not supported: it is accepted so callers written for controllers with strided
    /// writes keep compiling, and it has no effect. Data is always written as one contiguous run.
    pub fn fill_screen_sized(
        &mut self,
        buffer: &[u8],
        size: u16,
        stride: u8,
    ) -> Result<(), BI::Error> {
        if stride != 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("stride {=u8} is not supported and was ignored", stride);
        }
        self.write_frame(buffer, size)
    }

    /// Switch display inversion and send it to the controller right away, along with display on.
    /// The write cursor is left where it is, so inversion can change in the middle of a frame.
    pub fn set_inverse(&mut self, inverted: bool) -> Result<(), BI::Error> {
        self.inverted = inverted;
        self.refresh()
    }

    /// Does nothing. The SH1106 only implements page addressing, and this driver always emulates
    /// horizontal addressing on top of it whatever `mode` is requested. Provided so code written
    /// for controllers with real horizontal or vertical addressing can call it unchanged.
    pub fn set_addressing_mode(&mut self, _mode: AddressingMode) {}

    /// The next cell the following write will fill.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn screen_buffer_size(&self) -> u16 {
        self.screen_buffer_size
    }

    pub fn columns(&self) -> ColumnLayout {
        self.config.columns
    }

    /// Give back the bus.
    pub fn release(self) -> BI {
        self.iface
    }

    fn refresh(&mut self) -> Result<(), BI::Error> {
        let address = self.config.address;
        let on = Command::SetDisplayOn(true).send(&mut self.iface, address);
        let inverse = Command::SetInverse(self.inverted).send(&mut self.iface, address);
        on.and(inverse)
    }

    /// Stream up to `size` bytes of `buffer` page by page, padding every finished row out to the
    /// physical column count with the background color.
    ///
    /// A failed transaction does not stop the frame: every segment is still issued and the cursor
    /// moves by the number of bytes requested. The first failure is returned at the end.
    fn write_frame(&mut self, buffer: &[u8], size: u16) -> Result<(), BI::Error> {
        let len = usize::from(size).min(buffer.len());
        if len < usize::from(size) {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "buffer holds {=usize} bytes, {=u16} requested",
                buffer.len(),
                size
            );
        }
        if len == 0 {
            return Ok(());
        }

        let address = self.config.address;
        let blank = if self.inverted { 0xFF } else { 0x00 };
        let mut result = self.refresh();
        let cols_total = self.config.columns.total();
        for (segment, row) in Segments::new(&mut self.cursor, &buffer[..len], cols_total) {
            #[cfg(feature = "defmt")]
            defmt::trace!(
                "page {=u8} col {=u8}: {=usize} bytes + {=usize} blank",
                segment.page,
                segment.col,
                segment.len,
                segment.pad
            );
            let header =
                Command::SetPageColumn(segment.page, segment.col).send(&mut self.iface, address);
            let body = command::send_data(
                &mut self.iface,
                address,
                row.iter().copied().chain(repeat_n(blank, segment.pad)),
            );
            result = result.and(header).and(body);
        }
        result
    }
}
