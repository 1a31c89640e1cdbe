//! Full example code for driving an SH1106 display. This runs on an RP2040 with a 1.3" 128x64
//! SH1106 module on I2C0 (GP4 = SDA, GP5 = SCL), and streams a frame in two halves to show the
//! cursor carrying over between writes.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, I2c};
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use sh1106_paged as oled;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // The driver's 800 kHz request is not applied by the adapter; configure the peripheral here.
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 800_000;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    let mut disp = oled::Display::new(
        oled::I2cInterface::new(i2c),
        oled::consts::SCREEN_BUFFER_SIZE,
    );
    disp.begin().unwrap();
    info!("SH1106 initialized");

    // Vertical stripes: every other column lit.
    let mut frame = [0u8; oled::consts::SCREEN_BUFFER_SIZE as usize];
    for (i, byte) in frame.iter_mut().enumerate() {
        *byte = if i % 2 == 0 { 0xFF } else { 0x00 };
    }

    let mut inverted = false;
    loop {
        // Two halves land exactly where one full write would have.
        let (top, bottom) = frame.split_at(frame.len() / 2);
        disp.fill_screen_sized(top, top.len() as u16, 0).unwrap();
        disp.fill_screen_sized(bottom, bottom.len() as u16, 0).unwrap();

        inverted = !inverted;
        disp.set_inverse(inverted).unwrap();
        Timer::after_millis(500).await;
    }
}
