//! Full example code for a three page UI on a 128x64 SSD1306 module. This runs on an
//! STM32F303RE with the display connected to SPI1, PA8 for D/C, and PA9 for /RESET.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;
extern crate pagefb;

use core::cell::Cell;
use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::prelude::*;
use hal::spi;
use pagefb::canvas::primitives::quads;
use pagefb::ui::loading::LoadingStage;
use pagefb::{Canvas, Config, Controller, Display, Frame, Geometry, SpiInterface, Ui, UiConfig,
             UiState};

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

/// Frames draw relative to `(x, y)` so they slide with the transition.
fn circles(canvas: &mut Canvas, _: &mut UiState<u8>, x: i16, y: i16) {
    canvas.draw_circle(x + 32, y + 28, 20);
    canvas.fill_circle(x + 96, y + 28, 12);
}

fn bars(canvas: &mut Canvas, state: &mut UiState<u8>, x: i16, y: i16) {
    canvas.draw_progress_bar(x + 4, y + 20, 120, 10, state.user_data);
}

fn quarters(canvas: &mut Canvas, state: &mut UiState<u8>, x: i16, y: i16) {
    // Full screen artwork, the page dots would be in the way.
    state.disable_indicator();
    canvas.draw_circle_quads(x + 64, y + 32, 30, quads::UPPER_LEFT | quads::LOWER_RIGHT);
    canvas.draw_rect(x, y, 128, 64);
}

fn main() -> ! {
    // Get peripherals and set up RCC.
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);

    // SPI1 is Alternate Function 5 for GPIOs PA5,6,7.
    let disp_sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);

    let disp_spi = spi::Spi::spi1(
        dp.SPI1,
        (disp_sck, disp_miso, disp_mosi),
        hal_api::spi::Mode {
            polarity: hal_api::spi::Polarity::IdleLow,
            phase: hal_api::spi::Phase::CaptureOnFirstTransition,
        },
        8.mhz(),
        clocks,
        &mut rcc.apb2,
    );

    let disp_dc = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // The driver does not control /RESET; pulse it before init.
    let mut disp_rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    disp_rst.set_low();
    delay.delay_ms(10_u16);
    disp_rst.set_high();

    let disp = Display::new(
        SpiInterface::new(disp_spi, disp_dc),
        Config::new(Geometry::W128H64, Controller::Ssd1306),
    ).unwrap();

    let frames: [&dyn Frame<u8>; 3] = [&circles, &bars, &quarters];
    let mut ui = Ui::new(
        disp,
        &frames,
        UiConfig::new().target_fps(30).time_per_frame(3000),
        0,
    ).unwrap();
    ui.init().unwrap();

    let mut warm_up = || delay_free_spin(200_000);
    let mut stages = [LoadingStage {
        process: "Warming up",
        callback: &mut warm_up,
    }];
    ui.run_loading_process(&mut stages, &mut delay).unwrap();

    // There is no free-running timer here, so time advances by what we sleep.
    let now = Cell::new(0u32);
    let mut clock = || now.get();
    loop {
        let budget = ui.update(&mut clock).unwrap();
        let sleep = if budget > 0 { budget as u16 } else { 1 };
        delay.delay_ms(sleep);
        now.set(now.get().wrapping_add(sleep as u32));

        let level = &mut ui.state_mut().user_data;
        *level = (*level + 1) % 101;
    }
}

fn delay_free_spin(cycles: u32) {
    for _ in 0..cycles {
        asm::nop();
    }
}
