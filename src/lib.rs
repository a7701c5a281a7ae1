//! # ad9833
//!
//! A `no_std` driver for the Analog Devices
//! [AD9833](https://www.analog.com/en/products/ad9833.html) programmable
//! waveform generator. The chip synthesizes sine, triangle and square
//! output from a 28-bit phase accumulator; this crate programs it over its
//! 3-wire serial interface and tracks a shadow of the write-only register
//! state.
//!
//! The driver is generic over any [`embedded_hal::spi::SpiBus`],
//! [`embedded_hal::digital::OutputPin`] (the FSYNC frame line, active low)
//! and [`embedded_hal::delay::DelayNs`] implementation.
//!
//! ## Quick start
//!
//! ```ignore
//! use ad9833::{Ad9833, Channel, Waveform};
//!
//! // SPI mode 2; FSYNC on any push-pull GPIO.
//! let mut dds = Ad9833::new(spi, fsync, delay, 25_000_000);
//! dds.begin()?;
//!
//! // 440 Hz sine on channel 0, then un-reset the output stage.
//! dds.apply_signal(Waveform::Sine, Channel::Reg0, 440.0, None, 0.0)?;
//! dds.enable_output(true)?;
//!
//! // The value actually in effect after 28-bit quantization.
//! let hz = dds.actual_frequency(Channel::Reg0);
//! ```
//!
//! ## Chip model
//!
//! | Registers | Width | Programmed by |
//! |-----------|-------|---------------|
//! | FREQ0 / FREQ1 | 28-bit | [`Ad9833::set_frequency`] (two 14-bit writes) |
//! | PHASE0 / PHASE1 | 12-bit | [`Ad9833::set_phase`] (single write) |
//! | Control | 16-bit | re-derived from shadow state on every change |
//!
//! Frequency resolution is `reference_clock / 2^28` (≈ 0.093 Hz at 25 MHz);
//! requests are clamped to `[0, reference_clock / 2]` and phase is
//! normalized into `[0, 360)` — bad input never fails, transport faults do.
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `defmt` | no | `defmt::Format` on the public enums and error type |

#![no_std]

mod driver;
pub(crate) mod registers;

pub use driver::{Ad9833, Channel, Error, Waveform};
