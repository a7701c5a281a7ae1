//! AD9833 waveform-generator driver.
//!
//! The chip is write-only: the driver keeps a shadow of every programmable
//! setting and re-derives the 16-bit control word from that shadow whenever
//! a setting changes. Frequency and phase requests are quantized to the
//! chip's fixed-point register formats (28-bit and 12-bit respectively);
//! the quantized values actually in effect can be read back from the shadow
//! via [`Ad9833::actual_frequency`] and [`Ad9833::actual_phase`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::registers as reg;

/// Chip power-up settle time before the initial reset (ms).
const POWER_UP_MS: u32 = 100;

/// Settle time after asserting RESET (ms).
const RESET_SETTLE_MS: u32 = 15;

/// Phase steps per degree: 4096 steps over a full turn.
const STEPS_PER_DEG: f32 = 4096.0 / 360.0;

// ── Public enums ───────────────────────────────────────────────────────────

/// Selects one of the chip's two frequency/phase register pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// FREQ0 / PHASE0.
    Reg0,
    /// FREQ1 / PHASE1.
    Reg1,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::Reg0 => 0,
            Channel::Reg1 => 1,
        }
    }
}

/// Output waveform shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Waveform {
    /// Sine output through the SIN ROM and DAC.
    Sine,
    /// Triangle output (SIN ROM bypassed).
    Triangle,
    /// Square wave at the programmed frequency (DAC MSB).
    Square,
    /// Square wave at half the programmed frequency.
    HalfSquare,
}

impl Waveform {
    /// Shape bits within the control register (OPBITEN / DIV2 / MODE).
    fn bits(self) -> u16 {
        match self {
            Waveform::Sine => 0,
            Waveform::Triangle => reg::MODE,
            Waveform::Square => reg::OPBITEN | reg::DIV2,
            Waveform::HalfSquare => reg::OPBITEN,
        }
    }
}

/// Transport fault from one of the injected collaborators.
///
/// The driver never fails on caller input — out-of-range values are clamped
/// or normalized. A fault aborts the in-flight operation without retry: a
/// partially delivered two-word frequency write leaves the chip
/// mid-sequence, so recovery means reissuing the whole setter, and only the
/// caller can decide whether that is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiE, PinE> {
    /// Error from the SPI bus.
    Spi(SpiE),
    /// Error from the FSYNC pin.
    Pin(PinE),
}

// ── Driver struct ──────────────────────────────────────────────────────────

/// AD9833 DDS waveform-generator driver.
///
/// Generic over an SPI bus (mode 2, 16-bit words sent high byte first), the
/// FSYNC framing pin (active low) and a delay provider used for the reset
/// settle time.
///
/// # Example
///
/// ```ignore
/// let mut dds = Ad9833::new(spi, fsync, delay, 25_000_000);
/// dds.begin()?;                                  // power-up + reset
/// dds.apply_signal(Waveform::Sine, Channel::Reg0, 440.0, None, 0.0)?;
/// dds.enable_output(true)?;
/// ```
pub struct Ad9833<SPI, FS, D> {
    spi: SPI,
    fsync: FS,
    delay: D,
    /// MCLK driving the phase accumulator; fixed for the driver's lifetime.
    reference_clock_hz: u32,
    /// Last accepted frequency request per channel, pre-quantization.
    frequency_hz: [f32; 2],
    /// Last accepted phase request per channel, normalized to [0, 360).
    phase_deg: [f32; 2],
    waveform: [Waveform; 2],
    active_frequency: Channel,
    active_phase: Channel,
    output_enabled: bool,
    dac_disabled: bool,
    internal_clock_disabled: bool,
}

impl<SPI, FS, D> Ad9833<SPI, FS, D>
where
    SPI: SpiBus<u8>,
    FS: OutputPin,
    D: DelayNs,
{
    /// Create a new driver with default shadow state.
    ///
    /// Defaults: sine on both channels, 1 kHz on both channels, 0° phase,
    /// channel 0 routed to the output, output disabled, DAC and internal
    /// clock enabled. No chip traffic occurs until [`begin()`](Self::begin).
    pub fn new(spi: SPI, fsync: FS, delay: D, reference_clock_hz: u32) -> Self {
        Self {
            spi,
            fsync,
            delay,
            reference_clock_hz,
            frequency_hz: [1000.0; 2],
            phase_deg: [0.0; 2],
            waveform: [Waveform::Sine; 2],
            active_frequency: Channel::Reg0,
            active_phase: Channel::Reg0,
            output_enabled: false,
            dac_disabled: false,
            internal_clock_disabled: false,
        }
    }

    /// Initialize the chip: deassert FSYNC, wait for power-up, then
    /// [`reset()`](Self::reset).
    ///
    /// Must be called exactly once before any other operation; the driver
    /// does not check this precondition at runtime.
    pub fn begin(&mut self) -> Result<(), Error<SPI::Error, FS::Error>> {
        self.fsync.set_high().map_err(Error::Pin)?;
        self.delay.delay_ms(POWER_UP_MS);
        self.reset()
    }

    /// Hold the chip in reset: internal registers zeroed, output at
    /// midscale. Blocks for the settle time before returning.
    ///
    /// Every operation except `reset` itself and the phase setters rewrites
    /// the control register, so any of them ends this transient reset state
    /// (the RESET bit then tracks [`enable_output`](Self::enable_output)).
    /// [`set_phase`](Self::set_phase) and
    /// [`increment_phase`](Self::increment_phase) issue a bare phase word
    /// and leave a pending reset engaged.
    pub fn reset(&mut self) -> Result<(), Error<SPI::Error, FS::Error>> {
        self.write_word(reg::RESET)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    // ── Frequency ──────────────────────────────────────────────────────

    /// Program `channel`'s frequency register, clamping `hz` to
    /// `[0, max_frequency()]`.
    ///
    /// Emits three words: the current control image (priming the chip for
    /// two consecutive 14-bit loads), then the low half of the 28-bit
    /// frequency word, then the high half. The chip latches the new
    /// frequency only after the second half arrives, so the order is fixed.
    pub fn set_frequency(
        &mut self,
        channel: Channel,
        hz: f32,
    ) -> Result<(), Error<SPI::Error, FS::Error>> {
        let hz = hz.clamp(0.0, self.max_frequency());
        self.frequency_hz[channel.index()] = hz;

        let word = self.frequency_word(hz);
        let load = match channel {
            Channel::Reg0 => reg::FREQ0_LOAD,
            Channel::Reg1 => reg::FREQ1_LOAD,
        };
        let low = load | (word as u16 & reg::FREQ_HALF_MASK);
        let high = load | ((word >> 14) as u16 & reg::FREQ_HALF_MASK);

        self.write_control()?;
        self.write_word(low)?;
        self.write_word(high)
    }

    /// Add `delta_hz` to `channel`'s stored frequency request; shares the
    /// clamping and encoding path of [`set_frequency`](Self::set_frequency).
    pub fn increment_frequency(
        &mut self,
        channel: Channel,
        delta_hz: f32,
    ) -> Result<(), Error<SPI::Error, FS::Error>> {
        let hz = self.frequency_hz[channel.index()] + delta_hz;
        self.set_frequency(channel, hz)
    }

    // ── Phase ──────────────────────────────────────────────────────────

    /// Program `channel`'s phase register with `deg`, normalized into
    /// `[0, 360)`.
    ///
    /// Phase updates are a single 16-bit write and do not touch the control
    /// register; a pending [`reset()`](Self::reset) state survives them.
    pub fn set_phase(
        &mut self,
        channel: Channel,
        deg: f32,
    ) -> Result<(), Error<SPI::Error, FS::Error>> {
        let deg = normalize_degrees(deg);
        self.phase_deg[channel.index()] = deg;

        let mut word = reg::PHASE_LOAD | phase_word(deg);
        if channel == Channel::Reg1 {
            word |= reg::PHASE1_SELECT;
        }
        self.write_word(word)
    }

    /// Add `delta_deg` to `channel`'s stored phase request; shares the
    /// normalization path of [`set_phase`](Self::set_phase).
    pub fn increment_phase(
        &mut self,
        channel: Channel,
        delta_deg: f32,
    ) -> Result<(), Error<SPI::Error, FS::Error>> {
        let deg = self.phase_deg[channel.index()] + delta_deg;
        self.set_phase(channel, deg)
    }

    // ── Waveform and routing ───────────────────────────────────────────

    /// Select the output waveform shape for `channel`.
    pub fn set_waveform(
        &mut self,
        channel: Channel,
        waveform: Waveform,
    ) -> Result<(), Error<SPI::Error, FS::Error>> {
        self.waveform[channel.index()] = waveform;
        self.write_control()
    }

    /// Route `freq_channel`'s frequency register (and `phase_channel`'s
    /// phase register, defaulting to the same channel) to the output.
    pub fn set_output_source(
        &mut self,
        freq_channel: Channel,
        phase_channel: Option<Channel>,
    ) -> Result<(), Error<SPI::Error, FS::Error>> {
        self.active_frequency = freq_channel;
        self.active_phase = phase_channel.unwrap_or(freq_channel);
        self.write_control()
    }

    /// Composite setter: frequency, phase, waveform and output routing in
    /// one call. `phase_channel: None` targets the frequency channel's
    /// phase register.
    ///
    /// Deliberately leaves the output-enable, DAC and internal-clock flags
    /// untouched — prior calls to [`enable_output`](Self::enable_output),
    /// [`sleep_mode`](Self::sleep_mode) and friends remain in effect.
    pub fn apply_signal(
        &mut self,
        waveform: Waveform,
        freq_channel: Channel,
        hz: f32,
        phase_channel: Option<Channel>,
        deg: f32,
    ) -> Result<(), Error<SPI::Error, FS::Error>> {
        let phase_channel = phase_channel.unwrap_or(freq_channel);
        self.set_frequency(freq_channel, hz)?;
        self.set_phase(phase_channel, deg)?;
        self.set_waveform(freq_channel, waveform)?;
        self.set_output_source(freq_channel, Some(phase_channel))
    }

    // ── Output and power control ───────────────────────────────────────

    /// Enable or disable the analog output via the RESET bit.
    ///
    /// Unlike [`reset()`](Self::reset), `enable_output(false)` keeps the
    /// chip in the reset state until an explicit `enable_output(true)` —
    /// the flag is folded into every subsequent control-register image.
    pub fn enable_output(&mut self, enable: bool) -> Result<(), Error<SPI::Error, FS::Error>> {
        self.output_enabled = enable;
        self.write_control()
    }

    /// Put the chip to sleep: disables both the DAC and the internal clock.
    /// A later call to [`disable_dac`](Self::disable_dac) or
    /// [`disable_internal_clock`](Self::disable_internal_clock) overrides
    /// the corresponding half.
    pub fn sleep_mode(&mut self, enable: bool) -> Result<(), Error<SPI::Error, FS::Error>> {
        self.dac_disabled = enable;
        self.internal_clock_disabled = enable;
        self.write_control()
    }

    /// Power the on-chip DAC down or up. Square-wave output remains
    /// available with the DAC off.
    pub fn disable_dac(&mut self, disable: bool) -> Result<(), Error<SPI::Error, FS::Error>> {
        self.dac_disabled = disable;
        self.write_control()
    }

    /// Disable or enable the internal MCLK; with the clock off the output
    /// freezes at its current level.
    pub fn disable_internal_clock(
        &mut self,
        disable: bool,
    ) -> Result<(), Error<SPI::Error, FS::Error>> {
        self.internal_clock_disabled = disable;
        self.write_control()
    }

    // ── Readback (from the shadow; the chip itself is write-only) ──────

    /// The frequency actually in effect on `channel` after 28-bit
    /// quantization, in Hz. Differs from the requested value by at most
    /// half a [`resolution()`](Self::resolution) step.
    pub fn actual_frequency(&self, channel: Channel) -> f32 {
        let word = self.frequency_word(self.frequency_hz[channel.index()]);
        (word as f64 * self.reference_clock_hz as f64 / pow2_28()) as f32
    }

    /// The phase actually in effect on `channel` after 12-bit quantization,
    /// in degrees.
    pub fn actual_phase(&self, channel: Channel) -> f32 {
        let word = phase_word(self.phase_deg[channel.index()]);
        word as f32 / STEPS_PER_DEG
    }

    /// Smallest representable frequency step: `reference_clock / 2^28`.
    pub fn resolution(&self) -> f32 {
        (self.reference_clock_hz as f64 / pow2_28()) as f32
    }

    /// Highest programmable frequency: half the reference clock, the
    /// chip's square-wave output limit. Requests above it are clamped.
    pub fn max_frequency(&self) -> f32 {
        (self.reference_clock_hz / 2) as f32
    }

    // ── Release ────────────────────────────────────────────────────────

    /// Consume the driver and return the SPI bus, FSYNC pin and delay.
    pub fn release(self) -> (SPI, FS, D) {
        (self.spi, self.fsync, self.delay)
    }

    // ── Private helpers ────────────────────────────────────────────────

    /// Derive the control word from the shadow state. Pure function of the
    /// seven state fields; B28 is always set so frequency registers load as
    /// two consecutive 14-bit writes.
    fn control_word(&self) -> u16 {
        let mut word = reg::B28 | self.waveform[self.active_frequency.index()].bits();
        if self.active_frequency == Channel::Reg1 {
            word |= reg::FSELECT;
        }
        if self.active_phase == Channel::Reg1 {
            word |= reg::PSELECT;
        }
        if !self.output_enabled {
            word |= reg::RESET;
        }
        if self.dac_disabled {
            word |= reg::SLEEP12;
        }
        if self.internal_clock_disabled {
            word |= reg::SLEEP1;
        }
        word
    }

    fn write_control(&mut self) -> Result<(), Error<SPI::Error, FS::Error>> {
        let word = self.control_word();
        self.write_word(word)
    }

    /// Quantize a frequency request to the 28-bit accumulator step count.
    /// Computed in f64: the 24-bit f32 mantissa cannot carry a full 28-bit
    /// word.
    fn frequency_word(&self, hz: f32) -> u32 {
        let steps = hz as f64 * pow2_28() / self.reference_clock_hz as f64;
        (libm::round(steps) as u32) & reg::FREQ_WORD_MASK
    }

    /// Transmit one 16-bit word, high byte first, framed by FSYNC.
    fn write_word(&mut self, word: u16) -> Result<(), Error<SPI::Error, FS::Error>> {
        self.fsync.set_low().map_err(Error::Pin)?;
        let res = self.spi.write(&word.to_be_bytes()).map_err(Error::Spi);
        // Deassert FSYNC even after a failed transfer.
        let deassert = self.fsync.set_high().map_err(Error::Pin);
        res.and(deassert)
    }
}

// ── Free helpers ───────────────────────────────────────────────────────────

fn pow2_28() -> f64 {
    (1u64 << reg::FREQ_WORD_BITS) as f64
}

/// Quantize a normalized phase in degrees to the 12-bit register word.
fn phase_word(deg: f32) -> u16 {
    (libm::roundf(deg * STEPS_PER_DEG) as u16) & reg::PHASE_WORD_MASK
}

/// Fold an arbitrary angle into `[0, 360)`.
fn normalize_degrees(deg: f32) -> f32 {
    let mut deg = libm::fmodf(deg, 360.0);
    if deg < 0.0 {
        deg += 360.0;
    }
    // Rounding in the addition above can land exactly on 360.
    if deg >= 360.0 {
        deg = 0.0;
    }
    deg
}

// ── Tests ──────────────────────────────────────────────────────────────────
