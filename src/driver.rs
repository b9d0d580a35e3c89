use crate::sensor::SensorType;
use core::marker::PhantomData;
use embedded_hal::adc::{Channel, OneShot};
use nb::block;

const ZERO_POINT_SAMPLES: u32 = 10;

/// Monotonic microsecond timestamp source used to bound the sampling window.
///
/// The timestamp may wrap around `u32::MAX`; elapsed time is computed with
/// wrapping subtraction, so a rollover inside a window is handled.
pub trait MonotonicMicros {
    /// The current timestamp in microseconds.
    fn elapsed_micros(&mut self) -> u32;
}

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Acs712Error<ADC> {
    /// Measurement attempted before a successful calibration
    NotCalibrated,
    /// The line frequency was zero
    Frequency,
    /// The measurement window closed before a single sample was taken
    NoSamples,
    Adc(ADC),
}

/// Constants of the converter the sensor output is wired to.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acs712Config {
    /// Highest code the converter can return (e.g. 1023 for a 10-bit ADC)
    pub adc_full_scale: u16,
    /// Converter reference voltage in volts
    pub vref: f32,
}

impl Default for Acs712Config {
    fn default() -> Self {
        Self {
            adc_full_scale: 1023,
            vref: 5.0,
        }
    }
}

/// Zero point and sensitivity established by [`Acs712Driver::calibrate`].
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Raw converter code corresponding to zero current
    pub zero: u16,
    /// Sensor output sensitivity in volts per ampere
    pub sensitivity: f32,
}

pub struct Acs712Driver<ADC, A, PIN, CLK> {
    adc: A,
    pin: PIN,
    clock: CLK,
    config: Acs712Config,
    calibration: Option<Calibration>,
    _adc: PhantomData<ADC>,
}

impl<ADC, A, PIN, CLK> Acs712Driver<ADC, A, PIN, CLK>
where
    A: OneShot<ADC, u16, PIN>,
    PIN: Channel<ADC>,
    CLK: MonotonicMicros,
{
    ///
    ///
    /// # Arguments
    ///
    /// * `adc`: The analog-to-digital converter.
    /// * `pin`: The analog input channel the sensor output is wired to.
    /// * `clock`: The microsecond timestamp source.
    /// * `config`: Constants of the platform's converter.
    ///
    /// returns: Acs712Driver<ADC, A, PIN, CLK>
    pub fn new(adc: A, pin: PIN, clock: CLK, config: Acs712Config) -> Self {
        Self {
            adc,
            pin,
            clock,
            config,
            calibration: None,
            _adc: PhantomData,
        }
    }

    /// Establishes the zero point for the given sensor variant.
    ///
    /// Takes ten successive readings with no load connected and stores their
    /// truncated integer mean as the zero-current code. Returns the zero
    /// point so callers may log or validate it. Re-run whenever the ambient
    /// bias has drifted.
    pub fn calibrate(&mut self, sensor: SensorType) -> Result<u16, Acs712Error<A::Error>> {
        let mut acc: u32 = 0;
        for _ in 0..ZERO_POINT_SAMPLES {
            acc += u32::from(self.read_raw()?);
        }
        let zero = (acc / ZERO_POINT_SAMPLES) as u16;

        self.calibration = Some(Calibration {
            zero,
            sensitivity: sensor.sensitivity(),
        });

        Ok(zero)
    }

    pub fn get_calibration(&self) -> Option<Calibration> {
        self.calibration
    }

    /// Measures the RMS current in amperes over one full AC cycle.
    ///
    /// Polls the converter as fast as the platform allows for exactly
    /// `1_000_000 / frequency` microseconds, accumulating squared deviations
    /// from the zero point. Blocks the caller for the whole window.
    pub fn get_current_ac(&mut self, frequency: u16) -> Result<f32, Acs712Error<A::Error>> {
        let Calibration { zero, sensitivity } =
            self.calibration.ok_or(Acs712Error::NotCalibrated)?;
        if frequency == 0 {
            return Err(Acs712Error::Frequency);
        }

        let period_us = 1_000_000 / u32::from(frequency);
        let started = self.clock.elapsed_micros();

        let mut sum_squares: u64 = 0;
        let mut samples: u32 = 0;
        while self.clock.elapsed_micros().wrapping_sub(started) < period_us {
            let deviation = i32::from(self.read_raw()?) - i32::from(zero);
            sum_squares += (deviation * deviation) as u64;
            samples += 1;
        }

        if samples == 0 {
            return Err(Acs712Error::NoSamples);
        }

        let rms_code = libm::sqrtf((sum_squares / u64::from(samples)) as f32);
        Ok(rms_code / f32::from(self.config.adc_full_scale) * self.config.vref / sensitivity)
    }

    fn read_raw(&mut self) -> Result<u16, Acs712Error<A::Error>> {
        block!(self.adc.read(&mut self.pin)).map_err(Acs712Error::Adc)
    }
}

#[cfg(feature = "std")]
impl<ADC> std::fmt::Display for Acs712Error<ADC>
where
    ADC: std::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Acs712Error::Adc(adc) => write!(f, "ADC Error: {adc:?}"),
            Acs712Error::NotCalibrated => write!(f, "Sensor has not been calibrated"),
            Acs712Error::Frequency => write!(f, "Line frequency must be non-zero"),
            Acs712Error::NoSamples => {
                write!(f, "No samples acquired within the measurement window")
            }
        }
    }
}

#[cfg(feature = "std")]
impl<ADC> std::error::Error for Acs712Error<ADC>
where
    ADC: std::fmt::Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
