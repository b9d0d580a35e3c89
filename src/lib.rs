//!
//! A platform-agnostic driver for the Allegro ACS712 and ACS723 Hall-effect current sensors. Built using embedded-hal.
//!
//! The sensor outputs an analog voltage proportional to the sensed current. The driver
//! zeroes the no-load output against a short burst of samples, then estimates the AC RMS
//! current by polling the converter as fast as the platform allows for exactly one line
//! cycle.
//!
//! ```
//! use acs712::{Acs712Config, Acs712Driver, SensorType};
//! # use acs712::MonotonicMicros;
//! # use embedded_hal_mock::adc::{Mock, MockChan0, Transaction};
//! # struct Clock(u32);
//! # impl MonotonicMicros for Clock {
//! #     fn elapsed_micros(&mut self) -> u32 {
//! #         let now = self.0;
//! #         self.0 += 2_000;
//! #         now
//! #     }
//! # }
//! # let expectations = vec![Transaction::read(0, 512); 19];
//! # let mut adc = Mock::new(&expectations);
//! # let pin = MockChan0 {};
//! # let clock = Clock(0);
//!
//! let mut driver = Acs712Driver::new(adc.clone(), pin, clock, Acs712Config::default());
//!
//! // Zero the sensor with no load connected, then read the line current.
//! let zero = driver.calibrate(SensorType::Acs712_20A)?;
//! let amps = driver.get_current_ac(50)?;
//! # assert_eq!(zero, 512);
//! # assert_eq!(amps, 0.0);
//! # adc.done();
//! # Ok::<(), acs712::Acs712Error<embedded_hal_mock::MockError>>(())
//! ```
//!

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod driver;
pub mod sensor;

pub use driver::*;
pub use sensor::SensorType;
