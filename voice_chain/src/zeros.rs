//  Library for the Voice Chain interpreter.
// Copyright (C) 2019 Charles Johnson
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Zeros of a finite Dirichlet series on a vertical line.
//!
//! A spectrum `a_1, ..., a_N` defines the symmetrised series
//! `f(s) = Σ a_k (n_k^(-s) + n_k^(s-1))` with `n_k = k + 1`. The `n = 1` term
//! is constant on every vertical line, so indexing starts at 2. On the line
//! `Re s = 1/2` the two halves of each term are conjugate and `f` is real,
//! which is what makes sign crossings meaningful there.

use crate::{
    constants::{
        CRITICAL_LINE, DEDUP_TOLERANCE, DEFAULT_REGION, LAST, INPUT,
        NEWTON_ITERATIONS, ZERO_SEARCH_SAMPLES, ZERO_TOLERANCE,
    },
    environment::Environment,
    errors::{ChainError, ChainResult},
    primitives::argument,
    value::Value,
};
use log::debug;
use maplit::btreemap;
use std::ops::{Add, Div, Mul, Sub};

const SPECTRUM_KEYS: [&str; 3] = ["spectrum", LAST, INPUT];

/// Settings of the zero search.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroSearch {
    /// Real part of the line that is scanned.
    pub real_part: f64,
    /// Number of evenly spaced sample points across the region.
    pub samples: usize,
    /// Upper bound on Newton-Raphson steps per crossing.
    pub newton_iterations: usize,
    /// A root is converged once `|f|` is below this.
    pub tolerance: f64,
    /// Roots whose imaginary parts are closer than this are the same root.
    pub dedup_tolerance: f64,
}

impl Default for ZeroSearch {
    fn default() -> Self {
        Self {
            real_part: CRITICAL_LINE,
            samples: ZERO_SEARCH_SAMPLES,
            newton_iterations: NEWTON_ITERATIONS,
            tolerance: ZERO_TOLERANCE,
            dedup_tolerance: DEDUP_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Self {
            re,
            im,
        }
    }

    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// `base` raised to the complex power `exponent`, for positive `base`.
    fn real_power(base: f64, exponent: Self) -> Self {
        let log = base.ln();
        let magnitude = (exponent.re * log).exp();
        let angle = exponent.im * log;
        Self::new(magnitude * angle.cos(), magnitude * angle.sin())
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.re + other.re, self.im + other.im)
    }
}

impl Sub for Complex {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.re - other.re, self.im - other.im)
    }
}

impl Mul<f64> for Complex {
    type Output = Self;

    fn mul(self, scale: f64) -> Self {
        Self::new(self.re * scale, self.im * scale)
    }
}

impl Div for Complex {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        let denominator = other.re * other.re + other.im * other.im;
        Self::new(
            (self.re * other.re + self.im * other.im) / denominator,
            (self.im * other.re - self.re * other.im) / denominator,
        )
    }
}

/// Terms `(n, a_n)` of a finite Dirichlet series.
#[derive(Debug, Clone, PartialEq)]
pub struct DirichletSeries {
    terms: Vec<(f64, f64)>,
}

impl DirichletSeries {
    pub fn from_spectrum(spectrum: &[f64]) -> Self {
        Self {
            terms: spectrum
                .iter()
                .enumerate()
                .map(|(k, a)| ((k + 2) as f64, *a))
                .collect(),
        }
    }

    /// A series whose coefficients are all zero vanishes everywhere.
    pub fn is_degenerate(&self) -> bool {
        self.terms.iter().all(|(_, a)| *a == 0.0)
    }

    pub fn evaluate(&self, s: Complex) -> Complex {
        let reflected = Complex::new(s.re - 1.0, s.im);
        let negated = Complex::new(-s.re, -s.im);
        self.terms.iter().fold(Complex::new(0.0, 0.0), |sum, (n, a)| {
            sum + (Complex::real_power(*n, negated)
                + Complex::real_power(*n, reflected))
                * *a
        })
    }

    pub fn derivative(&self, s: Complex) -> Complex {
        let reflected = Complex::new(s.re - 1.0, s.im);
        let negated = Complex::new(-s.re, -s.im);
        self.terms.iter().fold(Complex::new(0.0, 0.0), |sum, (n, a)| {
            sum + (Complex::real_power(*n, reflected)
                - Complex::real_power(*n, negated))
                * (*a * n.ln())
        })
    }
}

/// A root candidate on the scanned line.
#[derive(Debug, Clone, PartialEq)]
pub struct Zero {
    pub real: f64,
    pub imaginary: f64,
    /// `|f|` at the root.
    pub residual: f64,
    pub converged: bool,
}

impl From<Zero> for Value {
    fn from(zero: Zero) -> Self {
        Value::from(btreemap! {
            "real".to_string() => Value::from(zero.real),
            "imaginary".to_string() => Value::from(zero.imaginary),
            "residual".to_string() => Value::from(zero.residual),
            "converged".to_string() => Value::from(zero.converged),
        })
    }
}

/// Finds zeros of `series` on `Re s = settings.real_part` with imaginary part
/// in `region`.
pub fn find_zeros(
    series: &DirichletSeries,
    region: (f64, f64),
    settings: &ZeroSearch,
) -> Vec<Zero> {
    let (min, max) = if region.0 <= region.1 {
        region
    } else {
        (region.1, region.0)
    };
    if series.is_degenerate() {
        return vec![Zero {
            real: settings.real_part,
            imaginary: 0.0_f64.max(min).min(max),
            residual: 0.0,
            converged: true,
        }];
    }
    let line = |t: f64| Complex::new(settings.real_part, t);
    let samples = settings.samples.max(2);
    let step = (max - min) / (samples - 1) as f64;
    let values: Vec<(f64, Complex)> = (0..samples)
        .map(|j| min + step * j as f64)
        .map(|t| (t, series.evaluate(line(t))))
        .collect();
    let mut guesses: Vec<f64> = values
        .iter()
        .filter(|(_, f)| f.norm() < settings.tolerance)
        .map(|(t, _)| *t)
        .collect();
    guesses.extend(values.windows(2).filter_map(|pair| {
        crossing(pair[0], pair[1], settings.tolerance)
    }));
    debug!("find_zeros: {} crossings in [{}, {}]", guesses.len(), min, max);
    let zeros = guesses
        .into_iter()
        .map(|guess| refine(series, guess, (min, max), settings))
        .collect();
    deduplicate(zeros, settings.dedup_tolerance)
}

// Interpolates where the real or imaginary part changes sign between two
// samples. The imaginary part is ignored while it is only rounding noise.
fn crossing(
    (ta, fa): (f64, Complex),
    (tb, fb): (f64, Complex),
    tolerance: f64,
) -> Option<f64> {
    let interpolate = |a: f64, b: f64| ta - a * (tb - ta) / (b - a);
    if fa.re * fb.re < 0.0 {
        Some(interpolate(fa.re, fb.re))
    } else if fa.im * fb.im < 0.0
        && fa.im.abs() > tolerance
        && fb.im.abs() > tolerance
    {
        Some(interpolate(fa.im, fb.im))
    } else {
        None
    }
}

// Newton-Raphson in `s`, keeping only the imaginary part of each update so the
// iterate never leaves the line.
fn refine(
    series: &DirichletSeries,
    guess: f64,
    (min, max): (f64, f64),
    settings: &ZeroSearch,
) -> Zero {
    let line = |t: f64| Complex::new(settings.real_part, t);
    let mut t = guess;
    for _ in 0..settings.newton_iterations {
        let s = line(t);
        let value = series.evaluate(s);
        if value.norm() < settings.tolerance {
            break;
        }
        let slope = series.derivative(s);
        if slope.norm() < f64::EPSILON {
            break;
        }
        let next = t - (value / slope).im;
        if !next.is_finite() {
            break;
        }
        t = next.max(min).min(max);
    }
    let residual = series.evaluate(line(t)).norm();
    Zero {
        real: settings.real_part,
        imaginary: t,
        residual,
        converged: residual < settings.tolerance,
    }
}

// Keeps the smaller residual of any roots closer than `tolerance`.
fn deduplicate(mut zeros: Vec<Zero>, tolerance: f64) -> Vec<Zero> {
    zeros.sort_by(|a, b| a.imaginary.total_cmp(&b.imaginary));
    let mut unique: Vec<Zero> = Vec::with_capacity(zeros.len());
    for zero in zeros {
        match unique.last_mut() {
            Some(previous)
                if (zero.imaginary - previous.imaginary).abs() < tolerance =>
            {
                if zero.residual < previous.residual {
                    *previous = zero;
                }
            },
            _ => unique.push(zero),
        }
    }
    unique
}

/// The `find_zeros` primitive. Reads the spectrum from `spectrum`, `last` or
/// `input` and the region from `region` (`{min, max}`) or `min` and `max`.
pub fn find_zeros_primitive(
    settings: &ZeroSearch,
    env: &mut Environment<'_>,
) -> ChainResult<Value> {
    let spectrum = read_spectrum(argument(env, &SPECTRUM_KEYS)?)?;
    let region = read_region(env)?;
    let series = DirichletSeries::from_spectrum(&spectrum);
    Ok(Value::List(
        find_zeros(&series, region, settings)
            .into_iter()
            .map(Value::from)
            .collect(),
    ))
}

fn read_spectrum(value: &Value) -> ChainResult<Vec<f64>> {
    let invalid = || ChainError::invalid_input("spectrum", "expected numbers");
    match value {
        Value::Number(n) => Ok(vec![*n]),
        Value::List(items) => {
            items.iter().map(|item| item.to_f64().ok_or_else(invalid)).collect()
        },
        Value::Str(text) => text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|piece| !piece.is_empty())
            .map(|piece| piece.parse::<f64>().map_err(|_| invalid()))
            .collect(),
        _ => Err(invalid()),
    }
}

fn read_region(env: &Environment<'_>) -> ChainResult<(f64, f64)> {
    let bound = |key: &str, default: f64| -> ChainResult<f64> {
        let value = env
            .get("region")
            .and_then(|region| region.field(key))
            .or_else(|| env.get(key));
        match value {
            None | Some(Value::Absent) => Ok(default),
            Some(v) => v
                .to_f64()
                .filter(|n| n.is_finite())
                .ok_or_else(|| ChainError::invalid_input(key, "expected a finite number")),
        }
    };
    Ok((bound("min", DEFAULT_REGION.0)?, bound("max", DEFAULT_REGION.1)?))
}
