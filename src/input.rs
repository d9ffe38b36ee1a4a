//! Simulation input parsing.
//!
//! The input is a whitespace-separated token stream: a header
//! `N L r S mode`, then either exactly `N` records `id x y vx vy` or nothing
//! (which asks for random generation). Anything malformed fails fast here,
//! before any distributed computation starts.

use std::io::BufRead;
use std::str::FromStr;

use crate::core::{Particle, Vec2};
use crate::error::{Error, Result};

/// What to report while the run progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Dump every particle after every round.
    Print,
    /// Dump only the final summary.
    Perf,
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "print" => Ok(Self::Print),
            "perf" => Ok(Self::Perf),
            other => Err(Error::InputFormat(format!(
                "unknown display mode {other:?} (expected \"print\" or \"perf\")"
            ))),
        }
    }
}

/// A parsed run request.
#[derive(Debug, Clone)]
pub struct RunInput {
    pub n: usize,
    pub box_len: f64,
    pub radius: f64,
    pub steps: u32,
    pub mode: DisplayMode,
    /// Explicit initial population, or `None` to generate one.
    pub particles: Option<Vec<Particle>>,
}

/// Parse a complete run request from a reader.
pub fn parse_input<R: BufRead>(reader: R) -> Result<RunInput> {
    let mut tokens = Tokens::new(reader)?;

    let n: usize = tokens.next("particle count N")?;
    let box_len: f64 = tokens.next("box side L")?;
    let radius: f64 = tokens.next("radius r")?;
    let steps: u32 = tokens.next("step count S")?;
    let mode: DisplayMode = tokens.next("display mode")?;

    if n == 0 {
        return Err(Error::InputFormat("particle count must be > 0".into()));
    }
    if !box_len.is_finite() || box_len <= 0.0 {
        return Err(Error::InputFormat("box side must be finite and > 0".into()));
    }
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InputFormat("radius must be finite and > 0".into()));
    }

    let particles = if tokens.is_empty() {
        None
    } else {
        let mut particles = Vec::with_capacity(n);
        for expected in 0..n {
            let id: u32 = tokens.next("record id")?;
            if id as usize != expected {
                return Err(Error::InputFormat(format!(
                    "record {expected} carries id {id}; records must be ordered 0..N-1"
                )));
            }
            let x: f64 = tokens.next("record x")?;
            let y: f64 = tokens.next("record y")?;
            let vx: f64 = tokens.next("record vx")?;
            let vy: f64 = tokens.next("record vy")?;
            let particle = Particle::new(id, Vec2::new(x, y), radius, Vec2::new(vx, vy))
                .map_err(|e| Error::InputFormat(format!("record {expected}: {e}")))?;
            particles.push(particle);
        }
        if !tokens.is_empty() {
            return Err(Error::InputFormat(format!(
                "{} trailing tokens after the last record",
                tokens.remaining()
            )));
        }
        Some(particles)
    };

    Ok(RunInput {
        n,
        box_len,
        radius,
        steps,
        mode,
        particles,
    })
}

struct Tokens {
    tokens: Vec<String>,
    next: usize,
}

impl Tokens {
    fn new<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self {
            tokens: text.split_whitespace().map(str::to_owned).collect(),
            next: 0,
        })
    }

    fn next<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let token = self.tokens.get(self.next).ok_or_else(|| {
            Error::InputFormat(format!("unexpected end of input, expected {what}"))
        })?;
        self.next += 1;
        token
            .parse()
            .map_err(|e| Error::InputFormat(format!("bad {what} {token:?}: {e}")))
    }

    fn is_empty(&self) -> bool {
        self.next >= self.tokens.len()
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.next
    }
}
