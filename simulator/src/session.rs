use std::num::NonZeroU16;

use clock_core::pattern::{PATTERN_BYTES, SECONDS_PER_WINDOW, TICKS_PER_SECOND};
use clock_core::rng::DEFAULT_SEED;
use clock_core::scheduler::{ClockScheduler, CoilDriver, CoilTerminal};
use clock_core::telemetry::StatsRecorder;

/// Slots rendered per row when printing a pattern.
const ROW_WIDTH: usize = 64;

/// Upper bound for a single `tick` command, to keep output manageable.
const MAX_TICK_BATCH: usize = 10_000;

pub const HELP_LINES: &[&str] = &[
    "status            - show scheduler position and generator state",
    "pattern           - render the active window pattern",
    "tick [n]          - advance n scheduler ticks (default 1)",
    "window            - advance to the end of the current window",
    "run <windows>     - play whole windows and summarize them",
    "stats             - list retained per-window statistics",
    "reset [seed]      - restart with the default or a hex seed",
    "help              - show this help",
    "exit | quit       - leave the simulator",
];

/// Coil driver that records every pulse instead of moving hardware.
#[derive(Default)]
pub struct RecordingCoilDriver {
    pulses: Vec<CoilTerminal>,
}

impl RecordingCoilDriver {
    pub fn pulses(&self) -> &[CoilTerminal] {
        &self.pulses
    }
}

impl CoilDriver for RecordingCoilDriver {
    fn pulse(&mut self, terminal: CoilTerminal) {
        self.pulses.push(terminal);
    }
}

pub struct Session {
    scheduler: ClockScheduler<PATTERN_BYTES>,
    telemetry: StatsRecorder,
    driver: RecordingCoilDriver,
    seconds: usize,
}

impl Session {
    pub fn new(seed: NonZeroU16, seconds: usize) -> Self {
        Self {
            scheduler: ClockScheduler::new(seed, seconds),
            telemetry: StatsRecorder::new(),
            driver: RecordingCoilDriver::default(),
            seconds,
        }
    }

    pub fn handle_command(&mut self, line: &str) -> Vec<String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Vec::new();
        };
        let argument = words.next();

        if words.next().is_some() {
            return vec![format!("ERR too many arguments for `{command}`")];
        }

        match (command.to_ascii_lowercase().as_str(), argument) {
            ("help", None) => HELP_LINES.iter().map(|line| (*line).to_string()).collect(),
            ("status", None) => self.status(),
            ("pattern", None) => self.pattern_lines(),
            ("tick", count) => self.tick(count),
            ("window", None) => self.window(),
            ("run", Some(count)) => self.run_windows(count),
            ("run", None) => vec!["ERR run needs a window count".to_string()],
            ("stats", None) => self.stats(),
            ("reset", seed) => self.reset(seed),
            ("help" | "status" | "pattern" | "window" | "stats", Some(_)) => {
                vec![format!("ERR `{command}` takes no argument")]
            }
            (other, _) => vec![format!("ERR unknown command `{other}`; try `help`")],
        }
    }

    fn status(&self) -> Vec<String> {
        let slots = self.seconds * TICKS_PER_SECOND;
        vec![
            format!("window: {} s ({} slots)", self.seconds, slots),
            format!("cursor: slot {}/{}", self.scheduler.cursor(), slots),
            format!(
                "windows completed: {}, pulses emitted: {}",
                self.scheduler.windows_completed(),
                self.driver.pulses().len()
            ),
            format!(
                "next terminal: {}, generator state: {:#06x}",
                self.scheduler.next_polarity().label(),
                self.scheduler.generator_state()
            ),
        ]
    }

    fn pattern_lines(&self) -> Vec<String> {
        let slots = self.seconds * TICKS_PER_SECOND;
        let pattern = self.scheduler.pattern();

        let mut lines = Vec::new();
        for row_start in (0..slots).step_by(ROW_WIDTH) {
            let row_end = (row_start + ROW_WIDTH).min(slots);
            let mut row = format!("{row_start:>4}  ");
            for slot in row_start..row_end {
                row.push(if pattern.contains(slot) { '#' } else { '.' });
            }
            lines.push(row);
        }
        lines.push(format!("{} marked slots", pattern.count_set()));
        lines
    }

    fn tick(&mut self, count: Option<&str>) -> Vec<String> {
        let count = match count.map_or(Ok(1), str::parse::<usize>) {
            Ok(count) if (1..=MAX_TICK_BATCH).contains(&count) => count,
            Ok(_) => return vec![format!("ERR tick count must be 1..={MAX_TICK_BATCH}")],
            Err(_) => return vec!["ERR tick count must be a number".to_string()],
        };

        let mut lines = Vec::new();
        let mut pulses = 0_usize;
        for _ in 0..count {
            let outcome = self
                .scheduler
                .advance(&mut self.driver, &mut self.telemetry);
            if let Some(terminal) = outcome.pulse {
                pulses += 1;
                lines.push(format!(
                    "slot {:>3}: pulse on terminal {}",
                    outcome.slot,
                    terminal.label()
                ));
            }
            if outcome.window_completed {
                lines.push(format!(
                    "window {} complete, pattern rebuilt",
                    self.scheduler.windows_completed()
                ));
            }
        }
        lines.push(format!("advanced {count} tick(s), {pulses} pulse(s)"));
        lines
    }

    fn window(&mut self) -> Vec<String> {
        let mut ticks = 0_usize;
        loop {
            let outcome = self
                .scheduler
                .advance(&mut self.driver, &mut self.telemetry);
            ticks += 1;
            if outcome.window_completed {
                break;
            }
        }

        let stats = self
            .telemetry
            .latest()
            .expect("window completion always records stats");
        vec![
            format!("ran {ticks} tick(s) to the window boundary"),
            format!(
                "window {}: {} pulses, {} draws ({} collisions)",
                stats.window, stats.pulses, stats.draws, stats.collisions
            ),
        ]
    }

    fn run_windows(&mut self, count: &str) -> Vec<String> {
        let Ok(count) = count.parse::<u32>() else {
            return vec!["ERR window count must be a number".to_string()];
        };
        if count == 0 {
            return vec!["ERR window count must be at least 1".to_string()];
        }

        let target = self.scheduler.windows_completed() + count;
        let mut ticks = 0_u64;
        while self.scheduler.windows_completed() < target {
            self.scheduler
                .advance(&mut self.driver, &mut self.telemetry);
            ticks += 1;
        }

        vec![format!(
            "played {count} window(s) in {ticks} ticks; {} pulses total",
            self.driver.pulses().len()
        )]
    }

    fn stats(&self) -> Vec<String> {
        if self.telemetry.is_empty() {
            return vec!["no windows completed yet".to_string()];
        }

        self.telemetry
            .oldest_first()
            .map(|stats| {
                format!(
                    "window {:>3}: {} pulses, {} draws ({} collisions)",
                    stats.window, stats.pulses, stats.draws, stats.collisions
                )
            })
            .collect()
    }

    fn reset(&mut self, seed: Option<&str>) -> Vec<String> {
        let seed = match seed.map_or(Ok(DEFAULT_SEED), parse_seed) {
            Ok(seed) => seed,
            Err(err) => return vec![format!("ERR {err}")],
        };

        self.scheduler = ClockScheduler::new(seed, self.seconds);
        self.telemetry = StatsRecorder::new();
        self.driver = RecordingCoilDriver::default();
        vec![format!("reset with seed {:#06x}", seed.get())]
    }
}

/// Parses a nonzero 16-bit seed from a hex string, with or without `0x`.
pub fn parse_seed(value: &str) -> Result<NonZeroU16, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    let raw = u16::from_str_radix(digits, 16)
        .map_err(|_| format!("seed `{value}` is not a 16-bit hex number"))?;
    NonZeroU16::new(raw).ok_or_else(|| "seed must be nonzero".to_string())
}

/// Parses a window length: a power of two between 1 and the wall-clock
/// window, so the pattern storage always fits.
pub fn parse_seconds(value: &str) -> Result<usize, String> {
    let seconds: usize = value
        .parse()
        .map_err(|_| format!("window length `{value}` is not a number"))?;

    if !seconds.is_power_of_two() || seconds > SECONDS_PER_WINDOW {
        return Err(format!(
            "window length must be a power of two between 1 and {SECONDS_PER_WINDOW}"
        ));
    }
    Ok(seconds)
}
