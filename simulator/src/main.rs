mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::num::NonZeroU16;
use std::process;

use crossterm::style::Stylize;

use clock_core::pattern::SECONDS_PER_WINDOW;
use clock_core::rng::DEFAULT_SEED;
use session::Session;

fn main() -> io::Result<()> {
    let options = parse_options().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("Usage: vetinari-simulator [--seed <hex>] [--seconds <power-of-two>]");
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut session = Session::new(options.seed, options.seconds);
    let mut line = String::new();

    writeln!(
        writer,
        "{} Type `help` for commands or `exit` to quit.",
        "Vetinari clock simulator ready.".bold()
    )?;

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "{}", "Session closed.".dim())?;
            break;
        }

        for response in session.handle_command(trimmed) {
            writeln!(writer, "{response}")?;
        }
    }

    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

struct Options {
    seed: NonZeroU16,
    seconds: usize,
}

fn parse_options() -> Result<Options, String> {
    let mut seed = DEFAULT_SEED;
    let mut seconds = SECONDS_PER_WINDOW;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("Expected value after --seed")?;
                seed = session::parse_seed(&value)?;
            }
            "--seconds" => {
                let value = args.next().ok_or("Expected value after --seconds")?;
                seconds = session::parse_seconds(&value)?;
            }
            other => return Err(format!("Unknown argument `{other}`")),
        }
    }

    Ok(Options { seed, seconds })
}
