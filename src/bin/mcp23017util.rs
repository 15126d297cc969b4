//! Interactive poking at an `MCP23017` from the command line.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use mcp23017_smbus::reset::{self, StdDelay, SysfsResetLine};
use mcp23017_smbus::{Bank, Bit, Config, LinuxSmbus, Port, Session};

#[derive(Parser, Debug)]
#[command(version, about = "Read and write the pins of an MCP23017 I/O expander")]
struct Args {
    /// Use i2c device <DEVICE>
    #[arg(short, long, default_value = mcp23017_smbus::DEFAULT_DEVICE)]
    device: String,

    /// Use i2c device address <ADDRESS> (hex with 0x, octal with 0, else decimal)
    #[arg(short, long, default_value = "0x20", value_parser = parse_address)]
    address: u8,

    /// Use IOCON.BANK=1 (default: IOCON.BANK=0)
    #[arg(short = '1', long)]
    bank1: bool,

    /// Pulse this sysfs GPIO line as /RESET before every (re)initialization
    #[arg(short, long, value_name = "LINE")]
    reset_gpio: Option<u64>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Parse a byte the way `%hhi` would: `0x` prefix hex, leading `0` octal, decimal otherwise.
fn parse_number(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };
    u8::from_str_radix(digits, radix).map_err(|e| format!("\"{s}\": {e}"))
}

fn parse_address(s: &str) -> Result<u8, String> {
    let address = parse_number(s)?;
    if address > 0x7f {
        return Err(format!("0x{address:02x} is not a 7-bit address"));
    }
    Ok(address)
}

fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
}

struct App {
    config: Config,
    reset_line: Option<SysfsResetLine>,
    session: Option<Session<LinuxSmbus>>,
}

impl App {
    /// Drop the current session, pulse /RESET if configured (otherwise revert the chip to
    /// bank 0 by hand), then start over with all pins as outputs.
    fn reset(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(mut old) = self.session.take() {
            // without a /RESET pulse the chip would keep its bank 1 layout
            if self.reset_line.is_none() {
                old.revert_bank()?;
            }
        }

        if let Some(line) = self.reset_line.as_mut() {
            let mut bus = LinuxSmbus::open(&self.config.device, self.config.address)?;
            let attempts =
                reset::hardware_reset(&mut bus, self.config.address, line, &mut StdDelay)?;
            log::info!("chip came out of reset after {attempts} attempts");
        }

        let mut session = Session::open(&self.config)?;
        session.set_output_pins(0xff, 0xff)?;
        self.session = Some(session);
        Ok(())
    }
}

fn print_menu() {
    println!("Menu");
    println!("^^^^");
    println!(" 0  - exit");
    println!(" 1  - set gpio A");
    println!(" 2  - set gpio B");
    println!(" 3  - get gpio A");
    println!(" 4  - get gpio B");
    println!(" 5  - read register");
    println!(" 6  - set bit");
    println!(" 7  - clear bit");
    println!(" 8  - dump registers");
    println!(" 9  - reset");
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, text: &str) -> Option<String> {
    print!("{text}");
    io::stdout().flush().ok()?;
    match lines.next()? {
        Ok(line) => Some(line),
        Err(e) => {
            eprintln!("read error: {e}");
            None
        }
    }
}

/// Run one menu command.  Returns `false` once the user asks to exit or input ends.
fn process_cmd(app: &mut App, lines: &mut impl Iterator<Item = io::Result<String>>) -> bool {
    let Some(cmd) = prompt(lines, "> ") else {
        return false;
    };
    let cmd = match parse_number(&cmd) {
        Ok(cmd) => cmd,
        Err(e) => {
            println!("unknown cmd: {e}");
            return true;
        }
    };

    match cmd {
        0 => return false,
        9 => {
            if let Err(e) = app.reset() {
                eprintln!("reset error: {e}");
            }
            return true;
        }
        _ => {}
    }

    let Some(session) = app.session.as_mut() else {
        println!("no session, use 9 to reset");
        return true;
    };

    match cmd {
        1 | 2 => {
            let Some(input) = prompt(lines, "please enter a value: ") else {
                return false;
            };
            let value = match parse_number(&input) {
                Ok(value) => value,
                Err(e) => {
                    eprintln!("{e}");
                    return true;
                }
            };
            let port = if cmd == 1 { Port::A } else { Port::B };
            if let Err(e) = session.write_port(port, value) {
                eprintln!("write error: {e}");
            }
        }
        3 | 4 => {
            let port = if cmd == 3 { Port::A } else { Port::B };
            match session
                .read_port(port)
                .and_then(|gpio| Ok((gpio, session.read_latch(port)?)))
            {
                Ok((gpio, olat)) => {
                    println!("GPIO{port}: 0x{gpio:02x}");
                    println!("OLAT{port}: 0x{olat:02x}");
                }
                Err(e) => eprintln!("get error: {e}"),
            }
        }
        5 => {
            let Some(input) = prompt(lines, "register: ") else {
                return false;
            };
            match parse_number(&input) {
                Ok(reg) => match session.get_register(reg) {
                    Ok(value) => println!("register: 0x{reg:02x} is 0x{value:02x}"),
                    Err(e) => eprintln!("{e}"),
                },
                Err(e) => eprintln!("{e}"),
            }
        }
        6 | 7 => {
            let Some(input) = prompt(lines, "bit: ") else {
                return false;
            };
            let bit: Bit = match input.parse() {
                Ok(bit) => bit,
                Err(e) => {
                    eprintln!("{e}");
                    return true;
                }
            };
            let res = if cmd == 6 {
                session.set_bit(bit)
            } else {
                session.clear_bit(bit)
            };
            if let Err(e) = res {
                eprintln!("{} bit error: {e}", if cmd == 6 { "set" } else { "clear" });
            }
        }
        8 => match session.dump_registers() {
            Ok(dump) => {
                for (reg, value) in dump {
                    println!("{reg:<7} (0x{:02x}): 0x{value:02x}", session.address(reg));
                }
            }
            Err(e) => eprintln!("dump error: {e}"),
        },
        _ => println!("unknown cmd: {cmd}"),
    }
    true
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = setup_logging(args.verbose) {
        eprintln!("can't set up logging: {e}");
        return ExitCode::FAILURE;
    }

    let config = Config::default()
        .with_device(args.device)
        .with_address(args.address)
        .with_bank(if args.bank1 { Bank::Bank1 } else { Bank::Bank0 });

    let reset_line = match args.reset_gpio.map(SysfsResetLine::export).transpose() {
        Ok(line) => line,
        Err(e) => {
            eprintln!("reset line error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = App {
        config,
        reset_line,
        session: None,
    };
    if let Err(e) = app.reset() {
        eprintln!("init error: {e}");
        return ExitCode::FAILURE;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print_menu();
        if !process_cmd(&mut app, &mut lines) {
            break;
        }
    }

    ExitCode::SUCCESS
}
