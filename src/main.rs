//! memtools - inspect idle time and working-set limits from the command line.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "memtools", version, about = "Working-set and idle-time tools for Windows")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show when the user last touched the keyboard or mouse
    Idle {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the working-set limits of a process
    WorkingSet {
        /// Process id (defaults to this process)
        #[arg(long)]
        pid: Option<u32>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Change the working-set limits of a process
    SetWorkingSet {
        /// Minimum working-set size in bytes
        #[arg(long)]
        min: usize,
        /// Maximum working-set size in bytes
        #[arg(long)]
        max: usize,
        /// Raw quota flags, passed to the OS unchanged
        #[arg(long, default_value_t = 0)]
        flags: u32,
        /// Process id (defaults to this process)
        #[arg(long)]
        pid: Option<u32>,
    },
    /// Page out as much of a process as the OS allows
    Trim {
        /// Process id (defaults to this process)
        #[arg(long)]
        pid: Option<u32>,
    },
    /// Show the thread and process that own the foreground window
    Foreground,
    /// Log active/away transitions until Ctrl+C
    Watch {
        /// Sampling interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
        /// Idle seconds before the user counts as away
        #[arg(long, default_value_t = 300)]
        threshold_secs: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("memtools=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli.command)
}

#[cfg(not(windows))]
fn run(_command: Command) -> Result<(), Box<dyn std::error::Error>> {
    Err("memtools only supports Windows".into())
}

#[cfg(windows)]
fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    use memtools::config::WatchConfig;
    use memtools::idle;
    use memtools::monitor::spawn_idle_watch;
    use memtools::winapi_utils::{
        get_foreground_window, get_window_text, get_window_thread_process_id,
    };
    use memtools::working_set::{
        get_working_set_limits, set_working_set_limits, trim_working_set, QuotaFlags,
        WorkingSetLimits,
    };
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    match command {
        Command::Idle { json } => {
            let sample = idle::sample()?;
            if json {
                let report = serde_json::json!({
                    "last_input_tick": sample.last_input_tick,
                    "last_input": sample.last_input_at().to_rfc3339(),
                    "idle_ms": sample.idle().as_millis() as u64,
                    "boot_time": sample.boot_time().to_rfc3339(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Last input tick: {}", sample.last_input_tick);
                println!("Last input:      {}", sample.last_input_at().to_rfc3339());
                println!("Idle for:        {:.1}s", sample.idle().as_secs_f64());
            }
        }
        Command::WorkingSet { pid, json } => {
            let process = Target::open(pid)?;
            let ws = get_working_set_limits(process.raw())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ws)?);
            } else {
                println!("Minimum: {} bytes", ws.limits.minimum);
                println!("Maximum: {} bytes", ws.limits.maximum);
                println!("Flags:   {}", ws.flags);
            }
        }
        Command::SetWorkingSet {
            min,
            max,
            flags,
            pid,
        } => {
            let process = Target::open(pid)?;
            set_working_set_limits(
                process.raw(),
                WorkingSetLimits::new(min, max),
                QuotaFlags::from_bits(flags),
            )?;
            let ws = get_working_set_limits(process.raw())?;
            println!(
                "Working set now {}..{} bytes (flags {})",
                ws.limits.minimum, ws.limits.maximum, ws.flags
            );
        }
        Command::Trim { pid } => {
            let process = Target::open(pid)?;
            trim_working_set(process.raw())?;
            println!("Working set trimmed");
        }
        Command::Foreground => match get_foreground_window() {
            Some(hwnd) => {
                let (thread_id, process_id) = get_window_thread_process_id(hwnd);
                println!("Window:  {:?}", get_window_text(hwnd));
                println!("Thread:  {}", thread_id);
                println!("Process: {}", process_id);
            }
            None => println!("No foreground window"),
        },
        Command::Watch {
            interval_ms,
            threshold_secs,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let shutdown_ctrlc = Arc::clone(&shutdown);
            ctrlc::set_handler(move || {
                shutdown_ctrlc.store(true, Ordering::SeqCst);
            })?;

            let config = WatchConfig::new(
                Duration::from_millis(interval_ms),
                Duration::from_secs(threshold_secs),
            );
            let handle = spawn_idle_watch(shutdown, config);
            if handle.join().is_err() {
                return Err("idle watch thread panicked".into());
            }
        }
    }

    Ok(())
}

/// Either the current process or one opened by id.
#[cfg(windows)]
enum Target {
    Current,
    Opened(memtools::winapi_utils::ProcessHandle),
}

#[cfg(windows)]
impl Target {
    fn open(pid: Option<u32>) -> memtools::Result<Self> {
        match pid {
            Some(pid) => memtools::winapi_utils::ProcessHandle::open(pid).map(Self::Opened),
            None => Ok(Self::Current),
        }
    }

    fn raw(&self) -> windows::Win32::Foundation::HANDLE {
        match self {
            Self::Current => memtools::winapi_utils::current_process(),
            Self::Opened(handle) => handle.as_raw(),
        }
    }
}
