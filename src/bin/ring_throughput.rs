//! Ring Throughput - Multi-threaded push/pop benchmark
//!
//! P pusher thread masing-masing push `pushes` nilai berurutan, Q popper
//! thread menguras ring sampai semua nilai diterima. Semua pusher dilepas
//! bersamaan lewat start flag, waktu diukur sampai semua popper selesai.
//!
//! Usage:
//!   cargo run --release --bin ring_throughput -- [options]
//!
//! Options:
//!   --config <c>       spsc | mpsc | spmc | mpmc (default: mpmc)
//!   --producers <N>    Jumlah pusher thread (default: 4, 1 jika producer single)
//!   --consumers <N>    Jumlah popper thread (default: 4, 1 jika consumer single)
//!   --pushes <N>       Push per pusher thread (default: 4096 * 4096)

use std::hint;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use waitfree_ring::core::{
    detected_cache_line_size, Access, Consumer, Producer, RingBuffer,
    DESTRUCTIVE_INTERFERENCE_SIZE,
};
use waitfree_ring::{Mpmc, Mpsc, Spmc, Spsc};

const RING_SIZE: usize = 4096;

#[derive(Debug, thiserror::Error)]
enum ConfigError {
    #[error("unknown ring config `{0}` (expected spsc, mpsc, spmc or mpmc)")]
    UnknownConfig(String),
    #[error("missing value for `{0}`")]
    MissingValue(String),
    #[error("invalid value `{value}` for `{flag}`")]
    InvalidNumber { flag: String, value: String },
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("`{0}` must be at least 1")]
    Zero(&'static str),
    #[error("{config} allows exactly one {role} thread, got {requested}")]
    ArityMismatch {
        config: &'static str,
        role: &'static str,
        requested: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RingConfig {
    Spsc,
    Mpsc,
    Spmc,
    Mpmc,
}

impl RingConfig {
    fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "spsc" => Ok(Self::Spsc),
            "mpsc" => Ok(Self::Mpsc),
            "spmc" => Ok(Self::Spmc),
            "mpmc" => Ok(Self::Mpmc),
            _ => Err(ConfigError::UnknownConfig(name.to_string())),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Spsc => Spsc::NAME,
            Self::Mpsc => Mpsc::NAME,
            Self::Spmc => Spmc::NAME,
            Self::Mpmc => Mpmc::NAME,
        }
    }

    fn multi_producer(self) -> bool {
        matches!(self, Self::Mpsc | Self::Mpmc)
    }

    fn multi_consumer(self) -> bool {
        matches!(self, Self::Spmc | Self::Mpmc)
    }
}

/// Benchmark configuration
#[derive(Debug, Clone, Copy)]
struct BenchConfig {
    ring: RingConfig,
    producers: usize,
    consumers: usize,
    pushes: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            ring: RingConfig::Mpmc,
            producers: 4,
            consumers: 4,
            pushes: 4096 * RING_SIZE,
        }
    }
}

impl BenchConfig {
    fn validate(self) -> Result<Self, ConfigError> {
        if self.producers == 0 {
            return Err(ConfigError::Zero("--producers"));
        }
        if self.consumers == 0 {
            return Err(ConfigError::Zero("--consumers"));
        }
        if self.pushes == 0 {
            return Err(ConfigError::Zero("--pushes"));
        }
        if !self.ring.multi_producer() && self.producers != 1 {
            return Err(ConfigError::ArityMismatch {
                config: self.ring.name(),
                role: "producer",
                requested: self.producers,
            });
        }
        if !self.ring.multi_consumer() && self.consumers != 1 {
            return Err(ConfigError::ArityMismatch {
                config: self.ring.name(),
                role: "consumer",
                requested: self.consumers,
            });
        }
        Ok(self)
    }

    fn total(&self) -> usize {
        self.producers * self.pushes
    }

    /// Jumlah pop untuk popper ke-`index`; sisa pembagian ke popper awal
    fn pops_for(&self, index: usize) -> usize {
        let total = self.total();
        total / self.consumers + usize::from(index < total % self.consumers)
    }
}

/// Returns `Ok(None)` jika user minta `--help`.
///
/// Jumlah thread yang tidak diberikan: 1 untuk peran single, default untuk
/// peran multi. Jumlah eksplisit tetap divalidasi terhadap arity ring.
fn parse_args<I>(args: I) -> Result<Option<BenchConfig>, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut config = BenchConfig::default();
    let mut producers: Option<usize> = None;
    let mut consumers: Option<usize> = None;
    let mut args = args.into_iter();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--help" | "-h" => return Ok(None),
            "--config" | "-c" => {
                let value = args
                    .next()
                    .ok_or_else(|| ConfigError::MissingValue(flag.clone()))?;
                config.ring = RingConfig::parse(&value)?;
            }
            "--producers" | "-p" => producers = Some(parse_number(&flag, args.next())?),
            "--consumers" | "-q" => consumers = Some(parse_number(&flag, args.next())?),
            "--pushes" | "-n" => config.pushes = parse_number(&flag, args.next())?,
            _ => return Err(ConfigError::UnknownOption(flag)),
        }
    }

    if !config.ring.multi_producer() {
        config.producers = 1;
    }
    if !config.ring.multi_consumer() {
        config.consumers = 1;
    }
    config.producers = producers.unwrap_or(config.producers);
    config.consumers = consumers.unwrap_or(config.consumers);

    config.validate().map(Some)
}

fn parse_number(flag: &str, value: Option<String>) -> Result<usize, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::MissingValue(flag.to_string()))?;
    value
        .replace('_', "")
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            flag: flag.to_string(),
            value,
        })
}

fn print_usage() {
    println!("Usage: ring_throughput [options]");
    println!();
    println!("  --config <c>       spsc | mpsc | spmc | mpmc (default: mpmc)");
    println!("  --producers <N>    Pusher threads (default: 4, 1 for single-producer rings)");
    println!("  --consumers <N>    Popper threads (default: 4, 1 for single-consumer rings)");
    println!("  --pushes <N>       Pushes per pusher (default: {})", 4096 * RING_SIZE);
}

fn pusher<A: Access, const N: usize>(
    producer: &Producer<'_, usize, A, N>,
    start: &AtomicBool,
    pushes: usize,
) {
    while !start.load(Ordering::Relaxed) {
        hint::spin_loop();
    }

    for i in 0..pushes {
        while !producer.push(i) {
            hint::spin_loop();
        }
    }
}

fn popper<A: Access, const N: usize>(consumer: &Consumer<'_, usize, A, N>, pops: usize) {
    for _ in 0..pops {
        while consumer.pop().is_none() {
            hint::spin_loop();
        }
    }
}

/// Bagi satu handle ke `count` thread sesuai arity perannya.
///
/// Peran single selalu `count == 1` (dijamin `BenchConfig::validate`).
trait Fanout: Sized {
    fn fanout(self, count: usize) -> Vec<Self>;
}

macro_rules! impl_fanout {
    (single: $handle:ident, $($access:ty),+) => {
        $(
            impl<const N: usize> Fanout for $handle<'_, usize, $access, N> {
                fn fanout(self, count: usize) -> Vec<Self> {
                    debug_assert_eq!(count, 1);
                    vec![self]
                }
            }
        )+
    };
    (multi: $handle:ident, $($access:ty),+) => {
        $(
            impl<const N: usize> Fanout for $handle<'_, usize, $access, N> {
                fn fanout(self, count: usize) -> Vec<Self> {
                    (0..count).map(|_| self.clone()).collect()
                }
            }
        )+
    };
}

impl_fanout!(single: Producer, Spsc, Spmc);
impl_fanout!(multi: Producer, Mpsc, Mpmc);
impl_fanout!(single: Consumer, Spsc, Mpsc);
impl_fanout!(multi: Consumer, Spmc, Mpmc);

/// Jalankan benchmark, returns waktu dari start flag sampai semua popper selesai
fn measure<A: Access>(config: BenchConfig) -> Duration
where
    for<'r> Producer<'r, usize, A, RING_SIZE>: Fanout,
    for<'r> Consumer<'r, usize, A, RING_SIZE>: Fanout,
{
    let mut ring: RingBuffer<usize, A, RING_SIZE> = RingBuffer::new();
    let start = AtomicBool::new(false);
    let start = &start;
    let (producer, consumer) = ring.split();

    thread::scope(|s| {
        let poppers: Vec<_> = consumer
            .fanout(config.consumers)
            .into_iter()
            .enumerate()
            .map(|(index, consumer)| {
                let pops = config.pops_for(index);
                s.spawn(move || popper(&consumer, pops))
            })
            .collect();

        for producer in producer.fanout(config.producers) {
            s.spawn(move || pusher(&producer, start, config.pushes));
        }

        let began = Instant::now();
        start.store(true, Ordering::Relaxed);

        for popper in poppers {
            if popper.join().is_err() {
                eprintln!("⚠️  popper thread panicked");
            }
        }
        began.elapsed()
    })
}

fn main() -> ExitCode {
    let config = match parse_args(std::env::args().skip(1)) {
        Ok(Some(config)) => config,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    waitfree_ring::init_tracing();

    println!("🚀 Ring Throughput Benchmark");
    println!("============================\n");
    println!("  Config:      {}", config.ring.name());
    println!("  Ring size:   {}", RING_SIZE);
    println!("  Producers:   {}", config.producers);
    println!("  Consumers:   {}", config.consumers);
    println!("  Push/thread: {}", config.pushes);
    println!("  Cache line:  {} bytes (compiled)", DESTRUCTIVE_INTERFERENCE_SIZE);

    match detected_cache_line_size() {
        Some(detected) if detected > DESTRUCTIVE_INTERFERENCE_SIZE => {
            println!(
                "  Cache line:  {} bytes (detected) ⚠️  larger than compiled padding",
                detected
            );
        }
        Some(detected) => println!("  Cache line:  {} bytes (detected)", detected),
        None => println!("  Cache line:  unknown (detection unsupported)"),
    }
    println!();

    let elapsed = match config.ring {
        RingConfig::Spsc => measure::<Spsc>(config),
        RingConfig::Mpsc => measure::<Mpsc>(config),
        RingConfig::Spmc => measure::<Spmc>(config),
        RingConfig::Mpmc => measure::<Mpmc>(config),
    };

    let total = config.total();
    println!(
        "📊 Processed {} elements in {} nano-seconds.",
        total,
        elapsed.as_nanos()
    );
    println!(
        "  Throughput: {:.2} M ops/sec ({:.2} ns/op)",
        total as f64 / elapsed.as_secs_f64() / 1_000_000.0,
        elapsed.as_nanos() as f64 / total as f64
    );

    ExitCode::SUCCESS
}
