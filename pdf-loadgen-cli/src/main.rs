mod progress;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use pdf_loadgen::{
    BatchConfig, BatchGenerator, BatchSummary, GenerationRequest, ProgressReporter,
    SilentProgress, WriterConfig,
};
use progress::TerminalProgress;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "generar-pdfs",
    about = "Generador de PDFs para pruebas de carga.",
    version,
    author
)]
struct Cli {
    /// Cantidad de documentos PDF a generar.
    #[arg(long, allow_negative_numbers = true)]
    cantidad: i64,

    /// Tamaño mínimo por documento (MB).
    #[arg(long)]
    tmin: u64,

    /// Tamaño máximo por documento (MB).
    #[arg(long)]
    tmax: u64,

    /// Patrón para el nombre de los documentos.
    #[arg(long)]
    patron: String,

    /// Carpeta de salida para los PDF generados.
    #[arg(long)]
    salida: PathBuf,

    /// Semilla para repetir exactamente un lote.
    #[arg(long)]
    semilla: Option<u64>,

    /// Comprime el contenido de las páginas (FlateDecode).
    #[arg(long)]
    comprimir: bool,

    /// Más detalle en el log (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Oculta la cabecera y la barra de progreso.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn request(&self) -> GenerationRequest {
        GenerationRequest {
            count: self.cantidad,
            min_size_mb: self.tmin,
            max_size_mb: self.tmax,
            name_pattern: self.patron.clone(),
            output_dir: self.salida.clone(),
        }
    }

    fn config(&self) -> BatchConfig {
        BatchConfig {
            seed: self.semilla,
            writer: WriterConfig {
                compress_streams: self.comprimir,
            },
            ..BatchConfig::default()
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "pdf_loadgen=info,generar_pdfs=info",
        2 => "pdf_loadgen=debug,generar_pdfs=debug",
        _ => "pdf_loadgen=trace,generar_pdfs=trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn format_size(bytes: u64) -> String {
    const MB: f64 = 1024.0 * 1024.0;
    if bytes as f64 >= MB {
        format!("{:.2} MB", bytes as f64 / MB)
    } else {
        format!("{bytes} bytes")
    }
}

fn print_summary(summary: &BatchSummary, cli: &Cli) {
    println!(
        "{} archivos, {} en total, en {}",
        summary.len(),
        format_size(summary.total_bytes()),
        cli.salida.display()
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !cli.quiet {
        println!("\nGenerando {} documentos PDF...", cli.cantidad);
        println!("Tamaño por archivo: {} MB - {} MB", cli.tmin, cli.tmax);
        println!("Carpeta de salida: {}\n", cli.salida.display());
    }

    let mut terminal = TerminalProgress::new(std::io::stderr(), "Progreso", "pdf");
    let mut silent = SilentProgress;
    let progress: &mut dyn ProgressReporter = if cli.quiet {
        &mut silent
    } else {
        &mut terminal
    };

    let summary = BatchGenerator::new(cli.request(), cli.config())
        .run(progress)
        .with_context(|| {
            format!(
                "no se pudo generar el lote de PDFs en {}",
                cli.salida.display()
            )
        })?;

    println!("\n✓ Proceso completado. PDFs generados correctamente.");
    print_summary(&summary, &cli);

    Ok(())
}
