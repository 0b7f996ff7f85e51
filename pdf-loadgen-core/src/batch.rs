//! Batch orchestration: plans one job per requested file and runs them in
//! order, one file at a time.

use crate::content::random_text;
use crate::error::{LoadgenError, Result};
use crate::layout::{write_text_pdf, PageGeometry};
use crate::naming::file_name;
use crate::writer::WriterConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Bytes in one of the megabytes used for `--tmin`/`--tmax`.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// What the user asked for. Read-only once the batch starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Files to produce. Zero or negative produces nothing.
    pub count: i64,
    pub min_size_mb: u64,
    pub max_size_mb: u64,
    /// Prefix of every file name.
    pub name_pattern: String,
    pub output_dir: PathBuf,
}

impl GenerationRequest {
    /// Checks the size range. Runs before anything touches the disk.
    pub fn validate(&self) -> Result<()> {
        if self.min_size_mb > self.max_size_mb {
            return Err(LoadgenError::InvalidSizeRange {
                min: self.min_size_mb,
                max: self.max_size_mb,
            });
        }
        mb_to_bytes(self.max_size_mb)?;
        Ok(())
    }

    pub fn file_count(&self) -> u64 {
        self.count.max(0) as u64
    }
}

/// Tuning that does not change what gets generated, only how.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Seed for a reproducible batch; `None` uses the thread RNG.
    pub seed: Option<u64>,
    pub writer: WriterConfig,
    pub geometry: PageGeometry,
}

/// One file to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentJob {
    /// Characters of random text to lay out.
    pub target_size_bytes: usize,
    pub output_path: PathBuf,
}

impl DocumentJob {
    /// Picks a file name and a size uniformly in the request's MB range.
    pub fn plan<R: Rng + ?Sized>(rng: &mut R, request: &GenerationRequest) -> Result<Self> {
        request.validate()?;
        let name = file_name(rng, &request.name_pattern);
        let size_mb = rng.gen_range(request.min_size_mb..=request.max_size_mb);

        Ok(Self {
            target_size_bytes: mb_to_bytes(size_mb)?,
            output_path: request.output_dir.join(name),
        })
    }
}

/// A file that was written successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub text_len: usize,
    pub pages: usize,
    /// Size on disk after the writer flushed and closed the file.
    pub file_size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub files: Vec<GeneratedFile>,
}

impl BatchSummary {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|file| file.file_size).sum()
    }
}

/// Receives progress events while a batch runs.
pub trait ProgressReporter {
    fn start(&mut self, _total: u64) {}

    /// Called after file `current` (1-based) of `total` is on disk.
    fn file_done(&mut self, current: u64, total: u64, file: &GeneratedFile);

    fn finish(&mut self, _summary: &BatchSummary) {}
}

/// Discards every progress event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn file_done(&mut self, _current: u64, _total: u64, _file: &GeneratedFile) {}
}

pub struct BatchGenerator {
    request: GenerationRequest,
    config: BatchConfig,
}

impl BatchGenerator {
    pub fn new(request: GenerationRequest, config: BatchConfig) -> Self {
        Self { request, config }
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// Generates every requested file, stopping at the first failure.
    ///
    /// Files written before a failure stay on disk.
    pub fn run(&self, progress: &mut dyn ProgressReporter) -> Result<BatchSummary> {
        match self.config.seed {
            Some(seed) => self.run_with_rng(&mut StdRng::seed_from_u64(seed), progress),
            None => self.run_with_rng(&mut rand::thread_rng(), progress),
        }
    }

    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        progress: &mut dyn ProgressReporter,
    ) -> Result<BatchSummary> {
        self.request.validate()?;
        self.config.geometry.validate()?;

        let output_dir = &self.request.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| LoadgenError::OutputDirectory {
            path: output_dir.clone(),
            source,
        })?;

        let total = self.request.file_count();
        info!(
            count = total,
            min_mb = self.request.min_size_mb,
            max_mb = self.request.max_size_mb,
            output = %output_dir.display(),
            "starting PDF batch"
        );
        progress.start(total);

        let mut summary = BatchSummary::default();
        for current in 1..=total {
            let job = DocumentJob::plan(rng, &self.request)?;
            let file = self.generate(rng, job)?;

            debug!(
                path = %file.path.display(),
                text_len = file.text_len,
                pages = file.pages,
                bytes = file.file_size,
                "PDF written"
            );
            progress.file_done(current, total, &file);
            summary.files.push(file);
        }

        info!(
            files = summary.len(),
            bytes = summary.total_bytes(),
            "PDF batch complete"
        );
        progress.finish(&summary);
        Ok(summary)
    }

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R, job: DocumentJob) -> Result<GeneratedFile> {
        let text = random_text(rng, job.target_size_bytes);

        let written = write_text_pdf(
            &job.output_path,
            &text,
            &self.config.geometry,
            self.config.writer,
        )
        .and_then(|pages| Ok((pages, fs::metadata(&job.output_path)?.len())));

        match written {
            Ok((pages, file_size)) => Ok(GeneratedFile {
                path: job.output_path,
                text_len: text.len(),
                pages,
                file_size,
            }),
            Err(source) => Err(LoadgenError::WriteFailed {
                path: job.output_path,
                source: Box::new(source),
            }),
        }
    }
}

/// Convenience wrapper around [`BatchGenerator::run`].
pub fn generate_batch(
    request: GenerationRequest,
    config: BatchConfig,
    progress: &mut dyn ProgressReporter,
) -> Result<BatchSummary> {
    BatchGenerator::new(request, config).run(progress)
}

/// Converts whole megabytes to a byte count that fits in memory.
pub fn mb_to_bytes(mb: u64) -> Result<usize> {
    mb.checked_mul(BYTES_PER_MB)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or(LoadgenError::SizeOverflow(mb))
}
