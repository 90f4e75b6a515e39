//! Batch driver: dump in, JSON Lines out.

use crate::cleanup::{clean_document, CleanOptions};
use crate::dump::DumpReader;
use crate::error::Result;
use crate::model::{CleaningResult, Document, Record};
use crate::output::RecordWriter;
use crate::stats::{CorpusStats, ProcessSummary};
use rayon::prelude::*;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

/// Options for [`process_dump`].
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Options passed to every cleaning call
    pub clean: CleanOptions,
    /// Documents pulled from the dump per batch
    pub batch_size: usize,
    /// Stop after this many accepted records
    pub max_articles: Option<u64>,
    /// Records mirrored to the sample stream
    pub sample_size: usize,
    /// Clean each batch on the rayon thread pool
    pub parallel: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            clean: CleanOptions::default(),
            batch_size: 256,
            max_articles: None,
            sample_size: 1000,
            parallel: true,
        }
    }
}

impl ProcessOptions {
    /// Creates options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cleaning options.
    pub fn with_clean_options(mut self, clean: CleanOptions) -> Self {
        self.clean = clean;
        self
    }

    /// Sets the batch size. Zero is treated as one.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Stops after `max` accepted records.
    pub fn with_max_articles(mut self, max: u64) -> Self {
        self.max_articles = Some(max);
        self
    }

    /// Sets the sample stream size.
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Cleans on the calling thread only.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Snapshot handed to the progress callback after every batch.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub pages_seen: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub elapsed: Duration,
}

/// Cleans a slice of documents, keeping input order.
pub fn clean_batch(docs: &[Document], options: &CleanOptions, parallel: bool) -> Vec<CleaningResult> {
    if parallel {
        docs.par_iter()
            .map(|doc| clean_document(&doc.text, options))
            .collect()
    } else {
        docs.iter()
            .map(|doc| clean_document(&doc.text, options))
            .collect()
    }
}

/// Cleans every document of a dump and writes the accepted ones.
///
/// Output order equals dump order. Malformed pages are skipped; a broken
/// XML stream or a failed write aborts the run.
///
/// # Example
///
/// ```
/// use wikiclean::{process_dump, DumpReader, ProcessOptions, RecordWriter};
///
/// let xml = "<mediawiki><page><title>T</title><ns>0</ns><id>1</id>\
///            <revision><text>太短</text></revision></page></mediawiki>";
/// let mut reader = DumpReader::new(xml.as_bytes());
/// let mut writer = RecordWriter::new(Vec::new());
///
/// let summary = process_dump(&mut reader, &mut writer, &ProcessOptions::default(), |_| {})?;
/// assert_eq!(summary.corpus.rejected, 1);
/// # Ok::<(), wikiclean::Error>(())
/// ```
pub fn process_dump<R, W, F>(
    reader: &mut DumpReader<R>,
    writer: &mut RecordWriter<W>,
    options: &ProcessOptions,
    mut on_progress: F,
) -> Result<ProcessSummary>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Progress),
{
    let start = Instant::now();
    let batch_size = options.batch_size.max(1);
    let mut corpus = CorpusStats::new();
    let mut batch: Vec<Document> = Vec::with_capacity(batch_size);
    let mut limit_reached = false;

    tracing::info!(
        batch_size,
        parallel = options.parallel,
        max_articles = ?options.max_articles,
        "processing dump"
    );

    loop {
        batch.clear();
        let mut exhausted = false;
        while batch.len() < batch_size {
            match reader.next() {
                Some(Ok(doc)) => batch.push(doc),
                // Already logged by the reader
                Some(Err(e)) if !e.is_fatal() => {}
                Some(Err(e)) => return Err(e),
                None => {
                    exhausted = true;
                    break;
                }
            }
        }

        let results = clean_batch(&batch, &options.clean, options.parallel);
        let mut batch_stats = CorpusStats::new();
        for (doc, result) in batch.iter().zip(&results) {
            match result {
                CleaningResult::Accepted {
                    length, cjk_ratio, ..
                } => {
                    if let Some(record) = Record::new(doc, result) {
                        writer.write(&record)?;
                    }
                    batch_stats.record_accepted(*length, *cjk_ratio);
                }
                CleaningResult::Rejected => batch_stats.record_rejected(),
            }

            if options
                .max_articles
                .is_some_and(|max| writer.written() >= max)
            {
                limit_reached = true;
                break;
            }
        }
        corpus.merge(&batch_stats);

        on_progress(&Progress {
            pages_seen: reader.stats().pages_seen,
            accepted: corpus.accepted,
            rejected: corpus.rejected,
            elapsed: start.elapsed(),
        });

        if exhausted || limit_reached {
            break;
        }
    }

    writer.flush()?;

    let summary = ProcessSummary {
        dump: reader.stats(),
        corpus,
        sampled: writer.sampled(),
        elapsed: start.elapsed(),
        limit_reached,
    };

    tracing::info!(
        pages = summary.dump.pages_seen,
        accepted = summary.corpus.accepted,
        rejected = summary.corpus.rejected,
        limit_reached,
        elapsed_secs = summary.elapsed.as_secs_f64(),
        "finished processing dump"
    );

    Ok(summary)
}
