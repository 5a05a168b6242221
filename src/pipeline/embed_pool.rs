//! Bounded worker pool for per-frame embedding extraction.
//!
//! The faces of one frame embed in parallel, but the pipeline waits for the
//! whole batch so association order stays deterministic. Jobs are tagged
//! with an epoch so results belonging to an abandoned frame are discarded
//! rather than bleeding into the next one.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use ndarray::Array1;

use crate::config::PoolConfig;
use crate::error::Error;
use crate::pipeline::detector::FaceEmbedder;
use crate::pipeline::frame::FaceImage;

struct Job {
    epoch: u64,
    index: usize,
    image: FaceImage,
}

struct JobResult {
    epoch: u64,
    index: usize,
    embedding: Option<Array1<f32>>,
}

/// Worker pool over a shared embedder.
///
/// Dropping the pool disconnects the job channel; workers finish their
/// current job and exit on their own, so session teardown never blocks on
/// in-flight embedding work.
pub struct EmbedPool {
    job_tx: Sender<Job>,
    result_rx: Receiver<JobResult>,
    epoch: u64,
}

impl EmbedPool {
    pub fn new<E>(embedder: Arc<E>, config: &PoolConfig) -> Self
    where
        E: FaceEmbedder + 'static,
    {
        let (job_tx, job_rx) = crossbeam_channel::bounded::<Job>(config.queue_capacity.max(1));
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<JobResult>();

        for _ in 0..config.workers.max(1) {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let embedder = Arc::clone(&embedder);
            std::thread::spawn(move || {
                for job in job_rx {
                    let embedding = embedder.embed(&job.image);
                    let sent = result_tx.send(JobResult {
                        epoch: job.epoch,
                        index: job.index,
                        embedding,
                    });
                    if sent.is_err() {
                        break;
                    }
                }
            });
        }

        Self {
            job_tx,
            result_rx,
            epoch: 0,
        }
    }

    /// Embed one frame's crops, returning results in submission order.
    /// A `None` slot means no embedding could be computed for that crop.
    pub fn run(&mut self, crops: Vec<FaceImage>) -> Result<Vec<Option<Array1<f32>>>, Error> {
        self.epoch += 1;
        let epoch = self.epoch;
        let n = crops.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut results: Vec<Option<Array1<f32>>> = vec![None; n];

        // Submission may block on the bounded queue, but workers always
        // drain it, so progress is guaranteed.
        for (index, image) in crops.into_iter().enumerate() {
            self.job_tx
                .send(Job {
                    epoch,
                    index,
                    image,
                })
                .map_err(|_| Error::WorkerLost)?;
        }

        let mut pending = n;
        while pending > 0 {
            let result = self.result_rx.recv().map_err(|_| Error::WorkerLost)?;
            if result.epoch != epoch {
                // Left over from an abandoned frame.
                continue;
            }
            results[result.index] = result.embedding;
            pending -= 1;
        }

        Ok(results)
    }
}
