//! Microphone recording to an in-memory WAV blob.
//!
//! The recorder buffers raw PCM off the device seam while recognition runs
//! in parallel, then encodes on stop. The device stream is always dropped
//! (released) before encoding starts, and on every exit path.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

pub const WAV_MIME: &str = "audio/wav";

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no audio input device available")]
    NoDevice,

    #[error("audio encoding failed: {0}")]
    Encoding(#[from] hound::Error),

    #[error("recording task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// An open microphone stream: mono 16-bit PCM frames as they arrive from
/// the device. Dropping it releases the device.
pub struct MicStream {
    pub frames: mpsc::Receiver<Vec<i16>>,
    pub sample_rate: u32,
}

/// Device seam for audio input.
#[async_trait]
pub trait MicSource: Send + Sync {
    async fn acquire(&self) -> Result<MicStream, RecorderError>;
}

/// A finished recording, ready for multipart upload.
#[derive(Debug, Clone)]
pub struct AudioBlob {
    pub data: Bytes,
    pub mime: &'static str,
    pub duration_secs: f64,
}

pub struct AudioRecorder {
    source: Arc<dyn MicSource>,
}

impl AudioRecorder {
    pub fn new(source: Arc<dyn MicSource>) -> Self {
        Self { source }
    }

    /// Acquires the device and starts buffering frames on a background task.
    pub async fn start(&self) -> Result<RecordingHandle, RecorderError> {
        let mut stream = self.source.acquire().await?;
        let sample_rate = stream.sample_rate;
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let collector = tokio::spawn(async move {
            let mut samples: Vec<i16> = Vec::new();
            loop {
                tokio::select! {
                    frame = stream.frames.recv() => match frame {
                        Some(frame) => samples.extend_from_slice(&frame),
                        None => break,
                    },
                    _ = &mut stop_rx => {
                        // Take what the device already delivered, then stop
                        while let Ok(frame) = stream.frames.try_recv() {
                            samples.extend_from_slice(&frame);
                        }
                        break;
                    }
                }
            }
            drop(stream);
            samples
        });

        Ok(RecordingHandle {
            sample_rate,
            stop: Some(stop_tx),
            collector,
        })
    }
}

/// One in-progress recording. Dropping it without calling `stop` still
/// releases the device; the buffered audio is discarded.
pub struct RecordingHandle {
    sample_rate: u32,
    stop: Option<oneshot::Sender<()>>,
    collector: JoinHandle<Vec<i16>>,
}

impl RecordingHandle {
    /// Stops the device and encodes the captured PCM as 16-bit WAV.
    pub async fn stop(mut self) -> Result<AudioBlob, RecorderError> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let samples = self.collector.await?;
        let duration_secs = samples.len() as f64 / f64::from(self.sample_rate);
        let data = encode_wav(&samples, self.sample_rate)?;
        Ok(AudioBlob {
            data,
            mime: WAV_MIME,
            duration_secs,
        })
    }
}

fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Bytes, RecorderError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(Bytes::from(cursor.into_inner()))
}
